//! A small tagged value type shared by `extracted_data` and the evaluator.
//!
//! Trigger and factor expressions compare values that can come from either
//! the fixed built-in identifiers (typed at the source) or the open
//! `extracted_data` map (heterogeneous by nature). `Value` is the common
//! currency between the two.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically-typed scalar, as produced by context extraction or
/// literal parsing in the expression evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A 64-bit signed integer
    Int(i64),
    /// A 64-bit IEEE float
    Float(f64),
    /// A boolean
    Bool(bool),
    /// A string
    Str(String),
}

impl Value {
    /// The value's string form, used for `==`/`!=` comparison when neither
    /// side is a compatible numeric type.
    #[must_use]
    pub fn as_display_string(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Str(v) => v.clone(),
        }
    }

    /// Narrow to `i64` if this value is integral.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Narrow to `f64` if this value is a float or an integer (integers
    /// widen losslessly enough for comparison purposes).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_display_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}
