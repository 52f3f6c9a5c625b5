//! Rule loader (§4.1): recursively parse a directory tree of YAML files
//! into a [`RuleSet`].

use std::path::Path;

use bcscan_domain::{Rule, RuleSet};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Extension rule files are expected to carry.
const RULE_FILE_SUFFIX: &str = "yaml";
/// Alternate extension accepted alongside [`RULE_FILE_SUFFIX`].
const RULE_FILE_SUFFIX_ALT: &str = "yml";

/// Recursively discover and parse every rule file under `dir`.
///
/// Invalid files are logged and skipped; the returned set always reflects
/// the union of successfully parsed files (§4.1 "a partial reload is
/// still committed"). Fatal only if `dir` itself cannot be walked.
pub fn load_from_dir(dir: &Path) -> Result<RuleSet> {
    let mut rules = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|err| Error::RulesDirectoryRead {
            path: dir.to_path_buf(),
            source: err
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if ext != RULE_FILE_SUFFIX && ext != RULE_FILE_SUFFIX_ALT {
            continue;
        }

        match load_rule_file(entry.path()) {
            Ok(rule) => rules.push(rule),
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), error = %err, "skipping invalid rule file");
            }
        }
    }

    Ok(RuleSet::from_rules(rules))
}

fn load_rule_file(path: &Path) -> Result<Rule> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::RuleFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let rule: Rule = serde_yaml::from_str(&contents).map_err(|source| Error::RuleFileParse {
        path: path.to_path_buf(),
        source,
    })?;
    rule.validate()?;
    Ok(rule)
}
