//! Postgres-backed risk-event sink (SPEC_FULL §6), grounded on
//! `original_source/backend/internal/repository/risk_event.go`'s `Create`/
//! `writeToDBAndCache`, reimplemented with `sqlx` against the same column
//! set. The original's write-behind channel and read-side cache are part of
//! its own persistence concerns, not the sink contract this repository
//! specifies (§6 "we specify the repository contract, not its schema").

use async_trait::async_trait;
use bcscan_domain::ports::RiskEventSink;
use bcscan_domain::risk_event::RiskEvent;
use sqlx::PgPool;

use crate::error::Result;

/// `INSERT INTO risk_events (...)`, matching the column set the original
/// repository wrote.
const INSERT_RISK_EVENT: &str = r"
    INSERT INTO risk_events (event_type, severity, contract_address, tx_hash, description, score, detected_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
";

/// A Postgres-backed [`RiskEventSink`].
pub struct PostgresRiskEventSink {
    pool: PgPool,
}

impl PostgresRiskEventSink {
    /// Connect to `database_url`.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl RiskEventSink for PostgresRiskEventSink {
    async fn create(&self, event: &RiskEvent) -> bcscan_domain::Result<()> {
        sqlx::query(INSERT_RISK_EVENT)
            .bind(&event.rule_id)
            .bind(event.severity.to_string())
            .bind(&event.contract_address)
            .bind(&event.tx_hash)
            .bind(&event.description)
            .bind(event.score)
            .bind(event.detected_at)
            .execute(&self.pool)
            .await
            .map_err(crate::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::INSERT_RISK_EVENT;

    #[test]
    fn insert_statement_matches_the_documented_column_set() {
        for column in [
            "event_type",
            "severity",
            "contract_address",
            "tx_hash",
            "description",
            "score",
            "detected_at",
        ] {
            assert!(
                INSERT_RISK_EVENT.contains(column),
                "expected column '{column}' in insert statement"
            );
        }
    }
}
