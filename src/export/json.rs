//! JSON export of settlement reports
//!
//! Reports carry a schema version so older files can be recognised.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{FairshareError, FairshareResult};
use crate::models::{Money, Person};
use crate::services::Transfer;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A person's position before settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub name: String,
    pub paid: Money,
    pub owed: Money,
    pub balance: Money,
}

/// Settlement report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the report
    pub app_version: String,

    /// Currency symbol amounts were displayed with
    pub currency: String,

    /// Balances before any transfer was applied
    pub balances: Vec<BalanceEntry>,

    pub transfers: Vec<Transfer>,

    pub total_transferred: Money,
}

impl SettlementReport {
    /// Build a report from pre-settlement people and the resulting transfers
    pub fn new(people: &[Person], transfers: Vec<Transfer>, currency: &str) -> Self {
        let balances = people
            .iter()
            .map(|p| BalanceEntry {
                name: p.name.clone(),
                paid: p.paid,
                owed: p.owed.round_currency(),
                balance: p.balance,
            })
            .collect();
        let total_transferred = transfers.iter().map(|t| t.amount).sum();

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            currency: currency.to_string(),
            balances,
            transfers,
            total_transferred,
        }
    }

    /// Check the schema version and that transfers match their total
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let total: Money = self.transfers.iter().map(|t| t.amount).sum();
        if total != self.total_transferred {
            return Err(format!(
                "Transfers sum to {} but the report total is {}",
                total, self.total_transferred
            ));
        }

        for transfer in &self.transfers {
            if !transfer.amount.is_positive() {
                return Err(format!(
                    "Transfer from {} to {} has a non-positive amount",
                    transfer.from, transfer.to
                ));
            }
        }

        Ok(())
    }
}

/// Write a settlement report as JSON
pub fn export_settlement_json<W: Write>(
    report: &SettlementReport,
    writer: &mut W,
    pretty: bool,
) -> FairshareResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, report)
    } else {
        serde_json::to_writer(writer, report)
    }
    .map_err(|e| FairshareError::Export(e.to_string()))?;

    Ok(())
}

/// Read a settlement report back (for verification)
pub fn import_settlement_json(json_str: &str) -> FairshareResult<SettlementReport> {
    let report: SettlementReport = serde_json::from_str(json_str)?;
    report.validate().map_err(FairshareError::Export)?;
    Ok(report)
}
