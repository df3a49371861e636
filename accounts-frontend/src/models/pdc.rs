use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{date_format, Reference};

/// Lifecycle of a post-dated cheque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PdcStatus {
    #[default]
    New,
    Realised,
    Bounced,
}

impl PdcStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdcStatus::New => "New",
            PdcStatus::Realised => "Realised",
            PdcStatus::Bounced => "Bounced",
        }
    }

    /// Only a new cheque can be realised or bounced; both outcomes are final.
    pub fn can_transition(&self, to: PdcStatus) -> bool {
        matches!(
            (self, to),
            (PdcStatus::New, PdcStatus::Realised) | (PdcStatus::New, PdcStatus::Bounced)
        )
    }
}

impl fmt::Display for PdcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pdc {
    #[serde(rename = "_id")]
    pub id: String,
    pub cheque_number: String,
    pub party: Reference,
    #[serde(with = "date_format")]
    pub issue_date: NaiveDate,
    #[serde(with = "date_format")]
    pub due_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub bank_account: Option<String>,
    #[serde(default)]
    pub status: PdcStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePdc {
    pub cheque_number: String,
    pub party: String,
    #[serde(with = "date_format")]
    pub issue_date: NaiveDate,
    #[serde(with = "date_format")]
    pub due_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,
    pub status: PdcStatus,
}
