use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{date_format, LineItem, Reference};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReturn {
    #[serde(rename = "_id")]
    pub id: String,
    pub return_number: String,
    #[serde(default)]
    pub customer: Option<Reference>,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalesReturn {
    pub return_number: String,
    pub customer: String,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

/// Body of `GET /sales-returns/new-number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnNumberPreview {
    pub return_number: String,
}
