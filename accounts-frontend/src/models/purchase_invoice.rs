use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{date_format, AppliedPayment, Reference};

/// A line on a purchase invoice, priced at cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLine {
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInvoice {
    #[serde(rename = "_id")]
    pub id: String,
    pub invoice_number: String,
    #[serde(default)]
    pub supplier: Option<Reference>,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<PurchaseLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub applied_payments: Vec<AppliedPayment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseInvoice {
    pub invoice_number: String,
    pub supplier: String,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub items: Vec<PurchaseLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}
