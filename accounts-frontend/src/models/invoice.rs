//! Sales invoice records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{date_format, Reference};

/// Settlement status of a sales invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Partial,
    #[serde(other)]
    Unpaid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Partial => "partial",
            InvoiceStatus::Unpaid => "unpaid",
        }
    }

    /// Derive the status the backend would assign for these amounts.
    pub fn from_amounts(total_amount: Decimal, amount_paid: Decimal) -> Self {
        if total_amount > Decimal::ZERO && amount_paid >= total_amount {
            InvoiceStatus::Paid
        } else if amount_paid > Decimal::ZERO {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Unpaid
        }
    }
}

/// A priced line on a sales invoice or sales return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// A payment or receipt already applied against an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedPayment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Reference>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: String,
    pub invoice_number: String,
    #[serde(default)]
    pub customer: Option<Reference>,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub amount_paid: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub applied_payments: Vec<AppliedPayment>,
}

/// Input for creating or updating a sales invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoice {
    pub invoice_number: String,
    pub customer: String,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_paid: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub status: InvoiceStatus,
}

/// Body of `GET /invoices/new-number` and `GET /purchase-invoices/new-number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceNumberPreview {
    pub invoice_number: String,
}
