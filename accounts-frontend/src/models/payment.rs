use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{date_format, PartyKind, Reference};

/// Serialised as the backend's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    Incoming,
    Outgoing,
}

impl PaymentDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentDirection::Incoming => "incoming",
            PaymentDirection::Outgoing => "outgoing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Bank,
    /// Offered on receipts.
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    Card,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Bank => "Bank",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Card => "Card",
            PaymentMethod::Cheque => "Cheque",
        }
    }
}

/// How much of a payment is attributed to one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedInvoiceAllocation {
    pub invoice: Reference,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: String,
    pub payment_number: String,
    #[serde(rename = "type")]
    pub direction: PaymentDirection,
    pub party: Reference,
    pub party_model: PartyKind,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub applied_invoices: Vec<AppliedInvoiceAllocation>,
}

/// Input for creating or updating a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub payment_number: String,
    #[serde(rename = "type")]
    pub direction: PaymentDirection,
    pub party: String,
    pub party_model: PartyKind,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub applied_invoices: Vec<AppliedInvoiceAllocation>,
}
