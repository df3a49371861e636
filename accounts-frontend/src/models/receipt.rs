use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{date_format, PaymentMethod, Reference};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(rename = "_id")]
    pub id: String,
    pub receipt_number: String,
    pub customer: Reference,
    #[serde(default)]
    pub invoice_id: Option<Reference>,
    /// Cached copy of the linked invoice's number.
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Receipt {
    /// Number of the linked invoice, from the cached copy or the populated reference.
    pub fn linked_invoice_number(&self) -> Option<&str> {
        self.invoice_number
            .as_deref()
            .or_else(|| self.invoice_id.as_ref().and_then(Reference::invoice_number))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceipt {
    pub receipt_number: String,
    pub customer: String,
    pub invoice_id: String,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `GET /receipts/new-number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptNumberPreview {
    pub receipt_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bank_transfer_receipt() {
        let json = r#"{
            "_id": "r1",
            "receiptNumber": "RCPT-0007",
            "customer": {"_id": "c1", "name": "Initech"},
            "invoiceId": {"_id": "i1", "invoiceNumber": "INV-001"},
            "date": "2024-09-10T00:00:00.000Z",
            "amount": 600,
            "paymentMethod": "Bank Transfer"
        }"#;

        let receipt: Receipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.payment_method, PaymentMethod::BankTransfer);
        assert_eq!(receipt.payment_method.as_str(), "Bank Transfer");
        assert_eq!(receipt.linked_invoice_number(), Some("INV-001"));
        assert_eq!(
            serde_json::to_value(&receipt).unwrap()["paymentMethod"],
            "Bank Transfer"
        );
    }
}
