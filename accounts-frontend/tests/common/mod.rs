#![allow(dead_code)]

use std::sync::Mutex;

use accounts_frontend::config::{BackendSettings, NumberingSettings};
use accounts_frontend::models::{
    AppliedPayment, CreatePayment, CreateReceipt, Customer, Invoice, Party, Payment, Pdc,
    PdcStatus, PurchaseInvoice, Receipt, Reference, Supplier,
};
use accounts_frontend::services::{BackendGateway, GatewayError};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, d).expect("valid date")
}

pub fn party(id: &str, name: &str) -> Party {
    Party {
        id: id.to_string(),
        name: name.to_string(),
        email: None,
        phone: None,
        address: None,
        contact_person: None,
    }
}

pub fn purchase_invoice(
    id: &str,
    number: &str,
    supplier: &str,
    total: &str,
    applied: &[&str],
) -> PurchaseInvoice {
    PurchaseInvoice {
        id: id.to_string(),
        invoice_number: number.to_string(),
        supplier: Some(Reference::from(supplier)),
        date: day(1),
        items: Vec::new(),
        total_amount: dec(total),
        applied_payments: applied
            .iter()
            .map(|amount| AppliedPayment {
                payment: None,
                amount: dec(amount),
            })
            .collect(),
    }
}

pub fn invoice(id: &str, number: &str, customer: &str, total: &str, paid: &str) -> Invoice {
    let total_amount = dec(total);
    let amount_paid = dec(paid);
    Invoice {
        id: id.to_string(),
        invoice_number: number.to_string(),
        customer: Some(Reference::from(customer)),
        date: day(1),
        items: Vec::new(),
        total_amount,
        amount_paid,
        balance: total_amount - amount_paid,
        status: None,
        applied_payments: Vec::new(),
    }
}

pub fn pdc(id: &str, status: PdcStatus) -> Pdc {
    Pdc {
        id: id.to_string(),
        cheque_number: "000123".to_string(),
        party: Reference::from("c1"),
        issue_date: day(1),
        due_date: day(30),
        amount: dec("2500"),
        bank_account: None,
        status,
    }
}

pub fn numbering() -> NumberingSettings {
    NumberingSettings::default()
}

pub fn backend_settings(url: String) -> BackendSettings {
    BackendSettings {
        url,
        timeout_seconds: 5,
        api_token: None,
    }
}

/// In-memory backend that records every call it receives.
#[derive(Default)]
pub struct FakeGateway {
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub invoices: Vec<Invoice>,
    pub purchase_invoices: Vec<PurchaseInvoice>,
    pub payments: Vec<Payment>,
    pub pdcs: Vec<Pdc>,
    pub fail_writes: bool,
    pub fail_reads: bool,
    pub(crate) calls: Mutex<Vec<String>>,
    pub(crate) created_payments: Mutex<Vec<CreatePayment>>,
    pub(crate) saved_receipts: Mutex<Vec<CreateReceipt>>,
}

impl FakeGateway {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created_payments(&self) -> Vec<CreatePayment> {
        self.created_payments.lock().unwrap().clone()
    }

    pub fn saved_receipts(&self) -> Vec<CreateReceipt> {
        self.saved_receipts.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn read<T: Clone>(&self, call: &str, items: &[T]) -> Result<Vec<T>, GatewayError> {
        self.record(call);
        if self.fail_reads {
            return Err(unavailable(call));
        }
        Ok(items.to_vec())
    }

    fn check_write(&self, call: &str) -> Result<(), GatewayError> {
        self.record(call);
        if self.fail_writes {
            return Err(unavailable(call));
        }
        Ok(())
    }

    fn settle(&self, call: &str, id: &str, status: PdcStatus) -> Result<Pdc, GatewayError> {
        self.check_write(&format!("{} {}", call, id))?;
        let mut cheque = self
            .pdcs
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound {
                resource: "pdc",
                id: id.to_string(),
            })?;
        cheque.status = status;
        Ok(cheque)
    }
}

fn unavailable(call: &str) -> GatewayError {
    GatewayError::Status {
        url: format!("fake://{}", call),
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: "backend down".to_string(),
    }
}

#[async_trait]
impl BackendGateway for FakeGateway {
    async fn list_customers(&self) -> Result<Vec<Customer>, GatewayError> {
        self.read("list_customers", &self.customers)
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, GatewayError> {
        self.read("list_suppliers", &self.suppliers)
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, GatewayError> {
        self.read("list_invoices", &self.invoices)
    }

    async fn list_purchase_invoices(&self) -> Result<Vec<PurchaseInvoice>, GatewayError> {
        self.read("list_purchase_invoices", &self.purchase_invoices)
    }

    async fn list_payments(&self) -> Result<Vec<Payment>, GatewayError> {
        self.read("list_payments", &self.payments)
    }

    async fn list_pdcs(&self) -> Result<Vec<Pdc>, GatewayError> {
        self.read("list_pdcs", &self.pdcs)
    }

    async fn invoices_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<Invoice>, GatewayError> {
        let owned: Vec<Invoice> = self
            .invoices
            .iter()
            .filter(|i| i.customer.as_ref().map(Reference::id) == Some(customer_id))
            .cloned()
            .collect();
        self.read("invoices_for_customer", &owned)
    }

    async fn next_invoice_number(&self) -> Result<String, GatewayError> {
        self.record("next_invoice_number");
        Ok("INV-0001".to_string())
    }

    async fn next_return_number(&self) -> Result<String, GatewayError> {
        self.record("next_return_number");
        Ok("SR-0001".to_string())
    }

    async fn next_receipt_number(&self) -> Result<String, GatewayError> {
        self.record("next_receipt_number");
        Ok("RCPT-0001".to_string())
    }

    async fn next_purchase_invoice_number(&self) -> Result<String, GatewayError> {
        self.record("next_purchase_invoice_number");
        Ok("PI-0001".to_string())
    }

    async fn create_payment(&self, payment: &CreatePayment) -> Result<Payment, GatewayError> {
        self.check_write("create_payment")?;
        Ok(self.store_payment("pay-new", payment))
    }

    async fn update_payment(
        &self,
        id: &str,
        payment: &CreatePayment,
    ) -> Result<Payment, GatewayError> {
        self.check_write(&format!("update_payment {}", id))?;
        Ok(self.store_payment(id, payment))
    }

    async fn create_receipt(&self, receipt: &CreateReceipt) -> Result<Receipt, GatewayError> {
        self.check_write("create_receipt")?;
        Ok(self.store_receipt("rcpt-new", receipt))
    }

    async fn update_receipt(
        &self,
        id: &str,
        receipt: &CreateReceipt,
    ) -> Result<Receipt, GatewayError> {
        self.check_write(&format!("update_receipt {}", id))?;
        Ok(self.store_receipt(id, receipt))
    }

    async fn mark_pdc_realised(&self, id: &str) -> Result<Pdc, GatewayError> {
        self.settle("mark_pdc_realised", id, PdcStatus::Realised)
    }

    async fn mark_pdc_bounced(&self, id: &str) -> Result<Pdc, GatewayError> {
        self.settle("mark_pdc_bounced", id, PdcStatus::Bounced)
    }
}

impl FakeGateway {
    fn store_payment(&self, id: &str, payment: &CreatePayment) -> Payment {
        self.created_payments.lock().unwrap().push(payment.clone());
        Payment {
            id: id.to_string(),
            payment_number: payment.payment_number.clone(),
            direction: payment.direction,
            party: Reference::from(payment.party.as_str()),
            party_model: payment.party_model,
            date: payment.date,
            amount: payment.amount,
            method: payment.method,
            notes: payment.notes.clone(),
            applied_invoices: payment.applied_invoices.clone(),
        }
    }

    fn store_receipt(&self, id: &str, receipt: &CreateReceipt) -> Receipt {
        self.saved_receipts.lock().unwrap().push(receipt.clone());
        Receipt {
            id: id.to_string(),
            receipt_number: receipt.receipt_number.clone(),
            customer: Reference::from(receipt.customer.as_str()),
            invoice_id: Some(Reference::from(receipt.invoice_id.as_str())),
            invoice_number: None,
            date: receipt.date,
            amount: receipt.amount,
            payment_method: receipt.payment_method,
            notes: receipt.notes.clone(),
        }
    }
}
