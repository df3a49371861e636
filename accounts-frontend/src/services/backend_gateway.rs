use async_trait::async_trait;

use super::error::GatewayError;
use crate::models::{
    CreatePayment, CreateReceipt, Customer, Invoice, Payment, Pdc, PurchaseInvoice, Receipt,
    Supplier,
};

/// The calls the form engines make against the backend of record.
///
/// Object safe so handlers can hold an `Arc<dyn BackendGateway>` and tests
/// can swap in an in-memory fake. The full CRUD surface for every collection
/// lives on [`super::BackendClient`].
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn list_customers(&self) -> Result<Vec<Customer>, GatewayError>;

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, GatewayError>;

    async fn list_invoices(&self) -> Result<Vec<Invoice>, GatewayError>;

    async fn list_purchase_invoices(&self) -> Result<Vec<PurchaseInvoice>, GatewayError>;

    async fn list_payments(&self) -> Result<Vec<Payment>, GatewayError>;

    async fn list_pdcs(&self) -> Result<Vec<Pdc>, GatewayError>;

    /// Open invoices of one customer.
    async fn invoices_for_customer(&self, customer_id: &str)
        -> Result<Vec<Invoice>, GatewayError>;

    async fn next_invoice_number(&self) -> Result<String, GatewayError>;

    async fn next_return_number(&self) -> Result<String, GatewayError>;

    async fn next_receipt_number(&self) -> Result<String, GatewayError>;

    async fn next_purchase_invoice_number(&self) -> Result<String, GatewayError>;

    async fn create_payment(&self, payment: &CreatePayment) -> Result<Payment, GatewayError>;

    async fn update_payment(
        &self,
        id: &str,
        payment: &CreatePayment,
    ) -> Result<Payment, GatewayError>;

    async fn create_receipt(&self, receipt: &CreateReceipt) -> Result<Receipt, GatewayError>;

    async fn update_receipt(
        &self,
        id: &str,
        receipt: &CreateReceipt,
    ) -> Result<Receipt, GatewayError>;

    async fn mark_pdc_realised(&self, id: &str) -> Result<Pdc, GatewayError>;

    async fn mark_pdc_bounced(&self, id: &str) -> Result<Pdc, GatewayError>;
}
