//! A receipt settles exactly one of a customer's open invoices.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::input::{or_zero, parse_amount};
use super::state::{FormState, LOAD_FAILED_MESSAGE, SUBMIT_FAILED_MESSAGE};
use super::validation::{check_positive, check_receipt_amount, ValidationError};
use crate::models::{
    CreateReceipt, Customer, Invoice, PartyKind, PaymentMethod, Receipt, Reference,
};
use crate::services::metrics::{record_rejection, SUBMISSIONS_TOTAL};
use crate::services::{BackendGateway, FormError, GatewayError};

const FORM: &str = "receipt";

/// An invoice as offered in the receipt's invoice picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceOption {
    pub id: String,
    pub invoice_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<&Invoice> for InvoiceOption {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id.clone(),
            invoice_number: invoice.invoice_number.clone(),
            balance: invoice.balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptMode {
    Create,
    Edit { receipt_id: String },
}

#[derive(Debug, Clone)]
pub struct ReceiptApplicator {
    mode: ReceiptMode,
    receipt_number: String,
    customers: Vec<Customer>,
    customer: Option<String>,
    invoices: Vec<InvoiceOption>,
    no_open_invoices: bool,
    invoice: Option<String>,
    amount: Option<Decimal>,
    max_allowed: Decimal,
    date: NaiveDate,
    payment_method: PaymentMethod,
    notes: Option<String>,
    state: FormState,
}

impl ReceiptApplicator {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            mode: ReceiptMode::Create,
            receipt_number: String::new(),
            customers: Vec::new(),
            customer: None,
            invoices: Vec::new(),
            no_open_invoices: false,
            invoice: None,
            amount: None,
            max_allowed: Decimal::ZERO,
            date,
            payment_method: PaymentMethod::default(),
            notes: None,
            state: FormState::Empty,
        }
    }

    /// Open an existing receipt. The customer stays fixed and the amount may
    /// not grow beyond what was originally received.
    ///
    /// When the linked invoice is no longer open it is put back into the
    /// picker from the receipt's own cached number and amount.
    pub fn edit(receipt: &Receipt, open_invoices: &[Invoice]) -> Self {
        let mut form = Self::new(receipt.date);
        form.mode = ReceiptMode::Edit {
            receipt_id: receipt.id.clone(),
        };
        form.receipt_number = receipt.receipt_number.clone();
        form.customer = Some(receipt.customer.id().to_string());
        form.payment_method = receipt.payment_method;
        form.notes = receipt.notes.clone();
        form.invoices = open_options(open_invoices);

        if let Some(linked) = receipt.invoice_id.as_ref().map(Reference::id) {
            if !form.invoices.iter().any(|option| option.id == linked) {
                let invoice_number = receipt.linked_invoice_number().unwrap_or_default();
                form.invoices.push(InvoiceOption {
                    id: linked.to_string(),
                    invoice_number: invoice_number.to_string(),
                    balance: receipt.amount,
                });
            }
            form.invoice = Some(linked.to_string());
            form.amount = Some(receipt.amount);
            form.max_allowed = receipt.amount;
        }

        form.no_open_invoices = form.invoices.is_empty();
        form.state.loaded();
        form
    }

    pub async fn open_for_edit<G>(gateway: &G, receipt: &Receipt) -> Result<Self, GatewayError>
    where
        G: BackendGateway + ?Sized,
    {
        let open_invoices = gateway.invoices_for_customer(receipt.customer.id()).await?;
        Ok(Self::edit(receipt, &open_invoices))
    }

    pub fn populate(&mut self, customers: Vec<Customer>, receipt_number: String) {
        self.customers = customers;
        self.receipt_number = receipt_number;
        self.state.loaded();
    }

    /// Fetch customers and the previewed receipt number together.
    pub async fn load<G>(&mut self, gateway: &G) -> Result<(), GatewayError>
    where
        G: BackendGateway + ?Sized,
    {
        self.state.begin_loading();

        match tokio::try_join!(gateway.list_customers(), gateway.next_receipt_number()) {
            Ok((customers, receipt_number)) => {
                self.populate(customers, receipt_number);
                Ok(())
            }
            Err(err) => {
                self.state.fail(LOAD_FAILED_MESSAGE);
                Err(err)
            }
        }
    }

    pub fn mode(&self) -> &ReceiptMode {
        &self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn receipt_number(&self) -> &str {
        &self.receipt_number
    }

    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    pub fn invoices(&self) -> &[InvoiceOption] {
        &self.invoices
    }

    pub fn has_no_open_invoices(&self) -> bool {
        self.no_open_invoices
    }

    pub fn invoice(&self) -> Option<&str> {
        self.invoice.as_deref()
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    pub fn max_allowed(&self) -> Decimal {
        self.max_allowed
    }

    /// Load the customer's open invoices, dropping any previous invoice and
    /// amount. A single open invoice is selected straight away.
    pub async fn select_customer<G>(
        &mut self,
        gateway: &G,
        customer_id: &str,
    ) -> Result<(), FormError>
    where
        G: BackendGateway + ?Sized,
    {
        self.check_customer(customer_id)?;
        self.clear_selection();
        self.customer = Some(customer_id.to_string());
        self.state.begin_loading();

        match gateway.invoices_for_customer(customer_id).await {
            Ok(invoices) => {
                self.apply_customer_invoices(customer_id, &invoices)?;
                Ok(())
            }
            Err(err) => {
                self.no_open_invoices = true;
                self.state.fail(LOAD_FAILED_MESSAGE);
                tracing::warn!(customer_id, error = %err, "Failed to load customer invoices");
                Err(err.into())
            }
        }
    }

    /// The synchronous half of [`Self::select_customer`].
    pub fn apply_customer_invoices(
        &mut self,
        customer_id: &str,
        invoices: &[Invoice],
    ) -> Result<(), ValidationError> {
        self.check_customer(customer_id)?;
        self.clear_selection();
        self.customer = Some(customer_id.to_string());
        self.invoices = open_options(invoices);
        self.no_open_invoices = self.invoices.is_empty();
        self.state.loaded();

        if let [only] = self.invoices.as_slice() {
            let id = only.id.clone();
            self.select_invoice(&id)?;
        }
        Ok(())
    }

    /// Prefills the amount with the invoice's balance, which also becomes
    /// the most this receipt may take.
    pub fn select_invoice(&mut self, invoice_id: &str) -> Result<(), ValidationError> {
        let Some(balance) = self
            .invoices
            .iter()
            .find(|option| option.id == invoice_id)
            .map(|option| option.balance)
        else {
            return Err(self.reject(ValidationError::UnknownInvoice(invoice_id.to_string())));
        };

        self.invoice = Some(invoice_id.to_string());
        self.amount = Some(balance);
        self.max_allowed = balance;
        self.state.edited();
        Ok(())
    }

    /// Rejected amounts leave the previous one in place.
    pub fn set_amount(&mut self, raw: &str) -> Result<(), ValidationError> {
        let amount = parse_amount(raw);
        if let Err(err) = check_receipt_amount(or_zero(amount), self.max_allowed) {
            return Err(self.reject(err));
        }

        self.amount = amount;
        self.state.edited();
        Ok(())
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.state.edited();
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
        self.state.edited();
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self.state.edited();
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer.is_none() {
            return Err(ValidationError::PartyNotSelected(PartyKind::Customer));
        }
        if self.invoice.is_none() {
            if self.no_open_invoices {
                return Err(ValidationError::NoOpenInvoices);
            }
            return Err(ValidationError::InvoiceNotSelected);
        }

        let amount = or_zero(self.amount);
        check_positive(amount)?;
        check_receipt_amount(amount, self.max_allowed)
    }

    /// Re-check the amount against the session's limit and emit the record.
    pub fn submit(&mut self) -> Result<CreateReceipt, ValidationError> {
        self.state.begin_validation();
        if let Err(err) = self.validate() {
            return Err(self.reject(err));
        }
        self.state.validated();

        Ok(CreateReceipt {
            receipt_number: self.receipt_number.clone(),
            customer: self.customer.clone().unwrap_or_default(),
            invoice_id: self.invoice.clone().unwrap_or_default(),
            date: self.date,
            amount: or_zero(self.amount),
            payment_method: self.payment_method,
            notes: self.notes.clone(),
        })
    }

    /// Create or update the receipt. On backend failure the draft is kept
    /// and the form shows a generic retry message.
    pub async fn save<G>(&mut self, gateway: &G) -> Result<Receipt, FormError>
    where
        G: BackendGateway + ?Sized,
    {
        let receipt = self.submit()?;

        let result = match &self.mode {
            ReceiptMode::Create => gateway.create_receipt(&receipt).await,
            ReceiptMode::Edit { receipt_id } => gateway.update_receipt(receipt_id, &receipt).await,
        };

        match result {
            Ok(saved) => {
                self.state.submitted();
                SUBMISSIONS_TOTAL.with_label_values(&[FORM]).inc();
                tracing::info!(
                    receipt_id = %saved.id,
                    receipt_number = %saved.receipt_number,
                    invoice_id = %receipt.invoice_id,
                    amount = %receipt.amount,
                    "Receipt saved"
                );
                Ok(saved)
            }
            Err(err) => {
                self.state.fail(SUBMIT_FAILED_MESSAGE);
                tracing::error!(error = %err, "Failed to save receipt");
                Err(err.into())
            }
        }
    }

    fn check_customer(&mut self, customer_id: &str) -> Result<(), ValidationError> {
        if let ReceiptMode::Edit { .. } = self.mode {
            if self.customer.as_deref() != Some(customer_id) {
                return Err(self.reject(ValidationError::CustomerLocked));
            }
            return Ok(());
        }
        if !self.customers.iter().any(|customer| customer.id == customer_id) {
            return Err(self.reject(ValidationError::UnknownParty {
                kind: PartyKind::Customer,
                id: customer_id.to_string(),
            }));
        }
        Ok(())
    }

    fn clear_selection(&mut self) {
        self.invoices.clear();
        self.no_open_invoices = false;
        self.invoice = None;
        self.amount = None;
        self.max_allowed = Decimal::ZERO;
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        record_rejection(FORM, err.kind());
        self.state.fail(err.to_string());
        err
    }
}

fn open_options(invoices: &[Invoice]) -> Vec<InvoiceOption> {
    invoices
        .iter()
        .filter(|invoice| invoice.balance > Decimal::ZERO)
        .map(InvoiceOption::from)
        .collect()
}
