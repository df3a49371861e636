//! Editing a payment that already exists.
//!
//! Only date, method, notes and a smaller amount can change. Direction,
//! party and the applied-invoice list are sent back exactly as stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::input::{or_zero, parse_amount};
use super::state::{FormState, SUBMIT_FAILED_MESSAGE};
use super::validation::{check_amount, check_positive, ValidationError};
use crate::models::{CreatePayment, Payment, PaymentMethod};
use crate::services::metrics::record_rejection;
use crate::services::{BackendGateway, FormError};

const FORM: &str = "payment_amendment";

#[derive(Debug, Clone)]
pub struct PaymentAmendment {
    original: Payment,
    date: NaiveDate,
    method: PaymentMethod,
    notes: Option<String>,
    amount: Option<Decimal>,
    state: FormState,
}

impl PaymentAmendment {
    pub fn new(original: Payment) -> Self {
        let mut state = FormState::Empty;
        state.loaded();
        Self {
            date: original.date,
            method: original.method,
            notes: original.notes.clone(),
            amount: Some(original.amount),
            original,
            state,
        }
    }

    pub fn original(&self) -> &Payment {
        &self.original
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn set_amount(&mut self, raw: &str) -> Result<(), ValidationError> {
        let amount = parse_amount(raw);
        if let Err(err) = self.check_within_original(or_zero(amount)) {
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

    pub fn set_method(&mut self, method: PaymentMethod) {
        self.method = method;
        self.state.edited();
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self.state.edited();
    }

    pub fn to_update(&mut self) -> Result<CreatePayment, ValidationError> {
        self.state.begin_validation();
        let amount = or_zero(self.amount);
        if let Err(err) = check_positive(amount).and_then(|_| self.check_within_original(amount)) {
            return Err(self.reject(err));
        }
        self.state.validated();

        Ok(CreatePayment {
            payment_number: self.original.payment_number.clone(),
            direction: self.original.direction,
            party: self.original.party.id().to_string(),
            party_model: self.original.party_model,
            date: self.date,
            amount,
            method: self.method,
            notes: self.notes.clone(),
            applied_invoices: self.original.applied_invoices.clone(),
        })
    }

    pub async fn submit<G>(&mut self, gateway: &G) -> Result<Payment, FormError>
    where
        G: BackendGateway + ?Sized,
    {
        let update = self.to_update()?;
        match gateway.update_payment(&self.original.id, &update).await {
            Ok(saved) => {
                self.state.submitted();
                tracing::info!(payment_id = %saved.id, amount = %saved.amount, "Payment amended");
                Ok(saved)
            }
            Err(err) => {
                self.state.fail(SUBMIT_FAILED_MESSAGE);
                tracing::error!(payment_id = %self.original.id, error = %err, "Failed to amend payment");
                Err(err.into())
            }
        }
    }

    fn check_within_original(&self, amount: Decimal) -> Result<(), ValidationError> {
        check_amount(amount, "Amount")?;
        if amount > self.original.amount {
            return Err(ValidationError::ExceedsOriginalAmount {
                max: self.original.amount,
            });
        }
        Ok(())
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        record_rejection(FORM, err.kind());
        self.state.fail(err.to_string());
        err
    }
}
