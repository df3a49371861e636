//! User-correctable failures and the checks that raise them.
//!
//! Every check here is pure. Live-edit handlers and pre-submit validation
//! call the same functions so both paths agree on what is acceptable.

use rust_decimal::Decimal;
use thiserror::Error;

use super::input::max_amount;
use crate::models::{PartyKind, PdcStatus};

/// Each variant's message is shown inline next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a {0}.")]
    PartyNotSelected(PartyKind),

    #[error("Unknown {kind} '{id}'.")]
    UnknownParty { kind: PartyKind, id: String },

    #[error("No invoices selected.")]
    NoAllocations,

    #[error("Total applied amount must be more than 0.")]
    NonPositiveTotal,

    #[error("Amount exceeds remaining balance for invoice {invoice_number}")]
    ExceedsRemainingBalance {
        invoice_number: String,
        remaining: Decimal,
    },

    #[error("Invoice '{0}' is not open for the selected party.")]
    UnknownInvoice(String),

    #[error("Please select an invoice.")]
    InvoiceNotSelected,

    #[error("No unpaid invoices found for this customer.")]
    NoOpenInvoices,

    #[error("Customer cannot be changed on an existing receipt.")]
    CustomerLocked,

    #[error("Amount cannot exceed invoice balance (₹{max})")]
    ExceedsInvoiceBalance { max: Decimal },

    #[error("Amount cannot exceed ₹{max}")]
    ExceedsOriginalAmount { max: Decimal },

    #[error("Amount must be more than 0.")]
    NonPositiveAmount,

    #[error("{0} cannot be negative.")]
    Negative(&'static str),

    #[error("{0} is too large.")]
    AmountTooLarge(&'static str),

    #[error("{0} is required.")]
    Required(&'static str),

    #[error("Line {0} does not exist.")]
    LineOutOfRange(usize),

    #[error("At least one line item is required.")]
    LastLine,

    #[error("Due date cannot be before the issue date.")]
    DueBeforeIssue,

    #[error("Cheque is already {0}.")]
    ChequeSettled(PdcStatus),

    #[error("Form must be validated before saving.")]
    NotValidated,
}

impl ValidationError {
    /// Short label used for the rejection metric.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::PartyNotSelected(_) => "party_not_selected",
            ValidationError::UnknownParty { .. } => "unknown_party",
            ValidationError::NoAllocations => "no_allocations",
            ValidationError::NonPositiveTotal => "non_positive_total",
            ValidationError::ExceedsRemainingBalance { .. } => "exceeds_remaining_balance",
            ValidationError::UnknownInvoice(_) => "unknown_invoice",
            ValidationError::InvoiceNotSelected => "invoice_not_selected",
            ValidationError::NoOpenInvoices => "no_open_invoices",
            ValidationError::CustomerLocked => "customer_locked",
            ValidationError::ExceedsInvoiceBalance { .. } => "exceeds_invoice_balance",
            ValidationError::ExceedsOriginalAmount { .. } => "exceeds_original_amount",
            ValidationError::NonPositiveAmount => "non_positive_amount",
            ValidationError::Negative(_) => "negative",
            ValidationError::AmountTooLarge(_) => "amount_too_large",
            ValidationError::Required(_) => "required",
            ValidationError::LineOutOfRange(_) => "line_out_of_range",
            ValidationError::LastLine => "last_line",
            ValidationError::DueBeforeIssue => "due_before_issue",
            ValidationError::ChequeSettled(_) => "cheque_settled",
            ValidationError::NotValidated => "not_validated",
        }
    }
}

pub fn check_non_negative(value: Decimal, field: &'static str) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative(field));
    }
    Ok(())
}

/// Non-negative and no larger than [`max_amount`].
pub fn check_amount(value: Decimal, field: &'static str) -> Result<(), ValidationError> {
    check_non_negative(value, field)?;
    if value > max_amount() {
        return Err(ValidationError::AmountTooLarge(field));
    }
    Ok(())
}

/// An allocation may use up to, and including, the invoice's remaining balance.
pub fn check_allocation(
    amount: Decimal,
    remaining: Decimal,
    invoice_number: &str,
) -> Result<(), ValidationError> {
    check_amount(amount, "Amount")?;
    if amount > remaining {
        return Err(ValidationError::ExceedsRemainingBalance {
            invoice_number: invoice_number.to_string(),
            remaining,
        });
    }
    Ok(())
}

pub fn check_receipt_amount(amount: Decimal, max_allowed: Decimal) -> Result<(), ValidationError> {
    check_amount(amount, "Amount")?;
    if amount > max_allowed {
        return Err(ValidationError::ExceedsInvoiceBalance { max: max_allowed });
    }
    Ok(())
}

pub fn check_positive(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(())
}

pub fn check_required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}
