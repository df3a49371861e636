//! Post-dated cheques: the entry form and the status actions.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::input::{or_zero, parse_amount};
use super::validation::{check_positive, check_required, ValidationError};
use crate::models::{CreatePdc, Pdc, PdcStatus};
use crate::services::metrics::record_rejection;
use crate::services::{BackendGateway, FormError};

const FORM: &str = "pdc";

#[derive(Debug, Clone, PartialEq)]
pub struct PdcDraft {
    pub cheque_number: String,
    pub party: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Option<Decimal>,
    pub bank_account: Option<String>,
}

impl PdcDraft {
    /// A blank cheque issued and due on `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            cheque_number: String::new(),
            party: String::new(),
            issue_date: today,
            due_date: today,
            amount: None,
            bank_account: None,
        }
    }

    pub fn from_pdc(pdc: &Pdc) -> Self {
        Self {
            cheque_number: pdc.cheque_number.clone(),
            party: pdc.party.id().to_string(),
            issue_date: pdc.issue_date,
            due_date: pdc.due_date,
            amount: Some(pdc.amount),
            bank_account: pdc.bank_account.clone(),
        }
    }

    pub fn set_amount(&mut self, raw: &str) {
        self.amount = parse_amount(raw);
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_required(&self.cheque_number, "Cheque number")?;
        check_required(&self.party, "Party")?;
        check_positive(or_zero(self.amount))?;
        if self.due_date < self.issue_date {
            return Err(ValidationError::DueBeforeIssue);
        }
        Ok(())
    }

    /// New cheques always start in the `New` state.
    pub fn to_record(&self) -> Result<CreatePdc, ValidationError> {
        self.validate().inspect_err(|err| record_rejection(FORM, err.kind()))?;

        Ok(CreatePdc {
            cheque_number: self.cheque_number.trim().to_string(),
            party: self.party.clone(),
            issue_date: self.issue_date,
            due_date: self.due_date,
            amount: or_zero(self.amount),
            bank_account: self.bank_account.clone().filter(|b| !b.trim().is_empty()),
            status: PdcStatus::New,
        })
    }
}

/// Refuse a transition the cheque's current status does not allow.
pub fn check_transition(pdc: &Pdc, to: PdcStatus) -> Result<(), ValidationError> {
    if pdc.status.can_transition(to) {
        Ok(())
    } else {
        Err(ValidationError::ChequeSettled(pdc.status))
    }
}

/// Mark a cheque as realised. Settled cheques are refused without a
/// backend call.
pub async fn mark_realised<G>(gateway: &G, pdc: &Pdc) -> Result<Pdc, FormError>
where
    G: BackendGateway + ?Sized,
{
    check_transition(pdc, PdcStatus::Realised)
        .inspect_err(|err| record_rejection(FORM, err.kind()))?;
    Ok(gateway.mark_pdc_realised(&pdc.id).await?)
}

/// Mark a cheque as bounced. Settled cheques are refused without a
/// backend call.
pub async fn mark_bounced<G>(gateway: &G, pdc: &Pdc) -> Result<Pdc, FormError>
where
    G: BackendGateway + ?Sized,
{
    check_transition(pdc, PdcStatus::Bounced)
        .inspect_err(|err| record_rejection(FORM, err.kind()))?;
    Ok(gateway.mark_pdc_bounced(&pdc.id).await?)
}
