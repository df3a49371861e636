//! Allocation of one lump payment across a party's open invoices.

use std::future::Future;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::input::{or_zero, parse_amount};
use super::numbering::next_sequence_number;
use super::state::{FormState, LOAD_FAILED_MESSAGE, SUBMIT_FAILED_MESSAGE};
use super::totals::{applied_total, recompute_balance};
use super::validation::{check_allocation, ValidationError};
use crate::config::NumberingSettings;
use crate::models::{
    AppliedInvoiceAllocation, CreatePayment, Invoice, Party, PartyKind, Payment,
    PaymentDirection, PaymentMethod, PurchaseInvoice, Reference,
};
use crate::services::metrics::{record_rejection, SUBMISSIONS_TOTAL};
use crate::services::{BackendGateway, FormError, GatewayError};

const FORM: &str = "payment";

/// An invoice that payments can be applied against.
pub trait Settleable {
    fn id(&self) -> &str;

    fn number(&self) -> &str;

    fn party_id(&self) -> Option<&str>;

    fn total_amount(&self) -> Decimal;

    /// Sum of everything already applied to this invoice.
    fn applied_total(&self) -> Decimal;

    fn remaining_balance(&self) -> Decimal {
        recompute_balance(self.total_amount(), self.applied_total())
    }

    fn is_open(&self) -> bool {
        self.applied_total() < self.total_amount()
    }
}

impl Settleable for PurchaseInvoice {
    fn id(&self) -> &str {
        &self.id
    }

    fn number(&self) -> &str {
        &self.invoice_number
    }

    fn party_id(&self) -> Option<&str> {
        self.supplier.as_ref().map(Reference::id)
    }

    fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    fn applied_total(&self) -> Decimal {
        applied_total(&self.applied_payments)
    }
}

impl Settleable for Invoice {
    fn id(&self) -> &str {
        &self.id
    }

    fn number(&self) -> &str {
        &self.invoice_number
    }

    fn party_id(&self) -> Option<&str> {
        self.customer.as_ref().map(Reference::id)
    }

    fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Sales invoices paid at creation carry `amountPaid` without a matching
    /// applied-payment entry.
    fn applied_total(&self) -> Decimal {
        if self.applied_payments.is_empty() {
            self.amount_paid
        } else {
            applied_total(&self.applied_payments)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub invoice_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct PaymentApplicator<I> {
    party_kind: PartyKind,
    direction: PaymentDirection,
    payment_number: String,
    parties: Vec<Party>,
    invoices: Vec<I>,
    party: Option<String>,
    date: NaiveDate,
    method: PaymentMethod,
    notes: Option<String>,
    allocations: Vec<Allocation>,
    state: FormState,
}

impl<I: Settleable> PaymentApplicator<I> {
    pub fn new(party_kind: PartyKind, direction: PaymentDirection, date: NaiveDate) -> Self {
        Self {
            party_kind,
            direction,
            payment_number: String::new(),
            parties: Vec::new(),
            invoices: Vec::new(),
            party: None,
            date,
            method: PaymentMethod::default(),
            notes: None,
            allocations: Vec::new(),
            state: FormState::Empty,
        }
    }

    /// Install reference data and the previewed payment number.
    pub fn populate(&mut self, parties: Vec<Party>, invoices: Vec<I>, payment_number: String) {
        self.parties = parties;
        self.invoices = invoices;
        self.payment_number = payment_number;
        self.state.loaded();
    }

    /// Fetch parties, invoices and existing payments, all three or nothing.
    async fn load_from<F>(
        &mut self,
        fetch: F,
        numbering: &NumberingSettings,
    ) -> Result<(), GatewayError>
    where
        F: Future<Output = Result<(Vec<Party>, Vec<I>, Vec<Payment>), GatewayError>>,
    {
        self.state.begin_loading();

        match fetch.await {
            Ok((parties, invoices, payments)) => {
                let payment_number = next_sequence_number(
                    &numbering.payment_prefix,
                    numbering.payment_width,
                    payments.iter().map(|p| p.payment_number.as_str()),
                );
                tracing::debug!(
                    form = FORM,
                    parties = parties.len(),
                    invoices = invoices.len(),
                    payment_number = %payment_number,
                    "Payment form loaded"
                );
                self.populate(parties, invoices, payment_number);
                Ok(())
            }
            Err(err) => {
                self.state.fail(LOAD_FAILED_MESSAGE);
                Err(err)
            }
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn party_kind(&self) -> PartyKind {
        self.party_kind
    }

    pub fn direction(&self) -> PaymentDirection {
        self.direction
    }

    /// Advisory only; the backend assigns the stored number.
    pub fn payment_number(&self) -> &str {
        &self.payment_number
    }

    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    pub fn party(&self) -> Option<&str> {
        self.party.as_deref()
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Invoices of the selected party that still have something left to pay.
    pub fn open_invoices(&self) -> Vec<&I> {
        match &self.party {
            Some(party) => self
                .invoices
                .iter()
                .filter(|invoice| invoice.party_id() == Some(party.as_str()) && invoice.is_open())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn remaining_for(&self, invoice_id: &str) -> Option<Decimal> {
        self.find_invoice(invoice_id).map(Settleable::remaining_balance)
    }

    /// Switching party drops every allocation made for the previous one.
    pub fn select_party(&mut self, party_id: &str) -> Result<(), ValidationError> {
        if !self.parties.iter().any(|party| party.id == party_id) {
            return Err(self.reject(ValidationError::UnknownParty {
                kind: self.party_kind,
                id: party_id.to_string(),
            }));
        }

        if self.party.as_deref() != Some(party_id) {
            self.allocations.clear();
        }
        self.party = Some(party_id.to_string());
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

    /// Returns whether the invoice is allocated after the call. A newly
    /// allocated invoice takes its full remaining balance.
    pub fn toggle_invoice(&mut self, invoice_id: &str) -> Result<bool, ValidationError> {
        if let Some(position) = self.position(invoice_id) {
            self.allocations.remove(position);
            self.state.edited();
            return Ok(false);
        }

        if self.party.is_none() {
            return Err(self.reject(ValidationError::PartyNotSelected(self.party_kind)));
        }

        let remaining = self
            .open_invoices()
            .into_iter()
            .find(|invoice| invoice.id() == invoice_id)
            .map(Settleable::remaining_balance);
        let Some(remaining) = remaining else {
            return Err(self.reject(ValidationError::UnknownInvoice(invoice_id.to_string())));
        };

        self.allocations.push(Allocation {
            invoice_id: invoice_id.to_string(),
            amount: remaining,
        });
        self.state.edited();
        Ok(true)
    }

    /// Unset input allocates zero. Amounts above the invoice's remaining
    /// balance are rejected and the previous amount kept.
    pub fn set_allocation_amount(
        &mut self,
        invoice_id: &str,
        raw: &str,
    ) -> Result<(), ValidationError> {
        let limit = self
            .find_invoice(invoice_id)
            .map(|invoice| (invoice.remaining_balance(), invoice.number().to_string()));
        let (Some(position), Some((remaining, invoice_number))) = (self.position(invoice_id), limit)
        else {
            return Err(self.reject(ValidationError::UnknownInvoice(invoice_id.to_string())));
        };

        let amount = or_zero(parse_amount(raw));
        if let Err(err) = check_allocation(amount, remaining, &invoice_number) {
            return Err(self.reject(err));
        }

        self.allocations[position].amount = amount;
        self.state.edited();
        Ok(())
    }

    pub fn total_applied(&self) -> Decimal {
        self.allocations
            .iter()
            .fold(Decimal::ZERO, |sum, a| sum.saturating_add(a.amount))
    }

    /// The save-time checks, without touching form state.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.party.is_none() {
            return Err(ValidationError::PartyNotSelected(self.party_kind));
        }
        if self.allocations.is_empty() {
            return Err(ValidationError::NoAllocations);
        }
        if self.total_applied() <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveTotal);
        }

        for allocation in &self.allocations {
            let invoice = self
                .find_invoice(&allocation.invoice_id)
                .ok_or_else(|| ValidationError::UnknownInvoice(allocation.invoice_id.clone()))?;
            check_allocation(allocation.amount, invoice.remaining_balance(), invoice.number())?;
        }

        Ok(())
    }

    pub fn validate_for_save(&mut self) -> Result<(), ValidationError> {
        self.state.begin_validation();
        match self.validate() {
            Ok(()) => {
                self.state.validated();
                Ok(())
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Only available once [`Self::validate_for_save`] has passed and nothing
    /// was edited since.
    pub fn prepare_for_save(&self) -> Result<CreatePayment, ValidationError> {
        if !self.state.is_valid() {
            return Err(ValidationError::NotValidated);
        }
        let party = self
            .party
            .clone()
            .ok_or(ValidationError::PartyNotSelected(self.party_kind))?;

        Ok(CreatePayment {
            payment_number: self.payment_number.clone(),
            direction: self.direction,
            party,
            party_model: self.party_kind,
            date: self.date,
            amount: self.total_applied(),
            method: self.method,
            notes: self.notes.clone(),
            applied_invoices: self
                .allocations
                .iter()
                .map(|allocation| AppliedInvoiceAllocation {
                    invoice: Reference::from(allocation.invoice_id.as_str()),
                    amount: allocation.amount,
                })
                .collect(),
        })
    }

    /// Validate, prepare and create. On backend failure the draft is kept
    /// and the form shows a generic retry message.
    pub async fn submit<G>(&mut self, gateway: &G) -> Result<Payment, FormError>
    where
        G: BackendGateway + ?Sized,
    {
        self.validate_for_save()?;
        let payment = self.prepare_for_save()?;

        match gateway.create_payment(&payment).await {
            Ok(created) => {
                self.state.submitted();
                SUBMISSIONS_TOTAL.with_label_values(&[FORM]).inc();
                tracing::info!(
                    payment_id = %created.id,
                    payment_number = %created.payment_number,
                    party = %payment.party,
                    amount = %payment.amount,
                    allocations = payment.applied_invoices.len(),
                    "Payment created"
                );
                Ok(created)
            }
            Err(err) => {
                self.state.fail(SUBMIT_FAILED_MESSAGE);
                tracing::error!(error = %err, "Failed to create payment");
                Err(err.into())
            }
        }
    }

    fn position(&self, invoice_id: &str) -> Option<usize> {
        self.allocations
            .iter()
            .position(|allocation| allocation.invoice_id == invoice_id)
    }

    fn find_invoice(&self, invoice_id: &str) -> Option<&I> {
        self.invoices.iter().find(|invoice| invoice.id() == invoice_id)
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        record_rejection(FORM, err.kind());
        self.state.fail(err.to_string());
        err
    }
}

impl PaymentApplicator<PurchaseInvoice> {
    /// Outgoing payment to a supplier against purchase invoices.
    pub fn for_suppliers(date: NaiveDate) -> Self {
        Self::new(PartyKind::Supplier, PaymentDirection::Outgoing, date)
    }

    pub async fn load<G>(
        &mut self,
        gateway: &G,
        numbering: &NumberingSettings,
    ) -> Result<(), GatewayError>
    where
        G: BackendGateway + ?Sized,
    {
        let fetch = async {
            tokio::try_join!(
                gateway.list_suppliers(),
                gateway.list_purchase_invoices(),
                gateway.list_payments(),
            )
        };
        self.load_from(fetch, numbering).await
    }
}

impl PaymentApplicator<Invoice> {
    /// Incoming payment from a customer against sales invoices.
    pub fn for_customers(date: NaiveDate) -> Self {
        Self::new(PartyKind::Customer, PaymentDirection::Incoming, date)
    }

    pub async fn load<G>(
        &mut self,
        gateway: &G,
        numbering: &NumberingSettings,
    ) -> Result<(), GatewayError>
    where
        G: BackendGateway + ?Sized,
    {
        let fetch = async {
            tokio::try_join!(
                gateway.list_customers(),
                gateway.list_invoices(),
                gateway.list_payments(),
            )
        };
        self.load_from(fetch, numbering).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppliedPayment;

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    fn supplier(id: &str) -> Party {
        Party {
            id: id.to_string(),
            name: format!("Supplier {}", id),
            email: None,
            phone: None,
            address: None,
            contact_person: None,
        }
    }

    fn purchase_invoice(id: &str, supplier: &str, total: &str, paid: &[&str]) -> PurchaseInvoice {
        PurchaseInvoice {
            id: id.to_string(),
            invoice_number: format!("PI-{}", id),
            supplier: Some(Reference::from(supplier)),
            date: date(),
            items: Vec::new(),
            total_amount: dec(total),
            applied_payments: paid
                .iter()
                .map(|amount| AppliedPayment {
                    payment: None,
                    amount: dec(amount),
                })
                .collect(),
        }
    }

    fn applicator() -> PaymentApplicator<PurchaseInvoice> {
        let mut form = PaymentApplicator::for_suppliers(date());
        form.populate(
            vec![supplier("s1"), supplier("s2")],
            vec![
                purchase_invoice("A", "s1", "1000", &[]),
                purchase_invoice("B", "s1", "500", &["200"]),
                purchase_invoice("C", "s1", "300", &["300"]),
                purchase_invoice("D", "s2", "80", &[]),
            ],
            "PAY00004".to_string(),
        );
        form
    }

    #[test]
    fn two_invoices_settle_in_full() {
        let mut form = applicator();
        form.select_party("s1").unwrap();

        assert!(form.toggle_invoice("A").unwrap());
        assert!(form.toggle_invoice("B").unwrap());
        assert_eq!(form.allocations()[0].amount, dec("1000"));
        assert_eq!(form.allocations()[1].amount, dec("300"));
        assert_eq!(form.total_applied(), dec("1300"));

        form.validate_for_save().unwrap();
        assert_eq!(form.state(), &FormState::Valid);

        let payment = form.prepare_for_save().unwrap();
        assert_eq!(payment.amount, dec("1300"));
        assert_eq!(payment.direction, PaymentDirection::Outgoing);
        assert_eq!(payment.party_model, PartyKind::Supplier);
        assert_eq!(payment.applied_invoices.len(), 2);
        assert_eq!(payment.applied_invoices[1].invoice.id(), "B");
    }

    #[test]
    fn only_open_invoices_of_the_party_are_offered() {
        let mut form = applicator();
        assert!(form.open_invoices().is_empty());

        form.select_party("s1").unwrap();
        let ids: Vec<&str> = form.open_invoices().iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["A", "B"]);

        assert_eq!(
            form.toggle_invoice("C"),
            Err(ValidationError::UnknownInvoice("C".to_string()))
        );
        assert_eq!(
            form.toggle_invoice("D"),
            Err(ValidationError::UnknownInvoice("D".to_string()))
        );
    }

    #[test]
    fn allocation_boundary() {
        let mut form = applicator();
        form.select_party("s1").unwrap();
        form.toggle_invoice("B").unwrap();

        form.set_allocation_amount("B", "100").unwrap();
        form.set_allocation_amount("B", "300.00").unwrap();
        assert_eq!(form.allocations()[0].amount, dec("300"));

        let err = form.set_allocation_amount("B", "300.01").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Amount exceeds remaining balance for invoice PI-B"
        );
        assert_eq!(form.allocations()[0].amount, dec("300"));
        assert_eq!(
            form.state().error(),
            Some("Amount exceeds remaining balance for invoice PI-B")
        );
    }

    #[test]
    fn unset_allocation_counts_as_zero() {
        let mut form = applicator();
        form.select_party("s1").unwrap();
        form.toggle_invoice("A").unwrap();
        form.set_allocation_amount("A", "").unwrap();
        assert_eq!(form.total_applied(), Decimal::ZERO);

        assert_eq!(form.validate_for_save(), Err(ValidationError::NonPositiveTotal));
    }

    #[test]
    fn toggling_twice_removes_the_allocation() {
        let mut form = applicator();
        form.select_party("s1").unwrap();
        assert!(form.toggle_invoice("A").unwrap());
        assert!(!form.toggle_invoice("A").unwrap());
        assert!(form.allocations().is_empty());
    }

    #[test]
    fn switching_party_clears_allocations() {
        let mut form = applicator();
        form.select_party("s1").unwrap();
        form.toggle_invoice("A").unwrap();

        form.select_party("s2").unwrap();
        assert!(form.allocations().is_empty());
        assert_eq!(
            form.select_party("nobody"),
            Err(ValidationError::UnknownParty {
                kind: PartyKind::Supplier,
                id: "nobody".to_string()
            })
        );
        assert_eq!(form.party(), Some("s2"));
    }

    #[test]
    fn save_checks_run_in_order() {
        let mut form = applicator();
        assert_eq!(
            form.validate_for_save(),
            Err(ValidationError::PartyNotSelected(PartyKind::Supplier))
        );
        assert_eq!(form.state().error(), Some("Please select a supplier."));

        form.select_party("s1").unwrap();
        assert_eq!(form.state(), &FormState::Ready);
        assert_eq!(form.validate_for_save(), Err(ValidationError::NoAllocations));
    }

    #[test]
    fn save_rechecks_against_fresh_balances() {
        let mut form = applicator();
        form.select_party("s1").unwrap();
        form.toggle_invoice("B").unwrap();

        // Another payment landed on B after the form was loaded.
        let parties = form.parties().to_vec();
        form.populate(
            parties,
            vec![purchase_invoice("B", "s1", "500", &["200", "250"])],
            "PAY00005".to_string(),
        );

        assert_eq!(
            form.validate_for_save(),
            Err(ValidationError::ExceedsRemainingBalance {
                invoice_number: "PI-B".to_string(),
                remaining: dec("50"),
            })
        );
    }

    #[test]
    fn edit_after_validation_requires_revalidation() {
        let mut form = applicator();
        form.select_party("s1").unwrap();
        form.toggle_invoice("A").unwrap();
        form.validate_for_save().unwrap();

        form.set_method(PaymentMethod::Cheque);
        assert_eq!(form.prepare_for_save(), Err(ValidationError::NotValidated));

        form.validate_for_save().unwrap();
        assert_eq!(form.prepare_for_save().unwrap().method, PaymentMethod::Cheque);
    }

    #[test]
    fn customer_invoices_paid_at_creation_count_as_applied() {
        let invoice = Invoice {
            id: "i1".to_string(),
            invoice_number: "INV-0001".to_string(),
            customer: Some(Reference::from("c1")),
            date: date(),
            items: Vec::new(),
            total_amount: dec("400"),
            amount_paid: dec("150"),
            balance: dec("250"),
            status: None,
            applied_payments: Vec::new(),
        };
        assert_eq!(invoice.remaining_balance(), dec("250"));
        assert!(invoice.is_open());
    }
}
