//! Draft state for the line-item documents: sales invoices, purchase
//! invoices and sales returns.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::input::{or_zero, parse_amount};
use super::totals::{recompute_balance, recompute_totals};
use super::validation::{check_amount, check_required, ValidationError};
use crate::models::{
    CreateInvoice, CreatePurchaseInvoice, CreateSalesReturn, Invoice, InvoiceStatus, LineItem,
    PurchaseInvoice, PurchaseLine,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    SalesInvoice,
    PurchaseInvoice,
    SalesReturn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    Description,
    Quantity,
    /// `price` on sales documents, `cost` on purchase invoices.
    UnitPrice,
}

/// A line as edited. `None` means the field was cleared or unparseable.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftLine {
    pub description: String,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub total: Decimal,
}

impl DraftLine {
    fn blank() -> Self {
        Self {
            description: String::new(),
            quantity: Some(Decimal::ONE),
            unit_price: Some(Decimal::ZERO),
            total: Decimal::ZERO,
        }
    }

    fn to_line_item(&self) -> LineItem {
        LineItem {
            description: self.description.clone(),
            quantity: or_zero(self.quantity),
            unit_price: or_zero(self.unit_price),
            total: self.total,
        }
    }

    fn to_purchase_line(&self) -> PurchaseLine {
        PurchaseLine {
            description: self.description.clone(),
            quantity: or_zero(self.quantity),
            cost: or_zero(self.unit_price),
            total: self.total,
        }
    }
}

/// Totals as displayed while editing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePreview {
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_paid: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

#[derive(Debug, Clone)]
pub struct InvoiceBuilder {
    kind: DocumentKind,
    lines: Vec<DraftLine>,
    amount_paid: Option<Decimal>,
    total_amount: Decimal,
    balance: Decimal,
}

impl InvoiceBuilder {
    fn empty(kind: DocumentKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
            amount_paid: None,
            total_amount: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    pub fn new_sales_invoice() -> Self {
        Self::empty(DocumentKind::SalesInvoice)
    }

    /// Purchase invoices always carry at least one line.
    pub fn new_purchase_invoice() -> Self {
        let mut builder = Self::empty(DocumentKind::PurchaseInvoice);
        builder.lines.push(DraftLine::blank());
        builder
    }

    pub fn new_sales_return() -> Self {
        Self::empty(DocumentKind::SalesReturn)
    }

    /// Start from a stored sales invoice. Stored totals are discarded and
    /// recomputed from the lines.
    pub fn from_invoice(invoice: &Invoice) -> Result<Self, ValidationError> {
        let mut builder = Self::empty(DocumentKind::SalesInvoice);
        let lines = invoice
            .items
            .iter()
            .map(|item| DraftLine {
                description: item.description.clone(),
                quantity: Some(item.quantity),
                unit_price: Some(item.unit_price),
                total: Decimal::ZERO,
            })
            .collect();
        builder.commit(lines, Some(invoice.amount_paid))?;
        Ok(builder)
    }

    pub fn from_purchase_invoice(invoice: &PurchaseInvoice) -> Result<Self, ValidationError> {
        let mut builder = Self::empty(DocumentKind::PurchaseInvoice);
        let mut lines: Vec<DraftLine> = invoice
            .items
            .iter()
            .map(|item| DraftLine {
                description: item.description.clone(),
                quantity: Some(item.quantity),
                unit_price: Some(item.cost),
                total: Decimal::ZERO,
            })
            .collect();
        if lines.is_empty() {
            lines.push(DraftLine::blank());
        }
        builder.commit(lines, None)?;
        Ok(builder)
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn amount_paid(&self) -> Decimal {
        or_zero(self.amount_paid)
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Append a line with quantity 1 and unit price 0. It totals zero, so
    /// the document totals do not move.
    pub fn add_line(&mut self) {
        self.lines.push(DraftLine::blank());
    }

    /// Rejected edits leave the draft untouched.
    pub fn update_line(
        &mut self,
        index: usize,
        field: LineField,
        raw: &str,
    ) -> Result<(), ValidationError> {
        if index >= self.lines.len() {
            return Err(ValidationError::LineOutOfRange(index));
        }

        let mut lines = self.lines.clone();
        match field {
            LineField::Description => {
                lines[index].description = raw.to_string();
            }
            LineField::Quantity => {
                let quantity = parse_amount(raw);
                check_amount(or_zero(quantity), "Quantity")?;
                lines[index].quantity = quantity;
            }
            LineField::UnitPrice => {
                let unit_price = parse_amount(raw);
                check_amount(or_zero(unit_price), self.unit_price_label())?;
                lines[index].unit_price = unit_price;
            }
        }

        self.commit(lines, self.amount_paid)
    }

    pub fn remove_line(&mut self, index: usize) -> Result<(), ValidationError> {
        if index >= self.lines.len() {
            return Err(ValidationError::LineOutOfRange(index));
        }
        if self.kind == DocumentKind::PurchaseInvoice && self.lines.len() == 1 {
            return Err(ValidationError::LastLine);
        }

        let mut lines = self.lines.clone();
        lines.remove(index);
        self.commit(lines, self.amount_paid)
    }

    /// No upper bound: over-payment is passed through and the balance goes
    /// negative.
    pub fn set_amount_paid(&mut self, raw: &str) -> Result<(), ValidationError> {
        let amount_paid = parse_amount(raw);
        check_amount(or_zero(amount_paid), "Amount paid")?;
        self.commit(self.lines.clone(), amount_paid)
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        self.lines.iter().map(DraftLine::to_line_item).collect()
    }

    pub fn preview(&self) -> InvoicePreview {
        InvoicePreview {
            items: self.line_items(),
            total_amount: self.total_amount,
            amount_paid: self.amount_paid(),
            balance: self.balance,
        }
    }

    pub fn to_invoice(
        &self,
        invoice_number: &str,
        customer: &str,
        date: NaiveDate,
    ) -> Result<CreateInvoice, ValidationError> {
        check_required(customer, "Customer")?;
        let (items, total_amount, balance) = self.settled_lines()?;
        let amount_paid = self.amount_paid();

        Ok(CreateInvoice {
            invoice_number: invoice_number.to_string(),
            customer: customer.to_string(),
            date,
            items: items.iter().map(DraftLine::to_line_item).collect(),
            total_amount,
            amount_paid,
            balance,
            status: InvoiceStatus::from_amounts(total_amount, amount_paid),
        })
    }

    pub fn to_purchase_invoice(
        &self,
        invoice_number: &str,
        supplier: &str,
        date: NaiveDate,
    ) -> Result<CreatePurchaseInvoice, ValidationError> {
        check_required(supplier, "Supplier")?;
        let (items, total_amount, _) = self.settled_lines()?;

        Ok(CreatePurchaseInvoice {
            invoice_number: invoice_number.to_string(),
            supplier: supplier.to_string(),
            date,
            items: items.iter().map(DraftLine::to_purchase_line).collect(),
            total_amount,
        })
    }

    pub fn to_sales_return(
        &self,
        return_number: &str,
        customer: &str,
        date: NaiveDate,
    ) -> Result<CreateSalesReturn, ValidationError> {
        check_required(customer, "Customer")?;
        let (items, total_amount, _) = self.settled_lines()?;

        Ok(CreateSalesReturn {
            return_number: return_number.to_string(),
            customer: customer.to_string(),
            date,
            items: items.iter().map(DraftLine::to_line_item).collect(),
            total_amount,
        })
    }

    fn unit_price_label(&self) -> &'static str {
        match self.kind {
            DocumentKind::PurchaseInvoice => "Cost",
            DocumentKind::SalesInvoice | DocumentKind::SalesReturn => "Price",
        }
    }

    /// Lines and totals recomputed from the raw inputs, independent of the
    /// cached values.
    fn settled_lines(&self) -> Result<(Vec<DraftLine>, Decimal, Decimal), ValidationError> {
        settle(self.lines.clone(), self.amount_paid())
    }

    /// Recompute totals for the candidate inputs and keep them only if every
    /// total fits.
    fn commit(
        &mut self,
        lines: Vec<DraftLine>,
        amount_paid: Option<Decimal>,
    ) -> Result<(), ValidationError> {
        let (lines, total_amount, balance) = settle(lines, or_zero(amount_paid))?;
        self.lines = lines;
        self.amount_paid = amount_paid;
        self.total_amount = total_amount;
        self.balance = balance;
        Ok(())
    }
}

fn settle(
    mut lines: Vec<DraftLine>,
    amount_paid: Decimal,
) -> Result<(Vec<DraftLine>, Decimal, Decimal), ValidationError> {
    let totals = recompute_totals(lines.iter().map(|l| (l.quantity, l.unit_price)))?;
    for (line, total) in lines.iter_mut().zip(totals.line_totals) {
        line.total = total;
    }
    let balance = recompute_balance(totals.total_amount, amount_paid);
    Ok((lines, totals.total_amount, balance))
}
