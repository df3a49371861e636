//! Derived amounts. Recomputed from scratch after every mutation.

use rust_decimal::Decimal;

use super::input::or_zero;
use super::validation::ValidationError;
use crate::models::AppliedPayment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub line_totals: Vec<Decimal>,
    pub total_amount: Decimal,
}

/// `None` when the product does not fit in a `Decimal`.
pub fn line_total(quantity: Option<Decimal>, unit_price: Option<Decimal>) -> Option<Decimal> {
    or_zero(quantity).checked_mul(or_zero(unit_price))
}

/// Compute each line's total and their sum from `(quantity, unit_price)` pairs.
pub fn recompute_totals<I>(lines: I) -> Result<Totals, ValidationError>
where
    I: IntoIterator<Item = (Option<Decimal>, Option<Decimal>)>,
{
    let mut line_totals = Vec::new();
    let mut total_amount = Decimal::ZERO;

    for (quantity, unit_price) in lines {
        let total =
            line_total(quantity, unit_price).ok_or(ValidationError::AmountTooLarge("Line total"))?;
        total_amount = total_amount
            .checked_add(total)
            .ok_or(ValidationError::AmountTooLarge("Total"))?;
        line_totals.push(total);
    }

    Ok(Totals {
        line_totals,
        total_amount,
    })
}

/// May go negative when more was paid than invoiced. Saturates on
/// out-of-range stored amounts.
pub fn recompute_balance(total_amount: Decimal, paid: Decimal) -> Decimal {
    total_amount.saturating_sub(paid)
}

pub fn applied_total(applied: &[AppliedPayment]) -> Decimal {
    applied
        .iter()
        .fold(Decimal::ZERO, |sum, payment| sum.saturating_add(payment.amount))
}

pub fn remaining_balance(total_amount: Decimal, applied: &[AppliedPayment]) -> Decimal {
    recompute_balance(total_amount, applied_total(applied))
}
