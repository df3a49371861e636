use rust_decimal::Decimal;

/// Parse a raw numeric field as typed by the user.
///
/// Blank or unparseable input yields `None`, the "unset" marker. Callers treat
/// unset as zero when computing, so it never leaks into a derived total.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

pub fn or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

/// Largest quantity, price or amount a form accepts: one trillion.
///
/// Keeps every product and sum of accepted inputs far inside `Decimal`'s range.
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000_000, 0)
}
