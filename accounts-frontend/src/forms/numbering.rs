//! Client-side previews of the next document number.
//!
//! The result is advisory only. Two clients can compute the same number
//! concurrently; the backend assigns the authoritative one on create.

/// `prefix` followed by one more than the largest numeric suffix among
/// `existing`, zero-padded to `width`. Numbers with a different prefix, a
/// non-numeric suffix or a suffix with no successor in `u64` are ignored.
pub fn next_sequence_number<'a, I>(prefix: &str, width: usize, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let next = existing
        .into_iter()
        .filter_map(|number| number.strip_prefix(prefix))
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|suffix| suffix.parse::<u64>().ok()?.checked_add(1))
        .max()
        .unwrap_or(1);

    format!("{}{:0width$}", prefix, next, width = width)
}

pub const PAYMENT_PREFIX: &str = "PAY";
pub const PAYMENT_WIDTH: usize = 5;

pub fn next_payment_number<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    next_sequence_number(PAYMENT_PREFIX, PAYMENT_WIDTH, existing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_the_highest_suffix() {
        assert_eq!(next_payment_number(["PAY00003", "PAY00007"]), "PAY00008");
        assert_eq!(next_payment_number(["PAY00007", "PAY00003"]), "PAY00008");
    }

    #[test]
    fn starts_at_one() {
        assert_eq!(next_payment_number(Vec::<&str>::new()), "PAY00001");
    }

    #[test]
    fn ignores_foreign_numbers() {
        assert_eq!(
            next_payment_number(["RCPT-0042", "PAYxx", "PAY", "PAY00002"]),
            "PAY00003"
        );
    }

    #[test]
    fn skips_suffixes_without_a_successor() {
        assert_eq!(
            next_payment_number(["PAY18446744073709551615", "PAY00004"]),
            "PAY00005"
        );
        assert_eq!(
            next_payment_number(["PAY18446744073709551615"]),
            "PAY00001"
        );
        assert_eq!(
            next_payment_number(["PAY99999999999999999999999"]),
            "PAY00001"
        );
    }

    #[test]
    fn grows_past_the_padding() {
        assert_eq!(next_sequence_number("JV", 2, ["JV99"]), "JV100");
    }
}
