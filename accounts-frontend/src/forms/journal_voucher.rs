use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::input::{or_zero, parse_amount};
use super::validation::{check_positive, check_required, ValidationError};
use crate::models::{CreateJournalVoucher, JournalVoucher};

#[derive(Debug, Clone, PartialEq)]
pub struct JournalVoucherDraft {
    pub voucher_number: Option<String>,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Option<Decimal>,
    pub notes: Option<String>,
}

impl JournalVoucherDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            voucher_number: None,
            date: today,
            description: String::new(),
            amount: None,
            notes: None,
        }
    }

    pub fn from_voucher(voucher: &JournalVoucher) -> Self {
        Self {
            voucher_number: voucher.voucher_number.clone(),
            date: voucher.date,
            description: voucher.description.clone(),
            amount: Some(voucher.amount),
            notes: voucher.notes.clone(),
        }
    }

    pub fn set_amount(&mut self, raw: &str) {
        self.amount = parse_amount(raw);
    }

    pub fn to_record(&self) -> Result<CreateJournalVoucher, ValidationError> {
        check_required(&self.description, "Description")?;
        let amount = or_zero(self.amount);
        check_positive(amount)?;

        Ok(CreateJournalVoucher {
            voucher_number: self.voucher_number.clone().filter(|n| !n.trim().is_empty()),
            date: self.date,
            description: self.description.trim().to_string(),
            amount,
            notes: self.notes.clone().filter(|n| !n.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_description_and_amount() {
        let mut draft = JournalVoucherDraft::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(draft.to_record(), Err(ValidationError::Required("Description")));

        draft.description = "Depreciation for January".to_string();
        draft.set_amount("abc");
        assert_eq!(draft.to_record(), Err(ValidationError::NonPositiveAmount));

        draft.set_amount("1250.40");
        let record = draft.to_record().unwrap();
        assert_eq!(record.amount, "1250.40".parse::<Decimal>().unwrap());
        assert_eq!(record.voucher_number, None);
    }
}
