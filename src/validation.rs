//! Field rules shared by the record forms.
//!
//! These are plugged into `#[derive(Validate)]` through `custom = "..."`
//! attributes on the individual form types.

use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

lazy_static! {
    /// Batch numbers are uppercase letters and digits only.
    pub static ref BATCH_NUMBER_RE: Regex = Regex::new(r"^[A-Z0-9]+$").unwrap();
}

/// Rejects empty and whitespace-only text.
pub fn validate_required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required".into());
        Err(err)
    } else {
        Ok(())
    }
}

pub fn validate_batch_number(value: &str) -> Result<(), ValidationError> {
    if BATCH_NUMBER_RE.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("batch_number");
        err.message = Some("Batch number may only contain A-Z and 0-9".into());
        Err(err)
    }
}

pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Value cannot be negative".into());
        Err(err)
    } else {
        Ok(())
    }
}

pub fn validate_positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("positive");
        err.message = Some("Value must be greater than zero".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Rejects dates before today's local date.
pub fn validate_not_in_past(date: &NaiveDate) -> Result<(), ValidationError> {
    check_not_before(date, Local::now().date_naive())
}

/// Rejects `date` when it falls before `today`.
pub fn check_not_before(date: &NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if *date < today {
        let mut err = ValidationError::new("past_date");
        err.message = Some(format!("Date cannot be before {}", today).into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("GT001", true)]
    #[case("BT002", true)]
    #[case("42", true)]
    #[case("gt001", false)]
    #[case("GT-001", false)]
    #[case("GT 001", false)]
    #[case("", false)]
    fn batch_number_rule(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(validate_batch_number(input).is_ok(), valid, "input {:?}", input);
    }

    #[rstest]
    #[case("Green Tea", true)]
    #[case("  x ", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("\t\n", false)]
    fn required_text_rule(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(validate_required_text(input).is_ok(), valid);
    }

    #[test]
    fn decimal_rules() {
        assert!(validate_non_negative_decimal(&dec!(0)).is_ok());
        assert!(validate_non_negative_decimal(&dec!(12.50)).is_ok());
        assert!(validate_non_negative_decimal(&dec!(-0.01)).is_err());

        assert!(validate_positive_decimal(&dec!(0.01)).is_ok());
        assert!(validate_positive_decimal(&dec!(0)).is_err());
        assert!(validate_positive_decimal(&dec!(-5)).is_err());
    }

    #[test]
    fn dates_before_today_are_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert!(check_not_before(&today, today).is_ok());
        assert!(check_not_before(&today.succ_opt().unwrap(), today).is_ok());
        assert!(check_not_before(&today.pred_opt().unwrap(), today).is_err());
    }

    proptest! {
        #[test]
        fn uppercase_alphanumeric_batches_pass(batch in "[A-Z0-9]{1,16}") {
            prop_assert!(validate_batch_number(&batch).is_ok());
        }

        #[test]
        fn batches_with_other_characters_fail(
            prefix in "[A-Z0-9]{0,6}",
            bad in "[^A-Z0-9]",
            suffix in "[A-Z0-9]{0,6}",
        ) {
            let batch = format!("{}{}{}", prefix, bad, suffix);
            prop_assert!(validate_batch_number(&batch).is_err());
        }

        #[test]
        fn negative_decimals_fail(cents in i64::MIN / 2..-1i64) {
            let value = Decimal::new(cents, 2);
            prop_assert!(validate_non_negative_decimal(&value).is_err());
        }

        #[test]
        fn non_negative_decimals_pass(cents in 0i64..i64::MAX / 2) {
            let value = Decimal::new(cents, 2);
            prop_assert!(validate_non_negative_decimal(&value).is_ok());
        }
    }
}
