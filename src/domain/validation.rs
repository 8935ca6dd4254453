//! Per-step validation rules.
//!
//! Both functions are pure: they read the form and return every violated
//! field at once. Storing the result is the caller's job.

use std::sync::LazyLock;

use regex::Regex;

use super::models::{
    digits_only, is_known_bank, ErrorMap, Field, FormData, ACCOUNT_NUMBER_LEN, MIN_PHONE_DIGITS,
};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

pub fn validate_step1(data: &FormData) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if data.bank.is_empty() || !is_known_bank(&data.bank) {
        errors.insert(Field::Bank, "Please select a bank");
    }
    if data.account_number.is_empty() {
        errors.insert(Field::AccountNumber, "Account number is required");
    }
    // Runs unconditionally and replaces the "required" message.
    if data.account_number.len() != ACCOUNT_NUMBER_LEN {
        errors.insert(Field::AccountNumber, "Account number must be 10 digits");
    }
    if data.account_name.is_empty() {
        errors.insert(Field::AccountName, "Account name not found");
    }

    errors
}

pub fn validate_step2(data: &FormData) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if data.email.is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(&data.email) {
        errors.insert(Field::Email, "Invalid email format");
    }

    if data.phone_number.is_empty() {
        errors.insert(Field::PhoneNumber, "Phone number is required");
    } else if digits_only(&data.phone_number).len() < MIN_PHONE_DIGITS {
        errors.insert(Field::PhoneNumber, "Invalid phone number");
    }

    errors
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step1_data(bank: &str, account_number: &str, account_name: &str) -> FormData {
        FormData {
            bank: bank.to_string(),
            account_number: account_number.to_string(),
            account_name: account_name.to_string(),
            ..FormData::default()
        }
    }

    fn step2_data(email: &str, phone_number: &str) -> FormData {
        FormData {
            email: email.to_string(),
            phone_number: phone_number.to_string(),
            ..FormData::default()
        }
    }

    #[test]
    fn test_step1_empty_form_reports_every_field() {
        let errors = validate_step1(&step1_data("", "", ""));

        assert_eq!(errors.get(Field::Bank), Some("Please select a bank"));
        assert_eq!(errors.get(Field::AccountNumber), Some("Account number must be 10 digits"));
        assert_eq!(errors.get(Field::AccountName), Some("Account name not found"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_step1_short_account_number() {
        let errors = validate_step1(&step1_data("UBA", "12345", ""));

        assert!(!errors.contains(Field::Bank));
        assert_eq!(errors.get(Field::AccountNumber), Some("Account number must be 10 digits"));
        assert!(errors.contains(Field::AccountName));
    }

    #[test]
    fn test_step1_unknown_bank() {
        let errors = validate_step1(&step1_data("Monzo", "1234567890", "ODUTUGA GBEKE"));

        assert_eq!(errors.get(Field::Bank), Some("Please select a bank"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_step1_valid() {
        let errors = validate_step1(&step1_data("GTBank", "1234567890", "ODUTUGA GBEKE"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_step2_invalid_values() {
        let errors = validate_step2(&step2_data("bad", "123"));

        assert_eq!(errors.get(Field::Email), Some("Invalid email format"));
        assert_eq!(errors.get(Field::PhoneNumber), Some("Invalid phone number"));
    }

    #[test]
    fn test_step2_missing_values() {
        let errors = validate_step2(&step2_data("", ""));

        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert_eq!(errors.get(Field::PhoneNumber), Some("Phone number is required"));
    }

    #[test]
    fn test_step2_phone_counts_digits_only() {
        let errors = validate_step2(&step2_data("a@b.com", "080 - 123 - 4"));
        assert_eq!(errors.get(Field::PhoneNumber), Some("Invalid phone number"));

        let errors = validate_step2(&step2_data("a@b.com", "080 - 123 - 4567"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_step2_valid() {
        assert!(validate_step2(&step2_data("a@b.com", "08012345678")).is_empty());
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@mail.example.ng"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("plain"));
    }
}
