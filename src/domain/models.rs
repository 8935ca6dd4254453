use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const ACCOUNT_NUMBER_LEN: usize = 10;
pub const MIN_PHONE_DIGITS: usize = 10;
/// Digits that fit the `000 - 000 - 00000` display mask.
pub const MAX_PHONE_DIGITS: usize = 11;
pub const DEFAULT_COUNTRY_CODE: &str = "+234";

pub const BANKS: &[&str] = &[
    "Access Bank",
    "GTBank",
    "First Bank",
    "Zenith Bank",
    "UBA",
    "Wema Bank",
    "Kuda Bank",
    "Sterling Bank",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryCode {
    pub code: &'static str,
    pub country: &'static str,
}

pub const COUNTRY_CODES: &[CountryCode] = &[
    CountryCode { code: "+234", country: "Nigeria" },
    CountryCode { code: "+1", country: "United States" },
    CountryCode { code: "+44", country: "United Kingdom" },
    CountryCode { code: "+91", country: "India" },
    CountryCode { code: "+86", country: "China" },
];

/// Everything collected about the recipient across both steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub bank: String,
    pub account_number: String,
    pub account_name: String,
    pub email: String,
    pub country_code: String,
    pub phone_number: String,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            bank: String::new(),
            account_number: String::new(),
            account_name: String::new(),
            email: String::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            phone_number: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Bank,
    AccountNumber,
    AccountName,
    Email,
    CountryCode,
    PhoneNumber,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Bank => "Bank",
            Field::AccountNumber => "Account number",
            Field::AccountName => "Account name",
            Field::Email => "Recipient email",
            Field::CountryCode => "Country code",
            Field::PhoneNumber => "Recipient phone number",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    One,
    Two,
}

impl Step {
    pub fn number(&self) -> u8 {
        match self {
            Step::One => 1,
            Step::Two => 2,
        }
    }
}

/// Per-field validation messages. A field with no entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: BTreeMap<Field, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn clear_field(&mut self, field: Field) {
        self.entries.remove(&field);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.entries.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

pub fn is_known_bank(bank: &str) -> bool {
    BANKS.contains(&bank)
}

pub fn find_country_code(code: &str) -> Option<&'static CountryCode> {
    COUNTRY_CODES.iter().find(|c| c.code == code)
}

pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strips non-digits and keeps at most the first ten.
pub fn normalize_account_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(ACCOUNT_NUMBER_LEN)
        .collect()
}

pub fn normalize_phone_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(MAX_PHONE_DIGITS)
        .collect()
}

/// Groups a digit string as `ddd - ddd - ddddd`, dropping empty groups.
pub fn format_phone_number(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() > MAX_PHONE_DIGITS {
        return value.to_string();
    }
    let (first, rest) = digits.split_at(digits.len().min(3));
    let (second, third) = rest.split_at(rest.len().min(3));
    [first, second, third]
        .iter()
        .filter(|group| !group.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" - ")
}
