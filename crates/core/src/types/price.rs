//! Money values as returned by the Storefront API.
//!
//! Amounts are exact decimals (never floats). All totals are computed by
//! Shopify; this module only parses and formats them for display.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing money values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amount is not a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Currency code is not three ASCII uppercase letters.
    #[error("invalid currency code: {0}")]
    InvalidCurrencyCode(String),
}

/// ISO 4217 currency code (e.g., `USD`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and validate a currency code.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidCurrencyCode` unless the input is exactly
    /// three ASCII uppercase letters.
    pub fn parse(code: &str) -> Result<Self, MoneyError> {
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code.to_owned()))
        } else {
            Err(MoneyError::InvalidCurrencyCode(code.to_owned()))
        }
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display symbol used by en-US currency formatting, if the code has one.
    #[must_use]
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self.0.as_str() {
            "USD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            "CAD" => "CA$",
            "AUD" => "A$",
            "NZD" => "NZ$",
            "HKD" => "HK$",
            "MXN" => "MX$",
            "BRL" => "R$",
            "TWD" => "NT$",
            "CNY" => "CN¥",
            "INR" => "₹",
            "KRW" => "₩",
            "ILS" => "₪",
            "VND" => "₫",
            "PHP" => "₱",
            _ => return None,
        };
        Some(symbol)
    }

    /// Number of minor-unit digits shown when formatting.
    #[must_use]
    pub fn fraction_digits(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "XAF" | "XOF" | "PYG" => 0,
            "BHD" | "JOD" | "KWD" | "OMR" | "TND" => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// A monetary amount with its currency.
///
/// Serializes as `{"amount": "19.99", "currencyCode": "USD"}`, the same shape
/// Shopify's `MoneyV2` uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Exact decimal amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new money value.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Parse an amount string and currency code.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError` if either part is malformed.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, MoneyError> {
        let amount = Decimal::from_str(amount)
            .map_err(|_| MoneyError::InvalidAmount(amount.to_owned()))?;
        Ok(Self {
            amount,
            currency_code: CurrencyCode::parse(currency_code)?,
        })
    }

    /// Format for display using en-US currency conventions.
    ///
    /// `$1,234.50`, `€9.99`, `¥1,200`; codes without a known symbol are
    /// prefixed with the code and a non-breaking space (`CHF 10.00`).
    #[must_use]
    pub fn format(&self) -> String {
        let digits = self.currency_code.fraction_digits();
        let rounded = self
            .amount
            .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let plain = format!("{:.prec$}", rounded.abs(), prec = digits as usize);
        let number = match plain.split_once('.') {
            Some((int_part, frac_part)) => format!("{}.{frac_part}", group_thousands(int_part)),
            None => group_thousands(&plain),
        };

        match self.currency_code.symbol() {
            Some(symbol) => format!("{sign}{symbol}{number}"),
            None => format!("{sign}{}\u{a0}{number}", self.currency_code),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
