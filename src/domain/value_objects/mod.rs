//! Value Objects for the storefront

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pseudo-anonymous visitor id scoping the favorites resource
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into().trim().to_string();
        if value.is_empty() { return Err(IdError::Empty); }
        if value.len() > 128 { return Err(IdError::TooLong); }
        if value.contains(['/', '?', '#']) { return Err(IdError::InvalidChar); }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Backend product identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into().trim().to_string();
        if value.is_empty() { return Err(IdError::Empty); }
        if value.contains(['/', '?', '#']) { return Err(IdError::InvalidChar); }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum IdError { Empty, TooLong, InvalidChar }
impl std::error::Error for IdError {}
impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "id empty"),
            Self::TooLong => write!(f, "id too long"),
            Self::InvalidChar => write!(f, "id contains a path separator"),
        }
    }
}

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn eur(amount: Decimal) -> Self { Self::new(amount, "EUR") }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn symbol(&self) -> &str {
        match self.currency.as_str() { "EUR" => "€", "USD" => "$", "GBP" => "£", other => other }
    }
}

impl Default for Money { fn default() -> Self { Self::zero("EUR") } }

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.symbol(), self.amount.round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_user_id() { assert_eq!(UserId::new(" user_abc_1 ").unwrap().as_str(), "user_abc_1"); }
    #[test]
    fn test_ids_reject_paths() {
        assert_eq!(UserId::new("a/b"), Err(IdError::InvalidChar));
        assert_eq!(ProductId::new("  "), Err(IdError::Empty));
    }
    #[test]
    fn test_money_display() {
        assert_eq!(Money::eur(Decimal::new(899, 2)).to_string(), "€8.99");
        assert_eq!(Money::eur(Decimal::new(24, 0)).to_string(), "€24.00");
        assert_eq!(Money::new(Decimal::new(5, 1), "CHF").to_string(), "CHF0.50");
    }
}
