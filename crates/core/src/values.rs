//! Value objects shared by the fruit list and the product inventory.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Letters accepted in names besides ASCII `A-Z`/`a-z`.
const ACCENTED_LETTERS: &str = "ÁÉÍÓÚáéíóúÑñ";

/// Returns `true` if `c` may appear in a fruit or product name.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ' ' || ACCENTED_LETTERS.contains(c)
}

fn check_name(normalized: &str) -> DomainResult<()> {
    if normalized.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if !normalized.chars().all(is_name_char) {
        return Err(DomainError::validation(
            "name must contain only letters and spaces",
        ));
    }
    Ok(())
}

/// Title-case `s`: the first letter of every word upper-cased, the rest lower-cased.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Display name of a fruit, title-cased (`"fruta del dragón"` → `"Fruta Del Dragón"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FruitName(String);

impl FruitName {
    /// Normalize (trim + title-case) and check the allowed alphabet.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized = title_case(raw.trim());
        check_name(&normalized)?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for FruitName {}

impl core::fmt::Display for FruitName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product key, lower-cased (`"Manzana"` → `"manzana"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductName(String);

impl ProductName {
    /// Normalize (trim + lowercase) and check the allowed alphabet.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized = raw.trim().to_lowercase();
        check_name(&normalized)?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ProductName {}

impl core::fmt::Display for ProductName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductKind {
    #[serde(rename = "fruta")]
    Fruit,
    #[serde(rename = "verdura")]
    Vegetable,
}

impl ProductKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductKind::Fruit => "fruta",
            ProductKind::Vegetable => "verdura",
        }
    }
}

impl ValueObject for ProductKind {}

impl FromStr for ProductKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fruta" => Ok(ProductKind::Fruit),
            "verdura" => Ok(ProductKind::Vegetable),
            other => Err(DomainError::validation(format!(
                "product kind must be 'fruta' or 'verdura', got '{other}'"
            ))),
        }
    }
}

impl core::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit price. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if value <= 0.0 {
            return Err(DomainError::validation("price must be greater than zero"));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl ValueObject for Price {}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::validation(format!("'{s}' is not a number")))?;
        Self::new(value)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Whole prices keep one decimal so `100` renders as `100.0`.
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Units in stock. Non-negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stock(u32);

impl Stock {
    pub const fn new(units: u32) -> Self {
        Self(units)
    }

    pub fn units(self) -> u32 {
        self.0
    }
}

impl ValueObject for Stock {}

impl FromStr for Stock {
    type Err = DomainError;

    /// Digits only: signs and decimal points are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(
                "stock must be a non-negative whole number",
            ));
        }
        s.parse::<u32>()
            .map(Self)
            .map_err(|e| DomainError::validation(format!("stock out of range: {e}")))
    }
}

impl TryFrom<i64> for Stock {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| DomainError::invariant(format!("stock {value} out of range")))
    }
}

impl core::fmt::Display for Stock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_capitalizes_every_word() {
        assert_eq!(title_case("fruta del dragón"), "Fruta Del Dragón");
        assert_eq!(title_case("MANZANA"), "Manzana");
        assert_eq!(title_case("ñandú"), "Ñandú");
    }

    #[test]
    fn fruit_name_is_trimmed_and_title_cased() {
        let name = FruitName::parse("  pera  ").unwrap();
        assert_eq!(name.as_str(), "Pera");
    }

    #[test]
    fn product_name_is_lowercased() {
        let name = ProductName::parse("Limón").unwrap();
        assert_eq!(name.as_str(), "limón");
    }

    #[test]
    fn names_reject_digits_and_punctuation() {
        assert!(ProductName::parse("manzana1").is_err());
        assert!(ProductName::parse("manzana!").is_err());
        assert!(FruitName::parse("uva-verde").is_err());
        assert!(FruitName::parse("   ").is_err());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("FRUTA".parse::<ProductKind>().unwrap(), ProductKind::Fruit);
        assert_eq!(" verdura ".parse::<ProductKind>().unwrap(), ProductKind::Vegetable);
        assert!("hortaliza".parse::<ProductKind>().is_err());
    }

    #[test]
    fn price_must_be_positive_and_finite() {
        assert!(Price::new(0.0).is_err());
        assert!(Price::new(-1.5).is_err());
        assert!(Price::new(f64::NAN).is_err());
        assert!("inf".parse::<Price>().is_err());
        assert_eq!("100.5".parse::<Price>().unwrap().value(), 100.5);
    }

    #[test]
    fn price_display_keeps_one_decimal_for_whole_values() {
        assert_eq!(Price::new(100.0).unwrap().to_string(), "100.0");
        assert_eq!(Price::new(2.75).unwrap().to_string(), "2.75");
    }

    #[test]
    fn stock_rejects_signs_and_decimals() {
        assert!("-5".parse::<Stock>().is_err());
        assert!("+5".parse::<Stock>().is_err());
        assert!("5.0".parse::<Stock>().is_err());
        assert_eq!("0".parse::<Stock>().unwrap(), Stock::new(0));
        assert_eq!("50".parse::<Stock>().unwrap(), Stock::new(50));
    }

    #[test]
    fn stock_from_negative_row_value_is_rejected() {
        assert!(Stock::try_from(-1_i64).is_err());
        assert_eq!(Stock::try_from(7_i64).unwrap(), Stock::new(7));
    }

    #[test]
    fn kind_serializes_as_spanish_token() {
        let json = serde_json::to_string(&ProductKind::Vegetable).unwrap();
        assert_eq!(json, "\"verdura\"");
    }
}
