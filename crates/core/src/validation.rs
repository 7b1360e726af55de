//! Field validator: raw console text → normalized value or a rejection.
//!
//! Every field shares the same precedence, checked in this order:
//!
//! 1. **cancelled**: the trimmed text is a cancel word (only when allowed)
//! 2. **empty**: nothing left after trimming
//! 3. **invalid**: the text fails the field's shape constraint
//!
//! so `"cancelar"` typed as a name is never stored as a literal name.

use thiserror::Error;

use crate::values::{FruitName, Price, ProductKind, ProductName, Stock};

/// Words that abort the current operation from any prompt.
pub const CANCEL_WORDS: [&str; 3] = ["cancelar", "volver", "salir"];

/// Returns `true` if `text` is a cancel word (trimmed, case-insensitive).
pub fn is_cancel_word(text: &str) -> bool {
    let folded = text.trim().to_lowercase();
    CANCEL_WORDS.contains(&folded.as_str())
}

/// Why a raw input was not accepted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    #[error("cancelled by user")]
    Cancelled,
    #[error("empty input")]
    Empty,
    #[error("invalid input")]
    Invalid,
}

/// Which field a raw input is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    FruitName,
    ProductName,
    ProductKind,
    Price,
    Stock,
}

/// A normalized, validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    FruitName(FruitName),
    ProductName(ProductName),
    ProductKind(ProductKind),
    Price(Price),
    Stock(Stock),
}

/// Validate `raw` for the given field.
pub fn validate_field(
    raw: &str,
    kind: FieldKind,
    allow_cancel: bool,
) -> Result<FieldValue, Rejection> {
    let result = match kind {
        FieldKind::FruitName => validate_fruit_name(raw, allow_cancel).map(FieldValue::FruitName),
        FieldKind::ProductName => {
            validate_product_name(raw, allow_cancel).map(FieldValue::ProductName)
        }
        FieldKind::ProductKind => validate_kind(raw, allow_cancel).map(FieldValue::ProductKind),
        FieldKind::Price => validate_price(raw, allow_cancel).map(FieldValue::Price),
        FieldKind::Stock => validate_stock(raw, allow_cancel).map(FieldValue::Stock),
    };

    if let Err(rejection) = &result {
        tracing::debug!(field = ?kind, ?rejection, "field input rejected");
    }
    result
}

/// Cancel and empty checks shared by every field. Returns the trimmed text.
fn screen(raw: &str, allow_cancel: bool) -> Result<&str, Rejection> {
    let trimmed = raw.trim();
    if allow_cancel && is_cancel_word(trimmed) {
        return Err(Rejection::Cancelled);
    }
    if trimmed.is_empty() {
        return Err(Rejection::Empty);
    }
    Ok(trimmed)
}

pub fn validate_fruit_name(raw: &str, allow_cancel: bool) -> Result<FruitName, Rejection> {
    let text = screen(raw, allow_cancel)?;
    FruitName::parse(text).map_err(|_| Rejection::Invalid)
}

pub fn validate_product_name(raw: &str, allow_cancel: bool) -> Result<ProductName, Rejection> {
    let text = screen(raw, allow_cancel)?;
    ProductName::parse(text).map_err(|_| Rejection::Invalid)
}

pub fn validate_kind(raw: &str, allow_cancel: bool) -> Result<ProductKind, Rejection> {
    let text = screen(raw, allow_cancel)?;
    text.parse().map_err(|_| Rejection::Invalid)
}

pub fn validate_price(raw: &str, allow_cancel: bool) -> Result<Price, Rejection> {
    let text = screen(raw, allow_cancel)?;
    text.parse().map_err(|_| Rejection::Invalid)
}

pub fn validate_stock(raw: &str, allow_cancel: bool) -> Result<Stock, Rejection> {
    let text = screen(raw, allow_cancel)?;
    text.parse().map_err(|_| Rejection::Invalid)
}
