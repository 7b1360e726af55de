//! `verduleria-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no console, no storage):
//! value objects, the field validator and the status vocabulary shared by every
//! command handler.

pub mod entity;
pub mod error;
pub mod status;
pub mod validation;
pub mod value_object;
pub mod values;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use status::{Outcome, Status};
pub use validation::{
    CANCEL_WORDS, FieldKind, FieldValue, Rejection, is_cancel_word, validate_field,
    validate_fruit_name, validate_kind, validate_price, validate_product_name, validate_stock,
};
pub use value_object::ValueObject;
pub use values::{FruitName, Price, ProductKind, ProductName, Stock};
