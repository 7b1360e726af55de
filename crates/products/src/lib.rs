//! Products domain module.
//!
//! This crate contains the inventory record and its field-level updates,
//! implemented purely as deterministic domain logic (no IO, no console, no storage).

pub mod product;

pub use product::{Product, ProductChange, ProductField, ProductUpdate};
