//! Fruit list domain module.
//!
//! A fruit is nothing but its title-cased name; the list keeps names unique.

pub mod fruit;

pub use fruit::{Fruit, FruitUpdate};
