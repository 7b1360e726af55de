use serde::{Deserialize, Serialize};

use verduleria_core::{Entity, FruitName};

/// Fruits have no updatable sub-fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FruitUpdate {}

/// Entity: a fruit in the list, identified by its normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fruit {
    name: FruitName,
}

impl Fruit {
    pub fn new(name: FruitName) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &FruitName {
        &self.name
    }
}

impl Entity for Fruit {
    type Update = FruitUpdate;

    fn key(&self) -> &str {
        self.name.as_str()
    }

    fn apply(&mut self, update: Self::Update) {
        match update {}
    }
}

impl core::fmt::Display for Fruit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.name, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_the_normalized_name() {
        let fruit = Fruit::new(FruitName::parse("  fruta del dragón ").unwrap());
        assert_eq!(fruit.key(), "Fruta Del Dragón");
        assert_eq!(fruit.to_string(), "Fruta Del Dragón");
    }

    #[test]
    fn fruits_with_the_same_name_are_equal() {
        let a = Fruit::new(FruitName::parse("pera").unwrap());
        let b = Fruit::new(FruitName::parse("PERA").unwrap());
        assert_eq!(a, b);
    }
}
