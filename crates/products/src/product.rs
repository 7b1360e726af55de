use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use verduleria_core::{Entity, Price, ProductKind, ProductName, Stock};

/// Fields of a product that can change after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductField {
    #[serde(rename = "precio")]
    Price,
    Stock,
}

impl ProductField {
    /// Fields in the order the update sub-menu offers them.
    pub const ALL: [ProductField; 2] = [ProductField::Price, ProductField::Stock];

    /// Column name for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            ProductField::Price => "precio",
            ProductField::Stock => "stock",
        }
    }

    /// Capitalized label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            ProductField::Price => "Precio",
            ProductField::Stock => "Stock",
        }
    }
}

/// New value for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProductChange {
    Price(Price),
    Stock(Stock),
}

impl ProductChange {
    pub fn field(&self) -> ProductField {
        match self {
            ProductChange::Price(_) => ProductField::Price,
            ProductChange::Stock(_) => ProductField::Stock,
        }
    }
}

/// Displays the new value only.
impl core::fmt::Display for ProductChange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProductChange::Price(price) => write!(f, "{price}"),
            ProductChange::Stock(stock) => write!(f, "{stock}"),
        }
    }
}

/// Update: one field change plus when it happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub change: ProductChange,
    pub occurred_at: DateTime<Utc>,
}

impl ProductUpdate {
    pub fn new(change: ProductChange, occurred_at: DateTime<Utc>) -> Self {
        Self {
            change,
            occurred_at,
        }
    }

    pub fn now(change: ProductChange) -> Self {
        Self::new(change, Utc::now())
    }
}

/// Entity: a product in the inventory, keyed by its lower-cased name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    name: ProductName,
    kind: ProductKind,
    price: Price,
    stock: Stock,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: ProductName,
        kind: ProductKind,
        price: Price,
        stock: Stock,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            kind,
            price,
            stock,
            created_at,
            updated_at: created_at,
        }
    }

    /// Rebuild a product from stored columns (timestamps included).
    pub fn restore(
        name: ProductName,
        kind: ProductKind,
        price: Price,
        stock: Stock,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            kind,
            price,
            stock,
            created_at,
            updated_at,
        }
    }

    pub fn name(&self) -> &ProductName {
        &self.name
    }

    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn stock(&self) -> Stock {
        self.stock
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Product {
    type Update = ProductUpdate;

    fn key(&self) -> &str {
        self.name.as_str()
    }

    fn apply(&mut self, update: Self::Update) {
        match update.change {
            ProductChange::Price(price) => self.price = price,
            ProductChange::Stock(stock) => self.stock = stock,
        }
        self.updated_at = update.occurred_at;
    }
}
