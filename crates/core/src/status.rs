//! Status vocabulary returned by every command handler.

use serde::{Deserialize, Serialize};

use crate::validation::Rejection;

/// Outcome token of a command handler.
///
/// The menu loop uses it to decide whether to re-run the same command or go
/// back to the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "ok")]
    Ok,
    /// User-initiated abort. Not an error.
    #[serde(rename = "cancelado")]
    Cancelled,
    #[serde(rename = "vacio")]
    Empty,
    #[serde(rename = "invalido")]
    Invalid,
    #[serde(rename = "duplicado")]
    Duplicate,
    #[serde(rename = "no_encontrado")]
    NotFound,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Cancelled => "cancelado",
            Status::Empty => "vacio",
            Status::Invalid => "invalido",
            Status::Duplicate => "duplicado",
            Status::NotFound => "no_encontrado",
        }
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Rejection> for Status {
    fn from(value: Rejection) -> Self {
        match value {
            Rejection::Cancelled => Status::Cancelled,
            Rejection::Empty => Status::Empty,
            Rejection::Invalid => Status::Invalid,
        }
    }
}

/// Status token plus the key the command acted on, when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub status: Status,
    pub key: Option<String>,
}

impl Outcome {
    pub fn new(status: Status) -> Self {
        Self { status, key: None }
    }

    pub fn with_key(status: Status, key: impl Into<String>) -> Self {
        Self {
            status,
            key: Some(key.into()),
        }
    }

    pub fn ok(key: impl Into<String>) -> Self {
        Self::with_key(Status::Ok, key)
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl From<Rejection> for Outcome {
    fn from(value: Rejection) -> Self {
        Self::new(value.into())
    }
}
