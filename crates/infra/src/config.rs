//! Storage selection from the environment.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `USE_DATABASE` | `true` selects Postgres; anything else (or unset) keeps the in-memory store |
//! | `DATABASE_URL` | Postgres connection string, required when `USE_DATABASE=true` |

use thiserror::Error;

pub const USE_DATABASE_VAR: &str = "USE_DATABASE";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set when USE_DATABASE=true")]
    MissingDatabaseUrl,
}

/// Which backend the program stores entities in.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageMode {
    InMemory,
    Postgres { url: String },
}

impl core::fmt::Debug for StorageMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageMode::InMemory => f.write_str("InMemory"),
            // Keep credentials out of logs.
            StorageMode::Postgres { .. } => f.write_str("Postgres"),
        }
    }
}

impl StorageMode {
    /// Read the storage mode from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the storage mode through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let use_database = match lookup(USE_DATABASE_VAR) {
            None => false,
            Some(raw) => raw.trim().to_lowercase().parse::<bool>().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    "{USE_DATABASE_VAR} is not a boolean, falling back to in-memory storage"
                );
                false
            }),
        };

        if !use_database {
            return Ok(StorageMode::InMemory);
        }

        match lookup(DATABASE_URL_VAR) {
            Some(url) if !url.trim().is_empty() => Ok(StorageMode::Postgres {
                url: url.trim().to_string(),
            }),
            _ => Err(ConfigError::MissingDatabaseUrl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(vars: &[(&str, &str)]) -> Result<StorageMode, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorageMode::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn unset_defaults_to_in_memory() {
        assert_eq!(resolve(&[]), Ok(StorageMode::InMemory));
    }

    #[test]
    fn false_keeps_in_memory_even_with_url() {
        let mode = resolve(&[("USE_DATABASE", "false"), ("DATABASE_URL", "postgres://x")]);
        assert_eq!(mode, Ok(StorageMode::InMemory));
    }

    #[test]
    fn true_with_url_selects_postgres() {
        let mode = resolve(&[("USE_DATABASE", "TRUE"), ("DATABASE_URL", " postgres://db/verduleria ")]);
        assert_eq!(
            mode,
            Ok(StorageMode::Postgres {
                url: "postgres://db/verduleria".to_string()
            })
        );
    }

    #[test]
    fn true_without_url_is_a_config_error() {
        assert_eq!(
            resolve(&[("USE_DATABASE", "true")]),
            Err(ConfigError::MissingDatabaseUrl)
        );
        assert_eq!(
            resolve(&[("USE_DATABASE", "true"), ("DATABASE_URL", "  ")]),
            Err(ConfigError::MissingDatabaseUrl)
        );
    }

    #[test]
    fn unparsable_flag_falls_back_to_in_memory() {
        assert_eq!(resolve(&[("USE_DATABASE", "sí")]), Ok(StorageMode::InMemory));
    }

    #[test]
    fn debug_output_hides_the_url() {
        let mode = StorageMode::Postgres {
            url: "postgres://user:secret@db".to_string(),
        };
        assert!(!format!("{mode:?}").contains("secret"));
    }
}
