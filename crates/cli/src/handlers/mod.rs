//! Command handlers: add / show / update / delete.
//!
//! Handlers collect fields through [`read_field`](crate::retry::read_field),
//! then call the injected store. Expected outcomes (cancelled, duplicate, not
//! found, ...) come back as an [`Outcome`]; only a backend failure or broken
//! console is an `Err`.

pub mod fruits;
pub mod products;

use std::io;

use thiserror::Error;

use verduleria_core::Outcome;
use verduleria_infra::StoreError;

use crate::console::Console;

/// Failure that aborts a command without changing the collection.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("console I/O failure: {0}")]
    Io(#[from] io::Error),
}

pub type HandlerResult = Result<Outcome, HandlerError>;

pub(crate) const DELETE_REFUSED_MESSAGE: &str = "Operación cancelada.";

/// Ask a yes/no question. Only `s` (any case, surrounding spaces ignored) is yes.
pub(crate) fn confirm<C: Console + ?Sized>(console: &mut C, question: &str) -> io::Result<bool> {
    let answer = console.prompt(question)?;
    Ok(answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("s")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    #[test]
    fn only_s_confirms() {
        for (answer, expected) in [("s", true), (" S ", true), ("si", false), ("n", false), ("", false)] {
            let mut console = ScriptedConsole::new([answer]);
            assert_eq!(confirm(&mut console, "(s/n): ").unwrap(), expected, "{answer:?}");
        }
    }

    #[test]
    fn end_of_input_does_not_confirm() {
        let mut console = ScriptedConsole::default();
        assert!(!confirm(&mut console, "(s/n): ").unwrap());
    }
}
