//! Per-field prompt/validate loop.
//!
//! Each field runs a small state machine:
//!
//! ```text
//! Prompting ──line──▶ Validating ──ok──────▶ Accepted
//!     ▲  │                 │
//!     │  └──EOF──▶ Cancelled ◀──cancel word──┘
//!     │                    │
//!     └──RetryInPlace── Rejected(empty | invalid) ──AbortOnFirstInvalid──▶ caller
//! ```
//!
//! `RetryInPlace` never gives up on its own: the loop ends only when the user
//! supplies a valid value, types a cancel word, or closes the input stream.

use std::io;

use verduleria_core::Rejection;

use crate::console::Console;

/// Printed whenever a field is cancelled.
pub const CANCELLED_MESSAGE: &str = "Operación cancelada. Volviendo al menú principal.";

/// What to do after an empty or invalid answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Report the rejection and hand it back to the caller.
    AbortOnFirstInvalid,
    /// Report the rejection and prompt for the same field again.
    RetryInPlace,
}

/// Prompt text and rejection messages for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldPrompt {
    pub prompt: &'static str,
    pub empty: &'static str,
    pub invalid: &'static str,
}

impl FieldPrompt {
    fn message_for(&self, rejection: Rejection) -> &'static str {
        match rejection {
            Rejection::Cancelled => CANCELLED_MESSAGE,
            Rejection::Empty => self.empty,
            Rejection::Invalid => self.invalid,
        }
    }
}

/// State of a single field read.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldState<T> {
    Prompting,
    Validating(String),
    Accepted(T),
    Cancelled,
    Rejected(Rejection),
}

/// Result of reading one field: the normalized value or why there is none.
pub type FieldOutcome<T> = Result<T, Rejection>;

/// Read one field from `console`, validating each answer with `validate`.
///
/// `Err(Rejection::Cancelled)` is returned after a cancel word or end of input.
/// Empty/invalid answers are only returned under
/// [`RetryPolicy::AbortOnFirstInvalid`].
pub fn read_field<T, C, V>(
    console: &mut C,
    field: &FieldPrompt,
    policy: RetryPolicy,
    validate: V,
) -> io::Result<FieldOutcome<T>>
where
    C: Console + ?Sized,
    V: Fn(&str) -> Result<T, Rejection>,
{
    let mut state = FieldState::Prompting;
    loop {
        state = match state {
            FieldState::Prompting => match console.prompt(field.prompt)? {
                Some(line) => FieldState::Validating(line),
                None => {
                    tracing::debug!(prompt = field.prompt, "end of input while prompting");
                    FieldState::Cancelled
                }
            },
            FieldState::Validating(raw) => match validate(&raw) {
                Ok(value) => FieldState::Accepted(value),
                Err(Rejection::Cancelled) => FieldState::Cancelled,
                Err(rejection) => FieldState::Rejected(rejection),
            },
            FieldState::Accepted(value) => return Ok(Ok(value)),
            FieldState::Cancelled => {
                console.say(CANCELLED_MESSAGE)?;
                return Ok(Err(Rejection::Cancelled));
            }
            FieldState::Rejected(rejection) => {
                console.say(field.message_for(rejection))?;
                match policy {
                    RetryPolicy::AbortOnFirstInvalid => return Ok(Err(rejection)),
                    RetryPolicy::RetryInPlace => FieldState::Prompting,
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use verduleria_core::{Stock, validate_stock};

    const STOCK: FieldPrompt = FieldPrompt {
        prompt: "Stock: ",
        empty: "vacío",
        invalid: "inválido",
    };

    fn stock(raw: &str) -> Result<Stock, Rejection> {
        validate_stock(raw, true)
    }

    #[test]
    fn accepts_first_valid_answer() {
        let mut console = ScriptedConsole::new(["12"]);
        let outcome = read_field(&mut console, &STOCK, RetryPolicy::RetryInPlace, stock).unwrap();

        assert_eq!(outcome, Ok(Stock::new(12)));
        assert_eq!(console.prompts().len(), 1);
        assert!(console.lines().is_empty());
    }

    #[test]
    fn retry_in_place_reprompts_until_valid() {
        let mut console = ScriptedConsole::new(["", "-5", "abc", "7"]);
        let outcome = read_field(&mut console, &STOCK, RetryPolicy::RetryInPlace, stock).unwrap();

        assert_eq!(outcome, Ok(Stock::new(7)));
        assert_eq!(console.prompts().len(), 4);
        assert_eq!(console.lines(), ["vacío", "inválido", "inválido"]);
    }

    #[test]
    fn abort_policy_returns_first_rejection() {
        let mut console = ScriptedConsole::new(["-5", "7"]);
        let outcome =
            read_field(&mut console, &STOCK, RetryPolicy::AbortOnFirstInvalid, stock).unwrap();

        assert_eq!(outcome, Err(Rejection::Invalid));
        assert_eq!(console.remaining(), 1);
        assert_eq!(console.lines(), ["inválido"]);
    }

    #[test]
    fn cancel_word_stops_under_either_policy() {
        for policy in [RetryPolicy::RetryInPlace, RetryPolicy::AbortOnFirstInvalid] {
            let mut console = ScriptedConsole::new(["Volver", "7"]);
            let outcome = read_field(&mut console, &STOCK, policy, stock).unwrap();

            assert_eq!(outcome, Err(Rejection::Cancelled));
            assert!(console.printed(CANCELLED_MESSAGE));
            assert_eq!(console.remaining(), 1);
        }
    }

    #[test]
    fn end_of_input_is_cancellation() {
        let mut console = ScriptedConsole::new(["x"]);
        let outcome = read_field(&mut console, &STOCK, RetryPolicy::RetryInPlace, stock).unwrap();
        assert_eq!(outcome, Err(Rejection::Cancelled));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: under RetryInPlace, any number of bad answers followed by a good one is accepted.
            #[test]
            fn retry_in_place_survives_any_number_of_bad_answers(
                bad in proptest::collection::vec("[a-z.,-]{0,6}", 0..10),
                good in any::<u32>()
            ) {
                let bad: Vec<String> = bad.into_iter().filter(|b| !verduleria_core::is_cancel_word(b)).collect();
                let mut answers = bad.clone();
                answers.push(good.to_string());

                let mut console = ScriptedConsole::new(answers);
                let outcome = read_field(&mut console, &STOCK, RetryPolicy::RetryInPlace, stock).unwrap();

                prop_assert_eq!(outcome, Ok(Stock::new(good)));
                prop_assert_eq!(console.prompts().len(), bad.len() + 1);
            }
        }
    }
}
