//! Interactive console layer: menus, per-field retry, and command handlers.

pub mod console;
pub mod handlers;
pub mod menu;
pub mod retry;

pub use console::{Console, LineConsole, ScriptedConsole, StdConsole};
pub use handlers::{HandlerError, HandlerResult};
pub use menu::{Menu, Repeat};
pub use retry::{FieldOutcome, FieldPrompt, FieldState, RetryPolicy, read_field};
