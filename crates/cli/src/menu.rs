//! Numbered main menu.
//!
//! The menu owns no data: each entry is a closure over the injected store. The
//! last option is always "Salir".

use verduleria_core::Status;
use verduleria_fruits::Fruit;
use verduleria_infra::EntityStore;
use verduleria_products::Product;

use crate::console::Console;
use crate::handlers::{HandlerError, HandlerResult, fruits, products};

pub const EXIT_MESSAGE: &str = "Saliendo del programa...";

/// When a command is run again without going back to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Run once.
    Once,
    /// Re-run until `ok` or `cancelado`.
    UntilOkOrCancelled,
    /// Re-run until `ok`, `cancelado` or `no_encontrado`.
    UntilSettled,
}

impl Repeat {
    fn is_done(self, status: Status) -> bool {
        match self {
            Repeat::Once => true,
            Repeat::UntilOkOrCancelled => matches!(status, Status::Ok | Status::Cancelled),
            Repeat::UntilSettled => {
                matches!(status, Status::Ok | Status::Cancelled | Status::NotFound)
            }
        }
    }
}

type Action<'a> = Box<dyn FnMut(&mut dyn Console) -> HandlerResult + 'a>;

struct Entry<'a> {
    label: &'static str,
    repeat: Repeat,
    action: Action<'a>,
}

pub struct Menu<'a> {
    entries: Vec<Entry<'a>>,
}

impl Default for Menu<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Menu<'a> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn entry<F>(mut self, label: &'static str, repeat: Repeat, action: F) -> Self
    where
        F: FnMut(&mut dyn Console) -> HandlerResult + 'a,
    {
        self.entries.push(Entry {
            label,
            repeat,
            action: Box::new(action),
        });
        self
    }

    /// Number of the "Salir" option.
    pub fn exit_option(&self) -> usize {
        self.entries.len() + 1
    }

    fn render(&self, console: &mut dyn Console) -> std::io::Result<()> {
        console.say("")?;
        console.say("--- Menú ---")?;
        for (i, entry) in self.entries.iter().enumerate() {
            console.say(&format!("{}. {}", i + 1, entry.label))?;
        }
        console.say(&format!("{}. Salir", self.exit_option()))?;
        console.say("---------------")
    }

    /// A choice is exactly one digit in range; `04` or `2.0` are rejected.
    fn parse_choice(&self, raw: &str) -> Option<usize> {
        let mut chars = raw.trim().chars();
        let digit = chars.next()?.to_digit(10)?;
        if chars.next().is_some() {
            return None;
        }
        usize::try_from(digit)
            .ok()
            .filter(|n| (1..=self.exit_option()).contains(n))
    }

    /// Run until the user picks "Salir" or input ends.
    ///
    /// A storage failure is reported and the menu shown again; only a broken
    /// console ends the loop with an error.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<(), HandlerError> {
        let last = self.exit_option();
        loop {
            self.render(console)?;
            let Some(raw) = console.prompt(&format!("Seleccione una opción del 1 al {last}: "))?
            else {
                tracing::debug!("end of input at main menu");
                console.say(EXIT_MESSAGE)?;
                return Ok(());
            };

            let Some(choice) = self.parse_choice(&raw) else {
                console.say(&format!(
                    "Opción inválida. Por favor, ingrese un número entre 1 y {last}."
                ))?;
                continue;
            };

            if choice == last {
                console.say(EXIT_MESSAGE)?;
                return Ok(());
            }

            let entry = &mut self.entries[choice - 1];
            loop {
                match (entry.action)(console) {
                    Ok(outcome) => {
                        tracing::debug!(command = entry.label, status = %outcome.status, "command finished");
                        if entry.repeat.is_done(outcome.status) {
                            break;
                        }
                    }
                    Err(HandlerError::Store(e)) => {
                        tracing::error!(command = entry.label, error = %e, "command aborted");
                        console.say(&format!(
                            "Error de almacenamiento: {e}. No se realizó ningún cambio."
                        ))?;
                        break;
                    }
                    Err(e @ HandlerError::Io(_)) => return Err(e),
                }
            }
        }
    }
}

/// Main menu of the fruit list program.
pub fn fruit_menu<'a, S>(store: &'a S) -> Menu<'a>
where
    S: EntityStore<Fruit> + ?Sized,
{
    Menu::new()
        .entry("Agregar fruta", Repeat::UntilOkOrCancelled, move |c| {
            fruits::add_fruit(store, c)
        })
        .entry("Mostrar frutas", Repeat::Once, move |c| {
            fruits::show_fruits(store, c)
        })
        .entry("Eliminar fruta", Repeat::UntilSettled, move |c| {
            fruits::delete_fruit(store, c)
        })
}

/// Main menu of the inventory program.
pub fn inventory_menu<'a, S>(store: &'a S) -> Menu<'a>
where
    S: EntityStore<Product> + ?Sized,
{
    Menu::new()
        .entry("Agregar producto", Repeat::UntilOkOrCancelled, move |c| {
            products::add_product(store, c)
        })
        .entry("Mostrar productos", Repeat::Once, move |c| {
            products::show_products(store, c)
        })
        .entry("Actualizar producto", Repeat::UntilSettled, move |c| {
            products::update_product(store, c)
        })
        .entry("Eliminar producto", Repeat::UntilSettled, move |c| {
            products::delete_product(store, c)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use verduleria_core::Entity;
    use verduleria_infra::InMemoryStore;

    #[test]
    fn fruit_menu_rejects_bad_option_then_lists_and_exits() {
        let store: InMemoryStore<Fruit> = InMemoryStore::new();
        let mut console = ScriptedConsole::new(["9", "2", "4"]);

        fruit_menu(&store).run(&mut console).unwrap();

        assert!(console.printed("Opción inválida. Por favor, ingrese un número entre 1 y 4."));
        assert!(console.printed("No hay frutas en la lista."));
        assert_eq!(console.lines().last().map(String::as_str), Some(EXIT_MESSAGE));
        assert_eq!(console.count_printed("--- Menú ---"), 3);
    }

    #[test]
    fn fruit_menu_has_no_fifth_option() {
        let store: InMemoryStore<Fruit> = InMemoryStore::new();
        let mut console = ScriptedConsole::new(["5", "4"]);

        fruit_menu(&store).run(&mut console).unwrap();

        assert!(console.printed("entre 1 y 4"));
    }

    #[test]
    fn inventory_menu_rejects_bad_option_then_lists_and_exits() {
        let store: InMemoryStore<Product> = InMemoryStore::new();
        let mut console = ScriptedConsole::new(["9", "2", "5"]);

        inventory_menu(&store).run(&mut console).unwrap();

        assert!(console.printed("Opción inválida. Por favor, ingrese un número entre 1 y 5."));
        assert!(console.printed("No hay productos en la lista."));
        assert_eq!(console.lines().last().map(String::as_str), Some(EXIT_MESSAGE));
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn non_numeric_choices_are_invalid() {
        let store: InMemoryStore<Product> = InMemoryStore::new();
        let mut console = ScriptedConsole::new(["uno", "", "+2", "0", "5"]);

        inventory_menu(&store).run(&mut console).unwrap();

        assert_eq!(console.count_printed("Opción inválida"), 4);
    }

    #[test]
    fn zero_padded_choice_is_invalid() {
        let store: InMemoryStore<Fruit> = InMemoryStore::new();
        let mut console = ScriptedConsole::new(["04", "2", "4"]);

        fruit_menu(&store).run(&mut console).unwrap();

        assert_eq!(console.count_printed("Opción inválida"), 1);
        assert!(console.printed("No hay frutas en la lista."));
        assert_eq!(console.count_printed("--- Menú ---"), 3);
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn multi_character_choices_are_invalid() {
        let store: InMemoryStore<Product> = InMemoryStore::new();
        let menu = inventory_menu(&store);

        for raw in ["01", "05", "2.0", "1 1", "١"] {
            assert_eq!(menu.parse_choice(raw), None, "{raw:?}");
        }
        assert_eq!(menu.parse_choice(" 5 "), Some(5));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let store: InMemoryStore<Fruit> = InMemoryStore::new();
        let mut console = ScriptedConsole::default();

        fruit_menu(&store).run(&mut console).unwrap();

        assert!(console.printed(EXIT_MESSAGE));
    }

    #[test]
    fn duplicate_add_reruns_the_command_until_ok() {
        let store: InMemoryStore<Fruit> = InMemoryStore::new();
        let mut console = ScriptedConsole::new(["1", "pera", "1", "pera", "kiwi", "4"]);

        fruit_menu(&store).run(&mut console).unwrap();

        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .iter()
            .map(|f| f.key().to_string())
            .collect();
        assert_eq!(names, vec!["Pera", "Kiwi"]);
        assert!(console.printed("La fruta ya está en la lista."));
    }

    #[test]
    fn invalid_update_value_restarts_update_from_the_name() {
        let store: InMemoryStore<Product> = InMemoryStore::new();
        let mut console = ScriptedConsole::new([
            "1", "manzana", "fruta", "100.5", "50", // add
            "3", "manzana", "2", "-5", // invalid stock, update re-runs
            "manzana", "2", "40", // second attempt
            "5",
        ]);

        inventory_menu(&store).run(&mut console).unwrap();

        let manzana = store.get("manzana").unwrap().unwrap();
        assert_eq!(manzana.stock().units(), 40);
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn delete_on_empty_inventory_returns_to_menu() {
        let store: InMemoryStore<Product> = InMemoryStore::new();
        let mut console = ScriptedConsole::new(["4", "5"]);

        inventory_menu(&store).run(&mut console).unwrap();

        assert!(console.printed("No hay productos en la lista."));
        assert!(console.printed(EXIT_MESSAGE));
    }
}
