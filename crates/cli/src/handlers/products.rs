//! Inventory product commands.

use chrono::Utc;

use verduleria_core::{
    Entity, Outcome, Status, validate_kind, validate_price, validate_product_name, validate_stock,
};
use verduleria_infra::{EntityStore, Session, StoreError};
use verduleria_products::{Product, ProductChange, ProductField, ProductUpdate};

use super::{DELETE_REFUSED_MESSAGE, HandlerResult, confirm};
use crate::console::Console;
use crate::retry::{CANCELLED_MESSAGE, FieldPrompt, RetryPolicy, read_field};

const NAME_EMPTY: &str = "No se ingresó ningún producto, por favor intente nuevamente.";
const NAME_INVALID: &str =
    "El producto debe contener solo letras y espacios, sin números ni caracteres especiales.";
const VALUE_EMPTY: &str = "No se ingresó ningún valor, por favor intente nuevamente.";
const PRICE_INVALID: &str = "El precio debe ser un número positivo.";
const STOCK_INVALID: &str = "El stock debe ser un número entero no negativo.";

const ADD_NAME: FieldPrompt = FieldPrompt {
    prompt: "Ingrese el nombre del producto que desea agregar (o \"cancelar\" para volver al menú): ",
    empty: NAME_EMPTY,
    invalid: NAME_INVALID,
};

const UPDATE_NAME: FieldPrompt = FieldPrompt {
    prompt: "Ingrese el nombre del producto que desea actualizar (o \"cancelar\" para volver al menú): ",
    ..ADD_NAME
};

const DELETE_NAME: FieldPrompt = FieldPrompt {
    prompt: "Ingrese el nombre del producto que desea eliminar (o \"cancelar\" para volver al menú): ",
    ..ADD_NAME
};

const KIND: FieldPrompt = FieldPrompt {
    prompt: "Ingrese el tipo de producto (fruta/verdura) (o \"cancelar\" para volver al menú): ",
    empty: VALUE_EMPTY,
    invalid: "El tipo de producto debe ser 'fruta' o 'verdura'.",
};

const PRICE: FieldPrompt = FieldPrompt {
    prompt: "Ingrese el precio del producto (o \"cancelar\" para volver al menú): ",
    empty: VALUE_EMPTY,
    invalid: PRICE_INVALID,
};

const STOCK: FieldPrompt = FieldPrompt {
    prompt: "Ingrese el stock del producto (o \"cancelar\" para volver al menú): ",
    empty: VALUE_EMPTY,
    invalid: STOCK_INVALID,
};

const NEW_PRICE: FieldPrompt = FieldPrompt {
    prompt: "Ingrese el nuevo precio: ",
    ..PRICE
};

const NEW_STOCK: FieldPrompt = FieldPrompt {
    prompt: "Ingrese el nuevo stock: ",
    ..STOCK
};

const EMPTY_LIST: &str = "No hay productos en la lista.";
const DUPLICATE: &str = "El producto ya está en la lista.";
const NOT_FOUND: &str = "El producto no se encuentra en la lista.";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Unwrap an accepted field or return its rejection as the handler outcome.
macro_rules! accepted {
    ($read:expr) => {
        match $read? {
            Ok(value) => value,
            Err(rejection) => return Ok(rejection.into()),
        }
    };
}

/// Add a product. Every field is re-prompted in place until valid or cancelled.
pub fn add_product<S, C>(store: &S, console: &mut C) -> HandlerResult
where
    S: EntityStore<Product> + ?Sized,
    C: Console + ?Sized,
{
    let store = Session::<Product, _>::begin(store)?;
    let retry = RetryPolicy::RetryInPlace;

    let name = accepted!(read_field(console, &ADD_NAME, retry, |raw| {
        validate_product_name(raw, true)
    }));
    if store.get(name.as_str())?.is_some() {
        console.say(DUPLICATE)?;
        return Ok(Outcome::with_key(Status::Duplicate, name.as_str()));
    }

    let kind = accepted!(read_field(console, &KIND, retry, |raw| validate_kind(raw, true)));
    let price = accepted!(read_field(console, &PRICE, retry, |raw| validate_price(raw, true)));
    let stock = accepted!(read_field(console, &STOCK, retry, |raw| validate_stock(raw, true)));

    let product = Product::new(name, kind, price, stock, Utc::now());
    let key = product.key().to_string();
    match store.insert(product) {
        Ok(()) => {
            console.say(&format!("✅ Producto '{key}' agregado con éxito."))?;
            Ok(Outcome::ok(key))
        }
        Err(StoreError::Duplicate(_)) => {
            console.say(DUPLICATE)?;
            Ok(Outcome::with_key(Status::Duplicate, key))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn show_products<S, C>(store: &S, console: &mut C) -> HandlerResult
where
    S: EntityStore<Product> + ?Sized,
    C: Console + ?Sized,
{
    let store = Session::<Product, _>::begin(store)?;
    let products = store.list_all()?;
    if products.is_empty() {
        console.say(EMPTY_LIST)?;
        return Ok(Outcome::new(Status::Ok));
    }

    console.say("Lista de productos:")?;
    for (i, p) in products.iter().enumerate() {
        console.say(&format!(
            "{}. {} - Tipo: {}, Precio: {}, Stock: {}",
            i + 1,
            p.name(),
            p.kind(),
            p.price(),
            p.stock()
        ))?;
        console.say(&format!(
            "   Creado: {}, Actualizado: {}",
            p.created_at().format(TIMESTAMP_FORMAT),
            p.updated_at().format(TIMESTAMP_FORMAT)
        ))?;
    }
    console.say("")?;
    Ok(Outcome::new(Status::Ok))
}

/// Update the price or stock of an existing product.
///
/// The key and the new value are read once; a bad answer is returned to the
/// menu, which re-runs the command from the top.
pub fn update_product<S, C>(store: &S, console: &mut C) -> HandlerResult
where
    S: EntityStore<Product> + ?Sized,
    C: Console + ?Sized,
{
    let store = Session::<Product, _>::begin(store)?;
    let abort = RetryPolicy::AbortOnFirstInvalid;

    let name = accepted!(read_field(console, &UPDATE_NAME, abort, |raw| {
        validate_product_name(raw, true)
    }));
    let key = name.as_str();

    if store.get(key)?.is_none() {
        console.say(NOT_FOUND)?;
        return Ok(Outcome::with_key(Status::NotFound, key));
    }

    console.say("¿Qué desea actualizar?")?;
    for (i, field) in ProductField::ALL.iter().enumerate() {
        console.say(&format!("{}. {}", i + 1, field.label()))?;
    }
    let Some(choice) = console.prompt("Seleccione una opción: ")? else {
        console.say(CANCELLED_MESSAGE)?;
        return Ok(Outcome::with_key(Status::Cancelled, key));
    };

    let change = match sub_menu_field(&choice) {
        Some(ProductField::Price) => {
            ProductChange::Price(accepted!(read_field(console, &NEW_PRICE, abort, |raw| {
                validate_price(raw, true)
            })))
        }
        Some(ProductField::Stock) => {
            ProductChange::Stock(accepted!(read_field(console, &NEW_STOCK, abort, |raw| {
                validate_stock(raw, true)
            })))
        }
        None => {
            console.say("Opción inválida. No se realizó ninguna actualización.")?;
            return Ok(Outcome::with_key(Status::Invalid, key));
        }
    };

    match store.update_field(key, ProductUpdate::now(change)) {
        Ok(()) => {
            console.say(&format!(
                "✅ {} del producto '{key}' actualizado a {change}.",
                change.field().label()
            ))?;
            Ok(Outcome::ok(key))
        }
        Err(StoreError::NotFound(_)) => {
            console.say(NOT_FOUND)?;
            Ok(Outcome::with_key(Status::NotFound, key))
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a product after an explicit `s` confirmation.
pub fn delete_product<S, C>(store: &S, console: &mut C) -> HandlerResult
where
    S: EntityStore<Product> + ?Sized,
    C: Console + ?Sized,
{
    let store = Session::<Product, _>::begin(store)?;
    if store.count()? == 0 {
        console.say(EMPTY_LIST)?;
        return Ok(Outcome::new(Status::NotFound));
    }

    let name = accepted!(read_field(
        console,
        &DELETE_NAME,
        RetryPolicy::AbortOnFirstInvalid,
        |raw| validate_product_name(raw, true)
    ));
    let key = name.as_str();

    if store.get(key)?.is_none() {
        console.say(NOT_FOUND)?;
        return Ok(Outcome::with_key(Status::NotFound, key));
    }

    if !confirm(console, "¿Está seguro que desea eliminar el producto? (s/n): ")? {
        console.say(DELETE_REFUSED_MESSAGE)?;
        return Ok(Outcome::with_key(Status::Cancelled, key));
    }

    match store.delete(key) {
        Ok(()) => {
            console.say(&format!("Producto {key} eliminado con éxito."))?;
            Ok(Outcome::ok(key))
        }
        Err(StoreError::NotFound(_)) => {
            console.say(NOT_FOUND)?;
            Ok(Outcome::with_key(Status::NotFound, key))
        }
        Err(e) => Err(e.into()),
    }
}

/// Field picked in the update sub-menu; only the exact option number counts.
fn sub_menu_field(choice: &str) -> Option<ProductField> {
    let choice = choice.trim();
    ProductField::ALL
        .iter()
        .enumerate()
        .find(|(i, _)| choice == (i + 1).to_string())
        .map(|(_, field)| *field)
}
