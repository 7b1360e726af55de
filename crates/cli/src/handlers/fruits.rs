//! Fruit list commands.

use verduleria_core::{Entity, Outcome, Status, validate_fruit_name};
use verduleria_fruits::Fruit;
use verduleria_infra::{EntityStore, Session, StoreError};

use super::{DELETE_REFUSED_MESSAGE, HandlerResult, confirm};
use crate::console::Console;
use crate::retry::{FieldPrompt, RetryPolicy, read_field};

const ADD_NAME: FieldPrompt = FieldPrompt {
    prompt: "Ingrese la fruta que desea agregar (o \"cancelar\" para volver al menú): ",
    empty: "No se ingresó ninguna fruta, por favor intente nuevamente.",
    invalid: "La fruta debe contener solo letras y espacios, sin números ni caracteres especiales.",
};

const DELETE_NAME: FieldPrompt = FieldPrompt {
    prompt: "Ingrese la fruta que desea eliminar (o \"cancelar\" para volver al menú): ",
    ..ADD_NAME
};

const EMPTY_LIST: &str = "No hay frutas en la lista.";
const NOT_FOUND: &str = "La fruta no se encuentra en la lista.";

pub fn add_fruit<S, C>(store: &S, console: &mut C) -> HandlerResult
where
    S: EntityStore<Fruit> + ?Sized,
    C: Console + ?Sized,
{
    let store = Session::<Fruit, _>::begin(store)?;
    let name = match read_field(console, &ADD_NAME, RetryPolicy::RetryInPlace, |raw| {
        validate_fruit_name(raw, true)
    })? {
        Ok(name) => name,
        Err(rejection) => return Ok(rejection.into()),
    };

    let fruit = Fruit::new(name);
    let key = fruit.key().to_string();
    match store.insert(fruit) {
        Ok(()) => {
            console.say(&format!("Fruta {key} agregada con éxito."))?;
            Ok(Outcome::ok(key))
        }
        Err(StoreError::Duplicate(_)) => {
            console.say("La fruta ya está en la lista.")?;
            Ok(Outcome::with_key(Status::Duplicate, key))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn show_fruits<S, C>(store: &S, console: &mut C) -> HandlerResult
where
    S: EntityStore<Fruit> + ?Sized,
    C: Console + ?Sized,
{
    let store = Session::<Fruit, _>::begin(store)?;
    let fruits = store.list_all()?;
    if fruits.is_empty() {
        console.say(EMPTY_LIST)?;
        return Ok(Outcome::new(Status::Ok));
    }

    console.say("Lista de frutas:")?;
    for (i, fruit) in fruits.iter().enumerate() {
        console.say(&format!("{}. {fruit}", i + 1))?;
    }
    console.say("")?;
    Ok(Outcome::new(Status::Ok))
}

pub fn delete_fruit<S, C>(store: &S, console: &mut C) -> HandlerResult
where
    S: EntityStore<Fruit> + ?Sized,
    C: Console + ?Sized,
{
    let store = Session::<Fruit, _>::begin(store)?;
    if store.count()? == 0 {
        console.say(EMPTY_LIST)?;
        return Ok(Outcome::new(Status::NotFound));
    }

    let name = match read_field(console, &DELETE_NAME, RetryPolicy::AbortOnFirstInvalid, |raw| {
        validate_fruit_name(raw, true)
    })? {
        Ok(name) => name,
        Err(rejection) => return Ok(rejection.into()),
    };
    let key = name.as_str();

    if store.get(key)?.is_none() {
        console.say(NOT_FOUND)?;
        return Ok(Outcome::with_key(Status::NotFound, key));
    }

    if !confirm(console, "¿Está seguro que desea eliminar la fruta? (s/n): ")? {
        console.say(DELETE_REFUSED_MESSAGE)?;
        return Ok(Outcome::with_key(Status::Cancelled, key));
    }

    match store.delete(key) {
        Ok(()) => {
            console.say(&format!("Fruta {key} eliminada con éxito."))?;
            Ok(Outcome::ok(key))
        }
        Err(StoreError::NotFound(_)) => {
            console.say(NOT_FOUND)?;
            Ok(Outcome::with_key(Status::NotFound, key))
        }
        Err(e) => Err(e.into()),
    }
}
