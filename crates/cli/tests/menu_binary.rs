use assert_cmd::Command;
use predicates::prelude::*;

fn frutas() -> Command {
    let mut cmd = Command::cargo_bin("frutas").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn inventario() -> Command {
    let mut cmd = Command::cargo_bin("inventario").unwrap();
    cmd.env_remove("USE_DATABASE")
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn frutas_invalid_option_then_empty_list_then_exit() {
    frutas()
        .write_stdin("9\n2\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Opción inválida. Por favor, ingrese un número entre 1 y 4.",
        ))
        .stdout(predicate::str::contains("No hay frutas en la lista."))
        .stdout(predicate::str::contains("Saliendo del programa..."));
}

#[test]
fn frutas_add_show_delete_session() {
    frutas()
        .write_stdin("1\nmanzana\n1\nfruta del dragón\n2\n3\nmanzana\ns\n2\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Manzana\n2. Fruta Del Dragón"))
        .stdout(predicate::str::contains("Fruta Manzana eliminada con éxito."))
        .stdout(predicate::str::contains("1. Fruta Del Dragón\n"));
}

#[test]
fn frutas_exits_cleanly_at_end_of_input() {
    frutas()
        .write_stdin("1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saliendo del programa..."));
}

#[test]
fn inventario_invalid_option_then_empty_list_then_exit() {
    inventario()
        .write_stdin("9\n2\n5\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Opción inválida. Por favor, ingrese un número entre 1 y 5.",
        ))
        .stdout(predicate::str::contains("No hay productos en la lista."))
        .stdout(predicate::str::contains("Saliendo del programa..."));
}

#[test]
fn inventario_add_then_update_then_show() {
    inventario()
        .write_stdin("1\nManzana\nfruta\n100.5\n50\n3\nmanzana\n2\n45\n2\n5\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1. manzana - Tipo: fruta, Precio: 100.5, Stock: 45",
        ));
}

#[test]
fn inventario_requires_database_url_when_enabled() {
    inventario()
        .env("USE_DATABASE", "true")
        .write_stdin("5\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[test]
fn logs_stay_off_stdout() {
    inventario()
        .env("RUST_LOG", "debug")
        .write_stdin("2\n5\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"level\"").not());
}
