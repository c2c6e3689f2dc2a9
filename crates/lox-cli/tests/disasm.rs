//! File-based runs of `lox_cli::execute`.

use std::fs;

use lox_cli::{execute, Command, DemoTask, DisasmTask, Format, Input, Output};
use pretty_assertions::assert_eq;

#[test]
fn listing_file_to_trace_file() {
    let dir = tempfile::tempdir().unwrap();
    let listing = dir.path().join("prog.lasm");
    fs::write(&listing, "0: RETURN\n1: CONSTANT 1.2\n1: CONSTANT 250000000\n").unwrap();
    let out = dir.path().join("nested/prog.txt");

    execute(Command::Disasm(DisasmTask {
        input: Input::Path(listing),
        output: Output::Path(out.clone()),
        name: None,
        format: Format::Text,
    }))
    .unwrap();

    assert_eq!(
        fs::read_to_string(out).unwrap(),
        "== prog ==\n\
         0000    0 RETURN\n\
         0001    1 CONSTANT            0 '1.2'\n\
         0003    | CONSTANT            1 '2.5e+08'\n"
    );
}

#[test]
fn demo_uses_the_reference_header() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("demo.txt");
    execute(Command::Demo(DemoTask { output: Output::Path(out.clone()), format: Format::Text })).unwrap();

    let text = fs::read_to_string(out).unwrap();
    assert!(text.starts_with("== test chunk ==\n"));
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn assembler_errors_name_the_listing() {
    let dir = tempfile::tempdir().unwrap();
    let listing = dir.path().join("bad.lasm");
    fs::write(&listing, "RETURN\nJUMP 3\n").unwrap();

    let err = execute(Command::Disasm(DisasmTask {
        input: Input::Path(listing),
        output: Output::Path(dir.path().join("never.txt")),
        name: Some("bad".into()),
        format: Format::Text,
    }))
    .unwrap_err();

    assert_eq!(format!("{err:#}"), "assembling bad: line 2: unknown mnemonic `JUMP`");
    assert!(!dir.path().join("never.txt").exists());
}

#[test]
fn missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = execute(Command::Disasm(DisasmTask {
        input: Input::Path(dir.path().join("absent.lasm")),
        ..DisasmTask::default()
    }))
    .unwrap_err();
    assert!(format!("{err:#}").starts_with("reading "));
}
