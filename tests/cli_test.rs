//! CLI tests.
//!
//! Runs the `folio` binary against snapshot files in a temp directory.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

const NOTEBOOK: &str = r#"{
  "pages": [
    {"title": "Groceries", "body": "<ul><li>milk</li></ul>"},
    {"title": "", "body": ""},
    {"title": "", "body": "<p>later</p>"}
  ]
}"#;

fn folio(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_folio"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn notebook(dir: &TempDir, json: &str) -> String {
    let path = dir.path().join("notebook.json");
    fs::write(&path, json).unwrap();
    path.to_string_lossy().into_owned()
}

fn out_dir(dir: &TempDir) -> String {
    dir.path().join("out").to_string_lossy().into_owned()
}

#[test]
fn test_text_export() {
    let dir = TempDir::new().unwrap();
    let input = notebook(&dir, NOTEBOOK);
    let out = out_dir(&dir);

    let output = folio(&[&input, "-o", &out, "-q"]);
    assert!(output.status.success());

    let text = fs::read_to_string(Path::new(&out).join("notebook_export.txt")).unwrap();
    assert_eq!(
        text,
        "Title: Groceries\n---\nmilk\n\n=== Page 3 ===\n\n---\nlater"
    );
}

#[test]
fn test_markdown_and_print_export() {
    let dir = TempDir::new().unwrap();
    let input = notebook(&dir, NOTEBOOK);
    let out = out_dir(&dir);

    assert!(folio(&[&input, "-f", "md", "-o", &out]).status.success());
    assert!(folio(&[&input, "-f", "pdf", "-o", &out]).status.success());

    let md = fs::read_to_string(Path::new(&out).join("notebook_export.md")).unwrap();
    assert_eq!(md, "# Groceries\n\n- milk\n\n---\n\nlater");
    let html = fs::read_to_string(Path::new(&out).join("notebook_export.html")).unwrap();
    assert!(html.contains("<title>Notebook Export</title>"));
}

#[test]
fn test_blank_notebook_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = notebook(&dir, r#"{"pages": [{"title": " ", "body": "<p> </p>"}]}"#);
    let out = out_dir(&dir);

    let output = folio(&[&input, "-o", &out]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Nothing to export"));
    assert!(!Path::new(&out).exists());
}

#[test]
fn test_info_and_errors() {
    let dir = TempDir::new().unwrap();
    let input = notebook(&dir, NOTEBOOK);

    let output = folio(&["-i", &input]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pages: 4"));
    assert!(stdout.contains("Non-blank pages: 2"));

    let output = folio(&[&input, "-f", "docx"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown export format: docx"));

    let output = folio(&[&input, "-f", "img"]);
    assert!(!output.status.success());
}
