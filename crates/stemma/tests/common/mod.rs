//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path of the `stemma` binary cargo built for this test run
pub fn stemma_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_stemma"))
}

/// Run the stemma binary in the specified directory, colors and env logging off
pub fn run_stemma_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(stemma_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("STEMMA_ASCII")
        .output()
        .expect("Failed to execute stemma binary")
}

/// Stdout as text
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as text
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// One JSON Lines row per tuple: (id, name, father, mother, spouse).
/// Empty strings leave the column out.
pub fn jsonl_rows(people: &[(&str, &str, &str, &str, &str)]) -> String {
    let mut out = String::new();
    for &(id, name, father, mother, spouse) in people {
        let mut row = serde_json::Map::new();
        row.insert("id".into(), id.into());
        for (key, value) in [
            ("name", name),
            ("father_id", father),
            ("mother_id", mother),
            ("spouse_id", spouse),
        ] {
            if !value.is_empty() {
                row.insert(key.into(), value.into());
            }
        }
        out.push_str(&serde_json::Value::Object(row).to_string());
        out.push('\n');
    }
    out
}

/// A three-generation family used across CLI tests.
///
/// ```text
/// Arthur(1) ⚭ Beatrice(2)        Frank(6)
///        |                          |
///   Charles(3) ⚭ Diana(4)      Grace(7)
///        |
///     Edward(5)
/// ```
pub const FAMILY: &[(&str, &str, &str, &str, &str)] = &[
    ("1", "Arthur Smith", "", "", "2"),
    ("2", "Beatrice Smith", "", "", "1"),
    ("3", "Charles Smith", "1", "2", "4"),
    ("4", "Diana Jones", "", "", "3"),
    ("5", "Edward Smith", "3", "4", ""),
    ("6", "Frank Miller", "", "", ""),
    ("7", "Grace Miller", "6", "", ""),
];

/// Write `FAMILY` as `family.jsonl` into `dir`
pub fn write_family(dir: &Path) -> PathBuf {
    let path = dir.join("family.jsonl");
    std::fs::write(&path, jsonl_rows(FAMILY)).expect("Failed to write family.jsonl");
    path
}
