//! Integration tests for the stemma CLI.
//!
//! These tests run the built binary against data files in temp directories.

use rstest::{fixture, rstest};
use serde_json::Value;
use tempfile::TempDir;

mod common;
use common::{FAMILY, jsonl_rows, run_stemma_in_dir, stderr, stdout, write_family};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a fresh temporary directory for each test
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Provides a temporary directory holding `family.jsonl`
#[fixture]
fn family_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    write_family(temp.path());
    temp
}

fn json_output(dir: &TempDir, args: &[&str]) -> Value {
    let output = run_stemma_in_dir(dir.path(), args);
    assert!(
        output.status.success(),
        "stemma {args:?} failed: {}",
        stderr(&output)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[rstest]
fn help_lists_all_commands(temp_dir: TempDir) {
    let output = run_stemma_in_dir(temp_dir.path(), &["--help"]);
    assert!(output.status.success());

    let text = stdout(&output);
    for command in ["init", "view", "search", "show", "roots", "check", "info"] {
        assert!(text.contains(command), "help should mention '{command}'");
    }
}

#[rstest]
fn version_prints_package_version(temp_dir: TempDir) {
    let output = run_stemma_in_dir(temp_dir.path(), &["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[rstest]
fn no_command_prints_hint(temp_dir: TempDir) {
    let output = run_stemma_in_dir(temp_dir.path(), &[]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("--help"));
}

// ============================================================================
// View
// ============================================================================

#[rstest]
fn complete_tree_text_is_ranked_by_generation(family_dir: TempDir) {
    let output = run_stemma_in_dir(family_dir.path(), &["view"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let expected = "\
Generation 0
├── ○ Arthur Smith [1] ⚭ ○ Beatrice Smith [2]
│   └── Charles Smith [3]
└── ○ Frank Miller [6]
    └── Grace Miller [7]
Generation 1
├── ○ Charles Smith [3] ⚭ ○ Diana Jones [4]
│   └── Edward Smith [5]
└── ○ Grace Miller [7]
Generation 2
└── ○ Edward Smith [5]
";
    assert_eq!(stdout(&output), expected);
}

#[rstest]
fn ascii_fallback_from_environment(family_dir: TempDir) {
    let output = std::process::Command::new(common::stemma_binary())
        .args(["view", "--id", "7", "-b", "1"])
        .current_dir(family_dir.path())
        .env("NO_COLOR", "1")
        .env("STEMMA_ASCII", "1")
        .output()
        .expect("Failed to execute stemma binary");

    let text = stdout(&output);
    assert!(text.contains("`-- o Frank Miller [6]"), "got: {text}");
    assert!(text.contains("    `-- Grace Miller [7]"), "got: {text}");
}

#[rstest]
fn bounded_view_json(family_dir: TempDir) {
    let json = json_output(&family_dir, &["--json", "view", "--name", "edward", "-b", "1"]);

    assert_eq!(json["resolution"]["root"], "5");
    assert_eq!(
        json["resolution"]["selection"],
        serde_json::json!(["3", "4", "5"])
    );
    assert_eq!(json["generations"]["generations"]["4"], 0);
    assert_eq!(json["generations"]["generations"]["5"], 2);

    let unions: Vec<&Value> = json["graph"]["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["kind"] == "union")
        .collect();
    assert_eq!(unions.len(), 1);
    assert_eq!(unions[0]["id"], "union_3_4");
    assert_eq!(unions[0]["children"], serde_json::json!(["5"]));
}

#[rstest]
fn unknown_root_is_a_condition_not_a_failure(family_dir: TempDir) {
    let output = run_stemma_in_dir(family_dir.path(), &["view", "--id", "99", "-b", "2"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "warning: no person matches 99\nNo people selected.\n"
    );
}

#[rstest]
fn ambiguous_name_uses_first_match(family_dir: TempDir) {
    let json = json_output(&family_dir, &["--json", "view", "--name", "smith"]);

    let condition = &json["resolution"]["conditions"][0];
    assert_eq!(condition["kind"], "ambiguous_name");
    assert_eq!(condition["chosen"], "1");
    assert_eq!(json["resolution"]["root"], "1");
}

#[rstest]
fn limits_without_root_give_empty_view(family_dir: TempDir) {
    let json = json_output(&family_dir, &["--json", "view", "-f", "2"]);

    assert_eq!(
        json["resolution"]["conditions"][0]["kind"],
        "limits_without_root"
    );
    assert_eq!(json["graph"]["nodes"], serde_json::json!([]));
}

#[rstest]
fn config_view_defaults_apply_with_a_root(family_dir: TempDir) {
    std::fs::write(
        family_dir.path().join("stemma.yaml"),
        "view:\n  generations-forward: 1\n",
    )
    .unwrap();

    let json = json_output(&family_dir, &["--json", "view", "--id", "1"]);
    assert_eq!(
        json["resolution"]["selection"],
        serde_json::json!(["1", "2", "3"])
    );

    // A bare view still shows everyone
    let json = json_output(&family_dir, &["--json", "view"]);
    assert_eq!(json["resolution"]["selection"].as_array().unwrap().len(), 7);
}

// ============================================================================
// Search, Show, Roots
// ============================================================================

#[rstest]
fn search_lists_exact_before_partial(family_dir: TempDir) {
    let output = run_stemma_in_dir(family_dir.path(), &["search", "grace miller"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Exact (1):\n  7 Grace Miller\n");

    let json = json_output(&family_dir, &["--json", "search", "smith"]);
    assert_eq!(json["exact"], serde_json::json!([]));
    assert_eq!(json["partial"], serde_json::json!(["1", "2", "3", "5"]));
}

#[rstest]
fn show_person_with_relations(family_dir: TempDir) {
    let output = run_stemma_in_dir(family_dir.path(), &["show", "3"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.starts_with("3 Charles Smith\n"), "got: {text}");
    assert!(text.contains("Spouse: 4 Diana Jones"));
    assert!(text.contains("Parents (2):\n  1 Arthur Smith\n  2 Beatrice Smith"));
    assert!(text.contains("Children (1):\n  5 Edward Smith"));
}

#[rstest]
fn show_unknown_person_fails(family_dir: TempDir) {
    let output = run_stemma_in_dir(family_dir.path(), &["show", "99"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("error: person not found: 99"));
}

#[rstest]
fn roots_skip_in_laws(family_dir: TempDir) {
    let json = json_output(&family_dir, &["--json", "roots"]);
    assert_eq!(json["root_ancestors"], serde_json::json!(["1", "6"]));

    let output = run_stemma_in_dir(family_dir.path(), &["roots"]);
    assert!(stdout(&output).contains("1 Arthur Smith with 2 Beatrice Smith"));
}

// ============================================================================
// Check and Info
// ============================================================================

#[rstest]
fn check_reports_problems_and_still_succeeds(temp_dir: TempDir) {
    let mut rows = jsonl_rows(&[
        ("1", "Ann", "", "", "2"),
        ("2", "Bob", "", "", ""),
        ("3", "Cat", "ghost", "", ""),
    ]);
    rows.push_str("{not json}\n");
    std::fs::write(temp_dir.path().join("family.jsonl"), rows).unwrap();

    let output = run_stemma_in_dir(temp_dir.path(), &["check"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Found 3 problem(s):"), "got: {text}");
    assert!(text.contains("malformed_row"));
    assert!(text.contains("dangling_reference"));
    assert!(text.contains("non_reciprocal_spouse"));

    let json = json_output(&temp_dir, &["--json", "check"]);
    assert_eq!(json["count"], 3);
}

#[rstest]
fn clean_data_checks_clean(family_dir: TempDir) {
    let output = run_stemma_in_dir(family_dir.path(), &["check"]);
    assert_eq!(stdout(&output), "No problems found.\n");
}

#[rstest]
fn info_summarizes_data(family_dir: TempDir) {
    let json = json_output(&family_dir, &["--json", "info"]);
    assert_eq!(json["people"], FAMILY.len());
    assert_eq!(json["warnings"], 0);
    assert_eq!(json["config_file"], Value::Null);
}

#[rstest]
fn data_flag_overrides_config(temp_dir: TempDir) {
    std::fs::write(
        temp_dir.path().join("other.jsonl"),
        jsonl_rows(&[("x", "Xena", "", "", "")]),
    )
    .unwrap();

    let json = json_output(&temp_dir, &["--json", "--data", "other.jsonl", "info"]);
    assert_eq!(json["people"], 1);
}

// ============================================================================
// Init and Failures
// ============================================================================

#[rstest]
fn init_then_info(temp_dir: TempDir) {
    let output = run_stemma_in_dir(temp_dir.path(), &["init", "--quiet"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert!(temp_dir.path().join("stemma.yaml").exists());

    let json = json_output(&temp_dir, &["--json", "info"]);
    assert_eq!(json["people"], 0);
    assert!(
        json["config_file"]
            .as_str()
            .unwrap()
            .ends_with("stemma.yaml")
    );
}

#[rstest]
fn init_twice_fails(temp_dir: TempDir) {
    assert!(
        run_stemma_in_dir(temp_dir.path(), &["init", "-q"])
            .status
            .success()
    );
    let output = run_stemma_in_dir(temp_dir.path(), &["init"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("already exists"));
}

#[rstest]
fn missing_data_file_fails_with_cause(temp_dir: TempDir) {
    let output = run_stemma_in_dir(temp_dir.path(), &["info"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("error: row loading error"), "got: {err}");
    assert!(err.contains("caused by"), "got: {err}");
}

#[rstest]
fn missing_explicit_config_fails(family_dir: TempDir) {
    let output = run_stemma_in_dir(family_dir.path(), &["--config", "nope.yaml", "info"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("configuration file not found"));
}

#[rstest]
fn invalid_config_fails(family_dir: TempDir) {
    std::fs::write(
        family_dir.path().join("stemma.yaml"),
        "generations:\n  max-depth: 0\n",
    )
    .unwrap();

    let output = run_stemma_in_dir(family_dir.path(), &["info"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("max-depth"));
}
