//! Integration tests for the lineage CLI.
//!
//! These tests verify the end-to-end behavior of all CLI commands against
//! the built-in sample graph and against graph files on disk.

use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

mod common;
use common::{run_lineage_in_dir, run_lineage_json, write_graph};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a fresh temporary directory for each test
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Provides a temporary directory holding `graph.json`
#[fixture]
fn graph_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    write_graph(temp.path());
    temp
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[rstest]
fn test_cli_help(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("Usage:"));
    for command in ["entities", "show", "path", "edge", "impact", "search", "validate"] {
        assert!(stdout.contains(command), "help should list {command}");
    }
}

#[rstest]
fn test_cli_version(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("0.1.0"));
}

#[rstest]
fn test_cli_no_args(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &[]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("--help"));
}

// ============================================================================
// Built-in Sample Graph
// ============================================================================

#[rstest]
fn test_entities_lists_sample(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &["entities"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("Found 3 entities:"));
    assert!(stdout.contains("2 lookup_address_type [source]"));
    assert!(stdout.contains("3 patient_address [entity] [PII]"));
}

#[rstest]
fn test_entities_pii_only_json(temp_dir: TempDir) {
    let value = run_lineage_json(temp_dir.path(), &["entities", "--pii-only", "--json"]);

    let labels: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["patient", "patient_address"]);
}

#[rstest]
fn test_show_entity(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &["show", "3"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("Owner: Healthcare Team"));
    assert!(stdout.contains("Attributes (7):"));
    assert!(stdout.contains("Impact: upstream 2, downstream 0 (low)"));
}

#[rstest]
#[case(&["show", "ghost"], "Entity not found: ghost")]
#[case(&["impact", "ghost"], "Entity not found: ghost")]
#[case(&["path", "ghost"], "Entity not found: ghost")]
#[case(&["path", "3", "--attribute", "1-1"], "Attribute 1-1 not found on entity 3")]
#[case(&["edge", "ghost"], "Edge not found: ghost")]
fn test_unknown_ids_fail(temp_dir: TempDir, #[case] args: &[&str], #[case] message: &str) {
    let output = run_lineage_in_dir(temp_dir.path(), args);

    assert!(!output.status.success());
    assert!(
        stderr(&output).contains(message),
        "stderr should mention '{message}': {}",
        stderr(&output)
    );
}

#[rstest]
fn test_path_json(temp_dir: TempDir) {
    let value = run_lineage_json(temp_dir.path(), &["path", "3", "-a", "3-2", "--json"]);

    assert_eq!(value["path"]["entities"], json!(["1", "3"]));
    assert_eq!(value["path"]["edges"], json!(["e1-3"]));
    assert_eq!(value["path"]["attributes"], json!(["1-1", "3-2"]));

    let edges = value["view"]["edges"].as_array().unwrap();
    assert_eq!(edges[0]["id"], "e1-3");
    assert_eq!(edges[0]["is_highlighted"], true);
    assert_eq!(edges[1]["is_highlighted"], false);
}

#[rstest]
fn test_path_text(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &["path", "1", "--attribute", "1-1"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("Connected path: 2 entities, 1 edges, 2 attributes"));
    assert!(stdout.contains("* e1-3 patient -> patient_address FK"));
    assert!(stdout.contains("- e2-3 lookup_address_type -> patient_address FK"));
}

#[rstest]
fn test_edge_text(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &["edge", "e2-3"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("Columns: 2-1 -> 3-3"));
    assert!(stdout.contains("Confidence: 100%"));
    assert!(stdout.contains("* 2 lookup_address_type"));
}

// ============================================================================
// Graph Files
// ============================================================================

#[rstest]
fn test_impact_from_graph_file(graph_dir: TempDir) {
    let value = run_lineage_json(
        graph_dir.path(),
        &["--graph", "graph.json", "impact", "orders", "--json"],
    );

    assert_eq!(value["upstream_count"], 0);
    assert_eq!(value["downstream_count"], 2);
    assert_eq!(value["downstream"], json!(["facts", "report"]));
    assert_eq!(value["edges"], json!(["f1", "f2", "f3"]));
    assert_eq!(value["estimated_impact"], "low");
}

#[rstest]
fn test_edge_entity_level(graph_dir: TempDir) {
    let output = run_lineage_in_dir(graph_dir.path(), &["--graph", "graph.json", "edge", "f3"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Entity-level edge"));
}

#[rstest]
fn test_search_ranking(graph_dir: TempDir) {
    let value = run_lineage_json(
        graph_dir.path(),
        &["--graph", "graph.json", "search", "order", "--json"],
    );

    let paths: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec!["order_facts", "order_facts.order_id", "orders", "revenue_report.order_id"]
    );

    let exact = run_lineage_json(
        graph_dir.path(),
        &["--graph", "graph.json", "search", "orders", "-n", "1", "--json"],
    );
    assert_eq!(exact[0]["path"], "orders");
    assert_eq!(exact[0]["match_score"], 1.0);
}

#[rstest]
fn test_ids_with_spaces_are_reachable(temp_dir: TempDir) {
    std::fs::write(
        temp_dir.path().join("graph.json"),
        json!({
            "nodes": [
                {"id": "patient", "label": "patient", "type": "source",
                 "attributes": [{"id": "patient id", "name": "patient_id", "type": "int"}]},
                {"id": "patient address", "label": "patient_address", "type": "entity",
                 "attributes": [{"id": "address patient id", "name": "patient_id", "type": "int"}]}
            ],
            "edges": [
                {"id": "patient to address", "source": "patient", "target": "patient address",
                 "metadata": {"sourceAttribute": "patient id", "targetAttribute": "address patient id"}}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let show = run_lineage_in_dir(temp_dir.path(), &["--graph", "graph.json", "show", "patient address"]);
    assert!(show.status.success(), "stderr: {}", stderr(&show));
    assert!(stdout(&show).contains("Impact: upstream 1, downstream 0"));

    let path = run_lineage_json(
        temp_dir.path(),
        &["--graph", "graph.json", "path", " patient address ", "-a", "address patient id", "--json"],
    );
    assert_eq!(path["path"]["entities"], json!(["patient", "patient address"]));
    assert_eq!(path["path"]["edges"], json!(["patient to address"]));

    let impact = run_lineage_json(
        temp_dir.path(),
        &["--graph", "graph.json", "impact", "patient", "--json"],
    );
    assert_eq!(impact["downstream"], json!(["patient address"]));
}

#[rstest]
fn test_config_supplies_graph_and_policy(graph_dir: TempDir) {
    std::fs::write(
        graph_dir.path().join("lineage.yaml"),
        "traversal:\n  visit-policy: per-attribute\nsource:\n  graph-file: graph.json\n",
    )
    .unwrap();

    let output = run_lineage_in_dir(graph_dir.path(), &["validate"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("Loaded 3 entities and 3 edges"));
    assert!(stdout.contains("No problems found."));
}

#[rstest]
fn test_validate_reports_dropped_records(temp_dir: TempDir) {
    std::fs::write(
        temp_dir.path().join("graph.jsonl"),
        concat!(
            r#"{"record": "node", "id": "a", "label": "a", "type": "source"}"#,
            "\n",
            "garbage\n",
            r#"{"record": "edge", "id": "ab", "source": "a", "target": "b"}"#,
            "\n",
        ),
    )
    .unwrap();

    let value = run_lineage_json(temp_dir.path(), &["--graph", "graph.jsonl", "validate", "--json"]);
    assert_eq!(value["entities"], 1);
    assert_eq!(value["edges"], 0);
    let kinds: Vec<&str> = value["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["malformed_json", "dangling_edge"]);

    let strict = run_lineage_in_dir(temp_dir.path(), &["--graph", "graph.jsonl", "validate", "--strict"]);
    assert!(!strict.status.success());
    assert!(stderr(&strict).contains("2 record(s) dropped"));
}

#[rstest]
fn test_missing_config_file_fails(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &["--config", "absent.yaml", "entities"]);
    assert!(!output.status.success());
}
