//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path of the lineage binary built for this test run
pub fn get_lineage_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lineage"))
}

/// Run the lineage binary directly in the specified directory.
///
/// Colors and log output are switched off so assertions see plain text.
pub fn run_lineage_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(get_lineage_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("LINEAGE_ASCII", "1")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute lineage binary")
}

/// Run the binary and parse its stdout as JSON, asserting success.
pub fn run_lineage_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = run_lineage_in_dir(dir, args);
    assert!(
        output.status.success(),
        "lineage {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

/// Write a small three-table graph export into `dir` and return its path.
pub fn write_graph(dir: &Path) -> PathBuf {
    let path = dir.join("graph.json");
    std::fs::write(
        &path,
        r#"{
            "nodes": [
                {"id": "orders", "label": "orders", "type": "source",
                 "attributes": [
                    {"id": "orders.id", "name": "id", "type": "int", "isPrimaryKey": true},
                    {"id": "orders.email", "name": "email", "type": "varchar", "hasPII": true}
                 ]},
                {"id": "facts", "label": "order_facts", "type": "derived",
                 "attributes": [{"id": "facts.order_id", "name": "order_id", "type": "int"}]},
                {"id": "report", "label": "revenue_report", "type": "destination",
                 "attributes": [{"id": "report.order_id", "name": "order_id", "type": "int"}]}
            ],
            "edges": [
                {"id": "f1", "source": "orders", "target": "facts",
                 "metadata": {"sourceAttribute": "orders.id", "targetAttribute": "facts.order_id",
                              "relationshipType": "DERIVED"}},
                {"id": "f2", "source": "facts", "target": "report",
                 "metadata": {"sourceAttribute": "facts.order_id", "targetAttribute": "report.order_id"}},
                {"id": "f3", "source": "orders", "target": "report"}
            ]
        }"#,
    )
    .expect("Failed to write graph file");
    path
}
