// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use splitpot::cli;
use splitpot::commands::exporter;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    splitpot::db::init_schema(&mut conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO members(user_id, name) VALUES ('alice','Alice'), ('bob','Bob');
        INSERT INTO expenses(id, payer_id, amount, description) VALUES (1, 'alice', '30', 'groceries');
        INSERT INTO shares(expense_id, user_id, owed_amount) VALUES
            (1, 'alice', '15'), (1, 'bob', '15');
        INSERT INTO expenses(id, payer_id, amount, description, is_settled, settled_at)
            VALUES (2, 'bob', '8', 'voided', 1, datetime('now'));
        INSERT INTO shares(expense_id, user_id, owed_amount) VALUES (2, 'alice', '8');
        "#,
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, args: &[&str]) {
    let mut argv = vec!["splitpot", "export", "expenses"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", sub)) = matches.subcommand() {
        exporter::handle(conn, sub).unwrap();
    } else {
        panic!("export command not parsed");
    }
}

#[test]
fn csv_export_has_one_row_per_share() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("expenses.csv");
    run_export(&conn, &["--format", "csv", "--out", out.to_str().unwrap()]);

    let content = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    // header + two shares of the active expense
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("expense_id,created_at,pot,payer"));
    assert!(lines[1].contains("groceries"));
    assert!(!content.contains("voided"));
}

#[test]
fn csv_export_all_includes_settled() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("expenses.csv");
    run_export(
        &conn,
        &["--format", "csv", "--out", out.to_str().unwrap(), "--all"],
    );
    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains("voided"));
}

#[test]
fn json_export_is_valid_and_complete() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("expenses.json");
    run_export(
        &conn,
        &["--format", "json", "--out", out.to_str().unwrap(), "--all"],
    );
    let content = std::fs::read_to_string(&out).unwrap();
    let val: serde_json::Value = serde_json::from_str(&content).unwrap();
    let arr = val.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["payer"], "alice");
    assert_eq!(arr[0]["owed_amount"], "15");
}
