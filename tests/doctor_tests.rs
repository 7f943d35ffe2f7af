// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use splitpot::commands::doctor::check;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    splitpot::db::init_schema(&mut conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO members(user_id, name) VALUES ('alice','Alice'), ('bob','Bob');
        "#,
    )
    .unwrap();
    conn
}

#[test]
fn clean_ledger_reports_nothing() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO expenses(id, payer_id, amount, description) VALUES (1, 'alice', '10', 'x');
        INSERT INTO shares(expense_id, user_id, owed_amount) VALUES
            (1, 'alice', '5'), (1, 'bob', '5');
        "#,
    )
    .unwrap();
    assert!(check(&conn).unwrap().is_empty());
}

#[test]
fn rounding_drift_within_tolerance_is_ok() {
    let conn = setup();
    // 3 shares may each be off by a cent: 9.98 for a 10.00 expense passes
    conn.execute_batch(
        r#"
        INSERT INTO expenses(id, payer_id, amount, description) VALUES (1, 'alice', '10.00', 'x');
        INSERT INTO shares(expense_id, user_id, owed_amount) VALUES
            (1, 'alice', '3.33'), (1, 'bob', '3.33'), (1, 'alice', '3.32');
        "#,
    )
    .unwrap();
    assert!(check(&conn).unwrap().is_empty());
}

#[test]
fn large_drift_is_reported() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO expenses(id, payer_id, amount, description) VALUES (1, 'alice', '10.00', 'x');
        INSERT INTO shares(expense_id, user_id, owed_amount) VALUES (1, 'bob', '4.00');
        "#,
    )
    .unwrap();
    let rows = check(&conn).unwrap();
    assert!(rows.iter().any(|r| r[0] == "share_drift"));
}

#[test]
fn settled_expenses_are_not_checked_for_drift() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO expenses(id, payer_id, amount, description, is_settled, settled_at)
            VALUES (1, 'alice', '10.00', 'x', 1, datetime('now'));
        INSERT INTO shares(expense_id, user_id, owed_amount) VALUES (1, 'bob', '1.00');
        "#,
    )
    .unwrap();
    assert!(check(&conn).unwrap().is_empty());
}

#[test]
fn orphan_share_is_reported() {
    let conn = setup();
    // FK is enforced on new writes; emulate legacy data by switching it off
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = OFF;
        INSERT INTO shares(id, expense_id, user_id, owed_amount) VALUES (1, 42, 'bob', '5');
        "#,
    )
    .unwrap();
    let rows = check(&conn).unwrap();
    assert!(rows.iter().any(|r| r[0] == "orphan_share"));
}

#[test]
fn off_roster_ids_are_reported() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO expenses(id, payer_id, amount, description) VALUES (1, 'dave', '10', 'x');
        INSERT INTO shares(expense_id, user_id, owed_amount) VALUES (1, 'erin', '10');
        "#,
    )
    .unwrap();
    let rows = check(&conn).unwrap();
    let details: Vec<&str> = rows
        .iter()
        .filter(|r| r[0] == "off_roster")
        .map(|r| r[1].as_str())
        .collect();
    assert!(details.contains(&"dave"));
    assert!(details.contains(&"erin"));
}
