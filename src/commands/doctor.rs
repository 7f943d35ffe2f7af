// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{epsilon, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = check(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Ledger consistency report. Reports, never fails: drift and orphans are
/// absorbed by the read path, this is only for surfacing them.
pub fn check(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Shares not summing to their expense's amount. Tolerance is one cent
    //    per participant, matching what equal-split rounding can produce.
    let mut stmt = conn.prepare(
        "SELECT id, amount FROM expenses WHERE is_settled=0 ORDER BY id",
    )?;
    let mut stmt_s =
        conn.prepare("SELECT owed_amount FROM shares WHERE expense_id=?1")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let amount = parse_decimal(&r.get::<_, String>(1)?)?;
        let mut owed_sum = Decimal::ZERO;
        let mut n_shares: i64 = 0;
        let mut share_cur = stmt_s.query(rusqlite::params![id])?;
        while let Some(sr) = share_cur.next()? {
            owed_sum += parse_decimal(&sr.get::<_, String>(0)?)?;
            n_shares += 1;
        }
        let tolerance = epsilon() * Decimal::from(n_shares.max(1));
        let drift = (amount - owed_sum).abs();
        if drift > tolerance {
            rows.push(vec![
                "share_drift".into(),
                format!("expense #{}: amount {} vs shares {}", id, amount, owed_sum),
            ]);
        }
    }

    // 2) Shares whose expense is gone (pre-FK data, or external writes)
    let mut stmt2 = conn.prepare(
        "SELECT s.id, s.expense_id FROM shares s
         LEFT JOIN expenses e ON s.expense_id=e.id WHERE e.id IS NULL",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let sid: i64 = r.get(0)?;
        let eid: i64 = r.get(1)?;
        rows.push(vec![
            "orphan_share".into(),
            format!("share #{} references missing expense #{}", sid, eid),
        ]);
    }

    // 3) Ledger ids absent from the roster (departed members)
    let mut stmt3 = conn.prepare(
        "SELECT DISTINCT payer_id FROM expenses
         WHERE payer_id NOT IN (SELECT user_id FROM members)
         UNION
         SELECT DISTINCT user_id FROM shares
         WHERE user_id NOT IN (SELECT user_id FROM members)",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: String = r.get(0)?;
        rows.push(vec!["off_roster".into(), id]);
    }

    Ok(rows)
}
