// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::members::roster;
use crate::models::{Balance, Expense, Member, Share};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pot_filter, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let pot_id = pot_filter(conn, sub)?;

    let members = roster(conn)?;
    let (expenses, shares) = active_ledger(conn, pot_id)?;
    let balances = compute_balances(&members, &expenses, &shares);

    if !maybe_print_json(json_flag, jsonl_flag, &balances)? {
        let rows: Vec<Vec<String>> = balances
            .iter()
            .map(|b| {
                vec![
                    b.user_id.clone(),
                    b.name.clone(),
                    fmt_money(&b.paid),
                    fmt_money(&b.consumed),
                    fmt_money(&b.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Name", "Paid", "Consumed", "Net"], rows)
        );
    }
    Ok(())
}

/// Fetch the active (unsettled) slice of the ledger, optionally restricted
/// to one pot, with the shares belonging to those expenses.
pub fn active_ledger(
    conn: &Connection,
    pot_id: Option<i64>,
) -> Result<(Vec<Expense>, Vec<Share>)> {
    let mut sql = String::from(
        "SELECT id, pot_id, payer_id, amount, description, is_settled
         FROM expenses WHERE is_settled=0",
    );
    if pot_id.is_some() {
        sql.push_str(" AND pot_id=?1");
    }
    sql.push_str(" ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let map_row = |r: &rusqlite::Row<'_>| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, Option<i64>>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, bool>(5)?,
        ))
    };
    let mut expenses = Vec::new();
    let raw: Vec<_> = if let Some(pid) = pot_id {
        stmt.query_map(params![pid], map_row)?.collect::<rusqlite::Result<_>>()?
    } else {
        stmt.query_map([], map_row)?.collect::<rusqlite::Result<_>>()?
    };
    for (id, pot_id, payer_id, amount, description, is_settled) in raw {
        expenses.push(Expense {
            id,
            pot_id,
            payer_id,
            amount: parse_decimal(&amount)?,
            description,
            is_settled,
        });
    }

    let mut stmt_s = conn.prepare(
        "SELECT s.expense_id, s.user_id, s.owed_amount
         FROM shares s JOIN expenses e ON s.expense_id=e.id
         WHERE e.is_settled=0 ORDER BY s.id",
    )?;
    let mut shares = Vec::new();
    let mut cur = stmt_s.query([])?;
    let wanted: std::collections::HashSet<i64> = expenses.iter().map(|e| e.id).collect();
    while let Some(r) = cur.next()? {
        let expense_id: i64 = r.get(0)?;
        if !wanted.contains(&expense_id) {
            continue;
        }
        let user_id: String = r.get(1)?;
        let owed: String = r.get(2)?;
        shares.push(Share {
            expense_id,
            user_id,
            owed_amount: parse_decimal(&owed)?,
        });
    }
    Ok((expenses, shares))
}

/// Net balance per member: total paid minus total consumed over the given
/// (already filtered) ledger slice. Roster members always get an entry, even
/// with no transactions; ids seen only in the ledger (members who have left
/// the household) get one too, named after the raw id. Pure; no validation of
/// drift between an expense and its shares, that is the write path's job.
pub fn compute_balances(
    members: &[Member],
    expenses: &[Expense],
    shares: &[Share],
) -> Vec<Balance> {
    struct Acc {
        name: Option<String>,
        paid: Decimal,
        consumed: Decimal,
    }
    impl Default for Acc {
        fn default() -> Self {
            Acc {
                name: None,
                paid: Decimal::ZERO,
                consumed: Decimal::ZERO,
            }
        }
    }

    let mut acc: BTreeMap<String, Acc> = BTreeMap::new();
    for m in members {
        acc.entry(m.user_id.clone()).or_default().name = Some(m.name.clone());
    }
    for e in expenses {
        acc.entry(e.payer_id.clone()).or_default().paid += e.amount;
    }
    for s in shares {
        acc.entry(s.user_id.clone()).or_default().consumed += s.owed_amount;
    }

    acc.into_iter()
        .map(|(user_id, a)| Balance {
            name: a.name.unwrap_or_else(|| user_id.clone()),
            paid: a.paid,
            consumed: a.consumed,
            net: a.paid - a.consumed,
            user_id,
        })
        .collect()
}
