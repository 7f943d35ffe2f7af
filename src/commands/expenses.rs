// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, pot_filter, pretty_table, require_member,
};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let payer = sub.get_one::<String>("payer").unwrap().trim().to_string();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap().trim())?;
    let description = sub
        .get_one::<String>("description")
        .unwrap()
        .trim()
        .to_string();
    let pot_id = pot_filter(conn, sub)?;
    require_member(conn, &payer)?;

    let among = sub.get_one::<String>("among");
    let explicit: Vec<&String> = sub
        .get_many::<String>("share")
        .map(|v| v.collect())
        .unwrap_or_default();

    let shares: Vec<(String, Decimal)> = match (among, explicit.is_empty()) {
        (Some(_), false) | (None, true) => {
            anyhow::bail!("Provide exactly one of --among or --share")
        }
        (Some(list), true) => {
            let ids: Vec<String> = list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if ids.is_empty() {
                anyhow::bail!("--among needs at least one member id");
            }
            for id in &ids {
                require_member(conn, id)?;
            }
            let amounts = equal_split(amount, ids.len());
            ids.into_iter().zip(amounts).collect()
        }
        (None, false) => {
            let mut out = Vec::new();
            for s in explicit {
                let (id, amt) = s
                    .split_once('=')
                    .with_context(|| format!("Invalid share '{}', expected member=amount", s))?;
                let id = id.trim().to_string();
                require_member(conn, &id)?;
                out.push((id, parse_amount(amt.trim())?));
            }
            out
        }
    };

    let expense_id = add_expense(conn, pot_id, &payer, amount, &description, &shares)?;
    println!(
        "Recorded expense #{}: {} paid {} for '{}' ({} share(s))",
        expense_id,
        payer,
        fmt_money(&amount),
        description,
        shares.len()
    );
    Ok(())
}

/// Split an amount equally across `n` participants, cent-exact: every
/// participant gets the truncated-to-cents quotient and the last one absorbs
/// the remainder, so 10.00 over 3 becomes 3.33, 3.33, 3.34.
pub fn equal_split(amount: Decimal, n: usize) -> Vec<Decimal> {
    let count = Decimal::from(n as u64);
    let base = (amount / count).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let mut out = vec![base; n];
    out[n - 1] = amount - base * Decimal::from((n - 1) as u64);
    out
}

/// Insert an expense and its shares in a single transaction, so a partial
/// write can never leave the ledger unbalanced.
pub fn add_expense(
    conn: &mut Connection,
    pot_id: Option<i64>,
    payer: &str,
    amount: Decimal,
    description: &str,
    shares: &[(String, Decimal)],
) -> Result<i64> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO expenses(pot_id, payer_id, amount, description) VALUES (?1, ?2, ?3, ?4)",
        params![pot_id, payer, amount.to_string(), description],
    )?;
    let expense_id = tx.last_insert_rowid();
    for (user_id, owed) in shares {
        tx.execute(
            "INSERT INTO shares(expense_id, user_id, owed_amount) VALUES (?1, ?2, ?3)",
            params![expense_id, user_id, owed.to_string()],
        )?;
    }
    tx.commit()?;
    Ok(expense_id)
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    // The is_settled guard doubles as an optimistic-concurrency check: two
    // racing rm calls cannot both resolve the same expense.
    let updated = conn.execute(
        "UPDATE expenses SET is_settled=1, settled_at=datetime('now')
         WHERE id=?1 AND is_settled=0",
        params![id],
    )?;
    if updated == 0 {
        anyhow::bail!("Expense #{} not found or already settled", id);
    }
    println!("Settled expense #{} (excluded from future balances)", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.created_at.clone(),
                    r.pot.clone(),
                    r.payer.clone(),
                    r.amount.clone(),
                    r.description.clone(),
                    if r.settled { "yes".into() } else { "".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Created", "Pot", "Payer", "Amount", "Description", "Settled"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub created_at: String,
    pub pot: String,
    pub payer: String,
    pub amount: String,
    pub description: String,
    pub settled: bool,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRow>> {
    let mut sql = String::from(
        "SELECT e.id, e.created_at, p.name, e.payer_id, m.name, e.amount, e.description, e.is_settled
         FROM expenses e
         LEFT JOIN pots p ON e.pot_id=p.id
         LEFT JOIN members m ON e.payer_id=m.user_id
         WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if !sub.get_flag("all") {
        sql.push_str(" AND e.is_settled=0");
    }
    if let Some(pot_id) = pot_filter(conn, sub)? {
        sql.push_str(" AND e.pot_id=?");
        params_vec.push(pot_id.to_string());
    }
    sql.push_str(" ORDER BY e.created_at DESC, e.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let created_at: String = r.get(1)?;
        let pot: Option<String> = r.get(2)?;
        let payer_id: String = r.get(3)?;
        let payer_name: Option<String> = r.get(4)?;
        let amount: String = r.get(5)?;
        let description: String = r.get(6)?;
        let settled: bool = r.get(7)?;
        data.push(ExpenseRow {
            id,
            created_at,
            pot: pot.unwrap_or_default(),
            payer: payer_name.unwrap_or(payer_id),
            amount,
            description,
            settled,
        });
    }
    Ok(data)
}
