// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::balances::{active_ledger, compute_balances};
use crate::commands::members::roster;
use crate::models::{Balance, SettlementTransfer};
use crate::utils::{epsilon, fmt_money, maybe_print_json, parse_amount, pot_filter, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("plan", sub)) => plan(conn, sub)?,
        Some(("record", sub)) => record(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn plan(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let pot_id = pot_filter(conn, sub)?;

    let members = roster(conn)?;
    let (expenses, shares) = active_ledger(conn, pot_id)?;
    let balances = compute_balances(&members, &expenses, &shares);
    let transfers = plan_settlements(&balances);

    if !maybe_print_json(json_flag, jsonl_flag, &transfers)? {
        if transfers.is_empty() {
            println!("All balances settled, nothing to transfer");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = transfers
            .iter()
            .map(|t| vec![t.from.clone(), t.to.clone(), fmt_money(&t.amount)])
            .collect();
        println!("{}", pretty_table(&["From", "To", "Amount"], rows));
        println!("Record a transfer with: splitpot settle record --from <id> --to <id> --amount <amount> --yes");
    }
    Ok(())
}

/// Greedy largest-debtor/largest-creditor matching. Walks the sorted debtor
/// and creditor lists with two cursors, always transferring
/// min(|debt|, credit) between the current pair. Not guaranteed minimal in
/// adversarial cases (that problem is NP-hard), but households are single
/// digits and the greedy plan is easy to audit.
pub fn plan_settlements(balances: &[Balance]) -> Vec<SettlementTransfer> {
    let eps = epsilon();
    let mut debtors: Vec<(String, rust_decimal::Decimal)> = balances
        .iter()
        .filter(|b| b.net < -eps)
        .map(|b| (b.user_id.clone(), b.net))
        .collect();
    let mut creditors: Vec<(String, rust_decimal::Decimal)> = balances
        .iter()
        .filter(|b| b.net > eps)
        .map(|b| (b.user_id.clone(), b.net))
        .collect();
    // Most negative debtor first, largest creditor first; ids break ties so
    // the plan is deterministic.
    debtors.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    creditors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < debtors.len() && j < creditors.len() {
        let amount = debtors[i].1.abs().min(creditors[j].1);
        transfers.push(SettlementTransfer {
            from: debtors[i].0.clone(),
            to: creditors[j].0.clone(),
            amount,
        });
        debtors[i].1 += amount;
        creditors[j].1 -= amount;
        if debtors[i].1.abs() < eps {
            i += 1;
        }
        if creditors[j].1 < eps {
            j += 1;
        }
    }
    transfers
}

fn record(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let from = sub.get_one::<String>("from").unwrap().trim().to_string();
    let to = sub.get_one::<String>("to").unwrap().trim().to_string();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap().trim())?;
    let pot_id = pot_filter(conn, sub)?;

    if from == to {
        anyhow::bail!("Cannot settle '{}' against themselves", from);
    }
    if !sub.get_flag("yes") {
        println!(
            "Would record: {} pays {} to {} (dry run, pass --yes to write)",
            from,
            fmt_money(&amount),
            to
        );
        return Ok(());
    }

    let expense_id = record_settlement(conn, &from, &to, amount, pot_id)?;
    println!(
        "Recorded settlement #{}: {} paid {} to {}",
        expense_id,
        from,
        fmt_money(&amount),
        to
    );
    Ok(())
}

/// Fold a transfer back into the ledger: one expense paid by the debtor with
/// a single share owed by the creditor, which raises the debtor's net by
/// `amount` and lowers the creditor's by the same, cancelling the debt. Both
/// inserts run in one transaction so a failed write leaves no partial state.
pub fn record_settlement(
    conn: &mut Connection,
    from: &str,
    to: &str,
    amount: rust_decimal::Decimal,
    pot_id: Option<i64>,
) -> Result<i64> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO expenses(pot_id, payer_id, amount, description) VALUES (?1, ?2, ?3, 'Settlement')",
        params![pot_id, from, amount.to_string()],
    )?;
    let expense_id = tx.last_insert_rowid();
    tx.execute(
        "INSERT INTO shares(expense_id, user_id, owed_amount) VALUES (?1, ?2, ?3)",
        params![expense_id, to, amount.to_string()],
    )?;
    tx.commit()?;
    Ok(expense_id)
}
