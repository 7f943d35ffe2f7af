// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(conn, sub),
        _ => Ok(()),
    }
}

fn export_expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let include_settled = sub.get_flag("all");

    let mut sql = String::from(
        "SELECT e.id, e.created_at, p.name as pot, e.payer_id, e.amount, e.description,
                s.user_id, s.owed_amount, e.is_settled
         FROM expenses e
         LEFT JOIN pots p ON e.pot_id=p.id
         LEFT JOIN shares s ON s.expense_id=e.id",
    );
    if !include_settled {
        sql.push_str(" WHERE e.is_settled=0");
    }
    sql.push_str(" ORDER BY e.id, s.id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<String>>(7)?,
            r.get::<_, bool>(8)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "expense_id",
                "created_at",
                "pot",
                "payer",
                "amount",
                "description",
                "share_member",
                "owed_amount",
                "settled",
            ])?;
            for row in rows {
                let (id, cr, pot, payer, amt, desc, su, owed, settled) = row?;
                wtr.write_record([
                    id.to_string(),
                    cr,
                    pot.unwrap_or_default(),
                    payer,
                    amt,
                    desc,
                    su.unwrap_or_default(),
                    owed.unwrap_or_default(),
                    settled.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (id, cr, pot, payer, amt, desc, su, owed, settled) = row?;
                items.push(json!({
                    "expense_id": id, "created_at": cr, "pot": pot, "payer": payer,
                    "amount": amt, "description": desc, "share_member": su,
                    "owed_amount": owed, "settled": settled
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported expenses to {}", out);
    Ok(())
}
