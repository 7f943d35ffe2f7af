// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Member;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user_id = sub.get_one::<String>("id").unwrap().trim().to_string();
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            conn.execute(
                "INSERT INTO members(user_id, name) VALUES (?1, ?2)",
                params![user_id, name],
            )?;
            println!("Added member '{}' ({})", name, user_id);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for m in roster(conn)? {
                data.push(vec![m.user_id, m.name]);
            }
            println!("{}", pretty_table(&["Id", "Name"], data));
        }
        Some(("rm", sub)) => {
            let user_id = sub.get_one::<String>("id").unwrap().trim();
            // Only the roster row goes; expenses and shares under this id stay
            // and keep feeding historical balances.
            conn.execute("DELETE FROM members WHERE user_id=?1", params![user_id])?;
            println!("Removed member '{}' (ledger history kept)", user_id);
        }
        _ => {}
    }
    Ok(())
}

pub fn roster(conn: &Connection) -> Result<Vec<Member>> {
    let mut stmt = conn.prepare("SELECT id, user_id, name FROM members ORDER BY user_id")?;
    let rows = stmt.query_map([], |r| {
        Ok(Member {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
