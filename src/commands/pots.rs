// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            conn.execute("INSERT INTO pots(name) VALUES (?1)", params![name])?;
            println!("Added pot '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare("SELECT name, created_at FROM pots ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, cr) = row?;
                data.push(vec![n, cr]);
            }
            println!("{}", pretty_table(&["Pot", "Created"], data));
        }
        _ => {}
    }
    Ok(())
}
