// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

/// One minor currency unit. Balances within this of zero count as settled;
/// it also absorbs cent drift from equal-split rounding.
pub fn epsilon() -> Decimal {
    Decimal::new(1, 2)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parse a money amount for the write path. Read-side computation tolerates
/// anything already in the store, but new records must be positive.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d <= Decimal::ZERO {
        anyhow::bail!("Amount must be positive, got '{}'", s);
    }
    Ok(d)
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn name_for_member(conn: &Connection, user_id: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT name FROM members WHERE user_id=?1")?;
    let name: Option<String> = stmt
        .query_row(params![user_id], |r| r.get(0))
        .optional()?;
    Ok(name)
}

pub fn require_member(conn: &Connection, user_id: &str) -> Result<String> {
    name_for_member(conn, user_id)?
        .with_context(|| format!("Member '{}' not found", user_id))
}

pub fn id_for_pot(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM pots WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Pot '{}' not found", name))?;
    Ok(id)
}

/// Resolve an optional `--pot` argument to a pot id filter.
pub fn pot_filter(conn: &Connection, sub: &clap::ArgMatches) -> Result<Option<i64>> {
    match sub.get_one::<String>("pot") {
        Some(name) => Ok(Some(id_for_pot(conn, name.trim())?)),
        None => Ok(None),
    }
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
