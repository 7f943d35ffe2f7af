// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use splitpot::{cli, commands, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("member", sub)) => commands::members::handle(&conn, sub)?,
        Some(("pot", sub)) => commands::pots::handle(&conn, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&mut conn, sub)?,
        Some(("balance", sub)) => commands::balances::handle(&conn, sub)?,
        Some(("settle", sub)) => commands::settle::handle(&mut conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
