// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Emit pretty-printed JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Emit one JSON object per line"),
    )
}

fn pot_arg() -> Arg {
    Arg::new("pot")
        .long("pot")
        .help("Restrict to one pot (sub-ledger); default is the whole household")
}

pub fn build_cli() -> Command {
    Command::new("splitpot")
        .version(crate_version!())
        .about("Shared-household expense ledger, balances, and debt settlement")
        .subcommand(Command::new("init").about("Create the database if missing and print its path"))
        .subcommand(
            Command::new("member")
                .about("Manage the household roster")
                .subcommand(
                    Command::new("add")
                        .about("Add a member")
                        .arg(Arg::new("id").long("id").required(true).help("Stable member id"))
                        .arg(Arg::new("name").long("name").required(true).help("Display name")),
                )
                .subcommand(Command::new("list").about("List members"))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a member from the roster (ledger history is kept)")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("pot")
                .about("Manage pots (sub-ledgers)")
                .subcommand(
                    Command::new("add")
                        .about("Add a pot")
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(Command::new("list").about("List pots")),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and inspect expenses")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense with per-member owed shares")
                        .arg(Arg::new("payer").long("payer").required(true).help("Member id of whoever paid"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .required(true),
                        )
                        .arg(pot_arg())
                        .arg(
                            Arg::new("among")
                                .long("among")
                                .help("Comma-separated member ids; splits the amount equally"),
                        )
                        .arg(
                            Arg::new("share")
                                .long("share")
                                .action(ArgAction::Append)
                                .help("Explicit share as member=amount; repeatable"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List expenses (active only unless --all)")
                        .arg(pot_arg())
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include settled expenses"),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Soft-delete an expense (excluded from balances, history kept)")
                        .arg(Arg::new("id").long("id").required(true).value_parser(clap::value_parser!(i64))),
                ),
        )
        .subcommand(json_flags(
            Command::new("balance")
                .about("Show each member's paid / consumed / net position")
                .arg(pot_arg()),
        ))
        .subcommand(
            Command::new("settle")
                .about("Plan and record debt settlements")
                .subcommand(json_flags(
                    Command::new("plan")
                        .about("Suggest pairwise transfers that zero all balances")
                        .arg(pot_arg()),
                ))
                .subcommand(
                    Command::new("record")
                        .about("Record one transfer as a settlement expense")
                        .arg(Arg::new("from").long("from").required(true).help("Debtor member id"))
                        .arg(Arg::new("to").long("to").required(true).help("Creditor member id"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(pot_arg())
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .action(ArgAction::SetTrue)
                                .help("Actually write; without this the transfer is only printed"),
                        ),
                ),
        )
        .subcommand(
            Command::new("export").about("Export ledger data").subcommand(
                Command::new("expenses")
                    .about("Export expense/share rows")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include settled expenses"),
                    ),
            ),
        )
        .subcommand(Command::new("doctor").about("Report ledger inconsistencies without failing"))
}
