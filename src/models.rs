// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pot {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub pot_id: Option<i64>,
    pub payer_id: String,
    pub amount: Decimal,
    pub description: String,
    pub is_settled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    pub expense_id: i64,
    pub user_id: String,
    pub owed_amount: Decimal,
}

/// A member's net position across active expenses. Positive `net` means the
/// household owes this member; negative means the member owes the household.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub user_id: String,
    pub name: String,
    pub paid: Decimal,
    pub consumed: Decimal,
    pub net: Decimal,
}

/// One proposed payment from a debtor to a creditor. Ephemeral until
/// recorded back into the ledger as a settlement expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementTransfer {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}
