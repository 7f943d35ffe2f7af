// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use splitpot::commands::settle::plan_settlements;
use splitpot::models::Balance;
use std::collections::BTreeMap;

fn balance(user_id: &str, net: &str) -> Balance {
    let net: Decimal = net.parse().unwrap();
    Balance {
        user_id: user_id.into(),
        name: user_id.into(),
        paid: if net > Decimal::ZERO { net } else { Decimal::ZERO },
        consumed: if net < Decimal::ZERO { -net } else { Decimal::ZERO },
        net,
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn single_creditor_two_debtors() {
    // A=+20, B=-10, C=-10 -> B and C each pay A 10
    let balances = vec![
        balance("alice", "20"),
        balance("bob", "-10"),
        balance("carol", "-10"),
    ];
    let plan = plan_settlements(&balances);
    assert_eq!(plan.len(), 2);
    for t in &plan {
        assert_eq!(t.to, "alice");
        assert_eq!(t.amount, dec("10"));
    }
    let froms: Vec<&str> = plan.iter().map(|t| t.from.as_str()).collect();
    assert!(froms.contains(&"bob") && froms.contains(&"carol"));
}

#[test]
fn largest_creditor_served_first() {
    // A=+15, B=+5, C=-20 -> C pays A 15, then B 5
    let balances = vec![
        balance("alice", "15"),
        balance("bob", "5"),
        balance("carol", "-20"),
    ];
    let plan = plan_settlements(&balances);
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].from, "carol");
    assert_eq!(plan[0].to, "alice");
    assert_eq!(plan[0].amount, dec("15"));
    assert_eq!(plan[1].from, "carol");
    assert_eq!(plan[1].to, "bob");
    assert_eq!(plan[1].amount, dec("5"));
}

#[test]
fn zero_balances_produce_empty_plan() {
    let balances = vec![balance("alice", "0"), balance("bob", "0")];
    assert!(plan_settlements(&balances).is_empty());
}

#[test]
fn empty_input_produces_empty_plan() {
    assert!(plan_settlements(&[]).is_empty());
}

#[test]
fn near_zero_members_never_appear() {
    // 0.01 either way counts as settled
    let balances = vec![
        balance("alice", "10"),
        balance("bob", "-10"),
        balance("carol", "0.01"),
        balance("dave", "-0.01"),
    ];
    let plan = plan_settlements(&balances);
    for t in &plan {
        assert_ne!(t.from, "carol");
        assert_ne!(t.to, "carol");
        assert_ne!(t.from, "dave");
        assert_ne!(t.to, "dave");
    }
}

#[test]
fn matched_pair_yields_single_exact_transfer() {
    let balances = vec![balance("alice", "42.50"), balance("bob", "-42.50")];
    let plan = plan_settlements(&balances);
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].from, "bob");
    assert_eq!(plan[0].to, "alice");
    assert_eq!(plan[0].amount, dec("42.50"));
}

#[test]
fn applying_plan_drives_all_balances_to_zero() {
    let balances = vec![
        balance("a", "33.40"),
        balance("b", "-12.15"),
        balance("c", "7.75"),
        balance("d", "-20.00"),
        balance("e", "-9.00"),
    ];
    let plan = plan_settlements(&balances);

    let mut nets: BTreeMap<String, Decimal> = balances
        .iter()
        .map(|b| (b.user_id.clone(), b.net))
        .collect();
    for t in &plan {
        assert!(t.amount > Decimal::ZERO);
        *nets.get_mut(&t.from).unwrap() += t.amount;
        *nets.get_mut(&t.to).unwrap() -= t.amount;
    }
    let eps = dec("0.01");
    for (id, net) in nets {
        assert!(net.abs() < eps, "{} left at {}", id, net);
    }
}

#[test]
fn residual_cent_from_rounded_split_is_forgiven() {
    // Drifted input where nets sum to -0.01: the leftover cent must not
    // produce a dangling transfer
    let balances = vec![
        balance("alice", "6.66"),
        balance("bob", "-3.33"),
        balance("carol", "-3.34"),
    ];
    let plan = plan_settlements(&balances);
    let total: Decimal = plan.iter().map(|t| t.amount).sum();
    assert_eq!(total, dec("6.66"));
    let mut nets: BTreeMap<&str, Decimal> =
        balances.iter().map(|b| (b.user_id.as_str(), b.net)).collect();
    for t in &plan {
        *nets.get_mut(t.from.as_str()).unwrap() += t.amount;
        *nets.get_mut(t.to.as_str()).unwrap() -= t.amount;
    }
    for (_, net) in nets {
        assert!(net.abs() <= dec("0.01"));
    }
}

#[test]
fn plan_is_deterministic_for_tied_balances() {
    let balances = vec![
        balance("zed", "-5"),
        balance("amy", "-5"),
        balance("pat", "10"),
    ];
    let first = plan_settlements(&balances);
    let second = plan_settlements(&balances);
    assert_eq!(first, second);
    // ties break by id: amy before zed
    assert_eq!(first[0].from, "amy");
    assert_eq!(first[1].from, "zed");
}
