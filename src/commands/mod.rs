// Copyright (c) 2025 Splitpot Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod members;
pub mod pots;
pub mod expenses;
pub mod balances;
pub mod settle;
pub mod exporter;
pub mod doctor;
