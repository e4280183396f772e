// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod ranking;
pub mod seed;

pub use ranking::{recompute_leaderboard, UserTotals};
pub use seed::{seed_database, SeedPlan, SeedSummary};
