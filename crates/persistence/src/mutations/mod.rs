// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! ## Module Organization
//!
//! - `schedule`: Game placements and umpire crews
//! - `ledger`: Apply ledger claims
//! - `config`: Scheduler configuration and league selections
//! - `seed`: Inserting the entities the scheduler reads
//!
//! None of these functions open a transaction. Callers that need several
//! writes to land together run them inside one.

pub mod config;
pub mod ledger;
pub mod schedule;
pub mod seed;
