// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `season`: Seasons, leagues, scheduler configuration and league selections
//! - `resources`: Teams, fields, umpires, availability rules and exclusions
//! - `games`: Games with their current placements
//! - `ledger`: Apply ledger lookups
//!
//! Every list is returned in ascending identifier order so problem specs
//! built from the same data are identical.

pub mod games;
pub mod ledger;
pub mod resources;
pub mod season;
