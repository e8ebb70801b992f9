// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `accounts` — accounts, roles and sessions
//! - `shelters` — the shelter directory, including atomic batch import
//! - `stock` — stock items, categories and the activity log
//!
//! `last_insert_rowid()` comes from the `backend` module; everything else is
//! Diesel DSL.

pub mod accounts;
pub mod shelters;
pub mod stock;
