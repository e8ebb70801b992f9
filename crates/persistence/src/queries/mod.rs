// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `accounts` — accounts and sessions
//! - `shelters` — the shelter directory
//! - `stock` — stock items, categories and the stock activity log

pub mod accounts;
pub mod shelters;
pub mod stock;
