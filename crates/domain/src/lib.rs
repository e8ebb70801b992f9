// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod capacity;
mod error;
mod geodesy;
mod hazard;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use capacity::extract_capacity;
pub use error::DomainError;
pub use geodesy::{NearestShelter, geodesic_distance_km, nearest_shelter};
pub use hazard::{HazardFlag, HazardFlags, HazardKind};
pub use types::{Coordinates, Role, Shelter, Stock, StockActivityKind};
pub use validation::{
    normalize_email, parse_expiration_date, validate_account_name, validate_category_name,
    validate_email, validate_shelter_fields, validate_stock_fields,
};
