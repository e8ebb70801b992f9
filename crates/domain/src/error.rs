// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Shelter name is empty or invalid.
    InvalidShelterName(String),
    /// A coordinate component is out of range or not finite.
    InvalidCoordinate {
        /// Which component was rejected (`latitude` or `longitude`).
        axis: &'static str,
        /// The rejected value, rendered for display.
        value: String,
    },
    /// A stored hazard flag holds a value other than NULL, 0 or 1.
    InvalidHazardFlag(i32),
    /// A stored capacity is negative.
    InvalidCapacity(i64),
    /// Role string is not recognised.
    InvalidRole(String),
    /// Stock activity kind is not recognised.
    InvalidActivityKind(String),
    /// Account display name is empty or invalid.
    InvalidName(String),
    /// Email address is malformed.
    InvalidEmail(String),
    /// Stock category name is empty or invalid.
    InvalidCategoryName(String),
    /// Stock item name is empty or invalid.
    InvalidStockName(String),
    /// Stock quantity is negative.
    InvalidQuantity(i64),
    /// Expiration date is not a `YYYY-MM-DD` calendar date.
    InvalidExpirationDate {
        /// The string that failed to parse.
        value: String,
        /// The parse error.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidShelterName(msg) => write!(f, "Invalid shelter name: {msg}"),
            Self::InvalidCoordinate { axis, value } => {
                write!(f, "Invalid {axis}: {value}")
            }
            Self::InvalidHazardFlag(value) => {
                write!(f, "Invalid hazard flag value {value}: expected 0, 1 or NULL")
            }
            Self::InvalidCapacity(value) => {
                write!(f, "Invalid capacity {value}: must not be negative")
            }
            Self::InvalidRole(msg) => write!(f, "Invalid role: {msg}"),
            Self::InvalidActivityKind(msg) => write!(f, "Invalid stock activity kind: {msg}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidCategoryName(msg) => write!(f, "Invalid category name: {msg}"),
            Self::InvalidStockName(msg) => write!(f, "Invalid stock name: {msg}"),
            Self::InvalidQuantity(value) => {
                write!(f, "Invalid quantity {value}: must not be negative")
            }
            Self::InvalidExpirationDate { value, error } => {
                write!(f, "Invalid expiration date '{value}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
