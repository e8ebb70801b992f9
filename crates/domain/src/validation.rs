// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;
use time::macros::format_description;

use crate::error::DomainError;
use crate::types::{Shelter, Stock};

/// Validates that a shelter's basic field constraints are met.
///
/// This function checks that required fields are not empty.
/// It does NOT check for name uniqueness (that requires context).
///
/// # Errors
///
/// Returns an error if the name is blank or the altitude is not finite.
pub fn validate_shelter_fields(shelter: &Shelter) -> Result<(), DomainError> {
    if shelter.name.trim().is_empty() {
        return Err(DomainError::InvalidShelterName(String::from(
            "Name cannot be empty",
        )));
    }

    if let Some(altitude) = shelter.altitude
        && !altitude.is_finite()
    {
        return Err(DomainError::InvalidCoordinate {
            axis: "altitude",
            value: altitude.to_string(),
        });
    }

    Ok(())
}

/// Normalizes an email address for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates an email address after normalization.
///
/// Only the shape `local@domain.tld` is checked.
///
/// # Errors
///
/// Returns an error if the address is empty, contains whitespace, or lacks a
/// non-empty local part and dotted domain.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let normalized: String = normalize_email(email);
    if normalized.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }
    if normalized.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidEmail(format!(
            "'{normalized}' contains whitespace"
        )));
    }
    let Some((local, domain)) = normalized.split_once('@') else {
        return Err(DomainError::InvalidEmail(format!(
            "'{normalized}' is missing '@'"
        )));
    };
    if local.is_empty() || domain.contains('@') {
        return Err(DomainError::InvalidEmail(format!(
            "'{normalized}' is not a valid address"
        )));
    }
    let domain_ok: bool = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');
    if !domain_ok {
        return Err(DomainError::InvalidEmail(format!(
            "'{normalized}' has an invalid domain"
        )));
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the name is blank.
pub fn validate_account_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the name is blank.
pub fn validate_category_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidCategoryName(String::from(
            "Category name cannot be empty",
        )));
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` expiration date.
///
/// # Errors
///
/// Returns an error if the string is not a valid calendar date in that form.
pub fn parse_expiration_date(value: &str) -> Result<Date, DomainError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value.trim(), &format).map_err(|e| DomainError::InvalidExpirationDate {
        value: value.to_string(),
        error: e.to_string(),
    })
}

/// Validates a stock item's fields.
///
/// # Errors
///
/// Returns an error if the name is blank, the quantity is negative or the
/// expiration date is malformed.
pub fn validate_stock_fields(stock: &Stock) -> Result<(), DomainError> {
    if stock.name.trim().is_empty() {
        return Err(DomainError::InvalidStockName(String::from(
            "Stock name cannot be empty",
        )));
    }
    if stock.quantity < 0 {
        return Err(DomainError::InvalidQuantity(stock.quantity));
    }
    if let Some(date) = &stock.expiration_date {
        parse_expiration_date(date)?;
    }
    Ok(())
}
