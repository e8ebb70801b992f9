// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::hazard::HazardFlags;

/// A WGS-84 position in decimal degrees.
///
/// Construction validates both components, so any `Coordinates` value is
/// finite and in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Creates a new `Coordinates`.
    ///
    /// # Arguments
    ///
    /// * `latitude` - Degrees north, between -90 and 90 inclusive
    /// * `longitude` - Degrees east, between -180 and 180 inclusive
    ///
    /// # Errors
    ///
    /// Returns an error if either component is not finite or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidCoordinate {
                axis: "latitude",
                value: latitude.to_string(),
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinate {
                axis: "longitude",
                value: longitude.to_string(),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A disaster shelter.
///
/// `shelter_id` is `None` until the shelter has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelter {
    pub shelter_id: Option<i64>,
    pub name: String,
    pub address: String,
    /// Number of people the shelter can take. `None` when the source gave no
    /// usable figure.
    pub capacity: Option<u32>,
    pub hazards: HazardFlags,
    pub location: Coordinates,
    pub altitude: Option<f64>,
    pub note: String,
}

impl Shelter {
    /// Creates an unsaved shelter with unknown capacity, unknown hazard
    /// designations and no altitude or note.
    #[must_use]
    pub fn new(name: &str, address: &str, location: Coordinates) -> Self {
        Self {
            shelter_id: None,
            name: name.to_string(),
            address: address.to_string(),
            capacity: None,
            hazards: HazardFlags::default(),
            location,
            altitude: None,
            note: String::new(),
        }
    }

    /// Returns a copy carrying the given persisted identifier.
    #[must_use]
    pub fn with_id(mut self, shelter_id: i64) -> Self {
        self.shelter_id = Some(shelter_id);
        self
    }
}

/// Account roles for authorization.
///
/// Stored as a column on the account row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May manage shelters, stock, categories and other administrators.
    Admin,
    /// May manage only their own settings.
    User,
}

impl Role {
    /// Parses a role from its stored form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known role.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(DomainError::InvalidRole(format!("Unknown role: {s}"))),
        }
    }

    /// Returns the stored form of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "Admin"),
            Self::User => write!(f, "User"),
        }
    }
}

/// The type tag of a stock activity log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockActivityKind {
    Added,
    Edited,
    Deleted,
}

impl StockActivityKind {
    /// # Errors
    ///
    /// Returns an error if the string is not a known activity kind.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "added" => Ok(Self::Added),
            "edited" => Ok(Self::Edited),
            "deleted" => Ok(Self::Deleted),
            _ => Err(DomainError::InvalidActivityKind(format!(
                "Unknown activity kind: {s}"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Edited => "edited",
            Self::Deleted => "deleted",
        }
    }
}

/// A stock item held at a shelter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub stock_id: Option<i64>,
    pub shelter_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub location: String,
    pub note: String,
    /// Calendar date in `YYYY-MM-DD` form.
    pub expiration_date: Option<String>,
    pub condition: String,
}
