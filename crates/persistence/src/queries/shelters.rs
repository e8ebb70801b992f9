// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shelter directory queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hinanjo_domain::{Coordinates, DomainError, HazardFlag, HazardFlags, Shelter};
use tracing::debug;

use crate::diesel_schema::{shelters, stocks};
use crate::error::PersistenceError;

/// Diesel Queryable struct for shelter rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = shelters)]
pub(crate) struct ShelterRow {
    shelter_id: i64,
    name: String,
    address: String,
    capacity: Option<i64>,
    hazard_flood: Option<i32>,
    hazard_landslide: Option<i32>,
    hazard_high_tide: Option<i32>,
    hazard_earthquake: Option<i32>,
    hazard_tsunami: Option<i32>,
    hazard_fire: Option<i32>,
    hazard_inland_flooding: Option<i32>,
    hazard_volcano: Option<i32>,
    latitude: f64,
    longitude: f64,
    altitude: Option<f64>,
    note: String,
}

impl ShelterRow {
    pub(crate) fn into_domain(self) -> Result<Shelter, PersistenceError> {
        let capacity: Option<u32> = self
            .capacity
            .map(|value| u32::try_from(value).map_err(|_| DomainError::InvalidCapacity(value)))
            .transpose()?;

        let hazards: HazardFlags = HazardFlags {
            flood: HazardFlag::from_db(self.hazard_flood)?,
            landslide: HazardFlag::from_db(self.hazard_landslide)?,
            high_tide: HazardFlag::from_db(self.hazard_high_tide)?,
            earthquake: HazardFlag::from_db(self.hazard_earthquake)?,
            tsunami: HazardFlag::from_db(self.hazard_tsunami)?,
            fire: HazardFlag::from_db(self.hazard_fire)?,
            inland_flooding: HazardFlag::from_db(self.hazard_inland_flooding)?,
            volcano: HazardFlag::from_db(self.hazard_volcano)?,
        };

        Ok(Shelter {
            shelter_id: Some(self.shelter_id),
            name: self.name,
            address: self.address,
            capacity,
            hazards,
            location: Coordinates::new(self.latitude, self.longitude)?,
            altitude: self.altitude,
            note: self.note,
        })
    }
}

/// Lists every shelter, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_shelters(conn: &mut SqliteConnection) -> Result<Vec<Shelter>, PersistenceError> {
    let rows: Vec<ShelterRow> = shelters::table
        .order(shelters::shelter_id.asc())
        .select(ShelterRow::as_select())
        .load(conn)?;

    debug!("Loaded {} shelters", rows.len());
    rows.into_iter().map(ShelterRow::into_domain).collect()
}

/// Lists only the names of every shelter.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_shelter_names(conn: &mut SqliteConnection) -> Result<Vec<String>, PersistenceError> {
    Ok(shelters::table.select(shelters::name).load(conn)?)
}

/// Retrieves a shelter by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the shelter is not found.
pub fn get_shelter_by_id(
    conn: &mut SqliteConnection,
    shelter_id: i64,
) -> Result<Option<Shelter>, PersistenceError> {
    debug!("Looking up shelter by ID: {}", shelter_id);

    shelters::table
        .filter(shelters::shelter_id.eq(shelter_id))
        .select(ShelterRow::as_select())
        .first(conn)
        .optional()?
        .map(ShelterRow::into_domain)
        .transpose()
}

/// Retrieves a shelter by its exact name.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the shelter is not found.
pub fn get_shelter_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<Shelter>, PersistenceError> {
    shelters::table
        .filter(shelters::name.eq(name))
        .select(ShelterRow::as_select())
        .first(conn)
        .optional()?
        .map(ShelterRow::into_domain)
        .transpose()
}

/// Counts stock rows held at a shelter.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_stock_for_shelter(
    conn: &mut SqliteConnection,
    shelter_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(stocks::table
        .filter(stocks::shelter_id.eq(shelter_id))
        .count()
        .get_result(conn)?)
}

/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_shelters(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(shelters::table.count().get_result(conn)?)
}
