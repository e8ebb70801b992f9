// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shelter directory mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hinanjo_domain::Shelter;
use tracing::{debug, info, warn};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::shelters;
use crate::error::{PersistenceError, is_unique_violation};
use crate::queries::shelters::count_stock_for_shelter;

/// Column values for one shelter row.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = shelters)]
#[diesel(treat_none_as_null = true)]
struct ShelterValues<'a> {
    name: &'a str,
    address: &'a str,
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
    note: &'a str,
}

impl<'a> From<&'a Shelter> for ShelterValues<'a> {
    fn from(shelter: &'a Shelter) -> Self {
        Self {
            name: &shelter.name,
            address: &shelter.address,
            capacity: shelter.capacity.map(i64::from),
            hazard_flood: shelter.hazards.flood.to_db(),
            hazard_landslide: shelter.hazards.landslide.to_db(),
            hazard_high_tide: shelter.hazards.high_tide.to_db(),
            hazard_earthquake: shelter.hazards.earthquake.to_db(),
            hazard_tsunami: shelter.hazards.tsunami.to_db(),
            hazard_fire: shelter.hazards.fire.to_db(),
            hazard_inland_flooding: shelter.hazards.inland_flooding.to_db(),
            hazard_volcano: shelter.hazards.volcano.to_db(),
            latitude: shelter.location.latitude(),
            longitude: shelter.location.longitude(),
            altitude: shelter.altitude,
            note: &shelter.note,
        }
    }
}

fn insert_one(conn: &mut SqliteConnection, shelter: &Shelter) -> Result<i64, PersistenceError> {
    diesel::insert_into(shelters::table)
        .values(ShelterValues::from(shelter))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Inserts one shelter.
///
/// # Errors
///
/// Returns `DuplicateShelterName` if the name is taken, or a database error.
pub fn insert_shelter(
    conn: &mut SqliteConnection,
    shelter: &Shelter,
) -> Result<i64, PersistenceError> {
    info!("Creating shelter: {}", shelter.name);

    diesel::insert_into(shelters::table)
        .values(ShelterValues::from(shelter))
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::DuplicateShelterName(shelter.name.clone())
            } else {
                PersistenceError::from(e)
            }
        })?;

    let shelter_id: i64 = get_last_insert_rowid(conn)?;
    info!(shelter_id, "Shelter created");
    Ok(shelter_id)
}

/// Inserts a batch of shelters in a single transaction.
///
/// Either every shelter is committed or none is. On failure the driver's
/// error text is preserved unchanged in `PersistenceError::DatabaseError`.
///
/// # Errors
///
/// Returns the first database error encountered; the transaction is rolled
/// back before returning.
pub fn insert_shelters_atomically(
    conn: &mut SqliteConnection,
    batch: &[Shelter],
) -> Result<Vec<i64>, PersistenceError> {
    info!("Inserting {} shelters in one transaction", batch.len());

    let result: Result<Vec<i64>, PersistenceError> =
        conn.transaction::<Vec<i64>, PersistenceError, _>(|conn| {
            let mut ids: Vec<i64> = Vec::with_capacity(batch.len());
            for shelter in batch {
                ids.push(insert_one(conn, shelter)?);
            }
            Ok(ids)
        });

    match &result {
        Ok(ids) => info!("Committed {} shelters", ids.len()),
        Err(e) => warn!("Shelter batch rolled back: {e}"),
    }
    result
}

/// Replaces every stored field of a shelter.
///
/// # Errors
///
/// Returns `ShelterNotFound`, `DuplicateShelterName`, or a database error.
pub fn update_shelter(
    conn: &mut SqliteConnection,
    shelter_id: i64,
    shelter: &Shelter,
) -> Result<(), PersistenceError> {
    debug!("Updating shelter ID: {}", shelter_id);

    let rows_affected: usize = diesel::update(shelters::table)
        .filter(shelters::shelter_id.eq(shelter_id))
        .set(ShelterValues::from(shelter))
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::DuplicateShelterName(shelter.name.clone())
            } else {
                PersistenceError::from(e)
            }
        })?;

    if rows_affected == 0 {
        return Err(PersistenceError::ShelterNotFound(shelter_id));
    }
    Ok(())
}

/// Deletes a shelter.
///
/// Refused while stock is still held at the shelter. Accounts pointing at the
/// shelter have their pointer cleared by the schema.
///
/// # Errors
///
/// Returns `ShelterReferenced`, `ShelterNotFound`, or a database error.
pub fn delete_shelter(conn: &mut SqliteConnection, shelter_id: i64) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let stock_count: i64 = count_stock_for_shelter(conn, shelter_id)?;
        if stock_count > 0 {
            return Err(PersistenceError::ShelterReferenced {
                shelter_id,
                stock_count,
            });
        }

        let rows_affected: usize = diesel::delete(shelters::table)
            .filter(shelters::shelter_id.eq(shelter_id))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::ShelterNotFound(shelter_id));
        }

        info!(shelter_id, "Shelter deleted");
        Ok(())
    })
}
