// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stock, category and stock activity mutations.
//!
//! Every stock change writes its activity row in the same transaction, so the
//! log never disagrees with the stock table.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hinanjo_domain::{Stock, StockActivityKind};
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::ActivityEntry;
use crate::diesel_schema::{stock_activities, stock_categories, stocks};
use crate::error::{PersistenceError, is_unique_violation};
use crate::queries::stock::get_stock_by_id;

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = stocks)]
#[diesel(treat_none_as_null = true)]
struct StockValues<'a> {
    shelter_id: i64,
    category_id: Option<i64>,
    name: &'a str,
    quantity: i64,
    unit: &'a str,
    location: &'a str,
    note: &'a str,
    expiration_date: Option<&'a str>,
    condition: &'a str,
}

impl<'a> From<&'a Stock> for StockValues<'a> {
    fn from(stock: &'a Stock) -> Self {
        Self {
            shelter_id: stock.shelter_id,
            category_id: stock.category_id,
            name: &stock.name,
            quantity: stock.quantity,
            unit: &stock.unit,
            location: &stock.location,
            note: &stock.note,
            expiration_date: stock.expiration_date.as_deref(),
            condition: &stock.condition,
        }
    }
}

fn now_iso8601() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

fn record_activity(
    conn: &mut SqliteConnection,
    stock_id: i64,
    stock: &Stock,
    kind: StockActivityKind,
    entry: &ActivityEntry,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(stock_activities::table)
        .values((
            stock_activities::stock_id.eq(stock_id),
            stock_activities::stock_name.eq(&stock.name),
            stock_activities::shelter_id.eq(stock.shelter_id),
            stock_activities::user_id.eq(entry.user_id),
            stock_activities::kind.eq(kind.as_str()),
            stock_activities::description.eq(&entry.description),
            stock_activities::created_at.eq(now_iso8601()?),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Creates a stock item and logs an `added` activity.
///
/// # Errors
///
/// Returns a database error; a missing shelter or category surfaces as a
/// foreign key violation.
pub fn create_stock(
    conn: &mut SqliteConnection,
    stock: &Stock,
    entry: &ActivityEntry,
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        diesel::insert_into(stocks::table)
            .values(StockValues::from(stock))
            .execute(conn)?;
        let stock_id: i64 = get_last_insert_rowid(conn)?;
        record_activity(conn, stock_id, stock, StockActivityKind::Added, entry)?;

        info!(stock_id, shelter_id = stock.shelter_id, "Stock item created");
        Ok(stock_id)
    })
}

/// Replaces a stock item's fields and logs an `edited` activity.
///
/// # Errors
///
/// Returns `StockNotFound` or a database error.
pub fn update_stock(
    conn: &mut SqliteConnection,
    stock_id: i64,
    stock: &Stock,
    entry: &ActivityEntry,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let rows_affected: usize = diesel::update(stocks::table)
            .filter(stocks::stock_id.eq(stock_id))
            .set(StockValues::from(stock))
            .execute(conn)?;
        if rows_affected == 0 {
            return Err(PersistenceError::StockNotFound(stock_id));
        }
        record_activity(conn, stock_id, stock, StockActivityKind::Edited, entry)?;

        debug!(stock_id, "Stock item updated");
        Ok(())
    })
}

/// Deletes a stock item and logs a `deleted` activity.
///
/// The activity row keeps a snapshot of the item's ID, name and shelter.
///
/// # Errors
///
/// Returns `StockNotFound` or a database error.
pub fn delete_stock(
    conn: &mut SqliteConnection,
    stock_id: i64,
    entry: &ActivityEntry,
) -> Result<Stock, PersistenceError> {
    conn.transaction::<Stock, PersistenceError, _>(|conn| {
        let stock: Stock =
            get_stock_by_id(conn, stock_id)?.ok_or(PersistenceError::StockNotFound(stock_id))?;

        diesel::delete(stocks::table)
            .filter(stocks::stock_id.eq(stock_id))
            .execute(conn)?;
        record_activity(conn, stock_id, &stock, StockActivityKind::Deleted, entry)?;

        info!(stock_id, "Stock item deleted");
        Ok(stock)
    })
}

/// Creates a stock category.
///
/// # Errors
///
/// Returns `DuplicateCategoryName` or a database error.
pub fn create_category(conn: &mut SqliteConnection, name: &str) -> Result<i64, PersistenceError> {
    let name: &str = name.trim();
    diesel::insert_into(stock_categories::table)
        .values(stock_categories::name.eq(name))
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::DuplicateCategoryName(name.to_string())
            } else {
                PersistenceError::from(e)
            }
        })?;
    let category_id: i64 = get_last_insert_rowid(conn)?;
    info!(category_id, "Category created: {}", name);
    Ok(category_id)
}

/// Renames a stock category.
///
/// # Errors
///
/// Returns `CategoryNotFound`, `DuplicateCategoryName`, or a database error.
pub fn update_category(
    conn: &mut SqliteConnection,
    category_id: i64,
    name: &str,
) -> Result<(), PersistenceError> {
    let name: &str = name.trim();
    let rows_affected: usize = diesel::update(stock_categories::table)
        .filter(stock_categories::category_id.eq(category_id))
        .set(stock_categories::name.eq(name))
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::DuplicateCategoryName(name.to_string())
            } else {
                PersistenceError::from(e)
            }
        })?;
    if rows_affected == 0 {
        return Err(PersistenceError::CategoryNotFound(category_id));
    }
    Ok(())
}

/// Deletes a stock category. Stock in the category becomes uncategorized.
///
/// # Errors
///
/// Returns `CategoryNotFound` or a database error.
pub fn delete_category(
    conn: &mut SqliteConnection,
    category_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(stock_categories::table)
        .filter(stock_categories::category_id.eq(category_id))
        .execute(conn)?;
    if rows_affected == 0 {
        return Err(PersistenceError::CategoryNotFound(category_id));
    }
    info!(category_id, "Category deleted");
    Ok(())
}
