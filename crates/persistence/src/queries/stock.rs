// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stock, category and stock activity queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hinanjo_domain::{Stock, StockActivityKind};
use tracing::debug;

use crate::data_models::{CategoryData, StockActivityData};
use crate::diesel_schema::{stock_activities, stock_categories, stocks};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = stocks)]
struct StockRow {
    stock_id: i64,
    shelter_id: i64,
    category_id: Option<i64>,
    name: String,
    quantity: i64,
    unit: String,
    location: String,
    note: String,
    expiration_date: Option<String>,
    condition: String,
}

impl From<StockRow> for Stock {
    fn from(row: StockRow) -> Self {
        Self {
            stock_id: Some(row.stock_id),
            shelter_id: row.shelter_id,
            category_id: row.category_id,
            name: row.name,
            quantity: row.quantity,
            unit: row.unit,
            location: row.location,
            note: row.note,
            expiration_date: row.expiration_date,
            condition: row.condition,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = stock_categories)]
struct CategoryRow {
    category_id: i64,
    name: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = stock_activities)]
struct StockActivityRow {
    activity_id: i64,
    stock_id: i64,
    stock_name: String,
    shelter_id: i64,
    user_id: Option<i64>,
    kind: String,
    description: String,
    created_at: String,
}

/// Lists all stock, grouped by shelter then ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_stocks(conn: &mut SqliteConnection) -> Result<Vec<Stock>, PersistenceError> {
    let rows: Vec<StockRow> = stocks::table
        .order((stocks::shelter_id.asc(), stocks::stock_id.asc()))
        .select(StockRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(Stock::from).collect())
}

/// Lists the stock held at one shelter.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_stocks_for_shelter(
    conn: &mut SqliteConnection,
    shelter_id: i64,
) -> Result<Vec<Stock>, PersistenceError> {
    debug!("Listing stock for shelter ID: {}", shelter_id);

    let rows: Vec<StockRow> = stocks::table
        .filter(stocks::shelter_id.eq(shelter_id))
        .order(stocks::stock_id.asc())
        .select(StockRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(Stock::from).collect())
}

/// Retrieves a stock item by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the stock item is not found.
pub fn get_stock_by_id(
    conn: &mut SqliteConnection,
    stock_id: i64,
) -> Result<Option<Stock>, PersistenceError> {
    let row: Option<StockRow> = stocks::table
        .filter(stocks::stock_id.eq(stock_id))
        .select(StockRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Stock::from))
}

/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_categories(conn: &mut SqliteConnection) -> Result<Vec<CategoryData>, PersistenceError> {
    let rows: Vec<CategoryRow> = stock_categories::table
        .order(stock_categories::name.asc())
        .select(CategoryRow::as_select())
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|row| CategoryData {
            category_id: row.category_id,
            name: row.name,
        })
        .collect())
}

/// Retrieves a category by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the category is not found.
pub fn get_category_by_id(
    conn: &mut SqliteConnection,
    category_id: i64,
) -> Result<Option<CategoryData>, PersistenceError> {
    let row: Option<CategoryRow> = stock_categories::table
        .filter(stock_categories::category_id.eq(category_id))
        .select(CategoryRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(|row| CategoryData {
        category_id: row.category_id,
        name: row.name,
    }))
}

/// Lists the activity log for one stock item, oldest first.
///
/// Works for stock items that have since been deleted.
///
/// # Errors
///
/// Returns an error if the database query fails or a row carries an
/// unknown activity kind.
pub fn list_activity_for_stock(
    conn: &mut SqliteConnection,
    stock_id: i64,
) -> Result<Vec<StockActivityData>, PersistenceError> {
    let rows: Vec<StockActivityRow> = stock_activities::table
        .filter(stock_activities::stock_id.eq(stock_id))
        .order(stock_activities::activity_id.asc())
        .select(StockActivityRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            Ok(StockActivityData {
                activity_id: row.activity_id,
                stock_id: row.stock_id,
                stock_name: row.stock_name,
                shelter_id: row.shelter_id,
                user_id: row.user_id,
                kind: StockActivityKind::parse(&row.kind)?,
                description: row.description,
                created_at: row.created_at,
            })
        })
        .collect()
}
