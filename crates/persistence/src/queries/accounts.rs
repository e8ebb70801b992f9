// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use hinanjo_domain::{Role, normalize_email};
use tracing::debug;

use crate::data_models::{AccountData, SessionData};
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;

/// Diesel Queryable struct for account rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct AccountRow {
    user_id: i64,
    name: String,
    email: String,
    password_hash: String,
    phone: Option<String>,
    address: Option<String>,
    shelter_id: Option<i64>,
    work_address: Option<String>,
    work_shelter_id: Option<i64>,
    role: String,
    created_at: String,
    last_login_at: Option<String>,
}

impl AccountRow {
    fn into_data(self) -> Result<AccountData, PersistenceError> {
        Ok(AccountData {
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            phone: self.phone,
            address: self.address,
            shelter_id: self.shelter_id,
            work_address: self.work_address,
            work_shelter_id: self.work_shelter_id,
            role: Role::parse(&self.role)?,
            created_at: self.created_at,
            last_login_at: self.last_login_at,
        })
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    user_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

/// Retrieves an account by email.
///
/// The email is normalized before lookup.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the account is not found.
pub fn get_account_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<AccountData>, PersistenceError> {
    let normalized: String = normalize_email(email);
    debug!("Looking up account by email: {}", normalized);

    users::table
        .filter(users::email.eq(&normalized))
        .select(AccountRow::as_select())
        .first(conn)
        .optional()?
        .map(AccountRow::into_data)
        .transpose()
}

/// Retrieves an account by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the account is not found.
pub fn get_account_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<AccountData>, PersistenceError> {
    debug!("Looking up account by ID: {}", user_id);

    users::table
        .filter(users::user_id.eq(user_id))
        .select(AccountRow::as_select())
        .first(conn)
        .optional()?
        .map(AccountRow::into_data)
        .transpose()
}

/// Lists accounts holding `role`, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_accounts_by_role(
    conn: &mut SqliteConnection,
    role: Role,
) -> Result<Vec<AccountData>, PersistenceError> {
    let rows: Vec<AccountRow> = users::table
        .filter(users::role.eq(role.as_str()))
        .order(users::user_id.asc())
        .select(AccountRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AccountRow::into_data).collect()
}

/// Counts accounts holding `role`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_accounts_by_role(
    conn: &mut SqliteConnection,
    role: Role,
) -> Result<i64, PersistenceError> {
    Ok(users::table
        .filter(users::role.eq(role.as_str()))
        .count()
        .get_result(conn)?)
}

/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    let row: Option<SessionRow> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(|row| SessionData {
        session_id: row.session_id,
        session_token: row.session_token,
        user_id: row.user_id,
        created_at: row.created_at,
        last_activity_at: row.last_activity_at,
        expires_at: row.expires_at,
    }))
}
