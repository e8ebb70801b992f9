// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hinanjo_domain::{Role, normalize_email};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{AccountChanges, NewAccount};
use crate::diesel_schema::{sessions, users};
use crate::error::{PersistenceError, is_unique_violation};
use crate::queries::accounts::{count_accounts_by_role, get_account_by_id};

fn hash_password(password: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::PasswordHash(e.to_string()))
}

/// Creates a new account.
///
/// The email is normalized for case-insensitive uniqueness and the password
/// is hashed with bcrypt before it is stored.
///
/// # Errors
///
/// Returns `DuplicateEmail` if the email is taken, or a database error.
pub fn create_account(
    conn: &mut SqliteConnection,
    account: &NewAccount<'_>,
) -> Result<i64, PersistenceError> {
    let email: String = normalize_email(account.email);

    info!(
        "Creating account with email: {}, role: {}",
        email,
        account.role.as_str()
    );

    let password_hash: String = hash_password(account.password)?;

    diesel::insert_into(users::table)
        .values((
            users::name.eq(account.name.trim()),
            users::email.eq(&email),
            users::password_hash.eq(&password_hash),
            users::role.eq(account.role.as_str()),
            users::phone.eq(account.phone),
            users::address.eq(account.address),
        ))
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::DuplicateEmail(email.clone())
            } else {
                PersistenceError::from(e)
            }
        })?;

    let user_id: i64 = get_last_insert_rowid(conn)?;

    info!(user_id, "Account created");
    Ok(user_id)
}

/// Applies a partial update to an account.
///
/// # Errors
///
/// Returns `AccountNotFound` if no such account exists, `DuplicateEmail` if
/// the new email is taken, or a database error.
pub fn update_account(
    conn: &mut SqliteConnection,
    user_id: i64,
    changes: &AccountChanges,
) -> Result<(), PersistenceError> {
    if changes.is_empty() {
        return match get_account_by_id(conn, user_id)? {
            Some(_) => Ok(()),
            None => Err(PersistenceError::AccountNotFound(user_id)),
        };
    }

    let mut changes: AccountChanges = changes.clone();
    changes.email = changes.email.as_deref().map(normalize_email);

    debug!("Updating account ID: {}", user_id);

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(&changes)
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::DuplicateEmail(changes.email.clone().unwrap_or_default())
            } else {
                PersistenceError::from(e)
            }
        })?;

    if rows_affected == 0 {
        return Err(PersistenceError::AccountNotFound(user_id));
    }
    Ok(())
}

/// Replaces an account's password.
///
/// # Errors
///
/// Returns an error if the password cannot be hashed or the update fails.
pub fn update_password(
    conn: &mut SqliteConnection,
    user_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    info!("Updating password for account ID: {}", user_id);

    let password_hash: String = hash_password(new_password)?;

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::password_hash.eq(&password_hash))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::AccountNotFound(user_id));
    }
    Ok(())
}

/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    user_id: i64,
    now: &str,
) -> Result<(), PersistenceError> {
    diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::last_login_at.eq(now))
        .execute(conn)?;
    Ok(())
}

/// Changes an account's role.
///
/// Runs in a transaction so the last-administrator check and the update see
/// the same state.
///
/// # Errors
///
/// Returns `AccountNotFound`, `LastAdmin` when demoting the only remaining
/// administrator, or a database error.
pub fn set_role(
    conn: &mut SqliteConnection,
    user_id: i64,
    role: Role,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let account = get_account_by_id(conn, user_id)?
            .ok_or(PersistenceError::AccountNotFound(user_id))?;

        if account.role == Role::Admin
            && role != Role::Admin
            && count_accounts_by_role(conn, Role::Admin)? <= 1
        {
            return Err(PersistenceError::LastAdmin { user_id });
        }

        diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .set(users::role.eq(role.as_str()))
            .execute(conn)?;

        info!(user_id, role = role.as_str(), "Account role updated");
        Ok(())
    })
}

/// Creates a session.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating session for account ID: {} with expiration: {}",
        user_id, expires_at
    );

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;

    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
    now: &str,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(now))
        .execute(conn)?;
    Ok(())
}

/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    debug!("Deleting session by token");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;
    Ok(())
}

/// Deletes every session that expired before `now`.
///
/// `now` must use the same ISO 8601 layout the sessions were written with.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(now))
        .execute(conn)?;

    info!("Deleted {} expired sessions", rows_affected);
    Ok(rows_affected)
}
