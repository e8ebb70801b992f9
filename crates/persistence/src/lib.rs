// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Hinanjo shelter service.
//!
//! Stores accounts, sessions, shelters, stock, stock categories and the stock
//! activity log in `SQLite` through Diesel. Migrations are embedded and run
//! on every connection open.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` hands out a fresh shared-cache in-memory
//! database per call, so tests never see each other's rows.

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

use diesel::SqliteConnection;
use hinanjo_domain::{Role, Shelter, Stock};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use backend::sqlite::MIGRATIONS;
pub use data_models::{
    AccountChanges, AccountData, ActivityEntry, CategoryData, NewAccount, SessionData,
    StockActivityData,
};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_hinanjo_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Accounts & Sessions
    // ========================================================================

    /// Creates an account. The password is hashed before storage.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` or a database error.
    pub fn create_account(&mut self, account: &NewAccount<'_>) -> Result<i64, PersistenceError> {
        mutations::accounts::create_account(&mut self.conn, account)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_email(&mut self.conn, email)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account_by_id(
        &mut self,
        user_id: i64,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_id(&mut self.conn, user_id)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_accounts_by_role(&mut self, role: Role) -> Result<Vec<AccountData>, PersistenceError> {
        queries::accounts::list_accounts_by_role(&mut self.conn, role)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_admins(&mut self) -> Result<i64, PersistenceError> {
        queries::accounts::count_accounts_by_role(&mut self.conn, Role::Admin)
    }

    /// Applies a partial update to an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `DuplicateEmail`, or a database error.
    pub fn update_account(
        &mut self,
        user_id: i64,
        changes: &AccountChanges,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::update_account(&mut self.conn, user_id, changes)
    }

    /// Checks a plain-text password against the account's stored bcrypt hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored hash is malformed.
    pub fn verify_password(account: &AccountData, password: &str) -> Result<bool, PersistenceError> {
        bcrypt::verify(password, &account.password_hash)
            .map_err(|e| PersistenceError::PasswordHash(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns an error if hashing or the update fails.
    pub fn update_password(
        &mut self,
        user_id: i64,
        new_password: &str,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::update_password(&mut self.conn, user_id, new_password)
    }

    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_last_login(&mut self, user_id: i64, now: &str) -> Result<(), PersistenceError> {
        mutations::accounts::update_last_login(&mut self.conn, user_id, now)
    }

    /// Changes an account's role, refusing to demote the last administrator.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `LastAdmin`, or a database error.
    pub fn set_role(&mut self, user_id: i64, role: Role) -> Result<(), PersistenceError> {
        mutations::accounts::set_role(&mut self.conn, user_id, role)
    }

    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::accounts::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::accounts::get_session_by_token(&mut self.conn, session_token)
    }

    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(
        &mut self,
        session_id: i64,
        now: &str,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::update_session_activity(&mut self.conn, session_id, now)
    }

    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::accounts::delete_session(&mut self.conn, session_token)
    }

    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::accounts::delete_expired_sessions(&mut self.conn, now)
    }

    // ========================================================================
    // Shelters
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn list_shelters(&mut self) -> Result<Vec<Shelter>, PersistenceError> {
        queries::shelters::list_shelters(&mut self.conn)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_shelter_names(&mut self) -> Result<Vec<String>, PersistenceError> {
        queries::shelters::list_shelter_names(&mut self.conn)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn get_shelter_by_id(&mut self, shelter_id: i64) -> Result<Option<Shelter>, PersistenceError> {
        queries::shelters::get_shelter_by_id(&mut self.conn, shelter_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn get_shelter_by_name(&mut self, name: &str) -> Result<Option<Shelter>, PersistenceError> {
        queries::shelters::get_shelter_by_name(&mut self.conn, name)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_shelters(&mut self) -> Result<i64, PersistenceError> {
        queries::shelters::count_shelters(&mut self.conn)
    }

    /// # Errors
    ///
    /// Returns `DuplicateShelterName` or a database error.
    pub fn create_shelter(&mut self, shelter: &Shelter) -> Result<i64, PersistenceError> {
        mutations::shelters::insert_shelter(&mut self.conn, shelter)
    }

    /// Inserts every shelter in `batch` in one transaction, or none of them.
    ///
    /// # Errors
    ///
    /// Returns the first database error; nothing from the batch is committed.
    pub fn insert_shelters_atomically(
        &mut self,
        batch: &[Shelter],
    ) -> Result<Vec<i64>, PersistenceError> {
        mutations::shelters::insert_shelters_atomically(&mut self.conn, batch)
    }

    /// # Errors
    ///
    /// Returns `ShelterNotFound`, `DuplicateShelterName`, or a database error.
    pub fn update_shelter(
        &mut self,
        shelter_id: i64,
        shelter: &Shelter,
    ) -> Result<(), PersistenceError> {
        mutations::shelters::update_shelter(&mut self.conn, shelter_id, shelter)
    }

    /// # Errors
    ///
    /// Returns `ShelterReferenced`, `ShelterNotFound`, or a database error.
    pub fn delete_shelter(&mut self, shelter_id: i64) -> Result<(), PersistenceError> {
        mutations::shelters::delete_shelter(&mut self.conn, shelter_id)
    }

    // ========================================================================
    // Stock & Categories
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_stocks(&mut self) -> Result<Vec<Stock>, PersistenceError> {
        queries::stock::list_stocks(&mut self.conn)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_stocks_for_shelter(&mut self, shelter_id: i64) -> Result<Vec<Stock>, PersistenceError> {
        queries::stock::list_stocks_for_shelter(&mut self.conn, shelter_id)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_stock_by_id(&mut self, stock_id: i64) -> Result<Option<Stock>, PersistenceError> {
        queries::stock::get_stock_by_id(&mut self.conn, stock_id)
    }

    /// Creates a stock item and logs the `added` activity atomically.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub fn create_stock(
        &mut self,
        stock: &Stock,
        entry: &ActivityEntry,
    ) -> Result<i64, PersistenceError> {
        mutations::stock::create_stock(&mut self.conn, stock, entry)
    }

    /// Updates a stock item and logs the `edited` activity atomically.
    ///
    /// # Errors
    ///
    /// Returns `StockNotFound` or a database error.
    pub fn update_stock(
        &mut self,
        stock_id: i64,
        stock: &Stock,
        entry: &ActivityEntry,
    ) -> Result<(), PersistenceError> {
        mutations::stock::update_stock(&mut self.conn, stock_id, stock, entry)
    }

    /// Deletes a stock item and logs the `deleted` activity atomically.
    /// Returns the removed item.
    ///
    /// # Errors
    ///
    /// Returns `StockNotFound` or a database error.
    pub fn delete_stock(
        &mut self,
        stock_id: i64,
        entry: &ActivityEntry,
    ) -> Result<Stock, PersistenceError> {
        mutations::stock::delete_stock(&mut self.conn, stock_id, entry)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or a row is invalid.
    pub fn list_activity_for_stock(
        &mut self,
        stock_id: i64,
    ) -> Result<Vec<StockActivityData>, PersistenceError> {
        queries::stock::list_activity_for_stock(&mut self.conn, stock_id)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_categories(&mut self) -> Result<Vec<CategoryData>, PersistenceError> {
        queries::stock::list_categories(&mut self.conn)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_category_by_id(
        &mut self,
        category_id: i64,
    ) -> Result<Option<CategoryData>, PersistenceError> {
        queries::stock::get_category_by_id(&mut self.conn, category_id)
    }

    /// # Errors
    ///
    /// Returns `DuplicateCategoryName` or a database error.
    pub fn create_category(&mut self, name: &str) -> Result<i64, PersistenceError> {
        mutations::stock::create_category(&mut self.conn, name)
    }

    /// # Errors
    ///
    /// Returns `CategoryNotFound`, `DuplicateCategoryName`, or a database error.
    pub fn update_category(&mut self, category_id: i64, name: &str) -> Result<(), PersistenceError> {
        mutations::stock::update_category(&mut self.conn, category_id, name)
    }

    /// # Errors
    ///
    /// Returns `CategoryNotFound` or a database error.
    pub fn delete_category(&mut self, category_id: i64) -> Result<(), PersistenceError> {
        mutations::stock::delete_category(&mut self.conn, category_id)
    }
}
