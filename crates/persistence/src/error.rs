// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hinanjo_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred. Carries the driver's message verbatim.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A stored row could not be mapped back into a domain value.
    CorruptRow(String),
    /// A shelter with this name already exists.
    DuplicateShelterName(String),
    /// An account with this email already exists.
    DuplicateEmail(String),
    /// A stock category with this name already exists.
    DuplicateCategoryName(String),
    /// The requested account was not found.
    AccountNotFound(i64),
    /// The requested shelter was not found.
    ShelterNotFound(i64),
    /// The requested stock category was not found.
    CategoryNotFound(i64),
    /// The requested stock item was not found.
    StockNotFound(i64),
    /// Shelter cannot be deleted because stock is still held there.
    ShelterReferenced { shelter_id: i64, stock_count: i64 },
    /// The only remaining administrator cannot lose the role.
    LastAdmin { user_id: i64 },
    /// Password hashing failed.
    PasswordHash(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::CorruptRow(msg) => write!(f, "Stored row is invalid: {msg}"),
            Self::DuplicateShelterName(name) => {
                write!(f, "Shelter '{name}' already exists")
            }
            Self::DuplicateEmail(email) => {
                write!(f, "An account with email '{email}' already exists")
            }
            Self::DuplicateCategoryName(name) => {
                write!(f, "Category '{name}' already exists")
            }
            Self::AccountNotFound(id) => write!(f, "Account not found: {id}"),
            Self::ShelterNotFound(id) => write!(f, "Shelter not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "Category not found: {id}"),
            Self::StockNotFound(id) => write!(f, "Stock item not found: {id}"),
            Self::ShelterReferenced {
                shelter_id,
                stock_count,
            } => {
                write!(
                    f,
                    "Shelter {shelter_id} cannot be deleted: {stock_count} stock item(s) still held there"
                )
            }
            Self::LastAdmin { user_id } => {
                write!(
                    f,
                    "Account {user_id} is the last administrator and cannot be demoted"
                )
            }
            Self::PasswordHash(msg) => write!(f, "Failed to hash password: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::CorruptRow(err.to_string())
    }
}

/// Returns true when `err` is a UNIQUE constraint violation.
pub(crate) const fn is_unique_violation(err: &diesel::result::Error) -> bool {
    matches!(
        err,
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        )
    )
}
