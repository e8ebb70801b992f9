// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use hinanjo_domain::DomainError;
use hinanjo_persistence::PersistenceError;

use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the API
/// contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An uploaded table could not be decoded or lacks required columns.
    InvalidCsvFormat {
        /// Why the upload was rejected.
        reason: String,
    },
    /// A shelter import was rolled back.
    ImportFailed {
        /// The underlying error text, unchanged.
        reason: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidCsvFormat { reason } => write!(f, "Invalid CSV upload: {reason}"),
            Self::ImportFailed { reason } => write!(f, "Shelter import failed: {reason}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let field: &str = match &err {
        DomainError::InvalidShelterName(_) => "name",
        DomainError::InvalidCoordinate { axis, .. } => axis,
        DomainError::InvalidHazardFlag(_) => "hazards",
        DomainError::InvalidCapacity(_) => "capacity",
        DomainError::InvalidRole(_) => "role",
        DomainError::InvalidActivityKind(_) => "kind",
        DomainError::InvalidName(_) => "name",
        DomainError::InvalidEmail(_) => "email",
        DomainError::InvalidCategoryName(_) => "category_name",
        DomainError::InvalidStockName(_) => "stock_name",
        DomainError::InvalidQuantity(_) => "quantity",
        DomainError::InvalidExpirationDate { .. } => "expiration_date",
    };
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a persistence error into an API error.
///
/// Uniqueness and reference violations become rule violations, missing rows
/// become not-found, and everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DuplicateShelterName(_) => ApiError::DomainRuleViolation {
            rule: String::from("unique_shelter_name"),
            message: err.to_string(),
        },
        PersistenceError::DuplicateEmail(_) => ApiError::DomainRuleViolation {
            rule: String::from("unique_email"),
            message: err.to_string(),
        },
        PersistenceError::DuplicateCategoryName(_) => ApiError::DomainRuleViolation {
            rule: String::from("unique_category_name"),
            message: err.to_string(),
        },
        PersistenceError::ShelterReferenced { .. } => ApiError::DomainRuleViolation {
            rule: String::from("shelter_has_stock"),
            message: err.to_string(),
        },
        PersistenceError::LastAdmin { .. } => ApiError::DomainRuleViolation {
            rule: String::from("last_admin"),
            message: err.to_string(),
        },
        PersistenceError::AccountNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Account"),
            message: err.to_string(),
        },
        PersistenceError::ShelterNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Shelter"),
            message: err.to_string(),
        },
        PersistenceError::CategoryNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Category"),
            message: err.to_string(),
        },
        PersistenceError::StockNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Stock"),
            message: err.to_string(),
        },
        PersistenceError::NotFound(ref msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message: msg.clone(),
        },
        _ => ApiError::Internal {
            message: err.to_string(),
        },
    }
}
