// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session authentication and role checks.

use hinanjo_domain::Role;
use hinanjo_persistence::{AccountData, Persistence, PersistenceError, SessionData};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// An authenticated actor: the account behind a validated session.
///
/// Every handler that needs to know who is acting receives one of these
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The account ID.
    pub user_id: i64,
    /// The account's role at the time the session was validated.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns true if the actor is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

impl From<&AccountData> for AuthenticatedActor {
    fn from(account: &AccountData) -> Self {
        Self::new(account.user_id, account.role)
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor is an administrator.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `action` - The action name reported on denial
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the actor does not have the Admin role.
    pub fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::User => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: Role::Admin.to_string(),
            }),
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Verifies credentials and creates a session.
    ///
    /// Unknown emails and wrong passwords produce the same failure reason.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `account_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor, AccountData), AuthError> {
        let account: AccountData = persistence
            .get_account_by_email(email)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(Self::invalid_credentials)?;

        let verified: bool =
            Persistence::verify_password(&account, password).map_err(Self::map_persistence_error)?;
        if !verified {
            warn!(user_id = account.user_id, "Login rejected: wrong password");
            return Err(Self::invalid_credentials());
        }

        let session_token: String = Self::generate_session_token();

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let expires_at: String = format_timestamp(now + Self::DEFAULT_SESSION_EXPIRATION)?;

        persistence
            .delete_expired_sessions(&format_timestamp(now)?)
            .map_err(Self::map_persistence_error)?;

        persistence
            .create_session(&session_token, account.user_id, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(account.user_id, &format_timestamp(now)?)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        info!(user_id = account.user_id, "Login succeeded");
        Ok((session_token, AuthenticatedActor::from(&account), account))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or the account
    /// behind it no longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, AccountData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        if now > expires_at {
            debug!(session_id = session.session_id, "Session expired");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let account: AccountData = persistence
            .get_account_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        persistence
            .update_session_activity(session.session_id, &format_timestamp(now)?)
            .map_err(Self::map_persistence_error)?;

        Ok((AuthenticatedActor::from(&account), account))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Generates an opaque session token from the clock and two random words.
    fn generate_session_token() -> String {
        let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        format!(
            "session_{timestamp}_{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        }
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}

/// Formats a timestamp the way sessions and logins are stored.
fn format_timestamp(at: OffsetDateTime) -> Result<String, AuthError> {
    at.format(&Iso8601::DEFAULT)
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to format timestamp: {e}"),
        })
}
