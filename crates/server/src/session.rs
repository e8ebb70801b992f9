// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and authentication at the server boundary.
//!
//! This module provides Axum extractors for reading session tokens and
//! validating them against the session store.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use hinanjo_api::{AuthenticatedActor, AuthenticationService};
use hinanjo_persistence::AccountData;
use tracing::{debug, warn};

use crate::AppState;

/// Extractor for the raw bearer token, without validating it.
pub struct SessionToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for SessionToken {
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            SessionError::InvalidAuthorizationHeader
        })?;

        Ok(Self(token.trim().to_string()))
    }
}

/// Extractor for signed-in accounts.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionAccount(actor, account): SessionAccount,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     // account: AccountData
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if the Authorization header is missing or
/// malformed, or the session is unknown or expired.
pub struct SessionAccount(pub AuthenticatedActor, pub AccountData);

impl FromRequestParts<AppState> for SessionAccount {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionToken(token) = SessionToken::from_request_parts(parts, state).await?;

        let mut persistence = state.persistence.lock().await;
        let (actor, account) = AuthenticationService::validate_session(&mut persistence, &token)
            .map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::InvalidSession(e.to_string())
            })?;

        debug!(
            user_id = account.user_id,
            role = %actor.role,
            "Session validated"
        );

        Ok(Self(actor, account))
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    MissingAuthorizationHeader,
    InvalidAuthorizationHeader,
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingAuthorizationHeader => String::from("Missing Authorization header"),
            Self::InvalidAuthorizationHeader => String::from(
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession(reason) => format!("Session validation failed: {reason}"),
        };

        crate::HttpError::new(StatusCode::UNAUTHORIZED, message).into_response()
    }
}
