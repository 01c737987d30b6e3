// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-based authentication.
//!
//! This is the token-issuing login path: register and login both end with
//! an opaque session token persisted in the sessions table, carrying the
//! account email as subject and a single `ROLE_<ROLE>` claim. The separate
//! profile-returning login on the users resource shares the same stored
//! credential hash but issues no token.

use aidcase_domain::{Role, User, validate_registration};
use aidcase_persistence::{SessionData, SqlitePersistence, UserData};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::clock::now_iso;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{AuthResponse, LoginRequest, RegisterRequest};

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Registers a new account and issues a session token.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `request` - The registration request
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the email is already registered,
    /// `InvalidInput` for malformed fields or role tokens, or another
    /// error if persistence fails.
    pub fn register(
        persistence: &mut SqlitePersistence,
        request: &RegisterRequest,
    ) -> Result<AuthResponse, ApiError> {
        let role: Role = match &request.role {
            Some(token) => Role::parse(token).map_err(translate_domain_error)?,
            None => Role::default(),
        };

        let candidate = User {
            user_id: None,
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            role,
            is_active: true,
            created_at: String::new(),
            last_login_at: None,
        };
        validate_registration(&candidate, &request.password).map_err(translate_domain_error)?;

        if persistence
            .email_exists(&request.email)
            .map_err(|e| translate_persistence_error("User", e))?
        {
            return Err(ApiError::Conflict {
                resource: String::from("User"),
                message: format!("Email already registered: {}", request.email),
            });
        }

        let created_at: String = now_iso()?;
        let user_id: i64 = persistence
            .create_user(
                &request.first_name,
                &request.last_name,
                &request.email,
                request.phone.as_deref(),
                &request.password,
                role.as_str(),
                true,
                &created_at,
            )
            .map_err(|e| translate_persistence_error("User", e))?;

        let (token, expires_at) = Self::issue_session(persistence, user_id, role)?;

        Ok(AuthResponse {
            token,
            email: request.email.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            role: role.as_str().to_string(),
            expires_at,
        })
    }

    /// Verifies credentials and issues a fresh session token.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `request` - The login request
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for unknown accounts or wrong
    /// passwords, `AccountDisabled` for deactivated accounts, or another
    /// error if persistence fails.
    pub fn login(
        persistence: &mut SqlitePersistence,
        request: &LoginRequest,
    ) -> Result<AuthResponse, ApiError> {
        let user: UserData = persistence
            .get_user_by_email(&request.email)
            .map_err(|e| translate_persistence_error("User", e))?
            .ok_or_else(|| {
                warn!(email = %request.email, "Login attempt for unknown account");
                ApiError::AuthenticationFailed {
                    reason: String::from("Unknown email or password"),
                }
            })?;

        let matches: bool = persistence
            .verify_password(&request.password, &user.password_hash)
            .map_err(|e| translate_persistence_error("User", e))?;
        if !matches {
            warn!(email = %request.email, "Login attempt with wrong password");
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Unknown email or password"),
            });
        }

        if !user.is_active {
            return Err(ApiError::AccountDisabled {
                reason: String::from("User account is deactivated"),
            });
        }

        let role: Role = Role::parse(&user.role).map_err(|_| ApiError::Internal {
            message: format!("Stored role is invalid: {}", user.role),
        })?;

        let now: String = now_iso()?;
        persistence
            .update_last_login(user.user_id, &now)
            .map_err(|e| translate_persistence_error("User", e))?;

        let (token, expires_at) = Self::issue_session(persistence, user.user_id, role)?;

        Ok(AuthResponse {
            token,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: role.as_str().to_string(),
            expires_at,
        })
    }

    /// Validates a session token and returns the account it belongs to,
    /// along with the session's role claim.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the token is unknown or expired,
    /// or if the account is missing or deactivated.
    pub fn validate_session(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(UserData, String), ApiError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(|e| translate_persistence_error("Session", e))?
            .ok_or_else(|| ApiError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT).map_err(|e| {
                ApiError::Internal {
                    message: format!("Failed to parse session expiration: {e}"),
                }
            })?;
        if OffsetDateTime::now_utc() > expires_at {
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(|e| translate_persistence_error("User", e))?
            .ok_or_else(|| ApiError::AuthenticationFailed {
                reason: String::from("Account no longer exists"),
            })?;

        if !user.is_active {
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Account is deactivated"),
            });
        }

        let now: String = now_iso()?;
        persistence
            .update_session_activity(session.session_id, &now)
            .map_err(|e| translate_persistence_error("Session", e))?;

        debug!(email = %user.email, "Session validated successfully");
        Ok((user, session.role_claim))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn logout(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(), ApiError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| translate_persistence_error("Session", e))?;
        Ok(())
    }

    /// Creates and stores a session for a user, returning the token and
    /// its expiration timestamp.
    fn issue_session(
        persistence: &mut SqlitePersistence,
        user_id: i64,
        role: Role,
    ) -> Result<(String, String), ApiError> {
        let session_token: String = Self::generate_session_token();
        let created_at: String = now_iso()?;

        let expires: OffsetDateTime = OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at: String =
            expires
                .format(&Iso8601::DEFAULT)
                .map_err(|e| ApiError::Internal {
                    message: format!("Failed to format expiration time: {e}"),
                })?;

        persistence
            .create_session(
                &session_token,
                user_id,
                &role.claim(),
                &created_at,
                &expires_at,
            )
            .map_err(|e| translate_persistence_error("Session", e))?;

        Ok((session_token, expires_at))
    }

    /// Generates a session token.
    ///
    /// In a production system, this would use a cryptographically secure
    /// random number generator. For simplicity, we use a timestamp-based
    /// approach here.
    fn generate_session_token() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp: u128 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_nanos();
        format!("session_{timestamp}_{}", rand::random::<u64>())
    }
}
