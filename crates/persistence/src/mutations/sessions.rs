// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login session mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new session for a user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `user_id` - The user the session belongs to
/// * `role_claim` - The role claim carried by the session (e.g. `ROLE_ADMIN`)
/// * `created_at` - Creation timestamp (ISO 8601)
/// * `expires_at` - Expiration timestamp (ISO 8601)
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    user_id: i64,
    role_claim: &str,
    created_at: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!("Creating session for user ID: {}", user_id);

    conn.transaction(|conn| {
        diesel::insert_into(sessions::table)
            .values((
                sessions::session_token.eq(session_token),
                sessions::user_id.eq(user_id),
                sessions::role_claim.eq(role_claim),
                sessions::created_at.eq(created_at),
                sessions::last_activity_at.eq(created_at),
                sessions::expires_at.eq(expires_at),
            ))
            .execute(conn)?;

        let session_id: i64 = conn.get_last_insert_rowid()?;
        Ok(session_id)
    })
}
}

backend_fn! {
/// Updates the last activity timestamp for a session.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_id` - The session ID
/// * `timestamp` - The activity timestamp (ISO 8601)
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut _,
    session_id: i64,
    timestamp: &str,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(timestamp))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes a session by token.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The session token to delete
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<(), PersistenceError> {
    debug!("Deleting session");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes all sessions that expired at or before `now`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `now` - The current timestamp (ISO 8601)
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut _, now: &str) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.le(now))
        .execute(conn)?;

    if deleted > 0 {
        info!("Deleted {} expired sessions", deleted);
    }

    Ok(deleted)
}
}

backend_fn! {
/// Deletes all sessions for a specific user.
///
/// Used when an account is deactivated so existing tokens stop working.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user whose sessions should be deleted
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_sessions_for_user(conn: &mut _, user_id: i64) -> Result<usize, PersistenceError> {
    debug!("Deleting sessions for user ID: {}", user_id);

    let deleted: usize = diesel::delete(sessions::table)
        .filter(sessions::user_id.eq(user_id))
        .execute(conn)?;

    Ok(deleted)
}
}
