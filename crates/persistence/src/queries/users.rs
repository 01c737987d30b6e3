// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session queries.
//!
//! This module contains backend-agnostic queries for retrieving user
//! accounts and login sessions. All queries use Diesel DSL and work across
//! all supported database backends.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{SessionData, UserData};
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub(crate) struct UserRow {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub is_active: i32,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    user_id: i64,
    role_claim: String,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

pub(crate) fn user_row_to_data(row: UserRow) -> UserData {
    UserData {
        user_id: row.user_id,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        phone: row.phone,
        password_hash: row.password_hash,
        role: row.role,
        is_active: row.is_active != 0,
        created_at: row.created_at,
        last_login_at: row.last_login_at,
    }
}

fn session_row_to_data(row: SessionRow) -> SessionData {
    SessionData {
        session_id: row.session_id,
        session_token: row.session_token,
        user_id: row.user_id,
        role_claim: row.role_claim,
        created_at: row.created_at,
        last_activity_at: row.last_activity_at,
        expires_at: row.expires_at,
    }
}

backend_fn! {
/// Retrieves a user by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(conn: &mut _, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(user_row_to_data(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves a user by email address (exact match).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The email address to search for
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_email(
    conn: &mut _,
    email: &str,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by email: {}", email);

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::email.eq(email))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(user_row_to_data(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Checks whether a user with the given email exists.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The email address to check
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn email_exists(conn: &mut _, email: &str) -> Result<bool, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = users::table
        .filter(users::email.eq(email))
        .select(count(users::user_id))
        .first(conn)?;

    Ok(count > 0)
}
}

backend_fn! {
/// Lists all users, ordered by email.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(conn: &mut _) -> Result<Vec<UserData>, PersistenceError> {
    debug!("Listing all users");

    let rows: Vec<UserRow> = users::table
        .select(UserRow::as_select())
        .order_by(users::email.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(user_row_to_data).collect())
}
}

backend_fn! {
/// Lists users with a given role, ordered by email.
///
/// The role is stored as its canonical string value.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `role` - The canonical role string (e.g., "Volunteer")
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users_by_role(conn: &mut _, role: &str) -> Result<Vec<UserData>, PersistenceError> {
    debug!("Listing users with role: {}", role);

    let rows: Vec<UserRow> = users::table
        .filter(users::role.eq(role))
        .select(UserRow::as_select())
        .order_by(users::email.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(user_row_to_data).collect())
}
}

backend_fn! {
/// Lists active users, ordered by email.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_active_users(conn: &mut _) -> Result<Vec<UserData>, PersistenceError> {
    debug!("Listing active users");

    let rows: Vec<UserRow> = users::table
        .filter(users::is_active.eq(1))
        .select(UserRow::as_select())
        .order_by(users::email.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(user_row_to_data).collect())
}
}

backend_fn! {
/// Counts the total number of users.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_users(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = users::table.select(count(users::user_id)).first(conn)?;

    Ok(count)
}
}

backend_fn! {
/// Counts users with a given role.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `role` - The canonical role string
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_users_by_role(conn: &mut _, role: &str) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = users::table
        .filter(users::role.eq(role))
        .select(count(users::user_id))
        .first(conn)?;

    Ok(count)
}
}

backend_fn! {
/// Retrieves a session by token.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The session token
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut _,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    let result: Result<SessionRow, diesel::result::Error> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(session_row_to_data(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

/// Verifies a password against a stored hash.
///
/// This is a backend-agnostic utility function that uses bcrypt.
///
/// # Arguments
///
/// * `password` - The plain text password to verify
/// * `password_hash` - The stored bcrypt hash
///
/// # Errors
///
/// Returns an error if password verification fails.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}
