// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User account mutations.
//!
//! Passwords never reach the database in plain text: creation and password
//! updates hash with bcrypt before writing.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new user account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `first_name` - The user's first name
/// * `last_name` - The user's last name
/// * `email` - The unique email address
/// * `phone` - Optional contact phone
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The canonical role string (e.g., "Volunteer")
/// * `is_active` - Whether the account may log in
/// * `created_at` - Creation timestamp (ISO 8601)
///
/// # Errors
///
/// Returns `DuplicateKey` if the email is already registered, or another
/// error if the insert fails.
#[allow(clippy::too_many_arguments)]
pub fn create_user(
    conn: &mut _,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: Option<&str>,
    password: &str,
    role: &str,
    is_active: bool,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    info!("Creating user with email: {}, role: {}", email, role);

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    conn.transaction(|conn| {
        diesel::insert_into(users::table)
            .values((
                users::first_name.eq(first_name),
                users::last_name.eq(last_name),
                users::email.eq(email),
                users::phone.eq(phone),
                users::password_hash.eq(&password_hash),
                users::role.eq(role),
                users::is_active.eq(i32::from(is_active)),
                users::created_at.eq(created_at),
            ))
            .execute(conn)?;

        let user_id: i64 = conn.get_last_insert_rowid()?;

        info!(user_id, "User created successfully");
        Ok(user_id)
    })
}
}

backend_fn! {
/// Updates a user's mutable profile fields.
///
/// The email address is immutable through this path.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `first_name` - The new first name
/// * `last_name` - The new last name
/// * `phone` - The new phone value
/// * `role` - The new canonical role string
/// * `is_active` - The new active flag
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist, or another error if the
/// update fails.
pub fn update_user(
    conn: &mut _,
    user_id: i64,
    first_name: &str,
    last_name: &str,
    phone: Option<&str>,
    role: &str,
    is_active: bool,
) -> Result<(), PersistenceError> {
    debug!("Updating user ID: {}", user_id);

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((
            users::first_name.eq(first_name),
            users::last_name.eq(last_name),
            users::phone.eq(phone),
            users::role.eq(role),
            users::is_active.eq(i32::from(is_active)),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}
}

backend_fn! {
/// Deletes a user account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist, or another error if the
/// delete fails.
pub fn delete_user(conn: &mut _, user_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting user ID: {}", user_id);

    let rows_affected: usize = diesel::delete(users::table)
        .filter(users::user_id.eq(user_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}
}

backend_fn! {
/// Replaces a user's password with the hash of `new_password`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `new_password` - The new plain-text password (will be hashed)
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist, or another error if the
/// update fails.
pub fn update_password(
    conn: &mut _,
    user_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    info!("Updating password for user ID: {}", user_id);

    let password_hash: String = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::password_hash.eq(&password_hash))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}
}

backend_fn! {
/// Updates the last login timestamp for a user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `timestamp` - The login timestamp (ISO 8601)
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(
    conn: &mut _,
    user_id: i64,
    timestamp: &str,
) -> Result<(), PersistenceError> {
    debug!("Updating last_login_at for user ID: {}", user_id);

    diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::last_login_at.eq(timestamp))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Sets a user's active flag.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `is_active` - The new active flag
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist, or another error if the
/// update fails.
pub fn set_user_active(
    conn: &mut _,
    user_id: i64,
    is_active: bool,
) -> Result<(), PersistenceError> {
    info!("Setting user ID {} active = {}", user_id, is_active);

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::is_active.eq(i32::from(is_active)))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}
}
