// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Family case-record queries.
//!
//! This module contains backend-agnostic queries for retrieving family
//! records. All queries use Diesel DSL and work across all supported
//! database backends.

use aidcase_domain::{Family, PriorityLevel};
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::diesel_schema::families;
use crate::error::PersistenceError;

diesel::define_sql_function! {
    /// `LOWER()` over a nullable text expression.
    ///
    /// Diesel exposes no case-folding DSL; the function exists on every
    /// supported backend.
    #[sql_name = "LOWER"]
    fn lower(value: Nullable<Text>) -> Nullable<Text>;
}

/// Diesel Queryable struct for family rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = families)]
pub(crate) struct FamilyRow {
    pub family_id: i64,
    pub reference: String,
    pub head_of_family: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub family_size: Option<i32>,
    pub needs_description: Option<String>,
    pub priority_level: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

pub(crate) fn family_row_to_domain(row: FamilyRow) -> Result<Family, PersistenceError> {
    let priority_level: PriorityLevel = PriorityLevel::parse(&row.priority_level)
        .map_err(|e| PersistenceError::Other(format!("Corrupt priority level: {e}")))?;

    Ok(Family {
        family_id: Some(row.family_id),
        reference: row.reference,
        head_of_family: row.head_of_family,
        phone: row.phone,
        address: row.address,
        family_size: row.family_size,
        needs_description: row.needs_description,
        priority_level,
        latitude: row.latitude,
        longitude: row.longitude,
        notes: row.notes,
    })
}

backend_fn! {
/// Retrieves a family by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `family_id` - The family ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the family is not found.
pub fn get_family_by_id(
    conn: &mut _,
    family_id: i64,
) -> Result<Option<Family>, PersistenceError> {
    debug!("Looking up family by ID: {}", family_id);

    let result: Result<FamilyRow, diesel::result::Error> = families::table
        .filter(families::family_id.eq(family_id))
        .select(FamilyRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(family_row_to_domain(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Checks whether a family with the given reference exists.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `reference` - The case reference to check
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn reference_exists(conn: &mut _, reference: &str) -> Result<bool, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = families::table
        .filter(families::reference.eq(reference))
        .select(count(families::family_id))
        .first(conn)?;

    Ok(count > 0)
}
}

backend_fn! {
/// Lists all families.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_families(conn: &mut _) -> Result<Vec<Family>, PersistenceError> {
    debug!("Listing all families");

    let rows: Vec<FamilyRow> = families::table
        .select(FamilyRow::as_select())
        .order_by(families::family_id.asc())
        .load(conn)?;

    rows.into_iter().map(family_row_to_domain).collect()
}
}

backend_fn! {
/// Lists families with a given priority level.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `priority_level` - The canonical priority string (e.g., "High")
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_families_by_priority(
    conn: &mut _,
    priority_level: &str,
) -> Result<Vec<Family>, PersistenceError> {
    debug!("Listing families with priority: {}", priority_level);

    let rows: Vec<FamilyRow> = families::table
        .filter(families::priority_level.eq(priority_level))
        .select(FamilyRow::as_select())
        .order_by(families::family_id.asc())
        .load(conn)?;

    rows.into_iter().map(family_row_to_domain).collect()
}
}

backend_fn! {
/// Case-insensitive substring search over head-of-family, address, and
/// reference.
///
/// The query string must already be trimmed; blank-query handling (return
/// the full list) belongs to the caller.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `query` - The trimmed search term
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_families(conn: &mut _, query: &str) -> Result<Vec<Family>, PersistenceError> {
    debug!("Searching families for: {}", query);

    let pattern: String = format!("%{}%", query.to_lowercase());

    let rows: Vec<FamilyRow> = families::table
        .filter(
            lower(families::head_of_family.nullable())
                .like(pattern.clone())
                .or(lower(families::address).like(pattern.clone()))
                .or(lower(families::reference.nullable()).like(pattern)),
        )
        .select(FamilyRow::as_select())
        .order_by(families::family_id.asc())
        .load(conn)?;

    rows.into_iter().map(family_row_to_domain).collect()
}
}

backend_fn! {
/// Lists families that have both coordinates set.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_families_with_location(conn: &mut _) -> Result<Vec<Family>, PersistenceError> {
    debug!("Listing families with geolocation");

    let rows: Vec<FamilyRow> = families::table
        .filter(
            families::latitude
                .is_not_null()
                .and(families::longitude.is_not_null()),
        )
        .select(FamilyRow::as_select())
        .order_by(families::family_id.asc())
        .load(conn)?;

    rows.into_iter().map(family_row_to_domain).collect()
}
}

backend_fn! {
/// Counts the total number of families.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_families(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = families::table
        .select(count(families::family_id))
        .first(conn)?;

    Ok(count)
}
}

backend_fn! {
/// Counts families with a given priority level.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `priority_level` - The canonical priority string
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_families_by_priority(
    conn: &mut _,
    priority_level: &str,
) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = families::table
        .filter(families::priority_level.eq(priority_level))
        .select(count(families::family_id))
        .first(conn)?;

    Ok(count)
}
}

backend_fn! {
/// Counts families that have both coordinates set.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_families_with_location(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = families::table
        .filter(
            families::latitude
                .is_not_null()
                .and(families::longitude.is_not_null()),
        )
        .select(count(families::family_id))
        .first(conn)?;

    Ok(count)
}
}
