// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aid catalog queries.
//!
//! This module contains backend-agnostic queries for the aid-type catalog
//! and aggregate statistics over recorded distributions. All queries use
//! Diesel DSL and work across all supported database backends.

use aidcase_domain::{AidCategory, AidType};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::diesel_schema::{aid_distributions, aid_types};
use crate::error::PersistenceError;

/// Diesel Queryable struct for aid type rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = aid_types)]
pub(crate) struct AidTypeRow {
    pub aid_type_id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub is_active: i32,
    pub default_quantity: i32,
    pub icon: Option<String>,
}

pub(crate) fn aid_type_row_to_domain(row: AidTypeRow) -> Result<AidType, PersistenceError> {
    let category: AidCategory = AidCategory::parse(&row.category)
        .map_err(|e| PersistenceError::Other(format!("Corrupt aid category: {e}")))?;

    Ok(AidType {
        aid_type_id: Some(row.aid_type_id),
        name: row.name,
        category,
        description: row.description,
        unit: row.unit,
        is_active: row.is_active != 0,
        default_quantity: row.default_quantity,
        icon: row.icon,
    })
}

backend_fn! {
/// Retrieves an aid type by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `aid_type_id` - The aid type ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the aid type is not found.
pub fn get_aid_type_by_id(
    conn: &mut _,
    aid_type_id: i64,
) -> Result<Option<AidType>, PersistenceError> {
    debug!("Looking up aid type by ID: {}", aid_type_id);

    let result: Result<AidTypeRow, diesel::result::Error> = aid_types::table
        .filter(aid_types::aid_type_id.eq(aid_type_id))
        .select(AidTypeRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(aid_type_row_to_domain(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves an aid type by name (case-sensitive exact match).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The catalog name
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the aid type is not found.
pub fn get_aid_type_by_name(
    conn: &mut _,
    name: &str,
) -> Result<Option<AidType>, PersistenceError> {
    debug!("Looking up aid type by name: {}", name);

    let result: Result<AidTypeRow, diesel::result::Error> = aid_types::table
        .filter(aid_types::name.eq(name))
        .select(AidTypeRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(aid_type_row_to_domain(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists all aid types, ordered by name.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_aid_types(conn: &mut _) -> Result<Vec<AidType>, PersistenceError> {
    debug!("Listing all aid types");

    let rows: Vec<AidTypeRow> = aid_types::table
        .select(AidTypeRow::as_select())
        .order_by(aid_types::name.asc())
        .load(conn)?;

    rows.into_iter().map(aid_type_row_to_domain).collect()
}
}

backend_fn! {
/// Lists aid types in a given category, ordered by name.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `category` - The canonical category string (e.g., "FOOD")
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_aid_types_by_category(
    conn: &mut _,
    category: &str,
) -> Result<Vec<AidType>, PersistenceError> {
    debug!("Listing aid types in category: {}", category);

    let rows: Vec<AidTypeRow> = aid_types::table
        .filter(aid_types::category.eq(category))
        .select(AidTypeRow::as_select())
        .order_by(aid_types::name.asc())
        .load(conn)?;

    rows.into_iter().map(aid_type_row_to_domain).collect()
}
}

backend_fn! {
/// Lists active aid types, ordered by name.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_active_aid_types(conn: &mut _) -> Result<Vec<AidType>, PersistenceError> {
    debug!("Listing active aid types");

    let rows: Vec<AidTypeRow> = aid_types::table
        .filter(aid_types::is_active.eq(1))
        .select(AidTypeRow::as_select())
        .order_by(aid_types::name.asc())
        .load(conn)?;

    rows.into_iter().map(aid_type_row_to_domain).collect()
}
}

backend_fn! {
/// Counts the total number of aid types.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_aid_types(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = aid_types::table
        .select(count(aid_types::aid_type_id))
        .first(conn)?;

    Ok(count)
}
}

backend_fn! {
/// Counts active aid types.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_active_aid_types(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = aid_types::table
        .filter(aid_types::is_active.eq(1))
        .select(count(aid_types::aid_type_id))
        .first(conn)?;

    Ok(count)
}
}

backend_fn! {
/// Sums distributed quantities per aid category.
///
/// Joins recorded distributions to their catalog entries and totals the
/// quantities per category. Categories with no distributions are absent.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn sum_distributed_quantities_by_category(
    conn: &mut _,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    use diesel::dsl::sum;

    let totals: Vec<(String, Option<i64>)> = aid_distributions::table
        .inner_join(aid_types::table)
        .group_by(aid_types::category)
        .select((aid_types::category, sum(aid_distributions::quantity)))
        .load(conn)?;

    Ok(totals
        .into_iter()
        .map(|(category, total)| (category, total.unwrap_or(0)))
        .collect())
}
}
