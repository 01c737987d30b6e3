// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visit queries.
//!
//! A visit is returned with its ordered identified-needs list and its owned
//! aid distributions. Child rows are fetched in one batch per query and
//! grouped in memory. All queries use Diesel DSL and work across all
//! supported database backends.

use std::collections::HashMap;

use aidcase_domain::{AidDistribution, Visit, VisitType};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::diesel_schema::{aid_distributions, visit_needs, visits};
use crate::error::PersistenceError;

/// Diesel Queryable struct for visit rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = visits)]
pub(crate) struct VisitRow {
    pub visit_id: i64,
    pub family_id: i64,
    pub volunteer_id: Option<i64>,
    pub visit_date: String,
    pub visit_type: String,
    pub observations: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub next_visit_date: Option<String>,
    pub synced: i32,
    pub recorded_at: String,
}

/// Diesel Queryable struct for aid distribution rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = aid_distributions)]
pub(crate) struct AidDistributionRow {
    pub aid_distribution_id: i64,
    pub visit_id: i64,
    pub aid_type_id: i64,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit: Option<String>,
    pub expiration_date: Option<String>,
    pub notes: Option<String>,
    pub distributed_at: String,
}

pub(crate) fn distribution_row_to_domain(row: AidDistributionRow) -> AidDistribution {
    AidDistribution {
        aid_distribution_id: Some(row.aid_distribution_id),
        visit_id: row.visit_id,
        aid_type_id: row.aid_type_id,
        description: row.description,
        quantity: row.quantity,
        unit: row.unit,
        expiration_date: row.expiration_date,
        notes: row.notes,
        distributed_at: row.distributed_at,
    }
}

pub(crate) fn visit_row_to_domain(
    row: VisitRow,
    identified_needs: Vec<String>,
    distributions: Vec<AidDistribution>,
) -> Result<Visit, PersistenceError> {
    let visit_type: VisitType = VisitType::parse(&row.visit_type)
        .map_err(|e| PersistenceError::Other(format!("Corrupt visit type: {e}")))?;

    Ok(Visit {
        visit_id: Some(row.visit_id),
        family_id: row.family_id,
        volunteer_id: row.volunteer_id,
        visit_date: row.visit_date,
        visit_type,
        observations: row.observations,
        location_lat: row.location_lat,
        location_lng: row.location_lng,
        identified_needs,
        next_visit_date: row.next_visit_date,
        synced: row.synced != 0,
        recorded_at: row.recorded_at,
        distributions,
    })
}

/// Groups batched child rows under their visits, preserving the visit order
/// of `rows` and the position order of the needs.
fn assemble_visits(
    rows: Vec<VisitRow>,
    need_rows: Vec<(i64, String)>,
    distribution_rows: Vec<AidDistributionRow>,
) -> Result<Vec<Visit>, PersistenceError> {
    let mut needs_by_visit: HashMap<i64, Vec<String>> = HashMap::new();
    for (visit_id, description) in need_rows {
        needs_by_visit.entry(visit_id).or_default().push(description);
    }

    let mut distributions_by_visit: HashMap<i64, Vec<AidDistribution>> = HashMap::new();
    for row in distribution_rows {
        distributions_by_visit
            .entry(row.visit_id)
            .or_default()
            .push(distribution_row_to_domain(row));
    }

    rows.into_iter()
        .map(|row| {
            let needs: Vec<String> = needs_by_visit.remove(&row.visit_id).unwrap_or_default();
            let distributions: Vec<AidDistribution> = distributions_by_visit
                .remove(&row.visit_id)
                .unwrap_or_default();
            visit_row_to_domain(row, needs, distributions)
        })
        .collect()
}

backend_fn! {
/// Retrieves a visit by ID, including its needs and distributions.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `visit_id` - The visit ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the visit is not found.
pub fn get_visit_by_id(conn: &mut _, visit_id: i64) -> Result<Option<Visit>, PersistenceError> {
    debug!("Looking up visit by ID: {}", visit_id);

    let result: Result<VisitRow, diesel::result::Error> = visits::table
        .filter(visits::visit_id.eq(visit_id))
        .select(VisitRow::as_select())
        .first(conn);

    let row: VisitRow = match result {
        Ok(row) => row,
        Err(diesel::result::Error::NotFound) => return Ok(None),
        Err(e) => return Err(PersistenceError::from(e)),
    };

    let needs: Vec<String> = visit_needs::table
        .filter(visit_needs::visit_id.eq(visit_id))
        .order_by(visit_needs::position.asc())
        .select(visit_needs::description)
        .load(conn)?;

    let distribution_rows: Vec<AidDistributionRow> = aid_distributions::table
        .filter(aid_distributions::visit_id.eq(visit_id))
        .order_by(aid_distributions::aid_distribution_id.asc())
        .select(AidDistributionRow::as_select())
        .load(conn)?;

    let distributions: Vec<AidDistribution> = distribution_rows
        .into_iter()
        .map(distribution_row_to_domain)
        .collect();

    Ok(Some(visit_row_to_domain(row, needs, distributions)?))
}
}

backend_fn! {
/// Loads the child rows (needs and distributions) for a set of visits.
///
/// Needs come back ordered by `(visit_id, position)` so that per-visit
/// order is preserved after grouping.
fn load_visit_children(
    conn: &mut _,
    visit_ids: Vec<i64>,
) -> Result<(Vec<(i64, String)>, Vec<AidDistributionRow>), PersistenceError> {
    let need_rows: Vec<(i64, String)> = visit_needs::table
        .filter(visit_needs::visit_id.eq_any(&visit_ids))
        .order_by((visit_needs::visit_id.asc(), visit_needs::position.asc()))
        .select((visit_needs::visit_id, visit_needs::description))
        .load(conn)?;

    let distribution_rows: Vec<AidDistributionRow> = aid_distributions::table
        .filter(aid_distributions::visit_id.eq_any(&visit_ids))
        .order_by(aid_distributions::aid_distribution_id.asc())
        .select(AidDistributionRow::as_select())
        .load(conn)?;

    Ok((need_rows, distribution_rows))
}
}

macro_rules! visit_list_fn {
    (
        $(#[$meta:meta])*
        $name:ident, $filter:expr
    ) => {
        pastey::paste! {
            $(#[$meta])*
            pub fn [<$name _sqlite>](
                conn: &mut SqliteConnection,
            ) -> Result<Vec<Visit>, PersistenceError> {
                let rows: Vec<VisitRow> = $filter.load(conn)?;
                let visit_ids: Vec<i64> = rows.iter().map(|r| r.visit_id).collect();
                let (need_rows, distribution_rows) = load_visit_children_sqlite(conn, visit_ids)?;
                assemble_visits(rows, need_rows, distribution_rows)
            }

            $(#[$meta])*
            pub fn [<$name _mysql>](
                conn: &mut MysqlConnection,
            ) -> Result<Vec<Visit>, PersistenceError> {
                let rows: Vec<VisitRow> = $filter.load(conn)?;
                let visit_ids: Vec<i64> = rows.iter().map(|r| r.visit_id).collect();
                let (need_rows, distribution_rows) = load_visit_children_mysql(conn, visit_ids)?;
                assemble_visits(rows, need_rows, distribution_rows)
            }
        }
    };
}

visit_list_fn! {
    /// Lists all visits.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    list_visits,
    visits::table
        .select(VisitRow::as_select())
        .order_by(visits::visit_id.asc())
}

visit_list_fn! {
    /// Lists visits not yet marked as synced.
    ///
    /// The flag is reserved for offline-first clients; no reconciliation
    /// happens server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    list_unsynced_visits,
    visits::table
        .filter(visits::synced.eq(0))
        .select(VisitRow::as_select())
        .order_by(visits::visit_id.asc())
}

visit_list_fn! {
    /// Lists the five most recent visits by visit date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    list_top5_recent_visits,
    visits::table
        .select(VisitRow::as_select())
        .order_by(visits::visit_date.desc())
        .then_order_by(visits::visit_id.desc())
        .limit(5)
}

backend_fn! {
/// Lists visits for a family, most recent visit date first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `family_id` - The family ID
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_visits_by_family(
    conn: &mut _,
    family_id: i64,
) -> Result<Vec<Visit>, PersistenceError> {
    debug!("Listing visits for family ID: {}", family_id);

    let rows: Vec<VisitRow> = visits::table
        .filter(visits::family_id.eq(family_id))
        .select(VisitRow::as_select())
        .order_by(visits::visit_date.desc())
        .then_order_by(visits::visit_id.desc())
        .load(conn)?;

    let mut result: Vec<Visit> = Vec::with_capacity(rows.len());
    for row in rows {
        let needs: Vec<String> = visit_needs::table
            .filter(visit_needs::visit_id.eq(row.visit_id))
            .order_by(visit_needs::position.asc())
            .select(visit_needs::description)
            .load(conn)?;
        let distribution_rows: Vec<AidDistributionRow> = aid_distributions::table
            .filter(aid_distributions::visit_id.eq(row.visit_id))
            .order_by(aid_distributions::aid_distribution_id.asc())
            .select(AidDistributionRow::as_select())
            .load(conn)?;
        let distributions: Vec<AidDistribution> = distribution_rows
            .into_iter()
            .map(distribution_row_to_domain)
            .collect();
        result.push(visit_row_to_domain(row, needs, distributions)?);
    }

    Ok(result)
}
}

backend_fn! {
/// Lists visits with a visit date in `[start, end]`, inclusive of both
/// boundaries. Dates are ISO 8601 strings, which order lexicographically.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `start` - The first date of the range (ISO 8601)
/// * `end` - The last date of the range (ISO 8601)
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_visits_between(
    conn: &mut _,
    start: &str,
    end: &str,
) -> Result<Vec<Visit>, PersistenceError> {
    debug!("Listing visits between {} and {}", start, end);

    let rows: Vec<VisitRow> = visits::table
        .filter(visits::visit_date.ge(start))
        .filter(visits::visit_date.le(end))
        .select(VisitRow::as_select())
        .order_by(visits::visit_date.desc())
        .then_order_by(visits::visit_id.desc())
        .load(conn)?;

    let mut result: Vec<Visit> = Vec::with_capacity(rows.len());
    for row in rows {
        let needs: Vec<String> = visit_needs::table
            .filter(visit_needs::visit_id.eq(row.visit_id))
            .order_by(visit_needs::position.asc())
            .select(visit_needs::description)
            .load(conn)?;
        let distribution_rows: Vec<AidDistributionRow> = aid_distributions::table
            .filter(aid_distributions::visit_id.eq(row.visit_id))
            .order_by(aid_distributions::aid_distribution_id.asc())
            .select(AidDistributionRow::as_select())
            .load(conn)?;
        let distributions: Vec<AidDistribution> = distribution_rows
            .into_iter()
            .map(distribution_row_to_domain)
            .collect();
        result.push(visit_row_to_domain(row, needs, distributions)?);
    }

    Ok(result)
}
}

backend_fn! {
/// Counts the total number of visits.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_visits(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = visits::table.select(count(visits::visit_id)).first(conn)?;

    Ok(count)
}
}

backend_fn! {
/// Counts visits with a visit date in `[start, end]`, inclusive.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `start` - The first date of the range (ISO 8601)
/// * `end` - The last date of the range (ISO 8601)
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_visits_between(
    conn: &mut _,
    start: &str,
    end: &str,
) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = visits::table
        .filter(visits::visit_date.ge(start))
        .filter(visits::visit_date.le(end))
        .select(count(visits::visit_id))
        .first(conn)?;

    Ok(count)
}
}

backend_fn! {
/// Counts visits dated exactly `visit_date`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `visit_date` - The date (ISO 8601)
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_visits_on(conn: &mut _, visit_date: &str) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = visits::table
        .filter(visits::visit_date.eq(visit_date))
        .select(count(visits::visit_id))
        .first(conn)?;

    Ok(count)
}
}

backend_fn! {
/// Counts visits per visit type.
///
/// Returns `(visit_type, count)` pairs; types with no visits are absent.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_visits_by_type(conn: &mut _) -> Result<Vec<(String, i64)>, PersistenceError> {
    use diesel::dsl::count;

    let counts: Vec<(String, i64)> = visits::table
        .group_by(visits::visit_type)
        .select((visits::visit_type, count(visits::visit_id)))
        .load(conn)?;

    Ok(counts)
}
}

backend_fn! {
/// Counts visits per family.
///
/// Returns `(family_id, count)` pairs; families with no visits are absent.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_visits_by_family(conn: &mut _) -> Result<Vec<(i64, i64)>, PersistenceError> {
    use diesel::dsl::count;

    let counts: Vec<(i64, i64)> = visits::table
        .group_by(visits::family_id)
        .select((visits::family_id, count(visits::visit_id)))
        .load(conn)?;

    Ok(counts)
}
}

backend_fn! {
/// Counts visits whose planned next visit date falls in `[start, end]`,
/// inclusive. Visits without a planned date are excluded.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `start` - The first date of the range (ISO 8601)
/// * `end` - The last date of the range (ISO 8601)
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_next_visits_between(
    conn: &mut _,
    start: &str,
    end: &str,
) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = visits::table
        .filter(visits::next_visit_date.is_not_null())
        .filter(visits::next_visit_date.ge(start))
        .filter(visits::next_visit_date.le(end))
        .select(count(visits::visit_id))
        .first(conn)?;

    Ok(count)
}
}

backend_fn! {
/// Retrieves an aid distribution by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `aid_distribution_id` - The distribution ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the distribution is not found.
pub fn get_aid_distribution_by_id(
    conn: &mut _,
    aid_distribution_id: i64,
) -> Result<Option<AidDistribution>, PersistenceError> {
    let result: Result<AidDistributionRow, diesel::result::Error> = aid_distributions::table
        .filter(aid_distributions::aid_distribution_id.eq(aid_distribution_id))
        .select(AidDistributionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(distribution_row_to_domain(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}
