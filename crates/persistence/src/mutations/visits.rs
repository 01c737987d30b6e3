// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visit mutations.
//!
//! A visit exclusively owns its identified-needs rows and its aid
//! distributions. Creation and deletion keep the whole ownership tree
//! consistent inside one transaction; no distribution or need row may
//! outlive its visit.

use aidcase_domain::{AidDistribution, Visit, validate_quantity};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{aid_distributions, visit_needs, visits};
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new visit together with its identified-needs list.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `visit` - The visit to persist (distributions are ignored here; attach
///   them with `add_aid_distribution`)
///
/// # Errors
///
/// Returns `ForeignKeyViolation` if the family or volunteer does not
/// exist, or another error if the insert fails.
pub fn create_visit(conn: &mut _, visit: &Visit) -> Result<i64, PersistenceError> {
    info!("Creating visit for family ID: {}", visit.family_id);

    conn.transaction(|conn| {
        diesel::insert_into(visits::table)
            .values((
                visits::family_id.eq(visit.family_id),
                visits::volunteer_id.eq(visit.volunteer_id),
                visits::visit_date.eq(visit.visit_date.as_str()),
                visits::visit_type.eq(visit.visit_type.as_str()),
                visits::observations.eq(visit.observations.as_deref()),
                visits::location_lat.eq(visit.location_lat),
                visits::location_lng.eq(visit.location_lng),
                visits::next_visit_date.eq(visit.next_visit_date.as_deref()),
                visits::synced.eq(i32::from(visit.synced)),
                visits::recorded_at.eq(visit.recorded_at.as_str()),
            ))
            .execute(conn)?;

        let visit_id: i64 = conn.get_last_insert_rowid()?;

        for (index, description) in visit.identified_needs.iter().enumerate() {
            let position: i32 = i32::try_from(index)
                .map_err(|e| PersistenceError::Other(format!("Need list too long: {e}")))?;
            diesel::insert_into(visit_needs::table)
                .values((
                    visit_needs::visit_id.eq(visit_id),
                    visit_needs::position.eq(position),
                    visit_needs::description.eq(description.as_str()),
                ))
                .execute(conn)?;
        }

        info!(visit_id, "Visit created successfully");
        Ok(visit_id)
    })
}
}

backend_fn! {
/// Updates a visit's mutable fields.
///
/// The owning family, the recording volunteer, the sync flag, the needs
/// list, and the distributions are not reachable through this path.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `visit_id` - The visit ID
/// * `visit_date` - The new visit date (ISO 8601)
/// * `visit_type` - The new canonical visit-type string
/// * `observations` - The new observations value
/// * `location_lat` - The new latitude value
/// * `location_lng` - The new longitude value
/// * `next_visit_date` - The new planned next visit date
///
/// # Errors
///
/// Returns `NotFound` if the visit does not exist, or another error if
/// the update fails.
#[allow(clippy::too_many_arguments)]
pub fn update_visit(
    conn: &mut _,
    visit_id: i64,
    visit_date: &str,
    visit_type: &str,
    observations: Option<&str>,
    location_lat: Option<f64>,
    location_lng: Option<f64>,
    next_visit_date: Option<&str>,
) -> Result<(), PersistenceError> {
    debug!("Updating visit ID: {}", visit_id);

    let rows_affected: usize = diesel::update(visits::table)
        .filter(visits::visit_id.eq(visit_id))
        .set((
            visits::visit_date.eq(visit_date),
            visits::visit_type.eq(visit_type),
            visits::observations.eq(observations),
            visits::location_lat.eq(location_lat),
            visits::location_lng.eq(location_lng),
            visits::next_visit_date.eq(next_visit_date),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Visit with ID {visit_id} not found"
        )));
    }

    Ok(())
}
}

backend_fn! {
/// Deletes a visit and everything it owns.
///
/// Distributions and identified-needs rows are removed with the visit in
/// the same transaction; no orphan rows remain.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `visit_id` - The visit ID
///
/// # Errors
///
/// Returns `NotFound` if the visit does not exist, or another error if
/// the delete fails.
pub fn delete_visit(conn: &mut _, visit_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting visit ID: {}", visit_id);

    conn.transaction(|conn| {
        diesel::delete(aid_distributions::table)
            .filter(aid_distributions::visit_id.eq(visit_id))
            .execute(conn)?;

        diesel::delete(visit_needs::table)
            .filter(visit_needs::visit_id.eq(visit_id))
            .execute(conn)?;

        let rows_affected: usize = diesel::delete(visits::table)
            .filter(visits::visit_id.eq(visit_id))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Visit with ID {visit_id} not found"
            )));
        }

        Ok(())
    })
}
}

backend_fn! {
/// Replaces a visit's identified-needs list, preserving the given order.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `visit_id` - The visit ID
/// * `needs` - The replacement list
///
/// # Errors
///
/// Returns `NotFound` if the visit does not exist, or another error if
/// the write fails.
pub fn replace_identified_needs(
    conn: &mut _,
    visit_id: i64,
    needs: &[String],
) -> Result<(), PersistenceError> {
    debug!("Replacing identified needs for visit ID: {}", visit_id);

    conn.transaction(|conn| {
        use diesel::dsl::count;

        let exists: i64 = visits::table
            .filter(visits::visit_id.eq(visit_id))
            .select(count(visits::visit_id))
            .first(conn)?;
        if exists == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Visit with ID {visit_id} not found"
            )));
        }

        diesel::delete(visit_needs::table)
            .filter(visit_needs::visit_id.eq(visit_id))
            .execute(conn)?;

        for (index, description) in needs.iter().enumerate() {
            let position: i32 = i32::try_from(index)
                .map_err(|e| PersistenceError::Other(format!("Need list too long: {e}")))?;
            diesel::insert_into(visit_needs::table)
                .values((
                    visit_needs::visit_id.eq(visit_id),
                    visit_needs::position.eq(position),
                    visit_needs::description.eq(description.as_str()),
                ))
                .execute(conn)?;
        }

        Ok(())
    })
}
}

backend_fn! {
/// Attaches an aid distribution to its visit.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `distribution` - The distribution to persist
///
/// # Errors
///
/// Returns `Other` for a non-positive quantity, `ForeignKeyViolation` if
/// the visit or aid type does not exist, or another error if the insert
/// fails.
pub fn add_aid_distribution(
    conn: &mut _,
    distribution: &AidDistribution,
) -> Result<i64, PersistenceError> {
    validate_quantity(distribution.quantity)
        .map_err(|e| PersistenceError::Other(e.to_string()))?;

    info!(
        "Recording distribution of aid type {} for visit {}",
        distribution.aid_type_id, distribution.visit_id
    );

    conn.transaction(|conn| {
        diesel::insert_into(aid_distributions::table)
            .values((
                aid_distributions::visit_id.eq(distribution.visit_id),
                aid_distributions::aid_type_id.eq(distribution.aid_type_id),
                aid_distributions::description.eq(distribution.description.as_deref()),
                aid_distributions::quantity.eq(distribution.quantity),
                aid_distributions::unit.eq(distribution.unit.as_deref()),
                aid_distributions::expiration_date.eq(distribution.expiration_date.as_deref()),
                aid_distributions::notes.eq(distribution.notes.as_deref()),
                aid_distributions::distributed_at.eq(distribution.distributed_at.as_str()),
            ))
            .execute(conn)?;

        let aid_distribution_id: i64 = conn.get_last_insert_rowid()?;

        Ok(aid_distribution_id)
    })
}
}
