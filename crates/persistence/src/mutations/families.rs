// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Family case-record mutations.

use aidcase_domain::Family;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::families;
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new family record.
///
/// The caller supplies the (possibly generated) case reference; the UNIQUE
/// constraint on `reference` is the authoritative duplicate check.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `family` - The family to persist
///
/// # Errors
///
/// Returns `DuplicateKey` if the reference already exists, or another
/// error if the insert fails.
pub fn create_family(conn: &mut _, family: &Family) -> Result<i64, PersistenceError> {
    info!("Creating family with reference: {}", family.reference);

    conn.transaction(|conn| {
        diesel::insert_into(families::table)
            .values((
                families::reference.eq(family.reference.as_str()),
                families::head_of_family.eq(family.head_of_family.as_str()),
                families::phone.eq(family.phone.as_deref()),
                families::address.eq(family.address.as_deref()),
                families::family_size.eq(family.family_size),
                families::needs_description.eq(family.needs_description.as_deref()),
                families::priority_level.eq(family.priority_level.as_str()),
                families::latitude.eq(family.latitude),
                families::longitude.eq(family.longitude),
                families::notes.eq(family.notes.as_deref()),
            ))
            .execute(conn)?;

        let family_id: i64 = conn.get_last_insert_rowid()?;

        info!(family_id, "Family created successfully");
        Ok(family_id)
    })
}
}

backend_fn! {
/// Updates a family's mutable fields.
///
/// Geolocation is overwritten only when both coordinates are supplied;
/// a partial pair leaves the stored coordinates untouched.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `family_id` - The family ID
/// * `head_of_family` - The new head-of-family name
/// * `phone` - The new phone value
/// * `address` - The new address value
/// * `family_size` - The new family size
/// * `needs_description` - The new needs description
/// * `priority_level` - The new canonical priority string
/// * `notes` - The new notes value
/// * `location` - Both coordinates, or `None` to leave them unchanged
///
/// # Errors
///
/// Returns `NotFound` if the family does not exist, or another error if
/// the update fails.
#[allow(clippy::too_many_arguments)]
pub fn update_family(
    conn: &mut _,
    family_id: i64,
    head_of_family: &str,
    phone: Option<&str>,
    address: Option<&str>,
    family_size: Option<i32>,
    needs_description: Option<&str>,
    priority_level: &str,
    notes: Option<&str>,
    location: Option<(f64, f64)>,
) -> Result<(), PersistenceError> {
    debug!("Updating family ID: {}", family_id);

    let rows_affected: usize = if let Some((latitude, longitude)) = location {
        diesel::update(families::table)
            .filter(families::family_id.eq(family_id))
            .set((
                families::head_of_family.eq(head_of_family),
                families::phone.eq(phone),
                families::address.eq(address),
                families::family_size.eq(family_size),
                families::needs_description.eq(needs_description),
                families::priority_level.eq(priority_level),
                families::notes.eq(notes),
                families::latitude.eq(Some(latitude)),
                families::longitude.eq(Some(longitude)),
            ))
            .execute(conn)?
    } else {
        diesel::update(families::table)
            .filter(families::family_id.eq(family_id))
            .set((
                families::head_of_family.eq(head_of_family),
                families::phone.eq(phone),
                families::address.eq(address),
                families::family_size.eq(family_size),
                families::needs_description.eq(needs_description),
                families::priority_level.eq(priority_level),
                families::notes.eq(notes),
            ))
            .execute(conn)?
    };

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Family with ID {family_id} not found"
        )));
    }

    Ok(())
}
}

backend_fn! {
/// Deletes a family record.
///
/// Visits are not cascaded; a family with recorded visits is protected by
/// the foreign key and the delete surfaces a constraint violation.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `family_id` - The family ID
///
/// # Errors
///
/// Returns `NotFound` if the family does not exist, or another error if
/// the delete fails.
pub fn delete_family(conn: &mut _, family_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting family ID: {}", family_id);

    let rows_affected: usize = diesel::delete(families::table)
        .filter(families::family_id.eq(family_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Family with ID {family_id} not found"
        )));
    }

    Ok(())
}
}
