// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aid catalog mutations.

use aidcase_domain::AidType;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::aid_types;
use crate::error::PersistenceError;

/// The starter catalog: one entry per category, seeded once when the
/// catalog is empty. `(name, category, description, unit, default
/// quantity, icon)`.
const DEFAULT_AID_TYPES: [(&str, &str, &str, &str, i32, &str); 6] = [
    (
        "Colis alimentaire",
        "FOOD",
        "Panier alimentaire de base",
        "kg",
        1,
        "food",
    ),
    (
        "Médicaments génériques",
        "MEDICINE",
        "Médicaments essentiels",
        "boîte",
        1,
        "medicine",
    ),
    (
        "Vêtements",
        "CLOTHING",
        "Vêtements pour adultes et enfants",
        "pièce",
        5,
        "clothing",
    ),
    (
        "Aide financière",
        "FINANCIAL",
        "Aide monétaire directe",
        "DT",
        100,
        "money",
    ),
    (
        "Kit hygiène",
        "HYGIENE",
        "Produits d'hygiène personnelle",
        "kit",
        1,
        "hygiene",
    ),
    (
        "Fournitures scolaires",
        "SCHOOL",
        "Cartables, cahiers, stylos",
        "kit",
        1,
        "school",
    ),
];

backend_fn! {
/// Creates a new aid type.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `aid_type` - The catalog entry to persist
///
/// # Errors
///
/// Returns `DuplicateKey` if the name already exists, or another error if
/// the insert fails.
pub fn create_aid_type(conn: &mut _, aid_type: &AidType) -> Result<i64, PersistenceError> {
    info!("Creating aid type: {}", aid_type.name);

    conn.transaction(|conn| {
        diesel::insert_into(aid_types::table)
            .values((
                aid_types::name.eq(aid_type.name.as_str()),
                aid_types::category.eq(aid_type.category.as_str()),
                aid_types::description.eq(aid_type.description.as_deref()),
                aid_types::unit.eq(aid_type.unit.as_deref()),
                aid_types::is_active.eq(i32::from(aid_type.is_active)),
                aid_types::default_quantity.eq(aid_type.default_quantity),
                aid_types::icon.eq(aid_type.icon.as_deref()),
            ))
            .execute(conn)?;

        let aid_type_id: i64 = conn.get_last_insert_rowid()?;

        info!(aid_type_id, "Aid type created successfully");
        Ok(aid_type_id)
    })
}
}

backend_fn! {
/// Overwrites every mutable field of an aid type.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `aid_type_id` - The aid type ID
/// * `aid_type` - The replacement field values
///
/// # Errors
///
/// Returns `NotFound` if the aid type does not exist, `DuplicateKey` if
/// the new name collides, or another error if the update fails.
pub fn update_aid_type(
    conn: &mut _,
    aid_type_id: i64,
    aid_type: &AidType,
) -> Result<(), PersistenceError> {
    debug!("Updating aid type ID: {}", aid_type_id);

    let rows_affected: usize = diesel::update(aid_types::table)
        .filter(aid_types::aid_type_id.eq(aid_type_id))
        .set((
            aid_types::name.eq(aid_type.name.as_str()),
            aid_types::category.eq(aid_type.category.as_str()),
            aid_types::description.eq(aid_type.description.as_deref()),
            aid_types::unit.eq(aid_type.unit.as_deref()),
            aid_types::is_active.eq(i32::from(aid_type.is_active)),
            aid_types::default_quantity.eq(aid_type.default_quantity),
            aid_types::icon.eq(aid_type.icon.as_deref()),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "AidType with ID {aid_type_id} not found"
        )));
    }

    Ok(())
}
}

backend_fn! {
/// Deletes an aid type.
///
/// There is no guard for recorded distributions referencing the entry;
/// the foreign key surfaces such a delete as a constraint violation.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `aid_type_id` - The aid type ID
///
/// # Errors
///
/// Returns `NotFound` if the aid type does not exist, or another error if
/// the delete fails.
pub fn delete_aid_type(conn: &mut _, aid_type_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting aid type ID: {}", aid_type_id);

    let rows_affected: usize = diesel::delete(aid_types::table)
        .filter(aid_types::aid_type_id.eq(aid_type_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "AidType with ID {aid_type_id} not found"
        )));
    }

    Ok(())
}
}

backend_fn! {
/// Seeds the starter catalog when the catalog is empty.
///
/// Idempotent: a non-empty catalog makes this a no-op, so calling it
/// twice leaves exactly the original six entries.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// The number of entries inserted (6 on first call, 0 afterwards).
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn seed_default_aid_types(conn: &mut _) -> Result<usize, PersistenceError> {
    conn.transaction(|conn| {
        use diesel::dsl::count;

        let existing: i64 = aid_types::table
            .select(count(aid_types::aid_type_id))
            .first(conn)?;

        if existing > 0 {
            debug!("Aid type catalog already populated; skipping seed");
            return Ok(0);
        }

        for (name, category, description, unit, default_quantity, icon) in DEFAULT_AID_TYPES {
            diesel::insert_into(aid_types::table)
                .values((
                    aid_types::name.eq(name),
                    aid_types::category.eq(category),
                    aid_types::description.eq(Some(description)),
                    aid_types::unit.eq(Some(unit)),
                    aid_types::is_active.eq(1),
                    aid_types::default_quantity.eq(default_quantity),
                    aid_types::icon.eq(Some(icon)),
                ))
                .execute(conn)?;
        }

        info!("Seeded {} default aid types", DEFAULT_AID_TYPES.len());
        Ok(DEFAULT_AID_TYPES.len())
    })
}
}
