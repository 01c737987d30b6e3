// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entity records tracked by the system.
//!
//! Identifiers are `Option<i64>` until assigned by the persistence layer.
//! Cross-references between entities are carried as ids with explicit loader
//! queries, never as live object graphs. Dates and timestamps are ISO 8601
//! strings; see the `dates` module for parsing helpers.

use serde::{Deserialize, Serialize};

use crate::types::{AidCategory, PriorityLevel, Role, VisitType};

/// A system operator (volunteer, manager, or admin).
///
/// The stored credential (a bcrypt hash) lives only in the persistence
/// layer and never appears on this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Canonical internal identifier. `None` before first persistence.
    pub user_id: Option<i64>,
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// Unique email address; immutable after creation.
    pub email: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// The user's role.
    pub role: Role,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Timestamp of the most recent successful login (ISO 8601).
    pub last_login_at: Option<String>,
}

/// A household case record tracked for aid delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    /// Canonical internal identifier. `None` before first persistence.
    pub family_id: Option<i64>,
    /// Human-facing unique case reference (e.g. `FAM-0421`).
    pub reference: String,
    /// Name of the head of the household.
    pub head_of_family: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Optional street address.
    pub address: Option<String>,
    /// Number of household members, when known.
    pub family_size: Option<i32>,
    /// Free-text description of the household's needs.
    pub needs_description: Option<String>,
    /// Case priority.
    pub priority_level: PriorityLevel,
    /// Geolocation latitude. Always set together with `longitude`.
    pub latitude: Option<f64>,
    /// Geolocation longitude. Always set together with `latitude`.
    pub longitude: Option<f64>,
    /// Free-text case notes.
    pub notes: Option<String>,
}

impl Family {
    /// Returns whether both coordinates are present.
    #[must_use]
    pub const fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// A dated field encounter with a family.
///
/// A visit exclusively owns its [`AidDistribution`] children and its ordered
/// list of identified needs; deleting the visit removes both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Canonical internal identifier. `None` before first persistence.
    pub visit_id: Option<i64>,
    /// The family this visit was made to.
    pub family_id: i64,
    /// The recording volunteer, when known.
    pub volunteer_id: Option<i64>,
    /// The date of the visit (ISO 8601 date).
    pub visit_date: String,
    /// Classification of the visit.
    pub visit_type: VisitType,
    /// Free-text observations recorded in the field.
    pub observations: Option<String>,
    /// Latitude where the visit was recorded.
    pub location_lat: Option<f64>,
    /// Longitude where the visit was recorded.
    pub location_lng: Option<f64>,
    /// Needs identified during the visit, in recording order.
    pub identified_needs: Vec<String>,
    /// Planned date of the next visit (ISO 8601 date).
    pub next_visit_date: Option<String>,
    /// Offline-sync flag. Stored and queryable; no reconciliation logic.
    pub synced: bool,
    /// Timestamp the record was captured (ISO 8601).
    pub recorded_at: String,
    /// Aid distributed during this visit.
    pub distributions: Vec<AidDistribution>,
}

/// A catalog entry describing a kind of assistance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AidType {
    /// Canonical internal identifier. `None` before first persistence.
    pub aid_type_id: Option<i64>,
    /// Unique catalog name (e.g. "Colis alimentaire").
    pub name: String,
    /// The category this entry belongs to.
    pub category: AidCategory,
    /// Optional description.
    pub description: Option<String>,
    /// Distribution unit (e.g. "kg", "boîte", "kit").
    pub unit: Option<String>,
    /// Whether the entry is currently offered.
    pub is_active: bool,
    /// Default quantity suggested when distributing this type.
    pub default_quantity: i32,
    /// UI icon hint (e.g. "food", "medicine").
    pub icon: Option<String>,
}

/// A concrete quantity of an aid type given during one visit.
///
/// Lifecycle is tied to the owning visit: a distribution never outlives its
/// visit and never exists unattached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AidDistribution {
    /// Canonical internal identifier. `None` before first persistence.
    pub aid_distribution_id: Option<i64>,
    /// The visit during which the aid was given.
    pub visit_id: i64,
    /// The catalog entry describing the aid.
    pub aid_type_id: i64,
    /// Additional free-text details.
    pub description: Option<String>,
    /// Quantity given. Must be positive.
    pub quantity: i32,
    /// Unit override; falls back to the aid type's unit when absent.
    pub unit: Option<String>,
    /// Expiration date for perishables (ISO 8601 date).
    pub expiration_date: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Timestamp the aid was handed over (ISO 8601).
    pub distributed_at: String,
}
