// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the aidcase case-management backend.
//!
//! Handlers own validation, default population, uniqueness checks, and the
//! translation of storage conditions into API errors. The HTTP server crate
//! maps these functions onto routes and status codes; the persistence crate
//! executes the queries.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod clock;
mod dashboard;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::AuthenticationService;
pub use dashboard::{
    AidStats, DashboardOverview, EstimatedCount, FamilyMapPoint, FamilyStats, MapData,
    MonthlyActivity, QuickIndicators, aid_stats, family_stats, map_data, overview,
    quick_indicators,
};
pub use error::{ApiError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    activate_user, count_families, count_users, count_users_by_role, create_aid_type,
    create_family, create_user, create_visit, deactivate_user, delete_aid_type, delete_family,
    delete_user, delete_visit, get_aid_type, get_aid_type_by_name, get_family, get_user,
    get_user_by_email, get_visit, initialize_default_aid_types, list_active_aid_types,
    list_active_users, list_aid_types, list_aid_types_by_category, list_families,
    list_families_by_priority, list_recent_visits, list_unsynced_visits, list_users,
    list_users_by_role, list_visits, list_visits_by_family, login_user, search_families,
    set_password, update_aid_type, update_family, update_user, update_visit,
};
pub use request_response::{
    AidTypeRequest, AuthResponse, CreateUserRequest, CreateVisitRequest, FamilyRequest,
    LoginRequest, RegisterRequest, UpdateUserRequest, UpdateVisitRequest, UserResponse,
};
