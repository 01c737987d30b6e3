// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service handlers: one function per API operation.
//!
//! Every handler takes the persistence adapter plus a request value and
//! returns a response value or an [`ApiError`]. HTTP concerns (routing,
//! status codes, JSON) stay in the server crate.
//!
//! Uniqueness checks here are advisory fast paths; the storage layer's
//! UNIQUE constraints are authoritative, and a lost race surfaces as the
//! same conflict error.

use aidcase_domain::{
    AidCategory, AidType, Family, PriorityLevel, Role, Visit, VisitType, generate_reference,
    validate_family_fields, validate_registration, validate_user_fields,
};
use aidcase_persistence::{SqlitePersistence, UserData};
use tracing::info;

use crate::clock::{date_iso, months_before, now_iso, now_millis, today};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AidTypeRequest, CreateUserRequest, CreateVisitRequest, FamilyRequest, UpdateUserRequest,
    UpdateVisitRequest, UserResponse,
};

// ============================================================================
// Aid types
// ============================================================================

/// Lists the whole aid catalog.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn list_aid_types(persistence: &mut SqlitePersistence) -> Result<Vec<AidType>, ApiError> {
    persistence
        .list_aid_types()
        .map_err(|e| translate_persistence_error("AidType", e))
}

/// Retrieves one catalog entry.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown.
pub fn get_aid_type(
    persistence: &mut SqlitePersistence,
    aid_type_id: i64,
) -> Result<AidType, ApiError> {
    persistence
        .get_aid_type_by_id(aid_type_id)
        .map_err(|e| translate_persistence_error("AidType", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("AidType"),
            message: format!("AidType not found with id: {aid_type_id}"),
        })
}

/// Retrieves one catalog entry by its exact name.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the name is unknown.
pub fn get_aid_type_by_name(
    persistence: &mut SqlitePersistence,
    name: &str,
) -> Result<AidType, ApiError> {
    persistence
        .get_aid_type_by_name(name)
        .map_err(|e| translate_persistence_error("AidType", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("AidType"),
            message: format!("AidType not found with name: {name}"),
        })
}

/// Creates a catalog entry. The name must be unique (exact match).
///
/// # Errors
///
/// Returns `Conflict` if the name exists, `InvalidInput` for an unknown
/// category token.
pub fn create_aid_type(
    persistence: &mut SqlitePersistence,
    request: &AidTypeRequest,
) -> Result<AidType, ApiError> {
    let aid_type: AidType = aid_type_from_request(request)?;

    if persistence
        .get_aid_type_by_name(&aid_type.name)
        .map_err(|e| translate_persistence_error("AidType", e))?
        .is_some()
    {
        return Err(ApiError::Conflict {
            resource: String::from("AidType"),
            message: format!("AidType with name '{}' already exists", aid_type.name),
        });
    }

    let aid_type_id: i64 = persistence
        .create_aid_type(&aid_type)
        .map_err(|e| translate_persistence_error("AidType", e))?;

    info!(aid_type_id, name = %aid_type.name, "Created aid type");
    Ok(AidType {
        aid_type_id: Some(aid_type_id),
        ..aid_type
    })
}

/// Overwrites every field of a catalog entry.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown, `InvalidInput` for an
/// unknown category token, `Conflict` if the new name collides.
pub fn update_aid_type(
    persistence: &mut SqlitePersistence,
    aid_type_id: i64,
    request: &AidTypeRequest,
) -> Result<AidType, ApiError> {
    let aid_type: AidType = aid_type_from_request(request)?;

    persistence
        .update_aid_type(aid_type_id, &aid_type)
        .map_err(|e| translate_persistence_error("AidType", e))?;

    Ok(AidType {
        aid_type_id: Some(aid_type_id),
        ..aid_type
    })
}

/// Deletes a catalog entry.
///
/// There is no guard for recorded distributions; a delete that would
/// orphan them is rejected by the storage layer as a conflict.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown, `Conflict` if the
/// entry is referenced by distributions.
pub fn delete_aid_type(
    persistence: &mut SqlitePersistence,
    aid_type_id: i64,
) -> Result<(), ApiError> {
    persistence
        .delete_aid_type(aid_type_id)
        .map_err(|e| translate_persistence_error("AidType", e))
}

/// Lists catalog entries in a category. The token parses case-insensitively.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown category token.
pub fn list_aid_types_by_category(
    persistence: &mut SqlitePersistence,
    category_token: &str,
) -> Result<Vec<AidType>, ApiError> {
    let category: AidCategory =
        AidCategory::parse(category_token).map_err(translate_domain_error)?;

    persistence
        .list_aid_types_by_category(category.as_str())
        .map_err(|e| translate_persistence_error("AidType", e))
}

/// Lists catalog entries currently offered.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn list_active_aid_types(
    persistence: &mut SqlitePersistence,
) -> Result<Vec<AidType>, ApiError> {
    persistence
        .list_active_aid_types()
        .map_err(|e| translate_persistence_error("AidType", e))
}

/// Seeds the six-entry starter catalog when the catalog is empty.
/// Idempotent; returns the number of entries inserted.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn initialize_default_aid_types(
    persistence: &mut SqlitePersistence,
) -> Result<usize, ApiError> {
    persistence
        .seed_default_aid_types()
        .map_err(|e| translate_persistence_error("AidType", e))
}

fn aid_type_from_request(request: &AidTypeRequest) -> Result<AidType, ApiError> {
    let category: AidCategory =
        AidCategory::parse(&request.category).map_err(translate_domain_error)?;

    Ok(AidType {
        aid_type_id: None,
        name: request.name.clone(),
        category,
        description: request.description.clone(),
        unit: request.unit.clone(),
        is_active: request.active.unwrap_or(true),
        default_quantity: request.default_quantity.unwrap_or(1),
        icon: request.icon.clone(),
    })
}

// ============================================================================
// Families
// ============================================================================

/// Lists all family records.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn list_families(persistence: &mut SqlitePersistence) -> Result<Vec<Family>, ApiError> {
    persistence
        .list_families()
        .map_err(|e| translate_persistence_error("Family", e))
}

/// Retrieves one family.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown.
pub fn get_family(
    persistence: &mut SqlitePersistence,
    family_id: i64,
) -> Result<Family, ApiError> {
    persistence
        .get_family_by_id(family_id)
        .map_err(|e| translate_persistence_error("Family", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Family"),
            message: format!("Family not found with id: {family_id}"),
        })
}

/// Creates a family record.
///
/// A blank or absent reference is synthesized from the current time
/// (`FAM-<n>`, n in 0..=9999). Generated or not, the reference must be
/// unique; collisions are a conflict.
///
/// # Errors
///
/// Returns `Conflict` on a duplicate reference, `InvalidInput` for bad
/// fields or an unknown priority token.
pub fn create_family(
    persistence: &mut SqlitePersistence,
    request: &FamilyRequest,
) -> Result<Family, ApiError> {
    let mut family: Family = family_from_request(request)?;
    validate_family_fields(&family).map_err(translate_domain_error)?;

    if family.reference.trim().is_empty() {
        family.reference = generate_reference(now_millis());
    }

    if persistence
        .reference_exists(&family.reference)
        .map_err(|e| translate_persistence_error("Family", e))?
    {
        return Err(ApiError::Conflict {
            resource: String::from("Family"),
            message: format!("Family reference already exists: {}", family.reference),
        });
    }

    let family_id: i64 = persistence
        .create_family(&family)
        .map_err(|e| translate_persistence_error("Family", e))?;

    info!(family_id, reference = %family.reference, "Created family");
    Ok(Family {
        family_id: Some(family_id),
        ..family
    })
}

/// Updates a family record.
///
/// Head-of-family, phone, address, size, needs, priority, and notes are
/// overwritten unconditionally. Geolocation is overwritten only when the
/// request supplies both coordinates; a one-sided pair is ignored.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown, `InvalidInput` for
/// bad fields or an unknown priority token.
pub fn update_family(
    persistence: &mut SqlitePersistence,
    family_id: i64,
    request: &FamilyRequest,
) -> Result<Family, ApiError> {
    let incoming: Family = family_from_request(request)?;
    validate_family_fields(&incoming).map_err(translate_domain_error)?;

    let location: Option<(f64, f64)> = match (request.latitude, request.longitude) {
        (Some(latitude), Some(longitude)) => Some((latitude, longitude)),
        _ => None,
    };

    persistence
        .update_family(
            family_id,
            &incoming.head_of_family,
            incoming.phone.as_deref(),
            incoming.address.as_deref(),
            incoming.family_size,
            incoming.needs_description.as_deref(),
            incoming.priority_level.as_str(),
            incoming.notes.as_deref(),
            location,
        )
        .map_err(|e| translate_persistence_error("Family", e))?;

    get_family(persistence, family_id)
}

/// Deletes a family record.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown, `Conflict` if visits
/// still reference the family.
pub fn delete_family(
    persistence: &mut SqlitePersistence,
    family_id: i64,
) -> Result<(), ApiError> {
    persistence
        .delete_family(family_id)
        .map_err(|e| translate_persistence_error("Family", e))
}

/// Free-text family search.
///
/// A blank or absent query returns the full list; otherwise the trimmed
/// term is matched case-insensitively against head-of-family, address,
/// and reference.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn search_families(
    persistence: &mut SqlitePersistence,
    query: Option<&str>,
) -> Result<Vec<Family>, ApiError> {
    let trimmed: &str = query.unwrap_or("").trim();
    if trimmed.is_empty() {
        return list_families(persistence);
    }

    persistence
        .search_families(trimmed)
        .map_err(|e| translate_persistence_error("Family", e))
}

/// Lists families at a given priority. The token parses case-insensitively.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown priority token.
pub fn list_families_by_priority(
    persistence: &mut SqlitePersistence,
    priority_token: &str,
) -> Result<Vec<Family>, ApiError> {
    let priority: PriorityLevel =
        PriorityLevel::parse(priority_token).map_err(translate_domain_error)?;

    persistence
        .list_families_by_priority(priority.as_str())
        .map_err(|e| translate_persistence_error("Family", e))
}

/// Counts all family records.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn count_families(persistence: &mut SqlitePersistence) -> Result<i64, ApiError> {
    persistence
        .count_families()
        .map_err(|e| translate_persistence_error("Family", e))
}

fn family_from_request(request: &FamilyRequest) -> Result<Family, ApiError> {
    let priority_level: PriorityLevel = match &request.priority_level {
        Some(token) => PriorityLevel::parse(token).map_err(translate_domain_error)?,
        None => PriorityLevel::default(),
    };

    Ok(Family {
        family_id: None,
        reference: request.reference.clone().unwrap_or_default(),
        head_of_family: request.head_of_family.clone(),
        phone: request.phone.clone(),
        address: request.address.clone(),
        family_size: request.family_size,
        needs_description: request.needs_description.clone(),
        priority_level,
        latitude: request.latitude,
        longitude: request.longitude,
        notes: request.notes.clone(),
    })
}

// ============================================================================
// Visits
// ============================================================================

/// Lists all visits.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn list_visits(persistence: &mut SqlitePersistence) -> Result<Vec<Visit>, ApiError> {
    persistence
        .list_visits()
        .map_err(|e| translate_persistence_error("Visit", e))
}

/// Retrieves one visit with its needs and distributions.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown.
pub fn get_visit(persistence: &mut SqlitePersistence, visit_id: i64) -> Result<Visit, ApiError> {
    persistence
        .get_visit_by_id(visit_id)
        .map_err(|e| translate_persistence_error("Visit", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Visit"),
            message: format!("Visit not found with id: {visit_id}"),
        })
}

/// Creates a visit under a family.
///
/// The visit date defaults to today when absent, the type to REGULAR, and
/// the sync flag is forced on; offline clients re-submit through their own
/// channel.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the family is unknown, `InvalidInput`
/// for an unknown visit-type token.
pub fn create_visit(
    persistence: &mut SqlitePersistence,
    family_id: i64,
    request: &CreateVisitRequest,
) -> Result<Visit, ApiError> {
    // The family must resolve before anything is written
    let _family: Family = get_family(persistence, family_id)?;

    let visit_type: VisitType = match &request.visit_type {
        Some(token) => VisitType::parse(token).map_err(translate_domain_error)?,
        None => VisitType::default(),
    };

    let visit_date: String = match &request.visit_date {
        Some(date) => date.clone(),
        None => date_iso(today())?,
    };

    let visit = Visit {
        visit_id: None,
        family_id,
        volunteer_id: request.volunteer_id,
        visit_date,
        visit_type,
        observations: request.observations.clone(),
        location_lat: request.location_lat,
        location_lng: request.location_lng,
        identified_needs: request.identified_needs.clone(),
        next_visit_date: request.next_visit_date.clone(),
        synced: true,
        recorded_at: now_iso()?,
        distributions: Vec::new(),
    };

    let visit_id: i64 = persistence
        .create_visit(&visit)
        .map_err(|e| translate_persistence_error("Visit", e))?;

    info!(visit_id, family_id, "Created visit");
    get_visit(persistence, visit_id)
}

/// Updates a visit's date, type, observations, location, and planned next
/// visit. Family, volunteer, needs, and distributions are untouched.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown, `InvalidInput` for an
/// unknown visit-type token.
pub fn update_visit(
    persistence: &mut SqlitePersistence,
    visit_id: i64,
    request: &UpdateVisitRequest,
) -> Result<Visit, ApiError> {
    let visit_type: VisitType =
        VisitType::parse(&request.visit_type).map_err(translate_domain_error)?;

    persistence
        .update_visit(
            visit_id,
            &request.visit_date,
            visit_type.as_str(),
            request.observations.as_deref(),
            request.location_lat,
            request.location_lng,
            request.next_visit_date.as_deref(),
        )
        .map_err(|e| translate_persistence_error("Visit", e))?;

    get_visit(persistence, visit_id)
}

/// Deletes a visit and its owned needs and distributions.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown.
pub fn delete_visit(persistence: &mut SqlitePersistence, visit_id: i64) -> Result<(), ApiError> {
    persistence
        .delete_visit(visit_id)
        .map_err(|e| translate_persistence_error("Visit", e))
}

/// Lists a family's visits, most recent first.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the family is unknown.
pub fn list_visits_by_family(
    persistence: &mut SqlitePersistence,
    family_id: i64,
) -> Result<Vec<Visit>, ApiError> {
    let _family: Family = get_family(persistence, family_id)?;

    persistence
        .list_visits_by_family(family_id)
        .map_err(|e| translate_persistence_error("Visit", e))
}

/// Lists visits from the trailing one-month window, both boundaries
/// inclusive.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn list_recent_visits(persistence: &mut SqlitePersistence) -> Result<Vec<Visit>, ApiError> {
    let end = today();
    let start = months_before(end, 1)?;

    persistence
        .list_visits_between(&date_iso(start)?, &date_iso(end)?)
        .map_err(|e| translate_persistence_error("Visit", e))
}

/// Lists visits not yet marked as synced.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn list_unsynced_visits(persistence: &mut SqlitePersistence) -> Result<Vec<Visit>, ApiError> {
    persistence
        .list_unsynced_visits()
        .map_err(|e| translate_persistence_error("Visit", e))
}

// ============================================================================
// Users
// ============================================================================

/// Lists all user profiles.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn list_users(persistence: &mut SqlitePersistence) -> Result<Vec<UserResponse>, ApiError> {
    let users: Vec<UserData> = persistence
        .list_users()
        .map_err(|e| translate_persistence_error("User", e))?;

    Ok(users.into_iter().map(UserResponse::from_data).collect())
}

/// Retrieves one user profile.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown.
pub fn get_user(
    persistence: &mut SqlitePersistence,
    user_id: i64,
) -> Result<UserResponse, ApiError> {
    persistence
        .get_user_by_id(user_id)
        .map_err(|e| translate_persistence_error("User", e))?
        .map(UserResponse::from_data)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User not found with id: {user_id}"),
        })
}

/// Retrieves one user profile by email.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the email is unknown.
pub fn get_user_by_email(
    persistence: &mut SqlitePersistence,
    email: &str,
) -> Result<UserResponse, ApiError> {
    persistence
        .get_user_by_email(email)
        .map_err(|e| translate_persistence_error("User", e))?
        .map(UserResponse::from_data)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User not found with email: {email}"),
        })
}

/// Creates a user account. The password is hashed before storage; the
/// role defaults to Volunteer and the account starts active.
///
/// # Errors
///
/// Returns `Conflict` if the email is registered, `InvalidInput` for bad
/// fields or an unknown role token.
pub fn create_user(
    persistence: &mut SqlitePersistence,
    request: &CreateUserRequest,
) -> Result<UserResponse, ApiError> {
    let role: Role = match &request.role {
        Some(token) => Role::parse(token).map_err(translate_domain_error)?,
        None => Role::default(),
    };
    let is_active: bool = request.active.unwrap_or(true);

    let candidate = aidcase_domain::User {
        user_id: None,
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        email: request.email.clone(),
        phone: request.phone.clone(),
        role,
        is_active,
        created_at: String::new(),
        last_login_at: None,
    };
    validate_registration(&candidate, &request.password).map_err(translate_domain_error)?;

    if persistence
        .email_exists(&request.email)
        .map_err(|e| translate_persistence_error("User", e))?
    {
        return Err(ApiError::Conflict {
            resource: String::from("User"),
            message: format!("User with email '{}' already exists", request.email),
        });
    }

    let created_at: String = now_iso()?;
    let user_id: i64 = persistence
        .create_user(
            &request.first_name,
            &request.last_name,
            &request.email,
            request.phone.as_deref(),
            &request.password,
            role.as_str(),
            is_active,
            &created_at,
        )
        .map_err(|e| translate_persistence_error("User", e))?;

    info!(user_id, email = %request.email, "Created user");
    get_user(persistence, user_id)
}

/// Updates a user's profile. The email address is immutable here.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown, `InvalidInput` for
/// bad fields or an unknown role token.
pub fn update_user(
    persistence: &mut SqlitePersistence,
    user_id: i64,
    request: &UpdateUserRequest,
) -> Result<UserResponse, ApiError> {
    let role: Role = Role::parse(&request.role).map_err(translate_domain_error)?;

    let current: UserResponse = get_user(persistence, user_id)?;
    let candidate = aidcase_domain::User {
        user_id: Some(user_id),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        email: current.email,
        phone: request.phone.clone(),
        role,
        is_active: request.active,
        created_at: current.created_at,
        last_login_at: current.last_login_at,
    };
    validate_user_fields(&candidate).map_err(translate_domain_error)?;

    persistence
        .update_user(
            user_id,
            &request.first_name,
            &request.last_name,
            request.phone.as_deref(),
            role.as_str(),
            request.active,
        )
        .map_err(|e| translate_persistence_error("User", e))?;

    get_user(persistence, user_id)
}

/// Deletes a user account.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown.
pub fn delete_user(persistence: &mut SqlitePersistence, user_id: i64) -> Result<(), ApiError> {
    persistence
        .delete_user(user_id)
        .map_err(|e| translate_persistence_error("User", e))
}

/// Replaces a user's password with a fresh hash.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown, `InvalidInput` for an
/// empty password.
pub fn set_password(
    persistence: &mut SqlitePersistence,
    user_id: i64,
    new_password: &str,
) -> Result<UserResponse, ApiError> {
    if new_password.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("password"),
            message: String::from("Password must not be empty"),
        });
    }

    persistence
        .update_password(user_id, new_password)
        .map_err(|e| translate_persistence_error("User", e))?;

    get_user(persistence, user_id)
}

/// Profile-returning login: verifies credentials against the stored hash
/// and stamps the login time. Issues no token; the token path lives on
/// the auth resource.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown email,
/// `AuthenticationFailed` for a wrong password, `AccountDisabled` for a
/// deactivated account.
pub fn login_user(
    persistence: &mut SqlitePersistence,
    email: &str,
    password: &str,
) -> Result<UserResponse, ApiError> {
    let user: UserData = persistence
        .get_user_by_email(email)
        .map_err(|e| translate_persistence_error("User", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User not found with email: {email}"),
        })?;

    let matches: bool = persistence
        .verify_password(password, &user.password_hash)
        .map_err(|e| translate_persistence_error("User", e))?;
    if !matches {
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Invalid password"),
        });
    }

    if !user.is_active {
        return Err(ApiError::AccountDisabled {
            reason: String::from("User account is deactivated"),
        });
    }

    let now: String = now_iso()?;
    persistence
        .update_last_login(user.user_id, &now)
        .map_err(|e| translate_persistence_error("User", e))?;

    get_user(persistence, user.user_id)
}

/// Lists users with a given role. The token parses case-insensitively.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown role token.
pub fn list_users_by_role(
    persistence: &mut SqlitePersistence,
    role_token: &str,
) -> Result<Vec<UserResponse>, ApiError> {
    let role: Role = Role::parse(role_token).map_err(translate_domain_error)?;

    let users: Vec<UserData> = persistence
        .list_users_by_role(role.as_str())
        .map_err(|e| translate_persistence_error("User", e))?;

    Ok(users.into_iter().map(UserResponse::from_data).collect())
}

/// Lists active users.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn list_active_users(
    persistence: &mut SqlitePersistence,
) -> Result<Vec<UserResponse>, ApiError> {
    let users: Vec<UserData> = persistence
        .list_active_users()
        .map_err(|e| translate_persistence_error("User", e))?;

    Ok(users.into_iter().map(UserResponse::from_data).collect())
}

/// Reactivates a user account.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown.
pub fn activate_user(
    persistence: &mut SqlitePersistence,
    user_id: i64,
) -> Result<UserResponse, ApiError> {
    persistence
        .set_user_active(user_id, true)
        .map_err(|e| translate_persistence_error("User", e))?;

    get_user(persistence, user_id)
}

/// Deactivates a user account and invalidates its sessions so existing
/// tokens stop working immediately.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the id is unknown.
pub fn deactivate_user(
    persistence: &mut SqlitePersistence,
    user_id: i64,
) -> Result<UserResponse, ApiError> {
    persistence
        .set_user_active(user_id, false)
        .map_err(|e| translate_persistence_error("User", e))?;

    persistence
        .delete_sessions_for_user(user_id)
        .map_err(|e| translate_persistence_error("Session", e))?;

    get_user(persistence, user_id)
}

/// Counts all users.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn count_users(persistence: &mut SqlitePersistence) -> Result<i64, ApiError> {
    persistence
        .count_users()
        .map_err(|e| translate_persistence_error("User", e))
}

/// Counts users with a given role. The token parses case-insensitively.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown role token.
pub fn count_users_by_role(
    persistence: &mut SqlitePersistence,
    role_token: &str,
) -> Result<i64, ApiError> {
    let role: Role = Role::parse(role_token).map_err(translate_domain_error)?;

    persistence
        .count_users_by_role(role.as_str())
        .map_err(|e| translate_persistence_error("User", e))
}
