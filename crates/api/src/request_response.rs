// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Family, visit, and aid-type reads return the domain records directly;
//! the DTOs here cover writes (where defaults and enum tokens arrive as
//! strings) and users (whose stored form carries a credential hash that
//! must never leave the persistence layer).

use aidcase_persistence::UserData;
use serde::{Deserialize, Serialize};

/// Request body for creating or fully overwriting an aid type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AidTypeRequest {
    /// Unique catalog name.
    pub name: String,
    /// Category token, parsed case-insensitively (e.g. "FOOD").
    pub category: String,
    /// Optional description.
    pub description: Option<String>,
    /// Distribution unit (e.g. "kg").
    pub unit: Option<String>,
    /// Whether the entry is offered; defaults to true.
    pub active: Option<bool>,
    /// Default quantity; defaults to 1.
    pub default_quantity: Option<i32>,
    /// UI icon hint.
    pub icon: Option<String>,
}

/// Request body for creating or updating a family.
///
/// On create, a blank or absent `reference` triggers generation; on
/// update, the reference is immutable and the field is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyRequest {
    /// Human-facing unique case reference.
    pub reference: Option<String>,
    /// Name of the head of the household.
    pub head_of_family: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Optional street address.
    pub address: Option<String>,
    /// Number of household members.
    pub family_size: Option<i32>,
    /// Free-text needs description.
    pub needs_description: Option<String>,
    /// Priority token, parsed case-insensitively; defaults to "Medium".
    pub priority_level: Option<String>,
    /// Geolocation latitude. Applied only together with `longitude`.
    pub latitude: Option<f64>,
    /// Geolocation longitude. Applied only together with `latitude`.
    pub longitude: Option<f64>,
    /// Free-text case notes.
    pub notes: Option<String>,
}

/// Request body for creating a visit under a family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateVisitRequest {
    /// The recording volunteer, when known.
    pub volunteer_id: Option<i64>,
    /// Visit date (ISO 8601); defaults to today.
    pub visit_date: Option<String>,
    /// Visit type token, parsed case-insensitively; defaults to "REGULAR".
    pub visit_type: Option<String>,
    /// Free-text observations.
    pub observations: Option<String>,
    /// Latitude where the visit was recorded.
    pub location_lat: Option<f64>,
    /// Longitude where the visit was recorded.
    pub location_lng: Option<f64>,
    /// Needs identified during the visit, in recording order.
    #[serde(default)]
    pub identified_needs: Vec<String>,
    /// Planned date of the next visit (ISO 8601).
    pub next_visit_date: Option<String>,
}

/// Request body for updating a visit.
///
/// Family, volunteer, sync flag, needs, and distributions are not
/// reachable through this path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateVisitRequest {
    /// The new visit date (ISO 8601).
    pub visit_date: String,
    /// The new visit type token, parsed case-insensitively.
    pub visit_type: String,
    /// The new observations value.
    pub observations: Option<String>,
    /// The new recorded latitude.
    pub location_lat: Option<f64>,
    /// The new recorded longitude.
    pub location_lng: Option<f64>,
    /// The new planned next visit date (ISO 8601).
    pub next_visit_date: Option<String>,
}

/// Request body for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// Unique email address.
    pub email: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// The plain-text password (hashed before storage).
    pub password: String,
    /// Role token, parsed case-insensitively; defaults to "Volunteer".
    pub role: Option<String>,
    /// Whether the account may log in; defaults to true.
    pub active: Option<bool>,
}

/// Request body for updating a user's profile.
///
/// The email address is immutable through this path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// The new first name.
    pub first_name: String,
    /// The new last name.
    pub last_name: String,
    /// The new phone value.
    pub phone: Option<String>,
    /// The new role token, parsed case-insensitively.
    pub role: String,
    /// The new active flag.
    pub active: bool,
}

/// A user profile as returned to clients. Never carries the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// The user's canonical identifier.
    pub user_id: i64,
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// The user's email address.
    pub email: String,
    /// The user's phone number.
    pub phone: Option<String>,
    /// The user's role (canonical string).
    pub role: String,
    /// Whether the account may log in.
    pub active: bool,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Timestamp of the most recent successful login (ISO 8601).
    pub last_login_at: Option<String>,
}

impl UserResponse {
    /// Projects the stored form onto the client-facing profile, dropping
    /// the credential hash.
    #[must_use]
    pub fn from_data(data: UserData) -> Self {
        Self {
            user_id: data.user_id,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            role: data.role,
            active: data.is_active,
            created_at: data.created_at,
            last_login_at: data.last_login_at,
        }
    }
}

/// Request body for self-service registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// Unique email address.
    pub email: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// The plain-text password (hashed before storage).
    pub password: String,
    /// Role token, parsed case-insensitively; defaults to "Volunteer".
    pub role: Option<String>,
}

/// Request body for the token-issuing login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The account email address.
    pub email: String,
    /// The plain-text password.
    pub password: String,
}

/// Response for register and login: a session token plus profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The opaque session token.
    pub token: String,
    /// The account email address (the token subject).
    pub email: String,
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// The user's role (canonical string); the session itself carries the
    /// derived `ROLE_<ROLE>` claim.
    pub role: String,
    /// Token expiration timestamp (ISO 8601).
    pub expires_at: String,
}
