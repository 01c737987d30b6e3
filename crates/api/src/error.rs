// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use aidcase_domain::DomainError;
use aidcase_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the API
/// contract. Each variant maps to exactly one HTTP status at the server
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A uniqueness rule was violated (email, reference, catalog name).
    Conflict {
        /// The type of resource in conflict.
        resource: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// Authentication failed (unknown account or wrong credentials).
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The account exists and the credentials match, but the account is
    /// deactivated.
    AccountDisabled {
        /// The reason access is denied.
        reason: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict { resource, message } => {
                write!(f, "{resource} conflict: {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::AccountDisabled { reason } => {
                write!(f, "Account disabled: {reason}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidRole(token) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Invalid role: {token}"),
        },
        DomainError::InvalidPriorityLevel(token) => ApiError::InvalidInput {
            field: String::from("priorityLevel"),
            message: format!("Invalid priority level: {token}"),
        },
        DomainError::InvalidVisitType(token) => ApiError::InvalidInput {
            field: String::from("visitType"),
            message: format!("Invalid visit type: {token}"),
        },
        DomainError::InvalidAidCategory(token) => ApiError::InvalidInput {
            field: String::from("category"),
            message: format!("Invalid category: {token}"),
        },
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::InvalidName { field, reason } => ApiError::InvalidInput {
            field: field.to_string(),
            message: reason,
        },
        DomainError::EmptyPassword => ApiError::InvalidInput {
            field: String::from("password"),
            message: String::from("Password must not be empty"),
        },
        DomainError::InvalidFamilySize { size } => ApiError::InvalidInput {
            field: String::from("familySize"),
            message: format!("Invalid family size: {size}"),
        },
        DomainError::InvalidQuantity { quantity } => ApiError::InvalidInput {
            field: String::from("quantity"),
            message: format!("Invalid quantity: {quantity}"),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
    }
}

/// Translates a persistence error into an API error for a given resource.
///
/// Duplicate keys surface as conflicts and storage-level not-found as 404s;
/// foreign-key violations are conflicts because the request contradicts
/// existing data. Everything else is internal.
#[must_use]
pub fn translate_persistence_error(resource: &str, err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DuplicateKey(message) => ApiError::Conflict {
            resource: resource.to_string(),
            message,
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: resource.to_string(),
            message,
        },
        PersistenceError::ForeignKeyViolation(message) => ApiError::Conflict {
            resource: resource.to_string(),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
