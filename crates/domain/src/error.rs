// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Role token does not match a known role.
    InvalidRole(String),
    /// Priority level token does not match a known level.
    InvalidPriorityLevel(String),
    /// Visit type token does not match a known type.
    InvalidVisitType(String),
    /// Aid category token does not match a known category.
    InvalidAidCategory(String),
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// A required name field is empty or invalid.
    InvalidName {
        /// The field that was invalid.
        field: &'static str,
        /// Description of the validation error.
        reason: String,
    },
    /// Password is empty.
    EmptyPassword,
    /// Family size must be positive when supplied.
    InvalidFamilySize {
        /// The invalid size value.
        size: i32,
    },
    /// Distribution quantity must be positive.
    InvalidQuantity {
        /// The invalid quantity value.
        quantity: i32,
    },
    /// Failed to parse a date or datetime from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(token) => write!(f, "Invalid role: {token}"),
            Self::InvalidPriorityLevel(token) => {
                write!(f, "Invalid priority level: {token}")
            }
            Self::InvalidVisitType(token) => write!(f, "Invalid visit type: {token}"),
            Self::InvalidAidCategory(token) => write!(f, "Invalid category: {token}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidName { field, reason } => {
                write!(f, "Invalid {field}: {reason}")
            }
            Self::EmptyPassword => write!(f, "Password must not be empty"),
            Self::InvalidFamilySize { size } => {
                write!(f, "Invalid family size: {size}. Must be greater than 0")
            }
            Self::InvalidQuantity { quantity } => {
                write!(f, "Invalid quantity: {quantity}. Must be greater than 0")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
