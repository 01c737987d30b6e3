// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation rules.
//!
//! Uniqueness checks are not performed here; they belong to the service
//! layer backed by storage constraints.

use crate::entities::{Family, User};
use crate::error::DomainError;

/// Validates the fields of a user record.
///
/// # Errors
///
/// Returns an error if a name field is empty or the email is malformed.
pub fn validate_user_fields(user: &User) -> Result<(), DomainError> {
    if user.first_name.trim().is_empty() {
        return Err(DomainError::InvalidName {
            field: "first name",
            reason: String::from("must not be empty"),
        });
    }
    if user.last_name.trim().is_empty() {
        return Err(DomainError::InvalidName {
            field: "last name",
            reason: String::from("must not be empty"),
        });
    }
    validate_email(&user.email)
}

/// Validates registration input (user fields plus a non-empty password).
///
/// # Errors
///
/// Returns an error if a user field is invalid or the password is empty.
pub fn validate_registration(user: &User, password: &str) -> Result<(), DomainError> {
    validate_user_fields(user)?;
    if password.is_empty() {
        return Err(DomainError::EmptyPassword);
    }
    Ok(())
}

/// Validates the fields of a family record.
///
/// # Errors
///
/// Returns an error if the head-of-family name is empty or the family size
/// is non-positive.
pub fn validate_family_fields(family: &Family) -> Result<(), DomainError> {
    if family.head_of_family.trim().is_empty() {
        return Err(DomainError::InvalidName {
            field: "head of family",
            reason: String::from("must not be empty"),
        });
    }
    if let Some(size) = family.family_size
        && size <= 0
    {
        return Err(DomainError::InvalidFamilySize { size });
    }
    Ok(())
}

/// Validates a distribution quantity.
///
/// # Errors
///
/// Returns an error if the quantity is not positive.
pub const fn validate_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::InvalidQuantity { quantity });
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "must not be empty",
        )));
    }
    // Minimal structural check; deliverability is out of scope.
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' is missing an '@'"
        )));
    };
    if local.is_empty() || domain.is_empty() {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' is not a valid address"
        )));
    }
    Ok(())
}
