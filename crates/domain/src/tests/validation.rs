// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::tests::{create_test_family, create_test_user};
use crate::validation::{
    validate_family_fields, validate_quantity, validate_registration, validate_user_fields,
};

#[test]
fn test_valid_user_passes() {
    assert!(validate_user_fields(&create_test_user()).is_ok());
}

#[test]
fn test_empty_first_name_is_rejected() {
    let mut user = create_test_user();
    user.first_name = String::from("  ");
    match validate_user_fields(&user).unwrap_err() {
        DomainError::InvalidName { field, .. } => assert_eq!(field, "first name"),
        other => panic!("Expected InvalidName error, got: {other:?}"),
    }
}

#[test]
fn test_email_without_at_is_rejected() {
    let mut user = create_test_user();
    user.email = String::from("amina.example.org");
    assert!(matches!(
        validate_user_fields(&user).unwrap_err(),
        DomainError::InvalidEmail(_)
    ));
}

#[test]
fn test_registration_requires_password() {
    let user = create_test_user();
    assert_eq!(
        validate_registration(&user, "").unwrap_err(),
        DomainError::EmptyPassword
    );
    assert!(validate_registration(&user, "s3cret").is_ok());
}

#[test]
fn test_valid_family_passes() {
    assert!(validate_family_fields(&create_test_family()).is_ok());
}

#[test]
fn test_empty_head_of_family_is_rejected() {
    let mut family = create_test_family();
    family.head_of_family = String::new();
    assert!(matches!(
        validate_family_fields(&family).unwrap_err(),
        DomainError::InvalidName { .. }
    ));
}

#[test]
fn test_non_positive_family_size_is_rejected() {
    let mut family = create_test_family();
    family.family_size = Some(0);
    assert_eq!(
        validate_family_fields(&family).unwrap_err(),
        DomainError::InvalidFamilySize { size: 0 }
    );
}

#[test]
fn test_quantity_must_be_positive() {
    assert!(validate_quantity(3).is_ok());
    assert_eq!(
        validate_quantity(0).unwrap_err(),
        DomainError::InvalidQuantity { quantity: 0 }
    );
    assert_eq!(
        validate_quantity(-2).unwrap_err(),
        DomainError::InvalidQuantity { quantity: -2 }
    );
}
