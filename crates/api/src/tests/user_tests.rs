// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the user handlers, including the profile-returning login.

use aidcase_domain::parse_datetime;

use crate::error::ApiError;
use crate::handlers::{
    activate_user, count_users, count_users_by_role, create_user, deactivate_user, delete_user,
    get_user, get_user_by_email, list_active_users, list_users, list_users_by_role, login_user,
    set_password, update_user,
};
use crate::request_response::UpdateUserRequest;
use crate::tests::{create_test_persistence, create_user_request};

#[test]
fn test_create_applies_defaults() {
    let mut persistence = create_test_persistence();

    let created = create_user(&mut persistence, &create_user_request("amina@example.org")).unwrap();

    assert_eq!(created.role, "Volunteer");
    assert!(created.active);
    assert!(created.last_login_at.is_none());
    assert!(parse_datetime(&created.created_at).is_ok());
}

#[test]
fn test_duplicate_email_is_conflict() {
    let mut persistence = create_test_persistence();

    create_user(&mut persistence, &create_user_request("amina@example.org")).unwrap();
    let result = create_user(&mut persistence, &create_user_request("amina@example.org"));

    match result.unwrap_err() {
        ApiError::Conflict { resource, .. } => assert_eq!(resource, "User"),
        other => panic!("Expected Conflict error, got: {other:?}"),
    }
    assert_eq!(count_users(&mut persistence).unwrap(), 1);
}

#[test]
fn test_unknown_role_token_is_invalid_input() {
    let mut persistence = create_test_persistence();

    let mut request = create_user_request("amina@example.org");
    request.role = Some(String::from("superuser"));

    match create_user(&mut persistence, &request).unwrap_err() {
        ApiError::InvalidInput { field, .. } => assert_eq!(field, "role"),
        other => panic!("Expected InvalidInput error, got: {other:?}"),
    }
}

#[test]
fn test_login_success_stamps_last_login() {
    let mut persistence = create_test_persistence();

    let created = create_user(&mut persistence, &create_user_request("a@b.com")).unwrap();

    let logged_in = login_user(&mut persistence, "a@b.com", "s3cret").unwrap();

    let login_time = parse_datetime(logged_in.last_login_at.as_deref().unwrap()).unwrap();
    let creation_time = parse_datetime(&created.created_at).unwrap();
    assert!(login_time >= creation_time);
}

#[test]
fn test_login_with_wrong_password_is_unauthorized_and_leaves_last_login() {
    let mut persistence = create_test_persistence();

    create_user(&mut persistence, &create_user_request("a@b.com")).unwrap();

    let result = login_user(&mut persistence, "a@b.com", "wrong");
    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));

    let stored = get_user_by_email(&mut persistence, "a@b.com").unwrap();
    assert!(stored.last_login_at.is_none());
}

#[test]
fn test_login_with_unknown_email_is_not_found() {
    let mut persistence = create_test_persistence();

    let result = login_user(&mut persistence, "nobody@example.org", "pw");
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_login_to_deactivated_account_is_forbidden() {
    let mut persistence = create_test_persistence();

    let created = create_user(&mut persistence, &create_user_request("a@b.com")).unwrap();
    deactivate_user(&mut persistence, created.user_id).unwrap();

    let result = login_user(&mut persistence, "a@b.com", "s3cret");
    assert!(matches!(result, Err(ApiError::AccountDisabled { .. })));
}

#[test]
fn test_update_keeps_email_immutable() {
    let mut persistence = create_test_persistence();

    let created = create_user(&mut persistence, &create_user_request("amina@example.org")).unwrap();

    let updated = update_user(
        &mut persistence,
        created.user_id,
        &UpdateUserRequest {
            first_name: String::from("Amina"),
            last_name: String::from("Gharbi"),
            phone: None,
            role: String::from("manager"),
            active: true,
        },
    )
    .unwrap();

    assert_eq!(updated.email, "amina@example.org");
    assert_eq!(updated.last_name, "Gharbi");
    assert_eq!(updated.role, "Manager");
}

#[test]
fn test_set_password_allows_login_with_new_secret() {
    let mut persistence = create_test_persistence();

    let created = create_user(&mut persistence, &create_user_request("a@b.com")).unwrap();
    set_password(&mut persistence, created.user_id, "n3w-secret").unwrap();

    assert!(matches!(
        login_user(&mut persistence, "a@b.com", "s3cret"),
        Err(ApiError::AuthenticationFailed { .. })
    ));
    assert!(login_user(&mut persistence, "a@b.com", "n3w-secret").is_ok());

    let empty = set_password(&mut persistence, created.user_id, "");
    assert!(matches!(empty, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_activate_and_deactivate_round_trip() {
    let mut persistence = create_test_persistence();

    let created = create_user(&mut persistence, &create_user_request("a@b.com")).unwrap();

    let deactivated = deactivate_user(&mut persistence, created.user_id).unwrap();
    assert!(!deactivated.active);
    assert!(list_active_users(&mut persistence).unwrap().is_empty());

    let reactivated = activate_user(&mut persistence, created.user_id).unwrap();
    assert!(reactivated.active);
    assert_eq!(list_active_users(&mut persistence).unwrap().len(), 1);
}

#[test]
fn test_role_filters_and_counts() {
    let mut persistence = create_test_persistence();

    create_user(&mut persistence, &create_user_request("volunteer@example.org")).unwrap();
    let mut admin = create_user_request("admin@example.org");
    admin.role = Some(String::from("Admin"));
    create_user(&mut persistence, &admin).unwrap();

    assert_eq!(list_users(&mut persistence).unwrap().len(), 2);
    assert_eq!(
        list_users_by_role(&mut persistence, "admin").unwrap().len(),
        1
    );
    assert_eq!(count_users_by_role(&mut persistence, "VOLUNTEER").unwrap(), 1);

    assert!(matches!(
        count_users_by_role(&mut persistence, "intern").unwrap_err(),
        ApiError::InvalidInput { .. }
    ));
}

#[test]
fn test_delete_and_lookup_by_email() {
    let mut persistence = create_test_persistence();

    let created = create_user(&mut persistence, &create_user_request("a@b.com")).unwrap();

    assert_eq!(
        get_user_by_email(&mut persistence, "a@b.com").unwrap().user_id,
        created.user_id
    );

    delete_user(&mut persistence, created.user_id).unwrap();
    assert!(matches!(
        get_user(&mut persistence, created.user_id).unwrap_err(),
        ApiError::ResourceNotFound { .. }
    ));
}
