// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for user account persistence.

use crate::tests::create_test_persistence;
use crate::{Persistence, PersistenceError, UserData};

fn create_user(persistence: &mut Persistence, email: &str) -> i64 {
    persistence
        .create_user(
            "Amina",
            "Ben Salah",
            email,
            Some("+216 20 123 456"),
            "s3cret",
            "Volunteer",
            true,
            "2026-01-10T08:30:00Z",
        )
        .unwrap()
}

#[test]
fn test_create_and_get_user() {
    let mut persistence = create_test_persistence();

    let user_id = create_user(&mut persistence, "amina@example.org");

    let stored: UserData = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert_eq!(stored.email, "amina@example.org");
    assert_eq!(stored.role, "Volunteer");
    assert!(stored.is_active);
    assert_eq!(stored.created_at, "2026-01-10T08:30:00Z");
    assert!(stored.last_login_at.is_none());
}

#[test]
fn test_password_is_stored_hashed() {
    let mut persistence = create_test_persistence();

    let user_id = create_user(&mut persistence, "amina@example.org");
    let stored = persistence.get_user_by_id(user_id).unwrap().unwrap();

    assert_ne!(stored.password_hash, "s3cret");
    assert!(
        persistence
            .verify_password("s3cret", &stored.password_hash)
            .unwrap()
    );
    assert!(
        !persistence
            .verify_password("wrong", &stored.password_hash)
            .unwrap()
    );
}

#[test]
fn test_duplicate_email_is_rejected() {
    let mut persistence = create_test_persistence();

    create_user(&mut persistence, "amina@example.org");
    let result = persistence.create_user(
        "Other",
        "Person",
        "amina@example.org",
        None,
        "pw",
        "Admin",
        true,
        "2026-01-11T08:30:00Z",
    );

    assert!(matches!(result, Err(PersistenceError::DuplicateKey(_))));
    assert_eq!(persistence.count_users().unwrap(), 1);
}

#[test]
fn test_email_lookup_and_existence() {
    let mut persistence = create_test_persistence();

    create_user(&mut persistence, "amina@example.org");

    assert!(persistence.email_exists("amina@example.org").unwrap());
    assert!(!persistence.email_exists("nobody@example.org").unwrap());

    let by_email = persistence
        .get_user_by_email("amina@example.org")
        .unwrap()
        .unwrap();
    assert_eq!(by_email.first_name, "Amina");
}

#[test]
fn test_update_user_leaves_email_untouched() {
    let mut persistence = create_test_persistence();

    let user_id = create_user(&mut persistence, "amina@example.org");

    persistence
        .update_user(user_id, "Amina", "Gharbi", None, "Manager", false)
        .unwrap();

    let stored = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert_eq!(stored.email, "amina@example.org");
    assert_eq!(stored.last_name, "Gharbi");
    assert_eq!(stored.role, "Manager");
    assert!(!stored.is_active);
}

#[test]
fn test_update_password_replaces_hash() {
    let mut persistence = create_test_persistence();

    let user_id = create_user(&mut persistence, "amina@example.org");
    let before = persistence.get_user_by_id(user_id).unwrap().unwrap();

    persistence.update_password(user_id, "n3w-secret").unwrap();

    let after = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert_ne!(before.password_hash, after.password_hash);
    assert!(
        persistence
            .verify_password("n3w-secret", &after.password_hash)
            .unwrap()
    );
}

#[test]
fn test_activate_and_deactivate() {
    let mut persistence = create_test_persistence();

    let user_id = create_user(&mut persistence, "amina@example.org");

    persistence.set_user_active(user_id, false).unwrap();
    assert!(!persistence.get_user_by_id(user_id).unwrap().unwrap().is_active);
    assert!(persistence.list_active_users().unwrap().is_empty());

    persistence.set_user_active(user_id, true).unwrap();
    assert_eq!(persistence.list_active_users().unwrap().len(), 1);

    let missing = persistence.set_user_active(999, true);
    assert!(matches!(missing, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_role_filters_and_counts() {
    let mut persistence = create_test_persistence();

    create_user(&mut persistence, "volunteer@example.org");
    persistence
        .create_user(
            "Sami",
            "Admin",
            "admin@example.org",
            None,
            "pw",
            "Admin",
            true,
            "2026-01-10T08:30:00Z",
        )
        .unwrap();

    let admins = persistence.list_users_by_role("Admin").unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].email, "admin@example.org");

    assert_eq!(persistence.count_users().unwrap(), 2);
    assert_eq!(persistence.count_users_by_role("Volunteer").unwrap(), 1);
    assert_eq!(persistence.count_users_by_role("Manager").unwrap(), 0);
}

#[test]
fn test_update_last_login() {
    let mut persistence = create_test_persistence();

    let user_id = create_user(&mut persistence, "amina@example.org");
    persistence
        .update_last_login(user_id, "2026-02-01T09:00:00Z")
        .unwrap();

    let stored = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert_eq!(stored.last_login_at.as_deref(), Some("2026-02-01T09:00:00Z"));
}

#[test]
fn test_delete_user() {
    let mut persistence = create_test_persistence();

    let user_id = create_user(&mut persistence, "amina@example.org");
    persistence.delete_user(user_id).unwrap();

    assert!(persistence.get_user_by_id(user_id).unwrap().is_none());
    assert!(matches!(
        persistence.delete_user(user_id),
        Err(PersistenceError::NotFound(_))
    ));
}
