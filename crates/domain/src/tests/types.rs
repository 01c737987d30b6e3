// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::tests::create_test_family;
use crate::types::{AidCategory, PriorityLevel, Role, VisitType};

#[test]
fn test_role_parse_is_case_insensitive() {
    assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
    assert_eq!(Role::parse("ADMIN").unwrap(), Role::Admin);
    assert_eq!(Role::parse("Volunteer").unwrap(), Role::Volunteer);
    assert_eq!(Role::parse("manager").unwrap(), Role::Manager);
}

#[test]
fn test_role_parse_rejects_unknown_token() {
    let result = Role::parse("superuser");
    assert_eq!(
        result.unwrap_err(),
        DomainError::InvalidRole(String::from("superuser"))
    );
}

#[test]
fn test_role_defaults_to_volunteer() {
    assert_eq!(Role::default(), Role::Volunteer);
}

#[test]
fn test_role_claim_format() {
    assert_eq!(Role::Admin.claim(), "ROLE_ADMIN");
    assert_eq!(Role::Volunteer.claim(), "ROLE_VOLUNTEER");
}

#[test]
fn test_priority_level_round_trip() {
    for level in PriorityLevel::ALL {
        assert_eq!(PriorityLevel::parse(level.as_str()).unwrap(), level);
    }
}

#[test]
fn test_priority_level_parse_rejects_unknown_token() {
    assert_eq!(
        PriorityLevel::parse("urgent").unwrap_err(),
        DomainError::InvalidPriorityLevel(String::from("urgent"))
    );
}

#[test]
fn test_visit_type_round_trip() {
    for visit_type in VisitType::ALL {
        assert_eq!(VisitType::parse(visit_type.as_str()).unwrap(), visit_type);
    }
}

#[test]
fn test_visit_type_parse_accepts_lowercase() {
    assert_eq!(VisitType::parse("follow_up").unwrap(), VisitType::FollowUp);
    assert_eq!(VisitType::parse("regular").unwrap(), VisitType::Regular);
}

#[test]
fn test_visit_type_defaults_to_regular() {
    assert_eq!(VisitType::default(), VisitType::Regular);
}

#[test]
fn test_aid_category_round_trip() {
    for category in AidCategory::ALL {
        assert_eq!(AidCategory::parse(category.as_str()).unwrap(), category);
    }
}

#[test]
fn test_aid_category_parse_rejects_unknown_token() {
    assert_eq!(
        AidCategory::parse("shelter").unwrap_err(),
        DomainError::InvalidAidCategory(String::from("shelter"))
    );
}

#[test]
fn test_visit_type_serde_uses_wire_names() {
    let json = serde_json::to_string(&VisitType::FollowUp).unwrap();
    assert_eq!(json, "\"FOLLOW_UP\"");
}

#[test]
fn test_family_location_requires_both_coordinates() {
    let mut family = create_test_family();
    assert!(family.has_location());

    family.longitude = None;
    assert!(!family.has_location());

    family.latitude = None;
    assert!(!family.has_location());
}
