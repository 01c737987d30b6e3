// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the visit handlers.

use aidcase_domain::{AidDistribution, VisitType};

use crate::error::ApiError;
use crate::handlers::{
    create_family, create_visit, delete_visit, get_visit, list_recent_visits,
    list_unsynced_visits, list_visits_by_family, update_visit,
};
use crate::request_response::UpdateVisitRequest;
use crate::tests::{
    create_family_request, create_test_persistence, create_visit_request, days_from_today,
    today_iso,
};

#[test]
fn test_create_applies_defaults() {
    let mut persistence = create_test_persistence();
    let family = create_family(&mut persistence, &create_family_request(None)).unwrap();
    let family_id = family.family_id.unwrap();

    let visit = create_visit(&mut persistence, family_id, &create_visit_request()).unwrap();

    assert_eq!(visit.visit_date, today_iso());
    assert_eq!(visit.visit_type, VisitType::Regular);
    assert!(visit.synced);
    assert!(visit.distributions.is_empty());
    assert_eq!(visit.identified_needs, vec![String::from("Winter clothing")]);
}

#[test]
fn test_create_for_unknown_family_is_not_found() {
    let mut persistence = create_test_persistence();

    let result = create_visit(&mut persistence, 999, &create_visit_request());
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_create_with_unknown_visit_type_is_invalid_input() {
    let mut persistence = create_test_persistence();
    let family = create_family(&mut persistence, &create_family_request(None)).unwrap();

    let mut request = create_visit_request();
    request.visit_type = Some(String::from("PICNIC"));

    match create_visit(&mut persistence, family.family_id.unwrap(), &request).unwrap_err() {
        ApiError::InvalidInput { field, .. } => assert_eq!(field, "visitType"),
        other => panic!("Expected InvalidInput error, got: {other:?}"),
    }
}

#[test]
fn test_update_only_touches_mutable_fields() {
    let mut persistence = create_test_persistence();
    let family = create_family(&mut persistence, &create_family_request(None)).unwrap();
    let family_id = family.family_id.unwrap();
    let visit = create_visit(&mut persistence, family_id, &create_visit_request()).unwrap();
    let visit_id = visit.visit_id.unwrap();

    let updated = update_visit(
        &mut persistence,
        visit_id,
        &UpdateVisitRequest {
            visit_date: String::from("2026-04-02"),
            visit_type: String::from("follow_up"),
            observations: Some(String::from("Checked on earlier needs")),
            location_lat: Some(35.5),
            location_lng: Some(10.5),
            next_visit_date: Some(String::from("2026-05-01")),
        },
    )
    .unwrap();

    assert_eq!(updated.visit_date, "2026-04-02");
    assert_eq!(updated.visit_type, VisitType::FollowUp);
    assert_eq!(updated.family_id, family_id);
    assert_eq!(updated.identified_needs, visit.identified_needs);
    assert!(updated.synced);
}

#[test]
fn test_delete_removes_owned_distributions() {
    let mut persistence = create_test_persistence();
    let family = create_family(&mut persistence, &create_family_request(None)).unwrap();
    let visit = create_visit(
        &mut persistence,
        family.family_id.unwrap(),
        &create_visit_request(),
    )
    .unwrap();
    let visit_id = visit.visit_id.unwrap();

    let aid_type = crate::handlers::create_aid_type(
        &mut persistence,
        &crate::tests::create_aid_type_request("Colis alimentaire"),
    )
    .unwrap();

    let distribution_id = persistence
        .add_aid_distribution(&AidDistribution {
            aid_distribution_id: None,
            visit_id,
            aid_type_id: aid_type.aid_type_id.unwrap(),
            description: None,
            quantity: 3,
            unit: None,
            expiration_date: None,
            notes: None,
            distributed_at: String::from("2026-03-01T11:00:00Z"),
        })
        .unwrap();

    delete_visit(&mut persistence, visit_id).unwrap();

    assert!(matches!(
        get_visit(&mut persistence, visit_id).unwrap_err(),
        ApiError::ResourceNotFound { .. }
    ));
    assert!(
        persistence
            .get_aid_distribution_by_id(distribution_id)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_list_by_family_requires_existing_family() {
    let mut persistence = create_test_persistence();

    assert!(matches!(
        list_visits_by_family(&mut persistence, 999).unwrap_err(),
        ApiError::ResourceNotFound { .. }
    ));

    let family = create_family(&mut persistence, &create_family_request(None)).unwrap();
    let family_id = family.family_id.unwrap();
    assert!(
        list_visits_by_family(&mut persistence, family_id)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_recent_visits_cover_the_trailing_month() {
    let mut persistence = create_test_persistence();
    let family = create_family(&mut persistence, &create_family_request(None)).unwrap();
    let family_id = family.family_id.unwrap();

    let mut today_visit = create_visit_request();
    today_visit.visit_date = Some(today_iso());
    create_visit(&mut persistence, family_id, &today_visit).unwrap();

    let mut last_week = create_visit_request();
    last_week.visit_date = Some(days_from_today(-7));
    create_visit(&mut persistence, family_id, &last_week).unwrap();

    let mut long_ago = create_visit_request();
    long_ago.visit_date = Some(days_from_today(-60));
    create_visit(&mut persistence, family_id, &long_ago).unwrap();

    let recent = list_recent_visits(&mut persistence).unwrap();
    assert_eq!(recent.len(), 2);
    assert!(
        recent
            .iter()
            .all(|visit| visit.visit_date != days_from_today(-60))
    );
}

#[test]
fn test_created_visits_are_marked_synced() {
    let mut persistence = create_test_persistence();
    let family = create_family(&mut persistence, &create_family_request(None)).unwrap();

    create_visit(
        &mut persistence,
        family.family_id.unwrap(),
        &create_visit_request(),
    )
    .unwrap();

    assert!(list_unsynced_visits(&mut persistence).unwrap().is_empty());
}
