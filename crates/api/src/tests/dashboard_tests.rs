// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the dashboard aggregation.

use aidcase_domain::AidDistribution;

use crate::dashboard::{aid_stats, family_stats, map_data, overview, quick_indicators};
use crate::error::ApiError;
use crate::handlers::{create_aid_type, create_family, create_visit, initialize_default_aid_types};
use crate::tests::{
    create_aid_type_request, create_family_request, create_test_persistence,
    create_visit_request, days_from_today, today_iso,
};

#[test]
fn test_overview_on_empty_store() {
    let mut persistence = create_test_persistence();

    let stats = overview(&mut persistence).unwrap();

    assert_eq!(stats.total_families, 0);
    assert_eq!(stats.total_visits, 0);
    assert_eq!(stats.visits_this_month, 0);
    assert_eq!(stats.families_with_location, 0);
    assert!(stats.recent_visits.is_empty());

    // Every priority level and visit type is present even with no data
    assert_eq!(stats.families_by_priority.len(), 3);
    assert!(stats.families_by_priority.values().all(|&count| count == 0));
    assert_eq!(stats.visits_by_type.len(), 4);
    assert!(stats.visits_by_type.values().all(|&count| count == 0));

    // Six months, oldest first, and the new-family figures are flagged
    // as estimates
    assert_eq!(stats.monthly_stats.len(), 6);
    assert!(
        stats
            .monthly_stats
            .iter()
            .all(|month| month.new_families.estimated)
    );
    assert!(
        stats
            .monthly_stats
            .iter()
            .all(|month| (1..=5).contains(&month.new_families.value))
    );
}

#[test]
fn test_overview_counts_visits_and_priorities() {
    let mut persistence = create_test_persistence();

    let family = create_family(&mut persistence, &create_family_request(Some("FAM-0001"))).unwrap();
    let family_id = family.family_id.unwrap();

    let mut low = create_family_request(Some("FAM-0002"));
    low.priority_level = Some(String::from("Low"));
    create_family(&mut persistence, &low).unwrap();

    let mut today_visit = create_visit_request();
    today_visit.visit_date = Some(today_iso());
    create_visit(&mut persistence, family_id, &today_visit).unwrap();

    let mut emergency = create_visit_request();
    emergency.visit_date = Some(today_iso());
    emergency.visit_type = Some(String::from("EMERGENCY"));
    create_visit(&mut persistence, family_id, &emergency).unwrap();

    let stats = overview(&mut persistence).unwrap();

    assert_eq!(stats.total_families, 2);
    assert_eq!(stats.total_visits, 2);
    assert_eq!(stats.visits_this_month, 2);
    assert_eq!(stats.families_by_priority.get("High"), Some(&1));
    assert_eq!(stats.families_by_priority.get("Low"), Some(&1));
    assert_eq!(stats.families_by_priority.get("Medium"), Some(&0));
    assert_eq!(stats.visits_by_type.get("REGULAR"), Some(&1));
    assert_eq!(stats.visits_by_type.get("EMERGENCY"), Some(&1));
    assert_eq!(stats.recent_visits.len(), 2);

    let this_month = stats.monthly_stats.last().unwrap();
    assert_eq!(this_month.total_visits, 2);
}

#[test]
fn test_family_stats_requires_existing_family() {
    let mut persistence = create_test_persistence();

    let result = family_stats(&mut persistence, 999);
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_family_stats_without_visits() {
    let mut persistence = create_test_persistence();
    let family = create_family(&mut persistence, &create_family_request(Some("FAM-0001"))).unwrap();

    let stats = family_stats(&mut persistence, family.family_id.unwrap()).unwrap();

    assert_eq!(stats.family_reference, "FAM-0001");
    assert_eq!(stats.total_visits, 0);
    assert!(stats.last_visit_date.is_none());
    assert!(stats.days_since_last_visit.is_none());
    assert!(stats.next_visit_date.is_none());
}

#[test]
fn test_family_stats_reports_last_and_next_visit() {
    let mut persistence = create_test_persistence();
    let family = create_family(&mut persistence, &create_family_request(Some("FAM-0001"))).unwrap();
    let family_id = family.family_id.unwrap();

    let mut older = create_visit_request();
    older.visit_date = Some(days_from_today(-10));
    // A past planned date must not surface as the next visit
    older.next_visit_date = Some(days_from_today(-3));
    create_visit(&mut persistence, family_id, &older).unwrap();

    let mut newer = create_visit_request();
    newer.visit_date = Some(days_from_today(-2));
    newer.next_visit_date = Some(days_from_today(14));
    create_visit(&mut persistence, family_id, &newer).unwrap();

    let stats = family_stats(&mut persistence, family_id).unwrap();

    assert_eq!(stats.total_visits, 2);
    assert_eq!(stats.last_visit_date.as_deref(), Some(days_from_today(-2).as_str()));
    assert_eq!(stats.days_since_last_visit, Some(2));
    assert_eq!(stats.next_visit_date.as_deref(), Some(days_from_today(14).as_str()));
}

#[test]
fn test_map_data_annotates_visit_counts() {
    let mut persistence = create_test_persistence();

    let mut located = create_family_request(Some("FAM-0001"));
    located.latitude = Some(35.6781);
    located.longitude = Some(10.0963);
    let family = create_family(&mut persistence, &located).unwrap();
    let family_id = family.family_id.unwrap();

    // Not on the map: no coordinates
    create_family(&mut persistence, &create_family_request(Some("FAM-0002"))).unwrap();

    create_visit(&mut persistence, family_id, &create_visit_request()).unwrap();
    create_visit(&mut persistence, family_id, &create_visit_request()).unwrap();

    let data = map_data(&mut persistence).unwrap();

    assert_eq!(data.total_families_on_map, 1);
    assert_eq!(data.families.len(), 1);
    let point = &data.families[0];
    assert_eq!(point.id, family_id);
    assert_eq!(point.visit_count, 2);
    assert_eq!(point.title, "Mohamed Trabelsi");
    assert_eq!(point.description, "Famille FAM-0001");
}

#[test]
fn test_aid_stats_are_computed_from_distributions() {
    let mut persistence = create_test_persistence();
    initialize_default_aid_types(&mut persistence).unwrap();

    let family = create_family(&mut persistence, &create_family_request(None)).unwrap();
    let visit = create_visit(
        &mut persistence,
        family.family_id.unwrap(),
        &create_visit_request(),
    )
    .unwrap();

    let mut hygiene = create_aid_type_request("Savon");
    hygiene.category = String::from("HYGIENE");
    let hygiene_type = create_aid_type(&mut persistence, &hygiene).unwrap();

    for (aid_type_id, quantity) in [(hygiene_type.aid_type_id.unwrap(), 4)] {
        persistence
            .add_aid_distribution(&AidDistribution {
                aid_distribution_id: None,
                visit_id: visit.visit_id.unwrap(),
                aid_type_id,
                description: None,
                quantity,
                unit: None,
                expiration_date: None,
                notes: None,
                distributed_at: String::from("2026-03-01T11:00:00Z"),
            })
            .unwrap();
    }

    let stats = aid_stats(&mut persistence).unwrap();

    assert_eq!(stats.total_aid_types, 7);
    assert_eq!(stats.active_aid_types, 7);
    assert_eq!(stats.aid_distribution.get("HYGIENE"), Some(&4));
    assert!(stats.aid_distribution.get("FOOD").is_none());
}

#[test]
fn test_quick_indicators() {
    let mut persistence = create_test_persistence();

    let family = create_family(&mut persistence, &create_family_request(None)).unwrap();
    let family_id = family.family_id.unwrap();

    let mut today_visit = create_visit_request();
    today_visit.visit_date = Some(today_iso());
    today_visit.next_visit_date = Some(days_from_today(3));
    create_visit(&mut persistence, family_id, &today_visit).unwrap();

    let mut older = create_visit_request();
    older.visit_date = Some(days_from_today(-5));
    older.next_visit_date = Some(days_from_today(20));
    create_visit(&mut persistence, family_id, &older).unwrap();

    let indicators = quick_indicators(&mut persistence).unwrap();

    assert_eq!(indicators.total_families, 1);
    assert_eq!(indicators.total_visits, 2);
    assert_eq!(indicators.visits_today, 1);
    assert_eq!(indicators.high_priority_families, 1);
    assert_eq!(indicators.upcoming_visits, 1);
}
