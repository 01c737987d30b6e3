// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod user_tests;

use aidcase_domain::{AidCategory, AidType, Family, PriorityLevel, Visit, VisitType};

use crate::Persistence;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_test_family(reference: &str) -> Family {
    Family {
        family_id: None,
        reference: reference.to_string(),
        head_of_family: String::from("Mohamed Trabelsi"),
        phone: Some(String::from("+216 98 765 432")),
        address: Some(String::from("12 rue des Oliviers, Kairouan")),
        family_size: Some(5),
        needs_description: Some(String::from("Food support and school supplies")),
        priority_level: PriorityLevel::High,
        latitude: None,
        longitude: None,
        notes: None,
    }
}

pub fn create_test_visit(family_id: i64, visit_date: &str) -> Visit {
    Visit {
        visit_id: None,
        family_id,
        volunteer_id: None,
        visit_date: visit_date.to_string(),
        visit_type: VisitType::Regular,
        observations: Some(String::from("Household in stable condition")),
        location_lat: None,
        location_lng: None,
        identified_needs: vec![
            String::from("Winter clothing"),
            String::from("School books"),
        ],
        next_visit_date: None,
        synced: true,
        recorded_at: String::from("2026-03-01T10:00:00Z"),
        distributions: Vec::new(),
    }
}

pub fn create_test_aid_type(name: &str) -> AidType {
    AidType {
        aid_type_id: None,
        name: name.to_string(),
        category: AidCategory::Food,
        description: Some(String::from("Basic food parcel")),
        unit: Some(String::from("kg")),
        is_active: true,
        default_quantity: 1,
        icon: Some(String::from("food")),
    }
}
