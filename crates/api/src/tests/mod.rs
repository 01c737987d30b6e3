// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

mod dashboard_tests;
mod user_tests;
mod visit_tests;

use aidcase_persistence::SqlitePersistence;
use time::Date;
use time::format_description::well_known::Iso8601;

use crate::request_response::{
    AidTypeRequest, CreateUserRequest, CreateVisitRequest, FamilyRequest, RegisterRequest,
};

pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().unwrap()
}

pub fn today_iso() -> String {
    time::OffsetDateTime::now_utc()
        .date()
        .format(&Iso8601::DATE)
        .unwrap()
}

pub fn days_from_today(days: i64) -> String {
    let date: Date = time::OffsetDateTime::now_utc().date() + time::Duration::days(days);
    date.format(&Iso8601::DATE).unwrap()
}

pub fn create_aid_type_request(name: &str) -> AidTypeRequest {
    AidTypeRequest {
        name: name.to_string(),
        category: String::from("FOOD"),
        description: Some(String::from("Basic food parcel")),
        unit: Some(String::from("kg")),
        active: None,
        default_quantity: None,
        icon: Some(String::from("food")),
    }
}

pub fn create_family_request(reference: Option<&str>) -> FamilyRequest {
    FamilyRequest {
        reference: reference.map(str::to_string),
        head_of_family: String::from("Mohamed Trabelsi"),
        phone: Some(String::from("+216 98 765 432")),
        address: Some(String::from("12 rue des Oliviers, Kairouan")),
        family_size: Some(5),
        needs_description: Some(String::from("Food support and school supplies")),
        priority_level: Some(String::from("High")),
        latitude: None,
        longitude: None,
        notes: None,
    }
}

pub fn create_visit_request() -> CreateVisitRequest {
    CreateVisitRequest {
        volunteer_id: None,
        visit_date: None,
        visit_type: None,
        observations: Some(String::from("Household in stable condition")),
        location_lat: None,
        location_lng: None,
        identified_needs: vec![String::from("Winter clothing")],
        next_visit_date: None,
    }
}

pub fn create_user_request(email: &str) -> CreateUserRequest {
    CreateUserRequest {
        first_name: String::from("Amina"),
        last_name: String::from("Ben Salah"),
        email: email.to_string(),
        phone: Some(String::from("+216 20 123 456")),
        password: String::from("s3cret"),
        role: None,
        active: None,
    }
}

pub fn create_register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        first_name: String::from("Amina"),
        last_name: String::from("Ben Salah"),
        email: email.to_string(),
        phone: None,
        password: String::from("s3cret"),
        role: None,
    }
}
