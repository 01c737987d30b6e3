// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod reference;
mod types;
mod validation;

use crate::entities::{Family, User};
use crate::types::{PriorityLevel, Role};

pub fn create_test_user() -> User {
    User {
        user_id: None,
        first_name: String::from("Amina"),
        last_name: String::from("Ben Salah"),
        email: String::from("amina@example.org"),
        phone: Some(String::from("+216 20 123 456")),
        role: Role::Volunteer,
        is_active: true,
        created_at: String::from("2026-01-10T08:30:00Z"),
        last_login_at: None,
    }
}

pub fn create_test_family() -> Family {
    Family {
        family_id: None,
        reference: String::from("FAM-0001"),
        head_of_family: String::from("Mohamed Trabelsi"),
        phone: Some(String::from("+216 98 765 432")),
        address: Some(String::from("12 rue des Oliviers, Kairouan")),
        family_size: Some(5),
        needs_description: Some(String::from("Food support and school supplies")),
        priority_level: PriorityLevel::High,
        latitude: Some(35.6781),
        longitude: Some(10.0963),
        notes: None,
    }
}
