// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod dates;
mod entities;
mod error;
mod reference;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use dates::{format_date, format_datetime, parse_date, parse_datetime};
pub use entities::{AidDistribution, AidType, Family, User, Visit};
pub use error::DomainError;
pub use reference::{REFERENCE_PREFIX, generate_reference, is_generated_reference};
pub use types::{AidCategory, PriorityLevel, Role, VisitType};
pub use validation::{
    validate_family_fields, validate_quantity, validate_registration, validate_user_fields,
};
