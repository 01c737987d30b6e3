// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role assigned to a system operator (volunteer or staff account).
///
/// Roles are carried as a claim on issued sessions; they are not enforced
/// per-route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Administrative account with full access.
    Admin,
    /// Coordination account managing volunteers and catalogs.
    Manager,
    /// Field volunteer recording visits and distributions.
    #[default]
    Volunteer,
}

impl Role {
    /// Parses a role from a token, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns an error if the token does not match a known role.
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        match token.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "volunteer" => Ok(Self::Volunteer),
            _ => Err(DomainError::InvalidRole(token.to_string())),
        }
    }

    /// Returns the canonical string representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Volunteer => "Volunteer",
        }
    }

    /// Returns the role claim string carried by issued sessions,
    /// e.g. `ROLE_VOLUNTEER`.
    #[must_use]
    pub fn claim(&self) -> String {
        format!("ROLE_{}", self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority level assigned to a family case record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PriorityLevel {
    /// Routine follow-up cadence.
    Low,
    /// Standard attention.
    #[default]
    Medium,
    /// Urgent attention required.
    High,
}

impl PriorityLevel {
    /// All priority levels, ordered from most to least urgent.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Parses a priority level from a token, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns an error if the token does not match a known level.
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        match token.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(DomainError::InvalidPriorityLevel(token.to_string())),
        }
    }

    /// Returns the canonical string representation of this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl FromStr for PriorityLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a field visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VisitType {
    /// Scheduled routine visit.
    #[default]
    #[serde(rename = "REGULAR")]
    Regular,
    /// Unscheduled urgent visit.
    #[serde(rename = "EMERGENCY")]
    Emergency,
    /// Follow-up on a previous visit's identified needs.
    #[serde(rename = "FOLLOW_UP")]
    FollowUp,
    /// Initial needs assessment for a new case.
    #[serde(rename = "ASSESSMENT")]
    Assessment,
}

impl VisitType {
    /// All visit types.
    pub const ALL: [Self; 4] = [
        Self::Regular,
        Self::Emergency,
        Self::FollowUp,
        Self::Assessment,
    ];

    /// Parses a visit type from a token, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns an error if the token does not match a known type.
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        match token.to_ascii_uppercase().as_str() {
            "REGULAR" => Ok(Self::Regular),
            "EMERGENCY" => Ok(Self::Emergency),
            "FOLLOW_UP" => Ok(Self::FollowUp),
            "ASSESSMENT" => Ok(Self::Assessment),
            _ => Err(DomainError::InvalidVisitType(token.to_string())),
        }
    }

    /// Returns the canonical string representation of this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "REGULAR",
            Self::Emergency => "EMERGENCY",
            Self::FollowUp => "FOLLOW_UP",
            Self::Assessment => "ASSESSMENT",
        }
    }
}

impl FromStr for VisitType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for VisitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of assistance an aid-type catalog entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AidCategory {
    /// Food parcels and staples.
    #[serde(rename = "FOOD")]
    Food,
    /// Medicine and medical supplies.
    #[serde(rename = "MEDICINE")]
    Medicine,
    /// Clothing for adults and children.
    #[serde(rename = "CLOTHING")]
    Clothing,
    /// Direct monetary assistance.
    #[serde(rename = "FINANCIAL")]
    Financial,
    /// Personal hygiene products.
    #[serde(rename = "HYGIENE")]
    Hygiene,
    /// School supplies.
    #[serde(rename = "SCHOOL")]
    School,
    /// Anything that does not fit the categories above.
    #[serde(rename = "OTHER")]
    Other,
}

impl AidCategory {
    /// All aid categories.
    pub const ALL: [Self; 7] = [
        Self::Food,
        Self::Medicine,
        Self::Clothing,
        Self::Financial,
        Self::Hygiene,
        Self::School,
        Self::Other,
    ];

    /// Parses an aid category from a token, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns an error if the token does not match a known category.
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        match token.to_ascii_uppercase().as_str() {
            "FOOD" => Ok(Self::Food),
            "MEDICINE" => Ok(Self::Medicine),
            "CLOTHING" => Ok(Self::Clothing),
            "FINANCIAL" => Ok(Self::Financial),
            "HYGIENE" => Ok(Self::Hygiene),
            "SCHOOL" => Ok(Self::School),
            "OTHER" => Ok(Self::Other),
            _ => Err(DomainError::InvalidAidCategory(token.to_string())),
        }
    }

    /// Returns the canonical string representation of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "FOOD",
            Self::Medicine => "MEDICINE",
            Self::Clothing => "CLOTHING",
            Self::Financial => "FINANCIAL",
            Self::Hygiene => "HYGIENE",
            Self::School => "SCHOOL",
            Self::Other => "OTHER",
        }
    }
}

impl FromStr for AidCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for AidCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
