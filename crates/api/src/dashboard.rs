// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only dashboard aggregation.
//!
//! Everything here is simple counting over persistence queries. Figures
//! that are not derived from stored data carry an explicit estimate marker
//! ([`EstimatedCount`]) so clients can tell placeholder numbers from
//! measured ones instead of being handed fabricated values.

use std::collections::BTreeMap;

use aidcase_domain::{Family, PriorityLevel, Visit, VisitType, parse_date};
use aidcase_persistence::SqlitePersistence;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::clock::{date_iso, days_after, month_end, month_label, month_start, months_before, today};
use crate::error::{ApiError, translate_persistence_error};
use crate::handlers::get_family;

/// A count that may be an estimate rather than a measurement.
///
/// `estimated` is true for figures the system cannot derive from stored
/// data yet. Consumers must not present estimated values as facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedCount {
    /// The count value.
    pub value: i64,
    /// Whether the value is a placeholder estimate.
    pub estimated: bool,
}

impl EstimatedCount {
    /// Wraps a value measured from stored data.
    #[must_use]
    pub const fn measured(value: i64) -> Self {
        Self {
            value,
            estimated: false,
        }
    }

    /// Wraps a placeholder estimate.
    #[must_use]
    pub const fn placeholder(value: i64) -> Self {
        Self {
            value,
            estimated: true,
        }
    }
}

/// One month of the trailing activity series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyActivity {
    /// Month label, e.g. "Mar 2026".
    pub month: String,
    /// Visits dated within the month.
    pub total_visits: i64,
    /// New families registered within the month.
    ///
    /// Families carry no creation timestamp, so this is a placeholder
    /// estimate in 1..=5 and is flagged as such.
    pub new_families: EstimatedCount,
}

/// Main dashboard statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    /// Total family count.
    pub total_families: i64,
    /// Total visit count.
    pub total_visits: i64,
    /// Visits dated within the current calendar month.
    pub visits_this_month: i64,
    /// Family count per priority level (all levels present).
    pub families_by_priority: BTreeMap<String, i64>,
    /// The five most recent visits by visit date.
    pub recent_visits: Vec<Visit>,
    /// Families with both coordinates set.
    pub families_with_location: i64,
    /// Visit count per visit type (all types present).
    pub visits_by_type: BTreeMap<String, i64>,
    /// Trailing six-calendar-month activity series, oldest first.
    pub monthly_stats: Vec<MonthlyActivity>,
}

/// Per-family statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyStats {
    /// The family's canonical identifier.
    pub family_id: i64,
    /// The family's case reference.
    pub family_reference: String,
    /// Name of the head of the household.
    pub head_of_family: String,
    /// Case priority.
    pub priority_level: String,
    /// Total recorded visits.
    pub total_visits: i64,
    /// Date of the most recent visit (ISO 8601), if any.
    pub last_visit_date: Option<String>,
    /// Type of the most recent visit, if any.
    pub last_visit_type: Option<String>,
    /// Days elapsed since the most recent visit, if any.
    pub days_since_last_visit: Option<i64>,
    /// The nearest strictly-future planned visit date across all visits.
    pub next_visit_date: Option<String>,
}

/// One map pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMapPoint {
    /// The family's canonical identifier.
    pub id: i64,
    /// Pin latitude.
    pub latitude: f64,
    /// Pin longitude.
    pub longitude: f64,
    /// Pin title (head of family).
    pub title: String,
    /// Pin description.
    pub description: String,
    /// Case priority.
    pub priority: String,
    /// Number of household members.
    pub family_size: Option<i32>,
    /// Recorded visits for this family.
    pub visit_count: i64,
}

/// Map rendering data: every family with both coordinates set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    /// The pins.
    pub families: Vec<FamilyMapPoint>,
    /// Number of pins.
    pub total_families_on_map: i64,
}

/// Aid catalog statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AidStats {
    /// Total catalog entries.
    pub total_aid_types: i64,
    /// Catalog entries currently offered.
    pub active_aid_types: i64,
    /// Distributed quantity totals per category, derived from recorded
    /// distributions.
    pub aid_distribution: BTreeMap<String, i64>,
}

/// Headline figures for card rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickIndicators {
    /// Total family count.
    pub total_families: i64,
    /// Total visit count.
    pub total_visits: i64,
    /// Visits dated today.
    pub visits_today: i64,
    /// Families at High priority.
    pub high_priority_families: i64,
    /// Visits whose planned next visit falls within the next 7 days,
    /// inclusive.
    pub upcoming_visits: i64,
}

/// Builds the main dashboard statistics.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn overview(persistence: &mut SqlitePersistence) -> Result<DashboardOverview, ApiError> {
    let now: Date = today();

    let total_families: i64 = count("Family", persistence.count_families())?;
    let total_visits: i64 = count("Visit", persistence.count_visits())?;

    let visits_this_month: i64 = count(
        "Visit",
        persistence.count_visits_between(
            &date_iso(month_start(now)?)?,
            &date_iso(month_end(now)?)?,
        ),
    )?;

    let mut families_by_priority: BTreeMap<String, i64> = BTreeMap::new();
    for level in PriorityLevel::ALL {
        let per_level: i64 = count(
            "Family",
            persistence.count_families_by_priority(level.as_str()),
        )?;
        families_by_priority.insert(level.as_str().to_string(), per_level);
    }

    let recent_visits: Vec<Visit> = persistence
        .list_top5_recent_visits()
        .map_err(|e| translate_persistence_error("Visit", e))?;

    let families_with_location: i64 =
        count("Family", persistence.count_families_with_location())?;

    // Start every type at zero so absent types still appear
    let mut visits_by_type: BTreeMap<String, i64> = VisitType::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), 0))
        .collect();
    let grouped: Vec<(String, i64)> = persistence
        .count_visits_by_type()
        .map_err(|e| translate_persistence_error("Visit", e))?;
    for (visit_type, visit_count) in grouped {
        visits_by_type.insert(visit_type, visit_count);
    }

    let monthly_stats: Vec<MonthlyActivity> = last_six_months(persistence, now)?;

    Ok(DashboardOverview {
        total_families,
        total_visits,
        visits_this_month,
        families_by_priority,
        recent_visits,
        families_with_location,
        visits_by_type,
        monthly_stats,
    })
}

/// Builds per-family statistics.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the family is unknown.
pub fn family_stats(
    persistence: &mut SqlitePersistence,
    family_id: i64,
) -> Result<FamilyStats, ApiError> {
    let family: Family = get_family(persistence, family_id)?;

    let visits: Vec<Visit> = persistence
        .list_visits_by_family(family_id)
        .map_err(|e| translate_persistence_error("Visit", e))?;

    let now: Date = today();

    let (last_visit_date, last_visit_type, days_since_last_visit) = match visits.first() {
        Some(last) => {
            let days: Option<i64> = parse_date(&last.visit_date)
                .ok()
                .map(|date| (now - date).whole_days());
            (
                Some(last.visit_date.clone()),
                Some(last.visit_type.as_str().to_string()),
                days,
            )
        }
        None => (None, None, None),
    };

    // Nearest strictly-future planned visit across all visits
    let next_visit_date: Option<String> = visits
        .iter()
        .filter_map(|v| v.next_visit_date.clone())
        .filter(|date| parse_date(date).is_ok_and(|parsed| parsed > now))
        .min();

    Ok(FamilyStats {
        family_id,
        family_reference: family.reference,
        head_of_family: family.head_of_family,
        priority_level: family.priority_level.as_str().to_string(),
        total_visits: i64::try_from(visits.len()).unwrap_or(i64::MAX),
        last_visit_date,
        last_visit_type,
        days_since_last_visit,
        next_visit_date,
    })
}

/// Builds the map-pin data set.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn map_data(persistence: &mut SqlitePersistence) -> Result<MapData, ApiError> {
    let families: Vec<Family> = persistence
        .list_families_with_location()
        .map_err(|e| translate_persistence_error("Family", e))?;

    let visit_counts: BTreeMap<i64, i64> = persistence
        .count_visits_by_family()
        .map_err(|e| translate_persistence_error("Visit", e))?
        .into_iter()
        .collect();

    let points: Vec<FamilyMapPoint> = families
        .iter()
        .filter_map(|family| {
            let id: i64 = family.family_id?;
            let latitude: f64 = family.latitude?;
            let longitude: f64 = family.longitude?;
            Some(FamilyMapPoint {
                id,
                latitude,
                longitude,
                title: family.head_of_family.clone(),
                description: format!("Famille {}", family.reference),
                priority: family.priority_level.as_str().to_string(),
                family_size: family.family_size,
                visit_count: visit_counts.get(&id).copied().unwrap_or(0),
            })
        })
        .collect();

    let total: i64 = i64::try_from(points.len()).unwrap_or(i64::MAX);
    Ok(MapData {
        families: points,
        total_families_on_map: total,
    })
}

/// Builds aid catalog statistics.
///
/// The per-category distribution is computed from recorded distributions.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn aid_stats(persistence: &mut SqlitePersistence) -> Result<AidStats, ApiError> {
    let total_aid_types: i64 = count("AidType", persistence.count_aid_types())?;
    let active_aid_types: i64 = count("AidType", persistence.count_active_aid_types())?;

    let aid_distribution: BTreeMap<String, i64> = persistence
        .sum_distributed_quantities_by_category()
        .map_err(|e| translate_persistence_error("AidDistribution", e))?
        .into_iter()
        .collect();

    Ok(AidStats {
        total_aid_types,
        active_aid_types,
        aid_distribution,
    })
}

/// Builds the headline indicator set.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn quick_indicators(persistence: &mut SqlitePersistence) -> Result<QuickIndicators, ApiError> {
    let now: Date = today();
    let today_iso: String = date_iso(now)?;
    let next_week_iso: String = date_iso(days_after(now, 7)?)?;

    Ok(QuickIndicators {
        total_families: count("Family", persistence.count_families())?,
        total_visits: count("Visit", persistence.count_visits())?,
        visits_today: count("Visit", persistence.count_visits_on(&today_iso))?,
        high_priority_families: count(
            "Family",
            persistence.count_families_by_priority(PriorityLevel::High.as_str()),
        )?,
        upcoming_visits: count(
            "Visit",
            persistence.count_next_visits_between(&today_iso, &next_week_iso),
        )?,
    })
}

fn last_six_months(
    persistence: &mut SqlitePersistence,
    now: Date,
) -> Result<Vec<MonthlyActivity>, ApiError> {
    let mut series: Vec<MonthlyActivity> = Vec::with_capacity(6);

    for offset in (0..6u8).rev() {
        let month: Date = months_before(now, offset)?;
        let start: String = date_iso(month_start(month)?)?;
        let end: String = date_iso(month_end(month)?)?;

        let total_visits: i64 = count("Visit", persistence.count_visits_between(&start, &end))?;

        // Families carry no creation timestamp, so new-family counts per
        // month cannot be measured yet. The estimate is flagged, never
        // silently presented as data.
        let estimate: i64 = rand::random_range(1..=5);

        series.push(MonthlyActivity {
            month: month_label(month),
            total_visits,
            new_families: EstimatedCount::placeholder(estimate),
        });
    }

    Ok(series)
}

fn count(
    resource: &str,
    result: Result<i64, aidcase_persistence::PersistenceError>,
) -> Result<i64, ApiError> {
    result.map_err(|e| translate_persistence_error(resource, e))
}
