// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Family case-reference generation.
//!
//! A reference is the human-facing unique identifier of a family, distinct
//! from its database id. When a caller does not supply one, a reference is
//! synthesized from the current time in milliseconds, truncated to four
//! digits. Collisions are only probabilistically avoided; the uniqueness
//! constraint on the `reference` column is authoritative and a duplicate
//! surfaces as a conflict.

/// Prefix of generated references.
pub const REFERENCE_PREFIX: &str = "FAM-";

/// Synthesizes a reference from a millisecond timestamp.
///
/// The result matches `FAM-<n>` with `n` in `0..=9999`.
#[must_use]
pub fn generate_reference(now_millis: u128) -> String {
    format!("{REFERENCE_PREFIX}{}", now_millis % 10000)
}

/// Returns whether a reference matches the generated `FAM-<0..=9999>` shape.
///
/// Caller-supplied references may use any non-blank format; this check only
/// recognizes the generated pattern.
#[must_use]
pub fn is_generated_reference(reference: &str) -> bool {
    reference.strip_prefix(REFERENCE_PREFIX).is_some_and(|rest| {
        !rest.is_empty()
            && rest.len() <= 4
            && rest.chars().all(|c| c.is_ascii_digit())
    })
}
