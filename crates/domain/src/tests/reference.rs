// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::reference::{generate_reference, is_generated_reference};

#[test]
fn test_generated_reference_matches_pattern() {
    let reference = generate_reference(1_767_225_600_123);
    assert!(is_generated_reference(&reference));
}

#[test]
fn test_generated_reference_truncates_to_four_digits() {
    assert_eq!(generate_reference(10_001), "FAM-1");
    assert_eq!(generate_reference(9_999), "FAM-9999");
    assert_eq!(generate_reference(20_000), "FAM-0");
}

#[test]
fn test_pattern_check_rejects_foreign_references() {
    assert!(!is_generated_reference("CASE-123"));
    assert!(!is_generated_reference("FAM-"));
    assert!(!is_generated_reference("FAM-12345"));
    assert!(!is_generated_reference("FAM-12a"));
    assert!(is_generated_reference("FAM-0001"));
}
