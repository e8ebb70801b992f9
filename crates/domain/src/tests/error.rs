// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidShelterName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid shelter name: test");

    let err: DomainError = DomainError::InvalidCoordinate {
        axis: "latitude",
        value: String::from("91"),
    };
    assert_eq!(format!("{err}"), "Invalid latitude: 91");

    let err: DomainError = DomainError::InvalidHazardFlag(7);
    assert_eq!(
        format!("{err}"),
        "Invalid hazard flag value 7: expected 0, 1 or NULL"
    );

    let err: DomainError = DomainError::InvalidRole(String::from("Unknown role: root"));
    assert_eq!(format!("{err}"), "Invalid role: Unknown role: root");

    let err: DomainError = DomainError::InvalidQuantity(-3);
    assert_eq!(format!("{err}"), "Invalid quantity -3: must not be negative");

    let err: DomainError = DomainError::InvalidExpirationDate {
        value: String::from("tomorrow"),
        error: String::from("bad"),
    };
    assert_eq!(format!("{err}"), "Invalid expiration date 'tomorrow': bad");
}
