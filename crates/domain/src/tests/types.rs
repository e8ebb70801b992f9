// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Coordinates, DomainError, Role, Shelter, StockActivityKind};

#[test]
fn test_coordinates_accept_valid_range() {
    let c: Coordinates = Coordinates::new(-90.0, 180.0).unwrap();
    assert!((c.latitude() + 90.0).abs() < f64::EPSILON);
    assert!((c.longitude() - 180.0).abs() < f64::EPSILON);
}

#[test]
fn test_coordinates_reject_out_of_range_latitude() {
    let result: Result<Coordinates, DomainError> = Coordinates::new(90.5, 0.0);
    assert!(matches!(
        result,
        Err(DomainError::InvalidCoordinate {
            axis: "latitude",
            ..
        })
    ));
}

#[test]
fn test_coordinates_reject_non_finite_longitude() {
    let result: Result<Coordinates, DomainError> = Coordinates::new(0.0, f64::NAN);
    assert!(matches!(
        result,
        Err(DomainError::InvalidCoordinate {
            axis: "longitude",
            ..
        })
    ));
}

#[test]
fn test_role_round_trip() {
    assert_eq!(Role::parse("admin"), Ok(Role::Admin));
    assert_eq!(Role::parse("user"), Ok(Role::User));
    assert!(Role::parse("Admin").is_err());
    assert_eq!(Role::Admin.as_str(), "admin");
    assert_eq!(format!("{}", Role::User), "User");
}

#[test]
fn test_activity_kind_parse() {
    assert_eq!(StockActivityKind::parse("edited"), Ok(StockActivityKind::Edited));
    assert!(StockActivityKind::parse("編集").is_err());
}

#[test]
fn test_new_shelter_defaults() {
    let shelter: Shelter = Shelter::new("A", "addr", Coordinates::new(35.0, 135.0).unwrap());
    assert_eq!(shelter.shelter_id, None);
    assert_eq!(shelter.capacity, None);
    assert!(shelter.hazards.designated().is_empty());
    assert_eq!(shelter.with_id(4).shelter_id, Some(4));
}
