// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Coordinates, Shelter, geodesic_distance_km, nearest_shelter};

fn shelter_at(name: &str, latitude: f64, longitude: f64) -> Shelter {
    Shelter::new(
        name,
        "test address",
        Coordinates::new(latitude, longitude).unwrap(),
    )
}

#[test]
fn test_distance_between_identical_points_is_zero() {
    let point: Coordinates = Coordinates::new(35.0, 135.0).unwrap();
    assert!(geodesic_distance_km(point, point).abs() < 1e-9);
}

#[test]
fn test_distance_is_ellipsoidal_kilometres() {
    let a: Coordinates = Coordinates::new(35.0, 135.0).unwrap();
    let b: Coordinates = Coordinates::new(35.01, 135.0).unwrap();
    let d: f64 = geodesic_distance_km(a, b);
    assert!((1.10..1.12).contains(&d), "got {d}");

    let tokyo: Coordinates = Coordinates::new(35.681_236, 139.767_125).unwrap();
    let osaka: Coordinates = Coordinates::new(34.702_485, 135.495_951).unwrap();
    let d: f64 = geodesic_distance_km(tokyo, osaka);
    assert!((395.0..410.0).contains(&d), "got {d}");
}

#[test]
fn test_nearest_of_empty_list_is_none() {
    let origin: Coordinates = Coordinates::new(35.0, 135.0).unwrap();
    assert!(nearest_shelter(origin, &[]).is_none());
}

#[test]
fn test_nearest_picks_strict_minimum() {
    let origin: Coordinates = Coordinates::new(35.0, 135.0).unwrap();
    let shelters: Vec<Shelter> = vec![
        shelter_at("B", 35.01, 135.0),
        shelter_at("A", 35.0, 135.0),
    ];

    let nearest = nearest_shelter(origin, &shelters).unwrap();
    assert_eq!(nearest.shelter.name, "A");
    assert!(nearest.distance_km.abs() < 1e-9);
}

#[test]
fn test_nearest_tie_goes_to_first_encountered() {
    let origin: Coordinates = Coordinates::new(35.0, 135.0).unwrap();
    let shelters: Vec<Shelter> = vec![
        shelter_at("first", 35.01, 135.0),
        shelter_at("second", 35.01, 135.0),
        shelter_at("far", 36.0, 135.0),
    ];

    let nearest = nearest_shelter(origin, &shelters).unwrap();
    assert_eq!(nearest.shelter.name, "first");
}

#[test]
fn test_nearest_single_candidate_is_returned() {
    let origin: Coordinates = Coordinates::new(43.06, 141.35).unwrap();
    let shelters: Vec<Shelter> = vec![shelter_at("only", 26.21, 127.68)];

    let nearest = nearest_shelter(origin, &shelters).unwrap();
    assert_eq!(nearest.shelter.name, "only");
    assert!(nearest.distance_km > 2000.0);
}
