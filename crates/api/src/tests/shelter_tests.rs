// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for shelter management and nearest-shelter lookup.

use hinanjo_domain::{Coordinates, Shelter};
use hinanjo_persistence::Persistence;

use crate::error::ApiError;
use crate::geocoding::{DisabledGeocoder, StaticGeocoder};
use crate::handlers::{
    create_shelter, delete_shelter, find_nearest_shelter, get_shelter, list_shelters,
    update_shelter,
};
use crate::nearest::resolve_nearest;
use crate::notices::{NoticeLevel, Notices};
use crate::tests::helpers::{create_admin, create_shelter_request, create_user, store_shelter};

#[test]
fn test_admin_creates_and_lists_shelter() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin = create_admin(&mut persistence, "admin@example.jp");

    let mut notices = Notices::new();
    let response = create_shelter(
        &mut persistence,
        &admin,
        &create_shelter_request("丸の内小学校"),
        &mut notices,
    )
    .unwrap();

    let shelter_id = response.shelter.shelter_id.unwrap();
    let listed = list_shelters(&mut persistence).unwrap();
    assert_eq!(listed.shelters.len(), 1);
    assert_eq!(listed.shelters[0].shelter_id, shelter_id);
    assert_eq!(listed.shelters[0].capacity, Some(300));

    let detail = get_shelter(&mut persistence, shelter_id).unwrap();
    assert_eq!(detail.shelter.name, "丸の内小学校");
    assert!(detail.stock.is_empty());
}

#[test]
fn test_user_cannot_create_shelter() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let user = create_user(&mut persistence, "user@example.jp");

    let mut notices = Notices::new();
    let result = create_shelter(
        &mut persistence,
        &user,
        &create_shelter_request("A"),
        &mut notices,
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert_eq!(persistence.count_shelters().unwrap(), 0);
}

#[test]
fn test_duplicate_shelter_name_reports_danger() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin = create_admin(&mut persistence, "admin@example.jp");
    store_shelter(&mut persistence, "A", 35.0, 139.0);

    let mut notices = Notices::new();
    let result = create_shelter(
        &mut persistence,
        &admin,
        &create_shelter_request("A"),
        &mut notices,
    );

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "unique_shelter_name"
    ));
    assert!(notices.contains_level(NoticeLevel::Danger));
}

#[test]
fn test_out_of_range_coordinates_are_rejected() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin = create_admin(&mut persistence, "admin@example.jp");
    let mut request = create_shelter_request("A");
    request.latitude = 95.0;

    let mut notices = Notices::new();
    let result = create_shelter(&mut persistence, &admin, &request, &mut notices);

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_update_shelter_replaces_fields() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin = create_admin(&mut persistence, "admin@example.jp");
    let shelter_id = store_shelter(&mut persistence, "A", 35.0, 139.0);

    let mut request = create_shelter_request("B");
    request.capacity = None;
    request.note = String::from("指定緊急避難場所");
    let mut notices = Notices::new();
    update_shelter(&mut persistence, &admin, shelter_id, &request, &mut notices).unwrap();

    let stored = persistence.get_shelter_by_id(shelter_id).unwrap().unwrap();
    assert_eq!(stored.name, "B");
    assert_eq!(stored.capacity, None);
    assert_eq!(stored.note, "指定緊急避難場所");
}

#[test]
fn test_delete_unknown_shelter_is_not_found() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin = create_admin(&mut persistence, "admin@example.jp");

    let mut notices = Notices::new();
    let result = delete_shelter(&mut persistence, &admin, 404, &mut notices);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_delete_shelter_succeeds_without_stock() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin = create_admin(&mut persistence, "admin@example.jp");
    let shelter_id = store_shelter(&mut persistence, "A", 35.0, 139.0);

    let mut notices = Notices::new();
    let response = delete_shelter(&mut persistence, &admin, shelter_id, &mut notices).unwrap();

    assert_eq!(response.deleted_id, shelter_id);
    assert_eq!(persistence.count_shelters().unwrap(), 0);
}

#[tokio::test]
async fn test_nearest_shelter_picks_closest() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    store_shelter(&mut persistence, "札幌", 43.062, 141.354);
    let tokyo_id = store_shelter(&mut persistence, "東京", 35.681, 139.767);
    store_shelter(&mut persistence, "福岡", 33.590, 130.420);
    let shelters: Vec<Shelter> = persistence.list_shelters().unwrap();

    let geocoder =
        StaticGeocoder::new().with("横浜駅", Coordinates::new(35.466, 139.622).unwrap());

    let response = find_nearest_shelter(&geocoder, &shelters, "  横浜駅 ").await;

    assert_eq!(response.address, "横浜駅");
    let shelter = response.shelter.unwrap();
    assert_eq!(shelter.shelter_id, tokyo_id);
    let distance = response.distance_km.unwrap();
    assert!(distance > 20.0 && distance < 35.0, "distance was {distance}");
}

#[tokio::test]
async fn test_nearest_shelter_for_unknown_address_is_empty() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    store_shelter(&mut persistence, "東京", 35.681, 139.767);
    let shelters: Vec<Shelter> = persistence.list_shelters().unwrap();

    let response = find_nearest_shelter(&DisabledGeocoder, &shelters, "横浜駅").await;

    assert!(response.shelter.is_none());
    assert!(response.distance_km.is_none());
}

#[tokio::test]
async fn test_nearest_shelter_ties_resolve_to_first() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let first = store_shelter(&mut persistence, "first", 35.0, 139.0);
    store_shelter(&mut persistence, "second", 35.0, 139.0);
    let shelters: Vec<Shelter> = persistence.list_shelters().unwrap();

    let geocoder = StaticGeocoder::new().with("here", Coordinates::new(35.1, 139.1).unwrap());

    let resolved = resolve_nearest(&geocoder, "here", &shelters).await.unwrap();
    assert_eq!(resolved.shelter.shelter_id, Some(first));
}

#[tokio::test]
async fn test_blank_address_is_not_geocoded() {
    let shelters: Vec<Shelter> = vec![
        Shelter::new("A", "", Coordinates::new(35.0, 139.0).unwrap()).with_id(1),
    ];
    let geocoder = StaticGeocoder::new().with("", Coordinates::new(35.0, 139.0).unwrap());

    assert!(resolve_nearest(&geocoder, "   ", &shelters).await.is_none());
}
