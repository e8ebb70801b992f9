// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for categories, stock and the stock activity log.

use hinanjo_domain::StockActivityKind;
use hinanjo_persistence::Persistence;

use crate::auth::AuthenticatedActor;
use crate::error::ApiError;
use crate::handlers::{
    create_category, create_stock, delete_category, delete_shelter, delete_stock,
    list_categories, list_stock, list_stock_activity, update_category, update_stock,
};
use crate::notices::Notices;
use crate::request_response::{CategoryRequest, StockRequest};
use crate::tests::helpers::{create_admin, create_user, store_shelter};

fn water_request(shelter_id: i64) -> StockRequest {
    StockRequest {
        shelter_id,
        category_id: None,
        name: String::from("Water"),
        quantity: 48,
        unit: String::from("bottles"),
        location: String::from("Gym storeroom"),
        note: String::new(),
        expiration_date: Some(String::from("2027-03-31")),
        condition: String::from("sealed"),
    }
}

fn setup() -> (Persistence, AuthenticatedActor, i64) {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin = create_admin(&mut persistence, "admin@example.jp");
    let shelter_id = store_shelter(&mut persistence, "A", 35.0, 139.0);
    (persistence, admin, shelter_id)
}

#[test]
fn test_category_lifecycle() {
    let (mut persistence, admin, _) = setup();
    let mut notices = Notices::new();

    let created = create_category(
        &mut persistence,
        &admin,
        &CategoryRequest {
            name: String::from("Food"),
        },
        &mut notices,
    )
    .unwrap();
    let category_id = created.category.category_id;

    let updated = update_category(
        &mut persistence,
        &admin,
        category_id,
        &CategoryRequest {
            name: String::from("Food & Water"),
        },
        &mut notices,
    )
    .unwrap();
    assert_eq!(updated.category.name, "Food & Water");

    delete_category(&mut persistence, &admin, category_id, &mut notices).unwrap();
    assert!(
        list_categories(&mut persistence, &admin)
            .unwrap()
            .categories
            .is_empty()
    );
}

#[test]
fn test_blank_category_name_is_rejected() {
    let (mut persistence, admin, _) = setup();
    let mut notices = Notices::new();

    let result = create_category(
        &mut persistence,
        &admin,
        &CategoryRequest {
            name: String::from("   "),
        },
        &mut notices,
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_stock_changes_are_logged() {
    let (mut persistence, admin, shelter_id) = setup();
    let mut notices = Notices::new();

    let created = create_stock(
        &mut persistence,
        &admin,
        &water_request(shelter_id),
        &mut notices,
    )
    .unwrap();
    let stock_id = created.stock.stock_id.unwrap();

    let mut request = water_request(shelter_id);
    request.quantity = 40;
    update_stock(&mut persistence, &admin, stock_id, &request, &mut notices).unwrap();

    let log = list_stock_activity(&mut persistence, &admin, stock_id).unwrap();
    let kinds: Vec<StockActivityKind> = log.activities.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![StockActivityKind::Added, StockActivityKind::Edited]
    );
    assert!(log.activities[1].description.contains("quantity: 48 -> 40"));
    assert_eq!(log.activities[1].user_id, Some(admin.user_id));
}

#[test]
fn test_activity_outlives_deleted_stock() {
    let (mut persistence, admin, shelter_id) = setup();
    let mut notices = Notices::new();

    let created = create_stock(
        &mut persistence,
        &admin,
        &water_request(shelter_id),
        &mut notices,
    )
    .unwrap();
    let stock_id = created.stock.stock_id.unwrap();

    delete_stock(&mut persistence, &admin, stock_id, &mut notices).unwrap();

    assert!(persistence.get_stock_by_id(stock_id).unwrap().is_none());
    let log = list_stock_activity(&mut persistence, &admin, stock_id).unwrap();
    assert_eq!(log.activities.len(), 2);
    assert_eq!(log.activities[1].kind, StockActivityKind::Deleted);
    assert_eq!(log.activities[1].stock_name, "Water");
}

#[test]
fn test_stock_for_unknown_shelter_is_not_found() {
    let (mut persistence, admin, _) = setup();
    let mut notices = Notices::new();

    let result = create_stock(&mut persistence, &admin, &water_request(999), &mut notices);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_negative_quantity_is_rejected() {
    let (mut persistence, admin, shelter_id) = setup();
    let mut notices = Notices::new();
    let mut request = water_request(shelter_id);
    request.quantity = -1;

    let result = create_stock(&mut persistence, &admin, &request, &mut notices);

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_shelter_with_stock_cannot_be_deleted() {
    let (mut persistence, admin, shelter_id) = setup();
    let mut notices = Notices::new();
    create_stock(
        &mut persistence,
        &admin,
        &water_request(shelter_id),
        &mut notices,
    )
    .unwrap();

    let result = delete_shelter(&mut persistence, &admin, shelter_id, &mut notices);

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "shelter_has_stock"
    ));
}

#[test]
fn test_list_stock_filters_by_shelter() {
    let (mut persistence, admin, shelter_id) = setup();
    let other_id = store_shelter(&mut persistence, "B", 36.0, 140.0);
    let mut notices = Notices::new();
    create_stock(&mut persistence, &admin, &water_request(shelter_id), &mut notices).unwrap();
    create_stock(&mut persistence, &admin, &water_request(other_id), &mut notices).unwrap();

    assert_eq!(list_stock(&mut persistence, &admin, None).unwrap().stock.len(), 2);
    assert_eq!(
        list_stock(&mut persistence, &admin, Some(other_id))
            .unwrap()
            .stock
            .len(),
        1
    );
}

#[test]
fn test_user_cannot_manage_stock() {
    let (mut persistence, _, shelter_id) = setup();
    let user = create_user(&mut persistence, "user@example.jp");
    let mut notices = Notices::new();

    let result = create_stock(&mut persistence, &user, &water_request(shelter_id), &mut notices);
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert!(matches!(
        list_stock(&mut persistence, &user, None),
        Err(ApiError::Unauthorized { .. })
    ));
}
