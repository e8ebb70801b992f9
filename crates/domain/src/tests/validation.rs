// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Coordinates, DomainError, Shelter, Stock, normalize_email, parse_expiration_date,
    validate_category_name, validate_email, validate_shelter_fields, validate_stock_fields,
};

fn create_test_stock() -> Stock {
    Stock {
        stock_id: None,
        shelter_id: 1,
        category_id: None,
        name: String::from("Water"),
        quantity: 24,
        unit: String::from("bottles"),
        location: String::from("Store room"),
        note: String::new(),
        expiration_date: Some(String::from("2027-03-31")),
        condition: String::from("good"),
    }
}

fn shelter_named(name: &str) -> Shelter {
    Shelter::new(name, "addr", Coordinates::new(35.0, 135.0).unwrap())
}

#[test]
fn test_validate_shelter_fields_rejects_blank_name() {
    let shelter: Shelter = shelter_named("   ");
    assert!(matches!(
        validate_shelter_fields(&shelter),
        Err(DomainError::InvalidShelterName(_))
    ));
}

#[test]
fn test_validate_shelter_fields_rejects_nan_altitude() {
    let mut shelter: Shelter = shelter_named("A");
    shelter.altitude = Some(f64::NAN);
    assert!(validate_shelter_fields(&shelter).is_err());

    shelter.altitude = Some(12.5);
    assert!(validate_shelter_fields(&shelter).is_ok());
}

#[test]
fn test_email_normalization_and_validation() {
    assert_eq!(normalize_email("  Taro@Example.JP "), "taro@example.jp");
    assert!(validate_email("taro@example.jp").is_ok());
    assert!(validate_email("taro.example.jp").is_err());
    assert!(validate_email("@example.jp").is_err());
    assert!(validate_email("taro@localhost").is_err());
    assert!(validate_email("taro@example..jp").is_err());
    assert!(validate_email("ta ro@example.jp").is_err());
}

#[test]
fn test_category_name_must_not_be_blank() {
    assert!(validate_category_name("Food").is_ok());
    assert!(validate_category_name("").is_err());
}

#[test]
fn test_parse_expiration_date() {
    let date = parse_expiration_date("2027-03-31").unwrap();
    assert_eq!(date.year(), 2027);
    assert!(parse_expiration_date("2027-02-30").is_err());
    assert!(parse_expiration_date("31/03/2027").is_err());
}

#[test]
fn test_validate_stock_fields() {
    assert!(validate_stock_fields(&create_test_stock()).is_ok());

    let mut stock: Stock = create_test_stock();
    stock.quantity = -1;
    assert_eq!(
        validate_stock_fields(&stock),
        Err(DomainError::InvalidQuantity(-1))
    );

    let mut stock: Stock = create_test_stock();
    stock.expiration_date = Some(String::from("soon"));
    assert!(matches!(
        validate_stock_fields(&stock),
        Err(DomainError::InvalidExpirationDate { .. })
    ));

    let mut stock: Stock = create_test_stock();
    stock.name = String::new();
    assert!(matches!(
        validate_stock_fields(&stock),
        Err(DomainError::InvalidStockName(_))
    ));
}
