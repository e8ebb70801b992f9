// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod account_tests;
mod initialization_tests;

use hinanjo_domain::{Coordinates, HazardFlag, HazardFlags, Role, Shelter, Stock};

use crate::{NewAccount, Persistence};

pub fn create_test_shelter(name: &str) -> Shelter {
    let mut shelter: Shelter = Shelter::new(
        name,
        "東京都千代田区丸の内1-9-1",
        Coordinates::new(35.681_236, 139.767_125).unwrap(),
    );
    shelter.capacity = Some(250);
    shelter.hazards = HazardFlags::uniform(HazardFlag::No);
    shelter.hazards.earthquake = HazardFlag::Yes;
    shelter
}

pub fn create_test_stock(shelter_id: i64) -> Stock {
    Stock {
        stock_id: None,
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

pub fn create_test_admin(persistence: &mut Persistence, email: &str) -> i64 {
    persistence
        .create_account(&NewAccount {
            name: "Admin",
            email,
            password: "Correct-Horse-42",
            role: Role::Admin,
            phone: None,
            address: None,
        })
        .unwrap()
}

pub fn create_test_user(persistence: &mut Persistence, email: &str) -> i64 {
    persistence
        .create_account(&NewAccount {
            name: "Resident",
            email,
            password: "Correct-Horse-42",
            role: Role::User,
            phone: Some("03-0000-0000"),
            address: Some("東京都千代田区"),
        })
        .unwrap()
}
