// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::path::PathBuf;

use hinanjo_domain::{Coordinates, HazardFlags, Role, Shelter};
use hinanjo_persistence::{NewAccount, Persistence};

use crate::auth::AuthenticatedActor;
use crate::request_response::{RegisterRequest, ShelterRequest};

pub const TEST_PASSWORD: &str = "Shelter-Pass-2026";

pub fn create_admin(persistence: &mut Persistence, email: &str) -> AuthenticatedActor {
    let user_id: i64 = persistence
        .create_account(&NewAccount {
            name: "Admin",
            email,
            password: TEST_PASSWORD,
            role: Role::Admin,
            phone: None,
            address: None,
        })
        .unwrap();
    AuthenticatedActor::new(user_id, Role::Admin)
}

pub fn create_user(persistence: &mut Persistence, email: &str) -> AuthenticatedActor {
    let user_id: i64 = persistence
        .create_account(&NewAccount {
            name: "Resident",
            email,
            password: TEST_PASSWORD,
            role: Role::User,
            phone: None,
            address: None,
        })
        .unwrap();
    AuthenticatedActor::new(user_id, Role::User)
}

pub fn create_register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        name: String::from("Hanako Yamada"),
        email: String::from(email),
        password: String::from(TEST_PASSWORD),
        password_confirmation: String::from(TEST_PASSWORD),
        phone: Some(String::from("090-0000-0000")),
        address: None,
    }
}

pub fn create_shelter_request(name: &str) -> ShelterRequest {
    ShelterRequest {
        name: String::from(name),
        address: String::from("東京都千代田区丸の内1-9-1"),
        capacity: Some(300),
        hazards: HazardFlags::default(),
        latitude: 35.681_236,
        longitude: 139.767_125,
        altitude: None,
        note: String::new(),
    }
}

/// Stores a shelter directly and returns its id.
pub fn store_shelter(persistence: &mut Persistence, name: &str, lat: f64, lon: f64) -> i64 {
    let shelter: Shelter = Shelter::new(name, "", Coordinates::new(lat, lon).unwrap());
    persistence.create_shelter(&shelter).unwrap()
}

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir(label: &str) -> PathBuf {
    let dir: PathBuf = std::env::temp_dir().join(format!(
        "hinanjo-api-{label}-{}-{:08x}",
        std::process::id(),
        rand::random::<u32>()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn dir_is_empty(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
