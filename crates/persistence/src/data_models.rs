// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use hinanjo_domain::{Role, StockActivityKind};
use serde::{Deserialize, Serialize};

use crate::diesel_schema::users;

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub shelter_id: Option<i64>,
    pub work_address: Option<String>,
    pub work_shelter_id: Option<i64>,
    pub role: Role,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// Input for creating an account. The password is hashed on insert.
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
}

/// Partial account update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = users)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub shelter_id: Option<i64>,
    pub work_address: Option<String>,
    pub work_shelter_id: Option<i64>,
}

impl AccountChanges {
    /// Returns true when no column would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.shelter_id.is_none()
            && self.work_address.is_none()
            && self.work_shelter_id.is_none()
    }
}

/// A stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// A stock category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryData {
    pub category_id: i64,
    pub name: String,
}

/// One row of the stock activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockActivityData {
    pub activity_id: i64,
    pub stock_id: i64,
    pub stock_name: String,
    pub shelter_id: i64,
    pub user_id: Option<i64>,
    pub kind: StockActivityKind,
    pub description: String,
    pub created_at: String,
}

/// Who changed a stock item and how it should read in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub user_id: i64,
    pub description: String,
}
