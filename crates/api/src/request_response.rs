// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use hinanjo_domain::{HazardFlags, Role, Shelter, Stock, StockActivityKind};
use hinanjo_persistence::{AccountData, CategoryData, StockActivityData};
use serde::{Deserialize, Serialize};

use crate::notices::Notices;

// ============================================================================
// Envelope
// ============================================================================

/// A response body together with the notices produced while building it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithNotices<T> {
    #[serde(flatten)]
    pub body: T,
    pub notices: Notices,
}

impl<T> WithNotices<T> {
    #[must_use]
    pub const fn new(body: T, notices: Notices) -> Self {
        Self { body, notices }
    }
}

// ============================================================================
// Capability Model
// ============================================================================

/// A single capability flag.
///
/// Serialized as a plain boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        bool::deserialize(deserializer).map(Self::from_bool)
    }
}

/// What the signed-in account may do anywhere in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCapabilities {
    pub can_manage_shelters: Capability,
    pub can_import_shelters: Capability,
    pub can_manage_stock: Capability,
    pub can_manage_categories: Capability,
    pub can_manage_admins: Capability,
}

/// What the signed-in admin may do to one listed administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCapabilities {
    pub can_edit: Capability,
    /// Denied for the last remaining administrator.
    pub can_demote: Capability,
}

// ============================================================================
// Accounts & Sessions
// ============================================================================

/// Self-registration of a regular account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Creation of the first administrator on an empty system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateFirstAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub expires_at: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub shelter_id: Option<i64>,
    pub work_address: Option<String>,
    pub work_shelter_id: Option<i64>,
    pub role: Role,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl From<AccountData> for AccountInfo {
    fn from(account: AccountData) -> Self {
        Self {
            user_id: account.user_id,
            name: account.name,
            email: account.email,
            phone: account.phone,
            address: account.address,
            shelter_id: account.shelter_id,
            work_address: account.work_address,
            work_shelter_id: account.work_shelter_id,
            role: account.role,
            created_at: account.created_at,
            last_login_at: account.last_login_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account: AccountInfo,
}

/// The signed-in account and what it may do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub account: AccountInfo,
    pub capabilities: GlobalCapabilities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapStatusResponse {
    /// True while no administrator exists.
    pub needs_first_admin: bool,
}

/// Changes to the signed-in account. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub work_address: Option<String>,
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub new_password_confirmation: Option<String>,
}

// ============================================================================
// Administrators
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromoteAccountRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateAdminRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminInfo {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub capabilities: AdminCapabilities,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAdminsResponse {
    pub admins: Vec<AdminInfo>,
}

// ============================================================================
// Shelters
// ============================================================================

/// Manual creation or full replacement of a shelter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShelterRequest {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub hazards: HazardFlags,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub note: String,
}

/// The map-facing summary of a shelter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterSummary {
    pub shelter_id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: Option<u32>,
    pub note: String,
}

impl ShelterSummary {
    /// Builds a summary for a persisted shelter; unsaved shelters yield `None`.
    #[must_use]
    pub fn from_shelter(shelter: &Shelter) -> Option<Self> {
        Some(Self {
            shelter_id: shelter.shelter_id?,
            name: shelter.name.clone(),
            address: shelter.address.clone(),
            latitude: shelter.location.latitude(),
            longitude: shelter.location.longitude(),
            capacity: shelter.capacity,
            note: shelter.note.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSheltersResponse {
    pub shelters: Vec<ShelterSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterResponse {
    pub shelter: Shelter,
}

/// A shelter with the stock held there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterDetailResponse {
    pub shelter: Shelter,
    pub stock: Vec<Stock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NearestShelterQuery {
    pub address: String,
}

/// Result of a public nearest-shelter lookup.
///
/// `shelter` is absent when the address could not be resolved or no shelters
/// exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestShelterResponse {
    pub address: String,
    pub shelter: Option<ShelterSummary>,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRowInfo {
    pub row_number: usize,
    pub reason: String,
}

/// Outcome of a shelter file import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSheltersResponse {
    pub imported: usize,
    pub shelter_ids: Vec<i64>,
    pub rejected_existing: Vec<String>,
    pub skipped_rows: Vec<SkippedRowInfo>,
    /// The text encoding the file was read as.
    pub encoding: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted_id: i64,
}

// ============================================================================
// Categories & Stock
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub category: CategoryData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<CategoryData>,
}

/// Creation or full replacement of a stock item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StockRequest {
    pub shelter_id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub name: String,
    pub quantity: i64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub note: String,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListStockQuery {
    #[serde(default)]
    pub shelter_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockResponse {
    pub stock: Stock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStockResponse {
    pub stock: Vec<Stock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockActivityInfo {
    pub activity_id: i64,
    pub stock_id: i64,
    pub stock_name: String,
    pub shelter_id: i64,
    pub user_id: Option<i64>,
    pub kind: StockActivityKind,
    pub description: String,
    pub created_at: String,
}

impl From<StockActivityData> for StockActivityInfo {
    fn from(activity: StockActivityData) -> Self {
        Self {
            activity_id: activity.activity_id,
            stock_id: activity.stock_id,
            stock_name: activity.stock_name,
            shelter_id: activity.shelter_id,
            user_id: activity.user_id,
            kind: activity.kind,
            description: activity.description,
            created_at: activity.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStockActivityResponse {
    pub stock_id: i64,
    pub activities: Vec<StockActivityInfo>,
}
