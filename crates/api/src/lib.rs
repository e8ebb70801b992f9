// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the shelter service.
//!
//! Handlers here are transport-agnostic: they take an open `Persistence`,
//! the authenticated actor and typed requests, and return typed responses
//! plus user-facing notices. The HTTP server maps them onto routes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod capabilities;
mod error;
mod geocoding;
mod handlers;
mod nearest;
mod notices;
mod password_policy;
mod request_response;
mod shelter_import;
mod uploads;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use capabilities::{compute_admin_capabilities, compute_global_capabilities};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use geocoding::{
    DEFAULT_NOMINATIM_URL, DisabledGeocoder, GeocodeError, Geocoder, NominatimGeocoder,
    StaticGeocoder,
};
pub use handlers::{
    SettingsResolution, bootstrap_status, create_category, create_first_admin, create_shelter,
    create_stock, delete_category, delete_shelter, delete_stock, demote_admin,
    find_nearest_shelter, get_shelter, import_shelters, list_admins, list_categories,
    list_shelters, list_stock, list_stock_activity, login, logout, promote_account,
    register_account, resolve_settings_shelters, update_admin, update_category, update_settings,
    update_shelter, update_stock, whoami,
};
pub use nearest::{ResolvedShelter, resolve_nearest};
pub use notices::{Notice, NoticeLevel, Notices};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AccountInfo, AccountResponse, AdminCapabilities, AdminInfo, BootstrapStatusResponse,
    CategoryRequest, CategoryResponse, Capability, CreateFirstAdminRequest, DeletedResponse,
    GlobalCapabilities, ImportSheltersResponse, ListAdminsResponse, ListCategoriesResponse,
    ListSheltersResponse, ListStockActivityResponse, ListStockQuery, ListStockResponse,
    LoginRequest, LoginResponse, NearestShelterQuery, NearestShelterResponse,
    PromoteAccountRequest, RegisterRequest, ShelterDetailResponse, ShelterRequest,
    ShelterResponse, ShelterSummary, SkippedRowInfo, StockActivityInfo, StockRequest,
    StockResponse, UpdateAdminRequest, UpdateSettingsRequest, WhoAmIResponse, WithNotices,
};
pub use shelter_import::{
    CAPACITY_COLUMNS, COLUMN_ADDRESS, COLUMN_ALTITUDE, COLUMN_FACILITY_TYPE, COLUMN_LATITUDE,
    COLUMN_LONGITUDE, COLUMN_NAME, DecodedUpload, ShelterImportPlan, SkippedRow, decode_upload,
    decode_with, normalize_shelter_import,
};
pub use uploads::{StagedUpload, sanitize_filename};
