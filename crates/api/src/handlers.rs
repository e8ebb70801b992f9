// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler receives the acting account explicitly and reports its
//! outcome through the returned value plus the caller's `Notices`.

use std::collections::HashSet;

use hinanjo_domain::{
    Coordinates, Role, Shelter, Stock, validate_account_name, validate_category_name,
    validate_email, validate_shelter_fields, validate_stock_fields,
};
use hinanjo_persistence::{
    AccountChanges, AccountData, ActivityEntry, CategoryData, NewAccount, Persistence,
    PersistenceError, SessionData,
};
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::capabilities::{compute_admin_capabilities, compute_global_capabilities};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::geocoding::Geocoder;
use crate::nearest::{ResolvedShelter, resolve_nearest};
use crate::notices::Notices;
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AccountInfo, AccountResponse, AdminInfo, BootstrapStatusResponse, CategoryRequest,
    CategoryResponse, CreateFirstAdminRequest, DeletedResponse, ImportSheltersResponse,
    ListAdminsResponse, ListCategoriesResponse, ListSheltersResponse, ListStockActivityResponse,
    ListStockResponse, LoginRequest, LoginResponse, NearestShelterResponse, PromoteAccountRequest,
    RegisterRequest, ShelterDetailResponse, ShelterRequest, ShelterResponse, ShelterSummary,
    SkippedRowInfo, StockActivityInfo, StockRequest, StockResponse, UpdateAdminRequest,
    UpdateSettingsRequest, WhoAmIResponse,
};
use crate::shelter_import::{ShelterImportPlan, normalize_shelter_import};
use crate::uploads::StagedUpload;

/// Pushes the error text as a danger notice before handing the error back.
fn report<T>(notices: &mut Notices, result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(e) = &result {
        notices.danger(e.to_string());
    }
    result
}

/// Treats absent and whitespace-only optional fields the same.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require_account(persistence: &mut Persistence, user_id: i64) -> Result<AccountData, ApiError> {
    persistence
        .get_account_by_id(user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_persistence_error(PersistenceError::AccountNotFound(user_id)))
}

fn require_shelter(persistence: &mut Persistence, shelter_id: i64) -> Result<Shelter, ApiError> {
    persistence
        .get_shelter_by_id(shelter_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_persistence_error(PersistenceError::ShelterNotFound(shelter_id)))
}

fn require_stock(persistence: &mut Persistence, stock_id: i64) -> Result<Stock, ApiError> {
    persistence
        .get_stock_by_id(stock_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_persistence_error(PersistenceError::StockNotFound(stock_id)))
}

fn require_category(
    persistence: &mut Persistence,
    category_id: i64,
) -> Result<CategoryData, ApiError> {
    persistence
        .get_category_by_id(category_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_persistence_error(PersistenceError::CategoryNotFound(category_id)))
}

fn require_admin_account(
    persistence: &mut Persistence,
    user_id: i64,
) -> Result<AccountData, ApiError> {
    let account: AccountData = require_account(persistence, user_id)?;
    if account.role != Role::Admin {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Administrator"),
            message: format!("Account {user_id} is not an administrator"),
        });
    }
    Ok(account)
}

// ========================================================================
// Accounts & Sessions
// ========================================================================

/// Validates and stores a new account, returning the stored row.
fn create_checked_account(
    persistence: &mut Persistence,
    account: &NewAccount<'_>,
    password_confirmation: &str,
) -> Result<AccountData, ApiError> {
    validate_account_name(account.name).map_err(translate_domain_error)?;
    validate_email(account.email).map_err(translate_domain_error)?;

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        account.password,
        password_confirmation,
        account.email,
        account.name,
    )?;

    let user_id: i64 = persistence
        .create_account(account)
        .map_err(translate_persistence_error)?;

    require_account(persistence, user_id)
}

/// Registers a regular account.
///
/// A supplied home address is stored as-is; its nearest shelter is resolved
/// later through the settings flow.
///
/// # Errors
///
/// Returns an error if:
/// - The name or email is invalid
/// - The password violates the password policy
/// - The email is already registered
pub fn register_account(
    persistence: &mut Persistence,
    request: &RegisterRequest,
    notices: &mut Notices,
) -> Result<AccountResponse, ApiError> {
    let new_account: NewAccount<'_> = NewAccount {
        name: &request.name,
        email: &request.email,
        password: &request.password,
        role: Role::User,
        phone: non_blank(request.phone.as_deref()),
        address: non_blank(request.address.as_deref()),
    };

    let account: AccountData = report(
        notices,
        create_checked_account(persistence, &new_account, &request.password_confirmation),
    )?;

    info!(user_id = account.user_id, "Account registered");
    notices.success("Registration complete.");

    Ok(AccountResponse {
        account: AccountInfo::from(account),
    })
}

/// Reports whether the system still needs its first administrator.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn bootstrap_status(
    persistence: &mut Persistence,
) -> Result<BootstrapStatusResponse, ApiError> {
    let admin_count: i64 = persistence
        .count_admins()
        .map_err(translate_persistence_error)?;

    Ok(BootstrapStatusResponse {
        needs_first_admin: admin_count == 0,
    })
}

/// Creates the first administrator.
///
/// Only permitted while no administrator exists; no session is required.
///
/// # Errors
///
/// Returns an error if:
/// - An administrator already exists
/// - The name, email or password is invalid
/// - The email is already registered
pub fn create_first_admin(
    persistence: &mut Persistence,
    request: &CreateFirstAdminRequest,
    notices: &mut Notices,
) -> Result<AccountResponse, ApiError> {
    let status: BootstrapStatusResponse = bootstrap_status(persistence)?;
    if !status.needs_first_admin {
        return report(
            notices,
            Err(ApiError::Unauthorized {
                action: String::from("create_first_admin"),
                required_role: String::from("Bootstrap mode (no administrator exists)"),
            }),
        );
    }

    let new_account: NewAccount<'_> = NewAccount {
        name: &request.name,
        email: &request.email,
        password: &request.password,
        role: Role::Admin,
        phone: None,
        address: None,
    };

    let account: AccountData = report(
        notices,
        create_checked_account(persistence, &new_account, &request.password_confirmation),
    )?;

    info!(user_id = account.user_id, "First administrator created");
    notices.success("First administrator created.");

    Ok(AccountResponse {
        account: AccountInfo::from(account),
    })
}

/// Authenticates with email and password and opens a session.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the session cannot be
/// created.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, _actor, account): (String, AuthenticatedActor, AccountData) =
        AuthenticationService::login(persistence, &request.email, &request.password)?;

    let session: SessionData = persistence
        .get_session_by_token(&session_token)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to retrieve session: {e}"),
        })?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?;

    Ok(LoginResponse {
        session_token,
        user_id: account.user_id,
        name: account.name,
        email: account.email,
        role: account.role,
        expires_at: session.expires_at,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the signed-in account with its global capabilities.
#[must_use]
pub fn whoami(actor: &AuthenticatedActor, account: AccountData) -> WhoAmIResponse {
    WhoAmIResponse {
        account: AccountInfo::from(account),
        capabilities: compute_global_capabilities(actor),
    }
}

/// Nearest shelters found for the addresses in a settings update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsResolution {
    pub home: Option<ResolvedShelter>,
    pub work: Option<ResolvedShelter>,
}

/// Geocodes the addresses in a settings update against `shelters`.
///
/// This is the only part of the settings flow that waits on the network, so
/// callers can run it without holding the store.
pub async fn resolve_settings_shelters(
    geocoder: &dyn Geocoder,
    shelters: &[Shelter],
    request: &UpdateSettingsRequest,
) -> SettingsResolution {
    let home: Option<ResolvedShelter> = match non_blank(request.address.as_deref()) {
        Some(address) => resolve_nearest(geocoder, address, shelters).await,
        None => None,
    };
    let work: Option<ResolvedShelter> = match non_blank(request.work_address.as_deref()) {
        Some(address) => resolve_nearest(geocoder, address, shelters).await,
        None => None,
    };
    SettingsResolution { home, work }
}

/// Records an address change and, when it resolved, its nearest shelter.
fn apply_address(
    label: &str,
    resolved: Option<&ResolvedShelter>,
    shelter_id: &mut Option<i64>,
    notices: &mut Notices,
) {
    match resolved.and_then(|r| r.shelter.shelter_id.map(|id| (id, r))) {
        Some((id, r)) => {
            *shelter_id = Some(id);
            notices.info(format!(
                "Nearest shelter to your {label} address: {} ({:.2} km)",
                r.shelter.name, r.distance_km
            ));
        }
        None => {
            notices.info(format!(
                "No shelter could be found for your {label} address; your saved shelter was kept."
            ));
        }
    }
}

/// Applies a settings update to the signed-in account.
///
/// Name, email, phone and addresses are saved whenever present. A new
/// password is only stored when the current password is correct and the new
/// one meets the policy; otherwise a danger notice is added and the rest of
/// the update still goes through.
///
/// # Errors
///
/// Returns an error if:
/// - The account no longer exists
/// - The new name or email is invalid
/// - The new email is already registered
pub fn update_settings(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &UpdateSettingsRequest,
    resolution: &SettingsResolution,
    notices: &mut Notices,
) -> Result<AccountResponse, ApiError> {
    let account: AccountData = report(notices, require_account(persistence, actor.user_id))?;
    let mut changes: AccountChanges = AccountChanges::default();

    if let Some(name) = non_blank(request.name.as_deref()) {
        report(notices, validate_account_name(name).map_err(translate_domain_error))?;
        changes.name = Some(name.to_string());
    }
    if let Some(email) = non_blank(request.email.as_deref()) {
        report(notices, validate_email(email).map_err(translate_domain_error))?;
        changes.email = Some(email.to_string());
    }
    if let Some(phone) = non_blank(request.phone.as_deref()) {
        changes.phone = Some(phone.to_string());
    }
    if let Some(address) = non_blank(request.address.as_deref()) {
        changes.address = Some(address.to_string());
        apply_address(
            "home",
            resolution.home.as_ref(),
            &mut changes.shelter_id,
            notices,
        );
    }
    if let Some(work_address) = non_blank(request.work_address.as_deref()) {
        changes.work_address = Some(work_address.to_string());
        apply_address(
            "work",
            resolution.work.as_ref(),
            &mut changes.work_shelter_id,
            notices,
        );
    }

    report(
        notices,
        persistence
            .update_account(actor.user_id, &changes)
            .map_err(translate_persistence_error),
    )?;

    if let Some(new_password) = non_blank(request.new_password.as_deref()) {
        let current_password: &str = request.current_password.as_deref().unwrap_or_default();
        let verified: bool = Persistence::verify_password(&account, current_password)
            .map_err(translate_persistence_error)?;

        if verified {
            let confirmation: &str = request
                .new_password_confirmation
                .as_deref()
                .unwrap_or(new_password);
            let email: &str = changes.email.as_deref().unwrap_or(&account.email);
            let name: &str = changes.name.as_deref().unwrap_or(&account.name);

            match PasswordPolicy::default().validate(new_password, confirmation, email, name) {
                Ok(()) => {
                    persistence
                        .update_password(actor.user_id, new_password)
                        .map_err(translate_persistence_error)?;
                    info!(user_id = actor.user_id, "Password changed");
                }
                Err(e) => notices.danger(e.to_string()),
            }
        } else {
            warn!(user_id = actor.user_id, "Settings password change with wrong current password");
            notices.danger("The current password is incorrect; your password was not changed.");
        }
    }

    let updated: AccountData = require_account(persistence, actor.user_id)?;
    notices.success("Settings updated.");

    Ok(AccountResponse {
        account: AccountInfo::from(updated),
    })
}

// ========================================================================
// Administrators
// ========================================================================

/// Lists administrators with what the actor may do to each.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or a query fails.
pub fn list_admins(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListAdminsResponse, ApiError> {
    AuthorizationService::require_admin(actor, "list_admins")?;

    let admins: Vec<AccountData> = persistence
        .list_accounts_by_role(Role::Admin)
        .map_err(translate_persistence_error)?;
    let admin_count: i64 = persistence
        .count_admins()
        .map_err(translate_persistence_error)?;

    let admins: Vec<AdminInfo> = admins
        .into_iter()
        .map(|admin| AdminInfo {
            capabilities: compute_admin_capabilities(actor, &admin, admin_count),
            user_id: admin.user_id,
            name: admin.name,
            email: admin.email,
        })
        .collect();

    Ok(ListAdminsResponse { admins })
}

/// Grants the administrator role to the account registered under an email.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an administrator
/// - No account uses the email
/// - The account is already an administrator
pub fn promote_account(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &PromoteAccountRequest,
    notices: &mut Notices,
) -> Result<AccountResponse, ApiError> {
    AuthorizationService::require_admin(actor, "promote_account")?;

    let target: Option<AccountData> = persistence
        .get_account_by_email(&request.email)
        .map_err(translate_persistence_error)?;

    let Some(target) = target else {
        return report(
            notices,
            Err(ApiError::ResourceNotFound {
                resource_type: String::from("Account"),
                message: format!("No account is registered with {}", request.email.trim()),
            }),
        );
    };

    if target.role == Role::Admin {
        return report(
            notices,
            Err(ApiError::DomainRuleViolation {
                rule: String::from("already_admin"),
                message: format!("{} is already an administrator", target.email),
            }),
        );
    }

    report(
        notices,
        persistence
            .set_role(target.user_id, Role::Admin)
            .map_err(translate_persistence_error),
    )?;

    info!(
        actor = actor.user_id,
        user_id = target.user_id,
        "Account promoted to administrator"
    );
    notices.success(format!("{} is now an administrator.", target.name));

    let promoted: AccountData = require_account(persistence, target.user_id)?;
    Ok(AccountResponse {
        account: AccountInfo::from(promoted),
    })
}

/// Edits an administrator's display name and email.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an administrator
/// - The target is not an administrator
/// - The name or email is invalid or the email is taken
pub fn update_admin(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    user_id: i64,
    request: &UpdateAdminRequest,
    notices: &mut Notices,
) -> Result<AccountResponse, ApiError> {
    AuthorizationService::require_admin(actor, "update_admin")?;
    report(notices, require_admin_account(persistence, user_id))?;

    report(
        notices,
        validate_account_name(&request.name).map_err(translate_domain_error),
    )?;
    report(
        notices,
        validate_email(&request.email).map_err(translate_domain_error),
    )?;

    let changes: AccountChanges = AccountChanges {
        name: Some(request.name.trim().to_string()),
        email: Some(request.email.clone()),
        ..AccountChanges::default()
    };
    report(
        notices,
        persistence
            .update_account(user_id, &changes)
            .map_err(translate_persistence_error),
    )?;

    notices.success("Administrator updated.");
    let updated: AccountData = require_account(persistence, user_id)?;
    Ok(AccountResponse {
        account: AccountInfo::from(updated),
    })
}

/// Returns an administrator to the regular user role.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an administrator
/// - The target is not an administrator
/// - The target is the last remaining administrator
pub fn demote_admin(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    user_id: i64,
    notices: &mut Notices,
) -> Result<AccountResponse, ApiError> {
    AuthorizationService::require_admin(actor, "demote_admin")?;
    let target: AccountData = report(notices, require_admin_account(persistence, user_id))?;

    report(
        notices,
        persistence
            .set_role(user_id, Role::User)
            .map_err(translate_persistence_error),
    )?;

    info!(actor = actor.user_id, user_id, "Administrator demoted");
    notices.success(format!("{} is no longer an administrator.", target.name));

    let demoted: AccountData = require_account(persistence, user_id)?;
    Ok(AccountResponse {
        account: AccountInfo::from(demoted),
    })
}

// ========================================================================
// Shelters
// ========================================================================

fn shelter_from_request(request: &ShelterRequest) -> Result<Shelter, ApiError> {
    let location: Coordinates =
        Coordinates::new(request.latitude, request.longitude).map_err(translate_domain_error)?;

    let mut shelter: Shelter = Shelter::new(request.name.trim(), request.address.trim(), location);
    shelter.capacity = request.capacity;
    shelter.hazards = request.hazards;
    shelter.altitude = request.altitude;
    shelter.note = request.note.trim().to_string();

    validate_shelter_fields(&shelter).map_err(translate_domain_error)?;
    Ok(shelter)
}

/// Lists every shelter as map data. No authentication required.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_shelters(persistence: &mut Persistence) -> Result<ListSheltersResponse, ApiError> {
    let shelters: Vec<Shelter> = persistence
        .list_shelters()
        .map_err(translate_persistence_error)?;

    Ok(ListSheltersResponse {
        shelters: shelters
            .iter()
            .filter_map(ShelterSummary::from_shelter)
            .collect(),
    })
}

/// Returns one shelter with the stock held there.
///
/// # Errors
///
/// Returns an error if the shelter does not exist or a query fails.
pub fn get_shelter(
    persistence: &mut Persistence,
    shelter_id: i64,
) -> Result<ShelterDetailResponse, ApiError> {
    let shelter: Shelter = require_shelter(persistence, shelter_id)?;
    let stock: Vec<Stock> = persistence
        .list_stocks_for_shelter(shelter_id)
        .map_err(translate_persistence_error)?;

    Ok(ShelterDetailResponse { shelter, stock })
}

/// Creates a shelter from the manual entry form.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an administrator
/// - A field is invalid
/// - A shelter with the same name exists
pub fn create_shelter(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &ShelterRequest,
    notices: &mut Notices,
) -> Result<ShelterResponse, ApiError> {
    AuthorizationService::require_admin(actor, "create_shelter")?;
    let shelter: Shelter = report(notices, shelter_from_request(request))?;

    let shelter_id: i64 = report(
        notices,
        persistence
            .create_shelter(&shelter)
            .map_err(translate_persistence_error),
    )?;

    notices.success(format!("Shelter {} added.", shelter.name));
    Ok(ShelterResponse {
        shelter: shelter.with_id(shelter_id),
    })
}

/// Replaces every field of a shelter.
///
/// Account shelter references are left as they are.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an administrator
/// - A field is invalid
/// - The shelter does not exist
/// - The new name belongs to another shelter
pub fn update_shelter(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    shelter_id: i64,
    request: &ShelterRequest,
    notices: &mut Notices,
) -> Result<ShelterResponse, ApiError> {
    AuthorizationService::require_admin(actor, "update_shelter")?;
    let shelter: Shelter = report(notices, shelter_from_request(request))?;

    report(
        notices,
        persistence
            .update_shelter(shelter_id, &shelter)
            .map_err(translate_persistence_error),
    )?;

    notices.success(format!("Shelter {} updated.", shelter.name));
    Ok(ShelterResponse {
        shelter: shelter.with_id(shelter_id),
    })
}

/// Deletes a shelter that holds no stock.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an administrator
/// - The shelter does not exist
/// - Stock is still recorded at the shelter
pub fn delete_shelter(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    shelter_id: i64,
    notices: &mut Notices,
) -> Result<DeletedResponse, ApiError> {
    AuthorizationService::require_admin(actor, "delete_shelter")?;
    let shelter: Shelter = report(notices, require_shelter(persistence, shelter_id))?;

    report(
        notices,
        persistence
            .delete_shelter(shelter_id)
            .map_err(translate_persistence_error),
    )?;

    notices.success(format!("Shelter {} deleted.", shelter.name));
    Ok(DeletedResponse {
        deleted_id: shelter_id,
    })
}

/// Finds the shelter nearest to a free-text address. No authentication
/// required.
///
/// An address that cannot be geocoded is not an error; the response simply
/// carries no shelter.
pub async fn find_nearest_shelter(
    geocoder: &dyn Geocoder,
    shelters: &[Shelter],
    address: &str,
) -> NearestShelterResponse {
    let resolved: Option<ResolvedShelter> = resolve_nearest(geocoder, address, shelters).await;
    debug!(found = resolved.is_some(), "Nearest shelter lookup");

    NearestShelterResponse {
        address: address.trim().to_string(),
        distance_km: resolved.as_ref().map(|r| r.distance_km),
        shelter: resolved
            .as_ref()
            .and_then(|r| ShelterSummary::from_shelter(&r.shelter)),
    }
}

/// Imports shelters from an uploaded public dataset.
///
/// Shelters whose name is already stored, or repeated within the file, are
/// skipped and listed. Everything else is inserted in one transaction: on any
/// failure nothing is committed and the underlying error text is reported.
/// The staged file is removed when this returns, on every path.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an administrator
/// - The file cannot be decoded or lacks required columns
/// - The batch insert fails (`ImportFailed`)
pub fn import_shelters(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    upload: StagedUpload,
    notices: &mut Notices,
) -> Result<ImportSheltersResponse, ApiError> {
    AuthorizationService::require_admin(actor, "import_shelters")?;

    let raw: Vec<u8> = report(
        notices,
        upload.read().map_err(|e| ApiError::Internal {
            message: format!("Failed to read staged upload: {e}"),
        }),
    )?;

    let existing_names: HashSet<String> = persistence
        .list_shelter_names()
        .map_err(translate_persistence_error)?
        .into_iter()
        .collect();

    let plan: ShelterImportPlan =
        report(notices, normalize_shelter_import(&raw, &existing_names))?;

    let shelter_ids: Vec<i64> = match persistence.insert_shelters_atomically(&plan.accepted) {
        Ok(ids) => ids,
        Err(e) => {
            let reason: String = e.to_string();
            warn!(
                file = upload.client_filename(),
                "Shelter import rolled back: {reason}"
            );
            notices.danger(format!("An error occurred: {reason}"));
            return Err(ApiError::ImportFailed { reason });
        }
    };

    info!(
        actor = actor.user_id,
        file = upload.client_filename(),
        imported = shelter_ids.len(),
        "Shelter file imported"
    );

    if plan.used_fallback {
        notices.info(format!("The file was read as {}.", plan.encoding));
    }
    notices.success(format!(
        "The file was uploaded and {} shelters were saved.",
        shelter_ids.len()
    ));
    if !plan.rejected_existing.is_empty() {
        notices.info(format!(
            "{} shelters already existed and were skipped: {}",
            plan.rejected_existing.len(),
            plan.rejected_existing.join(", ")
        ));
    }
    for skipped in &plan.skipped_rows {
        notices.warning(format!("Row {} skipped: {}", skipped.row_number, skipped.reason));
    }

    Ok(ImportSheltersResponse {
        imported: shelter_ids.len(),
        shelter_ids,
        rejected_existing: plan.rejected_existing,
        skipped_rows: plan
            .skipped_rows
            .into_iter()
            .map(|row| SkippedRowInfo {
                row_number: row.row_number,
                reason: row.reason,
            })
            .collect(),
        encoding: plan.encoding.to_string(),
    })
}

// ========================================================================
// Categories
// ========================================================================

/// # Errors
///
/// Returns an error if the actor is not an administrator or the query fails.
pub fn list_categories(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListCategoriesResponse, ApiError> {
    AuthorizationService::require_admin(actor, "list_categories")?;
    let categories: Vec<CategoryData> = persistence
        .list_categories()
        .map_err(translate_persistence_error)?;
    Ok(ListCategoriesResponse { categories })
}

/// # Errors
///
/// Returns an error if the actor is not an administrator, the name is blank,
/// or the name is already used.
pub fn create_category(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CategoryRequest,
    notices: &mut Notices,
) -> Result<CategoryResponse, ApiError> {
    AuthorizationService::require_admin(actor, "create_category")?;
    report(
        notices,
        validate_category_name(&request.name).map_err(translate_domain_error),
    )?;

    let category_id: i64 = report(
        notices,
        persistence
            .create_category(&request.name)
            .map_err(translate_persistence_error),
    )?;

    notices.success("Category added.");
    Ok(CategoryResponse {
        category: require_category(persistence, category_id)?,
    })
}

/// # Errors
///
/// Returns an error if the actor is not an administrator, the category does
/// not exist, or the new name is blank or taken.
pub fn update_category(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    category_id: i64,
    request: &CategoryRequest,
    notices: &mut Notices,
) -> Result<CategoryResponse, ApiError> {
    AuthorizationService::require_admin(actor, "update_category")?;
    report(
        notices,
        validate_category_name(&request.name).map_err(translate_domain_error),
    )?;

    report(
        notices,
        persistence
            .update_category(category_id, &request.name)
            .map_err(translate_persistence_error),
    )?;

    notices.success("Category updated.");
    Ok(CategoryResponse {
        category: require_category(persistence, category_id)?,
    })
}

/// Deletes a category. Its stock becomes uncategorized.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the category
/// does not exist.
pub fn delete_category(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    category_id: i64,
    notices: &mut Notices,
) -> Result<DeletedResponse, ApiError> {
    AuthorizationService::require_admin(actor, "delete_category")?;
    report(
        notices,
        persistence
            .delete_category(category_id)
            .map_err(translate_persistence_error),
    )?;

    notices.success("Category deleted.");
    Ok(DeletedResponse {
        deleted_id: category_id,
    })
}

// ========================================================================
// Stock
// ========================================================================

/// Builds a validated stock item, checking its shelter and category exist.
fn stock_from_request(
    persistence: &mut Persistence,
    request: &StockRequest,
) -> Result<Stock, ApiError> {
    let stock: Stock = Stock {
        stock_id: None,
        shelter_id: request.shelter_id,
        category_id: request.category_id,
        name: request.name.trim().to_string(),
        quantity: request.quantity,
        unit: request.unit.trim().to_string(),
        location: request.location.trim().to_string(),
        note: request.note.trim().to_string(),
        expiration_date: non_blank(request.expiration_date.as_deref()).map(str::to_string),
        condition: request.condition.trim().to_string(),
    };
    validate_stock_fields(&stock).map_err(translate_domain_error)?;

    require_shelter(persistence, stock.shelter_id)?;
    if let Some(category_id) = stock.category_id {
        require_category(persistence, category_id)?;
    }
    Ok(stock)
}

fn optional_text<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| String::from("-"), ToString::to_string)
}

/// Describes a new stock item for the activity log.
fn describe_new_stock(stock: &Stock) -> String {
    format!("Added {} ({} {})", stock.name, stock.quantity, stock.unit)
        .trim_end()
        .to_string()
}

/// Lists the fields that differ between two versions of a stock item.
fn describe_stock_changes(before: &Stock, after: &Stock) -> String {
    let fields: [(&str, String, String); 9] = [
        ("name", before.name.clone(), after.name.clone()),
        (
            "shelter",
            before.shelter_id.to_string(),
            after.shelter_id.to_string(),
        ),
        (
            "category",
            optional_text(before.category_id.as_ref()),
            optional_text(after.category_id.as_ref()),
        ),
        (
            "quantity",
            before.quantity.to_string(),
            after.quantity.to_string(),
        ),
        ("unit", before.unit.clone(), after.unit.clone()),
        ("location", before.location.clone(), after.location.clone()),
        ("note", before.note.clone(), after.note.clone()),
        (
            "expiration date",
            optional_text(before.expiration_date.as_ref()),
            optional_text(after.expiration_date.as_ref()),
        ),
        ("condition", before.condition.clone(), after.condition.clone()),
    ];

    let changes: Vec<String> = fields
        .into_iter()
        .filter(|(_, old, new)| old != new)
        .map(|(field, old, new)| format!("{field}: {old} -> {new}"))
        .collect();

    if changes.is_empty() {
        format!("Updated {} (no changes)", after.name)
    } else {
        format!("Updated {}: {}", after.name, changes.join(", "))
    }
}

/// Lists stock, optionally only at one shelter.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the query fails.
pub fn list_stock(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    shelter_id: Option<i64>,
) -> Result<ListStockResponse, ApiError> {
    AuthorizationService::require_admin(actor, "list_stock")?;
    let stock: Vec<Stock> = match shelter_id {
        Some(shelter_id) => persistence.list_stocks_for_shelter(shelter_id),
        None => persistence.list_stocks(),
    }
    .map_err(translate_persistence_error)?;

    Ok(ListStockResponse { stock })
}

/// Adds a stock item and logs an `added` activity.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an administrator
/// - A field is invalid
/// - The shelter or category does not exist
pub fn create_stock(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &StockRequest,
    notices: &mut Notices,
) -> Result<StockResponse, ApiError> {
    AuthorizationService::require_admin(actor, "create_stock")?;
    let stock: Stock = report(notices, stock_from_request(persistence, request))?;

    let entry: ActivityEntry = ActivityEntry {
        user_id: actor.user_id,
        description: describe_new_stock(&stock),
    };
    let stock_id: i64 = report(
        notices,
        persistence
            .create_stock(&stock, &entry)
            .map_err(translate_persistence_error),
    )?;

    notices.success(format!("{} added.", stock.name));
    Ok(StockResponse {
        stock: require_stock(persistence, stock_id)?,
    })
}

/// Replaces a stock item's fields and logs an `edited` activity describing
/// what changed.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an administrator
/// - The stock item does not exist
/// - A field is invalid or the shelter or category does not exist
pub fn update_stock(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    stock_id: i64,
    request: &StockRequest,
    notices: &mut Notices,
) -> Result<StockResponse, ApiError> {
    AuthorizationService::require_admin(actor, "update_stock")?;
    let before: Stock = report(notices, require_stock(persistence, stock_id))?;
    let after: Stock = report(notices, stock_from_request(persistence, request))?;

    let entry: ActivityEntry = ActivityEntry {
        user_id: actor.user_id,
        description: describe_stock_changes(&before, &after),
    };
    report(
        notices,
        persistence
            .update_stock(stock_id, &after, &entry)
            .map_err(translate_persistence_error),
    )?;

    notices.success(format!("{} updated.", after.name));
    Ok(StockResponse {
        stock: require_stock(persistence, stock_id)?,
    })
}

/// Deletes a stock item and logs a `deleted` activity. The log row outlives
/// the item.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the item does
/// not exist.
pub fn delete_stock(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    stock_id: i64,
    notices: &mut Notices,
) -> Result<DeletedResponse, ApiError> {
    AuthorizationService::require_admin(actor, "delete_stock")?;
    let stock: Stock = report(notices, require_stock(persistence, stock_id))?;

    let entry: ActivityEntry = ActivityEntry {
        user_id: actor.user_id,
        description: format!("Deleted {}", stock.name),
    };
    report(
        notices,
        persistence
            .delete_stock(stock_id, &entry)
            .map_err(translate_persistence_error),
    )?;

    notices.success(format!("{} deleted.", stock.name));
    Ok(DeletedResponse {
        deleted_id: stock_id,
    })
}

/// Returns the activity log of a stock item, oldest first. Works for deleted
/// items too.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the query fails.
pub fn list_stock_activity(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    stock_id: i64,
) -> Result<ListStockActivityResponse, ApiError> {
    AuthorizationService::require_admin(actor, "list_stock_activity")?;
    let activities: Vec<StockActivityInfo> = persistence
        .list_activity_for_stock(stock_id)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(StockActivityInfo::from)
        .collect();

    Ok(ListStockActivityResponse {
        stock_id,
        activities,
    })
}
