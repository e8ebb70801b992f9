// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod session;

#[cfg(test)]
mod tests;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use hinanjo_api::{
    AccountResponse, ApiError, AuthorizationService, BootstrapStatusResponse,
    CategoryRequest, CategoryResponse, CreateFirstAdminRequest, DEFAULT_NOMINATIM_URL,
    DeletedResponse, DisabledGeocoder, Geocoder, ImportSheltersResponse, ListAdminsResponse,
    ListCategoriesResponse, ListSheltersResponse, ListStockActivityResponse, ListStockQuery,
    ListStockResponse, LoginRequest, LoginResponse, NearestShelterQuery, NearestShelterResponse,
    NominatimGeocoder, Notices, PromoteAccountRequest, RegisterRequest, SettingsResolution,
    ShelterDetailResponse, ShelterRequest, ShelterResponse, StagedUpload, StockRequest,
    StockResponse, UpdateAdminRequest, UpdateSettingsRequest, WhoAmIResponse, WithNotices,
    bootstrap_status, create_category, create_first_admin, create_shelter, create_stock,
    delete_category, delete_shelter, delete_stock, demote_admin, find_nearest_shelter,
    get_shelter, import_shelters, list_admins, list_categories, list_shelters, list_stock,
    list_stock_activity, login, logout, promote_account, register_account,
    resolve_settings_shelters, update_admin, update_category, update_settings, update_shelter,
    update_stock, whoami,
};
use hinanjo_domain::Shelter;
use hinanjo_persistence::{Persistence, PersistenceError};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::{SessionAccount, SessionToken};

/// Largest accepted shelter upload.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Hinanjo Server - HTTP server for the disaster shelter service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "HINANJO_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "HINANJO_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, env = "HINANJO_PORT", default_value_t = 3000)]
    port: u16,

    /// Directory where uploads are staged while they are processed
    #[arg(long, env = "HINANJO_UPLOAD_DIR", default_value = "uploads")]
    upload_dir: PathBuf,

    /// Base URL of a Nominatim-compatible geocoding service
    #[arg(long, env = "HINANJO_GEOCODER_URL", default_value = DEFAULT_NOMINATIM_URL)]
    geocoder_url: String,

    /// User agent sent to the geocoding service
    #[arg(
        long,
        env = "HINANJO_GEOCODER_USER_AGENT",
        default_value = concat!("hinanjo/", env!("CARGO_PKG_VERSION"))
    )]
    geocoder_user_agent: String,

    /// Geocoder request timeout, in seconds
    #[arg(long, env = "HINANJO_GEOCODER_TIMEOUT_SECS", default_value_t = 10)]
    geocoder_timeout_secs: u64,

    /// Never geocode; every address is treated as unresolvable
    #[arg(long, env = "HINANJO_DISABLE_GEOCODING")]
    disable_geocoding: bool,
}

/// Application state shared across handlers.
///
/// The store sits behind one async mutex. Handlers never hold it across a
/// geocoder call.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    geocoder: Arc<dyn Geocoder>,
    upload_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    #[serde(skip_serializing_if = "Notices::is_empty")]
    notices: Notices,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    message: String,
    /// Notices gathered before the failure.
    notices: Notices,
}

impl HttpError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            notices: Notices::new(),
        }
    }

    fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            notices: self.notices,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { rule, .. } if rule.starts_with("unique_") => {
                StatusCode::CONFLICT
            }
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. }
            | ApiError::InvalidCsvFormat { .. }
            | ApiError::PasswordPolicyViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::ImportFailed { .. } | ApiError::Internal { .. } => {
                error!(error = %err, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Persistence error: {err}"),
        )
    }
}

/// Wraps a handler outcome together with its notices.
fn respond<T: Serialize>(
    result: Result<T, ApiError>,
    notices: Notices,
) -> Result<Json<WithNotices<T>>, HttpError> {
    match result {
        Ok(body) => Ok(Json(WithNotices::new(body, notices))),
        Err(e) => Err(HttpError::from(e).with_notices(notices)),
    }
}

/// Snapshot of every shelter, taken so the store can be released before
/// geocoding.
async fn shelter_snapshot(app_state: &AppState) -> Result<Vec<Shelter>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(persistence.list_shelters()?)
}

// ========================================================================
// Accounts
// ========================================================================

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for POST `/auth/register`.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<WithNotices<AccountResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = register_account(&mut persistence, &req, &mut notices);
    drop(persistence);
    respond(result, notices)
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(login(&mut persistence, &req)?))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    SessionToken(token): SessionToken,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, &token)?;
    info!(user_id = actor.user_id, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/auth/me`.
async fn handle_whoami(SessionAccount(actor, account): SessionAccount) -> Json<WhoAmIResponse> {
    Json(whoami(&actor, account))
}

/// Handler for GET `/auth/bootstrap`.
async fn handle_bootstrap_status(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<BootstrapStatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(bootstrap_status(&mut persistence)?))
}

/// Handler for POST `/auth/bootstrap`.
async fn handle_create_first_admin(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateFirstAdminRequest>,
) -> Result<Json<WithNotices<AccountResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = create_first_admin(&mut persistence, &req, &mut notices);
    drop(persistence);
    respond(result, notices)
}

/// Handler for POST `/settings`.
///
/// Addresses are geocoded first, with the store released, and only then is
/// the update applied.
async fn handle_update_settings(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<WithNotices<AccountResponse>>, HttpError> {
    let wants_lookup: bool = req.address.is_some() || req.work_address.is_some();
    let resolution: SettingsResolution = if wants_lookup {
        let shelters: Vec<Shelter> = shelter_snapshot(&app_state).await?;
        resolve_settings_shelters(app_state.geocoder.as_ref(), &shelters, &req).await
    } else {
        SettingsResolution::default()
    };

    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = update_settings(&mut persistence, &actor, &req, &resolution, &mut notices);
    drop(persistence);
    respond(result, notices)
}

// ========================================================================
// Shelters
// ========================================================================

/// Handler for GET `/shelters`.
async fn handle_list_shelters(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListSheltersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_shelters(&mut persistence)?))
}

/// Handler for GET `/shelters/nearest`.
async fn handle_nearest_shelter(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<NearestShelterQuery>,
) -> Result<Json<NearestShelterResponse>, HttpError> {
    let shelters: Vec<Shelter> = shelter_snapshot(&app_state).await?;
    let response: NearestShelterResponse =
        find_nearest_shelter(app_state.geocoder.as_ref(), &shelters, &query.address).await;
    Ok(Json(response))
}

/// Handler for GET `/shelters/{shelter_id}`.
async fn handle_get_shelter(
    AxumState(app_state): AxumState<AppState>,
    Path(shelter_id): Path<i64>,
) -> Result<Json<ShelterDetailResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_shelter(&mut persistence, shelter_id)?))
}

/// Handler for POST `/admin/shelters`.
async fn handle_create_shelter(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<ShelterRequest>,
) -> Result<Json<WithNotices<ShelterResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = create_shelter(&mut persistence, &actor, &req, &mut notices);
    drop(persistence);
    respond(result, notices)
}

/// Handler for POST `/admin/shelters/{shelter_id}`.
async fn handle_update_shelter(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(shelter_id): Path<i64>,
    Json(req): Json<ShelterRequest>,
) -> Result<Json<WithNotices<ShelterResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = update_shelter(&mut persistence, &actor, shelter_id, &req, &mut notices);
    drop(persistence);
    respond(result, notices)
}

/// Handler for DELETE `/admin/shelters/{shelter_id}`.
async fn handle_delete_shelter(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(shelter_id): Path<i64>,
) -> Result<Json<WithNotices<DeletedResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = delete_shelter(&mut persistence, &actor, shelter_id, &mut notices);
    drop(persistence);
    respond(result, notices)
}

/// Reads the multipart `file` field into the staging directory.
async fn stage_upload(
    upload_dir: &std::path::Path,
    multipart: &mut Multipart,
) -> Result<StagedUpload, HttpError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "Malformed multipart body");
        HttpError::new(StatusCode::BAD_REQUEST, format!("Malformed upload: {e}"))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let client_filename: String = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field.bytes().await.map_err(|e| {
            HttpError::new(StatusCode::BAD_REQUEST, format!("Malformed upload: {e}"))
        })?;

        return StagedUpload::stage(upload_dir, &client_filename, &bytes).map_err(|e| {
            error!(error = %e, "Failed to stage upload");
            HttpError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to stage upload: {e}"),
            )
        });
    }

    Err(HttpError::new(
        StatusCode::BAD_REQUEST,
        "Missing multipart field 'file'",
    ))
}

/// Handler for POST `/admin/shelters/import`.
async fn handle_import_shelters(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    mut multipart: Multipart,
) -> Result<Json<WithNotices<ImportSheltersResponse>>, HttpError> {
    AuthorizationService::require_admin(&actor, "import_shelters").map_err(ApiError::from)?;

    let upload: StagedUpload = stage_upload(&app_state.upload_dir, &mut multipart).await?;
    info!(
        user_id = actor.user_id,
        file = upload.client_filename(),
        "Importing shelter file"
    );

    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = import_shelters(&mut persistence, &actor, upload, &mut notices);
    drop(persistence);
    respond(result, notices)
}

// ========================================================================
// Administrators
// ========================================================================

/// Handler for GET `/admin/admins`.
async fn handle_list_admins(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
) -> Result<Json<ListAdminsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_admins(&mut persistence, &actor)?))
}

/// Handler for POST `/admin/admins/promote`.
async fn handle_promote_account(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<PromoteAccountRequest>,
) -> Result<Json<WithNotices<AccountResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = promote_account(&mut persistence, &actor, &req, &mut notices);
    drop(persistence);
    respond(result, notices)
}

/// Handler for POST `/admin/admins/{user_id}`.
async fn handle_update_admin(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateAdminRequest>,
) -> Result<Json<WithNotices<AccountResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = update_admin(&mut persistence, &actor, user_id, &req, &mut notices);
    drop(persistence);
    respond(result, notices)
}

/// Handler for DELETE `/admin/admins/{user_id}`.
async fn handle_demote_admin(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(user_id): Path<i64>,
) -> Result<Json<WithNotices<AccountResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = demote_admin(&mut persistence, &actor, user_id, &mut notices);
    drop(persistence);
    respond(result, notices)
}

// ========================================================================
// Categories & Stock
// ========================================================================

async fn handle_list_categories(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
) -> Result<Json<ListCategoriesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_categories(&mut persistence, &actor)?))
}

async fn handle_create_category(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<WithNotices<CategoryResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = create_category(&mut persistence, &actor, &req, &mut notices);
    drop(persistence);
    respond(result, notices)
}

async fn handle_update_category(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(category_id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<WithNotices<CategoryResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = update_category(&mut persistence, &actor, category_id, &req, &mut notices);
    drop(persistence);
    respond(result, notices)
}

async fn handle_delete_category(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(category_id): Path<i64>,
) -> Result<Json<WithNotices<DeletedResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = delete_category(&mut persistence, &actor, category_id, &mut notices);
    drop(persistence);
    respond(result, notices)
}

/// Handler for GET `/admin/stock`, optionally filtered by `shelter_id`.
async fn handle_list_stock(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Query(query): Query<ListStockQuery>,
) -> Result<Json<ListStockResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_stock(&mut persistence, &actor, query.shelter_id)?))
}

async fn handle_create_stock(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<StockRequest>,
) -> Result<Json<WithNotices<StockResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = create_stock(&mut persistence, &actor, &req, &mut notices);
    drop(persistence);
    respond(result, notices)
}

async fn handle_update_stock(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(stock_id): Path<i64>,
    Json(req): Json<StockRequest>,
) -> Result<Json<WithNotices<StockResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = update_stock(&mut persistence, &actor, stock_id, &req, &mut notices);
    drop(persistence);
    respond(result, notices)
}

async fn handle_delete_stock(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(stock_id): Path<i64>,
) -> Result<Json<WithNotices<DeletedResponse>>, HttpError> {
    let mut notices: Notices = Notices::new();
    let mut persistence = app_state.persistence.lock().await;
    let result = delete_stock(&mut persistence, &actor, stock_id, &mut notices);
    drop(persistence);
    respond(result, notices)
}

async fn handle_stock_activity(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(stock_id): Path<i64>,
) -> Result<Json<ListStockActivityResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_stock_activity(&mut persistence, &actor, stock_id)?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_whoami))
        .route(
            "/auth/bootstrap",
            get(handle_bootstrap_status).post(handle_create_first_admin),
        )
        .route("/settings", post(handle_update_settings))
        .route("/shelters", get(handle_list_shelters))
        .route("/shelters/nearest", get(handle_nearest_shelter))
        .route("/shelters/{shelter_id}", get(handle_get_shelter))
        .route("/admin/shelters", post(handle_create_shelter))
        .route(
            "/admin/shelters/import",
            post(handle_import_shelters).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/admin/shelters/{shelter_id}",
            post(handle_update_shelter).delete(handle_delete_shelter),
        )
        .route("/admin/admins", get(handle_list_admins))
        .route("/admin/admins/promote", post(handle_promote_account))
        .route(
            "/admin/admins/{user_id}",
            post(handle_update_admin).delete(handle_demote_admin),
        )
        .route(
            "/admin/categories",
            get(handle_list_categories).post(handle_create_category),
        )
        .route(
            "/admin/categories/{category_id}",
            post(handle_update_category).delete(handle_delete_category),
        )
        .route(
            "/admin/stock",
            get(handle_list_stock).post(handle_create_stock),
        )
        .route(
            "/admin/stock/{stock_id}",
            post(handle_update_stock).delete(handle_delete_stock),
        )
        .route("/admin/stock/{stock_id}/activity", get(handle_stock_activity))
        .with_state(app_state)
}

fn build_geocoder(args: &Args) -> Result<Arc<dyn Geocoder>, Box<dyn std::error::Error>> {
    if args.disable_geocoding {
        info!("Geocoding disabled");
        return Ok(Arc::new(DisabledGeocoder));
    }

    info!(url = %args.geocoder_url, "Using geocoder");
    let geocoder: NominatimGeocoder = NominatimGeocoder::new(
        &args.geocoder_url,
        &args.geocoder_user_agent,
        Duration::from_secs(args.geocoder_timeout_secs),
    )?;
    Ok(Arc::new(geocoder))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Hinanjo Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    info!(shelters = persistence.count_shelters()?, "Database ready");

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        geocoder: build_geocoder(&args)?,
        upload_dir: args.upload_dir.clone(),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
