// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router-level tests driven through `tower::ServiceExt::oneshot`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode as HttpStatusCode, header},
};
use hinanjo_api::StaticGeocoder;
use hinanjo_domain::{Coordinates, Role};
use hinanjo_persistence::{NewAccount, Persistence};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router};

const PASSWORD: &str = "Shelter-Pass-2026";

/// Helper to create test app state with in-memory persistence.
fn create_test_app_state(label: &str) -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let geocoder = StaticGeocoder::new()
        .with("東京都千代田区丸の内", Coordinates::new(35.68, 139.76).unwrap())
        .with("大阪府大阪市北区梅田", Coordinates::new(34.70, 135.49).unwrap());
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        geocoder: Arc::new(geocoder),
        upload_dir: std::env::temp_dir().join(format!(
            "hinanjo-server-{label}-{}-{nanos}",
            std::process::id()
        )),
    }
}

async fn seed_account(app_state: &AppState, email: &str, role: Role) {
    let mut persistence = app_state.persistence.lock().await;
    persistence
        .create_account(&NewAccount {
            name: "Seeded",
            email,
            password: PASSWORD,
            role,
            phone: None,
            address: None,
        })
        .unwrap();
}

async fn send(app: &Router, request: Request<Body>) -> (HttpStatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, value)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn login_as(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "email": email, "password": PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    body["session_token"].as_str().unwrap().to_string()
}

fn shelter_body(name: &str, latitude: f64, longitude: f64) -> Value {
    json!({
        "name": name,
        "address": "東京都",
        "capacity": 120,
        "latitude": latitude,
        "longitude": longitude,
        "note": ""
    })
}

fn multipart_request(uri: &str, token: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "hinanjo-test-boundary";
    let mut body: Vec<u8> = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app: Router = build_router(create_test_app_state("health"));

    let (status, body) = send(&app, get_request("/health", None)).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_login_and_whoami() {
    let app: Router = build_router(create_test_app_state("register"));

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({
                "name": "Hanako",
                "email": "Hanako@Example.jp",
                "password": PASSWORD,
                "password_confirmation": PASSWORD
            }),
        ),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["account"]["email"], "hanako@example.jp");
    assert_eq!(body["notices"][0]["level"], "success");

    let token = login_as(&app, "hanako@example.jp").await;
    let (status, body) = send(&app, get_request("/auth/me", Some(&token))).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["account"]["name"], "Hanako");
    assert_eq!(body["capabilities"]["can_manage_shelters"], false);
}

#[tokio::test]
async fn test_whoami_without_session_is_unauthorized() {
    let app: Router = build_router(create_test_app_state("anon"));

    let (status, body) = send(&app, get_request("/auth/me", None)).await;

    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app_state = create_test_app_state("logout");
    seed_account(&app_state, "user@example.jp", Role::User).await;
    let app: Router = build_router(app_state);
    let token = login_as(&app, "user@example.jp").await;

    let (status, _) = send(&app, json_request("POST", "/auth/logout", Some(&token), &json!({}))).await;
    assert_eq!(status, HttpStatusCode::NO_CONTENT);

    let (status, _) = send(&app, get_request("/auth/me", Some(&token))).await;
    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bootstrap_creates_first_admin_once() {
    let app: Router = build_router(create_test_app_state("bootstrap"));

    let (_, body) = send(&app, get_request("/auth/bootstrap", None)).await;
    assert_eq!(body["needs_first_admin"], true);

    let request = json!({
        "name": "Founder",
        "email": "founder@example.jp",
        "password": PASSWORD,
        "password_confirmation": PASSWORD
    });
    let (status, body) = send(&app, json_request("POST", "/auth/bootstrap", None, &request)).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["account"]["role"], "admin");

    let (status, _) = send(&app, json_request("POST", "/auth/bootstrap", None, &request)).await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_cannot_create_shelter() {
    let app_state = create_test_app_state("user-shelter");
    seed_account(&app_state, "user@example.jp", Role::User).await;
    let app: Router = build_router(app_state);
    let token = login_as(&app, "user@example.jp").await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/admin/shelters",
            Some(&token),
            &shelter_body("A", 35.0, 139.0),
        ),
    )
    .await;

    assert_eq!(status, HttpStatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_duplicate_shelter_is_conflict_with_notice() {
    let app_state = create_test_app_state("dup-shelter");
    seed_account(&app_state, "admin@example.jp", Role::Admin).await;
    let app: Router = build_router(app_state);
    let token = login_as(&app, "admin@example.jp").await;

    let request = json_request(
        "POST",
        "/admin/shelters",
        Some(&token),
        &shelter_body("A", 35.0, 139.0),
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert!(body["shelter"]["shelter_id"].as_i64().is_some());

    let request = json_request(
        "POST",
        "/admin/shelters",
        Some(&token),
        &shelter_body("A", 36.0, 140.0),
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, HttpStatusCode::CONFLICT);
    assert_eq!(body["error"], true);
    assert_eq!(body["notices"][0]["level"], "danger");

    let (_, body) = send(&app, get_request("/shelters", None)).await;
    assert_eq!(body["shelters"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_nearest_shelter_endpoint() {
    let app_state = create_test_app_state("nearest");
    seed_account(&app_state, "admin@example.jp", Role::Admin).await;
    let app: Router = build_router(app_state);
    let token = login_as(&app, "admin@example.jp").await;

    for (name, lat, lon) in [("東京", 35.681, 139.767), ("大阪", 34.702, 135.495)] {
        let (status, _) = send(
            &app,
            json_request("POST", "/admin/shelters", Some(&token), &shelter_body(name, lat, lon)),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
    }

    let uri = "/shelters/nearest?address=%E5%A4%A7%E9%98%AA%E5%BA%9C%E5%A4%A7%E9%98%AA%E5%B8%82%E5%8C%97%E5%8C%BA%E6%A2%85%E7%94%B0";
    let (status, body) = send(&app, get_request(uri, None)).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["shelter"]["name"], "大阪");
    assert!(body["distance_km"].as_f64().unwrap() < 5.0);

    let (status, body) = send(&app, get_request("/shelters/nearest?address=nowhere", None)).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert!(body["shelter"].is_null());
}

#[tokio::test]
async fn test_settings_store_nearest_shelter() {
    let app_state = create_test_app_state("settings");
    seed_account(&app_state, "admin@example.jp", Role::Admin).await;
    let app: Router = build_router(app_state);
    let token = login_as(&app, "admin@example.jp").await;

    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/admin/shelters",
            Some(&token),
            &shelter_body("東京", 35.681, 139.767),
        ),
    )
    .await;
    let shelter_id = body["shelter"]["shelter_id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/settings",
            Some(&token),
            &json!({ "address": "東京都千代田区丸の内" }),
        ),
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["account"]["shelter_id"], shelter_id);
}

#[tokio::test]
async fn test_import_upload_is_processed_and_removed() {
    let app_state = create_test_app_state("import");
    let upload_dir: PathBuf = app_state.upload_dir.clone();
    seed_account(&app_state, "admin@example.jp", Role::Admin).await;
    let app: Router = build_router(app_state);
    let token = login_as(&app, "admin@example.jp").await;

    let csv = "\u{feff}名称,住所,緯度,経度,想定収容人数\n\
               丸の内小学校,東京都千代田区,35.6812,139.7671,\"1,234人\"\n\
               日比谷公園,東京都千代田区,35.6736,139.7560,未定\n\
               丸の内小学校,東京都千代田区,35.6800,139.7600,10\n";
    let (status, body) = send(
        &app,
        multipart_request(
            "/admin/shelters/import",
            &token,
            "../避難所.csv",
            csv.as_bytes(),
        ),
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["imported"], 2);
    assert_eq!(body["rejected_existing"][0], "丸の内小学校");
    assert_eq!(body["notices"][0]["level"], "success");
    assert!(std::fs::read_dir(&upload_dir).unwrap().next().is_none());

    let (_, body) = send(&app, get_request("/shelters", None)).await;
    let shelters = body["shelters"].as_array().unwrap();
    assert_eq!(shelters.len(), 2);
    assert_eq!(shelters[0]["capacity"], 1234);
    assert!(shelters[1]["capacity"].is_null());
}

#[tokio::test]
async fn test_import_without_file_field_is_bad_request() {
    let app_state = create_test_app_state("import-empty");
    seed_account(&app_state, "admin@example.jp", Role::Admin).await;
    let app: Router = build_router(app_state);
    let token = login_as(&app, "admin@example.jp").await;

    let request = Request::builder()
        .method("POST")
        .uri("/admin/shelters/import")
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=empty-boundary",
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("--empty-boundary--\r\n"))
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_last_admin_cannot_be_demoted() {
    let app_state = create_test_app_state("demote");
    seed_account(&app_state, "admin@example.jp", Role::Admin).await;
    let app: Router = build_router(app_state);
    let token = login_as(&app, "admin@example.jp").await;

    let (_, body) = send(&app, get_request("/admin/admins", Some(&token))).await;
    let admin = &body["admins"][0];
    assert_eq!(admin["capabilities"]["can_demote"], false);
    let user_id = admin["user_id"].as_i64().unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/admin/admins/{user_id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["notices"][0]["level"], "danger");
}

#[tokio::test]
async fn test_stock_activity_is_recorded() {
    let app_state = create_test_app_state("stock");
    seed_account(&app_state, "admin@example.jp", Role::Admin).await;
    let app: Router = build_router(app_state);
    let token = login_as(&app, "admin@example.jp").await;

    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/admin/shelters",
            Some(&token),
            &shelter_body("A", 35.0, 139.0),
        ),
    )
    .await;
    let shelter_id = body["shelter"]["shelter_id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/admin/stock",
            Some(&token),
            &json!({
                "shelter_id": shelter_id,
                "name": "Blankets",
                "quantity": 20,
                "unit": "pcs"
            }),
        ),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let stock_id = body["stock"]["stock_id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        get_request(&format!("/admin/stock/{stock_id}/activity"), Some(&token)),
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["activities"][0]["kind"], "added");

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/admin/shelters/{shelter_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
}
