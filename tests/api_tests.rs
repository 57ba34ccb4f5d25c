use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use keyvend::config::Config;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

fn test_config(dir: &TempDir) -> Config {
    Config {
        data_dir: dir.path().to_path_buf(),
        server_port: 0,
        token_secret: "integration-test-secret".to_string(),
        admin_username: "admin".to_string(),
        admin_password: "password".to_string(),
    }
}

async fn spawn_app() -> (Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let state = keyvend::build_state(&test_config(&dir))
        .await
        .expect("Failed to build app state");
    (keyvend::router(state), dir)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));
    match body {
        Some(body) => builder
            .header("Content-Type", mime::APPLICATION_JSON.as_ref())
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({"username": "admin", "password": "password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

async fn create_software(app: &Router, token: &str, name: &str) -> Value {
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/software",
            token,
            Some(json!({
                "name": name,
                "fileType": "single",
                "downloadUrls": ["https://x/a.zip"]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let (app, _dir) = spawn_app().await;

    // No token at all
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/software")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage token
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/software", "not-a-token", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Tampered token
    let token = login(&app).await;
    let tampered = format!("{token}x");
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/software", &tampered, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Real token
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/software", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_validates_and_rejects_bad_credentials() {
    let (app, _dir) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/login", json!({"username": "admin"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({"username": "admin", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn software_create_round_trips_through_listing() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;

    let created = create_software(&app, &token, "Tool").await;
    assert!(created["id"].is_string());
    assert!(created["createdAt"].is_string());

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/software", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["name"], "Tool");
    assert_eq!(listed[0]["fileType"], "single");
    assert_eq!(listed[0]["downloadUrls"], json!(["https://x/a.zip"]));
    assert_eq!(listed[0]["id"], created["id"]);
}

#[tokio::test]
async fn software_validation_rejects_empty_fields() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/software",
            &token,
            Some(json!({"name": "Tool", "fileType": "single", "downloadUrls": []})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/software",
            &token,
            Some(json!({"fileType": "single", "downloadUrls": ["https://x/a.zip"]})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn software_update_replaces_fields() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;
    let created = create_software(&app, &token, "Tool").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(authed_request(
            "PUT",
            &format!("/api/software/{id}"),
            &token,
            Some(json!({
                "name": "Tool v2",
                "fileType": "multiple",
                "downloadUrls": ["https://x/a.z01", "https://x/a.z02"]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Tool v2");
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert!(updated["updatedAt"].is_string());

    let response = app
        .clone()
        .oneshot(authed_request(
            "PUT",
            &format!("/api/software/{}", uuid::Uuid::new_v4()),
            &token,
            Some(json!({
                "name": "Ghost",
                "fileType": "single",
                "downloadUrls": ["https://x/g.zip"]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_software_cascades_to_its_keys() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;
    let doomed = create_software(&app, &token, "Doomed").await;
    let kept = create_software(&app, &token, "Kept").await;

    for software in [&doomed, &kept] {
        let response = app
            .clone()
            .oneshot(authed_request(
                "POST",
                "/api/keys",
                &token,
                Some(json!({"softwareId": software["id"], "count": 3})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/software/{}", doomed["id"].as_str().unwrap()),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/keys", &token, None))
        .await
        .unwrap();
    let keys = body_json(response).await;
    let keys = keys.as_array().unwrap();
    assert_eq!(keys.len(), 3);
    for key in keys {
        assert_eq!(key["softwareId"], kept["id"]);
        assert_eq!(key["software"]["name"], "Kept");
    }
}

#[tokio::test]
async fn generated_keys_verify_with_the_download_payload() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;
    let software = create_software(&app, &token, "Tool").await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/keys",
            &token,
            Some(json!({"softwareId": software["id"], "count": 3, "validityDays": 1})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let generated = body_json(response).await;
    let keys = generated["keys"].as_array().unwrap();
    assert_eq!(keys.len(), 3);

    for key in keys {
        let code = key["code"].as_str().unwrap();
        let groups: Vec<&str> = code.split('-').collect();
        assert_eq!(groups.iter().map(|g| g.len()).collect::<Vec<_>>(), vec![4, 4, 3]);
        assert!(
            code.chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
        );
    }

    // Public verification, no auth header
    let code = keys[0]["code"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/verify-key", json!({"code": code})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["software"]["name"], "Tool");
    assert_eq!(body["software"]["downloadUrls"], json!(["https://x/a.zip"]));

    // Expiry sits roughly 24 hours out
    let valid_until: chrono::DateTime<chrono::Utc> =
        body["validUntil"].as_str().unwrap().parse().unwrap();
    let delta = valid_until - chrono::Utc::now();
    assert!(delta > chrono::Duration::hours(23) && delta < chrono::Duration::hours(25));

    // Verification does not consume the key
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/verify-key", json!({"code": code})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn key_without_validity_never_expires() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;
    let software = create_software(&app, &token, "Tool").await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/keys",
            &token,
            Some(json!({"softwareId": software["id"], "count": 1})),
        ))
        .await
        .unwrap();
    let generated = body_json(response).await;
    let code = generated["keys"][0]["code"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/verify-key", json!({"code": code})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert!(body["validUntil"].is_null());
}

#[tokio::test]
async fn verify_rejects_unknown_expired_and_empty_codes() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;
    let software = create_software(&app, &token, "Tool").await;

    // Unknown code
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/verify-key",
            json!({"code": "AAAA-BBBB-CCC"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["valid"], false);
    assert!(body["message"].is_string());

    // Empty code
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/verify-key", json!({"code": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["valid"], false);

    // Expired key (negative validity puts the expiry in the past)
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/keys",
            &token,
            Some(json!({"softwareId": software["id"], "count": 1, "validityDays": -1})),
        ))
        .await
        .unwrap();
    let generated = body_json(response).await;
    let code = generated["keys"][0]["code"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/verify-key", json!({"code": code})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["expired"], true);
}

#[tokio::test]
async fn generate_keys_validates_count_and_software() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;
    let software = create_software(&app, &token, "Tool").await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/keys",
            &token,
            Some(json!({"softwareId": software["id"], "count": 0})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/keys",
            &token,
            Some(json!({"softwareId": uuid::Uuid::new_v4(), "count": 1})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_key_removes_only_that_key() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;
    let software = create_software(&app, &token, "Tool").await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/keys",
            &token,
            Some(json!({"softwareId": software["id"], "count": 2})),
        ))
        .await
        .unwrap();
    let generated = body_json(response).await;
    let id = generated["keys"][0]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_request("DELETE", &format!("/api/keys/{id}"), &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/keys", &token, None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    // Deleting again is a 404
    let response = app
        .clone()
        .oneshot(authed_request("DELETE", &format!("/api/keys/{id}"), &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn change_password_rotates_the_credentials() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/change-password",
            &token,
            Some(json!({"currentPassword": "wrong", "newPassword": "next"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/change-password",
            &token,
            Some(json!({"currentPassword": "password", "newPassword": "next"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works; the new one does
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({"username": "admin", "password": "password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({"username": "admin", "password": "next"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn bootstrap_twice_keeps_existing_data() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let state = keyvend::build_state(&config).await.unwrap();
    let app = keyvend::router(state);
    let token = login(&app).await;
    create_software(&app, &token, "Tool").await;

    // Rebuild over the same data directory, as a process restart would
    let state = keyvend::build_state(&config).await.unwrap();
    let app = keyvend::router(state);
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/software", &token, None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn health_reports_storage_accessible() {
    let (app, _dir) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "accessible");
}
