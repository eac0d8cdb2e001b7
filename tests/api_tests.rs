use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use chirper::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const PASSWORD: &str = "Password";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = chirper::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    chirper::api::router(state).await
}

struct TestResponse {
    status: StatusCode,
    session_cookie: Option<String>,
    headers: axum::http::HeaderMap,
    body: Value,
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let session_cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse {
        status,
        session_cookie,
        headers,
        body,
    }
}

fn json_request(method: &str, uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::empty()).unwrap()
}

async fn register(app: &Router, username: &str) -> Value {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/register",
            &json!({"username": username, "password": PASSWORD}),
            None,
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body
}

/// Logs in and returns the `name=value` session cookie.
async fn login(app: &Router, username: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/login",
            &json!({"username": username, "password": PASSWORD}),
            None,
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    response.session_cookie.expect("login should set a session cookie")
}

async fn post_chirp(app: &Router, cookie: &str, text: &str) -> Value {
    let response = send(
        app,
        json_request("POST", "/api/home", &json!({"text": text}), Some(cookie)),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body
}

async fn follow(app: &Router, cookie: &str, username: &str) -> TestResponse {
    send(
        app,
        json_request(
            "PUT",
            "/api/follow",
            &json!({"user_to_follow": username}),
            Some(cookie),
        ),
    )
    .await
}

async fn unfollow(app: &Router, cookie: &str, username: &str) -> TestResponse {
    send(
        app,
        json_request(
            "PUT",
            "/api/unfollow",
            &json!({"user_to_unfollow": username}),
            Some(cookie),
        ),
    )
    .await
}

fn not_authenticated() -> Value {
    json!({"detail": "Authentication credentials were not provided."})
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_new_user() {
    let app = spawn_app().await;

    let body = register(&app, "TestUser").await;

    assert_eq!(body["username"], "TestUser");
    assert!(body["id"].is_i64());
    assert!(body["date_joined"].is_string());
    assert_eq!(body["chirps"], json!([]));
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_existing_user() {
    let app = spawn_app().await;
    register(&app, "TestUser").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/register",
            &json!({"username": "TestUser", "password": "Other"}),
            None,
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"username": ["This field must be unique."]}));
}

#[tokio::test]
async fn test_register_invalid_username() {
    let app = spawn_app().await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/register",
            &json!({"username": "5\t?:|", "password": PASSWORD}),
            None,
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"username": ["Enter a valid username."]}));
}

#[tokio::test]
async fn test_register_reports_every_missing_field() {
    let app = spawn_app().await;

    let response = send(&app, json_request("POST", "/api/register", &json!({}), None)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({
            "password": ["This field is required."],
            "username": ["This field is required."],
        })
    );
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/register")
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Body::from("{\"username\": "))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let detail = response.body["detail"].as_str().unwrap();
    assert!(detail.starts_with("JSON parse error - "), "{detail}");
}

// ============================================================================
// Login / logout
// ============================================================================

#[tokio::test]
async fn test_login_good_user() {
    let app = spawn_app().await;
    register(&app, "TestUser").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/login",
            &json!({"username": "TestUser", "password": PASSWORD}),
            None,
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"redirect": "/api/home"}));

    let cookie = response.session_cookie.unwrap();
    assert!(cookie.starts_with("sessionid="));
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = spawn_app().await;
    register(&app, "TestUser").await;

    for (username, password) in [("TestUser", "BadPassword"), ("NoUser", PASSWORD)] {
        let response = send(
            &app,
            json_request(
                "POST",
                "/api/login",
                &json!({"username": username, "password": password}),
                None,
            ),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, json!({"detail": "Invalid username/password."}));
        assert!(response.session_cookie.is_none());
    }
}

#[tokio::test]
async fn test_logout_existing_user() {
    let app = spawn_app().await;
    register(&app, "TestUser").await;
    let cookie = login(&app, "TestUser").await;

    let response = send(&app, json_request("POST", "/api/logout", &json!({}), Some(&cookie))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!("OK"));

    // The old cookie no longer names a session.
    let response = send(&app, get_request("/api/home", Some(&cookie))).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_not_logged_in() {
    let app = spawn_app().await;

    let response = send(&app, json_request("POST", "/api/logout", &json!({}), None)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, not_authenticated());
}

#[tokio::test]
async fn test_protected_routes_reject_anonymous() {
    let app = spawn_app().await;
    register(&app, "TestUser").await;

    let requests = [
        get_request("/api/home", None),
        json_request("POST", "/api/home", &json!({"text": "hi"}), None),
        get_request("/api/users", None),
        get_request("/api/users/TestUser", None),
        json_request("PUT", "/api/follow", &json!({"user_to_follow": "TestUser"}), None),
        json_request(
            "PUT",
            "/api/unfollow",
            &json!({"user_to_unfollow": "TestUser"}),
            None,
        ),
        get_request("/api/metrics", None),
    ];

    for request in requests {
        let uri = request.uri().clone();
        let response = send(&app, request).await;

        assert_eq!(response.status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(response.body, not_authenticated(), "{uri}");
    }
}

#[tokio::test]
async fn test_login_rotates_session_id() {
    let app = spawn_app().await;
    register(&app, "alice").await;
    register(&app, "bob").await;
    let alice_cookie = login(&app, "alice").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/login",
            &json!({"username": "bob", "password": PASSWORD}),
            Some(&alice_cookie),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let bob_cookie = response.session_cookie.expect("login should set a session cookie");
    assert_ne!(bob_cookie, alice_cookie);

    let response = send(&app, get_request("/api/home", Some(&alice_cookie))).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = send(&app, get_request("/api/home", Some(&bob_cookie))).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_basic_auth() {
    let app = spawn_app().await;
    register(&app, "TestUser").await;

    let good = STANDARD.encode(format!("TestUser:{PASSWORD}"));
    let request = Request::builder()
        .uri("/api/users")
        .header(header::AUTHORIZATION, format!("Basic {good}"))
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status, StatusCode::OK);

    let bad = STANDARD.encode("TestUser:wrong");
    let request = Request::builder()
        .uri("/api/users")
        .header(header::AUTHORIZATION, format!("Basic {bad}"))
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, json!({"detail": "Invalid username/password."}));
}

// ============================================================================
// Chirps and the home feed
// ============================================================================

#[tokio::test]
async fn test_post_chirp() {
    let app = spawn_app().await;
    let user = register(&app, "TestUser").await;
    let cookie = login(&app, "TestUser").await;

    // Client-supplied author and timestamp are ignored.
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/home",
            &json!({"text": "hi", "author": 999, "time_posted": "2000-01-01T00:00:00Z"}),
            Some(&cookie),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["text"], "hi");
    assert_eq!(response.body["author"], user["id"]);
    assert_ne!(response.body["time_posted"], "2000-01-01T00:00:00Z");
    assert!(response.body["id"].is_i64());
}

#[tokio::test]
async fn test_chirp_length_limit() {
    let app = spawn_app().await;
    register(&app, "TestUser").await;
    let cookie = login(&app, "TestUser").await;

    post_chirp(&app, &cookie, &"x".repeat(140)).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/home",
            &json!({"text": "x".repeat(141)}),
            Some(&cookie),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({"text": ["Ensure this field has no more than 140 characters."]})
    );
}

#[tokio::test]
async fn test_chirp_text_is_trimmed() {
    let app = spawn_app().await;
    register(&app, "TestUser").await;
    let cookie = login(&app, "TestUser").await;

    let text = format!("  {} ", "x".repeat(140));
    let chirp = post_chirp(&app, &cookie, &text).await;
    assert_eq!(chirp["text"], "x".repeat(140));

    let response = send(
        &app,
        json_request("POST", "/api/home", &json!({"text": "   "}), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"text": ["This field may not be blank."]}));
}

#[tokio::test]
async fn test_own_chirps_need_self_follow() {
    let app = spawn_app().await;
    register(&app, "TestUser").await;
    let cookie = login(&app, "TestUser").await;

    let chirp = post_chirp(&app, &cookie, "hello").await;

    let response = send(&app, get_request("/api/home", Some(&cookie))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));

    assert_eq!(follow(&app, &cookie, "TestUser").await.status, StatusCode::OK);

    let response = send(&app, get_request("/api/home", Some(&cookie))).await;
    assert_eq!(response.body, json!([chirp]));
}

#[tokio::test]
async fn test_home_feed_composition() {
    let app = spawn_app().await;
    for name in ["A", "B", "C", "D"] {
        register(&app, name).await;
    }
    let a = login(&app, "A").await;
    let b = login(&app, "B").await;
    let c = login(&app, "C").await;
    let d = login(&app, "D").await;

    follow(&app, &a, "B").await;
    follow(&app, &a, "C").await;

    let x = post_chirp(&app, &b, "X").await;
    let y = post_chirp(&app, &c, "Y").await;
    post_chirp(&app, &d, "Z").await;

    let response = send(&app, get_request("/api/home", Some(&a))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([y, x]));
}

// ============================================================================
// Follow / unfollow
// ============================================================================

#[tokio::test]
async fn test_follow_unfollow_cycle() {
    let app = spawn_app().await;
    register(&app, "alice").await;
    register(&app, "bob").await;
    let cookie = login(&app, "alice").await;

    let response = follow(&app, &cookie, "bob").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!("OK"));

    let response = follow(&app, &cookie, "bob").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"detail": "Already following this user."}));

    let response = unfollow(&app, &cookie, "bob").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!("OK"));

    let response = unfollow(&app, &cookie, "bob").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"detail": "Not following this user."}));
}

#[tokio::test]
async fn test_follow_unknown_user() {
    let app = spawn_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    let response = follow(&app, &cookie, "ghost").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({"detail": "Not found."}));

    let response = unfollow(&app, &cookie, "ghost").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_follow_requires_target() {
    let app = spawn_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    let response = send(
        &app,
        json_request("PUT", "/api/follow", &json!({}), Some(&cookie)),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"user_to_follow": ["This field is required."]}));
}

// ============================================================================
// User directory
// ============================================================================

#[tokio::test]
async fn test_user_list_and_detail() {
    let app = spawn_app().await;
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let cookie = login(&app, "alice").await;

    let first = post_chirp(&app, &cookie, "one").await;
    let second = post_chirp(&app, &cookie, "two").await;

    let response = send(&app, get_request("/api/users", Some(&cookie))).await;
    assert_eq!(response.status, StatusCode::OK);

    let users = response.body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["id"], alice["id"]);
    assert_eq!(users[0]["chirps"], json!([first["id"], second["id"]]));
    assert_eq!(users[1]["id"], bob["id"]);
    assert_eq!(users[1]["chirps"], json!([]));

    let response = send(&app, get_request("/api/users/alice", Some(&cookie))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alice");
    assert_eq!(response.body["chirps"], json!([first["id"], second["id"]]));
    assert!(response.body.get("password").is_none());
}

#[tokio::test]
async fn test_user_detail_unknown() {
    let app = spawn_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    let response = send(&app, get_request("/api/users/ghost", Some(&cookie))).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({"detail": "Not found."}));
}

// ============================================================================
// System
// ============================================================================

#[tokio::test]
async fn test_health_endpoints_are_public() {
    let app = spawn_app().await;

    let response = send(&app, get_request("/api/health/live", None)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = send(&app, get_request("/api/health/ready", None)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_response_headers() {
    let app = spawn_app().await;

    let request = Request::builder()
        .uri("/api/health/live")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.headers["x-request-id"], "abc-123");
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert_eq!(response.headers["x-frame-options"], "DENY");
}
