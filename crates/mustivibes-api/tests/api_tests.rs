use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE},
    },
};
use chrono::{Duration, FixedOffset, Utc};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use mustivibes_api::auth::{AppState, AppStateInner, create_token};
use mustivibes_api::build_router;
use mustivibes_backend::{BackendClient, BackendConfig};
use mustivibes_db::Database;
use mustivibes_db::queries::NewSession;

const SECRET: &str = "test-secret-0123456789";

struct TestContext {
    _temp_dir: TempDir,
    backend: MockServer,
    state: AppState,
}

impl TestContext {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("tempdir");
        let db = Database::open(&temp_dir.path().join("console.db")).expect("open db");
        let backend = MockServer::start_async().await;

        let client = BackendClient::new(&BackendConfig {
            core_url: backend.url("/api"),
            social_url: backend.url("/social"),
            bulk_concurrency: 2,
            ..Default::default()
        })
        .expect("client builds");

        let state = Arc::new(AppStateInner {
            db,
            backend: client,
            jwt_secret: SECRET.into(),
            session_ttl: Duration::hours(12),
            utc_offset: FixedOffset::east_opt(0).unwrap(),
        });

        Self {
            _temp_dir: temp_dir,
            backend,
            state,
        }
    }

    fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
        let response = self.router().oneshot(req).await.expect("router responds");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes()
            .to_vec();
        (status, bytes, headers)
    }

    async fn json(&self, req: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes, _) = self.send(req).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    /// Sign in through the console with a mocked backend login.
    async fn login(&self) -> String {
        self.backend
            .mock_async(|when, then| {
                when.method(POST).path("/api/admin/login");
                then.status(200).json_body(json!({
                    "success": true,
                    "token": "backend-jwt",
                    "admin": { "_id": "a1", "email": "ops@mustivibes.test", "name": "Ops" }
                }));
            })
            .await;

        let (status, body) = self
            .json(post_json(
                "/auth/login",
                None,
                json!({ "email": "ops@mustivibes.test", "password": "hunter22" }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn with_body(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    with_body("POST", uri, token, body)
}

fn users_fixture() -> Value {
    json!({
        "success": true,
        "users": [
            { "_id": "u1", "name": "Asha Rao", "mobile": "9000000001", "coins": 40, "createdAt": "2026-01-02T10:00:00Z" },
            { "_id": "u2", "name": "Ravi", "nickname": "rav, the \"great\"", "isBlocked": true },
            { "_id": "u3", "name": "Ashok", "email": "ashok@example.com", "coins": 5 }
        ]
    })
}

#[tokio::test]
async fn health_is_public() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.json(get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.json(get("/admin/users", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = ctx.json(get("/admin/users", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Well-signed token naming a session that was never created.
    let forged = create_token(SECRET, Uuid::new_v4(), "a1", "ops@mustivibes.test", (Utc::now() + Duration::hours(1)).timestamp()).unwrap();
    let (status, _) = ctx.json(get("/admin/me", Some(&forged))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Signed with some other secret.
    let foreign = create_token("another-secret", Uuid::new_v4(), "a1", "x", (Utc::now() + Duration::hours(1)).timestamp()).unwrap();
    let (status, _) = ctx.json(get("/admin/me", Some(&foreign))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_sessions_are_rejected() {
    let ctx = TestContext::new().await;
    let session_id = Uuid::new_v4();
    ctx.state
        .db
        .create_session(&NewSession {
            id: &session_id.to_string(),
            admin_id: "a1",
            email: "ops@mustivibes.test",
            admin_json: r#"{"id":"a1","email":"ops@mustivibes.test"}"#,
            backend_token: "backend-jwt",
            expires_at: Utc::now() - Duration::minutes(1),
        })
        .unwrap();
    let token = create_token(SECRET, session_id, "a1", "ops@mustivibes.test", (Utc::now() + Duration::hours(1)).timestamp()).unwrap();

    let (status, _) = ctx.json(get("/admin/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_requires_both_fields() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx
        .json(post_json("/auth/login", None, json!({ "email": "ops@mustivibes.test" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email and password are required");
}

#[tokio::test]
async fn failed_login_surfaces_backend_message() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(POST).path("/api/admin/login");
            then.status(401).json_body(json!({ "success": false, "message": "Invalid credentials" }));
        })
        .await;

    let (status, body) = ctx
        .json(post_json(
            "/auth/login",
            None,
            json!({ "email": "ops@mustivibes.test", "password": "wrong" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn login_then_list_users_with_backend_token() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let users = ctx
        .backend
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/users/all")
                .header("authorization", "Bearer backend-jwt");
            then.status(200).json_body(users_fixture());
        })
        .await;

    let (status, body) = ctx
        .json(get("/admin/users?q=ASH&sort=coins&order=desc", Some(&token)))
        .await;

    users.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 8);
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Asha Rao", "Ashok"]);

    let (status, me) = ctx.json(get("/admin/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "ops@mustivibes.test");
}

#[tokio::test]
async fn blocked_filter_and_bad_sort_column() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/all");
            then.status(200).json_body(users_fixture());
        })
        .await;

    let (_, body) = ctx.json(get("/admin/users?status=blocked", Some(&token))).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["_id"], "u2");

    let (status, _) = ctx.json(get("/admin/users?sort=password", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_export_writes_every_filtered_row() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/all");
            then.status(200).json_body(users_fixture());
        })
        .await;

    // Page size does not limit the export.
    let (status, bytes, headers) = ctx
        .send(get("/admin/users/export?per_page=1", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    assert_eq!(
        headers[CONTENT_DISPOSITION].to_str().unwrap(),
        "attachment; filename=\"users.csv\""
    );

    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("S.No,Name,Nickname"));
    assert!(lines[2].starts_with(r#"2,Ravi,"rav, the ""great""","#));
}

#[tokio::test]
async fn backend_not_found_passes_through() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/ghost");
            then.status(404).json_body(json!({ "message": "User not found" }));
        })
        .await;

    let (status, body) = ctx.json(get("/admin/users/ghost", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = ctx.json(get("/admin/users/bad%20id", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn backend_server_errors_are_bad_gateway() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/get/payments");
            then.status(500).json_body(json!({ "message": "db down" }));
        })
        .await;

    let (status, body) = ctx.json(get("/admin/payments", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "db down");
}

#[tokio::test]
async fn payment_totals_follow_filters() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/get/payments");
            then.status(200).json_body(json!({
                "success": true,
                "payments": [
                    { "_id": "p1", "amount": 99, "coins": 100, "status": "paid", "createdAt": "2026-02-01T08:00:00Z",
                      "userId": { "_id": "u1", "name": "Asha" } },
                    { "_id": "p2", "amount": 499, "coins": 600, "status": "failed", "createdAt": "2026-02-01T09:00:00Z" },
                    { "_id": "p3", "amount": 199, "coins": 220, "status": "success", "createdAt": "2026-03-05T09:00:00Z" }
                ]
            }));
        })
        .await;

    let (status, body) = ctx
        .json(get("/admin/payments?from=2026-02-01&to=2026-02-28", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["totals"]["amount"], 99.0);
    assert_eq!(body["totals"]["successful"], 1);
}

#[tokio::test]
async fn rooms_get_status_and_creation_formats_start() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/social/users/create");
            then.status(200).json_body(json!({
                "success": true,
                "rooms": [
                    { "_id": "r1", "tag": "Past", "type": "audio", "startDateTime": "01-01-2020 10:00 AM", "duration": 30 },
                    { "_id": "r2", "tag": "Future", "type": "video", "startDateTime": "01-01-2099 10:00 AM", "duration": 30 },
                    { "_id": "r3", "tag": "Broken", "type": "audio", "startDateTime": "soon", "duration": 30 }
                ]
            }));
        })
        .await;

    let (status, body) = ctx.json(get("/admin/rooms?sort=startDateTime", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let statuses: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, ["unknown", "completed", "upcoming"]);
    assert_eq!(body["counts"]["live"], 0);
    assert_eq!(body["counts"]["completed"], 1);

    let create = ctx
        .backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/social/users/create")
                .header("authorization", "Bearer backend-jwt")
                .json_body(json!({
                    "adminId": "a1",
                    "type": "audio",
                    "tag": "Sunday jam",
                    "duration": 60,
                    "startDateTime": "01-03-2099 06:30 PM"
                }));
            then.status(201).json_body(json!({
                "success": true,
                "room": { "_id": "r9", "tag": "Sunday jam", "type": "audio",
                          "startDateTime": "01-03-2099 06:30 PM", "duration": 60 }
            }));
        })
        .await;

    let (status, body) = ctx
        .json(post_json(
            "/admin/rooms",
            Some(&token),
            json!({ "tag": " Sunday jam ", "type": "audio", "duration": 60, "start": "2099-03-01T18:30" }),
        ))
        .await;
    create.assert_async().await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["_id"], "r9");
    assert_eq!(body["status"], "upcoming");

    let (status, _) = ctx
        .json(post_json(
            "/admin/rooms",
            Some(&token),
            json!({ "tag": "x", "type": "audio", "duration": 0, "start": "2099-03-01T18:30" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn report_action_needs_a_comment() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    let handle = ctx
        .backend
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/admin/handle/r1")
                .json_body(json!({ "action": "approve", "adminComment": "Confirmed spam" }));
            then.status(200).json_body(json!({ "success": true, "message": "Report approved" }));
        })
        .await;

    let (status, _) = ctx
        .json(with_body(
            "PUT",
            "/admin/reports/r1/action",
            Some(&token),
            json!({ "action": "approve", "admin_comment": "   " }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    handle.assert_hits_async(0).await;

    let (status, body) = ctx
        .json(with_body(
            "PUT",
            "/admin/reports/r1/action",
            Some(&token),
            json!({ "action": "approve", "admin_comment": " Confirmed spam " }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Report approved");
    handle.assert_hits_async(1).await;
}

#[tokio::test]
async fn reports_default_to_pending_tab() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/reports");
            then.status(200).json_body(json!({
                "success": true,
                "reports": [
                    { "_id": "r1", "reason": "Spam", "status": "pending" },
                    { "_id": "r2", "reason": "Abuse", "status": "approved" },
                    { "_id": "r3", "reason": "Scam", "status": "rejected" }
                ]
            }));
        })
        .await;

    let (_, body) = ctx.json(get("/admin/reports", Some(&token))).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["_id"], "r1");
    assert_eq!(body["counts"]["approved"], 1);

    let (_, body) = ctx.json(get("/admin/reports?status=all", Some(&token))).await;
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn mark_all_read_touches_only_unread() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/social/notifications");
            then.status(200).json_body(json!({
                "success": true,
                "unreadCount": 2,
                "notifications": [
                    { "_id": "n1", "type": "follow", "isRead": false },
                    { "_id": "n2", "type": "follow", "isRead": true },
                    { "_id": "n3", "type": "block", "isRead": false }
                ]
            }));
        })
        .await;
    let n1 = ctx
        .backend
        .mock_async(|when, then| {
            when.method(PUT).path("/social/notifications/n1/read");
            then.status(200).json_body(json!({ "success": true }));
        })
        .await;
    let n3 = ctx
        .backend
        .mock_async(|when, then| {
            when.method(PUT).path("/social/notifications/n3/read");
            then.status(500).json_body(json!({ "message": "boom" }));
        })
        .await;

    let (status, body) = ctx
        .json(post_json("/admin/notifications/read", Some(&token), json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "requested": 2, "succeeded": 1, "failed": 1 }));
    n1.assert_hits_async(1).await;
    n3.assert_hits_async(1).await;

    let (status, body) = ctx.json(get("/admin/notifications?type=follow", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["unread_count"], 2);
    assert_eq!(body["type_counts"]["block"], 1);
}

#[tokio::test]
async fn bulk_delete_needs_ids() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    let (status, _) = ctx
        .json(post_json("/admin/notifications/delete", Some(&token), json!({ "ids": [] })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn preferences_persist_per_admin() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let (_, body) = ctx.json(get("/admin/preferences", Some(&token))).await;
    assert_eq!(body, json!({ "dark_mode": false, "sidebar_collapsed": false }));

    let (status, _) = ctx
        .json(with_body(
            "PUT",
            "/admin/preferences",
            Some(&token),
            json!({ "dark_mode": true, "sidebar_collapsed": true }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx.json(get("/admin/preferences", Some(&token))).await;
    assert_eq!(body, json!({ "dark_mode": true, "sidebar_collapsed": true }));
}

#[tokio::test]
async fn password_change_reports_strength() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/admin/change-password")
                .header("authorization", "Bearer backend-jwt");
            then.status(200).json_body(json!({ "success": true }));
        })
        .await;

    let (status, body) = ctx
        .json(post_json(
            "/admin/settings/password",
            Some(&token),
            json!({ "current_password": "hunter22", "new_password": "correct-horse" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strength"], "strong");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;

    let (status, _) = ctx.json(post_json("/admin/logout", Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx.json(get("/admin/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_accepts_admins_with_both_id_keys() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(POST).path("/api/admin/login");
            then.status(200).json_body(json!({
                "success": true,
                "token": "backend-jwt",
                "admin": { "_id": "a1", "id": "a1", "email": "ops@mustivibes.test", "role": "super" }
            }));
        })
        .await;

    let (status, body) = ctx
        .json(post_json(
            "/auth/login",
            None,
            json!({ "email": "ops@mustivibes.test", "password": "hunter22" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");

    let token = body["token"].as_str().unwrap();
    let (status, me) = ctx.json(get("/admin/me", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], "a1");
    assert_eq!(me["role"], "super");
}

#[tokio::test]
async fn malformed_input_gets_a_json_error() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    let create = ctx
        .backend
        .mock_async(|when, then| {
            when.method(POST).path("/api/packages");
            then.status(201).json_body(json!({ "success": true }));
        })
        .await;

    let (status, bytes, headers) = ctx.send(get("/admin/users?order=DESC", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(headers[CONTENT_TYPE].to_str().unwrap().starts_with("application/json"));
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("order"));

    let (status, body) = ctx
        .json(get("/admin/payments?from=", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = ctx
        .json(post_json(
            "/admin/packages",
            Some(&token),
            json!({ "coins": "lots", "price": 99 }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = ctx
        .json(
            Request::builder()
                .method("POST")
                .uri("/admin/packages")
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    create.assert_hits_async(0).await;
}

#[tokio::test]
async fn user_edits_drop_read_only_fields() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    let update = ctx
        .backend
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/users/u1")
                .header("authorization", "Bearer backend-jwt")
                .json_body(json!({ "name": "Asha R", "isBlocked": true }));
            then.status(200).json_body(json!({ "success": true, "message": "User updated" }));
        })
        .await;
    // The update answer carries no user, so the row is read back.
    let reread = ctx
        .backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/u1");
            then.status(200).json_body(json!({
                "success": true,
                "user": { "_id": "u1", "name": "Asha R", "isBlocked": true }
            }));
        })
        .await;

    let (status, body) = ctx
        .json(with_body(
            "PUT",
            "/admin/users/u1",
            Some(&token),
            json!({ "_id": "u9", "createdAt": "2020-01-01", "__v": 3, "name": "Asha R", "isBlocked": true }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["_id"], "u1");
    assert_eq!(body["name"], "Asha R");
    update.assert_hits_async(1).await;
    reread.assert_hits_async(1).await;

    let (status, body) = ctx
        .json(with_body("PUT", "/admin/users/u1", Some(&token), json!({ "_id": "u1", "updatedAt": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No changes to save");
    update.assert_hits_async(1).await;
}

#[tokio::test]
async fn deleting_a_user_reaches_the_backend() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    let remove = ctx
        .backend
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/users/u2")
                .header("authorization", "Bearer backend-jwt");
            then.status(200).json_body(json!({ "success": true, "message": "User deleted" }));
        })
        .await;

    let mut req = get("/admin/users/u2", Some(&token));
    *req.method_mut() = axum::http::Method::DELETE;
    let (status, bytes, _) = ctx.send(req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(bytes.is_empty());
    remove.assert_async().await;
}

#[tokio::test]
async fn followers_resolve_in_list_order_and_skip_missing() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/u1");
            then.status(200).json_body(json!({
                "success": true,
                "user": { "_id": "u1", "name": "Asha", "followers": ["u3", "u2", "gone"], "following": [] }
            }));
        })
        .await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/u2");
            then.status(200).json_body(json!({ "user": { "_id": "u2", "name": "Ravi", "mobile": "98" } }));
        })
        .await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/u3");
            then.status(200).json_body(json!({ "user": { "_id": "u3", "name": "Meera", "isBlocked": true } }));
        })
        .await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/gone");
            then.status(404).json_body(json!({ "message": "User not found" }));
        })
        .await;

    let (status, body) = ctx.json(get("/admin/users/u1/followers", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    let ids: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["u3", "u2"]);
    assert_eq!(body["items"][0]["isBlocked"], true);

    let (_, body) = ctx.json(get("/admin/users/u1/following", Some(&token))).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn package_routes_forward_backend_bodies() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/packages");
            then.status(200).json_body(json!({
                "success": true,
                "packages": [
                    { "_id": "k1", "coins": 100, "price": 99, "isActive": true },
                    { "_id": "k2", "coins": 500, "price": 449, "isActive": false },
                    { "_id": "k3", "coins": 1200, "price": 999 }
                ]
            }));
        })
        .await;
    let create = ctx
        .backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/packages")
                .json_body(json!({ "coins": 250.0, "price": 199.0, "isActive": true }));
            then.status(201).json_body(json!({ "success": true, "package": { "_id": "k4" } }));
        })
        .await;
    let update = ctx
        .backend
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/packages/k2")
                .json_body(json!({ "coins": 500.0, "price": 399.0, "isActive": false }));
            then.status(200).json_body(json!({ "success": true }));
        })
        .await;
    let remove = ctx
        .backend
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/packages/k3");
            then.status(200).json_body(json!({ "success": true }));
        })
        .await;

    let (status, body) = ctx
        .json(get("/admin/packages?active=true&sort=price&order=desc", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["_id"], "k3");

    let (status, body) = ctx
        .json(post_json("/admin/packages", Some(&token), json!({ "coins": 250, "price": 199 })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["package"]["_id"], "k4");
    create.assert_async().await;

    let (status, _) = ctx
        .json(with_body(
            "PUT",
            "/admin/packages/k2",
            Some(&token),
            json!({ "coins": 500, "price": 399, "is_active": false }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    update.assert_async().await;

    let (status, _) = ctx
        .json(with_body("DELETE", "/admin/packages/k3", Some(&token), json!({})))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    remove.assert_async().await;

    let (status, _) = ctx
        .json(post_json("/admin/packages", Some(&token), json!({ "coins": 0, "price": 199 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    create.assert_hits_async(1).await;
}

#[tokio::test]
async fn referral_and_conversion_settings() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/referral");
            then.status(200).json_body(json!({
                "success": true,
                "data": [{ "_id": "f1", "coins": 50, "createdAt": "2026-01-01T00:00:00Z" }]
            }));
        })
        .await;
    let referral = ctx
        .backend
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/referral/f1")
                .json_body(json!({ "coins": 75.0 }));
            then.status(200).json_body(json!({ "success": true }));
        })
        .await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/coin-conversion");
            then.status(200).json_body(json!({
                "conversions": [
                    { "_id": "c1", "coins": 10, "amount": 1 },
                    { "_id": "c2", "coins": 120, "amount": 10, "isActive": false }
                ]
            }));
        })
        .await;
    let conversion = ctx
        .backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/coin-conversion")
                .header("authorization", "Bearer backend-jwt")
                .json_body(json!({ "coins": 13.0, "amount": 1.0, "isActive": true }));
            then.status(201).json_body(json!({ "success": true }));
        })
        .await;

    let (status, body) = ctx.json(get("/admin/referral", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["coins"], 50.0);

    let (status, _) = ctx
        .json(with_body("PUT", "/admin/referral/f1", Some(&token), json!({ "coins": 75 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    referral.assert_async().await;

    let (status, body) = ctx
        .json(get("/admin/coin-conversions?sort=amount&order=desc", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["_id"], "c2");
    assert_eq!(body["items"][0]["isActive"], false);

    let (status, _) = ctx
        .json(post_json("/admin/coin-conversions", Some(&token), json!({ "coins": 13, "amount": 1 })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    conversion.assert_async().await;
}

#[tokio::test]
async fn deduction_rules_allow_free_call_types() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/deduction-rules");
            then.status(200).json_body(json!({
                "rules": [
                    { "_id": "d1", "callType": "video", "coinsPerMinute": 20 },
                    { "_id": "d2", "callType": "audio", "coinsPerMinute": 10 }
                ]
            }));
        })
        .await;
    let create = ctx
        .backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/deduction-rules")
                .json_body(json!({ "callType": "chat", "coinsPerMinute": 0.0, "isActive": true }));
            then.status(201).json_body(json!({ "success": true, "rule": { "_id": "d3" } }));
        })
        .await;
    let remove = ctx
        .backend
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/deduction-rules/d1");
            then.status(200).json_body(json!({ "success": true }));
        })
        .await;

    let (status, body) = ctx.json(get("/admin/deduction-rules?sort=callType", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["callType"], "audio");

    let (status, body) = ctx
        .json(post_json(
            "/admin/deduction-rules",
            Some(&token),
            json!({ "call_type": "chat", "coins_per_minute": 0 }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rule"]["_id"], "d3");
    create.assert_async().await;

    let (status, _) = ctx
        .json(with_body("DELETE", "/admin/deduction-rules/d1", Some(&token), json!({})))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    remove.assert_async().await;
}

#[tokio::test]
async fn warnings_filter_by_days_back() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    let recent = (Utc::now() - Duration::days(2)).to_rfc3339();
    let old = (Utc::now() - Duration::days(40)).to_rfc3339();
    ctx.backend
        .mock_async(move |when, then| {
            when.method(GET).path("/api/admin/warnings");
            then.status(200).json_body(json!({
                "success": true,
                "warnings": [
                    { "_id": "w1", "reason": "Spam", "createdAt": recent },
                    { "_id": "w2", "reason": "Abuse", "createdAt": old },
                    { "_id": "w3", "reason": "Scam" }
                ]
            }));
        })
        .await;

    let (status, body) = ctx.json(get("/admin/warnings?within=7", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["_id"], "w1");

    let (_, body) = ctx.json(get("/admin/warnings?within=all", Some(&token))).await;
    assert_eq!(body["total"], 3);

    let (status, body) = ctx
        .json(get("/admin/warnings?within=100000000", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = ctx.json(get("/admin/warnings?within=soon", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn warning_guidelines_round_trip_to_social_service() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET).path("/social/getall-warnings");
            then.status(200).json_body(json!({
                "success": true,
                "warnings": [
                    { "_id": "g1", "type": "Spam", "description": ["No links to other apps"] },
                    { "_id": "g2", "type": "Harassment", "description": ["No slurs"] }
                ]
            }));
        })
        .await;
    let create = ctx
        .backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/social/create-warning")
                .json_body(json!({ "type": "Fraud", "description": ["No fake payments"] }));
            then.status(201).json_body(json!({ "success": true }));
        })
        .await;
    let update = ctx
        .backend
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/social/update-warning/g1")
                .json_body(json!({ "type": "Spam", "description": ["No links", "No ads"] }));
            then.status(200).json_body(json!({ "success": true }));
        })
        .await;
    let remove = ctx
        .backend
        .mock_async(|when, then| {
            when.method(DELETE).path("/social/delete-warning/g2");
            then.status(200).json_body(json!({ "success": true }));
        })
        .await;

    let (status, body) = ctx.json(get("/admin/warning-guidelines?sort=type", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["type"], "Harassment");

    let (status, _) = ctx
        .json(post_json(
            "/admin/warning-guidelines",
            Some(&token),
            json!({ "type": " Fraud ", "description": ["No fake payments", "  "] }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    create.assert_async().await;

    let (status, _) = ctx
        .json(with_body(
            "PUT",
            "/admin/warning-guidelines/g1",
            Some(&token),
            json!({ "type": "Spam", "description": ["No links", "No ads"] }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    update.assert_async().await;

    let (status, _) = ctx
        .json(with_body("DELETE", "/admin/warning-guidelines/g2", Some(&token), json!({})))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    remove.assert_async().await;
}

#[tokio::test]
async fn dashboard_unwraps_the_data_envelope() {
    let ctx = TestContext::new().await;
    let token = ctx.login().await;
    ctx.backend
        .mock_async(|when, then| {
            when.method(GET)
                .path("/social/dashboard")
                .header("authorization", "Bearer backend-jwt");
            then.status(200).json_body(json!({
                "success": true,
                "data": {
                    "summary": {
                        "users": { "total": 40, "newToday": 3 },
                        "payments": { "completed": 5, "totalRevenue": 2495.0 }
                    },
                    "charts": { "userGrowth": [{ "date": "2026-01-01", "count": 4 }] }
                }
            }));
        })
        .await;

    let (status, body) = ctx.json(get("/admin/dashboard", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["users"]["total"], 40);
    assert_eq!(body["summary"]["users"]["newToday"], 3);
    assert_eq!(body["summary"]["payments"]["totalRevenue"], 2495.0);
    assert_eq!(body["summary"]["calls"]["total"], 0);
    assert_eq!(body["charts"]["userGrowth"][0]["count"], 4);
    assert!(body["fetched_at"].is_string());
}
