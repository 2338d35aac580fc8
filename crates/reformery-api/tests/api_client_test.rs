// Integration tests for `ApiClient` using wiremock.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reformery_api::models::{ScheduleStatus, UserRole};
use reformery_api::requests::{AdjustClassesRequest, CreatePackageRequest, UpdateUserRequest};
use reformery_api::{ApiClient, Error, SessionContext, SessionEvent, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    setup_with_session(SessionContext::new()).await
}

async fn setup_with_session(session: SessionContext) -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base = url::Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base, Arc::new(session));
    (server, client)
}

fn signed_in(token: &str) -> SessionContext {
    SessionContext::with_token(SecretString::from(token.to_owned()))
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_packages_unwraps_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/packages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 1, "name": "8 clases", "total_classes": 8, "price": 120.0, "is_active": true },
                { "id": 2, "name": "Ilimitado", "price": 250.0, "active": false }
            ]
        })))
        .mount(&server)
        .await;

    let packages = client.list_packages().await.unwrap();
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0].name, "8 clases");
    assert_eq!(packages[0].total_classes, Some(8));
    assert!(!packages[1].active);
}

#[tokio::test]
async fn test_null_data_yields_empty_list() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/classes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": null })),
        )
        .mount(&server)
        .await;

    let classes = client.list_classes().await.unwrap();
    assert!(classes.is_empty());
}

#[tokio::test]
async fn test_missing_data_yields_default_statistics() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let stats = client.statistics().await.unwrap();
    assert_eq!(stats, Default::default());
}

#[tokio::test]
async fn test_list_users_forwards_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("role", "instructor"))
        .and(query_param("active", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "id": 7, "email": "lu@studio.test", "full_name": "Lu", "role": "instructor" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let users = client
        .list_users(&[
            ("role", "instructor".into()),
            ("active", "1".into()),
            ("email", String::new()),
        ])
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, UserRole::Instructor);
    assert_eq!(users[0].display_name(), "Lu");
}

#[tokio::test]
async fn test_public_schedules_with_date_range() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/schedules/public"))
        .and(query_param("start_date", "2026-10-18"))
        .and(query_param("end_date", "2026-10-25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 11, "date": "2026-10-19", "start_time": "09:00", "status": "cancelled" }]
        })))
        .mount(&server)
        .await;

    let schedules = client
        .list_public_schedules(&[
            ("start_date", "2026-10-18".into()),
            ("end_date", "2026-10-25".into()),
        ])
        .await
        .unwrap();
    assert_eq!(schedules[0].status, ScheduleStatus::Cancelled);
    assert_eq!(
        schedules[0].date,
        chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
    );
}

#[tokio::test]
async fn test_dashboard_summary_flattens_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "users": { "total": 52 },
                "packages": { "active": 4 },
                "classes": { "total": 9 },
                "reservations": { "total": 310 }
            }
        })))
        .mount(&server)
        .await;

    let summary = client.dashboard_summary().await.unwrap();
    assert_eq!(summary.total_users, 52);
    assert_eq!(summary.active_packages, 4);
    assert_eq!(summary.scheduled_classes, 9);
    assert_eq!(summary.total_reservations, 310);
}

// ── Auth header & session ───────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_attached() {
    let (server, client) = setup_with_session(signed_in("tok-123")).await;

    Mock::given(method("GET"))
        .and(path("/reservations/my-reservations"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let reservations = client.list_my_reservations().await.unwrap();
    assert!(reservations.is_empty());
}

#[tokio::test]
async fn test_unauthorized_invalidates_session() {
    let (server, client) = setup_with_session(signed_in("expired")).await;
    let mut events = client.session().subscribe();

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .mount(&server)
        .await;

    let err = client.list_users(&[]).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!client.session().is_authenticated());
    assert_eq!(events.try_recv().ok(), Some(SessionEvent::Unauthorized));
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_message_extracted_from_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/admin/packages"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "success": false, "message": "Paquete duplicado" })),
        )
        .mount(&server)
        .await;

    let req = CreatePackageRequest {
        name: "8 clases".into(),
        description: None,
        total_classes: 8,
        validity_days: 30,
        price: 120.0,
        active: true,
    };
    let err = client.create_package(&req).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("Paquete duplicado"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_success_false_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/admin/users/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "No se puede desactivar al último administrador"
        })))
        .mount(&server)
        .await;

    let update = UpdateUserRequest {
        active: Some(false),
        ..Default::default()
    };
    let err = client.update_user(5, &update).await.unwrap_err();
    assert!(matches!(err, Error::Rejected { .. }));
    assert_eq!(
        err.server_message(),
        Some("No se puede desactivar al último administrador")
    );
}

#[tokio::test]
async fn test_server_error_without_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/schedules"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.list_schedules().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.is_transient());
    assert!(err.server_message().is_none());
}

#[tokio::test]
async fn test_timeout_reports_configured_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/packages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": [] }))
                .set_delay(std::time::Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let transport = TransportConfig {
        timeout: std::time::Duration::from_secs(1),
        ..TransportConfig::default()
    };
    let client =
        ApiClient::new(&server.uri(), Arc::new(SessionContext::new()), &transport).unwrap();

    let err = client.list_packages().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_secs: 1 }), "got {err:?}");
    assert_eq!(err.to_string(), "Request timed out after 1s");
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_toggle_sends_only_active_flag() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/admin/users/9"))
        .and(body_json(json!({ "active": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": 9, "email": "x@studio.test", "active": false }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = UpdateUserRequest {
        active: Some(false),
        ..Default::default()
    };
    let echoed = client.update_user(9, &update).await.unwrap().unwrap();
    assert!(!echoed.active);
}

#[tokio::test]
async fn test_adjust_classes_patch() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/admin/user-packages/4/adjust-classes"))
        .and(body_json(json!({ "delta": 2, "reason": "cumpleaños" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": 4, "remaining_classes": 6 }
        })))
        .mount(&server)
        .await;

    let req = AdjustClassesRequest {
        delta: 2,
        reason: "cumpleaños".into(),
    };
    let echoed = client.adjust_classes(4, &req).await.unwrap().unwrap();
    assert_eq!(echoed.remaining_classes, Some(6));
}

#[tokio::test]
async fn test_cancel_schedule_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/admin/schedules/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let echoed = client.cancel_schedule(3).await.unwrap();
    assert!(echoed.is_none());
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_signs_session_in() {
    let (server, client) = setup().await;
    let mut events = client.session().subscribe();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "admin@studio.test", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-abc",
            "token_type": "bearer",
            "user": { "id": 1, "email": "admin@studio.test", "role": "admin" }
        })))
        .mount(&server)
        .await;

    let login = client
        .login("admin@studio.test", &SecretString::from("pw".to_owned()))
        .await
        .unwrap();
    assert_eq!(login.token.expose_secret(), "jwt-abc");
    assert_eq!(login.user.unwrap().role, UserRole::Admin);
    assert!(client.session().is_authenticated());
    assert_eq!(events.try_recv().ok(), Some(SessionEvent::SignedIn));
}

#[tokio::test]
async fn test_login_enveloped_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "token": "jwt-env" }
        })))
        .mount(&server)
        .await;

    let login = client
        .login("a@studio.test", &SecretString::from("pw".to_owned()))
        .await
        .unwrap();
    assert_eq!(login.token.expose_secret(), "jwt-env");
    assert!(login.user.is_none());
}

#[tokio::test]
async fn test_login_bad_credentials_is_not_a_session_event() {
    let (server, client) = setup().await;
    let mut events = client.session().subscribe();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Credenciales inválidas" })),
        )
        .mount(&server)
        .await;

    let err = client
        .login("a@studio.test", &SecretString::from("wrong".to_owned()))
        .await
        .unwrap_err();
    match err {
        Error::Authentication { message } => assert_eq!(message, "Credenciales inválidas"),
        other => panic!("expected Authentication error, got {other:?}"),
    }
    assert!(events.try_recv().is_err());
}
