// ResourceFetcher and FilterController against a mock studio API.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reformery_api::ApiClient;
use reformery_core::{
    CoreError, FilterController, Query, ResourceData, ResourceFetcher, ResourceName,
    ScheduleFilter, SessionContext, UserFilter, UserRole,
};

async fn setup() -> (MockServer, ResourceFetcher) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        url::Url::parse(&server.uri()).unwrap(),
        Arc::new(SessionContext::new()),
    );
    (server, ResourceFetcher::new(Arc::new(client)))
}

#[tokio::test]
async fn test_instructors_always_scoped_by_role() {
    let (server, fetcher) = setup().await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("role", "instructor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "id": 2, "email": "lu@studio.test", "role": "instructor" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let data = fetcher
        .fetch(ResourceName::Instructors, &Query::new())
        .await
        .unwrap();
    assert_eq!(data.as_users().unwrap()[0].role, UserRole::Instructor);
}

#[tokio::test]
async fn test_user_packages_by_user() {
    let (server, fetcher) = setup().await;
    Mock::given(method("GET"))
        .and(path("/admin/user-packages/user/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 4, "user_id": 12, "remaining_classes": 3 }]
        })))
        .mount(&server)
        .await;

    let data = fetcher
        .fetch(ResourceName::UserPackages, &Query::new().with("user_id", "12"))
        .await
        .unwrap();
    assert_eq!(data.as_user_packages().unwrap()[0].remaining_classes, Some(3));

    let err = fetcher
        .fetch(ResourceName::UserPackages, &Query::new().with("user_id", "abc"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

#[tokio::test]
async fn test_fetch_outcome_captures_failure() {
    let (server, fetcher) = setup().await;
    Mock::given(method("GET"))
        .and(path("/admin/classes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Sin permisos"
        })))
        .mount(&server)
        .await;

    let outcome = fetcher
        .fetch_outcome(ResourceName::Classes, &Query::new())
        .await;
    let reason = outcome.unwrap_err();
    assert!(reason.message.contains("Sin permisos"));
}

#[tokio::test]
async fn test_filter_issues_exactly_one_scoped_fetch() {
    let (server, fetcher) = setup().await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("role", "instructor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;
    for other in ["/admin/packages", "/admin/classes"] {
        Mock::given(method("GET"))
            .and(path(other))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
    }

    let filters = FilterController::<UserFilter>::new(fetcher);
    let data = filters
        .set_criteria(UserFilter {
            role: Some(UserRole::Instructor),
            ..UserFilter::default()
        })
        .await
        .unwrap();

    assert_eq!(data, ResourceData::Users(Vec::new()));
}

#[tokio::test]
async fn test_schedule_filter_sends_date_window() {
    let (server, fetcher) = setup().await;
    Mock::given(method("GET"))
        .and(path("/schedules/public"))
        .and(query_param("start_date", "2026-10-18"))
        .and(query_param("end_date", "2026-10-25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1, "date": "2026-10-20", "start_time": "09:00" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = FilterController::<ScheduleFilter>::new(fetcher);
    let start = chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let data = filters
        .set_criteria(ScheduleFilter::next_days(start, 7))
        .await
        .unwrap();
    assert_eq!(data.len(), 1);
}
