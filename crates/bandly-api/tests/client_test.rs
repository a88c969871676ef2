#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bandly_api::types::{Filters, ListQuery, PageCursor, Role, UserStatus};
use bandly_api::{ApiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn user_json(id: Uuid, name: &str, role: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "role": role,
        "status": "active",
        "createdAt": "2026-01-12T09:30:00Z"
    })
}

// ── List envelope ───────────────────────────────────────────────────

#[tokio::test]
async fn list_users_unwraps_the_envelope() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    let envelope = json!({
        "success": true,
        "data": [user_json(id, "Aisha", "student")],
        "total": 1,
        "page": 1,
        "pageSize": 20,
        "totalPages": 1
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let page = client.list_users(&ListQuery::default()).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, id);
    assert_eq!(page.items[0].role, Role::Student);
    assert_eq!(page.items[0].status, UserStatus::Active);
    assert_eq!(page.total, 1);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn list_sends_filters_and_cursor_as_query_params() {
    let (server, client) = setup().await;

    let envelope = json!({
        "success": true,
        "data": [],
        "total": 0,
        "page": 2,
        "pageSize": 10,
        "totalPages": 2
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .and(query_param("role", "instructor"))
        .and(query_param("status", "suspended"))
        .and(query_param("search", "chen"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .expect(1)
        .mount(&server)
        .await;

    let mut filters = Filters::new();
    filters.set("role", "instructor");
    filters.set("status", "suspended");
    filters.set_search("chen");

    let query = ListQuery::new(filters, PageCursor::new(2, 10));
    let page = client.list_users(&query).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(page.page, 2);
}

#[tokio::test]
async fn null_data_yields_empty_page_not_an_error() {
    let (server, client) = setup().await;

    let envelope = json!({
        "success": true,
        "data": null,
        "total": 0,
        "page": 1,
        "pageSize": 20,
        "totalPages": 1
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let page = client.list_courses(&ListQuery::default()).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(page.total_pages, 1);
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn structured_error_envelope_becomes_server_error() {
    let (server, client) = setup().await;

    let envelope = json!({
        "success": false,
        "error": {
            "code": "USER_NOT_FOUND",
            "message": "No user with that id",
            "details": {"id": "abc"}
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(404).set_body_json(&envelope))
        .mount(&server)
        .await;

    let err = client.list_users(&ListQuery::default()).await.unwrap_err();

    match err {
        Error::Server {
            status,
            code,
            message,
            details,
        } => {
            assert_eq!(status, 404);
            assert_eq!(code, "USER_NOT_FOUND");
            assert_eq!(message, "No user with that id");
            assert!(details.is_some());
        }
        other => panic!("expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn success_false_with_http_200_is_still_a_server_error() {
    let (server, client) = setup().await;

    let envelope = json!({
        "success": false,
        "error": {"code": "SUSPENDED", "message": "Account suspended"}
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let err = client.current_actor().await.unwrap_err();
    assert!(matches!(err, Error::Server { ref code, .. } if code == "SUSPENDED"));
}

#[tokio::test]
async fn error_without_envelope_falls_back_to_status_line() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/goals"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.list_goals(&ListQuery::default()).await.unwrap_err();
    assert!(matches!(err, Error::Server { status: 500, ref code, .. } if code == "SERVER"));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client.list_users(&ListQuery::default()).await.unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert_eq!(err.code(), "PARSE");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Nothing listens on this port.
    let client =
        ApiClient::from_reqwest("http://127.0.0.1:1", reqwest::Client::new()).unwrap();

    let err = client.list_users(&ListQuery::default()).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
    assert_eq!(err.code(), "NETWORK");
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn update_user_patches_only_provided_fields() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    let envelope = json!({
        "success": true,
        "data": {
            "id": id,
            "name": "Marta",
            "email": "marta@example.com",
            "role": "student",
            "status": "suspended"
        }
    });

    Mock::given(method("PATCH"))
        .and(path(format!("/api/v1/users/{id}")))
        .and(body_partial_json(json!({"status": "suspended"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .expect(1)
        .mount(&server)
        .await;

    let update = bandly_api::resources::UpdateUser {
        status: Some(UserStatus::Suspended),
        ..Default::default()
    };
    let user = client.update_user(id, &update).await.unwrap();

    assert_eq!(user.status, UserStatus::Suspended);
}

#[tokio::test]
async fn delete_accepts_an_empty_204() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/reminders/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_reminder(id).await.unwrap();
}

#[tokio::test]
async fn delete_surfaces_the_server_message() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    let envelope = json!({
        "success": false,
        "error": {"code": "IN_USE", "message": "Course still has enrolled students"}
    });

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/courses/{id}")))
        .respond_with(ResponseTemplate::new(409).set_body_json(&envelope))
        .mount(&server)
        .await;

    let err = client.delete_course(id).await.unwrap_err();
    assert_eq!(err.user_message(), "Course still has enrolled students");
}
