use super::common::*;
use axum::http::{header, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::registry::access::UserDirectory;
use crate::registry::router::{registry_router, USER_HEADER};
use crate::registry::service::RegistryService;

#[tokio::test]
async fn missing_or_unknown_user_is_unauthorized() {
    let app = seeded_router();

    let response = app
        .clone()
        .oneshot(request("GET", "/api/v1/residents", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(request("GET", "/api/v1/residents", Some("ghost")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_login_returns_role_and_navigation() {
    let response = seeded_router()
        .oneshot(json_request(
            "POST",
            "/api/v1/session",
            None,
            json!({ "username": "staff", "password": "staff" }),
        ))
        .await
        .expect("response");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "STAFF");
    assert_eq!(body["navigation"], json!(["DASHBOARD", "RESIDENTS", "SERVICES"]));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let response = seeded_router()
        .oneshot(json_request(
            "POST",
            "/api/v1/session",
            None,
            json!({ "username": "admin", "password": "secret" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn resident_search_filters_by_query() {
    let response = seeded_router()
        .oneshot(request("GET", "/api/v1/residents?q=kutilang", Some("staff")))
        .await
        .expect("response");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    let residents = body.as_array().expect("array");
    assert_eq!(residents.len(), 1);
    assert_eq!(residents[0]["fullName"], "Rina Kartika");
}

#[tokio::test]
async fn create_then_patch_resident() {
    let app = seeded_router();
    let draft = serde_json::to_value(resident_draft("Dewi Lestari", "3171014101990006"))
        .expect("draft json");

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/residents", Some("admin"), draft))
        .await
        .expect("response");
    let (status, created) = read_json(response).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "6");

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/api/v1/residents/6",
            Some("staff"),
            json!({ "occupation": "Dokter" }),
        ))
        .await
        .expect("response");
    let (status, updated) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], "6");
    assert_eq!(updated["occupation"], "Dokter");
    assert_eq!(updated["fullName"], "Dewi Lestari");
}

#[tokio::test]
async fn invalid_resident_payload_is_unprocessable() {
    let draft = serde_json::to_value(resident_draft("Dewi Lestari", "123")).expect("draft json");
    let response = seeded_router()
        .oneshot(json_request("POST", "/api/v1/residents", Some("admin"), draft))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn staff_delete_is_forbidden_and_admin_delete_is_idempotent() {
    let app = seeded_router();

    let response = app
        .clone()
        .oneshot(request("DELETE", "/api/v1/residents/1", Some("staff")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (status, body) = read_json(
        app.clone()
            .oneshot(request("DELETE", "/api/v1/residents/1", Some("admin")))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], true);

    let (status, body) = read_json(
        app.oneshot(request("DELETE", "/api/v1/residents/1", Some("admin")))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], false);
}

#[tokio::test]
async fn unknown_resident_is_not_found() {
    let response = seeded_router()
        .oneshot(request("GET", "/api/v1/residents/404", Some("admin")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn staff_cannot_reach_finance_routes() {
    let app = seeded_router();
    for uri in [
        "/api/v1/transactions",
        "/api/v1/stats/finance",
        "/api/v1/export/transactions.xlsx",
    ] {
        let response = app
            .clone()
            .oneshot(request("GET", uri, Some("staff")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/transactions",
            Some("staff"),
            json!({
                "date": "2023-11-01",
                "description": "Iuran",
                "amount": 1000,
                "type": "INCOME",
                "category": "Iuran Warga"
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_records_transaction_and_sees_balance() {
    let app = seeded_router();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/transactions",
            Some("admin"),
            json!({
                "date": "2023-11-01",
                "description": "Sumbangan Warga",
                "amount": 400000,
                "type": "INCOME",
                "category": "Sumbangan"
            }),
        ))
        .await
        .expect("response");
    let (status, created) = read_json(response).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "5");

    let (status, summary) = read_json(
        app.oneshot(request("GET", "/api/v1/stats/finance", Some("admin")))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totals"]["balance"], 5_000_000);
    assert_eq!(summary["transactions"][0]["id"], "5");
}

#[tokio::test]
async fn dashboard_reports_population() {
    let (status, body) = read_json(
        seeded_router()
            .oneshot(request("GET", "/api/v1/stats/dashboard", Some("staff")))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["population"]["total"], 5);
    assert_eq!(body["age_distribution"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn letter_route_falls_back_for_unknown_label() {
    let (status, body) = read_json(
        seeded_router()
            .oneshot(request(
                "GET",
                "/api/v1/residents/2/letter?label=Pengantar%20Nikah",
                Some("staff"),
            ))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let text = body["text"].as_str().expect("text");
    assert!(text.contains("Siti Aminah"));
    assert!(text.contains("untuk keperluan: Pengantar Nikah."));
}

#[tokio::test]
async fn resident_export_is_an_attachment() {
    let response = seeded_router()
        .oneshot(request("GET", "/api/v1/export/residents.csv", Some("staff")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .expect("disposition")
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"Data_Warga_RT_"));
    assert!(disposition.ends_with(".csv\""));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("bytes");
    let text = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(text.starts_with("NIK,Nama Lengkap"));
}

#[tokio::test]
async fn resident_export_honours_search() {
    let response = seeded_router()
        .oneshot(request(
            "GET",
            "/api/v1/export/residents.csv?q=budi",
            Some("admin"),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("bytes");
    let text = String::from_utf8(bytes.to_vec()).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("Budi Santoso"));
}

#[tokio::test]
async fn malformed_body_is_a_json_error() {
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/residents")
        .header(USER_HEADER, "admin")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .expect("request builds");

    let response = seeded_router().oneshot(request).await.expect("response");
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let response = seeded_router()
        .oneshot(json_request(
            "POST",
            "/api/v1/transactions",
            Some("admin"),
            json!({ "date": "2026-10-18" }),
        ))
        .await
        .expect("response");
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.starts_with("invalid request body")));
}

#[tokio::test]
async fn unknown_export_is_not_found() {
    let response = seeded_router()
        .oneshot(request("GET", "/api/v1/export/secrets.zip", Some("admin")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repository_outage_is_internal_error() {
    let app = registry_router(
        Arc::new(RegistryService::new(Arc::new(UnavailableRegistry))),
        Arc::new(UserDirectory::demo()),
    );
    let (status, body) = read_json(
        app.oneshot(request("GET", "/api/v1/residents", Some("admin")))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().expect("message").contains("store offline"));
}
