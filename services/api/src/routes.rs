use crate::infra::AppState;
use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use warga_rt::assistant::ChatMessage;
use warga_rt::config::Settings;
use warga_rt::error::AppError;
use warga_rt::export::SyncError;
use warga_rt::registry::{registry_router, resolve_actor};

#[derive(Debug, Deserialize)]
pub(crate) struct SettingsUpdate {
    #[serde(default, rename = "googleSheetScriptUrl")]
    pub(crate) sheet_sync_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssistantRequest {
    pub(crate) question: String,
}

/// Registry routes plus the operational and remote-service endpoints.
pub(crate) fn app(state: AppState) -> Router {
    registry_router(state.service.clone(), state.users.clone())
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/settings",
            get(settings_endpoint).put(update_settings_endpoint),
        )
        .route("/api/v1/sync", post(sync_endpoint))
        .route(
            "/api/v1/assistant",
            get(conversation_endpoint).post(assistant_endpoint),
        )
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn settings_endpoint(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<Settings>, AppError> {
    let actor = resolve_actor(&state.users, &headers)?;
    state.service.authorize_settings(&actor)?;
    Ok(Json(state.settings.load()?))
}

pub(crate) async fn update_settings_endpoint(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<Settings>, AppError> {
    let actor = resolve_actor(&state.users, &headers)?;
    state.service.authorize_settings(&actor)?;
    let Json(payload) = payload?;
    let settings = state.settings.set_sync_url(&payload.sheet_sync_url)?;
    info!(user = %actor.username, "sync url updated");
    Ok(Json(settings))
}

/// Push the full resident list to the configured spreadsheet web-app.
pub(crate) async fn sync_endpoint(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let actor = resolve_actor(&state.users, &headers)?;
    let residents = state.service.sync_snapshot(&actor)?;
    let endpoint = state
        .settings
        .load()?
        .sheet_sync_url
        .ok_or(SyncError::MissingEndpoint)?;

    let response = state.sync.sync_residents(&endpoint, &residents).await?;
    Ok(Json(json!({
        "synced": residents.len(),
        "response": response,
    })))
}

pub(crate) async fn conversation_endpoint(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let actor = resolve_actor(&state.users, &headers)?;
    state.service.assistant_context(&actor)?;
    let conversation = state.conversation.lock().await;
    Ok(Json(conversation.messages().to_vec()))
}

pub(crate) async fn assistant_endpoint(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AssistantRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let actor = resolve_actor(&state.users, &headers)?;
    let residents = state.service.assistant_context(&actor)?;
    let Json(payload) = payload?;

    let _turn = state.ask_gate.lock().await;
    let Some(question) = state.conversation.lock().await.record_question(&payload.question) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "pertanyaan tidak boleh kosong" })),
        )
            .into_response());
    };

    let reply = state.assistant.respond(&question, &residents).await;
    let message = state.conversation.lock().await.record_reply(reply).clone();
    Ok(Json(message).into_response())
}
