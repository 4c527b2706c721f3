use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::access::{AuthError, User, UserDirectory, View};
use super::domain::{
    NewResident, NewTransaction, ResidentId, ResidentPatch, TransactionId, TransactionPatch,
};
use super::repository::RegistryRepository;
use super::service::RegistryService;
use crate::error::AppError;
use crate::export::{
    export_file_name, resident_table, transaction_table, write_table, ExportFormat, ExportKind,
};

/// Header carrying the demo username of the caller.
pub const USER_HEADER: &str = "x-warga-user";

/// Shared handler state: the registry service plus the demo user directory.
pub struct RegistryState<R> {
    pub service: Arc<RegistryService<R>>,
    pub users: Arc<UserDirectory>,
}

impl<R> Clone for RegistryState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            users: Arc::clone(&self.users),
        }
    }
}

/// Router builder exposing the registry, ledger, statistics, letters, and
/// exports over HTTP.
pub fn registry_router<R>(service: Arc<RegistryService<R>>, users: Arc<UserDirectory>) -> Router
where
    R: RegistryRepository + 'static,
{
    let state = RegistryState { service, users };

    Router::new()
        .route("/api/v1/session", post(session_handler::<R>))
        .route("/api/v1/navigation", get(navigation_handler::<R>))
        .route(
            "/api/v1/residents",
            get(list_residents_handler::<R>).post(create_resident_handler::<R>),
        )
        .route(
            "/api/v1/residents/:id",
            get(resident_handler::<R>)
                .patch(update_resident_handler::<R>)
                .delete(remove_resident_handler::<R>),
        )
        .route("/api/v1/residents/:id/letter", get(letter_handler::<R>))
        .route("/api/v1/residents/:id/card", get(card_handler::<R>))
        .route(
            "/api/v1/transactions",
            get(list_transactions_handler::<R>).post(record_transaction_handler::<R>),
        )
        .route(
            "/api/v1/transactions/:id",
            patch(update_transaction_handler::<R>).delete(remove_transaction_handler::<R>),
        )
        .route("/api/v1/stats/dashboard", get(dashboard_handler::<R>))
        .route("/api/v1/stats/finance", get(finance_handler::<R>))
        .route("/api/v1/services", get(catalog_handler::<R>))
        .route("/api/v1/services/subjects", get(subjects_handler::<R>))
        .route("/api/v1/export/:file", get(export_handler::<R>))
        .with_state(state)
}

/// Resolve the caller from [`USER_HEADER`]. Missing or unknown users are
/// rejected.
pub fn resolve_actor(users: &UserDirectory, headers: &HeaderMap) -> Result<User, AuthError> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|username| users.find(username.trim()))
        .cloned()
        .ok_or(AuthError::UnknownUser)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn failure(error: impl Into<AppError>) -> Response {
    error.into().into_response()
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LetterParams {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
struct NavigationEntry {
    view: View,
    label: &'static str,
}

pub(crate) async fn session_handler<R>(
    State(state): State<RegistryState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let login = match payload {
        Ok(Json(login)) => login,
        Err(rejection) => return failure(rejection),
    };
    match state.users.authenticate(&login.username, &login.password) {
        Ok(user) => {
            let views = state.service.navigation(&user);
            (
                StatusCode::OK,
                Json(json!({ "user": user, "navigation": views })),
            )
                .into_response()
        }
        Err(error) => failure(error),
    }
}

pub(crate) async fn navigation_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: RegistryRepository + 'static,
{
    match resolve_actor(&state.users, &headers) {
        Ok(actor) => {
            let entries: Vec<NavigationEntry> = state
                .service
                .navigation(&actor)
                .into_iter()
                .map(|view| NavigationEntry {
                    view,
                    label: view.label(),
                })
                .collect();
            (StatusCode::OK, Json(entries)).into_response()
        }
        Err(error) => failure(error),
    }
}

pub(crate) async fn list_residents_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    match state.service.residents(&actor, params.q.as_deref()) {
        Ok(residents) => (StatusCode::OK, Json(residents)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn create_resident_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    payload: Result<Json<NewResident>, JsonRejection>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return failure(rejection),
    };
    match state.service.register_resident(&actor, draft, today()) {
        Ok(resident) => (StatusCode::CREATED, Json(resident)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn resident_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    match state.service.resident(&actor, &ResidentId(id)) {
        Ok(resident) => (StatusCode::OK, Json(resident)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn update_resident_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<ResidentPatch>, JsonRejection>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => return failure(rejection),
    };
    match state
        .service
        .update_resident(&actor, &ResidentId(id), patch, today())
    {
        Ok(resident) => (StatusCode::OK, Json(resident)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn remove_resident_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    match state.service.remove_resident(&actor, &ResidentId(id)) {
        Ok(removed) => (
            StatusCode::OK,
            Json(json!({ "removed": removed.is_some() })),
        )
            .into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn letter_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<LetterParams>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    let label = params.label.unwrap_or_default();
    match state
        .service
        .letter(&actor, &ResidentId(id), &label, today())
    {
        Ok(letter) => (StatusCode::OK, Json(letter)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn card_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    match state.service.member_card(&actor, &ResidentId(id)) {
        Ok(card) => (StatusCode::OK, Json(card)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn list_transactions_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    match state.service.transactions(&actor) {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn record_transaction_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return failure(rejection),
    };
    match state.service.record_transaction(&actor, draft) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn update_transaction_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<TransactionPatch>, JsonRejection>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => return failure(rejection),
    };
    match state
        .service
        .update_transaction(&actor, &TransactionId(id), patch)
    {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn remove_transaction_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    match state.service.remove_transaction(&actor, &TransactionId(id)) {
        Ok(removed) => (
            StatusCode::OK,
            Json(json!({ "removed": removed.is_some() })),
        )
            .into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    match state.service.dashboard(&actor, today()) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn finance_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    match state.service.finance(&actor) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn catalog_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    match state.service.service_catalog(&actor) {
        Ok(catalog) => (StatusCode::OK, Json(catalog)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn subjects_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    let query = params.q.unwrap_or_default();
    match state.service.letter_subjects(&actor, &query) {
        Ok(residents) => (StatusCode::OK, Json(residents)).into_response(),
        Err(error) => failure(error),
    }
}

fn parse_export_file(file: &str) -> Option<(ExportKind, ExportFormat)> {
    let (stem, extension) = file.rsplit_once('.')?;
    let kind = match stem {
        "residents" => ExportKind::Residents,
        "transactions" => ExportKind::Transactions,
        _ => return None,
    };
    let format = match extension {
        "xlsx" => ExportFormat::Xlsx,
        "csv" => ExportFormat::Csv,
        _ => return None,
    };
    Some((kind, format))
}

pub(crate) async fn export_handler<R>(
    State(state): State<RegistryState<R>>,
    headers: HeaderMap,
    Path(file): Path<String>,
    Query(params): Query<SearchParams>,
) -> Response
where
    R: RegistryRepository + 'static,
{
    let actor = match resolve_actor(&state.users, &headers) {
        Ok(actor) => actor,
        Err(error) => return failure(error),
    };
    let Some((kind, format)) = parse_export_file(&file) else {
        let payload = json!({ "error": format!("unknown export `{file}`") });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    let table = match kind {
        ExportKind::Residents => state
            .service
            .exportable_residents(&actor, params.q.as_deref())
            .map(|residents| resident_table(&residents)),
        ExportKind::Transactions => state
            .service
            .exportable_transactions(&actor)
            .map(|transactions| transaction_table(&transactions)),
    };
    let table = match table {
        Ok(table) => table,
        Err(error) => return failure(error),
    };

    match write_table(&table, format) {
        Ok(bytes) => {
            let file_name = export_file_name(kind, format, today());
            let headers = [
                (header::CONTENT_TYPE, format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ];
            (StatusCode::OK, headers, bytes).into_response()
        }
        Err(error) => failure(error),
    }
}
