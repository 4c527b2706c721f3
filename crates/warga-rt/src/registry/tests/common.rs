use std::sync::Arc;

use axum::body::to_bytes;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;

use crate::registry::access::{Role, User, UserDirectory};
use crate::registry::domain::{
    Gender, MaritalStatus, NewResident, NewTransaction, Resident, ResidentId, ResidentPatch,
    Transaction, TransactionId, TransactionPatch, TransactionType,
};
use crate::registry::memory::InMemoryRegistry;
use crate::registry::repository::{RegistryRepository, RepositoryError};
use crate::registry::router::{registry_router, USER_HEADER};
use crate::registry::seed::demo_registry;
use crate::registry::service::RegistryService;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
}

pub(super) fn admin() -> User {
    User {
        username: "admin".to_string(),
        name: "Pak RT".to_string(),
        role: Role::Admin,
    }
}

pub(super) fn staff() -> User {
    User {
        username: "staff".to_string(),
        name: "Sekretaris".to_string(),
        role: Role::Staff,
    }
}

pub(super) fn resident_draft(full_name: &str, nik: &str) -> NewResident {
    NewResident {
        nik: nik.to_string(),
        full_name: full_name.to_string(),
        gender: Gender::Female,
        birth_date: NaiveDate::from_ymd_opt(1995, 3, 25).expect("valid date"),
        address: "Jl. Kutilang No. 10".to_string(),
        occupation: "Guru".to_string(),
        marital_status: MaritalStatus::Single,
        phone_number: "085678901234".to_string(),
        photo: None,
    }
}

pub(super) fn transaction_draft(kind: TransactionType, amount: u64) -> NewTransaction {
    NewTransaction {
        date: NaiveDate::from_ymd_opt(2023, 11, 1).expect("valid date"),
        description: "Iuran Bulanan".to_string(),
        amount,
        kind,
        category: "Iuran Warga".to_string(),
    }
}

pub(super) fn seeded_service() -> Arc<RegistryService<InMemoryRegistry>> {
    Arc::new(RegistryService::new(Arc::new(demo_registry())))
}

pub(super) fn seeded_router() -> Router {
    registry_router(seeded_service(), Arc::new(UserDirectory::demo()))
}

pub(super) fn request(method: &str, uri: &str, user: Option<&str>) -> Request<axum::body::Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    builder
        .body(axum::body::Body::empty())
        .expect("request builds")
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Value,
) -> Request<axum::body::Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    builder
        .body(axum::body::Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Repository whose every call fails as if the backing store were down.
pub(super) struct UnavailableRegistry;

impl UnavailableRegistry {
    fn down<T>() -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

impl RegistryRepository for UnavailableRegistry {
    fn add_resident(&self, _draft: NewResident) -> Result<Resident, RepositoryError> {
        Self::down()
    }

    fn update_resident(
        &self,
        _id: &ResidentId,
        _patch: ResidentPatch,
    ) -> Result<Resident, RepositoryError> {
        Self::down()
    }

    fn remove_resident(&self, _id: &ResidentId) -> Result<Option<Resident>, RepositoryError> {
        Self::down()
    }

    fn resident(&self, _id: &ResidentId) -> Result<Option<Resident>, RepositoryError> {
        Self::down()
    }

    fn residents(&self) -> Result<Vec<Resident>, RepositoryError> {
        Self::down()
    }

    fn add_transaction(&self, _draft: NewTransaction) -> Result<Transaction, RepositoryError> {
        Self::down()
    }

    fn update_transaction(
        &self,
        _id: &TransactionId,
        _patch: TransactionPatch,
    ) -> Result<Transaction, RepositoryError> {
        Self::down()
    }

    fn remove_transaction(
        &self,
        _id: &TransactionId,
    ) -> Result<Option<Transaction>, RepositoryError> {
        Self::down()
    }

    fn transaction(&self, _id: &TransactionId) -> Result<Option<Transaction>, RepositoryError> {
        Self::down()
    }

    fn transactions(&self) -> Result<Vec<Transaction>, RepositoryError> {
        Self::down()
    }
}
