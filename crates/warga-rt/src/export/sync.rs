use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::registry::domain::Resident;

/// The web-app parses the body itself; JSON goes out as plain text.
pub const SYNC_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRow {
    pub nik: String,
    pub nama: String,
    pub jenis_kelamin: String,
    pub tgl_lahir: String,
    pub alamat: String,
    pub pekerjaan: String,
    pub status: String,
    pub no_hp: String,
}

impl From<&Resident> for SyncRow {
    fn from(resident: &Resident) -> Self {
        Self {
            nik: resident.nik.clone(),
            nama: resident.full_name.clone(),
            jenis_kelamin: resident.gender.label().to_string(),
            tgl_lahir: resident.birth_date.format("%Y-%m-%d").to_string(),
            alamat: resident.address.clone(),
            pekerjaan: resident.occupation.clone(),
            status: resident.marital_status.label().to_string(),
            no_hp: resident.phone_number.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPayload {
    pub timestamp: String,
    pub data: Vec<SyncRow>,
}

impl SyncPayload {
    pub fn from_residents(residents: &[Resident], at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            data: residents.iter().map(SyncRow::from).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("sync endpoint is not configured")]
    MissingEndpoint,
    #[error("invalid sync endpoint `{0}`")]
    InvalidEndpoint(String),
    #[error("a sync is already in progress")]
    InFlight,
    #[error("sync request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("sync endpoint answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("sync endpoint returned invalid JSON: {0}")]
    InvalidResponse(String),
    #[error("could not encode sync payload: {0}")]
    Encode(serde_json::Error),
}

/// Validates a configured endpoint: it must be an absolute http(s) URL.
pub fn parse_endpoint(raw: &str) -> Result<Url, SyncError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SyncError::MissingEndpoint);
    }

    let url = Url::parse(trimmed).map_err(|_| SyncError::InvalidEndpoint(trimmed.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(SyncError::InvalidEndpoint(trimmed.to_string())),
    }
}

/// One-way push of the resident registry to a spreadsheet web-app.
///
/// At most one push runs at a time per client; a concurrent call fails fast
/// with [`SyncError::InFlight`]. There is no retry.
#[derive(Debug)]
pub struct SheetSyncClient {
    client: Client,
    in_flight: AtomicBool,
}

impl Default for SheetSyncClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetSyncClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self::with_client(client)
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn push(
        &self,
        endpoint: &str,
        payload: &SyncPayload,
    ) -> Result<serde_json::Value, SyncError> {
        let url = parse_endpoint(endpoint)?;
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(SyncError::InFlight)?;

        let body = serde_json::to_string(payload).map_err(SyncError::Encode)?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, SYNC_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "resident sync rejected");
            return Err(SyncError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let result = serde_json::from_str(&text)
            .map_err(|err| SyncError::InvalidResponse(err.to_string()))?;
        info!(rows = payload.data.len(), "resident sync completed");
        Ok(result)
    }

    pub async fn sync_residents(
        &self,
        endpoint: &str,
        residents: &[Resident],
    ) -> Result<serde_json::Value, SyncError> {
        let payload = SyncPayload::from_residents(residents, Utc::now());
        self.push(endpoint, &payload).await
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
