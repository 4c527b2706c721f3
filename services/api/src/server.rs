use crate::cli::ServeArgs;
use crate::infra::{gemini_assistant, registry_service, AppState};
use crate::routes::app;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use warga_rt::assistant::Conversation;
use warga_rt::config::{AppConfig, SettingsStore};
use warga_rt::error::AppError;
use warga_rt::export::SheetSyncClient;
use warga_rt::registry::UserDirectory;
use warga_rt::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        service: registry_service(args.seed),
        users: Arc::new(UserDirectory::demo()),
        settings: Arc::new(SettingsStore::new(config.settings_path.clone())),
        sync: Arc::new(SheetSyncClient::new()),
        assistant: Arc::new(gemini_assistant(&config)),
        conversation: Arc::new(Mutex::new(Conversation::new())),
        ask_gate: Arc::new(Mutex::new(())),
    };

    let app = app(app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        seeded = args.seed,
        assistant = config.assistant.api_key.is_some(),
        "resident registry ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
