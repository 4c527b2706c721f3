use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::Mutex;
use warga_rt::assistant::{Conversation, GeminiClient, LanguageModel, SmartAssistant};
use warga_rt::config::{AppConfig, SettingsStore};
use warga_rt::export::SheetSyncClient;
use warga_rt::registry::seed::demo_registry;
use warga_rt::registry::{InMemoryRegistry, RegistryService, UserDirectory};

pub(crate) type Registry = RegistryService<InMemoryRegistry>;
pub(crate) type Assistant = SmartAssistant<Arc<dyn LanguageModel>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) service: Arc<Registry>,
    pub(crate) users: Arc<UserDirectory>,
    pub(crate) settings: Arc<SettingsStore>,
    pub(crate) sync: Arc<SheetSyncClient>,
    pub(crate) assistant: Arc<Assistant>,
    pub(crate) conversation: Arc<Mutex<Conversation>>,
    /// Held across a model call so questions are answered one at a time.
    pub(crate) ask_gate: Arc<Mutex<()>>,
}

/// Seeded registry for the CLI commands and `serve --seed`; empty otherwise.
pub(crate) fn registry_service(seed: bool) -> Arc<Registry> {
    let repository = if seed {
        demo_registry()
    } else {
        InMemoryRegistry::default()
    };
    Arc::new(RegistryService::new(Arc::new(repository)))
}

pub(crate) fn gemini_assistant(config: &AppConfig) -> Assistant {
    let client = GeminiClient::new(
        config.assistant.api_key.clone(),
        config.assistant.model_id.clone(),
        config.assistant.base_url.clone(),
    );
    let model: Arc<dyn LanguageModel> = Arc::new(client);
    SmartAssistant::new(model)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
