//! Chat helper that answers questions about the resident registry.
//!
//! The hosted model sits behind [`LanguageModel`]; [`SmartAssistant`] embeds
//! the current resident list into every prompt and turns every failure into
//! a fixed user-facing sentence, so callers always get text back.

pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::registry::domain::Resident;

pub use gemini::GeminiClient;

pub const SYSTEM_INSTRUCTION: &str = "Anda adalah asisten virtual untuk sistem manajemen kependudukan RT. Jawab pertanyaan berdasarkan data warga yang diberikan dalam format JSON. Bersikaplah profesional, membantu, dan gunakan Bahasa Indonesia yang baik.";
pub const DEFAULT_MODEL_ID: &str = "gemini-3-flash-preview";
pub const TEMPERATURE: f32 = 0.7;

pub const MISSING_KEY_MESSAGE: &str =
    "Error: API Key tidak ditemukan. Pastikan GEMINI_API_KEY telah diatur.";
pub const FAILURE_MESSAGE: &str =
    "Terjadi kesalahan saat menghubungi asisten pintar. Silakan coba lagi nanti.";
pub const EMPTY_RESPONSE_MESSAGE: &str = "Maaf, saya tidak dapat menghasilkan respons saat ini.";
pub const WELCOME_MESSAGE: &str = "Halo Pak RT! Saya Asisten Cerdas siap membantu Anda. Tanyakan apa saja mengenai data warga atau mintalah bantuan untuk membuat surat pengantar.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub temperature: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("language model API key is not configured")]
    MissingApiKey,
    #[error("language model request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("language model answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not serialize resident context: {0}")]
    Context(#[from] serde_json::Error),
}

/// Text generation backend. `Ok(None)` means the model produced no text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>, AssistantError>;
}

#[async_trait]
impl<M: LanguageModel + ?Sized> LanguageModel for Arc<M> {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>, AssistantError> {
        (**self).generate(request).await
    }
}

pub fn build_prompt(residents: &[Resident], question: &str) -> Result<String, AssistantError> {
    let context = serde_json::to_string(residents)?;
    Ok(format!(
        "Data Warga Saat Ini (JSON):\n{context}\n\nPertanyaan/Perintah User:\n{question}"
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantReply {
    pub text: String,
    pub is_error: bool,
}

impl AssistantReply {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_error: true,
        }
    }
}

pub struct SmartAssistant<M> {
    model: M,
}

impl<M: LanguageModel> SmartAssistant<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub async fn respond(&self, question: &str, residents: &[Resident]) -> AssistantReply {
        let prompt = match build_prompt(residents, question) {
            Ok(prompt) => prompt,
            Err(err) => {
                warn!(error = %err, "assistant prompt could not be built");
                return AssistantReply::error(FAILURE_MESSAGE);
            }
        };

        let request = GenerationRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt,
            temperature: TEMPERATURE,
        };

        match self.model.generate(&request).await {
            Ok(Some(text)) if !text.trim().is_empty() => AssistantReply::ok(text),
            Ok(_) => AssistantReply::ok(EMPTY_RESPONSE_MESSAGE.to_string()),
            Err(AssistantError::MissingApiKey) => AssistantReply::error(MISSING_KEY_MESSAGE),
            Err(err) => {
                warn!(error = %err, "assistant request failed");
                AssistantReply::error(FAILURE_MESSAGE)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub is_error: bool,
}

/// Chat transcript, opened with the assistant's greeting.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        conversation.push(ChatRole::Model, WELCOME_MESSAGE.to_string(), false);
        conversation
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, role: ChatRole, text: String, is_error: bool) -> &ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            text,
            timestamp: Utc::now(),
            is_error,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Record a user question and return it trimmed, or `None` when blank.
    pub fn record_question(&mut self, question: &str) -> Option<String> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        self.push(ChatRole::User, question.to_string(), false);
        Some(question.to_string())
    }

    pub fn record_reply(&mut self, reply: AssistantReply) -> &ChatMessage {
        self.push(ChatRole::Model, reply.text, reply.is_error)
    }

    /// Record a question and the assistant's reply. Blank input is ignored.
    pub async fn ask<M: LanguageModel>(
        &mut self,
        assistant: &SmartAssistant<M>,
        question: &str,
        residents: &[Resident],
    ) -> Option<&ChatMessage> {
        let question = self.record_question(question)?;
        let reply = assistant.respond(&question, residents).await;
        Some(self.record_reply(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::seed::demo_residents;
    use std::sync::Mutex;

    enum Script {
        Reply(Option<String>),
        MissingKey,
        Unavailable,
    }

    struct ScriptedModel {
        script: Script,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedModel {
        fn new(script: Script) -> Self {
            Self {
                script,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<Option<String>, AssistantError> {
            self.seen.lock().expect("lock").push(request.clone());
            match &self.script {
                Script::Reply(text) => Ok(text.clone()),
                Script::MissingKey => Err(AssistantError::MissingApiKey),
                Script::Unavailable => Err(AssistantError::Status {
                    status: 503,
                    body: "overloaded".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn prompt_embeds_resident_json_and_instruction() {
        let model = Arc::new(ScriptedModel::new(Script::Reply(Some("Ada 5 warga.".into()))));
        let assistant = SmartAssistant::new(model.clone());

        let reply = assistant.respond("Berapa jumlah warga?", &demo_residents()).await;

        assert_eq!(reply, AssistantReply::ok("Ada 5 warga.".to_string()));
        let seen = model.seen.lock().expect("lock");
        assert_eq!(seen[0].system_instruction, SYSTEM_INSTRUCTION);
        assert!((seen[0].temperature - 0.7).abs() < f32::EPSILON);
        assert!(seen[0].prompt.starts_with("Data Warga Saat Ini (JSON):\n[{"));
        assert!(seen[0].prompt.contains("\"fullName\":\"Budi Santoso\""));
        assert!(seen[0]
            .prompt
            .ends_with("Pertanyaan/Perintah User:\nBerapa jumlah warga?"));
    }

    #[tokio::test]
    async fn failures_become_fixed_messages() {
        let missing = SmartAssistant::new(ScriptedModel::new(Script::MissingKey));
        assert_eq!(
            missing.respond("halo", &[]).await,
            AssistantReply::error(MISSING_KEY_MESSAGE)
        );

        let failing = SmartAssistant::new(ScriptedModel::new(Script::Unavailable));
        assert_eq!(
            failing.respond("halo", &[]).await,
            AssistantReply::error(FAILURE_MESSAGE)
        );

        let silent = SmartAssistant::new(ScriptedModel::new(Script::Reply(None)));
        assert_eq!(
            silent.respond("halo", &[]).await.text,
            EMPTY_RESPONSE_MESSAGE
        );
    }

    #[tokio::test]
    async fn conversation_starts_with_welcome_and_skips_blank_input() {
        let assistant = SmartAssistant::new(ScriptedModel::new(Script::Reply(Some("Siap.".into()))));
        let mut conversation = Conversation::new();
        assert_eq!(conversation.messages()[0].text, WELCOME_MESSAGE);

        assert!(conversation.ask(&assistant, "   ", &[]).await.is_none());
        assert_eq!(conversation.messages().len(), 1);

        let reply = conversation
            .ask(&assistant, "Buatkan surat domisili", &[])
            .await
            .expect("reply");
        assert_eq!(reply.role, ChatRole::Model);
        assert_eq!(reply.id, 3);
        assert_eq!(conversation.messages().len(), 3);
        assert_eq!(conversation.messages()[1].role, ChatRole::User);
    }

    #[tokio::test]
    async fn question_and_reply_can_be_recorded_apart() {
        let assistant = SmartAssistant::new(ScriptedModel::new(Script::Reply(Some("Ada 5 warga.".into()))));
        let mut conversation = Conversation::new();
        assert!(conversation.record_question(" \n ").is_none());

        let question = conversation
            .record_question("  Berapa jumlah warga? ")
            .expect("question");
        assert_eq!(question, "Berapa jumlah warga?");
        assert_eq!(conversation.messages().len(), 2);
        assert_eq!(conversation.messages()[1].text, question);

        let reply = assistant.respond(&question, &demo_residents()).await;
        let message = conversation.record_reply(reply);
        assert_eq!(message.id, 3);
        assert_eq!(message.text, "Ada 5 warga.");
        assert!(!message.is_error);
    }
}
