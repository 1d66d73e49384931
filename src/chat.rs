//! Chat-completion boundary.
//!
//! The engine core never talks to a language model; this module is the thin
//! adapter the HTTP layer uses: prompt assembly from current snapshots plus
//! one concrete client for OpenAI-compatible chat-completion APIs.

use crate::knowledge;
use crate::snapshot::Snapshot;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Reply served when no chat backend is configured or the backend errors.
pub const FALLBACK_REPLY: &str = "Я сейчас не могу сформировать ответ. \
    Актуальное расписание и цены есть на сайте студии, а администратор \
    ответит на любой вопрос — оставьте, пожалуйста, номер телефона.";

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// A capability that takes a message list and returns generated text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiChat {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Build from environment, or `None` when no API key is set.
    ///
    /// Recognized variables: `OPENAI_API_KEY`, `CHAT_BASE_URL`, `CHAT_MODEL`.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        let base_url =
            std::env::var("CHAT_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".into());
        Some(Self::new(&base_url, &api_key, &model))
    }
}

#[async_trait]
impl ChatBackend for OpenAiChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": messages,
                "temperature": 0.7,
                "max_tokens": 1000,
            }))
            .send()
            .await
            .context("chat completion request failed")?
            .error_for_status()
            .context("chat completion returned an error status")?;

        let body: Value = resp.json().await.context("invalid chat completion body")?;
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("chat completion response carried no content"))
    }
}

/// Assemble the system prompt from current client views.
pub fn system_prompt(schedule: &Snapshot, prices: &Snapshot) -> String {
    let mut prompt = String::from(
        "Ты — чат-бот студии танцев CosmoDance (cosmo.su) в Санкт-Петербурге. \
         Отвечай на вопросы про расписание, направления, возрастные группы, \
         филиалы, абонементы и организацию занятий. Пиши дружелюбно, по-русски, \
         кратко и по делу. Если чего-то не знаешь точно, предложи оставить номер \
         телефона или написать администратору.\n\n",
    );

    prompt.push_str("Актуальное расписание по филиалам:\n");
    for section in &schedule.sections {
        prompt.push_str(&format!("{}:\n", section.name));
        for entry in &section.entries {
            prompt.push_str(&format!("  - {entry}\n"));
        }
    }

    prompt.push_str("\nЦены:\n");
    for section in &prices.sections {
        prompt.push_str(&format!("{}:\n", section.name));
        for entry in &section.entries {
            prompt.push_str(&format!("  - {entry}\n"));
        }
    }

    prompt.push_str("\nНаправления студии:\n");
    prompt.push_str(&knowledge::digest());
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback;

    #[test]
    fn prompt_embeds_schedule_and_prices() {
        let prompt = system_prompt(&fallback::schedule(), &fallback::prices());
        assert!(prompt.contains("Дыбенко"));
        assert!(prompt.contains("Абонементы"));
        assert!(prompt.contains("CosmoDance"));
        assert!(prompt.contains("Hip-Hop"));
    }

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("x").role, "system");
        assert_eq!(ChatMessage::user("y").role, "user");
    }
}
