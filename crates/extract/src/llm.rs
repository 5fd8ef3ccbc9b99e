use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::prompt;

/// A hosted (or local) text completion model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> String;

    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(base_url: String, api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            temperature: 0.2,
            client,
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    fn name(&self) -> String {
        format!("openai/{}", self.model)
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to completion API")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Completion request failed: {}", status);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("Completion response carried no content")
    }
}

#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client,
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    fn name(&self) -> String {
        format!("ollama/{}", self.model)
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = OllamaRequest {
            model: &self.model,
            system,
            prompt,
            stream: false,
        };

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Ollama")?;

        if !response.status().is_success() {
            anyhow::bail!("Ollama request failed: {}", response.status());
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        Ok(ollama_response.response)
    }
}

/// Ask for JSON, re-prompting with a correction request when the reply does
/// not parse. Returns `Ok(None)` when every attempt produced invalid JSON; the
/// last raw reply is handed back so callers can salvage it.
pub async fn complete_json(
    model: &dyn LanguageModel,
    system: &str,
    prompt: &str,
    max_attempts: usize,
) -> Result<(Option<serde_json::Value>, String)> {
    let mut reply = model.complete(system, prompt).await?;

    for attempt in 0..max_attempts.max(1) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(strip_code_fences(&reply)) {
            return Ok((Some(value), reply));
        }

        if attempt + 1 < max_attempts {
            tracing::debug!(attempt = attempt + 1, "Model reply was not valid JSON, asking for a fix");
            reply = model
                .complete(system, &prompt::build_retry_prompt(&reply))
                .await?;
        }
    }

    Ok((None, reply))
}

/// Models like to wrap JSON in markdown fences even when told not to.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedModel;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_complete_json_recovers_after_correction() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let model = ScriptedModel::new(move |_system, _prompt| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Ok(if n == 0 { "{claims: oops".to_string() } else { "{\"claims\": []}".to_string() })
        });

        let (value, _) = complete_json(&model, "system", "prompt", 3).await.unwrap();

        assert_eq!(value, Some(serde_json::json!({ "claims": [] })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_complete_json_gives_back_raw_reply() {
        let model = ScriptedModel::reply("1. Water is wet.");

        let (value, raw) = complete_json(&model, "system", "prompt", 2).await.unwrap();

        assert!(value.is_none());
        assert_eq!(raw, "1. Water is wet.");
    }
}
