use anyhow::Result;
use async_trait::async_trait;

use crate::llm::LanguageModel;

type Script = dyn Fn(&str, &str) -> Result<String> + Send + Sync;

/// Language model backed by a closure over `(system, prompt)`, for offline runs.
pub struct ScriptedModel {
    script: Box<Script>,
}

impl ScriptedModel {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&str, &str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
        }
    }

    /// Always answers with the same text.
    pub fn reply(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_, _| Ok(text.clone()))
    }

    /// Always fails, as an unreachable provider would.
    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_, _| Err(anyhow::anyhow!(message.clone())))
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> String {
        "scripted".to_string()
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        (self.script)(system, prompt)
    }
}
