use std::collections::HashMap;
use std::sync::Arc;

use extract::{Claim, LanguageModel, llm};
use regex::Regex;
use research::Evidence;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompt;
use crate::verdict::{Verdict, VerdictLabel, default_aliases, resolve_label};

const JSON_ATTEMPTS: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Model label words and the verdict each one means
    pub label_aliases: HashMap<String, VerdictLabel>,
    pub max_snippet_chars: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            label_aliases: default_aliases(),
            max_snippet_chars: 400,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VerdictReply {
    #[serde(alias = "verdict", alias = "verification", alias = "status")]
    label: String,
    #[serde(default, alias = "explanation", alias = "reason", alias = "evidence")]
    rationale: String,
    #[serde(default)]
    sources: Vec<String>,
}

/// Fourth pipeline step: judge each claim against its evidence.
///
/// Verification never fails the request. Missing evidence, an unreachable
/// model or an unreadable reply all come out as an `unverifiable` verdict.
pub struct ClaimVerifier {
    model: Arc<dyn LanguageModel>,
    config: VerifyConfig,
}

impl ClaimVerifier {
    pub fn new(model: Arc<dyn LanguageModel>, config: VerifyConfig) -> Self {
        Self { model, config }
    }

    pub async fn verify(&self, claim: &Claim, evidence: &Evidence) -> Verdict {
        if evidence.is_empty() {
            let rationale = match &evidence.search_error {
                Some(_) => "The evidence search failed, so this claim could not be checked.",
                None => "No relevant evidence was found for this claim.",
            };
            return Verdict::unverifiable(claim, rationale);
        }

        let prompt = prompt::build_verification_prompt(&claim.text, evidence, self.config.max_snippet_chars);
        let (json, raw) = match llm::complete_json(self.model.as_ref(), prompt::VERIFY_SYSTEM, &prompt, JSON_ATTEMPTS).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(claim = %claim.text, error = %e, "Verification model call failed");
                return Verdict::unverifiable(claim, "The verification service was unavailable for this claim.");
            }
        };

        let Some(reply) = self.read_reply(json, &raw) else {
            tracing::warn!(claim = %claim.text, "Could not read a verdict from the model reply");
            return Verdict::unverifiable(claim, "The verification result could not be interpreted.");
        };

        let Some(label) = resolve_label(&reply.label, &self.config.label_aliases) else {
            tracing::warn!(claim = %claim.text, label = %reply.label, "Unknown verdict label");
            return Verdict::unverifiable(claim, "The verification result could not be interpreted.");
        };

        let sources = cited_sources(&reply.sources, evidence, label);
        let rationale = match reply.rationale.trim() {
            "" => format!("Search results judged the claim {}.", label),
            text => text.to_string(),
        };

        tracing::debug!(claim = %claim.text, %label, "Claim verified");

        Verdict {
            claim: claim.clone(),
            label,
            rationale,
            sources,
        }
    }

    fn read_reply(&self, json: Option<Value>, raw: &str) -> Option<VerdictReply> {
        if let Some(value) = json {
            return serde_json::from_value(value).ok();
        }

        // Prose replies in the "Verification: True" style
        let line = Regex::new(r"(?im)^\W*(?:verification|verdict|label)\W*:\s*\**([a-z _-]+?)\**\s*(?:[-(.].*)?$").unwrap();
        let caps = line.captures(raw)?;
        Some(VerdictReply {
            label: caps.get(1)?.as_str().to_string(),
            rationale: String::new(),
            sources: Vec::new(),
        })
    }
}

/// Keep the URLs the model cited that really were in the evidence; a decided
/// verdict that cites nothing is taken to rest on all of it.
fn cited_sources(cited: &[String], evidence: &Evidence, label: VerdictLabel) -> Vec<String> {
    let known = evidence.urls();
    let sources: Vec<String> = cited
        .iter()
        .filter(|url| known.iter().any(|k| k == *url))
        .cloned()
        .collect();

    if sources.is_empty() && label != VerdictLabel::Unverifiable {
        known
    } else {
        sources
    }
}
