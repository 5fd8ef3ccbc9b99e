use std::collections::HashMap;
use std::fmt;

use extract::Claim;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictLabel {
    Supported,
    Contradicted,
    Unverifiable,
}

impl VerdictLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictLabel::Supported => "supported",
            VerdictLabel::Contradicted => "contradicted",
            VerdictLabel::Unverifiable => "unverifiable",
        }
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of checking one claim against its evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub claim: Claim,
    pub label: VerdictLabel,
    pub rationale: String,
    /// URLs the verdict relied on
    pub sources: Vec<String>,
}

impl Verdict {
    pub fn unverifiable(claim: &Claim, rationale: impl Into<String>) -> Self {
        Self {
            claim: claim.clone(),
            label: VerdictLabel::Unverifiable,
            rationale: rationale.into(),
            sources: Vec::new(),
        }
    }
}

/// Words models use for a verdict, mapped onto the three labels.
pub fn default_aliases() -> HashMap<String, VerdictLabel> {
    let table: &[(&str, VerdictLabel)] = &[
        ("supported", VerdictLabel::Supported),
        ("true", VerdictLabel::Supported),
        ("mostly true", VerdictLabel::Supported),
        ("confirmed", VerdictLabel::Supported),
        ("verified", VerdictLabel::Supported),
        ("accurate", VerdictLabel::Supported),
        ("correct", VerdictLabel::Supported),
        ("contradicted", VerdictLabel::Contradicted),
        ("false", VerdictLabel::Contradicted),
        ("mostly false", VerdictLabel::Contradicted),
        ("refuted", VerdictLabel::Contradicted),
        ("debunked", VerdictLabel::Contradicted),
        ("incorrect", VerdictLabel::Contradicted),
        ("inaccurate", VerdictLabel::Contradicted),
        ("unverifiable", VerdictLabel::Unverifiable),
        ("unverified", VerdictLabel::Unverifiable),
        ("partially true", VerdictLabel::Unverifiable),
        ("insufficient evidence", VerdictLabel::Unverifiable),
        ("mixed", VerdictLabel::Unverifiable),
        ("unknown", VerdictLabel::Unverifiable),
    ];

    table
        .iter()
        .map(|(word, label)| (word.to_string(), *label))
        .collect()
}

/// Map a model's label word onto the closed label set, if the table knows it.
pub fn resolve_label(raw: &str, aliases: &HashMap<String, VerdictLabel>) -> Option<VerdictLabel> {
    let wanted = normalize_label(raw);
    if let Some(label) = aliases.get(&wanted) {
        return Some(*label);
    }

    // Keys from a config file may not be in normalized form
    aliases
        .iter()
        .find(|(word, _)| normalize_label(word) == wanted)
        .map(|(_, label)| *label)
}

fn normalize_label(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['_', '-'], " ")
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
