use serde::{Deserialize, Serialize};

/// An atomic factual statement pulled out of the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    pub rationale: Option<String>,
    /// Byte offset into the narrative text, when the claim appears there verbatim
    pub offset: Option<usize>,
}

impl Claim {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rationale: None,
            offset: None,
        }
    }
}

/// Shape the model is asked to produce for claim identification.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimList {
    #[serde(default)]
    pub claims: Vec<RawClaim>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawClaim {
    Detailed {
        #[serde(alias = "text", alias = "statement")]
        claim: String,
        #[serde(default, alias = "explanation", alias = "reason")]
        rationale: Option<String>,
    },
    Plain(String),
}

impl RawClaim {
    pub fn into_parts(self) -> (String, Option<String>) {
        match self {
            RawClaim::Detailed { claim, rationale } => (claim, rationale),
            RawClaim::Plain(claim) => (claim, None),
        }
    }
}
