pub mod claims;
pub mod llm;
pub mod mock;
pub mod normalizer;
pub mod prompt;
pub mod schema;

pub use llm::{LanguageModel, OllamaClient, OpenAiClient};
pub use normalizer::ClaimNormalizer;
pub use schema::Claim;

use std::sync::Arc;

use acquire::{Origin, SourceContent};

const JSON_ATTEMPTS: usize = 3;

const NEWS_HOSTS: &[&str] = &["bbc.com", "bbc.co.uk", "reuters.com", "apnews.com", "theguardian.com"];

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Nothing usable to fact-check.
    #[error("content is empty or unusable")]
    Empty,

    #[error("no verifiable factual claims found")]
    NoClaimsFound,

    #[error("language model call failed: {0:#}")]
    Model(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub max_claims: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self { max_claims: 5 }
    }
}

/// First two pipeline steps: clean the source, then pull out checkable claims.
pub struct Extractor {
    model: Arc<dyn LanguageModel>,
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(model: Arc<dyn LanguageModel>, config: ExtractorConfig) -> Self {
        Self { model, config }
    }

    /// Produce the narrative text the rest of the pipeline works from.
    ///
    /// Scraped pages go through the model to shed page furniture; pasted text
    /// is already what the user wants checked and is only whitespace-tidied.
    pub async fn extract_content(&self, source: &SourceContent) -> Result<String, ExtractError> {
        if source.body.trim().is_empty() {
            return Err(ExtractError::Empty);
        }

        let cleaned = match &source.origin {
            Origin::Text => tidy_whitespace(&source.body),
            Origin::Url(_) => {
                let hint = source_hint(source.host().as_deref());
                let prompt = prompt::build_extraction_prompt(&source.body, hint);
                let reply = self.model.complete(prompt::EXTRACTION_SYSTEM, &prompt).await?;
                tidy_whitespace(&reply)
            }
        };

        if cleaned.is_empty() {
            return Err(ExtractError::Empty);
        }

        tracing::info!(source_id = %source.id, chars = cleaned.len(), "Content extracted");
        Ok(cleaned)
    }

    /// Identify up to `max_claims` distinct factual claims in `text`.
    pub async fn identify_claims(&self, text: &str) -> Result<Vec<Claim>, ExtractError> {
        if text.trim().is_empty() {
            return Err(ExtractError::Empty);
        }

        let prompt = prompt::build_claims_prompt(text, self.config.max_claims);
        let (json, raw) =
            llm::complete_json(self.model.as_ref(), prompt::CLAIMS_SYSTEM, &prompt, JSON_ATTEMPTS).await?;

        if json.is_none() {
            tracing::warn!("Claim list never parsed as JSON, reading it as a plain list");
        }

        let mut normalizer = ClaimNormalizer::new();
        let claims: Vec<Claim> = claims::parse_claims(json, &raw)
            .into_iter()
            .filter(|(claim, _)| normalizer.admit(claim))
            .take(self.config.max_claims)
            .map(|(claim, rationale)| Claim {
                offset: claims::locate(text, &claim),
                text: claim,
                rationale,
            })
            .collect();

        if claims.is_empty() {
            return Err(ExtractError::NoClaimsFound);
        }

        tracing::info!(claims = claims.len(), "Claims identified");
        Ok(claims)
    }
}

fn tidy_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|para| !para.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn source_hint(host: Option<&str>) -> Option<&'static str> {
    let host = host?;
    NEWS_HOSTS
        .iter()
        .any(|news| host == *news || host.ends_with(&format!(".{}", news)))
        .then_some(
            "This is a news article from a mainstream outlet. Keep every statement about \
             events, statistics and attributions.",
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedModel;
    use acquire::Page;

    fn extractor(model: ScriptedModel) -> Extractor {
        Extractor::new(Arc::new(model), ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_empty_text_is_extraction_error() {
        let extractor = extractor(ScriptedModel::failing("should not be called"));

        let err = extractor.extract_content(&SourceContent::from_text("   \n ")).await.unwrap_err();
        assert!(matches!(err, ExtractError::Empty));

        let err = extractor.extract_content(&SourceContent::from_text("")).await.unwrap_err();
        assert!(matches!(err, ExtractError::Empty));
    }

    #[tokio::test]
    async fn test_text_input_skips_model() {
        let extractor = extractor(ScriptedModel::failing("should not be called"));

        let text = extractor
            .extract_content(&SourceContent::from_text("  The Earth   orbits the Sun.  "))
            .await
            .unwrap();

        assert_eq!(text, "The Earth orbits the Sun.");
    }

    #[tokio::test]
    async fn test_url_input_is_cleaned_by_model_with_hint() {
        let model = ScriptedModel::new(|system, prompt| {
            assert_eq!(system, prompt::EXTRACTION_SYSTEM);
            assert!(prompt.contains("SOURCE NOTE"));
            Ok("Storm floods town.\n\nHundreds evacuated.".to_string())
        });
        let source = SourceContent::from_page(
            "https://www.bbc.com/news/uk-1",
            Page::new("Home | News\nStorm floods town.\nHundreds evacuated."),
            "html",
        );

        let text = extractor(model).extract_content(&source).await.unwrap();

        assert_eq!(text, "Storm floods town.\n\nHundreds evacuated.");
    }

    #[tokio::test]
    async fn test_blank_model_output_is_extraction_error() {
        let source = SourceContent::from_page("https://example.org/a", Page::new("page"), "html");
        let err = extractor(ScriptedModel::reply("  \n "))
            .extract_content(&source)
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Empty));
    }

    #[tokio::test]
    async fn test_single_sentence_yields_one_claim() {
        let model = ScriptedModel::reply(
            r#"{"claims": [{"claim": "The Earth orbits the Sun.", "rationale": "Checkable astronomy"}]}"#,
        );

        let claims = extractor(model).identify_claims("The Earth orbits the Sun.").await.unwrap();

        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].text, "The Earth orbits the Sun.");
        assert_eq!(claims[0].offset, Some(0));
    }

    #[tokio::test]
    async fn test_claims_are_deduplicated_and_capped() {
        let model = ScriptedModel::reply(
            r#"{"claims": ["A was founded in 1901.", "A was founded in 1901", "B has 300 staff.", "C won in 2010.", "D sold 5 units."]}"#,
        );
        let extractor = Extractor::new(Arc::new(model), ExtractorConfig { max_claims: 3 });

        let claims = extractor.identify_claims("some article").await.unwrap();

        let texts: Vec<_> = claims.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["A was founded in 1901.", "B has 300 staff.", "C won in 2010."]);
    }

    #[tokio::test]
    async fn test_no_claims_found() {
        let model = ScriptedModel::reply(r#"{"claims": []}"#);

        let err = extractor(model).identify_claims("I think it is lovely.").await.unwrap_err();

        assert!(matches!(err, ExtractError::NoClaimsFound));
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let err = extractor(ScriptedModel::failing("connection refused"))
            .identify_claims("The Earth orbits the Sun.")
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Model(_)));
    }
}
