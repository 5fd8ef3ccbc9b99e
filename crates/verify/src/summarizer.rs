use std::sync::Arc;

use acquire::SourceContent;
use extract::{LanguageModel, llm};
use serde::Deserialize;

use crate::prompt;
use crate::report::{Assessment, CredibilityRating, RatingThresholds, Report, Tally};
use crate::verdict::Verdict;

const JSON_ATTEMPTS: usize = 2;

#[derive(Debug, Deserialize)]
struct SummaryReply {
    #[serde(alias = "overall_assessment")]
    summary: String,
    #[serde(default)]
    recommendations: Vec<String>,
}

/// Last pipeline step: fold verdicts into a reader-facing report.
///
/// The rating is computed here, not by the model; the model only writes the
/// prose around it.
pub struct Summarizer {
    model: Arc<dyn LanguageModel>,
    thresholds: RatingThresholds,
}

impl Summarizer {
    pub fn new(model: Arc<dyn LanguageModel>, thresholds: RatingThresholds) -> Self {
        Self { model, thresholds }
    }

    pub async fn summarize(&self, source: &SourceContent, verdicts: Vec<Verdict>) -> Report {
        let tally = Tally::from_verdicts(&verdicts);
        let rating = self.thresholds.rate(&tally);
        let label = source.origin.label().to_string();

        let (summary, recommendations) = match self.narrate(&label, &verdicts, &tally, rating).await {
            Some(reply) => reply,
            None => (
                template_summary(&label, &tally, rating),
                template_recommendations(rating),
            ),
        };

        tracing::info!(
            source_id = %source.id,
            claims = tally.total(),
            rating = rating.label(),
            "Report ready"
        );

        Report {
            source_id: source.id.clone(),
            source: label,
            title: source.title.clone(),
            verdicts,
            tally,
            rating,
            assessment: Assessment::from(rating),
            summary,
            recommendations,
        }
    }

    async fn narrate(
        &self,
        label: &str,
        verdicts: &[Verdict],
        tally: &Tally,
        rating: CredibilityRating,
    ) -> Option<(String, Vec<String>)> {
        let prompt = prompt::build_summary_prompt(label, verdicts, tally, rating);

        let (json, _) = match llm::complete_json(self.model.as_ref(), prompt::SUMMARY_SYSTEM, &prompt, JSON_ATTEMPTS).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Summary model call failed, using template");
                return None;
            }
        };

        let reply: SummaryReply = serde_json::from_value(json?).ok()?;
        let summary = reply.summary.trim().to_string();
        if summary.is_empty() {
            return None;
        }

        let recommendations: Vec<String> = reply
            .recommendations
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        if recommendations.is_empty() {
            Some((summary, template_recommendations(rating)))
        } else {
            Some((summary, recommendations))
        }
    }
}

fn template_summary(source: &str, tally: &Tally, rating: CredibilityRating) -> String {
    let origin = if source == "text" {
        "the provided text".to_string()
    } else {
        source.to_string()
    };

    format!(
        "Based on the provided content from {}: {} claim(s) were checked. {} supported, {} contradicted \
         and {} could not be verified against available sources. Overall credibility: {}.",
        origin,
        tally.total(),
        tally.supported,
        tally.contradicted,
        tally.unverifiable,
        rating.label()
    )
}

fn template_recommendations(rating: CredibilityRating) -> Vec<String> {
    let advice = match rating {
        CredibilityRating::HighlyCredible => {
            "The checked claims are backed by independent sources, though it is still worth reading other coverage."
        }
        CredibilityRating::MostlyCredible => {
            "Most claims hold up; double-check any that were not supported before relying on them."
        }
        CredibilityRating::SomewhatCredible => {
            "Many claims could not be confirmed. Cross-reference with other reputable sources before sharing."
        }
        CredibilityRating::NotCredible => {
            "Key claims are contradicted by other sources. Treat this content with strong caution."
        }
    };

    vec![advice.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::VerdictLabel;
    use extract::Claim;
    use extract::mock::ScriptedModel;

    fn verdict(text: &str, label: VerdictLabel) -> Verdict {
        Verdict {
            claim: Claim::new(text),
            label,
            rationale: "because".to_string(),
            sources: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_summary_from_model() {
        let model = ScriptedModel::reply(
            r#"{"summary": "The text makes one accurate astronomical claim.", "recommendations": ["Fine to share."]}"#,
        );
        let summarizer = Summarizer::new(Arc::new(model), RatingThresholds::default());
        let source = SourceContent::from_text("The Earth orbits the Sun.");

        let report = summarizer
            .summarize(&source, vec![verdict("The Earth orbits the Sun.", VerdictLabel::Supported)])
            .await;

        assert_eq!(report.source, "text");
        assert_eq!(report.source_id, source.id);
        assert_eq!(report.rating, CredibilityRating::HighlyCredible);
        assert_eq!(report.assessment, Assessment::Real);
        assert_eq!(report.summary, "The text makes one accurate astronomical claim.");
        assert_eq!(report.recommendations, vec!["Fine to share."]);
    }

    #[tokio::test]
    async fn test_model_failure_uses_template() {
        let summarizer = Summarizer::new(Arc::new(ScriptedModel::failing("offline")), RatingThresholds::default());
        let source = SourceContent::from_text("Claims.");
        let verdicts = vec![
            verdict("A", VerdictLabel::Contradicted),
            verdict("B", VerdictLabel::Contradicted),
            verdict("C", VerdictLabel::Unverifiable),
        ];

        let report = summarizer.summarize(&source, verdicts).await;

        assert_eq!(report.tally.contradicted, 2);
        assert_eq!(report.rating, CredibilityRating::NotCredible);
        assert_eq!(report.assessment, Assessment::Fake);
        assert!(report.summary.starts_with("Based on the provided content from the provided text"));
        assert!(report.summary.contains("Not Credible"));
        assert_eq!(report.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_summary_uses_template() {
        let summarizer = Summarizer::new(Arc::new(ScriptedModel::reply("Looks fine to me.")), RatingThresholds::default());
        let source = SourceContent::from_text("Claims.");

        let report = summarizer
            .summarize(&source, vec![verdict("A", VerdictLabel::Unverifiable)])
            .await;

        assert_eq!(report.assessment, Assessment::Uncertain);
        assert!(report.summary.contains("Somewhat Credible"));
    }
}
