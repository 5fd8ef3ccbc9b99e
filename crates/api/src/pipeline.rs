use std::sync::Arc;

use acquire::{AcquireError, ContentAcquirer, SourceContent};
use extract::{ExtractError, Extractor, ExtractorConfig, LanguageModel};
use research::{ResearchConfig, Researcher, SearchProvider};
use verify::{ClaimVerifier, Report, Summarizer};

use crate::config::PipelineConfig;
use crate::metrics::{Metrics, Stage, TimedOperation};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Acquire(#[from] AcquireError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Acquire, extract, identify claims, research, verify and summarize,
/// strictly one step after another for each request.
pub struct FactCheckPipeline {
    acquirer: ContentAcquirer,
    extractor: Extractor,
    researcher: Researcher,
    verifier: ClaimVerifier,
    summarizer: Summarizer,
    metrics: Arc<Metrics>,
}

impl FactCheckPipeline {
    pub fn new(
        config: &PipelineConfig,
        acquirer: ContentAcquirer,
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn SearchProvider>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            acquirer,
            extractor: Extractor::new(
                model.clone(),
                ExtractorConfig {
                    max_claims: config.max_claims,
                },
            ),
            researcher: Researcher::new(
                search,
                ResearchConfig {
                    max_results_per_claim: config.max_results_per_claim,
                },
            ),
            verifier: ClaimVerifier::new(model.clone(), config.verify.clone()),
            summarizer: Summarizer::new(model, config.rating.clone()),
            metrics,
        }
    }

    pub fn has_scraper(&self) -> bool {
        self.acquirer.has_primary()
    }

    pub fn search_provider(&self) -> &'static str {
        self.researcher.provider_name()
    }

    pub async fn check_url(&self, url: &str) -> Result<Report, PipelineError> {
        let timer = TimedOperation::start();
        let acquired = self.acquirer.acquire(url).await;
        self.metrics.record_stage(Stage::Acquire, timer.elapsed());

        self.run(acquired?).await
    }

    pub async fn check_text(&self, text: &str) -> Result<Report, PipelineError> {
        self.run(SourceContent::from_text(text)).await
    }

    async fn run(&self, source: SourceContent) -> Result<Report, PipelineError> {
        tracing::info!(
            source_id = %source.id,
            origin = source.origin.label(),
            tokens = source.estimated_tokens(),
            "Fact check started"
        );

        let timer = TimedOperation::start();
        let text = self.extractor.extract_content(&source).await;
        self.metrics.record_stage(Stage::Extract, timer.elapsed());
        let text = text?;

        let timer = TimedOperation::start();
        let claims = self.extractor.identify_claims(&text).await;
        self.metrics.record_stage(Stage::Claims, timer.elapsed());
        let claims = claims?;

        let mut verdicts = Vec::with_capacity(claims.len());
        for claim in &claims {
            let timer = TimedOperation::start();
            let evidence = self.researcher.gather(claim).await;
            self.metrics.record_stage(Stage::Research, timer.elapsed());

            let timer = TimedOperation::start();
            verdicts.push(self.verifier.verify(claim, &evidence).await);
            self.metrics.record_stage(Stage::Verify, timer.elapsed());
        }

        let timer = TimedOperation::start();
        let report = self.summarizer.summarize(&source, verdicts).await;
        self.metrics.record_stage(Stage::Summarize, timer.elapsed());
        self.metrics.record_verdicts(&report.tally);

        Ok(report)
    }
}
