mod config;
mod error;
mod metrics;
mod pipeline;
mod render;
mod retry;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use acquire::ContentAcquirer;
use anyhow::{Context, Result};
use clap::Parser;
use extract::{LanguageModel, OllamaClient, OpenAiClient};
use research::DuckDuckGoSearch;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, OperationMode};
use crate::metrics::Metrics;
use crate::pipeline::FactCheckPipeline;
use crate::retry::{RetryPolicy, RetryingModel};
use crate::routes::AppState;

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
enum Provider {
    Openai,
    Ollama,
}

#[derive(Debug, Parser)]
#[command(name = "factcheck", about = "Fact-check articles and text against web evidence")]
struct Args {
    /// Address to serve the web UI and API on
    #[arg(long, env = "FACTCHECK_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    #[arg(long, value_enum, env = "FACTCHECK_MODE", default_value = "balanced")]
    mode: OperationMode,

    /// TOML file overriding the mode preset
    #[arg(long, env = "FACTCHECK_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, env = "FACTCHECK_PROVIDER", default_value = "openai")]
    provider: Provider,

    #[arg(long, env = "FACTCHECK_MODEL", default_value = "gpt-4-turbo")]
    model: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    openai_base_url: String,

    #[arg(long, env = "OLLAMA_BASE_URL", default_value = "http://localhost:11434")]
    ollama_base_url: String,

    #[arg(long, env = "FIRECRAWL_API_KEY", hide_env_values = true)]
    firecrawl_api_key: Option<String>,

    #[arg(long, env = "FIRECRAWL_BASE_URL")]
    firecrawl_base_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = AppConfig::load(args.mode, args.config.as_deref())?;
    tracing::info!(
        mode = ?config.mode,
        max_claims = config.pipeline.max_claims,
        max_results = config.pipeline.max_results_per_claim,
        "Configuration loaded"
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let model = build_model(&args, client.clone())?;
    let model_name = model.name();
    let model: Arc<dyn LanguageModel> = Arc::new(RetryingModel::new(model, RetryPolicy::from(&config.retry)));

    let acquirer = ContentAcquirer::from_key(
        args.firecrawl_api_key.clone(),
        args.firecrawl_base_url.clone(),
        client.clone(),
    );

    let metrics = Metrics::new();
    let pipeline = FactCheckPipeline::new(
        &config.pipeline,
        acquirer,
        model,
        Arc::new(DuckDuckGoSearch::new(client)),
        metrics.clone(),
    );

    let state = Arc::new(AppState {
        pipeline,
        metrics,
        model_name,
    });
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;

    tracing::info!("Server listening on http://{}", args.bind);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn build_model(args: &Args, client: reqwest::Client) -> Result<Arc<dyn LanguageModel>> {
    match args.provider {
        Provider::Openai => {
            let key = args
                .openai_api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .context("OPENAI_API_KEY is required for the openai provider")?;
            Ok(Arc::new(OpenAiClient::new(
                args.openai_base_url.clone(),
                key,
                args.model.clone(),
                client,
            )))
        }
        Provider::Ollama => Ok(Arc::new(OllamaClient::new(
            args.ollama_base_url.clone(),
            args.model.clone(),
            client,
        ))),
    }
}
