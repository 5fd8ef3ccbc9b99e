use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use verify::{RatingThresholds, VerifyConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mode: OperationMode,
    pub http: HttpConfig,
    pub retry: RetryConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    Fast,      // Fewer claims and results, short timeouts
    Accurate,  // More claims and evidence, patient retries
    Balanced,  // Default
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

/// Bounds and tables the claim pipeline runs with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub max_claims: usize,
    pub max_results_per_claim: usize,
    pub verify: VerifyConfig,
    pub rating: RatingThresholds,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_claims: 5,
            max_results_per_claim: 5,
            verify: VerifyConfig::default(),
            rating: RatingThresholds::default(),
        }
    }
}

/// Sections a TOML config file may override on top of the mode preset.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    http: Option<HttpConfig>,
    retry: Option<RetryConfig>,
    pipeline: Option<PipelineConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: OperationMode::Balanced,
            http: HttpConfig {
                request_timeout_secs: 60,
            },
            retry: RetryConfig {
                max_retries: 3,
                initial_backoff_ms: 1000,
                max_backoff_ms: 10000,
            },
            pipeline: PipelineConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn fast_mode() -> Self {
        Self {
            mode: OperationMode::Fast,
            http: HttpConfig {
                request_timeout_secs: 30,
            },
            retry: RetryConfig {
                max_retries: 1,
                initial_backoff_ms: 500,
                max_backoff_ms: 2000,
            },
            pipeline: PipelineConfig {
                max_claims: 3,
                max_results_per_claim: 3,
                ..PipelineConfig::default()
            },
        }
    }

    pub fn accurate_mode() -> Self {
        Self {
            mode: OperationMode::Accurate,
            http: HttpConfig {
                request_timeout_secs: 120,
            },
            retry: RetryConfig {
                max_retries: 5,
                initial_backoff_ms: 2000,
                max_backoff_ms: 20000,
            },
            pipeline: PipelineConfig {
                max_claims: 8,
                max_results_per_claim: 8,
                ..PipelineConfig::default()
            },
        }
    }

    pub fn for_mode(mode: OperationMode) -> Self {
        match mode {
            OperationMode::Fast => Self::fast_mode(),
            OperationMode::Balanced => Self::default(),
            OperationMode::Accurate => Self::accurate_mode(),
        }
    }

    /// Mode preset, with any sections present in the TOML file replacing it.
    pub fn load(mode: OperationMode, path: Option<&Path>) -> Result<Self> {
        let mut config = Self::for_mode(mode);

        if let Some(path) = path {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            config.apply_toml(&raw)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
        }

        Ok(config)
    }

    fn apply_toml(&mut self, raw: &str) -> Result<()> {
        let file: ConfigFile = toml::from_str(raw)?;

        if let Some(http) = file.http {
            self.http = http;
        }
        if let Some(retry) = file.retry {
            self.retry = retry;
        }
        if let Some(mut pipeline) = file.pipeline {
            // Configured aliases extend the built-in table
            for (word, label) in verify::verdict::default_aliases() {
                pipeline.verify.label_aliases.entry(word).or_insert(label);
            }
            self.pipeline = pipeline;
        }

        anyhow::ensure!(self.pipeline.max_claims > 0, "pipeline.max_claims must be at least 1");
        anyhow::ensure!(
            self.pipeline.max_results_per_claim > 0,
            "pipeline.max_results_per_claim must be at least 1"
        );
        Ok(())
    }
}
