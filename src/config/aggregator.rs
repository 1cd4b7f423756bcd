// src/config/aggregator.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::bucket::TimeUnit;
use crate::pipeline::PipelineOptions;

pub const ENV_CONFIG_PATH: &str = "AGGREGATOR_CONFIG_PATH";
pub const ENV_INPUT_FILE: &str = "AGGREGATOR_INPUT_FILE";
pub const ENV_OUTPUT_FILE: &str = "AGGREGATOR_OUTPUT_FILE";
pub const ENV_WINDOW_SIZE: &str = "AGGREGATOR_WINDOW_SIZE";
pub const ENV_UNIT_SECS: &str = "AGGREGATOR_UNIT_SECS";

pub const DEFAULT_CONFIG_TOML: &str = "config/aggregator.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/aggregator.json";

fn default_input_file() -> PathBuf {
    PathBuf::from("events.json")
}
fn default_output_file() -> PathBuf {
    PathBuf::from("aggregated_events.out.json")
}
fn default_window_size() -> usize {
    10
}
fn default_unit_secs() -> u64 {
    60
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    #[serde(default = "default_input_file")]
    pub input_file: PathBuf,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    /// Moving-average window, in buckets.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Bucket width in seconds.
    #[serde(default = "default_unit_secs")]
    pub unit_secs: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            input_file: default_input_file(),
            output_file: default_output_file(),
            window_size: default_window_size(),
            unit_secs: default_unit_secs(),
        }
    }
}

impl AggregatorConfig {
    /// Load from an explicit path. TOML or JSON, picked by extension with a
    /// fallback to the other format.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&data, &ext).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load using env var + fallbacks:
    /// 1) $AGGREGATOR_CONFIG_PATH
    /// 2) config/aggregator.toml
    /// 3) config/aggregator.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
            }
            return Self::load_from_file(&pb);
        }
        for candidate in [DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_JSON] {
            let pb = PathBuf::from(candidate);
            if pb.exists() {
                return Self::load_from_file(&pb);
            }
        }
        Ok(Self::default())
    }

    /// Override fields from `AGGREGATOR_*` env vars when set.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(v) = env::var(ENV_INPUT_FILE) {
            self.input_file = PathBuf::from(v);
        }
        if let Ok(v) = env::var(ENV_OUTPUT_FILE) {
            self.output_file = PathBuf::from(v);
        }
        if let Ok(v) = env::var(ENV_WINDOW_SIZE) {
            self.window_size = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_WINDOW_SIZE}={v:?} is not a valid integer"))?;
        }
        if let Ok(v) = env::var(ENV_UNIT_SECS) {
            self.unit_secs = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_UNIT_SECS}={v:?} is not a valid integer"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size < 1 {
            bail!("window_size must be at least 1, got {}", self.window_size);
        }
        if self.unit_secs < 1 {
            bail!("unit_secs must be at least 1, got {}", self.unit_secs);
        }
        Ok(())
    }

    pub fn pipeline_options(&self) -> Result<PipelineOptions> {
        self.validate()?;
        let unit = TimeUnit::from_secs(self.unit_secs).map_err(|e| anyhow!(e))?;
        Ok(PipelineOptions {
            unit,
            window_size: self.window_size,
        })
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AggregatorConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("invalid JSON config");
    }
    match toml::from_str(s) {
        Ok(cfg) => Ok(cfg),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!(toml_err))
            .context("invalid TOML config"),
    }
}
