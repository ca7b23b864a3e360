use anyhow::{bail, Context};
use serde::Deserialize;

use crate::models::WeightTable;
use crate::services::{ScoringEngine, DEFAULT_HALF_LIFE_DAYS};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Days after which an event's contribution halves
    #[serde(default = "default_half_life_days")]
    pub half_life_days: f64,

    /// Result count used when `requestedItems` is absent or not a number
    #[serde(default = "default_requested_items")]
    pub default_requested_items: usize,

    /// JSON object of event name to weight, replacing the built-in table
    #[serde(default)]
    pub event_weights: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_half_life_days() -> f64 {
    DEFAULT_HALF_LIFE_DAYS
}

fn default_requested_items() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            half_life_days: default_half_life_days(),
            default_requested_items: default_requested_items(),
            event_weights: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the scoring engine cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.half_life_days.is_finite() || self.half_life_days <= 0.0 {
            bail!(
                "HALF_LIFE_DAYS must be a positive number, got {}",
                self.half_life_days
            );
        }
        self.weight_table()?;
        Ok(())
    }

    /// Weight table from `EVENT_WEIGHTS`, or the built-in one
    pub fn weight_table(&self) -> anyhow::Result<WeightTable> {
        match &self.event_weights {
            Some(raw) => WeightTable::from_json(raw).context("EVENT_WEIGHTS is not a valid JSON map"),
            None => Ok(WeightTable::default()),
        }
    }

    pub fn scoring_engine(&self) -> anyhow::Result<ScoringEngine> {
        Ok(ScoringEngine::new(self.weight_table()?, self.half_life_days))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
