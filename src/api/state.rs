use std::sync::Arc;

use crate::config::Config;
use crate::services::{Clock, ScoringEngine, SystemClock};

/// Shared application state
///
/// Everything here is read-only after startup, so requests never contend.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ScoringEngine>,
    pub clock: Arc<dyn Clock>,
    pub default_requested_items: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ScoringEngine::default())
    }
}

impl AppState {
    /// Creates state around `engine` using the system clock
    pub fn new(engine: ScoringEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            clock: Arc::new(SystemClock),
            default_requested_items: 3,
        }
    }

    /// Builds state from loaded configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.scoring_engine()?)
            .with_default_requested_items(config.default_requested_items))
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_default_requested_items(mut self, count: usize) -> Self {
        self.default_requested_items = count;
        self
    }
}
