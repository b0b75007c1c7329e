//! Bus configuration and construction.
//!
//! The host application decides how the history bound is supplied and how
//! long the bus lives. This module only validates the setting and builds
//! bus instances from it.

use crate::bus::Bus;
use crate::error::{BusError, Result};
use serde::{Deserialize, Serialize};

/// History bound used when none is configured.
pub const DEFAULT_MAX_HISTORY: usize = 10;

/// Bus configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBusConfig")]
pub struct BusConfig {
    /// Messages kept per channel for late subscribers. `0` disables history.
    pub max_history: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

impl BusConfig {
    /// Build a config from a signed history bound, rejecting negatives.
    pub fn with_max_history(max_history: i64) -> Result<Self> {
        let max_history = usize::try_from(max_history).map_err(|_| {
            BusError::InvalidConfig(format!(
                "max_history must be zero or positive, got {}",
                max_history
            ))
        })?;
        Ok(Self { max_history })
    }

    /// Parse a JSON document such as `{"max_history": 5}`.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawBusConfig = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Whether messages are retained at all.
    pub fn history_enabled(&self) -> bool {
        self.max_history > 0
    }
}

/// Unvalidated form, so negative bounds surface as config errors rather
/// than type errors.
#[derive(Deserialize)]
struct RawBusConfig {
    #[serde(default = "default_max_history")]
    max_history: i64,
}

fn default_max_history() -> i64 {
    DEFAULT_MAX_HISTORY as i64
}

impl TryFrom<RawBusConfig> for BusConfig {
    type Error = BusError;

    fn try_from(raw: RawBusConfig) -> Result<Self> {
        BusConfig::with_max_history(raw.max_history)
    }
}

/// Builds bus instances from a validated configuration.
///
/// Singleton lifetime is up to the caller; every `build` returns an
/// independent bus with its own channels and id counter.
#[derive(Clone, Debug, Default)]
pub struct BusFactory {
    config: BusConfig,
}

impl BusFactory {
    pub fn new(config: BusConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Construct a new bus.
    pub fn build<V>(&self) -> Bus<V>
    where
        V: Send + Sync + 'static,
    {
        Bus::new(self.config.clone())
    }
}

/// Set the history bound for buses built by the returned factory.
pub fn configure(max_history: i64) -> Result<BusFactory> {
    Ok(BusFactory::new(BusConfig::with_max_history(max_history)?))
}
