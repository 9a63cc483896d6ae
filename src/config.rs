use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{AccountCurrency, Broker, PayoutEngine, RuleRevision};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub broker: Broker,
    pub currency: AccountCurrency,
    #[serde(default = "default_revision")]
    pub revision: RuleRevision,
}

fn default_revision() -> RuleRevision {
    RuleRevision::Current
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {path}"))?;
        toml::from_str(&text).with_context(|| "parsing config TOML")
    }
}

impl EngineConfig {
    pub fn build(&self) -> PayoutEngine {
        self.broker.engine(self.currency, self.revision)
    }
}
