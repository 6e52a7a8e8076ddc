// 7.0 config.rs: vault settings in one place. market binding plus engine knobs.
// loaded from JSON and validated before a vault is built from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::EngineConfig;
use crate::market::Market;
use crate::types::{AssetId, ClaimId, MarketId, UserId};

// Complete configuration for one vault instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    pub market: Market,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            market: Market::new(MarketId(1), ClaimId(1), ClaimId(2), AssetId(1), UserId(1_000_000)),
            engine: EngineConfig::default(),
        }
    }
}

impl VaultConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: VaultConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.yes_claim == self.market.no_claim {
            return Err(ConfigError::InvalidMarket {
                reason: "YES and NO claim ids must differ".to_string(),
            });
        }

        if self.market.collateral.0 == 0 {
            return Err(ConfigError::InvalidMarket {
                reason: "Collateral asset must be set".to_string(),
            });
        }

        if self.engine.max_events == 0 {
            return Err(ConfigError::InvalidEngine {
                reason: "Event log needs room for at least one event".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid market binding: {reason}")]
    InvalidMarket { reason: String },

    #[error("invalid engine settings: {reason}")]
    InvalidEngine { reason: String },

    #[error("config parse error: {0}")]
    Parse(String),
}

// Environment presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Testnet,
    Mainnet,
}

impl Environment {
    pub fn config(&self) -> VaultConfig {
        let mut config = VaultConfig::default();
        match self {
            Environment::Development => {
                config.engine.verbose = true;
            }
            Environment::Testnet => {
                config.engine.max_events = 10_000;
            }
            Environment::Mainnet => {
                config.engine.max_events = 100_000;
                config.engine.verbose = false;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        assert!(VaultConfig::default().validate().is_ok());
    }

    #[test]
    fn environment_presets_valid() {
        assert!(Environment::Development.config().validate().is_ok());
        assert!(Environment::Testnet.config().validate().is_ok());
        assert!(Environment::Mainnet.config().validate().is_ok());
        assert!(Environment::Development.config().engine.verbose);
    }

    #[test]
    fn duplicate_claim_ids_rejected() {
        let mut config = VaultConfig::default();
        config.market.no_claim = config.market.yes_claim;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMarket { .. })));
    }

    #[test]
    fn zero_event_log_rejected() {
        let mut config = VaultConfig::default();
        config.engine.max_events = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidEngine { .. })));
    }

    #[test]
    fn json_round_trip() {
        let config = Environment::Testnet.config();
        let json = config.to_json_string().unwrap();
        let back = VaultConfig::from_json_str(&json).unwrap();
        assert_eq!(back.market, config.market);
        assert_eq!(back.engine.max_events, 10_000);
    }

    #[test]
    fn engine_section_optional() {
        let json = r#"{
            "market": {
                "id": 42,
                "yes_claim": 7,
                "no_claim": 8,
                "collateral": 1,
                "vault_address": 500
            }
        }"#;
        let config = VaultConfig::from_json_str(json).unwrap();
        assert_eq!(config.market.id, MarketId(42));
        assert_eq!(config.engine.max_events, EngineConfig::default().max_events);
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            VaultConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
