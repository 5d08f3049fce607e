use crate::core::SimplifyStrategy;
use crate::error::SettlementError;
use dotenv::dotenv;
use std::env;

pub const DEFAULT_MAX_GROUP_SIZE: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub strategy: SimplifyStrategy,
    /// Net confirmed recorded settlements against expense balances.
    pub net_recorded_settlements: bool,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: SimplifyStrategy::Greedy,
            net_recorded_settlements: true,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Reads `SETTLE_*` variables, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self, SettlementError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettlementError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_group_size = match lookup("SETTLE_MAX_GROUP_SIZE") {
            Some(v) => v.trim().parse::<usize>().map_err(|_| {
                SettlementError::Config(format!(
                    "SETTLE_MAX_GROUP_SIZE must be a number, got `{}`",
                    v
                ))
            })?,
            None => DEFAULT_MAX_GROUP_SIZE,
        };

        let strategy = match lookup("SETTLE_STRATEGY").as_deref().map(str::trim) {
            None | Some("greedy") => SimplifyStrategy::Greedy,
            Some("subset") => SimplifyStrategy::SubsetMatching { max_group_size },
            Some(other) => {
                return Err(SettlementError::Config(format!(
                    "SETTLE_STRATEGY must be `greedy` or `subset`, got `{}`",
                    other
                )));
            }
        };

        let net_recorded_settlements = match lookup("SETTLE_NET_SETTLEMENTS") {
            Some(v) => v.trim().parse::<bool>().map_err(|_| {
                SettlementError::Config(format!(
                    "SETTLE_NET_SETTLEMENTS must be true or false, got `{}`",
                    v
                ))
            })?,
            None => defaults.net_recorded_settlements,
        };

        Ok(Self {
            strategy,
            net_recorded_settlements,
            log_level: lookup("SETTLE_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }
}
