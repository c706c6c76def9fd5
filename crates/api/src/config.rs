//! Environment-driven service configuration.

use std::net::SocketAddr;

use thiserror::Error;

use invsight_inventory::TransferPolicy;

pub const BIND_ADDR_VAR: &str = "INVSIGHT_BIND_ADDR";
pub const STRICT_TRANSFER_SOURCE_VAR: &str = "INVSIGHT_STRICT_TRANSFER_SOURCE";
pub const KPI_SEED_VAR: &str = "INVSIGHT_KPI_SEED";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub transfer_policy: TransferPolicy,
    /// Pins the KPI perturbation sequence when set.
    pub kpi_seed: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 4000)),
            transfer_policy: TransferPolicy::Lenient,
            kpi_seed: None,
        }
    }
}

impl ApiConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup (tests use a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            var: BIND_ADDR_VAR,
            value: raw_addr.clone(),
            reason: e.to_string(),
        })?;

        let transfer_policy = match lookup(STRICT_TRANSFER_SOURCE_VAR) {
            None => TransferPolicy::Lenient,
            Some(v) => {
                if parse_bool(STRICT_TRANSFER_SOURCE_VAR, &v)? {
                    TransferPolicy::Strict
                } else {
                    TransferPolicy::Lenient
                }
            }
        };

        let kpi_seed = match lookup(KPI_SEED_VAR) {
            None => None,
            Some(v) => Some(v.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: KPI_SEED_VAR,
                value: v.clone(),
                reason: e.to_string(),
            })?),
        };

        Ok(Self {
            bind_addr,
            transfer_policy,
            kpi_seed,
        })
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
