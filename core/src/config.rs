/*
 * Copyright (c) 2026 Mohamad Al-Zawahreh (dba Sovereign Systems).
 *
 * This file is part of the Ark Sovereign Compiler.
 *
 * LICENSE: DUAL-LICENSED (AGPLv3 or COMMERCIAL).
 *
 * 1. OPEN SOURCE: You may use this file under the terms of the GNU Affero
 * General Public License v3.0. If you link to this code, your ENTIRE
 * application must be open-sourced under AGPLv3.
 *
 * 2. COMMERCIAL: For proprietary use, you must obtain a Commercial License
 * from Sovereign Systems.
 *
 * PATENT NOTICE: Protected by US Patent App #63/935,467.
 * NO IMPLIED LICENSE to rights of Mohamad Al-Zawahreh or Sovereign Systems.
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FUNCTION_NAME: &str = "run_wasm";
/// Fuel budget used by `BridgeConfig::metered`.
pub const DEFAULT_FUEL_LIMIT: u64 = 10_000_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON Parse Error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for a `WasmBridge`.
///
/// Missing fields fall back to their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// SQL name the bridge is registered under.
    pub function_name: String,
    /// Fuel budget per call. `None` disables metering.
    pub fuel_limit: Option<u64>,
    /// Wall-clock deadline per call, in milliseconds. `None` disables it.
    pub timeout_ms: Option<u64>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            fuel_limit: None,
            timeout_ms: None,
        }
    }
}

impl BridgeConfig {
    /// Default settings with a `DEFAULT_FUEL_LIMIT` budget per call.
    pub fn metered() -> Self {
        Self {
            fuel_limit: Some(DEFAULT_FUEL_LIMIT),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BridgeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.function_name.is_empty() {
            return Err(ConfigError::Invalid("function_name must not be empty".to_string()));
        }
        if self.fuel_limit == Some(0) {
            return Err(ConfigError::Invalid("fuel_limit must be positive".to_string()));
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = BridgeConfig::from_json("{}").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.function_name, "run_wasm");
        assert_eq!(config.fuel_limit, None);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_partial_json() {
        let config =
            BridgeConfig::from_json(r#"{"fuel_limit": null, "timeout_ms": 250}"#).unwrap();
        assert_eq!(config.fuel_limit, None);
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.function_name, "run_wasm");
    }

    #[test]
    fn test_metered_sets_budget() {
        let config = BridgeConfig::metered();
        assert_eq!(config.fuel_limit, Some(DEFAULT_FUEL_LIMIT));
        assert_eq!(config.function_name, "run_wasm");
        let config = BridgeConfig::from_json(r#"{"fuel_limit": 5000}"#).unwrap();
        assert_eq!(config.fuel_limit, Some(5000));
    }

    #[test]
    fn test_rejects_zero_budget() {
        let err = BridgeConfig::from_json(r#"{"fuel_limit": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = BridgeConfig::from_json("{fuel").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
