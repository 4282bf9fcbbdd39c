use crate::error::{CatchError, Result};
use dashmap::DashMap;
use std::env;
use std::sync::Arc;

pub const EXPOSE_DETAILS_KEY: &str = "CATCHMAP_EXPOSE_DETAILS";
pub const LOG_UNHANDLED_KEY: &str = "CATCHMAP_LOG_UNHANDLED";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Create a service seeded from the process environment
    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Read a boolean, accepting `true/false`, `1/0`, `yes/no` and `on/off`
    ///
    /// # Errors
    /// Returns [`CatchError::InvalidConfig`] when the value is set but not a boolean.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(CatchError::InvalidConfig {
                key: key.to_string(),
                value,
            }),
        }
    }
}

/// How unhandled exceptions are rendered and reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionConfig {
    /// Include the error's message in fallback responses
    pub expose_details: bool,
    /// Log errors that reach the fallback filter
    pub log_unhandled: bool,
}

impl Default for ExceptionConfig {
    fn default() -> Self {
        Self {
            expose_details: false,
            log_unhandled: true,
        }
    }
}

impl ExceptionConfig {
    pub fn from_service(service: &ConfigService) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            expose_details: service
                .get_bool(EXPOSE_DETAILS_KEY)?
                .unwrap_or(defaults.expose_details),
            log_unhandled: service
                .get_bool(LOG_UNHANDLED_KEY)?
                .unwrap_or(defaults.log_unhandled),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_service(&ConfigService::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = ExceptionConfig::from_service(&ConfigService::default()).unwrap();
        assert_eq!(config, ExceptionConfig::default());
    }

    #[test]
    fn test_reads_booleans() {
        let service = ConfigService::default();
        service.set(EXPOSE_DETAILS_KEY, "Yes");
        service.set(LOG_UNHANDLED_KEY, "0");

        let config = ExceptionConfig::from_service(&service).unwrap();
        assert!(config.expose_details);
        assert!(!config.log_unhandled);
    }

    #[test]
    fn test_rejects_invalid_boolean() {
        let service = ConfigService::default();
        service.set(EXPOSE_DETAILS_KEY, "sometimes");

        let err = ExceptionConfig::from_service(&service).unwrap_err();
        assert!(matches!(err, CatchError::InvalidConfig { ref key, .. } if key == EXPOSE_DETAILS_KEY));
    }
}
