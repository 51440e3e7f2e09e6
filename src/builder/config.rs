//! Store configuration.

use super::error::BuildError;
use serde::{Deserialize, Serialize};

/// Changes kept in a store's history unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Buffered changes per broadcast receiver unless configured otherwise.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Largest accepted `channel_capacity`. The broadcast channel allocates its
/// whole buffer up front.
pub const MAX_CHANNEL_CAPACITY: usize = 1 << 16;

/// Tunables for a store.
///
/// Missing fields take their defaults, so a partial JSON document is enough:
///
/// ```rust
/// use flowstate::builder::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{ "name": "cart", "history_capacity": 8 }"#).unwrap();
/// assert_eq!(config.name, "cart");
/// assert_eq!(config.history_capacity, 8);
/// assert_eq!(config.channel_capacity, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name used in log records
    pub name: String,

    /// How many recent changes the store remembers (0 disables history).
    /// Memory is only used as changes are recorded.
    pub history_capacity: usize,

    /// How many changes a lagging broadcast receiver may fall behind
    pub channel_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| BuildError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        if self.channel_capacity == 0 {
            return Err(BuildError::InvalidConfig(
                "channel_capacity must be greater than 0".to_string(),
            ));
        }
        if self.channel_capacity > MAX_CHANNEL_CAPACITY {
            return Err(BuildError::InvalidConfig(format!(
                "channel_capacity must be at most {MAX_CHANNEL_CAPACITY}, got {}",
                self.channel_capacity
            )));
        }
        if self.name.trim().is_empty() {
            return Err(BuildError::InvalidConfig(
                "name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = StoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = StoreConfig::from_json("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn zero_channel_capacity_is_rejected() {
        let result = StoreConfig::from_json(r#"{ "channel_capacity": 0 }"#);
        assert!(matches!(result, Err(BuildError::InvalidConfig(_))));
    }

    #[test]
    fn oversized_channel_capacity_is_rejected() {
        let json = format!(r#"{{ "channel_capacity": {} }}"#, MAX_CHANNEL_CAPACITY + 1);
        let result = StoreConfig::from_json(&json);
        assert!(matches!(result, Err(BuildError::InvalidConfig(_))));
    }

    #[test]
    fn large_history_capacity_is_accepted() {
        let config = StoreConfig::from_json(r#"{ "history_capacity": 18446744073709551615 }"#).unwrap();
        assert_eq!(config.history_capacity, usize::MAX);
    }

    #[test]
    fn blank_name_is_rejected() {
        let result = StoreConfig::from_json(r#"{ "name": "  " }"#);
        assert!(matches!(result, Err(BuildError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let result = StoreConfig::from_json("{ history_capacity: ");
        assert!(matches!(result, Err(BuildError::InvalidConfig(_))));
    }

    #[test]
    fn config_serializes_correctly() {
        let config = StoreConfig {
            name: "todos".to_string(),
            history_capacity: 0,
            channel_capacity: 4,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized = StoreConfig::from_json(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
