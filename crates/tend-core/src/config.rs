use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fixed bounds for one scheduling pass. These are configuration constants,
/// not values derived per task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Look-ahead horizon for occurrence enumeration, in months.
    pub lookahead_months: u32,
    /// Maximum occurrences scheduled per task within the horizon.
    pub max_per_task: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lookahead_months: 2,
            max_per_task: 10,
        }
    }
}

impl SchedulerConfig {
    /// Loads configuration from `tend.toml` and `TEND_`-prefixed environment
    /// variables, falling back to the defaults for anything unset.
    pub fn load() -> Result<Self, CoreError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file("tend.toml"))
                .merge(Env::prefixed("TEND_")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, CoreError> {
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = SchedulerConfig::default();
        assert_eq!(config.lookahead_months, 2);
        assert_eq!(config.max_per_task, 10);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = SchedulerConfig::from_figment(
            Figment::from(Serialized::defaults(SchedulerConfig::default()))
                .merge(Toml::string("lookahead_months = 4")),
        )
        .unwrap();
        assert_eq!(config.lookahead_months, 4);
        assert_eq!(config.max_per_task, 10);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let result = SchedulerConfig::from_figment(
            Figment::from(Serialized::defaults(SchedulerConfig::default()))
                .merge(Toml::string("lookahead_months = \"soon\"")),
        );
        assert!(matches!(result, Err(CoreError::Config(_))));
    }
}
