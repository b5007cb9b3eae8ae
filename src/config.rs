//! Engine configuration with validation and defaults
//!
//! Values come from defaults, then an optional TOML file, then `NEONPLAY_*`
//! environment variables. Game rules (fee rate, multipliers, ranges) are
//! fixed constants and are not configurable here.

use crate::errors::{ConfigurationError, EngineResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ledger: LedgerConfig,
    pub timing: TimingConfig,
    pub rng: RngConfig,
    pub events: EventsConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub initial_balance: f64,
    pub default_stake: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_balance: 10_000.0,
            default_stake: 100,
        }
    }
}

/// Animation pacing. None of this changes outcomes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub frame_interval_ms: u64,
    pub slot_frames: u32,
    pub dice_frames: u32,
    pub roulette_delay_ms: u64,
    pub blackjack_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 100,
            slot_frames: 21,
            dice_frames: 16,
            roulette_delay_ms: 3_000,
            blackjack_delay_ms: 1_000,
        }
    }
}

impl TimingConfig {
    /// Delay between animation frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Time the wheel spins before settling
    pub fn roulette_delay(&self) -> Duration {
        Duration::from_millis(self.roulette_delay_ms)
    }

    /// Pause before the dealer hand settles
    pub fn blackjack_delay(&self) -> Duration {
        Duration::from_millis(self.blackjack_delay_ms)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RngConfig {
    /// Fixed seed for reproducible sessions; entropy when unset
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { channel_capacity: 64 }
    }
}

impl EngineConfig {
    /// Zero delays, same frame counts. Handy for tests and scripted runs.
    pub fn instant() -> Self {
        Self {
            timing: TimingConfig {
                frame_interval_ms: 0,
                roulette_delay_ms: 0,
                blackjack_delay_ms: 0,
                ..TimingConfig::default()
            },
            ..Self::default()
        }
    }
}

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    /// Loader using defaults plus environment overrides
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Read a TOML file before applying overrides
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> EngineResult<EngineConfig> {
        let mut config = if let Some(ref path) = self.config_path {
            self.load_from_file(path)?
        } else {
            EngineConfig::default()
        };

        self.apply_overrides(&mut config, |key| env::var(key).ok())?;
        self.validate(&config)?;

        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> EngineResult<EngineConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into())
    }

    /// Apply `NEONPLAY_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&self, config: &mut EngineConfig, lookup: F) -> EngineResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(balance) = lookup("NEONPLAY_INITIAL_BALANCE") {
            config.ledger.initial_balance = parse_var("NEONPLAY_INITIAL_BALANCE", balance, "Invalid balance")?;
        }
        if let Some(stake) = lookup("NEONPLAY_DEFAULT_STAKE") {
            config.ledger.default_stake = parse_var("NEONPLAY_DEFAULT_STAKE", stake, "Invalid stake")?;
        }
        if let Some(seed) = lookup("NEONPLAY_RNG_SEED") {
            config.rng.seed = Some(parse_var("NEONPLAY_RNG_SEED", seed, "Invalid seed")?);
        }
        if let Some(interval) = lookup("NEONPLAY_FRAME_INTERVAL_MS") {
            config.timing.frame_interval_ms =
                parse_var("NEONPLAY_FRAME_INTERVAL_MS", interval, "Invalid interval")?;
        }

        Ok(())
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self, config: &EngineConfig) -> EngineResult<()> {
        let balance = config.ledger.initial_balance;
        if !balance.is_finite() || balance < 0.0 {
            return Err(ConfigurationError::InvalidValue {
                field: "ledger.initial_balance".to_string(),
                value: balance.to_string(),
                reason: "Balance must be a finite, non-negative number".to_string(),
            }
            .into());
        }

        if config.ledger.default_stake == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "ledger.default_stake".to_string(),
                value: "0".to_string(),
                reason: "Stake must be at least 1".to_string(),
            }
            .into());
        }

        if config.events.channel_capacity == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "events.channel_capacity".to_string(),
                value: "0".to_string(),
                reason: "Channel capacity cannot be zero".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Write a configuration to a TOML file
    pub fn save(&self, config: &EngineConfig, path: &str) -> EngineResult<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_string)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path, e)).into())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<T: std::str::FromStr>(field: &str, value: String, reason: &str) -> EngineResult<T> {
    value.parse().map_err(|_| {
        ConfigurationError::InvalidValue {
            field: field.to_string(),
            value,
            reason: reason.to_string(),
        }
        .into()
    })
}

/// Builder pattern for creating configurations
pub struct ConfigBuilder {
    config: EngineConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Starting balance
    pub fn initial_balance(mut self, balance: f64) -> Self {
        self.config.ledger.initial_balance = balance;
        self
    }

    /// Stake used when the caller gives none
    pub fn default_stake(mut self, stake: u64) -> Self {
        self.config.ledger.default_stake = stake;
        self
    }

    /// Replace all timing settings
    pub fn timing(mut self, timing: TimingConfig) -> Self {
        self.config.timing = timing;
        self
    }

    /// Seed the outcome generator
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.rng.seed = Some(seed);
        self
    }

    /// Finish the configuration
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config(path: &str) -> EngineResult<()> {
    let config = EngineConfig::default();
    ConfigLoader::new().save(&config, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.ledger.initial_balance, 10_000.0);
        assert_eq!(config.ledger.default_stake, 100);
        assert_eq!(config.timing.slot_frames, 21);
        assert_eq!(config.timing.roulette_delay(), Duration::from_secs(3));
        assert!(config.rng.seed.is_none());
    }

    #[test]
    fn test_config_validation() {
        let loader = ConfigLoader::new();
        let mut config = EngineConfig::default();
        assert!(loader.validate(&config).is_ok());

        config.ledger.default_stake = 0;
        assert!(loader.validate(&config).is_err());

        config.ledger.default_stake = 1;
        config.ledger.initial_balance = f64::NAN;
        assert!(loader.validate(&config).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("NEONPLAY_INITIAL_BALANCE", "250.5"),
            ("NEONPLAY_RNG_SEED", "99"),
        ]
        .into_iter()
        .collect();

        let mut config = EngineConfig::default();
        ConfigLoader::new()
            .apply_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.ledger.initial_balance, 250.5);
        assert_eq!(config.rng.seed, Some(99));
        assert_eq!(config.ledger.default_stake, 100);
    }

    #[test]
    fn test_bad_override_is_reported() {
        let mut config = EngineConfig::default();
        let err = ConfigLoader::new()
            .apply_overrides(&mut config, |k| {
                (k == "NEONPLAY_DEFAULT_STAKE").then(|| "lots".to_string())
            })
            .unwrap_err();

        match err {
            EngineError::Configuration(ConfigurationError::InvalidValue { field, .. }) => {
                assert_eq!(field, "NEONPLAY_DEFAULT_STAKE")
            }
            other => panic!("Expected invalid value, got {:?}", other),
        }
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .initial_balance(500.0)
            .default_stake(25)
            .seed(3)
            .build();

        assert_eq!(config.ledger.initial_balance, 500.0);
        assert_eq!(config.ledger.default_stake, 25);
        assert_eq!(config.rng.seed, Some(3));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: EngineConfig = toml::from_str("[ledger]\ninitial_balance = 42.0\n").unwrap();
        assert_eq!(config.ledger.initial_balance, 42.0);
        assert_eq!(config.ledger.default_stake, 100);
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn test_save_and_load_config() -> EngineResult<()> {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let original = ConfigBuilder::new().initial_balance(777.0).build();
        ConfigLoader::new().save(&original, path)?;

        let loaded: EngineConfig = toml::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(loaded, original);

        Ok(())
    }
}
