//! Session Configuration Module
//!
//! Loads trading-session configuration from built-in defaults, an optional
//! TOML file, and `COLINK_`-prefixed environment variables, in that order.
//! Nested keys use a double underscore, e.g. `COLINK_LIMITS__MAX_INPUT`.

use crate::defaults::{oracle, seeds, trading, ENV_PREFIX};
use anyhow::{bail, Context, Result};
use colink_amm::{Pool, DEFAULT_FEE_BPS};
use colink_risk::{GuardBands, LimitConfig, TradeLimiter, TwapOracle};
use config_crate::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Seed reserves and fee tier for one pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolSeed {
    /// Middle-asset reserve (X)
    pub x: f64,
    /// Outer-asset reserve (Y)
    pub y: f64,
    pub fee_bps: u32,
}

impl PoolSeed {
    pub fn new(x: f64, y: f64, fee_bps: u32) -> Self {
        Self { x, y, fee_bps }
    }

    /// Build the pool described by this seed
    pub fn build(&self) -> colink_amm::Result<Pool> {
        Pool::new(self.x, self.y, self.fee_bps)
    }
}

/// Reference oracle settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwapSettings {
    /// Samples kept in the rolling window
    pub window: usize,
}

impl Default for TwapSettings {
    fn default() -> Self {
        Self {
            window: oracle::TWAP_WINDOW,
        }
    }
}

/// Complete configuration for one trading session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Slippage tolerance for min-out floors (bps)
    pub slip_bps: f64,
    /// Pool holding (M as X, A as Y)
    pub pool_am: PoolSeed,
    /// Pool holding (M as X, B as Y)
    pub pool_mb: PoolSeed,
    pub twap: TwapSettings,
    pub guard: GuardBands,
    pub limits: LimitConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            slip_bps: trading::SLIP_BPS,
            pool_am: PoolSeed::new(seeds::COL_POOL_XRP, seeds::COL_POOL_COL, DEFAULT_FEE_BPS),
            pool_mb: PoolSeed::new(seeds::COPX_POOL_XRP, seeds::COPX_POOL_COPX, DEFAULT_FEE_BPS),
            twap: TwapSettings::default(),
            guard: GuardBands::default(),
            limits: LimitConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load configuration, layering an optional TOML file and environment
    /// overrides over the defaults, then validate it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// [`SessionConfig::load`] with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to serialize default configuration")?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = path {
            info!("Loading session config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        } else {
            debug!("No config file given, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document layered over the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to serialize default configuration")?;
        let config: Self = Config::builder()
            .add_source(defaults)
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .context("Failed to parse TOML configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Render the resolved configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration as TOML")
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.pool_am.build().context("Invalid pool_am seed")?;
        self.pool_mb.build().context("Invalid pool_mb seed")?;

        if self.twap.window == 0 {
            bail!("twap.window must be positive");
        }

        let bands = &self.guard;
        for (name, value) in [
            ("guard.base_bps", bands.base_bps),
            ("guard.cushion_bps", bands.cushion_bps),
            ("guard.cap_bps", bands.cap_bps),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                bail!("{} must be a non-negative number, got {}", name, value);
            }
        }

        if !(0.0..=10_000.0).contains(&self.slip_bps) {
            bail!("slip_bps must be within 0..=10000, got {}", self.slip_bps);
        }

        self.limits.validate().context("Invalid limits")?;
        Ok(())
    }

    /// Build both pools from their seeds
    pub fn build_pools(&self) -> Result<(Pool, Pool)> {
        let pool_am = self.pool_am.build().context("Invalid pool_am seed")?;
        let pool_mb = self.pool_mb.build().context("Invalid pool_mb seed")?;
        Ok((pool_am, pool_mb))
    }

    /// Build an empty oracle with the configured window
    pub fn build_oracle(&self) -> Result<TwapOracle> {
        TwapOracle::new(self.twap.window).context("Invalid TWAP window")
    }

    /// Build a limiter with the configured caps
    pub fn build_limiter(&self) -> Result<TradeLimiter> {
        TradeLimiter::new(self.limits).context("Invalid limits")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_validation() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pool_am, PoolSeed::new(10_000.0, 200_000.0, 30));
        assert_eq!(config.pool_mb, PoolSeed::new(10_000.0, 25_000_000.0, 30));
        assert_eq!(config.twap.window, 20);
        assert_eq!(config.limits.strikes_window, 2);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = SessionConfig::load_with_prefix(None, "COLINK_TEST_UNSET").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("session.toml");

        let config_content = r#"
slip_bps = 150.0

[pool_mb]
x = 5000.0
y = 12500000.0
fee_bps = 10

[twap]
window = 8

[limits]
max_input = 10000.0
strikes_window = 3
"#;

        fs::write(&config_path, config_content).unwrap();

        let config =
            SessionConfig::load_with_prefix(Some(&config_path), "COLINK_TEST_FILE").unwrap();

        assert_eq!(config.slip_bps, 150.0);
        assert_eq!(config.pool_mb, PoolSeed::new(5_000.0, 12_500_000.0, 10));
        assert_eq!(config.pool_am, SessionConfig::default().pool_am);
        assert_eq!(config.twap.window, 8);
        assert_eq!(config.limits.max_input, 10_000.0);
        assert_eq!(config.limits.strikes_window, 3);
        assert_eq!(config.limits.cooldown_trades, 3);
        assert_eq!(config.guard, GuardBands::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(SessionConfig::load_with_prefix(Some(&missing), "COLINK_TEST_MISSING").is_err());
    }

    #[test]
    fn test_environment_override() {
        std::env::set_var("COLINK_TEST_ENV_LIMITS__MAX_INPUT", "12345");
        std::env::set_var("COLINK_TEST_ENV_TWAP__WINDOW", "12");

        let config = SessionConfig::load_with_prefix(None, "COLINK_TEST_ENV").unwrap();

        assert_eq!(config.limits.max_input, 12_345.0);
        assert_eq!(config.twap.window, 12);

        std::env::remove_var("COLINK_TEST_ENV_LIMITS__MAX_INPUT");
        std::env::remove_var("COLINK_TEST_ENV_TWAP__WINDOW");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(SessionConfig::from_toml_str("[twap]\nwindow = 0\n").is_err());
        assert!(SessionConfig::from_toml_str("slip_bps = 20000.0\n").is_err());
        assert!(SessionConfig::from_toml_str("[limits]\nstrikes_window = 0\n").is_err());
        assert!(SessionConfig::from_toml_str("[pool_am]\nfee_bps = 20000\n").is_err());
        assert!(SessionConfig::from_toml_str("[guard]\ncap_bps = -1.0\n").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = SessionConfig::default();
        config.guard.cap_bps = 1_500.0;

        let rendered = config.to_toml_string().unwrap();
        let parsed = SessionConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::default();
        let (pool_am, pool_mb) = config.build_pools().unwrap();

        assert_eq!(pool_am.y_reserve(), 200_000.0);
        assert_eq!(pool_mb.y_reserve(), 25_000_000.0);
        assert_eq!(config.build_oracle().unwrap().window(), 20);
        assert!(!config.build_limiter().unwrap().is_tripped());
    }
}
