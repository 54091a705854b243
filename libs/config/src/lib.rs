//! # Colink Configuration
//!
//! Defaults and layered loading for Colink trading sessions.
//!
//! ## Features
//!
//! - **Reference Seeds**: Pool reserves and fee tiers for the COL ⇄ XRP ⇄ COPX pair
//! - **Session Configuration**: Guard bands, slippage, TWAP window and limiter caps
//! - **Layered Loading**: Defaults, then an optional TOML file, then `COLINK_*` env vars
//!
//! ## Usage
//!
//! ```rust
//! use colink_config::{defaults, SessionConfig};
//!
//! let config = SessionConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.twap.window, defaults::oracle::TWAP_WINDOW);
//!
//! let (pool_am, pool_mb) = config.build_pools().unwrap();
//! assert!(pool_am.k() > 0.0 && pool_mb.k() > 0.0);
//! ```

pub mod defaults;
pub mod session_config;

pub use defaults::ENV_PREFIX;
pub use session_config::{PoolSeed, SessionConfig, TwapSettings};
