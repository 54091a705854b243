//! Session defaults
//!
//! Reference seeds and tuning values shared by configuration defaults,
//! tests and the simulation runner.

/// Reference pool seeds (the COL ⇄ XRP ⇄ COPX pair)
pub mod seeds {
    /// XRP side of the COL/XRP pool
    pub const COL_POOL_XRP: f64 = 10_000.0;

    /// COL side of the COL/XRP pool (~20 COL per XRP)
    pub const COL_POOL_COL: f64 = 200_000.0;

    /// XRP side of the XRP/COPX pool
    pub const COPX_POOL_XRP: f64 = 10_000.0;

    /// COPX side of the XRP/COPX pool (~2500 COPX per XRP)
    pub const COPX_POOL_COPX: f64 = 25_000_000.0;
}

/// Reference price oracle defaults
pub mod oracle {
    /// Samples in the rolling TWAP window
    pub const TWAP_WINDOW: usize = colink_risk::DEFAULT_TWAP_WINDOW;
}

/// Trade admission defaults
pub mod trading {
    /// Slippage tolerance applied to min-out floors (bps)
    pub const SLIP_BPS: f64 = 0.0;

    /// Input sizes used by the simulation runner when none are given
    pub const SIM_SIZES: [f64; 5] = [500.0, 5_000.0, 10_000.0, 25_000.0, 50_000.0];
}

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "COLINK";
