//! Colink simulation runner
//!
//! Seeds a session from config, replays guarded fills for a list of sizes,
//! ticks the breaker through its cooldown, and prints a JSON sweep of the
//! final pools.

use anyhow::{Context, Result};
use clap::Parser;
use colink_config::{defaults, SessionConfig};
use colink_session::TradingSession;
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input sizes (asset A) to attempt, in order
    #[arg(short, long, num_args = 1..)]
    sizes: Vec<f64>,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colink_session=info,colink_risk=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting Colink simulation runner");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = SessionConfig::load(args.config.as_deref())?;

    if args.print_config {
        println!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let mut session =
        TradingSession::from_config(&config).context("Failed to build trading session")?;
    session.warm_reference(config.twap.window);

    let sizes = if args.sizes.is_empty() {
        defaults::trading::SIM_SIZES.to_vec()
    } else {
        args.sizes
    };

    for &size in &sizes {
        let outcome = session.try_fill_a_to_b(size);
        let limiter = session.limiter();
        info!(
            size,
            outcome = outcome.label(),
            strikes = limiter.strikes(),
            tripped = limiter.is_tripped(),
            cooldown_left = limiter.cooldown_left(),
            "Fill attempt"
        );
        session.observe_mid();
    }

    while session.limiter().is_tripped() {
        let decision = session.limiter_mut().can_trade();
        warn!(
            decision = %decision,
            cooldown_left = session.limiter().cooldown_left(),
            "Breaker cooldown tick"
        );
    }

    let sweep = session.sweep(&sizes);
    let report = json!({
        "pool_am": session.pool_am(),
        "pool_mb": session.pool_mb(),
        "mid_price": session.mid_price(),
        "twap": session.oracle().value(),
        "limiter": {
            "state": session.limiter().state(),
            "stats": session.limiter().stats(),
        },
        "sweep": sweep,
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to render sweep")?
    );

    Ok(())
}
