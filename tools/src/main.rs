//! sim-runner: headless wish simulation runner.
//!
//! Usage:
//!   sim-runner --trials 100000 --chain-length 900 --seed 0
//!   sim-runner --config data/character_banner.json --table-step 50 --out report.json

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pitysim_core::{
    analysis::{WishAnalysis, DEFAULT_MAX_COPIES},
    band::check_confidence,
    config::WishConfig,
    report::{bucket_steps, render_analysis},
    simulator::simulate,
};
use std::env;
use std::str::FromStr;

#[derive(serde::Serialize)]
struct RunReport<'a> {
    generated_at: DateTime<Utc>,
    version:      &'static str,
    seed:         u64,
    config:       &'a WishConfig,
    analysis:     &'a WishAnalysis,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let trials = parse_arg(&args, "--trials", 100_000usize)?;
    let chain_length = parse_arg(&args, "--chain-length", 900usize)?;
    let seed = parse_arg(&args, "--seed", 0u64)?;
    let confidence = parse_arg(&args, "--confidence", 0.95f64)?;
    let table_step = parse_arg(&args, "--table-step", 90usize)?;
    let max_copies = parse_arg(&args, "--max-copies", DEFAULT_MAX_COPIES)?;
    let config_path = flag_value(&args, "--config");
    let out_path = flag_value(&args, "--out");

    let config = match config_path {
        Some(path) => WishConfig::load(path)?,
        None => WishConfig::default(),
    };

    // Everything is validated before the first draw.
    check_confidence(confidence)?;
    bucket_steps(chain_length, table_step)?;
    if max_copies == 0 {
        anyhow::bail!("--max-copies must be > 0");
    }

    println!("Wish simulator - sim-runner");
    println!("  trials:        {trials}");
    println!("  chain length:  {chain_length}");
    println!("  seed:          {seed}");
    println!("  confidence:    {confidence}");
    println!("  config:        {}", config_path.unwrap_or("(built-in character banner)"));
    println!();

    let loot = simulate(trials, chain_length, &config, seed)?;

    log::info!("Evaluating simulation");
    let analysis = WishAnalysis::from_loot(&loot, &config, max_copies, confidence)?;
    print!("{}", render_analysis(&analysis, table_step)?);

    if let Some(path) = out_path {
        let report = RunReport {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
            seed,
            config: &config,
            analysis: &analysis,
        };
        let json = serde_json::to_string(&report)?;
        std::fs::write(path, json).with_context(|| format!("Cannot write {path}"))?;
        log::info!("Report written to {path}");
    }

    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Parse `flag`'s value, or return `default` when the flag is absent.
/// A present but malformed value is an error.
fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match flag_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {flag}: '{raw}' ({e})")),
        None => Ok(default),
    }
}
