use std::env;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use dnssec_oracle::store::ANCHOR_NAME;
use dnssec_oracle::types::TYPE_DS;
use dnssec_oracle::Oracle;
use serde::Deserialize;

/// On-disk configuration for the demo oracle binary. The library itself is
/// config-free (`Oracle::new` just takes `anchors`/`now`/`admin`); this
/// struct is purely a convenience for loading those three things from a
/// TOML file instead of hardcoding them.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Config {
    /// Trust anchor DS RRSET, hex-encoded wire bytes.
    anchors_hex: String,

    /// Identity accepted by admin operations (`set_algorithm` and friends).
    #[serde(default = "default_admin")]
    admin: String,

    /// Wall-clock seconds to stamp the anchor bootstrap with. Defaults to
    /// the host's current time.
    now: Option<u64>,
}

fn default_admin() -> String {
    "admin".to_string()
}

fn current_unix_time() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_secs()
}

fn load_config(path: &str) -> Result<Config> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config file {path}"))?;
    toml::from_str(&raw).with_context(|| format!("parsing config file {path} as TOML"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let config_path = env::args().nth(1).unwrap_or_else(|| "oracle.toml".to_string());
    let config = load_config(&config_path)?;

    let anchors = hex::decode(config.anchors_hex.trim()).context("anchors_hex is not valid hex")?;
    let now = config.now.unwrap_or_else(current_unix_time);

    let oracle = Oracle::new(&anchors, now, config.admin.clone());
    tracing::info!(admin = %config.admin, anchor_bytes = anchors.len(), "oracle bootstrapped");

    let (inception, inserted, fingerprint) = oracle.rrdata(TYPE_DS, ANCHOR_NAME);
    println!("anchor entry: inception={inception} inserted={inserted} fingerprint={}", hex::encode(fingerprint));

    Ok(())
}
