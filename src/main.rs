// src/main.rs
use std::path::Path;
use std::process;

use anyhow::Result;
use clap::Parser;

use aivault::auth::AuthManager;
use aivault::cli::{handlers, menu, Args};
use aivault::config::Config;
use aivault::store::VaultStore;

fn main() {
    if let Err(err) = run() {
        eprintln!("❌ {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    // Load environment variables before clap sees them
    if Path::new(".env").exists() {
        dotenvy::dotenv().ok();
    }

    let args = Args::parse();
    let mut config = Config::load();
    if let Some(data_dir) = args.data_dir.clone() {
        config.data_dir = data_dir;
    }

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .format_timestamp_secs()
        .parse_default_env()
        .init();

    log::info!("🔐 Starting AIVault - AI application & API key manager");
    log::debug!("Data directory: {}", config.data_dir.display());

    let store = VaultStore::open(&config.data_dir)?;
    let auth = AuthManager::new(
        &config.data_dir,
        config.max_pin_attempts,
        config.lockout_minutes,
    )?;

    match args.command {
        Some(command) => handlers::run_command(command, &store, &auth),
        None => menu::run_menu(&store, &auth, config.session_timeout_minutes),
    }
}
