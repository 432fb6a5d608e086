// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Context, Result};
use hd_serial::{
    cfg::{
        cli::{CliAction, USAGE, config_path_from_env, parse_args},
        config::Config,
        logger::{init_fallback_logger, init_logger},
    },
    orchestrator::query_configured,
};
use tracing::{info, warn};

fn load_config() -> Result<Config> {
    match config_path_from_env()? {
        Some(path) => Config::load_from_file(&path)
            .with_context(|| format!("failed to load config {path:?}")),
        None => Ok(Config::default()),
    }
}

fn fallback_logger() {
    if let Err(e) = init_fallback_logger() {
        eprintln!("logging disabled: {e:#}");
    }
}

fn main() -> Result<()> {
    let device = match parse_args(std::env::args_os().skip(1)) {
        CliAction::Usage => {
            print!("{USAGE}");
            return Ok(());
        },
        CliAction::Query(path) => path,
    };

    // A broken config must not cost the user the query: fall back to the
    // built-in defaults and say so.
    let (config, config_err) = match load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let _guard = match config.logger_config.as_deref().map(init_logger) {
        Some(Ok(guard)) => Some(guard),
        Some(Err(e)) => {
            fallback_logger();
            warn!("logger config rejected, using stderr: {e:#}");
            None
        },
        None => {
            fallback_logger();
            None
        },
    };
    if let Some(e) = config_err {
        warn!("using default configuration: {e:#}");
    }

    info!(device = %device.display(), transports = ?config.query.transports, "querying device");
    let report = query_configured(&device, &config.query);
    print!("{report}");

    if !report.any_success() {
        info!("no transport recovered a serial number");
    }
    Ok(())
}
