// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable naming the YAML config file.
pub const CONFIG_ENV: &str = "HD_SERIAL_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

pub const USAGE: &str = "\nhd_serial <hard disk device path (ex : /dev/sda)>\n";

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// Wrong number of arguments or an empty path: print usage, exit 0.
    Usage,
    /// Query the device at this path.
    Query(PathBuf),
}

/// Interpret the positional arguments (program name already stripped).
pub fn parse_args<I, S>(args: I) -> CliAction
where
    I: IntoIterator<Item = S>,
    S: Into<PathBuf>,
{
    let mut args = args.into_iter();
    match (args.next().map(Into::<PathBuf>::into), args.next()) {
        (Some(path), None) if !path.as_os_str().is_empty() => CliAction::Query(path),
        _ => CliAction::Usage,
    }
}

pub fn resolve_config_path(rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);

    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };

    let canon = abs
        .canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))?;

    Ok(canon)
}

/// Config file to load, if any: `$HD_SERIAL_CONFIG` when set (and it must
/// exist), otherwise the default path when present.
pub fn config_path_from_env() -> Result<Option<PathBuf>> {
    match std::env::var(CONFIG_ENV) {
        Ok(p) => resolve_config_path(&p).map(Some),
        Err(_) => Ok(resolve_config_path(DEFAULT_CONFIG_PATH).ok()),
    }
}
