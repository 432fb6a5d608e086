// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{path::Path, time::Duration};

use anyhow::Result;
use hd_serial::{
    cfg::{
        cli::{CONFIG_ENV, config_path_from_env, resolve_config_path},
        config::Config,
        enums::TransportKind,
    },
    transport::{AnyTransport, Transport},
};
use serial_test::serial;

use crate::integration_tests::common::{load_config, test_path};

#[test]
fn test_config_file_loads() -> Result<()> {
    let cfg = load_config()?;
    assert_eq!(cfg.query.transports, TransportKind::ALL);
    assert_eq!(cfg.query.sg_timeout(), Duration::from_millis(2500));
    assert_eq!(
        cfg.logger_config.as_deref(),
        Some(Path::new("tests/config_logger.yaml"))
    );

    let transports = AnyTransport::from_config(&cfg.query);
    let calls: Vec<_> = transports.iter().map(|t| t.call()).collect();
    assert_eq!(calls, ["HDIO_GET_IDENTITY", "SCSI_IOCTL_SEND_COMMAND", "SG_IO"]);
    Ok(())
}

#[test]
#[serial]
fn env_var_selects_config_file() -> Result<()> {
    let expected = resolve_config_path(&test_path())?;

    // SAFETY: tests touching the environment are serialised.
    unsafe { std::env::set_var(CONFIG_ENV, test_path()) };
    let found = config_path_from_env();
    unsafe { std::env::remove_var(CONFIG_ENV) };

    assert_eq!(found?, Some(expected));
    Ok(())
}

#[test]
#[serial]
fn env_var_pointing_nowhere_is_an_error() {
    // SAFETY: tests touching the environment are serialised.
    unsafe { std::env::set_var(CONFIG_ENV, "tests/no-such-config.yaml") };
    let found = config_path_from_env();
    unsafe { std::env::remove_var(CONFIG_ENV) };

    assert!(found.is_err());
}

#[test]
fn logger_config_found_next_to_absolute_config_path() -> Result<()> {
    let abs = resolve_config_path(&test_path())?;
    let cfg = Config::load_from_file(&abs)?;

    let logger = cfg.logger_config.expect("test config names a logger");
    assert!(logger.is_absolute());
    assert_eq!(logger.parent(), abs.parent());
    assert!(logger.is_file(), "{logger:?} should exist");
    Ok(())
}
