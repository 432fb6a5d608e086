// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use hd_serial::cfg::logger::init_logger;
use serial_test::serial;

use crate::integration_tests::common::load_config;

#[test]
#[serial]
fn logger_from_test_config_installs() -> Result<()> {
    let cfg = load_config()?;
    let path = cfg.logger_config.expect("test config names a logger");

    let _guard = init_logger(&path)?;
    tracing::info!(device = "/dev/sdz", "logger ready");

    // a second global subscriber is refused
    assert!(init_logger(&path).is_err());
    Ok(())
}
