// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::Path;

use anyhow::Result;
use hd_serial::{
    cfg::config::QueryConfig,
    error::ErrorKind,
    models::{
        identity::DRIVE_IDENTITY_LEN,
        passthrough::{Completion, DID_TIME_OUT},
    },
    orchestrator::query_with,
    transport::AnyTransport,
};

use crate::integration_tests::common::{ScriptedDisk, ScriptedOpener, serial_page};

const DISK: &str = "/dev/sdz";

fn identity_record(serial: &[u8; 20]) -> Vec<u8> {
    let mut raw = vec![0u8; DRIVE_IDENTITY_LEN];
    raw[20..40].copy_from_slice(serial);
    raw
}

#[test]
fn scsi_disk_answers_both_passthroughs() -> Result<()> {
    let disk = ScriptedDisk {
        legacy_page: Ok(serial_page(b"ZA1B2C3D")),
        sg_page: Ok(serial_page(b"ZA1B2C3D")),
        ..ScriptedDisk::unsupported()
    };
    let opener = ScriptedOpener::new(DISK, disk);
    let transports = AnyTransport::from_config(&QueryConfig::default());

    let report = query_with(&opener, Path::new(DISK), &transports);

    assert!(report.any_success());
    assert_eq!(report.successes().count(), 2);
    assert_eq!(report.failures().count(), 1);
    assert_eq!(report.outcomes[0].name, "identity_read");
    assert!(!report.outcomes[0].is_success());

    let text = report.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("call ioctl(HDIO_GET_IDENTITY) fail ["));
    assert_eq!(lines[1], "call identity_read() fail");
    assert_eq!(lines[2], "SCSI_IOCTL_SEND_COMMAND : [ZA1B2C3D]");
    assert_eq!(lines[3], "SG_IO                   : [ZA1B2C3D]");
    Ok(())
}

#[test]
fn ata_disk_answers_identity_only() {
    let disk = ScriptedDisk {
        identity: Some(identity_record(b"WD-WX11A1234567\0\0\0\0\0")),
        ..ScriptedDisk::unsupported()
    };
    let opener = ScriptedOpener::new(DISK, disk);
    let transports = AnyTransport::from_config(&QueryConfig::default());

    let report = query_with(&opener, Path::new(DISK), &transports);

    assert_eq!(report.successes().count(), 1);
    let serial = report.outcomes[0].serial().map(|s| s.as_str().to_owned());
    assert_eq!(serial.as_deref(), Some("WD-WX11A1234567"));
    for outcome in report.failures() {
        let err = outcome.result.as_ref().expect_err("failure");
        assert_eq!(err.kind(), ErrorKind::Query);
    }
}

#[test]
fn every_attempt_opens_and_closes_its_own_handle() {
    let opener = ScriptedOpener::new(DISK, ScriptedDisk::unsupported());
    let transports = AnyTransport::from_config(&QueryConfig::default());

    let report = query_with(&opener, Path::new(DISK), &transports);

    assert!(!report.any_success());
    assert_eq!(opener.opens.get(), 3);
    assert_eq!(opener.open_handles.get(), 0);
}

#[test]
fn unopenable_path_reports_open_failure_per_transport() {
    let opener = ScriptedOpener::new(DISK, ScriptedDisk::unsupported());
    let transports = AnyTransport::from_config(&QueryConfig::default());

    let report = query_with(&opener, Path::new("/dev/sdy"), &transports);

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(opener.opens.get(), 0);
    for outcome in &report.outcomes {
        let err = outcome.result.as_ref().expect_err("open must fail");
        assert_eq!(err.kind(), ErrorKind::Open);
        assert!(err.to_string().starts_with("call open(/dev/sdy) fail ["));
    }
}

#[test]
fn generic_passthrough_timeout_does_not_stop_later_transports() {
    let disk = ScriptedDisk {
        sg_page: Ok(Vec::new()),
        sg_completion: Completion {
            host_status: DID_TIME_OUT,
            ..Completion::default()
        },
        legacy_page: Ok(serial_page(b"K7Q")),
        ..ScriptedDisk::unsupported()
    };
    let opener = ScriptedOpener::new(DISK, disk);
    let cfg: QueryConfig = serde_yaml::from_str("transports: [sg_io, scsi_ioctl]\nsg_timeout_ms: 250\n")
        .expect("query config");
    let transports = AnyTransport::from_config(&cfg);

    let report = query_with(&opener, Path::new(DISK), &transports);

    let err = report.outcomes[0].result.as_ref().expect_err("timed out");
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(report.outcomes[1].serial().map(|s| s.as_str()), Some("K7Q"));
}
