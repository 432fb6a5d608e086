// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use hd_serial::{
    control_block::vpd::{
        SERIAL_PAGE_BUFFER_SIZE, SerialNumberPage, VPD_HEADER_LEN, extract_serial, parse_serial,
    },
    error::ErrorKind,
};
use hex_literal::hex;

use crate::unit_tests::common::load_fixture;

#[test]
fn test_vpd_sata_serial_page() -> Result<()> {
    let raw = load_fixture("tests/unit_tests/fixtures/vpd/serial_page_sata.hex")?;
    let page = SerialNumberPage::parse(&raw)?;
    assert_eq!(page.page_code(), 0x80);
    assert_eq!(page.peripheral_device_type(), 0x00);
    assert_eq!(page.declared_length(), 20);

    // VPD text is returned byte for byte, padding included
    let serial = parse_serial(&raw)?;
    assert_eq!(serial, "      WD-WCC4N7ZXK1R");
    Ok(())
}

#[test]
fn test_vpd_oversized_declaration_bounded_by_received_bytes() -> Result<()> {
    let raw = load_fixture("tests/unit_tests/fixtures/vpd/serial_page_oversized.hex")?;
    let page = SerialNumberPage::parse(&raw)?;
    assert_eq!(page.declared_length(), 255);
    assert_eq!(page.serial_len(), 12);
    assert_eq!(parse_serial(&raw)?, "0123456789AB");
    Ok(())
}

#[test]
fn test_vpd_full_length_declaration_stops_at_255() -> Result<()> {
    let raw = load_fixture("tests/unit_tests/fixtures/vpd/serial_page_oversized.hex")?;
    let mut buf = [b'#'; SERIAL_PAGE_BUFFER_SIZE];
    buf[..raw.len()].copy_from_slice(&raw);

    let serial = extract_serial(&mut buf)?;
    assert_eq!(serial.len(), 255);
    assert!(serial.as_str().starts_with("0123456789AB###"));
    assert_eq!(buf[VPD_HEADER_LEN + 255], 0);
    Ok(())
}

#[test]
fn test_vpd_reserved_byte_ignored() -> Result<()> {
    let raw = load_fixture("tests/unit_tests/fixtures/vpd/serial_page_reserved_set.hex")?;
    let mut buf = [0u8; SERIAL_PAGE_BUFFER_SIZE];
    buf[..raw.len()].copy_from_slice(&raw);

    assert_eq!(SerialNumberPage::parse(&buf)?.declared_length(), 6);
    assert_eq!(extract_serial(&mut buf)?, "ABC123");
    Ok(())
}

#[test]
fn test_vpd_round_trip_abc123() -> Result<()> {
    let mut buf = [0u8; SERIAL_PAGE_BUFFER_SIZE];
    buf[..10].copy_from_slice(&hex!("00 80 00 06 41 42 43 31 32 33"));
    assert_eq!(extract_serial(&mut buf)?, "ABC123");
    assert_eq!(buf[10], 0);
    Ok(())
}

#[test]
fn test_vpd_truncated_header_rejected() {
    for raw in [&hex!("")[..], &hex!("00")[..], &hex!("00 80 00")[..]] {
        let err = parse_serial(raw).expect_err("short header must fail");
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }
}
