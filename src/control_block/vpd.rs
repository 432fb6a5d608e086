// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! VPD 0x80 — Unit Serial Number page parser.
//!
//! Response layout:
//!   [0]    = Peripheral Qualifier (bits 7..4) | Device Type (bits 3..0)
//!   [1]    = Page Code (0x80)
//!   [2]    = Reserved, ignored whatever the device puts there
//!   [3]    = Page Length
//!   [4..]  = Product Serial Number (ASCII, not NUL-terminated)
//!
//! The page length is declared by the device and is only ever used after
//! [`clamp_page_length`] has bounded it by both the 255-byte protocol limit
//! and the bytes actually present in the buffer.

use tracing::debug;

use crate::{control_block::inquiry::SCSI_SN_BUFFER_SIZE, error::QueryError, models::serial::SerialString};

pub const VPD_HEADER_LEN: usize = 4;
const PAGE_LENGTH_OFFSET: usize = 3;

/// Size of a buffer able to hold the page header, the largest serial and the
/// NUL terminator.
pub const SERIAL_PAGE_BUFFER_SIZE: usize = VPD_HEADER_LEN + SCSI_SN_BUFFER_SIZE + 1;

/// Effective number of serial bytes to use: `min(declared, 255, available)`.
#[inline]
pub fn clamp_page_length(declared: usize, available: usize) -> usize {
    declared.min(SCSI_SN_BUFFER_SIZE).min(available)
}

/// Borrowed view over a Unit Serial Number response.
#[derive(Debug, Clone, Copy)]
pub struct SerialNumberPage<'a> {
    buf: &'a [u8],
}

impl<'a> SerialNumberPage<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<Self, QueryError> {
        if buf.len() < VPD_HEADER_LEN {
            return Err(QueryError::malformed(format!(
                "VPD buffer too short: {} < {VPD_HEADER_LEN}",
                buf.len()
            )));
        }
        Ok(Self { buf })
    }

    #[inline]
    pub fn peripheral_qualifier(&self) -> u8 {
        self.buf[0] >> 4
    }

    #[inline]
    pub fn peripheral_device_type(&self) -> u8 {
        self.buf[0] & 0x0F
    }

    #[inline]
    pub fn page_code(&self) -> u8 {
        self.buf[1]
    }

    /// Page length exactly as the device reported it.
    #[inline]
    pub fn declared_length(&self) -> usize {
        usize::from(self.buf[PAGE_LENGTH_OFFSET])
    }

    #[inline]
    pub fn serial_len(&self) -> usize {
        clamp_page_length(self.declared_length(), self.buf.len() - VPD_HEADER_LEN)
    }

    pub fn serial_bytes(&self) -> &'a [u8] {
        &self.buf[VPD_HEADER_LEN..VPD_HEADER_LEN + self.serial_len()]
    }
}

/// Parse a Unit Serial Number page into text without touching the buffer.
pub fn parse_serial(buf: &[u8]) -> Result<SerialString, QueryError> {
    let page = SerialNumberPage::parse(buf)?;
    if page.page_code() != 0x80 {
        debug!(page_code = page.page_code(), "unexpected VPD page code echoed");
    }
    if page.declared_length() > page.serial_len() {
        debug!(
            declared = page.declared_length(),
            used = page.serial_len(),
            "VPD page length clamped"
        );
    }
    Ok(SerialString::from_ascii_lossy(page.serial_bytes()))
}

/// Write a NUL right after the serial bytes, reserving the last byte of
/// `buf` for it. Returns the index written.
pub fn terminate_serial(buf: &mut [u8]) -> Result<usize, QueryError> {
    if buf.len() <= VPD_HEADER_LEN {
        return Err(QueryError::malformed(format!(
            "VPD buffer has no room for a terminator: {} bytes",
            buf.len()
        )));
    }
    let declared = usize::from(buf[PAGE_LENGTH_OFFSET]);
    let idx = VPD_HEADER_LEN + clamp_page_length(declared, buf.len() - VPD_HEADER_LEN - 1);
    buf[idx] = 0;
    Ok(idx)
}

/// Terminate and parse a response buffer received from a passthrough call.
pub fn extract_serial(buf: &mut [u8]) -> Result<SerialString, QueryError> {
    let end = terminate_serial(buf)?;
    parse_serial(&buf[..end])
}
