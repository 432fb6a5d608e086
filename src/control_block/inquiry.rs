// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! INQUIRY (6) — builder for the Unit Serial Number VPD request.
//!
//! CDB layout (SCSI-2 §8.2.5, Table 44):
//!   [0] = 0x12 (INQUIRY)
//!   [1] = LUN (bits 7..5) | reserved (bits 4..1) | EVPD (bit 0)
//!   [2] = Page Code (only when EVPD=1)
//!   [3] = reserved
//!   [4] = Allocation Length (u8)
//!   [5] = Control
//!
//! Bit positions are SCSI bit numbers within the byte, so the encoding is the
//! same on every host.

use std::fmt;

use anyhow::{Result, bail};

pub const INQUIRY_OPCODE: u8 = 0x12;
pub const INQUIRY_CDB_LEN: usize = 6;

/// Largest value the 1-byte ALLOCATION LENGTH can carry.
pub const SCSI_SN_BUFFER_SIZE: usize = 255;

/// Serial bytes plus room for the terminating NUL.
pub const STORE_SN_BUFFER_SIZE: usize = SCSI_SN_BUFFER_SIZE + 1;

const EVPD_MASK: u8 = 0x01;
const LUN_SHIFT: u8 = 5;
const LUN_MASK: u8 = 0x07;

/// Common VPD page codes (subset).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VpdPage {
    SupportedPages = 0x00,
    UnitSerial = 0x80,
    DeviceId = 0x83,
}

impl From<VpdPage> for u8 {
    #[inline]
    fn from(p: VpdPage) -> u8 {
        p as u8
    }
}

impl TryFrom<u8> for VpdPage {
    type Error = anyhow::Error;

    #[inline]
    fn try_from(v: u8) -> Result<Self> {
        use VpdPage::*;
        Ok(match v {
            0x00 => SupportedPages,
            0x80 => UnitSerial,
            0x83 => DeviceId,
            _ => bail!("invalid vpd page: {v}"),
        })
    }
}

/// A 6-byte INQUIRY command descriptor block.
///
/// Stored as plain bytes; every field is read and written through a named
/// accessor so the bit-packed byte 1 never depends on the host layout.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct InquiryCommand([u8; INQUIRY_CDB_LEN]);

impl InquiryCommand {
    pub fn from_bytes(bytes: [u8; INQUIRY_CDB_LEN]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; INQUIRY_CDB_LEN] {
        &self.0
    }

    #[inline]
    pub fn operation_code(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn evpd(&self) -> bool {
        self.0[1] & EVPD_MASK != 0
    }

    #[inline]
    pub fn logical_unit_number(&self) -> u8 {
        (self.0[1] >> LUN_SHIFT) & LUN_MASK
    }

    #[inline]
    pub fn page_code(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn allocation_length(&self) -> u8 {
        self.0[4]
    }

    #[inline]
    pub fn control(&self) -> u8 {
        self.0[5]
    }

    fn set_operation_code(&mut self, op: u8) -> &mut Self {
        self.0[0] = op;
        self
    }

    fn set_evpd(&mut self, evpd: bool) -> &mut Self {
        self.0[1] = (self.0[1] & !EVPD_MASK) | evpd as u8;
        self
    }

    fn set_logical_unit_number(&mut self, lun: u8) -> &mut Self {
        self.0[1] = (self.0[1] & !(LUN_MASK << LUN_SHIFT)) | ((lun & LUN_MASK) << LUN_SHIFT);
        self
    }

    fn set_page_code(&mut self, page: VpdPage) -> &mut Self {
        self.0[2] = page.into();
        self
    }

    fn set_allocation_length(&mut self, len: u8) -> &mut Self {
        self.0[4] = len;
        self
    }

    fn set_control(&mut self, control: u8) -> &mut Self {
        self.0[5] = control;
        self
    }
}

impl fmt::Debug for InquiryCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InquiryCommand")
            .field("operation_code", &format_args!("{:#04x}", self.operation_code()))
            .field("evpd", &self.evpd())
            .field("lun", &self.logical_unit_number())
            .field("page_code", &format_args!("{:#04x}", self.page_code()))
            .field("allocation_length", &self.allocation_length())
            .field("control", &self.control())
            .finish()
    }
}

/// Fill a **VPD INQUIRY (EVPD=1)** CDB for an arbitrary page.
#[inline]
pub fn fill_inquiry_vpd(page: VpdPage, lun: u8, allocation_len: u8, control: u8) -> InquiryCommand {
    let mut cdb = InquiryCommand::default();
    cdb.set_operation_code(INQUIRY_OPCODE)
        .set_evpd(true)
        .set_logical_unit_number(lun)
        .set_page_code(page)
        .set_allocation_length(allocation_len)
        .set_control(control);
    cdb
}

/// INQUIRY for the Unit Serial Number page (0x80), LUN 0, maximum
/// allocation length, control 0.
///
/// Drivers tend to ignore ALLOCATION LENGTH and bound the transfer by the
/// output buffer size of the ioctl instead, so callers still size their
/// buffers from [`STORE_SN_BUFFER_SIZE`].
#[inline]
pub fn build_inquiry_cdb() -> InquiryCommand {
    fill_inquiry_vpd(VpdPage::UnitSerial, 0, SCSI_SN_BUFFER_SIZE as u8, 0x00)
}
