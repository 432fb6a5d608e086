// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Result, anyhow};
use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

use crate::models::serial::SerialString;

pub const DRIVE_IDENTITY_LEN: usize = 512;

/// The 512-byte identity record filled by `HDIO_GET_IDENTITY`
/// (`struct hd_driveid`). Only the string fields are broken out; the kernel
/// has already put their bytes in reading order.
#[repr(C)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct DriveIdentity {
    /// Words 0..9: config, geometry and vendor words.
    pub config_words: [u8; 20],
    /// Words 10..19: serial number, space padded.
    pub serial_no: [u8; 20],
    /// buf_type, buf_size, ecc_bytes.
    pub buffer_info: [u8; 6],
    /// Words 23..26: firmware revision.
    pub fw_rev: [u8; 8],
    /// Words 27..46: model number.
    pub model: [u8; 40],
    pub rest: [u8; 418],
}

impl DriveIdentity {
    pub fn zeroed() -> Self {
        <Self as FromZeros>::new_zeroed()
    }

    pub fn serial(&self) -> SerialString {
        SerialString::from_padded(&self.serial_no)
    }

    pub fn model(&self) -> SerialString {
        SerialString::from_padded(&self.model)
    }

    pub fn firmware_revision(&self) -> SerialString {
        SerialString::from_padded(&self.fw_rev)
    }

    /// Parse an identity record from raw bytes (needs ≥ 512 bytes).
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let (id, _rest) = Self::read_from_prefix(buf).map_err(|_| {
            anyhow!(
                "identity record: need ≥ {DRIVE_IDENTITY_LEN} bytes, got {}",
                buf.len()
            )
        })?;
        Ok(id)
    }
}

const _: () = assert!(core::mem::size_of::<DriveIdentity>() == DRIVE_IDENTITY_LEN);
