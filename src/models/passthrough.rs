// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Request/response descriptor for the generic SCSI passthrough (`SG_IO`).
//!
//! The descriptor borrows the CDB and the response buffer; the device layer
//! turns it into the kernel's `sg_io_hdr` and writes the completion fields
//! back.

use std::time::Duration;

use crate::error::QueryError;

pub const SG_INTERFACE_ID: u8 = b'S';
pub const SENSE_BUFFER_LEN: usize = 32;

/// Host status reported when the command timed out (`DID_TIME_OUT`).
pub const DID_TIME_OUT: u16 = 0x03;
/// Driver status reported when the command timed out (`DRIVER_TIMEOUT`).
pub const DRIVER_TIMEOUT: u16 = 0x06;

/// Data transfer direction (`SG_DXFER_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    None,
    ToDevice,
    FromDevice,
    ToFromDevice,
}

impl Direction {
    pub fn as_raw(self) -> i32 {
        match self {
            Direction::None => -1,
            Direction::ToDevice => -2,
            Direction::FromDevice => -3,
            Direction::ToFromDevice => -4,
        }
    }
}

/// Completion fields filled by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Completion {
    /// SCSI status byte.
    pub status: u8,
    pub host_status: u16,
    pub driver_status: u16,
    /// Bytes of the response buffer the device did not fill.
    pub resid: i32,
    /// Bytes of sense data written.
    pub sb_len_wr: u8,
    pub duration_ms: u32,
}

impl Completion {
    #[inline]
    pub fn is_good(&self) -> bool {
        self.status == 0 && self.host_status == 0 && self.driver_status == 0
    }

    #[inline]
    pub fn timed_out(&self) -> bool {
        self.host_status == DID_TIME_OUT || (self.driver_status & 0x0F) == DRIVER_TIMEOUT
    }

    /// Number of response bytes actually transferred, never more than
    /// `requested`.
    #[inline]
    pub fn transferred(&self, requested: usize) -> usize {
        let resid = usize::try_from(self.resid.max(0)).unwrap_or(0);
        requested.saturating_sub(resid)
    }
}

#[derive(Debug)]
pub struct PassthroughDescriptor<'a> {
    pub interface_id: u8,
    pub direction: Direction,
    pub timeout: Duration,
    pub command: &'a [u8],
    pub response: &'a mut [u8],
    pub sense: [u8; SENSE_BUFFER_LEN],
    pub completion: Completion,
}

impl<'a> PassthroughDescriptor<'a> {
    /// Device-to-host request; `response` is exposed to the device in full.
    pub fn from_device(command: &'a [u8], response: &'a mut [u8], timeout: Duration) -> Self {
        Self {
            interface_id: SG_INTERFACE_ID,
            direction: Direction::FromDevice,
            timeout,
            command,
            response,
            sense: [0; SENSE_BUFFER_LEN],
            completion: Completion::default(),
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX)
    }

    /// Sense key of the returned sense data, fixed or descriptor format.
    pub fn sense_key(&self) -> Option<u8> {
        let len = usize::from(self.completion.sb_len_wr).min(SENSE_BUFFER_LEN);
        let sense = &self.sense[..len];
        match sense.first().map(|b| b & 0x7F) {
            Some(0x70 | 0x71) if sense.len() > 2 => Some(sense[2] & 0x0F),
            Some(0x72 | 0x73) if sense.len() > 1 => Some(sense[1] & 0x0F),
            _ => None,
        }
    }

    /// Map the completion fields to an error, if the command did not finish
    /// with GOOD status.
    pub fn check_completion(&self, call: &'static str) -> Result<(), QueryError> {
        let c = &self.completion;
        if c.timed_out() {
            return Err(QueryError::Timeout {
                call,
                timeout_ms: self.timeout_ms(),
            });
        }
        if !c.is_good() {
            return Err(QueryError::DeviceStatus {
                call,
                status: u32::from(c.status),
                host_status: c.host_status,
                driver_status: c.driver_status,
            });
        }
        Ok(())
    }
}
