// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Buffer framing for `SCSI_IOCTL_SEND_COMMAND` (`struct scsi_ioctl_command`).
//!
//! One contiguous buffer carries both directions:
//!
//! ```text
//! outbound: [inlen:4][outlen:4][CDB ........ zero fill]
//! inbound:  [inlen:4][outlen:4][response page .......]
//! ```
//!
//! The header uses host byte order, since the kernel reads it as two
//! `unsigned int`s.

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout,
    byteorder::{NativeEndian, U32},
};

use crate::error::QueryError;

pub const FRAME_HEADER_LEN: usize = 8;

#[repr(C)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Bytes of data sent after the CDB.
    pub inlen: U32<NativeEndian>,
    /// Bytes the caller can accept back, starting at the payload.
    pub outlen: U32<NativeEndian>,
}

impl FrameHeader {
    pub fn new(inlen: u32, outlen: u32) -> Self {
        Self {
            inlen: U32::new(inlen),
            outlen: U32::new(outlen),
        }
    }
}

/// Header and payload held as separate fields; [`TransferFrame::encode`] and
/// [`TransferFrame::decode`] convert to and from the contiguous form handed
/// to the ioctl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFrame {
    pub header: FrameHeader,
    pub payload: Vec<u8>,
}

impl TransferFrame {
    /// Frame a read-only command: the payload is zero filled to
    /// `payload_capacity`, starts with `cdb`, sends nothing else
    /// (`inlen = 0`) and keeps the final payload byte back from the device
    /// for a terminator (`outlen = payload_capacity - 1`).
    pub fn for_read(cdb: &[u8], payload_capacity: usize) -> Result<Self, QueryError> {
        if payload_capacity <= cdb.len() {
            return Err(QueryError::malformed(format!(
                "frame payload {payload_capacity} cannot hold a {}-byte CDB and a terminator",
                cdb.len()
            )));
        }
        let outlen = u32::try_from(payload_capacity - 1)
            .map_err(|_| QueryError::malformed("frame payload exceeds u32"))?;

        let mut payload = vec![0u8; payload_capacity];
        payload[..cdb.len()].copy_from_slice(cdb);
        Ok(Self {
            header: FrameHeader::new(0, outlen),
            payload,
        })
    }

    #[inline]
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_LEN + self.payload.len()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(self.header.as_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self, QueryError> {
        let (header, payload) = FrameHeader::read_from_prefix(buf).map_err(|_| {
            QueryError::malformed(format!(
                "transfer frame: need ≥ {FRAME_HEADER_LEN} bytes, got {}",
                buf.len()
            ))
        })?;
        Ok(Self {
            header,
            payload: payload.to_vec(),
        })
    }
}
