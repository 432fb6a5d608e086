// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{io, path::PathBuf};

use thiserror::Error;

/// Coarse classification of a failed transport attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Open,
    Query,
    Timeout,
    MalformedResponse,
}

/// Failure of a single transport attempt.
///
/// Every transport converts whatever went wrong inside its own scope into one
/// of these variants; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The device path could not be opened read-only.
    #[error("call open({}) fail [{source}]", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The ioctl itself was rejected or is unsupported by the driver.
    #[error("call ioctl({call}) fail [{}]", io::Error::from_raw_os_error(*code))]
    Query { call: &'static str, code: i32 },

    /// SG_IO did not complete inside its timeout.
    #[error("call ioctl({call}) fail [timed out after {timeout_ms} ms]")]
    Timeout { call: &'static str, timeout_ms: u32 },

    /// The call succeeded but the device or driver reported a non-GOOD
    /// completion.
    #[error(
        "call ioctl({call}) fail [status=0x{status:02x} host=0x{host_status:04x} \
         driver=0x{driver_status:04x}]"
    )]
    DeviceStatus {
        call: &'static str,
        status: u32,
        host_status: u16,
        driver_status: u16,
    },

    /// The response buffer cannot be trusted by the VPD parser.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },
}

impl QueryError {
    /// Builds a [`QueryError::Query`] from an `io::Error` returned by an
    /// ioctl. Errors without an errno are reported as `EIO`.
    pub fn from_io(call: &'static str, err: &io::Error) -> Self {
        QueryError::Query {
            call,
            code: err.raw_os_error().unwrap_or(libc::EIO),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        QueryError::MalformedResponse {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Open { .. } => ErrorKind::Open,
            QueryError::Query { .. } | QueryError::DeviceStatus { .. } => ErrorKind::Query,
            QueryError::Timeout { .. } => ErrorKind::Timeout,
            QueryError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }

    /// Raw OS error code, when the failure carries one.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            QueryError::Open { source, .. } => source.raw_os_error(),
            QueryError::Query { code, .. } => Some(*code),
            _ => None,
        }
    }
}
