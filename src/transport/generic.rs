// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    control_block::{
        inquiry::build_inquiry_cdb,
        vpd::{SERIAL_PAGE_BUFFER_SIZE, extract_serial},
    },
    device::{BlockDevice, SG_IO_NAME},
    error::QueryError,
    models::{passthrough::PassthroughDescriptor, serial::SerialString},
    transport::Transport,
};

pub const DEFAULT_SG_TIMEOUT: Duration = Duration::from_millis(1000);

/// INQUIRY VPD 0x80 through the generic SCSI passthrough, with a separate
/// response buffer and an explicit timeout.
#[derive(Debug, Clone, Copy)]
pub struct GenericPassthrough {
    timeout: Duration,
}

impl Default for GenericPassthrough {
    fn default() -> Self {
        Self::new(DEFAULT_SG_TIMEOUT)
    }
}

impl GenericPassthrough {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Transport for GenericPassthrough {
    fn name(&self) -> &'static str {
        "generic_passthrough"
    }

    fn call(&self) -> &'static str {
        SG_IO_NAME
    }

    fn query(&self, dev: &mut dyn BlockDevice) -> Result<SerialString, QueryError> {
        let cdb = build_inquiry_cdb();
        let mut buf = [0u8; SERIAL_PAGE_BUFFER_SIZE];
        // last byte stays ours for the terminator
        let dxfer_len = buf.len() - 1;

        let completion = {
            let mut desc =
                PassthroughDescriptor::from_device(cdb.as_bytes(), &mut buf[..dxfer_len], self.timeout);
            debug!(
                cmd_len = desc.command.len(),
                dxfer_len = desc.response.len(),
                timeout_ms = desc.timeout_ms(),
                "issuing SG_IO"
            );

            dev.generic_passthrough(&mut desc).map_err(|e| {
                if e.raw_os_error() == Some(libc::ETIMEDOUT) {
                    QueryError::Timeout {
                        call: SG_IO_NAME,
                        timeout_ms: desc.timeout_ms(),
                    }
                } else {
                    QueryError::from_io(SG_IO_NAME, &e)
                }
            })?;

            if let Err(e) = desc.check_completion(SG_IO_NAME) {
                if let Some(key) = desc.sense_key() {
                    warn!(sense_key = key, "SG_IO returned sense data");
                }
                return Err(e);
            }
            desc.completion
        };

        let received = completion.transferred(dxfer_len);
        debug!(
            received,
            duration_ms = completion.duration_ms,
            "SG_IO completed"
        );
        // the terminator slot after the received bytes is still ours
        extract_serial(&mut buf[..=received])
    }
}
