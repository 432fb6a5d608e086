// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::debug;

use crate::{
    control_block::{
        inquiry::build_inquiry_cdb,
        vpd::{SERIAL_PAGE_BUFFER_SIZE, extract_serial},
    },
    device::{BlockDevice, SCSI_IOCTL_SEND_COMMAND_NAME},
    error::QueryError,
    models::{frame::TransferFrame, serial::SerialString},
    transport::Transport,
};

/// INQUIRY VPD 0x80 through the combined send/receive ioctl.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyPassthrough;

impl LegacyPassthrough {
    /// The outbound frame: header, then CDB in a payload sized for the
    /// serial page plus terminator.
    pub fn request_frame() -> Result<TransferFrame, QueryError> {
        let cdb = build_inquiry_cdb();
        TransferFrame::for_read(cdb.as_bytes(), SERIAL_PAGE_BUFFER_SIZE)
    }
}

impl Transport for LegacyPassthrough {
    fn name(&self) -> &'static str {
        "legacy_passthrough"
    }

    fn call(&self) -> &'static str {
        SCSI_IOCTL_SEND_COMMAND_NAME
    }

    fn query(&self, dev: &mut dyn BlockDevice) -> Result<SerialString, QueryError> {
        let request = Self::request_frame()?;
        debug!(
            inlen = request.header.inlen.get(),
            outlen = request.header.outlen.get(),
            frame_len = request.encoded_len(),
            "sending INQUIRY VPD 0x80"
        );

        let mut raw = request.encode();
        let rc = dev
            .send_command(&mut raw)
            .map_err(|e| QueryError::from_io(SCSI_IOCTL_SEND_COMMAND_NAME, &e))?;
        if rc > 0 {
            return Err(QueryError::DeviceStatus {
                call: SCSI_IOCTL_SEND_COMMAND_NAME,
                status: rc.unsigned_abs(),
                host_status: 0,
                driver_status: 0,
            });
        }

        let mut response = TransferFrame::decode(&raw)?;
        extract_serial(&mut response.payload)
    }
}
