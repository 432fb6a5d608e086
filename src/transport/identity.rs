// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::debug;

use crate::{
    device::{BlockDevice, HDIO_GET_IDENTITY_NAME},
    error::QueryError,
    models::{identity::DriveIdentity, serial::SerialString},
    transport::Transport,
};

/// Direct ATA identity read; no CDB involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRead;

impl Transport for IdentityRead {
    fn name(&self) -> &'static str {
        "identity_read"
    }

    fn call(&self) -> &'static str {
        HDIO_GET_IDENTITY_NAME
    }

    fn query(&self, dev: &mut dyn BlockDevice) -> Result<SerialString, QueryError> {
        let mut id = DriveIdentity::zeroed();
        dev.get_identity(&mut id)
            .map_err(|e| QueryError::from_io(HDIO_GET_IDENTITY_NAME, &e))?;

        debug!(
            model = %id.model(),
            firmware = %id.firmware_revision(),
            "identity record read"
        );
        Ok(id.serial())
    }
}
