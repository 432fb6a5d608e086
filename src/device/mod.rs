// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Device handle seam between the transports and the operating system.
//!
//! Transports talk to a [`BlockDevice`]; the orchestrator obtains one per
//! attempt from a [`DeviceOpener`] and drops it (closing the handle) when the
//! attempt ends. All operations are blocking and read-only.

use std::{io, path::Path};

use crate::models::{identity::DriveIdentity, passthrough::PassthroughDescriptor};

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "linux")]
pub use linux::{LinuxDevice, SystemOpener};

pub const HDIO_GET_IDENTITY_NAME: &str = "HDIO_GET_IDENTITY";
pub const SCSI_IOCTL_SEND_COMMAND_NAME: &str = "SCSI_IOCTL_SEND_COMMAND";
pub const SG_IO_NAME: &str = "SG_IO";

pub trait BlockDevice {
    /// `HDIO_GET_IDENTITY`: fill the 512-byte ATA identity record.
    fn get_identity(&mut self, id: &mut DriveIdentity) -> io::Result<()>;

    /// `SCSI_IOCTL_SEND_COMMAND`: `frame` is an encoded
    /// [`TransferFrame`](crate::models::frame::TransferFrame) and receives
    /// the response in place. Returns the non-negative ioctl result; a
    /// positive value is the SCSI status of a failed command.
    fn send_command(&mut self, frame: &mut [u8]) -> io::Result<i32>;

    /// `SG_IO`: issue the descriptor and write back its completion fields.
    fn generic_passthrough(&mut self, desc: &mut PassthroughDescriptor<'_>) -> io::Result<()>;
}

pub trait DeviceOpener {
    fn open_read_only(&self, path: &Path) -> io::Result<Box<dyn BlockDevice>>;
}

/// Stand-in on platforms without the block device ioctls: every open fails,
/// so each transport reports an open error.
#[cfg(not(target_os = "linux"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

#[cfg(not(target_os = "linux"))]
impl DeviceOpener for SystemOpener {
    fn open_read_only(&self, _path: &Path) -> io::Result<Box<dyn BlockDevice>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "block device ioctls are only available on Linux",
        ))
    }
}
