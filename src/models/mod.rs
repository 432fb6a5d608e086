//! This module defines the data structures exchanged with the device.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Length-prefixed command/response buffer for `SCSI_IOCTL_SEND_COMMAND`.
pub mod frame;
/// The 512-byte ATA identity record.
pub mod identity;
/// `SG_IO` request/response descriptor.
pub mod passthrough;
/// Serial number text.
pub mod serial;
