//! This crate reads a storage device's serial number through every Linux
//! query mechanism that might answer: the ATA identity ioctl, the legacy
//! `SCSI_IOCTL_SEND_COMMAND` passthrough and the generic `SG_IO` passthrough.
// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Handles configuration, command-line parsing, and logging.
pub mod cfg;
/// Builds INQUIRY command blocks and parses VPD responses.
pub mod control_block;
/// Opens device nodes and issues the ioctls.
pub mod device;
/// Unified transport error type.
pub mod error;
/// Defines the identity record, transfer frames and passthrough descriptors.
pub mod models;
/// Runs all transports against a device and collects the report.
pub mod orchestrator;
/// The three serial number query mechanisms.
pub mod transport;
