// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::fmt;

use serde::{Deserialize, Serialize};

/// Serial number query mechanisms, named after what they issue.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// `HDIO_GET_IDENTITY`
    #[serde(
        rename = "IdentityRead",
        alias = "identity_read",
        alias = "hdio",
        alias = "HDIO_GET_IDENTITY"
    )]
    IdentityRead,
    /// `SCSI_IOCTL_SEND_COMMAND`
    #[serde(
        rename = "LegacyPassthrough",
        alias = "legacy_passthrough",
        alias = "scsi_ioctl",
        alias = "SCSI_IOCTL_SEND_COMMAND"
    )]
    LegacyPassthrough,
    /// `SG_IO`
    #[serde(
        rename = "GenericPassthrough",
        alias = "generic_passthrough",
        alias = "sg_io",
        alias = "SgIo",
        alias = "SG_IO"
    )]
    GenericPassthrough,
}

impl TransportKind {
    pub const ALL: [TransportKind; 3] = [
        TransportKind::IdentityRead,
        TransportKind::LegacyPassthrough,
        TransportKind::GenericPassthrough,
    ];
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransportKind::IdentityRead => "IdentityRead",
            TransportKind::LegacyPassthrough => "LegacyPassthrough",
            TransportKind::GenericPassthrough => "GenericPassthrough",
        })
    }
}
