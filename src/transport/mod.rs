// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use enum_dispatch::enum_dispatch;

use crate::{
    cfg::{config::QueryConfig, enums::TransportKind},
    device::BlockDevice,
    error::QueryError,
    models::serial::SerialString,
};

pub mod generic;
pub mod identity;
pub mod legacy;


pub use generic::GenericPassthrough;
pub use identity::IdentityRead;
pub use legacy::LegacyPassthrough;

/// One way of asking an open device for its serial number.
#[enum_dispatch]
pub trait Transport {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// The ioctl request this transport issues.
    fn call(&self) -> &'static str;

    fn query(&self, dev: &mut dyn BlockDevice) -> Result<SerialString, QueryError>;
}

#[enum_dispatch(Transport)]
#[derive(Debug, Clone)]
pub enum AnyTransport {
    IdentityRead,
    LegacyPassthrough,
    GenericPassthrough,
}

impl AnyTransport {
    pub fn from_kind(kind: TransportKind, cfg: &QueryConfig) -> Self {
        match kind {
            TransportKind::IdentityRead => IdentityRead.into(),
            TransportKind::LegacyPassthrough => LegacyPassthrough.into(),
            TransportKind::GenericPassthrough => GenericPassthrough::new(cfg.sg_timeout()).into(),
        }
    }

    /// The configured transports, in order.
    pub fn from_config(cfg: &QueryConfig) -> Vec<Self> {
        cfg.transports
            .iter()
            .map(|&kind| Self::from_kind(kind, cfg))
            .collect()
    }
}
