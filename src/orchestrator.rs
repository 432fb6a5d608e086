// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Runs every configured transport against one device path.
//!
//! Each attempt opens the device read-only, queries, and closes it again;
//! a failing attempt is recorded and the next one still runs.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::{info, info_span, warn};

use crate::{
    cfg::config::QueryConfig,
    device::DeviceOpener,
    error::QueryError,
    models::serial::SerialString,
    transport::{AnyTransport, Transport},
};

/// Result of one transport attempt.
#[derive(Debug)]
pub struct TransportOutcome {
    pub name: &'static str,
    pub call: &'static str,
    pub result: Result<SerialString, QueryError>,
}

impl TransportOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn serial(&self) -> Option<&SerialString> {
        self.result.as_ref().ok()
    }
}

impl fmt::Display for TransportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(serial) => write!(f, "{:<23} : [{serial}]", self.call),
            Err(e) => write!(f, "{e}\ncall {}() fail", self.name),
        }
    }
}

/// All outcomes for one device, in the order the transports ran.
#[derive(Debug)]
pub struct QueryReport {
    pub device: PathBuf,
    pub outcomes: Vec<TransportOutcome>,
}

impl QueryReport {
    /// True when at least one transport recovered a serial.
    pub fn any_success(&self) -> bool {
        self.outcomes.iter().any(TransportOutcome::is_success)
    }

    pub fn successes(&self) -> impl Iterator<Item = &TransportOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &TransportOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

impl fmt::Display for QueryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{outcome}")?;
        }
        Ok(())
    }
}

/// Open, query, close. The handle is dropped before returning whatever the
/// outcome.
pub fn run_transport<O>(opener: &O, path: &Path, transport: &AnyTransport) -> Result<SerialString, QueryError>
where
    O: DeviceOpener + ?Sized,
{
    let mut dev = opener.open_read_only(path).map_err(|source| QueryError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    transport.query(&mut *dev)
}

pub fn query_with<O>(opener: &O, path: &Path, transports: &[AnyTransport]) -> QueryReport
where
    O: DeviceOpener + ?Sized,
{
    let outcomes = transports
        .iter()
        .map(|transport| {
            let span = info_span!("transport", transport = transport.name(), call = transport.call());
            let _enter = span.enter();

            let result = run_transport(opener, path, transport);
            match &result {
                Ok(serial) => info!(%serial, "serial recovered"),
                Err(e) => warn!(error = %e, kind = ?e.kind(), "transport failed"),
            }
            TransportOutcome {
                name: transport.name(),
                call: transport.call(),
                result,
            }
        })
        .collect();

    QueryReport {
        device: path.to_path_buf(),
        outcomes,
    }
}

/// Query `device_path` with the configured transports through the real
/// device layer.
pub fn query_configured(device_path: &Path, cfg: &QueryConfig) -> QueryReport {
    let transports = AnyTransport::from_config(cfg);
    query_with(&crate::device::SystemOpener, device_path, &transports)
}

/// Query `device_path` with all three transports in the default order.
pub fn query_all(device_path: &Path) -> QueryReport {
    query_configured(device_path, &QueryConfig::default())
}
