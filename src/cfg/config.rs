// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{collections::HashSet, fs, path::{Path, PathBuf}, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::cfg::enums::TransportKind;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Config {
    /// Which transports to try and how.
    #[serde(default)]
    pub query: QueryConfig,
    /// Logger YAML; when absent a plain stderr logger is used. A relative
    /// path is taken relative to the config file naming it.
    #[serde(default)]
    pub logger_config: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct QueryConfig {
    /// Transports attempted, in order.
    #[serde(default = "default_transports")]
    pub transports: Vec<TransportKind>,
    /// SG_IO timeout in milliseconds.
    #[serde(default = "default_sg_timeout_ms")]
    pub sg_timeout_ms: u32,
}

fn default_transports() -> Vec<TransportKind> {
    TransportKind::ALL.to_vec()
}

fn default_sg_timeout_ms() -> u32 {
    1000
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            transports: default_transports(),
            sg_timeout_ms: default_sg_timeout_ms(),
        }
    }
}

impl QueryConfig {
    #[inline]
    pub fn sg_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.sg_timeout_ms))
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {path:?}"))?;
        let mut cfg: Config = serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        if let Some(base) = path.parent() {
            cfg.anchor_paths(base);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Re-root relative paths at `base`, the directory of the config file.
    pub fn anchor_paths(&mut self, base: &Path) {
        self.logger_config = self.logger_config.take().map(|p| base.join(p));
    }

    pub fn validate(&self) -> Result<()> {
        let q = &self.query;
        ensure!(!q.transports.is_empty(), "transports must not be empty");

        let mut seen = HashSet::new();
        for kind in &q.transports {
            ensure!(seen.insert(kind), "transport {kind} listed twice");
        }

        ensure!(q.sg_timeout_ms > 0, "sg_timeout_ms must be > 0");
        Ok(())
    }
}
