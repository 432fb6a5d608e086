// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fs;

use anyhow::{Context, Result};
use hex::FromHex;

pub fn load_fixture(path: &str) -> Result<Vec<u8>> {
    let s = fs::read_to_string(path).with_context(|| format!("failed to read fixture {path}"))?;
    let cleaned = s.trim().replace(|c: char| c.is_whitespace(), "");
    Ok(Vec::from_hex(&cleaned)?)
}
