// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt;

/// Serial number text recovered from a device.
///
/// Built from raw device bytes one byte per `char`: ASCII passes through,
/// anything else becomes `'?'`, so the text length always equals the number
/// of bytes it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SerialString(String);

impl SerialString {
    pub fn from_ascii_lossy(bytes: &[u8]) -> Self {
        Self(
            bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
        )
    }

    /// Decodes a fixed-width field, dropping trailing space or NUL padding.
    /// Leading spaces are part of the value and kept.
    pub fn from_padded(bytes: &[u8]) -> Self {
        let end = bytes
            .iter()
            .rposition(|&b| b != b' ' && b != 0)
            .map_or(0, |i| i + 1);
        Self::from_ascii_lossy(&bytes[..end])
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SerialString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SerialString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for SerialString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
