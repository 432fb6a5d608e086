// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    cell::Cell,
    io,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::{Context, Result};
use hd_serial::{
    cfg::config::Config,
    device::{BlockDevice, DeviceOpener},
    models::{
        frame::FRAME_HEADER_LEN,
        identity::DriveIdentity,
        passthrough::{Completion, PassthroughDescriptor},
    },
};
use zerocopy::IntoBytes;

pub fn test_path() -> String {
    std::env::var("TEST_CONFIG").unwrap_or_else(|_| "tests/config.yaml".into())
}

pub fn load_config() -> Result<Config> {
    let path = test_path();
    let pb = PathBuf::from(path);
    let cfg = Config::load_from_file(&pb).with_context(|| format!("failed to load {:?}", pb))?;
    Ok(cfg)
}

/// VPD 0x80 page carrying `serial`.
pub fn serial_page(serial: &[u8]) -> Vec<u8> {
    let mut page = vec![0x00, 0x80, 0x00, serial.len() as u8];
    page.extend_from_slice(serial);
    page
}

/// Describes how a simulated disk answers each ioctl. `None` or an errno
/// makes that mechanism fail.
#[derive(Debug, Clone)]
pub struct ScriptedDisk {
    pub identity: Option<Vec<u8>>,
    pub legacy_page: Result<Vec<u8>, i32>,
    pub sg_page: Result<Vec<u8>, i32>,
    pub sg_completion: Completion,
}

impl ScriptedDisk {
    pub fn unsupported() -> Self {
        Self {
            identity: None,
            legacy_page: Err(libc::EINVAL),
            sg_page: Err(libc::ENOTTY),
            sg_completion: Completion::default(),
        }
    }
}

fn copy_prefix(dst: &mut [u8], src: &[u8]) {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
}

/// One open handle on a [`ScriptedDisk`]; counts itself closed on drop.
struct ScriptedHandle {
    disk: ScriptedDisk,
    open_handles: Rc<Cell<usize>>,
}

impl Drop for ScriptedHandle {
    fn drop(&mut self) {
        self.open_handles.set(self.open_handles.get() - 1);
    }
}

impl BlockDevice for ScriptedHandle {
    fn get_identity(&mut self, id: &mut DriveIdentity) -> io::Result<()> {
        match &self.disk.identity {
            Some(raw) => {
                copy_prefix(id.as_mut_bytes(), raw);
                Ok(())
            },
            None => Err(io::Error::from_raw_os_error(libc::ENOTTY)),
        }
    }

    fn send_command(&mut self, frame: &mut [u8]) -> io::Result<i32> {
        match &self.disk.legacy_page {
            Ok(page) => {
                copy_prefix(&mut frame[FRAME_HEADER_LEN..], page);
                Ok(0)
            },
            Err(code) => Err(io::Error::from_raw_os_error(*code)),
        }
    }

    fn generic_passthrough(&mut self, desc: &mut PassthroughDescriptor<'_>) -> io::Result<()> {
        match &self.disk.sg_page {
            Ok(page) => {
                copy_prefix(desc.response, page);
                desc.completion = self.disk.sg_completion;
                Ok(())
            },
            Err(code) => Err(io::Error::from_raw_os_error(*code)),
        }
    }
}

/// Opener that hands out handles on one scripted disk at a fixed path.
pub struct ScriptedOpener {
    pub path: PathBuf,
    pub disk: ScriptedDisk,
    pub opens: Cell<usize>,
    pub open_handles: Rc<Cell<usize>>,
}

impl ScriptedOpener {
    pub fn new(path: impl Into<PathBuf>, disk: ScriptedDisk) -> Self {
        Self {
            path: path.into(),
            disk,
            opens: Cell::new(0),
            open_handles: Rc::new(Cell::new(0)),
        }
    }
}

impl DeviceOpener for ScriptedOpener {
    fn open_read_only(&self, path: &Path) -> io::Result<Box<dyn BlockDevice>> {
        if path != self.path {
            return Err(io::Error::from_raw_os_error(libc::ENOENT));
        }
        self.opens.set(self.opens.get() + 1);
        self.open_handles.set(self.open_handles.get() + 1);
        Ok(Box::new(ScriptedHandle {
            disk: self.disk.clone(),
            open_handles: Rc::clone(&self.open_handles),
        }))
    }
}
