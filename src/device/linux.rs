// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    fs::{File, OpenOptions},
    io,
    os::{raw::c_void, unix::io::AsRawFd},
    path::{Path, PathBuf},
    ptr,
};

use tracing::debug;
use zerocopy::IntoBytes;

use crate::{
    device::{BlockDevice, DeviceOpener},
    models::{identity::DriveIdentity, passthrough::PassthroughDescriptor},
};

// linux/hdreg.h
const HDIO_GET_IDENTITY: libc::Ioctl = 0x030d;
// scsi/scsi_ioctl.h
const SCSI_IOCTL_SEND_COMMAND: libc::Ioctl = 1;
// scsi/sg.h
const SG_IO: libc::Ioctl = 0x2285;

/// Mirror of `struct sg_io_hdr` from `scsi/sg.h`.
#[repr(C)]
struct SgIoHdr {
    interface_id: libc::c_int,
    dxfer_direction: libc::c_int,
    cmd_len: libc::c_uchar,
    mx_sb_len: libc::c_uchar,
    iovec_count: libc::c_ushort,
    dxfer_len: libc::c_uint,
    dxferp: *mut c_void,
    cmdp: *const libc::c_uchar,
    sbp: *mut libc::c_uchar,
    timeout: libc::c_uint,
    flags: libc::c_uint,
    pack_id: libc::c_int,
    usr_ptr: *mut c_void,
    status: libc::c_uchar,
    masked_status: libc::c_uchar,
    msg_status: libc::c_uchar,
    sb_len_wr: libc::c_uchar,
    host_status: libc::c_ushort,
    driver_status: libc::c_ushort,
    resid: libc::c_int,
    duration: libc::c_uint,
    info: libc::c_uint,
}

impl SgIoHdr {
    fn for_descriptor(desc: &mut PassthroughDescriptor<'_>) -> io::Result<Self> {
        let cmd_len = u8::try_from(desc.command.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "CDB longer than 255 bytes"))?;
        let dxfer_len = u32::try_from(desc.response.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "response buffer exceeds u32"))?;
        Ok(Self {
            interface_id: libc::c_int::from(desc.interface_id),
            dxfer_direction: desc.direction.as_raw(),
            cmd_len,
            mx_sb_len: desc.sense.len() as libc::c_uchar,
            iovec_count: 0,
            dxfer_len,
            dxferp: desc.response.as_mut_ptr().cast(),
            cmdp: desc.command.as_ptr(),
            sbp: desc.sense.as_mut_ptr(),
            timeout: desc.timeout_ms(),
            flags: 0,
            pack_id: 0,
            usr_ptr: ptr::null_mut(),
            status: 0,
            masked_status: 0,
            msg_status: 0,
            sb_len_wr: 0,
            host_status: 0,
            driver_status: 0,
            resid: 0,
            duration: 0,
            info: 0,
        })
    }
}

/// A block device special file opened read-only. Closed on drop.
#[derive(Debug)]
pub struct LinuxDevice {
    path: PathBuf,
    file: File,
}

impl LinuxDevice {
    pub fn open_read_only(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        debug!(path = %path.display(), fd = file.as_raw_fd(), "device opened read-only");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    fn ioctl(&self, request: libc::Ioctl, arg: *mut c_void) -> io::Result<i32> {
        // SAFETY: `arg` points to a live, correctly sized argument for
        // `request`, borrowed mutably by the caller for the whole call.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), request, arg) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(rc)
    }
}

impl Drop for LinuxDevice {
    fn drop(&mut self) {
        debug!(path = %self.path.display(), "device closed");
    }
}

impl BlockDevice for LinuxDevice {
    fn get_identity(&mut self, id: &mut DriveIdentity) -> io::Result<()> {
        let buf = id.as_mut_bytes();
        self.ioctl(HDIO_GET_IDENTITY, buf.as_mut_ptr().cast())?;
        Ok(())
    }

    fn send_command(&mut self, frame: &mut [u8]) -> io::Result<i32> {
        self.ioctl(SCSI_IOCTL_SEND_COMMAND, frame.as_mut_ptr().cast())
    }

    fn generic_passthrough(&mut self, desc: &mut PassthroughDescriptor<'_>) -> io::Result<()> {
        let mut hdr = SgIoHdr::for_descriptor(desc)?;
        self.ioctl(SG_IO, ptr::addr_of_mut!(hdr).cast())?;

        desc.completion.status = hdr.status;
        desc.completion.host_status = hdr.host_status;
        desc.completion.driver_status = hdr.driver_status;
        desc.completion.resid = hdr.resid;
        desc.completion.sb_len_wr = hdr.sb_len_wr;
        desc.completion.duration_ms = hdr.duration;
        Ok(())
    }
}

/// Opens real device nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl DeviceOpener for SystemOpener {
    fn open_read_only(&self, path: &Path) -> io::Result<Box<dyn BlockDevice>> {
        Ok(Box::new(LinuxDevice::open_read_only(path)?))
    }
}
