//! The windowed residency scanner.
//!
//! A file is never mapped whole. Instead, `[0, file_size)` is walked in
//! fixed-capacity windows, each mapped, interrogated, and released before the
//! next is created, so peak address-space use is bounded by one window
//! regardless of file size.

use std::{
    fs::File,
    io,
    os::unix::io::{AsRawFd, RawFd},
};

use thiserror::Error;

use crate::sys;

/// Pages mapped per window.
///
/// Window size depends on the page size: 128 MiB on a 4 KiB-page platform.
pub const WINDOW_PAGES: usize = 32 * 1024;

/// Why a file's scan was abandoned.
///
/// Both variants are scoped to a single file; the caller is expected to move
/// on to its next file.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Creating a window mapping failed, typically from address-space or
    /// resource exhaustion. The scan stops at the first such window rather
    /// than reporting the same exhaustion once per remaining window.
    #[error("failed to map window at offset {offset}")]
    Map {
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// `mincore(2)` failed on a window that did map.
    #[error("failed to query residency at offset {offset}")]
    Residency {
        offset: u64,
        #[source]
        source: io::Error,
    },
}

/// Counts how many pages of `file` are resident in the page cache.
///
/// `file_size` is the byte size the caller already obtained from a single
/// stat; the file is not re-stat'ed here. An empty file yields `Ok(0)`
/// without touching the address space. On error the count accumulated so far
/// is discarded: the result is pass/fail for the whole file.
///
/// The count is a snapshot. The kernel may fault pages in or evict them the
/// instant after a window is interrogated, so
/// `0 <= count <= file_size.div_ceil(page_size)` is the only bound a caller
/// may rely on.
pub fn resident_pages(file: &File, file_size: u64) -> Result<u64, ScanError> {
    scan_windows(file.as_raw_fd(), file_size, sys::page_size(), WINDOW_PAGES)
}

/// Window loop behind [`resident_pages`], with the window capacity as a
/// parameter so tests can shrink it.
pub(crate) fn scan_windows(
    fd: RawFd,
    file_size: u64,
    page_size: usize,
    window_pages: usize,
) -> Result<u64, ScanError> {
    // Empty file is no error.
    if file_size == 0 {
        return Ok(0);
    }

    let window_size = window_pages as u64 * page_size as u64;

    // One residency vector serves every window of the scan; `sys::residency`
    // resizes it to the exact page count of each window, so a trailing short
    // window is never over-counted.
    let mut vec = Vec::new();
    let mut count: u64 = 0;

    let mut offset = 0;
    while offset < file_size {
        let len = (file_size - offset).min(window_size) as usize;

        let window = sys::map_window(fd, offset, len)
            .map_err(|source| ScanError::Map { offset, source })?;

        let queried = sys::residency(window, len, &mut vec);

        // The window is released on both paths; a failed query must not leave
        // the mapping behind with no owner.
        unsafe { sys::unmap_window(window, len) };
        queried.map_err(|source| ScanError::Residency { offset, source })?;

        count += vec.iter().filter(|&&flags| flags & 0x1 != 0).count() as u64;
        offset += window_size;
    }

    Ok(count)
}
