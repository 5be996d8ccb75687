use std::{
    ffi::c_void,
    io,
    os::unix::io::RawFd,
    ptr::{null_mut, NonNull},
};

use lazy_static::lazy_static;

lazy_static! {
    static ref PAGE_SIZE: usize = unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize };
}

/// The granularity, in bytes, at which the kernel tracks cache residency.
pub fn page_size() -> usize {
    *PAGE_SIZE
}

/// Maps `len` bytes of `fd` starting at `offset` without faulting anything in.
///
/// The mapping is `PROT_NONE`: it exists only so that the residency of the
/// backing pages can be interrogated, and can never be dereferenced. `offset`
/// must be page-aligned.
pub fn map_window(fd: RawFd, offset: u64, len: usize) -> io::Result<NonNull<c_void>> {
    debug_assert_eq!(offset % page_size() as u64, 0);

    let addr = unsafe {
        // According to `mmap(2)`: a `PROT_NONE` private mapping reserves the
        // range and associates it with the file, but no page of the file is
        // read or copied while the pages stay inaccessible.
        libc::mmap(
            null_mut(),
            len,
            libc::PROT_NONE,
            libc::MAP_PRIVATE,
            fd,
            offset as libc::off_t,
        )
    };

    if addr != libc::MAP_FAILED {
        Ok(NonNull::new(addr).unwrap())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Releases a window previously created by [`map_window`].
///
/// # Safety
///
/// `addr`/`len` must describe exactly one live mapping returned by
/// [`map_window`], and nothing may use that mapping afterwards.
pub unsafe fn unmap_window(addr: NonNull<c_void>, len: usize) {
    assert_eq!(
        libc::munmap(addr.as_ptr(), len),
        0,
        "failed to unmap window: {}",
        io::Error::last_os_error()
    );
}

/// Fills `vec` with one flag byte per page of the mapped range
/// `[addr, addr + len)`, as reported by `mincore(2)`.
///
/// `vec` is cleared and resized to `len.div_ceil(page_size())`; passing the
/// same vector across calls reuses its allocation. Bit 0 of each byte is set
/// iff the corresponding page is resident in the page cache at call time.
/// The report is a best-effort snapshot and can be stale by the time the
/// caller looks at it.
pub fn residency(addr: NonNull<c_void>, len: usize, vec: &mut Vec<u8>) -> io::Result<()> {
    vec.clear();
    vec.resize(len.div_ceil(page_size()), 0);

    let rc = unsafe {
        // N.B. the vector argument is `unsigned char *` on Linux but
        // `char *` on the BSDs and macOS, hence the cast.
        libc::mincore(addr.as_ptr(), len, vec.as_mut_ptr().cast())
    };

    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}
