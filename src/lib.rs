//! Incore reports how many pages of a file's contents are currently resident
//! in the operating system's page cache, via [`resident_pages`]. It observes
//! cache state without mutating it: nothing is prefetched, faulted in, or
//! evicted by a scan.
//!
//! ## Terminology
//!
//! - A **page** is the kernel's unit of cache accounting; its size varies
//!   between platforms and can be queried through [`page_size`].
//!
//! - A **resident** page is one whose backing file content is held in RAM
//!   right now, so the next access avoids a storage read. Residency is
//!   reported by `mincore(2)` and is inherently a snapshot: the kernel is
//!   free to change it the moment after it is observed.
//!
//! - A **window** is a bounded-size `PROT_NONE` mapping of a subrange of a
//!   file. Files are scanned one window at a time, so address-space use
//!   stays fixed ([`WINDOW_PAGES`] pages) no matter how large the file is.

#[cfg(not(unix))]
compile_error!("incore relies on mincore(2) and requires a Unix-like target");

pub mod report;
pub mod scan;
pub mod sys;


pub use scan::{resident_pages, ScanError, WINDOW_PAGES};
pub use sys::page_size;
