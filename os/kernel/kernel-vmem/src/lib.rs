//! # Temporary Physical Memory Windows
//!
//! Early boot code has to look at physical memory (firmware tables, ROM
//! shadows) before the kernel has a direct map or a general-purpose VMM. This
//! crate provides the two pieces needed for that:
//!
//! - The [`PageMapper`] contract: map one 4 KiB virtual page to a physical
//!   frame, unmap it again, and expose the bytes behind mapped pages. The
//!   implementation (page tables, frame allocator) lives elsewhere.
//! - [`PhysWindow`]: a scoped, identity-mapped view of an inclusive physical
//!   byte range. Opening the window maps every covering page; dropping it
//!   unmaps exactly those pages. Reads are bounds-checked against the range.
//!
//! ```text
//!  PhysWindow::open(mapper, first, last)
//!      │  map(page, frame) for every 4 KiB page covering [first, last]
//!      │  (on failure: unmap the pages mapped so far, return the error)
//!      ▼
//!  window.read(addr, len) ──► Option<&[u8]>   (None if outside [first, last])
//!      │
//!      ▼
//!  drop(window) ──► unmap(page) for every mapped page, once
//! ```
//!
//! The window holds the mapper's `&mut` borrow for its whole lifetime, so at
//! most one window per mapper can be open at any time.
//!
//! ## Example
//! ```rust
//! # #[cfg(feature = "sim")] {
//! use kernel_memory_addresses::PhysicalAddress;
//! use kernel_vmem::{MapFlags, PhysWindow, sim::SimulatedMemory};
//!
//! let mut memory = SimulatedMemory::new(PhysicalAddress::new(0xE_0000), 0x2_0000);
//! memory.write(PhysicalAddress::new(0xE_0040), b"hello");
//!
//! {
//!     let window = PhysWindow::open(
//!         &mut memory,
//!         PhysicalAddress::new(0xE_0000),
//!         PhysicalAddress::new(0xE_0FFF),
//!         MapFlags::present_rw(),
//!     )
//!     .unwrap();
//!     assert_eq!(window.read(PhysicalAddress::new(0xE_0040), 5), Some(&b"hello"[..]));
//!     assert_eq!(window.read(PhysicalAddress::new(0xE_0FFE), 4), None);
//! }
//!
//! assert_eq!(memory.mapped_page_count(), 0);
//! # }
//! ```

#![cfg_attr(not(any(test, doctest, feature = "sim")), no_std)]
#![allow(unsafe_code)]

mod flags;
mod mapper;
mod window;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use crate::flags::MapFlags;
pub use crate::mapper::{MapError, PageMapper, identity_bytes};
pub use crate::window::{PhysWindow, WindowError};
