//! # Virtual and Physical Memory Address Types
//!
//! Strongly typed wrappers for raw memory addresses and page bases used by
//! the early-boot mapping code.
//!
//! ## Overview
//!
//! The types prevent mixing virtual and physical addresses at compile time
//! while remaining zero-cost wrappers around `u64` values.
//!
//! | Concept | Generic | Description |
//! |----------|----------|-------------|
//! | [`MemoryAddress`] | – | A raw 64-bit address, either physical or virtual. |
//! | [`MemoryPage<S>`] | [`S: PageSize`](PageSize) | A page-aligned base address of a page of size `S`. |
//!
//! These are then wrapped to distinguish between virtual and physical spaces:
//!
//! | Wrapper | Meaning |
//! |----------|----------|
//! | [`VirtualAddress`] / [`VirtualPage<S>`] | Refer to virtual (page-table translated) memory. |
//! | [`PhysicalAddress`] / [`PhysicalPage<S>`] | Refer to physical memory or firmware regions. |
//! | [`PhysicalPageRange<S>`] | Inclusive run of physical pages covering a byte range. |
//!
//! ## Identity Mapping
//!
//! Before a direct map exists, firmware regions are reached by mapping each
//! physical frame at the virtual page with the same number.
//! [`PhysicalPage::identity`] and [`VirtualPage::identity`] make that
//! conversion explicit instead of casting raw integers.
//!
//! ```rust
//! # use kernel_memory_addresses::*;
//! let frame = PhysicalAddress::new(0x000F_5A30).page::<Size4K>();
//! let page = frame.identity();
//! assert_eq!(page.base().as_u64(), frame.base().as_u64());
//! assert_eq!(page.identity(), frame);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

mod memory_address;
mod memory_page;
mod page_range;
mod page_size;
mod physical_address;
mod physical_page;
mod virtual_address;
mod virtual_page;

pub use crate::memory_address::MemoryAddress;
pub use crate::memory_page::MemoryPage;
pub use crate::page_range::{PhysicalPageRange, PhysicalPages};
pub use crate::page_size::{PageSize, Size4K};
pub use crate::physical_address::PhysicalAddress;
pub use crate::physical_page::PhysicalPage;
pub use crate::virtual_address::VirtualAddress;
pub use crate::virtual_page::VirtualPage;
