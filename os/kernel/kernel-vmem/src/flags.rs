use bitfield_struct::bitfield;

/// Leaf permission and caching bits requested for a single 4 KiB mapping.
///
/// This is the subset of an x86-64 page table entry that a caller of
/// [`PageMapper::map`](crate::PageMapper::map) gets to choose. The address
/// field and the CPU-maintained bits (accessed, dirty) are owned by the
/// mapper and are modelled as padding here.
///
/// ### Bit layout
///
/// | Bits  | Name              | Meaning |
/// |-------|-------------------|---------|
/// | 0     | `P` (present)     | Valid entry if set |
/// | 1     | `RW`              | Writable if set |
/// | 2     | `US`              | User-mode accessible if set |
/// | 3     | `PWT`             | Write-through caching |
/// | 4     | `PCD`             | Disable caching |
/// | 5–7   | –                 | Accessed, dirty, PAT (mapper-owned) |
/// | 8     | `G`               | Global |
/// | 9–62  | –                 | Address and OS bits (mapper-owned) |
/// | 63    | `NX`              | Execute disable |
///
/// ### Example
/// ```rust
/// # use kernel_vmem::MapFlags;
/// let flags = MapFlags::present_rw();
/// assert!(flags.present() && flags.writable());
/// assert!(!flags.user_access());
/// assert_eq!(flags.into_bits() & 0b11, 0b11);
/// ```
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct MapFlags {
    /// Present (P, bit 0).
    pub present: bool,

    /// Writable (RW, bit 1).
    pub writable: bool,

    /// User/Supervisor (US, bit 2). Clear restricts access to the kernel.
    pub user_access: bool,

    /// Page Write-Through (PWT, bit 3).
    pub write_through: bool,

    /// Page Cache Disable (PCD, bit 4).
    pub cache_disabled: bool,

    #[bits(3)]
    __: u8,

    /// Global (G, bit 8). Survives CR3 reloads; unsuitable for temporary windows.
    pub global: bool,

    #[bits(54)]
    __: u64,

    /// No-Execute (NX, bit 63).
    pub no_execute: bool,
}

impl MapFlags {
    /// Kernel-only, present and writable. What temporary firmware windows use.
    #[inline]
    #[must_use]
    pub const fn present_rw() -> Self {
        Self::new().with_present(true).with_writable(true)
    }

    /// Kernel-only, present, writable and non-executable.
    #[inline]
    #[must_use]
    pub const fn present_rw_nx() -> Self {
        Self::present_rw().with_no_execute(true)
    }
}
