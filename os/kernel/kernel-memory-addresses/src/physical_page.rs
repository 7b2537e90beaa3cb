use crate::{MemoryPage, PageSize, PhysicalAddress, VirtualPage};
use core::fmt;

/// Physical memory page base for size `S` (a page frame).
///
/// ### Invariants
/// - The low `S::SHIFT` bits of the base are always zero (page aligned).
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PhysicalPage<S: PageSize>(MemoryPage<S>);

impl<S: PageSize> PhysicalPage<S> {
    #[inline]
    #[must_use]
    pub const fn from_page(p: MemoryPage<S>) -> Self {
        Self(p)
    }

    /// Page that contains `addr` (aligns down to page boundary).
    #[inline]
    #[must_use]
    pub const fn containing_address(addr: PhysicalAddress) -> Self {
        Self(MemoryPage::containing(addr.as_u64()))
    }

    #[inline]
    #[must_use]
    pub const fn base(self) -> PhysicalAddress {
        PhysicalAddress::new(self.0.base().as_u64())
    }

    #[inline]
    #[must_use]
    pub const fn number(self) -> u64 {
        self.0.number()
    }

    /// The virtual page at the numerically identical address.
    #[inline]
    #[must_use]
    pub const fn identity(self) -> VirtualPage<S> {
        VirtualPage::from_page(self.0)
    }

    #[inline]
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.next() {
            Some(p) => Some(Self(p)),
            None => None,
        }
    }
}

impl<S: PageSize> fmt::Display for PhysicalPage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<S: PageSize> fmt::Debug for PhysicalPage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PhysicalPage<{}>({:#018X})",
            S::as_str(),
            self.0.base().as_u64()
        )
    }
}

impl<S: PageSize> From<PhysicalPage<S>> for PhysicalAddress {
    fn from(value: PhysicalPage<S>) -> Self {
        value.base()
    }
}
