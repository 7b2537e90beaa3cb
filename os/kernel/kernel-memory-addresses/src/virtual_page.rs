use crate::{MemoryPage, PageSize, PhysicalPage, VirtualAddress};
use core::fmt;

/// Virtual memory page base for size `S`.
///
/// ### Invariants
/// - The low `S::SHIFT` bits of the base are always zero (page aligned).
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VirtualPage<S: PageSize>(MemoryPage<S>);

impl<S: PageSize> VirtualPage<S> {
    #[inline]
    #[must_use]
    pub const fn from_page(p: MemoryPage<S>) -> Self {
        Self(p)
    }

    #[inline]
    #[must_use]
    pub const fn base(self) -> VirtualAddress {
        VirtualAddress::new(self.0.base().as_u64())
    }

    #[inline]
    #[must_use]
    pub const fn number(self) -> u64 {
        self.0.number()
    }

    /// The physical frame at the numerically identical address.
    #[inline]
    #[must_use]
    pub const fn identity(self) -> PhysicalPage<S> {
        PhysicalPage::from_page(self.0)
    }
}

impl<S: PageSize> fmt::Display for VirtualPage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<S: PageSize> fmt::Debug for VirtualPage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VirtualPage<{}>({:#018X})",
            S::as_str(),
            self.0.base().as_u64()
        )
    }
}

impl<S: PageSize> TryFrom<VirtualAddress> for VirtualPage<S> {
    type Error = ();

    #[inline]
    fn try_from(va: VirtualAddress) -> Result<Self, ()> {
        if va.page_offset::<S>() == 0 {
            Ok(va.page())
        } else {
            Err(())
        }
    }
}

impl<S: PageSize> From<VirtualPage<S>> for VirtualAddress {
    fn from(value: VirtualPage<S>) -> Self {
        value.base()
    }
}
