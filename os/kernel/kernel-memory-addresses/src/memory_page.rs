use crate::{MemoryAddress, PageSize};
use core::fmt;
use core::marker::PhantomData;

/// A page base address (lower `S::SHIFT` bits are zero).
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MemoryPage<S: PageSize> {
    value: u64,
    _phantom: PhantomData<S>,
}

impl<S: PageSize> MemoryPage<S> {
    /// Page that contains `addr` (aligns down).
    #[inline]
    #[must_use]
    pub const fn containing(addr: u64) -> Self {
        Self {
            value: addr & !(S::SIZE - 1),
            _phantom: PhantomData,
        }
    }

    /// Return the base as `MemoryAddress`.
    #[inline]
    #[must_use]
    pub const fn base(self) -> MemoryAddress {
        MemoryAddress::new(self.value)
    }

    /// Page frame number of this page.
    #[inline]
    #[must_use]
    pub const fn number(self) -> u64 {
        self.value >> S::SHIFT
    }

    /// The page following this one, or `None` at the top of the address space.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.value.checked_add(S::SIZE) {
            Some(value) => Some(Self {
                value,
                _phantom: PhantomData,
            }),
            None => None,
        }
    }
}

impl<S: PageSize> fmt::Display for MemoryPage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}/{}", self.value, S::as_str())
    }
}

impl<S: PageSize> fmt::Debug for MemoryPage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryPage<{}>(0x{:016X})", S::as_str(), self.value)
    }
}

impl<S: PageSize> From<MemoryPage<S>> for MemoryAddress {
    fn from(value: MemoryPage<S>) -> Self {
        value.base()
    }
}
