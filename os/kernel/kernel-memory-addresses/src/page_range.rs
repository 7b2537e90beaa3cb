use crate::{PageSize, PhysicalAddress, PhysicalPage};
use core::fmt;
use core::iter::FusedIterator;

/// Inclusive range of physical pages, `first..=last`.
///
/// Built from a byte range with [`PhysicalPageRange::covering`], so every page
/// that holds at least one byte of the range is included exactly once.
///
/// ### Examples
/// ```rust
/// # use kernel_memory_addresses::*;
/// let range = PhysicalPageRange::<Size4K>::covering(
///     PhysicalAddress::new(0xE_0000),
///     PhysicalAddress::new(0xF_FFFF),
/// )
/// .unwrap();
/// assert_eq!(range.len(), 32);
/// assert_eq!(range.into_iter().last().unwrap().base().as_u64(), 0xF_F000);
/// ```
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct PhysicalPageRange<S: PageSize> {
    first: PhysicalPage<S>,
    last: PhysicalPage<S>,
}

impl<S: PageSize> PhysicalPageRange<S> {
    /// Pages covering the inclusive byte range `[first, last]`.
    ///
    /// Returns `None` if `last < first`.
    #[must_use]
    pub const fn covering(first: PhysicalAddress, last: PhysicalAddress) -> Option<Self> {
        if last.as_u64() < first.as_u64() {
            return None;
        }
        Some(Self {
            first: first.page::<S>(),
            last: last.page::<S>(),
        })
    }

    #[inline]
    #[must_use]
    pub const fn first(&self) -> PhysicalPage<S> {
        self.first
    }

    #[inline]
    #[must_use]
    pub const fn last(&self) -> PhysicalPage<S> {
        self.last
    }

    /// Number of pages in the range (never zero).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.last.number() - self.first.number() + 1
    }

    /// Always `false`; an inclusive range holds at least one page.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, page: PhysicalPage<S>) -> bool {
        self.first <= page && page <= self.last
    }
}

impl<S: PageSize> fmt::Debug for PhysicalPageRange<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PhysicalPageRange<{}>({:#X}..={:#X})",
            S::as_str(),
            self.first.base().as_u64(),
            self.last.base().as_u64()
        )
    }
}

impl<S: PageSize> IntoIterator for PhysicalPageRange<S> {
    type Item = PhysicalPage<S>;
    type IntoIter = PhysicalPages<S>;

    fn into_iter(self) -> Self::IntoIter {
        PhysicalPages {
            next: Some(self.first),
            last: self.last,
        }
    }
}

/// Iterator over a [`PhysicalPageRange`] in ascending order.
#[derive(Clone, Debug)]
pub struct PhysicalPages<S: PageSize> {
    next: Option<PhysicalPage<S>>,
    last: PhysicalPage<S>,
}

impl<S: PageSize> Iterator for PhysicalPages<S> {
    type Item = PhysicalPage<S>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current == self.last {
            None
        } else {
            current.next()
        };
        Some(current)
    }
}

impl<S: PageSize> FusedIterator for PhysicalPages<S> {}
