use crate::{MapError, MapFlags, PageMapper};
use kernel_memory_addresses::{
    PhysicalAddress, PhysicalPageRange, Size4K, VirtualAddress, VirtualPage,
};
use log::{debug, warn};

/// Identity-mapped, bounds-checked view of the physical byte range `[first, last]`.
///
/// Every 4 KiB page covering the range is mapped when the window is opened
/// and unmapped when it is dropped, on every exit path of the owning scope.
/// The window borrows the mapper mutably, so no second window can be opened
/// on the same mapper while this one exists.
pub struct PhysWindow<'m, M: PageMapper> {
    mapper: &'m mut M,
    first: PhysicalAddress,
    last: PhysicalAddress,
    pages: PhysicalPageRange<Size4K>,
    /// Number of pages of `pages`, counted from the start, that are mapped.
    mapped: u64,
}

impl<'m, M: PageMapper> PhysWindow<'m, M> {
    /// Map every page covering `[first, last]` at its identity address.
    ///
    /// # Errors
    /// - [`WindowError::EmptyRange`] if `last < first`.
    /// - [`WindowError::Map`] if any page fails to map. The pages mapped
    ///   before the failing one are unmapped again before this returns.
    pub fn open(
        mapper: &'m mut M,
        first: PhysicalAddress,
        last: PhysicalAddress,
        flags: MapFlags,
    ) -> Result<Self, WindowError> {
        let pages = PhysicalPageRange::<Size4K>::covering(first, last)
            .ok_or(WindowError::EmptyRange { first, last })?;

        let mut window = Self {
            mapper,
            first,
            last,
            pages,
            mapped: 0,
        };

        for frame in pages {
            let page = frame.identity();
            if let Err(source) = window.mapper.map(page, frame, flags) {
                warn!(
                    "Mapping {page} for physical window {first}..={last} failed: {source}; releasing {} page(s)",
                    window.mapped
                );
                // Dropping `window` unmaps what was mapped so far.
                return Err(WindowError::Map { page, source });
            }
            window.mapped += 1;
        }

        debug!(
            "Opened physical window {first}..={last} ({} page(s))",
            window.mapped
        );
        Ok(window)
    }

    /// First byte of the window.
    #[inline]
    #[must_use]
    pub const fn first(&self) -> PhysicalAddress {
        self.first
    }

    /// Last byte of the window (inclusive).
    #[inline]
    #[must_use]
    pub const fn last(&self) -> PhysicalAddress {
        self.last
    }

    /// Number of bytes in the window.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.last.as_u64() - self.first.as_u64() + 1
    }

    /// Always `false`; an open window spans at least one byte.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Number of 4 KiB pages the window keeps mapped.
    #[inline]
    #[must_use]
    pub const fn page_count(&self) -> u64 {
        self.pages.len()
    }

    /// Whether `addr .. addr + len` lies entirely inside the window.
    ///
    /// A zero-length span is inside if `addr` is.
    #[must_use]
    pub fn contains(&self, addr: PhysicalAddress, len: usize) -> bool {
        if addr < self.first || addr > self.last {
            return false;
        }
        let Ok(len) = u64::try_from(len) else {
            return false;
        };
        let available = self.last.as_u64() - addr.as_u64() + 1;
        len <= available
    }

    /// Borrow `len` bytes at `addr`, or `None` if any of them is outside the window.
    #[must_use]
    pub fn read(&self, addr: PhysicalAddress, len: usize) -> Option<&[u8]> {
        if !self.contains(addr, len) {
            return None;
        }
        let va = VirtualAddress::new(addr.as_u64());
        // SAFETY: Every page covering [first, last] stays mapped until drop,
        // and the returned slice cannot outlive `&self`.
        Some(unsafe { self.mapper.mapped_bytes(va, len) })
    }

    /// Copy `N` bytes at `addr`, or `None` if any of them is outside the window.
    #[must_use]
    pub fn read_array<const N: usize>(&self, addr: PhysicalAddress) -> Option<[u8; N]> {
        let bytes = self.read(addr, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Some(out)
    }
}

impl<M: PageMapper> Drop for PhysWindow<'_, M> {
    fn drop(&mut self) {
        let mapped = usize::try_from(self.mapped).unwrap_or(usize::MAX);
        for frame in self.pages.into_iter().take(mapped) {
            self.mapper.unmap(frame.identity());
        }
        if self.mapped > 0 {
            debug!(
                "Closed physical window {}..={} ({} page(s) unmapped)",
                self.first, self.last, self.mapped
            );
        }
        self.mapped = 0;
    }
}

/// Failure to open a [`PhysWindow`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum WindowError {
    #[error("empty physical window {first}..={last}")]
    EmptyRange {
        first: PhysicalAddress,
        last: PhysicalAddress,
    },
    #[error("failed to map {page} for a physical window")]
    Map {
        page: VirtualPage<Size4K>,
        #[source]
        source: MapError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedMemory;

    fn pa(v: u64) -> PhysicalAddress {
        PhysicalAddress::new(v)
    }

    #[test]
    fn reads_are_bounded_by_the_byte_range() {
        let mut memory = SimulatedMemory::new(pa(0x1_0000), 0x4000);
        memory.write(pa(0x1_0100), &[1, 2, 3, 4]);

        let window =
            PhysWindow::open(&mut memory, pa(0x1_0100), pa(0x1_0103), MapFlags::present_rw())
                .expect("window");
        assert_eq!(window.len(), 4);
        assert_eq!(window.page_count(), 1);
        assert_eq!(window.read(pa(0x1_0100), 4), Some(&[1, 2, 3, 4][..]));
        assert_eq!(window.read_array::<2>(pa(0x1_0102)), Some([3, 4]));
        assert_eq!(window.read(pa(0x1_0101), 4), None);
        assert_eq!(window.read(pa(0x1_00FF), 1), None);
        assert_eq!(window.read(pa(0x1_0104), 0), None);
        assert!(window.contains(pa(0x1_0103), 1));
        assert!(window.contains(pa(0x1_0103), 0));
    }

    #[test]
    fn reversed_range_maps_nothing() {
        let mut memory = SimulatedMemory::new(pa(0x1_0000), 0x4000);
        let err = PhysWindow::open(&mut memory, pa(0x1_2000), pa(0x1_1000), MapFlags::present_rw())
            .err();
        assert_eq!(
            err,
            Some(WindowError::EmptyRange {
                first: pa(0x1_2000),
                last: pa(0x1_1000),
            })
        );
        assert!(memory.map_calls().is_empty());
        assert!(memory.unmap_calls().is_empty());
    }

    #[test]
    fn spanning_pages_are_mapped_and_released() {
        let mut memory = SimulatedMemory::new(pa(0x1_0000), 0x4000);
        memory.write(pa(0x1_0FFE), &[0xAA, 0xBB, 0xCC, 0xDD]);
        {
            let window =
                PhysWindow::open(&mut memory, pa(0x1_0FF0), pa(0x1_100F), MapFlags::present_rw())
                    .expect("window");
            assert_eq!(window.page_count(), 2);
            assert_eq!(
                window.read(pa(0x1_0FFE), 4),
                Some(&[0xAA, 0xBB, 0xCC, 0xDD][..])
            );
        }
        assert_eq!(memory.map_calls().len(), 2);
        assert_eq!(memory.unmap_calls().len(), 2);
        assert_eq!(memory.mapped_page_count(), 0);
    }

    #[test]
    fn failure_on_third_of_five_pages_releases_exactly_two() {
        let mut memory = SimulatedMemory::new(pa(0x1_0000), 0x8000)
            .fail_nth_map(3, MapError::OutOfMemory);

        let err = PhysWindow::open(&mut memory, pa(0x1_0000), pa(0x1_4FFF), MapFlags::present_rw())
            .err()
            .expect("third page must fail");

        let third = pa(0x1_2000).page::<Size4K>().identity();
        assert_eq!(
            err,
            WindowError::Map {
                page: third,
                source: MapError::OutOfMemory,
            }
        );

        let first = pa(0x1_0000).page::<Size4K>().identity();
        let second = pa(0x1_1000).page::<Size4K>().identity();
        assert_eq!(memory.map_calls(), &[first, second, third]);
        assert_eq!(memory.unmap_calls(), &[first, second]);
        assert_eq!(memory.unmap_count(first), 1);
        assert_eq!(memory.unmap_count(second), 1);
        assert_eq!(memory.unmap_count(third), 0);
        assert_eq!(memory.mapped_page_count(), 0);
    }

    #[test]
    fn failure_on_first_page_unmaps_nothing() {
        let mut memory =
            SimulatedMemory::new(pa(0x1_0000), 0x8000).fail_nth_map(1, MapError::OutOfMemory);
        assert!(
            PhysWindow::open(&mut memory, pa(0x1_0000), pa(0x1_1FFF), MapFlags::present_rw())
                .is_err()
        );
        assert_eq!(memory.map_calls().len(), 1);
        assert!(memory.unmap_calls().is_empty());
    }

    #[test]
    fn pages_are_identity_mapped_with_requested_flags() {
        let mut memory = SimulatedMemory::new(pa(0x1_0000), 0x8000);
        let window = PhysWindow::open(
            &mut memory,
            pa(0x1_3000),
            pa(0x1_3FFF),
            MapFlags::present_rw_nx(),
        )
        .expect("window");
        drop(window);

        let page = pa(0x1_3000).page::<Size4K>().identity();
        assert_eq!(memory.map_calls(), &[page]);
        assert_eq!(memory.map_flags(), &[MapFlags::present_rw_nx()]);
        assert_eq!(page.base().as_u64(), 0x1_3000);
        assert_eq!(memory.unmap_count(page), 1);
        assert_eq!(memory.flags_of(page), None);
    }

    #[test]
    fn open_window_keeps_pages_mapped() {
        let mut memory = SimulatedMemory::new(pa(0x1_0000), 0x8000);
        let window =
            PhysWindow::open(&mut memory, pa(0x1_0000), pa(0x1_2FFF), MapFlags::present_rw())
                .expect("window");
        assert_eq!(window.page_count(), 3);
        let _ = window.read(pa(0x1_2FFF), 1).expect("last byte readable");
        drop(window);
        assert_eq!(memory.unmap_calls().len(), 3);
    }

    #[test]
    fn pages_outside_the_mapper_fail_cleanly() {
        let mut memory = SimulatedMemory::new(pa(0x1_0000), 0x2000);
        let err = PhysWindow::open(&mut memory, pa(0x1_1000), pa(0x1_2FFF), MapFlags::present_rw())
            .err();
        assert!(matches!(
            err,
            Some(WindowError::Map {
                source: MapError::Unsupported { .. },
                ..
            })
        ));
        assert_eq!(memory.unmap_calls().len(), 1);
        assert_eq!(memory.mapped_page_count(), 0);
    }
}
