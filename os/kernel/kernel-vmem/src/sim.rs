//! Simulated physical memory for host-side tests.
//!
//! [`SimulatedMemory`] owns a byte buffer standing in for a stretch of
//! physical memory and implements [`PageMapper`] on top of it. It records every
//! `map`/`unmap` call so tests can check that windows clean up after
//! themselves, and can be told to fail a specific `map` call.

use crate::{MapError, MapFlags, PageMapper};
use kernel_memory_addresses::{
    PageSize, PhysicalAddress, PhysicalPage, Size4K, VirtualAddress, VirtualPage,
};
use std::collections::BTreeMap;

/// A [`PageMapper`] backed by a host buffer covering `[base, base + len)`.
pub struct SimulatedMemory {
    base: PhysicalAddress,
    bytes: Vec<u8>,
    mapped: BTreeMap<VirtualPage<Size4K>, (PhysicalPage<Size4K>, MapFlags)>,
    map_calls: Vec<VirtualPage<Size4K>>,
    map_flags: Vec<MapFlags>,
    unmap_calls: Vec<VirtualPage<Size4K>>,
    fail_on: Option<(usize, MapError)>,
}

impl SimulatedMemory {
    /// Zero-filled memory covering `[base, base + len)`.
    #[must_use]
    pub fn new(base: PhysicalAddress, len: usize) -> Self {
        Self {
            base,
            bytes: vec![0; len],
            mapped: BTreeMap::new(),
            map_calls: Vec::new(),
            map_flags: Vec::new(),
            unmap_calls: Vec::new(),
            fail_on: None,
        }
    }

    /// Make the `n`-th call to [`PageMapper::map`] (1-based) fail with `error`.
    #[must_use]
    pub fn fail_nth_map(mut self, n: usize, error: MapError) -> Self {
        self.fail_on = Some((n, error));
        self
    }

    /// Overwrite physical memory at `addr` with `data`.
    ///
    /// # Panics
    /// If the span is not backed by this simulation.
    pub fn write(&mut self, addr: PhysicalAddress, data: &[u8]) {
        let start = self.index_of(addr);
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }

    /// Fill `len` bytes of physical memory at `addr` with `value`.
    ///
    /// # Panics
    /// If the span is not backed by this simulation.
    pub fn fill(&mut self, addr: PhysicalAddress, len: usize, value: u8) {
        let start = self.index_of(addr);
        self.bytes[start..start + len].fill(value);
    }

    /// Every page passed to `map`, in call order (including failed calls).
    #[must_use]
    pub fn map_calls(&self) -> &[VirtualPage<Size4K>] {
        &self.map_calls
    }

    /// The flags passed to each `map` call, parallel to [`Self::map_calls`].
    #[must_use]
    pub fn map_flags(&self) -> &[MapFlags] {
        &self.map_flags
    }

    /// Every page passed to `unmap`, in call order.
    #[must_use]
    pub fn unmap_calls(&self) -> &[VirtualPage<Size4K>] {
        &self.unmap_calls
    }

    /// How often `page` was unmapped.
    #[must_use]
    pub fn unmap_count(&self, page: VirtualPage<Size4K>) -> usize {
        self.unmap_calls.iter().filter(|&&p| p == page).count()
    }

    /// Number of pages currently mapped.
    #[must_use]
    pub fn mapped_page_count(&self) -> usize {
        self.mapped.len()
    }

    /// Whether `page` is currently mapped.
    #[must_use]
    pub fn is_mapped(&self, page: VirtualPage<Size4K>) -> bool {
        self.mapped.contains_key(&page)
    }

    /// The flags `page` is currently mapped with.
    #[must_use]
    pub fn flags_of(&self, page: VirtualPage<Size4K>) -> Option<MapFlags> {
        self.mapped.get(&page).map(|&(_, flags)| flags)
    }

    fn index_of(&self, addr: PhysicalAddress) -> usize {
        let offset = addr
            .as_u64()
            .checked_sub(self.base.as_u64())
            .expect("address below simulated memory");
        usize::try_from(offset).expect("offset fits usize")
    }

    fn backs(&self, frame: PhysicalPage<Size4K>) -> bool {
        let start = frame.base().as_u64();
        let end = self.base.as_u64() + self.bytes.len() as u64;
        start >= self.base.as_u64() && start + Size4K::SIZE <= end
    }
}

impl PageMapper for SimulatedMemory {
    fn map(
        &mut self,
        page: VirtualPage<Size4K>,
        frame: PhysicalPage<Size4K>,
        flags: MapFlags,
    ) -> Result<(), MapError> {
        self.map_calls.push(page);
        self.map_flags.push(flags);
        if let Some((n, error)) = self.fail_on
            && n == self.map_calls.len()
        {
            return Err(error);
        }
        if self.mapped.contains_key(&page) {
            return Err(MapError::AlreadyMapped { page });
        }
        if !self.backs(frame) {
            return Err(MapError::Unsupported { page });
        }
        self.mapped.insert(page, (frame, flags));
        Ok(())
    }

    fn unmap(&mut self, page: VirtualPage<Size4K>) {
        self.unmap_calls.push(page);
        self.mapped.remove(&page);
    }

    /// # Panics
    /// Like a page fault, if any byte of the span is not mapped.
    unsafe fn mapped_bytes(&self, va: VirtualAddress, len: usize) -> &[u8] {
        let first_page = va.page::<Size4K>();
        let &(frame, _) = self
            .mapped
            .get(&first_page)
            .unwrap_or_else(|| panic!("page fault: {va} is not mapped"));

        let last = va.as_u64() + (len.max(1) as u64) - 1;
        let mut page = first_page;
        let mut expected = frame;
        while page.base().as_u64() < (last & !(Size4K::SIZE - 1)) {
            page = VirtualAddress::new(page.base().as_u64() + Size4K::SIZE).page();
            expected = expected.next().expect("frame overflow");
            let &(next, _) = self
                .mapped
                .get(&page)
                .unwrap_or_else(|| panic!("page fault: {page} is not mapped"));
            assert_eq!(next, expected, "window pages must map contiguous frames");
        }

        let start = self.index_of(frame.base()) + usize::try_from(va.page_offset::<Size4K>())
            .expect("offset fits usize");
        &self.bytes[start..start + len]
    }
}
