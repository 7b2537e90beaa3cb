use crate::MapFlags;
use kernel_memory_addresses::{PhysicalPage, Size4K, VirtualAddress, VirtualPage};

/// Installs and removes single 4 KiB mappings in the active address space.
///
/// This is the contract early boot code needs from the virtual memory
/// subsystem; page-table walking and frame allocation for intermediate
/// tables are up to the implementor.
pub trait PageMapper {
    /// Map `page` to `frame` with the leaf bits in `flags`.
    ///
    /// # Errors
    /// The mapping could not be established; nothing was changed.
    fn map(
        &mut self,
        page: VirtualPage<Size4K>,
        frame: PhysicalPage<Size4K>,
        flags: MapFlags,
    ) -> Result<(), MapError>;

    /// Remove the mapping of `page` and invalidate its TLB entry.
    fn unmap(&mut self, page: VirtualPage<Size4K>);

    /// Borrow `len` bytes starting at `va`.
    ///
    /// # Safety
    /// Every page covering `va .. va + len` must currently be mapped through
    /// this mapper and must stay mapped while the returned slice is alive.
    unsafe fn mapped_bytes(&self, va: VirtualAddress, len: usize) -> &[u8];
}

/// Failure to map a single page.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum MapError {
    #[error("out of memory for intermediate page tables")]
    OutOfMemory,
    #[error("{page} is already mapped")]
    AlreadyMapped { page: VirtualPage<Size4K> },
    #[error("{page} cannot be mapped by this mapper")]
    Unsupported { page: VirtualPage<Size4K> },
}

/// [`PageMapper::mapped_bytes`] for mappers whose virtual addresses are
/// directly dereferenceable, i.e. every real page-table based mapper.
///
/// # Safety
/// `va .. va + len` must be mapped and readable for `'a`.
#[inline]
#[must_use]
pub unsafe fn identity_bytes<'a>(va: VirtualAddress, len: usize) -> &'a [u8] {
    let ptr = va.as_u64() as *const u8;
    // SAFETY: Caller guarantees the range is mapped and stays mapped for 'a.
    unsafe { core::slice::from_raw_parts(ptr, len) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_bytes_reads_the_addressed_memory() {
        let buffer = [0x52u8, 0x53, 0x44, 0x20, 0x50, 0x54, 0x52, 0x20];
        let va = VirtualAddress::new(buffer.as_ptr() as u64);

        // SAFETY: `buffer` is live for the whole test.
        let bytes = unsafe { identity_bytes(va + 2, 4) };
        assert_eq!(bytes, &buffer[2..6]);
    }
}
