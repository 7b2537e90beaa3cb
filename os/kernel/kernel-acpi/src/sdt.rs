//! # System Description Table Header
//!
//! Every ACPI table after the RSDP (RSDT, XSDT, FADT, MADT, ...) starts with
//! the same 36-byte header. The header's `length` field describes the whole
//! table, header included, and bounds the checksum.
//!
//! | Offset | Size | Field              |
//! |--------|------|--------------------|
//! | 0      | 4    | `signature`        |
//! | 4      | 4    | `length`           |
//! | 8      | 1    | `revision`         |
//! | 9      | 1    | `checksum`         |
//! | 10     | 6    | `oem_id`           |
//! | 16     | 8    | `oem_table_id`     |
//! | 24     | 4    | `oem_revision`     |
//! | 28     | 4    | `creator_id`       |
//! | 32     | 4    | `creator_revision` |

use crate::le::{array_at, u32_at};
use crate::{AcpiError, OemId, OemTableId, WINDOW_FLAGS, checksum};
use kernel_memory_addresses::PhysicalAddress;
use kernel_vmem::{PageMapper, PhysWindow};
use log::{debug, warn};

/// Decoded ACPI table header.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SdtHeader {
    signature: [u8; 4],
    length: u32,
    revision: u8,
    checksum: u8,
    oem_id: OemId,
    oem_table_id: OemTableId,
    oem_revision: u32,
    creator_id: u32,
    creator_revision: u32,
}

impl SdtHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 36;

    /// Decode the header from the first [`SdtHeader::SIZE`] bytes of `bytes`.
    ///
    /// # Errors
    /// [`AcpiError::Truncated`] if fewer than 36 bytes are given.
    pub fn decode(bytes: &[u8]) -> Result<Self, AcpiError> {
        let Some(raw) = bytes.first_chunk::<{ SdtHeader::SIZE }>() else {
            return Err(AcpiError::Truncated {
                needed: Self::SIZE,
                available: bytes.len(),
            });
        };

        Ok(Self {
            signature: array_at(raw, 0),
            length: u32_at(raw, 4),
            revision: raw[8],
            checksum: raw[9],
            oem_id: OemId::new(array_at(raw, 10)),
            oem_table_id: OemTableId::new(array_at(raw, 16)),
            oem_revision: u32_at(raw, 24),
            creator_id: u32_at(raw, 28),
            creator_revision: u32_at(raw, 32),
        })
    }

    /// Whether `table` holds a complete table whose checksum is valid.
    ///
    /// The header is decoded from `table`; exactly `length` bytes are summed.
    /// Returns `false` if `table` is shorter than `length`, or if `length`
    /// is smaller than the header itself.
    #[must_use]
    pub fn is_valid(table: &[u8]) -> bool {
        let Ok(header) = Self::decode(table) else {
            return false;
        };
        let Some(len) = header.table_len() else {
            return false;
        };
        table.get(..len).is_some_and(checksum::is_valid)
    }

    /// Decode the header at `addr` and validate the table it describes.
    ///
    /// # Errors
    /// - [`AcpiError::OutsideWindow`] if the header or the `length` bytes it
    ///   declares are not covered by `window`.
    pub fn is_valid_at<M: PageMapper>(
        window: &PhysWindow<'_, M>,
        addr: PhysicalAddress,
    ) -> Result<bool, AcpiError> {
        let raw = window
            .read_array::<{ SdtHeader::SIZE }>(addr)
            .ok_or(AcpiError::OutsideWindow {
                address: addr,
                len: Self::SIZE,
            })?;
        let header = Self::decode(&raw)?;
        let Some(len) = header.table_len() else {
            return Ok(false);
        };
        checksum::is_valid_at(window, addr, len)
            .ok_or(AcpiError::OutsideWindow { address: addr, len })
    }

    /// `length` as a byte count, if it covers at least the header.
    fn table_len(&self) -> Option<usize> {
        usize::try_from(self.length)
            .ok()
            .filter(|&len| len >= Self::SIZE)
    }

    #[must_use]
    pub const fn signature(&self) -> [u8; 4] {
        self.signature
    }

    /// Total table length in bytes, header included.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    #[must_use]
    pub const fn revision(&self) -> u8 {
        self.revision
    }

    #[must_use]
    pub const fn checksum(&self) -> u8 {
        self.checksum
    }

    #[must_use]
    pub const fn oem_id(&self) -> OemId {
        self.oem_id
    }

    #[must_use]
    pub const fn oem_table_id(&self) -> OemTableId {
        self.oem_table_id
    }

    #[must_use]
    pub const fn oem_revision(&self) -> u32 {
        self.oem_revision
    }

    #[must_use]
    pub const fn creator_id(&self) -> u32 {
        self.creator_id
    }

    #[must_use]
    pub const fn creator_revision(&self) -> u32 {
        self.creator_revision
    }
}

/// A table whose signature and checksum have been verified.
///
/// The mapping used for validation is gone by the time this is returned;
/// consumers open their own window at [`ValidatedTable::address`] to parse
/// the body.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ValidatedTable {
    address: PhysicalAddress,
    header: SdtHeader,
}

impl ValidatedTable {
    #[must_use]
    pub const fn address(&self) -> PhysicalAddress {
        self.address
    }

    #[must_use]
    pub const fn header(&self) -> &SdtHeader {
        &self.header
    }
}

/// Map, identify, and checksum the table at `addr`.
///
/// 1. Map the 36-byte header and decode it.
/// 2. Compare the signature against `expected_signature`.
/// 3. Map the `length` bytes the header declares.
/// 4. Validate the checksum.
///
/// Each step uses its own window; the first is closed before the second is
/// opened.
///
/// # Errors
/// - [`AcpiError::Window`] if either mapping fails.
/// - [`AcpiError::SignatureMismatch`] for a table of another type.
/// - [`AcpiError::Truncated`] if `length` is smaller than the header.
/// - [`AcpiError::ChecksumMismatch`] if the table bytes do not sum to zero.
pub fn load_table<M: PageMapper>(
    mapper: &mut M,
    addr: PhysicalAddress,
    expected_signature: &[u8; 4],
) -> Result<ValidatedTable, AcpiError> {
    let header = {
        let window = open_span(mapper, addr, SdtHeader::SIZE)?;
        let raw = window
            .read_array::<{ SdtHeader::SIZE }>(addr)
            .ok_or(AcpiError::OutsideWindow {
                address: addr,
                len: SdtHeader::SIZE,
            })?;
        SdtHeader::decode(&raw)?
    };

    if header.signature() != *expected_signature {
        return Err(AcpiError::SignatureMismatch);
    }

    let len = header.table_len().ok_or(AcpiError::Truncated {
        needed: SdtHeader::SIZE,
        available: usize::try_from(header.length()).unwrap_or(usize::MAX),
    })?;

    let window = open_span(mapper, addr, len)?;
    let valid = checksum::is_valid_at(&window, addr, len)
        .ok_or(AcpiError::OutsideWindow { address: addr, len })?;
    if !valid {
        let signature = header.signature();
        warn!(
            "Table {} at {addr} failed its checksum",
            core::str::from_utf8(&signature).unwrap_or("????")
        );
        return Err(AcpiError::ChecksumMismatch { address: addr });
    }

    debug!("Validated {len}-byte table at {addr}");
    Ok(ValidatedTable {
        address: addr,
        header,
    })
}

/// Open a window over the `len` bytes starting at `addr`.
pub(crate) fn open_span<M: PageMapper>(
    mapper: &mut M,
    addr: PhysicalAddress,
    len: usize,
) -> Result<PhysWindow<'_, M>, AcpiError> {
    let span = u64::try_from(len)
        .ok()
        .and_then(|len| len.checked_sub(1))
        .and_then(|extra| addr.checked_add(extra))
        .ok_or(AcpiError::OutsideWindow { address: addr, len })?;
    Ok(PhysWindow::open(mapper, addr, span, WINDOW_FLAGS)?)
}
