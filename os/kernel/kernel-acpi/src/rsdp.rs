//! # RSDP/XSDP (Root/Extended System Description Pointer)
//!
//! ACPI 1.0 firmware publishes a 20-byte RSDP. ACPI 2.0 and later append a
//! 16-byte extension carrying a 64-bit XSDT address and a checksum over all
//! 36 bytes. The fields are decoded with explicit little-endian reads at
//! fixed offsets; nothing is overlaid on physical memory.
//!
//! ```text
//! 0        8    9          15   16        20      24          32   33     36
//! ├────────┼────┼──────────┼────┼─────────┼───────┼───────────┼────┼──────┤
//! │"RSD PTR "│ cs │ OEM ID   │rev │ RSDT    │length │ XSDT      │ xcs│ rsvd │
//! └────────┴────┴──────────┴────┴─────────┴───────┴───────────┴────┴──────┘
//!  ◄──────────── ACPI 1.0 (20 bytes) ────────────►◄── ACPI 2.0+ extension ─►
//! ```

use crate::le::{array_at, u32_at, u64_at};
use crate::{AcpiError, OemId, checksum};
use kernel_memory_addresses::PhysicalAddress;
use kernel_vmem::{PageMapper, PhysWindow};

/// The eight signature bytes every RSDP starts with.
pub const RSDP_SIGNATURE: [u8; 8] = *b"RSD PTR ";

/// ACPI 1.0 fields of the Root System Description Pointer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Rsdp {
    signature: [u8; 8],
    checksum: u8,
    oem_id: OemId,
    revision: u8,
    rsdt_address: u32,
}

impl Rsdp {
    /// Size of the ACPI 1.0 record.
    pub const SIZE: usize = 20;

    /// Size of the record including the ACPI 2.0+ extension.
    pub const EXTENDED_SIZE: usize = Self::SIZE + RsdpExtension::SIZE;

    /// Decode the first 20 bytes of `bytes`.
    ///
    /// # Errors
    /// - [`AcpiError::Truncated`] if fewer than 20 bytes are given.
    /// - [`AcpiError::SignatureMismatch`] if they do not start with `"RSD PTR "`.
    pub fn decode(bytes: &[u8]) -> Result<Self, AcpiError> {
        let Some(raw) = bytes.first_chunk::<{ Rsdp::SIZE }>() else {
            return Err(AcpiError::Truncated {
                needed: Self::SIZE,
                available: bytes.len(),
            });
        };

        let signature: [u8; 8] = array_at(raw, 0);
        if signature != RSDP_SIGNATURE {
            return Err(AcpiError::SignatureMismatch);
        }

        Ok(Self {
            signature,
            checksum: raw[8],
            oem_id: OemId::new(array_at(raw, 9)),
            revision: raw[15],
            rsdt_address: u32_at(raw, 16),
        })
    }

    #[must_use]
    pub const fn signature(&self) -> [u8; 8] {
        self.signature
    }

    #[must_use]
    pub const fn checksum(&self) -> u8 {
        self.checksum
    }

    #[must_use]
    pub const fn oem_id(&self) -> OemId {
        self.oem_id
    }

    /// `0` for ACPI 1.0, `2` for ACPI 2.0 through 6.x.
    #[must_use]
    pub const fn revision(&self) -> u8 {
        self.revision
    }

    /// Physical address of the RSDT (always 32-bit).
    #[must_use]
    pub fn rsdt_address(&self) -> PhysicalAddress {
        PhysicalAddress::from(self.rsdt_address)
    }

    /// Whether the record is followed by the ACPI 2.0+ extension.
    #[must_use]
    pub const fn has_extension(&self) -> bool {
        self.revision > 1
    }
}

/// ACPI 2.0+ extension of the RSDP (bytes 20..36).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RsdpExtension {
    length: u32,
    xsdt_address: u64,
    extended_checksum: u8,
}

impl RsdpExtension {
    /// Size of the extension in bytes.
    pub const SIZE: usize = 16;

    /// Decode the extension from a slice holding the full 36-byte record.
    ///
    /// # Errors
    /// [`AcpiError::Truncated`] if fewer than 36 bytes are given.
    pub fn decode(bytes: &[u8]) -> Result<Self, AcpiError> {
        let Some(raw) = bytes.first_chunk::<{ Rsdp::EXTENDED_SIZE }>() else {
            return Err(AcpiError::Truncated {
                needed: Rsdp::EXTENDED_SIZE,
                available: bytes.len(),
            });
        };

        Ok(Self {
            length: u32_at(raw, 20),
            xsdt_address: u64_at(raw, 24),
            extended_checksum: raw[32],
        })
    }

    /// Declared size of the whole structure.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    #[must_use]
    pub const fn xsdt_address(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.xsdt_address)
    }

    #[must_use]
    pub const fn extended_checksum(&self) -> u8 {
        self.extended_checksum
    }
}

/// An RSDP read from mapped memory, together with its checksum results.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RsdpDescriptor {
    address: PhysicalAddress,
    rsdp: Rsdp,
    checksum_valid: bool,
    extension: Option<RsdpExtension>,
    extended_checksum_valid: Option<bool>,
}

impl RsdpDescriptor {
    /// Read the RSDP at `addr` through `window`.
    ///
    /// The 20-byte record is always decoded and checksummed. For revisions
    /// above 1 the extension is read and the 36-byte checksum computed as
    /// well; if the extension does not fit the window it is left out and
    /// the descriptor reports itself invalid.
    ///
    /// # Errors
    /// - [`AcpiError::OutsideWindow`] if the 20-byte record is not inside `window`.
    /// - [`AcpiError::SignatureMismatch`] if `addr` does not hold an RSDP.
    pub fn read<M: PageMapper>(
        window: &PhysWindow<'_, M>,
        addr: PhysicalAddress,
    ) -> Result<Self, AcpiError> {
        let base = window.read(addr, Rsdp::SIZE).ok_or(AcpiError::OutsideWindow {
            address: addr,
            len: Rsdp::SIZE,
        })?;
        let rsdp = Rsdp::decode(base)?;
        let checksum_valid = checksum::is_valid(base);

        let (extension, extended_checksum_valid) = if rsdp.has_extension()
            && let Some(full) = window.read(addr, Rsdp::EXTENDED_SIZE)
        {
            (
                Some(RsdpExtension::decode(full)?),
                Some(checksum::is_valid(full)),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            address: addr,
            rsdp,
            checksum_valid,
            extension,
            extended_checksum_valid,
        })
    }

    #[must_use]
    pub const fn address(&self) -> PhysicalAddress {
        self.address
    }

    #[must_use]
    pub const fn rsdp(&self) -> &Rsdp {
        &self.rsdp
    }

    #[must_use]
    pub const fn extension(&self) -> Option<&RsdpExtension> {
        self.extension.as_ref()
    }

    #[must_use]
    pub const fn revision(&self) -> u8 {
        self.rsdp.revision()
    }

    #[must_use]
    pub const fn oem_id(&self) -> OemId {
        self.rsdp.oem_id()
    }

    /// Whether the 20-byte ACPI 1.0 checksum holds.
    #[must_use]
    pub const fn checksum_valid(&self) -> bool {
        self.checksum_valid
    }

    /// Whether the 36-byte checksum holds; `None` without an extension.
    #[must_use]
    pub const fn extended_checksum_valid(&self) -> Option<bool> {
        self.extended_checksum_valid
    }

    /// Every checksum this revision carries holds.
    ///
    /// Revisions 0 and 1 only have the 20-byte checksum. Later revisions need
    /// both the 20-byte and the 36-byte checksum. A later revision whose
    /// extension could not be read is never valid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        if self.rsdp.has_extension() {
            self.checksum_valid && matches!(self.extended_checksum_valid, Some(true))
        } else {
            self.checksum_valid
        }
    }

    #[must_use]
    pub fn rsdt_address(&self) -> PhysicalAddress {
        self.rsdp.rsdt_address()
    }

    #[must_use]
    pub const fn xsdt_address(&self) -> Option<PhysicalAddress> {
        match self.extension {
            Some(ext) => Some(ext.xsdt_address()),
            None => None,
        }
    }
}
