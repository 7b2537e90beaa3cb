use core::fmt;

/// Writes `bytes` as ASCII, replacing anything non-printable with `.`.
fn write_lossy_ascii(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    use fmt::Write;
    for &b in bytes {
        let c = if b == b' ' || b.is_ascii_graphic() {
            char::from(b)
        } else {
            '.'
        };
        f.write_char(c)?;
    }
    Ok(())
}

/// Six-byte OEM identifier as stored in the RSDP and table headers.
///
/// The bytes are fixed-length and space padded; they are never treated as a
/// NUL-terminated string.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct OemId([u8; 6]);

impl OemId {
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Display for OemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_lossy_ascii(&self.0, f)
    }
}

impl fmt::Debug for OemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OemId(\"{self}\")")
    }
}

/// Eight-byte OEM table identifier from a table header.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct OemTableId([u8; 8]);

impl OemTableId {
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl fmt::Display for OemTableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_lossy_ascii(&self.0, f)
    }
}

impl fmt::Debug for OemTableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OemTableId(\"{self}\")")
    }
}
