use kernel_acpi::{AcpiError, checksum, discover};
use kernel_memory_addresses::PhysicalAddress;
use kernel_vmem::MapError;
use kernel_vmem::sim::SimulatedMemory;

fn pa(v: u64) -> PhysicalAddress {
    PhysicalAddress::new(v)
}

/// Covers the BIOS area and a stretch of "high" memory for loader hints.
fn memory() -> SimulatedMemory {
    SimulatedMemory::new(pa(0xE_0000), 0x4_0000)
}

fn xsdp(oem: &[u8; 6], xsdt: u64) -> [u8; 36] {
    let mut b = [0u8; 36];
    b[..8].copy_from_slice(b"RSD PTR ");
    b[9..15].copy_from_slice(oem);
    b[15] = 2;
    b[16..20].copy_from_slice(&0x7FE1_4A2Cu32.to_le_bytes());
    b[8] = checksum::balancing_byte(&b[..20]);
    b[20..24].copy_from_slice(&36u32.to_le_bytes());
    b[24..32].copy_from_slice(&xsdt.to_le_bytes());
    b[32] = checksum::balancing_byte(&b);
    b
}

#[test]
fn valid_hint_skips_the_scan() {
    let mut memory = memory();
    memory.write(pa(0x10_2010), &xsdp(b"HINTED", 0x7FE1_5B10));
    memory.write(pa(0xF_5A30), &xsdp(b"BIOSAR", 0x7FE1_6000));

    let roots = discover(&mut memory, Some(pa(0x10_2010))).expect("roots");
    assert_eq!(roots.rsdp_address, pa(0x10_2010));
    assert_eq!(roots.oem_id.as_bytes(), b"HINTED");
    assert_eq!(roots.revision, 2);
    assert_eq!(roots.preferred_root(), pa(0x7FE1_5B10));

    assert_eq!(memory.map_calls().len(), 1);
    assert_eq!(memory.mapped_page_count(), 0);
}

#[test]
fn invalid_hint_falls_back_to_the_bios_area() {
    let mut memory = memory();
    let mut bad = xsdp(b"HINTED", 0x7FE1_5B10);
    bad[32] ^= 0xFF;
    memory.write(pa(0x10_2010), &bad);
    memory.write(pa(0xF_5A30), &xsdp(b"BIOSAR", 0x7FE1_6000));

    let roots = discover(&mut memory, Some(pa(0x10_2010))).expect("roots");
    assert_eq!(roots.rsdp_address, pa(0xF_5A30));
    assert_eq!(roots.oem_id.as_bytes(), b"BIOSAR");
    assert_eq!(roots.xsdt_address, Some(pa(0x7FE1_6000)));
    assert_eq!(memory.mapped_page_count(), 0);
}

#[test]
fn unmappable_hint_falls_back_to_the_bios_area() {
    let mut memory = memory();
    memory.write(pa(0xF_5A30), &xsdp(b"BIOSAR", 0x7FE1_6000));

    let roots = discover(&mut memory, Some(pa(0x4000_0000))).expect("roots");
    assert_eq!(roots.rsdp_address, pa(0xF_5A30));
}

#[test]
fn nothing_valid_is_not_found() {
    let mut memory = memory();
    let mut bad = xsdp(b"BIOSAR", 0);
    bad[20] = 0x24 ^ 0x01;
    memory.write(pa(0xE_0010), &bad);

    assert_eq!(discover(&mut memory, None), Err(AcpiError::NotFound));
    assert_eq!(memory.mapped_page_count(), 0);
}

#[test]
fn scan_mapping_failure_is_propagated() {
    let mut memory = memory().fail_nth_map(1, MapError::OutOfMemory);
    assert!(matches!(
        discover(&mut memory, None),
        Err(AcpiError::Window(_))
    ));
}

#[test]
fn lowest_valid_match_wins() {
    let mut memory = memory();
    let mut bad = xsdp(b"FIRST ", 0);
    bad[8] ^= 0x01;
    memory.write(pa(0xE_0000), &bad);
    memory.write(pa(0xE_8000), &xsdp(b"SECOND", 0x1000));
    memory.write(pa(0xF_0000), &xsdp(b"THIRD ", 0x2000));

    let roots = discover(&mut memory, None).expect("roots");
    assert_eq!(roots.oem_id.as_bytes(), b"SECOND");
}

#[test]
fn valid_rsdp_after_a_full_report_is_still_found() {
    let mut memory = memory();
    for i in 0..8u64 {
        let mut bad = xsdp(b"BROKEN", 0);
        bad[8] ^= 0x01;
        memory.write(pa(0xE_0000 + i * 0x100), &bad);
    }
    memory.write(pa(0xF_5A30), &xsdp(b"BOCHS ", 0x7FE1_5B10));

    let roots = discover(&mut memory, None).expect("roots");
    assert_eq!(roots.rsdp_address, pa(0xF_5A30));
    assert_eq!(roots.oem_id.as_bytes(), b"BOCHS ");
}
