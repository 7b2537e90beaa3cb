use kernel_acpi::{AcpiError, RSDP_SIGNATURE, checksum, find_rsdp, scan_region};
use kernel_info::acpi::{RSDP_SEARCH_END, RSDP_SEARCH_START};
use kernel_memory_addresses::{PhysicalAddress, Size4K};
use kernel_vmem::MapError;
use kernel_vmem::sim::SimulatedMemory;

const AREA_LEN: usize = 0x2_0000;

fn pa(v: u64) -> PhysicalAddress {
    PhysicalAddress::new(v)
}

fn bios_area() -> SimulatedMemory {
    SimulatedMemory::new(pa(RSDP_SEARCH_START), AREA_LEN)
}

/// "RSD PTR ", 11 arbitrary bytes, then a balancing checksum at offset 8.
fn rsdp_record() -> [u8; 20] {
    let mut b = [
        0x52, 0x53, 0x44, 0x20, 0x50, 0x54, 0x52, 0x20, // "RSD PTR "
        0x00, // checksum
        b'B', b'O', b'C', b'H', b'S', b' ', // OEM ID
        0x00, // revision
        0x2C, 0x4A, 0xE1, 0x7F, // RSDT address
    ];
    b[8] = checksum::balancing_byte(&b);
    b
}

fn assert_every_page_released_once(memory: &SimulatedMemory) {
    assert_eq!(memory.mapped_page_count(), 0);
    for &page in memory.map_calls() {
        assert_eq!(memory.unmap_count(page), 1, "{page}");
    }
}

#[test]
fn valid_record_is_found_with_its_fields() {
    let mut memory = bios_area();
    memory.write(pa(0xF_5A30), &rsdp_record());

    let report = find_rsdp(&mut memory).expect("scan");
    assert_eq!(report.len(), 1);

    let m = &report.matches()[0];
    assert_eq!(m.address(), pa(0xF_5A30));
    assert!(m.is_valid());

    let d = m.descriptor().expect("descriptor");
    assert_eq!(d.revision(), 0);
    assert_eq!(d.oem_id().as_bytes(), b"BOCHS ");
    assert_eq!(d.rsdt_address(), pa(0x7FE1_4A2C));
    assert_every_page_released_once(&memory);
}

#[test]
fn wrong_checksum_is_reported_but_invalid() {
    let mut record = rsdp_record();
    record[8] = record[8].wrapping_add(1);

    let mut memory = bios_area();
    memory.write(pa(0xE_0000), &record);

    let report = find_rsdp(&mut memory).expect("scan");
    assert_eq!(report.len(), 1);
    assert_eq!(report.matches()[0].address(), pa(0xE_0000));
    assert!(!report.matches()[0].is_valid());
    assert!(report.first_valid().is_none());
}

#[test]
fn empty_area_reports_nothing_and_unmaps_everything() {
    let mut memory = bios_area();
    memory.fill(pa(0xE_0000), AREA_LEN, 0xA5);

    let report = find_rsdp(&mut memory).expect("scan");
    assert!(report.is_empty());
    assert_eq!(report.len(), 0);

    assert_eq!(memory.map_calls().len(), 32);
    assert_eq!(memory.unmap_calls().len(), 32);
    assert_every_page_released_once(&memory);
}

#[test]
fn every_occurrence_is_reported_independently() {
    let mut broken = rsdp_record();
    broken[12] ^= 0x20;

    let mut memory = bios_area();
    memory.write(pa(0xE_4000), &broken);
    memory.write(pa(0xF_FF00), &rsdp_record());

    let report = find_rsdp(&mut memory).expect("scan");
    let summary: Vec<_> = report
        .matches()
        .iter()
        .map(|m| (m.address(), m.is_valid()))
        .collect();
    assert_eq!(summary, [(pa(0xE_4000), false), (pa(0xF_FF00), true)]);
    assert_eq!(
        report.first_valid().map(kernel_acpi::RsdpMatch::address),
        Some(pa(0xF_FF00))
    );
}

#[test]
fn unaligned_signatures_are_never_reported() {
    let mut memory = bios_area();
    for offset in [0x1u64, 0x4, 0x8, 0xF, 0x18] {
        memory.write(pa(0xE_8000 + offset * 0x100 + offset), &rsdp_record());
    }

    let report = find_rsdp(&mut memory).expect("scan");
    assert!(report.is_empty());
}

#[test]
fn signature_in_the_last_candidate_is_truncated() {
    let mut memory = bios_area();
    memory.write(pa(0xF_FFF0), &RSDP_SIGNATURE);

    let report = find_rsdp(&mut memory).expect("scan");
    assert_eq!(report.len(), 1);
    assert_eq!(report.matches()[0].address(), pa(0xF_FFF0));
    assert!(report.matches()[0].is_truncated());
    assert!(!report.matches()[0].is_valid());
}

#[test]
fn revision_two_uses_the_extended_checksum() {
    let mut full = [0u8; 36];
    full[..20].copy_from_slice(&rsdp_record());
    full[15] = 2;
    full[8] = 0;
    full[8] = checksum::balancing_byte(&full[..20]);
    full[20..24].copy_from_slice(&36u32.to_le_bytes());
    full[24..32].copy_from_slice(&0x7FE1_5B10u64.to_le_bytes());
    full[32] = checksum::balancing_byte(&full);

    let mut memory = bios_area();
    memory.write(pa(0xF_0000), &full);
    let mut broken = full;
    broken[33] = 0x11;
    memory.write(pa(0xF_0100), &broken);

    let report = find_rsdp(&mut memory).expect("scan");
    assert_eq!(report.len(), 2);

    let good = report.matches()[0].descriptor().expect("descriptor");
    assert!(good.is_valid());
    assert_eq!(good.xsdt_address(), Some(pa(0x7FE1_5B10)));

    let bad = report.matches()[1].descriptor().expect("descriptor");
    assert!(bad.checksum_valid());
    assert_eq!(bad.extended_checksum_valid(), Some(false));
    assert!(!bad.is_valid());
}

#[test]
fn mapping_failure_aborts_the_scan_and_releases_mapped_pages() {
    let mut memory = bios_area().fail_nth_map(3, MapError::OutOfMemory);
    memory.write(pa(0xE_0000), &rsdp_record());

    let err = find_rsdp(&mut memory).expect_err("third page must fail");
    assert!(matches!(err, AcpiError::Window(_)));

    let first = pa(0xE_0000).page::<Size4K>().identity();
    let second = pa(0xE_1000).page::<Size4K>().identity();
    let third = pa(0xE_2000).page::<Size4K>().identity();
    assert_eq!(memory.unmap_calls(), &[first, second]);
    assert_eq!(memory.unmap_count(third), 0);
    assert_eq!(memory.mapped_page_count(), 0);
}

#[test]
fn report_holds_eight_matches_and_counts_overflow() {
    let mut memory = bios_area();
    for i in 0..11u64 {
        memory.write(pa(0xE_0000 + i * 0x400), &rsdp_record());
    }

    let report = find_rsdp(&mut memory).expect("scan");
    assert_eq!(report.len(), kernel_acpi::MAX_RSDP_MATCHES);
    assert_eq!(report.overflowed(), 3);
    assert!(report.matches().iter().all(kernel_acpi::RsdpMatch::is_valid));
}

#[test]
fn custom_region_is_scanned_inclusively() {
    let mut memory = bios_area();
    memory.write(pa(0xE_1FE0), &rsdp_record());

    let report = scan_region(&mut memory, pa(0xE_1000), pa(0xE_1FFF)).expect("scan");
    assert_eq!(report.len(), 1);
    assert!(report.matches()[0].is_valid());
    assert_eq!(memory.map_calls().len(), 1);
    assert_eq!(RSDP_SEARCH_END, 0xF_FFFF);
}
