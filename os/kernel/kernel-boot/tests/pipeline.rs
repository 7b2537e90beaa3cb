use core::cell::RefCell;
use kernel_acpi::{AcpiError, checksum};
use kernel_boot::pipeline::Boot;
use kernel_boot::{BootError, boot};
use kernel_info::boot::{AcpiPolicy, BootConfig, KernelBootInfo};
use kernel_memory_addresses::PhysicalAddress;
use kernel_vmem::MapError;
use kernel_vmem::sim::SimulatedMemory;

/// Stand-in for the physical frame allocator.
#[derive(Debug, Default)]
struct Frames {
    handed_out: u32,
}

fn firmware() -> SimulatedMemory {
    SimulatedMemory::new(PhysicalAddress::new(0xE_0000), 0x4_0000)
}

fn rsdp(oem: &[u8; 6]) -> [u8; 20] {
    let mut b = [0u8; 20];
    b[..8].copy_from_slice(b"RSD PTR ");
    b[9..15].copy_from_slice(oem);
    b[16..20].copy_from_slice(&0x7FE1_4A2Cu32.to_le_bytes());
    b[8] = checksum::balancing_byte(&b);
    b
}

fn with_rsdp_at(addr: u64, oem: &[u8; 6]) -> SimulatedMemory {
    let mut memory = firmware();
    memory.write(PhysicalAddress::new(addr), &rsdp(oem));
    memory
}

#[test]
fn stages_run_in_order() {
    let calls = RefCell::new(Vec::new());

    let kernel = boot(
        BootConfig::new(),
        &KernelBootInfo::default(),
        |_| {
            calls.borrow_mut().push("pmm");
            Ok(Frames::default())
        },
        |frames| {
            calls.borrow_mut().push("vmm");
            frames.handed_out += 1;
            Ok(with_rsdp_at(0xF_5A30, b"BOCHS "))
        },
    )
    .expect("boot");

    assert_eq!(*calls.borrow(), ["pmm", "vmm"]);
    assert_eq!(kernel.allocator.handed_out, 1);
    let acpi = kernel.acpi.expect("acpi");
    assert_eq!(acpi.rsdp_address, PhysicalAddress::new(0xF_5A30));
    assert_eq!(kernel.mapper.mapped_page_count(), 0);
}

#[test]
fn physical_memory_failure_is_fatal() {
    let mut vmm_ran = false;
    let result = boot(
        BootConfig::new(),
        &KernelBootInfo::default(),
        |_| Err::<Frames, _>("no usable RAM"),
        |_| {
            vmm_ran = true;
            Ok(firmware())
        },
    );

    assert_eq!(
        result.err(),
        Some(BootError::PhysicalMemory("no usable RAM"))
    );
    assert!(!vmm_ran);
}

#[test]
fn virtual_memory_failure_is_fatal() {
    let result = Boot::new(BootConfig::new(), &KernelBootInfo::default())
        .init_physical_memory(|_| Ok(Frames::default()))
        .expect("pmm")
        .init_virtual_memory(|_| Err::<SimulatedMemory, _>("no page tables"));

    assert!(matches!(
        result,
        Err(BootError::VirtualMemory("no page tables"))
    ));
}

#[test]
fn loader_hint_is_forwarded_to_discovery() {
    let mut memory = firmware();
    memory.write(PhysicalAddress::new(0x10_2010), &rsdp(b"HINTED"));
    memory.write(PhysicalAddress::new(0xF_5A30), &rsdp(b"BIOSAR"));

    let info = KernelBootInfo {
        rsdp_addr: 0x10_2010,
        ..KernelBootInfo::default()
    };
    let stage = Boot::new(BootConfig::new(), &info)
        .init_physical_memory(|_| Ok(Frames::default()))
        .and_then(|b| b.init_virtual_memory(|_| Ok(memory)))
        .and_then(Boot::discover_acpi)
        .expect("boot");

    let acpi = stage.acpi().expect("acpi");
    assert_eq!(acpi.oem_id.as_bytes(), b"HINTED");
    assert_eq!(stage.boot_info().rsdp_addr, 0x10_2010);
}

#[test]
fn best_effort_continues_without_acpi() {
    let kernel = boot(
        BootConfig::new().with_acpi_policy(AcpiPolicy::BestEffort),
        &KernelBootInfo::default(),
        |_| Ok(Frames::default()),
        |_| Ok(firmware()),
    )
    .expect("boot");

    assert!(kernel.acpi.is_none());
    assert_eq!(kernel.config.acpi_policy(), AcpiPolicy::BestEffort);
}

#[test]
fn best_effort_survives_mapping_failures() {
    let kernel = boot(
        BootConfig::new(),
        &KernelBootInfo::default(),
        |_| Ok(Frames::default()),
        |_| Ok(firmware().fail_nth_map(5, MapError::OutOfMemory)),
    )
    .expect("boot");

    assert!(kernel.acpi.is_none());
    assert_eq!(kernel.mapper.mapped_page_count(), 0);
    assert_eq!(kernel.mapper.unmap_calls().len(), 4);
}

#[test]
fn required_policy_aborts_when_nothing_is_found() {
    let result = boot(
        BootConfig::new().with_acpi_policy(AcpiPolicy::Required),
        &KernelBootInfo::default(),
        |_| Ok(Frames::default()),
        |_| Ok(firmware()),
    );

    assert!(matches!(result, Err(BootError::Acpi(AcpiError::NotFound))));
}

#[test]
fn required_policy_is_satisfied_by_a_valid_rsdp() {
    let kernel = boot(
        BootConfig::new().with_acpi_policy(AcpiPolicy::Required),
        &KernelBootInfo::default(),
        |_| Ok(Frames::default()),
        |_| Ok(with_rsdp_at(0xE_0040, b"REQUIR")),
    )
    .expect("boot");

    let acpi = kernel.acpi.expect("acpi");
    assert_eq!(acpi.revision, 0);
    assert_eq!(acpi.xsdt_address, None);
    assert_eq!(acpi.preferred_root(), PhysicalAddress::new(0x7FE1_4A2C));
}
