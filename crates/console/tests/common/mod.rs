//! Shared fixtures for console integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use console::{DtDriver, SerialChip, SerialDriver, SerialError};
use fdt::{Fdt, node::FdtNode};
use sync::ArchOps;
use test_support::dtb::DtbBuilder;
use test_support::mock::arch::MOCK_ARCH_OPS;
use test_support::mock::serial::{SerialEvent, SerialEventLog};

struct TestArchOps;

impl ArchOps for TestArchOps {
    unsafe fn read_and_disable_interrupts(&self) -> usize {
        unsafe { MOCK_ARCH_OPS.read_and_disable_interrupts() }
    }

    unsafe fn restore_interrupts(&self, flags: usize) {
        unsafe { MOCK_ARCH_OPS.restore_interrupts(flags) }
    }

    fn irq_enabled_mask(&self) -> usize {
        MOCK_ARCH_OPS.irq_enabled_mask()
    }
}

static TEST_ARCH_OPS: TestArchOps = TestArchOps;
static INIT: Once = Once::new();

pub fn init_arch() {
    INIT.call_once(|| unsafe { sync::register_arch_ops(&TEST_ARCH_OPS) });
}

/// One `dev_init` call as seen by a mock driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitCall {
    pub node: String,
    pub params: Option<String>,
}

/// Everything a mock driver and its devices did.
#[derive(Default)]
pub struct Probe {
    pub log: SerialEventLog,
    pub inits: Mutex<Vec<InitCall>>,
    pub allocs: AtomicUsize,
    pub frees: AtomicUsize,
    pub drops: AtomicUsize,
    pub fail_alloc: AtomicBool,
    pub fail_init: AtomicBool,
}

impl Probe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inits(&self) -> Vec<InitCall> {
        self.inits.lock().unwrap().clone()
    }

    pub fn allocs(&self) -> usize {
        self.allocs.load(Ordering::SeqCst)
    }

    pub fn frees(&self) -> usize {
        self.frees.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

pub struct MockUart {
    probe: Arc<Probe>,
}

impl SerialChip for MockUart {
    fn dev_init(
        &mut self,
        _fdt: &Fdt<'_>,
        node: &FdtNode<'_, '_>,
        params: Option<&str>,
    ) -> Result<(), SerialError> {
        self.probe.inits.lock().unwrap().push(InitCall {
            node: node.name.to_string(),
            params: params.map(str::to_string),
        });
        if self.probe.fail_init.load(Ordering::SeqCst) {
            Err(SerialError::NoDevice)
        } else {
            Ok(())
        }
    }

    fn putc(&self, ch: u8) {
        self.probe.log.push(SerialEvent::Putc(ch));
    }

    fn flush(&self) {
        self.probe.log.push(SerialEvent::Flush);
    }
}

impl Drop for MockUart {
    fn drop(&mut self) {
        self.probe.drops.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockUartDriver {
    name: &'static str,
    compatible: &'static [&'static str],
    probe: Arc<Probe>,
}

impl MockUartDriver {
    /// Leaks a driver so it can live in a registry.
    pub fn leak(
        name: &'static str,
        compatible: &'static [&'static str],
        probe: &Arc<Probe>,
    ) -> &'static MockUartDriver {
        Box::leak(Box::new(MockUartDriver {
            name,
            compatible,
            probe: probe.clone(),
        }))
    }

    /// Allocates and "initializes" a device outside the resolver, e.g. an early console.
    pub fn early_chip(probe: &Arc<Probe>) -> Arc<dyn SerialChip> {
        Arc::new(MockUart {
            probe: probe.clone(),
        })
    }
}

impl DtDriver for MockUartDriver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn compatible(&self) -> &'static [&'static str] {
        self.compatible
    }

    fn as_serial(&self) -> Option<&dyn SerialDriver> {
        Some(self)
    }
}

impl SerialDriver for MockUartDriver {
    fn dev_alloc(&self) -> Option<Box<dyn SerialChip>> {
        if self.probe.fail_alloc.load(Ordering::SeqCst) {
            return None;
        }
        self.probe.allocs.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(MockUart {
            probe: self.probe.clone(),
        }))
    }

    fn dev_free(&self, chip: Box<dyn SerialChip>) {
        self.probe.frees.fetch_add(1, Ordering::SeqCst);
        drop(chip);
    }
}

/// A real-time clock driver: compatible with nodes but offers no serial capability.
pub struct RtcDriver;

impl DtDriver for RtcDriver {
    fn name(&self) -> &'static str {
        "goldfish-rtc"
    }

    fn compatible(&self) -> &'static [&'static str] {
        &["google,goldfish-rtc"]
    }
}

pub static RTC_DRIVER: RtcDriver = RtcDriver;

pub const UART_A: &str = "/soc/serial@10000000";
pub const UART_B: &str = "/soc/serial@20000000";
pub const UART_COMPAT: &[&str] = &["ns16550a"];

/// A board with two UARTs, an RTC and `serial0`/`serial1` aliases.
/// `chosen` is `Some((node name, stdout-path))`; a `None` path omits the property.
pub fn board_dtb(chosen: Option<(&str, Option<&str>)>) -> Vec<u8> {
    let mut builder = DtbBuilder::new()
        .prop_u32("#address-cells", 2)
        .prop_u32("#size-cells", 2)
        .begin_node("aliases")
        .prop_str("serial0", UART_A)
        .prop_str("serial1", UART_B)
        .prop_str("broken0", "/soc/serial@30000000")
        .end_node();

    if let Some((name, stdout)) = chosen {
        builder = builder.begin_node(name);
        if let Some(stdout) = stdout {
            builder = builder.prop_str("stdout-path", stdout);
        }
        builder = builder.end_node();
    }

    builder
        .begin_node("soc")
        .begin_node("serial@10000000")
        .prop_strs("compatible", &["ns16550a"])
        .end_node()
        .begin_node("serial@20000000")
        .prop_strs("compatible", &["acme,uart-v2", "ns16550a"])
        .end_node()
        .begin_node("rtc@101000")
        .prop_strs("compatible", &["google,goldfish-rtc"])
        .end_node()
        .begin_node("mystery@40000000")
        .prop_strs("compatible", &["acme,unknown"])
        .end_node()
        .end_node()
        .build()
}
