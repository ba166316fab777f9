// Shared helpers for unit tests.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};

use fdt::{Fdt, node::FdtNode};
use sync::ArchOps;
use test_support::mock::arch::MOCK_ARCH_OPS;
use test_support::mock::serial::{SerialEvent, SerialEventLog};

use crate::error::SerialError;
use crate::serial::SerialChip;

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
// 0 = uninit, 1 = initializing, 2 = ready
static ARCH_INIT: AtomicUsize = AtomicUsize::new(0);

pub fn init_arch() {
    match ARCH_INIT.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => {
            // Safety: every test registers the same global mock.
            unsafe { sync::register_arch_ops(&TEST_ARCH_OPS) };
            ARCH_INIT.store(2, Ordering::Release);
        }
        Err(_) => {
            while ARCH_INIT.load(Ordering::Acquire) != 2 {
                core::hint::spin_loop();
            }
        }
    }
}

/// Serial device that records everything it is asked to emit.
pub struct MockChip {
    log: Arc<SerialEventLog>,
}

impl MockChip {
    pub fn new() -> (Arc<dyn SerialChip>, Arc<SerialEventLog>) {
        let log = Arc::new(SerialEventLog::new());
        let chip: Arc<dyn SerialChip> = Arc::new(MockChip { log: log.clone() });
        (chip, log)
    }
}

impl SerialChip for MockChip {
    fn dev_init(
        &mut self,
        _fdt: &Fdt<'_>,
        _node: &FdtNode<'_, '_>,
        _params: Option<&str>,
    ) -> Result<(), SerialError> {
        Ok(())
    }

    fn putc(&self, ch: u8) {
        self.log.push(SerialEvent::Putc(ch));
    }

    fn flush(&self) {
        self.log.push(SerialEvent::Flush);
    }
}
