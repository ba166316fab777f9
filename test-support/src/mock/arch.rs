//! 架构相关操作的 Mock 实现

use core::sync::atomic::{AtomicBool, Ordering};

/// 中断开启时状态字中的标志位
pub const MOCK_IRQ_ENABLED: usize = 0x1;

/// Mock 架构操作
///
/// 用一个原子布尔值模拟“本地中断开关”。
pub struct MockArchOps {
    pub interrupt_state: AtomicBool,
}

impl MockArchOps {
    pub const fn new() -> Self {
        Self {
            interrupt_state: AtomicBool::new(true),
        }
    }

    pub unsafe fn read_and_disable_interrupts(&self) -> usize {
        if self.interrupt_state.swap(false, Ordering::SeqCst) {
            MOCK_IRQ_ENABLED
        } else {
            0
        }
    }

    pub unsafe fn restore_interrupts(&self, flags: usize) {
        self.interrupt_state
            .store(flags & MOCK_IRQ_ENABLED != 0, Ordering::SeqCst);
    }

    pub fn irq_enabled_mask(&self) -> usize {
        MOCK_IRQ_ENABLED
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.interrupt_state.load(Ordering::SeqCst)
    }
}

/// 全局 Mock 实例
pub static MOCK_ARCH_OPS: MockArchOps = MockArchOps::new();
