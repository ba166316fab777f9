//! 中断保护器
//!
//! 控制台可能在中断上下文中被写入（例如中断处理中的日志输出），
//! 持有控制台槽位锁期间必须屏蔽本地中断，否则同一 CPU 上会自锁。
//! 关中断只解决本地重入问题，跨 CPU 的互斥仍由自旋锁负责。

use crate::arch_ops;

/// RAII 中断保护器
///
/// 构造时关闭本地中断并记录原状态，析构时恢复。
pub struct IntrGuard {
    flags: usize,
}

impl IntrGuard {
    /// 关闭本地中断
    pub fn new() -> Self {
        // SAFETY: flags 仅在 Drop 中原样交还
        let flags = unsafe { arch_ops().read_and_disable_interrupts() };
        IntrGuard { flags }
    }

    /// 进入临界区之前中断是否处于开启状态
    pub fn was_enabled(&self) -> bool {
        self.flags & arch_ops().irq_enabled_mask() != 0
    }
}

impl Default for IntrGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for IntrGuard {
    fn drop(&mut self) {
        // SAFETY: flags 由 new() 在同一 CPU 上保存
        unsafe { arch_ops().restore_interrupts(self.flags) };
    }
}
