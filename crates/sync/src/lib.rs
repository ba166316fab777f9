//! 控制台子系统使用的同步原语
//!
//! 提供中断保护、自旋锁与读写锁：
//!
//! - [`IntrGuard`]：RAII 中断保护，构造时关中断，析构时恢复
//! - [`SpinLock`]：带中断保护的互斥自旋锁，用于保护当前控制台句柄槽位
//! - [`RwLock`]：基于 `lock_api` 的读写自旋锁，用于“启动期写、运行期读”的注册表
//!
//! # 架构依赖
//!
//! 关中断/开中断由架构实现，通过 [`ArchOps`] trait 注入。
//! 使用 [`SpinLock`] 前必须先调用 [`register_arch_ops`]。

#![no_std]

mod intr_guard;
mod raw_spin_lock;
mod rwlock;
mod spin_lock;

pub use intr_guard::*;
pub use raw_spin_lock::*;
pub use rwlock::*;
pub use spin_lock::*;

use core::sync::atomic::{AtomicUsize, Ordering};

/// 架构相关操作
///
/// 由平台代码实现并在启动早期注册。
pub trait ArchOps: Send + Sync {
    /// 读取当前中断状态并关闭本地中断，返回关闭前的状态字
    ///
    /// # Safety
    /// 返回值必须原样交还给 [`ArchOps::restore_interrupts`]
    unsafe fn read_and_disable_interrupts(&self) -> usize;

    /// 恢复由 [`ArchOps::read_and_disable_interrupts`] 保存的中断状态
    ///
    /// # Safety
    /// `flags` 必须来自同一 CPU 上配对的 `read_and_disable_interrupts`
    unsafe fn restore_interrupts(&self, flags: usize);

    /// 状态字中表示“中断已开启”的位掩码
    fn irq_enabled_mask(&self) -> usize;
}

static ARCH_OPS_DATA: AtomicUsize = AtomicUsize::new(0);
static ARCH_OPS_VTABLE: AtomicUsize = AtomicUsize::new(0);

/// 注册架构操作实现
///
/// # Safety
/// 必须在单线程启动阶段调用，且在任何锁被使用之前完成
pub unsafe fn register_arch_ops(ops: &'static dyn ArchOps) {
    let ptr = ops as *const dyn ArchOps;
    // SAFETY: 胖指针布局为 (data, vtable)
    let (data, vtable) = unsafe { core::mem::transmute::<*const dyn ArchOps, (usize, usize)>(ptr) };
    ARCH_OPS_VTABLE.store(vtable, Ordering::Release);
    ARCH_OPS_DATA.store(data, Ordering::Release);
}

#[inline]
pub(crate) fn arch_ops() -> &'static dyn ArchOps {
    let data = ARCH_OPS_DATA.load(Ordering::Acquire);
    let vtable = ARCH_OPS_VTABLE.load(Ordering::Acquire);
    if data == 0 {
        panic!("sync: ArchOps not registered, call register_arch_ops first");
    }
    // SAFETY: data 与 vtable 均由 register_arch_ops 写入，指向 'static 对象
    unsafe { &*core::mem::transmute::<(usize, usize), *const dyn ArchOps>((data, vtable)) }
}
