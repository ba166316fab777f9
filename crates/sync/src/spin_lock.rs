//! 自旋锁封装
//!
//! 在 [`RawSpinLock`] 之上提供对数据的互斥访问。

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

use crate::raw_spin_lock::{RawSpinLock, RawSpinLockGuard};

/// 保护一份数据的自旋锁
///
/// 持锁期间本地中断被屏蔽，临界区应尽量短。
///
/// # 示例
/// ```ignore
/// static SLOT: SpinLock<Option<usize>> = SpinLock::new(None);
/// let prev = core::mem::replace(&mut *SLOT.lock(), Some(1));
/// ```
#[derive(Debug)]
pub struct SpinLock<T> {
    raw_lock: RawSpinLock,
    data: UnsafeCell<T>,
}

impl<T> SpinLock<T> {
    /// 创建自旋锁
    pub const fn new(data: T) -> Self {
        SpinLock {
            raw_lock: RawSpinLock::new(),
            data: UnsafeCell::new(data),
        }
    }

    /// 获取锁
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        let _raw_guard = self.raw_lock.lock();
        SpinLockGuard {
            _raw_guard,
            // SAFETY: 持有 raw_lock 期间独占访问 data
            data: unsafe { &mut *self.data.get() },
        }
    }

    /// 尝试获取锁
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        self.raw_lock.try_lock().map(|_raw_guard| SpinLockGuard {
            _raw_guard,
            // SAFETY: 同上
            data: unsafe { &mut *self.data.get() },
        })
    }

    /// 锁是否被占用（仅供调试）
    pub fn is_locked(&self) -> bool {
        self.raw_lock.is_locked()
    }
}

/// [`SpinLock`] 的 RAII 保护器
pub struct SpinLockGuard<'a, T> {
    _raw_guard: RawSpinLockGuard<'a>,
    data: &'a mut T,
}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.data
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.data
    }
}

// SAFETY: 所有对 data 的访问都经过 raw_lock 串行化
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}
