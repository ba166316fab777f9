//! 设备树来源钩子
//!
//! 平台代码实现 [`DtOps`] 并在启动时注册，控制台解析通过它拿到
//! 嵌入镜像的（安全）设备树与引导程序传入的（非安全）设备树。

use core::sync::atomic::{AtomicUsize, Ordering};

use fdt::Fdt;

/// 设备树来源
pub trait DtOps: Send + Sync {
    /// 嵌入镜像的设备树
    fn embedded_dt(&self) -> Option<Fdt<'static>>;

    /// 外部传入的设备树
    fn external_dt(&self) -> Option<Fdt<'static>>;
}

static DT_OPS_DATA: AtomicUsize = AtomicUsize::new(0);
static DT_OPS_VTABLE: AtomicUsize = AtomicUsize::new(0);

/// 注册设备树来源
///
/// # Safety
/// 必须在单线程启动阶段调用，且早于 [`crate::configure_console_from_dt`]
pub unsafe fn register_dt_ops(ops: &'static dyn DtOps) {
    let ptr = ops as *const dyn DtOps;
    // SAFETY: 胖指针布局为 (data, vtable)
    let (data, vtable) = unsafe { core::mem::transmute::<*const dyn DtOps, (usize, usize)>(ptr) };
    DT_OPS_VTABLE.store(vtable, Ordering::Release);
    DT_OPS_DATA.store(data, Ordering::Release);
}

/// 已注册的设备树来源，未注册时返回 None
pub(crate) fn dt_ops() -> Option<&'static dyn DtOps> {
    let data = DT_OPS_DATA.load(Ordering::Acquire);
    let vtable = DT_OPS_VTABLE.load(Ordering::Acquire);
    if data == 0 {
        return None;
    }
    // SAFETY: 由 register_dt_ops 写入，指向 'static 对象
    Some(unsafe { &*core::mem::transmute::<(usize, usize), *const dyn DtOps>((data, vtable)) })
}

/// 嵌入的设备树
pub(crate) fn embedded_dt() -> Option<Fdt<'static>> {
    dt_ops()?.embedded_dt()
}

/// 外部设备树
pub(crate) fn external_dt() -> Option<Fdt<'static>> {
    dt_ops()?.external_dt()
}
