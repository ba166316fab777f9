//! 串口驱动接口
//!
//! 驱动实现位于平台代码中，这里只定义控制台子系统消费的接口：
//! 驱动负责分配、初始化和释放设备实例；设备实例负责逐字节输出与刷新。

use alloc::boxed::Box;
use fdt::{Fdt, node::FdtNode};

use crate::error::SerialError;

/// 串口设备实例
///
/// 由 [`SerialDriver::dev_alloc`] 分配。只有初始化成功的实例才会被注册为控制台。
pub trait SerialChip: Send + Sync {
    /// 用设备树节点和 `stdout-path` 中的参数初始化硬件
    ///
    /// `params` 为分隔符之后的原始文本（如 `115200n8`），含义由驱动决定。
    fn dev_init(
        &mut self,
        fdt: &Fdt<'_>,
        node: &FdtNode<'_, '_>,
        params: Option<&str>,
    ) -> Result<(), SerialError>;

    /// 输出一个字节
    fn putc(&self, ch: u8);

    /// 等待已缓冲的输出全部发出
    fn flush(&self);
}

/// 串口驱动
pub trait SerialDriver: Send + Sync {
    /// 分配一个未初始化的设备实例，资源不足时返回 None
    fn dev_alloc(&self) -> Option<Box<dyn SerialChip>>;

    /// 初始化设备实例
    fn dev_init(
        &self,
        chip: &mut dyn SerialChip,
        fdt: &Fdt<'_>,
        node: &FdtNode<'_, '_>,
        params: Option<&str>,
    ) -> Result<(), SerialError> {
        chip.dev_init(fdt, node, params)
    }

    /// 释放从未注册过的设备实例
    fn dev_free(&self, chip: Box<dyn SerialChip>) {
        drop(chip);
    }
}
