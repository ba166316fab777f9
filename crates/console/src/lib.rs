//! 控制台子系统
//!
//! 根据设备树选择并启用控制台输出设备。
//!
//! - [`Console`] / [`CONSOLE`]：全局控制台门面，持有当前唯一的活动串口句柄
//! - [`SerialDriver`] / [`SerialChip`]：串口驱动与设备实例接口
//! - [`DtDriver`] / [`DtDriverRegistry`]：按 `compatible` 查找驱动的注册表
//! - [`ConsoleResolver`]：从 `/secure-chosen` 或 `/chosen` 的 `stdout-path`
//!   解析出目标设备、实例化驱动并切换控制台
//! - [`DtOps`]：平台提供嵌入式（安全）与外部设备树的钩子
//!
//! # 启动流程
//!
//! 1. 平台注册 `sync::ArchOps`，并可选地用 [`register_serial_console`] 挂上早期控制台；
//! 2. 各驱动调用 [`register_dt_driver`] 登记自己；
//! 3. 平台调用 [`register_dt_ops`] 提供设备树；
//! 4. [`configure_console_from_dt`] 执行一次切换，失败只记录日志，不影响启动。

#![no_std]

extern crate alloc;

pub mod config;
pub mod console;
pub mod directive;
pub mod driver;
pub mod error;
pub mod ops;
pub mod resolver;
pub mod serial;

pub use config::{CHOSEN_NODE_PATHS, DIRECTIVE_SEPARATOR, STDOUT_PATH_PROPERTY};
pub use console::{
    CONSOLE, Console, ConsoleWriter, console_flush, console_print, console_putc,
    register_serial_console,
};
pub use directive::{
    ConsoleDirective, SpecifierKind, find_chosen_node, find_node_by_path, resolve_specifier,
};
pub use driver::{DT_DRIVERS, DtDriver, DtDriverRegistry, register_dt_driver};
pub use error::{ResolveError, SerialError};
pub use ops::{DtOps, register_dt_ops};
pub use resolver::{ConsoleOutcome, ConsoleResolver, configure_console_from_dt};
pub use serial::{SerialChip, SerialDriver};

#[cfg(test)]
pub(crate) mod test_util;
