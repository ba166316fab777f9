//! 控制台门面
//!
//! 系统中所有诊断输出都经过这里。门面只持有一个活动串口句柄：
//! 没有句柄时所有输出静默丢弃；有句柄时逐字节转发，并把 `\n` 扩展为 `\r\n`。
//!
//! # 并发
//!
//! 句柄槽位由 [`SpinLock`] 保护。读者在临界区内只克隆 `Arc`，
//! 设备访问发生在锁外；[`Console::register`] 在同一把锁下整体替换槽位。
//! 因此读者看到的要么是旧句柄，要么是新句柄，不会看到半替换的状态。
//!
//! # 句柄归属
//!
//! [`Console::register`] 把被替换的句柄交还给调用者，由调用者决定何时释放。
//! 若仍有写者持有旧句柄的克隆，旧设备会在最后一个写者结束后才被释放。

use alloc::sync::Arc;
use core::fmt;

use sync::SpinLock;

use crate::serial::SerialChip;

/// 全局控制台
pub static CONSOLE: Console = Console::new();

/// 控制台门面
pub struct Console {
    chip: SpinLock<Option<Arc<dyn SerialChip>>>,
}

impl Console {
    /// 创建没有活动设备的控制台
    pub const fn new() -> Self {
        Self {
            chip: SpinLock::new(None),
        }
    }

    /// 当前活动设备
    pub fn current(&self) -> Option<Arc<dyn SerialChip>> {
        self.chip.lock().clone()
    }

    /// 是否有活动设备
    pub fn is_enabled(&self) -> bool {
        self.chip.lock().is_some()
    }

    /// 输出一个字符
    ///
    /// 需要已注册 `sync::ArchOps`，见 [`console_putc`]。
    pub fn putc(&self, ch: u8) {
        if let Some(chip) = self.current() {
            emit(chip.as_ref(), ch);
        }
    }

    /// 输出一串字节，整串使用同一个设备
    pub fn write_bytes(&self, bytes: &[u8]) {
        let Some(chip) = self.current() else {
            return;
        };
        for &ch in bytes {
            emit(chip.as_ref(), ch);
        }
    }

    /// 刷新活动设备
    ///
    /// 需要已注册 `sync::ArchOps`，见 [`console_flush`]。
    pub fn flush(&self) {
        if let Some(chip) = self.current() {
            chip.flush();
        }
    }

    /// 替换活动设备，传入 None 关闭控制台
    ///
    /// 返回被替换的设备。
    pub fn register(&self, chip: Option<Arc<dyn SerialChip>>) -> Option<Arc<dyn SerialChip>> {
        core::mem::replace(&mut *self.chip.lock(), chip)
    }

    /// 获取格式化写入器
    pub fn writer(&self) -> ConsoleWriter<'_> {
        ConsoleWriter { console: self }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

fn emit(chip: &dyn SerialChip, ch: u8) {
    if ch == b'\n' {
        chip.putc(b'\r');
    }
    chip.putc(ch);
}

/// 实现 [`fmt::Write`] 的控制台写入器
pub struct ConsoleWriter<'a> {
    console: &'a Console,
}

impl fmt::Write for ConsoleWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.console.write_bytes(s.as_bytes());
        Ok(())
    }
}

/// 向全局控制台输出一个字符
///
/// # Panics
/// 槽位由 [`SpinLock`] 保护，加锁需要关中断：在 `sync::register_arch_ops`
/// 之前调用会 panic，即使此时没有活动设备。注册之后没有活动设备时为空操作。
pub fn console_putc(ch: u8) {
    CONSOLE.putc(ch);
}

/// 刷新全局控制台
///
/// # Panics
/// 槽位由 [`SpinLock`] 保护，加锁需要关中断：在 `sync::register_arch_ops`
/// 之前调用会 panic，即使此时没有活动设备。注册之后没有活动设备时为空操作。
pub fn console_flush() {
    CONSOLE.flush();
}

/// 向全局控制台输出格式化文本
pub fn console_print(args: fmt::Arguments<'_>) {
    use fmt::Write;
    // ConsoleWriter 从不返回错误
    let _ = CONSOLE.writer().write_fmt(args);
}

/// 替换全局控制台的活动设备，返回被替换的设备
pub fn register_serial_console(chip: Option<Arc<dyn SerialChip>>) -> Option<Arc<dyn SerialChip>> {
    CONSOLE.register(chip)
}
