//! 测试支持 crate
//!
//! 为控制台子系统的主机测试提供：
//!
//! - [`mock::arch`]：可在主机上运行的中断开关模拟
//! - [`mock::serial`]：记录串口输出事件的日志
//! - [`dtb`]：构造扁平设备树二进制（FDT）的小工具

#![no_std]

extern crate alloc;

pub mod dtb;
pub mod mock;
