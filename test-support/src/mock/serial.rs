//! 串口输出事件记录
//!
//! Mock 串口把每次 `putc` / `flush` 记录到 [`SerialEventLog`]，
//! 测试据此断言设备级输出的顺序。

use alloc::vec::Vec;
use core::sync::atomic::{AtomicU16, AtomicUsize, Ordering};

/// 最多记录的事件数，超出部分被丢弃
pub const SERIAL_EVENT_CAPACITY: usize = 512;

const FLUSH_TAG: u16 = 0x100;

/// 一次设备级操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialEvent {
    /// 输出一个字节
    Putc(u8),
    /// 刷新
    Flush,
}

impl SerialEvent {
    fn encode(self) -> u16 {
        match self {
            SerialEvent::Putc(ch) => ch as u16,
            SerialEvent::Flush => FLUSH_TAG,
        }
    }

    fn decode(raw: u16) -> Self {
        if raw == FLUSH_TAG {
            SerialEvent::Flush
        } else {
            SerialEvent::Putc(raw as u8)
        }
    }
}

/// 无锁事件日志，可放在 `static` 中并被多个 mock 设备共享
pub struct SerialEventLog {
    slots: [AtomicU16; SERIAL_EVENT_CAPACITY],
    len: AtomicUsize,
}

impl SerialEventLog {
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU16::new(0) }; SERIAL_EVENT_CAPACITY],
            len: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, event: SerialEvent) {
        let idx = self.len.fetch_add(1, Ordering::SeqCst);
        if idx < SERIAL_EVENT_CAPACITY {
            self.slots[idx].store(event.encode(), Ordering::SeqCst);
        }
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::SeqCst).min(SERIAL_EVENT_CAPACITY)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn events(&self) -> Vec<SerialEvent> {
        (0..self.len())
            .map(|i| SerialEvent::decode(self.slots[i].load(Ordering::SeqCst)))
            .collect()
    }

    /// 只取出 `Putc` 事件的字节
    pub fn bytes(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SerialEvent::Putc(ch) => Some(ch),
                SerialEvent::Flush => None,
            })
            .collect()
    }

    pub fn flush_count(&self) -> usize {
        self.events()
            .into_iter()
            .filter(|e| *e == SerialEvent::Flush)
            .count()
    }

    pub fn clear(&self) {
        self.len.store(0, Ordering::SeqCst);
    }
}

impl Default for SerialEventLog {
    fn default() -> Self {
        Self::new()
    }
}
