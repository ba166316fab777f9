//! Mock 实现模块
//!
//! 这里不依赖 `sync` / `console` crate，避免与它们的 dev-dependency 形成环。
//! 各 crate 在自己的测试中为本模块的类型包一层并实现对应 trait。

pub mod arch;
pub mod serial;
