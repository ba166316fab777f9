//! 控制台子系统错误类型

use alloc::string::String;
use thiserror::Error;

/// 串口驱动在初始化设备时报告的错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerialError {
    /// 设备树节点缺少驱动必需的属性
    #[error("missing property `{0}`")]
    MissingProperty(&'static str),
    /// 驱动无法理解 `stdout-path` 中的参数
    #[error("invalid console parameters `{0}`")]
    InvalidParams(String),
    /// 硬件无响应
    #[error("device not responding")]
    NoDevice,
    /// 驱动不支持该配置
    #[error("unsupported configuration")]
    Unsupported,
}

/// 控制台解析失败的原因
///
/// 任何一种失败都保持原有控制台不变。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// `stdout-path` 不是合法字符串或设备说明符为空
    #[error("malformed stdout-path directive")]
    InvalidDirective,
    /// 说明符既不是别名也不是存在的节点路径，或别名指向的节点不存在
    #[error("no device tree node for `{0}`")]
    NodeNotFound(String),
    /// 注册表中没有与节点兼容的驱动
    #[error("no compatible driver for `{0}`")]
    NoCompatibleDriver(String),
    /// 兼容驱动不提供串口能力
    #[error("driver `{0}` is not a serial driver")]
    NotSerialDriver(&'static str),
    /// 驱动分配设备实例失败
    #[error("driver `{0}` failed to allocate a device")]
    AllocFailed(&'static str),
    /// 设备实例初始化失败，实例已交还驱动释放
    #[error("console device `{path}` failed to initialize: {source}")]
    InitFailed {
        /// 设备节点路径
        path: String,
        /// 驱动报告的错误
        source: SerialError,
    },
}
