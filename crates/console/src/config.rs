//! 控制台选择相关的设备树常量

/// 按优先级排列的 chosen 节点路径，安全世界专用的节点优先
pub const CHOSEN_NODE_PATHS: [&str; 2] = ["/secure-chosen", "/chosen"];

/// chosen 节点中描述控制台设备的属性
pub const STDOUT_PATH_PROPERTY: &str = "stdout-path";

/// 别名节点路径
pub const ALIASES_NODE_PATH: &str = "/aliases";

/// 分隔设备说明符与驱动参数的字符，如 `serial0:115200n8`
pub const DIRECTIVE_SEPARATOR: char = ':';
