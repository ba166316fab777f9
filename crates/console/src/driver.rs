//! 设备树驱动注册表
//!
//! 驱动在启动阶段通过 [`register_dt_driver`] 登记自己能处理的 `compatible` 字符串，
//! 控制台解析时按节点查询。

use alloc::vec::Vec;
use fdt::node::FdtNode;
use lazy_static::lazy_static;
use sync::RwLock;

use crate::serial::SerialDriver;

/// 设备树驱动描述
pub trait DtDriver: Send + Sync {
    /// 驱动名称，用于日志
    fn name(&self) -> &'static str;

    /// 驱动能处理的 `compatible` 字符串
    fn compatible(&self) -> &'static [&'static str];

    /// 串口能力（如果适用）
    fn as_serial(&self) -> Option<&dyn SerialDriver> {
        None
    }
}

/// 驱动注册表
///
/// 只在启动阶段写入，之后只读。
pub struct DtDriverRegistry {
    drivers: RwLock<Vec<&'static dyn DtDriver>>,
}

impl DtDriverRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            drivers: RwLock::new(Vec::new()),
        }
    }

    /// 登记驱动，登记顺序即同一 `compatible` 下的优先顺序
    pub fn register(&self, driver: &'static dyn DtDriver) {
        self.drivers.write().push(driver);
    }

    /// 已登记的驱动数
    pub fn len(&self) -> usize {
        self.drivers.read().len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.drivers.read().is_empty()
    }

    /// 查找声明了指定 `compatible` 字符串的驱动
    pub fn find_by_compatible(&self, compatible: &str) -> Option<&'static dyn DtDriver> {
        self.drivers
            .read()
            .iter()
            .copied()
            .find(|d| d.compatible().iter().any(|c| *c == compatible))
    }

    /// 查找与节点兼容的驱动
    ///
    /// 按节点 `compatible` 列表的顺序（从最具体到最通用）逐项匹配，
    /// 第一个命中的驱动胜出。节点没有 `compatible` 属性时返回 None。
    pub fn find_compatible(&self, node: &FdtNode<'_, '_>) -> Option<&'static dyn DtDriver> {
        let compatible = node.compatible()?;
        compatible.all().find_map(|c| self.find_by_compatible(c))
    }
}

impl Default for DtDriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    /// 全局设备树驱动注册表
    pub static ref DT_DRIVERS: DtDriverRegistry = DtDriverRegistry::new();
}

/// 向全局注册表登记驱动
pub fn register_dt_driver(driver: &'static dyn DtDriver) {
    DT_DRIVERS.register(driver);
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdt::Fdt;
    use test_support::dtb::DtbBuilder;

    struct NamedDriver {
        name: &'static str,
        compatible: &'static [&'static str],
    }

    impl DtDriver for NamedDriver {
        fn name(&self) -> &'static str {
            self.name
        }

        fn compatible(&self) -> &'static [&'static str] {
            self.compatible
        }
    }

    static GENERIC: NamedDriver = NamedDriver {
        name: "generic",
        compatible: &["ns16550a", "ns16550"],
    };
    static VENDOR: NamedDriver = NamedDriver {
        name: "vendor",
        compatible: &["acme,uart-v2"],
    };
    static SHADOW: NamedDriver = NamedDriver {
        name: "shadow",
        compatible: &["ns16550a"],
    };

    #[test]
    fn test_most_specific_compatible_wins() {
        let registry = DtDriverRegistry::new();
        registry.register(&GENERIC);
        registry.register(&VENDOR);
        assert_eq!(registry.len(), 2);

        let blob = DtbBuilder::new()
            .begin_node("serial@1000")
            .prop_strs("compatible", &["acme,uart-v2", "ns16550a"])
            .end_node()
            .build();
        let fdt = Fdt::new(&blob).unwrap();
        let node = fdt.find_node("/serial@1000").unwrap();

        assert_eq!(registry.find_compatible(&node).unwrap().name(), "vendor");
    }

    #[test]
    fn test_registration_order_breaks_ties() {
        let registry = DtDriverRegistry::new();
        registry.register(&GENERIC);
        registry.register(&SHADOW);
        assert_eq!(registry.find_by_compatible("ns16550a").unwrap().name(), "generic");
        assert!(registry.find_by_compatible("acme,uart-v2").is_none());
    }

    #[test]
    fn test_node_without_compatible_has_no_driver() {
        let registry = DtDriverRegistry::new();
        registry.register(&GENERIC);
        assert!(!registry.is_empty());

        let blob = DtbBuilder::new().begin_node("serial@1000").end_node().build();
        let fdt = Fdt::new(&blob).unwrap();
        let node = fdt.find_node("/serial@1000").unwrap();
        assert!(registry.find_compatible(&node).is_none());
    }
}
