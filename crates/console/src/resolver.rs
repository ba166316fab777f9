//! 根据设备树切换控制台
//!
//! 解析流程：
//!
//! 1. 依次在嵌入设备树、外部设备树中查找 `/secure-chosen`，其次 `/chosen`；
//!    都找不到时保持当前控制台不变；
//! 2. 节点存在但没有 `stdout-path`：明确要求关闭控制台；
//! 3. 在第一个 `:` 处拆分出设备说明符与驱动参数；
//! 4. 说明符先按别名解释，再按节点路径解释；
//! 5. 在驱动注册表中查找兼容驱动；
//! 6. 分配设备实例，刷新旧控制台后初始化新实例，失败时交还驱动释放；
//! 7. 注册新实例为控制台。
//!
//! 第 3 步之后的任何失败都保持当前控制台不变，且不影响启动。

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use fdt::Fdt;

use crate::config::STDOUT_PATH_PROPERTY;
use crate::console::{CONSOLE, Console};
use crate::directive::{ConsoleDirective, find_chosen, find_node_by_path, resolve_specifier};
use crate::driver::{DT_DRIVERS, DtDriverRegistry};
use crate::error::ResolveError;
use crate::ops::{embedded_dt, external_dt};

/// 一次解析的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleOutcome {
    /// 没有任何 chosen 节点，控制台保持不变
    NoDirective,
    /// chosen 节点没有 `stdout-path`，控制台已关闭
    Disabled,
    /// 控制台已切换到新设备
    Switched {
        /// 设备节点路径
        path: String,
        /// 驱动名称
        driver: &'static str,
    },
}

/// 控制台解析器
pub struct ConsoleResolver<'r> {
    registry: &'r DtDriverRegistry,
    console: &'r Console,
}

impl<'r> ConsoleResolver<'r> {
    /// 在指定注册表与控制台上工作的解析器
    pub fn new(registry: &'r DtDriverRegistry, console: &'r Console) -> Self {
        Self { registry, console }
    }

    /// 按顺序在 `blobs` 中解析控制台并切换
    ///
    /// `blobs` 的顺序即优先级，通常为 `[嵌入设备树, 外部设备树]`。
    pub fn configure(&self, blobs: &[&Fdt<'_>]) -> Result<ConsoleOutcome, ResolveError> {
        let Some((fdt, chosen)) = find_chosen(blobs) else {
            log::debug!("No console directive from DTB");
            return Ok(ConsoleOutcome::NoDirective);
        };

        let Some(prop) = chosen.property(STDOUT_PATH_PROPERTY) else {
            log::info!("Switching off console");
            drop(self.console.register(None));
            return Ok(ConsoleOutcome::Disabled);
        };

        let directive =
            ConsoleDirective::from_property(prop.value).ok_or(ResolveError::InvalidDirective)?;
        let (_, path) = resolve_specifier(fdt, directive.specifier)
            .ok_or_else(|| ResolveError::NodeNotFound(directive.specifier.to_string()))?;
        let node = find_node_by_path(fdt, path)
            .ok_or_else(|| ResolveError::NodeNotFound(path.to_string()))?;

        let driver = self
            .registry
            .find_compatible(&node)
            .ok_or_else(|| ResolveError::NoCompatibleDriver(path.to_string()))?;
        let serial = driver
            .as_serial()
            .ok_or(ResolveError::NotSerialDriver(driver.name()))?;
        let mut chip = serial
            .dev_alloc()
            .ok_or(ResolveError::AllocFailed(driver.name()))?;

        // 新设备可能与早期控制台是同一个 UART，初始化会丢弃未发出的数据
        self.console.flush();
        if let Err(source) = serial.dev_init(chip.as_mut(), fdt, &node, directive.params) {
            serial.dev_free(chip);
            log::warn!("Console device {} failed to initialize: {}", path, source);
            return Err(ResolveError::InitFailed {
                path: path.to_string(),
                source,
            });
        }

        log::info!("Switching console to device: {}", path);
        drop(self.console.register(Some(Arc::from(chip))));
        Ok(ConsoleOutcome::Switched {
            path: path.to_string(),
            driver: driver.name(),
        })
    }
}

/// 用全局注册表与平台提供的设备树配置全局控制台
///
/// 解析失败只记录日志，控制台保持原状。
pub fn configure_console_from_dt() {
    let embedded = embedded_dt();
    let external = external_dt();
    let blobs: Vec<&Fdt<'static>> = [embedded.as_ref(), external.as_ref()]
        .into_iter()
        .flatten()
        .collect();

    if let Err(err) = ConsoleResolver::new(&DT_DRIVERS, &CONSOLE).configure(&blobs) {
        log::debug!("Console left unchanged: {}", err);
    }
}
