//! chosen 节点查找与 `stdout-path` 解析
//!
//! 两处回退都按固定顺序逐个尝试，先命中者胜出：
//!
//! - chosen 节点：依次尝试各候选设备树，每棵树内按 [`CHOSEN_NODE_PATHS`] 的顺序查找；
//! - 设备说明符：按 [`SPECIFIER_ORDER`] 先当作别名，再当作节点路径。

use fdt::{Fdt, node::FdtNode};

use crate::config::{ALIASES_NODE_PATH, CHOSEN_NODE_PATHS, DIRECTIVE_SEPARATOR};

/// 在一棵设备树中查找 chosen 节点
pub fn find_chosen_node<'b, 'a>(fdt: &'b Fdt<'a>) -> Option<FdtNode<'b, 'a>> {
    CHOSEN_NODE_PATHS.iter().find_map(|path| fdt.find_node(path))
}

/// 按顺序在候选设备树中查找 chosen 节点，返回命中的树与节点
pub fn find_chosen<'b, 'a>(blobs: &[&'b Fdt<'a>]) -> Option<(&'b Fdt<'a>, FdtNode<'b, 'a>)> {
    blobs
        .iter()
        .find_map(|fdt| find_chosen_node(*fdt).map(|node| (*fdt, node)))
}

/// 解析后的控制台声明
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleDirective<'a> {
    /// 设备说明符：别名或节点路径
    pub specifier: &'a str,
    /// 分隔符之后的驱动参数，原样传给驱动
    pub params: Option<&'a str>,
}

impl<'a> ConsoleDirective<'a> {
    /// 在第一个分隔符处拆分声明
    ///
    /// 说明符为空时返回 None。
    pub fn parse(text: &'a str) -> Option<Self> {
        let (specifier, params) = match text.split_once(DIRECTIVE_SEPARATOR) {
            Some((specifier, params)) => (specifier, Some(params)),
            None => (text, None),
        };
        if specifier.is_empty() {
            return None;
        }
        Some(Self { specifier, params })
    }

    /// 从属性原始值解析，取第一个 NUL 之前的内容
    pub fn from_property(value: &'a [u8]) -> Option<Self> {
        let text = value.split(|b| *b == 0).next()?;
        Self::parse(core::str::from_utf8(text).ok()?)
    }
}

/// 设备说明符的解释方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// `/aliases` 中的别名
    Alias,
    /// 完整节点路径
    Path,
}

/// 说明符解释顺序
pub const SPECIFIER_ORDER: [SpecifierKind; 2] = [SpecifierKind::Alias, SpecifierKind::Path];

impl SpecifierKind {
    /// 按此方式把说明符解释为节点路径
    ///
    /// 只产生路径，不检查节点是否存在。
    pub fn to_path<'a>(self, fdt: &Fdt<'a>, specifier: &'a str) -> Option<&'a str> {
        match self {
            SpecifierKind::Alias => {
                let target = fdt.find_node(ALIASES_NODE_PATH)?.property(specifier)?;
                let target = target.value.split(|b| *b == 0).next()?;
                core::str::from_utf8(target).ok()
            }
            SpecifierKind::Path => Some(specifier),
        }
    }
}

/// 按 [`SPECIFIER_ORDER`] 把说明符解释为节点路径
///
/// 第一个给出路径的方式决定结果：别名存在但目标节点不存在时不会再按字面路径重试。
pub fn resolve_specifier<'a>(fdt: &Fdt<'a>, specifier: &'a str) -> Option<(SpecifierKind, &'a str)> {
    SPECIFIER_ORDER
        .iter()
        .find_map(|kind| kind.to_path(fdt, specifier).map(|path| (*kind, path)))
}

/// 按绝对路径查找节点
///
/// `Fdt::find_node` 会把非 `/` 开头的路径再当作别名解析，别名自引用或成环时无限递归，
/// 所以非绝对路径一律视为不存在。
pub fn find_node_by_path<'b, 'a>(fdt: &'b Fdt<'a>, path: &str) -> Option<FdtNode<'b, 'a>> {
    if !path.starts_with('/') {
        return None;
    }
    fdt.find_node(path)
}
