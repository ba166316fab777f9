//! 扁平设备树（FDT）构造器
//!
//! 生成符合 DTSpec v17 布局的二进制：头部、空的内存保留表、结构块、字符串块。
//! 只覆盖测试需要的子集，不做字符串去重。
//!
//! ```ignore
//! let blob = DtbBuilder::new()
//!     .begin_node("chosen")
//!     .prop_str("stdout-path", "serial0:115200n8")
//!     .end_node()
//!     .build();
//! ```

use alloc::vec::Vec;

const FDT_MAGIC: u32 = 0xd00d_feed;
const FDT_VERSION: u32 = 17;
const FDT_LAST_COMP_VERSION: u32 = 16;

const FDT_BEGIN_NODE: u32 = 0x1;
const FDT_END_NODE: u32 = 0x2;
const FDT_PROP: u32 = 0x3;
const FDT_END: u32 = 0x9;

const HEADER_SIZE: usize = 40;
const RSVMAP_SIZE: usize = 16;

/// FDT 构造器
///
/// 创建时自动打开根节点，[`DtbBuilder::build`] 会关闭所有未关闭的节点。
pub struct DtbBuilder {
    structs: Vec<u8>,
    strings: Vec<u8>,
    depth: usize,
}

impl DtbBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            structs: Vec::new(),
            strings: Vec::new(),
            depth: 0,
        };
        builder.open("");
        builder
    }

    /// 打开一个子节点，`name` 可带单元地址（如 `serial@10000000`）
    pub fn begin_node(mut self, name: &str) -> Self {
        self.open(name);
        self
    }

    pub fn end_node(mut self) -> Self {
        self.close();
        self
    }

    pub fn prop(mut self, name: &str, value: &[u8]) -> Self {
        let name_off = self.strings.len() as u32;
        self.strings.extend_from_slice(name.as_bytes());
        self.strings.push(0);

        self.push_u32(FDT_PROP);
        self.push_u32(value.len() as u32);
        self.push_u32(name_off);
        self.structs.extend_from_slice(value);
        self.pad();
        self
    }

    /// 以 NUL 结尾的字符串属性
    pub fn prop_str(self, name: &str, value: &str) -> Self {
        let mut bytes = Vec::with_capacity(value.len() + 1);
        bytes.extend_from_slice(value.as_bytes());
        bytes.push(0);
        self.prop(name, &bytes)
    }

    /// 字符串列表属性（如 `compatible`）
    pub fn prop_strs(self, name: &str, values: &[&str]) -> Self {
        let mut bytes = Vec::new();
        for v in values {
            bytes.extend_from_slice(v.as_bytes());
            bytes.push(0);
        }
        self.prop(name, &bytes)
    }

    pub fn prop_u32(self, name: &str, value: u32) -> Self {
        self.prop(name, &value.to_be_bytes())
    }

    pub fn build(mut self) -> Vec<u8> {
        while self.depth > 0 {
            self.close();
        }
        self.push_u32(FDT_END);

        let off_dt_struct = HEADER_SIZE + RSVMAP_SIZE;
        let off_dt_strings = off_dt_struct + self.structs.len();
        let total_size = off_dt_strings + self.strings.len();

        let mut blob = Vec::with_capacity(total_size);
        for word in [
            FDT_MAGIC,
            total_size as u32,
            off_dt_struct as u32,
            off_dt_strings as u32,
            HEADER_SIZE as u32,
            FDT_VERSION,
            FDT_LAST_COMP_VERSION,
            0,
            self.strings.len() as u32,
            self.structs.len() as u32,
        ] {
            blob.extend_from_slice(&word.to_be_bytes());
        }
        blob.extend_from_slice(&[0u8; RSVMAP_SIZE]);
        blob.extend_from_slice(&self.structs);
        blob.extend_from_slice(&self.strings);
        blob
    }

    fn open(&mut self, name: &str) {
        self.push_u32(FDT_BEGIN_NODE);
        self.structs.extend_from_slice(name.as_bytes());
        self.structs.push(0);
        self.pad();
        self.depth += 1;
    }

    fn close(&mut self) {
        assert!(self.depth > 0, "dtb: end_node without matching begin_node");
        self.push_u32(FDT_END_NODE);
        self.depth -= 1;
    }

    fn push_u32(&mut self, value: u32) {
        self.structs.extend_from_slice(&value.to_be_bytes());
    }

    fn pad(&mut self) {
        while self.structs.len() % 4 != 0 {
            self.structs.push(0);
        }
    }
}

impl Default for DtbBuilder {
    fn default() -> Self {
        Self::new()
    }
}
