//! 核心类型定义 - 键特征与共享类型

use core::fmt;
use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// 键特征
///
/// 键必须可比较、可哈希。`is_null` 标记不可作为表键使用的"空键"，
/// 所有带键操作遇到空键都会返回 [`TableError::InvalidArgument`](crate::TableError)。
pub trait Key: Hash + Eq + Debug {
    /// 是否为空键
    fn is_null(&self) -> bool {
        false
    }
}

macro_rules! impl_plain_key {
    ($($ty:ty),* $(,)?) => {
        $(impl Key for $ty {})*
    };
}

impl_plain_key!(
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    bool, char, str, String, Vec<u8>,
);

impl<T: Key + ?Sized> Key for &T {
    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

impl<T: Key + ?Sized> Key for Box<T> {
    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

// `None` 对应可空引用语义中的 null
impl<T: Key> Key for Option<T> {
    fn is_null(&self) -> bool {
        self.as_ref().map_or(true, |key| key.is_null())
    }
}

/// 字节键包装类型
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteKey(pub Vec<u8>);

impl ByteKey {
    /// 创建新字节键
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// 获取键的字节表示
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// 获取内部字节
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<&[u8]> for ByteKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for ByteKey {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl Debug for ByteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteKey(")?;
        for byte in &self.0 {
            write!(f, "{:02X}", byte)?;
        }
        write!(f, ")")
    }
}

impl Display for ByteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl PartialOrd for ByteKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByteKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl Key for ByteKey {}

/// 操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// 插入或更新
    Insert,
    /// 查询
    Get,
    /// 存在性检查
    Contains,
    /// 删除
    Remove,
    /// 扩容重哈希
    Resize,
    /// 清空
    Clear,
    /// 迭代
    Iterate,
}

impl OperationType {
    /// 全部操作类型
    pub const ALL: [OperationType; 7] = [
        OperationType::Insert,
        OperationType::Get,
        OperationType::Contains,
        OperationType::Remove,
        OperationType::Resize,
        OperationType::Clear,
        OperationType::Iterate,
    ];

    /// 判断是否为读操作
    ///
    /// 查询会做惰性迁移，但不改变表的逻辑内容，仍视为读。
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            OperationType::Get | OperationType::Contains | OperationType::Iterate
        )
    }

    /// 判断是否为写操作
    pub fn is_write(&self) -> bool {
        !self.is_read()
    }

    /// 转换为字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Insert => "insert",
            OperationType::Get => "get",
            OperationType::Contains => "contains",
            OperationType::Remove => "remove",
            OperationType::Resize => "resize",
            OperationType::Clear => "clear",
            OperationType::Iterate => "iterate",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}
