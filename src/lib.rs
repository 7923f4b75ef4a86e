//! Rust开放寻址哈希表库
//!
//! 提供基于开放寻址的键值哈希表，探测策略可插拔（默认二次探测），
//! 删除使用墓碑标记，查询时惰性迁移条目以缩短探测路径。
//!
//! ## 主要特性
//! - 二次探测（2的幂容量）、线性探测、双重哈希三种策略
//! - 墓碑删除 + 查询时惰性迁移
//! - 已用槽位达到阈值时整表扩容并清除墓碑
//! - AHash / XxHash / SipHash 可选，固定种子保证可复现
//! - 操作统计与Prometheus格式导出
//!
//! ## 快速开始
//!
//! ```rust
//! use probing_hashtable::*;
//!
//! fn main() -> Result<()> {
//!     // 创建默认配置的哈希表
//!     let mut table = HashTable::new();
//!
//!     // 插入键值对
//!     table.insert("key1", "value1")?;
//!
//!     // 获取值
//!     if let Some(value) = table.get("key1")? {
//!         println!("key1: {}", value);
//!     }
//!
//!     // 删除键
//!     table.remove("key1")?;
//!
//!     // 打印统计信息
//!     println!("{:?}", table.stats());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}
// 核心模块导出
pub mod error;
pub mod types;
pub mod hash;
pub mod map;
pub mod stats;

// 公共接口导出
pub use crate::{
    error::{Result, TableError},
    hash::{
        AnyProbing,
        DoubleHashProbing,
        HashAlgorithm,
        KeyHasher,
        LinearProbing,
        PolicyFactory,
        ProbingKind,
        ProbingPolicy,
        QuadraticProbing,
        default_probing
    },
    map::{
        HashTable,
        TableConfig,
        SlotState,
        DEFAULT_CAPACITY,
        DEFAULT_LOAD_FACTOR
    },
    stats::{OperationStatsSnapshot, TableStats},
    types::{ByteKey, Key, OperationType}
};

// 简化默认类型别名
pub type DefaultMap = HashTable<String, String>;

/// 按策略种类创建的哈希表
pub type DynamicTable<K, V> = HashTable<K, V, AnyProbing>;

/// 按策略种类创建哈希表
///
/// 双重哈希的二级哈希与主哈希同算法，种子固定为 [`DoubleHashProbing::SECONDARY_SEED`]。
pub fn table_with_kind<K: Key, V>(kind: ProbingKind, config: TableConfig) -> Result<DynamicTable<K, V>> {
    let policy = PolicyFactory::new(kind, config.hash_algorithm, DoubleHashProbing::SECONDARY_SEED)
        .create_policy();
    HashTable::with_policy(config, policy)
}

// 便捷功能函数

/// 批量插入，返回新增键的数量
///
/// 遇到错误立即返回，此前的插入保留。
pub fn batch_insert<K: Key, V, P: ProbingPolicy>(
    table: &mut HashTable<K, V, P>,
    items: impl IntoIterator<Item = (K, V)>,
) -> Result<usize> {
    let mut count = 0;
    for (key, value) in items {
        if table.insert(key, value)?.is_none() {
            count += 1;
        }
    }
    Ok(count)
}

/// 批量查询，返回值的克隆
pub fn batch_get<'a, K: Key + 'a, V: Clone, P: ProbingPolicy>(
    table: &mut HashTable<K, V, P>,
    keys: impl IntoIterator<Item = &'a K>,
) -> Result<Vec<Option<V>>> {
    keys.into_iter()
        .map(|key| -> Result<Option<V>> { Ok(table.get(key)?.cloned()) })
        .collect()
}
