//! 开放寻址哈希表核心实现
//!
//! 槽位数组 + 可插拔探测策略。删除留下墓碑，查询时把条目惰性迁移到
//! 探测路径上第一个墓碑处；`used_buckets`（占用 + 墓碑）达到阈值时整表扩容重哈希，
//! 这是唯一清除墓碑的时机。

use crate::{
    error::{Result, TableError},
    hash::{
        calculate_bucket, default_probing, probe_index, HashAlgorithm, KeyHasher, ProbingPolicy,
        QuadraticProbing,
    },
    map::{
        iter::{IntoIter, Iter, Keys, Values},
        slot::{Slot, SlotState},
    },
    stats::{OperationStats, TableStats},
    types::{Key, OperationType},
};
use std::{borrow::Borrow, fmt, mem};

/// 默认（同时也是最小）初始容量
pub const DEFAULT_CAPACITY: usize = 7;
/// 默认负载因子
pub const DEFAULT_LOAD_FACTOR: f64 = 0.65;

/// 哈希表配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// 初始容量，先提升到至少 [`DEFAULT_CAPACITY`]，再由探测策略取整
    pub initial_capacity: usize,
    pub load_factor: f64,
    pub hash_algorithm: HashAlgorithm,
    pub seed: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            hash_algorithm: HashAlgorithm::AHash,
            seed: KeyHasher::DEFAULT_SEED,
        }
    }
}

impl TableConfig {
    pub fn new(initial_capacity: usize, load_factor: f64) -> Self {
        Self {
            initial_capacity,
            load_factor,
            ..Self::default()
        }
    }

    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(TableError::invalid("容量必须为正数"));
        }
        if !(self.load_factor.is_finite() && self.load_factor > 0.0) {
            return Err(TableError::invalid(format!(
                "负载因子必须为有限正数: {}",
                self.load_factor
            )));
        }
        Ok(())
    }
}

/// 扩容阈值 `floor(capacity * load_factor)`，限制在 `[1, capacity - 1]`
///
/// 上限保证任何时刻至少留有一个空槽，探测总能终止；
/// 下限避免空表在首次插入前就被扩容。
fn threshold_for(capacity: usize, load_factor: f64) -> usize {
    let upper = capacity.saturating_sub(1).max(1);
    let raw = (capacity as f64 * load_factor).floor();
    if raw >= upper as f64 {
        upper
    } else {
        (raw as usize).max(1)
    }
}

/// 一次探测遍历的结果
#[derive(Debug, Clone, Copy)]
enum Probe {
    /// 找到键；`tombstone` 为路径上第一个墓碑
    Found {
        index: usize,
        tombstone: Option<usize>,
    },
    /// 遇到空槽，键不存在
    Vacant {
        index: usize,
        tombstone: Option<usize>,
    },
}

/// 开放寻址哈希表
///
/// 默认使用二次探测。所有修改都需要 `&mut self`；查询同样需要，
/// 因为命中时可能把条目迁移到更早的墓碑。
#[derive(Clone)]
pub struct HashTable<K, V, P = QuadraticProbing> {
    slots: Vec<Slot<K, V>>,
    policy: P,
    hasher: KeyHasher,
    load_factor: f64,
    threshold: usize,
    // 占用 + 墓碑
    used_buckets: usize,
    key_count: usize,
    stats: OperationStats,
}

impl<K: Key, V> HashTable<K, V, QuadraticProbing> {
    /// 使用默认配置创建（容量 7 → 8，负载因子 0.65）
    pub fn new() -> Self {
        let config = TableConfig::default();
        Self::from_parts(
            default_probing(),
            DEFAULT_CAPACITY.next_power_of_two(),
            &config,
        )
    }

    /// 指定初始容量
    pub fn with_capacity(initial_capacity: usize) -> Result<Self> {
        Self::with_config(TableConfig::new(initial_capacity, DEFAULT_LOAD_FACTOR))
    }

    /// 指定初始容量与负载因子
    pub fn with_capacity_and_load_factor(initial_capacity: usize, load_factor: f64) -> Result<Self> {
        Self::with_config(TableConfig::new(initial_capacity, load_factor))
    }

    /// 使用配置创建
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_policy(config, default_probing())
    }
}

impl<K: Key, V> Default for HashTable<K, V, QuadraticProbing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, V, P: ProbingPolicy> HashTable<K, V, P> {
    /// 使用指定探测策略创建
    pub fn with_policy(config: TableConfig, policy: P) -> Result<Self> {
        config.validate()?;
        let requested = config.initial_capacity.max(DEFAULT_CAPACITY);
        let capacity = policy
            .adjust_capacity(requested)
            .ok_or(TableError::CapacityOverflow { current: requested })?;
        Ok(Self::from_parts(policy, capacity, &config))
    }

    fn from_parts(policy: P, capacity: usize, config: &TableConfig) -> Self {
        let threshold = threshold_for(capacity, config.load_factor);
        log_debug!(
            "创建哈希表: policy={} capacity={} load_factor={} threshold={} hash={}",
            policy.kind().as_str(),
            capacity,
            config.load_factor,
            threshold,
            config.hash_algorithm.as_str()
        );

        Self {
            slots: Slot::empty_array(capacity),
            policy,
            hasher: KeyHasher::new(config.hash_algorithm, config.seed),
            load_factor: config.load_factor,
            threshold,
            used_buckets: 0,
            key_count: 0,
            stats: OperationStats::new(),
        }
    }

    /// 键数量
    pub fn size(&self) -> usize {
        self.key_count
    }

    /// 键数量（同 [`size`](Self::size)）
    pub fn len(&self) -> usize {
        self.key_count
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// 槽位总数
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// 扩容阈值
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// 配置的负载因子
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// 已用槽位数（占用 + 墓碑）
    pub fn used_buckets(&self) -> usize {
        self.used_buckets
    }

    /// 墓碑数
    pub fn tombstones(&self) -> usize {
        self.used_buckets - self.key_count
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn hasher(&self) -> &KeyHasher {
        &self.hasher
    }

    /// 指定槽位的状态，越界返回 `None`
    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        self.slots.get(index).map(Slot::state)
    }

    /// 插入或更新，返回旧值
    ///
    /// 若 `used_buckets` 已达阈值，先扩容，直到阈值高于 `used_buckets`。
    /// 负载因子很小时一次扩容可能不够。
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        Self::check_key(&key)?;
        self.stats.record(OperationType::Insert);

        if self.used_buckets >= self.threshold && self.tombstones() > self.key_count {
            log_debug!(
                "墓碑数 {} 超过键数 {}，本次扩容主要由墓碑触发",
                self.tombstones(),
                self.key_count
            );
        }
        while self.used_buckets >= self.threshold {
            self.resize()?;
        }

        self.insert_entry(key, value)
    }

    /// 查询；命中且路径上有墓碑时，条目迁移到第一个墓碑处
    pub fn get<Q>(&mut self, key: &Q) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Key + ?Sized,
    {
        let found = self.lookup(key, OperationType::Get)?;
        Ok(found.and_then(|index| self.slots[index].value()))
    }

    /// 可变查询，迁移规则同 [`get`](Self::get)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<Option<&mut V>>
    where
        K: Borrow<Q>,
        Q: Key + ?Sized,
    {
        let found = self.lookup(key, OperationType::Get)?;
        Ok(found.and_then(|index| self.slots[index].value_mut()))
    }

    /// 键是否存在，迁移规则同 [`get`](Self::get)
    pub fn contains_key<Q>(&mut self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Key + ?Sized,
    {
        Ok(self.lookup(key, OperationType::Contains)?.is_some())
    }

    /// 删除并返回旧值
    ///
    /// 槽位变为墓碑，只减少 `key_count`；墓碑直到下次扩容才被清除。
    pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Key + ?Sized,
    {
        Self::check_key(key)?;
        self.stats.record(OperationType::Remove);

        match self.find_slot(key)? {
            Probe::Found { index, .. } => {
                let removed = self.slots[index].take_entry().map(|(_, value)| value);
                self.key_count -= 1;
                Ok(removed)
            }
            Probe::Vacant { .. } => Ok(None),
        }
    }

    /// 扩容到策略给出的下一个合法容量，并重新插入全部条目
    ///
    /// 新存储整体替换旧存储，墓碑随之丢弃。只有在探测策略违反覆盖保证时
    /// 才会返回 [`TableError::ProbeExhausted`]，此时表内容已不完整。
    pub fn resize(&mut self) -> Result<()> {
        let old_capacity = self.capacity();
        let new_capacity = self
            .policy
            .next_valid_capacity(old_capacity)
            .ok_or_else(|| {
                log_warn!("无法计算扩容容量: 当前容量 {}", old_capacity);
                TableError::CapacityOverflow {
                    current: old_capacity,
                }
            })?;

        self.stats.record(OperationType::Resize);
        let purged = self.tombstones();
        let old_slots = mem::replace(&mut self.slots, Slot::empty_array(new_capacity));
        self.threshold = threshold_for(new_capacity, self.load_factor);
        self.key_count = 0;
        self.used_buckets = 0;

        for (key, value) in old_slots.into_iter().filter_map(Slot::into_entry) {
            self.insert_entry(key, value)?;
        }

        self.stats.record_purge(purged);
        log_info!(
            "扩容完成: {} -> {}, 键数={}, 清除墓碑={}, 新阈值={}",
            old_capacity,
            new_capacity,
            self.key_count,
            purged,
            self.threshold
        );
        Ok(())
    }

    /// 清空所有槽位，容量不变
    pub fn clear(&mut self) {
        self.stats.record(OperationType::Clear);
        self.slots.fill_with(Slot::default);
        self.key_count = 0;
        self.used_buckets = 0;
    }

    /// 按槽位顺序迭代 `(&K, &V)`
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.stats.record(OperationType::Iterate);
        Iter::new(&self.slots, self.key_count)
    }

    /// 所有键，槽位顺序
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// 所有值，槽位顺序
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// 获取统计信息
    pub fn stats(&self) -> TableStats {
        let capacity = self.capacity();
        TableStats {
            size: self.key_count,
            capacity,
            used_buckets: self.used_buckets,
            tombstones: self.tombstones(),
            threshold: self.threshold,
            load_factor: self.load_factor,
            occupancy: self.used_buckets as f64 / capacity as f64,
            policy: self.policy.kind(),
            operations: self.stats.snapshot(),
        }
    }

    /// 重置操作统计
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self) -> String {
        self.stats().export_prometheus()
    }

    fn check_key<Q: Key + ?Sized>(key: &Q) -> Result<()> {
        if key.is_null() {
            Err(TableError::invalid("键不能为空"))
        } else {
            Ok(())
        }
    }

    fn lookup<Q>(&mut self, key: &Q, op_type: OperationType) -> Result<Option<usize>>
    where
        K: Borrow<Q>,
        Q: Key + ?Sized,
    {
        Self::check_key(key)?;
        self.stats.record(op_type);

        match self.find_slot(key)? {
            Probe::Found { index, tombstone } => Ok(Some(self.relocate(index, tombstone))),
            Probe::Vacant { .. } => Ok(None),
        }
    }

    /// 写入条目，不检查阈值
    fn insert_entry(&mut self, key: K, value: V) -> Result<Option<V>> {
        match self.find_slot(&key)? {
            Probe::Found { index, tombstone } => {
                let index = self.relocate(index, tombstone);
                Ok(self.slots[index].replace_value(value))
            }
            Probe::Vacant { index, tombstone } => {
                match tombstone {
                    // 墓碑本就计入 used_buckets
                    Some(reused) => self.slots[reused] = Slot::occupied(key, value),
                    None => {
                        self.slots[index] = Slot::occupied(key, value);
                        self.used_buckets += 1;
                    }
                }
                self.key_count += 1;
                Ok(None)
            }
        }
    }

    /// 把 `index` 处的条目移入路径上第一个墓碑，返回条目的新位置
    fn relocate(&mut self, index: usize, tombstone: Option<usize>) -> usize {
        match tombstone {
            Some(target) => {
                self.slots.swap(index, target);
                self.stats.record_relocation();
                log_debug!("惰性迁移: 槽位 {} -> {}", index, target);
                target
            }
            None => index,
        }
    }

    /// 沿探测序列查找键，最多探测 `capacity` 次
    fn find_slot<Q>(&mut self, key: &Q) -> Result<Probe>
    where
        K: Borrow<Q>,
        Q: Key + ?Sized,
    {
        let capacity = self.slots.len();
        self.policy.prepare(key, capacity);
        let base = calculate_bucket(self.hasher.hash_one(key), capacity);
        let mut tombstone = None;

        for attempt in 0..capacity {
            let index = probe_index(base, self.policy.probe_offset(attempt), capacity);
            match &self.slots[index] {
                Slot::Empty => {
                    self.stats.record_probes(attempt + 1);
                    return Ok(Probe::Vacant { index, tombstone });
                }
                Slot::Tombstone => {
                    if tombstone.is_none() {
                        tombstone = Some(index);
                    }
                }
                Slot::Occupied { key: existing, .. } => {
                    if <K as Borrow<Q>>::borrow(existing) == key {
                        self.stats.record_probes(attempt + 1);
                        return Ok(Probe::Found { index, tombstone });
                    }
                }
            }
        }

        self.stats.record_probes(capacity);
        log_error!(
            "探测序列耗尽: policy={} capacity={} used_buckets={} key={:?}",
            self.policy.kind().as_str(),
            capacity,
            self.used_buckets,
            key
        );
        Err(TableError::ProbeExhausted {
            capacity,
            probes: capacity,
        })
    }
}

impl<K, V, P: ProbingPolicy> fmt::Debug for HashTable<K, V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("size", &self.key_count)
            .field("capacity", &self.slots.len())
            .field("load_factor", &self.load_factor)
            .field("used_buckets", &self.used_buckets)
            .field("threshold", &self.threshold)
            .field("policy", &self.policy.kind())
            .finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, P> fmt::Display for HashTable<K, V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let entries = self.slots.iter().filter_map(Slot::entry);
        for (i, (key, value)) in entries.enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} => {}", key, value)?;
        }
        write!(f, "}}")
    }
}

impl<'a, K: Key, V, P: ProbingPolicy> IntoIterator for &'a HashTable<K, V, P> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, P> IntoIterator for HashTable<K, V, P> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.slots, self.key_count)
    }
}
