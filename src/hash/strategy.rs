//! 探测策略模块 - 定义开放寻址的探测序列与容量约束

use crate::hash::{
    hasher::{HashAlgorithm, KeyHasher},
    DoubleHashProbing, LinearProbing, QuadraticProbing,
};
use std::hash::Hash;

/// 探测策略类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbingKind {
    #[default]
    Quadratic,
    Linear,
    DoubleHash,
}

impl ProbingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbingKind::Quadratic => "quadratic",
            ProbingKind::Linear => "linear",
            ProbingKind::DoubleHash => "double_hash",
        }
    }
}

/// 探测策略特征
///
/// 第 `x` 次探测的位置为 `(base + probe_offset(x)) mod capacity`，`x` 从 0 开始，
/// 且 `probe_offset(0) == 0`。实现必须保证：容量满足 [`adjust_capacity`] 的约束时，
/// `x` 取 `0..capacity` 恰好覆盖全部槽位各一次，否则满表插入可能无法终止。
///
/// [`adjust_capacity`]: ProbingPolicy::adjust_capacity
pub trait ProbingPolicy {
    /// 获取策略类型
    fn kind(&self) -> ProbingKind;

    /// 为即将开始的探测准备状态（如双哈希的步长）
    fn prepare<K: Hash + ?Sized>(&mut self, _key: &K, _capacity: usize) {}

    /// 第 `attempt` 次探测相对基址的偏移
    fn probe_offset(&self, attempt: usize) -> usize;

    /// 不小于 `requested` 的最小合法容量，溢出时返回 `None`
    fn adjust_capacity(&self, requested: usize) -> Option<usize>;

    /// 扩容目标：不小于 `2 * current + 1` 的最小合法容量
    fn next_valid_capacity(&self, current: usize) -> Option<usize> {
        let requested = current.checked_mul(2)?.checked_add(1)?;
        self.adjust_capacity(requested)
    }

    /// 容量是否满足策略约束
    fn is_valid_capacity(&self, capacity: usize) -> bool {
        capacity > 0 && self.adjust_capacity(capacity) == Some(capacity)
    }
}

/// 运行时选择的探测策略
#[derive(Debug, Clone)]
pub enum AnyProbing {
    Quadratic(QuadraticProbing),
    Linear(LinearProbing),
    DoubleHash(DoubleHashProbing),
}

impl ProbingPolicy for AnyProbing {
    fn kind(&self) -> ProbingKind {
        match self {
            AnyProbing::Quadratic(policy) => policy.kind(),
            AnyProbing::Linear(policy) => policy.kind(),
            AnyProbing::DoubleHash(policy) => policy.kind(),
        }
    }

    fn prepare<K: Hash + ?Sized>(&mut self, key: &K, capacity: usize) {
        match self {
            AnyProbing::Quadratic(policy) => policy.prepare(key, capacity),
            AnyProbing::Linear(policy) => policy.prepare(key, capacity),
            AnyProbing::DoubleHash(policy) => policy.prepare(key, capacity),
        }
    }

    fn probe_offset(&self, attempt: usize) -> usize {
        match self {
            AnyProbing::Quadratic(policy) => policy.probe_offset(attempt),
            AnyProbing::Linear(policy) => policy.probe_offset(attempt),
            AnyProbing::DoubleHash(policy) => policy.probe_offset(attempt),
        }
    }

    fn adjust_capacity(&self, requested: usize) -> Option<usize> {
        match self {
            AnyProbing::Quadratic(policy) => policy.adjust_capacity(requested),
            AnyProbing::Linear(policy) => policy.adjust_capacity(requested),
            AnyProbing::DoubleHash(policy) => policy.adjust_capacity(requested),
        }
    }
}

/// 探测策略工厂
#[derive(Debug, Clone, Copy)]
pub struct PolicyFactory {
    kind: ProbingKind,
    hash_algorithm: HashAlgorithm,
    seed: u64,
}

impl PolicyFactory {
    /// 创建新工厂
    pub fn new(kind: ProbingKind, hash_algorithm: HashAlgorithm, seed: u64) -> Self {
        Self {
            kind,
            hash_algorithm,
            seed,
        }
    }

    /// 创建探测策略
    pub fn create_policy(&self) -> AnyProbing {
        match self.kind {
            ProbingKind::Quadratic => AnyProbing::Quadratic(QuadraticProbing::new()),
            ProbingKind::Linear => AnyProbing::Linear(LinearProbing::new()),
            ProbingKind::DoubleHash => AnyProbing::DoubleHash(DoubleHashProbing::with_hasher(
                KeyHasher::new(self.hash_algorithm, self.seed),
            )),
        }
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// 合法容量下 0..capacity 次探测覆盖全部槽位
    fn assert_full_coverage<P: ProbingPolicy>(policy: &mut P, key: &str, capacity: usize) {
        assert!(policy.is_valid_capacity(capacity), "{} 不是合法容量", capacity);
        policy.prepare(key, capacity);
        let base = 3 % capacity;
        let visited: HashSet<usize> = (0..capacity)
            .map(|x| (base + policy.probe_offset(x) % capacity) % capacity)
            .collect();
        assert_eq!(visited.len(), capacity, "{:?} 容量 {}", policy.kind(), capacity);
    }

    #[test]
    fn test_factory_kinds() {
        for kind in [ProbingKind::Quadratic, ProbingKind::Linear, ProbingKind::DoubleHash] {
            let factory = PolicyFactory::new(kind, HashAlgorithm::XxHash, 42);
            assert_eq!(factory.create_policy().kind(), kind);
        }
    }

    #[test]
    fn test_every_policy_covers_all_slots() {
        for kind in [ProbingKind::Quadratic, ProbingKind::Linear, ProbingKind::DoubleHash] {
            let mut policy = PolicyFactory::new(kind, HashAlgorithm::AHash, 42).create_policy();
            let mut capacity = policy.adjust_capacity(7).unwrap();
            for _ in 0..5 {
                for key in ["a", "b", "consistent_key"] {
                    assert_full_coverage(&mut policy, key, capacity);
                }
                capacity = policy.next_valid_capacity(capacity).unwrap();
            }
        }
    }

    #[test]
    fn test_first_probe_is_base() {
        for kind in [ProbingKind::Quadratic, ProbingKind::Linear, ProbingKind::DoubleHash] {
            let mut policy = PolicyFactory::new(kind, HashAlgorithm::AHash, 42).create_policy();
            policy.prepare("k", 11);
            assert_eq!(policy.probe_offset(0), 0);
        }
    }

    #[test]
    fn test_next_valid_capacity_overflow() {
        let policy = QuadraticProbing::new();
        assert_eq!(policy.next_valid_capacity(usize::MAX / 2 + 1), None);
    }
}
