//! 双哈希策略 - 由第二个哈希函数决定探测步长

use crate::hash::{
    hasher::{HashAlgorithm, KeyHasher},
    next_prime,
    strategy::{ProbingKind, ProbingPolicy},
};
use std::hash::Hash;

/// 双哈希策略
///
/// 步长 `step = h2(k) mod capacity`（为0时取1），容量必须是素数，
/// 因此任意非零步长都与容量互质。
#[derive(Debug, Clone)]
pub struct DoubleHashProbing {
    secondary_hasher: KeyHasher,
    step: usize,
    capacity: usize,
}

impl DoubleHashProbing {
    /// 第二哈希函数的种子，与主哈希器默认种子不同
    pub const SECONDARY_SEED: u64 = 123;

    /// 创建新双哈希策略
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self::with_hasher(KeyHasher::new(algorithm, Self::SECONDARY_SEED))
    }

    /// 使用指定的第二哈希器创建
    pub fn with_hasher(secondary_hasher: KeyHasher) -> Self {
        Self {
            secondary_hasher,
            step: 1,
            capacity: 1,
        }
    }

    /// 最近一次 `prepare` 得到的步长
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Default for DoubleHashProbing {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

impl ProbingPolicy for DoubleHashProbing {
    fn kind(&self) -> ProbingKind {
        ProbingKind::DoubleHash
    }

    fn prepare<K: Hash + ?Sized>(&mut self, key: &K, capacity: usize) {
        self.capacity = capacity.max(1);
        let step = (self.secondary_hasher.hash_one(key) % self.capacity as u64) as usize;
        self.step = if step == 0 { 1 } else { step };
    }

    fn probe_offset(&self, attempt: usize) -> usize {
        ((attempt as u128 * self.step as u128) % self.capacity as u128) as usize
    }

    fn adjust_capacity(&self, requested: usize) -> Option<usize> {
        next_prime(requested)
    }
}
