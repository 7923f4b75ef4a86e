//! 哈希模块 - 键哈希与探测策略

pub mod strategy;
pub mod hasher;
pub mod quadratic;
pub mod linear_probe;
pub mod double_hash;

pub use strategy::{AnyProbing, PolicyFactory, ProbingKind, ProbingPolicy};
pub use hasher::{HashAlgorithm, KeyHasher};
pub use quadratic::QuadraticProbing;
pub use linear_probe::LinearProbing;
pub use double_hash::DoubleHashProbing;

/// 默认探测策略
pub fn default_probing() -> QuadraticProbing {
    QuadraticProbing::new()
}

/// 哈希值映射到 `[0, capacity)`
#[inline]
pub fn calculate_bucket(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

/// 基址加偏移后的槽位索引
#[inline]
pub fn probe_index(base: usize, offset: usize, capacity: usize) -> usize {
    (base + offset % capacity) % capacity
}

/// 最大公约数
pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// 素性判定（6k±1 试除）
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5usize;
    while let Some(square) = i.checked_mul(i) {
        if square > n {
            break;
        }
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// 不小于 `n` 的最小素数，溢出时返回 `None`
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}
