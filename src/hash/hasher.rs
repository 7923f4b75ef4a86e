//! 键哈希函数 - 按算法与种子构建确定性哈希器

use ahash::RandomState;
use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{BuildHasher, Hash, Hasher},
};

/// 哈希算法选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    AHash,
    XxHash,
    /// 标准库 SipHash
    Default,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::AHash => "ahash",
            HashAlgorithm::XxHash => "xxhash64",
            HashAlgorithm::Default => "siphash",
        }
    }
}

#[derive(Clone)]
enum HasherState {
    AHash(RandomState),
    XxHash(u64),
    Default,
}

/// 键哈希器
///
/// 同一算法、同一种子总是得到相同的哈希值（跨进程亦然），
/// 这样桶位置只由键和容量决定。
#[derive(Clone)]
pub struct KeyHasher {
    algorithm: HashAlgorithm,
    seed: u64,
    state: HasherState,
}

impl KeyHasher {
    /// 默认种子
    pub const DEFAULT_SEED: u64 = 42;

    /// 创建新哈希器
    pub fn new(algorithm: HashAlgorithm, seed: u64) -> Self {
        let state = match algorithm {
            HashAlgorithm::AHash => HasherState::AHash(RandomState::with_seeds(
                seed,
                seed ^ 0x243F_6A88_85A3_08D3,
                seed ^ 0x1319_8A2E_0370_7344,
                seed ^ 0xA409_3822_299F_31D0,
            )),
            HashAlgorithm::XxHash => HasherState::XxHash(seed),
            HashAlgorithm::Default => HasherState::Default,
        };

        Self {
            algorithm,
            seed,
            state,
        }
    }

    /// 计算键的哈希值
    pub fn hash_one<K: Hash + ?Sized>(&self, key: &K) -> u64 {
        match &self.state {
            HasherState::AHash(state) => {
                let mut hasher = state.build_hasher();
                key.hash(&mut hasher);
                hasher.finish()
            }
            HasherState::XxHash(seed) => {
                let mut hasher = twox_hash::XxHash64::with_seed(*seed);
                key.hash(&mut hasher);
                hasher.finish()
            }
            HasherState::Default => {
                // SipHash 不带种子，混入种子作为前缀
                let mut hasher = DefaultHasher::new();
                self.seed.hash(&mut hasher);
                key.hash(&mut hasher);
                hasher.finish()
            }
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for KeyHasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::default(), Self::DEFAULT_SEED)
    }
}

impl fmt::Debug for KeyHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyHasher")
            .field("algorithm", &self.algorithm)
            .field("seed", &self.seed)
            .finish()
    }
}
