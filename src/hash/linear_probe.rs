//! 线性探测策略 - 固定步长，容量与步长互质

use crate::hash::{
    gcd,
    strategy::{ProbingKind, ProbingPolicy},
};

/// 线性探测策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearProbing {
    step: usize,
}

impl LinearProbing {
    /// 默认步长
    pub const LINEAR_CONSTANT: usize = 17;

    /// 创建新线性探测策略
    pub fn new() -> Self {
        Self {
            step: Self::LINEAR_CONSTANT,
        }
    }

    /// 使用指定步长创建，步长为0时退化为1
    pub fn with_step(step: usize) -> Self {
        Self { step: step.max(1) }
    }

    pub fn step(&self) -> usize {
        self.step
    }
}

impl Default for LinearProbing {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbingPolicy for LinearProbing {
    fn kind(&self) -> ProbingKind {
        ProbingKind::Linear
    }

    fn probe_offset(&self, attempt: usize) -> usize {
        self.step.wrapping_mul(attempt)
    }

    // 步长与容量互质时才能遍历全部槽位
    fn adjust_capacity(&self, requested: usize) -> Option<usize> {
        let mut capacity = requested.max(1);
        while gcd(self.step, capacity) != 1 {
            capacity = capacity.checked_add(1)?;
        }
        Some(capacity)
    }
}
