//! 二次探测策略 - 三角数偏移配合2的幂容量
//!
//! 探测函数 `H(k, x) = h(k) + (x² + x) / 2 mod 2ⁿ`。

use crate::hash::strategy::{ProbingKind, ProbingPolicy};

/// 二次探测策略
///
/// 无状态，容量必须是2的幂。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadraticProbing;

impl QuadraticProbing {
    pub fn new() -> Self {
        Self
    }

    /// 第 `x` 个三角数 `x(x+1)/2`，按 2⁶⁴ 取模
    #[inline]
    pub fn triangular(x: usize) -> usize {
        // 先除偶数因子再乘，避免 x(x+1) 溢出后丢失最高位
        if x % 2 == 0 {
            (x / 2).wrapping_mul(x.wrapping_add(1))
        } else {
            x.wrapping_mul(x / 2 + 1)
        }
    }
}

impl ProbingPolicy for QuadraticProbing {
    fn kind(&self) -> ProbingKind {
        ProbingKind::Quadratic
    }

    #[inline]
    fn probe_offset(&self, attempt: usize) -> usize {
        Self::triangular(attempt)
    }

    fn adjust_capacity(&self, requested: usize) -> Option<usize> {
        requested.max(1).checked_next_power_of_two()
    }
}
