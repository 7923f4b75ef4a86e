//! 统计模块 - 哈希表状态与操作指标

pub mod operation;

use std::fmt::Write;

pub use operation::{OperationStats, OperationStatsSnapshot};

use crate::hash::ProbingKind;

/// Prometheus 指标前缀
pub const METRIC_PREFIX: &str = "probing_table";

/// 哈希表统计信息
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    pub size: usize,
    pub capacity: usize,
    pub used_buckets: usize,
    pub tombstones: usize,
    pub threshold: usize,
    /// 配置的负载因子
    pub load_factor: f64,
    /// 实际占用率 `used_buckets / capacity`
    pub occupancy: f64,
    pub policy: ProbingKind,
    pub operations: OperationStatsSnapshot,
}

impl TableStats {
    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "# policy {}", self.policy.as_str());
        let _ = writeln!(output, "{}_size {}", METRIC_PREFIX, self.size);
        let _ = writeln!(output, "{}_capacity {}", METRIC_PREFIX, self.capacity);
        let _ = writeln!(output, "{}_used_buckets {}", METRIC_PREFIX, self.used_buckets);
        let _ = writeln!(output, "{}_tombstones {}", METRIC_PREFIX, self.tombstones);
        let _ = writeln!(output, "{}_threshold {}", METRIC_PREFIX, self.threshold);
        let _ = writeln!(output, "{}_occupancy {:.4}", METRIC_PREFIX, self.occupancy);
        output.push_str(&self.operations.export_prometheus(METRIC_PREFIX));
        output
    }
}
