//! 操作统计 - 跟踪各类操作次数与探测开销

use crate::types::OperationType;
use std::{
    fmt::Write,
    sync::atomic::{AtomicU64, Ordering},
};

/// 操作统计快照
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationStatsSnapshot {
    pub insert_count: u64,
    pub get_count: u64,
    pub contains_count: u64,
    pub remove_count: u64,
    pub resize_count: u64,
    pub clear_count: u64,
    pub iterate_count: u64,
    /// 累计访问的槽位数
    pub probe_count: u64,
    /// 惰性迁移次数（条目移入更早的墓碑）
    pub relocation_count: u64,
    /// 扩容时清除的墓碑数
    pub purged_tombstones: u64,
}

impl OperationStatsSnapshot {
    /// 按操作类型取计数
    pub fn count(&self, op_type: OperationType) -> u64 {
        match op_type {
            OperationType::Insert => self.insert_count,
            OperationType::Get => self.get_count,
            OperationType::Contains => self.contains_count,
            OperationType::Remove => self.remove_count,
            OperationType::Resize => self.resize_count,
            OperationType::Clear => self.clear_count,
            OperationType::Iterate => self.iterate_count,
        }
    }

    /// 带键操作的平均探测长度
    pub fn average_probe_length(&self) -> f64 {
        let keyed = self.insert_count + self.get_count + self.contains_count + self.remove_count;
        if keyed == 0 {
            0.0
        } else {
            self.probe_count as f64 / keyed as f64
        }
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self, prefix: &str) -> String {
        let mut output = String::new();
        for op in OperationType::ALL {
            let _ = writeln!(
                output,
                "{}_operation_{}_count {}",
                prefix,
                op.as_str(),
                self.count(op)
            );
        }
        let _ = writeln!(output, "{}_probe_count {}", prefix, self.probe_count);
        let _ = writeln!(output, "{}_relocation_count {}", prefix, self.relocation_count);
        let _ = writeln!(output, "{}_purged_tombstones {}", prefix, self.purged_tombstones);
        output
    }
}

/// 原子操作统计
///
/// 计数使用 `Relaxed` 原子量，以便只读操作（迭代）也能记录。
#[derive(Debug, Default)]
pub struct OperationStats {
    counts: [AtomicU64; OperationType::ALL.len()],
    probe_count: AtomicU64,
    relocation_count: AtomicU64,
    purged_tombstones: AtomicU64,
}

impl OperationStats {
    /// 创建新统计
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次操作
    pub fn record(&self, op_type: OperationType) {
        self.counts[op_type.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// 记录探测的槽位数
    pub fn record_probes(&self, probes: usize) {
        self.probe_count.fetch_add(probes as u64, Ordering::Relaxed);
    }

    /// 记录一次惰性迁移
    pub fn record_relocation(&self) {
        self.relocation_count.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录扩容清除的墓碑
    pub fn record_purge(&self, tombstones: usize) {
        self.purged_tombstones
            .fetch_add(tombstones as u64, Ordering::Relaxed);
    }

    /// 获取统计快照
    pub fn snapshot(&self) -> OperationStatsSnapshot {
        let count = |op: OperationType| self.counts[op.index()].load(Ordering::Relaxed);
        OperationStatsSnapshot {
            insert_count: count(OperationType::Insert),
            get_count: count(OperationType::Get),
            contains_count: count(OperationType::Contains),
            remove_count: count(OperationType::Remove),
            resize_count: count(OperationType::Resize),
            clear_count: count(OperationType::Clear),
            iterate_count: count(OperationType::Iterate),
            probe_count: self.probe_count.load(Ordering::Relaxed),
            relocation_count: self.relocation_count.load(Ordering::Relaxed),
            purged_tombstones: self.purged_tombstones.load(Ordering::Relaxed),
        }
    }

    /// 重置统计
    pub fn reset(&self) {
        for counter in &self.counts {
            counter.store(0, Ordering::Relaxed);
        }
        self.probe_count.store(0, Ordering::Relaxed);
        self.relocation_count.store(0, Ordering::Relaxed);
        self.purged_tombstones.store(0, Ordering::Relaxed);
    }
}

impl Clone for OperationStats {
    fn clone(&self) -> Self {
        let snapshot = self.snapshot();
        let stats = Self::new();
        for op in OperationType::ALL {
            stats.counts[op.index()].store(snapshot.count(op), Ordering::Relaxed);
        }
        stats.probe_count.store(snapshot.probe_count, Ordering::Relaxed);
        stats
            .relocation_count
            .store(snapshot.relocation_count, Ordering::Relaxed);
        stats
            .purged_tombstones
            .store(snapshot.purged_tombstones, Ordering::Relaxed);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_snapshot() {
        let stats = OperationStats::new();
        stats.record(OperationType::Insert);
        stats.record(OperationType::Insert);
        stats.record(OperationType::Get);
        stats.record_probes(6);
        stats.record_relocation();
        stats.record_purge(3);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.insert_count, 2);
        assert_eq!(snapshot.get_count, 1);
        assert_eq!(snapshot.count(OperationType::Remove), 0);
        assert_eq!(snapshot.probe_count, 6);
        assert_eq!(snapshot.relocation_count, 1);
        assert_eq!(snapshot.purged_tombstones, 3);
        assert!((snapshot.average_probe_length() - 2.0).abs() < f64::EPSILON);

        let cloned = stats.clone();
        assert_eq!(cloned.snapshot(), snapshot);

        stats.reset();
        assert_eq!(stats.snapshot(), OperationStatsSnapshot::default());
    }

    #[test]
    fn test_export_prometheus() {
        let stats = OperationStats::new();
        stats.record(OperationType::Remove);
        let text = stats.snapshot().export_prometheus("probing_table");
        assert!(text.contains("probing_table_operation_remove_count 1"));
        assert!(text.contains("probing_table_operation_insert_count 0"));
        assert!(text.contains("probing_table_probe_count 0"));
    }
}
