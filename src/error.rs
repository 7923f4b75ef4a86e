//! 统一错误处理 - 哈希表可能返回的错误类型

/// 开放寻址哈希表可能发生的错误
///
/// 键不存在、表为空等情况不属于错误，由 `Option` 表达。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// 调用方违反契约：空键、非正容量、非法负载因子
    #[error("无效参数: {reason}")]
    InvalidArgument { reason: String },

    /// 扩容时容量计算溢出
    #[error("容量溢出 (当前容量: {current})")]
    CapacityOverflow { current: usize },

    /// 探测序列耗尽仍未找到空槽或匹配键，说明内部不变量已被破坏
    #[error("探测序列耗尽 (容量: {capacity}, 探测次数: {probes})")]
    ProbeExhausted { capacity: usize, probes: usize },
}

impl TableError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// 获取错误恢复建议
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { .. } => Some("检查键与构造参数"),
            Self::CapacityOverflow { .. } => Some("减少键数量或提高负载因子"),
            Self::ProbeExhausted { .. } => Some("探测策略未覆盖全部槽位，检查自定义策略的容量约束"),
        }
    }

    /// 是否为内部一致性错误（表状态不可再信任）
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ProbeExhausted { .. })
    }

    /// 是否由调用方参数引起
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// 哈希表操作结果
pub type Result<T> = std::result::Result<T, TableError>;
