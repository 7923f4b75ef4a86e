//! 槽位 - 空、墓碑、占用三态

use std::{fmt, mem};

/// 槽位状态（不含数据）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Tombstone,
    Occupied,
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotState::Empty => "Empty",
            SlotState::Tombstone => "Tombstone",
            SlotState::Occupied => "Occupied",
        };
        f.write_str(name)
    }
}

/// 单个槽位
///
/// 合法转换：`Empty → Occupied`、`Occupied → Occupied`（更新）、
/// `Occupied → Tombstone`（删除）、`Tombstone → Occupied`（复用），
/// 以及整表重置时回到 `Empty`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied { key: K, value: V },
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<K, V> Slot<K, V> {
    /// 分配 `capacity` 个空槽位
    pub fn empty_array(capacity: usize) -> Vec<Self> {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot::Empty);
        slots
    }

    pub fn occupied(key: K, value: V) -> Self {
        Slot::Occupied { key, value }
    }

    pub fn state(&self) -> SlotState {
        match self {
            Slot::Empty => SlotState::Empty,
            Slot::Tombstone => SlotState::Tombstone,
            Slot::Occupied { .. } => SlotState::Occupied,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    pub fn key(&self) -> Option<&K> {
        match self {
            Slot::Occupied { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Occupied { key, value } => Some((key, value)),
            _ => None,
        }
    }

    /// 替换占用槽位的值并返回旧值，非占用槽位不变
    pub fn replace_value(&mut self, new_value: V) -> Option<V> {
        self.value_mut()
            .map(|value| mem::replace(value, new_value))
    }

    /// 取出条目并留下墓碑，非占用槽位不变
    pub fn take_entry(&mut self) -> Option<(K, V)> {
        if !self.is_occupied() {
            return None;
        }
        match mem::replace(self, Slot::Tombstone) {
            Slot::Occupied { key, value } => Some((key, value)),
            _ => None,
        }
    }

    /// 转为条目，丢弃空槽与墓碑
    pub fn into_entry(self) -> Option<(K, V)> {
        match self {
            Slot::Occupied { key, value } => Some((key, value)),
            _ => None,
        }
    }
}
