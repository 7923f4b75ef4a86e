//! 哈希表核心模块 - 开放寻址哈希表及其组件

pub mod slot;
pub mod iter;
pub mod table;

pub use slot::{Slot, SlotState};
pub use iter::{IntoIter, Iter, Keys, Values};
pub use table::{HashTable, TableConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
