//! 开放寻址哈希表集成测试

use probing_hashtable::{
    batch_get, batch_insert, log_info, table_with_kind, types::ByteKey, DoubleHashProbing,
    HashAlgorithm, HashTable, LinearProbing, ProbingKind, ProbingPolicy, SlotState, TableConfig,
    TableError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use test_log::test;

const SEED: u64 = 42;
const ITEM_COUNT: usize = 20_000;
const KEY_SIZE: usize = 16;
const VALUE_SIZE: usize = 32;

/// 生成随机键值对
fn generate_items(count: usize) -> Vec<(ByteKey, Vec<u8>)> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..count)
        .map(|_| {
            let mut key = vec![0u8; KEY_SIZE];
            let mut value = vec![0u8; VALUE_SIZE];
            rng.fill(&mut key[..]);
            rng.fill(&mut value[..]);
            (ByteKey(key), value)
        })
        .collect()
}

/// 创建测试用哈希表
fn create_test_table() -> HashTable<ByteKey, Vec<u8>> {
    let config = TableConfig::new(2048, 0.75).with_hash_algorithm(HashAlgorithm::XxHash);
    HashTable::with_config(config).unwrap()
}

/// 扫描槽位核对计数与负载约束
fn assert_consistent<K, V, P>(table: &HashTable<K, V, P>)
where
    K: probing_hashtable::Key,
    P: ProbingPolicy,
{
    let mut occupied = 0;
    let mut used = 0;
    for index in 0..table.capacity() {
        match table.slot_state(index) {
            Some(SlotState::Occupied) => {
                occupied += 1;
                used += 1;
            }
            Some(SlotState::Tombstone) => used += 1,
            _ => {}
        }
    }
    assert_eq!(occupied, table.size());
    assert_eq!(used, table.used_buckets());
    assert!(table.used_buckets() <= table.threshold());
    assert!(table.policy().is_valid_capacity(table.capacity()));
}

#[test]
fn test_basic_functionality() {
    let mut table = create_test_table();

    // 插入
    let key1 = ByteKey::from("key1");
    let value1 = b"value1".to_vec();
    assert_eq!(table.insert(key1.clone(), value1.clone()).unwrap(), None);

    // 查询
    assert_eq!(table.get(&key1).unwrap(), Some(&value1));

    // 更新
    let value2 = b"value2".to_vec();
    assert_eq!(table.insert(key1.clone(), value2.clone()).unwrap(), Some(value1));
    assert_eq!(table.get(&key1).unwrap(), Some(&value2));

    // 删除
    assert_eq!(table.remove(&key1).unwrap(), Some(value2));
    assert_eq!(table.get(&key1).unwrap(), None);
    assert_eq!(table.size(), 0);
}

#[test]
fn test_high_load() {
    let items = generate_items(ITEM_COUNT);
    let mut table = create_test_table();

    for (key, value) in &items {
        assert_eq!(table.insert(key.clone(), value.clone()).unwrap(), None);
    }
    let stats = table.stats();
    log_info!(
        "occupancy {:.3}, size={} capacity={} avg_probe={:.2}",
        stats.occupancy,
        stats.size,
        stats.capacity,
        stats.operations.average_probe_length()
    );

    for (index, (key, value)) in items.iter().enumerate() {
        assert_eq!(
            table.get(key).unwrap(),
            Some(value),
            "Assertion failed at index {} for key {:?}",
            index,
            key
        );
    }

    assert_eq!(stats.size, ITEM_COUNT);
    assert!(stats.occupancy <= 0.75);
    assert_consistent(&table);
}

#[test]
fn test_growth_from_default() {
    let items = generate_items(5_000);
    let mut table = HashTable::new();
    let mut capacities = vec![table.capacity()];

    for (key, value) in &items {
        table.insert(key.clone(), value.clone()).unwrap();
        if table.capacity() != *capacities.last().unwrap() {
            capacities.push(table.capacity());
        }
    }

    // 8 → 32 → 128 → ...，每次都是 2 的幂
    assert_eq!(&capacities[..3], &[8, 32, 128]);
    assert!(capacities.iter().all(|c| c.is_power_of_two()));
    assert_eq!(table.size(), items.len());
    for (key, value) in &items {
        assert_eq!(table.get(key).unwrap(), Some(value));
    }
}

#[test]
fn test_churn_with_tombstones() {
    let items = generate_items(4_000);
    let mut table = create_test_table();
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let mut model = HashMap::new();

    for round in 0..3 {
        for (key, value) in &items {
            if rng.gen_bool(0.5) {
                assert_eq!(
                    table.insert(key.clone(), value.clone()).unwrap(),
                    model.insert(key.clone(), value.clone()),
                    "round {}",
                    round
                );
            } else {
                assert_eq!(table.remove(key).unwrap(), model.remove(key), "round {}", round);
            }
        }
        assert_consistent(&table);
    }

    assert_eq!(table.size(), model.len());
    for (key, value) in &model {
        assert_eq!(table.get(key).unwrap(), Some(value));
    }
    assert!(table.stats().operations.remove_count > 0);
}

#[test]
fn test_remove_all_then_reinsert() {
    let items = generate_items(1_000);
    let mut table = create_test_table();

    for (key, value) in &items {
        table.insert(key.clone(), value.clone()).unwrap();
    }
    for (key, value) in &items {
        assert_eq!(table.remove(key).unwrap().as_ref(), Some(value));
    }
    assert!(table.is_empty());
    assert_eq!(table.tombstones(), table.used_buckets());
    assert_eq!(table.iter().count(), 0);

    for (key, value) in &items {
        table.insert(key.clone(), value.clone()).unwrap();
    }
    assert_eq!(table.size(), items.len());
    assert_consistent(&table);
}

#[test]
fn test_explicit_resize_preserves_contents() {
    let items = generate_items(1_500);
    let mut table = create_test_table();
    for (key, value) in &items {
        table.insert(key.clone(), value.clone()).unwrap();
    }
    for (key, _) in items.iter().step_by(3) {
        table.remove(key).unwrap();
    }

    let before: HashMap<ByteKey, Vec<u8>> =
        table.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    let old_capacity = table.capacity();
    table.resize().unwrap();

    assert!(table.capacity() > old_capacity);
    assert_eq!(table.tombstones(), 0);
    let after: HashMap<ByteKey, Vec<u8>> = table.into_iter().collect();
    assert_eq!(before, after);
}

#[test]
fn test_all_policies_against_model() {
    let items = generate_items(3_000);
    for kind in [ProbingKind::Quadratic, ProbingKind::Linear, ProbingKind::DoubleHash] {
        let mut table = table_with_kind(kind, TableConfig::default()).unwrap();
        let mut model = HashMap::new();

        for (index, (key, value)) in items.iter().enumerate() {
            table.insert(key.clone(), value.clone()).unwrap();
            model.insert(key.clone(), value.clone());
            if index % 5 == 0 {
                let (gone, _) = &items[index / 2];
                assert_eq!(table.remove(gone).unwrap(), model.remove(gone), "{:?}", kind);
            }
        }

        assert_eq!(table.size(), model.len(), "{:?}", kind);
        assert_eq!(table.stats().policy, kind);
        for (key, value) in &model {
            assert_eq!(table.get(key).unwrap(), Some(value), "{:?}", kind);
        }
        assert_consistent(&table);
    }
}

#[test]
fn test_policy_capacity_rules() {
    let linear: HashTable<u32, u32, LinearProbing> =
        HashTable::with_policy(TableConfig::new(17, 0.65), LinearProbing::new()).unwrap();
    assert_eq!(linear.capacity(), 18);

    let double: HashTable<u32, u32, DoubleHashProbing> = HashTable::with_policy(
        TableConfig::new(20, 0.65),
        DoubleHashProbing::new(HashAlgorithm::AHash),
    )
    .unwrap();
    assert_eq!(double.capacity(), 23);

    let quadratic: HashTable<u32, u32> = HashTable::with_capacity(20).unwrap();
    assert_eq!(quadratic.capacity(), 32);
}

#[test]
fn test_batch_operations() {
    let items = generate_items(2_000);
    let keys: Vec<ByteKey> = items.iter().map(|(k, _)| k.clone()).collect();
    let mut table = create_test_table();

    let inserted = batch_insert(&mut table, items.iter().cloned()).unwrap();
    assert_eq!(inserted, items.len());
    // 重复插入只更新
    assert_eq!(batch_insert(&mut table, items.iter().take(10).cloned()).unwrap(), 0);

    let results = batch_get(&mut table, keys.iter()).unwrap();
    assert!(results.iter().zip(&items).all(|(found, (_, v))| found.as_ref() == Some(v)));

    for key in &keys {
        assert!(table.remove(key).unwrap().is_some());
    }
    assert_eq!(table.stats().size, 0);
}

#[test]
fn test_error_handling() {
    assert!(matches!(
        HashTable::<ByteKey, u8>::with_capacity(0),
        Err(TableError::InvalidArgument { .. })
    ));
    let err = HashTable::<ByteKey, u8>::with_capacity_and_load_factor(16, f64::NAN).unwrap_err();
    assert!(err.is_caller_error());
    assert!(!err.is_fatal());
    assert!(err.recovery_suggestion().is_some());
    assert!(err.to_string().contains("负载因子"));

    let mut table: HashTable<Option<ByteKey>, u8> = HashTable::new();
    assert!(table.insert(None, 1).is_err());
    table.insert(Some(ByteKey::from("k")), 1).unwrap();
    assert_eq!(table.get(&Some(ByteKey::from("k"))).unwrap(), Some(&1));
}

#[test]
fn test_stats_and_monitoring() {
    let items = generate_items(1_000);
    let mut table = create_test_table();

    for (key, value) in &items {
        table.insert(key.clone(), value.clone()).unwrap();
    }
    let stats = table.stats();
    assert_eq!(stats.size, items.len());
    assert_eq!(stats.operations.insert_count, items.len() as u64);
    assert_eq!(stats.operations.get_count, 0);

    for (key, _) in &items {
        table.get(key).unwrap();
    }
    let stats = table.stats();
    assert_eq!(stats.operations.get_count, items.len() as u64);
    assert!(stats.operations.average_probe_length() >= 1.0);

    let metrics = table.export_prometheus();
    assert!(metrics.contains("probing_table_operation_insert_count 1000"));
    assert!(metrics.contains("probing_table_size 1000"));
}
