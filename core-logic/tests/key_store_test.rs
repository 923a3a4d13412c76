use core_logic::{reorder_by_index, ConfigError, KeyStore, WalletError};
use std::io::Write;
use tempfile::NamedTempFile;

fn key_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = key_file("0x01\n0x02\n0x03\n\n");
    let store = KeyStore::load(file.path().to_str().unwrap()).unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(store.key_at_line(1).unwrap().expose(), "0x01");
    assert_eq!(store.key_at_line(3).unwrap().expose(), "0x03");
}

#[test]
fn test_load_missing_file() {
    assert!(matches!(
        KeyStore::load("no/such/keys.txt"),
        Err(ConfigError::FileNotFound { .. })
    ));
}

#[test]
fn test_reorder_matches_index_mapping() {
    let raw: Vec<String> = (1..=6).map(|i| format!("key{}", i)).collect();
    let orders: [&[i64]; 4] = [&[1, 2, 3], &[6, 5, 4, 3, 2, 1], &[2, 2, 2], &[]];

    for order in orders {
        let out = reorder_by_index(&raw, order).unwrap();
        assert_eq!(out.len(), order.len());
        for (i, &idx) in order.iter().enumerate() {
            assert_eq!(out[i], raw[(idx - 1) as usize]);
        }
    }
}

#[test]
fn test_reorder_out_of_range() {
    let raw = vec!["a", "b", "c"];

    for bad in [0_i64, 4, -3, i64::MAX] {
        match reorder_by_index(&raw, &[1, bad]) {
            Err(WalletError::IndexOutOfRange {
                position,
                index,
                total,
            }) => {
                assert_eq!(position, 2);
                assert_eq!(index, bad);
                assert_eq!(total, 3);
            }
            other => panic!("Expected IndexOutOfRange for {}, got {:?}", bad, other),
        }
    }
}

#[test]
fn test_duplicate_order_reprocesses_wallet() {
    let store = KeyStore::from_lines("A\nB\nC");
    let slots = store.reorder(&[3, 3, 1]).unwrap();

    let lines: Vec<usize> = slots.iter().map(|s| s.line).collect();
    assert_eq!(lines, vec![3, 3, 1]);
    assert_eq!(slots[0].key, slots[1].key);
}
