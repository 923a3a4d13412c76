use crate::error::{ConfigError, WalletError};
use std::fmt;
use std::fs;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw private key text, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey").field(&"***REDACTED***").finish()
    }
}

/// A key picked by the processing order, tagged with its key file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSlot {
    /// 1-based line number in the key file.
    pub line: usize,
    pub key: PrivateKey,
}

/// Keys in file line order.
pub struct KeyStore {
    keys: Vec<PrivateKey>,
}

impl KeyStore {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::from_io(path, &e))?;
        let store = Self::from_lines(&content);
        info!("[KeyStore] Loaded {} keys from {}", store.len(), path);
        Ok(store)
    }

    /// Splits on newlines and trims each entry. Trailing blank lines are
    /// dropped; blank lines in the middle are kept so numbering matches the file.
    pub fn from_lines(content: &str) -> Self {
        let mut keys: Vec<PrivateKey> = content
            .split('\n')
            .map(|line| PrivateKey::new(line.trim()))
            .collect();

        while keys.last().is_some_and(PrivateKey::is_blank) {
            keys.pop();
        }

        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[PrivateKey] {
        &self.keys
    }

    /// Key on a 1-based line, if present.
    pub fn key_at_line(&self, line: usize) -> Option<&PrivateKey> {
        line.checked_sub(1).and_then(|idx| self.keys.get(idx))
    }

    /// Builds the processing sequence from 1-based line numbers.
    pub fn reorder(&self, order: &[i64]) -> Result<Vec<WalletSlot>, WalletError> {
        let lines = resolve_order(order, self.keys.len())?;
        Ok(lines
            .into_iter()
            .map(|line| WalletSlot {
                line,
                key: self.keys[line - 1].clone(),
            })
            .collect())
    }
}

/// Generic form of [`KeyStore::reorder`]: `result[i] == items[order[i] - 1]`.
pub fn reorder_by_index<T: Clone>(items: &[T], order: &[i64]) -> Result<Vec<T>, WalletError> {
    let lines = resolve_order(order, items.len())?;
    Ok(lines.into_iter().map(|line| items[line - 1].clone()).collect())
}

fn resolve_order(order: &[i64], total: usize) -> Result<Vec<usize>, WalletError> {
    order
        .iter()
        .enumerate()
        .map(|(pos, &index)| {
            usize::try_from(index)
                .ok()
                .filter(|line| (1..=total).contains(line))
                .ok_or(WalletError::IndexOutOfRange {
                    position: pos + 1,
                    index,
                    total,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lines_trims_and_drops_trailing_blanks() {
        let store = KeyStore::from_lines("  0xaa \r\n0xbb\n\n\n");
        assert_eq!(store.len(), 2);
        assert_eq!(store.keys()[0].expose(), "0xaa");
        assert_eq!(store.keys()[1].expose(), "0xbb");
    }

    #[test]
    fn test_interior_blank_line_keeps_numbering() {
        let store = KeyStore::from_lines("A\n\nC");
        assert_eq!(store.len(), 3);
        assert!(store.key_at_line(2).is_some_and(PrivateKey::is_blank));
        assert_eq!(store.key_at_line(3).map(PrivateKey::expose), Some("C"));
        assert!(store.key_at_line(0).is_none());
        assert!(store.key_at_line(4).is_none());
    }

    #[test]
    fn test_reorder_tags_original_lines() {
        let store = KeyStore::from_lines("A\nB");
        let slots = store.reorder(&[2, 1]).unwrap();

        assert_eq!(slots.len(), 2);
        assert_eq!((slots[0].line, slots[0].key.expose()), (2, "B"));
        assert_eq!((slots[1].line, slots[1].key.expose()), (1, "A"));
    }

    #[test]
    fn test_reorder_rejects_zero_and_negative() {
        let store = KeyStore::from_lines("A\nB");
        assert!(matches!(
            store.reorder(&[1, 0]),
            Err(WalletError::IndexOutOfRange {
                position: 2,
                index: 0,
                total: 2
            })
        ));
        assert!(store.reorder(&[-1]).is_err());
    }

    #[test]
    fn test_private_key_debug_is_redacted() {
        let key = PrivateKey::new("0xdeadbeef");
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("deadbeef"));
        assert!(rendered.contains("REDACTED"));
    }
}
