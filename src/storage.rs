//! In-memory key-value storage.
//!
//! A thread-safe mapping from fixed-width keys to bounded values. At most
//! one value per key; a PUT replaces the previous value in one step, so a
//! concurrent GET sees either the old value or the new one, never a mix.
//! Nothing survives process exit: no persistence, no eviction, no TTL.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use tracing::trace;

use crate::protocol::Key;

/// Thread-safe in-memory store
pub struct Store {
    /// The actual storage
    data: RwLock<HashMap<Key, Bytes>>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            data: RwLock::new(HashMap::new()),
        })
    }

    /// Look up the value stored under a key
    pub fn get(&self, key: &Key) -> Option<Bytes> {
        let data = self.data.read().ok()?;
        data.get(key).cloned()
    }

    /// Store a value under a key, replacing any previous value
    pub fn put(&self, key: Key, value: Bytes) {
        let mut data = self.data.write().unwrap();
        data.insert(key, value);
        trace!(key = ?key.as_bytes(), "value stored");
    }

    /// Number of keys currently stored, for tests
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(bytes: &[u8]) -> Key {
        Key::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_basic_put_get() {
        let store = Store::new();

        store.put(key(b"key00001"), Bytes::from_static(b"value1"));

        let value = store.get(&key(b"key00001")).unwrap();
        assert_eq!(&value[..], b"value1");
    }

    #[test]
    fn test_get_nonexistent() {
        let store = Store::new();
        assert!(store.get(&key(b"missing1")).is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let store = Store::new();

        store.put(key(b"key00001"), Bytes::from_static(b"old"));
        store.put(key(b"key00001"), Bytes::from_static(b"new"));

        let value = store.get(&key(b"key00001")).unwrap();
        assert_eq!(&value[..], b"new");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_value() {
        let store = Store::new();

        store.put(key(b"key00001"), Bytes::new());

        let value = store.get(&key(b"key00001")).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_keys_are_distinct() {
        let store = Store::new();

        store.put(key(b"key00001"), Bytes::from_static(b"one"));
        store.put(key(b"key00002"), Bytes::from_static(b"two"));

        assert_eq!(&store.get(&key(b"key00001")).unwrap()[..], b"one");
        assert_eq!(&store.get(&key(b"key00002")).unwrap()[..], b"two");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_repeated_get_is_stable() {
        let store = Store::new();

        store.put(key(b"key00001"), Bytes::from_static(b"steady"));

        for _ in 0..10 {
            assert_eq!(&store.get(&key(b"key00001")).unwrap()[..], b"steady");
        }
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let store = Store::new();
        let mut handles = Vec::new();

        for i in 0..8u8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                let k = key(&[i; 8]);
                let v = Bytes::copy_from_slice(&[i; 32]);
                for _ in 0..100 {
                    store.put(k, v.clone());
                    let read = store.get(&k).unwrap();
                    // A reader never observes a torn value
                    assert_eq!(read, v);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 8);
    }
}
