// src/app/keyed_cache.rs: bounded key/value store used under the image cache
use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Fixed-capacity map with oldest-inserted-first eviction.
///
/// Reads never touch the bookkeeping, so a hit does not protect an entry
/// from eviction. Re-putting an existing key swaps the value in place and
/// keeps its original insertion slot.
#[derive(Debug)]
pub struct KeyedCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> KeyedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// A capacity of zero is bumped to one; a cache that can hold nothing is
    /// never what the caller meant.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key).cloned()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn put(&mut self, key: K, value: V) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::KeyedCache;

    #[test]
    fn never_exceeds_capacity() {
        for capacity in 1..=6 {
            for extra in 1..=4 {
                let mut cache = KeyedCache::new(capacity);
                for k in 0..(capacity + extra) {
                    cache.put(k, k * 10);
                }
                assert!(cache.len() <= capacity);
                assert_eq!(cache.len(), capacity);
            }
        }
    }

    #[test]
    fn evicts_oldest_inserted_first() {
        let mut cache = KeyedCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        // a read does not refresh "a"
        assert_eq!(cache.get(&"a"), Some(1));
        cache.put("c", 3);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn replacing_a_key_keeps_its_slot() {
        let mut cache = KeyedCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("a", 10);
        assert_eq!(cache.len(), 2);
        cache.put("c", 3);
        assert!(!cache.contains(&"a"));
        assert_eq!(cache.get(&"b"), Some(2));
    }

    #[test]
    fn miss_has_no_side_effect() {
        let mut cache: KeyedCache<u32, u32> = KeyedCache::new(3);
        assert_eq!(cache.get(&7), None);
        assert!(cache.is_empty());
        cache.put(1, 1);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 3);
    }

    #[test]
    fn zero_capacity_holds_one() {
        let mut cache = KeyedCache::new(0);
        cache.put(1, "x");
        cache.put(2, "y");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), Some("y"));
    }
}
