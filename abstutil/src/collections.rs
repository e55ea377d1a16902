use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Counts how many times each key has been seen. Iteration order is deterministic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Counter<T: Ord> {
    map: BTreeMap<T, usize>,
    sum: usize,
}

impl<T: Ord> Default for Counter<T> {
    fn default() -> Counter<T> {
        Counter::new()
    }
}

impl<T: Ord> Counter<T> {
    pub fn new() -> Counter<T> {
        Counter {
            map: BTreeMap::new(),
            sum: 0,
        }
    }

    /// Returns the count after incrementing.
    pub fn inc(&mut self, val: T) -> usize {
        self.add(val, 1)
    }

    pub fn add(&mut self, val: T, amount: usize) -> usize {
        let entry = self.map.entry(val).or_insert(0);
        *entry += amount;
        self.sum += amount;
        *entry
    }

    /// Returns 0 for unknown keys.
    pub fn get(&self, val: &T) -> usize {
        self.map.get(val).cloned().unwrap_or(0)
    }

    pub fn sum(&self) -> usize {
        self.sum
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn borrow(&self) -> &BTreeMap<T, usize> {
        &self.map
    }
}

impl<T: Ord> Extend<T> for Counter<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for val in iter {
            self.inc(val);
        }
    }
}

/// A map from a key to a set of values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiMap<K: Ord, V: Ord> {
    map: BTreeMap<K, BTreeSet<V>>,
    #[serde(skip)]
    empty: BTreeSet<V>,
}

impl<K: Ord, V: Ord> Default for MultiMap<K, V> {
    fn default() -> MultiMap<K, V> {
        MultiMap::new()
    }
}

impl<K: Ord, V: Ord> MultiMap<K, V> {
    pub fn new() -> MultiMap<K, V> {
        MultiMap {
            map: BTreeMap::new(),
            empty: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.map.entry(key).or_insert_with(BTreeSet::new).insert(value);
    }

    pub fn remove(&mut self, key: K, value: V) {
        if !self.map.contains_key(&key) {
            return;
        }
        self.map.get_mut(&key).unwrap().remove(&value);
        if self.map[&key].is_empty() {
            self.map.remove(&key);
        }
    }

    pub fn get(&self, key: K) -> &BTreeSet<V> {
        self.map.get(&key).unwrap_or(&self.empty)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn borrow(&self) -> &BTreeMap<K, BTreeSet<V>> {
        &self.map
    }
}
