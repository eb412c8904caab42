//! Insertion-ordered object storage with hashed lookup.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::Value;

/// Entries in insertion order plus a hash index over the keys.
///
/// Keys are unique: putting an existing key overwrites its value in place.
#[derive(Clone, Default)]
pub struct Object {
    entries: Vec<(Value, Value)>,
    index: FxHashMap<u64, SmallVec<[usize; 1]>>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Object {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &Value, hash: u64) -> Option<usize> {
        self.index
            .get(&hash)?
            .iter()
            .copied()
            .find(|&i| self.entries[i].0.equals(key))
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        let i = self.position(key, key.hash_value())?;
        Some(&self.entries[i].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.position(key, key.hash_value()).is_some()
    }

    pub fn put(&mut self, key: Value, value: Value) {
        let hash = key.hash_value();
        if let Some(i) = self.position(&key, hash) {
            self.entries[i].1 = value;
            return;
        }
        self.index.entry(hash).or_default().push(self.entries.len());
        self.entries.push((key, value));
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let i = self.position(key, key.hash_value())?;
        let (_, value) = self.entries.remove(i);
        self.reindex();
        Some(value)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, (key, _)) in self.entries.iter().enumerate() {
            self.index.entry(key.hash_value()).or_default().push(i);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl FromIterator<(Value, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut object = Object::new();
        for (key, value) in iter {
            object.put(key, value);
        }
        object
    }
}
