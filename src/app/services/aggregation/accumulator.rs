//! Concurrent key-grouped accumulation
//!
//! [`ShardedMap`] spreads its entries over a fixed number of independently
//! locked shards. A key always hashes to the same shard, so concurrent updates
//! to one key are serialized by that shard's lock while updates to keys in
//! other shards proceed in parallel.

use crate::constants::ACCUMULATOR_SHARDS;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash, RandomState};
use std::ops::AddAssign;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Associative, commutative combine used to fold values per key
pub trait Reducer<V>: Send + Sync {
    /// Value a fresh group starts from
    fn identity(&self) -> V;

    /// Fold `value` into `accumulator`
    fn combine(&self, accumulator: &mut V, value: V);
}

/// Numeric sum, starting from the type's default
///
/// Only exact for exact value types such as [`Inches`](crate::app::models::Inches).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl<V> Reducer<V> for Sum
where
    V: Default + AddAssign,
{
    fn identity(&self) -> V {
        V::default()
    }

    fn combine(&self, accumulator: &mut V, value: V) {
        *accumulator += value;
    }
}

/// Hash map sharded over independently locked segments
#[derive(Debug)]
pub struct ShardedMap<K, V> {
    shards: Vec<Mutex<HashMap<K, V>>>,
    hasher: RandomState,
}

impl<K: Hash + Eq, V> ShardedMap<K, V> {
    /// Create a map with the default shard count
    pub fn new() -> Self {
        Self::with_shards(ACCUMULATOR_SHARDS)
    }

    /// Create a map with `shards` segments (at least one)
    pub fn with_shards(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| Mutex::new(HashMap::new()))
            .collect();
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, key: &K) -> MutexGuard<'_, HashMap<K, V>> {
        let index = (self.hasher.hash_one(key) as usize) % self.shards.len();
        // A panicking writer never leaves a half-updated entry behind
        self.shards[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `update` to the entry for `key`, creating it with `init` first if absent
    ///
    /// The whole read-modify-write runs under the key's shard lock.
    pub fn update_with<I, F>(&self, key: K, init: I, update: F)
    where
        I: FnOnce() -> V,
        F: FnOnce(&mut V),
    {
        let mut shard = self.shard(&key);
        update(shard.entry(key).or_insert_with(init));
    }

    /// Fold `value` into the entry for `key` using `reducer`
    pub fn merge<R: Reducer<V> + ?Sized>(&self, key: K, value: V, reducer: &R) {
        self.update_with(key, || reducer.identity(), |acc| reducer.combine(acc, value));
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the map, collecting every shard into the target collection
    pub fn into_entries<C: FromIterator<(K, V)>>(self) -> C {
        self.shards
            .into_iter()
            .flat_map(|shard| shard.into_inner().unwrap_or_else(PoisonError::into_inner))
            .collect()
    }
}

impl<K: Hash + Eq, V> Default for ShardedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
