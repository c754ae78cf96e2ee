//! An [`OrderedMap`] that can be shared between threads

use core::{
    borrow::Borrow,
    fmt,
    hash::{BuildHasher, Hash},
};

use iloc_core::{DefaultGeneration, Error, Generation};
use parking_lot::{Mutex, RwLock};
use std::vec::Vec;

use crate::{DefaultHashBuilder, Indexed, OrderedMap, PositionCache};

/// An [`OrderedMap`] behind a reader-writer lock
///
/// Every method takes the lock for exactly as long as it runs, so each
/// positional read sees one consistent state of the map, and a mutation can
/// never interleave with a read. Positional reads go through a shared
/// [`PositionCache`] that is rebuilt the first time it is read after a
/// mutation.
///
/// Since the lock can't outlive a call, reads hand back clones.
pub struct SharedMap<K, V, S = DefaultHashBuilder, G: Generation = DefaultGeneration> {
    map: RwLock<OrderedMap<K, V, S, G>>,
    // always locked after `map`
    cache: Mutex<Option<PositionCache>>,
}

impl<K, V> SharedMap<K, V> {
    /// Create a new, empty map
    pub fn new() -> Self { Self::default() }
}

impl<K, V, S: Default, G: Generation> Default for SharedMap<K, V, S, G> {
    fn default() -> Self { Self::from(OrderedMap::default()) }
}

impl<K, V, S, G: Generation> From<OrderedMap<K, V, S, G>> for SharedMap<K, V, S, G> {
    fn from(map: OrderedMap<K, V, S, G>) -> Self {
        Self {
            map: RwLock::new(map),
            cache: Mutex::new(None),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S, G: Generation> fmt::Debug for SharedMap<K, V, S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_tuple("SharedMap").field(&*self.map.read()).finish() }
}

impl<K, V, S, G: Generation> SharedMap<K, V, S, G> {
    /// Get the map back
    pub fn into_inner(self) -> OrderedMap<K, V, S, G> { self.map.into_inner() }

    /// Returns the number of entries in the map
    pub fn len(&self) -> usize { self.map.read().len() }

    /// Returns true if the map has no entries
    pub fn is_empty(&self) -> bool { self.map.read().is_empty() }

    /// Run `f` with shared access to the map
    pub fn read<R, F: FnOnce(&OrderedMap<K, V, S, G>) -> R>(&self, f: F) -> R { f(&*self.map.read()) }

    /// Run `f` with exclusive access to the map
    pub fn write<R, F: FnOnce(&mut OrderedMap<K, V, S, G>) -> R>(&self, f: F) -> R { f(&mut *self.map.write()) }

    /// Run `f` with the map and an up to date position table
    pub fn read_indexed<R, F: FnOnce(Indexed<'_, '_, K, V, S, G>) -> R>(&self, f: F) -> R {
        let map = self.map.read();
        let mut cache = self.cache.lock();
        let cache = cache.get_or_insert_with(|| PositionCache::build(&*map));
        f(cache.view(&*map))
    }

    /// The key at `index`, see [`OrderedMap::key_at`]
    pub fn key_at(&self, index: isize) -> Result<K, Error>
    where
        K: Clone,
    {
        self.read_indexed(|map| map.key_at(index).map(K::clone))
    }

    /// The value at `index`, see [`OrderedMap::value_at`]
    pub fn value_at(&self, index: isize) -> Result<V, Error>
    where
        V: Clone,
    {
        self.read_indexed(|map| map.value_at(index).map(V::clone))
    }

    /// The entry at `index`, see [`OrderedMap::pair_at`]
    pub fn pair_at(&self, index: isize) -> Result<(K, V), Error>
    where
        K: Clone,
        V: Clone,
    {
        self.read_indexed(|map| map.pair_at(index).map(|(key, value)| (key.clone(), value.clone())))
    }

    /// The keys selected by `start:stop:step`, see [`OrderedMap::keys_in_range`]
    pub fn keys_in_range(&self, start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Result<Vec<K>, Error>
    where
        K: Clone,
    {
        self.read_indexed(|map| Ok(map.keys_in_range(start, stop, step)?.cloned().collect()))
    }

    /// The values selected by `start:stop:step`, see [`OrderedMap::values_in_range`]
    pub fn values_in_range(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<Vec<V>, Error>
    where
        V: Clone,
    {
        self.read_indexed(|map| Ok(map.values_in_range(start, stop, step)?.cloned().collect()))
    }

    /// The entries selected by `start:stop:step`, see [`OrderedMap::pairs_in_range`]
    pub fn pairs_in_range(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<Vec<(K, V)>, Error>
    where
        K: Clone,
        V: Clone,
    {
        self.read_indexed(|map| {
            Ok(map
                .pairs_in_range(start, stop, step)?
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect())
        })
    }
}

impl<K: Hash + Eq, V, S: BuildHasher, G: Generation> SharedMap<K, V, S, G> {
    /// Insert a key-value pair, see [`OrderedMap::insert`]
    pub fn insert(&self, key: K, value: V) -> Option<V> { self.map.write().insert(key, value) }

    /// Remove `key`, returning its value
    pub fn remove<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
    {
        self.map.write().remove(key)
    }

    /// A clone of the value for `key`
    pub fn get<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        V: Clone,
    {
        self.map.read().get(key).cloned()
    }

    /// The ordinal position of `key`
    pub fn get_index_of<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
    {
        self.map.read().get_index_of(key)
    }
}
