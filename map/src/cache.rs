//! Position tables for `O(1)` positional lookup
//!
//! A position table records, for each ordinal position, which slot of an
//! [`OrderedMap`] holds that entry. It is only correct for the exact state of
//! the map it was built from, and there are two ways to keep that promise.
//!
//! * [`CachedMap`] borrows the map. While it lives the map can't change, so
//!   the table (built lazily on first use) can never go stale.
//! * [`PositionCache`] is detached. It saves the map's [`Stamp`] when it is
//!   built, and every read checks it. Reads through `&self` fail with
//!   [`Error::StaleCache`] if the map has changed since, while reads through
//!   `&mut self` rebuild the table first.
//!
//! Either way a lookup can never hand back the wrong entry.

use core::fmt;

use iloc_core::{Error, Generation, Slice, Stamp};
use iloc_view::{Iloc, IlocSource, Positions};
use once_cell::unsync::OnceCell;
use std::{boxed::Box, vec::Vec};

use crate::{Iter, Keys, OrderedMap, Values};

fn build_table<K, V, S, G: Generation>(map: &OrderedMap<K, V, S, G>, table: &mut Vec<usize>) {
    table.clear();
    table.reserve(map.len());
    table.extend(
        map.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| index),
    );
    tracing::trace!(len = table.len(), slots = map.slots.len(), "built position table");
}

/// A map together with a position table that is known to be current
///
/// This is what [`CachedMap::indexed`], [`PositionCache::indexed`] and
/// [`PositionCache::view`] hand out. It is `Copy`, and every lookup through
/// it is `O(1)`.
pub struct Indexed<'c, 'm, K, V, S, G: Generation> {
    map: &'m OrderedMap<K, V, S, G>,
    table: &'c [usize],
}

impl<K, V, S, G: Generation> Clone for Indexed<'_, '_, K, V, S, G> {
    fn clone(&self) -> Self { *self }
}

impl<K, V, S, G: Generation> Copy for Indexed<'_, '_, K, V, S, G> {}

impl<K: fmt::Debug, V: fmt::Debug, S, G: Generation> fmt::Debug for Indexed<'_, '_, K, V, S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Indexed")
            .field("map", self.map)
            .field("table", &self.table)
            .finish()
    }
}

impl<'c, 'm, K, V, S, G: Generation> Indexed<'c, 'm, K, V, S, G> {
    /// The map being indexed
    pub fn map(self) -> &'m OrderedMap<K, V, S, G> { self.map }

    /// The number of entries
    pub fn len(self) -> usize { self.table.len() }

    /// Returns true if there are no entries
    pub fn is_empty(self) -> bool { self.table.is_empty() }

    fn entry(self, position: usize) -> Option<(&'m K, &'m V)> {
        let map = self.map;
        let slot = *self.table.get(position)?;
        let (key, value) = map.slots.get(slot)?.as_ref()?;
        Some((key, value))
    }

    /// A positional view of the keys
    pub fn keys_iloc(self) -> Iloc<IndexedKeys<'c, 'm, K, V, S, G>> { Iloc::new(IndexedKeys(self)) }

    /// A positional view of the values
    pub fn values_iloc(self) -> Iloc<IndexedValues<'c, 'm, K, V, S, G>> { Iloc::new(IndexedValues(self)) }

    /// A positional view of the entries
    pub fn items_iloc(self) -> Iloc<IndexedItems<'c, 'm, K, V, S, G>> { Iloc::new(IndexedItems(self)) }

    /// The key at `index`, see [`OrderedMap::key_at`]
    pub fn key_at(self, index: isize) -> Result<&'m K, Error> { self.keys_iloc().at(index) }

    /// The value at `index`, see [`OrderedMap::value_at`]
    pub fn value_at(self, index: isize) -> Result<&'m V, Error> { self.values_iloc().at(index) }

    /// The entry at `index`, see [`OrderedMap::pair_at`]
    pub fn pair_at(self, index: isize) -> Result<(&'m K, &'m V), Error> { self.items_iloc().at(index) }

    /// The keys selected by `start:stop:step`, see [`OrderedMap::keys_in_range`]
    pub fn keys_in_range(
        self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<Positions<IndexedKeys<'c, 'm, K, V, S, G>>, Error> {
        self.keys_iloc().slice(Slice::new(start, stop, step))
    }

    /// The values selected by `start:stop:step`, see [`OrderedMap::values_in_range`]
    pub fn values_in_range(
        self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<Positions<IndexedValues<'c, 'm, K, V, S, G>>, Error> {
        self.values_iloc().slice(Slice::new(start, stop, step))
    }

    /// The entries selected by `start:stop:step`, see [`OrderedMap::pairs_in_range`]
    pub fn pairs_in_range(
        self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<Positions<IndexedItems<'c, 'm, K, V, S, G>>, Error> {
        self.items_iloc().slice(Slice::new(start, stop, step))
    }
}

macro_rules! indexed_source {
    (
        $(#[$meta:meta])*
        $name:ident => $item:ty, $iter:ident, $method:ident, |$pair:pat| $project:expr
    ) => {
        $(#[$meta])*
        pub struct $name<'c, 'm, K, V, S, G: Generation>(Indexed<'c, 'm, K, V, S, G>);

        impl<K, V, S, G: Generation> Clone for $name<'_, '_, K, V, S, G> {
            fn clone(&self) -> Self { Self(self.0) }
        }

        impl<'c, 'm, K, V, S, G: Generation> IlocSource for $name<'c, 'm, K, V, S, G> {
            type Item = $item;
            type Iter = $iter<'m, K, V>;

            const RANDOM_ACCESS: bool = true;

            fn iter(&self) -> Self::Iter { self.0.map.$method() }

            fn len(&self) -> usize { self.0.len() }

            fn get(&self, position: usize) -> Option<Self::Item> { self.0.entry(position).map(|$pair| $project) }
        }
    };
}

indexed_source! {
    /// The keys of an [`Indexed`] map, as an [`IlocSource`]
    IndexedKeys => &'m K, Keys, keys, |(key, _)| key
}

indexed_source! {
    /// The values of an [`Indexed`] map, as an [`IlocSource`]
    IndexedValues => &'m V, Values, values, |(_, value)| value
}

indexed_source! {
    /// The entries of an [`Indexed`] map, as an [`IlocSource`]
    IndexedItems => (&'m K, &'m V), Iter, iter, |pair| pair
}

/// A borrow of an [`OrderedMap`] with a lazily built position table
///
/// Made by [`OrderedMap::cached`]. The first positional lookup builds the
/// table, and every lookup after that is `O(1)`.
///
/// ```
/// use iloc_map::OrderedMap;
///
/// let mut map = (0..100).map(|i| (i, i * i)).collect::<OrderedMap<_, _>>();
/// map.retain(|key, _| key % 3 == 0);
///
/// let cached = map.cached();
/// assert_eq!(cached.key_at(10), Ok(&30));
/// assert_eq!(cached.value_at(-1), Ok(&(99 * 99)));
/// ```
///
/// `CachedMap` is not `Sync`, the table is built through a shared reference
/// without synchronization.
pub struct CachedMap<'m, K, V, S, G: Generation> {
    map: &'m OrderedMap<K, V, S, G>,
    table: OnceCell<Box<[usize]>>,
}

impl<K, V, S, G: Generation> OrderedMap<K, V, S, G> {
    /// Borrow this map for repeated positional lookups
    pub fn cached(&self) -> CachedMap<'_, K, V, S, G> {
        CachedMap {
            map: self,
            table: OnceCell::new(),
        }
    }
}

impl<'m, K, V, S, G: Generation> CachedMap<'m, K, V, S, G> {
    /// The borrowed map
    pub fn map(&self) -> &'m OrderedMap<K, V, S, G> { self.map }

    /// Returns true if the position table has been built
    pub fn is_built(&self) -> bool { self.table.get().is_some() }

    /// The map with its position table, building the table if needed
    pub fn indexed(&self) -> Indexed<'_, 'm, K, V, S, G> {
        let map = self.map;
        let table = self.table.get_or_init(|| {
            let mut table = Vec::new();
            build_table(map, &mut table);
            table.into_boxed_slice()
        });

        Indexed { map, table }
    }

    /// A positional view of the keys
    pub fn keys_iloc(&self) -> Iloc<IndexedKeys<'_, 'm, K, V, S, G>> { self.indexed().keys_iloc() }

    /// A positional view of the values
    pub fn values_iloc(&self) -> Iloc<IndexedValues<'_, 'm, K, V, S, G>> { self.indexed().values_iloc() }

    /// A positional view of the entries
    pub fn items_iloc(&self) -> Iloc<IndexedItems<'_, 'm, K, V, S, G>> { self.indexed().items_iloc() }

    /// The key at `index`, see [`OrderedMap::key_at`]
    pub fn key_at(&self, index: isize) -> Result<&'m K, Error> { self.indexed().key_at(index) }

    /// The value at `index`, see [`OrderedMap::value_at`]
    pub fn value_at(&self, index: isize) -> Result<&'m V, Error> { self.indexed().value_at(index) }

    /// The entry at `index`, see [`OrderedMap::pair_at`]
    pub fn pair_at(&self, index: isize) -> Result<(&'m K, &'m V), Error> { self.indexed().pair_at(index) }

    /// The keys selected by `start:stop:step`, see [`OrderedMap::keys_in_range`]
    pub fn keys_in_range(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<Positions<IndexedKeys<'_, 'm, K, V, S, G>>, Error> {
        self.indexed().keys_in_range(start, stop, step)
    }

    /// The values selected by `start:stop:step`, see [`OrderedMap::values_in_range`]
    pub fn values_in_range(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<Positions<IndexedValues<'_, 'm, K, V, S, G>>, Error> {
        self.indexed().values_in_range(start, stop, step)
    }

    /// The entries selected by `start:stop:step`, see [`OrderedMap::pairs_in_range`]
    pub fn pairs_in_range(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<Positions<IndexedItems<'_, 'm, K, V, S, G>>, Error> {
        self.indexed().pairs_in_range(start, stop, step)
    }
}

/// A detached position table for an [`OrderedMap`]
///
/// The cache doesn't borrow the map, so the map can be mutated while the
/// cache is alive. Reads through `&self` check the map's [`Stamp`] and fail
/// with [`Error::StaleCache`] if the map has changed since the cache was
/// (re)built:
///
/// ```
/// use iloc_map::{ErrorKind, OrderedMap, PositionCache};
///
/// let mut map = "abcd".chars().map(|c| (c, c.to_ascii_uppercase())).collect::<OrderedMap<_, _>>();
/// let mut cache = PositionCache::build(&map);
/// assert_eq!(cache.key_at(&map, 1), Ok(&'b'));
///
/// map.remove(&'b');
/// assert_eq!(cache.key_at(&map, 1).unwrap_err().kind(), ErrorKind::Stale);
///
/// // reads through `view` rebuild the table instead
/// assert_eq!(cache.view(&map).key_at(1), Ok(&'c'));
/// assert_eq!(cache.key_at(&map, 1), Ok(&'c'));
/// ```
///
/// A cache is tied to the map it was built from. Reading it against any other
/// map, including a clone of the original, is always stale.
#[derive(Debug, Clone)]
pub struct PositionCache {
    stamp: Stamp,
    table: Vec<usize>,
}

impl PositionCache {
    /// Build the position table of `map`
    pub fn build<K, V, S, G: Generation>(map: &OrderedMap<K, V, S, G>) -> Self {
        let mut table = Vec::new();
        build_table(map, &mut table);
        Self {
            stamp: map.stamp(),
            table,
        }
    }

    /// The stamp of the map state this cache describes
    pub fn stamp(&self) -> Stamp { self.stamp }

    /// Returns true if this cache describes the current state of `map`
    pub fn is_current<K, V, S, G: Generation>(&self, map: &OrderedMap<K, V, S, G>) -> bool {
        map.clock.is_current(self.stamp)
    }

    /// Rebuild the table if `map` has changed, returns true if it was rebuilt
    pub fn refresh<K, V, S, G: Generation>(&mut self, map: &OrderedMap<K, V, S, G>) -> bool {
        if self.is_current(map) {
            return false
        }

        tracing::debug!(stale = %self.stamp, current = %map.stamp(), "rebuilding position cache");
        build_table(map, &mut self.table);
        self.stamp = map.stamp();
        true
    }

    /// `map` with this cache's table
    ///
    /// Fails with [`Error::StaleCache`] if `map` has changed since the cache
    /// was built.
    pub fn indexed<'c, 'm, K, V, S, G: Generation>(
        &'c self,
        map: &'m OrderedMap<K, V, S, G>,
    ) -> Result<Indexed<'c, 'm, K, V, S, G>, Error> {
        map.clock.validate(self.stamp)?;
        Ok(Indexed { map, table: &self.table })
    }

    /// `map` with this cache's table, rebuilding the table first if `map` has
    /// changed
    pub fn view<'c, 'm, K, V, S, G: Generation>(
        &'c mut self,
        map: &'m OrderedMap<K, V, S, G>,
    ) -> Indexed<'c, 'm, K, V, S, G> {
        self.refresh(map);
        Indexed { map, table: &self.table }
    }

    /// The key at `index` in `map`, see [`OrderedMap::key_at`]
    pub fn key_at<'m, K, V, S, G: Generation>(&self, map: &'m OrderedMap<K, V, S, G>, index: isize) -> Result<&'m K, Error> {
        self.indexed(map)?.key_at(index)
    }

    /// The value at `index` in `map`, see [`OrderedMap::value_at`]
    pub fn value_at<'m, K, V, S, G: Generation>(&self, map: &'m OrderedMap<K, V, S, G>, index: isize) -> Result<&'m V, Error> {
        self.indexed(map)?.value_at(index)
    }

    /// The entry at `index` in `map`, see [`OrderedMap::pair_at`]
    pub fn pair_at<'m, K, V, S, G: Generation>(
        &self,
        map: &'m OrderedMap<K, V, S, G>,
        index: isize,
    ) -> Result<(&'m K, &'m V), Error> {
        self.indexed(map)?.pair_at(index)
    }
}
