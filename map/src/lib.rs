#![no_std]
#![forbid(missing_docs, clippy::missing_safety_doc)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! An insertion-ordered hash map with positional lookup.
//!
//! [`OrderedMap`] remembers the order its keys were first inserted in, and
//! on top of the usual keyed operations it can look entries up by their
//! ordinal position:
//!
//! ```
//! use iloc_map::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.insert('a', "A");
//! map.insert('b', "B");
//! map.insert('c', "C");
//! map.insert('d', "D");
//!
//! assert_eq!(map.key_at(3), Ok(&'d'));
//! assert_eq!(map.value_at(-1), Ok(&"D"));
//! assert!(map.keys_in_range(Some(0), Some(4), Some(2)).unwrap().eq(&['a', 'c']));
//!
//! map.remove(&'b');
//! assert_eq!(map.key_at(1), Ok(&'c'));
//! ```
//!
//! # Storage
//!
//! Entries live in a vector of slots in insertion order, and a
//! [`hashbrown::HashTable`] maps each key to its slot. Removing a key
//! vacates its slot instead of shifting everything after it, so a slot index
//! is *not* an ordinal position. Plain positional lookups walk the occupied
//! slots, which is `O(position)` once the map has holes (and `O(1)` while it
//! has none). Vacated slots are compacted away once they outnumber the live
//! entries.
//!
//! For repeated lookups, [`OrderedMap::cached`] and [`PositionCache`] build a
//! table from position to slot, making each lookup `O(1)`. Every structural
//! mutation ticks the map's [`Clock`], so a detached [`PositionCache`] can
//! always tell when it went stale.

extern crate alloc as std;

use core::{
    borrow::Borrow,
    fmt,
    hash::{BuildHasher, Hash},
    iter::FromIterator,
    mem::replace,
    ops::Index,
};

use hashbrown::{hash_table::Entry, HashTable};
use std::vec::Vec;

pub use hashbrown::DefaultHashBuilder;
pub use iloc_core::{DefaultGeneration, Error, ErrorKind, Generation, Selector, Slice, Stamp, TinyGeneration};
pub use iloc_view::{Iloc, IlocSource, Positions, Selection, Walk};

use iloc_core::Clock;

mod cache;
mod iloc;
mod iter;
#[cfg(feature = "sync")]
#[cfg_attr(docsrs, doc(cfg(feature = "sync")))]
mod sync;

pub use cache::{CachedMap, Indexed, IndexedItems, IndexedKeys, IndexedValues, PositionCache};
pub use iloc::{ItemPositions, KeyPositions, ValuePositions};
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
#[cfg(feature = "sync")]
pub use sync::SharedMap;

pub(crate) type Slot<K, V> = Option<(K, V)>;

/// An insertion-ordered hash map
///
/// See the [crate docs](crate) for an overview.
pub struct OrderedMap<K, V, S = DefaultHashBuilder, G: Generation = DefaultGeneration> {
    pub(crate) slots: Vec<Slot<K, V>>,
    table: HashTable<usize>,
    len: usize,
    hash_builder: S,
    pub(crate) clock: Clock<G>,
}

#[cold]
#[inline(never)]
fn vacant_slot_fail() -> ! { panic!("the key table pointed at a vacant slot") }

#[cold]
#[inline(never)]
fn missing_key_fail() -> ! { panic!("key not found in map") }

// the table only ever holds indices of occupied slots
#[inline]
fn occupied<K, V>(slot: &Slot<K, V>) -> &(K, V) {
    match slot {
        Some(entry) => entry,
        None => vacant_slot_fail(),
    }
}

#[inline]
fn occupied_mut<K, V>(slot: &mut Slot<K, V>) -> &mut (K, V) {
    match slot {
        Some(entry) => entry,
        None => vacant_slot_fail(),
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Create a new, empty map
    pub fn new() -> Self { Self::default() }

    /// Create a new map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self { Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default()) }
}

impl<K, V, S: Default, G: Generation> Default for OrderedMap<K, V, S, G> {
    fn default() -> Self { Self::with_hasher(S::default()) }
}

impl<K, V, S, G: Generation> OrderedMap<K, V, S, G> {
    /// Create a new, empty map which will use `hash_builder` to hash keys
    pub fn with_hasher(hash_builder: S) -> Self { Self::with_capacity_and_hasher(0, hash_builder) }

    /// Create a new map with room for `capacity` entries, which will use
    /// `hash_builder` to hash keys
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            table: HashTable::with_capacity(capacity),
            len: 0,
            hash_builder,
            clock: Clock::new(),
        }
    }

    /// The hasher used to hash keys
    pub fn hasher(&self) -> &S { &self.hash_builder }

    /// Returns the number of entries in the map
    pub fn len(&self) -> usize { self.len }

    /// Returns true if the map has no entries
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// The number of entries the map can hold without reallocating
    pub fn capacity(&self) -> usize { self.table.capacity().min(self.slots.capacity()) }

    /// The current stamp of this map
    ///
    /// The stamp changes on every structural mutation (anything that adds,
    /// removes, or moves an entry) and on nothing else. Overwriting the value
    /// of an existing key is *not* structural.
    pub fn stamp(&self) -> Stamp { self.clock.stamp() }

    /// Remove every entry, keeping the allocated memory
    pub fn clear(&mut self) {
        self.slots.clear();
        self.table.clear();
        self.len = 0;
        self.clock.tick();
    }

    /// An iterator over the entries, in insertion order
    pub fn iter(&self) -> Iter<'_, K, V> { Iter::new(&self.slots, self.len) }

    /// An iterator over the entries with mutable values, in insertion order
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> { IterMut::new(&mut self.slots, self.len) }

    /// An iterator over the keys, in insertion order
    pub fn keys(&self) -> Keys<'_, K, V> { Keys(self.iter()) }

    /// An iterator over the values, in insertion order
    pub fn values(&self) -> Values<'_, K, V> { Values(self.iter()) }

    /// An iterator over mutable values, in insertion order
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> { ValuesMut(self.iter_mut()) }

    /// The entry at `position`, or `None` if there are fewer entries
    pub fn get_index(&self, position: usize) -> Option<(&K, &V)> { self.iter().nth(position) }

    /// The first entry
    pub fn first(&self) -> Option<(&K, &V)> { self.iter().next() }

    /// The last entry
    pub fn last(&self) -> Option<(&K, &V)> { self.iter().next_back() }

    /// Keep only the entries for which `keep` returns true
    ///
    /// The surviving entries keep their relative order.
    pub fn retain<F: FnMut(&K, &mut V) -> bool>(&mut self, mut keep: F) {
        // compacts on the way out, even if `keep` panics
        let mut guard = RetainGuard {
            before: self.len,
            map: self,
        };
        let Self { slots, len, .. } = &mut *guard.map;

        for slot in slots.iter_mut() {
            if let Some((key, value)) = slot {
                if !keep(key, value) {
                    *slot = None;
                    *len -= 1;
                }
            }
        }
    }

    /// Squeeze out vacated slots and release unused memory
    ///
    /// Positions are unchanged, but this counts as a structural mutation if
    /// there was anything to squeeze out.
    pub fn shrink_to_fit(&mut self)
    where
        K: Hash,
        S: BuildHasher,
    {
        if self.slots.len() != self.len {
            self.compact();
        }
        let Self {
            slots,
            table,
            hash_builder,
            ..
        } = self;
        slots.shrink_to_fit();
        table.shrink_to_fit(|&slot| hash_builder.hash_one(&occupied(&slots[slot]).0));
    }

    // slot indices are all the table records, so compaction remaps them in
    // place without rehashing any keys
    fn compact(&mut self) {
        let Self {
            slots, table, clock, len, ..
        } = self;

        // entries dropped by `retain` are still in the table
        table.retain(|&mut slot| slots[slot].is_some());

        let mut new_index = Vec::with_capacity(slots.len());
        let mut next = 0;
        for slot in slots.iter() {
            new_index.push(next);
            next += usize::from(slot.is_some());
        }

        for slot in table.iter_mut() {
            *slot = new_index[*slot];
        }

        let vacated = slots.len() - *len;
        slots.retain(Option::is_some);
        clock.tick();
        tracing::debug!(vacated, len = *len, "compacted ordered map");
    }

    // vacate `slot` whose key has already been taken out of the table
    fn vacate(&mut self, slot: usize) -> Option<(K, V)> {
        let entry = self.slots.get_mut(slot)?.take()?;
        self.len -= 1;
        self.clock.tick();

        // trailing holes can just be dropped, nothing after them moves
        while let Some(None) = self.slots.last() {
            self.slots.pop();
        }

        if self.slots.len() - self.len > self.len {
            self.compact();
        }

        Some(entry)
    }
}

struct RetainGuard<'a, K, V, S, G: Generation> {
    map: &'a mut OrderedMap<K, V, S, G>,
    before: usize,
}

impl<K, V, S, G: Generation> Drop for RetainGuard<'_, K, V, S, G> {
    fn drop(&mut self) {
        if self.map.len != self.before {
            self.map.compact();
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher, G: Generation> OrderedMap<K, V, S, G> {
    fn find<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
    {
        if self.len == 0 {
            return None
        }

        let hash = self.hash_builder.hash_one(key);
        let slots = &self.slots;
        self.table
            .find(hash, |&slot| Borrow::<Q>::borrow(&occupied(&slots[slot]).0) == key)
            .copied()
    }

    /// Reserve room for at least `additional` more entries
    pub fn reserve(&mut self, additional: usize) {
        let Self {
            slots,
            table,
            hash_builder,
            ..
        } = self;
        table.reserve(additional, |&slot| hash_builder.hash_one(&occupied(&slots[slot]).0));
        slots.reserve(additional);
    }

    /// Insert a key-value pair
    ///
    /// If the key is new, it goes at the end of the map and `None` is
    /// returned. If the key is already present, its value is replaced in place
    /// (keeping its position) and the old value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);
        let Self {
            slots,
            table,
            hash_builder,
            len,
            clock,
        } = self;

        let entry = table.entry(
            hash,
            |&slot| occupied(&slots[slot]).0 == key,
            |&slot| hash_builder.hash_one(&occupied(&slots[slot]).0),
        );

        match entry {
            Entry::Occupied(entry) => {
                let slot = *entry.get();
                Some(replace(&mut occupied_mut(&mut slots[slot]).1, value))
            }
            Entry::Vacant(entry) => {
                entry.insert(slots.len());
                slots.push(Some((key, value)));
                *len += 1;
                clock.tick();
                None
            }
        }
    }

    /// Returns true if the map contains `key`
    pub fn contains_key<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.find(key).is_some()
    }

    /// The value for `key`
    pub fn get<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// The stored key and the value for `key`
    pub fn get_key_value<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
    {
        let (key, value) = occupied(&self.slots[self.find(key)?]);
        Some((key, value))
    }

    /// A mutable reference to the value for `key`
    pub fn get_mut<Q: ?Sized + Hash + Eq>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
    {
        let slot = self.find(key)?;
        Some(&mut occupied_mut(&mut self.slots[slot]).1)
    }

    /// The ordinal position of `key`
    ///
    /// This counts the entries before `key`, so it is `O(position)`.
    pub fn get_index_of<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
    {
        let slot = self.find(key)?;
        Some(if self.slots.len() == self.len {
            slot
        } else {
            self.slots[..slot].iter().filter(|slot| slot.is_some()).count()
        })
    }

    /// Remove `key`, returning its value
    ///
    /// The entries after `key` each move up one position.
    pub fn remove<Q: ?Sized + Hash + Eq>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Remove `key`, returning the stored key and its value
    pub fn remove_entry<Q: ?Sized + Hash + Eq>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
    {
        if self.len == 0 {
            return None
        }

        let hash = self.hash_builder.hash_one(key);
        let slots = &self.slots;
        let (slot, _) = self
            .table
            .find_entry(hash, |&slot| Borrow::<Q>::borrow(&occupied(&slots[slot]).0) == key)
            .ok()?
            .remove();

        self.vacate(slot)
    }

    /// Remove the last entry
    pub fn pop(&mut self) -> Option<(K, V)> {
        let slot = self.slots.iter().rposition(Option::is_some)?;
        let hash = self.hash_builder.hash_one(&occupied(&self.slots[slot]).0);
        self.table.find_entry(hash, |&found| found == slot).ok()?.remove();
        self.vacate(slot)
    }
}

impl<K: Clone, V: Clone, S: Clone, G: Generation> Clone for OrderedMap<K, V, S, G> {
    /// The clone gets its own stamp owner, so no cache built for `self` is
    /// ever valid for the clone
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            table: self.table.clone(),
            len: self.len,
            hash_builder: self.hash_builder.clone(),
            clock: Clock::new(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S, G: Generation> fmt::Debug for OrderedMap<K, V, S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_map().entries(self.iter()).finish() }
}

/// Maps are equal if they have the same entries in the same order
impl<K: PartialEq, V: PartialEq, S, G: Generation> PartialEq for OrderedMap<K, V, S, G> {
    fn eq(&self, other: &Self) -> bool { self.len == other.len && self.iter().eq(other.iter()) }
}

impl<K: Eq, V: Eq, S, G: Generation> Eq for OrderedMap<K, V, S, G> {}

impl<K, V, S, G: Generation, Q: ?Sized + Hash + Eq> Index<&Q> for OrderedMap<K, V, S, G>
where
    K: Hash + Eq + Borrow<Q>,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => missing_key_fail(),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher, G: Generation> Extend<(K, V)> for OrderedMap<K, V, S, G> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        iter.for_each(|(key, value)| {
            self.insert(key, value);
        });
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default, G: Generation> FromIterator<(K, V)> for OrderedMap<K, V, S, G> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S, G: Generation> IntoIterator for OrderedMap<K, V, S, G> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter { IntoIter::new(self.slots, self.len) }
}

impl<'a, K, V, S, G: Generation> IntoIterator for &'a OrderedMap<K, V, S, G> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<'a, K, V, S, G: Generation> IntoIterator for &'a mut OrderedMap<K, V, S, G> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter { self.iter_mut() }
}
