//! Positional lookup on [`OrderedMap`]
//!
//! Each lookup walks the occupied slots of the map. A single position is
//! reached from whichever end is closer, and a range is served in one pass
//! in the direction of its step. See [`CachedMap`](crate::CachedMap) and
//! [`PositionCache`](crate::PositionCache) for `O(1)` lookups.

use iloc_core::{Error, Generation, Slice};
use iloc_view::{Iloc, Positions, Walk};

use crate::{Iter, Keys, OrderedMap, Values};

/// The keys selected by [`OrderedMap::keys_in_range`]
pub type KeyPositions<'a, K, V> = Positions<Walk<Keys<'a, K, V>>>;
/// The values selected by [`OrderedMap::values_in_range`]
pub type ValuePositions<'a, K, V> = Positions<Walk<Values<'a, K, V>>>;
/// The entries selected by [`OrderedMap::pairs_in_range`]
pub type ItemPositions<'a, K, V> = Positions<Walk<Iter<'a, K, V>>>;

impl<K, V, S, G: Generation> OrderedMap<K, V, S, G> {
    /// A positional view of the keys
    ///
    /// ```
    /// use iloc_map::{OrderedMap, Selection};
    ///
    /// let map = "abcd".chars().map(|c| (c, c.to_ascii_uppercase())).collect::<OrderedMap<_, _>>();
    /// let keys = map.keys_iloc();
    ///
    /// assert_eq!(keys.get(-1), Ok(&'d'));
    /// assert!(keys.get(1..3_i32).unwrap().eq(&['b', 'c']));
    /// assert!(keys.select_str("::-2").unwrap().into_iter().eq(&['d', 'b']));
    /// ```
    pub fn keys_iloc(&self) -> Iloc<Walk<Keys<'_, K, V>>> { Iloc::walk(self.keys()) }

    /// A positional view of the values
    pub fn values_iloc(&self) -> Iloc<Walk<Values<'_, K, V>>> { Iloc::walk(self.values()) }

    /// A positional view of the entries
    pub fn items_iloc(&self) -> Iloc<Walk<Iter<'_, K, V>>> { Iloc::walk(self.iter()) }

    /// The key at `index`, counting from the end if negative
    ///
    /// Fails with [`Error::IndexOutOfRange`] outside of `[-len, len)`.
    pub fn key_at(&self, index: isize) -> Result<&K, Error> { self.keys_iloc().at(index) }

    /// The value at `index`, counting from the end if negative
    ///
    /// Fails with [`Error::IndexOutOfRange`] outside of `[-len, len)`.
    pub fn value_at(&self, index: isize) -> Result<&V, Error> { self.values_iloc().at(index) }

    /// The entry at `index`, counting from the end if negative
    ///
    /// Fails with [`Error::IndexOutOfRange`] outside of `[-len, len)`.
    pub fn pair_at(&self, index: isize) -> Result<(&K, &V), Error> { self.items_iloc().at(index) }

    /// The keys selected by `start:stop:step`
    ///
    /// The selection is lazy, but its positions are fixed against the
    /// current length. Fails with [`Error::ZeroStep`] if `step` is zero.
    pub fn keys_in_range(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<KeyPositions<'_, K, V>, Error> {
        self.keys_iloc().slice(Slice::new(start, stop, step))
    }

    /// The values selected by `start:stop:step`, see [`keys_in_range`](Self::keys_in_range)
    pub fn values_in_range(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<ValuePositions<'_, K, V>, Error> {
        self.values_iloc().slice(Slice::new(start, stop, step))
    }

    /// The entries selected by `start:stop:step`, see [`keys_in_range`](Self::keys_in_range)
    pub fn pairs_in_range(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<ItemPositions<'_, K, V>, Error> {
        self.items_iloc().slice(Slice::new(start, stop, step))
    }
}
