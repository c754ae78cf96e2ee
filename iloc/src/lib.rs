#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Positional (integer-location) lookup over insertion-ordered maps.
//!
//! This crate re-exports the whole family:
//!
//! * [`core`] has [`Slice`], [`Selector`], [`Stamp`] and the [`Error`] type
//! * [`view`] has the [`Iloc`] view over anything that can be walked in order
//! * [`map`] has [`OrderedMap`] and its position caches
//!
//! ```
//! use iloc::{ErrorKind, OrderedMap};
//!
//! let mut map = OrderedMap::new();
//! for (key, value) in [('a', "A"), ('b', "B"), ('c', "C"), ('d', "D")].iter().copied() {
//!     map.insert(key, value);
//! }
//!
//! assert_eq!(map.pair_at(3), Ok((&'d', &"D")));
//! assert!(map.pairs_in_range(Some(0), Some(4), Some(2)).unwrap().eq(vec![(&'a', &"A"), (&'c', &"C")]));
//! assert_eq!(map.key_at(4).unwrap_err().kind(), ErrorKind::Index);
//! ```

pub use iloc_core as core;
pub use iloc_map as map;
pub use iloc_view as view;

pub use iloc_core::{Error, ErrorKind, Selector, Slice, SliceIndices, Stamp};
pub use iloc_map::{CachedMap, OrderedMap, PositionCache};
#[cfg(feature = "sync")]
#[cfg_attr(docsrs, doc(cfg(feature = "sync")))]
pub use iloc_map::SharedMap;
pub use iloc_view::{Iloc, IlocSource, Positions, Selection, Walk};
