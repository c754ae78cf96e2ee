#![no_std]
#![forbid(missing_docs, clippy::missing_safety_doc)]

//! Positional views over ordered sequences that can't be indexed directly.
//!
//! Plenty of ordered collections (insertion-ordered maps, linked lists,
//! anything with holes in its storage) only know how to iterate. An [`Iloc`]
//! wraps such a source and adds lookup by ordinal position or by [`Slice`],
//! without first copying the sequence into a `Vec`.
//!
//! ```
//! use iloc_view::{Iloc, Selection};
//!
//! let letters = ['a', 'b', 'c', 'd'];
//! let iloc = Iloc::walk(letters.iter());
//!
//! assert_eq!(iloc.at(3), Ok(&'d'));
//! assert_eq!(iloc.at(-1), Ok(&'d'));
//! assert!(iloc.get(0..4_i32).unwrap().step_by(2).eq(&['a', 'c']));
//!
//! match iloc.select_str("::-1").unwrap() {
//!     Selection::Many(reversed) => assert!(reversed.eq(&['d', 'c', 'b', 'a'])),
//!     Selection::One(_) => unreachable!(),
//! }
//! ```
//!
//! Without random access every lookup is a walk of the source in its natural
//! order, forwards for positive steps and backwards for negative ones. A whole
//! range is served in a single pass. Sources that can jump straight to a
//! position advertise it with [`IlocSource::RANDOM_ACCESS`].

#[cfg(test)]
extern crate alloc as std;

use core::{fmt, iter::FusedIterator};

pub use iloc_core::{resolve_index, Error, ErrorKind, Selector, Slice, SliceIndices};

mod iloc_access;
mod positions;

pub use iloc_access::{IlocAccess, IlocIndex};
pub use positions::Positions;

/// An ordered sequence that can be looked up by position
///
/// Sources are cheap handles (usually a borrow of some collection) and are
/// cloned into every lazy [`Positions`] they produce.
pub trait IlocSource: Clone {
    /// The entries of the sequence
    type Item;
    /// An iterator over every entry, in order
    type Iter: DoubleEndedIterator<Item = Self::Item> + ExactSizeIterator;

    /// If true, [`get`](IlocSource::get) doesn't need to walk the sequence
    const RANDOM_ACCESS: bool = false;

    /// Iterate over every entry in order
    fn iter(&self) -> Self::Iter;

    /// The number of entries
    fn len(&self) -> usize { self.iter().len() }

    /// Returns true if there are no entries
    fn is_empty(&self) -> bool { self.len() == 0 }

    /// The entry at `position`, or `None` if out of bounds
    ///
    /// By default this walks the first `position` entries.
    fn get(&self, position: usize) -> Option<Self::Item> { self.iter().nth(position) }
}

/// An [`IlocSource`] made from any restartable iterator
///
/// Every lookup clones the iterator and walks it, single positions from
/// whichever end is closer.
#[derive(Debug, Clone)]
pub struct Walk<I>(I);

impl<I> Walk<I> {
    /// Wrap an iterator
    pub const fn new(iter: I) -> Self { Self(iter) }

    /// Get the wrapped iterator back
    pub fn into_inner(self) -> I { self.0 }
}

impl<I: DoubleEndedIterator + ExactSizeIterator + Clone> IlocSource for Walk<I> {
    type Item = I::Item;
    type Iter = I;

    fn iter(&self) -> Self::Iter { self.0.clone() }

    fn len(&self) -> usize { self.0.len() }

    fn get(&self, position: usize) -> Option<Self::Item> {
        let len = self.0.len();
        if position >= len {
            return None
        }

        let mut iter = self.0.clone();
        if position > len / 2 {
            iter.nth_back(len - 1 - position)
        } else {
            iter.nth(position)
        }
    }
}

/// A positional view over an [`IlocSource`]
///
/// Views are meant to be made on demand for a single lookup and then thrown
/// away. They hold nothing but the source, and every lookup sees the source
/// as it is right now.
#[derive(Clone)]
pub struct Iloc<S> {
    source: S,
}

impl<I: DoubleEndedIterator + ExactSizeIterator + Clone> Iloc<Walk<I>> {
    /// Create a view that walks `iter` for every lookup
    pub fn walk(iter: I) -> Self { Self::new(Walk(iter)) }
}

impl<S> Iloc<S> {
    /// Create a view over `source`
    pub const fn new(source: S) -> Self { Self { source } }

    /// A reference to the underlying source
    pub const fn source(&self) -> &S { &self.source }

    /// Get the underlying source back
    pub fn into_source(self) -> S { self.source }
}

impl<S: IlocSource> Iloc<S> {
    /// The number of entries in the source
    pub fn len(&self) -> usize { self.source.len() }

    /// Returns true if the source has no entries
    pub fn is_empty(&self) -> bool { self.source.is_empty() }

    /// Iterate over every entry in order
    pub fn iter(&self) -> S::Iter { self.source.iter() }

    /// Look up an entry or a range of entries depending on the type of `index`.
    ///
    /// * Given an integer, returns the entry at that position. Negative
    ///   integers count from the end, and anything outside of `[-len, len)`
    ///   is an [`Error::IndexOutOfRange`].
    /// * Given a range or a [`Slice`], returns a lazy [`Positions`] over the
    ///   selected entries. Bounds clamp, and a zero step is an [`Error::ZeroStep`].
    /// * Given a [`Selector`], returns a [`Selection`] holding whichever of the
    ///   two the selector asked for.
    pub fn get<A: IlocAccess<S>>(&self, index: A) -> Result<A::Output, Error> { index.get(&self.source) }

    /// The entry at `index`, counting from the end if negative
    pub fn at(&self, index: isize) -> Result<S::Item, Error> { self.get(index) }

    /// The entries selected by `slice`
    pub fn slice<R: Into<Slice>>(&self, slice: R) -> Result<Positions<S>, Error> { self.get(slice.into()) }

    /// Look up either a single entry or a range of entries
    pub fn select<T: Into<Selector>>(&self, selector: T) -> Result<Selection<S>, Error> { self.get(selector.into()) }

    /// Parse `selector` (`"3"`, `"-1"`, `"1:3"`, `"::-1"`, ...) and look it up
    ///
    /// Text that is neither an integer nor a slice is an [`Error::InvalidSelector`].
    pub fn select_str(&self, selector: &str) -> Result<Selection<S>, Error> { self.select(selector.parse::<Selector>()?) }

    /// The position of the first entry that matches `predicate`
    pub fn position<P: FnMut(&S::Item) -> bool>(&self, mut predicate: P) -> Option<usize> {
        self.source.iter().position(|item| predicate(&item))
    }

    /// The positions of every entry that matches `predicate`, in order
    pub fn positions_where<P: FnMut(&S::Item) -> bool>(&self, predicate: P) -> PositionsWhere<S::Iter, P> {
        PositionsWhere {
            iter: self.source.iter().enumerate(),
            predicate,
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Iloc<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_tuple("Iloc").field(&self.source).finish() }
}

/// The result of looking up a [`Selector`]
pub enum Selection<S: IlocSource> {
    /// The selector was a single position
    One(S::Item),
    /// The selector was a slice
    Many(Positions<S>),
}

impl<S: IlocSource> Selection<S> {
    /// Returns true if this is a single entry
    pub fn is_one(&self) -> bool { matches!(self, Self::One(_)) }

    /// The single entry, if the selector was a position
    pub fn one(self) -> Option<S::Item> {
        match self {
            Self::One(item) => Some(item),
            Self::Many(_) => None,
        }
    }

    /// The lazy run of entries, if the selector was a slice
    pub fn many(self) -> Option<Positions<S>> {
        match self {
            Self::One(_) => None,
            Self::Many(positions) => Some(positions),
        }
    }
}

impl<S: IlocSource> fmt::Debug for Selection<S>
where
    S::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(item) => f.debug_tuple("One").field(item).finish(),
            Self::Many(positions) => f.debug_tuple("Many").field(positions).finish(),
        }
    }
}

impl<S: IlocSource> IntoIterator for Selection<S> {
    type Item = S::Item;
    type IntoIter = SelectionIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        SelectionIter(match self {
            Self::One(item) => SelectionIterInner::One(Some(item)),
            Self::Many(positions) => SelectionIterInner::Many(positions),
        })
    }
}

/// An iterator over a [`Selection`], yielding one entry or many
pub struct SelectionIter<S: IlocSource>(SelectionIterInner<S>);

enum SelectionIterInner<S: IlocSource> {
    One(Option<S::Item>),
    Many(Positions<S>),
}

impl<S: IlocSource> Iterator for SelectionIter<S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            SelectionIterInner::One(item) => item.take(),
            SelectionIterInner::Many(positions) => positions.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.0 {
            SelectionIterInner::One(item) => {
                let len = usize::from(item.is_some());
                (len, Some(len))
            }
            SelectionIterInner::Many(positions) => positions.size_hint(),
        }
    }
}

impl<S: IlocSource> ExactSizeIterator for SelectionIter<S> {}
impl<S: IlocSource> FusedIterator for SelectionIter<S> {}

/// The positions of entries matching a predicate, see [`Iloc::positions_where`]
pub struct PositionsWhere<I, P> {
    iter: core::iter::Enumerate<I>,
    predicate: P,
}

impl<I: Iterator, P: FnMut(&I::Item) -> bool> Iterator for PositionsWhere<I, P> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let predicate = &mut self.predicate;
        self.iter
            .by_ref()
            .find_map(|(position, item)| if predicate(&item) { Some(position) } else { None })
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (0, self.iter.size_hint().1) }
}

impl<I: FusedIterator, P: FnMut(&I::Item) -> bool> FusedIterator for PositionsWhere<I, P> {}
