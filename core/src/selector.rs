use core::{
    convert::TryInto,
    fmt,
    ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive},
    str::FromStr,
};

use std::string::ToString;

use crate::{Error, Slice};

/// Either a single position or a [`Slice`]
///
/// This is what a positional lookup is keyed by when the caller doesn't know
/// (or doesn't care) which of the two forms is in play. A `Position` selects
/// one entry, a `Slice` selects a lazy run of them.
///
/// Selectors convert from any integer and any `core::ops` range, and parse
/// from the familiar textual notation:
///
/// ```
/// use iloc_core::{ErrorKind, Selector, Slice};
///
/// assert_eq!("3".parse(), Ok(Selector::Position(3)));
/// assert_eq!("-1".parse(), Ok(Selector::Position(-1)));
/// assert_eq!("1:3".parse(), Ok(Selector::Slice(Slice::range(1, 3))));
/// assert_eq!("::-1".parse(), Ok(Selector::Slice(Slice::FULL.step_by(-1))));
///
/// let err = "d".parse::<Selector>().unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Type);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// A single, possibly negative, position
    Position(isize),
    /// A range of positions
    Slice(Slice),
}

impl Selector {
    /// Returns true if this selector picks out a single position
    pub const fn is_position(&self) -> bool { matches!(self, Self::Position(_)) }

    /// View this selector as a slice
    ///
    /// A position `i` becomes [`Slice::single(i)`](Slice::single).
    pub fn to_slice(&self) -> Slice {
        match *self {
            Self::Position(index) => Slice::single(index),
            Self::Slice(slice) => slice,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(index) => write!(f, "{}", index),
            Self::Slice(slice) => fmt::Display::fmt(slice, f),
        }
    }
}

impl From<Slice> for Selector {
    fn from(slice: Slice) -> Self { Self::Slice(slice) }
}

impl From<RangeFull> for Selector {
    fn from(range: RangeFull) -> Self { Self::Slice(range.into()) }
}

macro_rules! from_ints {
    ($($int:ty),* $(,)?) => {$(
        impl From<$int> for Selector {
            fn from(index: $int) -> Self { Self::Position(index.try_into().unwrap_or(isize::MAX)) }
        }

        impl From<Range<$int>> for Selector {
            fn from(range: Range<$int>) -> Self { Self::Slice(range.into()) }
        }

        impl From<RangeFrom<$int>> for Selector {
            fn from(range: RangeFrom<$int>) -> Self { Self::Slice(range.into()) }
        }

        impl From<RangeTo<$int>> for Selector {
            fn from(range: RangeTo<$int>) -> Self { Self::Slice(range.into()) }
        }

        impl From<RangeInclusive<$int>> for Selector {
            fn from(range: RangeInclusive<$int>) -> Self { Self::Slice(range.into()) }
        }

        impl From<RangeToInclusive<$int>> for Selector {
            fn from(range: RangeToInclusive<$int>) -> Self { Self::Slice(range.into()) }
        }
    )*};
}

from_ints!(isize, i32, i64, usize, u32);

impl FromStr for Selector {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidSelector(text.to_string());
        let trimmed = text.trim();

        let bound = |part: &str| -> Result<Option<isize>, Error> {
            let part = part.trim();
            if part.is_empty() {
                Ok(None)
            } else {
                part.parse().map(Some).map_err(|_| invalid())
            }
        };

        let mut parts = trimmed.split(':');
        let first = parts.next().unwrap_or_default();

        let second = match parts.next() {
            Some(second) => second,
            None if first.is_empty() => return Err(invalid()),
            None => return bound(first)?.map(Self::Position).ok_or_else(invalid),
        };
        let third = parts.next();

        if parts.next().is_some() {
            return Err(invalid())
        }

        let step = match third {
            Some(third) => bound(third)?,
            None => None,
        };

        Ok(Self::Slice(Slice::new(bound(first)?, bound(second)?, step)))
    }
}
