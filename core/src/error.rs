use core::convert::TryInto;

use std::string::String;

/// The broad category of an [`Error`]
///
/// These mirror the ways a sequence-indexing expression can fail, plus the
/// one way a positional cache can be wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A position was outside of `[-len, len)`
    Index,
    /// A selector was neither an integer nor a slice
    Type,
    /// A selector was well formed but had an invalid value (a zero step)
    Value,
    /// A positional cache was read after the collection it was built from changed
    Stale,
}

/// Errors produced by positional lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A position was outside of `[-len, len)`
    #[error("position {index} is out of range for a collection of {len} entries")]
    IndexOutOfRange {
        /// the requested position, as given by the caller
        index: isize,
        /// the length of the collection at the time of the lookup
        len: usize,
    },
    /// A selector was neither an integer nor a slice
    #[error("`{0}` is neither an integer position nor a slice")]
    InvalidSelector(String),
    /// A slice had a step of zero
    #[error("slice step cannot be zero")]
    ZeroStep,
    /// A positional cache no longer describes the collection it is read against
    #[error("positional cache was built for {built} but the collection is now at {current}")]
    StaleCache {
        /// the stamp the cache was built at
        built: crate::Stamp,
        /// the stamp of the collection at the time of the read
        current: crate::Stamp,
    },
}

impl Error {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IndexOutOfRange { .. } => ErrorKind::Index,
            Self::InvalidSelector(_) => ErrorKind::Type,
            Self::ZeroStep => ErrorKind::Value,
            Self::StaleCache { .. } => ErrorKind::Stale,
        }
    }

    /// An [`Error::IndexOutOfRange`] for `index`, saturating positions that
    /// don't fit in an `isize`
    pub fn out_of_range<I: TryInto<isize>>(index: I, len: usize) -> Self {
        Self::IndexOutOfRange {
            index: index.try_into().unwrap_or(isize::MAX),
            len,
        }
    }
}
