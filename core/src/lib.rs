#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(missing_docs)]
#![deny(clippy::missing_safety_doc)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! The shared vocabulary of positional indexing.
//!
//! * [`Slice`] is a `(start, stop, step)` range descriptor with the usual
//!   sequence-slicing rules: negative bounds count from the end, missing
//!   bounds default to the natural ends, out-of-range bounds clamp, and a
//!   negative step walks backwards.
//! * [`Selector`] is either a single position or a [`Slice`], and can be
//!   built from any integer, any `core::ops` range, or parsed from text.
//! * [`Stamp`] identifies one state of a mutable collection, so that caches
//!   built against that state can detect that they went stale.
//! * [`Error`] is the one error type for all of the above.

#[cfg(not(feature = "std"))]
extern crate alloc as std;

mod error;
mod selector;
mod slice;
pub mod stamp;

pub use error::{Error, ErrorKind};
pub use selector::Selector;
pub use slice::{resolve_index, Slice, SliceIndices};
pub use stamp::{Clock, DefaultGeneration, Generation, Stamp, TinyGeneration};

pub(crate) use seal::Seal;
#[forbid(missing_docs)]
mod seal {
    pub trait Seal {}
}
