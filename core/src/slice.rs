use core::{
    convert::{TryFrom, TryInto},
    fmt,
    iter::FusedIterator,
    ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive},
};

use crate::Error;

/// A `(start, stop, step)` range descriptor
///
/// `start` is inclusive and `stop` is exclusive. Missing bounds default to the
/// natural ends of the sequence (which ends depends on the sign of `step`),
/// negative bounds count from the end, and bounds past either end clamp
/// instead of failing. A missing `step` means `1`, and a zero `step` is
/// rejected by [`Slice::indices`].
///
/// ```
/// use iloc_core::Slice;
///
/// let every_other = Slice::new(Some(0), Some(4), Some(2));
/// assert!(every_other.indices(4).unwrap().eq([0, 2]));
///
/// let reversed = Slice::FULL.step_by(-1);
/// assert!(reversed.indices(3).unwrap().eq([2, 1, 0]));
///
/// assert!(Slice::range(-2, 100).indices(4).unwrap().eq([2, 3]));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slice {
    /// The first position, inclusive
    pub start: Option<isize>,
    /// The end position, exclusive
    pub stop: Option<isize>,
    /// The distance between selected positions
    pub step: Option<isize>,
}

impl Slice {
    /// The slice that selects everything, `[::]`
    pub const FULL: Self = Self::new(None, None, None);

    /// Create a new slice
    pub const fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self { Self { start, stop, step } }

    /// Create a slice over `[start, stop)` with a step of one
    pub const fn range(start: isize, stop: isize) -> Self { Self::new(Some(start), Some(stop), None) }

    /// Create a slice that selects just `index`, i.e. `[index, index + 1)`
    ///
    /// Unlike `Slice::range(index, index + 1)`, this also does the right
    /// thing for `-1`. Out of range indices select nothing.
    pub fn single(index: isize) -> Self {
        match index {
            -1 => Self::new(Some(-1), None, None),
            _ => Self::new(Some(index), index.checked_add(1), None),
        }
    }

    /// Replace the step of this slice
    pub const fn step_by(self, step: isize) -> Self { Self::new(self.start, self.stop, Some(step)) }

    /// Resolve this slice against a sequence of `len` entries
    ///
    /// Fails with [`Error::ZeroStep`] if the step is zero.
    pub fn indices(&self, len: usize) -> Result<SliceIndices, Error> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(Error::ZeroStep)
        }

        let len = isize::try_from(len).unwrap_or(isize::MAX);
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
        let (default_start, default_stop) = if step < 0 { (upper, lower) } else { (lower, upper) };

        let clamp = |bound: Option<isize>, default: isize| match bound {
            None => default,
            Some(bound) if bound < 0 => (bound + len).max(lower),
            Some(bound) => bound.min(upper),
        };

        let start = clamp(self.start, default_start);
        let stop = clamp(self.stop, default_stop);

        let stride = step.unsigned_abs();
        let span = if step < 0 { start - stop } else { stop - start };
        let remaining = if span > 0 { (span as usize - 1) / stride + 1 } else { 0 };

        Ok(SliceIndices {
            next: start,
            step,
            remaining,
        })
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        f.write_str(":")?;
        if let Some(stop) = self.stop {
            write!(f, "{}", stop)?;
        }
        if let Some(step) = self.step {
            write!(f, ":{}", step)?;
        }
        Ok(())
    }
}

/// Resolve a possibly negative `index` against a sequence of `len` entries
///
/// Negative indices count from the end, so `-1` is the last position. Fails
/// with [`Error::IndexOutOfRange`] outside of `[-len, len)`.
pub fn resolve_index(index: isize, len: usize) -> Result<usize, Error> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        Some(index as usize).filter(|&index| index < len)
    };

    resolved.ok_or_else(|| Error::out_of_range(index, len))
}

/// The positions selected by a [`Slice`], see [`Slice::indices`]
///
/// Positions come out in selection order, so they descend when the step is
/// negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceIndices {
    next: isize,
    step: isize,
    remaining: usize,
}

impl SliceIndices {
    /// The step these positions advance by
    pub const fn step(&self) -> isize { self.step }

    /// Returns true if positions are produced in descending order
    pub const fn is_reversed(&self) -> bool { self.step < 0 }
}

impl Iterator for SliceIndices {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None
        }

        let position = self.next as usize;
        self.remaining -= 1;
        self.next = self.next.wrapping_add(self.step);
        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl DoubleEndedIterator for SliceIndices {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None
        }

        self.remaining -= 1;
        Some((self.next + self.remaining as isize * self.step) as usize)
    }
}

impl ExactSizeIterator for SliceIndices {}
impl FusedIterator for SliceIndices {}

fn saturate<T: TryInto<isize>>(value: T, saturated: isize) -> isize { value.try_into().unwrap_or(saturated) }

macro_rules! from_ranges {
    ($($int:ty),* $(,)?) => {$(
        impl From<Range<$int>> for Slice {
            fn from(range: Range<$int>) -> Self {
                Self::new(Some(saturate(range.start, isize::MAX)), Some(saturate(range.end, isize::MAX)), None)
            }
        }

        impl From<RangeFrom<$int>> for Slice {
            fn from(range: RangeFrom<$int>) -> Self { Self::new(Some(saturate(range.start, isize::MAX)), None, None) }
        }

        impl From<RangeTo<$int>> for Slice {
            fn from(range: RangeTo<$int>) -> Self { Self::new(None, Some(saturate(range.end, isize::MAX)), None) }
        }

        impl From<RangeInclusive<$int>> for Slice {
            fn from(range: RangeInclusive<$int>) -> Self {
                let (start, end) = range.into_inner();
                Self::new(Some(saturate(start, isize::MAX)), inclusive_stop(saturate(end, isize::MAX)), None)
            }
        }

        impl From<RangeToInclusive<$int>> for Slice {
            fn from(range: RangeToInclusive<$int>) -> Self {
                Self::new(None, inclusive_stop(saturate(range.end, isize::MAX)), None)
            }
        }
    )*};
}

// `..=-1` runs through the last entry, which `-1 + 1 == 0` would get wrong
fn inclusive_stop(end: isize) -> Option<isize> {
    match end {
        -1 => None,
        _ => end.checked_add(1),
    }
}

from_ranges!(isize, i32, i64, usize, u32);

impl From<RangeFull> for Slice {
    fn from(RangeFull: RangeFull) -> Self { Self::FULL }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::vec::Vec;

    fn collect(slice: Slice, len: usize) -> Vec<usize> { slice.indices(len).unwrap().collect() }

    #[test]
    fn defaults() {
        assert_eq!(collect(Slice::FULL, 4), [0, 1, 2, 3]);
        assert_eq!(collect(Slice::FULL.step_by(-1), 4), [3, 2, 1, 0]);
        assert_eq!(collect(Slice::FULL, 0), [0usize; 0]);
        assert_eq!(collect(Slice::FULL.step_by(-1), 0), [0usize; 0]);
    }

    #[test]
    fn zero_step() {
        assert_eq!(Slice::FULL.step_by(0).indices(4), Err(Error::ZeroStep));
        // even when nothing would be selected
        assert_eq!(Slice::FULL.step_by(0).indices(0), Err(Error::ZeroStep));
    }

    #[test]
    fn single() {
        assert_eq!(collect(Slice::single(3), 4), [3]);
        assert_eq!(collect(Slice::single(-1), 4), [3]);
        assert_eq!(collect(Slice::single(-4), 4), [0]);
        assert_eq!(collect(Slice::single(4), 4), [0usize; 0]);
        assert_eq!(collect(Slice::single(isize::MAX), 4), [0usize; 0]);
    }

    #[test]
    fn back_and_forth() {
        let mut indices = Slice::new(Some(1), None, Some(3)).indices(11).unwrap();
        assert_eq!(indices.step(), 3);
        assert!(!indices.is_reversed());
        assert_eq!(indices.len(), 4);
        assert_eq!(indices.next_back(), Some(10));
        assert_eq!(indices.next(), Some(1));
        assert_eq!(indices.next(), Some(4));
        assert_eq!(indices.next_back(), Some(7));
        assert_eq!(indices.next(), None);
        assert_eq!(indices.next_back(), None);
    }

    #[test]
    fn huge_steps() {
        assert_eq!(collect(Slice::FULL.step_by(isize::MAX), 4), [0]);
        assert_eq!(collect(Slice::FULL.step_by(isize::MIN), 4), [3]);
    }

    #[test]
    fn resolve() {
        assert_eq!(resolve_index(0, 4), Ok(0));
        assert_eq!(resolve_index(3, 4), Ok(3));
        assert_eq!(resolve_index(-1, 4), Ok(3));
        assert_eq!(resolve_index(-4, 4), Ok(0));
        assert_eq!(resolve_index(4, 4), Err(Error::IndexOutOfRange { index: 4, len: 4 }));
        assert_eq!(resolve_index(-5, 4), Err(Error::IndexOutOfRange { index: -5, len: 4 }));
        assert_eq!(resolve_index(isize::MIN, 4).unwrap_err().kind(), crate::ErrorKind::Index);
        assert!(resolve_index(0, 0).is_err());
    }

    #[test]
    fn from_ranges() {
        assert_eq!(Slice::from(1..3), Slice::range(1, 3));
        assert_eq!(Slice::from(1..=3), Slice::range(1, 4));
        assert_eq!(Slice::from(-2..=-1), Slice::new(Some(-2), None, None));
        assert_eq!(Slice::from(..=-1), Slice::FULL);
        assert_eq!(Slice::from(2usize..), Slice::new(Some(2), None, None));
        assert_eq!(Slice::from(..), Slice::FULL);
        assert_eq!(Slice::from(usize::MAX..), Slice::new(Some(isize::MAX), None, None));
    }

    #[test]
    fn display() {
        use std::string::ToString;

        assert_eq!(Slice::FULL.to_string(), ":");
        assert_eq!(Slice::new(Some(1), Some(-1), Some(2)).to_string(), "1:-1:2");
        assert_eq!(Slice::FULL.step_by(-1).to_string(), "::-1");
    }
}
