use core::{
    convert::TryFrom,
    ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive},
};

use iloc_core::{resolve_index, Error, Selector, Slice, SliceIndices};

use crate::{IlocSource, Positions, Selection};

use seal::Seal;
#[forbid(missing_docs)]
mod seal {
    pub trait Seal: Sized {}
}

/// Something that picks out positions of a sequence: an integer, a range, a
/// [`Slice`], or a [`Selector`]
pub trait IlocIndex: Seal {
    /// The positions this index resolves to
    type Resolved;

    /// Resolve this index against a sequence of `len` entries
    fn resolve(&self, len: usize) -> Result<Self::Resolved, Error>;
}

/// An [`IlocIndex`] that can be used to look up entries of an [`IlocSource`]
pub trait IlocAccess<S: IlocSource>: IlocIndex {
    /// What the lookup produces, a single entry or a lazy run of them
    type Output;

    /// Look up this index in `source`
    fn get(&self, source: &S) -> Result<Self::Output, Error>;
}

impl<A: ?Sized + Seal> Seal for &A {}
impl<A: ?Sized + IlocIndex> IlocIndex for &A {
    type Resolved = A::Resolved;

    fn resolve(&self, len: usize) -> Result<Self::Resolved, Error> { A::resolve(self, len) }
}

impl<A: ?Sized + IlocAccess<S>, S: IlocSource> IlocAccess<S> for &A {
    type Output = A::Output;

    fn get(&self, source: &S) -> Result<Self::Output, Error> { A::get(self, source) }
}

fn item_at<S: IlocSource>(source: &S, index: isize, position: usize) -> Result<S::Item, Error> {
    // a source that reports more entries than it yields is treated as if
    // the position was never there
    source.get(position).ok_or_else(|| Error::out_of_range(index, source.len()))
}

macro_rules! signed {
    ($($int:ty),* $(,)?) => {$(
        impl Seal for $int {}
        impl IlocIndex for $int {
            type Resolved = usize;

            fn resolve(&self, len: usize) -> Result<Self::Resolved, Error> {
                match isize::try_from(*self) {
                    Ok(index) => resolve_index(index, len),
                    Err(_) => Err(Error::out_of_range(*self, len)),
                }
            }
        }

        impl<S: IlocSource> IlocAccess<S> for $int {
            type Output = S::Item;

            fn get(&self, source: &S) -> Result<Self::Output, Error> {
                let position = self.resolve(source.len())?;
                item_at(source, isize::try_from(*self).unwrap_or(isize::MAX), position)
            }
        }
    )*};
}

macro_rules! unsigned {
    ($($int:ty),* $(,)?) => {$(
        impl Seal for $int {}
        impl IlocIndex for $int {
            type Resolved = usize;

            fn resolve(&self, len: usize) -> Result<Self::Resolved, Error> {
                match usize::try_from(*self) {
                    Ok(position) if position < len => Ok(position),
                    _ => Err(Error::out_of_range(*self, len)),
                }
            }
        }

        impl<S: IlocSource> IlocAccess<S> for $int {
            type Output = S::Item;

            fn get(&self, source: &S) -> Result<Self::Output, Error> {
                let position = self.resolve(source.len())?;
                item_at(source, position as isize, position)
            }
        }
    )*};
}

signed!(isize, i32, i64);
unsigned!(usize, u32);

macro_rules! slices {
    (@ranges $($int:ty),* $(,)?) => {$(
        slices! {
            Range<$int>,
            RangeFrom<$int>,
            RangeTo<$int>,
            RangeInclusive<$int>,
            RangeToInclusive<$int>,
        }
    )*};
    ($($range:ty),* $(,)?) => {$(
        impl Seal for $range {}
        impl IlocIndex for $range {
            type Resolved = SliceIndices;

            fn resolve(&self, len: usize) -> Result<Self::Resolved, Error> { Slice::from(self.clone()).indices(len) }
        }

        impl<S: IlocSource> IlocAccess<S> for $range {
            type Output = Positions<S>;

            fn get(&self, source: &S) -> Result<Self::Output, Error> {
                let indices = self.resolve(source.len())?;
                Ok(Positions::new(source.clone(), indices))
            }
        }
    )*};
}

slices!(Slice, RangeFull);
slices!(@ranges isize, i32, i64, usize, u32);

impl Seal for Selector {}
impl IlocIndex for Selector {
    type Resolved = Result<usize, SliceIndices>;

    fn resolve(&self, len: usize) -> Result<Self::Resolved, Error> {
        match self {
            Self::Position(index) => resolve_index(*index, len).map(Ok),
            Self::Slice(slice) => slice.indices(len).map(Err),
        }
    }
}

impl<S: IlocSource> IlocAccess<S> for Selector {
    type Output = Selection<S>;

    fn get(&self, source: &S) -> Result<Self::Output, Error> {
        match *self {
            Self::Position(index) => index.get(source).map(Selection::One),
            Self::Slice(slice) => slice.get(source).map(Selection::Many),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Walk;

    #[test]
    fn integers_resolve_like_sequence_indices() {
        assert_eq!(3usize.resolve(4), Ok(3));
        assert_eq!((-1isize).resolve(4), Ok(3));
        assert_eq!((-4i32).resolve(4), Ok(0));
        assert_eq!(4u32.resolve(4), Err(Error::IndexOutOfRange { index: 4, len: 4 }));
        assert_eq!((-5i64).resolve(4), Err(Error::IndexOutOfRange { index: -5, len: 4 }));
        assert_eq!(usize::MAX.resolve(4), Err(Error::IndexOutOfRange { index: isize::MAX, len: 4 }));
    }

    #[test]
    fn ranges_clamp() {
        assert!((2_i32..100).resolve(4).unwrap().eq([2, 3]));
        assert!((..=-2_i32).resolve(4).unwrap().eq([0, 1, 2]));
        assert!(Slice::FULL.step_by(-2).resolve(4).unwrap().eq([3, 1]));
        assert!((..).resolve(3).unwrap().eq([0, 1, 2]));
    }

    #[test]
    fn selector_dispatch() {
        let source = Walk::new(['a', 'b', 'c'].iter());
        assert_eq!(Selector::Position(-1).get(&source).unwrap().one(), Some(&'c'));
        let many = Selector::from(1..).get(&source).unwrap().many().unwrap();
        assert!(many.eq(&['b', 'c']));
        assert_eq!(
            Selector::Position(3).get(&source).unwrap_err(),
            Error::IndexOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(Selector::from(Slice::FULL.step_by(0)).get(&source).unwrap_err(), Error::ZeroStep);
    }

    #[test]
    fn through_references() {
        let source = Walk::new(['a', 'b', 'c'].iter());
        let slice = Slice::range(0, 2);
        assert!((&slice).get(&source).unwrap().eq(&['a', 'b']));
        assert_eq!((&1usize).get(&source), Ok(&'b'));
    }
}
