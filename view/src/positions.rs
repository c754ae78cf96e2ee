use core::{fmt, iter::FusedIterator};

use iloc_core::SliceIndices;

use crate::IlocSource;

/// A lazy run of entries selected by a slice
///
/// The positions are fixed when the `Positions` is made, against the length
/// of the source at that time. The entries are fetched one at a time as the
/// iterator advances. Cloning a `Positions` before advancing it gives an
/// independent replay of the same run.
pub struct Positions<S: IlocSource> {
    source: S,
    indices: SliceIndices,
    cursor: Cursor<S::Iter>,
}

// How to get from one selected position to the next
enum Cursor<I> {
    // the source can jump straight to any position
    Direct,
    // walking forwards, `taken` entries have been consumed from the front
    Forward { iter: I, taken: usize },
    // walking backwards, `taken` entries have been consumed from the back
    Backward { iter: I, taken: usize, len: usize },
}

impl<S: IlocSource> Positions<S> {
    /// Select the entries of `source` at `indices`
    ///
    /// `indices` must have been resolved against the current length of `source`.
    pub fn new(source: S, indices: SliceIndices) -> Self {
        let cursor = if S::RANDOM_ACCESS {
            Cursor::Direct
        } else if indices.is_reversed() {
            let iter = source.iter();
            let len = iter.len();
            Cursor::Backward { iter, taken: 0, len }
        } else {
            Cursor::Forward {
                iter: source.iter(),
                taken: 0,
            }
        };

        Self {
            source,
            indices,
            cursor,
        }
    }

    /// The positions that have yet to be yielded
    pub fn indices(&self) -> &SliceIndices { &self.indices }
}

impl<S: IlocSource> Iterator for Positions<S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.indices.next()?;

        match &mut self.cursor {
            Cursor::Direct => self.source.get(position),
            Cursor::Forward { iter, taken } => {
                let item = iter.nth(position - *taken);
                *taken = position + 1;
                item
            }
            Cursor::Backward { iter, taken, len } => {
                let from_back = *len - 1 - position;
                let item = iter.nth_back(from_back - *taken);
                *taken = from_back + 1;
                item
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.indices.size_hint() }
}

impl<S: IlocSource> ExactSizeIterator for Positions<S> {}
impl<S: IlocSource> FusedIterator for Positions<S> {}

impl<S: IlocSource> Clone for Positions<S>
where
    S::Iter: Clone,
{
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            indices: self.indices.clone(),
            cursor: match &self.cursor {
                Cursor::Direct => Cursor::Direct,
                Cursor::Forward { iter, taken } => Cursor::Forward {
                    iter: iter.clone(),
                    taken: *taken,
                },
                Cursor::Backward { iter, taken, len } => Cursor::Backward {
                    iter: iter.clone(),
                    taken: *taken,
                    len: *len,
                },
            },
        }
    }
}

impl<S: IlocSource> fmt::Debug for Positions<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Positions")
            .field("indices", &self.indices)
            .field("random_access", &S::RANDOM_ACCESS)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Iloc, Slice, Walk};
    use core::cell::Cell;
    use std::vec::Vec;

    // counts how many entries get pulled out of the underlying iterator
    #[derive(Clone)]
    struct Counted<'a, I> {
        iter: I,
        pulled: &'a Cell<usize>,
    }

    impl<I: Iterator> Iterator for Counted<'_, I> {
        type Item = I::Item;

        fn next(&mut self) -> Option<Self::Item> {
            self.pulled.set(self.pulled.get() + 1);
            self.iter.next()
        }

        fn size_hint(&self) -> (usize, Option<usize>) { self.iter.size_hint() }
    }

    impl<I: DoubleEndedIterator> DoubleEndedIterator for Counted<'_, I> {
        fn next_back(&mut self) -> Option<Self::Item> {
            self.pulled.set(self.pulled.get() + 1);
            self.iter.next_back()
        }
    }

    impl<I: ExactSizeIterator> ExactSizeIterator for Counted<'_, I> {}

    #[test]
    fn single_pass_forwards() {
        let pulled = Cell::new(0);
        let data = (0..10).collect::<Vec<_>>();
        let iloc = Iloc::walk(Counted {
            iter: data.iter(),
            pulled: &pulled,
        });

        let picked = iloc.slice(Slice::new(Some(1), Some(8), Some(3))).unwrap().copied().collect::<Vec<_>>();
        assert_eq!(picked, [1, 4, 7]);
        // 0..=7 pulled once each, nothing past the last selected position
        assert_eq!(pulled.get(), 8);
    }

    #[test]
    fn single_pass_backwards() {
        let pulled = Cell::new(0);
        let data = (0..10).collect::<Vec<_>>();
        let iloc = Iloc::walk(Counted {
            iter: data.iter(),
            pulled: &pulled,
        });

        let picked = iloc.slice(Slice::new(Some(-2), None, Some(-4))).unwrap().copied().collect::<Vec<_>>();
        assert_eq!(picked, [8, 4, 0]);
        assert_eq!(pulled.get(), 10);
    }

    #[test]
    fn single_positions_walk_from_the_closer_end() {
        let pulled = Cell::new(0);
        let data = (0..10).collect::<Vec<_>>();
        let iloc = Iloc::walk(Counted {
            iter: data.iter(),
            pulled: &pulled,
        });

        assert_eq!(iloc.at(-1), Ok(&9));
        assert_eq!(pulled.get(), 1);

        pulled.set(0);
        assert_eq!(iloc.at(6), Ok(&6));
        assert_eq!(pulled.get(), 4);

        pulled.set(0);
        assert_eq!(iloc.at(2), Ok(&2));
        assert_eq!(pulled.get(), 3);

        pulled.set(0);
        assert!(iloc.at(10).is_err());
        assert_eq!(pulled.get(), 0);
    }

    #[test]
    fn replay() {
        let data = ['a', 'b', 'c', 'd'];
        let iloc = Iloc::walk(data.iter());
        let positions = iloc.slice(..).unwrap();
        let first = positions.clone().collect::<Vec<_>>();
        let second = positions.collect::<Vec<_>>();
        assert_eq!(first, second);
        assert_eq!(first, [&'a', &'b', &'c', &'d']);
    }

    #[test]
    fn exact_size() {
        let data = [0; 7];
        let iloc = Iloc::walk(data.iter());
        let mut positions = iloc.slice(Slice::FULL.step_by(3)).unwrap();
        assert_eq!(positions.len(), 3);
        positions.next();
        assert_eq!(positions.len(), 2);
        assert!(positions.indices().clone().eq([3, 6].iter().copied()));
        assert_eq!(positions.indices().step(), 3);
    }

    #[test]
    fn walk_len_is_cheap() {
        let data = [1, 2, 3];
        assert_eq!(Walk::new(data.iter()).len(), 3);
    }
}
