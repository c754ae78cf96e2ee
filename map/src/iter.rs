use core::{iter::FusedIterator, slice};

use std::vec;

use crate::Slot;

// turns a slot (borrowed or owned) into the entry it holds
pub(crate) trait Entry {
    type Pair;

    fn pair(self) -> Option<Self::Pair>;
}

impl<'a, K, V> Entry for &'a Slot<K, V> {
    type Pair = (&'a K, &'a V);

    fn pair(self) -> Option<Self::Pair> { self.as_ref().map(|(key, value)| (key, value)) }
}

impl<'a, K, V> Entry for &'a mut Slot<K, V> {
    type Pair = (&'a K, &'a mut V);

    fn pair(self) -> Option<Self::Pair> { self.as_mut().map(|(key, value)| (&*key, value)) }
}

impl<K, V> Entry for Slot<K, V> {
    type Pair = (K, V);

    fn pair(self) -> Option<Self::Pair> { self }
}

/// Skips the vacated slots of an iterator over slots
///
/// `remaining` is the number of occupied slots left. When it equals the
/// number of slots left there are no holes, and `nth` can jump directly.
#[derive(Clone)]
struct Occupied<I> {
    slots: I,
    remaining: usize,
}

impl<I> Occupied<I>
where
    I: ExactSizeIterator + DoubleEndedIterator,
    I::Item: Entry,
{
    fn is_packed(&self) -> bool { self.slots.len() == self.remaining }

    fn next(&mut self) -> Option<<I::Item as Entry>::Pair> {
        let pair = self.slots.find_map(Entry::pair)?;
        self.remaining -= 1;
        Some(pair)
    }

    fn next_back(&mut self) -> Option<<I::Item as Entry>::Pair> {
        let pair = self.slots.by_ref().rev().find_map(Entry::pair)?;
        self.remaining -= 1;
        Some(pair)
    }

    fn nth(&mut self, n: usize) -> Option<<I::Item as Entry>::Pair> {
        if self.is_packed() {
            let pair = self.slots.nth(n).and_then(Entry::pair);
            self.remaining = self.slots.len();
            return pair
        }

        for _ in 0..n {
            self.next()?;
        }
        self.next()
    }

    fn nth_back(&mut self, n: usize) -> Option<<I::Item as Entry>::Pair> {
        if self.is_packed() {
            let pair = self.slots.nth_back(n).and_then(Entry::pair);
            self.remaining = self.slots.len();
            return pair
        }

        for _ in 0..n {
            self.next_back()?;
        }
        self.next_back()
    }
}

macro_rules! iterator {
    (
        $(#[$meta:meta])*
        $name:ident<$($lt:lifetime,)? K, V>($slots:ty) => $item:ty
    ) => {
        $(#[$meta])*
        pub struct $name<$($lt,)? K, V>(Occupied<$slots>);

        impl<$($lt,)? K, V> $name<$($lt,)? K, V> {
            pub(crate) fn new(slots: impl IntoIterator<IntoIter = $slots>, len: usize) -> Self {
                Self(Occupied {
                    slots: slots.into_iter(),
                    remaining: len,
                })
            }
        }

        impl<$($lt,)? K, V> Iterator for $name<$($lt,)? K, V> {
            type Item = $item;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> { self.0.next() }

            #[inline]
            fn nth(&mut self, n: usize) -> Option<Self::Item> { self.0.nth(n) }

            fn size_hint(&self) -> (usize, Option<usize>) { (self.0.remaining, Some(self.0.remaining)) }

            fn count(self) -> usize { self.0.remaining }
        }

        impl<$($lt,)? K, V> DoubleEndedIterator for $name<$($lt,)? K, V> {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> { self.0.next_back() }

            #[inline]
            fn nth_back(&mut self, n: usize) -> Option<Self::Item> { self.0.nth_back(n) }
        }

        impl<$($lt,)? K, V> ExactSizeIterator for $name<$($lt,)? K, V> {}
        impl<$($lt,)? K, V> FusedIterator for $name<$($lt,)? K, V> {}
    };
}

iterator! {
    /// Returned by [`OrderedMap::iter`](crate::OrderedMap::iter)
    Iter<'a, K, V>(slice::Iter<'a, Slot<K, V>>) => (&'a K, &'a V)
}

iterator! {
    /// Returned by [`OrderedMap::iter_mut`](crate::OrderedMap::iter_mut)
    IterMut<'a, K, V>(slice::IterMut<'a, Slot<K, V>>) => (&'a K, &'a mut V)
}

iterator! {
    /// Returned by [`OrderedMap::into_iter`](crate::OrderedMap::into_iter)
    IntoIter<K, V>(vec::IntoIter<Slot<K, V>>) => (K, V)
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

/// Returned by [`OrderedMap::keys`](crate::OrderedMap::keys)
pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);

/// Returned by [`OrderedMap::values`](crate::OrderedMap::values)
pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);

/// Returned by [`OrderedMap::values_mut`](crate::OrderedMap::values_mut)
pub struct ValuesMut<'a, K, V>(pub(crate) IterMut<'a, K, V>);

macro_rules! project {
    ($name:ident, $item:ty, |$pair:pat| $project:expr) => {
        impl<'a, K, V> Iterator for $name<'a, K, V> {
            type Item = $item;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> { self.0.next().map(|$pair| $project) }

            #[inline]
            fn nth(&mut self, n: usize) -> Option<Self::Item> { self.0.nth(n).map(|$pair| $project) }

            fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }

            fn count(self) -> usize { self.0.count() }
        }

        impl<K, V> DoubleEndedIterator for $name<'_, K, V> {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> { self.0.next_back().map(|$pair| $project) }

            #[inline]
            fn nth_back(&mut self, n: usize) -> Option<Self::Item> { self.0.nth_back(n).map(|$pair| $project) }
        }

        impl<K, V> ExactSizeIterator for $name<'_, K, V> {}
        impl<K, V> FusedIterator for $name<'_, K, V> {}
    };
}

project!(Keys, &'a K, |(key, _)| key);
project!(Values, &'a V, |(_, value)| value);
project!(ValuesMut, &'a mut V, |(_, value)| value);

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}
