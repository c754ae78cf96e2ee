//! Mutation stamps, see [`Generation`] for details
//!
//! A [`Clock`] lives inside a mutable collection and ticks on every
//! structural change. A [`Stamp`] is a copy of the clock's reading, which a
//! cache saves when it is built. The cache is only valid while the saved
//! stamp still equals the collection's current stamp.
//!
//! A stamp has two halves, an owner and a generation. The owner is drawn
//! from a process-wide counter, so two collections never share one, and a
//! stamp saved from one collection never validates against another (not
//! even against its clone). The generation counts mutations of that owner.

use core::{
    fmt,
    sync::atomic::Ordering::{Acquire, Relaxed},
};

cfg_if::cfg_if! {
    if #[cfg(target_has_atomic = "64")] {
        use core::sync::atomic::AtomicU64 as AtomicOwner;
    } else {
        use core::sync::atomic::AtomicUsize as AtomicOwner;
    }
}

static NEXT_OWNER: AtomicOwner = AtomicOwner::new(0);

#[cold]
#[inline(never)]
fn owners_exhausted() -> ! { panic!("Could not allocate more stamp owners") }

fn next_owner() -> u64 {
    let mut value = NEXT_OWNER.load(Relaxed);

    loop {
        let next = match value.checked_add(1) {
            Some(next) => next,
            None => owners_exhausted(),
        };

        if let Err(current) = NEXT_OWNER.compare_exchange_weak(value, next, Acquire, Relaxed) {
            value = current
        } else {
            return value as u64
        }
    }
}

/// The generation counting strategy
///
/// # Exhaustion
///
/// A generation can only count so far. When [`Generation::next`] returns
/// `None`, the [`Clock`] draws a brand new owner and restarts from
/// [`Generation::INIT`]. Every stamp saved before that point keeps the old
/// owner, so it can never compare equal again. For [`DefaultGeneration`] this
/// happens after about 4 billion mutations, for [`TinyGeneration`] after 255.
///
/// # ABA problem
///
/// [Wikipedia](https://en.wikipedia.org/wiki/ABA_problem)
///
/// If the generation were allowed to wrap, a cache built at generation `g`
/// would validate again after exactly `2^bits` mutations, even though the
/// positions it recorded have long since moved. Rotating the owner instead
/// of wrapping rules this out.
pub trait Generation: Copy + Eq + fmt::Debug + crate::Seal {
    /// The first generation of a fresh owner
    const INIT: Self;

    /// The generation after this one, or `None` if this generation is exhausted
    fn next(self) -> Option<Self>;

    /// The generation as a plain number
    fn get(self) -> u64;
}

/// The default generation strategy, backed by a [`u32`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefaultGeneration(u32);

/// A small generation strategy, backed by a [`u8`]
///
/// This exhausts after 255 mutations, which makes it handy for testing
/// owner rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TinyGeneration(u8);

macro_rules! generation {
    ($($name:ident($prim:ty),)*) => {$(
        impl crate::Seal for $name {}
        impl Generation for $name {
            const INIT: Self = Self(0);

            #[inline]
            fn next(self) -> Option<Self> { self.0.checked_add(1).map(Self) }

            #[inline]
            fn get(self) -> u64 { u64::from(self.0) }
        }
    )*};
}

generation! {
    DefaultGeneration(u32),
    TinyGeneration(u8),
}

/// A saved reading of a [`Clock`]
///
/// Two stamps are equal only if they were read from the same collection
/// with no structural mutation in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stamp {
    owner: u64,
    generation: u64,
}

impl Stamp {
    /// The owner of this stamp
    pub const fn owner(&self) -> u64 { self.owner }

    /// The generation of this stamp
    pub const fn generation(&self) -> u64 { self.generation }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "owner {} generation {}", self.owner, self.generation)
    }
}

/// A mutation counter owned by a single collection
///
/// `Clone` draws a new owner, because a clone evolves independently of the
/// original.
#[derive(Debug)]
pub struct Clock<G: Generation = DefaultGeneration> {
    owner: u64,
    generation: G,
}

impl<G: Generation> Default for Clock<G> {
    fn default() -> Self { Self::new() }
}

impl<G: Generation> Clone for Clock<G> {
    fn clone(&self) -> Self { Self::new() }
}

impl<G: Generation> Clock<G> {
    /// Create a clock with a fresh owner
    pub fn new() -> Self {
        Self {
            owner: next_owner(),
            generation: G::INIT,
        }
    }

    /// Read the current stamp
    #[inline]
    pub fn stamp(&self) -> Stamp {
        Stamp {
            owner: self.owner,
            generation: self.generation.get(),
        }
    }

    /// Record a structural mutation
    ///
    /// Every stamp read before this call will compare unequal to every stamp
    /// read after it.
    #[inline]
    pub fn tick(&mut self) {
        match self.generation.next() {
            Some(next) => self.generation = next,
            None => self.rotate(),
        }
    }

    #[cold]
    #[inline(never)]
    fn rotate(&mut self) {
        let old = self.owner;
        self.owner = next_owner();
        self.generation = G::INIT;
        tracing::debug!(old, new = self.owner, "generation exhausted, rotated stamp owner");
    }

    /// Check if `saved` is still the current stamp
    #[inline]
    pub fn is_current(&self, saved: Stamp) -> bool { self.stamp() == saved }

    /// Check `saved` against the current stamp, producing
    /// [`Error::StaleCache`](crate::Error::StaleCache) if they differ
    pub fn validate(&self, saved: Stamp) -> Result<(), crate::Error> {
        let current = self.stamp();
        if current == saved {
            Ok(())
        } else {
            tracing::debug!(%saved, %current, "stale positional cache");
            Err(crate::Error::StaleCache { built: saved, current })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tick_changes_stamp() {
        let mut clock = Clock::<DefaultGeneration>::new();
        let a = clock.stamp();
        assert!(clock.is_current(a));
        clock.tick();
        let b = clock.stamp();
        assert_ne!(a, b);
        assert_eq!(a.owner(), b.owner());
        assert_eq!(b.generation(), a.generation() + 1);
        assert!(clock.validate(a).is_err());
        assert!(clock.validate(b).is_ok());
    }

    #[test]
    fn clones_never_share_owners() {
        let clock = Clock::<DefaultGeneration>::new();
        let clone = clock.clone();
        assert_ne!(clock.stamp(), clone.stamp());
        assert_ne!(clock.stamp().owner(), clone.stamp().owner());
    }

    #[test]
    fn exhaustion_rotates_owner() {
        let mut clock = Clock::<TinyGeneration>::new();
        let first = clock.stamp();
        for _ in 0..255 {
            clock.tick();
        }
        assert_eq!(clock.stamp().owner(), first.owner());
        assert_eq!(clock.stamp().generation(), 255);

        clock.tick();
        let rotated = clock.stamp();
        assert_ne!(rotated.owner(), first.owner());
        assert_eq!(rotated.generation(), 0);
        // same generation number, different owner: still stale
        assert_eq!(rotated.generation(), first.generation());
        assert!(!clock.is_current(first));
    }
}
