use iloc::{ErrorKind, OrderedMap, PositionCache, Selection, Selector, Slice};
use proptest::prelude::*;

fn abcd() -> OrderedMap<char, char> {
    let mut map = OrderedMap::new();
    for (key, value) in [('a', 'A'), ('b', 'B'), ('c', 'C'), ('d', 'D')].iter().copied() {
        map.insert(key, value);
    }
    map
}

#[test]
fn scalar_lookups() {
    let m = abcd();
    assert_eq!(m.key_at(3), Ok(&'d'));
    assert_eq!(m.value_at(3), Ok(&'D'));
    assert_eq!(m.pair_at(3), Ok((&'d', &'D')));
}

#[test]
fn negative_indices_count_from_the_end() {
    let m = abcd();
    assert_eq!(m.key_at(-1), Ok(&'d'));
    assert_eq!(m.value_at(-4), Ok(&'A'));
    assert_eq!(m.pair_at(-2), Ok((&'c', &'C')));
}

#[test]
fn stepped_ranges() {
    let m = abcd();
    let keys = m.keys_in_range(Some(0), Some(4), Some(2)).unwrap().copied().collect::<Vec<_>>();
    assert_eq!(keys, ['a', 'c']);

    let pairs = m
        .pairs_in_range(Some(0), Some(4), Some(2))
        .unwrap()
        .map(|(key, value)| (*key, *value))
        .collect::<Vec<_>>();
    assert_eq!(pairs, [('a', 'A'), ('c', 'C')]);
}

#[test]
fn out_of_range_is_an_index_error() {
    let m = abcd();
    for &index in &[4, -5, isize::MAX, isize::MIN] {
        assert_eq!(m.key_at(index).unwrap_err().kind(), ErrorKind::Index);
        assert_eq!(m.value_at(index).unwrap_err().kind(), ErrorKind::Index);
        assert_eq!(m.pair_at(index).unwrap_err().kind(), ErrorKind::Index);
    }
}

#[test]
fn zero_step_is_a_value_error() {
    let m = abcd();
    assert_eq!(m.keys_in_range(Some(0), Some(4), Some(0)).unwrap_err().kind(), ErrorKind::Value);
    assert_eq!(m.values_in_range(None, None, Some(0)).unwrap_err().kind(), ErrorKind::Value);
    assert_eq!(m.cached().pairs_in_range(None, None, Some(0)).unwrap_err().kind(), ErrorKind::Value);
}

#[test]
fn non_selectors_are_a_type_error() {
    let m = abcd();
    for text in &["d", "1.0", "1:2:3:4", ""] {
        assert_eq!(m.keys_iloc().select_str(text).unwrap_err().kind(), ErrorKind::Type);
    }
}

#[test]
fn ranges_are_idempotent() {
    let m = abcd();
    let first = m.pairs_in_range(Some(0), Some(4), Some(1)).unwrap().collect::<Vec<_>>();
    let second = m.pairs_in_range(Some(0), Some(4), Some(1)).unwrap().collect::<Vec<_>>();
    assert_eq!(first, second);

    // and a single selection replays through `Clone`
    let selection = m.pairs_in_range(None, None, Some(-1)).unwrap();
    assert!(selection.clone().eq(selection));
}

#[test]
fn cache_follows_removal() {
    let mut m = abcd();
    let mut cache = PositionCache::build(&m);
    assert_eq!(cache.key_at(&m, 1), Ok(&'b'));

    m.remove(&'b');

    // the walk always sees the current map
    assert_eq!(m.key_at(1), Ok(&'c'));
    // a detached cache either fails loudly ...
    assert_eq!(cache.key_at(&m, 1).unwrap_err().kind(), ErrorKind::Stale);
    // ... or rebuilds transparently
    assert_eq!(cache.view(&m).key_at(1), Ok(&'c'));
    // and a borrowing cache is built after the mutation by construction
    assert_eq!(m.cached().key_at(1), Ok(&'c'));
}

#[test]
fn one_entry_point_for_both_forms() {
    let m = abcd();
    let keys = m.keys_iloc();

    assert_eq!(keys.get(3), Ok(&'d'));
    assert!(keys.get(0..4_i32).unwrap().step_by(2).eq(&['a', 'c']));
    assert!(keys.get(Slice::new(Some(0), Some(4), Some(2))).unwrap().eq(&['a', 'c']));

    let selectors: [Selector; 2] = [Selector::from(-1), Selector::from(Slice::FULL.step_by(-2))];
    let mut results = selectors.iter().map(|selector| keys.select(*selector).unwrap());

    match results.next() {
        Some(Selection::One(key)) => assert_eq!(key, &'d'),
        other => panic!("expected one key, got {:?}", other),
    }
    match results.next() {
        Some(Selection::Many(many)) => assert!(many.eq(&['d', 'b'])),
        other => panic!("expected many keys, got {:?}", other),
    }
}

#[test]
fn single_integer_as_a_range() {
    let m = abcd();
    assert!(m.keys_iloc().slice(Slice::single(2)).unwrap().eq(&['c']));
    assert!(m.keys_iloc().slice(Slice::single(-1)).unwrap().eq(&['d']));
    assert_eq!(m.keys_iloc().slice(Slice::single(9)).unwrap().len(), 0);
}

fn build(entries: &[(u8, u16)], removed: &[u8]) -> OrderedMap<u8, u16> {
    let mut map = entries.iter().copied().collect::<OrderedMap<_, _>>();
    for key in removed {
        map.remove(key);
    }
    map
}

proptest! {
    #[test]
    fn round_trip(
        entries in proptest::collection::vec(any::<(u8, u16)>(), 0..64),
        removed in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let m = build(&entries, &removed);
        let len = m.len() as isize;

        let keys = (0..len).map(|i| m.key_at(i).copied()).collect::<Result<Vec<_>, _>>().unwrap();
        let values = (0..len).map(|i| m.value_at(i).copied()).collect::<Result<Vec<_>, _>>().unwrap();
        let pairs = (0..len).map(|i| m.pair_at(i).map(|(k, v)| (*k, *v))).collect::<Result<Vec<_>, _>>().unwrap();

        prop_assert_eq!(&keys, &m.keys().copied().collect::<Vec<_>>());
        prop_assert_eq!(&values, &m.values().copied().collect::<Vec<_>>());
        prop_assert_eq!(&pairs, &m.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>());

        let cached = m.cached();
        for i in 0..len {
            prop_assert_eq!(cached.pair_at(i), m.pair_at(i));
            prop_assert_eq!(cached.pair_at(i - len), m.pair_at(i));
        }
    }

    #[test]
    fn ranges_agree_with_vec_slicing(
        entries in proptest::collection::vec(any::<(u8, u16)>(), 0..48),
        removed in proptest::collection::vec(any::<u8>(), 0..16),
        start in proptest::option::of(-60isize..60),
        stop in proptest::option::of(-60isize..60),
        step in prop_oneof![Just(None), (1isize..6).prop_map(Some), (-6isize..0).prop_map(Some)],
    ) {
        let m = build(&entries, &removed);
        let keys = m.keys().copied().collect::<Vec<_>>();
        let expected = Slice::new(start, stop, step)
            .indices(keys.len())
            .unwrap()
            .map(|position| keys[position])
            .collect::<Vec<_>>();

        let walked = m.keys_in_range(start, stop, step).unwrap().copied().collect::<Vec<_>>();
        let cached = m.cached().keys_in_range(start, stop, step).unwrap().copied().collect::<Vec<_>>();

        prop_assert_eq!(&walked, &expected);
        prop_assert_eq!(&cached, &expected);
    }
}
