use iloc_map::{ErrorKind, OrderedMap, PositionCache, Selection};

fn letters() -> OrderedMap<char, &'static str> {
    let mut map = OrderedMap::new();
    map.insert('a', "A");
    map.insert('b', "B");
    map.insert('c', "C");
    map.insert('d', "D");
    map
}

#[test]
fn positions_track_removals_and_reinsertion() {
    let mut map = letters();
    map.remove(&'a');
    map.insert('a', "A2");

    assert!(map.keys().eq(&['b', 'c', 'd', 'a']));
    assert_eq!(map.key_at(-1), Ok(&'a'));
    assert_eq!(map.value_at(-1), Ok(&"A2"));
    assert_eq!(map.get_index_of(&'a'), Some(3));
    assert_eq!(map.get_index(0), Some((&'b', &"B")));
}

#[test]
fn positions_of_matching_values() {
    let map = letters();
    let values = map.values_iloc();
    assert_eq!(values.position(|value| **value == "D"), Some(3));
    assert!(values.positions_where(|value| **value != "B").eq([0, 2, 3].iter().copied()));
    assert_eq!(map.get_index_of(&'c'), Some(2));
}

#[test]
fn selectors_pick_one_or_many() {
    let map = letters();
    let items = map.items_iloc();

    match items.select_str("-2").unwrap() {
        Selection::One(pair) => assert_eq!(pair, (&'c', &"C")),
        Selection::Many(_) => panic!("a position selects one entry"),
    }

    let many = items.select(1..).unwrap().many().unwrap();
    assert!(many.map(|(key, _)| *key).eq("bcd".chars()));

    assert_eq!(items.select_str("b").unwrap_err().kind(), ErrorKind::Type);
}

#[test]
fn many_holes() {
    let mut map = (0..1000u32).map(|i| (i, i)).collect::<OrderedMap<_, _>>();
    map.retain(|key, _| key % 7 == 3);
    for i in (0..1000).filter(|i| i % 7 == 3 && i % 2 == 0) {
        map.remove(&i);
    }
    map.extend((1000..1010).map(|i| (i, i)));

    let model = map.keys().copied().collect::<Vec<_>>();
    let cache = PositionCache::build(&map);
    let cached = map.cached();

    for (position, key) in model.iter().enumerate() {
        let index = position as isize;
        assert_eq!(map.key_at(index), Ok(key));
        assert_eq!(map.key_at(index - model.len() as isize), Ok(key));
        assert_eq!(cached.key_at(index), Ok(key));
        assert_eq!(cache.key_at(&map, index), Ok(key));
        assert_eq!(map.get_index_of(key), Some(position));
    }

    let odd = map.keys_in_range(Some(1), None, Some(2)).unwrap().copied().collect::<Vec<_>>();
    let expected = model.iter().skip(1).step_by(2).copied().collect::<Vec<_>>();
    assert_eq!(odd, expected);
}

#[test]
fn panicking_retain_still_invalidates_caches() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let mut map = letters();
    let cache = PositionCache::build(&map);

    let unwound = catch_unwind(AssertUnwindSafe(|| {
        map.retain(|&key, _| {
            if key == 'c' {
                panic!("keep blew up");
            }
            key != 'a'
        })
    }));
    assert!(unwound.is_err());

    // 'a' was dropped before the panic, everything after it is kept
    assert!(map.keys().eq(&['b', 'c', 'd']));
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&'a'), None);
    assert!(!map.contains_key(&'a'));
    assert_eq!(map.get(&'d'), Some(&"D"));
    assert_eq!(map.get_index_of(&'d'), Some(2));

    assert!(!cache.is_current(&map));
    assert_eq!(cache.key_at(&map, 1).unwrap_err().kind(), ErrorKind::Stale);
    assert_eq!(map.key_at(1), Ok(&'c'));
}
