use criterion::{black_box, criterion_group, criterion_main, Criterion};

use iloc_map::{OrderedMap, PositionCache};

fn holey(len: u32) -> OrderedMap<u32, u32> {
    let mut map = (0..len).map(|i| (i, i)).collect::<OrderedMap<_, _>>();
    // one hole every 11 entries, not enough to trigger compaction
    for i in (0..len).filter(|i| i % 11 == 0) {
        map.remove(&i);
    }
    map
}

pub fn positional(c: &mut Criterion) {
    c.bench_function("key_at packed", |b| {
        let map = (0..1000).map(|i| (i, i)).collect::<OrderedMap<u32, u32>>();
        b.iter(|| black_box(&map).key_at(black_box(700)).ok().copied())
    });
    c.bench_function("key_at holey walk", |b| {
        let map = holey(1000);
        b.iter(|| black_box(&map).key_at(black_box(700)).ok().copied())
    });
    c.bench_function("key_at holey walk from back", |b| {
        let map = holey(1000);
        b.iter(|| black_box(&map).key_at(black_box(-10)).ok().copied())
    });
    c.bench_function("key_at cached", |b| {
        let map = holey(1000);
        let cached = map.cached();
        b.iter(|| cached.key_at(black_box(700)).ok().copied())
    });
    c.bench_function("key_at position cache", |b| {
        let map = holey(1000);
        let cache = PositionCache::build(&map);
        b.iter(|| cache.key_at(black_box(&map), black_box(700)).ok().copied())
    });
    c.bench_function("position cache build", |b| {
        let map = holey(1000);
        b.iter(|| PositionCache::build(black_box(&map)))
    });
    c.bench_function("keys_in_range step 3", |b| {
        let map = holey(1000);
        b.iter(|| {
            black_box(&map)
                .keys_in_range(Some(100), Some(900), Some(3))
                .map(|keys| keys.sum::<u32>())
        })
    });
    c.bench_function("keys_in_range reversed", |b| {
        let map = holey(1000);
        b.iter(|| {
            black_box(&map)
                .keys_in_range(None, None, Some(-3))
                .map(|keys| keys.sum::<u32>())
        })
    });
}

criterion_group!(benches, positional);
criterion_main!(benches);
