// Mstrie -- An in-memory index for multisets
// Copyright 2026 The mstrie authors

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mstrie::codec::Codec;
use mstrie::{Mstrie, Settings, TimeUnit};

const ALPHABET: u32 = 8;
const MAX_MULTIPLICITY: u32 = 4;

/// Deterministic xorshift, so every run benchmarks the same trie.
struct Prng(u64);

impl Prng {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

fn build_trie(n: usize) -> Mstrie {
    let settings = Settings {
        alphabet: ALPHABET,
        max_multiplicity: MAX_MULTIPLICITY,
        index_path: PathBuf::new(),
    };
    let mut trie = Mstrie::new(settings, TimeUnit::Micros);
    let codec = Codec::new(ALPHABET);
    let mut rng = Prng(0x9e37_79b9_7f4a_7c15);
    for _ in 0..n {
        let v: Vec<u32> = (0..ALPHABET)
            .map(|_| (rng.next() % u64::from(MAX_MULTIPLICITY + 1)) as u32)
            .collect();
        trie.insert(&codec.encode(&v)).unwrap();
    }
    trie
}

fn criterion_benchmark(c: &mut Criterion) {
    let query = "0,1,1,2,3,4,5,6,7";

    c.bench_function("Mstrie::exact 10k", |b| {
        let mut trie = build_trie(10_000);
        b.iter(|| trie.exact(black_box(query)).unwrap());
    });

    c.bench_function("Mstrie::subseteq 10k", |b| {
        let mut trie = build_trie(10_000);
        b.iter(|| trie.subseteq(black_box(query), None).unwrap());
    });

    c.bench_function("Mstrie::superseteq 10k", |b| {
        let mut trie = build_trie(10_000);
        b.iter(|| trie.superseteq(black_box(query), None).unwrap());
    });

    c.bench_function("Mstrie::get_superseteq all 10k", |b| {
        let mut trie = build_trie(10_000);
        b.iter(|| trie.get_superseteq(black_box("*"), None).unwrap());
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        // Query times are in the nanosecond range; ask for more certainty
        // than the default before reporting a difference.
        .significance_level(0.001)
        .confidence_level(0.99);
    targets = criterion_benchmark
}

criterion_main!(benches);
