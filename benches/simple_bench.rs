use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gaspra::{chars, diff_sequences, find_lcs, merge_sequences, SuffixAutomaton};
use rand::prelude::*;

fn random_text(len: usize, seed: u64) -> String {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..len)
        .map(|_| *b"abcdefghij ".choose(&mut rng).unwrap() as char)
        .collect()
}

fn edited(text: &str, edits: usize, seed: u64) -> String {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut out: Vec<char> = text.chars().collect();
    for _ in 0..edits {
        if out.is_empty() {
            break;
        }
        let i = rng.gen_range(0..out.len());
        out[i] = *b"abcdefghij".choose(&mut rng).unwrap() as char;
    }
    out.into_iter().collect()
}

fn bench_automaton_build(c: &mut Criterion) {
    let _ = env_logger::try_init();
    let mut group = c.benchmark_group("automaton_build");
    for &len in &[100usize, 1_000, 10_000] {
        let text = random_text(len, 1);
        let seq = chars(&text);
        group.bench_with_input(BenchmarkId::from_parameter(len), &seq, |b, seq| {
            b.iter(|| SuffixAutomaton::<char>::build(seq).unwrap());
        });
    }
    group.finish();
}

fn bench_find_lcs(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_lcs");
    for &len in &[100usize, 1_000, 10_000] {
        let a = random_text(len, 2);
        let b = edited(&a, len / 20, 3);
        let (a, b) = (chars(&a), chars(&b));
        group.bench_with_input(BenchmarkId::from_parameter(len), &(a, b), |bench, (a, b)| {
            bench.iter(|| find_lcs(a, b).unwrap());
        });
    }
    group.finish();
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");
    for &len in &[100usize, 1_000, 10_000] {
        let a = random_text(len, 4);
        let b = edited(&a, len / 20, 5);
        let (a, b) = (chars(&a), chars(&b));
        group.bench_with_input(BenchmarkId::from_parameter(len), &(a, b), |bench, (a, b)| {
            bench.iter(|| diff_sequences(a, b).unwrap());
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for &len in &[100usize, 1_000, 10_000] {
        let ancestor = random_text(len, 6);
        let a = edited(&ancestor, len / 20, 7);
        let b = edited(&ancestor, len / 20, 8);
        let (ancestor, a, b) = (chars(&ancestor), chars(&a), chars(&b));
        group.bench_with_input(
            BenchmarkId::from_parameter(len),
            &(ancestor, a, b),
            |bench, (ancestor, a, b)| {
                bench.iter(|| merge_sequences(ancestor, a, b).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_automaton_build,
    bench_find_lcs,
    bench_diff,
    bench_merge
);
criterion_main!(benches);
