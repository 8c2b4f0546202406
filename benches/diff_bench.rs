// Benchmark suite for changeset consolidation and patch generation.
//
// Measures the three hot paths:
// - Diff::from_ops: replaying a raw log into a canonical diff
// - Diff::generate_patch: ordering the diff into a replayable patch
// - the tree equivalents, driven through a sectioned array

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use editscript::array2d::SectionedArray;
use editscript::changeset::VecChangeset;
use editscript::op::Op;

// =============================================================================
// Benchmark Helpers
// =============================================================================

/// Apply `ops` random edits to a changeset seeded with `initial_len`
/// elements. Roughly half the edits are inserts so the collection grows.
fn random_session(initial_len: usize, ops: usize, rng: &mut StdRng) -> VecChangeset<u64> {
    let initial: Vec<u64> = (0..initial_len as u64).collect();
    let mut changeset = VecChangeset::new(initial);
    let mut fresh = initial_len as u64;

    for _ in 0..ops {
        let len = changeset.collection().len();
        let op = match if len == 0 { 0 } else { rng.gen_range(0..8) } {
            0..=3 => {
                fresh += 1;
                Op::Insert { at: rng.gen_range(0..=len), value: fresh }
            }
            4 => Op::Delete { at: rng.gen_range(0..len) },
            5 => {
                fresh += 1;
                Op::Update { at: rng.gen_range(0..len), value: fresh }
            }
            _ => Op::Move { from: rng.gen_range(0..len), to: rng.gen_range(0..len) },
        };
        changeset.apply(op).unwrap();
    }
    changeset
}

/// A sectioned array after a burst of random section and item edits.
fn random_sectioned_session(ops: usize, rng: &mut StdRng) -> SectionedArray<u64, u64> {
    let mut array: SectionedArray<u64, u64> = SectionedArray::new();
    let mut fresh = 0u64;

    for _ in 0..ops {
        fresh += 1;
        let sections = array.section_count();
        match if sections == 0 { 0 } else { rng.gen_range(0..6) } {
            0 => array.append_section(fresh).unwrap(),
            1..=3 => {
                let section = rng.gen_range(0..sections);
                array.append_item(fresh, section).unwrap();
            }
            4 => {
                let section = rng.gen_range(0..sections);
                match array.item_count(section) {
                    Some(items) if items > 0 => {
                        array.remove_item((section, rng.gen_range(0..items))).unwrap();
                    }
                    _ => array.append_section(fresh).unwrap(),
                }
            }
            _ => {
                array
                    .move_section(rng.gen_range(0..sections), rng.gen_range(0..sections))
                    .unwrap();
            }
        }
    }
    array
}

// =============================================================================
// Flat Changeset Benchmarks
// =============================================================================

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_from_ops");

    for ops in [100, 1_000, 10_000] {
        let mut rng = StdRng::seed_from_u64(42);
        let changeset = random_session(ops / 2, ops, &mut rng);
        group.throughput(Throughput::Elements(ops as u64));

        group.bench_with_input(BenchmarkId::from_parameter(ops), &changeset, |b, cs| {
            b.iter(|| black_box(cs.diff().unwrap()));
        });
    }

    group.finish();
}

fn bench_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_patch");

    for ops in [100, 1_000, 10_000] {
        let mut rng = StdRng::seed_from_u64(42);
        let changeset = random_session(ops / 2, ops, &mut rng);
        let diff = changeset.diff().unwrap();
        group.throughput(Throughput::Elements(ops as u64));

        group.bench_with_input(BenchmarkId::from_parameter(ops), &diff, |b, diff| {
            b.iter(|| black_box(diff.generate_patch(changeset.collection()).unwrap()));
        });
    }

    group.finish();
}

// =============================================================================
// Tree Changeset Benchmarks
// =============================================================================

fn bench_tree_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("sectioned_diff_and_patch");

    for ops in [100, 1_000] {
        let mut rng = StdRng::seed_from_u64(42);
        let array = random_sectioned_session(ops, &mut rng);
        group.throughput(Throughput::Elements(ops as u64));

        group.bench_with_input(BenchmarkId::from_parameter(ops), &array, |b, array| {
            b.iter(|| black_box(array.patch().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_diff, bench_patch, bench_tree_patch);
criterion_main!(benches);
