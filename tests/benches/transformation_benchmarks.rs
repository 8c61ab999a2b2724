//! # HLF-Sync Transformation Benchmarks
//!
//! | Subsystem | Operation | Input |
//! |-----------|-----------|-------|
//! | hs-01 Block Transformation | `transform_block` | one block, N writes |
//! | hs-01 Block Transformation | `transform_blocks` | catch-up batch of N blocks |
//! | shared-types | `Block::from_proto_bytes` | serialized block |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fabric_proto::fixtures::kv_write;
use hs_01_block_transformation::{transform_block, transform_blocks};
use hs_tests::fixtures::{self, CHAINCODE};
use shared_types::Block;
use std::time::Duration;

// ============================================================================
// HS-01: Single block with many writes
// ============================================================================

fn bench_transform_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("hs-01-transform-block");
    group.measurement_time(Duration::from_secs(5));

    for writes in [1usize, 50, 500] {
        let kvs = (0..writes)
            .map(|i| {
                kv_write(
                    &format!("\u{0}asset\u{0}{}\u{0}", i),
                    format!(r#"{{"id":{},"owner":"org1","value":{}}}"#, i, i * 10).as_bytes(),
                )
            })
            .collect();
        let block = fixtures::block(1, vec![fixtures::tx("tx-bench", CHAINCODE, kvs)]);

        group.throughput(Throughput::Elements(writes as u64));
        group.bench_with_input(BenchmarkId::new("writes", writes), &block, |b, block| {
            b.iter(|| black_box(transform_block(block).map(|r| r.len())))
        });
    }

    group.finish();
}

// ============================================================================
// HS-01: Catch-up batch merge
// ============================================================================

fn bench_transform_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("hs-01-transform-batch");
    group.measurement_time(Duration::from_secs(5));

    for blocks in [10u64, 100, 1000] {
        let chain = fixtures::chain(blocks);

        group.throughput(Throughput::Elements(blocks));
        group.bench_with_input(BenchmarkId::new("blocks", blocks), &chain, |b, chain| {
            b.iter(|| black_box(transform_blocks(chain).map(|r| r.len())))
        });
    }

    group.finish();
}

// ============================================================================
// Block decoding
// ============================================================================

fn bench_block_decode(c: &mut Criterion) {
    let bytes = fixtures::put_block_bytes(42, "K42", r#"{"title":"Foobar","items":["1","2"]}"#);

    c.bench_function("block-from-proto-bytes", |b| {
        b.iter(|| black_box(Block::from_proto_bytes(black_box(&bytes)).map(|b| b.number)))
    });
}

criterion_group!(
    benches,
    bench_transform_block,
    bench_transform_batch,
    bench_block_decode
);
criterion_main!(benches);
