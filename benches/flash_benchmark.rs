//! Performance benchmarks for hexflash
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hexflash::core::CancelToken;
use hexflash::transfer::{AsyncTransfer, BlockingTransfer, TransferStrategy};
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

/// Create a test file of the specified size
fn create_test_file(dir: &std::path::Path, name: &str, size: usize) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();

    let chunk_size = 64 * 1024;
    let chunk: Vec<u8> = (0..chunk_size).map(|i| (i % 256) as u8).collect();
    let mut remaining = size;

    while remaining > 0 {
        let to_write = remaining.min(chunk_size);
        file.write_all(&chunk[..to_write]).unwrap();
        remaining -= to_write;
    }

    path
}

fn bench_strategies(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let src_dir = TempDir::new().unwrap();
    let dst_dir = TempDir::new().unwrap();

    let mut group = c.benchmark_group("flash_copy");

    for size in [64 * 1024, 1024 * 1024, 10 * 1024 * 1024].iter() {
        let source = create_test_file(src_dir.path(), &format!("image_{}.hex", size), *size);
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::new("async", size), size, |b, _| {
            let strategy = AsyncTransfer::new(64 * 1024);
            let dest = dst_dir.path().join("firmware_async.hex");
            b.iter(|| {
                let token = CancelToken::new();
                let result = runtime.block_on(strategy.copy(&source, &dest, &token));
                assert!(black_box(result).is_success());
            });
        });

        group.bench_with_input(BenchmarkId::new("blocking", size), size, |b, _| {
            let strategy = BlockingTransfer::new(64 * 1024);
            let dest = dst_dir.path().join("firmware_blocking.hex");
            b.iter(|| {
                let token = CancelToken::new();
                let result = runtime.block_on(strategy.copy(&source, &dest, &token));
                assert!(black_box(result).is_success());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
