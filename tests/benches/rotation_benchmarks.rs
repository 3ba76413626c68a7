//! Verifier rotation benchmarks
//!
//! Run with: cargo bench -p ir-tests

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ir_01_signature_verification::verify_payload;
use ir_02_verifier_rotation::domain::randomize_batch;
use ir_02_verifier_rotation::{
    EcdsaSignatureAdapter, InMemoryKVStore, KeccakShuffleSource, RegistrationInfo,
    RotationConfig, RotationDependencies, RotationService, VerifierRotationApi,
};
use ir_tests::integration::fixtures::{admin, node1, nodes, setup_request};
use shared_types::{Address, ProcessContext};
use std::sync::Arc;
use std::time::Duration;

fn bench_signature(c: &mut Criterion) {
    let mut group = c.benchmark_group("ir01_signature");
    group.measurement_time(Duration::from_secs(5));

    let node = node1();
    let payload = RegistrationInfo::new("hello world", 2).to_payload();
    let public_key = node.public_key();
    let signature = node.sign(&payload);

    group.bench_function("verify_payload", |b| {
        b.iter(|| {
            verify_payload(
                black_box(payload.as_bytes()),
                black_box(&public_key),
                black_box(&signature),
            )
        })
    });

    group.finish();
}

fn bench_randomize(c: &mut Criterion) {
    let mut group = c.benchmark_group("ir02_randomize_batch");

    for size in [8usize, 128, 1024] {
        let pool: Vec<Address> = (0..size).map(|i| Address::new(format!("node-{i}"))).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &pool, |b, pool| {
            b.iter(|| {
                let mut source = KeccakShuffleSource::for_rotation(130, 42);
                randomize_batch(black_box(pool), 4, &mut source)
            })
        });
    }

    group.finish();
}

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("ir02_register");

    let nodes = nodes(1);
    let node = &nodes[0];
    let service = RotationService::new(RotationDependencies {
        store: InMemoryKVStore::new(),
        sig_verifier: Arc::new(EcdsaSignatureAdapter::new()),
        config: RotationConfig::default(),
    });
    let ctx = ProcessContext::new(0, 0);
    let setup = service.setup(&ctx, setup_request(&admin(), &nodes));
    assert!(setup.is_ok());

    let mut height = 0u64;
    group.bench_function("register_next_height", |b| {
        b.iter_batched(
            || {
                height += 1;
                (ctx.at_height(height), node.registration("d", height))
            },
            |(ctx, request)| service.register(&ctx, request),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_signature, bench_randomize, bench_registration);
criterion_main!(benches);
