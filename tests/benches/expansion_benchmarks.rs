//! # Signature Expansion Benchmarks
//!
//! | Path | Work |
//! |------|------|
//! | intake | parse, expand, verify, cache |
//! | handle (reuse) | take span, compare linked versions |
//! | handle (reexpand) | take span, expand and verify inline |
//! | verify batch | parallel Ed25519 verification |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_10_signature_expansion::{
    CryptoVerifier, ExpandHandleSpan, ExpansionConfig, InMemoryLedgerState, PlatformSignature,
    SignatureExpansionApi, SyncVerifier,
};
use qc_tests::fixtures::{body, id, signed_contents, TestKey, PAYER};
use shared_types::{AccountAmount, AccountRecord, CryptoTransferBody, IdOrAlias, TransactionData};
use std::sync::Arc;
use std::time::Duration;

/// Transfer debiting `senders` accounts, each with its own key.
fn transfer_from(senders: &[u64]) -> TransactionData {
    let mut hbar_transfers: Vec<AccountAmount> = senders
        .iter()
        .map(|num| AccountAmount {
            account: IdOrAlias::Id(id(*num)),
            amount: -1,
            is_approval: false,
        })
        .collect();
    hbar_transfers.push(AccountAmount {
        account: IdOrAlias::Id(id(PAYER)),
        amount: senders.len() as i64,
        is_approval: false,
    });
    TransactionData::CryptoTransfer(CryptoTransferBody {
        hbar_transfers,
        token_transfers: vec![],
    })
}

struct Setup {
    state: Arc<InMemoryLedgerState>,
    service: ExpandHandleSpan<InMemoryLedgerState, CryptoVerifier>,
    contents: Vec<Vec<u8>>,
}

fn setup(parties: usize, txns: usize) -> Setup {
    let payer = TestKey::ed25519(1);
    let state = Arc::new(InMemoryLedgerState::new());
    state.put_account(id(PAYER), AccountRecord::new(payer.key()));

    let senders: Vec<u64> = (0..parties as u64).map(|i| 2000 + i).collect();
    let keys: Vec<TestKey> = senders.iter().map(|_| TestKey::random_ed25519()).collect();
    for (num, key) in senders.iter().zip(&keys) {
        state.put_account(id(*num), AccountRecord::new(key.key()));
    }

    let mut signers: Vec<&TestKey> = vec![&payer];
    signers.extend(keys.iter());
    let contents = (0..txns)
        .map(|i| signed_contents(&body(PAYER, &format!("bench-{}", i), transfer_from(&senders)), &signers))
        .collect();

    let config = ExpansionConfig {
        span_cache_capacity: txns.max(1),
        ..ExpansionConfig::default()
    };
    let service = ExpandHandleSpan::new(Arc::clone(&state), CryptoVerifier::new(), config);
    Setup {
        state,
        service,
        contents,
    }
}

fn bench_intake(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-10-expansion-intake");
    group.measurement_time(Duration::from_secs(5));

    for parties in [0usize, 4, 16] {
        let setup = setup(parties, 1);
        group.throughput(Throughput::Elements(parties as u64 + 1));
        group.bench_with_input(BenchmarkId::new("track_and_handle", parties), &setup, |b, s| {
            b.iter(|| {
                let raw = &s.contents[0];
                s.service.track(black_box(raw)).unwrap();
                black_box(s.service.accessor_for(raw).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_handle(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-10-expansion-handle");
    group.measurement_time(Duration::from_secs(5));

    let setup = setup(8, 1);
    let raw = setup.contents[0].clone();

    group.bench_function("reuse_cached", |b| {
        b.iter_batched(
            || setup.service.track(&raw).unwrap(),
            |_| black_box(setup.service.accessor_for(&raw).unwrap()),
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("reexpand_stale", |b| {
        b.iter_batched(
            || {
                setup.service.track(&raw).unwrap();
                let record = AccountRecord::new(TestKey::ed25519(1).key());
                setup.state.put_account(id(PAYER), record);
            },
            |_| black_box(setup.service.accessor_for(&raw).unwrap()),
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("uncached", |b| {
        b.iter(|| black_box(setup.service.accessor_for(&raw).unwrap()))
    });
    group.finish();
}

fn bench_verify_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-10-signature-verify");
    let message: Arc<[u8]> = b"transaction body bytes for verification".to_vec().into();

    for size in [10usize, 100, 500] {
        let sigs: Vec<PlatformSignature> = (0..size)
            .map(|_| {
                let key = TestKey::random_ed25519();
                let pair = key.sign(&message);
                PlatformSignature::new(
                    pair.key_type(),
                    &key.public_key(),
                    pair.signature.as_bytes(),
                    Arc::clone(&message),
                )
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("ed25519_batch", size), &sigs, |b, sigs| {
            b.iter_batched(
                || sigs.clone(),
                |mut batch| {
                    CryptoVerifier::new().verify_sync(&mut batch);
                    black_box(batch)
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_intake, bench_handle, bench_verify_batch);
criterion_main!(benches);
