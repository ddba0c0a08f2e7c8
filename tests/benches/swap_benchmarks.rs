//! # HTLC Swap Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | Agreement ID | Length-prefixed SHA-256 derivation |
//! | Secret check | SHA-256 of the claim secret against the image |
//! | Lock + Claim | Two host transactions, working copies included |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use htlc_swap::algorithms::{derive_agreement_id, AgreementIdInput};
use htlc_swap::{create_image, generate_secret, verify_secret, Secret};
use htlc_tests::harness::{address_of, fusd, LockSpec, SwapHarness, ALICE_KEY, BOB_KEY, SECRET};
use std::time::Duration;

// ============================================================================
// Hashing
// ============================================================================

fn bench_agreement_id(c: &mut Criterion) {
    let owner = address_of(ALICE_KEY);
    let counterparty = address_of(BOB_KEY);
    let image = create_image(&generate_secret());

    c.bench_function("agreement_id_derive", |b| {
        b.iter(|| {
            derive_agreement_id(black_box(&AgreementIdInput {
                tx_id: "tx-000001",
                owner: &owner,
                counterparty: &counterparty,
                timestamp: 1_000,
                image: &image,
            }))
        })
    });
}

fn bench_secret_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("secret_verify");

    for len in [16usize, 64, 1024] {
        let secret = Secret::new("s".repeat(len));
        let image = create_image(&secret);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &secret, |b, secret| {
            b.iter(|| black_box(verify_secret(secret, &image)))
        });
    }

    group.finish();
}

// ============================================================================
// Host transactions
// ============================================================================

fn bench_lock_claim_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("host_cycle");
    group.measurement_time(Duration::from_secs(10));

    // Committed state grows with every iteration; the cost per call includes
    // cloning it into the working copy.
    let alice = address_of(ALICE_KEY);
    for preexisting in [0usize, 100, 1_000] {
        let harness = SwapHarness::new();
        for i in 0..preexisting {
            harness
                .approve_and_lock(&LockSpec::alice_to_bob(1, 100), i as u64)
                .expect("seed lock");
        }

        group.bench_with_input(
            BenchmarkId::new("lock_then_claim", preexisting),
            &harness,
            |b, harness| {
                b.iter(|| {
                    let id = harness
                        .approve_and_lock(&LockSpec::alice_to_bob(1, 100), 1_000_000)
                        .expect("lock");
                    harness
                        .claim(BOB_KEY, &id, SECRET, 1_000_050)
                        .expect("claim");
                    // Hand the token back so the owner never runs dry
                    harness
                        .transfer(BOB_KEY, &fusd(), &alice, 1)
                        .expect("return");
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_agreement_id,
    bench_secret_verification,
    bench_lock_claim_cycle
);
criterion_main!(benches);
