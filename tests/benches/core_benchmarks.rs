//! # TPS Core Benchmarks
//!
//! Hot paths on every scan and every vote:
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | tps-01 QR codec | decode a scanned payload | < 1µs |
//! | tps-01 QR codec | constant-time secret compare | < 1µs |
//! | tps-05 Vote cast | HMAC a receipt token | < 10µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use tps_01_qr_codec::{decode, generate_secret, secrets_match, QrPayload};
use tps_05_vote_cast::ReceiptHasher;

fn bench_qr_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("tps-01-qr-codec");
    group.measurement_time(Duration::from_secs(5));

    let secret = generate_secret();
    let payload = QrPayload::new("TPS01", secret.as_str())
        .map(|p| p.encode())
        .unwrap_or_default();

    group.bench_function("decode_valid", |b| {
        b.iter(|| black_box(decode(black_box(&payload)).is_ok()))
    });
    group.bench_function("decode_wrong_magic", |b| {
        b.iter(|| black_box(decode(black_box("WRONG|TPS01|abc123")).is_err()))
    });

    let other = generate_secret();
    group.bench_function("secrets_match_mismatch", |b| {
        b.iter(|| black_box(secrets_match(black_box(&secret), black_box(&other))))
    });

    group.finish();
}

fn bench_receipt_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("tps-05-vote-cast");

    let Ok(hasher) = ReceiptHasher::new(&[7u8; 32]) else {
        return;
    };
    for token_len in [32usize, 64] {
        let token = "a".repeat(token_len);
        group.bench_with_input(
            BenchmarkId::new("receipt_hmac", token_len),
            &token,
            |b, token| b.iter(|| black_box(hasher.hash(black_box(token)))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_qr_codec, bench_receipt_hash);
criterion_main!(benches);
