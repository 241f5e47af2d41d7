use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::hint::black_box;

use gamekit_crypto::symmetric::{CipherSession, Mode};

fn data(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut result = vec![0u8; size];
    rng.fill_bytes(&mut result);
    result
}

fn make_session(name: &str) -> CipherSession {
    let mut session = CipherSession::new();
    session
        .init(name, Mode::ENCRYPT | Mode::DECRYPT)
        .expect("benchmarked cipher should be available");
    session.set_key(&data(64, 0)[..session.key_bits() / 8]).unwrap();
    let iv_size = session.iv_size();
    if iv_size > 0 {
        session.set_iv(&vec![0x24; iv_size]).unwrap();
    }
    session
}

fn bench_encrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt");

    let mut names: Vec<&str> = vec!["xxtea"];
    #[cfg(feature = "openssl")]
    names.push("aes-256-ctr");
    #[cfg(feature = "sodium")]
    names.push("chacha20-ietf");
    for name in &names {
        for size in [1024usize, 16 * 1024, 1024 * 1024] {
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, &size| {
                let mut session = make_session(name);
                let plaintext = data(size, 1);
                let mut ciphertext = vec![0u8; size + session.block_size()];
                b.iter(|| black_box(session.encrypt(&plaintext, &mut ciphertext).unwrap()));
            });
        }
    }

    group.finish();
}

fn bench_encrypt_aead(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_aead");

    let mut names: Vec<&str> = Vec::new();
    #[cfg(feature = "openssl")]
    names.push("aes-256-gcm");
    #[cfg(feature = "sodium")]
    names.push("chacha20-poly1305");
    for name in &names {
        for size in [1024usize, 16 * 1024, 1024 * 1024] {
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, &size| {
                let mut session = make_session(name);
                let plaintext = data(size, 1);
                let mut ciphertext = vec![0u8; size + session.block_size()];
                let mut tag = [0u8; 16];
                b.iter(|| {
                    black_box(
                        session
                            .encrypt_aead(&plaintext, &mut ciphertext, &[], &mut tag)
                            .unwrap(),
                    )
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_encrypt, bench_encrypt_aead);
criterion_main!(benches);
