use sha2::{Digest, Sha256};

/// SHA-256 digest of the input's UTF-8 bytes, as 64 lowercase hex characters.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Iterative Fibonacci, used as a stand-in for real CPU-bound work.
///
/// The final advance computes the discarded F(n+1), which saturates at
/// n=93 even though the returned F(93) still fits in u64. Config validation
/// rejects anything above 93, so the returned value itself never saturates.
pub fn fibonacci(n: u64) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        (a, b) = (b, a.saturating_add(b));
    }
    a
}
