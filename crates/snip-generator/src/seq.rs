use crate::Generator;
use snip_core::{ShortCode, ALPHABET, CODE_LENGTH};
use std::sync::atomic::{AtomicU64, Ordering};

/// 62^6, the number of distinct codes.
const CODE_SPACE: u64 = 56_800_235_584;

/// A deterministic generator encoding a counter as a fixed-width base62 code.
///
/// Produces "000000", "000001", ... "00000Z", "000010" and wraps around after
/// the last code. The counter lives in memory only, so after a restart it
/// begins again at its offset and relies on the store's collision retry.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
        }
    }
}

impl SeqGenerator {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Creates a generator whose first code encodes `offset`.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes `value` (mod 62^6) as a zero-padded base62 code.
pub fn encode(value: u64) -> ShortCode {
    let mut n = value % CODE_SPACE;
    let mut buf = [ALPHABET[0]; CODE_LENGTH];
    for slot in buf.iter_mut().rev() {
        *slot = ALPHABET[(n % 62) as usize];
        n /= 62;
    }
    ShortCode::new_unchecked(buf.iter().map(|&b| b as char).collect::<String>())
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        encode(count)
    }
}
