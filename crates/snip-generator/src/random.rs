use crate::Generator;
use rand::Rng;
use snip_core::{ShortCode, ALPHABET, CODE_LENGTH};

/// Draws each position of the code uniformly from the base62 alphabet.
///
/// Randomness comes from `rand::thread_rng()`, a CSPRNG seeded once per
/// thread from the operating system. No state is shared between threads, so
/// concurrent callers never observe correlated codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl RandomGenerator {
    pub fn new() -> Self {
        Self
    }
}

/// Builds one code from the given random source.
pub fn random_code<R: Rng + ?Sized>(rng: &mut R) -> ShortCode {
    let code: String = (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    ShortCode::new_unchecked(code)
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        random_code(&mut rand::thread_rng())
    }
}
