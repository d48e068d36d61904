use crate::domain::ports::TokenSource;
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

pub const TOKEN_LENGTH: usize = 32;

fn sample_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    std::iter::repeat_with(|| rng.sample(Alphanumeric) as char)
        .take(TOKEN_LENGTH)
        .collect()
}

/// Tokens from the thread-local CSPRNG (ChaCha, seeded by the OS).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsTokenSource;

impl TokenSource for OsTokenSource {
    fn token(&self) -> String {
        let mut rng = rand::rng();
        sample_token(&mut rng)
    }
}

/// Reproducible tokens for tests and snapshot renders.
#[derive(Debug)]
pub struct SeededTokenSource {
    rng: Mutex<StdRng>,
}

impl SeededTokenSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TokenSource for SeededTokenSource {
    fn token(&self) -> String {
        match self.rng.lock() {
            Ok(mut rng) => sample_token(&mut *rng),
            Err(poisoned) => {
                let mut rng = poisoned.into_inner();
                sample_token(&mut *rng)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_32_alphanumeric_chars() {
        for _ in 0..50 {
            let token = OsTokenSource.token();
            assert_eq!(token.len(), TOKEN_LENGTH);
            assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(!token.contains(['+', '/', '=']));
        }
    }

    #[test]
    fn test_seeded_tokens_repeat() {
        let a = SeededTokenSource::new(7);
        let b = SeededTokenSource::new(7);
        assert_eq!(a.token(), b.token());
        assert_eq!(a.token(), b.token());
        assert_ne!(a.token(), SeededTokenSource::new(8).token());
    }
}
