use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use rand::rngs::OsRng;

/// Lowercase alphanumeric alphabet used for every generated identifier.
pub const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub const PERSON_ID_LEN: usize = 15;
pub const SESSION_ID_LEN: usize = 40;

/// Source of fixed-length identifiers drawn from [`ALPHABET`].
pub trait IdGenerator: Send + Sync {
    fn random_string(&self, len: usize) -> String;
}

/// Draws every character from the operating system CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn random_string(&self, len: usize) -> String {
        let mut rng = OsRng;
        (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// Deterministic generator for tests: a base-36 counter, left-padded with `0`.
///
/// When the counter needs more digits than `len`, the most significant ones
/// are dropped.
#[derive(Debug, Default)]
pub struct SequenceIdGenerator {
    next: AtomicU64,
}

impl SequenceIdGenerator {
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn random_string(&self, len: usize) -> String {
        let mut n = self.next.fetch_add(1, Ordering::Relaxed);
        let mut digits = vec![b'0'; len];

        for slot in digits.iter_mut().rev() {
            *slot = ALPHABET[(n % 36) as usize];
            n /= 36;
            if n == 0 {
                break;
            }
        }

        digits.into_iter().map(char::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_alphabet(s: &str) -> bool {
        s.bytes().all(|b| ALPHABET.contains(&b))
    }

    #[test]
    fn random_ids_have_requested_length_and_alphabet() {
        let generator = RandomIdGenerator;
        for len in [0, 1, PERSON_ID_LEN, SESSION_ID_LEN] {
            let id = generator.random_string(len);
            assert_eq!(id.len(), len);
            assert!(in_alphabet(&id), "unexpected character in {id}");
        }
    }

    #[test]
    fn random_session_ids_do_not_repeat() {
        let generator = RandomIdGenerator;
        let a = generator.random_string(SESSION_ID_LEN);
        let b = generator.random_string(SESSION_ID_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn sequence_ids_are_padded_counters() {
        let generator = SequenceIdGenerator::default();
        assert_eq!(generator.random_string(4), "0000");
        assert_eq!(generator.random_string(4), "0001");

        let generator = SequenceIdGenerator::starting_at(36);
        assert_eq!(generator.random_string(3), "010");
        assert_eq!(generator.random_string(3), "011");
    }

    #[test]
    fn sequence_ids_keep_low_digits_when_too_short() {
        // 36^2 + 5 => "105" in base 36
        let generator = SequenceIdGenerator::starting_at(36 * 36 + 5);
        assert_eq!(generator.random_string(2), "05");
    }

    #[test]
    fn sequence_ids_stay_in_alphabet() {
        let generator = SequenceIdGenerator::starting_at(u64::MAX - 3);
        for _ in 0..3 {
            let id = generator.random_string(SESSION_ID_LEN);
            assert_eq!(id.len(), SESSION_ID_LEN);
            assert!(in_alphabet(&id));
        }
    }
}
