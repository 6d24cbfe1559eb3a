//! Client-side push key generation.
//!
//! Keys are 20 characters: 8 encode the millisecond timestamp and 12 are
//! random. The alphabet is in ASCII order, so keys sort by creation time.

use uuid::Uuid;

use super::NoteId;
use crate::util::unix_millis_now;

const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";
const TIMESTAMP_CHARS: usize = 8;
const RANDOM_CHARS: usize = 12;

/// Generates time-ordered push keys.
///
/// Keys from one generator are strictly increasing: within the same
/// millisecond (or if the clock steps back) the random suffix of the previous
/// key is incremented instead of drawn again.
#[derive(Debug, Default)]
pub struct PushIdGenerator {
    last_timestamp: Option<u64>,
    last_random: [u8; RANDOM_CHARS],
}

impl PushIdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_timestamp: None,
            last_random: [0; RANDOM_CHARS],
        }
    }

    /// Generate a key for the current time.
    pub fn generate(&mut self) -> NoteId {
        self.generate_at(unix_millis_now())
    }

    /// Generate a key for an explicit millisecond timestamp.
    #[allow(clippy::cast_possible_truncation)] // remainder is always < 64
    pub fn generate_at(&mut self, timestamp_ms: u64) -> NoteId {
        let timestamp_ms = match self.last_timestamp {
            Some(last) if timestamp_ms <= last => {
                self.increment_random();
                last
            }
            _ => {
                self.last_random = random_digits();
                timestamp_ms
            }
        };
        self.last_timestamp = Some(timestamp_ms);

        let mut key = String::with_capacity(TIMESTAMP_CHARS + RANDOM_CHARS);
        let mut prefix = [0u8; TIMESTAMP_CHARS];
        let mut remaining = timestamp_ms;
        for slot in prefix.iter_mut().rev() {
            *slot = PUSH_CHARS[(remaining % 64) as usize];
            remaining /= 64;
        }
        key.extend(prefix.iter().map(|byte| char::from(*byte)));
        key.extend(
            self.last_random
                .iter()
                .map(|digit| char::from(PUSH_CHARS[usize::from(*digit)])),
        );

        NoteId::from_key(key)
    }

    fn increment_random(&mut self) {
        for digit in self.last_random.iter_mut().rev() {
            if *digit == 63 {
                *digit = 0;
            } else {
                *digit += 1;
                return;
            }
        }
    }
}

fn random_digits() -> [u8; RANDOM_CHARS] {
    // Skip the version (6) and variant (8) bytes of a v4 UUID.
    const RANDOM_BYTES: [usize; RANDOM_CHARS] = [0, 1, 2, 3, 4, 5, 7, 9, 10, 11, 12, 13];
    let bytes = *Uuid::new_v4().as_bytes();
    RANDOM_BYTES.map(|index| bytes[index] & 0x3f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_have_push_id_shape() {
        let mut generator = PushIdGenerator::new();
        let key = generator.generate();
        assert_eq!(key.as_str().len(), 20);
        assert!(key.as_str().bytes().all(|byte| PUSH_CHARS.contains(&byte)));
    }

    #[test]
    fn timestamp_prefix_encodes_millis() {
        let mut generator = PushIdGenerator::new();
        let key = generator.generate_at(0);
        assert_eq!(&key.as_str()[..8], "--------");

        let key = generator.generate_at(64);
        assert_eq!(&key.as_str()[..8], "------0-");
    }

    #[test]
    fn same_millisecond_keys_are_strictly_increasing() {
        let mut generator = PushIdGenerator::new();
        let first = generator.generate_at(1_700_000_000_000);
        let second = generator.generate_at(1_700_000_000_000);
        let third = generator.generate_at(1_699_999_999_000);
        assert!(first < second);
        assert!(second < third);
        assert_eq!(&first.as_str()[..8], &third.as_str()[..8]);
    }

    #[test]
    fn later_timestamps_sort_after_earlier_ones() {
        let mut generator = PushIdGenerator::new();
        let earlier = generator.generate_at(1_000);
        let later = generator.generate_at(2_000);
        assert!(earlier < later);
    }

    #[test]
    fn increment_carries_across_digits() {
        let mut generator = PushIdGenerator::new();
        generator.last_random = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 5, 63];
        generator.increment_random();
        assert_eq!(generator.last_random, [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6, 0]);
    }
}
