//! Paste Identifier Generator
//!
//! Draws short random identifiers and checks them against the store,
//! growing the length when candidates keep colliding. Short ids keep URLs
//! terse while the store is sparse; longer ones take over as it fills up.
//! This is a usability heuristic, not a security control.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::store::PasteStore;

/// Characters identifiers are drawn from.
pub const ALPHABET: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

// == Id Policy ==
/// Length range and retry budget for identifier generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPolicy {
    /// Length of the first candidates tried
    pub min_length: usize,
    /// Longest length tried before giving up
    pub max_length: usize,
    /// Candidates drawn at each length before moving to the next
    pub attempts_per_length: usize,
}

impl Default for IdPolicy {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 20,
            attempts_per_length: 10,
        }
    }
}

impl IdPolicy {
    /// Total candidates drawn before generation reports exhaustion.
    pub fn max_attempts(&self) -> usize {
        (self.min_length..=self.max_length).count() * self.attempts_per_length
    }

    /// Checks the policy can be executed. Characters are drawn without
    /// replacement, so no id can be longer than the alphabet.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_length == 0 {
            return Err("minimum id length must be at least 1".to_string());
        }
        if self.min_length > self.max_length {
            return Err(format!(
                "minimum id length {} exceeds maximum {}",
                self.min_length, self.max_length
            ));
        }
        if self.max_length > ALPHABET.len() {
            return Err(format!(
                "maximum id length {} exceeds the {} character alphabet",
                self.max_length,
                ALPHABET.len()
            ));
        }
        if self.attempts_per_length == 0 {
            return Err("attempts per length must be at least 1".to_string());
        }
        Ok(())
    }
}

// == Id Generator ==
/// Identifier generator with its own random source.
#[derive(Debug)]
pub struct IdGenerator {
    policy: IdPolicy,
    rng: Mutex<StdRng>,
}

impl IdGenerator {
    /// Creates a generator seeded from the operating system.
    pub fn new(policy: IdPolicy) -> Self {
        Self::with_rng(policy, StdRng::from_entropy())
    }

    /// Creates a generator whose candidate sequence is fully determined by
    /// `seed`.
    pub fn seeded(policy: IdPolicy, seed: u64) -> Self {
        Self::with_rng(policy, StdRng::seed_from_u64(seed))
    }

    fn with_rng(policy: IdPolicy, rng: StdRng) -> Self {
        Self {
            policy,
            rng: Mutex::new(rng),
        }
    }

    // == Candidate ==
    /// Draws `length` distinct alphabet characters in random order.
    pub fn candidate(&self, length: usize) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        ALPHABET
            .choose_multiple(&mut *rng, length)
            .map(|&b| char::from(b))
            .collect()
    }

    // == Generate ==
    /// Returns an identifier not currently present in `store`, or `None` once
    /// every length and attempt has collided.
    pub async fn generate(&self, store: &dyn PasteStore) -> StoreResult<Option<String>> {
        for length in self.policy.min_length..=self.policy.max_length {
            for _ in 0..self.policy.attempts_per_length {
                let id = self.candidate(length);
                if store.get(&id).await?.is_none() {
                    return Ok(Some(id));
                }
                debug!(id = %id, length, "identifier collision");
            }
        }

        warn!(
            "no free identifier after {} attempts",
            self.policy.max_attempts()
        );
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use bytes::Bytes;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reports the first `taken` lookups as occupied, everything after as free.
    struct Crowded {
        taken: usize,
        lookups: AtomicUsize,
    }

    impl Crowded {
        fn new(taken: usize) -> Self {
            Self {
                taken,
                lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PasteStore for Crowded {
        async fn get(&self, _id: &str) -> StoreResult<Option<Bytes>> {
            let seen = self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok((seen < self.taken).then(|| Bytes::from_static(b"taken")))
        }

        async fn set(&self, _id: &str, _content: Bytes) -> StoreResult<()> {
            Ok(())
        }

        async fn delete(&self, _id: &str) -> StoreResult<bool> {
            Ok(false)
        }
    }

    fn is_distinct_alphabetic(id: &str) -> bool {
        let unique: HashSet<char> = id.chars().collect();
        unique.len() == id.len() && id.bytes().all(|b| ALPHABET.contains(&b))
    }

    #[test]
    fn test_default_policy() {
        let policy = IdPolicy::default();
        assert_eq!(policy.min_length, 3);
        assert_eq!(policy.max_length, 20);
        assert_eq!(policy.attempts_per_length, 10);
        assert_eq!(policy.max_attempts(), 180);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_policy_validation() {
        let base = IdPolicy::default();
        assert!(IdPolicy { min_length: 0, ..base }.validate().is_err());
        assert!(IdPolicy { min_length: 8, max_length: 4, ..base }.validate().is_err());
        assert!(IdPolicy { max_length: 53, ..base }.validate().is_err());
        assert!(IdPolicy { max_length: 52, ..base }.validate().is_ok());
        assert!(IdPolicy { attempts_per_length: 0, ..base }.validate().is_err());
    }

    #[test]
    fn test_seeded_generators_agree() {
        let a = IdGenerator::seeded(IdPolicy::default(), 42);
        let b = IdGenerator::seeded(IdPolicy::default(), 42);

        for length in 3..=20 {
            assert_eq!(a.candidate(length), b.candidate(length));
        }
    }

    #[tokio::test]
    async fn test_generate_prefers_shortest_length() {
        let ids = IdGenerator::seeded(IdPolicy::default(), 7);
        let store = MemoryStore::new(1024, 60);

        let id = ids.generate(&store).await.unwrap().unwrap();

        assert_eq!(id.len(), 3);
        assert!(is_distinct_alphabetic(&id));
    }

    #[tokio::test]
    async fn test_generate_skips_ids_in_use() {
        let seed = 1234;
        let store = MemoryStore::new(1024, 60);

        // Occupy whatever a generator with this seed would offer first
        let first = IdGenerator::seeded(IdPolicy::default(), seed).candidate(3);
        store.set(&first, Bytes::from_static(b"taken")).await.unwrap();

        let ids = IdGenerator::seeded(IdPolicy::default(), seed);
        let id = ids.generate(&store).await.unwrap().unwrap();

        assert_ne!(id, first);
        assert_eq!(store.get(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_generate_escalates_length_after_collisions() {
        let ids = IdGenerator::seeded(IdPolicy::default(), 99);
        let store = Crowded::new(10);

        let id = ids.generate(&store).await.unwrap().unwrap();

        assert_eq!(id.len(), 4);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 11);
    }

    #[tokio::test]
    async fn test_generate_gives_up_after_budget() {
        let ids = IdGenerator::seeded(IdPolicy::default(), 5);
        let store = Crowded::new(usize::MAX);

        let result = ids.generate(&store).await.unwrap();

        assert_eq!(result, None);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 180);
    }

    #[tokio::test]
    async fn test_generate_honours_custom_policy() {
        let policy = IdPolicy {
            min_length: 5,
            max_length: 6,
            attempts_per_length: 2,
        };
        let ids = IdGenerator::seeded(policy, 3);

        let store = Crowded::new(usize::MAX);
        assert_eq!(ids.generate(&store).await.unwrap(), None);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 4);

        let store = Crowded::new(2);
        assert_eq!(ids.generate(&store).await.unwrap().unwrap().len(), 6);
    }

    proptest! {
        #[test]
        fn prop_candidates_are_distinct_letters(seed in any::<u64>(), length in 1usize..=52) {
            let ids = IdGenerator::seeded(IdPolicy::default(), seed);

            let id = ids.candidate(length);

            prop_assert_eq!(id.len(), length);
            prop_assert!(is_distinct_alphabetic(&id));
        }
    }
}
