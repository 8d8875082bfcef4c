//! Identifier sources for navigation nodes and task items.
//!
//! Navigation ids double as document keys (and file names), so they stay short
//! lowercase hex. Task ids only need to be unique inside one checklist.

use uuid::Uuid;

/// Shortest id `RandomIds` will hand out (32 bits of entropy)
pub const MIN_RANDOM_LEN: usize = 8;
/// A v4 UUID has 32 hex digits
pub const MAX_RANDOM_LEN: usize = 32;

/// A source of fresh opaque identifiers. Never fails.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

/// Random ids: the first `len` hex digits of a v4 UUID.
///
/// The first 12 digits are all random (the version nibble is the 13th), so with
/// the default length two of n ids collide with probability about n²/2⁴⁹:
/// below one in ten million for a tree of a few thousand nodes.
#[derive(Debug, Clone)]
pub struct RandomIds {
    len: usize,
}

impl RandomIds {
    pub fn new(len: usize) -> Self {
        RandomIds {
            len: len.clamp(MIN_RANDOM_LEN, MAX_RANDOM_LEN),
        }
    }

    pub fn length(&self) -> usize {
        self.len
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        RandomIds::new(12)
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(self.len);
        id
    }
}

/// Counter ids: `<prefix>1`, `<prefix>2`, ...
///
/// Deterministic, so decoding the same document twice yields the same ids.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_ids_length_and_alphabet() {
        let mut ids = RandomIds::default();
        let id = ids.next_id();
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_random_ids_length_is_clamped() {
        assert_eq!(RandomIds::new(2).length(), MIN_RANDOM_LEN);
        assert_eq!(RandomIds::new(100).length(), MAX_RANDOM_LEN);
        assert_eq!(RandomIds::new(100).next_id().len(), 32);
    }

    #[test]
    fn test_random_ids_do_not_collide_in_practice() {
        let mut ids = RandomIds::default();
        let seen: HashSet<String> = (0..10_000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 10_000);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new("t");
        assert_eq!(ids.next_id(), "t1");
        assert_eq!(ids.next_id(), "t2");
        assert_eq!(ids.next_id(), "t3");
    }

    #[test]
    fn test_boxed_generator() {
        let mut ids: Box<dyn IdGenerator> = Box::new(SequentialIds::new(""));
        assert_eq!(ids.next_id(), "1");
        assert_eq!(ids.next_id(), "2");
    }
}
