// SPDX-License-Identifier: Apache-2.0
//! Hash primitive: 32-byte digests with incremental state and snapshots.
//!
//! Determinism contract
//! - Every construct digest opens with a domain-separation tag (the flavor's
//!   `hash_tag`), absorbed with a terminating NUL like any other string.
//! - Strings are absorbed including their terminating NUL so that adjacent
//!   fields cannot collide by concatenation (`"ab" + "c"` vs `"a" + "bc"`).
//! - Wherever a multiset of child digests contributes to a parent digest, the
//!   children are sorted lexicographically first.
//!
//! The partial-hash snapshot of the data hasher is `HashState::snapshot`,
//! which is a plain clone of the BLAKE3 state.

use std::cmp::Ordering;
use std::fmt;

use blake3::Hasher;

/// Size of a [`Digest`] in bytes.
pub const HASH_SIZE: usize = 32;

/// A 32-byte content digest.
///
/// Equality is byte equality; ordering is lexicographic over the bytes and is
/// the canonical order used everywhere child hashes are folded into a parent.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; HASH_SIZE]);

impl Digest {
    /// One-shot digest of raw bytes, without any tag or NUL framing.
    #[must_use]
    pub fn of(data: &[u8]) -> Self {
        Digest(*blake3::hash(data).as_bytes())
    }

    /// The raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Digest of an empty child set.
    ///
    /// Distinct from "no set at all": an empty container hashes to this, a
    /// missing conditional branch hashes to the `"<cond::empty>"` sentinel.
    #[must_use]
    pub fn empty_set() -> Self {
        Digest::of(b"<empty-set>")
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}..)", &hex::encode(self.0)[..12])
    }
}

/// Compares optional digests; an absent digest sorts before any present one.
#[must_use]
pub fn cmp_opt(a: Option<&Digest>, b: Option<&Digest>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// Incremental digest state.
#[derive(Clone)]
pub struct HashState(Hasher);

impl HashState {
    /// Opens a fresh state, absorbing `tag` (with NUL) when given.
    #[must_use]
    pub fn begin(tag: Option<&str>) -> Self {
        let mut state = HashState(Hasher::new());
        if let Some(tag) = tag {
            state.update_str(tag);
        }
        state
    }

    /// Absorbs raw bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    /// Absorbs a string including its terminating NUL.
    pub fn update_str(&mut self, s: &str) {
        self.0.update(s.as_bytes());
        self.0.update(&[0]);
    }

    /// Absorbs another digest's bytes.
    pub fn update_digest(&mut self, digest: &Digest) {
        self.0.update(digest.as_bytes());
    }

    /// Clones the state; the clone and the original diverge from here.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Finalises the state into a digest.
    #[must_use]
    pub fn finish(self) -> Digest {
        Digest(*self.0.finalize().as_bytes())
    }
}

/// Digest of a sorted sequence of digests (the multiset-folding rule).
///
/// The input is sorted in place; a single element still goes through the
/// digest (callers that want the verbatim single-member shortcut apply it
/// themselves).
#[must_use]
pub fn fold_sorted(mut hashes: Vec<Digest>) -> Digest {
    hashes.sort_unstable();
    let mut state = HashState::begin(None);
    for h in &hashes {
        state.update_digest(h);
    }
    state.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_framing_prevents_concatenation_collisions() {
        let mut a = HashState::begin(None);
        a.update_str("ab");
        a.update_str("c");
        let mut b = HashState::begin(None);
        b.update_str("a");
        b.update_str("bc");
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn snapshot_diverges_from_original() {
        let mut full = HashState::begin(Some("tag"));
        full.update_str("shared");
        let partial = full.snapshot();
        full.update_str("suffix");
        assert_ne!(partial.finish(), full.finish());

        let mut replay = HashState::begin(Some("tag"));
        replay.update_str("shared");
        let mut partial2 = HashState::begin(Some("tag"));
        partial2.update_str("shared");
        assert_eq!(replay.finish(), partial2.finish());
    }

    #[test]
    fn fold_is_order_insensitive() {
        let a = Digest::of(b"a");
        let b = Digest::of(b"b");
        let c = Digest::of(b"c");
        assert_eq!(fold_sorted(vec![a, b, c]), fold_sorted(vec![c, a, b]));
        assert_ne!(fold_sorted(vec![a, b]), fold_sorted(vec![a, c]));
    }

    #[test]
    fn absent_digest_sorts_first() {
        let d = Digest::of(b"x");
        assert_eq!(cmp_opt(None, Some(&d)), Ordering::Less);
        assert_eq!(cmp_opt(Some(&d), Some(&d)), Ordering::Equal);
    }
}
