// SPDX-License-Identifier: Apache-2.0
//! Subsets: merge-eligible siblings sharing one partial hash, and the
//! per-flavor comparison strategies over them.
//!
//! Strategy selection:
//! - `block`/`macro`, **single-child**: a declaration name is unique within
//!   its container, so the subset holds at most one member per side; both
//!   present means descend into a fresh diff level, one present means one
//!   record. Two members is a breach of the AST contract, not a user error.
//! - `root`/`src-info`, **single-child-jump**: as above, but transparent;
//!   the descent continues on the caller's diff level so the wrappers never
//!   show up as report context.
//! - `optional`/`in`/`booleanif`/`tunableif`, **similarity matching**:
//!   members lack stable identity across sides, so unmatched members are
//!   paired greedily by descending similarity rate and each pair is compared
//!   in a fresh diff level; the residue becomes plain records.
//! - everything else, **bag difference** by full hash, no recursion.

use cil_ast::Flavor;
use thiserror::Error;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::diff::{DiffNode, DiffSide};
use crate::hash::{cmp_opt, fold_sorted, Digest};
use crate::node::CmpNode;
use crate::sim::Sim;

/// Structural invariant violations surfaced by comparison.
///
/// These indicate a breach of the AST contract (the kind of input the CIL
/// compiler itself would reject), never a legitimate policy difference. No
/// partial diff is produced when one is raised.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CmpError {
    /// A single-child subset held more than one member: two same-named
    /// declarations with different bodies in one container.
    #[error("duplicate '{keyword}' declaration near line {line}: {count} same-named declarations in one container")]
    MultiMemberDecl {
        /// Statement keyword of the offending flavor.
        keyword: &'static str,
        /// Source line of one of the members.
        line: u32,
        /// Number of members found.
        count: usize,
    },
}

enum Strategy {
    Default,
    SingleChild,
    SingleChildJump,
    Similarity,
}

fn strategy(flavor: Flavor) -> Strategy {
    match flavor {
        Flavor::Block | Flavor::Macro => Strategy::SingleChild,
        Flavor::Root | Flavor::SrcInfo => Strategy::SingleChildJump,
        Flavor::Optional | Flavor::In | Flavor::BooleanIf | Flavor::TunableIf => {
            Strategy::Similarity
        }
        _ => Strategy::Default,
    }
}

/// Siblings sharing one partial hash, keyed by full hash.
#[derive(Debug)]
pub struct CmpSubset<'a> {
    flavor: Flavor,
    items: BTreeMap<Digest, CmpNode<'a>>,
    full_hash: Digest,
}

impl<'a> CmpSubset<'a> {
    pub(crate) fn new(flavor: Flavor) -> Self {
        CmpSubset {
            flavor,
            items: BTreeMap::new(),
            // Placeholder until `finalize`.
            full_hash: Digest::empty_set(),
        }
    }

    /// Inserts a member; a member with an identical full hash is dropped.
    pub(crate) fn insert(&mut self, node: CmpNode<'a>) {
        self.items.entry(*node.full_hash()).or_insert(node);
    }

    /// Computes the subset digest: a sole member's hash verbatim, otherwise
    /// the fold of all member hashes (already sorted by the map order).
    pub(crate) fn finalize(&mut self) {
        let mut keys = self.items.keys();
        self.full_hash = match (keys.next(), keys.next()) {
            (Some(sole), None) => *sole,
            _ => fold_sorted(self.items.keys().copied().collect()),
        };
    }

    /// The subset's flavor (shared by every member).
    #[must_use]
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Subset digest over the member digests.
    #[must_use]
    pub fn full_hash(&self) -> &Digest {
        &self.full_hash
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the subset holds no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn contains(&self, full: &Digest) -> bool {
        self.items.contains_key(full)
    }

    fn sole_member(&self) -> Option<&CmpNode<'a>> {
        self.items.values().next()
    }

    /// Compares two same-partial subsets with the flavor's strategy.
    pub(crate) fn compare(
        left: Option<&'a CmpSubset<'a>>,
        right: Option<&'a CmpSubset<'a>>,
        diff: &mut DiffNode<'a>,
    ) -> Result<(), CmpError> {
        let Some(repr) = left.or(right) else {
            return Ok(());
        };
        debug_assert!(
            left.is_none() || right.is_none() || left.map(|s| s.flavor) == right.map(|s| s.flavor),
            "compared subsets must share a flavor"
        );
        if cmp_opt(
            left.map(CmpSubset::full_hash),
            right.map(CmpSubset::full_hash),
        ) == Ordering::Equal
        {
            return Ok(());
        }
        match strategy(repr.flavor) {
            Strategy::Default => {
                Self::bag_difference(left, right, diff);
                Ok(())
            }
            Strategy::SingleChild => {
                Self::check_single(left)?;
                Self::check_single(right)?;
                let ln = left.and_then(CmpSubset::sole_member);
                let rn = right.and_then(CmpSubset::sole_member);
                match (ln, rn) {
                    (Some(l), Some(r)) => {
                        let child = diff.append_child(Some(l), Some(r));
                        CmpNode::compare(Some(l), Some(r), child)
                    }
                    (Some(l), None) => {
                        diff.append_record(DiffSide::Left, l, None);
                        Ok(())
                    }
                    (None, Some(r)) => {
                        diff.append_record(DiffSide::Right, r, None);
                        Ok(())
                    }
                    (None, None) => Ok(()),
                }
            }
            Strategy::SingleChildJump => {
                Self::check_single(left)?;
                Self::check_single(right)?;
                CmpNode::compare(
                    left.and_then(CmpSubset::sole_member),
                    right.and_then(CmpSubset::sole_member),
                    diff,
                )
            }
            Strategy::Similarity => Self::similarity_match(left, right, diff),
        }
    }

    fn check_single(subset: Option<&CmpSubset<'a>>) -> Result<(), CmpError> {
        let Some(subset) = subset else {
            return Ok(());
        };
        if subset.len() <= 1 {
            return Ok(());
        }
        let line = subset.sole_member().map_or(0, |n| n.ast().line);
        Err(CmpError::MultiMemberDecl {
            keyword: subset.flavor.keyword(),
            line,
            count: subset.len(),
        })
    }

    fn bag_difference(
        left: Option<&'a CmpSubset<'a>>,
        right: Option<&'a CmpSubset<'a>>,
        diff: &mut DiffNode<'a>,
    ) {
        if let Some(l) = left {
            for (full, node) in &l.items {
                if !right.is_some_and(|r| r.contains(full)) {
                    diff.append_record(DiffSide::Left, node, None);
                }
            }
        }
        if let Some(r) = right {
            for (full, node) in &r.items {
                if !left.is_some_and(|l| l.contains(full)) {
                    diff.append_record(DiffSide::Right, node, None);
                }
            }
        }
    }

    /// Greedy pairing of full-hash-unique members by descending similarity
    /// rate; ties fall back to the stable pair enumeration order. Matched
    /// pairs are compared in a fresh diff level, the residue becomes records.
    fn similarity_match(
        left: Option<&'a CmpSubset<'a>>,
        right: Option<&'a CmpSubset<'a>>,
        diff: &mut DiffNode<'a>,
    ) -> Result<(), CmpError> {
        let unique_left: Vec<&CmpNode<'a>> = left.map_or_else(Vec::new, |l| {
            l.items
                .iter()
                .filter(|(full, _)| !right.is_some_and(|r| r.contains(full)))
                .map(|(_, node)| node)
                .collect()
        });
        let unique_right: Vec<&CmpNode<'a>> = right.map_or_else(Vec::new, |r| {
            r.items
                .iter()
                .filter(|(full, _)| !left.is_some_and(|l| l.contains(full)))
                .map(|(_, node)| node)
                .collect()
        });

        if unique_left.is_empty() || unique_right.is_empty() {
            for node in unique_left {
                diff.append_record(DiffSide::Left, node, None);
            }
            for node in unique_right {
                diff.append_record(DiffSide::Right, node, None);
            }
            return Ok(());
        }

        let mut pairs = Vec::with_capacity(unique_left.len() * unique_right.len());
        for (li, l) in unique_left.iter().copied().enumerate() {
            for (ri, r) in unique_right.iter().copied().enumerate() {
                pairs.push((CmpNode::sim(Some(l), Some(r)), li, ri));
            }
        }
        // Stable sort: equal rates keep the flat enumeration order.
        pairs.sort_by(|a, b| b.0.cmp_rate(&a.0));

        let mut left_matched = vec![false; unique_left.len()];
        let mut right_matched = vec![false; unique_right.len()];
        for (_, li, ri) in pairs {
            if left_matched[li] || right_matched[ri] {
                continue;
            }
            left_matched[li] = true;
            right_matched[ri] = true;
            let (l, r) = (unique_left[li], unique_right[ri]);
            let child = diff.append_child(Some(l), Some(r));
            CmpNode::compare(Some(l), Some(r), child)?;
        }
        for (li, node) in unique_left.iter().copied().enumerate() {
            if !left_matched[li] {
                diff.append_record(DiffSide::Left, node, None);
            }
        }
        for (ri, node) in unique_right.iter().copied().enumerate() {
            if !right_matched[ri] {
                diff.append_record(DiffSide::Right, node, None);
            }
        }
        Ok(())
    }

    /// Similarity of two same-partial subsets: equal digests count every
    /// member as common, otherwise members are matched by full hash.
    #[must_use]
    pub(crate) fn sim(left: Option<&CmpSubset<'_>>, right: Option<&CmpSubset<'_>>) -> Sim {
        if left.is_none() && right.is_none() {
            return Sim::default();
        }
        if cmp_opt(
            left.map(CmpSubset::full_hash),
            right.map(CmpSubset::full_hash),
        ) == Ordering::Equal
        {
            return Sim {
                common: left.map_or(0, CmpSubset::len),
                left: 0,
                right: 0,
            };
        }
        let mut sim = Sim::default();
        if let Some(l) = left {
            for full in l.items.keys() {
                if right.is_some_and(|r| r.contains(full)) {
                    sim.common += 1;
                } else {
                    sim.left += 1;
                }
            }
        }
        if let Some(r) = right {
            for full in r.items.keys() {
                if !left.is_some_and(|l| l.contains(full)) {
                    sim.right += 1;
                }
            }
        }
        sim
    }
}
