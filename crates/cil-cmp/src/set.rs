// SPDX-License-Identifier: Apache-2.0
//! Sets: the children of one container, grouped into subsets by partial hash.
//!
//! Subsets are kept in a `BTreeMap` keyed by partial hash, so iteration order
//! is the lexicographic digest order everywhere, so comparison output needs
//! no further sorting to be deterministic.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use cil_ast::CilNode;

use crate::diff::DiffNode;
use crate::hash::{cmp_opt, fold_sorted, Digest};
use crate::node::CmpNode;
use crate::sim::Sim;
use crate::subset::{CmpError, CmpSubset};

/// The prepared children of one container node.
#[derive(Debug)]
pub struct CmpSet<'a> {
    subsets: BTreeMap<Digest, CmpSubset<'a>>,
    full_hash: Digest,
}

impl<'a> CmpSet<'a> {
    /// Builds the set from a container's children.
    ///
    /// Children with equal full hashes are deduplicated silently; their diff
    /// contribution would be indistinguishable.
    #[must_use]
    pub(crate) fn build(children: &'a [CilNode]) -> Self {
        if children.is_empty() {
            return CmpSet {
                subsets: BTreeMap::new(),
                full_hash: Digest::empty_set(),
            };
        }
        let mut subsets: BTreeMap<Digest, CmpSubset<'a>> = BTreeMap::new();
        for child in children {
            let node = CmpNode::build(child);
            subsets
                .entry(*node.partial_hash())
                .or_insert_with(|| CmpSubset::new(node.flavor()))
                .insert(node);
        }
        let mut subset_hashes = Vec::with_capacity(subsets.len());
        for subset in subsets.values_mut() {
            subset.finalize();
            subset_hashes.push(*subset.full_hash());
        }
        let full_hash = fold_sorted(subset_hashes);
        CmpSet { subsets, full_hash }
    }

    /// The set's digest over its subset digests, sorted.
    #[must_use]
    pub fn full_hash(&self) -> &Digest {
        &self.full_hash
    }

    fn get(&self, partial: &Digest) -> Option<&CmpSubset<'a>> {
        self.subsets.get(partial)
    }

    /// Compares two sets subset-by-subset, recording differences under `diff`.
    pub(crate) fn compare(
        left: Option<&'a CmpSet<'a>>,
        right: Option<&'a CmpSet<'a>>,
        diff: &mut DiffNode<'a>,
    ) -> Result<(), CmpError> {
        if cmp_opt(
            left.map(CmpSet::full_hash),
            right.map(CmpSet::full_hash),
        ) == Ordering::Equal
        {
            return Ok(());
        }
        if let Some(l) = left {
            for (partial, left_subset) in &l.subsets {
                let right_subset = right.and_then(|r| r.get(partial));
                CmpSubset::compare(Some(left_subset), right_subset, diff)?;
            }
        }
        if let Some(r) = right {
            for (partial, right_subset) in &r.subsets {
                // Pairs present on both sides were handled by the left walk.
                if left.and_then(|l| l.get(partial)).is_none() {
                    CmpSubset::compare(None, Some(right_subset), diff)?;
                }
            }
        }
        Ok(())
    }

    /// Totals subset similarities across both sides.
    #[must_use]
    pub(crate) fn sim(left: Option<&CmpSet<'_>>, right: Option<&CmpSet<'_>>) -> Sim {
        let mut total = Sim::default();
        if let Some(l) = left {
            for (partial, left_subset) in &l.subsets {
                let right_subset = right.and_then(|r| r.get(partial));
                total.add(CmpSubset::sim(Some(left_subset), right_subset));
            }
        }
        if let Some(r) = right {
            for (partial, right_subset) in &r.subsets {
                if left.and_then(|l| l.get(partial)).is_none() {
                    total.add(CmpSubset::sim(None, Some(right_subset)));
                }
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use cil_ast::parse_policy;

    fn set_of(src: &str) -> (CilNode, Digest) {
        let ast = parse_policy(src, "<test>").unwrap();
        let hash = *CmpSet::build(&ast.children[0].children).full_hash();
        (ast, hash)
    }

    #[test]
    fn empty_set_has_the_sentinel_hash() {
        let (_ast, hash) = set_of("");
        assert_eq!(hash, Digest::empty_set());
    }

    #[test]
    fn set_hash_ignores_statement_order() {
        let (_a, h1) = set_of("(type a)\n(allow A B (C (D)))");
        let (_b, h2) = set_of("(allow A B (C (D)))\n(type a)");
        assert_eq!(h1, h2);
    }

    #[test]
    fn set_similarity_counts_by_full_hash() {
        let left = parse_policy("(type a)\n(type b)\n(type c)", "<l>").unwrap();
        let right = parse_policy("(type a)\n(type d)", "<r>").unwrap();
        let lset = CmpSet::build(&left.children[0].children);
        let rset = CmpSet::build(&right.children[0].children);
        let sim = CmpSet::sim(Some(&lset), Some(&rset));
        assert_eq!(sim.common, 1);
        assert_eq!(sim.left, 2);
        assert_eq!(sim.right, 1);
    }
}
