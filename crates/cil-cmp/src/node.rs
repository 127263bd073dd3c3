// SPDX-License-Identifier: Apache-2.0
//! Comparison nodes: one per AST node, carrying identity and merge-key
//! digests plus flavor-specific derived state.
//!
//! - Leaf flavors carry the data hasher's digests verbatim.
//! - Container flavors additionally build the child [`CmpSet`]; their full
//!   hash binds data and children (`H(data_full ‖ set_full)`) while the
//!   partial hash stays the data hasher's merge key.
//! - Conditional containers (`booleanif`, `tunableif`) hold the two branch
//!   nodes at fixed positions (false, true); their full hash folds the data
//!   digest, then per branch a position tag followed by the branch's set hash
//!   or the `"<cond::empty>"` sentinel. An empty branch set and an absent
//!   branch therefore hash apart.

use std::cmp::Ordering;

use cil_ast::{CilNode, Flavor, NodeData};

use crate::data::hash_node_data;
use crate::diff::DiffNode;
use crate::hash::{cmp_opt, Digest, HashState};
use crate::set::CmpSet;
use crate::sim::Sim;
use crate::subset::CmpError;

const COND_TAGS: [&str; 2] = ["<cond::false>", "<cond::true>"];
const COND_EMPTY: &str = "<cond::empty>";

/// One AST node prepared for comparison.
#[derive(Debug)]
pub struct CmpNode<'a> {
    ast: &'a CilNode,
    full_hash: Digest,
    partial_hash: Digest,
    state: NodeState<'a>,
}

#[derive(Debug)]
enum NodeState<'a> {
    Leaf,
    Container(CmpSet<'a>),
    /// Branch nodes at positions `[false, true]`.
    Conditional([Option<Box<CmpNode<'a>>>; 2]),
}

impl<'a> CmpNode<'a> {
    /// Builds the comparison node for `ast`, recursively preparing children.
    #[must_use]
    pub fn build(ast: &'a CilNode) -> Self {
        let data = hash_node_data(&ast.data);
        let flavor = ast.flavor();
        if flavor.is_conditional() {
            let mut branches: [Option<Box<CmpNode<'a>>>; 2] = [None, None];
            for child in &ast.children {
                if let NodeData::CondBlock(block) = &child.data {
                    branches[usize::from(block.value)] = Some(Box::new(CmpNode::build(child)));
                }
            }
            let mut h = HashState::begin(None);
            h.update_digest(&data.full);
            for (branch, tag) in branches.iter().zip(COND_TAGS) {
                h.update_str(tag);
                match branch {
                    Some(node) => match node.child_set() {
                        Some(set) => h.update_digest(set.full_hash()),
                        None => h.update_str(COND_EMPTY),
                    },
                    None => h.update_str(COND_EMPTY),
                }
            }
            CmpNode {
                ast,
                full_hash: h.finish(),
                partial_hash: data.partial,
                state: NodeState::Conditional(branches),
            }
        } else if flavor.is_container() {
            let set = CmpSet::build(&ast.children);
            let mut h = HashState::begin(None);
            h.update_digest(&data.full);
            h.update_digest(set.full_hash());
            CmpNode {
                ast,
                full_hash: h.finish(),
                partial_hash: data.partial,
                state: NodeState::Container(set),
            }
        } else {
            CmpNode {
                ast,
                full_hash: data.full,
                partial_hash: data.partial,
                state: NodeState::Leaf,
            }
        }
    }

    /// The underlying AST node.
    #[must_use]
    pub fn ast(&self) -> &'a CilNode {
        self.ast
    }

    /// The node's flavor.
    #[must_use]
    pub fn flavor(&self) -> Flavor {
        self.ast.flavor()
    }

    /// Identity digest (data plus derived state).
    #[must_use]
    pub fn full_hash(&self) -> &Digest {
        &self.full_hash
    }

    /// Merge-key digest used for sibling grouping.
    #[must_use]
    pub fn partial_hash(&self) -> &Digest {
        &self.partial_hash
    }

    /// The child set, for container flavors.
    #[must_use]
    pub fn child_set(&self) -> Option<&CmpSet<'a>> {
        match &self.state {
            NodeState::Container(set) => Some(set),
            _ => None,
        }
    }

    fn branch(&self, value: bool) -> Option<&CmpNode<'a>> {
        match &self.state {
            NodeState::Conditional(branches) => branches[usize::from(value)].as_deref(),
            _ => None,
        }
    }

    /// Compares two same-flavor nodes, recording differences under `diff`.
    ///
    /// Leaf flavors need no work here: the caller decided to descend and the
    /// difference is already recorded at the level above. Containers compare
    /// their child sets; conditionals compare branches pairwise, descending
    /// into a child diff node per differing branch.
    pub fn compare(
        left: Option<&'a CmpNode<'a>>,
        right: Option<&'a CmpNode<'a>>,
        diff: &mut DiffNode<'a>,
    ) -> Result<(), CmpError> {
        let Some(repr) = left.or(right) else {
            return Ok(());
        };
        debug_assert!(
            left.is_none() || right.is_none() || left.map(CmpNode::flavor) == right.map(CmpNode::flavor),
            "compared nodes must share a flavor"
        );
        match &repr.state {
            NodeState::Leaf => Ok(()),
            NodeState::Container(_) => CmpSet::compare(
                left.and_then(CmpNode::child_set),
                right.and_then(CmpNode::child_set),
                diff,
            ),
            NodeState::Conditional(_) => {
                for value in [false, true] {
                    let lb = left.and_then(|n| n.branch(value));
                    let rb = right.and_then(|n| n.branch(value));
                    if lb.is_none() && rb.is_none() {
                        continue;
                    }
                    if cmp_opt(lb.map(CmpNode::full_hash), rb.map(CmpNode::full_hash))
                        == Ordering::Equal
                    {
                        continue;
                    }
                    let child = diff.append_child(lb, rb);
                    CmpNode::compare(lb, rb, child)?;
                }
                Ok(())
            }
        }
    }

    /// Similarity between two same-flavor nodes.
    #[must_use]
    pub fn sim(left: Option<&CmpNode<'_>>, right: Option<&CmpNode<'_>>) -> Sim {
        let Some(repr) = left.or(right) else {
            return Sim::default();
        };
        match &repr.state {
            NodeState::Leaf => match (left, right) {
                (Some(l), Some(r)) if l.full_hash == r.full_hash => Sim::matched(),
                _ => Sim {
                    common: 0,
                    left: usize::from(left.is_some()),
                    right: usize::from(right.is_some()),
                },
            },
            NodeState::Container(_) => CmpSet::sim(
                left.and_then(CmpNode::child_set),
                right.and_then(CmpNode::child_set),
            ),
            NodeState::Conditional(_) => {
                let mut total = Sim::default();
                for value in [false, true] {
                    total.add(CmpNode::sim(
                        left.and_then(|n| n.branch(value)),
                        right.and_then(|n| n.branch(value)),
                    ));
                }
                total
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use cil_ast::parse_policy;

    fn build(src: &str) -> (CilNode, Digest) {
        let ast = parse_policy(src, "<test>").unwrap();
        let hash = *CmpNode::build(&ast).full_hash();
        (ast, hash)
    }

    fn root_hash(src: &str) -> Digest {
        build(src).1
    }

    #[test]
    fn container_hash_covers_children() {
        assert_eq!(
            root_hash("(block b (type t))"),
            root_hash("(block b (type t))")
        );
        assert_ne!(
            root_hash("(block b (type t))"),
            root_hash("(block b (type u))")
        );
        assert_ne!(root_hash("(block b)"), root_hash("(block c)"));
    }

    #[test]
    fn sibling_order_is_irrelevant() {
        assert_eq!(
            root_hash("(type a)\n(type b)"),
            root_hash("(type b)\n(type a)")
        );
    }

    #[test]
    fn duplicate_siblings_collapse() {
        assert_eq!(
            root_hash("(type a)\n(type a)"),
            root_hash("(type a)")
        );
    }

    #[test]
    fn empty_branch_differs_from_absent_branch() {
        let with_empty = root_hash("(booleanif b (true))");
        let without = root_hash("(booleanif b)");
        assert_ne!(with_empty, without);
    }

    #[test]
    fn branch_positions_are_fixed() {
        let true_rule = root_hash("(booleanif b (true (allow A B (C (D)))))");
        let false_rule = root_hash("(booleanif b (false (allow A B (C (D)))))");
        assert_ne!(true_rule, false_rule);
    }

    #[test]
    fn conditional_sim_counts_branch_members() {
        let left = parse_policy(
            "(booleanif b (true (allow A B (C (D))) (allow A B (X (Y)))))",
            "<l>",
        )
        .unwrap();
        let right = parse_policy("(booleanif b (true (allow A B (C (D)))))", "<r>").unwrap();
        let l = CmpNode::build(&left.children[0].children[0]);
        let r = CmpNode::build(&right.children[0].children[0]);
        let sim = CmpNode::sim(Some(&l), Some(&r));
        assert_eq!(sim.common, 1);
        assert_eq!(sim.left, 1);
        assert_eq!(sim.right, 0);
    }
}
