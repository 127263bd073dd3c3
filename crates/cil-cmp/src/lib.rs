// SPDX-License-Identifier: Apache-2.0
//! cil-cmp: structural comparison engine for SELinux CIL policy trees.
//!
//! The engine canonicalises each parsed policy into a content-addressed tree
//! of comparison nodes and diffs the two trees top-down. Cosmetic differences
//! (statement order in unordered contexts, anonymous-construct naming,
//! formatting) hash identically and so never surface; what remains is a
//! hierarchical record of additions and deletions.
//!
//! # Determinism
//!
//! For one input pair the output is byte-identical across runs: all multiset
//! digests fold sorted child hashes, containers are walked in digest order,
//! and similarity pairing breaks rate ties by a stable enumeration index.
//!
//! # Typical use
//!
//! ```
//! use cil_ast::parse_policy;
//! use cil_cmp::{build_root, compare_roots};
//!
//! let left = parse_policy("(type t)", "left.cil")?;
//! let right = parse_policy("(type t)\n(type u)", "right.cil")?;
//! let left_root = build_root(&left);
//! let right_root = build_root(&right);
//! let diff = compare_roots(&left_root, &right_root)?;
//! assert!(!diff.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

mod data;
mod diff;
mod hash;
mod node;
mod report;
mod set;
mod sim;
mod subset;

pub use diff::{DiffNode, DiffRecord, DiffSide, DiffTree};
pub use hash::{cmp_opt, Digest, HashState, HASH_SIZE};
pub use node::CmpNode;
pub use set::CmpSet;
pub use sim::Sim;
pub use subset::{CmpError, CmpSubset};

use cil_ast::CilNode;
use tracing::debug;

/// Builds the comparison tree for one parsed policy.
///
/// The AST is borrowed read-only and must outlive the returned root.
#[must_use]
pub fn build_root(ast: &CilNode) -> CmpNode<'_> {
    let root = CmpNode::build(ast);
    debug!(hash = %root.full_hash(), "comparison root built");
    root
}

/// Compares two comparison roots into a diff tree.
///
/// Both roots must outlive the returned tree; the tree borrows their nodes.
///
/// # Errors
/// Returns [`CmpError`] on a structural invariant violation (an AST contract
/// breach such as duplicate same-named declarations in one container). No
/// partial diff is produced.
pub fn compare_roots<'a>(
    left: &'a CmpNode<'a>,
    right: &'a CmpNode<'a>,
) -> Result<DiffTree<'a>, CmpError> {
    let mut root = DiffNode::new(Some(left), Some(right));
    CmpNode::compare(Some(left), Some(right), &mut root)?;
    let tree = DiffTree::new(root, *left.full_hash(), *right.full_hash());
    debug!(
        left = %tree.left_hash(),
        right = %tree.right_hash(),
        empty = tree.is_empty(),
        "comparison finished"
    );
    Ok(tree)
}
