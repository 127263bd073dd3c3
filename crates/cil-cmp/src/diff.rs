// SPDX-License-Identifier: Apache-2.0
//! Diff tree: hierarchical record of additions and deletions.
//!
//! Side semantics, documented once and never re-interpreted: a `LEFT` record
//! means *present in the left input, absent from the right*: a deletion when
//! the right input is regarded as the newer one. `RIGHT` is the mirror image,
//! an addition.
//!
//! The tree owns its nodes and records and borrows comparison nodes from both
//! comparison trees, which must outlive it. Parent context is reconstructed
//! by the report writers while walking; nodes carry no parent pointers.

use std::io;

use serde_json::Value;

use crate::node::CmpNode;
use crate::report;
use crate::hash::Digest;

/// Which input a diff record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffSide {
    /// Present only in the left input (a deletion).
    Left,
    /// Present only in the right input (an addition).
    Right,
}

impl DiffSide {
    /// `"LEFT"` / `"RIGHT"`, as used in JSON output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DiffSide::Left => "LEFT",
            DiffSide::Right => "RIGHT",
        }
    }
}

/// One addition or deletion notice.
#[derive(Debug)]
pub struct DiffRecord<'a> {
    /// Which side the construct exists on.
    pub side: DiffSide,
    /// The construct itself.
    pub node: &'a CmpNode<'a>,
    /// Optional free-form annotation.
    pub description: Option<String>,
}

/// One context level of the diff tree.
#[derive(Debug)]
pub struct DiffNode<'a> {
    left: Option<&'a CmpNode<'a>>,
    right: Option<&'a CmpNode<'a>>,
    records: Vec<DiffRecord<'a>>,
    children: Vec<DiffNode<'a>>,
}

impl<'a> DiffNode<'a> {
    pub(crate) fn new(left: Option<&'a CmpNode<'a>>, right: Option<&'a CmpNode<'a>>) -> Self {
        DiffNode {
            left,
            right,
            records: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The left-side context node, when present.
    #[must_use]
    pub fn left(&self) -> Option<&'a CmpNode<'a>> {
        self.left
    }

    /// The right-side context node, when present.
    #[must_use]
    pub fn right(&self) -> Option<&'a CmpNode<'a>> {
        self.right
    }

    /// Records attached at this level.
    #[must_use]
    pub fn records(&self) -> &[DiffRecord<'a>] {
        &self.records
    }

    /// Deeper context levels under this one.
    #[must_use]
    pub fn children(&self) -> &[DiffNode<'a>] {
        &self.children
    }

    /// Appends a child context level and returns it for population.
    pub(crate) fn append_child(
        &mut self,
        left: Option<&'a CmpNode<'a>>,
        right: Option<&'a CmpNode<'a>>,
    ) -> &mut DiffNode<'a> {
        self.children.push(DiffNode::new(left, right));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Attaches a record at this level.
    pub(crate) fn append_record(
        &mut self,
        side: DiffSide,
        node: &'a CmpNode<'a>,
        description: Option<String>,
    ) {
        self.records.push(DiffRecord {
            side,
            node,
            description,
        });
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty() && self.children.iter().all(DiffNode::is_empty)
    }
}

/// The result of comparing two comparison-tree roots.
#[derive(Debug)]
pub struct DiffTree<'a> {
    root: DiffNode<'a>,
    left_hash: Digest,
    right_hash: Digest,
}

impl<'a> DiffTree<'a> {
    pub(crate) fn new(root: DiffNode<'a>, left_hash: Digest, right_hash: Digest) -> Self {
        DiffTree {
            root,
            left_hash,
            right_hash,
        }
    }

    /// The root context level.
    #[must_use]
    pub fn root(&self) -> &DiffNode<'a> {
        &self.root
    }

    /// Full hash of the left comparison root.
    #[must_use]
    pub fn left_hash(&self) -> &Digest {
        &self.left_hash
    }

    /// Full hash of the right comparison root.
    #[must_use]
    pub fn right_hash(&self) -> &Digest {
        &self.right_hash
    }

    /// Whether the tree records no difference at any level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Writes the plain-text report: hash header lines, then records
    /// depth-first with children before records at each level.
    ///
    /// # Errors
    /// Propagates I/O errors from `out`.
    pub fn write_text<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        report::text::write(self, out)
    }

    /// Renders the structured report.
    #[must_use]
    pub fn to_json(&self) -> Value {
        report::json::tree_value(self)
    }

    /// Writes the structured report, compact or pretty, with a trailing
    /// newline.
    ///
    /// # Errors
    /// Propagates I/O errors from `out`.
    pub fn write_json<W: io::Write>(&self, out: &mut W, pretty: bool) -> io::Result<()> {
        let value = self.to_json();
        if pretty {
            serde_json::to_writer_pretty(&mut *out, &value)?;
        } else {
            serde_json::to_writer(&mut *out, &value)?;
        }
        out.write_all(b"\n")
    }
}
