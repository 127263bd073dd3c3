// SPDX-License-Identifier: Apache-2.0
//! Structured report: one JSON object per diff-tree node.
//!
//! Shape:
//! ```text
//! { "left":  {"flavor", "line", "hash"},
//!   "right": {"flavor", "line", "hash"},
//!   "diffs": [ {"side", "hash", "description", "node"}, … ],
//!   "children": [ … ] }
//! ```

use serde_json::{json, Value};

use cil_ast::json as ast_json;

use crate::diff::{DiffNode, DiffRecord, DiffTree};
use crate::node::CmpNode;

pub(crate) fn tree_value(tree: &DiffTree<'_>) -> Value {
    node_value(tree.root())
}

fn node_value(diff_node: &DiffNode<'_>) -> Value {
    json!({
        "left": side_value(diff_node.left()),
        "right": side_value(diff_node.right()),
        "diffs": diff_node.records().iter().map(record_value).collect::<Vec<_>>(),
        "children": diff_node.children().iter().map(node_value).collect::<Vec<_>>(),
    })
}

fn side_value(node: Option<&CmpNode<'_>>) -> Value {
    node.map_or(Value::Null, |node| {
        json!({
            "flavor": node.ast().kind_keyword(),
            "line": node.ast().line,
            "hash": node.full_hash().to_string(),
        })
    })
}

fn record_value(record: &DiffRecord<'_>) -> Value {
    json!({
        "side": record.side.label(),
        "hash": record.node.full_hash().to_string(),
        "description": record.description,
        "node": ast_json::node_value(record.node.ast()),
    })
}
