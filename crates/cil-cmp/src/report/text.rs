// SPDX-License-Identifier: Apache-2.0
//! Plain-text report: CIL with `;` comment framing.
//!
//! Children print before records at each level, so the deepest differences of
//! a context appear first. Context chains walk root-down and name each level
//! by construct keyword and source line.

use std::io;

use cil_ast::write as cil_write;

use crate::diff::{DiffNode, DiffRecord, DiffSide, DiffTree};

pub(crate) fn write<W: io::Write>(tree: &DiffTree<'_>, out: &mut W) -> io::Result<()> {
    writeln!(out, "; Left hash: {}", tree.left_hash())?;
    writeln!(out, "; Right hash: {}", tree.right_hash())?;
    let mut chain = Vec::new();
    node(tree.root(), &mut chain, out)
}

fn node<'t, 'a, W: io::Write>(
    diff_node: &'t DiffNode<'a>,
    chain: &mut Vec<&'t DiffNode<'a>>,
    out: &mut W,
) -> io::Result<()> {
    chain.push(diff_node);
    for child in diff_node.children() {
        node(child, chain, out)?;
    }
    for record in diff_node.records() {
        print_record(record, chain, out)?;
    }
    chain.pop();
    Ok(())
}

fn print_record<W: io::Write>(
    record: &DiffRecord<'_>,
    chain: &[&DiffNode<'_>],
    out: &mut W,
) -> io::Result<()> {
    let (verdict, marker) = match record.side {
        DiffSide::Left => ("Deletion", "---"),
        DiffSide::Right => ("Addition", "+++"),
    };
    writeln!(out, "; {verdict} found")?;
    if let Some(description) = &record.description {
        writeln!(out, "; Description: {description}")?;
    }
    writeln!(out, "; Hash: {}", record.node.full_hash())?;
    writeln!(out, "; Left context:")?;
    print_context(chain, DiffSide::Left, out)?;
    writeln!(out, "; Right context:")?;
    print_context(chain, DiffSide::Right, out)?;
    writeln!(out, "; {marker}")?;
    writeln!(out, "{}", cil_write::render(record.node.ast()))?;
    writeln!(out, "; ===")
}

fn print_context<W: io::Write>(
    chain: &[&DiffNode<'_>],
    side: DiffSide,
    out: &mut W,
) -> io::Result<()> {
    for level in chain {
        let context = match side {
            DiffSide::Left => level.left(),
            DiffSide::Right => level.right(),
        };
        if let Some(node) = context {
            writeln!(
                out,
                "; \t{} node on line {}",
                node.ast().kind_keyword(),
                node.ast().line
            )?;
        }
    }
    Ok(())
}
