// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs)]
//! End-to-end comparison scenarios: parse → build → compare → report.

use cil_ast::parse_policy;
use cil_cmp::{build_root, compare_roots, CmpError, DiffTree};
use serde_json::Value;

fn with_diff<T>(left: &str, right: &str, check: impl FnOnce(&DiffTree<'_>) -> T) -> T {
    let left_ast = parse_policy(left, "left.cil").unwrap();
    let right_ast = parse_policy(right, "right.cil").unwrap();
    let left_root = build_root(&left_ast);
    let right_root = build_root(&right_ast);
    let diff = compare_roots(&left_root, &right_root).unwrap();
    check(&diff)
}

fn diff_value(left: &str, right: &str) -> Value {
    with_diff(left, right, |diff| diff.to_json())
}

/// Collects every record in the tree as `(side, flavor, depth)`.
fn collect_records(value: &Value) -> Vec<(String, String, usize)> {
    fn walk(value: &Value, depth: usize, out: &mut Vec<(String, String, usize)>) {
        for diff in value["diffs"].as_array().into_iter().flatten() {
            out.push((
                diff["side"].as_str().unwrap().to_owned(),
                diff["node"]["flavor"].as_str().unwrap().to_owned(),
                depth,
            ));
        }
        for child in value["children"].as_array().into_iter().flatten() {
            walk(child, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(value, 0, &mut out);
    out.sort();
    out
}

#[test]
fn s1_identical_policies_produce_an_empty_tree() {
    let policy = "(allow A B (C (D)))";
    with_diff(policy, policy, |diff| {
        assert!(diff.is_empty());
        assert_eq!(diff.left_hash(), diff.right_hash());
    });
}

#[test]
fn s2_permission_order_is_cosmetic() {
    with_diff(
        "(allow A B (C (D E)))",
        "(allow A B (C (E D)))",
        |diff| {
            assert!(diff.is_empty());
            assert_eq!(diff.left_hash(), diff.right_hash());
        },
    );
}

#[test]
fn s3_pure_addition_is_one_right_record_at_the_root() {
    let value = diff_value("", "(type T)");
    let records = collect_records(&value);
    assert_eq!(records, vec![("RIGHT".to_owned(), "type".to_owned(), 0)]);
    let node = &value["diffs"][0]["node"];
    assert_eq!(node["id"], "T");
}

#[test]
fn s4_renamed_optional_is_an_add_plus_delete() {
    let value = diff_value(
        "(optional o1 (allow A B (C (D))))",
        "(optional o2 (allow A B (C (D))))",
    );
    let records = collect_records(&value);
    assert_eq!(
        records,
        vec![
            ("LEFT".to_owned(), "optional".to_owned(), 0),
            ("RIGHT".to_owned(), "optional".to_owned(), 0),
        ]
    );
    // No descent happened: the two optionals live in different subsets.
    assert!(value["children"].as_array().unwrap().is_empty());
}

#[test]
fn s5_conditional_branch_change_descends_into_the_branch() {
    let value = diff_value(
        "(booleanif B (true (allow A B (C (D)))))",
        "(booleanif B (true (allow A B (C (E)))))",
    );
    // Root level: no records, one descent into the paired booleanifs.
    assert!(value["diffs"].as_array().unwrap().is_empty());
    let booleanif = &value["children"][0];
    assert_eq!(booleanif["left"]["flavor"], "booleanif");
    // One more descent into the true branch, where the rules differ.
    let branch = &booleanif["children"][0];
    assert_eq!(branch["left"]["flavor"], "true");
    let records = collect_records(branch);
    assert_eq!(
        records,
        vec![
            ("LEFT".to_owned(), "allow".to_owned(), 0),
            ("RIGHT".to_owned(), "allow".to_owned(), 0),
        ]
    );
}

#[test]
fn s6_similarity_pairs_highest_rate_first() {
    let value = diff_value(
        "(optional o (allow A B (C (r1))) (allow A B (C (r2))))\n(optional o (allow X Y (Z (r3))))",
        "(optional o (allow A B (C (r1))))\n(optional o (allow X Y (Z (r2))) (allow X Y (Z (r3))))",
    );
    // Two descents, one per greedy pair.
    assert_eq!(value["children"].as_array().unwrap().len(), 2);
    // The residue: (allow A B (C (r2))) deleted, (allow X Y (Z (r2))) added.
    let records = collect_records(&value);
    assert_eq!(
        records,
        vec![
            ("LEFT".to_owned(), "allow".to_owned(), 1),
            ("RIGHT".to_owned(), "allow".to_owned(), 1),
        ]
    );
}

#[test]
fn blocks_with_one_name_descend_instead_of_replacing() {
    let value = diff_value(
        "(block b (type t) (type u))",
        "(block b (type t) (type v))",
    );
    let block = &value["children"][0];
    assert_eq!(block["left"]["flavor"], "block");
    let records = collect_records(&value);
    assert_eq!(
        records,
        vec![
            ("LEFT".to_owned(), "type".to_owned(), 1),
            ("RIGHT".to_owned(), "type".to_owned(), 1),
        ]
    );
}

#[test]
fn duplicate_block_names_are_a_contract_breach() {
    let left_ast = parse_policy("(block b (type t))\n(block b (type u))", "left.cil").unwrap();
    let right_ast = parse_policy("(block b (type t))", "right.cil").unwrap();
    let left_root = build_root(&left_ast);
    let right_root = build_root(&right_ast);
    let err = compare_roots(&left_root, &right_root).unwrap_err();
    assert!(matches!(err, CmpError::MultiMemberDecl { keyword: "block", count: 2, .. }));
}

#[test]
fn source_wrappers_never_appear_as_context() {
    // Differences inside the file report at depth 0 even though the AST
    // nests them under root and source-info wrappers.
    let value = diff_value("(type t)", "(type u)");
    let records = collect_records(&value);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|(_, _, depth)| *depth == 0));
}

#[test]
fn rules_merge_by_source_target_not_by_permission() {
    // Same source/target pair, different permissions: both rules live in one
    // subset and surface as a replacement, not as unrelated statements.
    let value = diff_value("(allow A B (C (D)))", "(allow A B (C (D E)))");
    let records = collect_records(&value);
    assert_eq!(
        records,
        vec![
            ("LEFT".to_owned(), "allow".to_owned(), 0),
            ("RIGHT".to_owned(), "allow".to_owned(), 0),
        ]
    );
}

#[test]
fn json_report_shape_matches_the_contract() {
    let value = diff_value("(type t)", "(type t)\n(type u)");
    assert_eq!(value["left"]["flavor"], "<root>");
    assert_eq!(value["right"]["flavor"], "<root>");
    assert!(value["left"]["hash"].as_str().unwrap().len() == 64);
    assert_ne!(value["left"]["hash"], value["right"]["hash"]);
    let diff = &value["diffs"][0];
    assert_eq!(diff["side"], "RIGHT");
    assert_eq!(diff["description"], Value::Null);
    assert_eq!(diff["node"]["flavor"], "type");
    assert_eq!(diff["node"]["id"], "u");
    assert_eq!(diff["hash"].as_str().unwrap().len(), 64);
}

#[test]
fn text_report_frames_records_with_context() {
    let text = with_diff(
        "(block b (allow A B (C (D))))",
        "(block b)",
        |diff| {
            let mut out = Vec::new();
            diff.write_text(&mut out).unwrap();
            String::from_utf8(out).unwrap()
        },
    );
    assert!(text.starts_with("; Left hash: "));
    assert!(text.contains("; Deletion found"));
    assert!(text.contains("; Left context:"));
    assert!(text.contains("block node on line 1"));
    assert!(text.contains("; ---"));
    assert!(text.contains("(allow A B (C (D)))"));
    assert!(text.contains("; ==="));
}

#[test]
fn in_blocks_pair_by_target_block() {
    let value = diff_value(
        "(in b (allow A B (C (D))) (allow A B (X (Y))))",
        "(in b (allow A B (C (D))))",
    );
    // Same target block: the two `in` containers pair up and the comparison
    // descends instead of reporting whole-container add/delete.
    let child = &value["children"][0];
    assert_eq!(child["left"]["flavor"], "in");
    let records = collect_records(&value);
    assert_eq!(records, vec![("LEFT".to_owned(), "allow".to_owned(), 1)]);
}

#[test]
fn named_and_anonymous_contexts_differ() {
    let value = diff_value(
        "(portcon tcp 80 web_ctx)",
        "(portcon tcp 80 (u r t ((s0) (s0))))",
    );
    let records = collect_records(&value);
    assert_eq!(records.len(), 2);
}
