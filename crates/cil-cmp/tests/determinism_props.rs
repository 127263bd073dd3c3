// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs)]
//! Property tests for the comparison invariants: determinism, reflexivity,
//! side symmetry and order insensitivity.

use cil_ast::parse_policy;
use cil_cmp::{build_root, compare_roots};
use proptest::prelude::*;
use serde_json::Value;

fn name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["alpha", "beta", "gamma", "delta"])
}

fn perms() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["(read)", "(write)", "(read write)", "(open read)"])
}

fn rule() -> impl Strategy<Value = String> {
    (name(), name(), perms()).prop_map(|(src, tgt, perms)| format!("(allow {src} {tgt} (file {perms}))"))
}

fn statement() -> impl Strategy<Value = String> {
    prop_oneof![
        name().prop_map(|n| format!("(type {n})")),
        rule(),
        (name(), rule()).prop_map(|(n, rule)| format!("(optional {n} {rule})")),
        (name(), rule()).prop_map(|(n, rule)| format!("(booleanif {n} (true {rule}))")),
        (name(), name(), name())
            .prop_map(|(attr, a, b)| format!("(typeattributeset {attr} (and {a} {b}))")),
    ]
}

fn policy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(statement(), 0..8)
}

fn compare_to_json(left: &str, right: &str) -> Value {
    let left_ast = parse_policy(left, "left.cil").unwrap();
    let right_ast = parse_policy(right, "right.cil").unwrap();
    let left_root = build_root(&left_ast);
    let right_root = build_root(&right_ast);
    compare_roots(&left_root, &right_root).unwrap().to_json()
}

/// Flattens a diff tree into a sorted multiset of `(side, hash)` records.
fn record_set(value: &Value) -> Vec<(String, String)> {
    fn walk(value: &Value, out: &mut Vec<(String, String)>) {
        for diff in value["diffs"].as_array().into_iter().flatten() {
            out.push((
                diff["side"].as_str().unwrap().to_owned(),
                diff["hash"].as_str().unwrap().to_owned(),
            ));
        }
        for child in value["children"].as_array().into_iter().flatten() {
            walk(child, out);
        }
    }
    let mut out = Vec::new();
    walk(value, &mut out);
    out.sort();
    out
}

proptest! {
    #[test]
    fn comparison_is_deterministic(left in policy(), right in policy()) {
        let left = left.join("\n");
        let right = right.join("\n");
        let first = compare_to_json(&left, &right).to_string();
        let second = compare_to_json(&left, &right).to_string();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn self_comparison_is_empty(stmts in policy()) {
        let text = stmts.join("\n");
        let ast = parse_policy(&text, "policy.cil").unwrap();
        let root = build_root(&ast);
        let other_ast = parse_policy(&text, "policy.cil").unwrap();
        let other_root = build_root(&other_ast);
        let diff = compare_roots(&root, &other_root).unwrap();
        prop_assert!(diff.is_empty());
        prop_assert_eq!(diff.left_hash(), diff.right_hash());
    }

    #[test]
    fn swapping_inputs_swaps_sides(left in policy(), right in policy()) {
        let left = left.join("\n");
        let right = right.join("\n");
        let forward = compare_to_json(&left, &right);
        let backward = compare_to_json(&right, &left);
        prop_assert_eq!(forward["left"]["hash"].clone(), backward["right"]["hash"].clone());
        prop_assert_eq!(forward["right"]["hash"].clone(), backward["left"]["hash"].clone());

        let mut swapped: Vec<(String, String)> = record_set(&backward)
            .into_iter()
            .map(|(side, hash)| {
                let side = if side == "LEFT" { "RIGHT" } else { "LEFT" };
                (side.to_owned(), hash)
            })
            .collect();
        swapped.sort();
        prop_assert_eq!(record_set(&forward), swapped);
    }

    #[test]
    fn statement_order_never_counts_as_a_difference(stmts in policy()) {
        let forward = stmts.join("\n");
        let reversed: Vec<String> = stmts.iter().rev().cloned().collect();
        let reversed = reversed.join("\n");
        let value = compare_to_json(&forward, &reversed);
        prop_assert!(record_set(&value).is_empty());
        prop_assert_eq!(value["left"]["hash"].clone(), value["right"]["hash"].clone());
    }
}
