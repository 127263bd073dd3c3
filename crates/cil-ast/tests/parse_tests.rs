// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs)]
//! Whole-policy parsing over a representative statement mix.

use cil_ast::{parse_policy, Flavor, NodeData, Ref};

const POLICY: &str = r#"
; A small but representative policy.
(mls true)
(handleunknown deny)
(policycap network_peer_controls)

(class file (read write open))
(classorder (unordered file))
(common base (ioctl))
(classcommon file base)
(classpermission rw)
(classpermissionset rw (file (read write)))

(sensitivity s0)
(sensitivity s1)
(sensitivityorder (s0 s1))
(category c0)
(categoryorder (c0))
(level low (s0))
(level high (s1 (range c0 c0)))
(levelrange full (low high))

(type proc_t)
(typeattribute domain)
(typeattributeset domain (proc_t))
(typebounds domain proc_t)
(role sysadm_r)
(roletype sysadm_r proc_t)
(user sysadm_u)
(userrole sysadm_u sysadm_r)
(userlevel sysadm_u low)
(userrange sysadm_u full)

(context proc_ctx (sysadm_u sysadm_r proc_t full))
(sid kernel)
(sidorder (kernel))
(sidcontext kernel proc_ctx)

(allow domain proc_t (file (read write)))
(auditallow domain proc_t (file (open)))
(allowx domain proc_t (ioctl file (range 0x1000 0x10ff)))
(typetransition domain proc_t file new_t)
(rangetransition domain proc_t file full)

(boolean secure_mode false)
(booleanif secure_mode
    (true
        (allow domain proc_t (file (read))))
    (false
        (allow domain proc_t (file (read write)))))

(block services
    (blockabstract services)
    (type svc_t))
(optional maybe
    (blockinherit services))
(in after services
    (allow svc_t svc_t (file (read))))

(macro log_rw ((type t))
    (allow t proc_t (file (read write))))
(call log_rw (proc_t))

(filecon "/bin/.*" file proc_ctx)
(filecon "/tmp" dir ())
(fsuse xattr ext4 proc_ctx)
(genfscon proc "/" proc_ctx)
(portcon tcp (8000 8100) proc_ctx)
(netifcon eth0 proc_ctx proc_ctx)
(nodecon 10.0.0.0 255.0.0.0 proc_ctx)
(ipaddr lo 127.0.0.1)
"#;

#[test]
fn representative_policy_parses_into_the_wrapped_tree() {
    let root = parse_policy(POLICY, "policy.cil").unwrap();
    assert_eq!(root.flavor(), Flavor::Root);
    assert_eq!(root.children.len(), 1);

    let src_info = &root.children[0];
    assert_eq!(src_info.flavor(), Flavor::SrcInfo);
    let NodeData::SrcInfo(info) = &src_info.data else {
        panic!("expected src-info payload");
    };
    assert_eq!(info.path, "policy.cil");
    assert_eq!(info.kind, "cil");
    assert!(src_info.children.len() > 40);
}

#[test]
fn lines_are_tracked_through_comments_and_nesting() {
    let root = parse_policy(POLICY, "policy.cil").unwrap();
    let stmts = &root.children[0].children;
    let mls = stmts.iter().find(|n| n.flavor() == Flavor::Mls).unwrap();
    assert_eq!(mls.line, 3);

    let booleanif = stmts
        .iter()
        .find(|n| n.flavor() == Flavor::BooleanIf)
        .unwrap();
    let true_branch = &booleanif.children[0];
    assert_eq!(true_branch.flavor(), Flavor::CondBlock);
    assert!(true_branch.children[0].line > booleanif.line);
}

#[test]
fn containers_nest_their_statements() {
    let root = parse_policy(POLICY, "policy.cil").unwrap();
    let stmts = &root.children[0].children;

    let block = stmts.iter().find(|n| n.flavor() == Flavor::Block).unwrap();
    assert_eq!(block.children.len(), 2);
    assert_eq!(block.children[1].flavor(), Flavor::Type);

    let macro_node = stmts.iter().find(|n| n.flavor() == Flavor::Macro).unwrap();
    assert_eq!(macro_node.children.len(), 1);
    assert_eq!(macro_node.children[0].flavor(), Flavor::AvRule);
}

#[test]
fn named_references_stay_names() {
    let root = parse_policy(POLICY, "policy.cil").unwrap();
    let stmts = &root.children[0].children;
    let sidcontext = stmts
        .iter()
        .find(|n| n.flavor() == Flavor::SidContext)
        .unwrap();
    let NodeData::SidContext(sc) = &sidcontext.data else {
        panic!("expected sidcontext payload");
    };
    assert_eq!(sc.context, Ref::Named("proc_ctx".to_owned()));
}

#[test]
fn extended_rules_take_the_avrulex_flavor() {
    let root = parse_policy(POLICY, "policy.cil").unwrap();
    let stmts = &root.children[0].children;
    assert!(stmts.iter().any(|n| n.flavor() == Flavor::AvRuleX));
    let allowx = stmts
        .iter()
        .find(|n| n.flavor() == Flavor::AvRuleX)
        .unwrap();
    assert_eq!(allowx.kind_keyword(), "allowx");
}
