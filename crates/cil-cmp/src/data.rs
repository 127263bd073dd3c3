// SPDX-License-Identifier: Apache-2.0
//! Per-flavor data hashing: `(full, partial)` digests of a node's own fields.
//!
//! Absorption rules, per flavor:
//! - the digest opens with the flavor's `hash_tag`;
//! - fields are absorbed in a fixed order: strings with the NUL rule,
//!   fixed-width fields as little-endian bytes (`u32` unless noted);
//! - a snapshot taken mid-absorption becomes the partial hash (the merge key
//!   for order-insensitive sibling pairing); flavors without a snapshot get
//!   `partial == full`;
//! - nested anonymous payloads fold in the nested construct's full digest,
//!   named references absorb the referring string itself;
//! - expression operands and unordered string lists are hashed element-wise
//!   and sorted before folding, so equal multisets hash equal.
//!
//! Anonymous constructs absorb a `"<anonymous::kind>"` sentinel in place of a
//! name: two anonymous levels with identical fields share a partial hash on
//! purpose.

use cil_ast::{
    AvPerms, CallArg, ClassPerms, ClassPermsItem, Context, Expr, ExprItem, Flavor, IpAddrDecl,
    Level, LevelRange, NodeData, PermX, Ref,
};

use crate::hash::{Digest, HashState};

/// The data hasher's result for one node.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DataHash {
    /// Identity of the node's own fields.
    pub full: Digest,
    /// Merge key for sibling grouping.
    pub partial: Digest,
}

impl DataHash {
    fn finish(full: HashState) -> Self {
        let full = full.finish();
        DataHash {
            full,
            partial: full,
        }
    }

    fn finish_split(full: HashState, partial: HashState) -> Self {
        DataHash {
            full: full.finish(),
            partial: partial.finish(),
        }
    }
}

fn tagged(flavor: Flavor) -> HashState {
    HashState::begin(Some(flavor.hash_tag()))
}

fn u32_le(h: &mut HashState, value: u32) {
    h.update(&value.to_le_bytes());
}

fn name_decl(flavor: Flavor, name: &str) -> DataHash {
    let mut h = tagged(flavor);
    h.update_str(name);
    DataHash::finish(h)
}

fn anon_name(h: &mut HashState, name: Option<&str>, sentinel: &str) {
    match name {
        Some(name) => h.update_str(name),
        None => h.update_str(sentinel),
    }
}

/// Computes the data hash of a node payload.
#[allow(clippy::too_many_lines)]
pub(crate) fn hash_node_data(data: &NodeData) -> DataHash {
    let flavor = data.flavor();
    match data {
        NodeData::Root | NodeData::SrcInfo(_) => DataHash::finish(tagged(flavor)),
        NodeData::CondBlock(b) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, u32::from(b.value));
            DataHash::finish(h)
        }
        NodeData::AvRule(r) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, u32::from(r.is_extended()));
            u32_le(&mut h, r.kind as u32);
            h.update_str(&r.source);
            h.update_str(&r.target);
            let partial = h.snapshot();
            match &r.perms {
                AvPerms::Class(item) => h.update_digest(&class_perms_item_hash(item)),
                AvPerms::Extended(px) => absorb_ref(&mut h, px, perm_x_full),
            }
            DataHash::finish_split(h, partial)
        }
        NodeData::DenyRule(r) => {
            let mut h = tagged(flavor);
            h.update_str(&r.source);
            h.update_str(&r.target);
            let partial = h.snapshot();
            h.update_digest(&class_perms_item_hash(&r.perms));
            DataHash::finish_split(h, partial)
        }
        NodeData::Call(c) => {
            let mut h = tagged(flavor);
            h.update_str(&c.macro_name);
            h.update_digest(&call_args_hash(&c.args));
            DataHash::finish(h)
        }
        NodeData::Macro(m) => {
            let mut h = tagged(flavor);
            h.update_str(&m.name);
            let partial = h.snapshot();
            for param in &m.params {
                u32_le(&mut h, param.flavor as u32);
                h.update_str(&param.name);
            }
            DataHash::finish_split(h, partial)
        }
        NodeData::Perm(name)
        | NodeData::MapPerm(name)
        | NodeData::Common(name)
        | NodeData::Class(name)
        | NodeData::ClassMap(name)
        | NodeData::ClassPermission(name)
        | NodeData::Block(name)
        | NodeData::Optional(name)
        | NodeData::Sensitivity(name)
        | NodeData::SensitivityAlias(name)
        | NodeData::Category(name)
        | NodeData::CategoryAlias(name)
        | NodeData::PolicyCap(name)
        | NodeData::Role(name)
        | NodeData::RoleAttribute(name)
        | NodeData::Sid(name)
        | NodeData::Type(name)
        | NodeData::TypeAlias(name)
        | NodeData::TypeAttribute(name)
        | NodeData::User(name)
        | NodeData::UserAttribute(name) => name_decl(flavor, name),
        NodeData::ClassCommon(cc) => {
            let mut h = tagged(flavor);
            h.update_str(&cc.class);
            let partial = h.snapshot();
            h.update_str(&cc.common);
            DataHash::finish_split(h, partial)
        }
        NodeData::Ordered(o) => {
            let mut h = tagged(flavor);
            let partial = h.snapshot();
            h.update_digest(&string_list_hash(&o.order, o.unordered));
            DataHash::finish_split(h, partial)
        }
        NodeData::ClassPermissionSet(cps) => {
            let mut h = tagged(flavor);
            h.update_str(&cps.set);
            let partial = h.snapshot();
            h.update_digest(&class_perms_full(&cps.perms));
            DataHash::finish_split(h, partial)
        }
        NodeData::ClassMapping(cm) => {
            let mut h = tagged(flavor);
            h.update_str(&cm.classmap);
            h.update_str(&cm.mapping);
            let partial = h.snapshot();
            h.update_digest(&class_perms_item_hash(&cm.perms));
            DataHash::finish_split(h, partial)
        }
        NodeData::PermissionX(px) => perm_x_data(px),
        NodeData::Boolean(b) => {
            let mut h = tagged(flavor);
            h.update_str(&b.name);
            let partial = h.snapshot();
            u32_le(&mut h, u32::from(b.value));
            DataHash::finish_split(h, partial)
        }
        NodeData::BooleanIf(b) => {
            let mut h = tagged(flavor);
            h.update_digest(&expr_hash(&b.condition));
            let partial = h.snapshot();
            DataHash::finish_split(h, partial)
        }
        NodeData::Tunable(t) => {
            let mut h = tagged(flavor);
            h.update_str(&t.name);
            let partial = h.snapshot();
            u32_le(&mut h, u32::from(t.value));
            DataHash::finish_split(h, partial)
        }
        NodeData::TunableIf(t) => {
            let mut h = tagged(flavor);
            h.update_digest(&expr_hash(&t.condition));
            let partial = h.snapshot();
            DataHash::finish_split(h, partial)
        }
        NodeData::Constrain(c) => {
            let mut h = tagged(flavor);
            h.update_digest(&class_perms_item_hash(&c.perms));
            let partial = h.snapshot();
            h.update_digest(&expr_hash(&c.expr));
            DataHash::finish_split(h, partial)
        }
        NodeData::ValidateTrans(v) => {
            let mut h = tagged(flavor);
            h.update_str(&v.class);
            let partial = h.snapshot();
            h.update_digest(&expr_hash(&v.expr));
            DataHash::finish_split(h, partial)
        }
        NodeData::BlockAbstract(name) | NodeData::BlockInherit(name) => {
            let mut h = tagged(flavor);
            h.update_str(name);
            DataHash::finish(h)
        }
        NodeData::In(i) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, u32::from(i.after));
            h.update_str(&i.block);
            DataHash::finish(h)
        }
        NodeData::Context(c) => context_data(c),
        NodeData::Default(d) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, d.kind as u32);
            u32_le(&mut h, d.object as u32);
            let partial = h.snapshot();
            h.update_digest(&string_list_hash(&d.classes, true));
            DataHash::finish_split(h, partial)
        }
        NodeData::DefaultRange(d) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, d.object as u32);
            let partial = h.snapshot();
            h.update_digest(&string_list_hash(&d.classes, true));
            DataHash::finish_split(h, partial)
        }
        NodeData::FileCon(fc) => {
            let mut h = tagged(flavor);
            h.update_str(&fc.path);
            u32_le(&mut h, fc.file_type as u32);
            let partial = h.snapshot();
            match &fc.context {
                Some(context) => {
                    h.update_str("<context>");
                    absorb_ref(&mut h, context, context_full);
                }
                None => h.update_str("<empty_context>"),
            }
            DataHash::finish_split(h, partial)
        }
        NodeData::FsUse(f) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, f.kind as u32);
            h.update_str(&f.fs);
            absorb_ref(&mut h, &f.context, context_full);
            DataHash::finish(h)
        }
        NodeData::GenfsCon(g) => {
            let mut h = tagged(flavor);
            h.update_str(&g.fs);
            h.update_str(&g.path);
            u32_le(&mut h, g.file_type as u32);
            let partial = h.snapshot();
            absorb_ref(&mut h, &g.context, context_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::IbPkeyCon(c) => {
            let mut h = tagged(flavor);
            h.update_str(&c.subnet_prefix);
            u32_le(&mut h, c.low);
            u32_le(&mut h, c.high);
            let partial = h.snapshot();
            absorb_ref(&mut h, &c.context, context_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::IbEndPortCon(c) => {
            let mut h = tagged(flavor);
            h.update_str(&c.device);
            u32_le(&mut h, c.port);
            let partial = h.snapshot();
            absorb_ref(&mut h, &c.context, context_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::SensitivityAliasActual(a)
        | NodeData::CategoryAliasActual(a)
        | NodeData::TypeAliasActual(a) => {
            let mut h = tagged(flavor);
            h.update_str(&a.alias);
            let partial = h.snapshot();
            h.update_str(&a.actual);
            DataHash::finish_split(h, partial)
        }
        NodeData::CategorySet(cs) => {
            let mut h = tagged(flavor);
            anon_name(&mut h, cs.name.as_deref(), "<anonymous::categoryset>");
            let partial = h.snapshot();
            h.update_digest(&expr_hash(&cs.cats));
            DataHash::finish_split(h, partial)
        }
        NodeData::SensCat(sc) => {
            let mut h = tagged(flavor);
            h.update_str(&sc.sens);
            let partial = h.snapshot();
            h.update_digest(&expr_hash(&sc.cats));
            DataHash::finish_split(h, partial)
        }
        NodeData::Level(l) => level_data(l),
        NodeData::LevelRange(lr) => level_range_data(lr),
        NodeData::RangeTransition(rt) => {
            let mut h = tagged(flavor);
            h.update_str(&rt.source);
            h.update_str(&rt.exec);
            h.update_str(&rt.class);
            let partial = h.snapshot();
            absorb_ref(&mut h, &rt.range, level_range_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::IpAddr(ip) => ip_addr_data(ip),
        NodeData::NetifCon(n) => {
            let mut h = tagged(flavor);
            h.update_str(&n.interface);
            let partial = h.snapshot();
            absorb_ref(&mut h, &n.if_context, context_full);
            absorb_ref(&mut h, &n.packet_context, context_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::NodeCon(n) => {
            let mut h = tagged(flavor);
            absorb_ref(&mut h, &n.addr, ip_addr_full);
            absorb_ref(&mut h, &n.mask, ip_addr_full);
            let partial = h.snapshot();
            absorb_ref(&mut h, &n.context, context_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::PortCon(p) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, p.proto as u32);
            u32_le(&mut h, p.low);
            u32_le(&mut h, p.high);
            let partial = h.snapshot();
            absorb_ref(&mut h, &p.context, context_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::Mls(value) => {
            let mut h = tagged(flavor);
            let partial = h.snapshot();
            u32_le(&mut h, u32::from(*value));
            DataHash::finish_split(h, partial)
        }
        NodeData::HandleUnknown(action) => {
            let mut h = tagged(flavor);
            let partial = h.snapshot();
            u32_le(&mut h, *action as u32);
            DataHash::finish_split(h, partial)
        }
        NodeData::RoleType(rt) => {
            let mut h = tagged(flavor);
            h.update_str(&rt.role);
            let partial = h.snapshot();
            h.update_str(&rt.ty);
            DataHash::finish_split(h, partial)
        }
        NodeData::RoleAttributeSet(s)
        | NodeData::TypeAttributeSet(s)
        | NodeData::UserAttributeSet(s) => {
            let mut h = tagged(flavor);
            h.update_str(&s.attr);
            let partial = h.snapshot();
            h.update_digest(&expr_hash(&s.expr));
            DataHash::finish_split(h, partial)
        }
        NodeData::RoleAllow(r) => {
            let mut h = tagged(flavor);
            h.update_str(&r.source);
            let partial = h.snapshot();
            h.update_str(&r.target);
            DataHash::finish_split(h, partial)
        }
        NodeData::RoleTransition(r) => {
            let mut h = tagged(flavor);
            h.update_str(&r.source);
            h.update_str(&r.target);
            h.update_str(&r.class);
            let partial = h.snapshot();
            h.update_str(&r.result);
            DataHash::finish_split(h, partial)
        }
        NodeData::Bounds(b) => {
            let mut h = tagged(flavor);
            h.update_str(&b.parent);
            h.update_str(&b.child);
            DataHash::finish(h)
        }
        NodeData::SidContext(sc) => {
            let mut h = tagged(flavor);
            h.update_str(&sc.sid);
            let partial = h.snapshot();
            absorb_ref(&mut h, &sc.context, context_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::ExpandTypeAttribute(e) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, u32::from(e.expand));
            let partial = h.snapshot();
            h.update_digest(&string_list_hash(&e.attrs, true));
            DataHash::finish_split(h, partial)
        }
        NodeData::TypeRule(r) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, r.kind as u32);
            h.update_str(&r.source);
            h.update_str(&r.target);
            h.update_str(&r.class);
            let partial = h.snapshot();
            h.update_str(&r.result);
            DataHash::finish_split(h, partial)
        }
        NodeData::NameTypeTransition(r) => {
            let mut h = tagged(flavor);
            h.update_str(&r.source);
            h.update_str(&r.target);
            h.update_str(&r.class);
            h.update_str(&r.object_name);
            let partial = h.snapshot();
            h.update_str(&r.result);
            DataHash::finish_split(h, partial)
        }
        NodeData::TypePermissive(name) => {
            let mut h = tagged(flavor);
            h.update_str(name);
            DataHash::finish(h)
        }
        NodeData::UserRole(u) => {
            let mut h = tagged(flavor);
            h.update_str(&u.user);
            let partial = h.snapshot();
            h.update_str(&u.role);
            DataHash::finish_split(h, partial)
        }
        NodeData::UserLevel(u) => {
            let mut h = tagged(flavor);
            h.update_str(&u.user);
            let partial = h.snapshot();
            absorb_ref(&mut h, &u.level, level_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::UserRange(u) => {
            let mut h = tagged(flavor);
            h.update_str(&u.user);
            let partial = h.snapshot();
            absorb_ref(&mut h, &u.range, level_range_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::UserPrefix(u) => {
            let mut h = tagged(flavor);
            h.update_str(&u.user);
            let partial = h.snapshot();
            h.update_str(&u.prefix);
            DataHash::finish_split(h, partial)
        }
        NodeData::SelinuxUser(u) => {
            let mut h = tagged(flavor);
            h.update_str(&u.name);
            let partial = h.snapshot();
            h.update_str(&u.user);
            absorb_ref(&mut h, &u.range, level_range_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::SelinuxUserDefault(u) => {
            let mut h = tagged(flavor);
            let partial = h.snapshot();
            h.update_str(&u.user);
            absorb_ref(&mut h, &u.range, level_range_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::IomemCon(c) => {
            let mut h = tagged(flavor);
            h.update(&c.low.to_le_bytes());
            h.update(&c.high.to_le_bytes());
            let partial = h.snapshot();
            absorb_ref(&mut h, &c.context, context_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::IoportCon(c) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, c.low);
            u32_le(&mut h, c.high);
            let partial = h.snapshot();
            absorb_ref(&mut h, &c.context, context_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::PciDeviceCon(c) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, c.device);
            let partial = h.snapshot();
            absorb_ref(&mut h, &c.context, context_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::PirqCon(c) => {
            let mut h = tagged(flavor);
            u32_le(&mut h, c.irq);
            let partial = h.snapshot();
            absorb_ref(&mut h, &c.context, context_full);
            DataHash::finish_split(h, partial)
        }
        NodeData::DeviceTreeCon(c) => {
            let mut h = tagged(flavor);
            h.update_str(&c.path);
            let partial = h.snapshot();
            absorb_ref(&mut h, &c.context, context_full);
            DataHash::finish_split(h, partial)
        }
    }
}

/// Absorbs a named-or-inline reference: the name string itself, or the
/// nested construct's full digest.
fn absorb_ref<T>(h: &mut HashState, r: &Ref<T>, full: fn(&T) -> Digest) {
    match r {
        Ref::Named(name) => h.update_str(name),
        Ref::Inline(inner) => h.update_digest(&full(inner)),
    }
}

// Nested payload digests. The statement arms above reuse these through the
// `*_data` variants so a declared level and an inline level absorb the same
// field sequence.

fn context_data(c: &Context) -> DataHash {
    let mut h = tagged(Flavor::Context);
    anon_name(&mut h, c.name.as_deref(), "<anonymous::context>");
    let partial = h.snapshot();
    h.update_str(&c.user);
    h.update_str(&c.role);
    h.update_str(&c.ty);
    absorb_ref(&mut h, &c.range, level_range_full);
    DataHash::finish_split(h, partial)
}

fn context_full(c: &Context) -> Digest {
    context_data(c).full
}

fn level_data(l: &Level) -> DataHash {
    let mut h = tagged(Flavor::Level);
    anon_name(&mut h, l.name.as_deref(), "<anonymous::level>");
    let partial = h.snapshot();
    h.update_str(&l.sens);
    if let Some(cats) = &l.cats {
        h.update_digest(&expr_hash(cats));
    }
    DataHash::finish_split(h, partial)
}

fn level_full(l: &Level) -> Digest {
    level_data(l).full
}

fn level_range_data(lr: &LevelRange) -> DataHash {
    let mut h = tagged(Flavor::LevelRange);
    anon_name(&mut h, lr.name.as_deref(), "<anonymous::levelrange>");
    let partial = h.snapshot();
    absorb_ref(&mut h, &lr.low, level_full);
    absorb_ref(&mut h, &lr.high, level_full);
    DataHash::finish_split(h, partial)
}

fn level_range_full(lr: &LevelRange) -> Digest {
    level_range_data(lr).full
}

fn ip_addr_data(ip: &IpAddrDecl) -> DataHash {
    let mut h = tagged(Flavor::IpAddr);
    anon_name(&mut h, ip.name.as_deref(), "<anonymous::ipaddr>");
    let partial = h.snapshot();
    match ip.addr {
        std::net::IpAddr::V4(v4) => h.update(&v4.octets()),
        std::net::IpAddr::V6(v6) => h.update(&v6.octets()),
    }
    DataHash::finish_split(h, partial)
}

fn ip_addr_full(ip: &IpAddrDecl) -> Digest {
    ip_addr_data(ip).full
}

fn perm_x_data(px: &PermX) -> DataHash {
    let mut h = tagged(Flavor::PermissionX);
    anon_name(&mut h, px.name.as_deref(), "<anonymous::permissionx>");
    u32_le(&mut h, px.kind as u32);
    h.update_str(&px.class);
    let partial = h.snapshot();
    h.update_digest(&expr_hash(&px.perms));
    DataHash::finish_split(h, partial)
}

fn perm_x_full(px: &PermX) -> Digest {
    perm_x_data(px).full
}

fn class_perms_full(cp: &ClassPerms) -> Digest {
    let mut h = tagged(Flavor::ClassPerms);
    h.update_str(&cp.class);
    h.update_digest(&expr_hash(&cp.perms));
    h.finish()
}

fn class_perms_item_hash(item: &ClassPermsItem) -> Digest {
    match item {
        ClassPermsItem::Set(name) => {
            let mut h = tagged(Flavor::ClassPermsSet);
            h.update_str(name);
            h.finish()
        }
        ClassPermsItem::Perms(cp) => class_perms_full(cp),
    }
}

/// Digest of an expression: operator first, operand digests sorted.
///
/// Sorting deliberately over-canonicalises non-commutative constraint
/// operators; equal operand multisets are the intended equivalence.
pub(crate) fn expr_hash(e: &Expr) -> Digest {
    let mut h = HashState::begin(Some("<expr>"));
    u32_le(&mut h, e.kind as u32);
    if e.op.is_none() && e.operands.is_empty() {
        return h.finish();
    }
    if let Some(op) = e.op {
        h.update_str("<expr_op>");
        h.update(&(op as u64).to_le_bytes());
    }
    let mut operands: Vec<Digest> = e
        .operands
        .iter()
        .map(|item| match item {
            ExprItem::Name(name) => {
                let mut item_hash = HashState::begin(None);
                item_hash.update_str(name);
                item_hash.finish()
            }
            ExprItem::Operand(op) => Digest::of(&(*op as u64).to_le_bytes()),
            ExprItem::Sub(sub) => expr_hash(sub),
        })
        .collect();
    operands.sort_unstable();
    for operand in &operands {
        h.update_digest(operand);
    }
    h.finish()
}

/// Digest of a string list: order marker, then element digests, positional
/// when ordered, sorted when unordered.
fn string_list_hash(items: &[String], unordered: bool) -> Digest {
    let mut h = HashState::begin(Some("<list>"));
    if items.is_empty() {
        return h.finish();
    }
    h.update_str(if unordered { "<unordered>" } else { "<ordered>" });
    let mut hashes: Vec<Digest> = items
        .iter()
        .map(|s| {
            let mut item_hash = HashState::begin(None);
            item_hash.update_str(s);
            item_hash.finish()
        })
        .collect();
    if unordered {
        hashes.sort_unstable();
    }
    for item in &hashes {
        h.update_digest(item);
    }
    h.finish()
}

/// Digest of a call-argument tree: `"<string>"`-tagged leaves,
/// `"<list>"`-tagged interior nodes, position order throughout.
fn call_args_hash(args: &[CallArg]) -> Digest {
    let mut h = HashState::begin(Some("<list>"));
    for arg in args {
        h.update_digest(&call_arg_hash(arg));
    }
    h.finish()
}

fn call_arg_hash(arg: &CallArg) -> Digest {
    match arg {
        CallArg::Symbol(s) => {
            let mut h = HashState::begin(Some("<string>"));
            h.update_str(s);
            h.finish()
        }
        CallArg::List(items) => call_args_hash(items),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use cil_ast::parse_policy;

    fn data_of(src: &str) -> DataHash {
        let root = parse_policy(src, "<test>").unwrap();
        hash_node_data(&root.children[0].children[0].data)
    }

    #[test]
    fn expression_operand_order_is_canonicalised() {
        let a = data_of("(allow A B (C (D E)))");
        let b = data_of("(allow A B (C (E D)))");
        assert_eq!(a.full, b.full);
        assert_eq!(a.partial, b.partial);
    }

    #[test]
    fn partial_groups_rules_by_source_and_target() {
        let a = data_of("(allow A B (C (D)))");
        let b = data_of("(allow A B (C (E)))");
        assert_eq!(a.partial, b.partial);
        assert_ne!(a.full, b.full);

        let c = data_of("(allow A X (C (D)))");
        assert_ne!(a.partial, c.partial);
    }

    #[test]
    fn rule_kinds_hash_apart() {
        let allow = data_of("(allow A B (C (D)))");
        let dontaudit = data_of("(dontaudit A B (C (D)))");
        assert_ne!(allow.partial, dontaudit.partial);
    }

    #[test]
    fn optional_name_is_identity() {
        let o1 = data_of("(optional o1)");
        let o2 = data_of("(optional o2)");
        assert_ne!(o1.full, o2.full);
        assert_ne!(o1.partial, o2.partial);
        assert_eq!(o1.full, o1.partial);
    }

    #[test]
    fn conditional_partial_covers_the_condition() {
        let a = data_of("(booleanif b (true (allow A B (C (D)))))");
        let b = data_of("(booleanif b (true (allow A B (C (E)))))");
        // Branch contents are not part of the data hash at all.
        assert_eq!(a.full, b.full);
        assert_eq!(a.partial, b.partial);
        let c = data_of("(booleanif other (true (allow A B (C (D)))))");
        assert_ne!(a.partial, c.partial);
    }

    #[test]
    fn anonymous_levels_share_identity_with_equal_fields() {
        let a = data_of("(userlevel u (s0 (c0 c1)))");
        let b = data_of("(userlevel u (s0 (c1 c0)))");
        assert_eq!(a.full, b.full);
        let c = data_of("(userlevel u (s1 (c0 c1)))");
        assert_ne!(a.full, c.full);
    }

    #[test]
    fn named_and_inline_references_hash_apart() {
        let named = data_of("(userlevel u lvl)");
        let inline = data_of("(userlevel u (lvl))");
        assert_ne!(named.full, inline.full);
    }

    #[test]
    fn classorder_is_positional_unless_unordered() {
        let ab = data_of("(classorder (a b))");
        let ba = data_of("(classorder (b a))");
        assert_ne!(ab.full, ba.full);
        let uab = data_of("(classorder (unordered a b))");
        let uba = data_of("(classorder (unordered b a))");
        assert_eq!(uab.full, uba.full);
        assert_eq!(ab.partial, uab.partial);
    }

    #[test]
    fn call_args_are_positional() {
        let ab = data_of("(call m (a b))");
        let ba = data_of("(call m (b a))");
        assert_ne!(ab.full, ba.full);
        let nested = data_of("(call m (a (b c)))");
        let flat = data_of("(call m (a b c))");
        assert_ne!(nested.full, flat.full);
    }

    #[test]
    fn ibpkeycon_high_key_matters() {
        let a = data_of("(ibpkeycon fe80:: 0 5 ctx)");
        let b = data_of("(ibpkeycon fe80:: 0 9 ctx)");
        assert_ne!(a.full, b.full);
    }
}
