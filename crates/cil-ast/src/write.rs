// SPDX-License-Identifier: Apache-2.0
//! Canonical CIL rendering of AST nodes.
//!
//! The output is canonical, not source-preserving: quoting, spacing and
//! implicit list forms are normalised. Containers render their full subtree;
//! `class`/`common`/`classmap` render as their one-line declaration.

use std::fmt::Write as _;

use crate::ast::{
    AvPerms, CallArg, CilNode, ClassPermsItem, ConsOperand, Context, DefaultObject,
    DefaultRangeObject, Expr, ExprItem, ExprOp, FileType, FsUseKind, HandleUnknown, IpAddrDecl,
    Level, LevelRange, NodeData, PermXKind, Proto, Ref,
};

/// Renders a node (and, for containers, its subtree) as CIL text.
///
/// The result ends without a trailing newline.
#[must_use]
pub fn render(node: &CilNode) -> String {
    let mut out = String::new();
    node_text(node, 0, &mut out);
    out
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

fn children_block(node: &CilNode, depth: usize, out: &mut String) {
    for child in &node.children {
        out.push('\n');
        node_text(child, depth, out);
    }
}

#[allow(clippy::too_many_lines)]
fn node_text(node: &CilNode, depth: usize, out: &mut String) {
    indent(depth, out);
    match &node.data {
        NodeData::Root | NodeData::SrcInfo(_) => {
            // Transparent wrappers: render the statements themselves.
            let mut first = true;
            for child in &node.children {
                if !first {
                    out.push('\n');
                }
                first = false;
                node_text(child, depth, out);
            }
        }
        NodeData::CondBlock(b) => {
            let _ = write!(out, "({}", if b.value { "true" } else { "false" });
            children_block(node, depth + 1, out);
            out.push(')');
        }
        NodeData::AvRule(r) => {
            let _ = write!(out, "({} {} {} ", node.kind_keyword(), r.source, r.target);
            match &r.perms {
                AvPerms::Class(item) => out.push_str(&class_perms_item(item)),
                AvPerms::Extended(Ref::Named(name)) => out.push_str(name),
                AvPerms::Extended(Ref::Inline(px)) => {
                    let _ = write!(
                        out,
                        "({} {} {})",
                        perm_x_kind(px.kind),
                        px.class,
                        expr(&px.perms)
                    );
                }
            }
            out.push(')');
        }
        NodeData::DenyRule(r) => {
            let _ = write!(
                out,
                "(deny {} {} {})",
                r.source,
                r.target,
                class_perms_item(&r.perms)
            );
        }
        NodeData::Call(c) => {
            let _ = write!(out, "(call {} (", c.macro_name);
            let args: Vec<String> = c.args.iter().map(call_arg).collect();
            out.push_str(&args.join(" "));
            out.push_str("))");
        }
        NodeData::Macro(m) => {
            let params: Vec<String> = m
                .params
                .iter()
                .map(|p| format!("({} {})", p.flavor.keyword(), p.name))
                .collect();
            let _ = write!(out, "(macro {} ({})", m.name, params.join(" "));
            children_block(node, depth + 1, out);
            out.push(')');
        }
        NodeData::Perm(name) | NodeData::MapPerm(name) => {
            out.push_str(name);
        }
        NodeData::Common(name) | NodeData::Class(name) | NodeData::ClassMap(name) => {
            let kw = node.kind_keyword();
            let perms: Vec<&str> = node
                .children
                .iter()
                .filter_map(|c| match &c.data {
                    NodeData::Perm(p) | NodeData::MapPerm(p) => Some(p.as_str()),
                    _ => None,
                })
                .collect();
            let _ = write!(out, "({kw} {name} ({}))", perms.join(" "));
        }
        NodeData::ClassCommon(cc) => {
            let _ = write!(out, "(classcommon {} {})", cc.class, cc.common);
        }
        NodeData::Ordered(o) => {
            let mut order = o.order.join(" ");
            if o.unordered {
                order = format!("unordered {order}");
            }
            let _ = write!(out, "({} ({order}))", node.kind_keyword());
        }
        NodeData::ClassPermission(name) => {
            let _ = write!(out, "(classpermission {name})");
        }
        NodeData::ClassPermissionSet(cps) => {
            let _ = write!(
                out,
                "(classpermissionset {} ({} {}))",
                cps.set,
                cps.perms.class,
                expr(&cps.perms.perms)
            );
        }
        NodeData::ClassMapping(cm) => {
            let _ = write!(
                out,
                "(classmapping {} {} {})",
                cm.classmap,
                cm.mapping,
                class_perms_item(&cm.perms)
            );
        }
        NodeData::PermissionX(px) => {
            let _ = write!(
                out,
                "(permissionx {} ({} {} {}))",
                px.name.as_deref().unwrap_or("<anonymous>"),
                perm_x_kind(px.kind),
                px.class,
                expr(&px.perms)
            );
        }
        NodeData::Boolean(b) => {
            let _ = write!(out, "(boolean {} {})", b.name, bool_kw(b.value));
        }
        NodeData::BooleanIf(b) => {
            let _ = write!(out, "(booleanif {}", expr(&b.condition));
            children_block(node, depth + 1, out);
            out.push(')');
        }
        NodeData::Tunable(t) => {
            let _ = write!(out, "(tunable {} {})", t.name, bool_kw(t.value));
        }
        NodeData::TunableIf(t) => {
            let _ = write!(out, "(tunableif {}", expr(&t.condition));
            children_block(node, depth + 1, out);
            out.push(')');
        }
        NodeData::Constrain(c) => {
            let _ = write!(
                out,
                "({} {} {})",
                node.kind_keyword(),
                class_perms_item(&c.perms),
                expr(&c.expr)
            );
        }
        NodeData::ValidateTrans(v) => {
            let _ = write!(out, "({} {} {})", node.kind_keyword(), v.class, expr(&v.expr));
        }
        NodeData::Block(name) | NodeData::Optional(name) => {
            let _ = write!(out, "({} {name}", node.kind_keyword());
            children_block(node, depth + 1, out);
            out.push(')');
        }
        NodeData::BlockAbstract(name) => {
            let _ = write!(out, "(blockabstract {name})");
        }
        NodeData::BlockInherit(name) => {
            let _ = write!(out, "(blockinherit {name})");
        }
        NodeData::In(i) => {
            let _ = write!(
                out,
                "(in {}{}",
                if i.after { "after " } else { "" },
                i.block
            );
            children_block(node, depth + 1, out);
            out.push(')');
        }
        NodeData::Context(c) => {
            let _ = write!(
                out,
                "(context {} {})",
                c.name.as_deref().unwrap_or("<anonymous>"),
                context_body(c)
            );
        }
        NodeData::Default(d) => {
            let object = match d.object {
                DefaultObject::Source => "source",
                DefaultObject::Target => "target",
            };
            let _ = write!(
                out,
                "({} ({}) {object})",
                node.kind_keyword(),
                d.classes.join(" ")
            );
        }
        NodeData::DefaultRange(d) => {
            let spec = match d.object {
                DefaultRangeObject::SourceLow => "source low",
                DefaultRangeObject::SourceHigh => "source high",
                DefaultRangeObject::SourceLowHigh => "source low-high",
                DefaultRangeObject::TargetLow => "target low",
                DefaultRangeObject::TargetHigh => "target high",
                DefaultRangeObject::TargetLowHigh => "target low-high",
                DefaultRangeObject::Glblub => "glblub",
            };
            let _ = write!(out, "(defaultrange ({}) {spec})", d.classes.join(" "));
        }
        NodeData::FileCon(fc) => {
            let context = fc
                .context
                .as_ref()
                .map_or_else(|| "()".to_owned(), context_ref);
            let _ = write!(
                out,
                "(filecon \"{}\" {} {context})",
                fc.path,
                file_type(fc.file_type)
            );
        }
        NodeData::FsUse(f) => {
            let kind = match f.kind {
                FsUseKind::Xattr => "xattr",
                FsUseKind::Task => "task",
                FsUseKind::Trans => "trans",
            };
            let _ = write!(out, "(fsuse {kind} {} {})", f.fs, context_ref(&f.context));
        }
        NodeData::GenfsCon(g) => {
            let _ = write!(
                out,
                "(genfscon {} \"{}\" {} {})",
                g.fs,
                g.path,
                file_type(g.file_type),
                context_ref(&g.context)
            );
        }
        NodeData::IbPkeyCon(c) => {
            let _ = write!(
                out,
                "(ibpkeycon {} ({} {}) {})",
                c.subnet_prefix,
                c.low,
                c.high,
                context_ref(&c.context)
            );
        }
        NodeData::IbEndPortCon(c) => {
            let _ = write!(
                out,
                "(ibendportcon {} {} {})",
                c.device,
                c.port,
                context_ref(&c.context)
            );
        }
        NodeData::Sensitivity(name)
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
        | NodeData::TypePermissive(name)
        | NodeData::User(name)
        | NodeData::UserAttribute(name) => {
            let _ = write!(out, "({} {name})", node.kind_keyword());
        }
        NodeData::SensitivityAliasActual(a) | NodeData::CategoryAliasActual(a) | NodeData::TypeAliasActual(a) => {
            let _ = write!(out, "({} {} {})", node.kind_keyword(), a.alias, a.actual);
        }
        NodeData::CategorySet(cs) => {
            let _ = write!(
                out,
                "(categoryset {} {})",
                cs.name.as_deref().unwrap_or("<anonymous>"),
                expr(&cs.cats)
            );
        }
        NodeData::SensCat(sc) => {
            let _ = write!(out, "(sensitivitycategory {} {})", sc.sens, expr(&sc.cats));
        }
        NodeData::Level(l) => {
            let _ = write!(
                out,
                "(level {} {})",
                l.name.as_deref().unwrap_or("<anonymous>"),
                level_body(l)
            );
        }
        NodeData::LevelRange(lr) => {
            let _ = write!(
                out,
                "(levelrange {} {})",
                lr.name.as_deref().unwrap_or("<anonymous>"),
                level_range_body(lr)
            );
        }
        NodeData::RangeTransition(rt) => {
            let _ = write!(
                out,
                "(rangetransition {} {} {} {})",
                rt.source,
                rt.exec,
                rt.class,
                level_range_ref(&rt.range)
            );
        }
        NodeData::IpAddr(ip) => {
            let _ = write!(
                out,
                "(ipaddr {} {})",
                ip.name.as_deref().unwrap_or("<anonymous>"),
                ip.addr
            );
        }
        NodeData::NetifCon(n) => {
            let _ = write!(
                out,
                "(netifcon {} {} {})",
                n.interface,
                context_ref(&n.if_context),
                context_ref(&n.packet_context)
            );
        }
        NodeData::NodeCon(n) => {
            let _ = write!(
                out,
                "(nodecon {} {} {})",
                ip_ref(&n.addr),
                ip_ref(&n.mask),
                context_ref(&n.context)
            );
        }
        NodeData::PortCon(p) => {
            let proto = match p.proto {
                Proto::Tcp => "tcp",
                Proto::Udp => "udp",
                Proto::Dccp => "dccp",
                Proto::Sctp => "sctp",
            };
            if p.low == p.high {
                let _ = write!(out, "(portcon {proto} {} {})", p.low, context_ref(&p.context));
            } else {
                let _ = write!(
                    out,
                    "(portcon {proto} ({} {}) {})",
                    p.low,
                    p.high,
                    context_ref(&p.context)
                );
            }
        }
        NodeData::Mls(value) => {
            let _ = write!(out, "(mls {})", bool_kw(*value));
        }
        NodeData::HandleUnknown(h) => {
            let action = match h {
                HandleUnknown::Allow => "allow",
                HandleUnknown::Deny => "deny",
                HandleUnknown::Reject => "reject",
            };
            let _ = write!(out, "(handleunknown {action})");
        }
        NodeData::RoleType(rt) => {
            let _ = write!(out, "(roletype {} {})", rt.role, rt.ty);
        }
        NodeData::RoleAttributeSet(s) | NodeData::TypeAttributeSet(s) | NodeData::UserAttributeSet(s) => {
            let _ = write!(out, "({} {} {})", node.kind_keyword(), s.attr, expr(&s.expr));
        }
        NodeData::RoleAllow(r) => {
            let _ = write!(out, "(roleallow {} {})", r.source, r.target);
        }
        NodeData::RoleTransition(r) => {
            let _ = write!(
                out,
                "(roletransition {} {} {} {})",
                r.source, r.target, r.class, r.result
            );
        }
        NodeData::Bounds(b) => {
            let _ = write!(out, "({} {} {})", node.kind_keyword(), b.parent, b.child);
        }
        NodeData::SidContext(sc) => {
            let _ = write!(out, "(sidcontext {} {})", sc.sid, context_ref(&sc.context));
        }
        NodeData::ExpandTypeAttribute(e) => {
            let _ = write!(
                out,
                "(expandtypeattribute ({}) {})",
                e.attrs.join(" "),
                bool_kw(e.expand)
            );
        }
        NodeData::TypeRule(r) => {
            let _ = write!(
                out,
                "({} {} {} {} {})",
                node.kind_keyword(),
                r.source,
                r.target,
                r.class,
                r.result
            );
        }
        NodeData::NameTypeTransition(r) => {
            let _ = write!(
                out,
                "(typetransition {} {} {} \"{}\" {})",
                r.source, r.target, r.class, r.object_name, r.result
            );
        }
        NodeData::UserRole(u) => {
            let _ = write!(out, "(userrole {} {})", u.user, u.role);
        }
        NodeData::UserLevel(u) => {
            let _ = write!(out, "(userlevel {} {})", u.user, level_ref(&u.level));
        }
        NodeData::UserRange(u) => {
            let _ = write!(out, "(userrange {} {})", u.user, level_range_ref(&u.range));
        }
        NodeData::UserPrefix(u) => {
            let _ = write!(out, "(userprefix {} {})", u.user, u.prefix);
        }
        NodeData::SelinuxUser(u) => {
            let _ = write!(
                out,
                "(selinuxuser {} {} {})",
                u.name,
                u.user,
                level_range_ref(&u.range)
            );
        }
        NodeData::SelinuxUserDefault(u) => {
            let _ = write!(
                out,
                "(selinuxuserdefault {} {})",
                u.user,
                level_range_ref(&u.range)
            );
        }
        NodeData::IomemCon(c) => {
            let _ = write!(
                out,
                "(iomemcon ({:#x} {:#x}) {})",
                c.low,
                c.high,
                context_ref(&c.context)
            );
        }
        NodeData::IoportCon(c) => {
            let _ = write!(
                out,
                "(ioportcon ({:#x} {:#x}) {})",
                c.low,
                c.high,
                context_ref(&c.context)
            );
        }
        NodeData::PciDeviceCon(c) => {
            let _ = write!(out, "(pcidevicecon {:#x} {})", c.device, context_ref(&c.context));
        }
        NodeData::PirqCon(c) => {
            let _ = write!(out, "(pirqcon {} {})", c.irq, context_ref(&c.context));
        }
        NodeData::DeviceTreeCon(c) => {
            let _ = write!(
                out,
                "(devicetreecon \"{}\" {})",
                c.path,
                context_ref(&c.context)
            );
        }
    }
}

fn bool_kw(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn perm_x_kind(kind: PermXKind) -> &'static str {
    match kind {
        PermXKind::Ioctl => "ioctl",
        PermXKind::Nlmsg => "nlmsg",
    }
}

fn file_type(ft: FileType) -> &'static str {
    match ft {
        FileType::Any => "any",
        FileType::File => "file",
        FileType::Dir => "dir",
        FileType::Char => "char",
        FileType::Block => "block",
        FileType::Socket => "socket",
        FileType::Pipe => "pipe",
        FileType::Symlink => "symlink",
    }
}

fn call_arg(arg: &CallArg) -> String {
    match arg {
        CallArg::Symbol(s) => s.clone(),
        CallArg::List(items) => {
            let inner: Vec<String> = items.iter().map(call_arg).collect();
            format!("({})", inner.join(" "))
        }
    }
}

fn class_perms_item(item: &ClassPermsItem) -> String {
    match item {
        ClassPermsItem::Set(name) => name.clone(),
        ClassPermsItem::Perms(cp) => format!("({} {})", cp.class, expr(&cp.perms)),
    }
}

/// Renders an expression as a parenthesised operator/operand list.
#[must_use]
pub fn expr(e: &Expr) -> String {
    let mut parts = Vec::with_capacity(e.operands.len() + 1);
    if let Some(op) = e.op {
        parts.push(expr_op(op).to_owned());
    }
    for item in &e.operands {
        parts.push(match item {
            ExprItem::Name(name) => name.clone(),
            ExprItem::Operand(op) => cons_operand(*op).to_owned(),
            ExprItem::Sub(sub) => expr(sub),
        });
    }
    format!("({})", parts.join(" "))
}

/// The keyword of an expression operator.
#[must_use]
pub fn expr_op(op: ExprOp) -> &'static str {
    match op {
        ExprOp::And => "and",
        ExprOp::Or => "or",
        ExprOp::Not => "not",
        ExprOp::Xor => "xor",
        ExprOp::All => "all",
        ExprOp::Eq => "eq",
        ExprOp::Neq => "neq",
        ExprOp::Range => "range",
        ExprOp::Dom => "dom",
        ExprOp::DomBy => "domby",
        ExprOp::Incomp => "incomp",
    }
}

/// The keyword of a constraint operand.
#[must_use]
pub fn cons_operand(op: ConsOperand) -> &'static str {
    match op {
        ConsOperand::U1 => "u1",
        ConsOperand::U2 => "u2",
        ConsOperand::U3 => "u3",
        ConsOperand::T1 => "t1",
        ConsOperand::T2 => "t2",
        ConsOperand::T3 => "t3",
        ConsOperand::R1 => "r1",
        ConsOperand::R2 => "r2",
        ConsOperand::R3 => "r3",
        ConsOperand::L1 => "l1",
        ConsOperand::L2 => "l2",
        ConsOperand::H1 => "h1",
        ConsOperand::H2 => "h2",
    }
}

fn context_ref(r: &Ref<Context>) -> String {
    match r {
        Ref::Named(name) => name.clone(),
        Ref::Inline(c) => context_body(c),
    }
}

fn context_body(c: &Context) -> String {
    format!(
        "({} {} {} {})",
        c.user,
        c.role,
        c.ty,
        level_range_ref(&c.range)
    )
}

fn level_ref(r: &Ref<Level>) -> String {
    match r {
        Ref::Named(name) => name.clone(),
        Ref::Inline(l) => level_body(l),
    }
}

fn level_body(l: &Level) -> String {
    match &l.cats {
        Some(cats) => format!("({} {})", l.sens, expr(cats)),
        None => format!("({})", l.sens),
    }
}

fn level_range_ref(r: &Ref<LevelRange>) -> String {
    match r {
        Ref::Named(name) => name.clone(),
        Ref::Inline(lr) => level_range_body(lr),
    }
}

fn level_range_body(lr: &LevelRange) -> String {
    format!("({} {})", level_ref(&lr.low), level_ref(&lr.high))
}

fn ip_ref(r: &Ref<IpAddrDecl>) -> String {
    match r {
        Ref::Named(name) => name.clone(),
        Ref::Inline(ip) => ip.addr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::build::parse_policy;

    fn roundtrip(src: &str) -> String {
        let root = parse_policy(src, "<test>").unwrap();
        render(&root.children[0].children[0])
    }

    #[test]
    fn leaf_statements_render_one_line() {
        assert_eq!(roundtrip("(type t)"), "(type t)");
        assert_eq!(
            roundtrip("(allow A B (C (D E)))"),
            "(allow A B (C (D E)))"
        );
        assert_eq!(
            roundtrip("(typetransition S T proc \"obj\" R)"),
            "(typetransition S T proc \"obj\" R)"
        );
    }

    #[test]
    fn containers_render_nested() {
        let text = roundtrip("(optional o1 (allow A B (C (D))))");
        assert_eq!(text, "(optional o1\n    (allow A B (C (D))))");
    }

    #[test]
    fn branches_render_with_keyword() {
        let text = roundtrip("(booleanif b (true (allow A B (C (D)))))");
        assert!(text.starts_with("(booleanif (b)"));
        assert!(text.contains("(true"));
    }

    #[test]
    fn class_renders_perm_list() {
        assert_eq!(
            roundtrip("(class file (read write))"),
            "(class file (read write))"
        );
    }
}
