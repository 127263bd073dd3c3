// SPDX-License-Identifier: Apache-2.0
//! Per-flavor JSON rendering of AST nodes.
//!
//! Every node renders to an object carrying `"flavor"` (the payload's
//! keyword) and `"line"`, plus flavor-specific keys. Named-or-inline
//! references render as a string (the name) or a nested node object; the
//! explicit empty context of `filecon` renders as `null`.

use serde_json::{json, Map, Value};

use crate::ast::{
    AvPerms, CallArg, CilNode, ClassPerms, ClassPermsItem, Context, DefaultObject,
    DefaultRangeObject, Expr, ExprItem, FileType, FsUseKind, HandleUnknown, IpAddrDecl, Level,
    LevelRange, NodeData, PermX, PermXKind, Proto, Ref,
};
use crate::write;

/// Renders a node as a JSON object.
#[must_use]
pub fn node_value(node: &CilNode) -> Value {
    let mut obj = Map::new();
    obj.insert("flavor".to_owned(), json!(node.kind_keyword()));
    obj.insert("line".to_owned(), json!(node.line));
    for (key, value) in payload_fields(node) {
        obj.insert(key.to_owned(), value);
    }
    Value::Object(obj)
}

fn children_value(node: &CilNode) -> Value {
    Value::Array(node.children.iter().map(node_value).collect())
}

#[allow(clippy::too_many_lines)]
fn payload_fields(node: &CilNode) -> Vec<(&'static str, Value)> {
    match &node.data {
        NodeData::Root => vec![("children", children_value(node))],
        NodeData::SrcInfo(s) => vec![
            ("kind", json!(s.kind)),
            ("path", json!(s.path)),
            ("children", children_value(node)),
        ],
        NodeData::CondBlock(b) => vec![
            ("value", json!(b.value)),
            ("children", children_value(node)),
        ],
        NodeData::AvRule(r) => {
            let classperms = match &r.perms {
                AvPerms::Class(item) => class_perms_item_value(item, node.line),
                AvPerms::Extended(Ref::Named(name)) => json!(name),
                AvPerms::Extended(Ref::Inline(px)) => perm_x_value(px, node.line),
            };
            vec![
                ("source", json!(r.source)),
                ("target", json!(r.target)),
                ("classperms", classperms),
            ]
        }
        NodeData::DenyRule(r) => vec![
            ("source", json!(r.source)),
            ("target", json!(r.target)),
            ("classperms", class_perms_item_value(&r.perms, node.line)),
        ],
        NodeData::Call(c) => vec![
            ("macro", json!(c.macro_name)),
            (
                "args",
                Value::Array(c.args.iter().map(call_arg_value).collect()),
            ),
        ],
        NodeData::Macro(m) => vec![
            ("id", json!(m.name)),
            (
                "params",
                Value::Array(
                    m.params
                        .iter()
                        .map(|p| json!({ "type": p.flavor.keyword(), "name": p.name }))
                        .collect(),
                ),
            ),
            ("children", children_value(node)),
        ],
        NodeData::Perm(name) | NodeData::MapPerm(name) => vec![("id", json!(name))],
        NodeData::Common(name) | NodeData::Class(name) => {
            let perms: Vec<&str> = node
                .children
                .iter()
                .filter_map(|c| match &c.data {
                    NodeData::Perm(p) => Some(p.as_str()),
                    _ => None,
                })
                .collect();
            vec![("id", json!(name)), ("perms", json!(perms))]
        }
        NodeData::ClassMap(name) => {
            let mappings: Vec<&str> = node
                .children
                .iter()
                .filter_map(|c| match &c.data {
                    NodeData::MapPerm(p) => Some(p.as_str()),
                    _ => None,
                })
                .collect();
            vec![("id", json!(name)), ("classmappings", json!(mappings))]
        }
        NodeData::ClassCommon(cc) => vec![
            ("class", json!(cc.class)),
            ("common", json!(cc.common)),
        ],
        NodeData::Ordered(o) => vec![
            ("unordered", json!(o.unordered)),
            ("order", json!(o.order)),
        ],
        NodeData::ClassPermission(name) => vec![("id", json!(name))],
        NodeData::ClassPermissionSet(cps) => vec![
            ("id", json!(cps.set)),
            ("classperms", class_perms_value(&cps.perms, node.line)),
        ],
        NodeData::ClassMapping(cm) => vec![
            ("classmap", json!(cm.classmap)),
            ("classmapping", json!(cm.mapping)),
            ("classperms", class_perms_item_value(&cm.perms, node.line)),
        ],
        NodeData::PermissionX(px) => permission_x_fields(px),
        NodeData::Boolean(b) => vec![("id", json!(b.name)), ("value", json!(b.value))],
        NodeData::BooleanIf(b) => vec![
            ("condition", expr_value(&b.condition)),
            ("branches", branches_value(node)),
        ],
        NodeData::Tunable(t) => vec![("id", json!(t.name)), ("value", json!(t.value))],
        NodeData::TunableIf(t) => vec![
            ("condition", expr_value(&t.condition)),
            ("branches", branches_value(node)),
        ],
        NodeData::Constrain(c) => vec![
            ("classperms", class_perms_item_value(&c.perms, node.line)),
            ("constraint", expr_value(&c.expr)),
        ],
        NodeData::ValidateTrans(v) => vec![
            ("class", json!(v.class)),
            ("constraint", expr_value(&v.expr)),
        ],
        NodeData::Block(name) | NodeData::Optional(name) => vec![
            ("id", json!(name)),
            ("children", children_value(node)),
        ],
        NodeData::BlockAbstract(name) => vec![("id", json!(name))],
        NodeData::BlockInherit(name) => vec![("template", json!(name))],
        NodeData::In(i) => vec![
            ("position", json!(if i.after { "after" } else { "before" })),
            ("container", json!(i.block)),
            ("children", children_value(node)),
        ],
        NodeData::Context(c) => context_fields(c, node.line),
        NodeData::Default(d) => vec![
            ("class", json!(d.classes)),
            (
                "default",
                json!(match d.object {
                    DefaultObject::Source => "source",
                    DefaultObject::Target => "target",
                }),
            ),
        ],
        NodeData::DefaultRange(d) => {
            let (default, range) = match d.object {
                DefaultRangeObject::SourceLow => (json!("source"), json!("low")),
                DefaultRangeObject::SourceHigh => (json!("source"), json!("high")),
                DefaultRangeObject::SourceLowHigh => (json!("source"), json!("low-high")),
                DefaultRangeObject::TargetLow => (json!("target"), json!("low")),
                DefaultRangeObject::TargetHigh => (json!("target"), json!("high")),
                DefaultRangeObject::TargetLowHigh => (json!("target"), json!("low-high")),
                DefaultRangeObject::Glblub => (json!("glblub"), Value::Null),
            };
            vec![
                ("class", json!(d.classes)),
                ("default", default),
                ("range", range),
            ]
        }
        NodeData::FileCon(fc) => vec![
            ("path", json!(fc.path)),
            ("type", json!(file_type_str(fc.file_type))),
            (
                "context",
                fc.context
                    .as_ref()
                    .map_or(Value::Null, |c| context_ref_value(c, node.line)),
            ),
        ],
        NodeData::FsUse(f) => vec![
            (
                "type",
                json!(match f.kind {
                    FsUseKind::Xattr => "xattr",
                    FsUseKind::Task => "task",
                    FsUseKind::Trans => "trans",
                }),
            ),
            ("fs", json!(f.fs)),
            ("context", context_ref_value(&f.context, node.line)),
        ],
        NodeData::GenfsCon(g) => vec![
            ("fs", json!(g.fs)),
            ("path", json!(g.path)),
            ("filetype", json!(file_type_str(g.file_type))),
            ("context", context_ref_value(&g.context, node.line)),
        ],
        NodeData::IbPkeyCon(c) => vec![
            ("subnet", json!(c.subnet_prefix)),
            ("low", json!(c.low)),
            ("high", json!(c.high)),
            ("context", context_ref_value(&c.context, node.line)),
        ],
        NodeData::IbEndPortCon(c) => vec![
            ("device", json!(c.device)),
            ("port", json!(c.port)),
            ("context", context_ref_value(&c.context, node.line)),
        ],
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
        | NodeData::User(name)
        | NodeData::UserAttribute(name) => vec![("id", json!(name))],
        NodeData::SensitivityAliasActual(a) => vec![
            ("sensitivityalias", json!(a.alias)),
            ("sensitivity", json!(a.actual)),
        ],
        NodeData::CategoryAliasActual(a) => vec![
            ("categoryalias", json!(a.alias)),
            ("category", json!(a.actual)),
        ],
        NodeData::TypeAliasActual(a) => vec![
            ("typealias", json!(a.alias)),
            ("type", json!(a.actual)),
        ],
        NodeData::CategorySet(cs) => vec![
            ("id", json!(cs.name)),
            ("cats", expr_value(&cs.cats)),
        ],
        NodeData::SensCat(sc) => vec![
            ("sensitivity", json!(sc.sens)),
            ("cats", expr_value(&sc.cats)),
        ],
        NodeData::Level(l) => level_fields(l),
        NodeData::LevelRange(lr) => level_range_fields(lr, node.line),
        NodeData::RangeTransition(rt) => vec![
            ("source", json!(rt.source)),
            ("exec", json!(rt.exec)),
            ("class", json!(rt.class)),
            ("levelrange", level_range_ref_value(&rt.range, node.line)),
        ],
        NodeData::IpAddr(ip) => vec![("id", json!(ip.name)), ("ip", json!(ip.addr.to_string()))],
        NodeData::NetifCon(n) => vec![
            ("interface", json!(n.interface)),
            ("ifcontext", context_ref_value(&n.if_context, node.line)),
            (
                "packetcontext",
                context_ref_value(&n.packet_context, node.line),
            ),
        ],
        NodeData::NodeCon(n) => vec![
            ("subnet", ip_ref_value(&n.addr, node.line)),
            ("mask", ip_ref_value(&n.mask, node.line)),
            ("context", context_ref_value(&n.context, node.line)),
        ],
        NodeData::PortCon(p) => vec![
            (
                "protocol",
                json!(match p.proto {
                    Proto::Tcp => "tcp",
                    Proto::Udp => "udp",
                    Proto::Dccp => "dccp",
                    Proto::Sctp => "sctp",
                }),
            ),
            ("low", json!(p.low)),
            ("high", json!(p.high)),
            ("context", context_ref_value(&p.context, node.line)),
        ],
        NodeData::Mls(value) => vec![("value", json!(value))],
        NodeData::HandleUnknown(h) => vec![(
            "action",
            json!(match h {
                HandleUnknown::Allow => "allow",
                HandleUnknown::Deny => "deny",
                HandleUnknown::Reject => "reject",
            }),
        )],
        NodeData::RoleType(rt) => vec![("role", json!(rt.role)), ("type", json!(rt.ty))],
        NodeData::RoleAttributeSet(s) | NodeData::TypeAttributeSet(s) | NodeData::UserAttributeSet(s) => {
            vec![("attribute", json!(s.attr)), ("expr", expr_value(&s.expr))]
        }
        NodeData::RoleAllow(r) => vec![
            ("source", json!(r.source)),
            ("target", json!(r.target)),
        ],
        NodeData::RoleTransition(r) => vec![
            ("source", json!(r.source)),
            ("target", json!(r.target)),
            ("class", json!(r.class)),
            ("result", json!(r.result)),
        ],
        NodeData::Bounds(b) => vec![
            ("parent", json!(b.parent)),
            ("child", json!(b.child)),
        ],
        NodeData::SidContext(sc) => vec![
            ("sid", json!(sc.sid)),
            ("context", context_ref_value(&sc.context, node.line)),
        ],
        NodeData::ExpandTypeAttribute(e) => vec![
            ("attributes", json!(e.attrs)),
            ("expand", json!(e.expand)),
        ],
        NodeData::TypeRule(r) => vec![
            ("source", json!(r.source)),
            ("target", json!(r.target)),
            ("class", json!(r.class)),
            ("result", json!(r.result)),
        ],
        NodeData::NameTypeTransition(r) => vec![
            ("source", json!(r.source)),
            ("target", json!(r.target)),
            ("class", json!(r.class)),
            ("name", json!(r.object_name)),
            ("result", json!(r.result)),
        ],
        NodeData::TypePermissive(name) => vec![("type", json!(name))],
        NodeData::UserRole(u) => vec![("user", json!(u.user)), ("role", json!(u.role))],
        NodeData::UserLevel(u) => vec![
            ("user", json!(u.user)),
            ("level", level_ref_value(&u.level, node.line)),
        ],
        NodeData::UserRange(u) => vec![
            ("user", json!(u.user)),
            ("levelrange", level_range_ref_value(&u.range, node.line)),
        ],
        NodeData::UserPrefix(u) => vec![
            ("user", json!(u.user)),
            ("prefix", json!(u.prefix)),
        ],
        NodeData::SelinuxUser(u) => vec![
            ("name", json!(u.name)),
            ("user", json!(u.user)),
            ("levelrange", level_range_ref_value(&u.range, node.line)),
        ],
        NodeData::SelinuxUserDefault(u) => vec![
            ("user", json!(u.user)),
            ("levelrange", level_range_ref_value(&u.range, node.line)),
        ],
        NodeData::IomemCon(c) => vec![
            ("low", json!(c.low)),
            ("high", json!(c.high)),
            ("context", context_ref_value(&c.context, node.line)),
        ],
        NodeData::IoportCon(c) => vec![
            ("low", json!(c.low)),
            ("high", json!(c.high)),
            ("context", context_ref_value(&c.context, node.line)),
        ],
        NodeData::PciDeviceCon(c) => vec![
            ("device", json!(c.device)),
            ("context", context_ref_value(&c.context, node.line)),
        ],
        NodeData::PirqCon(c) => vec![
            ("irq", json!(c.irq)),
            ("context", context_ref_value(&c.context, node.line)),
        ],
        NodeData::DeviceTreeCon(c) => vec![
            ("path", json!(c.path)),
            ("context", context_ref_value(&c.context, node.line)),
        ],
    }
}

fn branches_value(node: &CilNode) -> Value {
    Value::Array(
        node.children
            .iter()
            .map(|branch| {
                let value = matches!(&branch.data, NodeData::CondBlock(b) if b.value);
                json!({ "value": value, "children": children_value(branch) })
            })
            .collect(),
    )
}

/// Renders an expression as `{"operator": ..., "operands": [...]}`.
#[must_use]
pub fn expr_value(e: &Expr) -> Value {
    let operator = e.op.map_or(Value::Null, |op| json!(write::expr_op(op)));
    let operands: Vec<Value> = e
        .operands
        .iter()
        .map(|item| match item {
            ExprItem::Name(name) => json!(name),
            ExprItem::Operand(op) => json!(write::cons_operand(*op)),
            ExprItem::Sub(sub) => expr_value(sub),
        })
        .collect();
    json!({ "operator": operator, "operands": operands })
}

fn call_arg_value(arg: &CallArg) -> Value {
    match arg {
        CallArg::Symbol(s) => json!(s),
        CallArg::List(items) => Value::Array(items.iter().map(call_arg_value).collect()),
    }
}

fn class_perms_item_value(item: &ClassPermsItem, line: u32) -> Value {
    match item {
        ClassPermsItem::Set(name) => json!(name),
        ClassPermsItem::Perms(cp) => class_perms_value(cp, line),
    }
}

fn class_perms_value(cp: &ClassPerms, line: u32) -> Value {
    json!({
        "flavor": "classperms",
        "line": line,
        "class": cp.class,
        "perms": expr_value(&cp.perms),
    })
}

fn permission_x_fields(px: &PermX) -> Vec<(&'static str, Value)> {
    vec![
        ("id", json!(px.name)),
        (
            "kind",
            json!(match px.kind {
                PermXKind::Ioctl => "ioctl",
                PermXKind::Nlmsg => "nlmsg",
            }),
        ),
        ("class", json!(px.class)),
        ("perms", expr_value(&px.perms)),
    ]
}

fn perm_x_value(px: &PermX, line: u32) -> Value {
    let mut obj = Map::new();
    obj.insert("flavor".to_owned(), json!("permissionx"));
    obj.insert("line".to_owned(), json!(line));
    for (key, value) in permission_x_fields(px) {
        obj.insert(key.to_owned(), value);
    }
    Value::Object(obj)
}

fn context_fields(c: &Context, line: u32) -> Vec<(&'static str, Value)> {
    vec![
        ("id", json!(c.name)),
        ("user", json!(c.user)),
        ("role", json!(c.role)),
        ("type", json!(c.ty)),
        ("levelrange", level_range_ref_value(&c.range, line)),
    ]
}

fn context_ref_value(r: &Ref<Context>, line: u32) -> Value {
    match r {
        Ref::Named(name) => json!(name),
        Ref::Inline(c) => {
            let mut obj = Map::new();
            obj.insert("flavor".to_owned(), json!("context"));
            obj.insert("line".to_owned(), json!(line));
            for (key, value) in context_fields(c, line) {
                obj.insert(key.to_owned(), value);
            }
            Value::Object(obj)
        }
    }
}

fn level_fields(l: &Level) -> Vec<(&'static str, Value)> {
    vec![
        ("id", json!(l.name)),
        ("sensitivity", json!(l.sens)),
        ("cats", l.cats.as_ref().map_or(Value::Null, expr_value)),
    ]
}

fn level_ref_value(r: &Ref<Level>, line: u32) -> Value {
    match r {
        Ref::Named(name) => json!(name),
        Ref::Inline(l) => {
            let mut obj = Map::new();
            obj.insert("flavor".to_owned(), json!("level"));
            obj.insert("line".to_owned(), json!(line));
            for (key, value) in level_fields(l) {
                obj.insert(key.to_owned(), value);
            }
            Value::Object(obj)
        }
    }
}

fn level_range_fields(lr: &LevelRange, line: u32) -> Vec<(&'static str, Value)> {
    vec![
        ("id", json!(lr.name)),
        ("low", level_ref_value(&lr.low, line)),
        ("high", level_ref_value(&lr.high, line)),
    ]
}

fn level_range_ref_value(r: &Ref<LevelRange>, line: u32) -> Value {
    match r {
        Ref::Named(name) => json!(name),
        Ref::Inline(lr) => {
            let mut obj = Map::new();
            obj.insert("flavor".to_owned(), json!("levelrange"));
            obj.insert("line".to_owned(), json!(line));
            for (key, value) in level_range_fields(lr, line) {
                obj.insert(key.to_owned(), value);
            }
            Value::Object(obj)
        }
    }
}

fn ip_ref_value(r: &Ref<IpAddrDecl>, line: u32) -> Value {
    match r {
        Ref::Named(name) => json!(name),
        Ref::Inline(ip) => json!({
            "flavor": "ipaddr",
            "line": line,
            "id": ip.name,
            "ip": ip.addr.to_string(),
        }),
    }
}

fn file_type_str(ft: FileType) -> &'static str {
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

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::build::parse_policy;

    fn stmt_value(src: &str) -> Value {
        let root = parse_policy(src, "<test>").unwrap();
        node_value(&root.children[0].children[0])
    }

    #[test]
    fn avrule_renders_inline_classperms() {
        let v = stmt_value("(allow A B (C (D E)))");
        assert_eq!(v["flavor"], "allow");
        assert_eq!(v["source"], "A");
        assert_eq!(v["classperms"]["flavor"], "classperms");
        assert_eq!(v["classperms"]["perms"]["operands"][1], "E");
    }

    #[test]
    fn booleanif_renders_branches() {
        let v = stmt_value("(booleanif b (true (allow A B (C (D)))) (false (type t)))");
        assert_eq!(v["condition"]["operands"][0], "b");
        assert_eq!(v["branches"][0]["value"], true);
        assert_eq!(v["branches"][1]["children"][0]["flavor"], "type");
    }

    #[test]
    fn operator_keyword_is_bare() {
        let v = stmt_value("(typeattributeset ta (and a b))");
        assert_eq!(v["expr"]["operator"], "and");
    }
}
