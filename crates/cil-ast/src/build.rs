// SPDX-License-Identifier: Apache-2.0
//! Typed AST construction from s-expressions.
//!
//! One builder per statement keyword. Builders validate arity and keyword
//! operands and report the source line of whatever they reject; they do not
//! resolve names or check declaration scoping (that is the compiler's job,
//! not the differ's).

use std::net::IpAddr;

use thiserror::Error;

use crate::ast::{
    AliasActual, AttributeSet, AvPerms, AvRule, AvRuleKind, Boolean, BooleanIf, Bounds, BoundsKind,
    Call, CallArg, CategorySet, CilNode, ClassCommon, ClassMapping, ClassPerms, ClassPermsItem,
    ClassPermissionSet, CondBlock, ConsOperand, Constrain, Context, Default, DefaultKind,
    DefaultObject, DefaultRange, DefaultRangeObject, DenyRule, DeviceTreeCon, Expr, ExprItem,
    ExprKind, ExprOp, ExpandTypeAttribute, FileCon, FileType, FsUse, FsUseKind, GenfsCon,
    HandleUnknown, IbEndPortCon, IbPkeyCon, In, IomemCon, IoportCon, IpAddrDecl, Level, LevelRange,
    Macro, MacroParam, NameTypeTransition, NetifCon, NodeCon, NodeData, Ordered, OrderedKind,
    PciDeviceCon, PermX, PermXKind, PirqCon, PortCon, Proto, RangeTransition, Ref, RoleAllow,
    RoleTransition, RoleType, SelinuxUser, SelinuxUserDefault, SensCat, SidContext, SrcInfo,
    Tunable, TunableIf, TypeRule, TypeRuleKind, UserLevel, UserPrefix, UserRange, UserRole,
    ValidateTrans,
};
use crate::flavor::Flavor;
use crate::sexp::{read_all, Sexp};

/// Errors rejecting malformed CIL source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Closing parenthesis with no open list.
    #[error("line {line}: unexpected ')'")]
    UnexpectedClose {
        /// Source line.
        line: u32,
    },
    /// Input ended mid-expression.
    #[error("line {line}: unexpected end of input")]
    UnexpectedEof {
        /// Source line.
        line: u32,
    },
    /// A list was never closed.
    #[error("line {line}: unclosed '('")]
    UnclosedList {
        /// Source line the list starts on.
        line: u32,
    },
    /// A quoted string was never closed.
    #[error("line {line}: unclosed string literal")]
    UnclosedString {
        /// Source line.
        line: u32,
    },
    /// A statement must be a parenthesised list.
    #[error("line {line}: expected a statement list")]
    ExpectedList {
        /// Source line.
        line: u32,
    },
    /// Expected a symbol operand.
    #[error("line {line}: expected {what}")]
    ExpectedSymbol {
        /// Source line.
        line: u32,
        /// What was expected.
        what: &'static str,
    },
    /// Unknown statement keyword.
    #[error("line {line}: unknown statement '{keyword}'")]
    UnknownStatement {
        /// Source line.
        line: u32,
        /// The offending keyword.
        keyword: String,
    },
    /// Wrong operand count for a statement.
    #[error("line {line}: '{keyword}' expects {expected}")]
    BadArity {
        /// Source line.
        line: u32,
        /// Statement keyword.
        keyword: &'static str,
        /// Human description of the expected operands.
        expected: &'static str,
    },
    /// Invalid keyword operand.
    #[error("line {line}: invalid {what} '{got}'")]
    BadKeyword {
        /// Source line.
        line: u32,
        /// What kind of keyword was expected.
        what: &'static str,
        /// The offending token.
        got: String,
    },
    /// Invalid numeric operand.
    #[error("line {line}: invalid number '{got}'")]
    BadNumber {
        /// Source line.
        line: u32,
        /// The offending token.
        got: String,
    },
    /// Invalid IP address literal.
    #[error("line {line}: invalid IP address '{got}'")]
    BadAddress {
        /// Source line.
        line: u32,
        /// The offending token.
        got: String,
    },
}

/// Parses a complete CIL policy into a `Root → SrcInfo → statements` tree.
///
/// `path` is recorded in the source-info wrapper for reporting; it is not
/// opened or read here.
pub fn parse_policy(src: &str, path: &str) -> Result<CilNode, ParseError> {
    let top = read_all(src)?;
    let mut stmts = Vec::with_capacity(top.len());
    for expr in &top {
        stmts.push(statement(expr)?);
    }
    let src_info = CilNode {
        data: NodeData::SrcInfo(SrcInfo {
            kind: "cil".to_owned(),
            path: path.to_owned(),
        }),
        line: 1,
        children: stmts,
    };
    Ok(CilNode {
        data: NodeData::Root,
        line: 0,
        children: vec![src_info],
    })
}

fn statement(expr: &Sexp) -> Result<CilNode, ParseError> {
    let line = expr.line();
    let items = expr.as_list().ok_or(ParseError::ExpectedList { line })?;
    let (head, rest) = items.split_first().ok_or(ParseError::ExpectedSymbol {
        line,
        what: "a statement keyword",
    })?;
    let kw = head.as_atom().ok_or(ParseError::ExpectedSymbol {
        line,
        what: "a statement keyword",
    })?;

    let leaf = |data: NodeData| {
        Ok(CilNode {
            data,
            line,
            children: Vec::new(),
        })
    };

    match kw {
        // Type statements.
        "type" => leaf(NodeData::Type(one(rest, line, "type")?)),
        "typealias" => leaf(NodeData::TypeAlias(one(rest, line, "typealias")?)),
        "typealiasactual" => {
            let (alias, actual) = two(rest, line, "typealiasactual")?;
            leaf(NodeData::TypeAliasActual(AliasActual { alias, actual }))
        }
        "typeattribute" => leaf(NodeData::TypeAttribute(one(rest, line, "typeattribute")?)),
        "typeattributeset" => {
            leaf(NodeData::TypeAttributeSet(attribute_set(rest, line, "typeattributeset", ExprKind::Type)?))
        }
        "expandtypeattribute" => {
            let [attrs, value] = fixed::<2>(rest, line, "expandtypeattribute", "attributes and a boolean")?;
            leaf(NodeData::ExpandTypeAttribute(ExpandTypeAttribute {
                expand: boolean_kw(value)?,
                attrs: name_list(attrs)?,
            }))
        }
        "typebounds" => leaf(NodeData::Bounds(bounds(rest, line, "typebounds", BoundsKind::Type)?)),
        "typetransition" => match rest.len() {
            4 => {
                let (source, target, class, result) = four(rest, line, "typetransition")?;
                leaf(NodeData::TypeRule(TypeRule {
                    kind: TypeRuleKind::Transition,
                    source,
                    target,
                    class,
                    result,
                }))
            }
            5 => {
                let (source, target, class, object_name, result) = five(rest, line, "typetransition")?;
                leaf(NodeData::NameTypeTransition(NameTypeTransition {
                    source,
                    target,
                    class,
                    object_name,
                    result,
                }))
            }
            _ => Err(ParseError::BadArity {
                line,
                keyword: "typetransition",
                expected: "four or five operands",
            }),
        },
        "typechange" => leaf(NodeData::TypeRule(type_rule(rest, line, "typechange", TypeRuleKind::Change)?)),
        "typemember" => leaf(NodeData::TypeRule(type_rule(rest, line, "typemember", TypeRuleKind::Member)?)),
        "typepermissive" => leaf(NodeData::TypePermissive(one(rest, line, "typepermissive")?)),

        // Access-vector rules.
        "allow" => leaf(NodeData::AvRule(av_rule(rest, line, "allow", AvRuleKind::Allow)?)),
        "auditallow" => leaf(NodeData::AvRule(av_rule(rest, line, "auditallow", AvRuleKind::AuditAllow)?)),
        "dontaudit" => leaf(NodeData::AvRule(av_rule(rest, line, "dontaudit", AvRuleKind::DontAudit)?)),
        "neverallow" => leaf(NodeData::AvRule(av_rule(rest, line, "neverallow", AvRuleKind::NeverAllow)?)),
        "allowx" => leaf(NodeData::AvRule(av_rule_x(rest, line, "allowx", AvRuleKind::Allow)?)),
        "auditallowx" => leaf(NodeData::AvRule(av_rule_x(rest, line, "auditallowx", AvRuleKind::AuditAllow)?)),
        "dontauditx" => leaf(NodeData::AvRule(av_rule_x(rest, line, "dontauditx", AvRuleKind::DontAudit)?)),
        "neverallowx" => leaf(NodeData::AvRule(av_rule_x(rest, line, "neverallowx", AvRuleKind::NeverAllow)?)),
        "deny" => {
            let [source, target, perms] = fixed::<3>(rest, line, "deny", "source, target and permissions")?;
            leaf(NodeData::DenyRule(DenyRule {
                source: atom(source, "a source name")?,
                target: atom(target, "a target name")?,
                perms: class_perms_item(perms)?,
            }))
        }

        // Call / macro statements.
        "call" => {
            let (head, args) = rest.split_first().ok_or(ParseError::BadArity {
                line,
                keyword: "call",
                expected: "a macro name and optional arguments",
            })?;
            let macro_name = atom(head, "a macro name")?;
            let args = match args {
                [Sexp::List(items, _)] => items.iter().map(call_arg).collect::<Result<_, _>>()?,
                other => other.iter().map(call_arg).collect::<Result<_, _>>()?,
            };
            leaf(NodeData::Call(Call { macro_name, args }))
        }
        "macro" => {
            let (name, params, body) = match rest {
                [name, params, body @ ..] => (atom(name, "a macro name")?, params, body),
                _ => {
                    return Err(ParseError::BadArity {
                        line,
                        keyword: "macro",
                        expected: "a name, a parameter list and a body",
                    })
                }
            };
            let params = params
                .as_list()
                .ok_or(ParseError::ExpectedSymbol {
                    line: params.line(),
                    what: "a parameter list",
                })?
                .iter()
                .map(macro_param)
                .collect::<Result<_, _>>()?;
            Ok(CilNode {
                data: NodeData::Macro(Macro { name, params }),
                line,
                children: statements(body)?,
            })
        }

        // Class and permission statements.
        "class" => class_like(rest, line, "class", NodeData::Class, Flavor::Perm),
        "common" => class_like(rest, line, "common", NodeData::Common, Flavor::Perm),
        "classmap" => class_like(rest, line, "classmap", NodeData::ClassMap, Flavor::MapPerm),
        "classcommon" => {
            let (class, common) = two(rest, line, "classcommon")?;
            leaf(NodeData::ClassCommon(ClassCommon { class, common }))
        }
        "classorder" => leaf(NodeData::Ordered(ordered(rest, line, "classorder", OrderedKind::Class, true)?)),
        "classpermission" => leaf(NodeData::ClassPermission(one(rest, line, "classpermission")?)),
        "classpermissionset" => {
            let [set, perms] = fixed::<2>(rest, line, "classpermissionset", "a set name and class permissions")?;
            let perms = match class_perms_item(perms)? {
                ClassPermsItem::Perms(perms) => perms,
                ClassPermsItem::Set(got) => {
                    return Err(ParseError::BadKeyword {
                        line: perms.line(),
                        what: "class permissions",
                        got,
                    })
                }
            };
            leaf(NodeData::ClassPermissionSet(ClassPermissionSet {
                set: atom(set, "a classpermission name")?,
                perms,
            }))
        }
        "classmapping" => {
            let [classmap, mapping, perms] = fixed::<3>(rest, line, "classmapping", "a classmap, a mapping and permissions")?;
            leaf(NodeData::ClassMapping(ClassMapping {
                classmap: atom(classmap, "a classmap name")?,
                mapping: atom(mapping, "a classmap permission")?,
                perms: class_perms_item(perms)?,
            }))
        }
        "permissionx" => {
            let [name, body] = fixed::<2>(rest, line, "permissionx", "a name and an extended permission tuple")?;
            let mut permx = perm_x(body)?;
            permx.name = Some(atom(name, "a permissionx name")?);
            leaf(NodeData::PermissionX(permx))
        }

        // Conditional statements.
        "boolean" => {
            let [name, value] = fixed::<2>(rest, line, "boolean", "a name and a boolean")?;
            leaf(NodeData::Boolean(Boolean {
                name: atom(name, "a boolean name")?,
                value: boolean_kw(value)?,
            }))
        }
        "booleanif" => conditional(rest, line, "booleanif", ExprKind::Bool, |condition| {
            NodeData::BooleanIf(BooleanIf { condition })
        }),
        "tunable" => {
            let [name, value] = fixed::<2>(rest, line, "tunable", "a name and a boolean")?;
            leaf(NodeData::Tunable(Tunable {
                name: atom(name, "a tunable name")?,
                value: boolean_kw(value)?,
            }))
        }
        "tunableif" => conditional(rest, line, "tunableif", ExprKind::Tunable, |condition| {
            NodeData::TunableIf(TunableIf { condition })
        }),

        // Constraint statements.
        "constrain" => leaf(NodeData::Constrain(constrain(rest, line, "constrain", false)?)),
        "mlsconstrain" => leaf(NodeData::Constrain(constrain(rest, line, "mlsconstrain", true)?)),
        "validatetrans" => leaf(NodeData::ValidateTrans(validate_trans(rest, line, "validatetrans", false)?)),
        "mlsvalidatetrans" => leaf(NodeData::ValidateTrans(validate_trans(rest, line, "mlsvalidatetrans", true)?)),

        // Container statements.
        "block" => container(rest, line, "block", NodeData::Block),
        "blockabstract" => leaf(NodeData::BlockAbstract(one(rest, line, "blockabstract")?)),
        "blockinherit" => leaf(NodeData::BlockInherit(one(rest, line, "blockinherit")?)),
        "optional" => container(rest, line, "optional", NodeData::Optional),
        "in" => {
            let (after, rest) = match rest {
                [pos, tail @ ..] if pos.as_atom() == Some("before") && !tail.is_empty() => (false, tail),
                [pos, tail @ ..] if pos.as_atom() == Some("after") && !tail.is_empty() => (true, tail),
                _ => (false, rest),
            };
            let (block, body) = rest.split_first().ok_or(ParseError::BadArity {
                line,
                keyword: "in",
                expected: "a block name and a body",
            })?;
            Ok(CilNode {
                data: NodeData::In(In {
                    after,
                    block: atom(block, "a block name")?,
                }),
                line,
                children: statements(body)?,
            })
        }

        // Context statement.
        "context" => {
            let [name, body] = fixed::<2>(rest, line, "context", "a name and a context tuple")?;
            let mut context = context_tuple(body)?;
            context.name = Some(atom(name, "a context name")?);
            leaf(NodeData::Context(context))
        }

        // Default object statements.
        "defaultuser" => leaf(NodeData::Default(default(rest, line, "defaultuser", DefaultKind::User)?)),
        "defaultrole" => leaf(NodeData::Default(default(rest, line, "defaultrole", DefaultKind::Role)?)),
        "defaulttype" => leaf(NodeData::Default(default(rest, line, "defaulttype", DefaultKind::Type)?)),
        "defaultrange" => {
            let (classes, spec) = rest.split_first().ok_or(ParseError::BadArity {
                line,
                keyword: "defaultrange",
                expected: "classes and a range selector",
            })?;
            let object = match spec {
                [obj] if obj.as_atom() == Some("glblub") => DefaultRangeObject::Glblub,
                [obj, range] => default_range_object(obj, range)?,
                _ => {
                    return Err(ParseError::BadArity {
                        line,
                        keyword: "defaultrange",
                        expected: "'glblub' or an object and a range selector",
                    })
                }
            };
            leaf(NodeData::DefaultRange(DefaultRange {
                object,
                classes: name_list(classes)?,
            }))
        }

        // File labeling statements.
        "filecon" => {
            let [path, ftype, context] = fixed::<3>(rest, line, "filecon", "a path, a file type and a context")?;
            let context = match context {
                Sexp::List(items, _) if items.is_empty() => None,
                other => Some(context_ref(other)?),
            };
            leaf(NodeData::FileCon(FileCon {
                path: atom(path, "a path")?,
                file_type: file_type(ftype)?,
                context,
            }))
        }
        "fsuse" => {
            let [kind, fs, context] = fixed::<3>(rest, line, "fsuse", "a kind, a filesystem and a context")?;
            let kind = match atom(kind, "a labeling kind")?.as_str() {
                "xattr" => FsUseKind::Xattr,
                "task" => FsUseKind::Task,
                "trans" => FsUseKind::Trans,
                got => {
                    return Err(ParseError::BadKeyword {
                        line: kind.line(),
                        what: "fsuse kind",
                        got: got.to_owned(),
                    })
                }
            };
            leaf(NodeData::FsUse(FsUse {
                kind,
                fs: atom(fs, "a filesystem name")?,
                context: context_ref(context)?,
            }))
        }
        "genfscon" => match rest {
            [fs, path, context] => leaf(NodeData::GenfsCon(GenfsCon {
                fs: atom(fs, "a filesystem name")?,
                path: atom(path, "a path")?,
                file_type: FileType::Any,
                context: context_ref(context)?,
            })),
            [fs, path, ftype, context] => leaf(NodeData::GenfsCon(GenfsCon {
                fs: atom(fs, "a filesystem name")?,
                path: atom(path, "a path")?,
                file_type: file_type(ftype)?,
                context: context_ref(context)?,
            })),
            _ => Err(ParseError::BadArity {
                line,
                keyword: "genfscon",
                expected: "a filesystem, a path, an optional file type and a context",
            }),
        },

        // Infiniband statements.
        "ibpkeycon" => {
            let [subnet, low, high, context] = fixed::<4>(rest, line, "ibpkeycon", "a subnet prefix, two pkeys and a context")?;
            leaf(NodeData::IbPkeyCon(IbPkeyCon {
                subnet_prefix: atom(subnet, "a subnet prefix")?,
                low: number_u32(low)?,
                high: number_u32(high)?,
                context: context_ref(context)?,
            }))
        }
        "ibendportcon" => {
            let [device, port, context] = fixed::<3>(rest, line, "ibendportcon", "a device, a port and a context")?;
            leaf(NodeData::IbEndPortCon(IbEndPortCon {
                device: atom(device, "a device name")?,
                port: number_u32(port)?,
                context: context_ref(context)?,
            }))
        }

        // Multi-level security statements.
        "sensitivity" => leaf(NodeData::Sensitivity(one(rest, line, "sensitivity")?)),
        "sensitivityalias" => leaf(NodeData::SensitivityAlias(one(rest, line, "sensitivityalias")?)),
        "sensitivityaliasactual" => {
            let (alias, actual) = two(rest, line, "sensitivityaliasactual")?;
            leaf(NodeData::SensitivityAliasActual(AliasActual { alias, actual }))
        }
        "sensitivityorder" => {
            leaf(NodeData::Ordered(ordered(rest, line, "sensitivityorder", OrderedKind::Sensitivity, false)?))
        }
        "category" => leaf(NodeData::Category(one(rest, line, "category")?)),
        "categoryalias" => leaf(NodeData::CategoryAlias(one(rest, line, "categoryalias")?)),
        "categoryaliasactual" => {
            let (alias, actual) = two(rest, line, "categoryaliasactual")?;
            leaf(NodeData::CategoryAliasActual(AliasActual { alias, actual }))
        }
        "categoryorder" => leaf(NodeData::Ordered(ordered(rest, line, "categoryorder", OrderedKind::Category, false)?)),
        "categoryset" => {
            let [name, cats] = fixed::<2>(rest, line, "categoryset", "a name and a category expression")?;
            leaf(NodeData::CategorySet(CategorySet {
                name: Some(atom(name, "a categoryset name")?),
                cats: expression(cats, ExprKind::Cat)?,
            }))
        }
        "sensitivitycategory" => {
            let [sens, cats] = fixed::<2>(rest, line, "sensitivitycategory", "a sensitivity and categories")?;
            leaf(NodeData::SensCat(SensCat {
                sens: atom(sens, "a sensitivity name")?,
                cats: expression(cats, ExprKind::Cat)?,
            }))
        }
        "level" => {
            let [name, body] = fixed::<2>(rest, line, "level", "a name and a level tuple")?;
            let mut level = level_tuple(body)?;
            level.name = Some(atom(name, "a level name")?);
            leaf(NodeData::Level(level))
        }
        "levelrange" => {
            let [name, body] = fixed::<2>(rest, line, "levelrange", "a name and a range tuple")?;
            let mut range = level_range_tuple(body)?;
            range.name = Some(atom(name, "a levelrange name")?);
            leaf(NodeData::LevelRange(range))
        }
        "rangetransition" => {
            let [source, exec, class, range] = fixed::<4>(rest, line, "rangetransition", "source, exec, class and a range")?;
            leaf(NodeData::RangeTransition(RangeTransition {
                source: atom(source, "a source type")?,
                exec: atom(exec, "an executable type")?,
                class: atom(class, "a class name")?,
                range: level_range_ref(range)?,
            }))
        }

        // Network labeling statements.
        "ipaddr" => {
            let (name, addr) = two(rest, line, "ipaddr")?;
            let parsed: IpAddr = addr.parse().map_err(|_| ParseError::BadAddress {
                line,
                got: addr.clone(),
            })?;
            leaf(NodeData::IpAddr(IpAddrDecl {
                name: Some(name),
                addr: parsed,
            }))
        }
        "netifcon" => {
            let [interface, if_context, packet_context] = fixed::<3>(rest, line, "netifcon", "an interface and two contexts")?;
            leaf(NodeData::NetifCon(NetifCon {
                interface: atom(interface, "an interface name")?,
                if_context: context_ref(if_context)?,
                packet_context: context_ref(packet_context)?,
            }))
        }
        "nodecon" => {
            let [addr, mask, context] = fixed::<3>(rest, line, "nodecon", "an address, a mask and a context")?;
            leaf(NodeData::NodeCon(NodeCon {
                addr: ip_ref(addr)?,
                mask: ip_ref(mask)?,
                context: context_ref(context)?,
            }))
        }
        "portcon" => {
            let [proto, ports, context] = fixed::<3>(rest, line, "portcon", "a protocol, ports and a context")?;
            let proto = match atom(proto, "a protocol")?.as_str() {
                "tcp" => Proto::Tcp,
                "udp" => Proto::Udp,
                "dccp" => Proto::Dccp,
                "sctp" => Proto::Sctp,
                got => {
                    return Err(ParseError::BadKeyword {
                        line: proto.line(),
                        what: "protocol",
                        got: got.to_owned(),
                    })
                }
            };
            let (low, high) = number_range_u32(ports)?;
            leaf(NodeData::PortCon(PortCon {
                proto,
                low,
                high,
                context: context_ref(context)?,
            }))
        }

        // Policy configuration statements.
        "mls" => {
            let [value] = fixed::<1>(rest, line, "mls", "a boolean")?;
            leaf(NodeData::Mls(boolean_kw(value)?))
        }
        "handleunknown" => {
            let [action] = fixed::<1>(rest, line, "handleunknown", "an action")?;
            let action = match atom(action, "an action")?.as_str() {
                "allow" => HandleUnknown::Allow,
                "deny" => HandleUnknown::Deny,
                "reject" => HandleUnknown::Reject,
                got => {
                    return Err(ParseError::BadKeyword {
                        line: action.line(),
                        what: "handleunknown action",
                        got: got.to_owned(),
                    })
                }
            };
            leaf(NodeData::HandleUnknown(action))
        }
        "policycap" => leaf(NodeData::PolicyCap(one(rest, line, "policycap")?)),

        // Role statements.
        "role" => leaf(NodeData::Role(one(rest, line, "role")?)),
        "roletype" => {
            let (role, ty) = two(rest, line, "roletype")?;
            leaf(NodeData::RoleType(RoleType { role, ty }))
        }
        "roleattribute" => leaf(NodeData::RoleAttribute(one(rest, line, "roleattribute")?)),
        "roleattributeset" => {
            leaf(NodeData::RoleAttributeSet(attribute_set(rest, line, "roleattributeset", ExprKind::Role)?))
        }
        "roleallow" => {
            let (source, target) = two(rest, line, "roleallow")?;
            leaf(NodeData::RoleAllow(RoleAllow { source, target }))
        }
        "roletransition" => {
            let (source, target, class, result) = four(rest, line, "roletransition")?;
            leaf(NodeData::RoleTransition(RoleTransition {
                source,
                target,
                class,
                result,
            }))
        }
        "rolebounds" => leaf(NodeData::Bounds(bounds(rest, line, "rolebounds", BoundsKind::Role)?)),

        // SID statements.
        "sid" => leaf(NodeData::Sid(one(rest, line, "sid")?)),
        "sidorder" => leaf(NodeData::Ordered(ordered(rest, line, "sidorder", OrderedKind::Sid, false)?)),
        "sidcontext" => {
            let [sid, context] = fixed::<2>(rest, line, "sidcontext", "a SID and a context")?;
            leaf(NodeData::SidContext(SidContext {
                sid: atom(sid, "a SID name")?,
                context: context_ref(context)?,
            }))
        }

        // User statements.
        "user" => leaf(NodeData::User(one(rest, line, "user")?)),
        "userrole" => {
            let (user, role) = two(rest, line, "userrole")?;
            leaf(NodeData::UserRole(UserRole { user, role }))
        }
        "userattribute" => leaf(NodeData::UserAttribute(one(rest, line, "userattribute")?)),
        "userattributeset" => {
            leaf(NodeData::UserAttributeSet(attribute_set(rest, line, "userattributeset", ExprKind::User)?))
        }
        "userlevel" => {
            let [user, level] = fixed::<2>(rest, line, "userlevel", "a user and a level")?;
            leaf(NodeData::UserLevel(UserLevel {
                user: atom(user, "a user name")?,
                level: level_ref(level)?,
            }))
        }
        "userrange" => {
            let [user, range] = fixed::<2>(rest, line, "userrange", "a user and a range")?;
            leaf(NodeData::UserRange(UserRange {
                user: atom(user, "a user name")?,
                range: level_range_ref(range)?,
            }))
        }
        "userbounds" => leaf(NodeData::Bounds(bounds(rest, line, "userbounds", BoundsKind::User)?)),
        "userprefix" => {
            let (user, prefix) = two(rest, line, "userprefix")?;
            leaf(NodeData::UserPrefix(UserPrefix { user, prefix }))
        }
        "selinuxuser" => {
            let [name, user, range] = fixed::<3>(rest, line, "selinuxuser", "a name, a user and a range")?;
            leaf(NodeData::SelinuxUser(SelinuxUser {
                name: atom(name, "an OS user name")?,
                user: atom(user, "a SELinux user")?,
                range: level_range_ref(range)?,
            }))
        }
        "selinuxuserdefault" => {
            let [user, range] = fixed::<2>(rest, line, "selinuxuserdefault", "a user and a range")?;
            leaf(NodeData::SelinuxUserDefault(SelinuxUserDefault {
                user: atom(user, "a SELinux user")?,
                range: level_range_ref(range)?,
            }))
        }

        // Xen statements.
        "iomemcon" => {
            let [range, context] = fixed::<2>(rest, line, "iomemcon", "a memory range and a context")?;
            let (low, high) = number_range_u64(range)?;
            leaf(NodeData::IomemCon(IomemCon {
                low,
                high,
                context: context_ref(context)?,
            }))
        }
        "ioportcon" => {
            let [range, context] = fixed::<2>(rest, line, "ioportcon", "a port range and a context")?;
            let (low, high) = number_range_u32(range)?;
            leaf(NodeData::IoportCon(IoportCon {
                low,
                high,
                context: context_ref(context)?,
            }))
        }
        "pcidevicecon" => {
            let [device, context] = fixed::<2>(rest, line, "pcidevicecon", "a device and a context")?;
            leaf(NodeData::PciDeviceCon(PciDeviceCon {
                device: number_u32(device)?,
                context: context_ref(context)?,
            }))
        }
        "pirqcon" => {
            let [irq, context] = fixed::<2>(rest, line, "pirqcon", "an interrupt and a context")?;
            leaf(NodeData::PirqCon(PirqCon {
                irq: number_u32(irq)?,
                context: context_ref(context)?,
            }))
        }
        "devicetreecon" => {
            let [path, context] = fixed::<2>(rest, line, "devicetreecon", "a path and a context")?;
            leaf(NodeData::DeviceTreeCon(DeviceTreeCon {
                path: atom(path, "a device-tree path")?,
                context: context_ref(context)?,
            }))
        }

        _ => Err(ParseError::UnknownStatement {
            line,
            keyword: kw.to_owned(),
        }),
    }
}

fn statements(body: &[Sexp]) -> Result<Vec<CilNode>, ParseError> {
    body.iter().map(statement).collect()
}

// Operand helpers. `fixed` slices an exact operand count; the small-arity
// helpers additionally require every operand to be a symbol.

fn fixed<'a, const N: usize>(
    rest: &'a [Sexp],
    line: u32,
    keyword: &'static str,
    expected: &'static str,
) -> Result<[&'a Sexp; N], ParseError> {
    if rest.len() != N {
        return Err(ParseError::BadArity {
            line,
            keyword,
            expected,
        });
    }
    let mut out = [&rest[0]; N];
    for (slot, item) in out.iter_mut().zip(rest.iter()) {
        *slot = item;
    }
    Ok(out)
}

fn atom(e: &Sexp, what: &'static str) -> Result<String, ParseError> {
    e.as_atom()
        .map(ToOwned::to_owned)
        .ok_or(ParseError::ExpectedSymbol {
            line: e.line(),
            what,
        })
}

fn one(rest: &[Sexp], line: u32, keyword: &'static str) -> Result<String, ParseError> {
    let [a] = fixed::<1>(rest, line, keyword, "one name")?;
    atom(a, "a name")
}

fn two(rest: &[Sexp], line: u32, keyword: &'static str) -> Result<(String, String), ParseError> {
    let [a, b] = fixed::<2>(rest, line, keyword, "two names")?;
    Ok((atom(a, "a name")?, atom(b, "a name")?))
}

fn four(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
) -> Result<(String, String, String, String), ParseError> {
    let [a, b, c, d] = fixed::<4>(rest, line, keyword, "four names")?;
    Ok((
        atom(a, "a name")?,
        atom(b, "a name")?,
        atom(c, "a name")?,
        atom(d, "a name")?,
    ))
}

fn five(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
) -> Result<(String, String, String, String, String), ParseError> {
    let [a, b, c, d, e] = fixed::<5>(rest, line, keyword, "five names")?;
    Ok((
        atom(a, "a name")?,
        atom(b, "a name")?,
        atom(c, "a name")?,
        atom(d, "a name")?,
        atom(e, "a name")?,
    ))
}

fn boolean_kw(e: &Sexp) -> Result<bool, ParseError> {
    match e.as_atom() {
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        _ => Err(ParseError::BadKeyword {
            line: e.line(),
            what: "boolean",
            got: e.as_atom().unwrap_or("(...)").to_owned(),
        }),
    }
}

fn number_u32(e: &Sexp) -> Result<u32, ParseError> {
    let text = atom(e, "a number")?;
    parse_number(&text).ok_or(ParseError::BadNumber {
        line: e.line(),
        got: text,
    })
}

fn number_u64(e: &Sexp) -> Result<u64, ParseError> {
    let text = atom(e, "a number")?;
    parse_number_u64(&text).ok_or(ParseError::BadNumber {
        line: e.line(),
        got: text,
    })
}

fn parse_number(text: &str) -> Option<u32> {
    parse_number_u64(text).and_then(|v| u32::try_from(v).ok())
}

fn parse_number_u64(text: &str) -> Option<u64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

fn number_range_u32(e: &Sexp) -> Result<(u32, u32), ParseError> {
    match e {
        Sexp::List(items, line) => match items.as_slice() {
            [low, high] => Ok((number_u32(low)?, number_u32(high)?)),
            _ => Err(ParseError::ExpectedSymbol {
                line: *line,
                what: "a (low high) pair",
            }),
        },
        atom => {
            let value = number_u32(atom)?;
            Ok((value, value))
        }
    }
}

fn number_range_u64(e: &Sexp) -> Result<(u64, u64), ParseError> {
    match e {
        Sexp::List(items, line) => match items.as_slice() {
            [low, high] => Ok((number_u64(low)?, number_u64(high)?)),
            _ => Err(ParseError::ExpectedSymbol {
                line: *line,
                what: "a (low high) pair",
            }),
        },
        atom => {
            let value = number_u64(atom)?;
            Ok((value, value))
        }
    }
}

/// A bare name or a list of names.
fn name_list(e: &Sexp) -> Result<Vec<String>, ParseError> {
    match e {
        Sexp::Atom(s, _) => Ok(vec![s.clone()]),
        Sexp::List(items, _) => items.iter().map(|i| atom(i, "a name")).collect(),
    }
}

// Statement-shape helpers.

fn container(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    make: fn(String) -> NodeData,
) -> Result<CilNode, ParseError> {
    let (name, body) = rest.split_first().ok_or(ParseError::BadArity {
        line,
        keyword,
        expected: "a name and a body",
    })?;
    Ok(CilNode {
        data: make(atom(name, "a name")?),
        line,
        children: statements(body)?,
    })
}

fn class_like(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    make: fn(String) -> NodeData,
    perm_flavor: Flavor,
) -> Result<CilNode, ParseError> {
    let [name, perms] = fixed::<2>(rest, line, keyword, "a name and a permission list")?;
    let perms = perms.as_list().ok_or(ParseError::ExpectedSymbol {
        line: perms.line(),
        what: "a permission list",
    })?;
    let children = perms
        .iter()
        .map(|p| {
            let name = atom(p, "a permission name")?;
            Ok(CilNode {
                data: if perm_flavor == Flavor::MapPerm {
                    NodeData::MapPerm(name)
                } else {
                    NodeData::Perm(name)
                },
                line: p.line(),
                children: Vec::new(),
            })
        })
        .collect::<Result<_, ParseError>>()?;
    Ok(CilNode {
        data: make(atom(name, "a name")?),
        line,
        children,
    })
}

fn conditional(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    kind: ExprKind,
    make: fn(Expr) -> NodeData,
) -> Result<CilNode, ParseError> {
    let (cond, branches) = rest.split_first().ok_or(ParseError::BadArity {
        line,
        keyword,
        expected: "a condition and at least one branch",
    })?;
    let condition = expression(cond, kind)?;
    let mut children = Vec::with_capacity(branches.len());
    for branch in branches {
        let items = branch.as_list().ok_or(ParseError::ExpectedSymbol {
            line: branch.line(),
            what: "a (true ...) or (false ...) branch",
        })?;
        let (head, body) = items.split_first().ok_or(ParseError::ExpectedSymbol {
            line: branch.line(),
            what: "a branch keyword",
        })?;
        let value = match head.as_atom() {
            Some("true") => true,
            Some("false") => false,
            _ => {
                return Err(ParseError::BadKeyword {
                    line: branch.line(),
                    what: "branch keyword",
                    got: head.as_atom().unwrap_or("(...)").to_owned(),
                })
            }
        };
        children.push(CilNode {
            data: NodeData::CondBlock(CondBlock { value }),
            line: branch.line(),
            children: statements(body)?,
        });
    }
    Ok(CilNode {
        data: make(condition),
        line,
        children,
    })
}

fn ordered(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    kind: OrderedKind,
    allow_unordered: bool,
) -> Result<Ordered, ParseError> {
    let [list] = fixed::<1>(rest, line, keyword, "an order list")?;
    let mut names = name_list(list)?;
    let unordered = names.first().map(String::as_str) == Some("unordered");
    if unordered {
        if !allow_unordered {
            return Err(ParseError::BadKeyword {
                line: list.line(),
                what: "order entry",
                got: "unordered".to_owned(),
            });
        }
        names.remove(0);
    }
    Ok(Ordered {
        kind,
        unordered,
        order: names,
    })
}

fn bounds(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    kind: BoundsKind,
) -> Result<Bounds, ParseError> {
    let (parent, child) = two(rest, line, keyword)?;
    Ok(Bounds {
        kind,
        parent,
        child,
    })
}

fn type_rule(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    kind: TypeRuleKind,
) -> Result<TypeRule, ParseError> {
    let (source, target, class, result) = four(rest, line, keyword)?;
    Ok(TypeRule {
        kind,
        source,
        target,
        class,
        result,
    })
}

fn av_rule(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    kind: AvRuleKind,
) -> Result<AvRule, ParseError> {
    let [source, target, perms] = fixed::<3>(rest, line, keyword, "source, target and permissions")?;
    Ok(AvRule {
        kind,
        source: atom(source, "a source name")?,
        target: atom(target, "a target name")?,
        perms: AvPerms::Class(class_perms_item(perms)?),
    })
}

fn av_rule_x(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    kind: AvRuleKind,
) -> Result<AvRule, ParseError> {
    let [source, target, perms] = fixed::<3>(rest, line, keyword, "source, target and permissions")?;
    let perms = match perms {
        Sexp::Atom(name, _) => Ref::Named(name.clone()),
        list => Ref::Inline(Box::new(perm_x(list)?)),
    };
    Ok(AvRule {
        kind,
        source: atom(source, "a source name")?,
        target: atom(target, "a target name")?,
        perms: AvPerms::Extended(perms),
    })
}

fn attribute_set(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    kind: ExprKind,
) -> Result<AttributeSet, ParseError> {
    let [attr, expr] = fixed::<2>(rest, line, keyword, "an attribute and an expression")?;
    Ok(AttributeSet {
        attr: atom(attr, "an attribute name")?,
        expr: expression(expr, kind)?,
    })
}

fn constrain(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    mls: bool,
) -> Result<Constrain, ParseError> {
    let [perms, expr] = fixed::<2>(rest, line, keyword, "class permissions and a constraint")?;
    let kind = if mls {
        ExprKind::MlsConstraint
    } else {
        ExprKind::Constraint
    };
    Ok(Constrain {
        mls,
        perms: class_perms_item(perms)?,
        expr: expression(expr, kind)?,
    })
}

fn validate_trans(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    mls: bool,
) -> Result<ValidateTrans, ParseError> {
    let [class, expr] = fixed::<2>(rest, line, keyword, "a class and a constraint")?;
    let kind = if mls {
        ExprKind::MlsConstraint
    } else {
        ExprKind::Constraint
    };
    Ok(ValidateTrans {
        mls,
        class: atom(class, "a class name")?,
        expr: expression(expr, kind)?,
    })
}

fn default(
    rest: &[Sexp],
    line: u32,
    keyword: &'static str,
    kind: DefaultKind,
) -> Result<Default, ParseError> {
    let [classes, object] = fixed::<2>(rest, line, keyword, "classes and 'source' or 'target'")?;
    let object = match atom(object, "'source' or 'target'")?.as_str() {
        "source" => DefaultObject::Source,
        "target" => DefaultObject::Target,
        got => {
            return Err(ParseError::BadKeyword {
                line: object.line(),
                what: "default object",
                got: got.to_owned(),
            })
        }
    };
    Ok(Default {
        kind,
        object,
        classes: name_list(classes)?,
    })
}

fn file_type(e: &Sexp) -> Result<FileType, ParseError> {
    match atom(e, "a file type")?.as_str() {
        "any" => Ok(FileType::Any),
        "file" => Ok(FileType::File),
        "dir" => Ok(FileType::Dir),
        "char" => Ok(FileType::Char),
        "block" => Ok(FileType::Block),
        "socket" => Ok(FileType::Socket),
        "pipe" => Ok(FileType::Pipe),
        "symlink" => Ok(FileType::Symlink),
        got => Err(ParseError::BadKeyword {
            line: e.line(),
            what: "file type",
            got: got.to_owned(),
        }),
    }
}

fn default_range_object(obj: &Sexp, range: &Sexp) -> Result<DefaultRangeObject, ParseError> {
    let source = match atom(obj, "'source' or 'target'")?.as_str() {
        "source" => true,
        "target" => false,
        got => {
            return Err(ParseError::BadKeyword {
                line: obj.line(),
                what: "default object",
                got: got.to_owned(),
            })
        }
    };
    match (source, atom(range, "a range selector")?.as_str()) {
        (true, "low") => Ok(DefaultRangeObject::SourceLow),
        (true, "high") => Ok(DefaultRangeObject::SourceHigh),
        (true, "low-high") => Ok(DefaultRangeObject::SourceLowHigh),
        (false, "low") => Ok(DefaultRangeObject::TargetLow),
        (false, "high") => Ok(DefaultRangeObject::TargetHigh),
        (false, "low-high") => Ok(DefaultRangeObject::TargetLowHigh),
        (_, got) => Err(ParseError::BadKeyword {
            line: range.line(),
            what: "range selector",
            got: got.to_owned(),
        }),
    }
}

fn macro_param(e: &Sexp) -> Result<MacroParam, ParseError> {
    let items = e.as_list().ok_or(ParseError::ExpectedSymbol {
        line: e.line(),
        what: "a (flavor name) parameter",
    })?;
    let [flavor, name] = match items {
        [a, b] => [a, b],
        _ => {
            return Err(ParseError::ExpectedSymbol {
                line: e.line(),
                what: "a (flavor name) parameter",
            })
        }
    };
    let flavor = match atom(flavor, "a parameter flavor")?.as_str() {
        "type" => Flavor::Type,
        "typealias" => Flavor::TypeAlias,
        "role" => Flavor::Role,
        "user" => Flavor::User,
        "sensitivity" => Flavor::Sensitivity,
        "category" => Flavor::Category,
        "categoryset" => Flavor::CategorySet,
        "level" => Flavor::Level,
        "levelrange" => Flavor::LevelRange,
        "class" => Flavor::Class,
        "classpermission" => Flavor::ClassPermission,
        "classmap" => Flavor::ClassMap,
        "ipaddr" => Flavor::IpAddr,
        "boolean" => Flavor::Boolean,
        "string" => Flavor::String,
        "name" => Flavor::Name,
        got => {
            return Err(ParseError::BadKeyword {
                line: e.line(),
                what: "parameter flavor",
                got: got.to_owned(),
            })
        }
    };
    Ok(MacroParam {
        flavor,
        name: atom(name, "a parameter name")?,
    })
}

fn call_arg(e: &Sexp) -> Result<CallArg, ParseError> {
    match e {
        Sexp::Atom(s, _) => Ok(CallArg::Symbol(s.clone())),
        Sexp::List(items, _) => Ok(CallArg::List(
            items.iter().map(call_arg).collect::<Result<_, _>>()?,
        )),
    }
}

// Anonymous-or-named reference helpers.

fn class_perms_item(e: &Sexp) -> Result<ClassPermsItem, ParseError> {
    match e {
        Sexp::Atom(name, _) => Ok(ClassPermsItem::Set(name.clone())),
        Sexp::List(items, line) => match items.as_slice() {
            [class, perms] => Ok(ClassPermsItem::Perms(ClassPerms {
                class: atom(class, "a class name")?,
                perms: expression(perms, ExprKind::Perm)?,
            })),
            _ => Err(ParseError::ExpectedSymbol {
                line: *line,
                what: "a (class (permissions ...)) pair",
            }),
        },
    }
}

fn perm_x(e: &Sexp) -> Result<PermX, ParseError> {
    let items = e.as_list().ok_or(ParseError::ExpectedSymbol {
        line: e.line(),
        what: "a (kind class expression) tuple",
    })?;
    let [kind, class, perms] = match items {
        [a, b, c] => [a, b, c],
        _ => {
            return Err(ParseError::ExpectedSymbol {
                line: e.line(),
                what: "a (kind class expression) tuple",
            })
        }
    };
    let kind = match atom(kind, "'ioctl' or 'nlmsg'")?.as_str() {
        "ioctl" => PermXKind::Ioctl,
        "nlmsg" => PermXKind::Nlmsg,
        got => {
            return Err(ParseError::BadKeyword {
                line: e.line(),
                what: "permissionx kind",
                got: got.to_owned(),
            })
        }
    };
    Ok(PermX {
        name: None,
        kind,
        class: atom(class, "a class name")?,
        perms: expression(perms, ExprKind::Perm)?,
    })
}

fn context_ref(e: &Sexp) -> Result<Ref<Context>, ParseError> {
    match e {
        Sexp::Atom(name, _) => Ok(Ref::Named(name.clone())),
        list => Ok(Ref::Inline(Box::new(context_tuple(list)?))),
    }
}

fn context_tuple(e: &Sexp) -> Result<Context, ParseError> {
    let items = e.as_list().ok_or(ParseError::ExpectedSymbol {
        line: e.line(),
        what: "a (user role type range) tuple",
    })?;
    let [user, role, ty, range] = match items {
        [a, b, c, d] => [a, b, c, d],
        _ => {
            return Err(ParseError::ExpectedSymbol {
                line: e.line(),
                what: "a (user role type range) tuple",
            })
        }
    };
    Ok(Context {
        name: None,
        user: atom(user, "a user name")?,
        role: atom(role, "a role name")?,
        ty: atom(ty, "a type name")?,
        range: level_range_ref(range)?,
    })
}

fn level_ref(e: &Sexp) -> Result<Ref<Level>, ParseError> {
    match e {
        Sexp::Atom(name, _) => Ok(Ref::Named(name.clone())),
        list => Ok(Ref::Inline(Box::new(level_tuple(list)?))),
    }
}

fn level_tuple(e: &Sexp) -> Result<Level, ParseError> {
    let items = e.as_list().ok_or(ParseError::ExpectedSymbol {
        line: e.line(),
        what: "a (sensitivity [categories]) tuple",
    })?;
    match items {
        [sens] => Ok(Level {
            name: None,
            sens: atom(sens, "a sensitivity name")?,
            cats: None,
        }),
        [sens, cats] => Ok(Level {
            name: None,
            sens: atom(sens, "a sensitivity name")?,
            cats: Some(expression(cats, ExprKind::Cat)?),
        }),
        _ => Err(ParseError::ExpectedSymbol {
            line: e.line(),
            what: "a (sensitivity [categories]) tuple",
        }),
    }
}

fn level_range_ref(e: &Sexp) -> Result<Ref<LevelRange>, ParseError> {
    match e {
        Sexp::Atom(name, _) => Ok(Ref::Named(name.clone())),
        list => Ok(Ref::Inline(Box::new(level_range_tuple(list)?))),
    }
}

fn level_range_tuple(e: &Sexp) -> Result<LevelRange, ParseError> {
    let items = e.as_list().ok_or(ParseError::ExpectedSymbol {
        line: e.line(),
        what: "a (low high) range",
    })?;
    match items {
        [low, high] => Ok(LevelRange {
            name: None,
            low: level_ref(low)?,
            high: level_ref(high)?,
        }),
        _ => Err(ParseError::ExpectedSymbol {
            line: e.line(),
            what: "a (low high) range",
        }),
    }
}

fn ip_ref(e: &Sexp) -> Result<Ref<IpAddrDecl>, ParseError> {
    let text = atom(e, "an address or ipaddr name")?;
    if let Ok(addr) = text.parse::<IpAddr>() {
        Ok(Ref::Inline(Box::new(IpAddrDecl { name: None, addr })))
    } else {
        Ok(Ref::Named(text))
    }
}

// Expressions.

fn expr_op(kw: &str) -> Option<ExprOp> {
    match kw {
        "and" => Some(ExprOp::And),
        "or" => Some(ExprOp::Or),
        "not" => Some(ExprOp::Not),
        "xor" => Some(ExprOp::Xor),
        "all" => Some(ExprOp::All),
        "eq" => Some(ExprOp::Eq),
        "neq" => Some(ExprOp::Neq),
        "range" => Some(ExprOp::Range),
        "dom" => Some(ExprOp::Dom),
        "domby" => Some(ExprOp::DomBy),
        "incomp" => Some(ExprOp::Incomp),
        _ => None,
    }
}

fn cons_operand(kw: &str) -> Option<ConsOperand> {
    match kw {
        "u1" => Some(ConsOperand::U1),
        "u2" => Some(ConsOperand::U2),
        "u3" => Some(ConsOperand::U3),
        "t1" => Some(ConsOperand::T1),
        "t2" => Some(ConsOperand::T2),
        "t3" => Some(ConsOperand::T3),
        "r1" => Some(ConsOperand::R1),
        "r2" => Some(ConsOperand::R2),
        "r3" => Some(ConsOperand::R3),
        "l1" => Some(ConsOperand::L1),
        "l2" => Some(ConsOperand::L2),
        "h1" => Some(ConsOperand::H1),
        "h2" => Some(ConsOperand::H2),
        _ => None,
    }
}

/// Parses an expression operand: a bare name or a parenthesised
/// operator/operand list.
fn expression(e: &Sexp, kind: ExprKind) -> Result<Expr, ParseError> {
    match e {
        Sexp::Atom(name, _) => Ok(Expr {
            kind,
            op: None,
            operands: vec![expr_item_atom(name, kind)],
        }),
        Sexp::List(items, _) => {
            let (op, operands) = match items.split_first() {
                Some((head, tail)) => match head.as_atom().and_then(expr_op) {
                    Some(op) => (Some(op), tail),
                    None => (None, items.as_slice()),
                },
                None => (None, items.as_slice()),
            };
            let operands = operands
                .iter()
                .map(|item| match item {
                    Sexp::Atom(name, _) => Ok(expr_item_atom(name, kind)),
                    list => Ok(ExprItem::Sub(Box::new(expression(list, kind)?))),
                })
                .collect::<Result<_, ParseError>>()?;
            Ok(Expr { kind, op, operands })
        }
    }
}

fn expr_item_atom(name: &str, kind: ExprKind) -> ExprItem {
    if matches!(kind, ExprKind::Constraint | ExprKind::MlsConstraint) {
        if let Some(operand) = cons_operand(name) {
            return ExprItem::Operand(operand);
        }
    }
    ExprItem::Name(name.to_owned())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn stmt(src: &str) -> CilNode {
        let root = parse_policy(src, "<test>").unwrap();
        let src_info = root.children.into_iter().next().unwrap();
        src_info.children.into_iter().next().unwrap()
    }

    #[test]
    fn allow_with_inline_classperms() {
        let node = stmt("(allow A B (C (D E)))");
        let NodeData::AvRule(rule) = &node.data else {
            panic!("not an avrule: {node:?}");
        };
        assert_eq!(rule.kind, AvRuleKind::Allow);
        assert_eq!(rule.source, "A");
        let AvPerms::Class(ClassPermsItem::Perms(perms)) = &rule.perms else {
            panic!("expected inline classperms");
        };
        assert_eq!(perms.class, "C");
        assert_eq!(perms.perms.operands.len(), 2);
    }

    #[test]
    fn named_typetransition_has_five_operands() {
        let node = stmt("(typetransition S T proc \"obj\" R)");
        assert!(matches!(node.data, NodeData::NameTypeTransition(_)));
        let node = stmt("(typetransition S T proc R)");
        assert!(matches!(node.data, NodeData::TypeRule(_)));
    }

    #[test]
    fn booleanif_branches_become_condblocks() {
        let node = stmt("(booleanif (and b1 b2) (true (allow A B (C (D)))) (false (type t)))");
        assert_eq!(node.flavor(), Flavor::BooleanIf);
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].data, NodeData::CondBlock(CondBlock { value: true }));
        assert_eq!(node.children[1].children[0].flavor(), Flavor::Type);
    }

    #[test]
    fn class_children_are_perm_nodes() {
        let node = stmt("(class file (read write open))");
        assert_eq!(node.children.len(), 3);
        assert!(matches!(node.children[0].data, NodeData::Perm(ref p) if p == "read"));
    }

    #[test]
    fn context_and_levels_nest() {
        let node = stmt("(sidcontext kernel (u r t ((s0) (s1 (range c0 c3)))))");
        let NodeData::SidContext(sc) = &node.data else {
            panic!("not a sidcontext");
        };
        let Ref::Inline(ctx) = &sc.context else {
            panic!("expected inline context");
        };
        let Ref::Inline(range) = &ctx.range else {
            panic!("expected inline range");
        };
        let Ref::Inline(high) = &range.high else {
            panic!("expected inline high level");
        };
        assert_eq!(high.sens, "s1");
        assert_eq!(high.cats.as_ref().unwrap().op, Some(ExprOp::Range));
    }

    #[test]
    fn constraint_operands_are_recognised() {
        let node = stmt("(mlsconstrain (file (open)) (dom l1 l2))");
        let NodeData::Constrain(c) = &node.data else {
            panic!("not a constrain");
        };
        assert!(c.mls);
        assert_eq!(c.expr.op, Some(ExprOp::Dom));
        assert_eq!(c.expr.operands[0], ExprItem::Operand(ConsOperand::L1));
    }

    #[test]
    fn classorder_accepts_unordered_marker() {
        let node = stmt("(classorder (unordered file dir))");
        let NodeData::Ordered(o) = &node.data else {
            panic!("not an order");
        };
        assert!(o.unordered);
        assert_eq!(o.order, vec!["file", "dir"]);
        assert!(parse_policy("(sidorder (unordered kernel))", "<test>").is_err());
    }

    #[test]
    fn unknown_statement_is_rejected_with_line() {
        let err = parse_policy("(type t)\n(frobnicate x)", "<test>").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownStatement {
                line: 2,
                keyword: "frobnicate".to_owned()
            }
        );
    }

    #[test]
    fn ip_literals_are_inline_ipaddrs() {
        let node = stmt("(nodecon 192.168.1.0 255.255.255.0 ctx)");
        let NodeData::NodeCon(nc) = &node.data else {
            panic!("not a nodecon");
        };
        assert!(matches!(nc.addr, Ref::Inline(_)));
        assert!(matches!(nc.context, Ref::Named(_)));
    }
}
