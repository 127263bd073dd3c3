// SPDX-License-Identifier: Apache-2.0
//! cil-ast: typed AST, reader and writer for SELinux CIL policies.
//!
//! The crate plays the role the upstream CIL compiler plays for policy
//! tooling: it turns CIL source text into a typed tree of statements that the
//! comparison engine can consume read-only. It makes no attempt at semantic
//! resolution (names stay names, anonymous inline constructs stay inline)
//! because the differ compares structure, not effect.
//!
//! The tree is strictly owned: a [`CilNode`] owns its payload and children,
//! and nothing in this crate mutates a tree after [`parse_policy`] returns.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod ast;
mod build;
mod flavor;
/// Per-flavor JSON rendering of AST nodes.
pub mod json;
mod sexp;
/// Canonical CIL rendering of AST nodes.
pub mod write;

pub use ast::{
    AliasActual, AttributeSet, AvPerms, AvRule, AvRuleKind, Boolean, BooleanIf, Bounds, BoundsKind,
    Call, CallArg, CategorySet, CilNode, ClassCommon, ClassMapping, ClassPerms, ClassPermsItem,
    ClassPermissionSet, CondBlock, ConsOperand, Constrain, Context, Default, DefaultKind,
    DefaultObject, DefaultRange, DefaultRangeObject, DenyRule, DeviceTreeCon,
    ExpandTypeAttribute, Expr, ExprItem, ExprKind, ExprOp, FileCon, FileType, FsUse, FsUseKind,
    GenfsCon, HandleUnknown, IbEndPortCon, IbPkeyCon, In, IomemCon, IoportCon, IpAddrDecl, Level,
    LevelRange, Macro, MacroParam, NameTypeTransition, NetifCon, NodeCon, NodeData, Ordered,
    OrderedKind, PciDeviceCon, PermX, PermXKind, PirqCon, PortCon, Proto, RangeTransition, Ref,
    RoleAllow, RoleTransition, RoleType, SelinuxUser, SelinuxUserDefault, SensCat, SidContext,
    SrcInfo, Tunable, TunableIf, TypeRule, TypeRuleKind, UserLevel, UserPrefix, UserRange,
    UserRole, ValidateTrans,
};
pub use build::{parse_policy, ParseError};
pub use flavor::Flavor;
