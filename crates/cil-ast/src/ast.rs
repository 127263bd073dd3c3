// SPDX-License-Identifier: Apache-2.0
//! Typed CIL tree.
//!
//! One [`CilNode`] per statement, tagged by a payload sum ([`NodeData`]) from
//! which the node's [`Flavor`] is derived. Children exist only for container
//! statements (blocks, optionals, `in` blocks, macros, class bodies and
//! conditional branches); everything a leaf statement refers to is part of its
//! payload, either as a name or as an anonymous inline construct ([`Ref`]).

use std::net::IpAddr;

use crate::flavor::Flavor;

/// A reference to a construct that may be named or written inline.
///
/// CIL allows e.g. a `context` operand to be either the name of a declared
/// context or an anonymous `(user role type range)` tuple. The differ never
/// resolves names; the two forms compare as what they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ref<T> {
    /// Reference by declared name.
    Named(String),
    /// Anonymous inline construct.
    Inline(Box<T>),
}

/// One node of the CIL tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CilNode {
    /// Flavor-specific payload.
    pub data: NodeData,
    /// Source line the statement starts on (1-based).
    pub line: u32,
    /// Child statements; empty for non-container flavors.
    pub children: Vec<CilNode>,
}

impl CilNode {
    /// The flavor tag of this node, derived from its payload.
    #[must_use]
    pub fn flavor(&self) -> Flavor {
        self.data.flavor()
    }

    /// The CIL keyword naming this node in reports.
    ///
    /// Payload-dependent where one flavor covers several keywords (AV rule
    /// kinds, type rules, defaults, bounds, orders).
    #[must_use]
    pub fn kind_keyword(&self) -> &'static str {
        self.data.kind_keyword()
    }
}

/// Per-flavor payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)] // variant names mirror the statement keywords they carry
pub enum NodeData {
    Root,
    SrcInfo(SrcInfo),
    CondBlock(CondBlock),

    AvRule(AvRule),
    DenyRule(DenyRule),

    Call(Call),
    Macro(Macro),

    Perm(String),
    MapPerm(String),
    Common(String),
    ClassCommon(ClassCommon),
    Class(String),
    Ordered(Ordered),
    ClassPermission(String),
    ClassPermissionSet(ClassPermissionSet),
    ClassMap(String),
    ClassMapping(ClassMapping),
    PermissionX(PermX),

    Boolean(Boolean),
    BooleanIf(BooleanIf),
    Tunable(Tunable),
    TunableIf(TunableIf),

    Constrain(Constrain),
    ValidateTrans(ValidateTrans),

    Block(String),
    BlockAbstract(String),
    BlockInherit(String),
    Optional(String),
    In(In),

    Context(Context),

    Default(Default),
    DefaultRange(DefaultRange),

    FileCon(FileCon),
    FsUse(FsUse),
    GenfsCon(GenfsCon),

    IbPkeyCon(IbPkeyCon),
    IbEndPortCon(IbEndPortCon),

    Sensitivity(String),
    SensitivityAlias(String),
    SensitivityAliasActual(AliasActual),
    Category(String),
    CategoryAlias(String),
    CategoryAliasActual(AliasActual),
    CategorySet(CategorySet),
    SensCat(SensCat),
    Level(Level),
    LevelRange(LevelRange),
    RangeTransition(RangeTransition),

    IpAddr(IpAddrDecl),
    NetifCon(NetifCon),
    NodeCon(NodeCon),
    PortCon(PortCon),

    Mls(bool),
    HandleUnknown(HandleUnknown),
    PolicyCap(String),

    Role(String),
    RoleType(RoleType),
    RoleAttribute(String),
    RoleAttributeSet(AttributeSet),
    RoleAllow(RoleAllow),
    RoleTransition(RoleTransition),

    Sid(String),
    SidContext(SidContext),

    Type(String),
    TypeAlias(String),
    TypeAliasActual(AliasActual),
    TypeAttribute(String),
    TypeAttributeSet(AttributeSet),
    ExpandTypeAttribute(ExpandTypeAttribute),
    Bounds(Bounds),
    TypeRule(TypeRule),
    NameTypeTransition(NameTypeTransition),
    TypePermissive(String),

    User(String),
    UserRole(UserRole),
    UserAttribute(String),
    UserAttributeSet(AttributeSet),
    UserLevel(UserLevel),
    UserRange(UserRange),
    UserPrefix(UserPrefix),
    SelinuxUser(SelinuxUser),
    SelinuxUserDefault(SelinuxUserDefault),

    IomemCon(IomemCon),
    IoportCon(IoportCon),
    PciDeviceCon(PciDeviceCon),
    PirqCon(PirqCon),
    DeviceTreeCon(DeviceTreeCon),
}

impl NodeData {
    /// The flavor tag for this payload.
    #[must_use]
    pub fn flavor(&self) -> Flavor {
        match self {
            NodeData::Root => Flavor::Root,
            NodeData::SrcInfo(_) => Flavor::SrcInfo,
            NodeData::CondBlock(_) => Flavor::CondBlock,
            NodeData::AvRule(r) => {
                if r.is_extended() {
                    Flavor::AvRuleX
                } else {
                    Flavor::AvRule
                }
            }
            NodeData::DenyRule(_) => Flavor::DenyRule,
            NodeData::Call(_) => Flavor::Call,
            NodeData::Macro(_) => Flavor::Macro,
            NodeData::Perm(_) => Flavor::Perm,
            NodeData::MapPerm(_) => Flavor::MapPerm,
            NodeData::Common(_) => Flavor::Common,
            NodeData::ClassCommon(_) => Flavor::ClassCommon,
            NodeData::Class(_) => Flavor::Class,
            NodeData::Ordered(o) => match o.kind {
                OrderedKind::Class => Flavor::ClassOrder,
                OrderedKind::Sensitivity => Flavor::SensitivityOrder,
                OrderedKind::Category => Flavor::CategoryOrder,
                OrderedKind::Sid => Flavor::SidOrder,
            },
            NodeData::ClassPermission(_) => Flavor::ClassPermission,
            NodeData::ClassPermissionSet(_) => Flavor::ClassPermissionSet,
            NodeData::ClassMap(_) => Flavor::ClassMap,
            NodeData::ClassMapping(_) => Flavor::ClassMapping,
            NodeData::PermissionX(_) => Flavor::PermissionX,
            NodeData::Boolean(_) => Flavor::Boolean,
            NodeData::BooleanIf(_) => Flavor::BooleanIf,
            NodeData::Tunable(_) => Flavor::Tunable,
            NodeData::TunableIf(_) => Flavor::TunableIf,
            NodeData::Constrain(c) => {
                if c.mls {
                    Flavor::MlsConstrain
                } else {
                    Flavor::Constrain
                }
            }
            NodeData::ValidateTrans(v) => {
                if v.mls {
                    Flavor::MlsValidateTrans
                } else {
                    Flavor::ValidateTrans
                }
            }
            NodeData::Block(_) => Flavor::Block,
            NodeData::BlockAbstract(_) => Flavor::BlockAbstract,
            NodeData::BlockInherit(_) => Flavor::BlockInherit,
            NodeData::Optional(_) => Flavor::Optional,
            NodeData::In(_) => Flavor::In,
            NodeData::Context(_) => Flavor::Context,
            NodeData::Default(d) => match d.kind {
                DefaultKind::User => Flavor::DefaultUser,
                DefaultKind::Role => Flavor::DefaultRole,
                DefaultKind::Type => Flavor::DefaultType,
            },
            NodeData::DefaultRange(_) => Flavor::DefaultRange,
            NodeData::FileCon(_) => Flavor::FileCon,
            NodeData::FsUse(_) => Flavor::FsUse,
            NodeData::GenfsCon(_) => Flavor::GenfsCon,
            NodeData::IbPkeyCon(_) => Flavor::IbPkeyCon,
            NodeData::IbEndPortCon(_) => Flavor::IbEndPortCon,
            NodeData::Sensitivity(_) => Flavor::Sensitivity,
            NodeData::SensitivityAlias(_) => Flavor::SensitivityAlias,
            NodeData::SensitivityAliasActual(_) => Flavor::SensitivityAliasActual,
            NodeData::Category(_) => Flavor::Category,
            NodeData::CategoryAlias(_) => Flavor::CategoryAlias,
            NodeData::CategoryAliasActual(_) => Flavor::CategoryAliasActual,
            NodeData::CategorySet(_) => Flavor::CategorySet,
            NodeData::SensCat(_) => Flavor::SensCat,
            NodeData::Level(_) => Flavor::Level,
            NodeData::LevelRange(_) => Flavor::LevelRange,
            NodeData::RangeTransition(_) => Flavor::RangeTransition,
            NodeData::IpAddr(_) => Flavor::IpAddr,
            NodeData::NetifCon(_) => Flavor::NetifCon,
            NodeData::NodeCon(_) => Flavor::NodeCon,
            NodeData::PortCon(_) => Flavor::PortCon,
            NodeData::Mls(_) => Flavor::Mls,
            NodeData::HandleUnknown(_) => Flavor::HandleUnknown,
            NodeData::PolicyCap(_) => Flavor::PolicyCap,
            NodeData::Role(_) => Flavor::Role,
            NodeData::RoleType(_) => Flavor::RoleType,
            NodeData::RoleAttribute(_) => Flavor::RoleAttribute,
            NodeData::RoleAttributeSet(_) => Flavor::RoleAttributeSet,
            NodeData::RoleAllow(_) => Flavor::RoleAllow,
            NodeData::RoleTransition(_) => Flavor::RoleTransition,
            NodeData::Sid(_) => Flavor::Sid,
            NodeData::SidContext(_) => Flavor::SidContext,
            NodeData::Type(_) => Flavor::Type,
            NodeData::TypeAlias(_) => Flavor::TypeAlias,
            NodeData::TypeAliasActual(_) => Flavor::TypeAliasActual,
            NodeData::TypeAttribute(_) => Flavor::TypeAttribute,
            NodeData::TypeAttributeSet(_) => Flavor::TypeAttributeSet,
            NodeData::ExpandTypeAttribute(_) => Flavor::ExpandTypeAttribute,
            NodeData::Bounds(b) => match b.kind {
                BoundsKind::Role => Flavor::RoleBounds,
                BoundsKind::Type => Flavor::TypeBounds,
                BoundsKind::User => Flavor::UserBounds,
            },
            NodeData::TypeRule(_) => Flavor::TypeRule,
            NodeData::NameTypeTransition(_) => Flavor::NameTypeTransition,
            NodeData::TypePermissive(_) => Flavor::TypePermissive,
            NodeData::User(_) => Flavor::User,
            NodeData::UserRole(_) => Flavor::UserRole,
            NodeData::UserAttribute(_) => Flavor::UserAttribute,
            NodeData::UserAttributeSet(_) => Flavor::UserAttributeSet,
            NodeData::UserLevel(_) => Flavor::UserLevel,
            NodeData::UserRange(_) => Flavor::UserRange,
            NodeData::UserPrefix(_) => Flavor::UserPrefix,
            NodeData::SelinuxUser(_) => Flavor::SelinuxUser,
            NodeData::SelinuxUserDefault(_) => Flavor::SelinuxUserDefault,
            NodeData::IomemCon(_) => Flavor::IomemCon,
            NodeData::IoportCon(_) => Flavor::IoportCon,
            NodeData::PciDeviceCon(_) => Flavor::PciDeviceCon,
            NodeData::PirqCon(_) => Flavor::PirqCon,
            NodeData::DeviceTreeCon(_) => Flavor::DeviceTreeCon,
        }
    }

    /// The keyword naming this payload in reports and JSON `"flavor"` fields.
    #[must_use]
    pub fn kind_keyword(&self) -> &'static str {
        match self {
            NodeData::AvRule(r) => match (r.is_extended(), r.kind) {
                (false, AvRuleKind::Allow) => "allow",
                (false, AvRuleKind::AuditAllow) => "auditallow",
                (false, AvRuleKind::DontAudit) => "dontaudit",
                (false, AvRuleKind::NeverAllow) => "neverallow",
                (true, AvRuleKind::Allow) => "allowx",
                (true, AvRuleKind::AuditAllow) => "auditallowx",
                (true, AvRuleKind::DontAudit) => "dontauditx",
                (true, AvRuleKind::NeverAllow) => "neverallowx",
            },
            NodeData::TypeRule(r) => match r.kind {
                TypeRuleKind::Transition => "typetransition",
                TypeRuleKind::Change => "typechange",
                TypeRuleKind::Member => "typemember",
            },
            NodeData::CondBlock(b) => {
                if b.value {
                    "true"
                } else {
                    "false"
                }
            }
            _ => self.flavor().keyword(),
        }
    }
}

/// Origin record of one parsed input; the single child of the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcInfo {
    /// Input language kind; always `"cil"` for this tool.
    pub kind: String,
    /// Path the input was read from (or `<stdin>`).
    pub path: String,
}

/// One branch of a `booleanif`/`tunableif`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondBlock {
    /// `true` branch or `false` branch.
    pub value: bool,
}

/// Kind of an access-vector rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvRuleKind {
    /// `allow` / `allowx`
    Allow,
    /// `auditallow` / `auditallowx`
    AuditAllow,
    /// `dontaudit` / `dontauditx`
    DontAudit,
    /// `neverallow` / `neverallowx`
    NeverAllow,
}

/// Permission operand of an AV rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvPerms {
    /// Ordinary rule: a named classpermission or inline class/perms pair.
    Class(ClassPermsItem),
    /// Extended (`*x`) rule: a named or anonymous `permissionx`.
    Extended(Ref<PermX>),
}

/// `allow`/`auditallow`/`dontaudit`/`neverallow` and their `x` variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvRule {
    /// Rule kind.
    pub kind: AvRuleKind,
    /// Source type or attribute.
    pub source: String,
    /// Target type or attribute.
    pub target: String,
    /// Permission operand.
    pub perms: AvPerms,
}

impl AvRule {
    /// Whether this is an extended (`*x`) rule.
    #[must_use]
    pub fn is_extended(&self) -> bool {
        matches!(self.perms, AvPerms::Extended(_))
    }
}

/// `deny` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyRule {
    /// Source type or attribute.
    pub source: String,
    /// Target type or attribute.
    pub target: String,
    /// Denied class/permissions.
    pub perms: ClassPermsItem,
}

/// A class/permission operand: a named `classpermission` or an inline pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassPermsItem {
    /// Reference to a named `classpermission`.
    Set(String),
    /// Anonymous `(class (perm ...))` pair.
    Perms(ClassPerms),
}

/// Inline `(class (perm ...))` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPerms {
    /// Class (or classmap) name.
    pub class: String,
    /// Permission expression.
    pub perms: Expr,
}

/// `call` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Macro being called.
    pub macro_name: String,
    /// Argument tree, uninterpreted.
    pub args: Vec<CallArg>,
}

/// One macro-call argument: a bare symbol or a nested list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    /// Bare symbol.
    Symbol(String),
    /// Nested list of arguments.
    List(Vec<CallArg>),
}

/// `macro` declaration; the body statements are the node's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    /// Macro name.
    pub name: String,
    /// Formal parameters in declaration order.
    pub params: Vec<MacroParam>,
}

/// One formal macro parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroParam {
    /// Declared parameter flavor.
    pub flavor: Flavor,
    /// Parameter name.
    pub name: String,
}

/// `classcommon` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCommon {
    /// Class name.
    pub class: String,
    /// Common name.
    pub common: String,
}

/// Which ordering statement an [`Ordered`] payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderedKind {
    /// `classorder` (may carry a leading `unordered` marker).
    Class,
    /// `sensitivityorder`
    Sensitivity,
    /// `categoryorder`
    Category,
    /// `sidorder`
    Sid,
}

/// `classorder` / `sensitivityorder` / `categoryorder` / `sidorder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordered {
    /// Which ordering statement.
    pub kind: OrderedKind,
    /// Whether the list was marked `unordered` (classorder only).
    pub unordered: bool,
    /// Names in source order.
    pub order: Vec<String>,
}

/// `classpermissionset` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPermissionSet {
    /// Named `classpermission` being populated.
    pub set: String,
    /// Class/permission pair assigned to it.
    pub perms: ClassPerms,
}

/// `classmapping` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMapping {
    /// Classmap name.
    pub classmap: String,
    /// Classmap permission being mapped.
    pub mapping: String,
    /// Class/permission operand mapped to it.
    pub perms: ClassPermsItem,
}

/// Kind of a `permissionx` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermXKind {
    /// `ioctl`
    Ioctl,
    /// `nlmsg`
    Nlmsg,
}

/// `permissionx` declaration or anonymous extended-permission tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermX {
    /// Name when declared via `permissionx`; `None` when anonymous.
    pub name: Option<String>,
    /// Extended permission kind.
    pub kind: PermXKind,
    /// Class the extended permissions apply to.
    pub class: String,
    /// Extended-permission value expression.
    pub perms: Expr,
}

/// `boolean` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boolean {
    /// Boolean name.
    pub name: String,
    /// Default value.
    pub value: bool,
}

/// `booleanif` container; branches are `CondBlock` children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanIf {
    /// Condition over booleans.
    pub condition: Expr,
}

/// `tunable` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tunable {
    /// Tunable name.
    pub name: String,
    /// Default value.
    pub value: bool,
}

/// `tunableif` container; branches are `CondBlock` children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunableIf {
    /// Condition over tunables.
    pub condition: Expr,
}

/// `constrain` / `mlsconstrain` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constrain {
    /// MLS variant flag.
    pub mls: bool,
    /// Constrained class/permissions.
    pub perms: ClassPermsItem,
    /// Constraint expression.
    pub expr: Expr,
}

/// `validatetrans` / `mlsvalidatetrans` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateTrans {
    /// MLS variant flag.
    pub mls: bool,
    /// Constrained class.
    pub class: String,
    /// Constraint expression.
    pub expr: Expr,
}

/// `in` container; body statements are the node's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct In {
    /// `after` (vs. the default `before`) insertion position.
    pub after: bool,
    /// Target block name.
    pub block: String,
}

/// `context` declaration or anonymous inline context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Name when declared; `None` when anonymous.
    pub name: Option<String>,
    /// SELinux user.
    pub user: String,
    /// Role.
    pub role: String,
    /// Type.
    pub ty: String,
    /// Level range.
    pub range: Ref<LevelRange>,
}

/// Which `default*` statement a [`Default`] payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultKind {
    /// `defaultuser`
    User,
    /// `defaultrole`
    Role,
    /// `defaulttype`
    Type,
}

/// Object selector of a `default*` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultObject {
    /// `source`
    Source,
    /// `target`
    Target,
}

/// `defaultuser` / `defaultrole` / `defaulttype` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Default {
    /// Which default statement.
    pub kind: DefaultKind,
    /// Source or target selector.
    pub object: DefaultObject,
    /// Classes the default applies to (unordered).
    pub classes: Vec<String>,
}

/// Range selector of a `defaultrange` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultRangeObject {
    /// `source low`
    SourceLow,
    /// `source high`
    SourceHigh,
    /// `source low-high`
    SourceLowHigh,
    /// `target low`
    TargetLow,
    /// `target high`
    TargetHigh,
    /// `target low-high`
    TargetLowHigh,
    /// `glblub`
    Glblub,
}

/// `defaultrange` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRange {
    /// Range selector.
    pub object: DefaultRangeObject,
    /// Classes the default applies to (unordered).
    pub classes: Vec<String>,
}

/// File type selector used by `filecon` and `genfscon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// `any`
    Any,
    /// `file`
    File,
    /// `dir`
    Dir,
    /// `char`
    Char,
    /// `block`
    Block,
    /// `socket`
    Socket,
    /// `pipe`
    Pipe,
    /// `symlink`
    Symlink,
}

/// `filecon` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCon {
    /// Path regular expression.
    pub path: String,
    /// File type selector.
    pub file_type: FileType,
    /// Context, or `None` for the explicit empty context `()`.
    pub context: Option<Ref<Context>>,
}

/// Labeling behaviour selector of `fsuse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsUseKind {
    /// `xattr`
    Xattr,
    /// `task`
    Task,
    /// `trans`
    Trans,
}

/// `fsuse` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsUse {
    /// Labeling behaviour.
    pub kind: FsUseKind,
    /// Filesystem name.
    pub fs: String,
    /// Context.
    pub context: Ref<Context>,
}

/// `genfscon` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenfsCon {
    /// Filesystem name.
    pub fs: String,
    /// Path prefix.
    pub path: String,
    /// File type selector (`any` when omitted).
    pub file_type: FileType,
    /// Context.
    pub context: Ref<Context>,
}

/// `ibpkeycon` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbPkeyCon {
    /// Subnet prefix.
    pub subnet_prefix: String,
    /// Low partition key.
    pub low: u32,
    /// High partition key.
    pub high: u32,
    /// Context.
    pub context: Ref<Context>,
}

/// `ibendportcon` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbEndPortCon {
    /// Device name.
    pub device: String,
    /// Port number.
    pub port: u32,
    /// Context.
    pub context: Ref<Context>,
}

/// Shared payload of the three `*aliasactual` statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasActual {
    /// Alias name.
    pub alias: String,
    /// Aliased declaration.
    pub actual: String,
}

/// `categoryset` declaration or anonymous category set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    /// Name when declared; `None` when anonymous.
    pub name: Option<String>,
    /// Category expression.
    pub cats: Expr,
}

/// `sensitivitycategory` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensCat {
    /// Sensitivity name.
    pub sens: String,
    /// Category expression.
    pub cats: Expr,
}

/// `level` declaration or anonymous inline level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    /// Name when declared; `None` when anonymous.
    pub name: Option<String>,
    /// Sensitivity.
    pub sens: String,
    /// Category expression when present.
    pub cats: Option<Expr>,
}

/// `levelrange` declaration or anonymous inline range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRange {
    /// Name when declared; `None` when anonymous.
    pub name: Option<String>,
    /// Low level.
    pub low: Ref<Level>,
    /// High level.
    pub high: Ref<Level>,
}

/// `rangetransition` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTransition {
    /// Source type.
    pub source: String,
    /// Executable type.
    pub exec: String,
    /// Object class.
    pub class: String,
    /// Result range.
    pub range: Ref<LevelRange>,
}

/// `ipaddr` declaration or anonymous literal address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpAddrDecl {
    /// Name when declared; `None` when anonymous.
    pub name: Option<String>,
    /// The address.
    pub addr: IpAddr,
}

/// `netifcon` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetifCon {
    /// Interface name.
    pub interface: String,
    /// Interface context.
    pub if_context: Ref<Context>,
    /// Packet context.
    pub packet_context: Ref<Context>,
}

/// `nodecon` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCon {
    /// Subnet address.
    pub addr: Ref<IpAddrDecl>,
    /// Subnet mask.
    pub mask: Ref<IpAddrDecl>,
    /// Context.
    pub context: Ref<Context>,
}

/// Protocol selector of `portcon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proto {
    /// `tcp`
    Tcp,
    /// `udp`
    Udp,
    /// `dccp`
    Dccp,
    /// `sctp`
    Sctp,
}

/// `portcon` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCon {
    /// Protocol.
    pub proto: Proto,
    /// Low port (equals `high` for single-port rules).
    pub low: u32,
    /// High port.
    pub high: u32,
    /// Context.
    pub context: Ref<Context>,
}

/// Action selector of `handleunknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleUnknown {
    /// `allow`
    Allow,
    /// `deny`
    Deny,
    /// `reject`
    Reject,
}

/// `roletype` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleType {
    /// Role name.
    pub role: String,
    /// Type name.
    pub ty: String,
}

/// Shared payload of the three `*attributeset` statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSet {
    /// Attribute being populated.
    pub attr: String,
    /// Membership expression.
    pub expr: Expr,
}

/// `roleallow` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAllow {
    /// Source role.
    pub source: String,
    /// Target role.
    pub target: String,
}

/// `roletransition` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTransition {
    /// Source role.
    pub source: String,
    /// Target type.
    pub target: String,
    /// Object class.
    pub class: String,
    /// Result role.
    pub result: String,
}

/// Which `*bounds` statement a [`Bounds`] payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsKind {
    /// `rolebounds`
    Role,
    /// `typebounds`
    Type,
    /// `userbounds`
    User,
}

/// `rolebounds` / `typebounds` / `userbounds` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds {
    /// Which bounds statement.
    pub kind: BoundsKind,
    /// Bounding declaration.
    pub parent: String,
    /// Bounded declaration.
    pub child: String,
}

/// `sidcontext` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidContext {
    /// SID name.
    pub sid: String,
    /// Context.
    pub context: Ref<Context>,
}

/// `expandtypeattribute` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandTypeAttribute {
    /// Expand (vs. keep) the attribute at compile time.
    pub expand: bool,
    /// Attributes affected (unordered).
    pub attrs: Vec<String>,
}

/// Kind of a type rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRuleKind {
    /// `typetransition`
    Transition,
    /// `typechange`
    Change,
    /// `typemember`
    Member,
}

/// `typetransition` / `typechange` / `typemember` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRule {
    /// Rule kind.
    pub kind: TypeRuleKind,
    /// Source type.
    pub source: String,
    /// Target type.
    pub target: String,
    /// Object class.
    pub class: String,
    /// Result type.
    pub result: String,
}

/// Named `typetransition` (five-operand form).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTypeTransition {
    /// Source type.
    pub source: String,
    /// Target type.
    pub target: String,
    /// Object class.
    pub class: String,
    /// Object name the transition matches on.
    pub object_name: String,
    /// Result type.
    pub result: String,
}

/// `userrole` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRole {
    /// User name.
    pub user: String,
    /// Role name.
    pub role: String,
}

/// `userlevel` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLevel {
    /// User name.
    pub user: String,
    /// Default level.
    pub level: Ref<Level>,
}

/// `userrange` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRange {
    /// User name.
    pub user: String,
    /// Allowed range.
    pub range: Ref<LevelRange>,
}

/// `userprefix` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPrefix {
    /// User name.
    pub user: String,
    /// Home-directory labeling prefix.
    pub prefix: String,
}

/// `selinuxuser` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelinuxUser {
    /// OS user name.
    pub name: String,
    /// SELinux user.
    pub user: String,
    /// Allowed range.
    pub range: Ref<LevelRange>,
}

/// `selinuxuserdefault` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelinuxUserDefault {
    /// SELinux user.
    pub user: String,
    /// Allowed range.
    pub range: Ref<LevelRange>,
}

/// `iomemcon` statement (Xen).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IomemCon {
    /// Low memory address.
    pub low: u64,
    /// High memory address.
    pub high: u64,
    /// Context.
    pub context: Ref<Context>,
}

/// `ioportcon` statement (Xen).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoportCon {
    /// Low port.
    pub low: u32,
    /// High port.
    pub high: u32,
    /// Context.
    pub context: Ref<Context>,
}

/// `pcidevicecon` statement (Xen).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PciDeviceCon {
    /// Device identifier.
    pub device: u32,
    /// Context.
    pub context: Ref<Context>,
}

/// `pirqcon` statement (Xen).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PirqCon {
    /// Interrupt line.
    pub irq: u32,
    /// Context.
    pub context: Ref<Context>,
}

/// `devicetreecon` statement (Xen).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTreeCon {
    /// Device-tree path.
    pub path: String,
    /// Context.
    pub context: Ref<Context>,
}

/// What a set expression ranges over.
///
/// Carried on every [`Expr`] so that expressions over different namespaces
/// hash apart even when their operand names coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    /// Permission names.
    Perm,
    /// Category names.
    Cat,
    /// Type/attribute names.
    Type,
    /// Role names.
    Role,
    /// User names.
    User,
    /// Boolean names.
    Bool,
    /// Tunable names.
    Tunable,
    /// Constraint expression (keyword operands allowed).
    Constraint,
    /// MLS constraint expression.
    MlsConstraint,
}

/// Operator of a set or constraint expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprOp {
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,
    /// `xor`
    Xor,
    /// `all`
    All,
    /// `eq`
    Eq,
    /// `neq`
    Neq,
    /// `range`
    Range,
    /// `dom`
    Dom,
    /// `domby`
    DomBy,
    /// `incomp`
    Incomp,
}

/// Keyword operand of a constraint expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsOperand {
    /// `u1`
    U1,
    /// `u2`
    U2,
    /// `u3`
    U3,
    /// `t1`
    T1,
    /// `t2`
    T2,
    /// `t3`
    T3,
    /// `r1`
    R1,
    /// `r2`
    R2,
    /// `r3`
    R3,
    /// `l1`
    L1,
    /// `l2`
    L2,
    /// `h1`
    H1,
    /// `h2`
    H2,
}

/// One operand of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprItem {
    /// A plain name.
    Name(String),
    /// A constraint keyword operand.
    Operand(ConsOperand),
    /// A nested sub-expression.
    Sub(Box<Expr>),
}

/// A set or constraint expression: optional operator plus operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    /// Namespace the expression ranges over.
    pub kind: ExprKind,
    /// Leading operator, when present.
    pub op: Option<ExprOp>,
    /// Operands in source order.
    pub operands: Vec<ExprItem>,
}
