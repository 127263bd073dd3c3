// SPDX-License-Identifier: Apache-2.0
//! Flavor tags for CIL constructs.

/// The kind tag of a CIL construct.
///
/// A closed set: the parser can only ever produce these, and the comparison
/// engine dispatches on them exhaustively. `ClassPerms` and `ClassPermsSet`
/// never appear as tree nodes of their own; they tag the anonymous and named
/// class/permission payloads nested inside rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)] // variants name the constructs they tag
pub enum Flavor {
    Root,
    SrcInfo,
    CondBlock,
    String,
    Name,

    AvRule,
    AvRuleX,
    DenyRule,

    Call,
    Macro,

    Perm,
    MapPerm,
    Common,
    ClassCommon,
    Class,
    ClassOrder,
    ClassPermission,
    ClassPerms,
    ClassPermsSet,
    ClassPermissionSet,
    ClassMap,
    ClassMapping,
    PermissionX,

    Boolean,
    BooleanIf,
    Tunable,
    TunableIf,

    Constrain,
    ValidateTrans,
    MlsConstrain,
    MlsValidateTrans,

    Block,
    BlockAbstract,
    BlockInherit,
    Optional,
    In,

    Context,

    DefaultUser,
    DefaultRole,
    DefaultType,
    DefaultRange,

    FileCon,
    FsUse,
    GenfsCon,

    IbPkeyCon,
    IbEndPortCon,

    Sensitivity,
    SensitivityAlias,
    SensitivityAliasActual,
    SensitivityOrder,
    Category,
    CategoryAlias,
    CategoryAliasActual,
    CategoryOrder,
    CategorySet,
    SensCat,
    Level,
    LevelRange,
    RangeTransition,

    IpAddr,
    NetifCon,
    NodeCon,
    PortCon,

    Mls,
    HandleUnknown,
    PolicyCap,

    Role,
    RoleType,
    RoleAttribute,
    RoleAttributeSet,
    RoleAllow,
    RoleTransition,
    RoleBounds,

    Sid,
    SidOrder,
    SidContext,

    Type,
    TypeAlias,
    TypeAliasActual,
    TypeAttribute,
    TypeAttributeSet,
    ExpandTypeAttribute,
    TypeBounds,
    TypeRule,
    NameTypeTransition,
    TypePermissive,

    User,
    UserRole,
    UserAttribute,
    UserAttributeSet,
    UserLevel,
    UserRange,
    UserBounds,
    UserPrefix,
    SelinuxUser,
    SelinuxUserDefault,

    IomemCon,
    IoportCon,
    PciDeviceCon,
    PirqCon,
    DeviceTreeCon,
}

impl Flavor {
    /// The statement keyword (or report label) for this flavor.
    ///
    /// Flavors covering several keywords (AV rules, type rules, cond-block
    /// branches) return a generic label here; `CilNode::kind_keyword`
    /// specialises those from the payload.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Flavor::Root => "<root>",
            Flavor::SrcInfo => "<src-info>",
            Flavor::CondBlock => "<branch>",
            Flavor::String => "string",
            Flavor::Name => "name",
            Flavor::AvRule => "allow",
            Flavor::AvRuleX => "allowx",
            Flavor::DenyRule => "deny",
            Flavor::Call => "call",
            Flavor::Macro => "macro",
            Flavor::Perm | Flavor::MapPerm => "perm",
            Flavor::Common => "common",
            Flavor::ClassCommon => "classcommon",
            Flavor::Class => "class",
            Flavor::ClassOrder => "classorder",
            Flavor::ClassPermission => "classpermission",
            Flavor::ClassPerms => "classperms",
            Flavor::ClassPermsSet | Flavor::ClassPermissionSet => "classpermissionset",
            Flavor::ClassMap => "classmap",
            Flavor::ClassMapping => "classmapping",
            Flavor::PermissionX => "permissionx",
            Flavor::Boolean => "boolean",
            Flavor::BooleanIf => "booleanif",
            Flavor::Tunable => "tunable",
            Flavor::TunableIf => "tunableif",
            Flavor::Constrain => "constrain",
            Flavor::ValidateTrans => "validatetrans",
            Flavor::MlsConstrain => "mlsconstrain",
            Flavor::MlsValidateTrans => "mlsvalidatetrans",
            Flavor::Block => "block",
            Flavor::BlockAbstract => "blockabstract",
            Flavor::BlockInherit => "blockinherit",
            Flavor::Optional => "optional",
            Flavor::In => "in",
            Flavor::Context => "context",
            Flavor::DefaultUser => "defaultuser",
            Flavor::DefaultRole => "defaultrole",
            Flavor::DefaultType => "defaulttype",
            Flavor::DefaultRange => "defaultrange",
            Flavor::FileCon => "filecon",
            Flavor::FsUse => "fsuse",
            Flavor::GenfsCon => "genfscon",
            Flavor::IbPkeyCon => "ibpkeycon",
            Flavor::IbEndPortCon => "ibendportcon",
            Flavor::Sensitivity => "sensitivity",
            Flavor::SensitivityAlias => "sensitivityalias",
            Flavor::SensitivityAliasActual => "sensitivityaliasactual",
            Flavor::SensitivityOrder => "sensitivityorder",
            Flavor::Category => "category",
            Flavor::CategoryAlias => "categoryalias",
            Flavor::CategoryAliasActual => "categoryaliasactual",
            Flavor::CategoryOrder => "categoryorder",
            Flavor::CategorySet => "categoryset",
            Flavor::SensCat => "sensitivitycategory",
            Flavor::Level => "level",
            Flavor::LevelRange => "levelrange",
            Flavor::RangeTransition => "rangetransition",
            Flavor::IpAddr => "ipaddr",
            Flavor::NetifCon => "netifcon",
            Flavor::NodeCon => "nodecon",
            Flavor::PortCon => "portcon",
            Flavor::Mls => "mls",
            Flavor::HandleUnknown => "handleunknown",
            Flavor::PolicyCap => "policycap",
            Flavor::Role => "role",
            Flavor::RoleType => "roletype",
            Flavor::RoleAttribute => "roleattribute",
            Flavor::RoleAttributeSet => "roleattributeset",
            Flavor::RoleAllow => "roleallow",
            Flavor::RoleTransition => "roletransition",
            Flavor::RoleBounds => "rolebounds",
            Flavor::Sid => "sid",
            Flavor::SidOrder => "sidorder",
            Flavor::SidContext => "sidcontext",
            Flavor::Type => "type",
            Flavor::TypeAlias => "typealias",
            Flavor::TypeAliasActual => "typealiasactual",
            Flavor::TypeAttribute => "typeattribute",
            Flavor::TypeAttributeSet => "typeattributeset",
            Flavor::ExpandTypeAttribute => "expandtypeattribute",
            Flavor::TypeBounds => "typebounds",
            Flavor::TypeRule => "typetransition",
            Flavor::NameTypeTransition => "typetransition",
            Flavor::TypePermissive => "typepermissive",
            Flavor::User => "user",
            Flavor::UserRole => "userrole",
            Flavor::UserAttribute => "userattribute",
            Flavor::UserAttributeSet => "userattributeset",
            Flavor::UserLevel => "userlevel",
            Flavor::UserRange => "userrange",
            Flavor::UserBounds => "userbounds",
            Flavor::UserPrefix => "userprefix",
            Flavor::SelinuxUser => "selinuxuser",
            Flavor::SelinuxUserDefault => "selinuxuserdefault",
            Flavor::IomemCon => "iomemcon",
            Flavor::IoportCon => "ioportcon",
            Flavor::PciDeviceCon => "pcidevicecon",
            Flavor::PirqCon => "pirqcon",
            Flavor::DeviceTreeCon => "devicetreecon",
        }
    }

    /// Domain-separation tag opening every digest of this flavor's data.
    ///
    /// A few flavors deliberately share a tag: their payloads carry a
    /// discriminating field of their own (extended flag on AV rules, the
    /// default kind on `default*`), or they are interchangeable by
    /// construction (class and map permissions).
    #[must_use]
    pub fn hash_tag(self) -> &'static str {
        match self {
            Flavor::Root => "root",
            Flavor::SrcInfo => "src_info",
            Flavor::CondBlock => "condblock",
            Flavor::AvRule | Flavor::AvRuleX => "avrule",
            Flavor::Perm | Flavor::MapPerm => "perm",
            Flavor::ClassMap => "classmap",
            Flavor::ClassPermsSet => "classperms_set",
            Flavor::DefaultUser | Flavor::DefaultRole | Flavor::DefaultType => "cil_default",
            Flavor::TypeRule => "type_rule",
            Flavor::NameTypeTransition => "nametypetransition",
            other => other.keyword(),
        }
    }

    /// Whether nodes of this flavor hold their statements as tree children.
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Flavor::Root
                | Flavor::SrcInfo
                | Flavor::Macro
                | Flavor::Class
                | Flavor::Common
                | Flavor::ClassMap
                | Flavor::Block
                | Flavor::Optional
                | Flavor::In
                | Flavor::CondBlock
        )
    }

    /// Whether this flavor is a two-branch conditional container.
    #[must_use]
    pub fn is_conditional(self) -> bool {
        matches!(self, Flavor::BooleanIf | Flavor::TunableIf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_rules_share_the_avrule_tag() {
        assert_eq!(Flavor::AvRule.hash_tag(), Flavor::AvRuleX.hash_tag());
        assert_eq!(Flavor::Perm.hash_tag(), Flavor::MapPerm.hash_tag());
    }

    #[test]
    fn conditionals_are_not_plain_containers() {
        assert!(Flavor::BooleanIf.is_conditional());
        assert!(!Flavor::BooleanIf.is_container());
        assert!(Flavor::CondBlock.is_container());
    }
}
