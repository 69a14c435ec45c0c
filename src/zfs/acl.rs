//! Delegated administration (`zfs allow`).
//!
//! ```rust
//! use zfs_session::zfs::{AclBuilder, AllowScope, Permission, Principal};
//!
//! let mut builder = AclBuilder::new();
//! builder.everyone().with(Permission::Create);
//! builder.user("backup").with(Permission::Snapshot).with(Permission::Send);
//! builder.scope(AllowScope::DESCENDENT);
//! let acl = builder.build();
//!
//! assert_eq!(2, acl.entries().len());
//! assert_eq!(&Principal::Everyone, acl.entries()[0].principal());
//! ```
use bitflags::bitflags;
use std::{collections::BTreeSet, fmt};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Administrative permissions that can be delegated on a dataset.
#[derive(AsRefStr, EnumString, Display, EnumIter, Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Permission {
    /// Must also have the permission that is being allowed.
    #[strum(serialize = "allow")]
    Allow,
    #[strum(serialize = "bookmark")]
    Bookmark,
    /// Must also have the `create` ability and `mount` ability in the origin file system.
    #[strum(serialize = "clone")]
    Clone,
    /// Must also have the `mount` ability.
    #[strum(serialize = "create")]
    Create,
    /// Must also have the `mount` ability.
    #[strum(serialize = "destroy")]
    Destroy,
    #[strum(serialize = "diff")]
    Diff,
    #[strum(serialize = "hold")]
    Hold,
    #[strum(serialize = "load-key")]
    LoadKey,
    #[strum(serialize = "change-key")]
    ChangeKey,
    #[strum(serialize = "mount")]
    Mount,
    #[strum(serialize = "promote")]
    Promote,
    /// Must also have the `mount` and `create` ability.
    #[strum(serialize = "receive")]
    Receive,
    #[strum(serialize = "release")]
    Release,
    /// Must also have the `mount` and `create` ability in the new parent.
    #[strum(serialize = "rename")]
    Rename,
    #[strum(serialize = "rollback")]
    Rollback,
    #[strum(serialize = "send")]
    Send,
    #[strum(serialize = "share")]
    Share,
    #[strum(serialize = "snapshot")]
    Snapshot,
    #[strum(serialize = "userprop")]
    UserProp,
    #[strum(serialize = "groupquota")]
    GroupQuota,
    #[strum(serialize = "groupused")]
    GroupUsed,
    #[strum(serialize = "userquota")]
    UserQuota,
    #[strum(serialize = "userused")]
    UserUsed,
}

/// Who a permission is delegated to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Principal {
    Everyone,
    User(String),
    Group(String),
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::Everyone => f.write_str("everyone"),
            Principal::User(name) => write!(f, "user {}", name),
            Principal::Group(name) => write!(f, "group {}", name),
        }
    }
}

bitflags! {
    /// Where a delegation applies. Empty means both the dataset and its descendants.
    #[derive(Default)]
    pub struct AllowScope: u8 {
        /// Only the dataset itself (`zfs allow -l`).
        const LOCAL = 1 << 0;
        /// Only descendants (`zfs allow -d`).
        const DESCENDENT = 1 << 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[get = "pub"]
pub struct AclEntry {
    principal:   Principal,
    permissions: BTreeSet<Permission>,
}

impl AclEntry {
    /// Comma separated, the way `zfs allow` takes them.
    pub fn permission_list(&self) -> String {
        self.permissions.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(",")
    }
}

/// Immutable set of delegations ready to be submitted with `allow` or `unallow`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acl {
    entries: Vec<AclEntry>,
    scope:   AllowScope,
}

impl Acl {
    pub fn builder() -> AclBuilder { AclBuilder::new() }

    pub fn entries(&self) -> &[AclEntry] { &self.entries }

    pub fn scope(&self) -> AllowScope { self.scope }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Accumulates delegations. Select a principal, then chain permissions onto it.
#[derive(Debug, Clone, Default)]
pub struct AclBuilder {
    entries: Vec<AclEntry>,
    scope:   AllowScope,
}

impl AclBuilder {
    pub fn new() -> Self { AclBuilder::default() }

    pub fn everyone(&mut self) -> PrincipalBuilder<'_> { self.principal(Principal::Everyone) }

    pub fn user<S: Into<String>>(&mut self, name: S) -> PrincipalBuilder<'_> {
        self.principal(Principal::User(name.into()))
    }

    pub fn group<S: Into<String>>(&mut self, name: S) -> PrincipalBuilder<'_> {
        self.principal(Principal::Group(name.into()))
    }

    pub fn scope(&mut self, scope: AllowScope) -> &mut Self {
        self.scope = scope;
        self
    }

    /// Principals that never got a permission are left out.
    pub fn build(&self) -> Acl {
        let entries = self.entries.iter().filter(|e| !e.permissions.is_empty()).cloned().collect();
        Acl { entries, scope: self.scope }
    }

    fn principal(&mut self, principal: Principal) -> PrincipalBuilder<'_> {
        let index = match self.entries.iter().position(|e| e.principal == principal) {
            Some(index) => index,
            None => {
                self.entries.push(AclEntry { principal, permissions: BTreeSet::new() });
                self.entries.len() - 1
            },
        };
        PrincipalBuilder { builder: self, index }
    }
}

/// Adds permissions to one principal of an [`AclBuilder`].
#[derive(Debug)]
pub struct PrincipalBuilder<'a> {
    builder: &'a mut AclBuilder,
    index:   usize,
}

impl<'a> PrincipalBuilder<'a> {
    pub fn with(self, permission: Permission) -> Self {
        self.builder.entries[self.index].permissions.insert(permission);
        self
    }

    pub fn with_all<I: IntoIterator<Item = Permission>>(self, permissions: I) -> Self {
        self.builder.entries[self.index].permissions.extend(permissions);
        self
    }
}
