//! Property vocabulary of datasets.
//!
//! Native properties form a closed set ([`ZfsProperty`]). User properties are free-form but must
//! be namespaced with a colon (`module:property`). Both are carried by [`Property`] and named by
//! [`PropertyKey`].
use crate::zfs::{Error, Result};
use regex::Regex;
use std::{fmt, str::FromStr};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Longest user property name the native layer accepts.
pub static USER_PROPERTY_NAME_MAX_LENGTH: usize = 256;

lazy_static! {
    static ref USER_PROPERTY_NAME: Regex =
        Regex::new(r"^[a-z0-9:+._\-]+$").expect("static regex must compile");
}

/// Native (system) properties of filesystems, volumes and snapshots as named by `zfs get`.
#[derive(AsRefStr, EnumString, Display, EnumIter, Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum ZfsProperty {
    #[strum(serialize = "type")]
    Type,
    #[strum(serialize = "creation")]
    Creation,
    #[strum(serialize = "used")]
    Used,
    #[strum(serialize = "available")]
    Available,
    #[strum(serialize = "referenced")]
    Referenced,
    #[strum(serialize = "compressratio")]
    CompressRatio,
    #[strum(serialize = "mounted")]
    Mounted,
    #[strum(serialize = "origin")]
    Origin,
    #[strum(serialize = "quota")]
    Quota,
    #[strum(serialize = "reservation")]
    Reservation,
    #[strum(serialize = "volsize")]
    VolumeSize,
    #[strum(serialize = "volblocksize")]
    VolumeBlockSize,
    #[strum(serialize = "recordsize")]
    RecordSize,
    #[strum(serialize = "mountpoint")]
    MountPoint,
    #[strum(serialize = "sharenfs")]
    ShareNfs,
    #[strum(serialize = "checksum")]
    Checksum,
    #[strum(serialize = "compression")]
    Compression,
    #[strum(serialize = "atime")]
    Atime,
    #[strum(serialize = "devices")]
    Devices,
    #[strum(serialize = "exec")]
    Exec,
    #[strum(serialize = "setuid")]
    Setuid,
    #[strum(serialize = "readonly")]
    ReadOnly,
    #[strum(serialize = "zoned")]
    Zoned,
    #[strum(serialize = "jailed")]
    Jailed,
    #[strum(serialize = "snapdir")]
    SnapDir,
    #[strum(serialize = "aclmode")]
    AclMode,
    #[strum(serialize = "aclinherit")]
    AclInherit,
    #[strum(serialize = "createtxg")]
    CreateTxg,
    #[strum(serialize = "canmount")]
    CanMount,
    #[strum(serialize = "xattr")]
    Xattr,
    #[strum(serialize = "copies")]
    Copies,
    #[strum(serialize = "version")]
    Version,
    #[strum(serialize = "utf8only")]
    Utf8Only,
    #[strum(serialize = "normalization")]
    Normalization,
    #[strum(serialize = "casesensitivity")]
    CaseSensitivity,
    #[strum(serialize = "vscan")]
    Vscan,
    #[strum(serialize = "nbmand")]
    Nbmand,
    #[strum(serialize = "sharesmb")]
    ShareSmb,
    #[strum(serialize = "refquota")]
    RefQuota,
    #[strum(serialize = "refreservation")]
    RefReservation,
    #[strum(serialize = "guid")]
    Guid,
    #[strum(serialize = "primarycache")]
    PrimaryCache,
    #[strum(serialize = "secondarycache")]
    SecondaryCache,
    #[strum(serialize = "usedbysnapshots")]
    UsedBySnapshots,
    #[strum(serialize = "usedbydataset")]
    UsedByDataset,
    #[strum(serialize = "usedbychildren")]
    UsedByChildren,
    #[strum(serialize = "usedbyrefreservation")]
    UsedByRefReservation,
    #[strum(serialize = "defer_destroy")]
    DeferDestroy,
    #[strum(serialize = "userrefs")]
    UserRefs,
    #[strum(serialize = "logbias")]
    LogBias,
    #[strum(serialize = "dedup")]
    Dedup,
    #[strum(serialize = "mlslabel")]
    MlsLabel,
    #[strum(serialize = "sync")]
    Sync,
    #[strum(serialize = "refcompressratio")]
    RefCompressRatio,
    #[strum(serialize = "written")]
    Written,
    #[strum(serialize = "clones")]
    Clones,
    #[strum(serialize = "logicalused")]
    LogicalUsed,
    #[strum(serialize = "logicalreferenced")]
    LogicalReferenced,
    #[strum(serialize = "volmode")]
    VolumeMode,
    #[strum(serialize = "filesystem_limit")]
    FilesystemLimit,
    #[strum(serialize = "snapshot_limit")]
    SnapshotLimit,
    #[strum(serialize = "filesystem_count")]
    FilesystemCount,
    #[strum(serialize = "snapshot_count")]
    SnapshotCount,
    #[strum(serialize = "redundant_metadata")]
    RedundantMetadata,
    #[strum(serialize = "dnodesize")]
    DnodeSize,
}

impl ZfsProperty {
    /// Statistics computed by ZFS. `zfs set` refuses them.
    pub fn is_read_only(self) -> bool {
        match self {
            ZfsProperty::Type
            | ZfsProperty::Creation
            | ZfsProperty::Used
            | ZfsProperty::Available
            | ZfsProperty::Referenced
            | ZfsProperty::CompressRatio
            | ZfsProperty::Mounted
            | ZfsProperty::Origin
            | ZfsProperty::CreateTxg
            | ZfsProperty::Guid
            | ZfsProperty::UsedBySnapshots
            | ZfsProperty::UsedByDataset
            | ZfsProperty::UsedByChildren
            | ZfsProperty::UsedByRefReservation
            | ZfsProperty::DeferDestroy
            | ZfsProperty::UserRefs
            | ZfsProperty::RefCompressRatio
            | ZfsProperty::Written
            | ZfsProperty::Clones
            | ZfsProperty::LogicalUsed
            | ZfsProperty::LogicalReferenced
            | ZfsProperty::FilesystemCount
            | ZfsProperty::SnapshotCount => true,
            _ => false,
        }
    }
}

/// Name of a user property: `module:property`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserPropertyKey(String);

impl UserPropertyKey {
    /// User property names must:
    ///
    ///  - Contain a colon (':') character to distinguish them from native properties.
    ///  - Contain lowercase letters, numbers, and the following punctuation characters: ':',
    ///    '+', '.', '_', '-'.
    ///  - Be at most 256 characters long.
    pub fn new<S: Into<String>>(key: S) -> Result<Self> {
        let key = key.into();
        if !key.contains(':')
            || key.len() > USER_PROPERTY_NAME_MAX_LENGTH
            || !USER_PROPERTY_NAME.is_match(&key)
        {
            return Err(Error::InvalidProperty(key));
        }
        Ok(UserPropertyKey(key))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl AsRef<str> for UserPropertyKey {
    fn as_ref(&self) -> &str { &self.0 }
}

impl fmt::Display for UserPropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Either a native property or a user property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    System(ZfsProperty),
    User(UserPropertyKey),
}

impl PropertyKey {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyKey::System(key) => key.as_ref(),
            PropertyKey::User(key) => key.as_str(),
        }
    }
}

impl FromStr for PropertyKey {
    type Err = Error;

    /// Anything with a colon is a user property, everything else must be a native one.
    fn from_str(s: &str) -> Result<Self> {
        if s.contains(':') {
            return UserPropertyKey::new(s).map(PropertyKey::User);
        }
        s.parse()
            .map(PropertyKey::System)
            .map_err(|_| Error::InvalidProperty(s.to_string()))
    }
}

impl AsRef<str> for PropertyKey {
    fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl From<ZfsProperty> for PropertyKey {
    fn from(key: ZfsProperty) -> Self { PropertyKey::System(key) }
}

impl From<UserPropertyKey> for PropertyKey {
    fn from(key: UserPropertyKey) -> Self { PropertyKey::User(key) }
}

/// A property assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Property {
    System { key: ZfsProperty, value: String },
    User { key: UserPropertyKey, value: String },
}

impl Property {
    pub fn system<V: Into<String>>(key: ZfsProperty, value: V) -> Self {
        Property::System { key, value: value.into() }
    }

    pub fn user<K: Into<String>, V: Into<String>>(key: K, value: V) -> Result<Self> {
        Ok(Property::User { key: UserPropertyKey::new(key)?, value: value.into() })
    }

    pub fn key(&self) -> PropertyKey {
        match self {
            Property::System { key, .. } => PropertyKey::System(*key),
            Property::User { key, .. } => PropertyKey::User(key.clone()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Property::System { key, .. } => key.as_ref(),
            Property::User { key, .. } => key.as_str(),
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Property::System { value, .. } | Property::User { value, .. } => value,
        }
    }

    /// `key=value`, the form `zfs set` and `zfs create -o` take.
    pub fn to_pair(&self) -> String { format!("{}={}", self.name(), self.value()) }
}

/// Native properties take `on`/`off` rather than booleans.
pub(crate) fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Controls the checksum used to verify data integrity. Default value is `on`.
///
/// NOTE: Some variants might not be supported by underlying zfs module. Consult proper manual pages
/// before using anything other than `on`.
#[derive(AsRefStr, EnumString, Display, Eq, PartialEq, Debug, Clone, Copy)]
pub enum Checksum {
    /// Auto-select most appropriate algorithm. Currently, it is `fletcher4`.
    #[strum(serialize = "on")]
    On,
    /// Disable integrity check. Not recommended at all.
    #[strum(serialize = "off")]
    Off,
    #[strum(serialize = "fletcher2")]
    Fletcher2,
    #[strum(serialize = "fletcher4")]
    Fletcher4,
    #[strum(serialize = "sha256")]
    SHA256,
    #[strum(serialize = "sha512")]
    SHA512,
    #[strum(serialize = "skein")]
    Skein,
}

impl Default for Checksum {
    fn default() -> Self { Checksum::On }
}

/// Enables or disables compression for a dataset.
#[derive(AsRefStr, EnumString, Display, Eq, PartialEq, Debug, Clone, Copy)]
pub enum Compression {
    /// Auto-select most appropriate algorithm. If possible uses LZ4, if not then LZJB.
    #[strum(serialize = "on")]
    On,
    #[strum(serialize = "off")]
    Off,
    #[strum(serialize = "lzjb")]
    LZJB,
    #[strum(serialize = "lz4")]
    LZ4,
    /// Compresses runs of zeros.
    #[strum(serialize = "zle")]
    ZLE,
    #[strum(serialize = "gzip")]
    Gzip,
    #[strum(serialize = "gzip-1")]
    Gzip1,
    #[strum(serialize = "gzip-9")]
    Gzip9,
    #[strum(serialize = "zstd")]
    Zstd,
}

impl Default for Compression {
    fn default() -> Self { Compression::Off }
}

/// Number of copies of user data per file system, on top of pool-level redundancy.
#[derive(AsRefStr, EnumString, Display, Eq, PartialEq, Debug, Clone, Copy)]
pub enum Copies {
    #[strum(serialize = "1")]
    One,
    #[strum(serialize = "2")]
    Two,
    #[strum(serialize = "3")]
    Three,
}

impl Default for Copies {
    fn default() -> Self { Copies::One }
}

/// Controls whether the .zfs directory is hidden or visible in the root of the file system
#[derive(AsRefStr, EnumString, Display, Eq, PartialEq, Debug, Clone, Copy)]
pub enum SnapDir {
    #[strum(serialize = "hidden")]
    Hidden,
    #[strum(serialize = "visible")]
    Visible,
}

impl Default for SnapDir {
    fn default() -> Self { SnapDir::Hidden }
}

#[derive(AsRefStr, EnumString, Display, Eq, PartialEq, Debug, Clone, Copy)]
pub enum CanMount {
    /// Allowed to be mounted
    #[strum(serialize = "on")]
    On,
    /// Can't be mounted
    #[strum(serialize = "off")]
    Off,
    /// Can be mounted, but only explicitly
    #[strum(serialize = "noauto")]
    NoAuto,
}

impl Default for CanMount {
    fn default() -> Self { CanMount::On }
}
