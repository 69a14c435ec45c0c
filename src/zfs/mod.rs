use std::{collections::HashMap, path::PathBuf};

pub mod description;
pub use description::DatasetKind;

pub mod name;
pub use name::DatasetName;

pub mod acl;
pub use acl::{Acl, AclBuilder, AclEntry, AllowScope, Permission, Principal, PrincipalBuilder};

pub mod open3;
pub use open3::ZfsOpen3;

#[cfg(feature = "lzc")] pub mod delegating;
#[cfg(feature = "lzc")] pub use delegating::DelegatingZfsEngine;
#[cfg(feature = "lzc")] pub mod lzc;
#[cfg(feature = "lzc")] pub use lzc::ZfsLzc;

pub mod properties;
use properties::on_off;
pub use properties::{CanMount, Checksum, Compression, Copies, Property, PropertyKey, SnapDir,
                     UserPropertyKey, ZfsProperty};

pub mod session;
pub use session::LibZfs;

pub mod dataset;
pub use dataset::Dataset;

pub mod iter;
pub use iter::{Children, Descendants, Listing, Roots, Snapshots};

mod errors;
pub use errors::{Error, ErrorKind, Result, ValidationError, ValidationResult};

use crate::zpool::ZpoolEngine;

/// Longest dataset name, snapshot suffix included.
pub static DATASET_NAME_MAX_LENGTH: usize = 255;
/// Deepest nesting, pool included.
pub static DATASET_NAME_MAX_DEPTH: usize = 50;

/// Call interface of the native ZFS administration layer.
///
/// Engines are dumb: they don't pre-check anything and report what the native layer reports.
/// Handle semantics (idempotency, poisoning, dependency checks) live in
/// [`Dataset`](struct.Dataset.html). Every method defaults to `Unimplemented` so an engine can
/// cover only part of the surface.
pub trait ZfsEngine: ZpoolEngine {
    /// Kind of the dataset. `NotFound` if it doesn't exist.
    #[cfg_attr(tarpaulin, skip)]
    fn kind(&self, _name: &DatasetName) -> Result<DatasetKind> { Err(Error::Unimplemented) }

    /// Check if a filesystem, volume or snapshot with the given name exists.
    #[cfg_attr(tarpaulin, skip)]
    fn exists(&self, name: &DatasetName) -> Result<bool> {
        match self.kind(name) {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create a new filesystem or volume.
    #[cfg_attr(tarpaulin, skip)]
    fn create(&self, _request: &CreateDatasetRequest) -> Result<()> { Err(Error::Unimplemented) }

    /// Create a snapshot. `name` is the full `dataset@suffix`.
    #[cfg_attr(tarpaulin, skip)]
    fn snapshot(
        &self,
        _name: &DatasetName,
        _user_properties: Option<&HashMap<String, String>>,
    ) -> Result<()> {
        Err(Error::Unimplemented)
    }

    /// Delete a dataset, and with `recursive` everything below it.
    #[cfg_attr(tarpaulin, skip)]
    fn destroy(&self, _name: &DatasetName, _recursive: bool) -> Result<()> {
        Err(Error::Unimplemented)
    }

    /// Delete snapshots as one atomic operation.
    #[cfg_attr(tarpaulin, skip)]
    fn destroy_snapshots(&self, _snapshots: &[DatasetName]) -> Result<()> {
        Err(Error::Unimplemented)
    }

    #[cfg_attr(tarpaulin, skip)]
    fn rename(&self, _from: &DatasetName, _to: &DatasetName) -> Result<()> {
        Err(Error::Unimplemented)
    }

    /// Top-level dataset of every imported pool.
    #[cfg_attr(tarpaulin, skip)]
    fn list_roots(&self) -> Result<Vec<DatasetName>> { Err(Error::Unimplemented) }

    /// Filesystems and volumes directly below `name`. Not recursive, `name` itself excluded.
    #[cfg_attr(tarpaulin, skip)]
    fn list_children(&self, _name: &DatasetName) -> Result<Vec<(DatasetKind, DatasetName)>> {
        Err(Error::Unimplemented)
    }

    /// Snapshots of `name` in the order the native layer reports them.
    #[cfg_attr(tarpaulin, skip)]
    fn list_snapshots(&self, _name: &DatasetName) -> Result<Vec<DatasetName>> {
        Err(Error::Unimplemented)
    }

    /// Currently mounted filesystems and where.
    #[cfg_attr(tarpaulin, skip)]
    fn list_mounts(&self) -> Result<Vec<(DatasetName, PathBuf)>> { Err(Error::Unimplemented) }

    /// Values of the requested native properties, unmodified. Keys the dataset doesn't have
    /// are left out.
    #[cfg_attr(tarpaulin, skip)]
    fn read_properties(
        &self,
        _name: &DatasetName,
        _keys: &[ZfsProperty],
    ) -> Result<HashMap<ZfsProperty, String>> {
        Err(Error::Unimplemented)
    }

    /// Effective value of a user property, local or inherited. `None` if it isn't set anywhere.
    #[cfg_attr(tarpaulin, skip)]
    fn read_user_property(
        &self,
        _name: &DatasetName,
        _key: &UserPropertyKey,
    ) -> Result<Option<String>> {
        Err(Error::Unimplemented)
    }

    #[cfg_attr(tarpaulin, skip)]
    fn set_property(&self, _name: &DatasetName, _property: &Property) -> Result<()> {
        Err(Error::Unimplemented)
    }

    /// Drop the local value of a property.
    #[cfg_attr(tarpaulin, skip)]
    fn inherit_property(&self, _name: &DatasetName, _key: &PropertyKey) -> Result<()> {
        Err(Error::Unimplemented)
    }

    /// Mount a filesystem. `Unchanged` if it's mounted already.
    #[cfg_attr(tarpaulin, skip)]
    fn mount(&self, _name: &DatasetName) -> Result<()> { Err(Error::Unimplemented) }

    /// Unmount a filesystem. `Unchanged` if it isn't mounted.
    #[cfg_attr(tarpaulin, skip)]
    fn unmount(&self, _name: &DatasetName) -> Result<()> { Err(Error::Unimplemented) }

    #[cfg_attr(tarpaulin, skip)]
    fn is_mounted(&self, _name: &DatasetName) -> Result<bool> { Err(Error::Unimplemented) }

    /// Share a filesystem. `Unchanged` if it's shared already.
    #[cfg_attr(tarpaulin, skip)]
    fn share(&self, _name: &DatasetName) -> Result<()> { Err(Error::Unimplemented) }

    /// Unshare a filesystem. `Unchanged` if it isn't shared.
    #[cfg_attr(tarpaulin, skip)]
    fn unshare(&self, _name: &DatasetName) -> Result<()> { Err(Error::Unimplemented) }

    #[cfg_attr(tarpaulin, skip)]
    fn is_shared(&self, _name: &DatasetName) -> Result<bool> { Err(Error::Unimplemented) }

    /// Delegate every entry of `acl` on `name`.
    #[cfg_attr(tarpaulin, skip)]
    fn allow(&self, _name: &DatasetName, _acl: &Acl) -> Result<()> { Err(Error::Unimplemented) }

    /// Revoke every entry of `acl` on `name`.
    #[cfg_attr(tarpaulin, skip)]
    fn unallow(&self, _name: &DatasetName, _acl: &Acl) -> Result<()> {
        Err(Error::Unimplemented)
    }

    /// Release native resources. Called once when the owning session is disposed.
    fn close(&self) {}
}

#[derive(Builder, Debug, Clone, Getters)]
#[builder(setter(into))]
#[get = "pub"]
/// Consumer friendly builder for dataset creation. Some properties only work on filesystems,
/// some only on volumes.
pub struct CreateDatasetRequest {
    /// Name of the dataset. First component is the pool.
    name:              DatasetName,
    /// Filesystem or Volume.
    kind:              DatasetKind,
    /// Optional user defined properties. Names must contain a colon (':') and consist of
    /// lowercase letters, numbers and ':', '+', '.', '_', '-'. At most 256 characters.
    #[builder(default)]
    user_properties:   Option<HashMap<String, String>>,

    //
    // the rest is zfs native properties
    /// Controls whether the access time for files updated when they are read.
    #[builder(default)]
    atime:             Option<bool>,
    /// Controls whether a file system can be mounted.
    #[builder(default)]
    can_mount:         Option<CanMount>,
    /// Controls the checksum used to verify data integrity.
    #[builder(default)]
    checksum:          Option<Checksum>,
    /// Enables or disables compression for a dataset.
    #[builder(default)]
    compression:       Option<Compression>,
    /// Sets the number of copies of user data per file system.
    #[builder(default)]
    copies:            Option<Copies>,
    /// Controls the mount point used for this file system.
    #[builder(default)]
    mount_point:       Option<PathBuf>,
    /// Limits the amount of disk space a dataset and its descendants can consume.
    #[builder(default)]
    quota:             Option<u64>,
    /// Controls whether a dataset can be modified.
    #[builder(default)]
    readonly:          Option<bool>,
    /// Controls whether the .zfs directory is hidden or visible in the root of the file system
    #[builder(default)]
    snap_dir:          Option<SnapDir>,
    /// For volumes, specifies the logical size of the volume. Required for volumes.
    #[builder(default)]
    volume_size:       Option<u64>,
    /// For volumes, specifies the block size of the volume in bytes. Any power of 2 from 512
    /// bytes to 128 KB is valid.
    #[builder(default)]
    volume_block_size: Option<u64>,
}

impl CreateDatasetRequest {
    pub fn builder() -> CreateDatasetRequestBuilder { CreateDatasetRequestBuilder::default() }

    /// Request with nothing but a name and a kind.
    pub fn new(name: DatasetName, kind: DatasetKind) -> Self {
        CreateDatasetRequest {
            name,
            kind,
            user_properties: None,
            atime: None,
            can_mount: None,
            checksum: None,
            compression: None,
            copies: None,
            mount_point: None,
            quota: None,
            readonly: None,
            snap_dir: None,
            volume_size: None,
            volume_block_size: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.kind.is_creatable() || self.name.is_snapshot() {
            return Err(Error::InvalidInput);
        }
        match self.kind {
            DatasetKind::Volume if self.volume_size.is_none() => return Err(Error::InvalidInput),
            DatasetKind::Filesystem
                if self.volume_size.is_some() || self.volume_block_size.is_some() =>
            {
                return Err(Error::InvalidInput)
            },
            _ => {},
        }
        if let Some(user_properties) = &self.user_properties {
            for key in user_properties.keys() {
                UserPropertyKey::new(key.as_str())?;
            }
        }
        Ok(())
    }

    /// Native and user properties to set at creation, in `-o key=value` form order.
    /// Volume size and block size are not included.
    pub fn properties(&self) -> Result<Vec<Property>> {
        let mut properties = Vec::new();
        if let Some(atime) = self.atime {
            properties.push(Property::system(ZfsProperty::Atime, on_off(atime)));
        }
        if let Some(can_mount) = self.can_mount {
            properties.push(Property::system(ZfsProperty::CanMount, can_mount.as_ref()));
        }
        if let Some(checksum) = self.checksum {
            properties.push(Property::system(ZfsProperty::Checksum, checksum.as_ref()));
        }
        if let Some(compression) = self.compression {
            properties.push(Property::system(ZfsProperty::Compression, compression.as_ref()));
        }
        if let Some(copies) = self.copies {
            properties.push(Property::system(ZfsProperty::Copies, copies.as_ref()));
        }
        if let Some(mount_point) = &self.mount_point {
            let value = mount_point.to_string_lossy();
            properties.push(Property::system(ZfsProperty::MountPoint, value.as_ref()));
        }
        if let Some(quota) = self.quota {
            properties.push(Property::system(ZfsProperty::Quota, quota.to_string()));
        }
        if let Some(readonly) = self.readonly {
            properties.push(Property::system(ZfsProperty::ReadOnly, on_off(readonly)));
        }
        if let Some(snap_dir) = self.snap_dir {
            properties.push(Property::system(ZfsProperty::SnapDir, snap_dir.as_ref()));
        }
        if let Some(user_properties) = &self.user_properties {
            let mut keys: Vec<&String> = user_properties.keys().collect();
            keys.sort();
            for key in keys {
                properties.push(Property::user(key.as_str(), user_properties[key].as_str())?);
            }
        }
        Ok(properties)
    }
}
