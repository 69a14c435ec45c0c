use crate::{zfs::{lzc::ZfsLzc, open3::ZfsOpen3, Acl, CreateDatasetRequest, DatasetKind,
                  DatasetName, Property, PropertyKey, Result, UserPropertyKey, ZfsEngine,
                  ZfsProperty},
            zpool::{PoolProperty, ZpoolEngine}};
use std::{collections::HashMap, path::PathBuf};

/// Handy wrapper that delegates your call to correct implementation.
pub struct DelegatingZfsEngine {
    lzc:   ZfsLzc,
    open3: ZfsOpen3,
}

impl DelegatingZfsEngine {
    pub fn new() -> Result<Self> {
        let lzc = ZfsLzc::new()?;
        let open3 = ZfsOpen3::new();
        Ok(DelegatingZfsEngine { lzc, open3 })
    }
}

impl ZpoolEngine for DelegatingZfsEngine {
    fn list_pools(&self) -> Result<Vec<String>> { self.open3.list_pools() }

    fn pool_exists(&self, name: &str) -> Result<bool> { self.open3.pool_exists(name) }

    fn read_pool_properties(
        &self,
        name: &str,
        keys: &[PoolProperty],
    ) -> Result<HashMap<PoolProperty, String>> {
        self.open3.read_pool_properties(name, keys)
    }
}

impl ZfsEngine for DelegatingZfsEngine {
    fn kind(&self, name: &DatasetName) -> Result<DatasetKind> { self.open3.kind(name) }

    fn exists(&self, name: &DatasetName) -> Result<bool> { self.lzc.exists(name) }

    fn create(&self, request: &CreateDatasetRequest) -> Result<()> { self.open3.create(request) }

    fn snapshot(
        &self,
        name: &DatasetName,
        user_properties: Option<&HashMap<String, String>>,
    ) -> Result<()> {
        self.lzc.snapshot(name, user_properties)
    }

    fn destroy(&self, name: &DatasetName, recursive: bool) -> Result<()> {
        self.open3.destroy(name, recursive)
    }

    fn destroy_snapshots(&self, snapshots: &[DatasetName]) -> Result<()> {
        self.lzc.destroy_snapshots(snapshots)
    }

    fn rename(&self, from: &DatasetName, to: &DatasetName) -> Result<()> {
        self.open3.rename(from, to)
    }

    fn list_roots(&self) -> Result<Vec<DatasetName>> { self.open3.list_roots() }

    fn list_children(&self, name: &DatasetName) -> Result<Vec<(DatasetKind, DatasetName)>> {
        self.open3.list_children(name)
    }

    fn list_snapshots(&self, name: &DatasetName) -> Result<Vec<DatasetName>> {
        self.open3.list_snapshots(name)
    }

    fn list_mounts(&self) -> Result<Vec<(DatasetName, PathBuf)>> { self.open3.list_mounts() }

    fn read_properties(
        &self,
        name: &DatasetName,
        keys: &[ZfsProperty],
    ) -> Result<HashMap<ZfsProperty, String>> {
        self.open3.read_properties(name, keys)
    }

    fn read_user_property(
        &self,
        name: &DatasetName,
        key: &UserPropertyKey,
    ) -> Result<Option<String>> {
        self.open3.read_user_property(name, key)
    }

    fn set_property(&self, name: &DatasetName, property: &Property) -> Result<()> {
        self.open3.set_property(name, property)
    }

    fn inherit_property(&self, name: &DatasetName, key: &PropertyKey) -> Result<()> {
        self.open3.inherit_property(name, key)
    }

    fn mount(&self, name: &DatasetName) -> Result<()> { self.open3.mount(name) }

    fn unmount(&self, name: &DatasetName) -> Result<()> { self.open3.unmount(name) }

    fn is_mounted(&self, name: &DatasetName) -> Result<bool> { self.open3.is_mounted(name) }

    fn share(&self, name: &DatasetName) -> Result<()> { self.open3.share(name) }

    fn unshare(&self, name: &DatasetName) -> Result<()> { self.open3.unshare(name) }

    fn is_shared(&self, name: &DatasetName) -> Result<bool> { self.open3.is_shared(name) }

    fn allow(&self, name: &DatasetName, acl: &Acl) -> Result<()> { self.open3.allow(name, acl) }

    fn unallow(&self, name: &DatasetName, acl: &Acl) -> Result<()> {
        self.open3.unallow(name, acl)
    }

    fn close(&self) { self.lzc.close() }
}
