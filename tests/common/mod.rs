//! In-memory engine with the observable behaviour of `zfs(8)`.
#![allow(dead_code)]

use std::{cell::{Cell, RefCell},
          collections::{BTreeMap, BTreeSet, HashMap},
          path::PathBuf};

use zfs_session::{zfs::{Acl, CreateDatasetRequest, DatasetKind, DatasetName, Error, Permission,
                        Principal, Property, PropertyKey, Result, UserPropertyKey, ZfsEngine,
                        ZfsProperty},
                  zpool::{PoolProperty, ZpoolEngine}};

pub static POOL_SIZE: u64 = 64 * 1024 * 1024;
pub static POOL_ALLOCATED: u64 = 1024 * 1024;

#[derive(Debug, Clone)]
struct Node {
    kind:        DatasetKind,
    properties:  HashMap<String, String>,
    mount_point: Option<PathBuf>,
    mounted:     bool,
    shared:      bool,
    permissions: HashMap<Principal, BTreeSet<Permission>>,
}

impl Node {
    fn new(kind: DatasetKind, name: &str) -> Self {
        let mount_point = match kind {
            DatasetKind::Filesystem => Some(PathBuf::from(format!("/{}", name))),
            _ => None,
        };
        Node {
            kind,
            properties: HashMap::new(),
            mount_point,
            mounted: false,
            shared: false,
            permissions: HashMap::new(),
        }
    }
}

pub struct MockEngine {
    pools:    Vec<String>,
    datasets: RefCell<BTreeMap<String, Node>>,
    listings: Cell<usize>,
    closes:   Cell<usize>,
}

fn name(name: &str) -> DatasetName { DatasetName::new(name).unwrap() }

impl MockEngine {
    /// Every pool starts with its root filesystem, mounted at `/<pool>`.
    pub fn new(pools: &[&str]) -> Self {
        let mut datasets = BTreeMap::new();
        for pool in pools {
            let mut root = Node::new(DatasetKind::Filesystem, pool);
            root.mounted = true;
            datasets.insert(pool.to_string(), root);
        }
        MockEngine {
            pools:    pools.iter().map(|p| p.to_string()).collect(),
            datasets: RefCell::new(datasets),
            listings: Cell::new(0),
            closes:   Cell::new(0),
        }
    }

    /// Number of child/snapshot/root listings served so far.
    pub fn listings(&self) -> usize { self.listings.get() }

    pub fn closes(&self) -> usize { self.closes.get() }

    pub fn permissions(&self, dataset: &str, principal: &Principal) -> BTreeSet<Permission> {
        self.datasets
            .borrow()
            .get(dataset)
            .and_then(|node| node.permissions.get(principal).cloned())
            .unwrap_or_default()
    }

    pub fn local_property(&self, dataset: &str, key: &str) -> Option<String> {
        self.datasets.borrow().get(dataset).and_then(|node| node.properties.get(key).cloned())
    }

    /// Remove a dataset behind the session's back.
    pub fn remove(&self, dataset: &str) { self.datasets.borrow_mut().remove(dataset); }

    fn count_listing(&self) { self.listings.set(self.listings.get() + 1); }

    fn with_node<T, F: FnOnce(&mut Node) -> Result<T>>(&self, dataset: &DatasetName, f: F) -> Result<T> {
        let mut datasets = self.datasets.borrow_mut();
        match datasets.get_mut(dataset.as_str()) {
            Some(node) => f(node),
            None => Err(Error::NotFound(dataset.to_string())),
        }
    }

    fn insert(&self, dataset: &DatasetName, kind: DatasetKind) -> Result<()> {
        let mut datasets = self.datasets.borrow_mut();
        if datasets.contains_key(dataset.as_str()) {
            return Err(Error::AlreadyExists(dataset.to_string()));
        }
        match dataset.parent() {
            Some(parent) if !datasets.contains_key(parent.as_str()) => {
                return Err(Error::NotFound(parent.to_string()))
            },
            None if !self.pools.iter().any(|p| p == dataset.as_str()) => {
                return Err(Error::NotFound(dataset.to_string()))
            },
            _ => {},
        }
        datasets.insert(dataset.to_string(), Node::new(kind, dataset.as_str()));
        Ok(())
    }

    fn dependents(&self, dataset: &DatasetName) -> Vec<String> {
        let children = format!("{}/", dataset);
        let snapshots = format!("{}@", dataset);
        self.datasets
            .borrow()
            .keys()
            .filter(|key| key.starts_with(&children) || key.starts_with(&snapshots))
            .cloned()
            .collect()
    }
}

impl ZpoolEngine for MockEngine {
    fn list_pools(&self) -> Result<Vec<String>> { Ok(self.pools.clone()) }

    fn read_pool_properties(
        &self,
        pool: &str,
        keys: &[PoolProperty],
    ) -> Result<HashMap<PoolProperty, String>> {
        if !self.pools.iter().any(|p| p == pool) {
            return Err(Error::NotFound(pool.to_string()));
        }
        let mut all = HashMap::new();
        all.insert(PoolProperty::Name, pool.to_string());
        all.insert(PoolProperty::Health, "ONLINE".to_string());
        all.insert(PoolProperty::Size, POOL_SIZE.to_string());
        all.insert(PoolProperty::Allocated, POOL_ALLOCATED.to_string());
        all.insert(PoolProperty::Free, (POOL_SIZE - POOL_ALLOCATED).to_string());
        all.insert(PoolProperty::Comment, "-".to_string());
        Ok(all.into_iter().filter(|(key, _)| keys.is_empty() || keys.contains(key)).collect())
    }
}

impl ZfsEngine for MockEngine {
    fn kind(&self, dataset: &DatasetName) -> Result<DatasetKind> {
        self.with_node(dataset, |node| Ok(node.kind))
    }

    fn create(&self, request: &CreateDatasetRequest) -> Result<()> {
        self.insert(request.name(), *request.kind())?;
        for property in request.properties()? {
            self.set_property(request.name(), &property)?;
        }
        Ok(())
    }

    fn snapshot(
        &self,
        dataset: &DatasetName,
        user_properties: Option<&HashMap<String, String>>,
    ) -> Result<()> {
        self.insert(dataset, DatasetKind::Snapshot)?;
        if let Some(user_properties) = user_properties {
            self.with_node(dataset, |node| {
                node.properties.extend(user_properties.clone());
                Ok(())
            })?;
        }
        Ok(())
    }

    fn destroy(&self, dataset: &DatasetName, recursive: bool) -> Result<()> {
        self.kind(dataset)?;
        let dependents = self.dependents(dataset);
        if !recursive && !dependents.is_empty() {
            return Err(Error::DependencyExists(dataset.to_string()));
        }
        let mut datasets = self.datasets.borrow_mut();
        for dependent in dependents {
            datasets.remove(&dependent);
        }
        datasets.remove(dataset.as_str());
        Ok(())
    }

    fn destroy_snapshots(&self, snapshots: &[DatasetName]) -> Result<()> {
        for snapshot in snapshots {
            self.kind(snapshot)?;
        }
        let mut datasets = self.datasets.borrow_mut();
        for snapshot in snapshots {
            datasets.remove(snapshot.as_str());
        }
        Ok(())
    }

    fn rename(&self, from: &DatasetName, to: &DatasetName) -> Result<()> {
        self.kind(from)?;
        if self.datasets.borrow().contains_key(to.as_str()) {
            return Err(Error::AlreadyExists(to.to_string()));
        }
        let mut moved = self.dependents(from);
        moved.push(from.to_string());
        let mut datasets = self.datasets.borrow_mut();
        for old in moved {
            if let Some(node) = datasets.remove(&old) {
                let new = format!("{}{}", to, &old[from.as_str().len()..]);
                datasets.insert(new, node);
            }
        }
        Ok(())
    }

    fn list_roots(&self) -> Result<Vec<DatasetName>> {
        self.count_listing();
        Ok(self.pools.iter().map(|p| name(p)).collect())
    }

    fn list_children(&self, dataset: &DatasetName) -> Result<Vec<(DatasetKind, DatasetName)>> {
        self.count_listing();
        self.kind(dataset)?;
        let datasets = self.datasets.borrow();
        Ok(datasets
            .iter()
            .filter(|(key, _)| !key.contains('@'))
            .map(|(key, node)| (node.kind, name(key)))
            .filter(|(_, child)| child.parent().as_ref() == Some(dataset))
            .collect())
    }

    fn list_snapshots(&self, dataset: &DatasetName) -> Result<Vec<DatasetName>> {
        self.count_listing();
        self.kind(dataset)?;
        let prefix = format!("{}@", dataset);
        Ok(self.datasets.borrow().keys().filter(|key| key.starts_with(&prefix)).map(|key| name(key)).collect())
    }

    fn list_mounts(&self) -> Result<Vec<(DatasetName, PathBuf)>> {
        Ok(self
            .datasets
            .borrow()
            .iter()
            .filter(|(_, node)| node.mounted)
            .filter_map(|(key, node)| node.mount_point.clone().map(|mp| (name(key), mp)))
            .collect())
    }

    fn read_properties(
        &self,
        dataset: &DatasetName,
        keys: &[ZfsProperty],
    ) -> Result<HashMap<ZfsProperty, String>> {
        self.with_node(dataset, |node| {
            let mut properties = HashMap::new();
            for key in keys {
                let value = match key {
                    ZfsProperty::Type => Some(node.kind.to_string()),
                    ZfsProperty::Mounted => {
                        Some(if node.mounted { "yes" } else { "no" }.to_string())
                    },
                    ZfsProperty::MountPoint => Some(
                        node.mount_point
                            .as_ref()
                            .map_or_else(|| "-".to_string(), |mp| mp.display().to_string()),
                    ),
                    ZfsProperty::Origin => Some("-".to_string()),
                    other => node.properties.get(&other.to_string()).cloned(),
                };
                if let Some(value) = value {
                    properties.insert(*key, value);
                }
            }
            Ok(properties)
        })
    }

    fn read_user_property(
        &self,
        dataset: &DatasetName,
        key: &UserPropertyKey,
    ) -> Result<Option<String>> {
        self.kind(dataset)?;
        let datasets = self.datasets.borrow();
        let mut current = Some(dataset.clone());
        while let Some(dataset) = current {
            if let Some(value) = datasets.get(dataset.as_str()).and_then(|n| n.properties.get(key.as_str())) {
                return Ok(Some(value.clone()));
            }
            current = dataset.parent();
        }
        Ok(None)
    }

    fn set_property(&self, dataset: &DatasetName, property: &Property) -> Result<()> {
        self.with_node(dataset, |node| {
            if let Property::System { key: ZfsProperty::MountPoint, value } = property {
                node.mount_point = Some(PathBuf::from(value));
            }
            node.properties.insert(property.name().to_string(), property.value().to_string());
            Ok(())
        })
    }

    fn inherit_property(&self, dataset: &DatasetName, key: &PropertyKey) -> Result<()> {
        self.with_node(dataset, |node| {
            node.properties.remove(key.as_str());
            Ok(())
        })
    }

    fn mount(&self, dataset: &DatasetName) -> Result<()> {
        self.with_node(dataset, |node| {
            if node.mounted {
                return Err(Error::Unchanged(dataset.to_string()));
            }
            node.mounted = true;
            Ok(())
        })
    }

    fn unmount(&self, dataset: &DatasetName) -> Result<()> {
        self.with_node(dataset, |node| {
            if !node.mounted {
                return Err(Error::Unchanged(dataset.to_string()));
            }
            node.mounted = false;
            node.shared = false;
            Ok(())
        })
    }

    fn is_mounted(&self, dataset: &DatasetName) -> Result<bool> {
        self.with_node(dataset, |node| Ok(node.mounted))
    }

    fn share(&self, dataset: &DatasetName) -> Result<()> {
        self.with_node(dataset, |node| {
            if node.shared {
                return Err(Error::Unchanged(dataset.to_string()));
            }
            node.shared = true;
            Ok(())
        })
    }

    fn unshare(&self, dataset: &DatasetName) -> Result<()> {
        self.with_node(dataset, |node| {
            if !node.shared {
                return Err(Error::Unchanged(dataset.to_string()));
            }
            node.shared = false;
            Ok(())
        })
    }

    fn is_shared(&self, dataset: &DatasetName) -> Result<bool> {
        self.with_node(dataset, |node| Ok(node.shared))
    }

    fn allow(&self, dataset: &DatasetName, acl: &Acl) -> Result<()> {
        self.with_node(dataset, |node| {
            for entry in acl.entries() {
                node.permissions
                    .entry(entry.principal().clone())
                    .or_default()
                    .extend(entry.permissions().iter().cloned());
            }
            Ok(())
        })
    }

    fn unallow(&self, dataset: &DatasetName, acl: &Acl) -> Result<()> {
        self.with_node(dataset, |node| {
            for entry in acl.entries() {
                if let Some(granted) = node.permissions.get_mut(entry.principal()) {
                    for permission in entry.permissions() {
                        granted.remove(permission);
                    }
                }
            }
            Ok(())
        })
    }

    fn close(&self) { self.closes.set(self.closes.get() + 1); }
}
