use crate::{zfs::{iter::{Children, Descendants, Listing, Snapshots},
                  Acl, DatasetKind, DatasetName, Error, LibZfs, Property, PropertyKey, Result,
                  UserPropertyKey, ZfsEngine, ZfsProperty},
            zpool::Pool};
use std::{cell::Cell, collections::HashMap, fmt};

/// Handle to a filesystem, volume or snapshot.
///
/// Holds the name and kind only, every read and write is a live round-trip. Once the dataset is
/// destroyed or renamed through this handle, every further call returns `NotFound`.
pub struct Dataset<'s, E: ZfsEngine> {
    session:   &'s LibZfs<E>,
    name:      DatasetName,
    kind:      DatasetKind,
    destroyed: Cell<bool>,
}

impl<'s, E: ZfsEngine> Dataset<'s, E> {
    pub(crate) fn new(session: &'s LibZfs<E>, name: DatasetName, kind: DatasetKind) -> Self {
        Dataset { session, name, kind, destroyed: Cell::new(false) }
    }

    pub fn name(&self) -> &DatasetName { &self.name }

    pub fn kind(&self) -> DatasetKind { self.kind }

    pub fn session(&self) -> &'s LibZfs<E> { self.session }

    pub fn is_filesystem(&self) -> bool { self.kind == DatasetKind::Filesystem }

    pub fn is_volume(&self) -> bool { self.kind == DatasetKind::Volume }

    pub fn is_snapshot(&self) -> bool { self.kind == DatasetKind::Snapshot }

    /// Engine to talk to, provided both the session and this handle are still usable.
    fn live(&self) -> Result<&'s E> {
        self.session.ensure_open()?;
        if self.destroyed.get() {
            return Err(Error::NotFound(self.name.to_string()));
        }
        Ok(self.session.engine())
    }

    fn require(&self, kind: DatasetKind) -> Result<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(Error::TypeMismatch(kind, self.kind))
        }
    }

    pub fn pool(&self) -> Result<Pool<'s, E>> {
        self.live()?;
        Ok(Pool::new(self.session, self.name.pool().to_string()))
    }

    /// Dataset one level up. Snapshots belong to the dataset they were taken of.
    pub fn parent(&self) -> Result<Option<Dataset<'s, E>>> {
        self.live()?;
        match self.name.parent() {
            Some(parent) => self.session.open_name(parent, None).map(Some),
            None => Ok(None),
        }
    }

    /// Filesystems and volumes directly below, then snapshots of this dataset.
    pub fn children(&self) -> Result<Children<'s, E>> {
        let engine = self.live()?;
        if self.is_snapshot() {
            return Ok(Listing::new(self.session, Vec::new()));
        }
        let mut children = engine.list_children(&self.name)?;
        children.extend(
            engine.list_snapshots(&self.name)?.into_iter().map(|s| (DatasetKind::Snapshot, s)),
        );
        Ok(Listing::new(self.session, children))
    }

    /// Everything below, depth first. A dataset is listed only when the iterator gets to it.
    pub fn descendants(&self) -> Result<Descendants<'s, E>> {
        self.live()?;
        Ok(Descendants::new(self.session, self.name.clone(), self.kind))
    }

    pub fn snapshots(&self) -> Result<Snapshots<'s, E>> {
        let engine = self.live()?;
        if self.is_snapshot() {
            return Ok(Listing::new(self.session, Vec::new()));
        }
        let snapshots = engine.list_snapshots(&self.name)?;
        Ok(Listing::new(
            self.session,
            snapshots.into_iter().map(|s| (DatasetKind::Snapshot, s)).collect(),
        ))
    }

    /// Snapshot `name@suffix`.
    pub fn create_snapshot(&self, suffix: &str) -> Result<Dataset<'s, E>> {
        self.create_snapshot_with(suffix, None)
    }

    pub fn create_snapshot_with(
        &self,
        suffix: &str,
        user_properties: Option<&HashMap<String, String>>,
    ) -> Result<Dataset<'s, E>> {
        let engine = self.live()?;
        if self.is_snapshot() {
            return Err(Error::InvalidInput);
        }
        let snapshot = self.name.with_snapshot(suffix)?;
        if let Some(user_properties) = user_properties {
            for key in user_properties.keys() {
                UserPropertyKey::new(key.as_str())?;
            }
        }
        if engine.exists(&snapshot)? {
            return Err(Error::AlreadyExists(snapshot.to_string()));
        }
        engine.snapshot(&snapshot, user_properties)?;
        debug!(self.session.logger(), "created snapshot"; "name" => snapshot.as_str());
        Ok(Dataset::new(self.session, snapshot, DatasetKind::Snapshot))
    }

    /// Destroy `name@suffix`. Nothing happens if there is no such snapshot.
    pub fn destroy_snapshot(&self, suffix: &str) -> Result<()> {
        let engine = self.live()?;
        let snapshot = self.name.with_snapshot(suffix)?;
        if !engine.exists(&snapshot)? {
            debug!(self.session.logger(), "no snapshot to destroy"; "name" => snapshot.as_str());
            return Ok(());
        }
        match engine.destroy_snapshots(&[snapshot]) {
            Err(Error::NotFound(_)) => Ok(()),
            other => other,
        }
    }

    /// Destroy this dataset. Without `recursive` it has to have no children and no snapshots.
    pub fn destroy(&self, recursive: bool) -> Result<()> {
        let engine = self.live()?;
        if !recursive && !self.is_snapshot() {
            let has_dependents = !engine.list_children(&self.name)?.is_empty()
                || !engine.list_snapshots(&self.name)?.is_empty();
            if has_dependents {
                return Err(Error::DependencyExists(self.name.to_string()));
            }
        }
        engine.destroy(&self.name, recursive)?;
        self.destroyed.set(true);
        info!(self.session.logger(), "destroyed dataset"; "name" => self.name.as_str(), "recursive" => recursive);
        Ok(())
    }

    /// Rename within the same pool. This handle is spent afterwards, use the returned one.
    pub fn rename(&self, new_name: &str) -> Result<Dataset<'s, E>> {
        let engine = self.live()?;
        let new_name = DatasetName::new(new_name)?;
        if new_name.pool() != self.name.pool() || new_name.is_snapshot() != self.is_snapshot() {
            return Err(Error::InvalidInput);
        }
        engine.rename(&self.name, &new_name)?;
        self.destroyed.set(true);
        Ok(Dataset::new(self.session, new_name, self.kind))
    }

    /// Mount the filesystem. Mounting a mounted filesystem is fine.
    pub fn mount(&self) -> Result<()> {
        let engine = self.live()?;
        self.require(DatasetKind::Filesystem)?;
        if engine.is_mounted(&self.name)? {
            return Ok(());
        }
        ignore_unchanged(engine.mount(&self.name))
    }

    /// Unmount the filesystem. Unmounting an unmounted filesystem is fine.
    pub fn unmount(&self) -> Result<()> {
        let engine = self.live()?;
        self.require(DatasetKind::Filesystem)?;
        if !engine.is_mounted(&self.name)? {
            return Ok(());
        }
        ignore_unchanged(engine.unmount(&self.name))
    }

    /// Only filesystems are ever mounted.
    pub fn is_mounted(&self) -> Result<bool> {
        let engine = self.live()?;
        if !self.is_filesystem() {
            return Ok(false);
        }
        engine.is_mounted(&self.name)
    }

    pub fn share(&self) -> Result<()> {
        let engine = self.live()?;
        self.require(DatasetKind::Filesystem)?;
        if engine.is_shared(&self.name)? {
            return Ok(());
        }
        ignore_unchanged(engine.share(&self.name))
    }

    pub fn unshare(&self) -> Result<()> {
        let engine = self.live()?;
        self.require(DatasetKind::Filesystem)?;
        if !engine.is_shared(&self.name)? {
            return Ok(());
        }
        ignore_unchanged(engine.unshare(&self.name))
    }

    pub fn is_shared(&self) -> Result<bool> {
        let engine = self.live()?;
        if !self.is_filesystem() {
            return Ok(false);
        }
        engine.is_shared(&self.name)
    }

    /// Set a native or user property. Read-only native properties are refused up front.
    pub fn set_property(&self, property: &Property) -> Result<()> {
        let engine = self.live()?;
        if let Property::System { key, .. } = property {
            if key.is_read_only() {
                return Err(Error::InvalidProperty(key.to_string()));
            }
        }
        engine.set_property(&self.name, property)
    }

    pub fn set_user_property<V: Into<String>>(&self, key: &str, value: V) -> Result<()> {
        self.set_property(&Property::user(key, value)?)
    }

    /// Effective value, local or inherited.
    pub fn user_property(&self, key: &str) -> Result<Option<String>> {
        let engine = self.live()?;
        let key = UserPropertyKey::new(key)?;
        engine.read_user_property(&self.name, &key)
    }

    /// Drop the local value, reads fall back to what the closest ancestor has.
    pub fn inherit_property<K: Into<PropertyKey>>(&self, key: K) -> Result<()> {
        let engine = self.live()?;
        engine.inherit_property(&self.name, &key.into())
    }

    /// Values exactly as the native layer reports them. Properties that don't apply to this
    /// kind of dataset are missing from the map.
    pub fn zfs_properties(&self, keys: &[ZfsProperty]) -> Result<HashMap<ZfsProperty, String>> {
        let engine = self.live()?;
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        engine.read_properties(&self.name, keys)
    }

    pub fn zfs_property(&self, key: ZfsProperty) -> Result<Option<String>> {
        Ok(self.zfs_properties(&[key])?.remove(&key))
    }

    /// Delegate permissions.
    pub fn allow(&self, acl: &Acl) -> Result<()> {
        let engine = self.live()?;
        if acl.is_empty() {
            return Ok(());
        }
        engine.allow(&self.name, acl)
    }

    /// Revoke delegated permissions.
    pub fn unallow(&self, acl: &Acl) -> Result<()> {
        let engine = self.live()?;
        if acl.is_empty() {
            return Ok(());
        }
        engine.unallow(&self.name, acl)
    }
}

fn ignore_unchanged(result: Result<()>) -> Result<()> {
    match result {
        Err(Error::Unchanged(_)) => Ok(()),
        other => other,
    }
}

impl<'s, E: ZfsEngine> fmt::Debug for Dataset<'s, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("destroyed", &self.destroyed.get())
            .finish()
    }
}

impl<'s, E: ZfsEngine> fmt::Display for Dataset<'s, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(&self.name, f) }
}
