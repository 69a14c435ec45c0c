//! Storage pools.
//!
//! Pool management (create, import, vdevs) is out of reach of this crate; pools are only
//! listed and inspected. The pool half of the native surface is [`ZpoolEngine`], every
//! [`ZfsEngine`](../zfs/trait.ZfsEngine.html) implements it as well.
use crate::zfs::{Dataset, DatasetKind, DatasetName, Error, LibZfs, Result, ZfsEngine};
use std::{collections::HashMap, fmt, vec};

pub mod open3;
pub mod properties;
pub use properties::{Health, PoolProperty};

/// Generic interface to inspect zpools. Using trait here, so it can be mocked in tests.
pub trait ZpoolEngine {
    /// Names of every imported pool.
    #[cfg_attr(tarpaulin, skip)]
    fn list_pools(&self) -> Result<Vec<String>> { Err(Error::Unimplemented) }

    /// Check if pool with given name exists. This will return error only if the native call
    /// fails.
    #[cfg_attr(tarpaulin, skip)]
    fn pool_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_pools()?.iter().any(|pool| pool == name))
    }

    /// Values of the requested pool properties, unmodified. Empty `keys` means every property
    /// the pool reports.
    #[cfg_attr(tarpaulin, skip)]
    fn read_pool_properties(
        &self,
        _name: &str,
        _keys: &[PoolProperty],
    ) -> Result<HashMap<PoolProperty, String>> {
        Err(Error::Unimplemented)
    }
}

/// Handle to an imported pool. Holds nothing but the name, every read is a live query.
pub struct Pool<'s, E: ZfsEngine> {
    session: &'s LibZfs<E>,
    name:    String,
}

impl<'s, E: ZfsEngine> Pool<'s, E> {
    pub(crate) fn new(session: &'s LibZfs<E>, name: String) -> Self { Pool { session, name } }

    pub fn name(&self) -> &str { &self.name }

    pub fn property(&self, key: PoolProperty) -> Result<Option<String>> {
        Ok(self.properties(&[key])?.remove(&key))
    }

    pub fn properties(&self, keys: &[PoolProperty]) -> Result<HashMap<PoolProperty, String>> {
        self.session.ensure_open()?;
        self.session.engine().read_pool_properties(&self.name, keys)
    }

    pub fn health(&self) -> Result<Health> {
        match self.property(PoolProperty::Health)? {
            Some(health) => health.parse(),
            None => Err(Error::NativeCallFailed(format!("{}: health not reported", self.name))),
        }
    }

    /// Total size in bytes.
    pub fn size(&self) -> Result<u64> { self.bytes(PoolProperty::Size) }

    /// Bytes in use.
    pub fn allocated(&self) -> Result<u64> { self.bytes(PoolProperty::Allocated) }

    /// Bytes available.
    pub fn free(&self) -> Result<u64> { self.bytes(PoolProperty::Free) }

    /// Top-level filesystem named after the pool.
    pub fn root_filesystem(&self) -> Result<Dataset<'s, E>> {
        let name = DatasetName::new(self.name.as_str())?;
        self.session.open_name(name, Some(DatasetKind::Filesystem))
    }

    fn bytes(&self, key: PoolProperty) -> Result<u64> {
        let value = self.property(key)?.unwrap_or_default();
        value
            .parse()
            .map_err(|_| Error::NativeCallFailed(format!("{}: {}={}", self.name, key, value)))
    }
}

impl<'s, E: ZfsEngine> fmt::Debug for Pool<'s, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool").field("name", &self.name).finish()
    }
}

/// Imported pools, as listed when the iterator was created.
pub struct Pools<'s, E: ZfsEngine> {
    session: &'s LibZfs<E>,
    names:   vec::IntoIter<String>,
}

impl<'s, E: ZfsEngine> Pools<'s, E> {
    pub(crate) fn new(session: &'s LibZfs<E>, names: Vec<String>) -> Self {
        Pools { session, names: names.into_iter() }
    }
}

impl<'s, E: ZfsEngine> Iterator for Pools<'s, E> {
    type Item = Pool<'s, E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.names.next().map(|name| Pool::new(self.session, name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.names.size_hint() }
}

impl<'s, E: ZfsEngine> ExactSizeIterator for Pools<'s, E> {}

impl<'s, E: ZfsEngine> fmt::Debug for Pools<'s, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pools").field("remaining", &self.names.len()).finish()
    }
}
