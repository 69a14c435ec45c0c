//! Explicit client session.
//!
//! A [`LibZfs`] owns one engine for its whole life. Handles borrow the session, so they can't
//! outlive it, and every call on a handle checks that the session is still open.
use crate::{zfs::{iter::{Listing, Roots},
                  CreateDatasetRequest, Dataset, DatasetKind, DatasetName, Error, Result,
                  ZfsEngine, ZfsOpen3},
            zpool::{Pool, Pools},
            GlobalLogger};
use slog::Logger;
use std::{cell::Cell, fmt, path::Path};

pub struct LibZfs<E: ZfsEngine = ZfsOpen3> {
    engine: E,
    logger: Logger,
    closed: Cell<bool>,
}

impl LibZfs<ZfsOpen3> {
    /// Session backed by `zfs(8)`/`zpool(8)`.
    pub fn new() -> Self { LibZfs::with_engine(ZfsOpen3::new()) }
}

impl Default for LibZfs<ZfsOpen3> {
    fn default() -> Self { LibZfs::new() }
}

#[cfg(feature = "lzc")]
impl LibZfs<crate::zfs::DelegatingZfsEngine> {
    /// Session that prefers `libzfs_core` and falls back to `zfs(8)`.
    pub fn delegating() -> Result<Self> {
        Ok(LibZfs::with_engine(crate::zfs::DelegatingZfsEngine::new()?))
    }
}

impl<E: ZfsEngine> LibZfs<E> {
    pub fn with_engine(engine: E) -> Self {
        let logger = GlobalLogger::get().new(o!("zfs_module" => "session"));
        debug!(logger, "session opened");
        LibZfs { engine, logger, closed: Cell::new(false) }
    }

    pub fn engine(&self) -> &E { &self.engine }

    pub fn logger(&self) -> &Logger { &self.logger }

    pub fn is_closed(&self) -> bool { self.closed.get() }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.closed.get() {
            Err(Error::SessionClosed)
        } else {
            Ok(())
        }
    }

    /// `false` for names that can't exist, invalid ones included.
    pub fn exists<N: AsRef<str>>(&self, name: N) -> Result<bool> {
        self.ensure_open()?;
        match DatasetName::new(name.as_ref()) {
            Ok(name) => self.engine.exists(&name),
            Err(_) => Ok(false),
        }
    }

    /// Same as [`exists`](#method.exists), but the dataset also has to be of `kind`.
    pub fn exists_as<N: AsRef<str>>(&self, name: N, kind: DatasetKind) -> Result<bool> {
        self.ensure_open()?;
        let name = match DatasetName::new(name.as_ref()) {
            Ok(name) => name,
            Err(_) => return Ok(false),
        };
        match self.engine.kind(&name) {
            Ok(found) => Ok(found == kind),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Handle to an existing filesystem, volume or snapshot.
    pub fn open<N: AsRef<str>>(&self, name: N) -> Result<Dataset<'_, E>> {
        let name = DatasetName::new(name.as_ref())?;
        self.open_name(name, None)
    }

    /// Like [`open`](#method.open), `TypeMismatch` unless the dataset is of `kind`.
    pub fn open_as<N: AsRef<str>>(&self, name: N, kind: DatasetKind) -> Result<Dataset<'_, E>> {
        let name = DatasetName::new(name.as_ref())?;
        self.open_name(name, Some(kind))
    }

    pub(crate) fn open_name(
        &self,
        name: DatasetName,
        expected: Option<DatasetKind>,
    ) -> Result<Dataset<'_, E>> {
        self.ensure_open()?;
        let found = self.engine.kind(&name)?;
        match expected {
            Some(expected) if expected != found => Err(Error::TypeMismatch(expected, found)),
            _ => Ok(Dataset::new(self, name, found)),
        }
    }

    /// Create a filesystem or volume with default properties. Volumes need a size, use
    /// [`create_with`](#method.create_with) for them.
    pub fn create<N: AsRef<str>>(&self, name: N, kind: DatasetKind) -> Result<Dataset<'_, E>> {
        let name = DatasetName::new(name.as_ref())?;
        self.create_with(CreateDatasetRequest::new(name, kind))
    }

    pub fn create_with(&self, request: CreateDatasetRequest) -> Result<Dataset<'_, E>> {
        self.ensure_open()?;
        request.validate()?;
        if self.engine.exists(request.name())? {
            return Err(Error::AlreadyExists(request.name().to_string()));
        }
        self.engine.create(&request)?;
        info!(self.logger, "created dataset"; "name" => request.name().as_str(), "kind" => %request.kind());
        Ok(Dataset::new(self, request.name().clone(), *request.kind()))
    }

    /// Top-level filesystem of every pool.
    pub fn roots(&self) -> Result<Roots<'_, E>> {
        self.ensure_open()?;
        let roots = self.engine.list_roots()?;
        Ok(Listing::new(self, roots.into_iter().map(|name| (DatasetKind::Filesystem, name)).collect()))
    }

    pub fn pools(&self) -> Result<Pools<'_, E>> {
        self.ensure_open()?;
        Ok(Pools::new(self, self.engine.list_pools()?))
    }

    pub fn pool<N: AsRef<str>>(&self, name: N) -> Result<Pool<'_, E>> {
        self.ensure_open()?;
        let name = name.as_ref();
        if self.engine.pool_exists(name)? {
            Ok(Pool::new(self, name.to_string()))
        } else {
            Err(Error::NotFound(name.to_string()))
        }
    }

    /// Filesystem currently mounted at exactly `path`, if any.
    pub fn filesystem_by_mount_point<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Option<Dataset<'_, E>>> {
        self.ensure_open()?;
        let path = path.as_ref();
        let found = self
            .engine
            .list_mounts()?
            .into_iter()
            .find(|(_, mount_point)| mount_point == path)
            .map(|(name, _)| Dataset::new(self, name, DatasetKind::Filesystem));
        Ok(found)
    }

    /// Release the native session. Safe to call more than once.
    pub fn dispose(&self) {
        if !self.closed.replace(true) {
            self.engine.close();
            debug!(self.logger, "session disposed");
        }
    }
}

impl<E: ZfsEngine> Drop for LibZfs<E> {
    fn drop(&mut self) { self.dispose() }
}

impl<E: ZfsEngine> fmt::Debug for LibZfs<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibZfs").field("closed", &self.closed.get()).finish()
    }
}
