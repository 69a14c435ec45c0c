//! `libzfs_core` backed engine. Covers existence checks and snapshots, everything else is
//! `Unimplemented`; use [`DelegatingZfsEngine`](../struct.DelegatingZfsEngine.html) for the full
//! surface.
use crate::{zfs::{DatasetName, Error, Result, ZfsEngine},
            zpool::ZpoolEngine,
            GlobalLogger};
use cstr_argument::CStrArgument;
use libnv::nvpair::NvList;
use slog::Logger;
use std::{collections::HashMap, ffi::c_void, ptr::null_mut};
use zfs_core_sys as sys;

#[link(name = "nvpair")]
extern "C" {
    fn nvlist_free(nvl: *mut c_void);
}

/// Per-item failures a batch call hands back. The caller owns the list once the call returns.
struct ErrorList(*mut c_void);

impl ErrorList {
    fn new() -> Self { ErrorList(null_mut()) }

    fn as_out_ptr<T>(&mut self) -> *mut *mut T { (&mut self.0 as *mut *mut c_void).cast() }

    fn is_empty(&self) -> bool { self.0.is_null() }
}

impl Drop for ErrorList {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { nvlist_free(self.0) };
        }
    }
}

#[derive(Debug)]
pub struct ZfsLzc {
    logger: Logger,
}

impl ZfsLzc {
    /// Initialize libzfs_core backed ZfsEngine.
    pub fn new() -> Result<Self> {
        let errno = unsafe { sys::libzfs_core_init() };

        if errno != 0 {
            let io_error = std::io::Error::from_raw_os_error(errno);
            return Err(Error::LzcInitializationFailed(io_error));
        }
        let logger = GlobalLogger::get().new(o!("zfs_module" => "zfs", "zfs_impl" => "lzc"));
        Ok(ZfsLzc { logger })
    }

    pub fn logger(&self) -> &Logger { &self.logger }

    fn name_list(names: &[DatasetName]) -> Result<NvList> {
        let mut list = NvList::default();
        for name in names {
            list.insert(name.as_str(), true)
                .map_err(|e| Error::NativeCallFailed(format!("{:?}", e)))?;
        }
        Ok(list)
    }
}

impl ZpoolEngine for ZfsLzc {}

impl ZfsEngine for ZfsLzc {
    fn exists(&self, name: &DatasetName) -> Result<bool> {
        let n = name.as_str().into_cstr();
        let ret = unsafe { sys::lzc_exists(n.as_ref().as_ptr()) };
        debug!(self.logger, "lzc_exists"; "name" => name.as_str(), "ret" => ret);

        Ok(ret == 1)
    }

    fn snapshot(
        &self,
        name: &DatasetName,
        user_properties: Option<&HashMap<String, String>>,
    ) -> Result<()> {
        let snapshots = Self::name_list(std::slice::from_ref(name))?;
        let mut props = NvList::default();
        if let Some(user_properties) = user_properties {
            for (key, value) in user_properties {
                props
                    .insert_string(key, value)
                    .map_err(|e| Error::NativeCallFailed(format!("{:?}", e)))?;
            }
        }
        let mut errors = ErrorList::new();
        let errno = unsafe {
            sys::lzc_snapshot(snapshots.as_ptr(), props.as_ptr(), errors.as_out_ptr())
        };
        debug!(self.logger, "lzc_snapshot"; "name" => name.as_str(), "errno" => errno,
               "with_error_list" => !errors.is_empty());

        match errno {
            0 => Ok(()),
            errno => Err(Error::from_errno(errno, name.as_str())),
        }
    }

    fn destroy_snapshots(&self, snapshots: &[DatasetName]) -> Result<()> {
        let list = Self::name_list(snapshots)?;
        let mut errors = ErrorList::new();
        // Not deferred: a held snapshot fails the whole batch.
        let errno = unsafe { sys::lzc_destroy_snaps(list.as_ptr(), 0, errors.as_out_ptr()) };
        debug!(self.logger, "lzc_destroy_snaps"; "count" => snapshots.len(), "errno" => errno,
               "with_error_list" => !errors.is_empty());

        match errno {
            0 => Ok(()),
            errno => {
                let first = snapshots.first().map(DatasetName::as_str).unwrap_or_default();
                Err(Error::from_errno(errno, first))
            },
        }
    }

    fn close(&self) {
        debug!(self.logger, "libzfs_core_fini");
        unsafe { sys::libzfs_core_fini() };
    }
}
