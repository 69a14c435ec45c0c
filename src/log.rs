use once_cell::sync::OnceCell;
use slog::{Drain, Logger as SlogLogger};
use slog_stdlog::StdLog;
use std::{borrow::Borrow, ops::Deref};

static GLOBAL_LOGGER: OnceCell<GlobalLogger> = OnceCell::new();

/// Root logger of this crate. Sessions and engines hang their own `zfs_module` loggers off it, so
/// every record they emit carries `zfs_session_version`.
#[derive(Debug, Clone)]
pub struct GlobalLogger {
    inner: SlogLogger,
}

impl Deref for GlobalLogger {
    type Target = SlogLogger;

    fn deref(&self) -> &Self::Target { self.inner.borrow() }
}

impl GlobalLogger {
    fn new(logger: SlogLogger) -> Self { GlobalLogger { inner: logger } }

    /// Logger handed to new sessions. Falls back to forwarding into the `log` facade when the
    /// application never installed one.
    pub fn get() -> &'static GlobalLogger {
        GLOBAL_LOGGER.get_or_init(|| {
            let root_logger = SlogLogger::root(StdLog.fuse(), o!());
            GlobalLogger::new(with_crate_version(&root_logger))
        })
    }

    /// Route this crate's records into the application's logger. Must happen before the first
    /// session is opened. Only the first call wins, later ones get their logger back as `Err`.
    pub fn setup(root_logger: &SlogLogger) -> Result<(), GlobalLogger> {
        GLOBAL_LOGGER.set(GlobalLogger::new(with_crate_version(root_logger)))
    }
}

fn with_crate_version(root_logger: &SlogLogger) -> SlogLogger {
    root_logger.new(o!("zfs_session_version" => crate::VERSION))
}
