use strum_macros::{AsRefStr, Display, EnumString};

/// What a ZFS object is. Fixed for the lifetime of a handle.
#[derive(AsRefStr, EnumString, Display, Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum DatasetKind {
    #[strum(serialize = "filesystem")]
    Filesystem,
    #[strum(serialize = "volume")]
    Volume,
    #[strum(serialize = "snapshot")]
    Snapshot,
    /// Only ever seen in listings. Bookmarks can't be opened.
    #[strum(serialize = "bookmark")]
    Bookmark,
    #[strum(serialize = "pool")]
    Pool,
}

impl DatasetKind {
    /// Filesystems and volumes. The only kinds `create` accepts.
    pub fn is_creatable(self) -> bool {
        match self {
            DatasetKind::Filesystem | DatasetKind::Volume => true,
            DatasetKind::Snapshot | DatasetKind::Bookmark | DatasetKind::Pool => false,
        }
    }
}

impl Default for DatasetKind {
    fn default() -> Self { DatasetKind::Filesystem }
}
