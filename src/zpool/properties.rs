use crate::zfs::{Error, Result};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Pool properties as named by `zpool get`. Disjoint from the dataset vocabulary.
#[derive(AsRefStr, EnumString, Display, EnumIter, Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum PoolProperty {
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "size")]
    Size,
    #[strum(serialize = "capacity")]
    Capacity,
    #[strum(serialize = "altroot")]
    AltRoot,
    #[strum(serialize = "health")]
    Health,
    #[strum(serialize = "guid")]
    Guid,
    #[strum(serialize = "version")]
    Version,
    #[strum(serialize = "bootfs")]
    BootFs,
    #[strum(serialize = "delegation")]
    Delegation,
    #[strum(serialize = "autoreplace")]
    AutoReplace,
    #[strum(serialize = "cachefile")]
    CacheFile,
    #[strum(serialize = "failmode")]
    FailMode,
    #[strum(serialize = "listsnapshots")]
    ListSnapshots,
    #[strum(serialize = "autoexpand")]
    AutoExpand,
    #[strum(serialize = "dedupditto")]
    DedupDitto,
    #[strum(serialize = "dedupratio")]
    DedupRatio,
    #[strum(serialize = "free")]
    Free,
    #[strum(serialize = "allocated")]
    Allocated,
    #[strum(serialize = "readonly")]
    ReadOnly,
    #[strum(serialize = "comment")]
    Comment,
    #[strum(serialize = "expandsize")]
    ExpandSize,
    #[strum(serialize = "freeing")]
    Freeing,
    #[strum(serialize = "fragmentation")]
    Fragmentation,
    #[strum(serialize = "leaked")]
    Leaked,
    #[strum(serialize = "ashift")]
    Ashift,
}

/// Represent state of zpool or vdev. Read
/// [more](https://docs.oracle.com/cd/E19253-01/819-5461/gamno/index.html).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Health {
    /// Healthy and operational
    Online,
    /// Unhealthy, but operational.
    Degraded,
    /// Not operational
    Faulted,
    /// Taken offline by admin
    Offline,
    /// Can't open device.
    Unavailable,
    /// Physically removed while the system was running.
    Removed,
}

impl FromStr for Health {
    type Err = Error;

    fn from_str(s: &str) -> Result<Health> {
        match s {
            "ONLINE" => Ok(Health::Online),
            "DEGRADED" => Ok(Health::Degraded),
            "FAULTED" => Ok(Health::Faulted),
            "OFFLINE" => Ok(Health::Offline),
            "UNAVAIL" => Ok(Health::Unavailable),
            "REMOVED" => Ok(Health::Removed),
            other => Err(Error::NativeCallFailed(format!("unknown pool health: {}", other))),
        }
    }
}
