//! Parsers for scripted `zfs(8)`/`zpool(8)` output.
//!
//! Everything is run with `-H` (no headers, tab separated) and most commands with `-p`
//! (parseable numbers), so one grammar covers listings, property dumps and stderr.

pub mod zfs;

pub use self::zfs::{Rule, ZfsParser};
