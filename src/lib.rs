#![recursion_limit = "256"]
#![deny(nonstandard_style, future_incompatible, clippy::all, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::multiple_inherent_impl, clippy::missing_docs_in_private_items)]

//! Session-oriented client for ZFS administration.
//!
//! The crate does not implement ZFS. Every call is forwarded to the native administration layer
//! through a [`ZfsEngine`](zfs/trait.ZfsEngine.html). What lives here is the part every ZFS client
//! needs on top of that layer: validated dataset names, dataset and pool handles with a clear
//! lifecycle, strongly typed property vocabularies and a builder for delegated permissions.
//!
//! # Overview
//! ## Session
//! [`LibZfs`](zfs/struct.LibZfs.html) owns an engine. It resolves names into
//! [`Dataset`](zfs/struct.Dataset.html) handles, lists pools and top-level filesystems and maps
//! mount points back to datasets. Disposing the session (or dropping it) makes every handle
//! derived from it fail with `SessionClosed`.
//!
//! ```rust,no_run
//! use zfs_session::zfs::{AclBuilder, DatasetKind, LibZfs, Permission};
//!
//! let zfs = LibZfs::new();
//! let fs = zfs.create("tank/scratch", DatasetKind::Filesystem).unwrap();
//! fs.set_user_property("my:test", "42").unwrap();
//! let snapshot = fs.create_snapshot("before").unwrap();
//! assert_eq!("tank/scratch@before", snapshot.name().as_str());
//!
//! let mut acl = AclBuilder::new();
//! acl.everyone().with(Permission::Create);
//! fs.allow(&acl.build()).unwrap();
//!
//! fs.destroy(true).unwrap();
//! ```
//!
//! ## Engines
//! `ZfsOpen3` drives `zfs(8)` and `zpool(8)` and parses their scripted output. With the `lzc`
//! feature `ZfsLzc` talks to `libzfs_core` directly and `DelegatingZfsEngine` picks the best
//! backend for each call.
//!
//! # Project Structure
//! ### parsers
//! PEG parsers for `zfs(8)`/`zpool(8)` output backed by [Pest](https://pest.rs/).
//!
//! ### zfs
//! Sessions, dataset handles, names, properties and permissions.
//!
//! ### zpool
//! Pool handles and the pool property vocabulary.

#[macro_use] extern crate derive_builder;
#[macro_use] extern crate getset;

#[macro_use] extern crate lazy_static;

#[macro_use] extern crate quick_error;

#[macro_use] pub extern crate slog;

// library modules
pub mod parsers;
pub mod zfs;
pub mod zpool;

mod log;
pub use crate::log::GlobalLogger;

const VERSION: &str = env!("CARGO_PKG_VERSION");
