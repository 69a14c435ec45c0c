//! Pull-style iteration over datasets.
//!
//! [`Listing`] is one native listing turned into handles. [`Descendants`] walks a tree and only
//! asks the native layer for a node's contents once the caller has pulled past that node.
use crate::zfs::{Dataset, DatasetKind, DatasetName, Error, LibZfs, Result, ZfsEngine};
use std::{fmt, vec};

/// Datasets from a single native listing.
pub struct Listing<'s, E: ZfsEngine> {
    session: &'s LibZfs<E>,
    entries: vec::IntoIter<(DatasetKind, DatasetName)>,
}

/// Children of a dataset: filesystems and volumes, then snapshots.
pub type Children<'s, E> = Listing<'s, E>;
/// Snapshots of a dataset.
pub type Snapshots<'s, E> = Listing<'s, E>;
/// Top-level filesystems of every pool.
pub type Roots<'s, E> = Listing<'s, E>;

impl<'s, E: ZfsEngine> Listing<'s, E> {
    pub(crate) fn new(session: &'s LibZfs<E>, entries: Vec<(DatasetKind, DatasetName)>) -> Self {
        Listing { session, entries: entries.into_iter() }
    }
}

impl<'s, E: ZfsEngine> Iterator for Listing<'s, E> {
    type Item = Dataset<'s, E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(kind, name)| Dataset::new(self.session, name, kind))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.entries.size_hint() }
}

impl<'s, E: ZfsEngine> ExactSizeIterator for Listing<'s, E> {}

impl<'s, E: ZfsEngine> fmt::Debug for Listing<'s, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listing").field("remaining", &self.entries.len()).finish()
    }
}

/// Depth-first, pre-order walk below a dataset. The starting dataset itself is not yielded.
///
/// Datasets that disappear while the walk is in progress are skipped. Any other failure is
/// yielded once and ends the walk.
pub struct Descendants<'s, E: ZfsEngine> {
    session:  &'s LibZfs<E>,
    stack:    Vec<(DatasetKind, DatasetName)>,
    /// Last yielded node. Its contents are listed on the next pull.
    pending:  Option<(DatasetKind, DatasetName)>,
    finished: bool,
}

impl<'s, E: ZfsEngine> Descendants<'s, E> {
    pub(crate) fn new(session: &'s LibZfs<E>, root: DatasetName, kind: DatasetKind) -> Self {
        Descendants { session, stack: Vec::new(), pending: Some((kind, root)), finished: false }
    }

    fn expand(
        &self,
        kind: DatasetKind,
        name: &DatasetName,
    ) -> Result<Vec<(DatasetKind, DatasetName)>> {
        if kind == DatasetKind::Snapshot {
            return Ok(Vec::new());
        }
        let engine = self.session.engine();
        let mut entries = engine.list_children(name)?;
        entries.extend(engine.list_snapshots(name)?.into_iter().map(|s| (DatasetKind::Snapshot, s)));
        Ok(entries)
    }
}

impl<'s, E: ZfsEngine> Iterator for Descendants<'s, E> {
    type Item = Result<Dataset<'s, E>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Err(e) = self.session.ensure_open() {
            self.finished = true;
            return Some(Err(e));
        }
        if let Some((kind, name)) = self.pending.take() {
            match self.expand(kind, &name) {
                Ok(entries) => self.stack.extend(entries.into_iter().rev()),
                Err(Error::NotFound(_)) => {
                    debug!(self.session.logger(), "dataset vanished during walk"; "name" => name.as_str());
                },
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                },
            }
        }
        match self.stack.pop() {
            Some((kind, name)) => {
                self.pending = Some((kind, name.clone()));
                Some(Ok(Dataset::new(self.session, name, kind)))
            },
            None => {
                self.finished = true;
                None
            },
        }
    }
}

impl<'s, E: ZfsEngine> fmt::Debug for Descendants<'s, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descendants")
            .field("pending", &self.pending)
            .field("queued", &self.stack.len())
            .field("finished", &self.finished)
            .finish()
    }
}
