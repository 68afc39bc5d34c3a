//! The index metadata cache.
//!
//! Holds the current [`Snapshot`] behind an atomically swappable reference.
//! Reads load the reference without locking and never fail. A refresh fetches
//! the raw metadata, builds a complete new snapshot off to the side, then
//! publishes it with a single store, so readers observe either the previous
//! snapshot or the new one in full.
//!
//! # Concurrent refreshes
//!
//! Every call to [`IndexCache::refresh`] is an independent round trip. The
//! snapshot installed is that of whichever refresh *completes* last, not of the
//! one called last. Callers that need call-order semantics must serialize
//! their refreshes.
//!
//! # Close
//!
//! [`IndexCache::close`] starts a new epoch. A refresh whose fetch began
//! before the close discards its result instead of installing it, so only a
//! refresh called after the close can repopulate the cache.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use arc_swap::ArcSwap;
use log::{debug, warn};
use sindex_common::Result;

use crate::{
    descriptor::IndexDescriptor,
    key::{IndexKey, IndexedField},
    parser::{self, ParseDiagnostic, ParseOutcome},
    snapshot::Snapshot,
    source::MetadataSource,
};

/// Summary of a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    /// Number of indexes in the parsed snapshot.
    pub index_count: usize,
    /// `false` when a [`close`](IndexCache::close) during the fetch caused the
    /// snapshot to be discarded.
    pub installed: bool,
    /// Definitions skipped while parsing.
    pub diagnostics: Vec<ParseDiagnostic>,
}

pub struct IndexCache {
    source: Arc<dyn MetadataSource>,
    current: ArcSwap<Snapshot>,
    epoch: AtomicU64,
}

impl IndexCache {
    /// Creates an empty cache fed by `source`.
    pub fn new(source: impl MetadataSource) -> IndexCache {
        IndexCache::with_source(Arc::new(source))
    }

    pub fn with_source(source: Arc<dyn MetadataSource>) -> IndexCache {
        IndexCache {
            source,
            current: ArcSwap::new(Snapshot::empty()),
            epoch: AtomicU64::new(0),
        }
    }

    /// Looks up a named index in the current snapshot.
    pub fn get_index(&self, key: &IndexKey) -> Option<IndexDescriptor> {
        self.current.load().get(key).cloned()
    }

    /// Whether any index covers `field` in the current snapshot.
    pub fn has_index_for(&self, field: &IndexedField) -> bool {
        self.current.load().has_index_for(field)
    }

    /// Pins the current snapshot. Lookups against the returned value are
    /// mutually consistent regardless of concurrent refreshes.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Fetches the index metadata once and installs the parsed snapshot.
    ///
    /// On a fetch failure the error is returned and the installed snapshot is
    /// left as it was. Malformed definitions do not fail the refresh; they
    /// are logged and listed in the report.
    pub async fn refresh(&self) -> Result<RefreshReport> {
        let epoch = self.epoch.load(Ordering::SeqCst);
        let response = self.source.fetch_index_metadata().await?;
        let ParseOutcome {
            snapshot,
            diagnostics,
        } = parser::parse(&response);

        for diagnostic in &diagnostics {
            warn!(
                "skipping index definition #{} ({}): {:?}",
                diagnostic.entry, diagnostic.issue, diagnostic.raw
            );
        }

        let index_count = snapshot.len();
        let installed = self.install(epoch, Arc::new(snapshot));
        if installed {
            debug!("installed index snapshot with {index_count} indexes");
        } else {
            debug!("discarded index snapshot fetched before close");
        }

        Ok(RefreshReport {
            index_count,
            installed,
            diagnostics,
        })
    }

    /// Resets the cache to the empty snapshot. The metadata source is kept, so
    /// a later [`refresh`](Self::refresh) repopulates the cache; refreshes
    /// already in flight do not.
    pub fn close(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        // A distinct instance, so a racing install's compare-and-swap against
        // the shared empty snapshot fails and rechecks the epoch.
        self.current.store(Arc::new(Snapshot::default()));
        debug!("index cache closed");
    }

    /// Publishes `snapshot` unless the cache was closed since `epoch`.
    fn install(&self, epoch: u64, snapshot: Arc<Snapshot>) -> bool {
        let mut installed = false;
        self.current.rcu(|current| {
            installed = self.epoch.load(Ordering::SeqCst) == epoch;
            if installed {
                snapshot.clone()
            } else {
                current.clone()
            }
        });
        installed
    }
}
