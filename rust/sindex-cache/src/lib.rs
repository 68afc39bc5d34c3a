//! In-memory cache of a remote cluster's secondary-index definitions.
//!
//! # Overview
//!
//! Query planners consult the cache on the request path to decide whether a
//! bin can be served by a secondary index. The cache keeps one immutable
//! [`Snapshot`] of all index definitions and refreshes it asynchronously from
//! the cluster without ever blocking readers.
//!
//! # Architecture
//!
//! - **Keys**: [`IndexKey`] names one index, [`IndexedField`] names a bin that
//!   any index may cover.
//! - **Descriptors**: [`IndexDescriptor`] is the immutable metadata of one index.
//! - **Snapshots**: [`Snapshot`] maps keys to descriptors together with the
//!   derived set of indexed fields.
//! - **Parser**: [`parser::parse`] turns the raw info response into a snapshot,
//!   skipping malformed definitions and reporting them as diagnostics.
//! - **Sources**: [`MetadataSource`] is the client-side boundary issuing the
//!   "list indexes" command.
//! - **Cache**: [`IndexCache`] owns the current snapshot and exposes the read
//!   and refresh operations.
//! - **Refresher**: [`Refresher`] drives periodic refreshes in the background.

pub mod cache;
pub mod config;
pub mod descriptor;
pub mod key;
pub mod parser;
pub mod refresher;
pub mod snapshot;
pub mod source;

pub use cache::{IndexCache, RefreshReport};
pub use config::RefreshConfig;
pub use descriptor::{CollectionType, IndexDescriptor, IndexState, IndexType};
pub use key::{IndexKey, IndexedField};
pub use parser::{ParseDiagnostic, ParseIssue, ParseOutcome};
pub use refresher::Refresher;
pub use snapshot::Snapshot;
pub use source::{MetadataSource, StaticSource, TimeoutSource};
