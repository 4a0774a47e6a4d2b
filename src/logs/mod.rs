//! Log ingestion and retrieval
//!
//! Gateway plugins (e.g. Kong's http-log) report request/response pairs which
//! are normalized into [`LogEntry`] records and kept in a single collection,
//! newest first. The collection is always read and written as a whole.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use logsink::logs::{FileLogStore, LogService};
//!
//! let service = LogService::new(Arc::new(FileLogStore::open("data/logs.json")));
//! let created = service.ingest(&payload).await?;
//! let page = service.retrieve(Some("20")).await?;
//! ```

pub mod error;
pub mod models;
pub mod normalize;
pub mod service;
pub mod store;

pub use error::{LogError, Result, StoreError};
pub use models::{
    EntryId, EntryKind, HeaderValue, HeadersMap, LogCollection, LogEntry, RequestRecord,
    ResponseRecord,
};
pub use service::{DEFAULT_LIMIT, Ingested, LogPage, LogService};
pub use store::{FileLogStore, LogStore, MemoryLogStore};
