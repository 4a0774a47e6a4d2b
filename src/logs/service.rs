use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::{LogError, Result};
use super::models::LogEntry;
use super::normalize::normalize;
use super::store::LogStore;

pub const DEFAULT_LIMIT: u64 = 10;

pub const INVALID_LIMIT_MESSAGE: &str = "Limit must be a positive number";

/// Outcome of a successful ingestion
#[derive(Debug, Clone)]
pub struct Ingested {
    pub entry: LogEntry,
    /// Collection size after the new entry was prepended
    pub total: usize,
}

/// One page of the collection, newest first
#[derive(Debug, Clone)]
pub struct LogPage {
    pub entries: Vec<LogEntry>,
    pub total: usize,
    pub returned: usize,
    pub limit: u64,
}

/// Ingestion and retrieval over a [`LogStore`]
///
/// Ingestions are serialized by `write_lock`, held across the whole
/// load-prepend-save sequence. Retrievals read without it.
pub struct LogService {
    store: Arc<dyn LogStore>,
    write_lock: Mutex<()>,
    default_limit: u64,
}

impl LogService {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self::with_default_limit(store, DEFAULT_LIMIT)
    }

    pub fn with_default_limit(store: Arc<dyn LogStore>, default_limit: u64) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            default_limit: default_limit.max(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn LogStore> {
        &self.store
    }

    pub fn default_limit(&self) -> u64 {
        self.default_limit
    }

    /// Normalize `payload` and prepend it to the stored collection
    pub async fn ingest(&self, payload: &Value) -> Result<Ingested> {
        let entry = normalize(payload)?;

        let _guard = self.write_lock.lock().await;

        let mut entries = self.store.load().await;
        entries.insert(0, entry.clone());

        if let Err(e) = self.store.save(&entries).await {
            warn!(error = %e, id = %entry.id, "Log entry dropped, save failed");
            return Err(LogError::Persistence(e));
        }

        info!(
            id = %entry.id,
            method = %entry.request.method,
            url = %entry.request.url,
            status = entry.response.status_code,
            total = entries.len(),
            "Log entry ingested"
        );

        Ok(Ingested {
            entry,
            total: entries.len(),
        })
    }

    /// Return up to `limit` newest entries; the configured default applies when absent
    pub async fn retrieve(&self, limit: Option<&str>) -> Result<LogPage> {
        let limit = match limit {
            Some(raw) => parse_limit(raw)?,
            None => self.default_limit,
        };

        let mut entries = self.store.load().await;
        let total = entries.len();
        let take = usize::try_from(limit).unwrap_or(usize::MAX).min(total);
        entries.truncate(take);

        debug!(limit, total, returned = take, "Log page served");

        Ok(LogPage {
            returned: entries.len(),
            entries,
            total,
            limit,
        })
    }
}

/// Parse a limit using leading-integer semantics
///
/// Leading whitespace and an optional sign are accepted, then the leading run
/// of ASCII digits is read and anything after it is ignored (`"12abc"` is 12,
/// `"1.5"` is 1). Values beyond `u64::MAX` saturate. The result must be >= 1.
pub fn parse_limit(raw: &str) -> Result<u64> {
    let invalid = || LogError::Validation(INVALID_LIMIT_MESSAGE.to_string());

    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        &digits[..end]
    };
    if digits.is_empty() {
        return Err(invalid());
    }

    let value = digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    });

    if negative || value < 1 {
        return Err(invalid());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::store::MemoryLogStore;
    use serde_json::json;

    fn create_test_service() -> (LogService, Arc<MemoryLogStore>) {
        let store = Arc::new(MemoryLogStore::new());
        (LogService::new(store.clone()), store)
    }

    fn payload(url: &str) -> Value {
        json!({
            "request": {"url": url, "method": "POST"},
            "response": {"status_code": 201}
        })
    }

    #[test]
    fn test_parse_limit_accepts_leading_integers() {
        assert_eq!(parse_limit("5").unwrap(), 5);
        assert_eq!(parse_limit("  7").unwrap(), 7);
        assert_eq!(parse_limit("+3").unwrap(), 3);
        assert_eq!(parse_limit("12abc").unwrap(), 12);
        assert_eq!(parse_limit("1.9").unwrap(), 1);
        assert_eq!(parse_limit("99999999999999999999999").unwrap(), u64::MAX);
    }

    #[test]
    fn test_parse_limit_rejects_non_positive_and_garbage() {
        for raw in ["0", "-1", "-0", "abc", "", "  ", "+", "0x10", ".5"] {
            let err = parse_limit(raw).unwrap_err();
            assert!(
                matches!(err, LogError::Validation(ref msg) if msg == INVALID_LIMIT_MESSAGE),
                "limit {raw:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_ingest_then_retrieve_round_trip() {
        let (service, _store) = create_test_service();

        let ingested = service.ingest(&payload("/orders")).await.unwrap();
        assert_eq!(ingested.total, 1);

        let page = service.retrieve(Some("1")).await.unwrap();
        assert_eq!(page.entries, vec![ingested.entry]);
        assert_eq!(page.entries[0].request.body, "");
        assert!(page.entries[0].response.headers.is_empty());
    }

    #[tokio::test]
    async fn test_entries_are_newest_first() {
        let (service, _store) = create_test_service();
        for i in 1..=5 {
            service.ingest(&payload(&format!("/e{i}"))).await.unwrap();
        }

        let page = service.retrieve(Some("5")).await.unwrap();
        let urls: Vec<_> = page.entries.iter().map(|e| e.request.url.as_str()).collect();
        assert_eq!(urls, vec!["/e5", "/e4", "/e3", "/e2", "/e1"]);
    }

    #[tokio::test]
    async fn test_limit_is_clamped_to_total() {
        let (service, _store) = create_test_service();
        for i in 0..3 {
            service.ingest(&payload(&format!("/e{i}"))).await.unwrap();
        }

        let page = service.retrieve(Some("50")).await.unwrap();
        assert_eq!(page.returned, 3);
        assert_eq!(page.total, 3);
        assert_eq!(page.limit, 50);

        let page = service.retrieve(Some("2")).await.unwrap();
        assert_eq!(page.returned, 2);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn test_default_limit_applies_when_absent() {
        let (service, _store) = create_test_service();
        for i in 0..12 {
            service.ingest(&payload(&format!("/e{i}"))).await.unwrap();
        }

        let implicit = service.retrieve(None).await.unwrap();
        let explicit = service.retrieve(Some("10")).await.unwrap();
        assert_eq!(implicit.limit, DEFAULT_LIMIT);
        assert_eq!(implicit.returned, 10);
        assert_eq!(implicit.entries, explicit.entries);
    }

    #[tokio::test]
    async fn test_empty_store_reads_empty_page() {
        let (service, _store) = create_test_service();

        let page = service.retrieve(None).await.unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.returned, 0);
    }

    #[tokio::test]
    async fn test_rejected_payload_leaves_store_unchanged() {
        let (service, store) = create_test_service();
        service.ingest(&payload("/kept")).await.unwrap();

        let err = service.ingest(&json!({"message": "hello"})).await.unwrap_err();
        assert!(matches!(err, LogError::Validation(_)));
        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_is_persistence_error() {
        let (service, store) = create_test_service();
        service.ingest(&payload("/kept")).await.unwrap();

        store.set_fail_saves(true);
        let err = service.ingest(&payload("/lost")).await.unwrap_err();
        assert!(matches!(err, LogError::Persistence(_)));

        store.set_fail_saves(false);
        let page = service.retrieve(None).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.entries[0].request.url, "/kept");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_ingestions_lose_nothing() {
        let (service, _store) = create_test_service();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.ingest(&payload(&format!("/c{i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let page = service.retrieve(Some("100")).await.unwrap();
        assert_eq!(page.total, 50);
    }
}
