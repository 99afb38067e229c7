//! Memoizing key → string lookups backed by a single-row query.
//!
//! A [`StringMapper`] turns a query such as
//! `SELECT description FROM status_codes WHERE code = $1` into a cached
//! function from `code` to `description`. It is meant for small,
//! low-cardinality lookup tables: the cache is never evicted.
//!
//! # Concurrency
//!
//! The cache sits behind one mutex that is held only while looking a key up
//! and while storing a result, never across the database round trip. Two
//! callers that miss on the same key at the same time will both run the
//! query and both store the result; the later store wins. With a
//! deterministic query this is harmless duplicate work. There is no
//! single-flight deduplication.

use anyhow::Result;
use async_lock::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use super::traits::{DatabaseConnection, ScalarQuery, Value};

/// Caches the results of a one-placeholder, one-column text query per key.
///
/// # Example
///
/// ```ignore
/// let conn: Arc<dyn DatabaseConnection> = Arc::from(open("postgres://localhost/erp").await?);
/// let countries = StringMapper::new(conn, "SELECT name FROM countries WHERE iso = $1");
///
/// assert_eq!(countries.map("NZ").await?, "New Zealand");
/// ```
pub struct StringMapper<K, C: ?Sized = dyn DatabaseConnection> {
    conn: Arc<C>,
    query: String,
    cache: Mutex<HashMap<K, String>>,
}

impl<K, C: ?Sized> std::fmt::Debug for StringMapper<K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringMapper")
            .field("query", &self.query)
            .field("conn", &"<connection>")
            .finish()
    }
}

impl<K, C> StringMapper<K, C>
where
    K: Into<Value> + Clone + Eq + Hash + Send + Sync,
    C: ScalarQuery + ?Sized,
{
    /// Create a mapper with an empty cache.
    ///
    /// The query is not checked here; a malformed query fails on the first
    /// `map` call instead.
    pub fn new(conn: Arc<C>, query: impl Into<String>) -> Self {
        Self {
            conn,
            query: query.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The query run on a cache miss.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Resolve `key`, querying the database only if it is not cached yet.
    ///
    /// On failure (no row, NULL, or any driver error) the error is returned
    /// unchanged and nothing is cached, so the next call for the same key
    /// runs the query again.
    pub async fn map(&self, key: K) -> Result<String> {
        let cached = self.cache.lock().await.get(&key).cloned();
        if let Some(value) = cached {
            tracing::trace!("string mapper hit");
            return Ok(value);
        }

        let param: Value = key.clone().into();
        tracing::debug!("string mapper miss for {}", param);

        let value = match self.conn.fetch_scalar_string(&self.query, &[param]).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("string mapper lookup failed: {:#}", e);
                return Err(e);
            }
        };

        self.cache.lock().await.insert(key, value.clone());
        Ok(value)
    }

    /// Resolve `key`, panicking if the lookup fails.
    ///
    /// For call sites that have already established the key must exist.
    /// Use [`StringMapper::map`] anywhere a failure is recoverable.
    pub async fn must_map(&self, key: K) -> String {
        match self.map(key).await {
            Ok(value) => value,
            Err(e) => panic!("StringMapper::must_map: {:#}", e),
        }
    }

    /// The cached value for `key`, without touching the database.
    pub async fn cached(&self, key: &K) -> Option<String> {
        self.cache.lock().await.get(key).cloned()
    }

    /// Number of cached keys.
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::error::DbxError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Answers `name-<key>` for integer keys and counts every call.
    #[derive(Default)]
    struct Lookup {
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    #[async_trait]
    impl ScalarQuery for Lookup {
        async fn fetch_scalar_string(&self, _sql: &str, params: &[Value]) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(DbxError::RowNotFound.into());
            }
            let key = params.first().and_then(Value::as_i64).unwrap_or(-1);
            Ok(format!("name-{key}"))
        }
    }

    fn mapper() -> (Arc<Lookup>, StringMapper<i64, Lookup>) {
        let lookup = Arc::new(Lookup::default());
        let mapper = StringMapper::new(lookup.clone(), "SELECT name FROM t WHERE id = ?");
        (lookup, mapper)
    }

    #[test]
    fn test_first_lookup_queries_once() {
        smol::block_on(async {
            let (lookup, mapper) = mapper();

            assert_eq!(mapper.map(7).await.unwrap(), "name-7");
            assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
            assert_eq!(mapper.cached(&7).await.as_deref(), Some("name-7"));
        });
    }

    #[test]
    fn test_cached_lookup_skips_query() {
        smol::block_on(async {
            let (lookup, mapper) = mapper();

            mapper.map(7).await.unwrap();
            mapper.map(7).await.unwrap();
            assert_eq!(mapper.map(7).await.unwrap(), "name-7");
            assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn test_distinct_keys_do_not_collide() {
        smol::block_on(async {
            let (lookup, mapper) = mapper();

            assert_eq!(mapper.map(1).await.unwrap(), "name-1");
            assert_eq!(mapper.map(2).await.unwrap(), "name-2");
            assert_eq!(mapper.len().await, 2);
            assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
        });
    }

    #[test]
    fn test_failure_is_not_cached() {
        smol::block_on(async {
            let (lookup, mapper) = mapper();
            lookup.failing.store(true, Ordering::SeqCst);

            let err = mapper.map(3).await.unwrap_err();
            assert_eq!(err.downcast_ref::<DbxError>(), Some(&DbxError::RowNotFound));
            assert!(mapper.is_empty().await);

            lookup.failing.store(false, Ordering::SeqCst);
            assert_eq!(mapper.map(3).await.unwrap(), "name-3");
            assert_eq!(mapper.cached(&3).await.as_deref(), Some("name-3"));
            assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
        });
    }

    #[test]
    fn test_must_map_matches_map() {
        smol::block_on(async {
            let (_lookup, mapper) = mapper();
            assert_eq!(mapper.must_map(9).await, mapper.map(9).await.unwrap());
        });
    }

    #[test]
    #[should_panic(expected = "StringMapper::must_map")]
    fn test_must_map_panics_on_failure() {
        smol::block_on(async {
            let (lookup, mapper) = mapper();
            lookup.failing.store(true, Ordering::SeqCst);
            mapper.must_map(1).await;
        });
    }
}
