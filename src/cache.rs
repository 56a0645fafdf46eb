use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::analyze::{analyze_source, AnalyzeOptions};
use crate::diagnostic::AnalyzeResult;
use crate::error::AnalyzeError;

/// Entries kept by `AnalysisCache::new`.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// In-memory memo of analysis results keyed by a hash of the program source
/// and the options it was analyzed with. Safe to share across threads.
///
/// Holds at most `capacity` entries; inserting past that evicts the least
/// recently used one. Entries are ordered oldest use first.
#[derive(Debug)]
pub struct AnalysisCache {
    capacity: usize,
    entries: Mutex<IndexMap<String, AnalyzeResult>>,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(IndexMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn compute_hash(source: &str, options: &AnalyzeOptions) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update((options.suggestion_threshold as u64).to_le_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// A hit marks the entry as most recently used.
    pub fn get(&self, source: &str, options: &AnalyzeOptions) -> Option<AnalyzeResult> {
        let key = Self::compute_hash(source, options);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let result = entries.shift_remove(&key)?;
        entries.insert(key, result.clone());
        Some(result)
    }

    pub fn set(&self, source: &str, options: &AnalyzeOptions, result: AnalyzeResult) {
        let key = Self::compute_hash(source, options);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.shift_remove(&key);
        entries.insert(key, result);
        while entries.len() > self.capacity {
            entries.shift_remove_index(0);
            debug!(capacity = self.capacity, "analysis cache evicted least recently used entry");
        }
    }

    /// Cached result for `source`, analyzing and storing it on a miss.
    /// Sources that fail to parse are not cached.
    pub fn get_or_analyze(
        &self,
        source: &str,
        options: &AnalyzeOptions,
    ) -> Result<AnalyzeResult, AnalyzeError> {
        if let Some(result) = self.get(source, options) {
            debug!("analysis cache hit");
            return Ok(result);
        }

        let result = analyze_source(source, options)?;
        self.set(source, options, result.clone());
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"{
        "state": { "counter": { "type": "number", "initial": 0 } },
        "view": { "kind": "text", "value": { "expr": "state", "name": "count" } }
    }"#;

    #[test]
    fn test_hash_depends_on_options() {
        let default = AnalyzeOptions::default();
        let strict = AnalyzeOptions {
            suggestion_threshold: 0,
        };
        assert_eq!(
            AnalysisCache::compute_hash(SOURCE, &default),
            AnalysisCache::compute_hash(SOURCE, &default)
        );
        assert_ne!(
            AnalysisCache::compute_hash(SOURCE, &default),
            AnalysisCache::compute_hash(SOURCE, &strict)
        );
    }

    #[test]
    fn test_get_or_analyze_memoizes() {
        let cache = AnalysisCache::new();
        let options = AnalyzeOptions::default();
        assert!(cache.get(SOURCE, &options).is_none());

        let first = cache.get_or_analyze(SOURCE, &options).unwrap();
        assert!(!first.is_ok());
        assert_eq!(cache.len(), 1);

        let second = cache.get_or_analyze(SOURCE, &options).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    fn source_reading(name: &str) -> String {
        format!(
            r#"{{ "view": {{ "kind": "text", "value": {{ "expr": "state", "name": "{}" }} }} }}"#,
            name
        )
    }

    #[test]
    fn test_entries_are_bounded() {
        let cache = AnalysisCache::with_capacity(4);
        let options = AnalyzeOptions::default();
        for i in 0..50 {
            cache
                .get_or_analyze(&source_reading(&format!("field{}", i)), &options)
                .unwrap();
        }

        assert_eq!(cache.capacity(), 4);
        assert_eq!(cache.len(), 4);
        assert!(cache.get(&source_reading("field0"), &options).is_none());
        assert!(cache.get(&source_reading("field49"), &options).is_some());
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let cache = AnalysisCache::with_capacity(2);
        let options = AnalyzeOptions::default();
        let (a, b, c) = (source_reading("a"), source_reading("b"), source_reading("c"));

        cache.get_or_analyze(&a, &options).unwrap();
        cache.get_or_analyze(&b, &options).unwrap();
        // Touch `a` so `b` becomes the oldest use
        assert!(cache.get(&a, &options).is_some());
        cache.get_or_analyze(&c, &options).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&a, &options).is_some());
        assert!(cache.get(&b, &options).is_none());
        assert!(cache.get(&c, &options).is_some());
    }

    #[test]
    fn test_zero_capacity_keeps_one_entry() {
        let cache = AnalysisCache::with_capacity(0);
        let options = AnalyzeOptions::default();
        cache.get_or_analyze(&source_reading("a"), &options).unwrap();
        cache.get_or_analyze(&source_reading("b"), &options).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_parse_failures_are_not_cached() {
        let cache = AnalysisCache::new();
        let result = cache.get_or_analyze("{ not json", &AnalyzeOptions::default());
        assert!(matches!(result, Err(AnalyzeError::Program(_))));
        assert!(cache.is_empty());
    }
}
