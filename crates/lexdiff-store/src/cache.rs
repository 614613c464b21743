use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Key of a cached text: the source label plus the path within it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    source: String,
    path: String,
}

impl CacheKey {
    fn new(source: &str, path: &str) -> Self {
        Self {
            source: source.to_string(),
            path: path.to_string(),
        }
    }
}

/// Hit/miss counters of a [`TextCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Memo of fetched texts, shared by reference.
///
/// Absent texts are cached too, so a missing file is only looked up once.
/// The map sits behind a `RwLock`; a `&TextCache` can be shared across
/// threads.
pub struct TextCache {
    texts: RwLock<HashMap<CacheKey, Option<String>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl TextCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            texts: RwLock::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Look up a text. The outer `None` is a miss; `Some(None)` is a cached
    /// absence.
    pub fn get(&self, source: &str, path: &str) -> Option<Option<String>> {
        let map = self.texts.read().expect("lock poisoned");
        let found = map.get(&CacheKey::new(source, path)).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store a text (or its absence), replacing any earlier value.
    pub fn insert(&self, source: &str, path: &str, text: Option<String>) {
        let mut map = self.texts.write().expect("lock poisoned");
        map.insert(CacheKey::new(source, path), text);
    }

    /// Pre-seed the cache, e.g. with fixtures in tests.
    pub fn seeded<I, S, P>(items: I) -> Self
    where
        I: IntoIterator<Item = (S, P, Option<String>)>,
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let cache = Self::new();
        for (source, path, text) in items {
            cache.insert(source.as_ref(), path.as_ref(), text);
        }
        cache
    }

    /// Number of cached texts.
    pub fn len(&self) -> usize {
        self.texts.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.texts.read().expect("lock poisoned").is_empty()
    }

    /// Drop every cached text. Counters are kept.
    pub fn clear(&self) {
        self.texts.write().expect("lock poisoned").clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for TextCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCache")
            .field("entries", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_then_hit() {
        let cache = TextCache::new();
        assert_eq!(cache.get("old", "a.md"), None);

        cache.insert("old", "a.md", Some("text".into()));
        assert_eq!(cache.get("old", "a.md"), Some(Some("text".into())));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn absence_is_cached() {
        let cache = TextCache::new();
        cache.insert("new", "gone.md", None);
        assert_eq!(cache.get("new", "gone.md"), Some(None));
    }

    #[test]
    fn keys_are_scoped_by_source() {
        let cache = TextCache::seeded([("old", "a.md", Some("1".to_string()))]);
        assert_eq!(cache.get("new", "a.md"), None);
        assert_eq!(cache.get("old", "a.md"), Some(Some("1".into())));
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = TextCache::seeded([("s", "p", None), ("s", "q", Some("x".to_string()))]);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let cache = TextCache::new();
        std::thread::scope(|scope| {
            for i in 0..4 {
                let cache = &cache;
                scope.spawn(move || cache.insert("s", &format!("p{i}"), Some(i.to_string())));
            }
        });
        assert_eq!(cache.len(), 4);
    }
}
