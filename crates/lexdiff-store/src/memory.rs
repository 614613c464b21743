use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::StoreResult;
use crate::traits::TextSource;

/// In-memory, `BTreeMap`-based text source.
///
/// Intended for tests and embedding. Counts fetches so callers can check
/// whether a cache in front of it was consulted.
#[derive(Debug)]
pub struct InMemorySource {
    label: String,
    texts: BTreeMap<String, String>,
    fetches: AtomicUsize,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            texts: BTreeMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Add a text, builder style.
    pub fn with_text(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(path.into(), text.into());
        self
    }

    /// Number of `fetch` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl TextSource for InMemorySource {
    fn label(&self) -> &str {
        &self.label
    }

    fn fetch(&self, path: &str) -> StoreResult<Option<String>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self.texts.get(path).cloned())
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self.texts.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_and_list() {
        let source = InMemorySource::new("v1")
            .with_text("b.md", "B")
            .with_text("a.md", "A");

        assert_eq!(source.label(), "v1");
        assert_eq!(source.list().unwrap(), vec!["a.md", "b.md"]);
        assert_eq!(source.fetch("a.md").unwrap(), Some("A".into()));
        assert_eq!(source.fetch("missing.md").unwrap(), None);
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn batch_fetch_keeps_order() {
        let source = InMemorySource::new("v1").with_text("a", "1").with_text("b", "2");
        let texts = source
            .fetch_batch(&["b".to_string(), "x".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(texts, vec![Some("2".into()), None, Some("1".into())]);
    }
}
