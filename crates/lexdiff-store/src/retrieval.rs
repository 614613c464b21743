//! Fetching both versions of every entry ahead of aggregation.

use std::collections::BTreeSet;

use lexdiff_diff::{Entry, EntryStatus};
use tracing::{debug, warn};

use crate::cache::TextCache;
use crate::error::StoreResult;
use crate::traits::TextSource;

/// A source whose fetches go through a borrowed [`TextCache`].
///
/// Listing is not cached.
pub struct CachedSource<'a, S: TextSource + ?Sized> {
    inner: &'a S,
    cache: &'a TextCache,
}

impl<'a, S: TextSource + ?Sized> CachedSource<'a, S> {
    pub fn new(inner: &'a S, cache: &'a TextCache) -> Self {
        Self { inner, cache }
    }
}

impl<S: TextSource + ?Sized> TextSource for CachedSource<'_, S> {
    fn label(&self) -> &str {
        self.inner.label()
    }

    fn fetch(&self, path: &str) -> StoreResult<Option<String>> {
        if let Some(text) = self.cache.get(self.inner.label(), path) {
            return Ok(text);
        }
        let text = self.inner.fetch(path)?;
        self.cache.insert(self.inner.label(), path, text.clone());
        Ok(text)
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        self.inner.list()
    }
}

/// Build one entry per path listed by either source, in path order.
///
/// Status comes from listing membership: only in `new` is added, only in
/// `old` is deleted. Paths in both are compared. Fetches run sequentially;
/// a failed fetch is logged and diffed as an absent text, and the entry is
/// then marked modified since its content could not be compared.
pub fn collect_entries(old: &dyn TextSource, new: &dyn TextSource) -> StoreResult<Vec<Entry>> {
    let old_paths: BTreeSet<String> = old.list()?.into_iter().collect();
    let new_paths: BTreeSet<String> = new.list()?.into_iter().collect();

    let mut entries = Vec::new();
    for path in old_paths.union(&new_paths) {
        let in_old = old_paths.contains(path);
        let in_new = new_paths.contains(path);

        let (old_text, old_failed) = fetch_or_warn(old, path, in_old);
        let (new_text, new_failed) = fetch_or_warn(new, path, in_new);

        let status = match (in_old, in_new) {
            (false, true) => EntryStatus::Added,
            (true, false) => EntryStatus::Deleted,
            _ if old_failed || new_failed => EntryStatus::Modified,
            _ => EntryStatus::infer(old_text.as_deref(), new_text.as_deref()),
        };
        entries.push(Entry::texts(path.clone(), status, old_text, new_text));
    }

    debug!(
        old = old.label(),
        new = new.label(),
        entries = entries.len(),
        "collected entries"
    );
    Ok(entries)
}

/// Returns the text and whether the fetch failed.
fn fetch_or_warn(source: &dyn TextSource, path: &str, listed: bool) -> (Option<String>, bool) {
    if !listed {
        return (None, false);
    }
    match source.fetch(path) {
        Ok(text) => (text, false),
        Err(e) => {
            warn!(source = source.label(), path, error = %e, "fetch failed, diffing as absent");
            (None, true)
        }
    }
}
