use crate::error::StoreResult;

/// A versioned collection of texts addressed by relative path.
///
/// Implementations must satisfy these invariants:
/// - `fetch` returns `Ok(None)` for a path the source does not hold.
/// - `list` returns every path `fetch` can resolve, sorted, without duplicates.
/// - `label` is stable for the lifetime of the source; caches key on it.
pub trait TextSource: Send + Sync {
    /// Name distinguishing this source from others sharing a cache.
    fn label(&self) -> &str;

    /// Read the text at `path`.
    fn fetch(&self, path: &str) -> StoreResult<Option<String>>;

    /// All paths held by the source.
    fn list(&self) -> StoreResult<Vec<String>>;

    /// Read several texts.
    ///
    /// Default implementation calls `fetch()` for each path in order.
    fn fetch_batch(&self, paths: &[String]) -> StoreResult<Vec<Option<String>>> {
        paths.iter().map(|path| self.fetch(path)).collect()
    }
}
