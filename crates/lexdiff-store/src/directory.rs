use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{StoreError, StoreResult};
use crate::traits::TextSource;

/// Texts stored as files under a directory root.
///
/// Hidden files and directories (names starting with `.`, such as `.git`)
/// below the root are not listed. The root itself may be hidden or `.`.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
    label: String,
}

impl DirectorySource {
    /// Open a source rooted at `root`, which must be an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::NotADirectory(root));
        }
        let label = root.display().to_string();
        Ok(Self { root, label })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(StoreError::PathEscapesRoot(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl TextSource for DirectorySource {
    fn label(&self) -> &str {
        &self.label
    }

    fn fetch(&self, path: &str) -> StoreResult<Option<String>> {
        let full = self.resolve(path)?;
        read_optional_text(&full)
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        let mut paths = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|_| StoreError::PathEscapesRoot(entry.path().display().to_string()))?;
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            paths.push(parts.join("/"));
        }

        paths.sort();
        debug!(root = %self.root.display(), count = paths.len(), "listed directory source");
        Ok(paths)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Read a UTF-8 file, mapping a missing file to `Ok(None)`.
pub fn read_optional_text(path: &Path) -> StoreResult<Option<String>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|_| StoreError::InvalidUtf8(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("livre_1/titre_2")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("README.md"), "readme").unwrap();
        fs::write(dir.path().join("livre_1/article_1.md"), "Art. 1").unwrap();
        fs::write(dir.path().join("livre_1/titre_2/article_9.md"), "Art. 9").unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref").unwrap();
        dir
    }

    #[test]
    fn lists_relative_paths_sorted_without_hidden() {
        let dir = fixture();
        let source = DirectorySource::open(dir.path()).unwrap();
        assert_eq!(
            source.list().unwrap(),
            vec!["README.md", "livre_1/article_1.md", "livre_1/titre_2/article_9.md"]
        );
    }

    #[test]
    fn hidden_root_is_still_listed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".snapshot");
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join("a.md"), "a").unwrap();
        fs::write(root.join(".cache/b.md"), "b").unwrap();

        let source = DirectorySource::open(&root).unwrap();
        assert_eq!(source.list().unwrap(), vec!["a.md"]);
    }

    #[test]
    fn root_given_as_current_dir_component() {
        let dir = fixture();
        let source = DirectorySource::open(dir.path().join(".")).unwrap();
        assert_eq!(
            source.list().unwrap(),
            vec!["README.md", "livre_1/article_1.md", "livre_1/titre_2/article_9.md"]
        );
        assert_eq!(source.fetch("README.md").unwrap(), Some("readme".into()));
    }

    #[test]
    fn fetches_present_and_missing_files() {
        let dir = fixture();
        let source = DirectorySource::open(dir.path()).unwrap();
        assert_eq!(source.fetch("livre_1/article_1.md").unwrap(), Some("Art. 1".into()));
        assert_eq!(source.fetch("livre_1/absent.md").unwrap(), None);
    }

    #[test]
    fn rejects_paths_leaving_the_root() {
        let dir = fixture();
        let source = DirectorySource::open(dir.path()).unwrap();
        assert!(matches!(source.fetch("../etc/passwd"), Err(StoreError::PathEscapesRoot(_))));
        assert!(matches!(source.fetch("/etc/passwd"), Err(StoreError::PathEscapesRoot(_))));
        assert!(matches!(source.fetch(""), Err(StoreError::PathEscapesRoot(_))));
    }

    #[test]
    fn non_utf8_is_an_error() {
        let dir = fixture();
        fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00]).unwrap();
        let source = DirectorySource::open(dir.path()).unwrap();
        assert!(matches!(source.fetch("blob.bin"), Err(StoreError::InvalidUtf8(_))));
    }

    #[test]
    fn open_requires_a_directory() {
        let dir = fixture();
        let file = dir.path().join("README.md");
        assert!(matches!(DirectorySource::open(&file), Err(StoreError::NotADirectory(_))));
        assert!(matches!(
            DirectorySource::open(dir.path().join("nope")),
            Err(StoreError::NotADirectory(_))
        ));
    }
}
