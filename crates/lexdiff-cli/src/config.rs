use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::{LayoutArg, RenderArgs};

/// Name of the config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lexdiff.toml";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    Unified,
    SideBySide,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Unified => Layout::Unified,
            LayoutArg::SideBySide => Layout::SideBySide,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Entries rendered per report; `None` or `0` renders all of them.
    pub max_entries: Option<usize>,
    pub layout: Layout,
    /// Width of each side-by-side column, in characters.
    pub column_width: usize,
    pub color: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_entries: Some(10),
            layout: Layout::Unified,
            column_width: 60,
            color: true,
        }
    }
}

impl RenderConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid render configuration")
    }

    /// Load `explicit` if given, else `lexdiff.toml` in the working directory
    /// if it exists, else the defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded render configuration");
        Self::from_toml(&text)
    }

    /// The cap handed to the aggregator.
    pub fn entry_cap(&self) -> Option<usize> {
        self.max_entries.filter(|&max| max > 0)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, args: &RenderArgs) -> Self {
        if let Some(layout) = args.layout {
            self.layout = layout.into();
        }
        if args.all {
            self.max_entries = None;
        } else if let Some(max) = args.max_entries {
            self.max_entries = Some(max);
        }
        if let Some(width) = args.column_width {
            self.column_width = width;
        }
        if args.no_color {
            self.color = false;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = RenderConfig::default();
        assert_eq!(c.max_entries, Some(10));
        assert_eq!(c.layout, Layout::Unified);
        assert_eq!(c.column_width, 60);
        assert!(c.color);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = RenderConfig::from_toml("layout = \"side-by-side\"\ncolumn_width = 40\n").unwrap();
        assert_eq!(c.layout, Layout::SideBySide);
        assert_eq!(c.column_width, 40);
        assert_eq!(c.max_entries, Some(10));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(RenderConfig::from_toml("layout = \"diagonal\"").is_err());
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.toml");
        std::fs::write(&path, "max_entries = 3\ncolor = false\n").unwrap();

        let c = RenderConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(c.max_entries, Some(3));
        assert!(!c.color);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        assert!(RenderConfig::load(Some(Path::new("/nonexistent/lexdiff.toml"))).is_err());
    }

    #[test]
    fn zero_cap_means_unlimited() {
        let c = RenderConfig::from_toml("max_entries = 0").unwrap();
        assert_eq!(c.entry_cap(), None);
        assert_eq!(RenderConfig::default().entry_cap(), Some(10));
    }

    #[test]
    fn flags_override_file_values() {
        let args = RenderArgs {
            layout: Some(LayoutArg::SideBySide),
            all: true,
            no_color: true,
            ..RenderArgs::default()
        };
        let c = RenderConfig::default().with_overrides(&args);
        assert_eq!(c.layout, Layout::SideBySide);
        assert_eq!(c.max_entries, None);
        assert!(!c.color);
    }
}
