//! Text retrieval for the diff engine.
//!
//! The engine only consumes settled texts; this crate is the collaborator
//! that fetches them. Every source implements [`TextSource`], and fetches
//! can be memoized through an explicit [`TextCache`] that the application
//! constructs and passes down, never a process-wide global.
//!
//! # Sources
//!
//! - [`DirectorySource`] -- files under a directory root
//! - [`InMemorySource`] -- `BTreeMap`-backed source for tests and embedding
//! - [`CachedSource`] -- wraps any source with a borrowed [`TextCache`]
//!
//! # Design Rules
//!
//! 1. A missing text is `Ok(None)`, not an error.
//! 2. Paths are `/`-separated and relative to the source root.
//! 3. All I/O errors are propagated; [`collect_entries`] is the one place
//!    that downgrades a failed fetch to an absent text, with a warning.

pub mod cache;
pub mod directory;
pub mod error;
pub mod memory;
pub mod retrieval;
pub mod traits;

pub use cache::{CacheStats, TextCache};
pub use directory::{read_optional_text, DirectorySource};
pub use error::{StoreError, StoreResult};
pub use memory::InMemorySource;
pub use retrieval::{collect_entries, CachedSource};
pub use traits::TextSource;
