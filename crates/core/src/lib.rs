//! treedump-core: reader and validator for exported type-tree dumps.
//!
//! A dump is a text file holding a version header, one tree record per
//! exported class, and a footer declaring how many records were written.
//! [`Dump::read`] parses the whole file and only returns when the footer's
//! counts agree with what was actually parsed.
//!
//! # Public API
//!
//! - [`Dump`] -- the validated forest plus header; entry points
//!   [`Dump::read`], [`Dump::read_str`], [`Dump::read_file`]
//! - [`Header`], [`EngineVersion`] -- dump metadata
//! - [`TreeRecord`], [`TypeTreeNode`] -- per-class type trees
//! - [`Cursor`] -- the word/line tokenizer with lookahead sessions
//! - [`DumpError`] -- every failure, with source line numbers
//! - [`SourceProvider`] -- where dump bytes are loaded from

pub mod cursor;
pub mod dump;
pub mod error;
pub mod grammar;
pub mod header;
pub mod optimize;
pub mod source;
pub mod tree;
pub mod version;

// ── Convenience re-exports ───────────────────────────────────────────

pub use cursor::{Cursor, Position, Word};
pub use dump::{classify_next_line, Dump, FooterCounts, LineKind};
pub use error::{DumpError, Result};
pub use header::Header;
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};
pub use tree::{TreeRecord, TypeTreeNode};
pub use version::{EngineVersion, ReleaseType, VersionError};
