//! Whole-dump reading: header, tree records, and the self-checking footer.
//!
//! ```text
//! version: 2019.3.5f1
//! (SerializedFile)
//! // classID{1}: ...
//! ...
//! // ==================
//! // Successfully finished. Written 1 of 2
//! ```

use std::path::Path;

use serde::Serialize;

use crate::cursor::Cursor;
use crate::error::{DumpError, Result};
use crate::header::Header;
use crate::source::{FileSystemProvider, SourceProvider};
use crate::tree::TreeRecord;

/// A fully parsed and validated dump. Never constructed from a dump whose
/// footer disagrees with its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dump {
    pub(crate) header: Header,
    pub(crate) trees: Vec<TreeRecord>,
}

/// What the next content line of the dump is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    TreeRecord,
    Footer,
}

/// Counts declared by the footer's `Written <N> of <M>` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterCounts {
    pub written: usize,
    pub total: usize,
}

impl Dump {
    pub fn read(buffer: &[u8]) -> Result<Dump> {
        let text = String::from_utf8_lossy(buffer);
        Dump::read_str(&text)
    }

    pub fn read_str(text: &str) -> Result<Dump> {
        let mut cursor = Cursor::new(text);
        let header = Header::read(&mut cursor)?;
        let trees = read_trees(&mut cursor)?;
        let counts = read_footer(&mut cursor)?;
        validate_counts(counts, &trees)?;
        if cursor.find_content() {
            tracing::warn!(line = cursor.line(), "ignoring content after dump footer");
        }
        Ok(Dump { header, trees })
    }

    /// Load and read a dump from disk.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Dump> {
        Dump::read_from(&FileSystemProvider, path.as_ref())
    }

    pub fn read_from<P: SourceProvider + ?Sized>(provider: &P, path: &Path) -> Result<Dump> {
        if !provider.exists(path) {
            return Err(DumpError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = provider.read_bytes(path).map_err(|source| DumpError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dump = Dump::read(&bytes)?;
        tracing::info!(
            path = %path.display(),
            trees = dump.trees.len(),
            valid = dump.valid_count(),
            "read dump"
        );
        Ok(dump)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn trees(&self) -> &[TreeRecord] {
        &self.trees
    }

    pub fn valid_count(&self) -> usize {
        self.trees.iter().filter(|t| t.is_valid()).count()
    }

    pub fn find_by_name(&self, class_name: &str) -> Option<&TreeRecord> {
        self.trees.iter().find(|t| t.class_name == class_name)
    }

    pub fn find_by_id(&self, class_id: u32) -> Option<&TreeRecord> {
        self.trees.iter().find(|t| t.class_id == class_id)
    }
}

// ──────────────────────────────────────────────
// Tree sequence
// ──────────────────────────────────────────────

/// Decide, by lookahead only, whether the next content line opens the footer
/// (`// ==...`) or another tree record. The cursor does not move.
pub fn classify_next_line(cursor: &mut Cursor<'_>) -> Result<LineKind> {
    cursor.peek(|c| {
        if !c.find_content() {
            return Err(DumpError::UnexpectedEndOfInput { line: c.line() });
        }
        if c.read_word()?.is("//") {
            if let Ok(word) = c.find_word_on_current_line() {
                if word.text.starts_with("==") {
                    return Ok(LineKind::Footer);
                }
            }
        }
        Ok(LineKind::TreeRecord)
    })
}

/// Read tree records until the footer marker is seen. The footer itself is
/// left unconsumed.
pub fn read_trees(cursor: &mut Cursor<'_>) -> Result<Vec<TreeRecord>> {
    let mut trees = Vec::new();
    while classify_next_line(cursor)? == LineKind::TreeRecord {
        let tree = TreeRecord::read(cursor)?;
        tracing::trace!(
            class_id = tree.class_id,
            class_name = %tree.class_name,
            valid = tree.is_valid(),
            "read tree record"
        );
        trees.push(tree);
    }
    Ok(trees)
}

// ──────────────────────────────────────────────
// Footer
// ──────────────────────────────────────────────

/// Parse the footer block:
///
/// ```text
/// // ==================
/// // Successfully finished. Written <N> of <M>
/// ```
///
/// Empty `//` lines between the two are tolerated.
pub fn read_footer(cursor: &mut Cursor<'_>) -> Result<FooterCounts> {
    cursor.find_validate_word("//")?;
    cursor.find_word_on_current_line()?;
    cursor.expect_end_of_line()?;
    cursor.advance_to_next_line();

    cursor.find_validate_word("//")?;
    while cursor.at_end_of_line() {
        cursor.advance_to_next_line();
        cursor.find_validate_word("//")?;
    }
    cursor.validate_word("Successfully")?;
    cursor.validate_word("finished")?;
    cursor.validate_word(".")?;
    cursor.validate_word("Written")?;
    let written = cursor.read_integer()?;
    cursor.validate_word("of")?;
    let total = cursor.read_integer()?;
    cursor.expect_end_of_line()?;

    tracing::debug!(written, total, "read dump footer");
    Ok(FooterCounts { written, total })
}

/// Cross-check the footer against what was parsed. The total is checked
/// first; the first mismatch found is returned.
pub fn validate_counts(counts: FooterCounts, trees: &[TreeRecord]) -> Result<()> {
    if trees.len() != counts.total {
        return Err(DumpError::ClassCountMismatch {
            actual: trees.len(),
            expected: counts.total,
        });
    }
    let valid = trees.iter().filter(|t| t.is_valid()).count();
    if valid != counts.written {
        return Err(DumpError::ValidClassCountMismatch {
            actual: valid,
            expected: counts.written,
        });
    }
    Ok(())
}
