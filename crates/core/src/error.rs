use std::path::PathBuf;

use crate::version::VersionError;

/// Every way reading a dump can fail. All variants are fatal to the read.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// The source path does not exist; reported before any bytes are loaded.
    #[error("file '{}' doesn't exist", path.display())]
    FileNotFound { path: PathBuf },

    /// The source exists but could not be read.
    #[error("error reading '{}': {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: unexpected end of input")]
    UnexpectedEndOfInput { line: u32 },

    /// Required content was missing before the end of the line (or buffer).
    #[error("line {line}: expected a word, found end of line")]
    WordNotFound { line: u32 },

    #[error("line {line}: expected '{expected}', got '{actual}'")]
    UnexpectedToken {
        expected: String,
        actual: String,
        line: u32,
    },

    #[error("line {line}: '{text}' is not a valid integer")]
    MalformedInteger { text: String, line: u32 },

    #[error("malformed header: {reason}")]
    MalformedHeader { line: u32, reason: String },

    #[error("line {line}: invalid version '{text}': {source}")]
    InvalidVersionFormat {
        text: String,
        line: u32,
        #[source]
        source: VersionError,
    },

    #[error("line {line}: unexpected trailing content '{found}'")]
    TrailingContent { line: u32, found: String },

    /// A type-tree node is not nested exactly one level below its parent.
    #[error("line {line}: expected indentation {expected}, found {found}")]
    InvalidIndentation {
        line: u32,
        expected: usize,
        found: usize,
    },

    #[error("class count mismatch. Read {actual} expected {expected}")]
    ClassCountMismatch { actual: usize, expected: usize },

    #[error("valid class count mismatch. Read {actual} expected {expected}")]
    ValidClassCountMismatch { actual: usize, expected: usize },

    /// Misuse of the speculative read session. Never produced by a correct parser.
    #[error("invalid lookahead state: {0}")]
    InvalidLookaheadState(&'static str),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DumpError>;

impl DumpError {
    /// Source line the failure points at, when it has one.
    pub fn line(&self) -> Option<u32> {
        match self {
            DumpError::UnexpectedEndOfInput { line }
            | DumpError::WordNotFound { line }
            | DumpError::UnexpectedToken { line, .. }
            | DumpError::MalformedInteger { line, .. }
            | DumpError::MalformedHeader { line, .. }
            | DumpError::InvalidVersionFormat { line, .. }
            | DumpError::TrailingContent { line, .. }
            | DumpError::InvalidIndentation { line, .. } => Some(*line),
            DumpError::FileNotFound { .. }
            | DumpError::Io { .. }
            | DumpError::ClassCountMismatch { .. }
            | DumpError::ValidClassCountMismatch { .. }
            | DumpError::InvalidLookaheadState(_) => None,
        }
    }

    /// Stable snake_case identifier for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DumpError::FileNotFound { .. } => "file_not_found",
            DumpError::Io { .. } => "io",
            DumpError::UnexpectedEndOfInput { .. } => "unexpected_end_of_input",
            DumpError::WordNotFound { .. } => "word_not_found",
            DumpError::UnexpectedToken { .. } => "unexpected_token",
            DumpError::MalformedInteger { .. } => "malformed_integer",
            DumpError::MalformedHeader { .. } => "malformed_header",
            DumpError::InvalidVersionFormat { .. } => "invalid_version_format",
            DumpError::TrailingContent { .. } => "trailing_content",
            DumpError::InvalidIndentation { .. } => "invalid_indentation",
            DumpError::ClassCountMismatch { .. } => "class_count_mismatch",
            DumpError::ValidClassCountMismatch { .. } => "valid_class_count_mismatch",
            DumpError::InvalidLookaheadState(_) => "invalid_lookahead_state",
        }
    }

    /// Serialize for machine-readable output.
    /// All fields are always present (null for a missing line).
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "kind":    self.kind(),
            "line":    self.line(),
            "message": self.to_string(),
        })
    }
}
