use serde::Serialize;

use crate::cursor::Cursor;
use crate::error::{DumpError, Result};
use crate::version::EngineVersion;

/// The two header lines of a dump:
///
/// ```text
/// version: 2019.3.5f1
/// (SerializedFile)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub version: EngineVersion,
    pub type_name: String,
}

impl Header {
    pub fn read(cursor: &mut Cursor<'_>) -> Result<Header> {
        let version = read_version(cursor)?;
        let type_name = read_type_name(cursor).map_err(|e| match e {
            DumpError::UnexpectedToken { .. }
            | DumpError::WordNotFound { .. }
            | DumpError::UnexpectedEndOfInput { .. }
            | DumpError::TrailingContent { .. } => DumpError::MalformedHeader {
                line: e.line().unwrap_or_else(|| cursor.line()),
                reason: e.to_string(),
            },
            other => other,
        })?;
        tracing::debug!(version = %version, type_name = %type_name, "read dump header");
        Ok(Header { version, type_name })
    }
}

fn read_version(cursor: &mut Cursor<'_>) -> Result<EngineVersion> {
    cursor.find_validate_word("version")?;
    cursor.validate_word(":")?;

    let major = cursor.find_word_on_current_line()?;
    cursor.validate_word(".")?;
    let minor = cursor.read_word()?;
    cursor.validate_word(".")?;
    let build_type = cursor.read_word()?;

    let text = format!("{}.{}.{}", major.text, minor.text, build_type.text);
    text.parse()
        .map_err(|source| DumpError::InvalidVersionFormat {
            text,
            line: major.line,
            source,
        })
}

fn read_type_name(cursor: &mut Cursor<'_>) -> Result<String> {
    cursor.find_validate_word("(")?;
    let name = cursor.read_word()?;
    cursor.validate_word(")")?;
    cursor.expect_end_of_line()?;
    Ok(name.text.to_owned())
}
