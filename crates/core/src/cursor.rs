//! Word/line tokenizer over a dump buffer with a single-slot lookahead session.
//!
//! Words are maximal runs of non-whitespace, non-separator characters, or one
//! of the single-character separators `.` `:` `(` `)` `{` `}` `,`. Spaces,
//! tabs and carriage returns separate words; `\n` is a line boundary that
//! ordinary reads never cross.

use crate::error::{DumpError, Result};

/// Characters that always form a word on their own.
pub const SEPARATORS: &[u8] = b".:(){},";

fn is_separator(b: u8) -> bool {
    SEPARATORS.contains(&b)
}

fn is_line_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r')
}

/// A read position. `line` is 1-based; `line_start` is the byte offset of the
/// first character of that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub line_start: usize,
}

impl Position {
    fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            line_start: 0,
        }
    }
}

/// A token together with the line it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub line: u32,
}

impl Word<'_> {
    pub fn is(&self, expected: &str) -> bool {
        self.text == expected
    }
}

/// Cursor over the dump text.
///
/// Reads advance the committed position unless a lookahead session is open,
/// in which case they advance a speculative copy that is either committed or
/// discarded. At most one session exists at a time.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    committed: Position,
    speculative: Option<Position>,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut committed = Position::start();
        if src.starts_with('\u{feff}') {
            committed.offset = '\u{feff}'.len_utf8();
            committed.line_start = committed.offset;
        }
        Cursor {
            src,
            committed,
            speculative: None,
        }
    }

    /// The committed read position.
    pub fn position(&self) -> Position {
        self.committed
    }

    /// Line of the active (speculative or committed) position.
    pub fn line(&self) -> u32 {
        self.pos().line
    }

    pub fn is_eof(&self) -> bool {
        self.pos().offset >= self.src.len()
    }

    /// Number of leading tabs on the current line, up to the read position.
    pub fn indent(&self) -> usize {
        let pos = self.pos();
        self.src.as_bytes()[pos.line_start..pos.offset]
            .iter()
            .filter(|&&b| b == b'\t')
            .count()
    }

    fn pos(&self) -> Position {
        self.speculative.unwrap_or(self.committed)
    }

    fn pos_mut(&mut self) -> &mut Position {
        self.speculative.as_mut().unwrap_or(&mut self.committed)
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos().offset).copied()
    }

    fn bump(&mut self) {
        if let Some(b) = self.peek_byte() {
            let pos = self.pos_mut();
            pos.offset += 1;
            if b == b'\n' {
                pos.line += 1;
                pos.line_start = pos.offset;
            }
        }
    }

    fn skip_line_space(&mut self) {
        while matches!(self.peek_byte(), Some(b) if is_line_space(b)) {
            self.bump();
        }
    }

    // -- Words -------------------------------------------------

    /// Read the next word on the current line, then skip the whitespace that
    /// follows it (but never the line boundary).
    pub fn read_word(&mut self) -> Result<Word<'a>> {
        self.skip_line_space();
        let line = self.line();
        let start = self.pos().offset;
        match self.peek_byte() {
            None => return Err(DumpError::UnexpectedEndOfInput { line }),
            Some(b'\n') => return Err(DumpError::WordNotFound { line }),
            Some(b) if is_separator(b) => self.bump(),
            Some(_) => {
                while let Some(b) = self.peek_byte() {
                    if b == b'\n' || is_line_space(b) || is_separator(b) {
                        break;
                    }
                    self.bump();
                }
            }
        }
        let src: &'a str = self.src;
        let text = &src[start..self.pos().offset];
        self.skip_line_space();
        Ok(Word { text, line })
    }

    /// Locate the next word, optionally crossing line boundaries and blank
    /// lines. Fails with `WordNotFound` when the boundary is reached first.
    pub fn find_word(&mut self, across_lines: bool) -> Result<Word<'a>> {
        if across_lines {
            if !self.find_content() {
                return Err(DumpError::WordNotFound { line: self.line() });
            }
        } else if self.at_end_of_line() {
            return Err(DumpError::WordNotFound { line: self.line() });
        }
        self.read_word()
    }

    pub fn find_word_on_current_line(&mut self) -> Result<Word<'a>> {
        self.find_word(false)
    }

    // -- Lines -------------------------------------------------

    /// Skip all whitespace including line boundaries. Returns false at end of
    /// input.
    pub fn find_content(&mut self) -> bool {
        while let Some(b) = self.peek_byte() {
            if b != b'\n' && !is_line_space(b) {
                return true;
            }
            self.bump();
        }
        false
    }

    /// True when only whitespace remains before the next line boundary.
    pub fn at_end_of_line(&mut self) -> bool {
        self.skip_line_space();
        matches!(self.peek_byte(), None | Some(b'\n'))
    }

    pub fn expect_end_of_line(&mut self) -> Result<()> {
        if self.at_end_of_line() {
            return Ok(());
        }
        let word = self.read_word()?;
        Err(DumpError::TrailingContent {
            line: word.line,
            found: word.text.to_owned(),
        })
    }

    /// Move past the current line unconditionally.
    pub fn advance_to_next_line(&mut self) {
        while let Some(b) = self.peek_byte() {
            self.bump();
            if b == b'\n' {
                break;
            }
        }
    }

    // -- Lookahead ---------------------------------------------

    pub fn begin_lookahead(&mut self) -> Result<()> {
        if self.speculative.is_some() {
            return Err(DumpError::InvalidLookaheadState(
                "a lookahead session is already open",
            ));
        }
        self.speculative = Some(self.committed);
        Ok(())
    }

    /// Make every read done inside the session a real advance.
    pub fn commit_lookahead(&mut self) -> Result<()> {
        let pos = self.speculative.take().ok_or(DumpError::InvalidLookaheadState(
            "no lookahead session to commit",
        ))?;
        self.committed = pos;
        Ok(())
    }

    /// Discard the session, restoring the pre-session position.
    pub fn rollback_lookahead(&mut self) -> Result<()> {
        self.speculative
            .take()
            .map(|_| ())
            .ok_or(DumpError::InvalidLookaheadState(
                "no lookahead session to roll back",
            ))
    }

    /// 0 when no session is open, 1 otherwise.
    pub fn lookahead_depth(&self) -> usize {
        usize::from(self.speculative.is_some())
    }

    /// Run `f` inside a lookahead session that is always rolled back.
    pub fn peek<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.begin_lookahead()?;
        let result = f(self);
        let restored = self.rollback_lookahead();
        let value = result?;
        restored?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(src: &str) -> Vec<String> {
        let mut cursor = Cursor::new(src);
        let mut out = Vec::new();
        while let Ok(w) = cursor.find_word(true) {
            out.push(w.text.to_owned());
        }
        out
    }

    #[test]
    fn separators_split_even_when_adjacent() {
        assert_eq!(
            words("version: 2019.3.5f1\n(SerializedFile)"),
            vec!["version", ":", "2019", ".", "3", ".", "5f1", "(", "SerializedFile", ")"]
        );
    }

    #[test]
    fn slashes_and_arrows_are_ordinary_words() {
        assert_eq!(
            words("// classID{1}: GameObject <- Object"),
            vec!["//", "classID", "{", "1", "}", ":", "GameObject", "<-", "Object"]
        );
    }

    #[test]
    fn attribute_list_tokenizes() {
        assert_eq!(
            words("ByteSize{ffffffff}, Index{0}"),
            vec!["ByteSize", "{", "ffffffff", "}", ",", "Index", "{", "0", "}"]
        );
    }

    #[test]
    fn read_word_reports_line() {
        let mut cursor = Cursor::new("a\n\n  b");
        assert_eq!(cursor.read_word().unwrap(), Word { text: "a", line: 1 });
        let b = cursor.find_word(true).unwrap();
        assert_eq!(b, Word { text: "b", line: 3 });
    }

    #[test]
    fn read_word_does_not_cross_lines() {
        let mut cursor = Cursor::new("a\nb");
        cursor.read_word().unwrap();
        assert!(matches!(
            cursor.read_word(),
            Err(DumpError::WordNotFound { line: 1 })
        ));
        assert!(matches!(
            cursor.find_word_on_current_line(),
            Err(DumpError::WordNotFound { line: 1 })
        ));
    }

    #[test]
    fn read_word_at_end_of_buffer() {
        let mut cursor = Cursor::new("last");
        cursor.read_word().unwrap();
        assert!(matches!(
            cursor.read_word(),
            Err(DumpError::UnexpectedEndOfInput { line: 1 })
        ));
    }

    #[test]
    fn find_word_across_lines_fails_at_end() {
        let mut cursor = Cursor::new("x \n \n");
        cursor.read_word().unwrap();
        assert!(matches!(
            cursor.find_word(true),
            Err(DumpError::WordNotFound { .. })
        ));
    }

    #[test]
    fn end_of_line_handles_crlf() {
        let mut cursor = Cursor::new("a \r\nb");
        cursor.read_word().unwrap();
        cursor.expect_end_of_line().unwrap();
        cursor.advance_to_next_line();
        assert_eq!(cursor.read_word().unwrap(), Word { text: "b", line: 2 });
    }

    #[test]
    fn trailing_content_is_reported() {
        let mut cursor = Cursor::new("a extra\n");
        cursor.read_word().unwrap();
        match cursor.expect_end_of_line() {
            Err(DumpError::TrailingContent { line, found }) => {
                assert_eq!(line, 1);
                assert_eq!(found, "extra");
            }
            other => panic!("expected TrailingContent, got {:?}", other),
        }
    }

    #[test]
    fn advance_skips_rest_of_line() {
        let mut cursor = Cursor::new("skip all of this\nnext");
        cursor.advance_to_next_line();
        assert_eq!(cursor.read_word().unwrap().text, "next");
    }

    #[test]
    fn indent_counts_leading_tabs() {
        let mut cursor = Cursor::new("root\n\t\tchild");
        cursor.read_word().unwrap();
        assert!(cursor.find_content());
        assert_eq!(cursor.indent(), 2);
        assert_eq!(cursor.read_word().unwrap().text, "child");
    }

    #[test]
    fn bom_is_skipped() {
        let mut cursor = Cursor::new("\u{feff}version");
        assert_eq!(cursor.read_word().unwrap().text, "version");
    }

    #[test]
    fn rollback_restores_position() {
        let mut cursor = Cursor::new("one two");
        cursor.begin_lookahead().unwrap();
        assert_eq!(cursor.read_word().unwrap().text, "one");
        cursor.rollback_lookahead().unwrap();
        assert_eq!(cursor.position().offset, 0);
        assert_eq!(cursor.read_word().unwrap().text, "one");
    }

    #[test]
    fn commit_keeps_speculative_reads() {
        let mut cursor = Cursor::new("one two");
        cursor.begin_lookahead().unwrap();
        cursor.read_word().unwrap();
        assert_eq!(cursor.position().offset, 0);
        cursor.commit_lookahead().unwrap();
        assert_eq!(cursor.read_word().unwrap().text, "two");
    }

    #[test]
    fn nested_session_is_rejected() {
        let mut cursor = Cursor::new("x");
        cursor.begin_lookahead().unwrap();
        assert_eq!(cursor.lookahead_depth(), 1);
        assert!(matches!(
            cursor.begin_lookahead(),
            Err(DumpError::InvalidLookaheadState(_))
        ));
        assert_eq!(cursor.lookahead_depth(), 1);
    }

    #[test]
    fn closing_without_session_is_rejected() {
        let mut cursor = Cursor::new("x");
        assert!(matches!(
            cursor.commit_lookahead(),
            Err(DumpError::InvalidLookaheadState(_))
        ));
        assert!(matches!(
            cursor.rollback_lookahead(),
            Err(DumpError::InvalidLookaheadState(_))
        ));
    }

    #[test]
    fn peek_always_rolls_back() {
        let mut cursor = Cursor::new("\n\n// marker");
        let first = cursor
            .peek(|c| {
                c.find_content();
                Ok(c.read_word()?.text)
            })
            .unwrap();
        assert_eq!(first, "//");
        assert_eq!(cursor.lookahead_depth(), 0);
        assert_eq!(cursor.position().line, 1);
    }

    #[test]
    fn peek_rolls_back_on_error() {
        let mut cursor = Cursor::new("a");
        let result = cursor.peek(|c| {
            c.read_word()?;
            c.read_word()
        });
        assert!(matches!(result, Err(DumpError::UnexpectedEndOfInput { .. })));
        assert_eq!(cursor.lookahead_depth(), 0);
        assert_eq!(cursor.read_word().unwrap().text, "a");
    }

    #[test]
    fn peek_inside_peek_is_rejected() {
        let mut cursor = Cursor::new("a");
        let result = cursor.peek(|c| c.peek(|inner| inner.read_word().map(|_| ())));
        assert!(matches!(
            result,
            Err(DumpError::InvalidLookaheadState(_))
        ));
        assert_eq!(cursor.lookahead_depth(), 0);
    }
}
