//! Validating primitives on top of the cursor: literal words and integers.

use crate::cursor::{Cursor, Word};
use crate::error::{DumpError, Result};

fn check<'a>(word: Word<'a>, expected: &str) -> Result<Word<'a>> {
    if word.is(expected) {
        Ok(word)
    } else {
        Err(DumpError::UnexpectedToken {
            expected: expected.to_owned(),
            actual: word.text.to_owned(),
            line: word.line,
        })
    }
}

impl<'a> Cursor<'a> {
    /// Read the next word on the current line and require it to be `expected`.
    pub fn validate_word(&mut self, expected: &str) -> Result<Word<'a>> {
        let word = self.read_word()?;
        check(word, expected)
    }

    /// Like [`Cursor::validate_word`] but may skip blank lines first.
    pub fn find_validate_word(&mut self, expected: &str) -> Result<Word<'a>> {
        let word = self.find_word(true)?;
        check(word, expected)
    }

    /// Read a non-negative decimal integer.
    pub fn read_integer(&mut self) -> Result<usize> {
        let word = self.read_word()?;
        parse_radix(word, 10).and_then(|n| {
            usize::try_from(n).map_err(|_| DumpError::MalformedInteger {
                text: word.text.to_owned(),
                line: word.line,
            })
        })
    }

    /// Read an unsigned hexadecimal integer without a `0x` prefix.
    pub fn read_hex(&mut self) -> Result<u32> {
        let word = self.read_word()?;
        parse_radix(word, 16).and_then(|n| {
            u32::try_from(n).map_err(|_| DumpError::MalformedInteger {
                text: word.text.to_owned(),
                line: word.line,
            })
        })
    }

    /// `{ <integer> }` as used by the tree attribute lists.
    pub fn read_braced_integer(&mut self) -> Result<usize> {
        self.validate_word("{")?;
        let n = self.read_integer()?;
        self.validate_word("}")?;
        Ok(n)
    }

    pub fn read_braced_hex(&mut self) -> Result<u32> {
        self.validate_word("{")?;
        let n = self.read_hex()?;
        self.validate_word("}")?;
        Ok(n)
    }
}

fn parse_radix(word: Word<'_>, radix: u32) -> Result<u64> {
    let malformed = || DumpError::MalformedInteger {
        text: word.text.to_owned(),
        line: word.line,
    };
    // from_str_radix alone would accept a leading '+'
    if !word.text.chars().all(|c| c.is_digit(radix)) {
        return Err(malformed());
    }
    u64::from_str_radix(word.text, radix).map_err(|_| malformed())
}
