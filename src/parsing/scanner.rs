//! Lexical scanner finding `Name value` parameters within a block

use std::ops::Range;

use crate::language::{is_keyword, Marker};
use crate::parsing::parser::ParsingError;

/// How the value of a parameter was delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// `// ...` through to the end of the line, or `/* ... */`.
    Comment,
    /// A program start marker; the body is not scanned here.
    Program(Marker),
    Quoted,
    Block,
    Bare,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: Range<usize>,
    pub value: Range<usize>,
    pub kind: Value,
}

/// Walks a range of the original buffer one parameter at a time. Offsets
/// in the results, and in any errors, are into the original buffer.
#[derive(Debug)]
pub struct Scanner<'i> {
    original: &'i str,
    offset: usize,
    end: usize,
}

impl<'i> Scanner<'i> {
    pub fn new(original: &'i str, range: Range<usize>) -> Scanner<'i> {
        let end = range
            .end
            .min(original.len());
        Scanner {
            original,
            offset: range
                .start
                .min(end),
            end,
        }
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Move the cursor, for callers that consumed input themselves (as
    /// happens with program bodies).
    pub fn seek(&mut self, offset: usize) {
        self.offset = offset.min(self.end);
    }

    pub fn text(&self, range: Range<usize>) -> &'i str {
        &self.original[range]
    }

    pub fn next_parameter(&mut self) -> Result<Option<Parameter>, ParsingError> {
        let bytes = self
            .original
            .as_bytes();

        let start = self.skip_whitespace(self.offset);
        if start >= self.end {
            self.offset = self.end;
            return Ok(None);
        }

        if self.original[start..self.end].starts_with("/*") {
            let inside = start + 2;
            let close = self.original[inside..self.end]
                .find("*/")
                .map(|k| inside + k)
                .unwrap_or(self.end);
            self.offset = (close + 2).min(self.end);
            return Ok(Some(Parameter {
                name: start..inside,
                value: inside..close,
                kind: Value::Comment,
            }));
        }

        // the first character always belongs to the name
        let mut i = start + 1;
        while i < self.end && !is_name_boundary(bytes[i]) {
            i += 1;
        }
        let name = start..i;
        let text = &self.original[name.clone()];

        if text.starts_with("//") {
            let line_end = self.find_line_end(i);
            self.offset = (line_end + 1).min(self.end);
            return Ok(Some(Parameter {
                name,
                value: i..line_end,
                kind: Value::Comment,
            }));
        }

        if let Some(marker) = Marker::lookup(text) {
            self.offset = i;
            return Ok(Some(Parameter {
                name,
                value: i..i,
                kind: Value::Program(marker),
            }));
        }

        let begin = self.skip_whitespace(i);
        if begin >= self.end {
            self.offset = self.end;
            return Ok(Some(Parameter {
                name,
                value: self.end..self.end,
                kind: Value::Empty,
            }));
        }

        let (value, kind) = match bytes[begin] {
            b'"' => {
                let close = self
                    .find_closing_quote(begin + 1)
                    .ok_or(ParsingError::UnterminatedString(begin))?;
                (begin..close + 1, Value::Quoted)
            }
            b'{' => {
                let close = self
                    .find_closing_brace(begin)
                    .ok_or(ParsingError::UnterminatedBlock(begin))?;
                (begin..close + 1, Value::Block)
            }
            _ => {
                let finish = self.find_bare_end(begin);
                if finish == begin {
                    // the next token is a parameter in its own right
                    (begin..begin, Value::Empty)
                } else {
                    (begin..finish, Value::Bare)
                }
            }
        };

        self.offset = value.end;
        Ok(Some(Parameter { name, value, kind }))
    }

    fn skip_whitespace(&self, mut i: usize) -> usize {
        let bytes = self
            .original
            .as_bytes();
        while i < self.end && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    }

    fn find_line_end(&self, from: usize) -> usize {
        self.original[from..self.end]
            .find('\n')
            .map(|i| from + i)
            .unwrap_or(self.end)
    }

    // position of the closing quote, honouring backslash escapes
    fn find_closing_quote(&self, from: usize) -> Option<usize> {
        let bytes = self
            .original
            .as_bytes();
        let mut escaped = false;
        for i in from..self.end {
            match bytes[i] {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => return Some(i),
                _ => {}
            }
        }
        None
    }

    // position of the brace matching the one at `open`, skipping quoted text
    fn find_closing_brace(&self, open: usize) -> Option<usize> {
        let bytes = self
            .original
            .as_bytes();
        let mut depth = 0usize;
        let mut i = open;
        while i < self.end {
            match bytes[i] {
                b'"' => {
                    i = self.find_closing_quote(i + 1)?;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    // A bare value runs to the end of its line, but stops short of a
    // comment or of any token that is itself the name of a parameter.
    fn find_bare_end(&self, begin: usize) -> usize {
        let bytes = self
            .original
            .as_bytes();
        let line_end = self.original[begin..self.end]
            .find(['\n', '\r'])
            .map(|i| begin + i)
            .unwrap_or(self.end);

        let mut finish = begin;
        let mut i = begin;
        while i < line_end {
            if bytes[i].is_ascii_whitespace() {
                i += 1;
                continue;
            }
            let rest = &self.original[i..line_end];
            if rest.starts_with("//") || rest.starts_with("/*") {
                break;
            }
            let mut j = i + 1;
            while j < line_end && !is_name_boundary(bytes[j]) {
                j += 1;
            }
            if is_keyword(&self.original[i..j]) {
                break;
            }
            // the rest of the token, including any quoted or bracketed part
            while j < line_end && !bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            finish = j;
            i = j;
        }
        finish
    }
}

fn is_name_boundary(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'{' || b == b'"' || b == b'['
}
