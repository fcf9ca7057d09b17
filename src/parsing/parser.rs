use std::fmt;
use std::ops::Range;

use tracing::{debug, warn};

use crate::language::*;
use crate::parsing::scanner::{Scanner, Value};
use crate::splicing::{trim_blank_lines, unindent};

pub fn parse_document(content: &str) -> Result<Document, ParsingError> {
    let mut input = Parser::new();
    input.initialize(content);
    input.read_document()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    UnterminatedString(usize),
    UnterminatedBlock(usize),
    UnterminatedProgram(usize),
    UnbalancedBraces(usize),
    DanglingTag(usize, String),
    InvalidTags(usize),
    Expected(usize, &'static str),
}

impl ParsingError {
    pub fn offset(&self) -> usize {
        match self {
            ParsingError::UnterminatedString(offset) => *offset,
            ParsingError::UnterminatedBlock(offset) => *offset,
            ParsingError::UnterminatedProgram(offset) => *offset,
            ParsingError::UnbalancedBraces(offset) => *offset,
            ParsingError::DanglingTag(offset, _) => *offset,
            ParsingError::InvalidTags(offset) => *offset,
            ParsingError::Expected(offset, _) => *offset,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingError::UnterminatedString(_) => "unterminated string".to_string(),
            ParsingError::UnterminatedBlock(_) => "unterminated block".to_string(),
            ParsingError::UnterminatedProgram(_) => "program block without end marker".to_string(),
            ParsingError::UnbalancedBraces(_) => "unbalanced braces".to_string(),
            ParsingError::DanglingTag(_, key) => format!("tag '{}' has no value", key),
            ParsingError::InvalidTags(_) => "invalid tags".to_string(),
            ParsingError::Expected(_, value) => format!("expected {}", value),
        }
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message(), self.offset())
    }
}

#[derive(Debug)]
pub struct Parser<'i> {
    original: &'i str,
    offset: usize,
}

impl<'i> Parser<'i> {
    pub fn new() -> Parser<'i> {
        Parser {
            original: "",
            offset: 0,
        }
    }

    pub fn initialize(&mut self, content: &'i str) {
        self.original = content;
        self.offset = 0;
    }

    fn bytes(&self) -> &'i [u8] {
        self.original
            .as_bytes()
    }

    /// Split the whole input into preamble, passes, and epilogue. Strings,
    /// comments, and program bodies are stepped over so that braces and
    /// the word `Pass` inside them are not mistaken for structure.
    pub fn read_document(&mut self) -> Result<Document, ParsingError> {
        let mut document = Document::default();
        let mut depth = 0usize;
        let mut nesting = None;
        let mut verbatim = self.offset;
        let end = self
            .original
            .len();

        let mut i = self.offset;
        while i < end {
            let b = self.bytes()[i];
            match b {
                b'"' => {
                    i = self.skip_string(i, end)?;
                    continue;
                }
                b'/' if self.peek(i + 1) == Some(b'/') || self.peek(i + 1) == Some(b'*') => {
                    i = self.skip_comment(i, end);
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    if depth == 0 {
                        return Err(ParsingError::UnbalancedBraces(i));
                    }
                    depth -= 1;
                }
                _ if is_word_start(b) && (i == 0 || !is_word_byte(self.bytes()[i - 1])) => {
                    let word_end = self.word_end(i, end);
                    let word = &self.original[i..word_end];

                    if let Some(marker) = Marker::lookup(word) {
                        let (lines, after) = self.read_program(word_end, end)?;

                        if marker.is_include()
                            && document
                                .passes
                                .is_empty()
                            && document
                                .preamble
                                .shared
                                .is_none()
                        {
                            document
                                .preamble
                                .before = tidy(&self.original[verbatim..i]);
                            document
                                .preamble
                                .shared = Some(Program { marker, lines });
                            nesting.get_or_insert(depth);
                            verbatim = after;
                        }
                        i = after;
                        continue;
                    }

                    if word.eq_ignore_ascii_case("Pass") {
                        if let Some(open) = self.find_pass_open(word_end, end) {
                            let close = self.find_matching_brace(open, end)?;
                            let mut pass = self.read_pass(open + 1..close)?;

                            let text = tidy(&self.original[verbatim..i]);
                            if document
                                .passes
                                .is_empty()
                            {
                                if document
                                    .preamble
                                    .shared
                                    .is_some()
                                {
                                    document
                                        .preamble
                                        .after = text;
                                } else {
                                    document
                                        .preamble
                                        .before = text;
                                }
                            } else {
                                pass.prefix = text;
                            }

                            debug!(
                                "Found pass {}",
                                pass.name
                                    .as_deref()
                                    .unwrap_or("(unnamed)")
                            );
                            document
                                .passes
                                .push(pass);
                            nesting.get_or_insert(depth);
                            verbatim = close + 1;
                            i = close + 1;
                            continue;
                        }
                    }

                    i = word_end;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }

        if depth != 0 {
            return Err(ParsingError::UnbalancedBraces(end));
        }

        document.epilogue = tidy(&self.original[verbatim..end]);
        document.nesting = nesting.unwrap_or(0);
        self.offset = end;

        Ok(document)
    }

    /// Route each parameter inside a pass's braces into the fields of a
    /// Pass.
    pub fn read_pass(&mut self, range: Range<usize>) -> Result<Pass, ParsingError> {
        let mut pass = Pass::default();
        let mut scanner = Scanner::new(self.original, range);

        while let Some(parameter) = scanner.next_parameter()? {
            let name = scanner.text(
                parameter
                    .name
                    .clone(),
            );
            let value = scanner.text(
                parameter
                    .value
                    .clone(),
            );

            match parameter.kind {
                Value::Comment => continue,
                Value::Program(marker) => {
                    let (lines, after) = self.read_program(parameter.name.end, scanner.end())?;
                    if pass
                        .marker
                        .is_some()
                    {
                        warn!("Pass has more than one program block; keeping the last");
                    }
                    pass.marker = Some(marker);
                    pass.source_lines = lines;
                    scanner.seek(after);
                }
                _ if name.eq_ignore_ascii_case("Name") => {
                    let value = unquote(value);
                    if !value.is_empty() {
                        pass.name = Some(value.to_string());
                    }
                }
                _ if name.eq_ignore_ascii_case("Tags") => {
                    if parameter.kind != Value::Block {
                        return Err(ParsingError::InvalidTags(parameter.value.start));
                    }
                    self.read_tags(parameter.value, &mut pass.state)?;
                }
                _ if name.eq_ignore_ascii_case("Stencil") => {
                    if parameter.kind != Value::Block {
                        return Err(ParsingError::Expected(
                            parameter.value.start,
                            "a braced block of stencil operations",
                        ));
                    }
                    self.read_stencil(parameter.value, &mut pass.state)?;
                }
                _ => match RenderStateKey::lookup(name) {
                    Some(key) => {
                        pass.state
                            .render_state
                            .insert(key, value.to_string());
                    }
                    None => debug!("Ignoring parameter {}", name),
                },
            }
        }

        Ok(pass)
    }

    /// Parse `{ "Key" = "Value" ... }` into the tags of a pass. The range
    /// includes the braces.
    pub fn read_tags(&mut self, range: Range<usize>, state: &mut State) -> Result<(), ParsingError> {
        let start = range.start + 1;
        let end = range.end - 1;
        let mut i = start;
        let mut pending: Option<(usize, String)> = None;

        loop {
            i = self.skip_whitespace(i, end);
            if i >= end {
                break;
            }

            if self.bytes()[i] == b'=' {
                if pending.is_none() {
                    return Err(ParsingError::Expected(i, "a tag name before '='"));
                }
                i += 1;
                continue;
            }

            let (token, after) = self.read_tag_token(i, end)?;

            match pending.take() {
                None => pending = Some((i, token)),
                Some((_, key)) => {
                    state
                        .tags
                        .insert(key, token);
                }
            }
            i = after;
        }

        match pending {
            Some((offset, key)) => Err(ParsingError::DanglingTag(offset, key)),
            None => Ok(()),
        }
    }

    fn read_tag_token(&self, i: usize, end: usize) -> Result<(String, usize), ParsingError> {
        if self.bytes()[i] == b'"' {
            let after = self.skip_string(i, end)?;
            Ok((self.original[i + 1..after - 1].to_string(), after))
        } else {
            let mut j = i;
            while j < end && !self.bytes()[j].is_ascii_whitespace() && self.bytes()[j] != b'=' {
                j += 1;
            }
            Ok((self.original[i..j].to_string(), j))
        }
    }

    /// Parse a `{ Ref 2 Comp Always ... }` block. Keys other than the
    /// stencil operations are skipped.
    pub fn read_stencil(&mut self, range: Range<usize>, state: &mut State) -> Result<(), ParsingError> {
        let mut scanner = Scanner::new(self.original, range.start + 1..range.end - 1);

        while let Some(parameter) = scanner.next_parameter()? {
            if parameter.kind == Value::Comment {
                continue;
            }
            if let Value::Program(_) = parameter.kind {
                return Err(ParsingError::Expected(
                    parameter
                        .name
                        .start,
                    "stencil operations",
                ));
            }

            let name = scanner.text(parameter.name);
            match StencilKey::lookup(name) {
                Some(key) => {
                    let value = scanner.text(parameter.value);
                    state
                        .stencil
                        .insert(key, value.to_string());
                }
                None => debug!("Ignoring stencil parameter {}", name),
            }
        }

        Ok(())
    }

    /// Capture the body of a program block starting just after its start
    /// marker. Returns the de-indented lines and the offset just past the
    /// end marker.
    pub fn read_program(&self, from: usize, end: usize) -> Result<(Vec<String>, usize), ParsingError> {
        let text = &self.original[from..end];

        // end marker on the same line: an inline program
        let first = text
            .find('\n')
            .unwrap_or(text.len());
        if let Some((position, width)) = find_end_token(&text[..first]) {
            let body = &text[..position];
            return Ok((split_inline(body), from + position + width));
        }

        let mut line_start = first + 1;
        while line_start < text.len() {
            let line_end = text[line_start..]
                .find('\n')
                .map(|i| line_start + i)
                .unwrap_or(text.len());
            let line = &text[line_start..line_end];
            let token = line
                .split_ascii_whitespace()
                .next()
                .unwrap_or("");

            if is_end_marker(token) {
                let indent = line.len()
                    - line
                        .trim_start()
                        .len();
                let lines = trim_blank_lines(unindent(&text[..line_start]));
                return Ok((lines, from + line_start + indent + token.len()));
            }

            line_start = line_end + 1;
        }

        Err(ParsingError::UnterminatedProgram(from))
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes()
            .get(i)
            .copied()
    }

    fn skip_whitespace(&self, mut i: usize, end: usize) -> usize {
        while i < end && self.bytes()[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    }

    fn word_end(&self, mut i: usize, end: usize) -> usize {
        while i < end && is_word_byte(self.bytes()[i]) {
            i += 1;
        }
        i
    }

    // offset just past the closing quote of the string opening at `i`
    fn skip_string(&self, i: usize, end: usize) -> Result<usize, ParsingError> {
        let mut escaped = false;
        for j in i + 1..end {
            match self.bytes()[j] {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => return Ok(j + 1),
                _ => {}
            }
        }
        Err(ParsingError::UnterminatedString(i))
    }

    // offset just past a `//` or `/* */` comment starting at `i`
    fn skip_comment(&self, i: usize, end: usize) -> usize {
        let text = &self.original[i..end];
        if text.starts_with("//") {
            text.find('\n')
                .map(|j| i + j + 1)
                .unwrap_or(end)
        } else {
            text[2..]
                .find("*/")
                .map(|j| i + 2 + j + 2)
                .unwrap_or(end)
        }
    }

    // a pass keyword is only a pass if a brace follows it
    fn find_pass_open(&self, from: usize, end: usize) -> Option<usize> {
        let i = self.skip_whitespace(from, end);
        if i < end && self.bytes()[i] == b'{' {
            Some(i)
        } else {
            None
        }
    }

    fn find_matching_brace(&self, open: usize, end: usize) -> Result<usize, ParsingError> {
        let mut depth = 0usize;
        let mut i = open;

        while i < end {
            let b = self.bytes()[i];
            match b {
                b'"' => {
                    i = self.skip_string(i, end)?;
                    continue;
                }
                b'/' if self.peek(i + 1) == Some(b'/') || self.peek(i + 1) == Some(b'*') => {
                    i = self.skip_comment(i, end);
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                _ if is_word_start(b) && !is_word_byte(self.bytes()[i - 1]) => {
                    let word_end = self.word_end(i, end);
                    if Marker::lookup(&self.original[i..word_end]).is_some() {
                        let (_, after) = self.read_program(word_end, end)?;
                        i = after;
                    } else {
                        i = word_end;
                    }
                    continue;
                }
                _ => {}
            }
            i += 1;
        }

        Err(ParsingError::UnterminatedBlock(open))
    }
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

// position and width of an end marker token within a single line
fn find_end_token(line: &str) -> Option<(usize, usize)> {
    let mut i = 0;
    for token in line.split_ascii_whitespace() {
        let position = i + line[i..].find(token)?;
        if is_end_marker(token) {
            return Some((position, token.len()));
        }
        i = position + token.len();
    }
    None
}

/// Break a program written on one line into lines at every brace, so
/// that `void Foo(){}` becomes `void Foo()`, `{`, `}`.
fn split_inline(body: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in body.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            '{' | '}' if !quoted => {
                let text = current.trim();
                if !text.is_empty() {
                    lines.push(text.to_string());
                }
                lines.push(c.to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    let text = current.trim();
    if !text.is_empty() {
        lines.push(text.to_string());
    }

    lines
}

/// Normalise a chunk of verbatim text: leading blank lines and trailing
/// whitespace go, the indentation of the first line stays.
fn tidy(text: &str) -> String {
    let text = text.trim_end();
    match text.find(|c: char| !c.is_whitespace()) {
        Some(first) => {
            let start = text[..first]
                .rfind('\n')
                .map(|i| i + 1)
                .unwrap_or(0);
            text[start..].to_string()
        }
        None => String::new(),
    }
}
