//! Line-level editing of program bodies: finding, extracting, and
//! inserting code within the lines of a pass or of the shared block.

use regex::Regex;
use tracing::debug;

use crate::language::{Pass, Program};
use crate::matching::function_signature;

mod indent;

pub use indent::*;

/// A function removed from a program body, along with where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFunction {
    pub index: usize,
    pub lines: Vec<String>,
}

/// Operations over a mutable list of source lines.
pub trait Splice {
    fn lines(&self) -> &Vec<String>;

    fn lines_mut(&mut self) -> &mut Vec<String>;

    /// Remove and return the function whose definition line matches the
    /// given return type, name, and (type, argument) pairs.
    ///
    /// The line after the signature must be a lone `{` and the function
    /// ends at the next line that is a lone `}`. Braces nested inside the
    /// body are not balanced: input is expected to come from a generator
    /// that never leaves an inner closing brace alone on a line. If
    /// anything does not match, nothing is removed.
    fn extract_function(
        &mut self,
        return_type: &str,
        name: &str,
        parameters: &[(&str, &str)],
    ) -> Option<ExtractedFunction> {
        let re = Regex::new(&function_signature(return_type, name, parameters)).ok()?;
        let index = self.index_of_line_matching(&re, 0)?;

        let lines = self.lines_mut();
        if lines.len() <= index + 2 {
            return None;
        }
        if lines[index + 1].trim() != "{" {
            debug!("Definition of {} not followed by an opening brace", name);
            return None;
        }

        let close = (index + 2..lines.len()).find(|&i| lines[i].trim() == "}")?;
        let lines: Vec<String> = lines
            .drain(index..=close)
            .collect();

        Some(ExtractedFunction { index, lines })
    }

    fn index_of_line_matching(&self, re: &Regex, from: usize) -> Option<usize> {
        self.lines()
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, line)| re.is_match(line))
            .map(|(i, _)| i)
    }

    /// Insert one line before `index`; `None`, or an index past the end,
    /// appends.
    fn insert_line(&mut self, index: Option<usize>, line: &str) {
        self.insert_lines(index, vec![line.to_string()]);
    }

    fn insert_lines(&mut self, index: Option<usize>, new: Vec<String>) {
        let lines = self.lines_mut();
        match index {
            Some(i) if i <= lines.len() => {
                lines.splice(i..i, new);
            }
            _ => lines.extend(new),
        }
    }

    /// De-indent a block of code and insert its lines before `index`.
    fn insert_code(&mut self, index: Option<usize>, code: &str) {
        self.insert_lines(index, unindent(code));
    }

    /// Remove every line containing the given text, returning how many
    /// went.
    fn remove_lines_containing(&mut self, text: &str) -> usize {
        let lines = self.lines_mut();
        let before = lines.len();
        lines.retain(|line| !line.contains(text));
        before - lines.len()
    }

    /// Swap an `#include "path"` line for the given code. Returns false
    /// if there is no such include.
    fn replace_include(&mut self, path: &str, content: &str) -> bool {
        let found = self
            .lines()
            .iter()
            .position(|line| is_include(line, path));

        match found {
            Some(index) => {
                let lines = self.lines_mut();
                lines.splice(index..=index, unindent(content));
                true
            }
            None => false,
        }
    }
}

impl Splice for Pass {
    fn lines(&self) -> &Vec<String> {
        &self.source_lines
    }

    fn lines_mut(&mut self) -> &mut Vec<String> {
        &mut self.source_lines
    }
}

impl Splice for Program {
    fn lines(&self) -> &Vec<String> {
        &self.lines
    }

    fn lines_mut(&mut self) -> &mut Vec<String> {
        &mut self.lines
    }
}

// `#include "path"`, with any leading whitespace, the directive in any case,
// and exactly the given path between the quotes.
fn is_include(line: &str, path: &str) -> bool {
    const DIRECTIVE: &str = "#include";

    let line = line.trim_start();
    if line.len() < DIRECTIVE.len()
        || !line[..DIRECTIVE.len()].eq_ignore_ascii_case(DIRECTIVE)
    {
        return false;
    }

    let rest = line[DIRECTIVE.len()..].trim_start();
    match rest.strip_prefix('"') {
        Some(quoted) => match quoted.find('"') {
            Some(close) => &quoted[..close] == path,
            None => false,
        },
        None => false,
    }
}
