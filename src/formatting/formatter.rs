//! Code formatter writing a Document back out as ShaderLab

use std::borrow::Cow;

use crate::formatting::*;
use crate::language::*;

pub fn format_with_renderer<'i>(document: &'i Document) -> Vec<(Syntax, Cow<'i, str>)> {
    let mut output = Formatter::new();
    output.format_document(document);
    output.fragments
}

/// Render a single pass on its own, as used when illustrating what a
/// pass ought to look like.
pub fn render_pass(pass: &Pass, renderer: &dyn Render) -> String {
    let mut output = Formatter::new();
    output.format_pass(pass);
    output.render(renderer)
}

struct Formatter<'i> {
    fragments: Vec<(Syntax, Cow<'i, str>)>,
    nesting: usize,
}

impl<'i> Formatter<'i> {
    fn new() -> Formatter<'i> {
        Formatter {
            fragments: Vec::new(),
            nesting: 0,
        }
    }

    fn append(&mut self, syntax: Syntax, content: &'i str) {
        self.fragments
            .push((syntax, Cow::Borrowed(content)));
    }

    fn append_owned(&mut self, syntax: Syntax, content: String) {
        self.fragments
            .push((syntax, Cow::Owned(content)));
    }

    fn append_char(&mut self, c: char) {
        if c == '\n' {
            self.append(Syntax::Newline, "\n");
        } else {
            self.append_owned(Syntax::Neutral, c.to_string());
        }
    }

    fn render(&self, renderer: &dyn Render) -> String {
        let mut result = String::new();
        for (syntax, content) in &self.fragments {
            result.push_str(&renderer.style(*syntax, content));
        }
        result
    }

    #[cfg(test)]
    fn reset(&mut self) {
        self.fragments
            .clear();
        self.nesting = 0;
    }

    fn increase(&mut self, depth: usize) {
        self.nesting += depth;
    }

    fn decrease(&mut self, depth: usize) {
        self.nesting -= depth;
    }

    fn indent(&mut self) {
        if self.nesting > 0 {
            let spaces = " ".repeat(self.nesting);
            self.append_owned(Syntax::Indent, spaces);
        }
    }

    fn format_document(&mut self, document: &'i Document) {
        let preamble = &document.preamble;
        let pad = document.nesting * 4;

        self.append_verbatim(&preamble.before);

        if let Some(program) = &preamble.shared {
            self.increase(pad);
            self.append_program(program.marker, &program.lines);
            self.decrease(pad);
        }

        self.append_verbatim(&preamble.after);

        for pass in &document.passes {
            self.append_verbatim(&pass.prefix);

            self.increase(pad);
            self.format_pass(pass);
            self.decrease(pad);
        }

        self.append_verbatim(&document.epilogue);
    }

    // text carried through untouched, on lines of its own
    fn append_verbatim(&mut self, text: &'i str) {
        if text.is_empty() {
            return;
        }
        self.append(Syntax::Verbatim, text);
        self.append_char('\n');
    }

    fn format_pass(&mut self, pass: &'i Pass) {
        self.indent();
        self.append(Syntax::Keyword, "Pass");
        self.append_char('\n');
        self.indent();
        self.append(Syntax::Structure, "{");
        self.append_char('\n');

        self.increase(4);

        if let Some(name) = &pass.name {
            self.indent();
            self.append(Syntax::Keyword, "Name");
            self.append_char(' ');
            self.append_quoted(name);
            self.append_char('\n');
        }

        if !pass
            .state
            .tags
            .is_empty()
        {
            self.indent();
            self.append_tags(&pass.state.tags);
            self.append_char('\n');
        }

        for (key, value) in &pass.state.render_state {
            self.indent();
            self.append_parameter(key.as_str(), value);
        }

        if !pass
            .state
            .stencil
            .is_empty()
        {
            self.append_stencil(&pass.state.stencil);
        }

        if pass.has_program() {
            let marker = pass
                .marker
                .unwrap_or(Marker::HlslProgram);
            self.append_program(marker, &pass.source_lines);
        }

        self.decrease(4);

        self.indent();
        self.append(Syntax::Structure, "}");
        self.append_char('\n');
    }

    fn append_quoted(&mut self, text: &'i str) {
        self.append(Syntax::String, "\"");
        self.append(Syntax::String, text);
        self.append(Syntax::String, "\"");
    }

    fn append_tags(&mut self, tags: &'i std::collections::BTreeMap<String, String>) {
        self.append(Syntax::Keyword, "Tags");
        self.append_char(' ');
        self.append(Syntax::Structure, "{");
        for (key, value) in tags {
            self.append_char(' ');
            self.append_quoted(key);
            self.append_char(' ');
            self.append(Syntax::Structure, "=");
            self.append_char(' ');
            self.append_quoted(value);
        }
        self.append_char(' ');
        self.append(Syntax::Structure, "}");
    }

    fn append_stencil(&mut self, stencil: &'i std::collections::BTreeMap<StencilKey, String>) {
        self.indent();
        self.append(Syntax::Keyword, "Stencil");
        self.append_char('\n');
        self.indent();
        self.append(Syntax::Structure, "{");
        self.append_char('\n');

        self.increase(4);
        for (key, value) in stencil {
            self.indent();
            self.append_parameter(key.as_str(), value);
        }
        self.decrease(4);

        self.indent();
        self.append(Syntax::Structure, "}");
        self.append_char('\n');
    }

    // a key given without a value is written alone
    fn append_parameter(&mut self, key: &'static str, value: &'i str) {
        self.append(Syntax::Property, key);
        if !value.is_empty() {
            self.append_char(' ');
            self.append(value_syntax(value), value);
        }
        self.append_char('\n');
    }

    fn append_program(&mut self, marker: Marker, lines: &'i [String]) {
        self.indent();
        self.append(Syntax::Marker, marker.start());
        self.append_char('\n');

        for line in lines {
            // blank lines stay empty rather than carrying the indent
            if !line.is_empty() {
                self.indent();
                self.append(Syntax::Code, line);
            }
            self.append_char('\n');
        }

        self.indent();
        self.append(Syntax::Marker, marker.end());
        self.append_char('\n');
    }
}

// placeholders still awaiting substitution stand out from literal values
fn value_syntax(value: &str) -> Syntax {
    if value.starts_with('[') && value.ends_with(']') {
        Syntax::Variable
    } else {
        Syntax::Value
    }
}

impl<'i> ToString for Formatter<'i> {
    fn to_string(&self) -> String {
        let mut result = String::new();
        for (_, content) in &self.fragments {
            result.push_str(content);
        }
        result
    }
}
