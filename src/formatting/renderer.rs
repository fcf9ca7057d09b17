//! Rendering formatted fragments to a final string

use std::borrow::Cow;
use std::fmt;

use crate::formatting::*;
use crate::language::*;

/// We do the code formatting in two passes. First we convert from our
/// Document types into a Vec of "fragments" (Syntax tag, String pairs).
/// Then second we apply the specified renderer to each pair to result in
/// an embellished/highlighted String.
pub fn render(renderer: &impl Render, document: &Document) -> String {
    // Pass 1: Format Document to tagged fragments
    let fragments = formatter::format_with_renderer(document);

    // Pass 2: Render tagged fragments to final output
    render_to_string(renderer, fragments)
}

/// Pass 2: apply markup to fragments via style() and combine.
fn render_to_string<'i>(renderer: &impl Render, fragments: Vec<(Syntax, Cow<'i, str>)>) -> String {
    let mut output = String::new();

    for (syntax, content) in fragments {
        let rendered = renderer.style(syntax, &content);
        output.push_str(&rendered);
    }

    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }

    output
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&Identity, self))
    }
}
