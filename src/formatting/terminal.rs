//! Renderer for colourizing ShaderLab in a terminal

use owo_colors::OwoColorize;

use crate::formatting::*;

/// Embellish fragments with ANSI escapes to create syntax highlighting in
/// terminal output.
pub struct Terminal;

impl Render for Terminal {
    fn style(&self, syntax: Syntax, content: &str) -> String {
        match syntax {
            Syntax::Neutral => content.to_string(),
            Syntax::Indent => content.to_string(),
            Syntax::Newline => "\n".to_string(),
            Syntax::Verbatim => content // comment - #999999 (grey)
                .color(owo_colors::Rgb(153, 153, 153))
                .to_string(),
            Syntax::Keyword => content // keyword.other - #3465a4 (blue) bold
                .color(owo_colors::Rgb(0x34, 0x65, 0xa4))
                .bold()
                .to_string(),
            Syntax::Marker => content // keyword.control - #75507b (purple) bold
                .color(owo_colors::Rgb(0x75, 0x50, 0x7b))
                .bold()
                .to_string(),
            Syntax::String => content // string - #4e9a06 (green) bold
                .color(owo_colors::Rgb(0x4e, 0x9a, 0x06))
                .bold()
                .to_string(),
            Syntax::Property => content // entity.name.tag - #8f5902 (brown) bold
                .color(owo_colors::Rgb(0x8f, 0x59, 0x02))
                .bold()
                .to_string(),
            Syntax::Value => content // constant.language - #ad7fa8 (purple)
                .color(owo_colors::Rgb(0xad, 0x7f, 0xa8))
                .to_string(),
            Syntax::Variable => content // variable.parameter - #729fcf (light blue) bold
                .color(owo_colors::Rgb(0x72, 0x9f, 0xcf))
                .bold()
                .to_string(),
            Syntax::Code => content.to_string(),
            Syntax::Structure => content // punctuation.section.braces - #999999 bold
                .color(owo_colors::Rgb(153, 153, 153))
                .bold()
                .to_string(),
        }
    }
}
