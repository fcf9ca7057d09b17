use super::messages::generate_error_message;
use owo_colors::OwoColorize;
use std::path::Path;
use shaderlab::{
    formatting::Render,
    language::LoadingError,
    parsing::ParsingError,
    pipeline::GenerationError,
};

/// One-based position of a byte offset within the source.
#[derive(Debug, PartialEq, Eq)]
struct Location {
    line: usize,
    column: usize,
}

fn locate(source: &str, offset: usize) -> Location {
    let before = &source[..offset.min(source.len())];
    let start = before
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);

    Location {
        line: before
            .matches('\n')
            .count()
            + 1,
        column: before[start..]
            .chars()
            .count()
            + 1,
    }
}

fn headline(filename: &Path, location: &Location, problem: &str) -> String {
    format!(
        "{}: {}:{}:{} {}",
        "error".bright_red(),
        filename.display(),
        location.line,
        location.column,
        problem.bold()
    )
}

/// Report a parsing error with the offending line of the shader quoted
/// and the column marked beneath it, followed by the explanation.
pub fn full_parsing_error(
    error: &ParsingError,
    filename: &Path,
    source: &str,
    renderer: &impl Render,
) -> String {
    let (problem, details) = generate_error_message(error, renderer);
    let location = locate(source, error.offset());

    let code = source
        .lines()
        .nth(location.line - 1)
        .unwrap_or("");
    let number = location
        .line
        .to_string();
    let gutter = " ".repeat(number.len());

    let mut result = headline(filename, &location, &problem);
    result.push_str("\n\n");
    result.push_str(&format!("{} {}\n", gutter, '|'.bright_blue()));
    result.push_str(&format!("{} {} {}\n", number.bright_blue(), '|'.bright_blue(), code));
    result.push_str(&format!(
        "{} {} {:>width$}\n",
        gutter,
        '|'.bright_blue(),
        '^'.bright_red(),
        width = location.column
    ));
    if !details.is_empty() {
        result.push('\n');
        result.push_str(details.trim_end());
    }
    result
}

pub fn concise_parsing_error(
    error: &ParsingError,
    filename: &Path,
    source: &str,
    renderer: &impl Render,
) -> String {
    let (problem, _) = generate_error_message(error, renderer);
    headline(filename, &locate(source, error.offset()), &problem)
}

pub fn concise_loading_error(error: &LoadingError) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .problem
            .bold()
    )
}

/// Report a failure of the pipeline driver. Parsing errors get the same
/// treatment as when checking a file; the others have no position.
pub fn full_generation_error(
    error: &GenerationError,
    filename: &Path,
    source: &str,
    renderer: &impl Render,
) -> String {
    match error {
        GenerationError::Parsing(error) => full_parsing_error(error, filename, source, renderer),
        _ => concise_generation_error(error, filename, source, renderer),
    }
}

pub fn concise_generation_error(
    error: &GenerationError,
    filename: &Path,
    source: &str,
    renderer: &impl Render,
) -> String {
    match error {
        GenerationError::Parsing(error) => concise_parsing_error(error, filename, source, renderer),
        _ => format!(
            "{}: {}: {}",
            "error".bright_red(),
            filename.display(),
            error
                .message()
                .bold()
        ),
    }
}
