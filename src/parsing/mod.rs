//! parser for ShaderLab documents

use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::language::{Document, LoadingError};

pub mod parser;
pub mod scanner;

pub use parser::ParsingError;

/// Read a file and return an owned String. A filename of "-" reads from
/// standard input.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    if filename.to_str() == Some("-") {
        let mut content = String::new();
        return match std::io::stdin().read_to_string(&mut content) {
            Ok(_) => Ok(content),
            Err(error) => {
                debug!(?error);
                Err(LoadingError {
                    problem: "Failed reading standard input".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                })
            }
        };
    }

    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Parse text into a Document, or return the error that stopped it. A
/// malformed shader is never half parsed.
pub fn parse(content: &str) -> Result<Document, ParsingError> {
    let result = parser::parse_document(content);

    match result {
        Ok(document) => {
            debug!(
                "Found {} pass{}",
                document
                    .passes
                    .len(),
                if document
                    .passes
                    .len()
                    == 1
                {
                    ""
                } else {
                    "es"
                }
            );
            if document
                .preamble
                .shared
                .is_some()
            {
                debug!("Found shared program block");
            }
            Ok(document)
        }
        Err(error) => {
            debug!("error: {}", error);
            Err(error)
        }
    }
}
