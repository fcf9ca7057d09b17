use std::fmt;

use crate::parsing::ParsingError;
use crate::pipeline::inputs::ValueType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    Parsing(ParsingError),
    InvalidRequest(String),
    UnknownFamily(String),
    UnsupportedAttribute(String, ValueType),
    Template(String),
}

impl GenerationError {
    pub fn message(&self) -> String {
        match self {
            GenerationError::Parsing(error) => error.message(),
            GenerationError::InvalidRequest(details) => format!("invalid request: {}", details),
            GenerationError::UnknownFamily(family) => format!("unknown shader family '{}'", family),
            GenerationError::UnsupportedAttribute(name, kind) => {
                format!("attribute '{}' of type {:?} cannot be passed to a shader", name, kind)
            }
            GenerationError::Template(details) => format!("template failed: {}", details),
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Parsing(error) => write!(f, "{}", error),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl From<ParsingError> for GenerationError {
    fn from(error: ParsingError) -> Self {
        GenerationError::Parsing(error)
    }
}

impl From<tinytemplate::error::Error> for GenerationError {
    fn from(error: tinytemplate::error::Error) -> Self {
        GenerationError::Template(error.to_string())
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(error: serde_json::Error) -> Self {
        GenerationError::InvalidRequest(error.to_string())
    }
}
