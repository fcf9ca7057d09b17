pub mod formatting;
pub mod language;
pub mod matching;
pub mod parsing;
pub mod pipeline;
pub mod splicing;
