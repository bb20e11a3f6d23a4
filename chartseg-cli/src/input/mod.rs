//! Input handling module

pub mod glob_resolver;
pub mod utterance_reader;

pub use glob_resolver::resolve_patterns;
pub use utterance_reader::{Utterance, UtteranceReader};
