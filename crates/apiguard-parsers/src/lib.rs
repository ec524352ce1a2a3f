pub mod java;
pub mod walker;

pub use java::{detect_language, JavaParser, ParseError};
