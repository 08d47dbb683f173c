use alloc::string::String;
use core::fmt;

#[derive(Debug)]
pub enum ParseError {
    MissingSectionHeader { line: usize },
    MalformedSectionHeader { line: usize },
    EmptyKey { line: usize },
    ContinuationWithoutValue { line: usize, key: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::MissingSectionHeader { line } => {
                write!(f, "line {line}: option declared before any section header")
            }
            ParseError::MalformedSectionHeader { line } => {
                write!(f, "line {line}: section header is missing its closing ']'")
            }
            ParseError::EmptyKey { line } => write!(f, "line {line}: option has no name"),
            ParseError::ContinuationWithoutValue { line, key } => {
                write!(f, "line {line}: '{key}' has no value to continue")
            }
        }
    }
}

impl core::error::Error for ParseError {}
