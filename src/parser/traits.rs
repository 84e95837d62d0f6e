//! Parser trait definition

use crate::parser::types::SourceBlock;

/// Trait for extracting module source attributes from configuration files
pub trait Parser: Send + Sync {
    /// Parse the content and extract every block carrying a source attribute
    fn parse(&self, content: &str) -> Result<Vec<SourceBlock>, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to parse the file structure
    #[error("Failed to parse file: {0}")]
    ParseFailed(String),

    /// Invalid syntax in the file
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),

    /// Tree-sitter related error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}
