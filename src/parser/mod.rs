//! Parser layer
//! - traits.rs: Parser trait definition
//! - types.rs: Common types (SourceBlock, BlockId, BlockType)
//! - hcl.rs: Terraform / Terragrunt HCL parser
//! - document.rs: Parsed file with source replacements

pub mod document;
pub mod hcl;
pub mod traits;
pub mod types;

pub use document::Document;
pub use hcl::HclParser;
pub use traits::{ParseError, Parser};
pub use types::{BlockId, BlockType, SourceBlock};
