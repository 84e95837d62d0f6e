//! Module source strings
//!
//! - decompose.rs: raw source text -> [`SourceReference`]
//! - encode.rs: [`SourceReference`] -> source text of the same shape
//! - reference.rs: the decomposed reference
//! - error.rs: rejection of non-git sources

pub mod decompose;
pub mod encode;
pub mod error;
pub mod reference;

pub use decompose::decompose;
pub use encode::encode;
pub use error::SourceError;
pub use reference::{Remote, RemoteKind, SourceReference};
