//! Transport implementations for listing remote tags

pub mod git_cli;

pub use git_cli::GitCliTransport;
