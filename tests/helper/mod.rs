//! Shared utilities for integration tests
#![allow(dead_code, unused_imports)]

pub mod transport;
pub mod workspace;

pub use transport::MockTransport;
pub use workspace::{Output, Workspace};
