//! Version management layer for git module sources
//!
//! This module provides the core functionality for fetching, caching, and comparing
//! the semantic-version tags of the repositories that module sources point at.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Transport  │────▶│  Resolver   │────▶│    Model    │
//! │ (ls-remote) │     │  + Cache    │     │(local state)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │  Decision   │
//!                                         │  (policy)   │
//!                                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: In-memory tag cache keyed by canonical repository URL
//! - [`constraint`]: Version constraint parsing and matching
//! - [`decision`]: Update policy and the per-module update decision
//! - [`error`]: Error types for transport, fetch and policy input
//! - [`model`]: Local version state of a module source
//! - [`resolver`]: Cached remote tag resolution
//! - [`semver`]: Tag parsing and ordering
//! - [`transport`]: Transport trait for listing remote tags
//! - [`transports`]: Concrete transports (`git ls-remote`)
//! - [`types`]: The sorted remote tag set

pub mod cache;
pub mod constraint;
pub mod decision;
pub mod error;
pub mod model;
pub mod resolver;
pub mod semver;
pub mod transport;
pub mod transports;
pub mod types;
