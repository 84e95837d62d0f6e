//! Command layer
//!
//! Drives the source, version and parser layers over a set of files and
//! prints one report line per module.
//!
//! # Modules
//!
//! - [`discovery`]: Finds candidate files by extension
//! - [`list`]: `list` command
//! - [`report`]: Report/failure output and run counters
//! - [`session`]: Parser and cached resolver shared by a run
//! - [`update`]: `update` command

pub mod discovery;
pub mod list;
pub mod report;
pub mod session;
pub mod update;

use std::io::Write;
use std::path::{Path, PathBuf};

pub use list::{ListOptions, run_list};
pub use report::{Reporter, RunSummary};
pub use session::Session;
pub use update::{UpdateOptions, run_update};

/// Find candidate files, reporting walk errors without stopping
///
/// Returns the files found and the number of errors reported.
pub fn discover<O: Write, E: Write>(
    path: &Path,
    extensions: &[String],
    reporter: &mut Reporter<O, E>,
) -> std::io::Result<(Vec<PathBuf>, usize)> {
    let found = discovery::find_files(path, extensions);
    for error in &found.errors {
        reporter.failure(format_args!(
            "failed walking path at {} with extensions [{}] ({})",
            path.display(),
            extensions.join(","),
            error
        ))?;
    }
    Ok((found.files, found.errors.len()))
}
