//! User-facing output of a run

use std::fmt::Display;
use std::io::{self, Write};

/// Report lines go to `out`, failures to `err`
pub struct Reporter<O, E> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn line(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.out, "{line}")
    }

    pub fn failure(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.err, "error: {message}")
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

/// Counters of one `list` or `update` run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Files parsed successfully
    pub files: usize,
    /// Git module sources seen
    pub modules: usize,
    /// Modules rewritten (or that would be, in a dry run)
    pub updated: usize,
    pub skipped: usize,
    /// Walk, parse, fetch and write failures
    pub failures: usize,
    /// Files written back to disk
    pub written: usize,
}
