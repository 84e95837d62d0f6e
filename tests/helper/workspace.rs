//! Temporary module trees

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use modpin::cli::{Reporter, RunSummary};

/// A temporary directory holding module files
pub struct Workspace {
    dir: TempDir,
}

/// Captured output of one run, with the workspace root stripped from paths
pub struct Output {
    pub out: String,
    pub err: String,
    pub summary: RunSummary,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).unwrap()
    }

    pub fn reporter(&self) -> Reporter<Vec<u8>, Vec<u8>> {
        Reporter::new(Vec::new(), Vec::new())
    }

    pub fn output(&self, reporter: Reporter<Vec<u8>, Vec<u8>>, summary: RunSummary) -> Output {
        let (out, err) = reporter.into_parts();
        let prefix = format!("{}/", self.dir.path().display());
        Output {
            out: String::from_utf8(out).unwrap().replace(&prefix, ""),
            err: String::from_utf8(err).unwrap().replace(&prefix, ""),
            summary,
        }
    }
}
