//! Candidate file discovery

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Files found under a path, plus the walk errors met along the way
#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub errors: Vec<walkdir::Error>,
}

/// Find files under `path` whose name ends with one of `extensions`
///
/// `path` may be a single file, which is returned as-is when it matches.
/// Directories are walked recursively. Results are sorted by path.
pub fn find_files(path: &Path, extensions: &[String]) -> Discovery {
    let extensions: Vec<String> = extensions
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(normalize_extension)
        .collect();

    let mut discovery = Discovery::default();
    for entry in WalkDir::new(path).follow_links(true) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                if has_extension(entry.path(), &extensions) {
                    discovery.files.push(entry.into_path());
                }
            }
            Ok(_) => {}
            Err(e) => discovery.errors.push(e),
        }
    }
    discovery.files.sort();

    debug!(
        "Found {} files under {} ({} errors)",
        discovery.files.len(),
        path.display(),
        discovery.errors.len()
    );
    discovery
}

fn normalize_extension(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| extensions.iter().any(|e| name.ends_with(e.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn extensions(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| e.to_string()).collect()
    }

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn find_files_walks_directories_recursively_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let main = touch(dir.path(), "main.tf");
        let nested = touch(dir.path(), "live/prod/terragrunt.hcl");
        let network = touch(dir.path(), "modules/network.tf");
        touch(dir.path(), "README.md");
        touch(dir.path(), "terraform.tfvars");

        let result = find_files(dir.path(), &extensions(&[".hcl", ".tf"]));

        assert_eq!(result.files, vec![nested, main, network]);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn find_files_accepts_extensions_without_dot() {
        let dir = tempfile::tempdir().unwrap();
        let main = touch(dir.path(), "main.tf");
        touch(dir.path(), "terragrunt.hcl");

        let result = find_files(dir.path(), &extensions(&["tf"]));

        assert_eq!(result.files, vec![main]);
    }

    #[test]
    fn find_files_returns_single_matching_file() {
        let dir = tempfile::tempdir().unwrap();
        let main = touch(dir.path(), "main.tf");

        let result = find_files(&main, &extensions(&[".tf"]));

        assert_eq!(result.files, vec![main]);
    }

    #[test]
    fn find_files_ignores_single_file_with_other_extension() {
        let dir = tempfile::tempdir().unwrap();
        let readme = touch(dir.path(), "README.md");

        let result = find_files(&readme, &extensions(&[".tf"]));

        assert!(result.files.is_empty());
    }

    #[test]
    fn find_files_reports_missing_path() {
        let dir = tempfile::tempdir().unwrap();

        let result = find_files(&dir.path().join("missing"), &extensions(&[".tf"]));

        assert!(result.files.is_empty());
        assert_eq!(result.errors.len(), 1);
    }
}
