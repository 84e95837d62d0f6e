//! Shared state of one command run
//!
//! Groups the parser and the cached tag resolver, and turns a file into the
//! git modules it declares.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::Config;
use crate::parser::hcl::HclParser;
use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::BlockId;
use crate::parser::Document;
use crate::source::decompose;
use crate::version::cache::TagCache;
use crate::version::error::FetchError;
use crate::version::model::ModuleVersion;
use crate::version::resolver::TagResolver;
use crate::version::transport::TagTransport;
use crate::version::transports::GitCliTransport;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: ParseError },
}

/// A git module source found in a document
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    pub block: BlockId,
    /// `<path> [<label>]`
    pub name: String,
    pub version: ModuleVersion,
}

/// A module whose remote tags could not be fetched
#[derive(Debug)]
pub struct FetchFailure {
    pub module: String,
    pub message: String,
}

pub struct Session {
    parser: Arc<dyn Parser>,
    resolver: TagResolver,
    stagger: Duration,
}

impl Session {
    pub fn new(transport: Arc<dyn TagTransport>, stagger: Duration) -> Self {
        Self {
            parser: Arc::new(HclParser::new()),
            resolver: TagResolver::new(transport, Arc::new(TagCache::new())),
            stagger,
        }
    }

    /// Session listing tags with the git CLI configured in `config`
    pub fn from_config(config: &Config) -> Self {
        let transport = GitCliTransport::new(
            &config.git.binary,
            Duration::from_millis(config.git.timeout_ms),
        );
        Self::new(
            Arc::new(transport),
            Duration::from_millis(config.fetch.stagger_delay_ms),
        )
    }

    pub fn resolver(&self) -> &TagResolver {
        &self.resolver
    }

    /// Read and parse one file
    pub async fn load(&self, path: &Path) -> Result<Document, LoadError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Document::parse(path, content, self.parser.as_ref()).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Git module sources of `document`, in document order
    ///
    /// Sources that are not git (local paths, registry modules, archives) are
    /// left out.
    pub fn modules(&self, document: &Document) -> Vec<ModuleEntry> {
        document
            .list_attribute_blocks()
            .iter()
            .filter_map(|block| match decompose(&block.raw) {
                Ok(reference) => Some(ModuleEntry {
                    block: block.id,
                    name: document.module_name(block),
                    version: ModuleVersion::new(reference),
                }),
                Err(e) => {
                    debug!("Ignoring {}: {}", document.module_name(block), e);
                    None
                }
            })
            .collect()
    }

    /// Fetch the remote tags of every module, one fetch per repository
    ///
    /// Modules whose repository could not be listed keep no remote state and
    /// are returned as failures.
    pub async fn fetch_remotes(&self, modules: &mut [ModuleEntry]) -> Vec<FetchFailure> {
        let urls: BTreeSet<String> = modules
            .iter()
            .map(|m| m.version.canonical_url().to_string())
            .collect();
        let results = self.resolver.resolve_all(urls, self.stagger).await;

        let mut failures = Vec::new();
        for module in modules.iter_mut() {
            match results.get(module.version.canonical_url()) {
                Some(Ok(tags)) => module.version.set_remote(Arc::clone(tags)),
                Some(Err(e)) => {
                    warn!("Failed to fetch tags for {}: {}", module.name, e);
                    failures.push(FetchFailure {
                        module: module.name.clone(),
                        message: fetch_message(e),
                    });
                }
                None => {}
            }
        }
        failures
    }
}

fn fetch_message(error: &FetchError) -> String {
    format!("failed to fetch remote tags ({error})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::error::TransportError;
    use crate::version::transport::MockTagTransport;

    const CONTENT: &str = r#"module "vpc" {
  source = "git::https://example.com/vpc.git?ref=v1.0.0"
}

module "local" {
  source = "./modules/local"
}

module "vpc_copy" {
  source = "git::https://example.com/vpc.git//modules/subnets?ref=v1.0.0"
}

module "broken" {
  source = "git::https://example.com/broken.git?ref=v1.0.0"
}
"#;

    fn document() -> Document {
        Document::parse("main.tf", CONTENT.to_string(), &HclParser::new()).unwrap()
    }

    #[test]
    fn modules_skips_non_git_sources() {
        let session = Session::new(Arc::new(MockTagTransport::new()), Duration::ZERO);

        let names: Vec<String> = session
            .modules(&document())
            .into_iter()
            .map(|m| m.name)
            .collect();

        assert_eq!(
            names,
            vec![
                "main.tf [vpc]",
                "main.tf [vpc_copy]",
                "main.tf [broken]"
            ]
        );
    }

    #[tokio::test]
    async fn fetch_remotes_lists_each_repository_once() {
        let mut transport = MockTagTransport::new();
        transport
            .expect_list_tag_names()
            .withf(|url| url == "https://example.com/vpc.git")
            .times(1)
            .returning(|_| Ok(vec!["v1.0.0".to_string(), "v1.1.0".to_string()]));
        transport
            .expect_list_tag_names()
            .withf(|url| url == "https://example.com/broken.git")
            .times(1)
            .returning(|url| {
                Err(TransportError::Remote {
                    url: url.to_string(),
                    message: "repository not found".to_string(),
                })
            });
        let session = Session::new(Arc::new(transport), Duration::ZERO);
        let mut modules = session.modules(&document());

        let failures = session.fetch_remotes(&mut modules).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].module, "main.tf [broken]");
        assert!(failures[0].message.contains("repository not found"));
        assert_eq!(modules[0].version.remote().map(|r| r.len()), Some(2));
        assert_eq!(modules[1].version.remote().map(|r| r.len()), Some(2));
        assert!(modules[2].version.remote().is_none());
    }

    #[tokio::test]
    async fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.tf");
        std::fs::write(&path, "module \"x\" {\n").unwrap();
        let session = Session::new(Arc::new(MockTagTransport::new()), Duration::ZERO);

        let result = session.load(&path).await;

        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[tokio::test]
    async fn load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(Arc::new(MockTagTransport::new()), Duration::ZERO);

        let result = session.load(&dir.path().join("missing.tf")).await;

        assert!(matches!(result, Err(LoadError::Read { .. })));
    }
}
