//! `git ls-remote` transport implementation

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::FETCH_TIMEOUT_MS;
use crate::version::error::TransportError;
use crate::version::transport::TagTransport;

/// Default git executable
const DEFAULT_GIT_BINARY: &str = "git";

const TAG_REF_PREFIX: &str = "refs/tags/";

/// Lists remote tags by shelling out to `git ls-remote --tags --refs`
///
/// Authentication is whatever the user's git is configured with (ssh agent,
/// credential helpers). Interactive prompts are disabled.
#[derive(Debug, Clone)]
pub struct GitCliTransport {
    program: String,
    timeout: Duration,
}

impl GitCliTransport {
    pub fn new(program: &str, timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            timeout,
        }
    }
}

impl Default for GitCliTransport {
    fn default() -> Self {
        Self::new(
            DEFAULT_GIT_BINARY,
            Duration::from_millis(FETCH_TIMEOUT_MS),
        )
    }
}

#[async_trait::async_trait]
impl TagTransport for GitCliTransport {
    async fn list_tag_names(&self, url: &str) -> Result<Vec<String>, TransportError> {
        debug!("Running {} ls-remote for {}", self.program, url);

        let output = Command::new(&self.program)
            .args(["ls-remote", "--tags", "--refs", url])
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, output)
            .await
            .map_err(|_| TransportError::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            })?
            .map_err(|e| TransportError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("git ls-remote for {} exited with {}", url, output.status);
            return Err(TransportError::Remote {
                url: url.to_string(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(parse_tag_refs(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Extract short tag names from `git ls-remote` output
///
/// Each line is `<sha>\t<refname>`; peeled entries (`^{}`) are ignored.
fn parse_tag_refs(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|refname| refname.strip_prefix(TAG_REF_PREFIX))
        .filter(|name| !name.ends_with("^{}"))
        .map(str::to_string)
        .collect()
}
