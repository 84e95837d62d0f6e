//! `update` command

use std::io::Write;
use std::path::PathBuf;

use tracing::{error, info};

use crate::cli::report::{Reporter, RunSummary};
use crate::cli::session::Session;
use crate::version::decision::{Decision, SkipReason, UpdatePolicy, apply, decide};

pub struct UpdateOptions {
    pub policy: UpdatePolicy,
    /// Print what would change without writing files
    pub dry_run: bool,
}

/// Re-pin every git module in `files` according to the policy
///
/// Blocks are decided in document order. A file is written once, after all
/// of its blocks were decided, and only when something changed.
pub async fn run_update<O: Write, E: Write>(
    session: &Session,
    files: &[PathBuf],
    options: &UpdateOptions,
    reporter: &mut Reporter<O, E>,
) -> std::io::Result<RunSummary> {
    let mut summary = RunSummary::default();

    for path in files {
        let mut document = match session.load(path).await {
            Ok(document) => document,
            Err(e) => {
                reporter.failure(e)?;
                summary.failures += 1;
                continue;
            }
        };
        summary.files += 1;

        let mut modules = session.modules(&document);
        summary.modules += modules.len();

        if options.policy.needs_remote() {
            for failure in session.fetch_remotes(&mut modules).await {
                reporter.failure(format_args!("{}: {}", failure.module, failure.message))?;
                summary.failures += 1;
            }
        }

        for module in &mut modules {
            let decision = decide(&module.version, &options.policy);
            let target = match &decision {
                Decision::NoOp => continue,
                // The fetch failure was already reported on stderr.
                Decision::Skip(SkipReason::RemoteNotResolved) => continue,
                Decision::Skip(reason) => {
                    reporter.line(format_args!("skipping: {} ({})", module.name, reason))?;
                    summary.skipped += 1;
                    continue;
                }
                Decision::Apply(target) => target.clone(),
            };

            let from = module.version.local_version_label().to_string();
            summary.updated += 1;
            if options.dry_run {
                reporter.line(format_args!(
                    "would update: {} (from: {}, to: {})",
                    module.name, from, target
                ))?;
                continue;
            }

            reporter.line(format_args!(
                "updating: {} (from: {}, to: {})",
                module.name, from, target
            ))?;
            apply(&mut module.version, &decision);
            document.replace_attribute_text(module.block, &module.version.encode());
        }

        if options.dry_run || !document.is_modified() {
            continue;
        }

        match tokio::fs::write(path, document.render()).await {
            Ok(()) => {
                info!("Wrote {}", path.display());
                summary.written += 1;
            }
            Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                reporter.failure(format_args!("failed to save {}: {}", path.display(), e))?;
                summary.failures += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::version::transport::MockTagTransport;

    const VPC_URL: &str = "https://example.com/vpc.git";

    const CONTENT: &str = r#"module "vpc" {
  source = "git::https://example.com/vpc.git?ref=v1.0.0"
}

module "head" {
  source = "git::https://example.com/vpc.git//modules/subnets"
}
"#;

    struct Run {
        out: String,
        err: String,
        content: String,
        summary: RunSummary,
    }

    async fn update(transport: MockTagTransport, options: UpdateOptions) -> Run {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.tf");
        std::fs::write(&path, CONTENT).unwrap();
        let session = Session::new(Arc::new(transport), Duration::ZERO);
        let mut reporter = Reporter::new(Vec::new(), Vec::new());

        let summary = run_update(
            &session,
            std::slice::from_ref(&path),
            &options,
            &mut reporter,
        )
        .await
        .unwrap();

        let (out, err) = reporter.into_parts();
        Run {
            out: String::from_utf8(out)
                .unwrap()
                .replace(&path.display().to_string(), "main.tf"),
            err: String::from_utf8(err).unwrap(),
            content: std::fs::read_to_string(&path).unwrap(),
            summary,
        }
    }

    fn tags_transport(tags: &'static [&'static str]) -> MockTagTransport {
        let mut transport = MockTagTransport::new();
        transport
            .expect_list_tag_names()
            .withf(|url| url == VPC_URL)
            .times(1)
            .returning(move |_| Ok(tags.iter().map(|t| t.to_string()).collect()));
        transport
    }

    fn options(version: Option<&str>, constraint: Option<&str>, pin_unpinned: bool) -> UpdateOptions {
        UpdateOptions {
            policy: UpdatePolicy::from_input(version, constraint, false, pin_unpinned).unwrap(),
            dry_run: false,
        }
    }

    #[tokio::test]
    async fn run_update_pins_latest_and_skips_unpinned() {
        let run = update(
            tags_transport(&["v1.0.0", "v1.1.0", "v2.0.0"]),
            options(None, None, false),
        )
        .await;

        assert_eq!(
            run.out,
            "updating: main.tf [vpc] (from: v1.0.0, to: v2.0.0)\n\
             skipping: main.tf [head] (unpinned, not requested; re-run with --version-unpinned to pin it)\n"
        );
        assert!(run.err.is_empty());
        assert_eq!(
            run.content,
            CONTENT.replace("vpc.git?ref=v1.0.0", "vpc.git?ref=v2.0.0")
        );
        assert_eq!(run.summary.written, 1);
    }

    #[tokio::test]
    async fn run_update_pins_unpinned_when_requested() {
        let run = update(
            tags_transport(&["v1.0.0", "v1.1.0", "v2.0.0"]),
            options(None, Some("< 2.0.0"), true),
        )
        .await;

        assert_eq!(
            run.out,
            "updating: main.tf [vpc] (from: v1.0.0, to: v1.1.0)\n\
             updating: main.tf [head] (from: HEAD, to: v1.1.0)\n"
        );
        assert_eq!(
            run.content,
            r#"module "vpc" {
  source = "git::https://example.com/vpc.git?ref=v1.1.0"
}

module "head" {
  source = "git::https://example.com/vpc.git//modules/subnets?ref=v1.1.0"
}
"#
        );
    }

    #[tokio::test]
    async fn run_update_with_explicit_version_does_not_fetch() {
        let run = update(MockTagTransport::new(), options(Some("0.9.0"), None, false)).await;

        assert_eq!(
            run.out,
            "skipping: main.tf [vpc] (would downgrade: target version 0.9.0 is less than current version v1.0.0)\n\
             skipping: main.tf [head] (unpinned, not requested; re-run with --version-unpinned to pin it)\n"
        );
        assert_eq!(run.content, CONTENT);
        assert_eq!(run.summary.written, 0);
    }

    #[tokio::test]
    async fn run_update_dry_run_leaves_file_untouched() {
        let mut options = options(None, None, true);
        options.dry_run = true;

        let run = update(tags_transport(&["v1.0.0", "v3.0.0"]), options).await;

        assert_eq!(
            run.out,
            "would update: main.tf [vpc] (from: v1.0.0, to: v3.0.0)\n\
             would update: main.tf [head] (from: HEAD, to: v3.0.0)\n"
        );
        assert_eq!(run.content, CONTENT);
        assert_eq!(run.summary.updated, 2);
        assert_eq!(run.summary.written, 0);
    }

    #[tokio::test]
    async fn run_update_noop_prints_nothing_and_does_not_write() {
        let run = update(tags_transport(&["v1.0.0"]), options(None, None, false)).await;

        assert_eq!(
            run.out,
            "skipping: main.tf [head] (unpinned, not requested; re-run with --version-unpinned to pin it)\n"
        );
        assert_eq!(run.content, CONTENT);
        assert_eq!(run.summary.written, 0);
    }

    #[tokio::test]
    async fn run_update_reports_fetch_failure_once() {
        let mut transport = MockTagTransport::new();
        transport.expect_list_tag_names().times(1).returning(|url| {
            Err(crate::version::error::TransportError::Timeout {
                url: url.to_string(),
                timeout_ms: 10,
            })
        });

        let run = update(transport, options(None, None, true)).await;

        assert_eq!(run.out, "");
        assert_eq!(run.err.lines().count(), 2);
        assert!(run.err.contains("error: main.tf [vpc]: failed to fetch remote tags"));
        assert!(run.err.contains("error: main.tf [head]: failed to fetch remote tags"));
        assert!(!run.err.contains("not resolved"));
        assert_eq!(run.summary.failures, 2);
        assert_eq!(run.summary.skipped, 0);
        assert_eq!(run.content, CONTENT);
    }
}
