//! `list` command

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::cli::report::{Reporter, RunSummary};
use crate::cli::session::{ModuleEntry, Session};

pub struct ListOptions {
    /// Also fetch and print remote tag information
    pub remote: bool,
}

/// Print the local (and optionally remote) version of every git module in `files`
pub async fn run_list<O: Write, E: Write>(
    session: &Session,
    files: &[PathBuf],
    options: &ListOptions,
    reporter: &mut Reporter<O, E>,
) -> std::io::Result<RunSummary> {
    let mut summary = RunSummary::default();

    for path in files {
        let document = match session.load(path).await {
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
        info!("Listing {} modules in {}", modules.len(), path.display());

        if options.remote {
            for failure in session.fetch_remotes(&mut modules).await {
                reporter.failure(format_args!("{}: {}", failure.module, failure.message))?;
                summary.failures += 1;
            }
        }

        for module in &modules {
            if options.remote && module.version.remote().is_none() {
                continue;
            }
            reporter.line(format_module(module, options.remote))?;
        }
    }

    Ok(summary)
}

fn format_module(module: &ModuleEntry, remote: bool) -> String {
    let local = module.version.local_version_label();
    if !remote {
        return format!("module: {} (local: {})", module.name, local);
    }

    let tags = module.version.remote();
    let latest = tags
        .and_then(|t| t.latest())
        .map_or("none", |tag| tag.name.as_str());
    let total = tags.map_or(0, |t| t.len());
    format!(
        "module: {} (local: {}, remote: {}, total versions: {})",
        module.name, local, latest, total
    )
}
