use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use modpin::cli::{
    ListOptions, Reporter, Session, UpdateOptions, discover, run_list, run_update,
};
use modpin::config::Config;
use modpin::logging::{self, LogFormat, LogOptions};
use modpin::version::decision::UpdatePolicy;

#[derive(Parser)]
#[command(name = "modpin")]
#[command(
    version,
    about = "Inspect and re-pin the versions of git-hosted Terraform/Terragrunt modules"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Path to search (recursively) for module files; may be a file or a directory
    #[arg(short, long, global = true, default_value = ".")]
    path: PathBuf,

    /// File extensions to search, comma separated [default: .hcl,.tf]
    #[arg(short, long, global = true, value_delimiter = ',')]
    extensions: Option<Vec<String>>,

    /// Config file (defaults to $XDG_CONFIG_HOME/modpin/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overridden by MODPIN_LOG [default: warn]
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List the local version of each module, optionally with remote versions
    List {
        /// Fetch the latest remote version of every module
        #[arg(short, long)]
        remote: bool,
    },
    /// Update the pinned version of each module
    Update(UpdateArgs),
}

#[derive(Args)]
struct UpdateArgs {
    /// Update to the latest available version (the default without a constraint)
    #[arg(long, conflicts_with_all = ["target_version", "constraint"])]
    latest: bool,

    /// Version constraint restricting the target, e.g. ">= 1.x < 3.0.1"
    #[arg(short, long, conflicts_with = "target_version")]
    constraint: Option<String>,

    /// Update to this version without checking that it exists remotely
    #[arg(short = 'v', long = "version")]
    target_version: Option<String>,

    /// Pin sources that currently track the default branch
    #[arg(long)]
    version_unpinned: bool,

    /// Allow moving to a lower version than the current pin
    #[arg(long)]
    allow_downgrades: bool,

    /// Print what would change without writing files
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(&LogOptions {
        level: cli.global.log_level.clone(),
        format: cli.global.log_format,
        file: cli.global.log_file.clone(),
    })?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.global.config.as_deref()).context("failed to load config")?;
    let extensions = cli
        .global
        .extensions
        .clone()
        .unwrap_or_else(|| config.extensions.clone());

    // Invalid input must fail before any file is read or written.
    let command = match cli.command {
        Command::List { remote } => Prepared::List(ListOptions { remote }),
        Command::Update(args) => {
            let constraint = if args.latest {
                None
            } else {
                args.constraint.as_deref()
            };
            let policy = UpdatePolicy::from_input(
                args.target_version.as_deref(),
                constraint,
                args.allow_downgrades,
                args.version_unpinned,
            )?;
            Prepared::Update(UpdateOptions {
                policy,
                dry_run: args.dry_run,
            })
        }
    };

    let mut reporter = Reporter::new(io::stdout(), io::stderr());
    let (files, _) = discover(&cli.global.path, &extensions, &mut reporter)?;
    let session = Session::from_config(&config);

    let summary = match command {
        Prepared::List(options) => run_list(&session, &files, &options, &mut reporter).await?,
        Prepared::Update(options) => run_update(&session, &files, &options, &mut reporter).await?,
    };
    tracing::info!("Finished: {:?}", summary);

    Ok(())
}

enum Prepared {
    List(ListOptions),
    Update(UpdateOptions),
}
