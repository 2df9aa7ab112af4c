use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use git_semtag::cli::{resolve_changelog, resolve_version, ResolveOptions};
use git_semtag::config::{self, LOCAL_CONFIG_FILE};
use git_semtag::git::Git2Repository;
use git_semtag::ui;

#[derive(Parser)]
#[command(
    name = "git-semtag",
    version,
    about = "Compute the next semantic version tag and changelog from git history"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Resolve for this branch instead of HEAD's")]
    branch: Option<String>,

    #[arg(long, global = true, help = "Use this build number instead of the computed one")]
    build: Option<u64>,

    #[arg(short, long, global = true, help = "Print debug logs to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default configuration file
    GenerateConfig,
    /// Print the new release version
    GetVersion,
    /// Print a changelog with all changes since the last release
    GetChangelog,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if let Command::GenerateConfig = args.command {
        let path = args.config.as_deref().unwrap_or(LOCAL_CONFIG_FILE);
        config::write_default_config(path)
            .with_context(|| format!("error generating config {}", path))?;
        ui::display_success(&format!("Wrote default configuration to {}", path));
        return Ok(());
    }

    let config = config::load_config(args.config.as_deref()).context("error loading config")?;
    let repo = Git2Repository::open(".").context("error opening repository")?;
    let options = ResolveOptions {
        branch: args.branch,
        build: args.build,
    };

    match args.command {
        Command::GetVersion => {
            let outcome =
                resolve_version(&repo, &config, &options).context("error resolving version")?;
            ui::display_warnings(&outcome.warnings);
            ui::display_version(outcome.tag.as_deref());
        }
        Command::GetChangelog => {
            let outcome = resolve_changelog(&repo, &config, &options)
                .context("error generating changelog")?;
            ui::display_warnings(&outcome.warnings);
            ui::display_changelog(&outcome.changelog);
        }
        Command::GenerateConfig => {}
    }

    Ok(())
}
