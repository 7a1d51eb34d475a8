//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Wheelwright - reproducible cross-language build orchestrator
///
/// Builds a cargo workspace unit into a native-extension wheel through
/// a shared content-addressed cache, stages it, and installs or
/// composes it downstream without touching any remote index.
#[derive(Parser, Debug)]
#[command(name = "wheelwright")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "WHEELWRIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .wheelwright.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Warm the workspace cache, build one unit into a wheel, stage it
    Build(BuildArgs),

    /// Install the staged wheel into a prefix, fully offline
    Install(InstallArgs),

    /// Rewrite a downstream pyproject.toml with the declared
    /// dependencies plus the locally built wheel
    Compose(ComposeArgs),

    /// Manage the shared artifact store
    Cache(CacheArgs),

    /// Check build tools and store health
    Status,

    /// Initialize a project-local .wheelwright.toml config
    Init(InitArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Workspace root (defaults to current directory)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Package name of the unit to build
    #[arg(short, long)]
    pub package: Option<String>,

    /// Manifest path of the unit to build
    #[arg(short, long)]
    pub manifest_path: Option<PathBuf>,

    /// Staging directory (defaults to <workspace>/dist/staging)
    #[arg(short, long)]
    pub staging: Option<PathBuf>,

    /// Clear stale staged wheels instead of failing
    #[arg(long)]
    pub fresh_staging: bool,

    /// Allow the lockfile to be updated (changes the cache key)
    #[arg(long)]
    pub no_frozen: bool,

    /// Warm-compile the whole workspace, not just the selected unit
    #[arg(long)]
    pub warm_all: bool,
}

/// Arguments for the install command
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Workspace root (defaults to current directory)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Staging directory holding the built wheel
    #[arg(short, long)]
    pub staging: Option<PathBuf>,

    /// Install prefix for the package tree
    #[arg(long)]
    pub prefix: Option<PathBuf>,
}

/// Arguments for the compose command
#[derive(Parser, Debug)]
pub struct ComposeArgs {
    /// Workspace root (defaults to current directory)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Downstream pyproject.toml to rewrite
    #[arg(long)]
    pub pyproject: Option<PathBuf>,

    /// Native-extension package name (inferred from staging if omitted)
    #[arg(short, long)]
    pub package: Option<String>,

    /// Third-party dependency to declare (repeatable, order preserved)
    #[arg(short, long = "dep")]
    pub dependency: Vec<String>,

    /// Staging directory to resolve the native wheel from
    #[arg(short, long)]
    pub staging: Option<PathBuf>,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Cache action
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List published store entries
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Remove entries older than the retention window
    Gc {
        /// Age threshold in days (defaults to cache.max_age_days)
        #[arg(long)]
        days: Option<u32>,

        /// Show what would be removed without removing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove every store entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table
    Table,
    /// JSON array
    Json,
    /// One name per line
    Plain,
}

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite existing .wheelwright.toml
    #[arg(short, long)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_assertions() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_args_parse() {
        let cli = Cli::parse_from(["wheelwright", "build", "-p", "core", "--fresh-staging"]);
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.package.as_deref(), Some("core"));
                assert!(args.fresh_staging);
                assert!(!args.no_frozen);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn compose_deps_keep_order() {
        let cli = Cli::parse_from([
            "wheelwright",
            "compose",
            "--dep",
            "numpy",
            "--dep",
            "torch",
        ]);
        match cli.command {
            Commands::Compose(args) => {
                assert_eq!(args.dependency, vec!["numpy", "torch"]);
            }
            _ => panic!("expected compose"),
        }
    }
}
