use anyhow::Result;
use clap::Parser;
use farm::commands::{self, Options};
use std::path::PathBuf;

/// farm - dotfile symlink farm
///
/// Link the files of one or more source trees into target directories, and
/// keep track of every symlink created in a lockfile so dead ones can be
/// cleaned up later.
///
/// Examples:
///   farm link           # Link all packages without environments
///   farm link work      # Also link packages for the "work" environment
///   farm -n link        # Show what would be linked
///   farm status -v      # List tracked symlinks
///   farm status -p nvim # Only the symlinks of package "nvim"
#[derive(Parser, Debug)]
#[command(author, version = env!("FARM_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to farm.yaml; also via FARM_CONFIG)
    #[arg(
        long = "config",
        short = 'c',
        env = "FARM_CONFIG",
        value_name = "PATH",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// Lockfile (defaults to farm.lock; also via FARM_LOCKFILE)
    #[arg(
        long = "lockfile",
        short = 'l',
        env = "FARM_LOCKFILE",
        value_name = "PATH",
        global = true
    )]
    pub lockfile: Option<PathBuf>,

    /// Show what would change without touching the filesystem
    #[arg(long = "dry-run", short = 'n', global = true)]
    pub dry_run: bool,

    /// Print every link created or removed
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Create symlinks and remove dead ones
    Link(EnvironmentArgs),

    /// Remove every tracked symlink
    Unlink(EnvironmentArgs),

    /// Show tracked symlinks
    Status(StatusArgs),
}

#[derive(clap::Args, Debug)]
pub struct EnvironmentArgs {
    /// Also include packages for this environment
    #[arg(value_name = "ENVIRONMENT")]
    pub environment: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub env: EnvironmentArgs,

    /// Only show symlinks recorded for this package
    #[arg(long, short = 'p', value_name = "NAME")]
    pub package: Option<String>,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            config: self.config.clone(),
            lockfile: self.lockfile.clone(),
            dry_run: self.dry_run,
            verbose: self.verbose,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let runtime = farm::runtime::RealRuntime;
    let options = cli.options();

    match &cli.command {
        Commands::Link(args) => commands::link(&runtime, &options, args.environment.as_deref())?,
        Commands::Unlink(args) => commands::unlink(&runtime, &options, args.environment.as_deref())?,
        Commands::Status(args) => commands::status(
            &runtime,
            &options,
            args.env.environment.as_deref(),
            args.package.as_deref(),
        )?,
    }
    Ok(())
}
