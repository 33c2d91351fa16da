use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use versionfile::{
    commands::{
        create::{self, CreateCommand},
        dist::{self, DistCommand},
        package::{self, PackageCommand},
        yaml::{self, YamlCommand},
    },
    errors::{report_error, Outcome, EXIT_ERROR},
    logger, GlobalOpts, VersionOptions,
};
use versionfile_config::Settings;

#[derive(Parser)]
#[command(name = "versionfile")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Create Windows version files for PyInstaller",
    long_about = "Create a Windows version-resource file for PyInstaller's --version-file from \
command-line arguments, a YAML file, or the metadata of an installed Python distribution."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create version file from arguments
    Create(CreateCommand),
    /// Create version file from YAML file
    Yaml(YamlCommand),
    /// Create version file from an installed distribution
    Dist(DistCommand),
    /// Create version file from a local package
    Package(PackageCommand),
}

impl Commands {
    fn options(&self) -> &VersionOptions {
        match self {
            Commands::Create(cmd) => &cmd.options,
            Commands::Yaml(cmd) => &cmd.options,
            Commands::Dist(cmd) => &cmd.options,
            Commands::Package(cmd) => &cmd.options,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing();

    let exit_code = match run(&cli) {
        Ok(outcome) => {
            if !cli.global.quiet {
                println!("{}", outcome.path.display());
            }
            outcome.exit_code
        }
        Err(e) => {
            report_error(&e, cli.command.options().traceback);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<Outcome> {
    let settings = Settings::load().context("Failed to load versionfile settings")?;

    match &cli.command {
        Commands::Create(cmd) => create::handle_create(cmd, &settings),
        Commands::Yaml(cmd) => yaml::handle_yaml(cmd, &settings),
        Commands::Dist(cmd) => dist::handle_dist(cmd, &cli.global, &settings),
        Commands::Package(cmd) => package::handle_package(cmd, &cli.global, &settings),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logger::verbosity_to_filter().into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
