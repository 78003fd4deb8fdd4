//! Post-quantum signature cross-verification tool
//!
//! Subcommands:
//! 1. `sign`: generate a reference signature, self-verify, write artifacts
//! 2. `verify`: verify artifacts written by the library under test
//! 3. `round-trip`: `sign` followed by `verify` of the reference's own artifacts

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cross_verify::config::{self, CrossVerifyConfig};
use cross_verify::{CrossVerifier, CrossVerifyError, FsArtifactStore, Outcome, SelfCheck, Side};
use pqc_signer::{backend_for, Scheme};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Dilithium5 / ML-DSA-87 interoperability checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "cross-verify.toml")]
    config: PathBuf,

    /// Artifact directory (overrides config file)
    #[arg(long)]
    artifact_dir: Option<PathBuf>,

    /// Exit 2 for missing artifacts and 3 for configuration errors
    #[arg(long, default_value_t = false)]
    distinct_exit_codes: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate, self-verify and write reference artifacts
    Sign {
        /// Scheme: dilithium5 or mldsa87
        #[arg(short, long)]
        scheme: String,
    },
    /// Verify artifacts produced by the other implementation
    Verify {
        /// Scheme: dilithium5 or mldsa87
        #[arg(short, long)]
        scheme: String,

        /// Which producer's artifacts to read
        #[arg(long, value_enum, default_value_t = SideArg::Library)]
        side: SideArg,
    },
    /// Sign, then verify the reference's own artifacts
    RoundTrip {
        /// Scheme: dilithium5 or mldsa87
        #[arg(short, long)]
        scheme: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SideArg {
    Library,
    Reference,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Library => Side::Library,
            SideArg::Reference => Side::Reference,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Initialize logging
    init_logging(&args.log_level)?;

    // 2. Load configuration
    let mut config = match load_configuration(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            let code = Outcome::Configuration.exit_code(args.distinct_exit_codes);
            std::process::exit(code);
        }
    };

    // Command line arguments override config file
    if let Some(dir) = args.artifact_dir {
        config.artifact_dir = dir;
    }
    if args.distinct_exit_codes {
        config.distinct_exit_codes = true;
    }

    info!("Artifact directory: {}", config.artifact_dir.display());

    // 3. Run
    let outcome = match run(&args.command, &config) {
        Ok(outcome) => outcome,
        Err(e) => {
            let outcome = Outcome::from_error(&e);
            match outcome {
                Outcome::Precondition => {
                    error!("Precondition failed, verification not attempted: {}", e);
                    println!("\nCannot verify: {}", e);
                }
                _ => {
                    error!("{}", e);
                    println!("\n✗ {}", e);
                }
            }
            outcome
        }
    };

    std::process::exit(outcome.exit_code(config.distinct_exit_codes));
}

fn run(command: &Command, config: &CrossVerifyConfig) -> cross_verify::Result<Outcome> {
    let store = FsArtifactStore;

    match command {
        Command::Sign { scheme } => {
            let backend = backend_for(parse_scheme(scheme)?);
            let report = SelfCheck::new(&store, backend.as_ref(), config).run()?;
            println!("{}", report);
            println!("✓ {} signature generation complete", report.scheme);
            Ok(Outcome::Passed)
        }
        Command::Verify { scheme, side } => {
            let backend = backend_for(parse_scheme(scheme)?);
            let verdict =
                CrossVerifier::new(&store, backend.as_ref(), config).run((*side).into())?;
            println!("{}", verdict);
            Ok(Outcome::from_verdict(verdict.passed))
        }
        Command::RoundTrip { scheme } => {
            let backend = backend_for(parse_scheme(scheme)?);
            let report = SelfCheck::new(&store, backend.as_ref(), config).run()?;
            println!("{}", report);

            let verdict =
                CrossVerifier::new(&store, backend.as_ref(), config).run(Side::Reference)?;
            println!("{}", verdict);
            Ok(Outcome::from_verdict(verdict.passed))
        }
    }
}

fn parse_scheme(name: &str) -> cross_verify::Result<Scheme> {
    name.parse::<Scheme>().map_err(CrossVerifyError::from)
}

/// Initialize logging system
fn init_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => {
            eprintln!("⚠️  Unknown log level: {}, using INFO", log_level);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Load configuration file, falling back to `CROSS_VERIFY_*` env vars
fn load_configuration(config_path: &Path) -> Result<CrossVerifyConfig> {
    if !config_path.exists() {
        warn!(
            "Configuration file {} does not exist, using environment and defaults",
            config_path.display()
        );
        return config::load_config_from_env().context("Failed to load configuration from env");
    }

    info!("Loading configuration: {}", config_path.display());
    config::load_config(config_path).context("Failed to load configuration")
}
