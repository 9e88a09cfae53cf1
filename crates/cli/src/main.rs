// prodcat CLI - build classified, deduplicated product catalogs from exports

mod catalog;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::EXIT_SUCCESS;

/// Environment variable holding a tracing filter directive (e.g. `debug`).
const LOG_ENV: &str = "PRODCAT_LOG";

#[derive(Parser)]
#[command(name = "prodcat")]
#[command(about = "Classify and reconcile product catalog exports into one catalog")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log debug detail (per-merge decisions) to stderr
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Log only warnings and errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the catalog from the sources named in a TOML config
    #[command(after_help = "\
Examples:
  prodcat build catalog.toml
  prodcat build catalog.toml --json
  prodcat build catalog.toml --output-dir public/data
  prodcat build catalog.toml --dry-run -v")]
    Build {
        /// Path to the catalog config file
        config: PathBuf,

        /// Write outputs here instead of the config's output.dir
        #[arg(long, value_name = "DIR", env = "PRODCAT_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Print the summary as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Run the full pipeline but write nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a catalog config without reading sources
    #[command(after_help = "\
Examples:
  prodcat validate catalog.toml")]
    Validate {
        /// Path to the catalog config file
        config: PathBuf,
    },

    /// Classify a single record and show the rule that fired
    #[command(after_help = "\
Examples:
  prodcat classify --code KHV001 --name 'Turkish Coffee 250g'
  prodcat classify --name 'Baskılı Poşet' --info 'logo' --json")]
    Classify {
        /// Product code
        #[arg(long, default_value = "")]
        code: String,

        /// Product name
        #[arg(long)]
        name: String,

        /// Descriptive info
        #[arg(long)]
        info: Option<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the taxonomy decision table in evaluation order
    #[command(after_help = "\
Examples:
  prodcat rules
  prodcat rules --json")]
    Rules {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  prodcat-catalog ", env!("CARGO_PKG_VERSION"),
        "\nbuild:   ", env!("BUILD_PROFILE"),
        "\ntarget:  ", env!("TARGET"),
    )
}

/// Install the stderr log subscriber. `-v`/`-q` win over the environment.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = if verbose || quiet {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Build {
            config,
            output_dir,
            json,
            dry_run,
        } => catalog::cmd_build(config, output_dir, json, dry_run),
        Commands::Validate { config } => catalog::cmd_validate(config),
        Commands::Classify {
            code,
            name,
            info,
            json,
        } => catalog::cmd_classify(&code, &name, info.as_deref(), json),
        Commands::Rules { json } => catalog::cmd_rules(json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
