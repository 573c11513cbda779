//! `merge-config` command-line tool.
//!
//! Merges the default documents, the user document, and the forced document
//! into one effective configuration plus a debug copy.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use config_merge::{run, MergeRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "merge-config")]
#[command(about = "Merge default, user, and forced configuration layers", version)]
struct Cli {
    /// Directory holding the default documents (*.yml, *.yaml, *.toml)
    defaults_dir: PathBuf,

    /// User override document; created empty if missing
    user: PathBuf,

    /// Where to write the effective configuration
    output: PathBuf,

    /// Where to write the debug copy of the effective configuration
    debug_output: PathBuf,

    /// Forced override document (default: <DEFAULTS_DIR>/forced.yml).
    /// <DEFAULTS_DIR>/forced.yml is never read as a default either way.
    #[arg(long)]
    forced: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn request(&self) -> MergeRequest {
        let request = MergeRequest::new(
            &self.defaults_dir,
            &self.user,
            &self.output,
            &self.debug_output,
        );
        match &self.forced {
            Some(forced) => request.with_forced(forced),
            None => request,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("config_merge={level},merge_config={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli.request()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
