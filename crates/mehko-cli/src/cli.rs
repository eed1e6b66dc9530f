//! Argument definitions for the `mehko` binary.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mehko", version, about = "County ingestion tooling for MEHKO applications")]
pub struct Cli {
    /// Directory holding county JSON documents and the manifest.
    #[arg(long, env = "MEHKO_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Directory where per-application form assets are laid out.
    #[arg(
        long,
        env = "MEHKO_APPLICATIONS_DIR",
        default_value = "applications",
        global = true
    )]
    pub applications_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate one county document, upsert it into the manifest, and
    /// download its PDF forms.
    Process {
        /// County id, e.g. `lake_county_mehko` (resolves to `<data-dir>/<id>.json`).
        county_id: String,
    },

    /// Process every county document found in the data directory.
    Bulk,

    /// Validate county documents without ingesting anything.
    #[command(group(ArgGroup::new("target").required(true).args(["file", "all"])))]
    Validate {
        /// A single county JSON file to validate.
        file: Option<PathBuf>,

        /// Validate every county file in the data directory.
        #[arg(long)]
        all: bool,

        /// Skip the network probe of each pdfUrl.
        #[arg(long)]
        skip_pdf_check: bool,
    },

    /// Upsert application documents into the remote document store.
    Seed(SeedArgs),
}

#[derive(Args)]
#[command(group(ArgGroup::new("input").required(true).multiple(true).args(["file", "path"])))]
pub struct SeedArgs {
    /// One JSON document (single application, array, or id-keyed map).
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Directory of JSON documents.
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Validate and print the write plan without mutating the store.
    #[arg(long)]
    pub dry_run: bool,

    /// Target the local emulator instead of the configured store.
    #[arg(long)]
    pub emulator: bool,

    /// Restrict the run to a single application id.
    #[arg(long)]
    pub only: Option<String>,

    /// Base URL of the document-store API.
    #[arg(long, env = "MEHKO_SEED_URL", default_value = "https://api.mehko.app")]
    pub base_url: String,
}

impl SeedArgs {
    /// Emulator flag wins over the configured base URL.
    pub fn effective_base_url(&self) -> String {
        if self.emulator {
            "http://127.0.0.1:8080".to_string()
        } else {
            self.base_url.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn process_takes_a_county_id() {
        let cli = Cli::parse_from(["mehko", "process", "lake_county_mehko"]);
        let Command::Process { county_id } = cli.command else {
            panic!("expected process subcommand");
        };
        assert_eq!(county_id, "lake_county_mehko");
    }

    #[test]
    fn validate_requires_file_or_all() {
        assert!(Cli::try_parse_from(["mehko", "validate"]).is_err());
        assert!(Cli::try_parse_from(["mehko", "validate", "--all"]).is_ok());
        assert!(Cli::try_parse_from(["mehko", "validate", "data/lake.json"]).is_ok());
    }

    #[test]
    fn seed_requires_file_or_path() {
        assert!(Cli::try_parse_from(["mehko", "seed"]).is_err());
        assert!(Cli::try_parse_from(["mehko", "seed", "--file", "apps.json", "--dry-run"]).is_ok());
    }

    #[test]
    fn emulator_overrides_base_url() {
        let cli = Cli::parse_from([
            "mehko",
            "seed",
            "--file",
            "apps.json",
            "--emulator",
            "--base-url",
            "https://api.mehko.app",
        ]);
        let Command::Seed(args) = cli.command else {
            panic!("expected seed subcommand");
        };
        assert_eq!(args.effective_base_url(), "http://127.0.0.1:8080");
    }
}
