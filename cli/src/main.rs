//! Keel CLI.

mod config;
mod manifest;
mod output;
mod runner;

use {
    crate::{config::ConfigFile, output::OutputFormat, runner::Runner},
    clap::{Parser, Subcommand},
    keel::result::Compare,
    std::{fs, path::Path},
};

const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

#[derive(Subcommand)]
enum SubCommand {
    /// Compile transaction manifests and print or write the compiled
    /// messages.
    Compile {
        /// Path to a manifest (`.yaml`, `.yml` or `.json`) or a directory
        /// containing them.
        #[arg(required = true)]
        manifest: String,

        /// Path to the config file.
        #[arg(short, long)]
        config: Option<String>,
        /// Output format. Overrides the config file.
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Directory to write `<name>.compiled.<ext>` files to, instead of
        /// printing to stdout.
        #[arg(long)]
        out_dir: Option<String>,
        /// Enable verbose mode. Disabled by default.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Compile transaction manifests and compare each against its `expected`
    /// section.
    Verify {
        /// Path to a manifest (`.yaml`, `.yml` or `.json`) or a directory
        /// containing them.
        #[arg(required = true)]
        manifest: String,

        /// Path to the config file for validation checks.
        #[arg(short, long)]
        config: Option<String>,
        /// Skip comparing lifetime tokens, but compare everything else.
        ///
        /// Note this flag will override a `Compare::LifetimeToken` check in
        /// the config file.
        #[arg(long)]
        ignore_lifetime_token: bool,
        /// Enable verbose mode for comparisons. Disabled by default.
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Parser)]
struct Cli {
    #[clap(subcommand)]
    pub command: SubCommand,
}

fn search_paths(
    path: &str,
    extensions: &[&str],
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    fn search_path_recursive(
        path: &Path,
        extensions: &[&str],
        result: &mut Vec<String>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if path.is_dir() {
            for entry in fs::read_dir(path)? {
                search_path_recursive(&entry?.path(), extensions, result)?;
            }
        } else if path
            .extension()
            .is_some_and(|ext| extensions.iter().any(|candidate| ext == *candidate))
        {
            result.push(path.display().to_string());
        }
        Ok(())
    }

    let mut result = Vec::new();
    search_path_recursive(Path::new(path), extensions, &mut result)?;
    // `read_dir` order is platform dependent.
    result.sort();
    Ok(result)
}

fn load_config(path: Option<&str>) -> Result<Option<ConfigFile>, Box<dyn std::error::Error>> {
    path.map(ConfigFile::try_load).transpose()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    trezoa_logger::setup_with_default("warn");

    match Cli::parse().command {
        SubCommand::Compile {
            manifest,
            config,
            format,
            out_dir,
            verbose,
        } => {
            let config = load_config(config.as_deref())?;
            let nonces = match &config {
                Some(config) => config.nonce_values()?,
                None => Default::default(),
            };
            let format = format
                .or_else(|| config.as_ref().and_then(|config| config.format))
                .unwrap_or_default();

            let manifests = search_paths(&manifest, MANIFEST_EXTENSIONS)?;

            Runner::new(nonces, verbose).compile_all(
                &manifests,
                format,
                out_dir.as_deref().map(Path::new),
            )?
        }
        SubCommand::Verify {
            manifest,
            config,
            ignore_lifetime_token,
            verbose,
        } => {
            let (mut checks, nonces) = match load_config(config.as_deref())? {
                Some(config) => {
                    let nonces = config.nonce_values()?;
                    (config.checks, nonces)
                }
                // Defaults to all checks.
                None => (Compare::everything(), Default::default()),
            };
            if ignore_lifetime_token {
                checks.retain(|check| *check != Compare::LifetimeToken);
            }

            let manifests = search_paths(&manifest, MANIFEST_EXTENSIONS)?;

            let failures = Runner::new(nonces, verbose).verify_all(&manifests, &checks);
            if failures > 0 {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
