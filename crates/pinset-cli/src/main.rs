mod commands;
mod config;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_LOCK_ERROR, EXIT_MANIFEST_ERROR};
use config::CliConfig;
use pinset_schema::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "pinset",
    version,
    about = "Deterministic dependency-manifest resolver for metapackage recipes"
)]
struct Cli {
    /// Path to a JSON config file (default: ~/.config/pinset/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a new manifest from a built-in preset.
    New {
        /// Package name for the new manifest.
        name: String,
        /// Preset to start from (see `pinset presets`).
        #[arg(long, default_value = "minimal")]
        preset: String,
        /// Destination path.
        #[arg(long, default_value = "pinset.toml")]
        output: PathBuf,
        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Parse and validate manifests, reporting every violation in each.
    Check {
        /// Manifest files (TOML, or YAML by .yaml/.yml extension).
        #[arg(default_value = "pinset.toml")]
        manifests: Vec<PathBuf>,
    },
    /// Print the resolved, name-ordered requirement set.
    Resolve {
        /// Path to manifest file.
        #[arg(default_value = "pinset.toml")]
        manifest: PathBuf,
        /// Output format: json, jsonl, or toml.
        #[arg(long)]
        format: Option<OutputFormat>,
    },
    /// Resolve a manifest and write its lock file next to it.
    Lock {
        /// Path to manifest file.
        #[arg(default_value = "pinset.toml")]
        manifest: PathBuf,
    },
    /// Check lock file integrity and that it still matches the manifest.
    Verify {
        /// Path to manifest file.
        #[arg(default_value = "pinset.toml")]
        manifest: PathBuf,
    },
    /// List built-in presets.
    Presets,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("PINSET_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = match CliConfig::resolve(cli.config.as_deref()) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("error: {msg}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    let json_output = cli.json;

    let result = match cli.command {
        Commands::New {
            name,
            preset,
            output,
            force,
        } => commands::new::run(&name, &preset, &output, force, json_output),
        Commands::Check { manifests } => commands::check::run(&manifests, json_output),
        Commands::Resolve { manifest, format } => {
            let format = format.unwrap_or(if json_output {
                OutputFormat::Json
            } else {
                config.format
            });
            commands::resolve::run(&manifest, format)
        }
        Commands::Lock { manifest } => {
            commands::lock::run(&manifest, &config.lock_name, json_output)
        }
        Commands::Verify { manifest } => {
            commands::verify::run(&manifest, &config.lock_name, json_output)
        }
        Commands::Presets => commands::presets::run(json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:") {
                EXIT_MANIFEST_ERROR
            } else if msg.starts_with("lock error:") {
                EXIT_LOCK_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
