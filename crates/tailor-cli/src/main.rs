//! Tailor CLI
//!
//! Command-line interface for canonicalizing utility classes

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tailor_core::init_tracing;

#[derive(Parser)]
#[command(name = "tailor")]
#[command(about = "Tailor: rewrite utility classes to their canonical spelling")]
#[command(version = tailor_core::VERSION)]
#[command(
    long_about = "Tailor rewrites utility classes to the shortest spelling that generates\n\
the same CSS, and can merge sibling classes into shorthands.\n\
\n\
Examples:\n  \
tailor canonicalize '[display:flex]' w-[64rem]   # → flex w-256\n  \
echo 'mt-1 mr-1 mb-1 ml-1' | tailor canonicalize --stdin --collapse\n  \
tailor signature hover:flex                      # Print the generated CSS\n  \
tailor passes                                    # List canonicalization passes"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.tailorrc.json/.tailorrc.toml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite candidates to their canonical spelling
    Canonicalize {
        /// Candidates; arguments containing spaces are split
        #[arg(help = "Classes to canonicalize")]
        candidates: Vec<String>,

        /// Read whitespace-separated candidates from stdin
        #[arg(long, help = "Read candidates from stdin")]
        stdin: bool,

        /// Root font size in px
        #[arg(long, help = "Compare rem and px values using this root font size")]
        rem_px: Option<f64>,

        /// Merge candidates into shorthands
        #[arg(long, help = "Merge sibling candidates into shorthands (mt-1 mb-1 → my-1)")]
        collapse: bool,

        /// Treat logical properties as physical
        #[arg(long, help = "Treat logical properties as their physical counterparts")]
        logical_to_physical: bool,

        /// Output format
        #[arg(short, long, default_value = "human", help = "Output format")]
        format: OutputFormat,
    },

    /// Print the normalized CSS a candidate generates
    Signature {
        #[arg(help = "Candidate, or variant with --variant")]
        candidate: String,

        /// Treat the input as a variant
        #[arg(long, help = "Print the signature of a variant instead of a utility")]
        variant: bool,

        /// Root font size in px
        #[arg(long, help = "Convert rem values to px using this root font size")]
        rem_px: Option<f64>,
    },

    /// List canonicalization passes in the order they run
    Passes {
        /// Output format
        #[arg(short, long, default_value = "human", help = "Output format")]
        format: OutputFormat,
    },

    /// Show version information
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed build information")]
        detailed: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for programmatic consumption
    Json,
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "tailor=error",
        1 => "tailor=warn",
        2 => "tailor=info",
        3 => "tailor=debug",
        _ => "tailor=trace",
    };
    if std::env::var("RUST_LOG").is_err() {
        // SAFETY: no other thread has been started yet
        unsafe {
            std::env::set_var("RUST_LOG", log_level);
        }
    }
    init_tracing();

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        eprintln!("{} Failed to set thread pool size: {e}", "error:".red().bold());
        std::process::exit(1);
    }

    if let Err(e) = run_command(cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Canonicalize {
            candidates,
            stdin,
            rem_px,
            collapse,
            logical_to_physical,
            format,
        }) => commands::canonicalize_command(
            commands::CanonicalizeArgs {
                candidates,
                stdin,
                rem_px,
                collapse,
                logical_to_physical,
            },
            format,
            cli.config,
        ),

        Some(Commands::Signature {
            candidate,
            variant,
            rem_px,
        }) => commands::signature_command(&candidate, variant, rem_px, cli.config),

        Some(Commands::Passes { format }) => commands::passes_command(format),

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("tailor {}", tailor_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
                println!("  Passes: {}", tailor_rules::PASSES.len());
            } else {
                println!("{}", tailor_core::VERSION);
            }
            Ok(())
        }

        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
