//! archspec CLI: resolve, compare and inspect target architectures.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "archspec", version, about = "Target architecture and triple resolution")]
struct Cli {
    /// Log resolution details (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a triple and show its properties
    Resolve {
        /// Triple (e.g., armv7s-apple-ios, x86_64, systemArch64)
        triple: String,
        /// Fill unspecified components from this platform
        #[arg(long)]
        platform: Option<String>,
        /// Fill unspecified components from a .platform.toml file
        #[arg(long, conflicts_with = "platform")]
        platform_file: Option<PathBuf>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Report whether two triples match exactly or compatibly
    Compare {
        /// First triple
        a: String,
        /// Second triple
        b: String,
    },
    /// Fill the unspecified parts of one triple from another
    Merge {
        /// Triple whose specified components are kept
        base: String,
        /// Triple supplying the rest
        other: String,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// List architecture names starting with a prefix
    Complete {
        /// Prefix (all names if omitted)
        prefix: Option<String>,
    },
    /// Resolve a cpu type/subtype tuple from a binary header
    Cpu {
        /// Object format (mach-o, elf, coff)
        format: String,
        /// CPU type (decimal or 0x-prefixed hex)
        cpu_type: String,
        /// CPU subtype (decimal, 0x-prefixed hex, or "any")
        cpu_subtype: String,
        /// Output format (text, json)
        #[arg(long)]
        output: Option<String>,
    },
    /// Manage platforms
    Platform {
        #[command(subcommand)]
        action: PlatformAction,
    },
}

#[derive(Subcommand)]
enum PlatformAction {
    /// List builtin and project platforms
    List,
    /// Show details of a platform
    Describe {
        /// Platform name
        name: String,
        /// Output format (default: human-readable, "toml" for TOML)
        #[arg(long)]
        format: Option<String>,
    },
    /// Validate a .platform.toml file
    Validate {
        /// Path to the platform file
        path: PathBuf,
    },
    /// Generate a template .platform.toml
    Template {
        /// Platform name
        name: String,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Resolve {
            triple,
            platform,
            platform_file,
            format,
        } => commands::resolve::run(
            &cwd,
            &triple,
            platform.as_deref(),
            platform_file.as_deref(),
            format.as_deref(),
        ),

        Commands::Compare { a, b } => commands::compare::run(&a, &b),

        Commands::Merge {
            base,
            other,
            format,
        } => commands::merge::run(&base, &other, format.as_deref()),

        Commands::Complete { prefix } => commands::complete::run(prefix.as_deref()),

        Commands::Cpu {
            format,
            cpu_type,
            cpu_subtype,
            output,
        } => commands::cpu::run(&format, &cpu_type, &cpu_subtype, output.as_deref()),

        Commands::Platform { action } => match action {
            PlatformAction::List => commands::platform::list(&cwd),
            PlatformAction::Describe { name, format } => {
                commands::platform::describe(&name, &cwd, format.as_deref())
            }
            PlatformAction::Validate { path } => commands::platform::validate(&path),
            PlatformAction::Template { name, output } => {
                commands::platform::template(&name, output.as_deref())
            }
        },
    }
}
