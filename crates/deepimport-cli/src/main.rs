#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::{Parser, ValueEnum};
use deepimport_core::{Config, ScanMode, TieBreak};
use miette::Result;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "deepimport")]
#[command(author, version, about = "Rewrite bare module imports into deep imports", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Rewrite the bare imports of every file in a dependency graph
    Convert {
        /// Dependency graph JSON (file -> files that import it)
        #[arg(long, value_name = "FILE")]
        graph: PathBuf,

        /// Dependency store root (usually node_modules)
        #[arg(long, value_name = "DIR")]
        store: PathBuf,

        /// How to find import statements
        #[arg(long, value_enum)]
        scan: Option<ScanArg>,

        /// How to pick between several matching files
        #[arg(long, value_enum)]
        tie_break: Option<TieBreakArg>,

        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// List the entry point of every package in a dependency store
    Discover {
        /// Dependency store root (usually node_modules)
        #[arg(long, value_name = "DIR")]
        store: PathBuf,
    },

    /// Print the bare imports found in a file
    Scan {
        /// Source file to scan
        file: PathBuf,

        /// How to find import statements
        #[arg(long, value_enum)]
        scan: Option<ScanArg>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScanArg {
    Lexical,
    Pattern,
}

impl From<ScanArg> for ScanMode {
    fn from(arg: ScanArg) -> Self {
        match arg {
            ScanArg::Lexical => ScanMode::Lexical,
            ScanArg::Pattern => ScanMode::Pattern,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TieBreakArg {
    First,
    NearestScope,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::First => TieBreak::First,
            TieBreakArg::NearestScope => TieBreak::NearestScope,
        }
    }
}

/// Resolve `path` against `cwd` unless it is already absolute.
fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        dunce::simplified(path).to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Version needs neither config nor logging
    let command = match cli.command {
        None | Some(Commands::Version) => return commands::version::run(cli.json),
        Some(command) => command,
    };

    let config = match Config::load(cwd.clone()) {
        Ok(config) => config,
        Err(e) => commands::fail(&e, cli.json),
    }
    .with_verbosity(cli.verbose)
    .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match command {
        Commands::Version => commands::version::run(cli.json),
        Commands::Convert {
            graph,
            store,
            scan,
            tie_break,
            dry_run,
        } => {
            let config = config
                .with_scan(scan.map(Into::into))
                .with_tie_break(tie_break.map(Into::into));
            let span = tracing::info_span!("convert", cmd = "convert", cwd = %cwd.display());
            let _guard = span.enter();
            commands::convert::run(
                &config,
                commands::convert::ConvertAction {
                    cwd: cwd.clone(),
                    graph: absolutize(&cwd, &graph),
                    store_root: absolutize(&cwd, &store),
                    dry_run,
                },
            )
        }
        Commands::Discover { store } => {
            let span = tracing::info_span!("discover", cmd = "discover", cwd = %cwd.display());
            let _guard = span.enter();
            commands::discover::run(&absolutize(&cwd, &store), cli.json)
        }
        Commands::Scan { file, scan } => {
            let mode = scan.map_or(config.convert.scan, Into::into);
            commands::scan::run(&absolutize(&cwd, &file), mode, cli.json)
        }
    }
}
