use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("TANGLESCOPE_BUILD_COMMIT"),
    ", ",
    env!("TANGLESCOPE_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "tanglescope")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline analyzer and graph exporter for tangle message dumps.",
    long_about = None,
    after_help = "Examples:\n  tanglescope csv analyse messages.csv -o report.json\n  tanglescope csv analyze messages.csv --stdout --pretty\n  tanglescope csv export messages.csv -o tangle.gexf --limit 10000"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on CSV message dumps (offline-first).
    Csv {
        #[command(subcommand)]
        command: CsvCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CsvCommands {
    /// Analyse a message dump and generate a versioned JSON report.
    #[command(alias = "analyze")]
    #[command(
        after_help = "Examples:\n  tanglescope csv analyse messages.csv -o report.json\n  tanglescope csv analyze messages.csv --stdout"
    )]
    Analyse {
        /// Path to a .csv message dump
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Stop after this many rows
        #[arg(long)]
        limit: Option<u64>,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },

    /// Export the message graph as GEXF for graph tooling.
    Export {
        /// Path to a .csv message dump
        input: PathBuf,

        /// Output graph path (GEXF)
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Stop after this many rows
        #[arg(long)]
        limit: Option<u64>,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Csv { command } => match command {
            CsvCommands::Analyse {
                input,
                report,
                stdout,
                pretty,
                compact,
                limit,
                quiet,
            } => cmd_csv_analyse(input, report, stdout, pretty, compact, limit, quiet),
            CsvCommands::Export {
                input,
                output,
                limit,
                quiet,
            } => cmd_csv_export(input, output, limit, quiet),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

fn cmd_csv_analyse(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    limit: Option<u64>,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    let rep = tanglescope_core::analyze_csv_file(&resolved_input, limit)
        .context("message dump analysis failed")?;
    let json = serialize_report(&rep, pretty, compact)?;

    if stdout {
        print!("{}", json);
        return Ok(());
    }

    let report = report.expect("report required when not using stdout");
    write_output(&report, json.as_bytes())?;
    if !quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    Ok(())
}

fn cmd_csv_export(
    input: PathBuf,
    output: PathBuf,
    limit: Option<u64>,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    let build = tanglescope_core::build_tangle_from_csv(&resolved_input, limit)
        .context("message dump analysis failed")?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    let file = File::create(&output)
        .with_context(|| format!("Failed to write graph: {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    tanglescope_core::write_gexf(&build.graph, &mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write graph: {}", output.display()))?;

    if !quiet {
        eprintln!(
            "OK: graph written -> {} ({} nodes, {} edges, {} rows skipped)",
            output.display(),
            build.graph.node_count(),
            build.graph.edge_count(),
            build.summary.rows_failed
        );
    }
    Ok(())
}

fn serialize_report(
    rep: &tanglescope_core::Report,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn write_output(path: &PathBuf, contents: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, contents)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .csv message dump".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .csv message dump".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "csv" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .csv file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected a .csv file".to_string()),
        ));
    }
    if matches.len() > 1 {
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches)",
                pattern,
                matches.len()
            ),
            Some("pass a single dump file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
