use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use dmmwire_core::{AnalysisOptions, ProtocolVariant, Report};
use glob::glob;
use tracing::Level;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("DMMWIRE_BUILD_COMMIT"),
    ", ",
    env!("DMMWIRE_BUILD_DATE"),
    ")"
);

/// `.hex` and `.txt` inputs are hex text; anything else is raw bytes.
const INPUT_HINT: &str = "use a .hex or .txt hex dump, or any other file as raw bytes";

#[derive(Parser, Debug)]
#[command(name = "dmmwire")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline decoder for serial multimeter captures (Brymen BM25x / Cyrustek ES519XX).",
    long_about = None,
    after_help = "Examples:\n  dmmwire capture decode bm257.bin --protocol bm25x -o report.json\n  dmmwire capture analyze ut61e.hex -p es519xx-19200-14b --stdout\n  dmmwire protocols"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on recorded serial captures (raw bytes or hex dumps).
    Capture {
        #[command(subcommand)]
        command: CaptureCommands,
    },
    /// List the supported protocol variants.
    Protocols,
}

#[derive(Subcommand, Debug)]
enum CaptureCommands {
    /// Decode a capture and generate a versioned JSON report.
    #[command(visible_alias = "analyze", alias = "analyse")]
    #[command(
        after_help = "Examples:\n  dmmwire capture decode bm257.bin --protocol bm25x -o report.json\n  dmmwire capture analyse es51922.hex -p es519xx-19200-14b --stdout --pretty"
    )]
    Decode {
        /// Path to a capture (.bin/.raw bytes, .hex/.txt dump); glob patterns allowed
        input: PathBuf,

        /// Protocol variant of the meter (see `dmmwire protocols`)
        #[arg(short = 'p', long, value_parser = parse_protocol)]
        protocol: ProtocolVariant,

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

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any packet was rejected
        #[arg(long)]
        strict: bool,

        /// List packet rejections after decoding
        #[arg(long)]
        list_rejections: bool,

        /// Clear bit 7 of every byte (7-bit cables with parity)
        #[arg(long)]
        mask_parity: bool,
    },
}

struct DecodeArgs {
    input: PathBuf,
    protocol: ProtocolVariant,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_rejections: bool,
    mask_parity: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Capture { command } => match command {
            CaptureCommands::Decode {
                input,
                protocol,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_rejections,
                mask_parity,
            } => cmd_capture_decode(DecodeArgs {
                input,
                protocol,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_rejections,
                mask_parity,
            }),
        },
        Commands::Protocols => {
            cmd_protocols();
            Ok(())
        }
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

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_protocol(value: &str) -> Result<ProtocolVariant, String> {
    value.parse().map_err(|err| {
        let names = ProtocolVariant::ALL
            .iter()
            .map(|variant| variant.name())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{err} (expected one of: {names})")
    })
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
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_protocols() {
    for variant in ProtocolVariant::ALL {
        let profile = variant.profile();
        println!(
            "{:<28} {:>5} baud  {:>2} byte frames  {} digits",
            profile.name,
            profile.baud_rate,
            profile.frame_len,
            profile.digit_count()
        );
        println!("    {} ({})", profile.description, profile.chips.join(", "));
    }
}

fn cmd_capture_decode(args: DecodeArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let report_path = if args.stdout {
        None
    } else {
        Some(args.report.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report_path.as_ref() {
        let report_abs = report_path
            .parent()
            .map(|parent| {
                if parent.as_os_str().is_empty() {
                    fs::canonicalize(".")
                } else {
                    fs::canonicalize(parent)
                }
            })
            .transpose()
            .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
        if let Some(report_dir) = report_abs {
            let report_target = report_dir.join(
                report_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
            );
            if report_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "report path must differ from input: {}",
                        report_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", args.input.display()),
            Some(INPUT_HINT.to_string()),
        ));
    }

    let mut options = AnalysisOptions::new(args.protocol);
    options.mask_parity = args.mask_parity;
    tracing::info!(
        input = %resolved_input.display(),
        protocol = %args.protocol,
        "decoding capture"
    );
    let rep = dmmwire_core::analyze_capture_file(&resolved_input, &options)
        .context("capture decoding failed")?;
    let json = serialize_report(&rep, args.pretty, args.compact)?;

    match report_path {
        None => {
            println!("{}", json);
        }
        Some(report_path) => {
            if let Some(parent) = report_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report_path, json)
                .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
            if !args.quiet {
                eprintln!(
                    "OK: {} measurements, {} rejected -> {}",
                    rep.measurements.len(),
                    rejected_frames(&rep),
                    report_path.display()
                );
            }
        }
    }

    if args.list_rejections && !args.quiet {
        print_rejections(&rep);
    }
    if args.strict && !rep.rejections.is_empty() {
        return Err(CliError::new(
            format!("{} packets rejected", rejected_frames(&rep)),
            Some("use --list-rejections to inspect".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
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

fn rejected_frames(rep: &Report) -> u64 {
    rep.rejections.iter().map(|rejection| rejection.count).sum()
}

fn print_rejections(rep: &Report) {
    eprintln!("Packet rejections:");
    for rejection in &rep.rejections {
        eprintln!(
            "  {} {} ({})",
            rep.protocol.name, rejection.id, rejection.count
        );
        for example in &rejection.examples {
            eprintln!("    {}", example);
        }
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some(INPUT_HINT.to_string()),
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
            Some("check the path or quote the pattern; expected a capture file".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single capture file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>();
        message.push_str("; matches: ");
        message.push_str(&listed.join(", "));
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
