use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use lp_page_cli::{load_config, read_records, render_export, sort_csv_file, write_output};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Laser-parameter table tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a JSON array of parameter records as the page's CSV download
    Export(ExportArgs),
    /// Replay header clicks on a CSV table and print the resulting order
    Sort(SortArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// JSON records (`-` for stdin)
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output CSV path (`-` for stdout)
    #[arg(short, long, default_value = lp_page::DEFAULT_EXPORT_FILENAME, value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Write the `data:` download URI instead of the CSV text
    #[arg(long, action = ArgAction::SetTrue)]
    data_uri: bool,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct SortArgs {
    /// CSV table with a header row (`-` for stdin)
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Column to click, by header text or zero-based index
    #[arg(short, long)]
    column: String,

    /// Treat the column as numeric
    #[arg(long, action = ArgAction::SetTrue)]
    numeric: bool,

    /// Number of header clicks to replay
    #[arg(long, default_value_t = 1)]
    clicks: usize,

    /// Output CSV path (`-` for stdout)
    #[arg(short, long, default_value = "-", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Optional page configuration JSON (class names)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = match &cli.command {
        Command::Export(args) => args.verbose,
        Command::Sort(args) => args.verbose,
    };
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Export(args) => handle_export(args),
        Command::Sort(args) => handle_sort(args),
    }
}

fn handle_export(args: ExportArgs) -> Result<()> {
    let records = read_records(&args.input)?;
    let text = render_export(&records, args.data_uri)?;
    write_output(&args.output, &text)?;
    info!(rows = records.len(), output = %args.output.display(), "export written");
    Ok(())
}

fn handle_sort(args: SortArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let outcome = sort_csv_file(
        &args.input,
        &args.column,
        args.numeric,
        args.clicks,
        &config,
    )?;
    write_output(&args.output, &outcome.csv)?;
    if let Some(direction) = outcome.direction {
        info!(
            header_class = direction.class(&config),
            "header state after clicks"
        );
    }
    Ok(())
}
