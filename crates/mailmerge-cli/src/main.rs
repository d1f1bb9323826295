//! Mail merge CLI
//!
//! Command-line driver for parsing recipient CSV files, rendering message
//! templates against them, and exporting the batch through the core's sinks.

use clap::{Parser, Subcommand};
use mailmerge_core::{
    compile, deliver_each, ingest, merge, render_one, write_document, write_text_bundle,
    CompiledTemplate, RenderedMessage, RowSet, DOCUMENT_FILENAME, TEXT_BUNDLE_FILENAME,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mailmerge")]
#[command(about = "Generate personalized messages from CSV data and a template", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one recipient's message to stdout
    Preview {
        /// Path to the recipient CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Path to the template file (omit for an empty template)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Zero-based row index to preview
        #[arg(short, long, default_value_t = 0)]
        row: usize,
    },

    /// Export the batch as one concatenated text file
    ExportText {
        /// Path to the recipient CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Path to the template file (omit for an empty template)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output file path
        #[arg(short, long, default_value = TEXT_BUNDLE_FILENAME)]
        output: PathBuf,
    },

    /// Export the batch as a paginated PDF, one page per message
    ExportDocument {
        /// Path to the recipient CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Path to the template file (omit for an empty template)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output file path
        #[arg(short, long, default_value = DOCUMENT_FILENAME)]
        output: PathBuf,
    },

    /// Deliver each message to its own file in a directory
    ExportEach {
        /// Path to the recipient CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Path to the template file (omit for an empty template)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output directory for the per-recipient files
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Show the headers and rows of a recipient CSV file
    Inspect {
        /// Path to the recipient CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,

        /// Dump the full row set as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> mailmerge_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview {
            data,
            template,
            row,
        } => cmd_preview(&data, template.as_deref(), row),
        Commands::ExportText {
            data,
            template,
            output,
        } => cmd_export_text(&data, template.as_deref(), &output),
        Commands::ExportDocument {
            data,
            template,
            output,
        } => cmd_export_document(&data, template.as_deref(), &output),
        Commands::ExportEach {
            data,
            template,
            output_dir,
        } => cmd_export_each(&data, template.as_deref(), &output_dir),
        Commands::Inspect { data, limit, json } => cmd_inspect(&data, limit, json),
    }
}

/// Declare a media type from the file extension. The core rejects anything
/// not declared as delimited/plain text, so unknown extensions map to the
/// extension itself and fail at the ingestion boundary.
fn declared_media_type(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => "text/csv".to_string(),
        Some("txt") => "text/plain".to_string(),
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    }
}

fn load_rowset(path: &Path) -> mailmerge_core::Result<RowSet> {
    let raw = fs::read_to_string(path)?;
    ingest(&raw, &declared_media_type(path))
}

fn load_template(path: Option<&Path>) -> mailmerge_core::Result<CompiledTemplate> {
    match path {
        Some(path) => Ok(compile(&fs::read_to_string(path)?)),
        None => Ok(compile("")),
    }
}

fn warn_unresolved(messages: &[RenderedMessage]) {
    let mut names: Vec<&str> = Vec::new();
    for message in messages {
        for name in &message.unresolved {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
    }

    if !names.is_empty() {
        eprintln!(
            "Warning: unresolved placeholders left literal: {}",
            names.join(", ")
        );
    }
}

fn cmd_preview(data: &Path, template: Option<&Path>, row: usize) -> mailmerge_core::Result<()> {
    let rowset = load_rowset(data)?;
    let template = load_template(template)?;

    match render_one(&rowset, row, &template) {
        Some(message) => {
            println!("To: {}", message.recipient);
            println!();
            println!("{}", message.content);
            warn_unresolved(std::slice::from_ref(&message));
            Ok(())
        }
        None => {
            eprintln!("Row {} is out of range ({} rows)", row, rowset.len());
            std::process::exit(1);
        }
    }
}

fn cmd_export_text(
    data: &Path,
    template: Option<&Path>,
    output: &Path,
) -> mailmerge_core::Result<()> {
    let rowset = load_rowset(data)?;
    let template = load_template(template)?;

    let messages = merge(&rowset, &template);
    write_text_bundle(&messages, output)?;
    warn_unresolved(&messages);

    println!("Wrote {} messages to {}", messages.len(), output.display());
    Ok(())
}

fn cmd_export_document(
    data: &Path,
    template: Option<&Path>,
    output: &Path,
) -> mailmerge_core::Result<()> {
    let rowset = load_rowset(data)?;
    let template = load_template(template)?;

    let messages = merge(&rowset, &template);
    write_document(&messages, output)?;
    warn_unresolved(&messages);

    println!(
        "Wrote {} page(s) of messages to {}",
        messages.len().max(1),
        output.display()
    );
    Ok(())
}

fn cmd_export_each(
    data: &Path,
    template: Option<&Path>,
    output_dir: &Path,
) -> mailmerge_core::Result<()> {
    let rowset = load_rowset(data)?;
    let template = load_template(template)?;

    let messages = merge(&rowset, &template);
    let report = deliver_each(&messages, output_dir)?;
    warn_unresolved(&messages);

    println!(
        "Delivered {} of {} messages to {}",
        report.delivered.len(),
        messages.len(),
        output_dir.display()
    );

    if !report.all_delivered() {
        eprintln!("Failures ({}):", report.failures.len());
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.recipient, failure.reason);
        }
    }

    Ok(())
}

fn cmd_inspect(data: &Path, limit: Option<usize>, json: bool) -> mailmerge_core::Result<()> {
    let rowset = load_rowset(data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rowset)?);
        return Ok(());
    }

    println!("File: {}", data.display());
    println!("Columns: {}", rowset.headers().len());
    println!("Rows: {}", rowset.len());
    println!();

    let header: Vec<&str> = rowset.headers().iter().map(String::as_str).collect();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    let row_limit = limit.unwrap_or(10);
    for row in rowset.iter().take(row_limit) {
        let values: Vec<&str> = row.fields().map(|(_, value)| value).collect();
        println!("{}", values.join("\t"));
    }

    if rowset.len() > row_limit {
        println!("... ({} more rows)", rowset.len() - row_limit);
    }

    Ok(())
}
