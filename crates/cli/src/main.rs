//! CLI tool for generating, slicing and exporting AI-written slide decks.

mod commands;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Turn free-form text into Marp slide decks and export them.
#[derive(Parser, Debug)]
#[command(name = "deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding stored presentations
    #[arg(long, global = true, env = "DECK_STORE_DIR", default_value = "presentations")]
    store_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a deck from text with an AI provider and store it
    Generate(GenerateArgs),

    /// Build a document from a slides JSON file
    Assemble(AssembleArgs),

    /// Keep only some slides of a document, e.g. "1-3, 5, 7-9"
    Select(SelectArgs),

    /// Render a stored presentation or a document file to HTML, PPTX or PDF
    Export(ExportArgs),

    /// List stored presentations, newest first
    List {
        /// Maximum number of presentations to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show a stored presentation
    Show {
        /// Presentation id
        id: String,

        /// Print the Marp document instead of the summary
        #[arg(short, long)]
        markdown: bool,
    },

    /// Delete a stored presentation
    Delete {
        /// Presentation id
        id: String,
    },
}

#[derive(ClapArgs, Debug)]
struct GenerateArgs {
    /// Text file to turn into slides (reads stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Presentation title
    #[arg(short, long)]
    title: Option<String>,

    /// Extra instructions for the model
    #[arg(short, long)]
    guidance: Option<String>,

    /// AI provider: openai, anthropic or gemini
    #[arg(short, long, env = "DECK_PROVIDER", default_value = "openai")]
    provider: String,

    /// Model name (provider default when omitted)
    #[arg(short, long, env = "DECK_MODEL")]
    model: Option<String>,

    /// API key (falls back to the provider's *_API_KEY variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Number of slides: "auto" or 1-50
    #[arg(short = 'n', long, default_value = "auto")]
    slides: String,

    #[command(flatten)]
    style: StyleArgs,

    /// Also write the Marp document to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not store the presentation
    #[arg(long)]
    no_store: bool,
}

#[derive(ClapArgs, Debug)]
struct AssembleArgs {
    /// JSON file with an array of slides (or {"slides": [...]})
    slides: PathBuf,

    /// Presentation title
    #[arg(short, long)]
    title: Option<String>,

    #[command(flatten)]
    style: StyleArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct StyleArgs {
    /// JSON file with colors and fonts
    #[arg(long)]
    style: Option<PathBuf>,

    /// Marp theme name
    #[arg(long, default_value = "default")]
    theme: String,
}

#[derive(ClapArgs, Debug)]
struct SelectArgs {
    /// Marp document file
    document: PathBuf,

    /// Slide ranges, e.g. "1-3, 5"; empty keeps every slide
    #[arg(short, long, default_value = "")]
    slides: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct ExportArgs {
    /// Stored presentation id
    #[arg(long, conflicts_with = "document", required_unless_present = "document")]
    id: Option<String>,

    /// Marp document file
    #[arg(long)]
    document: Option<PathBuf>,

    /// Output format: html, pptx or pdf
    #[arg(short, long, default_value = "html")]
    format: String,

    /// Slide ranges to export; empty exports every slide
    #[arg(short, long, default_value = "")]
    slides: String,

    /// Output file (default: <title>.<format>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render tool command line
    #[arg(long, env = "DECK_MARP_COMMAND", default_value = "npx @marp-team/marp-cli")]
    marp_command: String,

    /// Seconds before the render tool is killed
    #[arg(long, env = "DECK_RENDER_TIMEOUT_SECS", default_value = "120")]
    render_timeout: u64,

    /// Whether PPTX/PDF export is available in this environment
    #[arg(long, env = "DECK_RENDER_BINARY", default_value_t = true, action = clap::ArgAction::Set)]
    render_binary: bool,

    /// Allow slides to reference local image files
    #[arg(long)]
    allow_local_files: bool,
}

fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match &args.command {
        Command::Generate(generate) => commands::generate(&args, generate),
        Command::Assemble(assemble) => commands::assemble(assemble),
        Command::Select(select) => commands::select(select),
        Command::Export(export) => commands::export(&args, export),
        Command::List { limit } => commands::list(&args, *limit),
        Command::Show { id, markdown } => commands::show(&args, id, *markdown),
        Command::Delete { id } => commands::delete(&args, id),
    }
}
