use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;
mod schema_parser;
mod utils;

#[derive(Parser)]
#[command(name = "pgarrow-cmd")]
#[command(about = "Command-line utility for decoding PostgreSQL binary COPY files into Arrow")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Column layout of the COPY data and the decoder options.
#[derive(Args, Clone, Debug)]
pub struct SchemaArgs {
    /// Path to the JSON file containing the column descriptors
    #[arg(long, conflicts_with = "schema_string", required_unless_present = "schema_string")]
    schema: Option<String>,

    /// Inline column list, for example "(id: int8, name: text, tags: text[])"
    #[arg(long)]
    schema_string: Option<String>,

    /// Path to a JSON file with decoder options
    #[arg(long)]
    options: Option<String>,

    /// Decode text and enum columns as dictionary-encoded strings
    #[arg(long)]
    string_as_dictionary: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per row
    Ndjson,
    /// Comma separated values with a header line
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a binary COPY file and write its rows as NDJSON or CSV
    Decode {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Number of rows per decoded record batch
        #[arg(long, default_value_t = 8192)]
        batch_size: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Ndjson)]
        format: OutputFormat,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,

        /// Binary COPY file to decode
        input: String,
    },

    /// Print the Arrow schema the decoder produces for a column list
    Schema {
        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// Inspect a binary COPY file and display its header and tuple statistics
    Inspect {
        /// Binary COPY file to inspect
        input: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            schema,
            batch_size,
            format,
            output,
            input,
        } => commands::decode::run(schema, batch_size, format, output, input),
        Commands::Schema { schema } => commands::schema::run(schema),
        Commands::Inspect { input } => commands::inspect::run(input),
    }
}
