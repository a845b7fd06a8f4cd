//! Command implementations for pgarrow-cmd

use anyhow::{Context, Result};
use pgarrow_decoder::{ColumnDescriptor, UserOptions};
use std::{
    fs::{self, File},
    io::BufReader,
};

use crate::{SchemaArgs, schema_parser, utils};

pub mod decode;
pub mod inspect;
pub mod schema;

/// Loads the column descriptors from the schema file or the inline schema string.
pub fn load_columns(args: &SchemaArgs) -> Result<Vec<ColumnDescriptor>> {
    let columns = match (&args.schema, &args.schema_string) {
        (Some(path), _) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema file: {path}"))?;
            serde_json::from_str::<Vec<ColumnDescriptor>>(&json)
                .with_context(|| format!("Failed to parse schema file: {path}"))?
        }
        (None, Some(schema_string)) => schema_parser::parse_schema_string(schema_string)?,
        (None, None) => anyhow::bail!("Either --schema or --schema-string must be specified"),
    };
    if columns.is_empty() {
        anyhow::bail!("Schema must contain at least one column");
    }
    Ok(columns)
}

/// Loads the decoder options, applying the command-line overrides.
pub fn load_options(args: &SchemaArgs) -> Result<UserOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file: {path}"))?;
            serde_json::from_str::<UserOptions>(&json)
                .with_context(|| format!("Failed to parse options file: {path}"))?
        }
        None => UserOptions::default(),
    };
    if args.string_as_dictionary {
        options.string_as_dictionary = true;
    }
    Ok(options)
}

pub fn open_input(path: &str) -> Result<BufReader<File>> {
    utils::validate_file_exists(path)?;
    let file = File::open(path).with_context(|| format!("Failed to open input file: {path}"))?;
    Ok(BufReader::new(file))
}
