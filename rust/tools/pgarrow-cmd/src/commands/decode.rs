//! Decode command implementation

use anyhow::{Context, Result};
use arrow_array::RecordBatch;
use arrow_csv::Writer as CsvWriter;
use arrow_json::LineDelimitedWriter;
use pgarrow_decoder::{CopyStreamReader, RowSource, TableDecoder};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use crate::{
    OutputFormat, SchemaArgs,
    commands::{load_columns, load_options, open_input},
};

/// Run the decode command
pub fn run(
    schema: SchemaArgs,
    batch_size: usize,
    format: OutputFormat,
    output: Option<String>,
    input: String,
) -> Result<()> {
    let columns = load_columns(&schema)?;
    let options = load_options(&schema)?;
    let mut decoder = TableDecoder::try_new(&columns, &options)
        .with_context(|| "Failed to resolve the column schema")?;

    let reader = CopyStreamReader::new(open_input(&input)?)
        .with_context(|| format!("Failed to read COPY header from {input}"))?;

    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {path}"))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let rows = decode_to_writer(&mut decoder, reader, batch_size, format, writer)?;
    log::info!("decoded {rows} rows from {input}");
    if let Some(path) = &output {
        eprintln!("Wrote {rows} rows to {path}");
    }
    Ok(())
}

/// Decodes every row of `source` and writes them to `writer` in `format`, one
/// record batch of at most `batch_size` rows at a time. Returns the row count.
pub fn decode_to_writer<W: Write>(
    decoder: &mut TableDecoder,
    mut source: impl RowSource,
    batch_size: usize,
    format: OutputFormat,
    writer: W,
) -> Result<usize> {
    anyhow::ensure!(batch_size > 0, "Batch size must be positive");

    let mut output = BatchWriter::new(format, writer);
    let mut total = 0;
    let mut batches = 0;
    while let Some(row) = source.next_row()? {
        decoder
            .append_row(row)
            .with_context(|| format!("Failed to decode row {}", total + 1))?;
        total += 1;
        if decoder.num_rows() == batch_size {
            output.write(&decoder.flush()?)?;
            batches += 1;
        }
    }
    if decoder.num_rows() > 0 || batches == 0 {
        output.write(&decoder.flush()?)?;
    }
    output.finish()?;
    Ok(total)
}

enum BatchWriter<W: Write> {
    Ndjson(LineDelimitedWriter<W>),
    Csv(CsvWriter<W>),
}

impl<W: Write> BatchWriter<W> {
    fn new(format: OutputFormat, writer: W) -> BatchWriter<W> {
        match format {
            OutputFormat::Ndjson => BatchWriter::Ndjson(LineDelimitedWriter::new(writer)),
            OutputFormat::Csv => BatchWriter::Csv(CsvWriter::new(writer)),
        }
    }

    fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        match self {
            BatchWriter::Ndjson(w) => w.write(batch)?,
            BatchWriter::Csv(w) => w.write(batch)?,
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        let mut writer = match self {
            BatchWriter::Ndjson(mut w) => {
                w.finish()?;
                w.into_inner()
            }
            BatchWriter::Csv(w) => w.into_inner(),
        };
        writer.flush()?;
        Ok(())
    }
}
