//! Table-level decoding into Arrow record batches.

use std::sync::Arc;

use arrow_array::{RecordBatch, RecordBatchOptions};
use arrow_schema::{Field, Schema, SchemaRef};
use pgarrow_builders::{ArrayBuilder, ColumnBuilder};
use pgarrow_common::{Result, error::Error};

use crate::{
    options::UserOptions, registry::TypeRegistry, row::RowDecoder, source::RowSource,
    type_desc::ColumnDescriptor,
};

/// Decodes rows of a fixed schema into one column builder per column and emits
/// the accumulated rows as [`RecordBatch`]es.
///
/// A row that fails to decode may leave the builders partially written, so any
/// decoding error poisons the decoder: later calls fail until a fresh decoder is
/// created (see [`fork`](Self::fork)).
pub struct TableDecoder {
    schema: SchemaRef,
    rows: RowDecoder,
    builders: Vec<ColumnBuilder>,
    num_rows: usize,
    poisoned: bool,
}

impl TableDecoder {
    /// Resolves `columns` with the built-in type registry.
    pub fn try_new(columns: &[ColumnDescriptor], options: &UserOptions) -> Result<TableDecoder> {
        TableDecoder::with_registry(&TypeRegistry::default(), columns, options)
    }

    pub fn with_registry(
        registry: &TypeRegistry,
        columns: &[ColumnDescriptor],
        options: &UserOptions,
    ) -> Result<TableDecoder> {
        let rows = RowDecoder::try_new(registry, columns, options)?;
        let fields = columns
            .iter()
            .zip(rows.columns())
            .map(|(column, decoder)| Field::new(&column.name, decoder.data_type(), true))
            .collect::<Vec<_>>();
        let schema = Arc::new(Schema::new(fields));
        log::debug!("table decoder created for {} columns", columns.len());
        TableDecoder::from_parts(schema, rows)
    }

    fn from_parts(schema: SchemaRef, rows: RowDecoder) -> Result<TableDecoder> {
        let builders = rows
            .columns()
            .iter()
            .map(|decoder| decoder.create_builder())
            .collect::<Result<Vec<_>>>()?;
        Ok(TableDecoder {
            schema,
            rows,
            builders,
            num_rows: 0,
            poisoned: false,
        })
    }

    /// Creates a decoder sharing this decoder's resolved schema, with empty builders.
    ///
    /// Forks decode independent row ranges, for instance on other threads; their
    /// batches are concatenated by the caller in range order.
    pub fn fork(&self) -> Result<TableDecoder> {
        TableDecoder::from_parts(self.schema.clone(), self.rows.clone())
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn row_decoder(&self) -> &RowDecoder {
        &self.rows
    }

    /// Number of rows appended since the last flush.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Decodes one row buffer and appends it to the builders.
    pub fn append_row(&mut self, row: &[u8]) -> Result<()> {
        self.verify_usable()?;
        match self.rows.decode_row(row, self.builders.as_mut_slice()) {
            Ok(_) => {
                self.num_rows += 1;
                Ok(())
            }
            Err(e) => {
                self.poisoned = true;
                Err(e)
            }
        }
    }

    /// Appends every row of `source`, returning the number of rows appended.
    pub fn consume(&mut self, mut source: impl RowSource) -> Result<usize> {
        let mut count = 0;
        while let Some(row) = source.next_row()? {
            self.append_row(row)?;
            count += 1;
        }
        Ok(count)
    }

    /// Emits the rows appended since the last flush and resets the builders.
    pub fn flush(&mut self) -> Result<RecordBatch> {
        self.verify_usable()?;
        let arrays = self.builders.iter_mut().map(|b| b.build()).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows));
        let batch = RecordBatch::try_new_with_options(self.schema.clone(), arrays, &options)
            .map_err(|e| Error::arrow("building record batch", e))?;
        log::trace!("flushed batch of {} rows", self.num_rows);
        self.num_rows = 0;
        Ok(batch)
    }

    fn verify_usable(&self) -> Result<()> {
        if self.poisoned {
            return Err(Error::invalid_operation(
                "table decoder used after a failed row",
            ));
        }
        Ok(())
    }
}
