//! Row decoding: split one row buffer into its fields and decode each column.

use std::sync::Arc;

use pgarrow_common::{Result, error::Error, verify_arg};

use crate::{
    cursor::ByteCursor, field_decoder::FieldDecoder, options::UserOptions,
    registry::TypeRegistry, sink::ColumnSink, type_desc::ColumnDescriptor,
};

/// Decodes row buffers of a fixed column layout.
///
/// A row buffer is an `i16` column count followed by one length-prefixed field per
/// column. The decoders are shared, so clones are cheap and may be handed to
/// other threads.
#[derive(Clone, Debug)]
pub struct RowDecoder {
    columns: Arc<[FieldDecoder]>,
}

impl RowDecoder {
    pub fn new(columns: Vec<FieldDecoder>) -> RowDecoder {
        RowDecoder {
            columns: columns.into(),
        }
    }

    /// Resolves every column through `registry`, failing on the first unsupported one.
    pub fn try_new(
        registry: &TypeRegistry,
        columns: &[ColumnDescriptor],
        options: &UserOptions,
    ) -> Result<RowDecoder> {
        let decoders = columns
            .iter()
            .map(|c| registry.resolve(&c.type_desc, options))
            .collect::<Result<Vec<_>>>()?;
        Ok(RowDecoder::new(decoders))
    }

    pub fn columns(&self) -> &[FieldDecoder] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Decodes `row`, appending exactly one entry to each of `sinks`.
    ///
    /// Returns the number of bytes consumed, which is always the whole row. Any
    /// error leaves the sinks partially written and must be treated as fatal for
    /// the stream.
    pub fn decode_row<S: ColumnSink>(&self, row: &[u8], sinks: &mut [S]) -> Result<usize> {
        verify_arg!(sinks, sinks.len() == self.columns.len());

        let mut cursor = ByteCursor::new(row);
        let count = cursor.read_i16()?;
        if i64::from(count) != self.columns.len() as i64 {
            return Err(Error::field_count_mismatch(
                self.columns.len(),
                i64::from(count),
            ));
        }

        for (decoder, sink) in self.columns.iter().zip(sinks.iter_mut()) {
            decoder.decode(&mut cursor, sink)?;
        }

        if !cursor.is_empty() {
            return Err(Error::invalid_format(
                "row",
                format!("{} trailing bytes after the last column", cursor.remaining()),
            ));
        }
        Ok(cursor.position())
    }
}
