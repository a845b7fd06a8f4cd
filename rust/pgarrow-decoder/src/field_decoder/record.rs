//! Composite (row) types.
//!
//! A record body is `validcols: i32` followed, per field, by the field's type oid
//! and the length-prefixed field value. Fields are positional: the wire order must
//! match the order of the decoders bound at construction.

use std::sync::Arc;

use arrow_schema::DataType;
use pgarrow_common::{Result, error::Error};

use crate::{cursor::ByteCursor, sink::ColumnSink};

use super::{FieldDecoder, skip_field, struct_type};

#[derive(Clone, Debug)]
pub struct RecordDecoder {
    fields: Arc<[(String, FieldDecoder)]>,
}

impl RecordDecoder {
    pub fn new(fields: Vec<(String, FieldDecoder)>) -> RecordDecoder {
        RecordDecoder {
            fields: fields.into(),
        }
    }

    pub fn fields(&self) -> &[(String, FieldDecoder)] {
        &self.fields
    }

    pub fn data_type(&self) -> DataType {
        struct_type(
            self.fields
                .iter()
                .map(|(name, decoder)| (name.as_str(), decoder.data_type())),
        )
    }

    pub(crate) fn decode_value(
        &self,
        body: &mut ByteCursor,
        sink: &mut dyn ColumnSink,
    ) -> Result<()> {
        let validcols = body.read_i32()?;
        if i64::from(validcols) != self.fields.len() as i64 {
            return Err(Error::field_count_mismatch(
                self.fields.len(),
                i64::from(validcols),
            ));
        }

        // Field framing must be complete before the sink sees the record.
        let mut framing = body.clone();
        for _ in 0..self.fields.len() {
            framing.read_u32()?;
            skip_field(&mut framing)?;
        }

        sink.begin_record()?;
        for (i, (_, decoder)) in self.fields.iter().enumerate() {
            let _oid = body.read_u32()?;
            decoder.decode(body, sink.field(i)?)?;
        }
        sink.end_record()
    }
}
