//! Tuple identifiers (`tid`): `block: u32, offset: u16`.

use arrow_schema::DataType;
use pgarrow_common::Result;

use crate::{cursor::ByteCursor, sink::ColumnSink, value::Value};

use super::{expect_width, struct_type};

#[derive(Clone, Debug, Default)]
pub struct TidDecoder;

impl TidDecoder {
    pub fn new() -> TidDecoder {
        TidDecoder
    }

    pub fn data_type(&self) -> DataType {
        struct_type([("block", DataType::Int64), ("offset", DataType::Int32)])
    }

    pub(crate) fn decode_value(
        &self,
        body: &mut ByteCursor,
        sink: &mut dyn ColumnSink,
    ) -> Result<()> {
        expect_width(body, 6)?;
        let block = body.read_u32()?;
        let offset = body.read_u16()?;

        sink.begin_record()?;
        sink.field(0)?.append_value(Value::Int64(i64::from(block)))?;
        sink.field(1)?.append_value(Value::Int32(i32::from(offset)))?;
        sink.end_record()
    }
}
