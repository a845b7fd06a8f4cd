//! `inet` and `cidr`.
//!
//! Body layout: `family: u8, bits: u8, is_cidr: u8, nb: u8`, then `nb` address
//! bytes (4 for IPv4, 16 for IPv6).

use arrow_schema::DataType;
use pgarrow_common::Result;

use crate::{cursor::ByteCursor, sink::ColumnSink, value::Value};

use super::struct_type;

#[derive(Clone, Debug, Default)]
pub struct InetDecoder;

impl InetDecoder {
    pub fn new() -> InetDecoder {
        InetDecoder
    }

    pub fn data_type(&self) -> DataType {
        struct_type([
            ("family", DataType::UInt8),
            ("bits", DataType::UInt8),
            ("is_cidr", DataType::Boolean),
            ("ipaddr", DataType::LargeBinary),
        ])
    }

    pub(crate) fn decode_value(
        &self,
        body: &mut ByteCursor,
        sink: &mut dyn ColumnSink,
    ) -> Result<()> {
        let family = body.read_u8()?;
        let bits = body.read_u8()?;
        let is_cidr = body.read_u8()? != 0;
        let nb = body.read_u8()?;
        let addr = body.read_bytes(nb as usize)?;

        sink.begin_record()?;
        sink.field(0)?.append_value(Value::UInt8(family))?;
        sink.field(1)?.append_value(Value::UInt8(bits))?;
        sink.field(2)?.append_value(Value::Bool(is_cidr))?;
        sink.field(3)?.append_value(Value::Bytes(addr))?;
        sink.end_record()
    }
}
