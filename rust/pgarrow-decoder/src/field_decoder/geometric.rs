//! Geometric types: fixed sequences of float8 coordinates without per-field
//! length prefixes.

use arrow_schema::DataType;
use pgarrow_common::Result;
use tinyvec::ArrayVec;

use crate::{cursor::ByteCursor, sink::ColumnSink, value::Value};

use super::{expect_width, struct_type};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometricKind {
    Point,
    Lseg,
    Line,
    Box,
    Circle,
}

impl GeometricKind {
    /// Output field names, in wire order.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            GeometricKind::Point => &["x", "y"],
            GeometricKind::Lseg => &["p1.x", "p1.y", "p2.x", "p2.y"],
            GeometricKind::Line => &["a", "b", "c"],
            GeometricKind::Box => &["high.x", "high.y", "low.x", "low.y"],
            GeometricKind::Circle => &["center.x", "center.y", "radius"],
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeometricDecoder {
    kind: GeometricKind,
}

impl GeometricDecoder {
    pub fn new(kind: GeometricKind) -> GeometricDecoder {
        GeometricDecoder { kind }
    }

    pub fn kind(&self) -> GeometricKind {
        self.kind
    }

    pub fn data_type(&self) -> DataType {
        struct_type(
            self.kind
                .field_names()
                .iter()
                .map(|name| (*name, DataType::Float64)),
        )
    }

    pub(crate) fn decode_value(
        &self,
        body: &mut ByteCursor,
        sink: &mut dyn ColumnSink,
    ) -> Result<()> {
        let names = self.kind.field_names();
        expect_width(body, names.len() * 8)?;

        let mut coords = ArrayVec::<[f64; 4]>::new();
        for _ in names {
            coords.push(body.read_f64()?);
        }

        sink.begin_record()?;
        for (i, coord) in coords.into_iter().enumerate() {
            sink.field(i)?.append_value(Value::Float64(coord))?;
        }
        sink.end_record()
    }
}
