//! Resolution of server types into decoder trees.
//!
//! Types are identified by the name of their binary receive function, which is
//! stable across servers, unlike type oids of extension and user types. Each name
//! maps to a [`DecoderFactory`]; unknown names are rejected when the schema is
//! resolved, never while rows are being decoded.

use ahash::AHashMap;
use pgarrow_common::{Result, error::Error};

use crate::{
    field_decoder::{
        ArrayDecoder, FieldDecoder, GeometricDecoder, GeometricKind, InetDecoder,
        NumericDecoder, RecordDecoder, ScalarDecoder, ScalarKind, TidDecoder,
    },
    options::UserOptions,
    type_desc::TypeDescriptor,
};

/// A decoding strategy a receive function name can be mapped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecoderFactory {
    Bool,
    Char,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Interval,
    /// Text types, dictionary encoded when `string_as_dictionary` is set.
    Text,
    /// Enum labels, dictionary encoded when `string_as_dictionary` is set.
    Enum,
    /// Text documents (`json`, `xml`), never dictionary encoded.
    Document,
    Jsonb,
    Bytes,
    Numeric,
    /// Generic arrays, decoded through the descriptor's element type.
    Array,
    Int2Vector,
    OidVector,
    Record,
    Geometric(GeometricKind),
    Inet,
    Tid,
}

impl DecoderFactory {
    fn create(
        self,
        registry: &TypeRegistry,
        desc: &TypeDescriptor,
        options: &UserOptions,
    ) -> Result<FieldDecoder> {
        match self {
            DecoderFactory::Bool => scalar(ScalarKind::Bool),
            DecoderFactory::Char => scalar(ScalarKind::Char),
            DecoderFactory::Int16 => scalar(ScalarKind::Int16),
            DecoderFactory::Int32 => scalar(ScalarKind::Int32),
            DecoderFactory::Int64 => scalar(ScalarKind::Int64),
            DecoderFactory::Float32 => scalar(ScalarKind::Float32),
            DecoderFactory::Float64 => scalar(ScalarKind::Float64),
            DecoderFactory::Date => scalar(ScalarKind::Date),
            DecoderFactory::Time => scalar(ScalarKind::Time),
            DecoderFactory::TimeTz => scalar(ScalarKind::TimeTz),
            DecoderFactory::Timestamp => scalar(ScalarKind::Timestamp),
            DecoderFactory::TimestampTz => scalar(ScalarKind::TimestampTz),
            DecoderFactory::Interval => {
                scalar(ScalarKind::Interval(options.interval_representation))
            }
            DecoderFactory::Text | DecoderFactory::Enum => scalar(ScalarKind::Text {
                dictionary: options.string_as_dictionary,
            }),
            DecoderFactory::Document => scalar(ScalarKind::Text { dictionary: false }),
            DecoderFactory::Jsonb => scalar(ScalarKind::Jsonb),
            DecoderFactory::Bytes => scalar(ScalarKind::Bytes),
            DecoderFactory::Numeric => Ok(FieldDecoder::Numeric(
                NumericDecoder::from_descriptor(desc, options)?,
            )),
            DecoderFactory::Array => {
                let element = desc.element.as_deref().ok_or_else(|| {
                    Error::invalid_arg(
                        "element",
                        format!("array type '{}' has no element descriptor", desc.receive),
                    )
                })?;
                Ok(FieldDecoder::Array(ArrayDecoder::new(
                    registry.resolve(element, options)?,
                )))
            }
            DecoderFactory::Int2Vector => Ok(FieldDecoder::Array(ArrayDecoder::new(
                FieldDecoder::Scalar(ScalarDecoder::new(ScalarKind::Int16)),
            ))),
            DecoderFactory::OidVector => Ok(FieldDecoder::Array(ArrayDecoder::new(
                FieldDecoder::Scalar(ScalarDecoder::new(ScalarKind::Int32)),
            ))),
            DecoderFactory::Record => {
                if desc.fields.is_empty() {
                    return Err(Error::invalid_arg(
                        "fields",
                        format!("composite type '{}' has no field descriptors", desc.receive),
                    ));
                }
                let fields = desc
                    .fields
                    .iter()
                    .map(|f| Ok((f.name.clone(), registry.resolve(&f.type_desc, options)?)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(FieldDecoder::Record(RecordDecoder::new(fields)))
            }
            DecoderFactory::Geometric(kind) => {
                Ok(FieldDecoder::Geometric(GeometricDecoder::new(kind)))
            }
            DecoderFactory::Inet => Ok(FieldDecoder::Inet(InetDecoder::new())),
            DecoderFactory::Tid => Ok(FieldDecoder::Tid(TidDecoder::new())),
        }
    }
}

#[inline]
fn scalar(kind: ScalarKind) -> Result<FieldDecoder> {
    Ok(FieldDecoder::Scalar(ScalarDecoder::new(kind)))
}

/// Receive functions known out of the box.
const BUILTINS: &[(&str, DecoderFactory)] = &[
    ("boolrecv", DecoderFactory::Bool),
    ("charrecv", DecoderFactory::Char),
    ("int2recv", DecoderFactory::Int16),
    ("int4recv", DecoderFactory::Int32),
    ("oidrecv", DecoderFactory::Int32),
    ("xidrecv", DecoderFactory::Int32),
    ("cidrecv", DecoderFactory::Int32),
    ("regclassrecv", DecoderFactory::Int32),
    ("regcollationrecv", DecoderFactory::Int32),
    ("regconfigrecv", DecoderFactory::Int32),
    ("regdictionaryrecv", DecoderFactory::Int32),
    ("regnamespacerecv", DecoderFactory::Int32),
    ("regoperatorrecv", DecoderFactory::Int32),
    ("regoperrecv", DecoderFactory::Int32),
    ("regprocedurerecv", DecoderFactory::Int32),
    ("regprocrecv", DecoderFactory::Int32),
    ("regrolerecv", DecoderFactory::Int32),
    ("regtyperecv", DecoderFactory::Int32),
    ("int8recv", DecoderFactory::Int64),
    ("cash_recv", DecoderFactory::Int64),
    ("pg_lsn_recv", DecoderFactory::Int64),
    ("xid8recv", DecoderFactory::Int64),
    ("float4recv", DecoderFactory::Float32),
    ("float8recv", DecoderFactory::Float64),
    ("date_recv", DecoderFactory::Date),
    ("time_recv", DecoderFactory::Time),
    ("timetz_recv", DecoderFactory::TimeTz),
    ("timestamp_recv", DecoderFactory::Timestamp),
    ("timestamptz_recv", DecoderFactory::TimestampTz),
    ("interval_recv", DecoderFactory::Interval),
    ("textrecv", DecoderFactory::Text),
    ("varcharrecv", DecoderFactory::Text),
    ("bpcharrecv", DecoderFactory::Text),
    ("namerecv", DecoderFactory::Text),
    ("unknownrecv", DecoderFactory::Text),
    ("enum_recv", DecoderFactory::Enum),
    ("json_recv", DecoderFactory::Document),
    ("xml_recv", DecoderFactory::Document),
    ("jsonb_recv", DecoderFactory::Jsonb),
    ("bytearecv", DecoderFactory::Bytes),
    ("bit_recv", DecoderFactory::Bytes),
    ("varbit_recv", DecoderFactory::Bytes),
    ("uuid_recv", DecoderFactory::Bytes),
    ("macaddr_recv", DecoderFactory::Bytes),
    ("macaddr8_recv", DecoderFactory::Bytes),
    ("cstring_recv", DecoderFactory::Bytes),
    ("brin_bloom_summary_recv", DecoderFactory::Bytes),
    ("brin_minmax_multi_summary_recv", DecoderFactory::Bytes),
    ("pg_dependencies_recv", DecoderFactory::Bytes),
    ("pg_mcv_list_recv", DecoderFactory::Bytes),
    ("pg_ndistinct_recv", DecoderFactory::Bytes),
    ("numeric_recv", DecoderFactory::Numeric),
    ("array_recv", DecoderFactory::Array),
    ("anyarray_recv", DecoderFactory::Array),
    ("anycompatiblearray_recv", DecoderFactory::Array),
    ("int2vectorrecv", DecoderFactory::Int2Vector),
    ("oidvectorrecv", DecoderFactory::OidVector),
    ("record_recv", DecoderFactory::Record),
    ("point_recv", DecoderFactory::Geometric(GeometricKind::Point)),
    ("lseg_recv", DecoderFactory::Geometric(GeometricKind::Lseg)),
    ("line_recv", DecoderFactory::Geometric(GeometricKind::Line)),
    ("box_recv", DecoderFactory::Geometric(GeometricKind::Box)),
    ("circle_recv", DecoderFactory::Geometric(GeometricKind::Circle)),
    ("inet_recv", DecoderFactory::Inet),
    ("cidr_recv", DecoderFactory::Inet),
    ("tidrecv", DecoderFactory::Tid),
];

/// Maps receive function names to decoder factories.
///
/// [`TypeRegistry::default`] knows the built-in server types. Additional names
/// (for instance the receive functions of extension types sharing a built-in
/// layout) can be mapped with [`register`](Self::register).
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    factories: AHashMap<String, DecoderFactory>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut registry = TypeRegistry::empty();
        for &(name, factory) in BUILTINS {
            registry.register(name, factory);
        }
        registry
    }
}

impl TypeRegistry {
    /// A registry without any known types.
    pub fn empty() -> TypeRegistry {
        TypeRegistry {
            factories: AHashMap::new(),
        }
    }

    /// Maps `receive` to `factory`, returning the factory it previously mapped to.
    pub fn register(
        &mut self,
        receive: impl Into<String>,
        factory: DecoderFactory,
    ) -> Option<DecoderFactory> {
        self.factories.insert(receive.into(), factory)
    }

    pub fn lookup(&self, receive: &str) -> Option<DecoderFactory> {
        self.factories.get(receive).copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Builds the decoder tree for `desc`, recursing into array elements and
    /// composite fields.
    pub fn resolve(&self, desc: &TypeDescriptor, options: &UserOptions) -> Result<FieldDecoder> {
        let factory = self
            .lookup(&desc.receive)
            .ok_or_else(|| Error::unsupported_type(&desc.receive))?;
        let decoder = factory.create(self, desc, options)?;
        log::debug!(
            "resolved type {} (oid {}, receive {}) as {}",
            desc.name,
            desc.oid,
            desc.receive,
            decoder.data_type()
        );
        Ok(decoder)
    }
}

#[cfg(test)]
mod tests {
    use arrow_schema::{DataType, IntervalUnit, TimeUnit};
    use pgarrow_common::error::ErrorKind;

    use super::{DecoderFactory, TypeRegistry};
    use crate::{
        options::{IntervalRepresentation, UserOptions},
        type_desc::{ColumnDescriptor, TypeDescriptor},
    };

    fn resolve_type(receive: &str, options: &UserOptions) -> DataType {
        TypeRegistry::default()
            .resolve(&TypeDescriptor::new(receive), options)
            .unwrap()
            .data_type()
    }

    #[test]
    fn test_scalar_types() {
        let options = UserOptions::default();
        assert_eq!(resolve_type("int4recv", &options), DataType::Int32);
        assert_eq!(resolve_type("oidrecv", &options), DataType::Int32);
        assert_eq!(resolve_type("pg_lsn_recv", &options), DataType::Int64);
        assert_eq!(resolve_type("charrecv", &options), DataType::UInt8);
        assert_eq!(resolve_type("textrecv", &options), DataType::LargeUtf8);
        assert_eq!(resolve_type("uuid_recv", &options), DataType::LargeBinary);
        assert_eq!(
            resolve_type("timestamptz_recv", &options),
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into()))
        );
        assert_eq!(
            resolve_type("interval_recv", &options),
            DataType::Interval(IntervalUnit::MonthDayNano)
        );
        assert_eq!(
            resolve_type("numeric_recv", &options),
            DataType::Decimal128(22, 6)
        );
    }

    #[test]
    fn test_options_select_representation() {
        let options = UserOptions::default()
            .with_string_as_dictionary(true)
            .with_interval_representation(IntervalRepresentation::Duration);
        let dict = DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
        assert_eq!(resolve_type("varcharrecv", &options), dict);
        assert_eq!(resolve_type("enum_recv", &options), dict);
        assert_eq!(resolve_type("json_recv", &options), DataType::LargeUtf8);
        assert_eq!(resolve_type("jsonb_recv", &options), DataType::LargeUtf8);
        assert_eq!(
            resolve_type("interval_recv", &options),
            DataType::Duration(TimeUnit::Microsecond)
        );
    }

    #[test]
    fn test_unknown_type_fails_at_resolution() {
        let registry = TypeRegistry::default();
        let err = registry
            .resolve(&TypeDescriptor::new("tsvectorrecv"), &UserOptions::default())
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::UnsupportedType { receive } if receive == "tsvectorrecv"
        ));
        assert!(registry.lookup("domain_recv").is_none());

        // Unknown element types fail as well.
        let desc = TypeDescriptor::array_of(TypeDescriptor::new("hstore_recv"));
        assert!(registry.resolve(&desc, &UserOptions::default()).is_err());
    }

    #[test]
    fn test_register_extension_type() {
        let mut registry = TypeRegistry::default();
        assert!(registry.lookup("citextrecv").is_none());
        assert_eq!(registry.register("citextrecv", DecoderFactory::Text), None);
        let decoder = registry
            .resolve(&TypeDescriptor::new("citextrecv"), &UserOptions::default())
            .unwrap();
        assert_eq!(decoder.data_type(), DataType::LargeUtf8);
    }

    #[test]
    fn test_nested_types() {
        let registry = TypeRegistry::default();
        let desc = TypeDescriptor::array_of(TypeDescriptor::record(vec![
            ColumnDescriptor::new("a", TypeDescriptor::new("int8recv")),
            ColumnDescriptor::new("b", TypeDescriptor::array_of(TypeDescriptor::new("textrecv"))),
        ]));
        let data_type = registry
            .resolve(&desc, &UserOptions::default())
            .unwrap()
            .data_type();
        let DataType::LargeList(item) = &data_type else {
            panic!("expected a list, got {data_type}");
        };
        let DataType::Struct(fields) = item.data_type() else {
            panic!("expected a struct");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].data_type(), &DataType::Int64);
        assert!(matches!(fields[1].data_type(), DataType::LargeList(_)));
    }

    #[test]
    fn test_missing_nested_descriptors() {
        let registry = TypeRegistry::default();
        let options = UserOptions::default();
        for receive in ["array_recv", "record_recv"] {
            let err = registry
                .resolve(&TypeDescriptor::new(receive), &options)
                .unwrap_err();
            assert!(err.is_schema_error());
        }
    }
}
