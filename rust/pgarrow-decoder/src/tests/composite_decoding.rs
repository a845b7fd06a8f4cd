use pgarrow_common::error::ErrorKind;
use pgarrow_testkit::WireWriter;

use crate::{
    field_decoder::{FieldDecoder, RecordDecoder},
    options::UserOptions,
    type_desc::{ColumnDescriptor, TypeDescriptor},
};

use super::recording_sink::{Recorded, SinkEvent, decode_field, decoder_for, resolve};

const INT4_OID: u32 = 23;
const TEXT_OID: u32 = 25;

fn int4_array() -> FieldDecoder {
    resolve(
        &TypeDescriptor::array_of(TypeDescriptor::new("int4recv")),
        &UserOptions::default(),
    )
}

fn two_field_record() -> FieldDecoder {
    FieldDecoder::Record(RecordDecoder::new(vec![
        ("id".to_string(), decoder_for("int4recv")),
        ("name".to_string(), decoder_for("textrecv")),
    ]))
}

#[test]
fn test_one_dimensional_array() {
    let mut w = WireWriter::new();
    w.array_field(INT4_OID, &[3], |w| {
        w.int4_field(1).int4_field(2).int4_field(3);
    });
    let bytes = w.into_bytes();

    let (result, sink) = decode_field(&int4_array(), &bytes);
    assert_eq!(result.unwrap(), 4 + (4 + 4 + 4 + 8 + 3 * 8));
    assert_eq!(sink.events, vec![SinkEvent::BeginEntry, SinkEvent::EndEntry]);
    let items = sink.element_sink().unwrap();
    assert_eq!(
        items.events,
        vec![
            SinkEvent::Value(Recorded::Int32(1)),
            SinkEvent::Value(Recorded::Int32(2)),
            SinkEvent::Value(Recorded::Int32(3)),
        ]
    );
}

#[test]
fn test_multi_dimensional_array_is_flattened() {
    let mut w = WireWriter::new();
    w.array_field(INT4_OID, &[2, 2], |w| {
        w.int4_field(1).null().int4_field(3).int4_field(4);
    });
    let (result, sink) = decode_field(&int4_array(), w.as_bytes());
    assert_eq!(result.unwrap(), w.len());
    assert_eq!(sink.events, vec![SinkEvent::BeginEntry, SinkEvent::EndEntry]);
    assert_eq!(
        sink.element_sink().unwrap().events,
        vec![
            SinkEvent::Value(Recorded::Int32(1)),
            SinkEvent::Null,
            SinkEvent::Value(Recorded::Int32(3)),
            SinkEvent::Value(Recorded::Int32(4)),
        ]
    );
}

#[test]
fn test_empty_array_is_not_null() {
    let mut w = WireWriter::new();
    w.array_field(INT4_OID, &[], |_| {});
    let (result, sink) = decode_field(&int4_array(), w.as_bytes());
    assert_eq!(result.unwrap(), 16);
    assert_eq!(sink.events, vec![SinkEvent::BeginEntry, SinkEvent::EndEntry]);
    assert!(sink.element_sink().is_none_or(|e| e.events.is_empty()));
}

#[test]
fn test_array_element_count_mismatch() {
    // Declares 3 elements, carries 2 and trailing garbage.
    let mut w = WireWriter::new();
    w.array_field(INT4_OID, &[3], |w| {
        w.int4_field(1).int4_field(2).raw_i32(0);
    });
    let (result, _) = decode_field(&int4_array(), w.as_bytes());
    assert!(result.is_err());

    // Declares 1 element, carries 2.
    let mut w = WireWriter::new();
    w.array_field(INT4_OID, &[1], |w| {
        w.int4_field(1).int4_field(2);
    });
    let (result, _) = decode_field(&int4_array(), w.as_bytes());
    assert!(matches!(
        result.unwrap_err().kind(),
        ErrorKind::LengthMismatch { .. }
    ));
}

#[test]
fn test_nested_text_array() {
    let decoder = resolve(
        &TypeDescriptor::array_of(TypeDescriptor::new("textrecv")),
        &UserOptions::default(),
    );
    let mut w = WireWriter::new();
    w.array_field(TEXT_OID, &[2], |w| {
        w.text_field("a").text_field("bc");
    });
    let (_, sink) = decode_field(&decoder, w.as_bytes());
    assert_eq!(
        sink.element_sink().unwrap().values(),
        vec![Recorded::Text("a".into()), Recorded::Text("bc".into())]
    );
}

#[test]
fn test_int2vector() {
    let mut w = WireWriter::new();
    w.array_field(21, &[2], |w| {
        w.int2_field(1).int2_field(3);
    });
    let (result, sink) = decode_field(&decoder_for("int2vectorrecv"), w.as_bytes());
    assert_eq!(result.unwrap(), w.len());
    assert_eq!(
        sink.element_sink().unwrap().values(),
        vec![Recorded::Int16(1), Recorded::Int16(3)]
    );
}

#[test]
fn test_record() {
    let mut w = WireWriter::new();
    w.record_field(2, |w| {
        w.raw_u32(INT4_OID).int4_field(7);
        w.raw_u32(TEXT_OID).text_field("seven");
    });
    let (result, sink) = decode_field(&two_field_record(), w.as_bytes());
    assert_eq!(result.unwrap(), w.len());
    assert_eq!(sink.events, vec![SinkEvent::BeginRecord, SinkEvent::EndRecord]);
    assert_eq!(sink.field_sink(0).unwrap().values(), vec![Recorded::Int32(7)]);
    assert_eq!(
        sink.field_sink(1).unwrap().values(),
        vec![Recorded::Text("seven".into())]
    );
}

#[test]
fn test_record_field_count_mismatch() {
    let mut w = WireWriter::new();
    w.record_field(3, |w| {
        w.raw_u32(INT4_OID).int4_field(7);
        w.raw_u32(TEXT_OID).text_field("seven");
        w.raw_u32(INT4_OID).int4_field(8);
    });
    let (result, sink) = decode_field(&two_field_record(), w.as_bytes());
    assert!(matches!(
        result.unwrap_err().kind(),
        ErrorKind::FieldCountMismatch {
            expected: 2,
            actual: 3
        }
    ));
    assert!(sink.is_untouched());
}

#[test]
fn test_record_with_null_field_and_resolved_descriptor() {
    let desc = TypeDescriptor::record(vec![
        ColumnDescriptor::new("a", TypeDescriptor::new("int8recv")),
        ColumnDescriptor::new("b", TypeDescriptor::new("float8recv")),
    ]);
    let decoder = resolve(&desc, &UserOptions::default());
    let mut w = WireWriter::new();
    w.record_field(2, |w| {
        w.raw_u32(20).null();
        w.raw_u32(701).float8_field(0.5);
    });
    let (_, sink) = decode_field(&decoder, w.as_bytes());
    assert_eq!(sink.field_sink(0).unwrap().events, vec![SinkEvent::Null]);
    assert_eq!(sink.field_sink(1).unwrap().values(), vec![Recorded::Float64(0.5)]);
}

#[test]
fn test_box() {
    let mut w = WireWriter::new();
    w.nested(|w| {
        w.raw_f64(3.0).raw_f64(4.0).raw_f64(1.0).raw_f64(2.0);
    });
    let (result, sink) = decode_field(&decoder_for("box_recv"), w.as_bytes());
    assert_eq!(result.unwrap(), 36);
    assert_eq!(sink.events, vec![SinkEvent::BeginRecord, SinkEvent::EndRecord]);
    for (i, expected) in [3.0, 4.0, 1.0, 2.0].into_iter().enumerate() {
        assert_eq!(
            sink.field_sink(i).unwrap().values(),
            vec![Recorded::Float64(expected)]
        );
    }
}

#[test]
fn test_point_and_circle() {
    let mut w = WireWriter::new();
    w.nested(|w| {
        w.raw_f64(1.5).raw_f64(-2.5);
    });
    let (_, sink) = decode_field(&decoder_for("point_recv"), w.as_bytes());
    assert_eq!(sink.field_sink(1).unwrap().values(), vec![Recorded::Float64(-2.5)]);

    let mut w = WireWriter::new();
    w.nested(|w| {
        w.raw_f64(0.0).raw_f64(0.0).raw_f64(10.0);
    });
    let (_, sink) = decode_field(&decoder_for("circle_recv"), w.as_bytes());
    assert_eq!(sink.field_sink(2).unwrap().values(), vec![Recorded::Float64(10.0)]);

    // A point body on a circle column.
    let mut w = WireWriter::new();
    w.nested(|w| {
        w.raw_f64(1.0).raw_f64(2.0);
    });
    let (result, sink) = decode_field(&decoder_for("circle_recv"), w.as_bytes());
    assert!(result.is_err());
    assert!(sink.is_untouched());
}

#[test]
fn test_inet() {
    let mut w = WireWriter::new();
    w.field(&[2, 32, 0, 4, 192, 168, 1, 1]);
    let (result, sink) = decode_field(&decoder_for("inet_recv"), w.as_bytes());
    assert_eq!(result.unwrap(), 12);
    assert_eq!(sink.events, vec![SinkEvent::BeginRecord, SinkEvent::EndRecord]);
    assert_eq!(sink.field_sink(0).unwrap().values(), vec![Recorded::UInt8(2)]);
    assert_eq!(sink.field_sink(1).unwrap().values(), vec![Recorded::UInt8(32)]);
    assert_eq!(sink.field_sink(2).unwrap().values(), vec![Recorded::Bool(false)]);
    assert_eq!(
        sink.field_sink(3).unwrap().values(),
        vec![Recorded::Bytes(vec![192, 168, 1, 1])]
    );
}

#[test]
fn test_cidr_v6() {
    let mut body = vec![3, 64, 1, 16];
    body.extend([0x20, 0x01, 0x0d, 0xb8]);
    body.extend([0; 12]);
    let mut w = WireWriter::new();
    w.field(&body);
    let (result, sink) = decode_field(&decoder_for("cidr_recv"), w.as_bytes());
    assert_eq!(result.unwrap(), 4 + 20);
    assert_eq!(sink.field_sink(2).unwrap().values(), vec![Recorded::Bool(true)]);
    let Recorded::Bytes(addr) = &sink.field_sink(3).unwrap().values()[0] else {
        panic!("expected address bytes");
    };
    assert_eq!(addr.len(), 16);
}

#[test]
fn test_inet_address_length_mismatch() {
    // nb says 4, only 3 address bytes follow.
    let mut w = WireWriter::new();
    w.field(&[2, 32, 0, 4, 10, 0, 0]);
    let (result, sink) = decode_field(&decoder_for("inet_recv"), w.as_bytes());
    assert!(matches!(
        result.unwrap_err().kind(),
        ErrorKind::TruncatedBuffer { .. }
    ));
    assert!(sink.is_untouched());
}

#[test]
fn test_tid() {
    let mut w = WireWriter::new();
    w.nested(|w| {
        w.raw_u32(u32::MAX).raw_u16(7);
    });
    let (result, sink) = decode_field(&decoder_for("tidrecv"), w.as_bytes());
    assert_eq!(result.unwrap(), 10);
    assert_eq!(
        sink.field_sink(0).unwrap().values(),
        vec![Recorded::Int64(u32::MAX as i64)]
    );
    assert_eq!(sink.field_sink(1).unwrap().values(), vec![Recorded::Int32(7)]);
}

#[test]
fn test_null_composites() {
    let mut w = WireWriter::new();
    w.null();
    for decoder in [
        int4_array(),
        two_field_record(),
        decoder_for("box_recv"),
        decoder_for("inet_recv"),
    ] {
        let (result, sink) = decode_field(&decoder, w.as_bytes());
        assert_eq!(result.unwrap(), 4);
        assert_eq!(sink.events, vec![SinkEvent::Null]);
        assert!(sink.element_sink().is_none());
        assert!(sink.field_sink(0).is_none());
    }
}
