use pgarrow_common::error::ErrorKind;
use pgarrow_testkit::WireWriter;

use crate::{
    field_decoder::FieldDecoder,
    options::UserOptions,
    type_desc::{ColumnDescriptor, TypeDescriptor},
};

use super::recording_sink::{decode_field, decoder_for, resolve};

/// One well-formed field per decoder family.
fn samples() -> Vec<(&'static str, FieldDecoder, Vec<u8>)> {
    let mut samples = Vec::new();
    let mut add = |name, decoder, write: &dyn Fn(&mut WireWriter)| {
        let mut w = WireWriter::new();
        write(&mut w);
        samples.push((name, decoder, w.into_bytes()));
    };

    add("int8", decoder_for("int8recv"), &|w| {
        w.int8_field(-1);
    });
    add("text", decoder_for("textrecv"), &|w| {
        w.text_field("truncated");
    });
    add("interval", decoder_for("interval_recv"), &|w| {
        w.nested(|w| {
            w.raw_i64(1).raw_i32(2).raw_i32(3);
        });
    });
    add("jsonb", decoder_for("jsonb_recv"), &|w| {
        w.nested(|w| {
            w.raw_u8(1).raw_bytes(b"[]");
        });
    });
    add("numeric", decoder_for("numeric_recv"), &|w| {
        w.nested(|w| {
            w.raw_i16(2).raw_i16(0).raw_u16(0).raw_u16(4);
            w.raw_i16(12).raw_i16(3400);
        });
    });
    add(
        "array",
        resolve(
            &TypeDescriptor::array_of(TypeDescriptor::new("int2recv")),
            &UserOptions::default(),
        ),
        &|w| {
            w.array_field(21, &[2], |w| {
                w.int2_field(1).int2_field(2);
            });
        },
    );
    add(
        "record",
        resolve(
            &TypeDescriptor::record(vec![ColumnDescriptor::new(
                "v",
                TypeDescriptor::new("float4recv"),
            )]),
            &UserOptions::default(),
        ),
        &|w| {
            w.record_field(1, |w| {
                w.raw_u32(700).float4_field(1.0);
            });
        },
    );
    add("lseg", decoder_for("lseg_recv"), &|w| {
        w.nested(|w| {
            w.raw_f64(0.0).raw_f64(1.0).raw_f64(2.0).raw_f64(3.0);
        });
    });
    add("inet", decoder_for("inet_recv"), &|w| {
        w.field(&[2, 24, 1, 4, 10, 1, 2, 0]);
    });
    add("tid", decoder_for("tidrecv"), &|w| {
        w.nested(|w| {
            w.raw_u32(1).raw_u16(2);
        });
    });
    samples
}

#[test]
fn test_every_prefix_of_a_field_is_truncated() {
    for (name, decoder, bytes) in samples() {
        let (result, sink) = decode_field(&decoder, &bytes);
        assert_eq!(result.unwrap(), bytes.len(), "{name}");
        assert!(!sink.is_untouched(), "{name}");

        for cut in 0..bytes.len() {
            let (result, sink) = decode_field(&decoder, &bytes[..cut]);
            let err = result.unwrap_err();
            assert!(
                matches!(err.kind(), ErrorKind::TruncatedBuffer { .. }),
                "{name} cut at {cut}: {err}"
            );
            assert!(sink.is_untouched(), "{name} cut at {cut}");
        }
    }
}

#[test]
fn test_array_with_fewer_elements_than_declared() {
    let decoder = resolve(
        &TypeDescriptor::array_of(TypeDescriptor::new("int4recv")),
        &UserOptions::default(),
    );
    let mut w = WireWriter::new();
    w.array_field(23, &[3], |w| {
        w.int4_field(1);
    });
    let (result, sink) = decode_field(&decoder, w.as_bytes());
    assert!(matches!(
        result.unwrap_err().kind(),
        ErrorKind::TruncatedBuffer { .. }
    ));
    assert!(sink.is_untouched());
}

#[test]
fn test_numeric_with_missing_digits() {
    let mut w = WireWriter::new();
    w.nested(|w| {
        w.raw_i16(3).raw_i16(0).raw_u16(0).raw_u16(0);
        w.raw_i16(1);
    });
    let (result, sink) = decode_field(&decoder_for("numeric_recv"), w.as_bytes());
    assert!(matches!(
        result.unwrap_err().kind(),
        ErrorKind::TruncatedBuffer { .. }
    ));
    assert!(sink.is_untouched());
}

#[test]
fn test_fixed_width_body_too_short() {
    // An int8 field declaring only 4 bytes.
    let mut w = WireWriter::new();
    w.int4_field(1);
    let (result, sink) = decode_field(&decoder_for("int8recv"), w.as_bytes());
    assert!(result.is_err());
    assert!(sink.is_untouched());
}

#[test]
fn test_array_element_cut_short_inside_the_field() {
    let decoder = resolve(
        &TypeDescriptor::array_of(TypeDescriptor::new("int4recv")),
        &UserOptions::default(),
    );
    // The second element declares 4 bytes, the array body holds only 2 more.
    let mut w = WireWriter::new();
    w.array_field(23, &[2], |w| {
        w.int4_field(7);
        w.raw_i32(4).raw_u16(9);
    });
    let (result, sink) = decode_field(&decoder, w.as_bytes());
    assert!(matches!(
        result.unwrap_err().kind(),
        ErrorKind::TruncatedBuffer { .. }
    ));
    assert!(sink.is_untouched());
}

#[test]
fn test_record_field_cut_short_inside_the_field() {
    let decoder = resolve(
        &TypeDescriptor::record(vec![
            ColumnDescriptor::new("a", TypeDescriptor::new("int4recv")),
            ColumnDescriptor::new("b", TypeDescriptor::new("int8recv")),
        ]),
        &UserOptions::default(),
    );
    let mut w = WireWriter::new();
    w.record_field(2, |w| {
        w.raw_u32(23).int4_field(1);
        w.raw_u32(20).raw_i32(8).raw_i32(0);
    });
    let (result, sink) = decode_field(&decoder, w.as_bytes());
    assert!(matches!(
        result.unwrap_err().kind(),
        ErrorKind::TruncatedBuffer { .. }
    ));
    assert!(sink.is_untouched());
}
