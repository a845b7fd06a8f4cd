use std::sync::Arc;

use arrow_array::{
    Array,
    cast::AsArray,
    types::{Decimal128Type, Int32Type, Int64Type, TimestampMicrosecondType},
};
use arrow_schema::{DataType, Field, Fields, TimeUnit};

use crate::{ArrayBuilder, ColumnBuilder, DictionaryStringBuilder, Int64Builder};

fn person_type() -> DataType {
    DataType::Struct(Fields::from(vec![
        Field::new("id", DataType::Int64, true),
        Field::new(
            "tags",
            DataType::LargeList(Arc::new(Field::new("item", DataType::LargeUtf8, true))),
            true,
        ),
    ]))
}

#[test]
fn test_column_builder_data_type_round_trip() {
    let data_type = person_type();
    let builder = ColumnBuilder::try_new(&data_type).unwrap();
    assert_eq!(builder.kind_name(), "Struct");
    assert_eq!(builder.data_type(), data_type);

    let tz = DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into()));
    assert_eq!(ColumnBuilder::try_new(&tz).unwrap().data_type(), tz);

    let dec = DataType::Decimal128(12, 3);
    assert_eq!(ColumnBuilder::try_new(&dec).unwrap().data_type(), dec);
}

#[test]
fn test_column_builder_rejects_unknown_type() {
    assert!(ColumnBuilder::try_new(&DataType::Utf8View).is_err());
    assert!(ColumnBuilder::try_new(&DataType::Time64(TimeUnit::Nanosecond)).is_err());
}

#[test]
fn test_struct_null_entries_fill_children() {
    let mut builder = ColumnBuilder::try_new(&person_type()).unwrap();
    let ColumnBuilder::Struct(person) = &mut builder else {
        panic!("struct builder expected");
    };

    let ColumnBuilder::Int64(id) = person.field(0).unwrap() else {
        panic!("id");
    };
    id.push(1).unwrap();
    let ColumnBuilder::List(tags) = person.field(1).unwrap() else {
        panic!("tags");
    };
    let ColumnBuilder::String(tag) = tags.item() else {
        panic!("tag");
    };
    tag.push("a").unwrap();
    tag.push("b").unwrap();
    tags.finish_list();
    person.finish_struct();

    person.finish_null_struct();

    let ColumnBuilder::Int64(id) = person.field(0).unwrap() else {
        panic!("id");
    };
    id.push(3).unwrap();
    person.finish_struct();

    let array = builder.build();
    let array = array.as_struct();
    assert_eq!(array.len(), 3);
    assert!(array.is_null(1));

    let ids = array.column(0).as_primitive::<Int64Type>();
    assert_eq!(ids.len(), 3);
    assert_eq!(ids.value(0), 1);
    assert!(ids.is_null(1));
    assert_eq!(ids.value(2), 3);

    let tags = array.column(1).as_list::<i64>();
    assert_eq!(tags.len(), 3);
    assert_eq!(tags.value_offsets(), &[0, 2, 2, 2]);
    assert!(tags.is_null(2));
}

#[test]
fn test_builder_resets_after_build() {
    let mut builder = Int64Builder::default();
    builder.push(1).unwrap();
    builder.push_null();
    assert_eq!(builder.build().len(), 2);
    assert_eq!(builder.next_pos(), 0);
    builder.push(7).unwrap();
    let array = builder.build();
    assert_eq!(array.as_primitive::<Int64Type>().values(), &[7]);
}

#[test]
fn test_move_to_pos_fills_gap() {
    let mut builder = ColumnBuilder::try_new(&DataType::Timestamp(
        TimeUnit::Microsecond,
        Some("UTC".into()),
    ))
    .unwrap();
    builder.move_to_pos(2);
    let ColumnBuilder::Timestamp(ts) = &mut builder else {
        panic!("timestamp");
    };
    ts.push(10).unwrap();
    let array = builder.build();
    let array = array.as_primitive::<TimestampMicrosecondType>();
    assert_eq!(array.len(), 3);
    assert_eq!(array.null_count(), 2);
    assert_eq!(array.value(2), 10);
    assert_eq!(array.timezone(), Some("UTC"));
}

#[test]
fn test_dictionary_builder() {
    let mut builder = DictionaryStringBuilder::default();
    builder.push("red").unwrap();
    builder.push("green").unwrap();
    builder.push_null();
    builder.push("red").unwrap();
    let array = builder.build();
    let dict = array.as_dictionary::<Int32Type>();
    assert_eq!(dict.len(), 4);
    assert_eq!(dict.values().len(), 2);
    assert_eq!(dict.keys().value(0), dict.keys().value(3));
    assert!(dict.is_null(2));
}

#[test]
fn test_decimal_builder() {
    let mut builder = ColumnBuilder::try_new(&DataType::Decimal128(10, 2)).unwrap();
    let ColumnBuilder::Decimal128(dec) = &mut builder else {
        panic!("decimal");
    };
    dec.push(12345).unwrap();
    dec.push_null();
    let array = builder.build();
    let array = array.as_primitive::<Decimal128Type>();
    assert_eq!(array.precision(), 10);
    assert_eq!(array.scale(), 2);
    assert_eq!(array.value_as_string(0), "123.45");
}

#[test]
fn test_empty_struct() {
    let mut builder = ColumnBuilder::try_new(&DataType::Struct(Fields::empty())).unwrap();
    builder.push_null();
    let ColumnBuilder::Struct(s) = &mut builder else {
        panic!("struct");
    };
    s.finish_struct();
    let array = builder.build();
    assert_eq!(array.len(), 2);
    assert!(array.is_null(0));
    assert!(array.is_valid(1));
}
