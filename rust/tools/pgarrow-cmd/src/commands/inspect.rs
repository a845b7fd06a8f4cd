//! Inspect command implementation

use anyhow::{Context, Result};
use pgarrow_decoder::{ByteCursor, CopyStreamReader, RowSource};
use serde::Serialize;
use std::{collections::BTreeMap, fs, io::Read};

use crate::{commands::open_input, utils};

#[derive(Debug, Serialize)]
pub struct InspectSummary {
    file_size: u64,
    file_size_display: String,
    header: HeaderInfo,
    tuples: TupleInfo,
}

#[derive(Debug, Serialize)]
struct HeaderInfo {
    flags: u32,
    has_oids: bool,
    extension_length: usize,
}

#[derive(Debug, Default, Serialize)]
struct TupleInfo {
    count: u64,
    /// Number of tuples per field count.
    field_counts: BTreeMap<i16, u64>,
    null_fields: u64,
    total_bytes: u64,
    max_tuple_bytes: usize,
    max_field_bytes: usize,
}

/// Run the inspect command
pub fn run(input: String) -> Result<()> {
    println!("Inspecting COPY file: {}", input);
    let file_size = fs::metadata(&input)
        .with_context(|| format!("Failed to read metadata of {input}"))?
        .len();
    let summary = inspect(open_input(&input)?, file_size)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Reads a whole COPY stream and collects its header and tuple statistics.
pub fn inspect(reader: impl Read, file_size: u64) -> Result<InspectSummary> {
    let mut reader =
        CopyStreamReader::new(reader).with_context(|| "Failed to read COPY header")?;
    let header = HeaderInfo {
        flags: reader.header().flags,
        has_oids: reader.header().has_oids(),
        extension_length: reader.header().extension.len(),
    };

    let mut tuples = TupleInfo::default();
    while let Some(row) = reader.next_row()? {
        tuples.count += 1;
        tuples.total_bytes += row.len() as u64;
        tuples.max_tuple_bytes = tuples.max_tuple_bytes.max(row.len());

        let mut cursor = ByteCursor::new(row);
        let field_count = cursor.read_i16()?;
        *tuples.field_counts.entry(field_count).or_default() += 1;
        for _ in 0..field_count {
            let len = cursor.read_i32()?;
            if len < 0 {
                tuples.null_fields += 1;
                continue;
            }
            cursor.read_bytes(len as usize)?;
            tuples.max_field_bytes = tuples.max_field_bytes.max(len as usize);
        }
    }
    log::debug!("inspected {} tuples", tuples.count);

    Ok(InspectSummary {
        file_size,
        file_size_display: utils::format_size(file_size),
        header,
        tuples,
    })
}

#[cfg(test)]
mod tests {
    use super::inspect;
    use pgarrow_testkit::{WireWriter, copy_file::copy_stream};

    #[test]
    fn test_inspect_summary() {
        let mut rows = Vec::new();
        for i in 0..4 {
            let mut w = WireWriter::new();
            w.row(2).int8_field(i).null();
            rows.push(w.into_bytes());
        }
        let mut w = WireWriter::new();
        w.row(1).text_field("a longer field");
        rows.push(w.into_bytes());

        let stream = copy_stream(&rows);
        let summary = inspect(stream.as_slice(), stream.len() as u64).unwrap();
        assert_eq!(summary.header.flags, 0);
        assert!(!summary.header.has_oids);
        assert_eq!(summary.tuples.count, 5);
        assert_eq!(summary.tuples.field_counts.get(&2), Some(&4));
        assert_eq!(summary.tuples.field_counts.get(&1), Some(&1));
        assert_eq!(summary.tuples.null_fields, 4);
        assert_eq!(summary.tuples.max_field_bytes, 14);
        assert_eq!(summary.tuples.max_tuple_bytes, 2 + 4 + 14);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["tuples"]["field_counts"]["2"], 4);
    }

    #[test]
    fn test_inspect_rejects_truncated_stream() {
        let mut w = WireWriter::new();
        w.row(1).int4_field(1);
        let stream = copy_stream([w.into_bytes()]);
        assert!(inspect(&stream[..stream.len() - 4], stream.len() as u64).is_err());
    }
}
