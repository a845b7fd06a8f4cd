//! Schema string parser for command-line column definitions

use anyhow::{Context, Result, anyhow};
use pgarrow_decoder::{ColumnDescriptor, TypeDescriptor};
use std::collections::HashMap;

/// Largest precision the server accepts in a numeric type modifier.
const MAX_NUMERIC_PRECISION: i32 = 1000;

/// Parse a schema string into column descriptors
///
/// Format: "(column1: type1, column2: type2, ...)"
///
/// Types are server type names (`int4`, `text`, `timestamptz`, ...) or their
/// common SQL aliases (`integer`, `bigint`, `varchar`, ...). A `[]` suffix
/// declares an array of the type, and `numeric(p, s)` declares the numeric
/// precision and scale.
pub fn parse_schema_string(schema_str: &str) -> Result<Vec<ColumnDescriptor>> {
    let schema_str = schema_str.trim();

    if !schema_str.starts_with('(') || !schema_str.ends_with(')') {
        return Err(anyhow!(
            "Schema string must be enclosed in parentheses: (column1: type1, column2: type2, ...)"
        ));
    }

    let inner = schema_str[1..schema_str.len() - 1].trim();
    if inner.is_empty() {
        return Err(anyhow!("Schema string cannot be empty"));
    }

    let type_map = build_type_mapping();

    let mut columns = Vec::new();
    for column_def in split_top_level(inner) {
        let column_def = column_def.trim();
        if column_def.is_empty() {
            continue;
        }

        let column = parse_column_definition(column_def, &type_map)
            .with_context(|| format!("Failed to parse column definition: '{column_def}'"))?;
        columns.push(column);
    }

    if columns.is_empty() {
        return Err(anyhow!("Schema must contain at least one column"));
    }

    Ok(columns)
}

/// Splits at commas outside of parentheses, so `numeric(10, 2)` stays whole.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn parse_column_definition(
    column_def: &str,
    type_map: &HashMap<&'static str, &'static str>,
) -> Result<ColumnDescriptor> {
    let (name, type_str) = column_def
        .split_once(':')
        .ok_or_else(|| anyhow!("Column definition must be in format 'name: type'"))?;

    let name = name.trim();
    if !is_valid_column_name(name) {
        return Err(anyhow!("Invalid column name: '{}'", name));
    }

    let type_desc = parse_type(type_str.trim(), type_map)?;
    Ok(ColumnDescriptor::new(name, type_desc))
}

fn parse_type(
    type_str: &str,
    type_map: &HashMap<&'static str, &'static str>,
) -> Result<TypeDescriptor> {
    if let Some(element) = type_str.strip_suffix("[]") {
        // Arrays of any dimensionality share one array type.
        let element = parse_type(element.trim_end().trim_end_matches("[]"), type_map)?;
        let name = format!("_{}", element.name);
        return Ok(TypeDescriptor::array_of(element).with_name(name));
    }

    let lower = type_str.to_lowercase();
    if let Some(args) = lower
        .strip_prefix("numeric")
        .or_else(|| lower.strip_prefix("decimal"))
        .map(str::trim)
        .filter(|rest| rest.starts_with('('))
    {
        let (precision, scale) = parse_numeric_modifier(args)?;
        return Ok(TypeDescriptor::new("numeric_recv")
            .with_name("numeric")
            .with_typmod(((precision << 16) | scale) + 4));
    }

    let receive = type_map
        .get(lower.as_str())
        .ok_or_else(|| anyhow!("Unknown column type '{}'", type_str))?;
    Ok(TypeDescriptor::new(*receive).with_name(lower))
}

/// Parses `(p)` or `(p, s)`.
fn parse_numeric_modifier(args: &str) -> Result<(i32, i32)> {
    let inner = args
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| anyhow!("Malformed numeric modifier '{}'", args))?;
    let mut parts = inner.split(',').map(str::trim);
    let precision: i32 = parts
        .next()
        .unwrap_or_default()
        .parse()
        .with_context(|| format!("Invalid numeric precision in '{args}'"))?;
    let scale: i32 = match parts.next() {
        Some(scale) => scale
            .parse()
            .with_context(|| format!("Invalid numeric scale in '{args}'"))?,
        None => 0,
    };
    let valid = parts.next().is_none()
        && (1..=MAX_NUMERIC_PRECISION).contains(&precision)
        && (0..=precision).contains(&scale);
    if !valid {
        return Err(anyhow!("Invalid numeric modifier '{}'", args));
    }
    Ok((precision, scale))
}

fn build_type_mapping() -> HashMap<&'static str, &'static str> {
    let mut map = HashMap::new();

    map.insert("bool", "boolrecv");
    map.insert("boolean", "boolrecv");
    map.insert("char", "charrecv");

    map.insert("int2", "int2recv");
    map.insert("smallint", "int2recv");
    map.insert("int4", "int4recv");
    map.insert("int", "int4recv");
    map.insert("integer", "int4recv");
    map.insert("oid", "oidrecv");
    map.insert("int8", "int8recv");
    map.insert("bigint", "int8recv");
    map.insert("money", "cash_recv");
    map.insert("pg_lsn", "pg_lsn_recv");

    map.insert("float4", "float4recv");
    map.insert("real", "float4recv");
    map.insert("float8", "float8recv");
    map.insert("double precision", "float8recv");
    map.insert("numeric", "numeric_recv");
    map.insert("decimal", "numeric_recv");

    map.insert("date", "date_recv");
    map.insert("time", "time_recv");
    map.insert("timetz", "timetz_recv");
    map.insert("timestamp", "timestamp_recv");
    map.insert("timestamptz", "timestamptz_recv");
    map.insert("interval", "interval_recv");

    map.insert("text", "textrecv");
    map.insert("varchar", "varcharrecv");
    map.insert("bpchar", "bpcharrecv");
    map.insert("name", "namerecv");
    map.insert("json", "json_recv");
    map.insert("xml", "xml_recv");
    map.insert("jsonb", "jsonb_recv");

    map.insert("bytea", "bytearecv");
    map.insert("uuid", "uuid_recv");
    map.insert("bit", "bit_recv");
    map.insert("varbit", "varbit_recv");
    map.insert("macaddr", "macaddr_recv");
    map.insert("macaddr8", "macaddr8_recv");

    map.insert("point", "point_recv");
    map.insert("lseg", "lseg_recv");
    map.insert("line", "line_recv");
    map.insert("box", "box_recv");
    map.insert("circle", "circle_recv");

    map.insert("inet", "inet_recv");
    map.insert("cidr", "cidr_recv");
    map.insert("tid", "tidrecv");
    map.insert("int2vector", "int2vectorrecv");
    map.insert("oidvector", "oidvectorrecv");

    map
}

fn is_valid_column_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }

    let first_char = name.chars().next().unwrap_or_default();
    if !first_char.is_alphabetic() && first_char != '_' {
        return false;
    }

    name.chars().all(|c| c.is_alphanumeric() || c == '_')
}
