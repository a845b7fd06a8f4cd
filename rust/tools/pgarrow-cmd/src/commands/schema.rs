//! Schema command implementation

use anyhow::{Context, Result};
use arrow_schema::Schema;
use pgarrow_decoder::TableDecoder;

use crate::{
    SchemaArgs,
    commands::{load_columns, load_options},
};

/// Run the schema command
pub fn run(schema: SchemaArgs) -> Result<()> {
    let resolved = resolve_schema(&schema)?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

/// Resolves the column list into the Arrow schema of the decoded batches.
pub fn resolve_schema(schema: &SchemaArgs) -> Result<Schema> {
    let columns = load_columns(schema)?;
    let options = load_options(schema)?;
    let decoder = TableDecoder::try_new(&columns, &options)
        .with_context(|| "Failed to resolve the column schema")?;
    Ok(decoder.schema().as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::resolve_schema;
    use crate::SchemaArgs;
    use arrow_schema::DataType;
    use std::io::Write;

    fn args(schema_string: &str) -> SchemaArgs {
        SchemaArgs {
            schema: None,
            schema_string: Some(schema_string.to_string()),
            options: None,
            string_as_dictionary: false,
        }
    }

    #[test]
    fn test_resolve_from_schema_string() {
        let schema = resolve_schema(&args("(id: int8, name: text, tags: text[])")).unwrap();
        assert_eq!(schema.fields().len(), 3);
        assert_eq!(schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(schema.field(1).data_type(), &DataType::LargeUtf8);
        assert!(matches!(schema.field(2).data_type(), DataType::LargeList(_)));
    }

    #[test]
    fn test_resolve_with_options_file() {
        let mut options = tempfile::NamedTempFile::new().unwrap();
        write!(options, r#"{{"default_numeric_precision": 30, "default_numeric_scale": 4}}"#)
            .unwrap();

        let mut args = args("(amount: numeric, label: text)");
        args.options = Some(options.path().to_string_lossy().into_owned());
        args.string_as_dictionary = true;
        let schema = resolve_schema(&args).unwrap();
        assert_eq!(schema.field(0).data_type(), &DataType::Decimal128(30, 4));
        assert!(matches!(schema.field(1).data_type(), DataType::Dictionary(_, _)));
    }

    #[test]
    fn test_resolve_from_schema_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "pos", "receive": "point_recv"}}, {{"name": "addr", "receive": "inet_recv"}}]"#
        )
        .unwrap();

        let args = SchemaArgs {
            schema: Some(file.path().to_string_lossy().into_owned()),
            schema_string: None,
            options: None,
            string_as_dictionary: false,
        };
        let schema = resolve_schema(&args).unwrap();
        assert_eq!(schema.field(0).name(), "pos");
        assert!(matches!(schema.field(1).data_type(), DataType::Struct(f) if f.len() == 4));
    }

    #[test]
    fn test_unknown_type() {
        let err = resolve_schema(&args("(g: geometry)")).unwrap_err();
        assert!(err.to_string().contains("geometry"), "{err}");
    }
}
