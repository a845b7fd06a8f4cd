use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn truncated(needed: usize, remaining: usize) -> Error {
        ErrorKind::TruncatedBuffer { needed, remaining }.into()
    }

    pub fn length_mismatch(declared: usize, consumed: usize) -> Error {
        ErrorKind::LengthMismatch { declared, consumed }.into()
    }

    pub fn field_count_mismatch(expected: usize, actual: i64) -> Error {
        ErrorKind::FieldCountMismatch { expected, actual }.into()
    }

    pub fn unsupported_type(receive: impl Into<String>) -> Error {
        ErrorKind::UnsupportedType {
            receive: receive.into(),
        }
        .into()
    }

    pub fn invalid_format(element: impl Into<String>, message: impl Into<String>) -> Error {
        ErrorKind::InvalidFormat {
            element: element.into(),
            message: message.into(),
        }
        .into()
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        ErrorKind::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
        .into()
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        ErrorKind::InvalidOperation { name: name.into() }.into()
    }

    pub fn sink_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Error {
        ErrorKind::SinkMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
        .into()
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        ErrorKind::Io {
            context: context.into(),
            source,
        }
        .into()
    }

    pub fn arrow<E>(context: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ErrorKind::Arrow {
            context: context.into(),
            source: Box::new(source),
        }
        .into()
    }

    /// Returns `true` if the error was raised while resolving a column schema,
    /// as opposed to while decoding row data.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UnsupportedType { .. } | ErrorKind::InvalidArgument { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("truncated buffer: {needed} bytes needed, {remaining} remaining")]
    TruncatedBuffer { needed: usize, remaining: usize },

    #[error("field length mismatch: declared {declared} bytes, consumed {consumed}")]
    LengthMismatch { declared: usize, consumed: usize },

    #[error("field count mismatch: expected {expected}, found {actual}")]
    FieldCountMismatch { expected: usize, actual: i64 },

    #[error("unsupported type: no decoder registered for '{receive}'")]
    UnsupportedType { receive: String },

    #[error("invalid wire format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("column sink mismatch: expected {expected}, got {actual}")]
    SinkMismatch { expected: String, actual: String },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    #[error("Arrow error: {context}")]
    Arrow {
        context: String,
        source: StdErrorBoxed,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("", e)
    }
}

impl From<arrow_schema::ArrowError> for Error {
    fn from(e: arrow_schema::ArrowError) -> Self {
        Error::arrow("", e)
    }
}
