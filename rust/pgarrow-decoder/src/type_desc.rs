//! Server-reported column type metadata.

use serde::{Deserialize, Serialize};

/// Type modifier value meaning "no modifier declared".
pub const NO_TYPMOD: i32 = -1;

fn no_typmod() -> i32 {
    NO_TYPMOD
}

/// Describes a server type as reported at schema discovery time.
///
/// `receive` is the name of the server's binary input routine for the type
/// (`pg_type.typreceive`, e.g. `int4recv`) and is what the decoder dispatches on.
/// Array types carry their `element` descriptor, composite types their ordered
/// `fields`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    #[serde(default)]
    pub oid: u32,
    #[serde(default, rename = "type_name", skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub receive: String,
    #[serde(default = "no_typmod")]
    pub typmod: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<TypeDescriptor>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ColumnDescriptor>,
}

impl TypeDescriptor {
    pub fn new(receive: impl Into<String>) -> TypeDescriptor {
        TypeDescriptor {
            oid: 0,
            name: String::new(),
            receive: receive.into(),
            typmod: NO_TYPMOD,
            element: None,
            fields: Vec::new(),
        }
    }

    /// Descriptor of a one-or-more dimensional array of `element`.
    pub fn array_of(element: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor {
            element: Some(Box::new(element)),
            ..TypeDescriptor::new("array_recv")
        }
    }

    /// Descriptor of a composite type with the given named fields.
    pub fn record(fields: Vec<ColumnDescriptor>) -> TypeDescriptor {
        TypeDescriptor {
            fields,
            ..TypeDescriptor::new("record_recv")
        }
    }

    pub fn with_oid(mut self, oid: u32) -> Self {
        self.oid = oid;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_typmod(mut self, typmod: i32) -> Self {
        self.typmod = typmod;
        self
    }

    /// Declared `numeric(precision, scale)` modifier, if any.
    ///
    /// The server stores it as `((precision << 16) | scale) + 4`, with the scale
    /// kept in the low 11 bits as a signed value.
    pub fn numeric_modifier(&self) -> Option<(i32, i32)> {
        if self.typmod < 4 {
            return None;
        }
        let tm = self.typmod - 4;
        let precision = (tm >> 16) & 0xffff;
        let scale = ((tm & 0x7ff) ^ 1024) - 1024;
        Some((precision, scale))
    }
}

/// A named column (or composite field) and its type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub type_desc: TypeDescriptor,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, type_desc: TypeDescriptor) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.into(),
            type_desc,
        }
    }
}
