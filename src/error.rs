use std::fmt;

use thiserror::Error;

/// Which kind of slot failed to resolve on an otherwise-present type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SlotKind {
    Attribute,
    Child,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute => write!(f, "attribute"),
            Self::Child => write!(f, "child"),
        }
    }
}

/// Errors raised while resolving the node type catalog against a schema
/// source.
///
/// Both variants signal version skew between the loaded schema and the
/// catalog the registry was built against. Neither is recoverable at the
/// point of detection: initialization aborts as a whole, so no partially
/// populated registry is ever observable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A type or root element the catalog expects is absent from the schema.
    #[error("schema does not define expected component `{name}`")]
    SchemaMismatch { name: &'static str },

    /// A type resolved, but one of its expected attribute or child slots
    /// did not.
    #[error("type `{type_name}` is missing expected {kind} `{name}`")]
    SlotMismatch {
        type_name: &'static str,
        kind: SlotKind,
        name: &'static str,
    },
}
