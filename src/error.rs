//! Error types for fixed-width decoding and encoding.

use std::io;

use thiserror::Error;

use crate::schema::FieldDescriptor;

/// A failure converting a single cell to or from its typed field value.
#[derive(Error, Debug)]
pub enum FieldError {
    /// The cell text is not a valid literal for the field's type.
    #[error("failed casting \"{value}\" to \"{field}:{ty}\": {reason}")]
    Cast {
        value: String,
        field: String,
        ty: String,
        reason: String,
    },

    /// The cell holds a valid number that does not fit the field's width.
    #[error("value {value} is too big for field {field}:{ty}")]
    Overflow {
        value: String,
        field: String,
        ty: String,
    },

    /// The field value could not be rendered as text.
    #[error("can't encode field {field}:{ty}: {reason}")]
    Encode {
        field: String,
        ty: String,
        reason: String,
    },
}

impl FieldError {
    pub(crate) fn cast(value: &str, field: &FieldDescriptor, reason: impl ToString) -> Self {
        FieldError::Cast {
            value: value.to_string(),
            field: field.name().to_string(),
            ty: field.type_label(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn overflow(value: impl ToString, field: &FieldDescriptor) -> Self {
        FieldError::Overflow {
            value: value.to_string(),
            field: field.name().to_string(),
            ty: field.type_label(),
        }
    }

    pub(crate) fn encode(field: &FieldDescriptor, reason: impl ToString) -> Self {
        FieldError::Encode {
            field: field.name().to_string(),
            ty: field.type_label(),
            reason: reason.to_string(),
        }
    }
}

/// Errors returned by the public decode and encode entry points.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The record type cannot back a table.
    #[error("value is not a sequence of records: {0}")]
    InvalidTarget(String),

    /// A data line does not have the header's logical length.
    #[error("wrong data length in line {line}: expected {expected} characters, got {actual}")]
    LineLength {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// A column name could not be compiled into a header pattern.
    #[error("{column} column parsing error: {source}")]
    Pattern {
        column: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// A cell failed to decode.
    #[error("error in line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: FieldError,
    },

    /// A field failed to render.
    #[error("error in row {row}: {source}")]
    Encode {
        row: usize,
        #[source]
        source: FieldError,
    },

    /// Reading the input failed.
    #[error("failed to read input: {0}")]
    Read(#[source] io::Error),

    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

impl CodecError {
    /// The 1-based input line this error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            CodecError::LineLength { line, .. } | CodecError::Decode { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The cell-level failure behind this error, if any.
    pub fn field_error(&self) -> Option<&FieldError> {
        match self {
            CodecError::Decode { source, .. } | CodecError::Encode { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldOptions};

    fn descriptor() -> FieldDescriptor {
        FieldDescriptor::new("Int8", FieldOptions::new(), FieldKind::Int { bits: 8 }, false)
    }

    #[test]
    fn test_cast_message() {
        let err = FieldError::cast("5.3", &descriptor(), "invalid digit found in string");
        assert_eq!(
            err.to_string(),
            r#"failed casting "5.3" to "Int8:i8": invalid digit found in string"#
        );
    }

    #[test]
    fn test_overflow_message() {
        let err = FieldError::overflow(5123, &descriptor());
        assert_eq!(err.to_string(), "value 5123 is too big for field Int8:i8");
    }

    #[test]
    fn test_line_accessor() {
        let err = CodecError::LineLength {
            line: 2,
            expected: 3,
            actual: 1,
        };
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("line 2"));
        assert!(err.field_error().is_none());

        let err = CodecError::Decode {
            line: 7,
            source: FieldError::overflow(300, &descriptor()),
        };
        assert_eq!(err.line(), Some(7));
        assert!(matches!(err.field_error(), Some(FieldError::Overflow { .. })));
    }
}
