//! Record type descriptions.
//!
//! A record type describes itself once per codec call as an ordered list of
//! fields. Each field knows its column name, its kind, whether it is
//! optional, and how to read and write itself on a record value.
//! [`Record::describe`] receives a builder already typed for the record, so
//! the accessor closures need no annotations:
//!
//! ```
//! use fixed_width::{FieldOptions, Record, SchemaBuilder};
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     zip: u32,
//! }
//!
//! impl Record for Person {
//!     fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
//!         schema
//!             .field("Name", |p| &p.name, |p| &mut p.name)
//!             .field_with(
//!                 "Zip",
//!                 |p| &p.zip,
//!                 |p| &mut p.zip,
//!                 FieldOptions::new().column("Postcode"),
//!             )
//!     }
//! }
//!
//! let schema = Person::schema();
//! assert_eq!(schema.column_names(), vec!["Name", "Postcode"]);
//! ```

use std::fmt;

use crate::error::{CodecError, FieldError};
use crate::value::FieldValue;

/// The closed set of field kinds the codec dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed integer of the given bit width.
    Int { bits: u32 },
    /// Unsigned integer of the given bit width.
    Uint { bits: u32 },
    /// Floating point number of the given bit width.
    Float { bits: u32 },
    Bool,
    Str,
    /// Date or timestamp; carries the Rust type name.
    Time(&'static str),
    /// Anything else, carried through JSON; carries the Rust type name.
    Other(&'static str),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Int { bits } => write!(f, "i{bits}"),
            FieldKind::Uint { bits } => write!(f, "u{bits}"),
            FieldKind::Float { bits } => write!(f, "f{bits}"),
            FieldKind::Bool => f.write_str("bool"),
            FieldKind::Str => f.write_str("String"),
            FieldKind::Time(name) | FieldKind::Other(name) => f.write_str(name),
        }
    }
}

/// Per-field overrides supplied when registering a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    column: Option<String>,
    alias: Option<String>,
    format: Option<String>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column name override. Takes precedence over `alias`.
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.column = Some(name.into());
        self
    }

    /// Secondary column name override, used when no `column` is set.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    /// Time format string in chrono `strftime` syntax.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Metadata for one field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    column: String,
    kind: FieldKind,
    optional: bool,
    format: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, options: FieldOptions, kind: FieldKind, optional: bool) -> Self {
        let name = name.into();
        let FieldOptions {
            column,
            alias,
            format,
        } = options;
        let column = column.or(alias).unwrap_or_else(|| name.clone());
        Self {
            name,
            column,
            kind,
            optional,
            format,
        }
    }

    /// The field's own name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column this field is read from and written to.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The declared time format, if any.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Human readable type, e.g. `i8` or `Option<i8>`.
    pub fn type_label(&self) -> String {
        if self.optional {
            format!("Option<{}>", self.kind)
        } else {
            self.kind.to_string()
        }
    }
}

type DecodeFn<R> = Box<dyn Fn(&mut R, &str, &FieldDescriptor) -> Result<(), FieldError>>;
type EncodeFn<R> = Box<dyn Fn(&R, &FieldDescriptor) -> Result<Option<String>, FieldError>>;

/// One registered field: its descriptor plus typed accessors.
pub struct Field<R> {
    descriptor: FieldDescriptor,
    decode: DecodeFn<R>,
    encode: EncodeFn<R>,
}

impl<R> Field<R> {
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// Parse trimmed cell text into this field of `record`.
    pub fn decode(&self, record: &mut R, raw: &str) -> Result<(), FieldError> {
        (self.decode)(record, raw, &self.descriptor)
    }

    /// Render this field of `record`. `None` means no value.
    pub fn encode(&self, record: &R) -> Result<Option<String>, FieldError> {
        (self.encode)(record, &self.descriptor)
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Ordered field list of a record type.
#[derive(Debug)]
pub struct Schema<R> {
    fields: Vec<Field<R>>,
}

impl<R: 'static> Schema<R> {
    pub fn builder() -> SchemaBuilder<R> {
        SchemaBuilder { fields: Vec::new() }
    }

    pub fn fields(&self) -> &[Field<R>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolved column names in field order. May contain repeats when
    /// several fields share a column.
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.descriptor.column()).collect()
    }

    /// Reject schemas that cannot describe a table row.
    pub(crate) fn ensure_usable(&self) -> Result<(), CodecError> {
        if self.fields.is_empty() {
            return Err(CodecError::InvalidTarget(format!(
                "{} declares no fields",
                std::any::type_name::<R>()
            )));
        }
        Ok(())
    }
}

/// Builder returned by [`Schema::builder`] and handed to
/// [`Record::describe`].
pub struct SchemaBuilder<R> {
    fields: Vec<Field<R>>,
}

impl<R: 'static> SchemaBuilder<R> {
    /// Register a field whose column name is its own name.
    pub fn field<T: FieldValue + 'static>(
        self,
        name: &str,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> Self {
        self.field_with(name, get, get_mut, FieldOptions::new())
    }

    /// Register a field with column name or format overrides.
    pub fn field_with<T: FieldValue + 'static>(
        mut self,
        name: &str,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
        options: FieldOptions,
    ) -> Self {
        let descriptor = FieldDescriptor::new(name, options, T::kind(), T::is_optional());
        self.fields.push(Field {
            descriptor,
            decode: Box::new(move |record: &mut R, raw: &str, field: &FieldDescriptor| {
                *get_mut(record) = T::decode(raw, field)?;
                Ok(())
            }),
            encode: Box::new(move |record: &R, field: &FieldDescriptor| get(record).encode(field)),
        });
        self
    }

    pub fn build(self) -> Schema<R> {
        Schema {
            fields: self.fields,
        }
    }
}

/// A type that can be stored as one row of a fixed-width table.
pub trait Record: Default + 'static {
    /// Register the fields of this type on `schema`, in column order.
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self>;

    /// The finished field list of this type.
    fn schema() -> Schema<Self> {
        Self::describe(Schema::builder()).build()
    }
}

/// An element of a decode or encode target sequence.
///
/// Implemented for every [`Record`] and for `Option<R>`, where `None`
/// stands for a missing record.
pub trait Row: Sized {
    type Record: Record;

    fn from_record(record: Self::Record) -> Self;

    fn record(&self) -> Option<&Self::Record>;
}

impl<R: Record> Row for R {
    type Record = R;

    fn from_record(record: R) -> Self {
        record
    }

    fn record(&self) -> Option<&R> {
        Some(self)
    }
}

impl<R: Record> Row for Option<R> {
    type Record = R;

    fn from_record(record: R) -> Self {
        Some(record)
    }

    fn record(&self) -> Option<&R> {
        self.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Customer {
        name: String,
        zip: u32,
        limit: Option<i64>,
    }

    impl Record for Customer {
        fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            schema
                .field("Name", |c| &c.name, |c| &mut c.name)
                .field_with(
                    "Zip",
                    |c| &c.zip,
                    |c| &mut c.zip,
                    FieldOptions::new().column("Credit Limit").alias("Postcode"),
                )
                .field_with(
                    "Limit",
                    |c| &c.limit,
                    |c| &mut c.limit,
                    FieldOptions::new().alias("Max"),
                )
        }
    }

    #[test]
    fn test_column_resolution_order() {
        let schema = Customer::schema();
        assert_eq!(schema.column_names(), vec!["Name", "Credit Limit", "Max"]);
        assert_eq!(schema.fields()[1].descriptor().name(), "Zip");
    }

    #[test]
    fn test_kinds_and_optionality() {
        let schema = Customer::schema();
        let zip = schema.fields()[1].descriptor();
        assert_eq!(zip.kind(), FieldKind::Uint { bits: 32 });
        assert!(!zip.is_optional());
        assert_eq!(zip.type_label(), "u32");

        let limit = schema.fields()[2].descriptor();
        assert!(limit.is_optional());
        assert_eq!(limit.type_label(), "Option<i64>");
    }

    #[test]
    fn test_field_accessors() {
        let schema = Customer::schema();
        let mut customer = Customer::default();
        schema.fields()[0].decode(&mut customer, "ACME").unwrap();
        schema.fields()[2].decode(&mut customer, "-40").unwrap();
        assert_eq!(customer.name, "ACME");
        assert_eq!(customer.limit, Some(-40));
        assert_eq!(
            schema.fields()[2].encode(&customer).unwrap(),
            Some("-40".to_string())
        );
    }

    #[test]
    fn test_empty_schema_is_invalid_target() {
        let schema: Schema<Customer> = Schema::builder().build();
        assert!(schema.is_empty());
        assert!(matches!(
            schema.ensure_usable(),
            Err(CodecError::InvalidTarget(_))
        ));
        assert!(Customer::schema().ensure_usable().is_ok());
    }

    #[test]
    fn test_typed_builder_outside_record() {
        let schema = Schema::<Customer>::builder()
            .field("Name", |c| &c.name, |c| &mut c.name)
            .build();
        assert_eq!(schema.column_names(), vec!["Name"]);
        assert_eq!(Customer::schema().len(), 3);
    }

    #[test]
    fn test_row_impls() {
        let present: Option<Customer> = Row::from_record(Customer::default());
        assert!(present.record().is_some());
        let missing: Option<Customer> = None;
        assert!(missing.record().is_none());
        let plain = Customer::default();
        assert!(Row::record(&plain).is_some());
    }
}
