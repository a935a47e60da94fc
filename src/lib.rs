//! # fixed-width
//!
//! A codec between fixed-width text tables and typed records.
//!
//! The first line of a table is a header of column names. Each name is
//! followed by padding, and the name plus its padding is the column's span
//! in every other line. All lines share the header's length.
//!
//! ## Overview
//!
//! - **Schema**: a record type lists its fields once, in column order, with
//!   optional column name overrides and time formats
//! - **Decoding**: header spans are located by name, each line is sliced and
//!   trimmed, and every cell is parsed into its field's type with range
//!   checks for the declared width
//! - **Encoding**: column widths are the widest of the name and every
//!   rendered cell, then the header and rows are written left-justified
//!
//! ## Example
//!
//! ```
//! use fixed_width::{FieldOptions, Record, SchemaBuilder};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Employee {
//!     last: String,
//!     dept: String,
//!     salary: u32,
//! }
//!
//! impl Record for Employee {
//!     fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
//!         schema
//!             .field("Last", |e| &e.last, |e| &mut e.last)
//!             .field("Dept", |e| &e.dept, |e| &mut e.dept)
//!             .field_with(
//!                 "Salary",
//!                 |e| &e.salary,
//!                 |e| &mut e.salary,
//!                 FieldOptions::new().column("Pay"),
//!             )
//!     }
//! }
//!
//! let table = "Last  Dept     Pay  \nSMITH SALES    50000\nJONES ENGINEER 75000";
//! let staff: Vec<Employee> = fixed_width::from_str(table).unwrap();
//! assert_eq!(staff[1].salary, 75000);
//!
//! assert_eq!(fixed_width::to_string(&staff).unwrap(), table);
//! ```

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod record;
pub mod schema;
pub mod value;

pub use decoder::{TableLayout, from_reader, from_slice, from_str, inspect, read_into};
pub use encoder::{to_string, to_vec, to_writer};
pub use error::{CodecError, FieldError};
pub use header::{Column, ColumnWidths, resolve_header_columns};
pub use record::{RawFieldIndex, build_record, render_record};
pub use schema::{Field, FieldDescriptor, FieldKind, FieldOptions, Record, Row, Schema, SchemaBuilder};
pub use value::{FieldValue, Json};
