//! # jsonguard-schema: Schema Compilation & Field Error Resolution
//!
//! Compiles JSON Schema documents once, collects every violation a
//! document produces, and folds those violations into a field-keyed
//! error map suitable for returning to API clients.
//!
//! ## Runtime Validation (`validate`)
//!
//! - [`CompiledSchema::compile`]: checks a schema against its meta-schema
//!   and compiles it. A malformed schema is rejected here, never at
//!   request time.
//! - [`CompiledSchema::violations`]: every violation, in validator order,
//!   with its schema path split into segments.
//! - [`load_schema_file`]: reads a schema from a `.json` or `.yaml` file.
//!
//! ## Field Resolution (`resolve`)
//!
//! [`resolve_field_errors`] maps each violation to the name of the field it
//! concerns, using the violation's schema path and, for missing required
//! properties, the violation message.
//!
//! ## Crate Policy
//!
//! - No HTTP concerns. The HTTP wrapper lives in `jsonguard-api`.
//! - Compiled schemas are immutable and shared across threads.

pub mod resolve;
pub mod validate;

pub use jsonschema::Draft;
pub use resolve::{resolve_field_errors, FieldErrorMap, ROOT_FIELD};
pub use validate::{load_schema_file, CompiledSchema, SchemaError, Violation};
