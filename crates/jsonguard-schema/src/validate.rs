//! # Schema Compilation & Violation Collection
//!
//! Wraps the `jsonschema` crate behind a small immutable type that keeps
//! the source schema document next to its compiled validator.
//!
//! ## Fail-Fast Compilation
//!
//! A schema is checked against its meta-schema when it is compiled. A
//! document that is not itself a valid schema is a programming error in
//! the API definition, so it is reported at construction time and never
//! surfaces as a per-request failure.
//!
//! ## Draft Selection
//!
//! The draft is detected from the document's `$schema` keyword unless an
//! explicit override is supplied.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use jsonschema::{Draft, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::resolve::{resolve_field_errors, FieldErrorMap};

/// Error raised while loading or compiling a schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document is not a valid schema according to its meta-schema.
    #[error("invalid schema: {reason}")]
    InvalidSchema {
        /// Validator-provided description of the problem.
        reason: String,
    },

    /// The schema file could not be parsed.
    #[error("schema load error for '{path}': {reason}")]
    SchemaLoad {
        /// Path of the schema file.
        path: String,
        /// Reason the file could not be parsed.
        reason: String,
    },

    /// IO error reading a schema file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single violation reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Location of the failing rule inside the schema, one entry per
    /// JSON Pointer segment (e.g. `["properties", "foo", "type"]`).
    pub schema_path: Vec<String>,
    /// JSON Pointer to the offending value inside the instance.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Violation {
    /// Build a violation from a schema path and a message.
    ///
    /// The instance path is left empty.
    pub fn new<I, S>(schema_path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema_path: schema_path.into_iter().map(Into::into).collect(),
            instance_path: String::new(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// A schema document together with its compiled validator.
///
/// Cloning is cheap: both halves are reference counted. The document is
/// never mutated after compilation.
#[derive(Clone)]
pub struct CompiledSchema {
    document: Arc<Value>,
    validator: Arc<Validator>,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl CompiledSchema {
    /// Compile a schema, detecting the draft from `$schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] if the document does not
    /// conform to its meta-schema.
    pub fn compile(document: Value) -> Result<Self, SchemaError> {
        Self::compile_with_draft(document, None)
    }

    /// Compile a schema with an optional explicit draft.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] if the document does not
    /// conform to the meta-schema of the selected draft.
    pub fn compile_with_draft(document: Value, draft: Option<Draft>) -> Result<Self, SchemaError> {
        let built = match draft {
            Some(draft) => jsonschema::options().with_draft(draft).build(&document),
            None => jsonschema::options().build(&document),
        };
        let validator = built.map_err(|e| SchemaError::InvalidSchema {
            reason: e.to_string(),
        })?;

        Ok(Self {
            document: Arc::new(document),
            validator: Arc::new(validator),
        })
    }

    /// The schema document this validator was compiled from.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Returns true if the instance satisfies the schema.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Collect every violation of `instance`, in validator order.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|e| Violation {
                schema_path: pointer_segments(&e.schema_path.to_string()),
                instance_path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect()
    }

    /// Validate `instance` and resolve any violations into field errors.
    ///
    /// # Errors
    ///
    /// Returns the non-empty [`FieldErrorMap`] when the instance is invalid.
    pub fn check(&self, instance: &Value) -> Result<(), FieldErrorMap> {
        if self.is_valid(instance) {
            return Ok(());
        }
        let errors = resolve_field_errors(&self.violations(instance));
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Split a JSON Pointer into unescaped reference tokens.
///
/// The empty pointer (the document root) has no segments.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Load a schema document from a file.
///
/// `.yaml` and `.yml` files are parsed as YAML and converted to JSON values;
/// every other extension is parsed as JSON. The document is not compiled.
///
/// # Errors
///
/// Returns [`SchemaError::Io`] if the file cannot be read and
/// [`SchemaError::SchemaLoad`] if it cannot be parsed.
pub fn load_schema_file(path: impl AsRef<Path>) -> Result<Value, SchemaError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let load_error = |reason: String| SchemaError::SchemaLoad {
        path: path.display().to_string(),
        reason,
    };

    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .map_err(|e| load_error(format!("invalid YAML: {e}")))?;
            yaml_to_json_value(&yaml)
                .map_err(|e| load_error(format!("YAML-to-JSON conversion failed: {e}")))
        }
        _ => serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}"))),
    }
}

/// Convert a YAML value tree into the equivalent JSON value tree.
///
/// Tags are dropped. Numeric and boolean map keys become strings.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
