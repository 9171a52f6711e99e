//! # Field Error Resolution
//!
//! Folds validator violations into a map from field name to messages.
//!
//! ## Resolution Rule
//!
//! The field name comes from the violation's schema path:
//!
//! - `["properties", "foo", "type"]` → `foo` (a leading `properties` is
//!   structural and dropped).
//! - `["required"]` → the name is not in the path. It is read from the
//!   message instead, as the first quoted token.
//! - any other path → its first segment (e.g. `additionalProperties`).
//!
//! ## Fragility
//!
//! The `required` case depends on the validator's message wording: it
//! assumes the missing property is the first quoted substring. The
//! `jsonschema` crate renders it as a JSON string (`"text" is a required
//! property`), other validators use single quotes, so both are accepted.
//! A change in that wording silently changes the reported field name.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::validate::Violation;

/// Key used for violations whose schema path is empty.
pub const ROOT_FIELD: &str = "(root)";

const PROPERTIES: &str = "properties";
const REQUIRED: &str = "required";

/// Insertion-ordered map from field name to violation messages.
///
/// Serializes as a JSON object; keys appear in the order they were first
/// pushed and messages in the order they were reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorMap {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldErrorMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message` to the messages for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field, vec![message])),
        }
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(field, messages)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no field has any message.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FieldErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, messages) in &self.entries {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// Resolve the violations of one validation pass into field errors.
pub fn resolve_field_errors<'a, I>(violations: I) -> FieldErrorMap
where
    I: IntoIterator<Item = &'a Violation>,
{
    let mut errors = FieldErrorMap::new();
    for violation in violations {
        errors.push(field_name(violation), violation.message.clone());
    }
    errors
}

/// The field a single violation is about.
fn field_name(violation: &Violation) -> String {
    let mut segments = violation.schema_path.iter().map(String::as_str).peekable();
    if segments.peek() == Some(&PROPERTIES) {
        segments.next();
    }

    match segments.next() {
        Some(REQUIRED) => first_quoted_token(&violation.message)
            .unwrap_or(REQUIRED)
            .to_string(),
        Some(segment) => segment.to_string(),
        None => ROOT_FIELD.to_string(),
    }
}

/// First substring enclosed in matching single or double quotes.
fn first_quoted_token(message: &str) -> Option<&str> {
    let (start, quote) = message.char_indices().find(|(_, c)| *c == '\'' || *c == '"')?;
    let rest = &message[start + 1..];
    rest.find(quote).map(|end| &rest[..end])
}
