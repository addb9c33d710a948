//! Per-field property metadata.
//!
//! A descriptor is built once per declared field and never changes
//! afterwards. It controls how the field's key is looked up, what happens
//! when the key is absent, and how the raw value is validated.

use smart_default::SmartDefault;
use std::fmt;

/// Default separator for list-typed fields.
pub static DEFAULT_DELIMITER: &str = ",";

/// Filesystem constraint declared on a path-typed field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathConstraint {
    Directory,
    File,
    Readable,
    Writable,
}

impl fmt::Display for PathConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PathConstraint::Directory => "not a directory",
            PathConstraint::File => "not a file",
            PathConstraint::Readable => "read permission denied",
            PathConstraint::Writable => "write permission denied",
        };
        f.write_str(msg)
    }
}

/// Declarative metadata attached to one target field.
#[derive(Clone, Debug, PartialEq, Eq, SmartDefault)]
pub struct PropertyDescriptor {
    name: Option<String>,
    default_value: Option<String>,
    #[default(true)]
    required: bool,
    pattern: Option<String>,
    #[default(DEFAULT_DELIMITER.to_string())]
    delimiter: String,
    #[default(0)]
    min: i32,
    #[default(i32::MAX)]
    max: i32,
    is_directory: bool,
    is_file: bool,
    is_readable: bool,
    is_writable: bool,
}

/// Trim a string, mapping blank input to `None`.
pub(crate) fn trim_to_none(s: &str) -> Option<&str> {
    match s.trim() {
        "" => None,
        trimmed => Some(trimmed),
    }
}

impl PropertyDescriptor {
    /// Descriptor whose key is the field's own identifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor looked up under an explicit key.
    pub fn named<S: AsRef<str>>(name: S) -> Self {
        Self::default().name(name)
    }

    /// Explicit lookup key. A blank name falls back to the field identifier.
    pub fn name<S: AsRef<str>>(mut self, name: S) -> Self {
        self.name = trim_to_none(name.as_ref()).map(str::to_string);
        self
    }

    /// Literal used when the key is absent. A blank default means none.
    pub fn default_value<S: AsRef<str>>(mut self, value: S) -> Self {
        self.default_value = trim_to_none(value.as_ref()).map(str::to_string);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Shorthand for `required(false)`.
    pub fn optional(self) -> Self {
        self.required(false)
    }

    /// Regular expression the whole string value must match.
    pub fn pattern<S: AsRef<str>>(mut self, pattern: S) -> Self {
        self.pattern = trim_to_none(pattern.as_ref()).map(str::to_string);
        self
    }

    pub fn delimiter<S: Into<String>>(mut self, delimiter: S) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn min(mut self, min: i32) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: i32) -> Self {
        self.max = max;
        self
    }

    pub fn is_directory(mut self) -> Self {
        self.is_directory = true;
        self
    }

    pub fn is_file(mut self) -> Self {
        self.is_file = true;
        self
    }

    pub fn is_readable(mut self) -> Self {
        self.is_readable = true;
        self
    }

    pub fn is_writable(mut self) -> Self {
        self.is_writable = true;
        self
    }

    /// Effective lookup key for a field named `ident`.
    pub fn key<'a>(&'a self, ident: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(ident)
    }

    pub fn get_default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn get_pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn get_delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Inclusive numeric bounds.
    pub fn bounds(&self) -> (i32, i32) {
        (self.min, self.max)
    }

    /// Declared path constraints, in checking order.
    pub fn path_constraints(&self) -> Vec<PathConstraint> {
        [
            (self.is_directory, PathConstraint::Directory),
            (self.is_file, PathConstraint::File),
            (self.is_readable, PathConstraint::Readable),
            (self.is_writable, PathConstraint::Writable),
        ]
        .iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, constraint)| *constraint)
        .collect()
    }
}
