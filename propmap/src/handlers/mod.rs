//! Field handlers.
//!
//! A handler turns a substituted raw string into a typed [`Value`],
//! validating it against the field's [`PropertyDescriptor`]. Handlers are
//! looked up by the field's [`FieldTypeTag`] in a [`HandlerRegistry`],
//! unless the caller supplies a per-field override.

pub mod builtin;
pub mod path;

use crate::descriptor::PropertyDescriptor;
use crate::errors::MappingError;
use crate::value::{FieldTypeTag, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Parse and validate a substituted value.
///
/// Arguments are the value, the field descriptor and the resolved key name.
pub type Handler = fn(&str, &PropertyDescriptor, &str) -> Result<Value, MappingError>;

/// Handlers replacing registry dispatch for specific fields, keyed by field identifier.
pub type HandlerOverrides = HashMap<&'static str, Handler>;

/// Handlers keyed by field type.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: BTreeMap<FieldTypeTag, Handler>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl HandlerRegistry {
    /// Registry without any handler.
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Registry with a built-in handler for every field type.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(FieldTypeTag::Integer, builtin::integer);
        registry.register(FieldTypeTag::Boolean, builtin::boolean);
        registry.register(FieldTypeTag::String, builtin::string);
        registry.register(FieldTypeTag::Path, path::path);
        registry.register(FieldTypeTag::ListOfString, builtin::list_of_string);
        registry.register(FieldTypeTag::ListOfPath, path::list_of_path);
        registry.register(FieldTypeTag::RegexPattern, builtin::regex_pattern);
        registry
    }

    /// Register a handler, returning the one it replaces.
    pub fn register(&mut self, tag: FieldTypeTag, handler: Handler) -> Option<Handler> {
        self.handlers.insert(tag, handler)
    }

    /// Remove the handler for a type.
    pub fn unregister(&mut self, tag: FieldTypeTag) -> Option<Handler> {
        self.handlers.remove(&tag)
    }

    /// Handler for a field type, if any.
    pub fn resolve(&self, tag: FieldTypeTag) -> Option<Handler> {
        self.handlers.get(&tag).copied()
    }
}
