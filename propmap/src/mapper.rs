//! Field mapper.
//!
//! Populates a [`Mappable`] target from a [`Store`]: each declared field's
//! raw value is looked up (falling back to the descriptor default),
//! variables are substituted, and the result is parsed by the field's
//! handler before being assigned. The first failure aborts the whole pass.

use crate::descriptor::{trim_to_none, PropertyDescriptor};
use crate::errors::MappingError;
use crate::handlers::{Handler, HandlerOverrides, HandlerRegistry};
use crate::store::Store;
use crate::subst;
use crate::value::{FieldTypeTag, Value};

/// One declared field of a target type.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub ident: &'static str,
    pub tag: Option<FieldTypeTag>,
    pub descriptor: Option<PropertyDescriptor>,
}

/// Declared fields of a target type, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: Vec<FieldDecl>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field populated from the store.
    pub fn property(
        mut self,
        ident: &'static str,
        tag: FieldTypeTag,
        descriptor: PropertyDescriptor,
    ) -> Self {
        self.fields.push(FieldDecl {
            ident,
            tag: Some(tag),
            descriptor: Some(descriptor),
        });
        self
    }

    /// Declare a field the mapper leaves alone.
    pub fn unmapped(mut self, ident: &'static str) -> Self {
        self.fields.push(FieldDecl {
            ident,
            tag: None,
            descriptor: None,
        });
        self
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }
}

/// A type whose fields can be populated by a [`FieldMapper`].
///
/// Implementors usually keep their schema in a `lazy_static`, so that it
/// is built once per type.
pub trait Mappable {
    /// Declared fields, in declaration order.
    fn schema() -> &'static Schema;

    /// Store a mapped value into the field named `field`.
    fn assign(&mut self, field: &str, value: Value) -> Result<(), MappingError>;
}

/// Drives a mapping pass with a given handler registry.
#[derive(Clone, Debug, Default)]
pub struct FieldMapper {
    registry: HandlerRegistry,
}

impl FieldMapper {
    /// Mapper using the built-in handlers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Build a fresh target and populate it.
    ///
    /// The target is only handed back if every field mapped successfully.
    pub fn populate<T>(&self, store: &Store, overrides: &HandlerOverrides) -> Result<T, MappingError>
    where
        T: Mappable + Default,
    {
        let mut target = T::default();
        self.map_fields(&mut target, store, overrides)?;
        Ok(target)
    }

    /// Populate all declared fields of `target`, stopping at the first failure.
    ///
    /// On error the target may be partially populated and must be discarded.
    pub fn map_fields<T>(
        &self,
        target: &mut T,
        store: &Store,
        overrides: &HandlerOverrides,
    ) -> Result<(), MappingError>
    where
        T: Mappable,
    {
        let mut mapped = 0;
        for field in T::schema().fields() {
            let (tag, desc) = match (field.tag, &field.descriptor) {
                (Some(tag), Some(desc)) => (tag, desc),
                _ => {
                    trace!("field '{}' has no descriptor, skipping", field.ident);
                    continue;
                }
            };
            if let Some(value) = self.map_field(field.ident, tag, desc, store, overrides)? {
                target.assign(field.ident, value)?;
                mapped += 1;
            }
        }
        debug!("mapped {} fields from {} entries", mapped, store.len());
        Ok(())
    }

    /// Resolve, substitute and parse a single field.
    ///
    /// Returns `None` for an absent optional field.
    pub fn map_field(
        &self,
        ident: &str,
        tag: FieldTypeTag,
        desc: &PropertyDescriptor,
        store: &Store,
        overrides: &HandlerOverrides,
    ) -> Result<Option<Value>, MappingError> {
        let key = desc.key(ident);

        let raw = match resolve_raw(key, desc, store) {
            Some(raw) => raw,
            None if desc.is_required() => {
                return Err(MappingError::MissingRequiredProperty {
                    key: key.to_string(),
                })
            }
            None => {
                debug!("optional property '{}' is not set, skipping", key);
                return Ok(None);
            }
        };

        let value = subst::substitute(raw, store).map_err(|source| MappingError::Substitution {
            key: key.to_string(),
            source,
        })?;
        trace!("field '{}' <- {}={}", ident, key, value);

        let handler = self.handler_for(ident, tag, overrides)?;
        handler(&value, desc, key).map(Some)
    }

    /// Per-field override first, registry dispatch otherwise.
    fn handler_for(
        &self,
        ident: &str,
        tag: FieldTypeTag,
        overrides: &HandlerOverrides,
    ) -> Result<Handler, MappingError> {
        if let Some(handler) = overrides.get(ident) {
            debug!("using handler override for field '{}'", ident);
            return Ok(*handler);
        }
        self.registry
            .resolve(tag)
            .ok_or_else(|| MappingError::UnresolvedHandler {
                field: ident.to_string(),
                tag,
            })
    }
}

/// Store value for `key`, or the descriptor default when absent or blank.
fn resolve_raw<'a>(key: &str, desc: &'a PropertyDescriptor, store: &'a Store) -> Option<&'a str> {
    match store.get(key).and_then(trim_to_none) {
        Some(value) => Some(value),
        None => {
            let default = desc.get_default_value();
            if default.is_some() {
                debug!("property '{}' not set, using default", key);
            }
            default
        }
    }
}

/// Populate a fresh target with the built-in handlers and no overrides.
pub fn populate<T>(store: &Store) -> Result<T, MappingError>
where
    T: Mappable + Default,
{
    FieldMapper::new().populate(store, &HandlerOverrides::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    lazy_static! {
        static ref PAIR_SCHEMA: Schema = Schema::new()
            .property(
                "first",
                FieldTypeTag::Integer,
                PropertyDescriptor::named("pair.first").max(10)
            )
            .unmapped("note")
            .property(
                "second",
                FieldTypeTag::Integer,
                PropertyDescriptor::named("pair.second").max(10)
            );
    }

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        first: i32,
        note: String,
        second: i32,
        assigned: Vec<String>,
    }

    impl Mappable for Pair {
        fn schema() -> &'static Schema {
            &PAIR_SCHEMA
        }

        fn assign(&mut self, field: &str, value: Value) -> Result<(), MappingError> {
            self.assigned.push(field.to_string());
            match field {
                "first" => self.first = value.into_typed(field)?,
                "second" => self.second = value.into_typed(field)?,
                _ => unreachable!("unknown field {}", field),
            }
            Ok(())
        }
    }

    fn store(entries: &[(&str, &str)]) -> Store {
        entries.iter().cloned().collect()
    }

    #[test]
    fn maps_in_declaration_order() {
        let pair: Pair = populate(&store(&[("pair.first", "1"), ("pair.second", "2")])).unwrap();
        assert_eq!(pair.first, 1);
        assert_eq!(pair.second, 2);
        assert_eq!(pair.note, "");
        assert_eq!(pair.assigned, vec!["first", "second"]);
    }

    #[test]
    fn fails_fast_on_first_invalid_field() {
        let store = store(&[("pair.first", "11"), ("pair.second", "abc")]);
        let mut pair = Pair::default();
        let err = FieldMapper::new()
            .map_fields(&mut pair, &store, &HandlerOverrides::new())
            .unwrap_err();

        match err {
            MappingError::OutOfRange { key, .. } => assert_eq!(key, "pair.first"),
            e => panic!("unexpected error: {}", e),
        }
        assert!(pair.assigned.is_empty());
    }

    #[test]
    fn partial_population_on_late_failure() {
        let store = store(&[("pair.first", "3"), ("pair.second", "abc")]);
        let mut pair = Pair::default();
        FieldMapper::new()
            .map_fields(&mut pair, &store, &HandlerOverrides::new())
            .unwrap_err();
        assert_eq!(pair.assigned, vec!["first"]);
    }

    #[test]
    fn blank_store_value_falls_back_to_default() {
        let desc = PropertyDescriptor::named("k").default_value("5");
        let mapper = FieldMapper::new();
        let overrides = HandlerOverrides::new();

        let value = mapper
            .map_field("f", FieldTypeTag::Integer, &desc, &store(&[("k", "  ")]), &overrides)
            .unwrap()
            .unwrap();
        assert_eq!(value.into_typed::<i32>("f").unwrap(), 5);

        let value = mapper
            .map_field("f", FieldTypeTag::Integer, &desc, &store(&[("k", " 8 ")]), &overrides)
            .unwrap()
            .unwrap();
        assert_eq!(value.into_typed::<i32>("f").unwrap(), 8);
    }

    #[test]
    fn missing_required_and_optional() {
        let mapper = FieldMapper::new();
        let overrides = HandlerOverrides::new();
        let empty = Store::default();

        let err = mapper
            .map_field("f", FieldTypeTag::String, &PropertyDescriptor::new(), &empty, &overrides)
            .unwrap_err();
        match err {
            MappingError::MissingRequiredProperty { key } => assert_eq!(key, "f"),
            e => panic!("unexpected error: {}", e),
        }

        let skipped = mapper
            .map_field(
                "f",
                FieldTypeTag::String,
                &PropertyDescriptor::new().optional(),
                &empty,
                &overrides,
            )
            .unwrap();
        assert!(skipped.is_none());
    }

    #[test]
    fn unresolved_handler() {
        let mapper = FieldMapper::with_registry(HandlerRegistry::empty());
        let err = mapper
            .map_field(
                "f",
                FieldTypeTag::Boolean,
                &PropertyDescriptor::new(),
                &store(&[("f", "true")]),
                &HandlerOverrides::new(),
            )
            .unwrap_err();
        match err {
            MappingError::UnresolvedHandler { field, tag } => {
                assert_eq!(field, "f");
                assert_eq!(tag, FieldTypeTag::Boolean);
            }
            e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn substitution_errors_name_the_key() {
        let err = FieldMapper::new()
            .map_field(
                "f",
                FieldTypeTag::String,
                &PropertyDescriptor::named("k"),
                &store(&[("k", "${open")]),
                &HandlerOverrides::new(),
            )
            .unwrap_err();
        match err {
            MappingError::Substitution { key, source } => {
                assert_eq!(key, "k");
                assert!(matches!(
                    source,
                    crate::errors::SubstitutionError::UnterminatedVariableReference { .. }
                ));
            }
            e => panic!("unexpected error: {}", e),
        }
    }
}
