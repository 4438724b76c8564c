//! The open plugin registry of named, parameterized object types.

use std::fmt;
use std::sync::Arc;

use anvil_core::{ComputationalObject, Params, ThreadId};
use indexmap::IndexMap;

use crate::error::{BoxError, RegistryError};
use crate::schema::ParamSchema;

/// Function returning a type's parameter schema.
pub type SchemaFn = fn() -> ParamSchema;

/// Result of an object builder.
pub type BuildResult = Result<Box<dyn ComputationalObject>, BoxError>;

type BuilderFn = Arc<dyn Fn(&BuildContext<'_>) -> BuildResult + Send + Sync>;

/// Everything a builder knows about the object it is asked to build.
#[derive(Clone, Copy, Debug)]
pub struct BuildContext<'a> {
    /// Registered type name.
    pub type_name: &'a str,
    /// User-facing object name.
    pub object_name: &'a str,
    /// Thread the replica is built for.
    pub thread: ThreadId,
    /// Validated parameters, defaults filled in.
    pub params: &'a Params,
}

/// One registered type.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    schema: SchemaFn,
    builder: BuilderFn,
}

impl TypeDescriptor {
    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fresh copy of the type's schema.
    pub fn schema(&self) -> ParamSchema {
        (self.schema)()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Parameters that passed a type's schema.
///
/// Only [`TypeRegistry::validate`] creates these, so
/// [`TypeRegistry::instantiate`] never sees unchecked input.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedParams {
    type_name: String,
    object_name: String,
    params: Params,
}

impl ValidatedParams {
    /// Type the parameters were validated against.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Object the parameters belong to.
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// The complete parameter set.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// Name → type descriptor map, kept in registration order.
///
/// Populated once at startup; shared read-only afterwards.
#[derive(Default)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type.
    pub fn register_type<F>(
        &mut self,
        name: impl Into<String>,
        schema: SchemaFn,
        builder: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&BuildContext<'_>) -> BuildResult + Send + Sync + 'static,
    {
        let name = name.into();
        if self.types.contains_key(&name) {
            return Err(RegistryError::DuplicateType { name });
        }
        tracing::debug!(type_name = %name, "registered object type");
        self.types.insert(
            name.clone(),
            TypeDescriptor {
                name,
                schema,
                builder: Arc::new(builder),
            },
        );
        Ok(())
    }

    fn descriptor(&self, name: &str) -> Result<&TypeDescriptor, RegistryError> {
        self.types
            .get(name)
            .ok_or_else(|| RegistryError::UnknownType {
                name: name.to_string(),
            })
    }

    /// The schema of a registered type.
    pub fn schema(&self, name: &str) -> Result<ParamSchema, RegistryError> {
        Ok(self.descriptor(name)?.schema())
    }

    /// Validate `params` for an object of type `type_name`.
    pub fn validate(
        &self,
        type_name: &str,
        object_name: &str,
        params: &Params,
    ) -> Result<ValidatedParams, RegistryError> {
        let schema = self.schema(type_name)?;
        let params = schema
            .validate(params)
            .map_err(|err| RegistryError::validation(type_name, object_name, err))?;
        Ok(ValidatedParams {
            type_name: type_name.to_string(),
            object_name: object_name.to_string(),
            params,
        })
    }

    /// Build one replica from already validated parameters.
    pub fn instantiate(
        &self,
        validated: &ValidatedParams,
        thread: ThreadId,
    ) -> Result<Box<dyn ComputationalObject>, RegistryError> {
        let descriptor = self.descriptor(&validated.type_name)?;
        let ctx = BuildContext {
            type_name: &validated.type_name,
            object_name: &validated.object_name,
            thread,
            params: &validated.params,
        };
        let object = (descriptor.builder)(&ctx).map_err(|source| RegistryError::BuildFailed {
            type_name: validated.type_name.clone(),
            object_name: validated.object_name.clone(),
            source,
        })?;
        tracing::debug!(
            type_name = %validated.type_name,
            object = %validated.object_name,
            %thread,
            "built object"
        );
        Ok(object)
    }

    /// Validate `params` against the type's schema and build one object.
    pub fn create(
        &self,
        type_name: &str,
        object_name: &str,
        params: &Params,
        thread: ThreadId,
    ) -> Result<Box<dyn ComputationalObject>, RegistryError> {
        let validated = self.validate(type_name, object_name, params)?;
        self.instantiate(&validated, thread)
    }

    /// Whether `name` is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.types.keys()).finish()
    }
}
