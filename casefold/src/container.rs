//! The [ComponentContainer] is a process-wide registry of components. Components are registered
//! explicitly during application initialization, usually as `dyn Trait` instances, and can later be
//! retrieved by other components or by the [Application](crate::application::Application).
//!
//! ```
//! use casefold::container::{ComponentContainer, ComponentInstancePtr};
//!
//! trait Greeter {
//!     fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter;
//!
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String {
//!         "Hello".to_string()
//!     }
//! }
//!
//! let mut container = ComponentContainer::new();
//! container
//!     .register::<dyn Greeter + Send + Sync>(ComponentInstancePtr::new(EnglishGreeter))
//!     .unwrap();
//!
//! let greeter = container
//!     .primary_instance::<dyn Greeter + Send + Sync>()
//!     .unwrap();
//! assert_eq!(greeter.greet(), "Hello");
//! ```

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use std::any::{type_name, Any, TypeId};
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Shared pointer to a registered component.
pub type ComponentInstancePtr<T> = Arc<T>;

/// Type-erased error crossing component boundaries.
pub type ErrorPtr = Arc<dyn Error + Send + Sync>;

/// Errors related to registering and retrieving components.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum ComponentContainerError {
    #[error("Cannot find a primary instance for component '{0}' - either none or multiple exists without a primary marker.")]
    NoPrimaryInstance(String),
    #[error("Cannot find named component: {0}")]
    NoNamedInstance(String),
    #[error("Attempted to register a duplicated component with name: {0}")]
    DuplicateComponentName(String),
    #[error("Registering a duplicate primary component of type: {0}")]
    DuplicatePrimaryComponent(String),
}

/// Registration information for a component.
#[derive(Clone, Default, Debug)]
pub struct ComponentMetadata {
    /// Names which can be used to request this specific instance. Must be unique in the container.
    pub names: Vec<String>,

    /// With multiple components registered for a given type, one of them can be marked as primary
    /// and returned when requesting a single instance.
    pub is_primary: bool,
}

impl ComponentMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            names: vec![name.into()],
            is_primary: false,
        }
    }

    pub fn primary() -> Self {
        Self {
            names: vec![],
            is_primary: true,
        }
    }
}

struct RegisteredComponent {
    metadata: ComponentMetadata,
    // always holds a ComponentInstancePtr<T> for the type the entry is keyed with
    instance: Box<dyn Any + Send + Sync>,
}

impl RegisteredComponent {
    fn instance<T: ?Sized + 'static>(&self) -> Option<ComponentInstancePtr<T>> {
        self.instance
            .downcast_ref::<ComponentInstancePtr<T>>()
            .cloned()
    }
}

/// Registry of component instances, keyed by the type they were registered as.
#[derive(Default)]
pub struct ComponentContainer {
    components: FxHashMap<TypeId, Vec<RegisteredComponent>>,
    names: FxHashSet<String>,
}

impl ComponentContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an unnamed, non-primary component.
    pub fn register<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        instance: ComponentInstancePtr<T>,
    ) -> Result<(), ComponentContainerError> {
        self.register_with(instance, ComponentMetadata::default())
    }

    /// Registers a component with explicit [ComponentMetadata].
    pub fn register_with<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        instance: ComponentInstancePtr<T>,
        metadata: ComponentMetadata,
    ) -> Result<(), ComponentContainerError> {
        if let Some(name) = metadata
            .names
            .iter()
            .find(|name| self.names.contains(name.as_str()))
        {
            return Err(ComponentContainerError::DuplicateComponentName(
                name.clone(),
            ));
        }

        let components = self.components.entry(TypeId::of::<T>()).or_default();
        if metadata.is_primary
            && components
                .iter()
                .any(|component| component.metadata.is_primary)
        {
            return Err(ComponentContainerError::DuplicatePrimaryComponent(
                type_name::<T>().to_string(),
            ));
        }

        debug!(component = type_name::<T>(), names = ?metadata.names, "Registering component.");

        self.names.extend(metadata.names.iter().cloned());
        components.push(RegisteredComponent {
            metadata,
            instance: Box::new(instance),
        });

        Ok(())
    }

    /// Checks if at least one component is registered for given type.
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.components
            .get(&TypeId::of::<T>())
            .map(|components| !components.is_empty())
            .unwrap_or(false)
    }

    /// Returns a primary instance of a given component. A primary component is either the only one
    /// registered or one marked as primary.
    pub fn primary_instance<T: ?Sized + 'static>(
        &self,
    ) -> Result<ComponentInstancePtr<T>, ComponentContainerError> {
        self.primary_instance_option::<T>()?
            .ok_or_else(|| ComponentContainerError::NoPrimaryInstance(type_name::<T>().to_string()))
    }

    /// Like [ComponentContainer::primary_instance], but returns `None` when no instance is
    /// registered.
    pub fn primary_instance_option<T: ?Sized + 'static>(
        &self,
    ) -> Result<Option<ComponentInstancePtr<T>>, ComponentContainerError> {
        let components = match self.components.get(&TypeId::of::<T>()) {
            Some(components) if !components.is_empty() => components,
            _ => return Ok(None),
        };

        let component = if let [component] = components.as_slice() {
            component
        } else {
            components
                .iter()
                .find(|component| component.metadata.is_primary)
                .ok_or_else(|| {
                    ComponentContainerError::NoPrimaryInstance(type_name::<T>().to_string())
                })?
        };

        Ok(component.instance::<T>())
    }

    /// Returns all instances of a given type, in registration order.
    pub fn instances<T: ?Sized + 'static>(&self) -> Vec<ComponentInstancePtr<T>> {
        self.components
            .get(&TypeId::of::<T>())
            .map(|components| {
                components
                    .iter()
                    .filter_map(RegisteredComponent::instance::<T>)
                    .collect_vec()
            })
            .unwrap_or_default()
    }

    /// Returns an instance of a given type registered under given name.
    pub fn instance_by_name<T: ?Sized + 'static>(
        &self,
        name: &str,
    ) -> Result<ComponentInstancePtr<T>, ComponentContainerError> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|components| {
                components
                    .iter()
                    .find(|component| component.metadata.names.iter().any(|n| n == name))
            })
            .and_then(RegisteredComponent::instance::<T>)
            .ok_or_else(|| ComponentContainerError::NoNamedInstance(name.to_string()))
    }
}
