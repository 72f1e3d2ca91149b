//! Host objects and the static (declared-structure) attribute resolver.
//!
//! A [`HostObject`] is the calling protocol's view of an object: a class name,
//! a table of declared attributes that static resolution can see, and, for
//! objects that wrap a native instance, a borrowed-on-demand handle to that
//! instance. Ownership of the native instance stays with the object; the
//! bridge only ever borrows it for the length of one call.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::dynamic::types::NativeInstance;
use crate::host::error::HostError;
use crate::host::value::HostValue;

pub struct HostObject {
    id: Uuid,
    class_name: String,
    /// Attributes known ahead of time, visible to static resolution.
    declared: RwLock<HashMap<String, HostValue>>,
    native: Option<Arc<dyn NativeInstance>>,
}

impl HostObject {
    /// A plain host object with no native payload.
    pub fn new(class_name: impl Into<String>) -> Self {
        HostObject {
            id: Uuid::new_v4(),
            class_name: class_name.into(),
            declared: RwLock::new(HashMap::new()),
            native: None,
        }
    }

    /// A host object exposing `instance` to the dynamic path.
    ///
    /// Pass the instance itself. An `Arc<T>` or `Box<T>` is a native type of
    /// its own and keys its own dispatch sites, distinct from `T`'s. Hand an
    /// already shared instance to [`wrapping_shared`](Self::wrapping_shared).
    pub fn wrapping<T: NativeInstance>(class_name: impl Into<String>, instance: T) -> Self {
        Self::wrapping_shared(class_name, Arc::new(instance))
    }

    pub fn wrapping_shared(
        class_name: impl Into<String>,
        instance: Arc<dyn NativeInstance>,
    ) -> Self {
        HostObject {
            native: Some(instance),
            ..Self::new(class_name)
        }
    }

    pub fn with_declared(self, name: impl Into<String>, value: HostValue) -> Self {
        self.declare(name, value);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Add or replace a declared attribute. Returns the previous value.
    pub fn declare(&self, name: impl Into<String>, value: HostValue) -> Option<HostValue> {
        self.declared
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value)
    }

    pub fn declared(&self, name: &str) -> Option<HostValue> {
        self.declared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Borrow the native instance backing this object, if it has one.
    pub fn unwrap_native(&self) -> Option<&dyn NativeInstance> {
        self.native.as_deref()
    }
}

/// The always-tried-first attribute lookup based on declared structure.
///
/// Implementations signal "attribute missing" with a [`HostError`] of kind
/// `AttributeError` (see [`HostError::is_not_found`]). Any other error kind
/// means the member was found but could not be read or written, and the
/// bridge passes it through untouched.
pub trait StaticResolver: Send + Sync {
    fn generic_get(&self, obj: &HostObject, key: &str) -> Result<HostValue, HostError>;

    fn generic_set(&self, obj: &HostObject, key: &str, value: &HostValue)
        -> Result<(), HostError>;
}

/// Resolves against the object's declared attribute table.
///
/// Writes may replace declared attributes but never add new ones: the
/// declared shape of an object is fixed, so an undeclared name is reported
/// missing on both paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclaredAttributes;

impl StaticResolver for DeclaredAttributes {
    fn generic_get(&self, obj: &HostObject, key: &str) -> Result<HostValue, HostError> {
        obj.declared(key)
            .ok_or_else(|| HostError::missing_attribute(obj.class_name(), key))
    }

    fn generic_set(
        &self,
        obj: &HostObject,
        key: &str,
        value: &HostValue,
    ) -> Result<(), HostError> {
        if obj.is_declared(key) {
            obj.declare(key, value.clone());
            Ok(())
        } else {
            Err(HostError::missing_attribute(obj.class_name(), key))
        }
    }
}
