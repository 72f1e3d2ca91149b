use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of the concrete native type behind a wrapped instance.
///
/// Two identities are equal exactly when they name the same type. The name
/// is carried for diagnostics only and never takes part in comparison.
#[derive(Clone, Copy)]
pub struct HostType {
    id: TypeId,
    name: &'static str,
}

impl HostType {
    pub fn of<T: Any + ?Sized>() -> Self {
        HostType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for HostType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HostType {}

impl Hash for HostType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostType({})", self.name)
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A live native object that the dynamic engine can operate on.
///
/// Implemented for every `'static + Send + Sync` type. Call
/// [`host_type`](NativeInstance::host_type) through a `&dyn NativeInstance`
/// so that it reports the concrete type and not a smart pointer around it.
/// Smart pointers are `'static + Send + Sync` too, so an `Arc<T>` stored as
/// the instance reports `Arc<T>`, not `T`.
pub trait NativeInstance: Any + Send + Sync {
    fn host_type(&self) -> HostType;

    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> NativeInstance for T {
    fn host_type(&self) -> HostType {
        HostType::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A dynamically-typed value as the dynamic engine produces and consumes it.
pub type RawValue = Box<dyn Any + Send>;

/// Why a dispatch handle could not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DynamicError {
    /// The negotiated binding could not resolve the member on this type.
    #[error("cannot bind member: {0}")]
    Binder(String),
    /// The member resolved, but fetching or storing it raised.
    #[error("{0}")]
    Raised(String),
}

impl DynamicError {
    pub fn message(&self) -> &str {
        match self {
            DynamicError::Binder(m) => m,
            DynamicError::Raised(m) => m,
        }
    }

    pub fn is_binder_failure(&self) -> bool {
        matches!(self, DynamicError::Binder(_))
    }
}
