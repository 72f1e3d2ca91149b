//! The dynamic-resolution engine as the bridge sees it.
//!
//! An engine negotiates, for one host type and one member name, a reusable
//! *dispatch site* that knows how to fetch or store that member. Negotiation
//! is the expensive part; invoking the resulting site is cheap. Negotiation
//! never fails eagerly: a site for a member the type does not have is still
//! returned, and reports [`DynamicError::Binder`] when invoked.

use std::sync::Arc;

use crate::dynamic::types::{DynamicError, HostType, NativeInstance, RawValue};

/// A negotiated member read.
pub trait ReadSite: Send + Sync {
    fn invoke(&self, instance: &dyn NativeInstance) -> Result<RawValue, DynamicError>;
}

/// A negotiated member write.
pub trait WriteSite: Send + Sync {
    fn invoke(&self, instance: &dyn NativeInstance, value: RawValue) -> Result<(), DynamicError>;
}

impl<F> ReadSite for F
where
    F: Fn(&dyn NativeInstance) -> Result<RawValue, DynamicError> + Send + Sync,
{
    fn invoke(&self, instance: &dyn NativeInstance) -> Result<RawValue, DynamicError> {
        self(instance)
    }
}

impl<F> WriteSite for F
where
    F: Fn(&dyn NativeInstance, RawValue) -> Result<(), DynamicError> + Send + Sync,
{
    fn invoke(&self, instance: &dyn NativeInstance, value: RawValue) -> Result<(), DynamicError> {
        self(instance, value)
    }
}

pub type ReadHandle = Arc<dyn ReadSite>;
pub type WriteHandle = Arc<dyn WriteSite>;

pub trait DynamicEngine: Send + Sync {
    /// Negotiate how to read `member` from instances of `host_type`.
    fn negotiate_read(&self, host_type: &HostType, member: &str) -> ReadHandle;

    /// Negotiate how to write `member` on instances of `host_type`.
    fn negotiate_write(&self, host_type: &HostType, member: &str) -> WriteHandle;

    /// Human-readable name for this engine (for logging).
    fn name(&self) -> &str {
        "dynamic"
    }
}
