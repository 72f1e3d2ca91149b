//! The attribute bridge: static lookup first, dynamic dispatch second.
//!
//! ## How It Works
//!
//! ```text
//! get_attribute(obj, "speed")
//!      ↓
//! 1. Static resolver → found?            → return it (dynamic path never runs)
//!                    → other error?      → propagate untouched
//!                    → "not found"       ↓
//! 2. Unwrap native instance and its type
//! 3. Read site for (type, "speed")       ← dispatch-site cache, negotiated once
//! 4. Invoke site → raw value             → convert → return it
//!                → binder failure        → the static "not found" stands
//!                → anything else raised  → AttributeError(message)
//! ```
//!
//! The set path has the same shape, except that any failure of the dynamic
//! store is reported as `AttributeError(message)`; there is no
//! found/not-found distinction once the write has been attempted.

use std::sync::Arc;

use crate::bridge::config::BridgeConfig;
use crate::bridge::convert::ValueConverter;
use crate::bridge::site_cache::{global_sites, DispatchSiteCache};
use crate::dynamic::engine::DynamicEngine;
use crate::dynamic::types::DynamicError;
use crate::host::error::{ErrorKind, HostError};
use crate::host::object::{HostObject, StaticResolver};
use crate::host::value::HostValue;

/// Result of a bridged attribute read.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// One of the two protocols produced a value.
    Value(HostValue),
    /// Neither protocol knows the member. Carries the static resolver's own
    /// "not found" error, unchanged.
    NotFound(HostError),
    /// The member exists but reading it failed, or the static resolver
    /// failed with something other than "not found".
    Failed(HostError),
}

impl Outcome {
    pub fn into_result(self) -> Result<HostValue, HostError> {
        match self {
            Outcome::Value(v) => Ok(v),
            Outcome::NotFound(e) | Outcome::Failed(e) => Err(e),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound(_))
    }
}

/// Answers attribute reads and writes for host objects, falling back to a
/// dynamic engine for members static resolution does not know.
///
/// A bridge is `Send + Sync` and is meant to be shared. The dispatch-site
/// cache it uses may be shared further still: with `shared_cache` (the
/// default) every bridge in the process uses [`global_sites`].
pub struct AttributeBridge {
    static_resolver: Box<dyn StaticResolver>,
    engine: Box<dyn DynamicEngine>,
    converter: Box<dyn ValueConverter>,
    sites: Arc<DispatchSiteCache>,
    config: BridgeConfig,
}

impl AttributeBridge {
    /// A bridge with the default configuration, using the process-wide
    /// dispatch-site cache.
    pub fn new(
        static_resolver: Box<dyn StaticResolver>,
        engine: Box<dyn DynamicEngine>,
        converter: Box<dyn ValueConverter>,
    ) -> Self {
        Self::with_config(static_resolver, engine, converter, BridgeConfig::default())
    }

    pub fn with_config(
        static_resolver: Box<dyn StaticResolver>,
        engine: Box<dyn DynamicEngine>,
        converter: Box<dyn ValueConverter>,
        config: BridgeConfig,
    ) -> Self {
        let sites = if config.shared_cache {
            global_sites()
        } else {
            Arc::new(DispatchSiteCache::new())
        };
        AttributeBridge {
            static_resolver,
            engine,
            converter,
            sites,
            config,
        }
    }

    /// A bridge using the given dispatch-site cache regardless of
    /// `shared_cache`.
    pub fn with_cache(
        static_resolver: Box<dyn StaticResolver>,
        engine: Box<dyn DynamicEngine>,
        converter: Box<dyn ValueConverter>,
        sites: Arc<DispatchSiteCache>,
    ) -> Self {
        AttributeBridge {
            static_resolver,
            engine,
            converter,
            sites,
            config: BridgeConfig::default(),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn sites(&self) -> &Arc<DispatchSiteCache> {
        &self.sites
    }

    /// Read `key` from `obj`, reporting which way the lookup went.
    pub fn lookup(&self, obj: &HostObject, key: &str) -> Outcome {
        let not_found = match self.static_resolver.generic_get(obj, key) {
            Ok(value) => {
                trace!("static hit for {}.{}", obj.class_name(), key);
                return Outcome::Value(value);
            }
            Err(e) if e.is_not_found() => e,
            Err(e) => return Outcome::Failed(e),
        };

        if !self.config.dynamic_get || key.is_empty() {
            return Outcome::NotFound(not_found);
        }
        let instance = match obj.unwrap_native() {
            Some(instance) => instance,
            None => return Outcome::NotFound(not_found),
        };

        let host_type = instance.host_type();
        let site = match self
            .sites
            .get_read_handle(&*self.engine, &host_type, key)
        {
            Ok(site) => site,
            Err(e) => return Outcome::Failed(e),
        };

        match site.invoke(instance) {
            Ok(raw) => match self.converter.to_host(raw) {
                Ok(value) => Outcome::Value(value),
                Err(e) => Outcome::Failed(access_failure(obj, key, e.message())),
            },
            Err(DynamicError::Binder(reason)) => {
                trace!("no dynamic member {}.{}: {}", host_type, key, reason);
                Outcome::NotFound(not_found)
            }
            Err(DynamicError::Raised(message)) => {
                Outcome::Failed(access_failure(obj, key, &message))
            }
        }
    }

    /// Read `key` from `obj`.
    ///
    /// On failure the error is either the static resolver's own "not found"
    /// signal or an `AttributeError` describing why a dynamically resolved
    /// member could not be read. A non-"not found" error from the static
    /// resolver is returned as it was raised.
    pub fn get_attribute(&self, obj: &HostObject, key: &str) -> Result<HostValue, HostError> {
        self.lookup(obj, key).into_result()
    }

    /// Write `value` to `key` on `obj`.
    ///
    /// Static assignment is tried first and is authoritative unless it
    /// reports "not found". After that only the dynamic store is attempted,
    /// and any failure of it is an `AttributeError`.
    pub fn set_attribute(
        &self,
        obj: &HostObject,
        key: &str,
        value: &HostValue,
    ) -> Result<(), HostError> {
        let not_found = match self.static_resolver.generic_set(obj, key, value) {
            Ok(()) => {
                trace!("static store for {}.{}", obj.class_name(), key);
                return Ok(());
            }
            Err(e) if e.is_not_found() => e,
            Err(e) => return Err(e),
        };

        if !self.config.dynamic_set {
            return Err(not_found);
        }
        let instance = match obj.unwrap_native() {
            Some(instance) => instance,
            None => return Err(not_found),
        };

        let host_type = instance.host_type();
        let site = self
            .sites
            .get_write_handle(&*self.engine, &host_type, key)?;
        let raw = self
            .converter
            .from_host(value)
            .map_err(|e| access_failure(obj, key, e.message()))?;

        site.invoke(instance, raw)
            .map_err(|e| access_failure(obj, key, e.message()))
    }

    /// Does `obj` have an attribute named `key` under either protocol?
    ///
    /// Any `AttributeError` counts as "no"; other error kinds propagate.
    pub fn has_attribute(&self, obj: &HostObject, key: &str) -> Result<bool, HostError> {
        match self.lookup(obj, key) {
            Outcome::Value(_) => Ok(true),
            Outcome::NotFound(_) => Ok(false),
            Outcome::Failed(e) if e.kind() == ErrorKind::AttributeError => Ok(false),
            Outcome::Failed(e) => Err(e),
        }
    }
}

fn access_failure(obj: &HostObject, key: &str, message: &str) -> HostError {
    debug!(
        "dynamic access to {}.{} on object {} failed: {}",
        obj.class_name(),
        key,
        obj.id(),
        message
    );
    HostError::attribute_error(message)
}
