//! # attr-bridge - foreign attribute access for host objects
//!
//! Lets a host object model whose attribute lookup is static (driven by
//! declared structure) also answer reads and writes for members it does not
//! declare, by delegating to a dynamically-typed object model's own member
//! resolution. Static lookup always goes first; the dynamic engine is only
//! asked when static lookup reports the attribute missing.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use attr_bridge::bridge::{AttributeBridge, DispatchSiteCache, PrimitiveConverter};
//! use attr_bridge::dynamic::{
//!     DynamicEngine, DynamicError, HostType, NativeInstance, RawValue, ReadHandle, ReadSite,
//!     WriteHandle, WriteSite,
//! };
//! use attr_bridge::host::{DeclaredAttributes, HostObject, HostValue};
//!
//! struct Thermometer {
//!     celsius: f64,
//! }
//!
//! struct Fahrenheit;
//!
//! impl ReadSite for Fahrenheit {
//!     fn invoke(&self, instance: &dyn NativeInstance) -> Result<RawValue, DynamicError> {
//!         match instance.as_any().downcast_ref::<Thermometer>() {
//!             Some(t) => Ok(Box::new(t.celsius * 9.0 / 5.0 + 32.0)),
//!             None => Err(DynamicError::Binder("not a thermometer".to_string())),
//!         }
//!     }
//! }
//!
//! struct Unbound(String);
//!
//! impl ReadSite for Unbound {
//!     fn invoke(&self, _instance: &dyn NativeInstance) -> Result<RawValue, DynamicError> {
//!         Err(DynamicError::Binder(format!("no member {}", self.0)))
//!     }
//! }
//!
//! impl WriteSite for Unbound {
//!     fn invoke(&self, _instance: &dyn NativeInstance, _value: RawValue) -> Result<(), DynamicError> {
//!         Err(DynamicError::Raised(format!("{} is read-only", self.0)))
//!     }
//! }
//!
//! struct ThermometerEngine;
//!
//! impl DynamicEngine for ThermometerEngine {
//!     fn negotiate_read(&self, _host_type: &HostType, member: &str) -> ReadHandle {
//!         match member {
//!             "fahrenheit" => Arc::new(Fahrenheit),
//!             other => Arc::new(Unbound(other.to_string())),
//!         }
//!     }
//!
//!     fn negotiate_write(&self, _host_type: &HostType, member: &str) -> WriteHandle {
//!         Arc::new(Unbound(member.to_string()))
//!     }
//! }
//!
//! let bridge = AttributeBridge::with_cache(
//!     Box::new(DeclaredAttributes),
//!     Box::new(ThermometerEngine),
//!     Box::new(PrimitiveConverter),
//!     Arc::new(DispatchSiteCache::new()),
//! );
//! let obj = HostObject::wrapping("Thermometer", Thermometer { celsius: 100.0 })
//!     .with_declared("unit", HostValue::str("C"));
//!
//! // Declared: answered statically.
//! assert_eq!(bridge.get_attribute(&obj, "unit"), Ok(HostValue::str("C")));
//! // Undeclared: answered by the engine.
//! assert_eq!(bridge.get_attribute(&obj, "fahrenheit"), Ok(HostValue::float(212.0)));
//! // Unknown to both: a plain "missing attribute", so probes say no.
//! assert_eq!(bridge.has_attribute(&obj, "kelvin"), Ok(false));
//! // Dynamic store that raises: reported as an AttributeError.
//! let err = bridge.set_attribute(&obj, "fahrenheit", &HostValue::float(0.0)).unwrap_err();
//! assert_eq!(err.message(), "fahrenheit is read-only");
//! ```
//!
//! ## Dispatch Sites
//!
//! Working out *how* to reach a member of a given type is the expensive part
//! of dynamic access. The engine does it once per (type, member) and hands
//! back a reusable site; the [`bridge::DispatchSiteCache`] keeps that site
//! for every later access. By default all bridges in a process share one
//! cache ([`bridge::global_sites`]). It is unbounded and never evicts: types
//! are assumed to keep the same member shape for the life of the process.
//!
//! ## Architecture
//!
//! - **[`host`]** - the calling protocol: values, errors, objects and their
//!   static resolver
//! - **[`dynamic`]** - the seam to the dynamic-resolution engine
//! - **[`bridge`]** - the attribute bridge, its site cache, configuration and
//!   status-code entry points

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod bridge;
pub mod dynamic;
pub mod host;
