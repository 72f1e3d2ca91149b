//! The foreign attribute-access bridge.
//!
//! ## Key Components
//!
//! - **[`AttributeBridge`]**: `get_attribute` / `set_attribute` /
//!   `has_attribute`, composing static resolution with dynamic dispatch
//! - **[`DispatchSiteCache`]**: read-through memo of negotiated dispatch
//!   sites, keyed by (host type, member name)
//! - **[`ValueConverter`]**: the seam for turning raw dynamic values into
//!   host values and back
//! - **[`abi`]**: sentinel/status-code entry points that report through an
//!   [`ErrorState`](crate::host::ErrorState)
//! - **[`BridgeConfig`]**: which fallbacks are enabled and which cache is used
//!
//! ## Error Taxonomy
//!
//! | Situation                                  | Reported as                      |
//! |--------------------------------------------|----------------------------------|
//! | static resolver raised something else      | that error, untouched            |
//! | member unknown to both protocols           | the static "not found" signal    |
//! | dynamic binder could not resolve member    | the static "not found" signal    |
//! | member resolved but fetch/store raised     | `AttributeError(message)`        |
//!
//! Callers that only probe for existence therefore see a single error kind
//! from the dynamic path and never a raw engine error.

pub mod abi;
pub mod attribute;
pub mod config;
pub mod convert;
pub mod site_cache;

pub use attribute::{AttributeBridge, Outcome};
pub use config::{BridgeConfig, ConfigError};
pub use convert::{PrimitiveConverter, ValueConverter};
pub use site_cache::{global_sites, CacheStats, DispatchSiteCache, SiteKey};
