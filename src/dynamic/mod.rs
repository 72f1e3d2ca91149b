//! The dynamic object model's side of the bridge.
//!
//! Nothing here resolves members itself. These are the seams through which
//! the bridge asks an engine to negotiate dispatch sites, and the types that
//! cross that seam.

pub mod engine;
pub mod types;

pub use engine::{DynamicEngine, ReadHandle, ReadSite, WriteHandle, WriteSite};
pub use types::{DynamicError, HostType, NativeInstance, RawValue};
