//! The calling protocol's side of the bridge: its values, its error
//! convention, and its objects with their static attribute resolution.

pub mod error;
pub mod object;
pub mod value;

pub use error::{ErrorKind, ErrorState, HostError};
pub use object::{DeclaredAttributes, HostObject, StaticResolver};
pub use value::{HostValue, NumberType};
