//! Status-code entry points for generic attribute machinery.
//!
//! These wrap [`AttributeBridge`] in the calling protocol's native
//! convention: a sentinel return value plus an error left in the caller's
//! [`ErrorState`]. The state is exactly one of:
//!
//! - untouched by the bridge: it holds the static resolver's own "not
//!   found" signal, as if the dynamic path had never run;
//! - an `AttributeError` carrying the dynamic failure's message, written
//!   only after any earlier error was cleared;
//! - a non-"not found" error from the static resolver, passed through.

use crate::bridge::attribute::{AttributeBridge, Outcome};
use crate::host::error::ErrorState;
use crate::host::object::HostObject;
use crate::host::value::HostValue;

pub const STATUS_OK: i32 = 0;
pub const STATUS_FAILED: i32 = -1;

/// Returns `None` with `state` set on failure.
pub fn get_attribute(
    bridge: &AttributeBridge,
    obj: &HostObject,
    key: &str,
    state: &mut ErrorState,
) -> Option<HostValue> {
    match bridge.lookup(obj, key) {
        Outcome::Value(value) => Some(value),
        Outcome::NotFound(signal) => {
            state.restore(signal);
            None
        }
        Outcome::Failed(error) => {
            state.clear();
            state.restore(error);
            None
        }
    }
}

/// Returns [`STATUS_OK`], or [`STATUS_FAILED`] with `state` set.
pub fn set_attribute(
    bridge: &AttributeBridge,
    obj: &HostObject,
    key: &str,
    value: &HostValue,
    state: &mut ErrorState,
) -> i32 {
    match bridge.set_attribute(obj, key, value) {
        Ok(()) => STATUS_OK,
        Err(error) => {
            state.clear();
            state.restore(error);
            STATUS_FAILED
        }
    }
}

/// Returns `1` or `0`, or [`STATUS_FAILED`] with `state` set when the probe
/// itself failed.
pub fn has_attribute(
    bridge: &AttributeBridge,
    obj: &HostObject,
    key: &str,
    state: &mut ErrorState,
) -> i32 {
    match bridge.has_attribute(obj, key) {
        Ok(found) => found as i32,
        Err(error) => {
            state.restore(error);
            STATUS_FAILED
        }
    }
}
