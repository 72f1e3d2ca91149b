//! Conversion between the calling protocol's values and raw dynamic values.

use std::convert::TryFrom;

use crate::dynamic::types::RawValue;
use crate::host::error::{ErrorKind, HostError};
use crate::host::value::{HostValue, NumberType};

/// Turns raw values produced by dynamic dispatch into [`HostValue`]s and back.
pub trait ValueConverter: Send + Sync {
    fn to_host(&self, raw: RawValue) -> Result<HostValue, HostError>;

    fn from_host(&self, value: &HostValue) -> Result<RawValue, HostError>;
}

/// Converts primitives: `()`, `bool`, the integer and float types, `String`,
/// `&'static str`, and `HostValue` itself, which passes through unchanged.
/// `u64`, `usize` and `isize` values outside the `i64` range are a
/// `ValueError`.
///
/// Host values convert to `()`, `bool`, `i64`, `f64` or `String`. Host
/// objects have no raw form and are rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimitiveConverter;

macro_rules! downcast_int {
    ($raw:ident, $($t:ty),*) => {
        $(
            let $raw = match $raw.downcast::<$t>() {
                Ok(v) => return Ok(HostValue::int(*v as i64)),
                Err(other) => other,
            };
        )*
    };
}

macro_rules! downcast_wide_int {
    ($raw:ident, $($t:ty),*) => {
        $(
            let $raw = match $raw.downcast::<$t>() {
                Ok(v) => {
                    return i64::try_from(*v).map(HostValue::int).map_err(|_| {
                        HostError::new(
                            ErrorKind::ValueError,
                            format!("{} {} does not fit a host integer", stringify!($t), v),
                        )
                    })
                }
                Err(other) => other,
            };
        )*
    };
}

impl ValueConverter for PrimitiveConverter {
    fn to_host(&self, raw: RawValue) -> Result<HostValue, HostError> {
        let raw = match raw.downcast::<HostValue>() {
            Ok(v) => return Ok(*v),
            Err(other) => other,
        };
        if raw.is::<()>() {
            return Ok(HostValue::None);
        }
        let raw = match raw.downcast::<bool>() {
            Ok(b) => return Ok(HostValue::Boolean(*b)),
            Err(other) => other,
        };
        downcast_int!(raw, i64, i32, i16, i8, u32, u16, u8);
        downcast_wide_int!(raw, u64, usize, isize);
        let raw = match raw.downcast::<f64>() {
            Ok(f) => return Ok(HostValue::float(*f)),
            Err(other) => other,
        };
        let raw = match raw.downcast::<f32>() {
            Ok(f) => return Ok(HostValue::float(f64::from(*f))),
            Err(other) => other,
        };
        let raw = match raw.downcast::<String>() {
            Ok(s) => return Ok(HostValue::String(*s)),
            Err(other) => other,
        };
        match raw.downcast::<&'static str>() {
            Ok(s) => Ok(HostValue::str(*s)),
            Err(_) => Err(HostError::type_error(
                "dynamic value has no host representation",
            )),
        }
    }

    fn from_host(&self, value: &HostValue) -> Result<RawValue, HostError> {
        Ok(match value {
            HostValue::None => Box::new(()),
            HostValue::Boolean(b) => Box::new(*b),
            HostValue::Number(NumberType::Integer(i)) => Box::new(*i),
            HostValue::Number(NumberType::Float(f)) => Box::new(*f),
            HostValue::String(s) => Box::new(s.clone()),
            HostValue::Object(o) => {
                return Err(HostError::type_error(format!(
                    "cannot pass '{}' object to the dynamic engine",
                    o.class_name()
                )))
            }
        })
    }
}
