use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::host::object::HostObject;

/// A value in the calling protocol's own representation.
///
/// Everything the bridge hands back to the caller's generic attribute
/// machinery is one of these, regardless of whether the static resolver or
/// the dynamic engine produced it.
pub enum HostValue {
    None,
    Boolean(bool),
    Number(NumberType),
    String(String),
    Object(Arc<HostObject>),
}

impl HostValue {
    pub fn int(i: i64) -> Self {
        HostValue::Number(NumberType::Integer(i))
    }

    pub fn float(f: f64) -> Self {
        HostValue::Number(NumberType::Float(f))
    }

    pub fn str(s: impl Into<String>) -> Self {
        HostValue::String(s.into())
    }

    pub fn type_name(&self) -> &str {
        match self {
            HostValue::None => "none",
            HostValue::Boolean(_) => "bool",
            HostValue::Number(NumberType::Integer(_)) => "int",
            HostValue::Number(NumberType::Float(_)) => "float",
            HostValue::String(_) => "str",
            HostValue::Object(o) => o.class_name(),
        }
    }
}

impl Clone for HostValue {
    fn clone(&self) -> Self {
        match self {
            HostValue::None => HostValue::None,
            HostValue::Boolean(b) => HostValue::Boolean(*b),
            HostValue::Number(n) => HostValue::Number(n.clone()),
            HostValue::String(s) => HostValue::String(s.to_string()),
            HostValue::Object(o) => HostValue::Object(Arc::clone(o)),
        }
    }
}

impl Display for HostValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::None => write!(f, "None"),
            HostValue::Boolean(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            HostValue::Number(n) => write!(f, "{}", n),
            HostValue::String(s) => write!(f, "'{}'", s),
            HostValue::Object(o) => write!(f, "<{} object {}>", o.class_name(), o.id()),
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::None => write!(f, "HostValue::None"),
            HostValue::Boolean(b) => write!(f, "HostValue::Boolean({})", b),
            HostValue::Number(n) => write!(f, "HostValue::Number({:?})", n),
            HostValue::String(s) => write!(f, "HostValue::String({:?})", s),
            HostValue::Object(o) => write!(f, "HostValue::Object({})", o.class_name()),
        }
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::None, HostValue::None) => true,
            (HostValue::Boolean(a), HostValue::Boolean(b)) => a == b,
            (HostValue::Number(a), HostValue::Number(b)) => a == b,
            (HostValue::String(a), HostValue::String(b)) => a == b,
            (HostValue::Object(a), HostValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberType {
    Integer(i64),
    Float(f64),
}

impl Display for NumberType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NumberType::Integer(i) => write!(f, "{}", i),
            NumberType::Float(nf) => write!(f, "{:?}", nf),
        }
    }
}
