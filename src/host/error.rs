use std::fmt;
use std::fmt::{Display, Formatter};

/// Error kinds of the calling protocol.
///
/// `AttributeError` doubles as the static resolver's "not found" signal and
/// as the single kind the bridge reports for a failed dynamic access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AttributeError,
    TypeError,
    ValueError,
    RuntimeError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::AttributeError => "AttributeError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ValueError => "ValueError",
            ErrorKind::RuntimeError => "RuntimeError",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    kind: ErrorKind,
    message: String,
}

impl HostError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        HostError {
            kind,
            message: message.into(),
        }
    }

    pub fn attribute_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AttributeError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    /// The error a static resolver raises for a member it does not declare.
    pub fn missing_attribute(class_name: &str, key: &str) -> Self {
        Self::attribute_error(format!(
            "'{}' object has no attribute '{}'",
            class_name, key
        ))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Is this the static resolver's "attribute missing" signal?
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::AttributeError
    }
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for HostError {}

/// The calling protocol's per-call error indicator.
///
/// Status-code entry points (see [`crate::bridge::abi`]) report failures by
/// leaving an error here and returning a sentinel. One `ErrorState` belongs
/// to one call stack and is threaded through by `&mut`; nothing in this
/// crate keeps it in thread-local or global storage.
#[derive(Debug, Default)]
pub struct ErrorState {
    current: Option<HostError>,
}

impl ErrorState {
    pub fn new() -> Self {
        ErrorState { current: None }
    }

    pub fn occurred(&self) -> bool {
        self.current.is_some()
    }

    /// Does the pending error have the given kind?
    pub fn matches(&self, kind: ErrorKind) -> bool {
        self.current.as_ref().map_or(false, |e| e.kind == kind)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn set(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.current = Some(HostError::new(kind, message));
    }

    pub fn restore(&mut self, error: HostError) {
        self.current = Some(error);
    }

    pub fn current(&self) -> Option<&HostError> {
        self.current.as_ref()
    }

    pub fn take(&mut self) -> Option<HostError> {
        self.current.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = HostError::missing_attribute("Point", "z");
        assert_eq!(e.to_string(), "AttributeError: 'Point' object has no attribute 'z'");
        assert!(e.is_not_found());
        assert!(!HostError::type_error("nope").is_not_found());
    }

    #[test]
    fn test_error_state_set_clear() {
        let mut state = ErrorState::new();
        assert!(!state.occurred());
        state.set(ErrorKind::TypeError, "bad");
        assert!(state.matches(ErrorKind::TypeError));
        assert!(!state.matches(ErrorKind::AttributeError));
        state.clear();
        assert!(!state.occurred());
        state.restore(HostError::attribute_error("gone"));
        assert_eq!(state.take().map(|e| e.message().to_string()), Some("gone".to_string()));
        assert!(state.current().is_none());
    }
}
