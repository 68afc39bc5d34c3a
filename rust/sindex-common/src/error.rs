use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns `true` for failures of the remote metadata round trip
    /// (transport, remote failure, timeout).
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Connectivity { .. } | ErrorKind::Timeout { .. }
        )
    }

    pub fn connectivity(context: impl Into<String>) -> Error {
        Error(
            ErrorKind::Connectivity {
                context: context.into(),
                source: None,
            }
            .into(),
        )
    }

    pub fn connectivity_with<E>(context: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error(
            ErrorKind::Connectivity {
                context: context.into(),
                source: Some(Box::new(source)),
            }
            .into(),
        )
    }

    pub fn timeout(context: impl Into<String>, timeout: Duration) -> Error {
        Error(
            ErrorKind::Timeout {
                context: context.into(),
                timeout,
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("connectivity failure for '{context}'{}",
        source.as_ref().map(|e| format!(": {e}")).unwrap_or_default())]
    Connectivity {
        context: String,
        source: Option<StdErrorBoxed>,
    },

    #[error("'{context}' timed out after {timeout:?}")]
    Timeout { context: String, timeout: Duration },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Error, ErrorKind};

    #[test]
    fn test_connectivity_family() {
        assert!(Error::connectivity("info sindex").is_connectivity());
        assert!(Error::timeout("info sindex", Duration::from_millis(5)).is_connectivity());
        assert!(!Error::invalid_arg("interval", "must be positive").is_connectivity());
    }

    #[test]
    fn test_display() {
        let e = Error::connectivity_with(
            "node A",
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"),
        );
        assert_eq!(e.to_string(), "connectivity failure for 'node A': reset");
        assert_eq!(
            Error::connectivity("node A").to_string(),
            "connectivity failure for 'node A'"
        );
        assert!(matches!(
            Error::invalid_operation("join").into_kind(),
            ErrorKind::InvalidOperation { .. }
        ));
    }
}
