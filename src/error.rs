//! Domain-specific error types for remote-exec.
//!
//! `RemoteExecError` is a `thiserror`-based enum with typed variants for the
//! failure modes of validation, resolution and script execution. Library
//! functions return `Result<T, RemoteExecError>`; trait seams and the binary
//! use `anyhow::Result`, and the `?` operator converts between the two.

use std::io;

/// Formats an IO error kind into a human-readable message.
///
/// Common kinds get a fixed message (e.g., "I/O error: not found") instead of
/// the OS-level text (e.g., "No such file or directory (os error 2)"). Other
/// kinds fall back to the OS-level message.
pub(crate) fn io_error_kind_message(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "I/O error: not found".to_string(),
        io::ErrorKind::PermissionDenied => "I/O error: permission denied".to_string(),
        io::ErrorKind::IsADirectory => "I/O error: is a directory".to_string(),
        io::ErrorKind::InvalidData => "I/O error: invalid data".to_string(),
        _ => format!("I/O error: {}", err),
    }
}

/// Domain-specific error type for remote-exec.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RemoteExecError {
    /// The provisioner block is structurally invalid: an unrecognized key,
    /// a value of the wrong type, or zero/multiple script modes set.
    #[error("configuration error: {0}")]
    Config(String),

    /// A script file could not be opened or read.
    #[error("{context}: {message}")]
    Io {
        /// The path (or operation and path) involved in the failure.
        context: String,
        /// Human-readable description derived from [`io_error_kind_message`].
        message: String,
        /// The underlying I/O error, kept for `source.kind()` inspection.
        #[source]
        source: io::Error,
    },

    /// A script ran but did not succeed.
    #[error("script execution failed: {command}: {status}")]
    Execution {
        /// The command or script that was executed.
        command: String,
        /// Exit status or failure reason.
        status: String,
    },

    /// Resolution was cancelled between two file opens.
    #[error("cancelled: {0}")]
    Cancelled(String),
}

impl RemoteExecError {
    /// Creates an `Io` variant with `message` derived from `source`.
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            message: io_error_kind_message(&source),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_display() {
        let err = RemoteExecError::Config("unrecognized key 'invalid'".to_string());
        assert_eq!(err.to_string(), "configuration error: unrecognized key 'invalid'");
    }

    #[test]
    fn test_execution_display() {
        let err = RemoteExecError::Execution {
            command: "/bin/sh /tmp/remote-exec_1.sh".to_string(),
            status: "exit status: 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "script execution failed: /bin/sh /tmp/remote-exec_1.sh: exit status: 1"
        );
    }

    #[test]
    fn test_cancelled_display() {
        let err = RemoteExecError::Cancelled("before opening scripts/b.sh".to_string());
        assert_eq!(err.to_string(), "cancelled: before opening scripts/b.sh");
    }

    #[test]
    fn test_io_constructor_derives_message() {
        let err = RemoteExecError::io(
            "scripts/missing.sh",
            io::Error::new(io::ErrorKind::NotFound, "entity not found"),
        );
        assert_eq!(err.to_string(), "scripts/missing.sh: I/O error: not found");
        match &err {
            RemoteExecError::Io { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_io_error_kind_message_permission_denied() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(io_error_kind_message(&err), "I/O error: permission denied");
    }

    #[test]
    fn test_io_error_kind_message_invalid_data() {
        let err = io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        assert_eq!(io_error_kind_message(&err), "I/O error: invalid data");
    }

    #[test]
    fn test_io_error_kind_message_other() {
        let err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
        let msg = io_error_kind_message(&err);
        assert!(msg.starts_with("I/O error: "));
    }

    #[test]
    fn test_into_anyhow_error() {
        let err = RemoteExecError::Config("test".to_string());
        let anyhow_err: anyhow::Error = err.into();
        let downcast = anyhow_err.downcast_ref::<RemoteExecError>();
        assert!(matches!(downcast, Some(RemoteExecError::Config(_))));
    }
}
