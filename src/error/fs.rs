//! File system errors

use super::RebundleError;

/// Creates an IO error without an underlying source
pub fn io_error(message: impl Into<String>) -> RebundleError {
    RebundleError::IoError {
        message: message.into(),
        source: None,
    }
}
