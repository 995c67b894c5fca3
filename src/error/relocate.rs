//! Relocation errors

use super::RebundleError;
use std::path::Path;

/// Creates a destination-exists error
pub fn destination_exists(path: &Path) -> RebundleError {
    RebundleError::DestinationExists {
        path: path.display().to_string(),
    }
}

/// Creates a move failure
pub fn move_failed(from: &Path, to: &Path, reason: impl ToString) -> RebundleError {
    RebundleError::MoveFailed {
        from: from.display().to_string(),
        to: to.display().to_string(),
        reason: reason.to_string(),
    }
}
