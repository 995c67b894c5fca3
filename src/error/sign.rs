//! Extended-attribute and code-signing errors

use super::RebundleError;
use std::path::Path;

/// Creates an attribute-clearing failure
pub fn xattr_failed(path: &Path, reason: impl ToString) -> RebundleError {
    RebundleError::ResignStepFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates an ad-hoc signing failure
pub fn codesign_failed(path: &Path, reason: impl ToString) -> RebundleError {
    RebundleError::ResignFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
