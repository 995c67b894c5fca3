//! Bundle lookup and metadata errors

use super::RebundleError;
use std::path::Path;

/// Creates a not-found error for a path the operator supplied
pub fn not_found(what: impl Into<String>, path: &Path) -> RebundleError {
    RebundleError::NotFound {
        what: what.into(),
        path: path.display().to_string(),
    }
}

/// Creates a not-a-bundle error pointing at the missing Info.plist
pub fn not_a_bundle(info_plist: &Path) -> RebundleError {
    RebundleError::NotABundle {
        path: info_plist.display().to_string(),
    }
}

/// Creates a metadata decode error
pub fn metadata_unreadable(path: &Path, reason: impl ToString) -> RebundleError {
    RebundleError::MetadataUnreadable {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a metadata encode/persist error
pub fn metadata_write_failed(path: &Path, reason: impl ToString) -> RebundleError {
    RebundleError::MetadataWriteFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
