//! Error types and handling for rebundle
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`bundle`]: Bundle lookup and metadata errors
//! - [`relocate`]: Move/rename errors
//! - [`sign`]: Extended-attribute and code-signing errors
//! - [`fs`]: File system errors

pub mod bundle;
pub mod fs;
pub mod relocate;
pub mod sign;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for rebundle operations
#[derive(Error, Diagnostic, Debug)]
pub enum RebundleError {
    // Bundle errors
    #[error("{what} does not exist: {path}")]
    #[diagnostic(
        code(rebundle::bundle::not_found),
        help("Check the path; it should point at an existing .app directory")
    )]
    NotFound { what: String, path: String },

    #[error("Info.plist not found at {path}")]
    #[diagnostic(
        code(rebundle::bundle::not_a_bundle),
        help("An application bundle must contain Contents/Info.plist")
    )]
    NotABundle { path: String },

    #[error("Failed to read bundle metadata: {path}: {reason}")]
    #[diagnostic(code(rebundle::bundle::metadata_unreadable))]
    MetadataUnreadable { path: String, reason: String },

    #[error("Failed to write bundle metadata: {path}: {reason}")]
    #[diagnostic(
        code(rebundle::bundle::metadata_write_failed),
        help("Check that you own the bundle, or work on a copy in a user-writable directory")
    )]
    MetadataWriteFailed { path: String, reason: String },

    #[error("Must specify either -b (bundle) or -c (clone)")]
    #[diagnostic(
        code(rebundle::cli::missing_identifier_source),
        help("Use -h for help")
    )]
    MissingIdentifierSource,

    #[error("Must specify the target app")]
    #[diagnostic(code(rebundle::cli::missing_target), help("Use -h for help"))]
    MissingTarget,

    // Privilege errors
    #[error("Administrator authentication failed: {reason}")]
    #[diagnostic(
        code(rebundle::privilege::elevation_denied),
        help(
            "Apps under /Applications, /System or /Library need administrator rights. \
             Copy the app to a user-writable location (e.g. ~/Applications) and run rebundle on the copy."
        )
    )]
    ElevationDenied { reason: String },

    // Relocation errors
    #[error("Destination already exists: {path}")]
    #[diagnostic(
        code(rebundle::relocate::destination_exists),
        help("Remove or rename the existing item; rebundle never overwrites")
    )]
    DestinationExists { path: String },

    #[error("Failed to move {from} to {to}: {reason}")]
    #[diagnostic(code(rebundle::relocate::move_failed))]
    MoveFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Could not determine a scratch directory")]
    #[diagnostic(
        code(rebundle::relocate::scratch_unavailable),
        help("Set REBUNDLE_SCRATCH_DIR or pass --scratch-dir")
    )]
    ScratchDirUnavailable,

    // Signing errors
    #[error("Failed to clear extended attributes on {path}: {reason}")]
    #[diagnostic(code(rebundle::sign::xattr_failed))]
    ResignStepFailed { path: String, reason: String },

    #[error("Ad-hoc code signing failed for {path}: {reason}")]
    #[diagnostic(
        code(rebundle::sign::codesign_failed),
        help(
            "This is expected for SIP-protected or Apple-owned system apps and does not indicate a defect"
        )
    )]
    ResignFailed { path: String, reason: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(rebundle::fs::io_error))]
    IoError {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl RebundleError {
    /// True for failures that protected system apps produce by design
    pub fn is_expected_for_protected_apps(&self) -> bool {
        matches!(self, RebundleError::ResignFailed { .. })
    }
}

impl From<std::io::Error> for RebundleError {
    fn from(err: std::io::Error) -> Self {
        RebundleError::IoError {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, RebundleError>;
