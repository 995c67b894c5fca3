//! Application bundle domain types
//!
//! - [`BundlePath`]: an absolute path to an existing `.app` directory
//! - [`BundleIdentifier`]: the `CFBundleIdentifier` token stored in its metadata
//! - [`identifier`]: reading and rewriting that token

pub mod identifier;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, bundle, fs::io_error};

/// Metadata file location relative to the bundle root
pub const INFO_PLIST: &str = "Contents/Info.plist";

/// Absolute path of an existing application bundle directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePath(PathBuf);

impl BundlePath {
    /// Resolve a user-supplied path to an absolute bundle path
    ///
    /// `what` names the path in the error message ("Target app", "Clone app").
    pub fn resolve(path: &Path, what: &str) -> Result<Self> {
        if !path.exists() {
            return Err(bundle::not_found(what, path));
        }

        let absolute = dunce::canonicalize(path)?;
        Ok(Self(absolute))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn info_plist(&self) -> PathBuf {
        info_plist_path(&self.0)
    }

    /// Directory the bundle currently lives in
    pub fn parent(&self) -> Result<PathBuf> {
        self.0
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| io_error(format!("{} has no parent directory", self.0.display())))
    }
}

impl fmt::Display for BundlePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Path of the metadata file inside a bundle
pub fn info_plist_path(bundle: &Path) -> PathBuf {
    bundle.join(INFO_PLIST)
}

/// Opaque bundle identifier token; any string is accepted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleIdentifier(String);

impl BundleIdentifier {
    /// Reported when a bundle has no identifier field
    pub const UNKNOWN: &'static str = "UNKNOWN";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BundleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BundleIdentifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BundleIdentifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}
