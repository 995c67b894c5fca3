//! Run configuration: external tool locations and the scratch directory
//!
//! Tool paths default to the stock macOS locations and can be overridden through the
//! environment (`REBUNDLE_SUDO`, `REBUNDLE_MV`, `REBUNDLE_XATTR`, `REBUNDLE_CODESIGN`).

use std::path::PathBuf;

use crate::error::{RebundleError, Result};

pub const SUDO_ENV: &str = "REBUNDLE_SUDO";
pub const MV_ENV: &str = "REBUNDLE_MV";
pub const XATTR_ENV: &str = "REBUNDLE_XATTR";
pub const CODESIGN_ENV: &str = "REBUNDLE_CODESIGN";

/// Environment variable consulted by the `--scratch-dir` flag
pub const SCRATCH_DIR_ENV: &str = "REBUNDLE_SCRATCH_DIR";

const DEFAULT_SUDO: &str = "/usr/bin/sudo";
const DEFAULT_MV: &str = "/bin/mv";
const DEFAULT_XATTR: &str = "/usr/bin/xattr";
const DEFAULT_CODESIGN: &str = "/usr/bin/codesign";

/// Locations of the OS utilities rebundle shells out to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub sudo: PathBuf,
    pub mv: PathBuf,
    pub xattr: PathBuf,
    pub codesign: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            sudo: PathBuf::from(DEFAULT_SUDO),
            mv: PathBuf::from(DEFAULT_MV),
            xattr: PathBuf::from(DEFAULT_XATTR),
            codesign: PathBuf::from(DEFAULT_CODESIGN),
        }
    }
}

impl ToolPaths {
    /// Defaults with any environment overrides applied
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<std::ffi::OsString>) -> Self {
        let pick = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map_or_else(|| PathBuf::from(default), PathBuf::from)
        };

        Self {
            sudo: pick(SUDO_ENV, DEFAULT_SUDO),
            mv: pick(MV_ENV, DEFAULT_MV),
            xattr: pick(XATTR_ENV, DEFAULT_XATTR),
            codesign: pick(CODESIGN_ENV, DEFAULT_CODESIGN),
        }
    }
}

/// Resolve the staging directory
///
/// An explicit value (from `--scratch-dir` or `REBUNDLE_SCRATCH_DIR`) wins and is made
/// absolute against the current directory; otherwise the operator's home directory is used.
pub fn scratch_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(std::path::absolute(dir)?);
    }

    dirs::home_dir().ok_or(RebundleError::ScratchDirUnavailable)
}
