//! Privilege gate
//!
//! Decides whether a bundle lives under a protected system tree and, when it does, obtains an
//! [`ElevationCredential`] once per run. The credential is passed explicitly to every operation
//! that must run elevated.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{RebundleError, Result};
use crate::process::{CommandRunner, Invocation};

/// System trees that need administrator rights to modify
pub const PROTECTED_ROOTS: &[&str] = &["/Applications", "/System", "/Library"];

/// Whether a bundle path sits in a protected system tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionClass {
    Protected,
    Unprotected,
}

impl ProtectionClass {
    pub fn is_protected(self) -> bool {
        self == ProtectionClass::Protected
    }
}

/// The set of protected root prefixes
#[derive(Debug, Clone)]
pub struct ProtectedRoots {
    roots: Vec<PathBuf>,
}

impl Default for ProtectedRoots {
    fn default() -> Self {
        Self {
            roots: PROTECTED_ROOTS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl ProtectedRoots {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    /// Lexical, component-wise prefix check. Never touches the filesystem.
    pub fn is_protected(&self, path: &Path) -> bool {
        self.roots.iter().any(|root| path.starts_with(root))
    }

    pub fn classify(&self, path: &Path) -> ProtectionClass {
        if self.is_protected(path) {
            ProtectionClass::Protected
        } else {
            ProtectionClass::Unprotected
        }
    }
}

/// Proof that administrator credentials were validated during this run
///
/// Carries the elevation utility so privileged operations reuse the same session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationCredential {
    sudo: PathBuf,
}

impl ElevationCredential {
    /// Only elevators construct credentials, after validating them
    pub(crate) fn validated(sudo: impl Into<PathBuf>) -> Self {
        Self { sudo: sudo.into() }
    }

    /// Wrap an invocation so it runs elevated
    pub fn elevate(&self, invocation: Invocation) -> Invocation {
        let mut elevated = Invocation::new(&self.sudo).arg(invocation.program.into_os_string());
        elevated.args.extend(invocation.args);
        elevated
    }
}

/// Source of elevation credentials
pub trait Elevator {
    fn elevate(&self) -> Result<ElevationCredential>;
}

/// Validates a `sudo` timestamp, prompting the operator if needed
pub struct SudoElevator<'a> {
    runner: &'a dyn CommandRunner,
    sudo: PathBuf,
}

impl<'a> SudoElevator<'a> {
    pub fn new(runner: &'a dyn CommandRunner, sudo: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            sudo: sudo.into(),
        }
    }
}

impl Elevator for SudoElevator<'_> {
    fn elevate(&self) -> Result<ElevationCredential> {
        let invocation = Invocation::new(&self.sudo).arg("-v");
        self.runner
            .run(&invocation)
            .map_err(|e| RebundleError::ElevationDenied {
                reason: e.to_string(),
            })?;
        Ok(ElevationCredential::validated(&self.sudo))
    }
}

/// Obtain an elevation credential for a protected target
pub fn ensure_elevated(elevator: &dyn Elevator) -> Result<ElevationCredential> {
    debug!("requesting administrator credentials");
    let credential = elevator.elevate()?;
    info!("administrator credentials validated");
    Ok(credential)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::RecordingRunner;

    fn is_protected(path: &Path) -> bool {
        ProtectedRoots::default().is_protected(path)
    }

    #[test]
    fn test_applications_is_protected() {
        assert!(is_protected(Path::new("/Applications/App.app")));
        assert!(is_protected(Path::new("/Applications/Utilities/Terminal.app")));
        assert!(is_protected(Path::new("/System/Applications/Safari.app")));
        assert!(is_protected(Path::new("/Library/Application Support/App.app")));
    }

    #[test]
    fn test_user_paths_are_not_protected() {
        assert!(!is_protected(Path::new("/Users/x/App.app")));
        assert!(!is_protected(Path::new("/Users/x/Applications/App.app")));
        assert!(!is_protected(Path::new("/tmp/App.app")));
    }

    #[test]
    fn test_prefix_match_is_component_wise() {
        assert!(!is_protected(Path::new("/ApplicationsBackup/App.app")));
        assert!(!is_protected(Path::new("/SystemX/App.app")));
    }

    #[test]
    fn test_relative_paths_are_not_protected() {
        assert!(!is_protected(Path::new("Applications/App.app")));
    }

    #[test]
    fn test_check_ignores_filesystem_state() {
        // Neither path exists on a build machine; classification is purely lexical.
        assert!(is_protected(Path::new("/Applications/Nonexistent-rebundle.app")));
        assert!(!is_protected(Path::new("/nonexistent/rebundle/App.app")));
    }

    #[test]
    fn test_custom_roots() {
        let roots = ProtectedRoots::new([PathBuf::from("/opt/apps")]);
        assert_eq!(
            roots.classify(Path::new("/opt/apps/App.app")),
            ProtectionClass::Protected
        );
        assert_eq!(
            roots.classify(Path::new("/Applications/App.app")),
            ProtectionClass::Unprotected
        );
    }

    #[test]
    fn test_sudo_elevator_validates_once() {
        let runner = RecordingRunner::new();
        let elevator = SudoElevator::new(&runner, "/usr/bin/sudo");

        let credential = ensure_elevated(&elevator).unwrap();

        assert_eq!(credential, ElevationCredential::validated("/usr/bin/sudo"));
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to_string(), "/usr/bin/sudo -v");
    }

    #[test]
    fn test_sudo_elevator_denied() {
        let runner = RecordingRunner::new().failing("/usr/bin/sudo");
        let elevator = SudoElevator::new(&runner, "/usr/bin/sudo");

        let result = ensure_elevated(&elevator);
        assert!(matches!(result, Err(RebundleError::ElevationDenied { .. })));
    }

    #[test]
    fn test_credential_wraps_invocation() {
        let credential = ElevationCredential::validated("/usr/bin/sudo");
        let inv = credential.elevate(Invocation::new("/bin/mv").arg("/a/App.app").arg("/b/App.app"));
        assert_eq!(inv.to_string(), "/usr/bin/sudo /bin/mv /a/App.app /b/App.app");
    }
}
