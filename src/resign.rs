//! Resigner: strips extended attributes and applies an ad-hoc signature

use std::path::Path;

use crate::error::{Result, sign};
use crate::process::{CommandRunner, Invocation};

pub struct Resigner<'a> {
    runner: &'a dyn CommandRunner,
    xattr: &'a Path,
    codesign: &'a Path,
}

impl<'a> Resigner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, xattr: &'a Path, codesign: &'a Path) -> Self {
        Self {
            runner,
            xattr,
            codesign,
        }
    }

    /// `xattr -cr <bundle>`
    pub fn clear_extended_attributes(&self, bundle: &Path) -> Result<()> {
        let invocation = Invocation::new(self.xattr)
            .arg("-cr")
            .arg(bundle.as_os_str());
        self.runner
            .run(&invocation)
            .map_err(|e| sign::xattr_failed(bundle, e))
    }

    /// `codesign --force --deep --sign - <bundle>`
    pub fn ad_hoc_resign(&self, bundle: &Path) -> Result<()> {
        let invocation = Invocation::new(self.codesign)
            .arg("--force")
            .arg("--deep")
            .arg("--sign")
            .arg("-")
            .arg(bundle.as_os_str());
        self.runner
            .run(&invocation)
            .map_err(|e| sign::codesign_failed(bundle, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RebundleError;
    use crate::process::testing::RecordingRunner;

    const XATTR: &str = "/usr/bin/xattr";
    const CODESIGN: &str = "/usr/bin/codesign";

    fn resigner(runner: &RecordingRunner) -> Resigner<'_> {
        Resigner::new(runner, Path::new(XATTR), Path::new(CODESIGN))
    }

    #[test]
    fn test_clear_extended_attributes_invocation() {
        let runner = RecordingRunner::new();
        resigner(&runner)
            .clear_extended_attributes(Path::new("/Users/x/App.app"))
            .unwrap();

        assert_eq!(
            runner.calls()[0].to_string(),
            "/usr/bin/xattr -cr /Users/x/App.app"
        );
    }

    #[test]
    fn test_ad_hoc_resign_invocation() {
        let runner = RecordingRunner::new();
        resigner(&runner)
            .ad_hoc_resign(Path::new("/Users/x/App.app"))
            .unwrap();

        assert_eq!(
            runner.calls()[0].to_string(),
            "/usr/bin/codesign --force --deep --sign - /Users/x/App.app"
        );
    }

    #[test]
    fn test_xattr_failure() {
        let runner = RecordingRunner::new().failing(XATTR);
        let result = resigner(&runner).clear_extended_attributes(Path::new("/Users/x/App.app"));
        assert!(matches!(result, Err(RebundleError::ResignStepFailed { .. })));
    }

    #[test]
    fn test_codesign_failure_is_flagged_as_expected() {
        let runner = RecordingRunner::new().failing(CODESIGN);
        let err = resigner(&runner)
            .ad_hoc_resign(Path::new("/Users/x/Safari.app"))
            .unwrap_err();
        assert!(matches!(err, RebundleError::ResignFailed { .. }));
        assert!(err.is_expected_for_protected_apps());
    }
}
