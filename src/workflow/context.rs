//! Per-run state held by the workflow
//!
//! A [`RunContext`] is created once the target has been validated and is dropped when the run
//! ends. It remembers where the bundle came from so a failure can always say where it is now.

use std::path::{Path, PathBuf};

use super::failure::{RunOutcome, WorkflowFailure};
use super::stage::Stage;
use crate::bundle::identifier::IdentifierChange;
use crate::bundle::{BundleIdentifier, BundlePath};
use crate::error::{RebundleError, Result};
use crate::privilege::{ElevationCredential, ProtectionClass};

/// Where the new identifier comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierSource {
    /// Use this value as-is
    Literal(BundleIdentifier),
    /// Copy the identifier of another bundle
    CloneFrom(PathBuf),
}

/// What the operator asked for
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub target: PathBuf,
    pub source: IdentifierSource,
    /// Only rewrite the identifier; no elevation, relocation or signing
    pub skip_resign: bool,
}

/// Identifier source after its path (if any) has been validated
#[derive(Debug, Clone)]
pub(super) enum ResolvedSource {
    Literal(BundleIdentifier),
    Clone(BundlePath),
}

/// Transient state for a single run
#[derive(Debug)]
pub struct RunContext {
    pub target: BundlePath,
    pub(super) source: ResolvedSource,
    pub original_parent: PathBuf,
    pub protection: ProtectionClass,
    /// Where the bundle is right now
    pub location: PathBuf,
    pub credential: Option<ElevationCredential>,
    /// Identifier rewrite, once Mutating has succeeded
    pub change: Option<IdentifierChange>,
    /// Per-run directory under the scratch dir holding the staged bundle
    pub staging_dir: Option<PathBuf>,
}

impl RunContext {
    pub(super) fn new(
        target: BundlePath,
        source: ResolvedSource,
        protection: ProtectionClass,
    ) -> Result<Self> {
        let original_parent = target.parent()?;
        let location = target.as_path().to_path_buf();
        Ok(Self {
            target,
            source,
            original_parent,
            protection,
            location,
            credential: None,
            change: None,
            staging_dir: None,
        })
    }

    pub fn original_path(&self) -> &Path {
        self.target.as_path()
    }

    /// Failure at `stage`, capturing where the bundle currently is
    pub fn fail(&self, stage: Stage, error: RebundleError) -> WorkflowFailure {
        WorkflowFailure {
            stage,
            error,
            original: Some(self.original_path().to_path_buf()),
            location: Some(self.location.clone()),
            elevated: self.credential.is_some(),
            change: self.change.clone(),
        }
    }

    pub fn outcome(&self, change: IdentifierChange, resigned: bool) -> RunOutcome {
        RunOutcome {
            original: self.original_path().to_path_buf(),
            location: self.location.clone(),
            change,
            elevated: self.credential.is_some(),
            resigned,
        }
    }
}
