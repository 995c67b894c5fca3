//! Run results: success outcome and stage-tagged failure

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::stage::Stage;
use crate::bundle::identifier::IdentifierChange;
use crate::error::RebundleError;

/// A completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub original: PathBuf,
    pub location: PathBuf,
    pub change: IdentifierChange,
    pub elevated: bool,
    pub resigned: bool,
}

/// A run that stopped at `stage`
#[derive(Error, Debug)]
#[error("{stage} failed: {error}")]
pub struct WorkflowFailure {
    pub stage: Stage,
    #[source]
    pub error: RebundleError,
    /// Bundle path at the start of the run, once validated
    pub original: Option<PathBuf>,
    /// Bundle path at the moment of failure
    pub location: Option<PathBuf>,
    pub elevated: bool,
    /// Identifier rewrite already applied when the run stopped
    pub change: Option<IdentifierChange>,
}

impl WorkflowFailure {
    /// Failure before a run context exists (bundle untouched)
    pub fn unstarted(stage: Stage, error: RebundleError) -> Self {
        Self {
            stage,
            error,
            original: None,
            location: None,
            elevated: false,
            change: None,
        }
    }

    /// Current location when the bundle is not where it started
    pub fn displaced_location(&self) -> Option<&Path> {
        match (&self.original, &self.location) {
            (Some(original), Some(location)) if original != location => Some(location),
            _ => None,
        }
    }
}
