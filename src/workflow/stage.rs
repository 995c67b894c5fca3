//! Workflow stages

use std::fmt;

use serde::Serialize;

/// Steps of a run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    Classifying,
    Elevating,
    Mutating,
    Staging,
    Resigning,
    Restoring,
    Done,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Validating => "Validating",
            Stage::Classifying => "Classifying",
            Stage::Elevating => "Elevating",
            Stage::Mutating => "Mutating",
            Stage::Staging => "Staging",
            Stage::Resigning => "Resigning",
            Stage::Restoring => "Restoring",
            Stage::Done => "Done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
