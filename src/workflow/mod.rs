//! Relocate-mutate-resign-restore workflow
//!
//! A run walks through [`Stage`]s in order:
//!
//! ```text
//! Validating -> Classifying -> Elevating (protected only) -> Mutating
//!            -> Staging -> Resigning -> Restoring -> Done
//! ```
//!
//! Any stage may stop the run with a [`WorkflowFailure`] that names the stage, the cause and the
//! bundle's location at that moment. Nothing is rolled back: a rewritten identifier stays
//! rewritten and a staged bundle stays staged, and the failure says where it is.
//!
//! The bundle is staged in a fresh `.rebundle-*` directory under the scratch dir, so it never
//! collides with anything already there. That directory is removed after a successful restore
//! and kept when a later stage fails.
//!
//! With `skip_resign` the run rewrites the identifier in place and goes straight from Mutating
//! to Done.

pub mod context;
pub mod failure;
pub mod stage;

use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::bundle::{BundleIdentifier, BundlePath, identifier};
use crate::config::ToolPaths;
use crate::error::{Result, bundle, relocate};
use crate::privilege::{Elevator, ProtectedRoots, ensure_elevated};
use crate::process::CommandRunner;
use crate::relocate::Relocator;
use crate::resign::Resigner;
use crate::ui::Reporter;

pub use context::{IdentifierSource, RunContext, RunRequest};
pub use failure::{RunOutcome, WorkflowFailure};
pub use stage::Stage;

use context::ResolvedSource;

type StageResult<T> = std::result::Result<T, WorkflowFailure>;

/// Drives a single run against the OS collaborators it was built with
pub struct Workflow<'a> {
    runner: &'a dyn CommandRunner,
    elevator: &'a dyn Elevator,
    tools: &'a ToolPaths,
    scratch_dir: PathBuf,
    protected_roots: ProtectedRoots,
}

impl<'a> Workflow<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        elevator: &'a dyn Elevator,
        tools: &'a ToolPaths,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            elevator,
            tools,
            scratch_dir: scratch_dir.into(),
            protected_roots: ProtectedRoots::default(),
        }
    }

    /// Replace the protected roots used by Classifying
    #[must_use]
    pub fn with_protected_roots(mut self, roots: ProtectedRoots) -> Self {
        self.protected_roots = roots;
        self
    }

    pub fn run(
        &self,
        request: &RunRequest,
        reporter: &mut dyn Reporter,
    ) -> StageResult<RunOutcome> {
        let mut ctx = self.validate(request, reporter)?;
        self.classify(&ctx, reporter);

        if ctx.protection.is_protected() && !request.skip_resign {
            self.elevate(&mut ctx, reporter)?;
        }

        let change = self.mutate(&mut ctx, reporter)?;

        if request.skip_resign {
            self.enter(Stage::Done, reporter, || {
                format!("Done! Identifier updated in place at {}", ctx.location.display())
            });
            return Ok(ctx.outcome(change, false));
        }

        self.stage_out(&mut ctx, reporter)?;
        self.resign(&ctx, reporter)?;
        self.restore(&mut ctx, reporter)?;
        remove_staging_dir(&mut ctx);

        self.enter(Stage::Done, reporter, || {
            format!("Done! App restored to {}", ctx.location.display())
        });
        Ok(ctx.outcome(change, true))
    }

    fn enter(&self, stage: Stage, reporter: &mut dyn Reporter, message: impl FnOnce() -> String) {
        debug!(%stage, "entering stage");
        reporter.stage(stage, &message());
    }

    fn validate(&self, request: &RunRequest, reporter: &mut dyn Reporter) -> StageResult<RunContext> {
        self.enter(Stage::Validating, reporter, || {
            format!("Checking {}", request.target.display())
        });
        let fail = |e| WorkflowFailure::unstarted(Stage::Validating, e);

        let target = BundlePath::resolve(&request.target, "Target app").map_err(fail)?;
        let source = match &request.source {
            IdentifierSource::Literal(id) => ResolvedSource::Literal(id.clone()),
            IdentifierSource::CloneFrom(path) => {
                ResolvedSource::Clone(BundlePath::resolve(path, "Clone app").map_err(fail)?)
            }
        };

        let protection = self.protected_roots.classify(target.as_path());
        RunContext::new(target, source, protection).map_err(fail)
    }

    fn classify(&self, ctx: &RunContext, reporter: &mut dyn Reporter) {
        self.enter(Stage::Classifying, reporter, || {
            if ctx.protection.is_protected() {
                format!("{} is in a protected location", ctx.target)
            } else {
                format!("{} is user-writable", ctx.target)
            }
        });
        debug!(target = %ctx.target, protection = ?ctx.protection, "classified target");
    }

    fn elevate(&self, ctx: &mut RunContext, reporter: &mut dyn Reporter) -> StageResult<()> {
        self.enter(Stage::Elevating, reporter, || {
            "Administrator access is required".to_string()
        });
        let credential = ensure_elevated(self.elevator).map_err(|e| ctx.fail(Stage::Elevating, e))?;
        ctx.credential = Some(credential);
        Ok(())
    }

    fn mutate(
        &self,
        ctx: &mut RunContext,
        reporter: &mut dyn Reporter,
    ) -> StageResult<identifier::IdentifierChange> {
        self.enter(Stage::Mutating, reporter, || {
            format!("Rewriting the bundle identifier of {}", ctx.target)
        });
        let fail = |e| ctx.fail(Stage::Mutating, e);

        let new = resolve_identifier(&ctx.source).map_err(fail)?;
        let current = identifier::read(ctx.target.as_path()).map_err(fail)?;
        reporter.info(&format!("Current CFBundleIdentifier: {current}"));

        let change = identifier::write(ctx.target.as_path(), &new).map_err(fail)?;
        reporter.info(&change.to_string());
        ctx.change = Some(change.clone());
        Ok(change)
    }

    fn stage_out(&self, ctx: &mut RunContext, reporter: &mut dyn Reporter) -> StageResult<()> {
        self.enter(Stage::Staging, reporter, || {
            format!("Moving app to {}", self.scratch_dir.display())
        });

        let staging_dir = tempfile::Builder::new()
            .prefix(".rebundle-")
            .tempdir_in(&self.scratch_dir)
            .map_err(|e| {
                ctx.fail(
                    Stage::Staging,
                    relocate::move_failed(&ctx.location, &self.scratch_dir, e),
                )
            })?
            .keep();
        debug!(staging_dir = %staging_dir.display(), "created staging directory");

        let relocator = Relocator::new(self.runner, &self.tools.mv);
        match relocator.move_into(&ctx.location, &staging_dir, ctx.credential.as_ref()) {
            Ok(staged) => {
                ctx.location = staged;
                ctx.staging_dir = Some(staging_dir);
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_dir(&staging_dir);
                Err(ctx.fail(Stage::Staging, e))
            }
        }
    }

    fn resign(&self, ctx: &RunContext, reporter: &mut dyn Reporter) -> StageResult<()> {
        self.enter(Stage::Resigning, reporter, || {
            format!("Re-signing {}", ctx.location.display())
        });
        let resigner = Resigner::new(self.runner, &self.tools.xattr, &self.tools.codesign);

        reporter.begin_step("Clearing extended attributes");
        if let Err(e) = resigner.clear_extended_attributes(&ctx.location) {
            reporter.abandon_step();
            return Err(ctx.fail(Stage::Resigning, e));
        }
        reporter.finish_step();

        reporter.begin_step("Applying ad-hoc signature");
        if let Err(e) = resigner.ad_hoc_resign(&ctx.location) {
            reporter.abandon_step();
            return Err(ctx.fail(Stage::Resigning, e));
        }
        reporter.finish_step();
        Ok(())
    }

    fn restore(&self, ctx: &mut RunContext, reporter: &mut dyn Reporter) -> StageResult<()> {
        self.enter(Stage::Restoring, reporter, || {
            format!("Moving app back to {}", ctx.original_parent.display())
        });
        let relocator = Relocator::new(self.runner, &self.tools.mv);
        let restored = relocator
            .move_into(&ctx.location, &ctx.original_parent, ctx.credential.as_ref())
            .map_err(|e| ctx.fail(Stage::Restoring, e))?;
        ctx.location = restored;
        Ok(())
    }
}

/// Remove the emptied staging directory; leftovers are only logged
fn remove_staging_dir(ctx: &mut RunContext) {
    if let Some(dir) = ctx.staging_dir.take() {
        if let Err(e) = fs::remove_dir(&dir) {
            warn!(staging_dir = %dir.display(), error = %e, "could not remove staging directory");
        }
    }
}

fn resolve_identifier(source: &ResolvedSource) -> Result<BundleIdentifier> {
    match source {
        ResolvedSource::Literal(id) => Ok(id.clone()),
        ResolvedSource::Clone(clone) => identifier::read_optional(clone.as_path())?.ok_or_else(|| {
            bundle::metadata_unreadable(
                &clone.info_plist(),
                "clone source has no CFBundleIdentifier",
            )
        }),
    }
}
