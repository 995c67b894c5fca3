//! The main command: rewrite a bundle identifier and re-sign the app

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::debug;

use crate::bundle::BundleIdentifier;
use crate::cli::Cli;
use crate::config::{self, ToolPaths};
use crate::error::{RebundleError, Result};
use crate::privilege::SudoElevator;
use crate::process::SystemRunner;
use crate::ui::report::{self, RunReport};
use crate::ui::{ConsoleReporter, Reporter, SilentReporter};
use crate::workflow::{
    IdentifierSource, RunOutcome, RunRequest, Stage, Workflow, WorkflowFailure,
};

/// Options for a single run, taken from the command line
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub target: Option<PathBuf>,
    pub bundle: Option<String>,
    pub clone: Option<PathBuf>,
    pub skip_resign: bool,
    pub scratch_dir: Option<PathBuf>,
    pub json: bool,
}

impl From<Cli> for RunArgs {
    fn from(cli: Cli) -> Self {
        Self {
            target: cli.target,
            bundle: cli.bundle,
            clone: cli.clone,
            skip_resign: cli.skip_resign,
            scratch_dir: cli.scratch_dir,
            json: cli.json,
        }
    }
}

/// Execute a run and report its result
pub fn run(args: RunArgs) -> ExitCode {
    let json = args.json;
    let result = execute(args);

    match (&result, json) {
        (Ok(outcome), true) => println!("{}", RunReport::success(outcome).to_json()),
        (Ok(_), false) => {}
        (Err(failure), true) => println!("{}", RunReport::failure(failure).to_json()),
        (Err(failure), false) => report::print_failure(failure),
    }

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn execute(args: RunArgs) -> std::result::Result<RunOutcome, WorkflowFailure> {
    let unstarted = |e| WorkflowFailure::unstarted(Stage::Validating, e);

    let request = build_request(&args).map_err(unstarted)?;
    let scratch_dir = config::scratch_dir(args.scratch_dir).map_err(unstarted)?;
    let tools = ToolPaths::from_env();
    debug!(?tools, scratch_dir = %scratch_dir.display(), "resolved configuration");

    let runner = SystemRunner;
    let elevator = SudoElevator::new(&runner, &tools.sudo);
    let workflow = Workflow::new(&runner, &elevator, &tools, scratch_dir);

    let mut reporter: Box<dyn Reporter> = if args.json {
        Box::new(SilentReporter)
    } else {
        Box::new(ConsoleReporter::new())
    };
    workflow.run(&request, reporter.as_mut())
}

fn build_request(args: &RunArgs) -> Result<RunRequest> {
    let target = args.target.clone().ok_or(RebundleError::MissingTarget)?;

    let source = match (&args.bundle, &args.clone) {
        (_, Some(clone)) => IdentifierSource::CloneFrom(clone.clone()),
        (Some(bundle), None) => IdentifierSource::Literal(BundleIdentifier::new(bundle.as_str())),
        (None, None) => return Err(RebundleError::MissingIdentifierSource),
    };

    Ok(RunRequest {
        target,
        source,
        skip_resign: args.skip_resign,
    })
}
