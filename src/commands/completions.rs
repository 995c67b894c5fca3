//! Shell completions command

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

/// Generate shell completions on stdout
pub fn run(shell: Shell) {
    write_completions(shell, &mut std::io::stdout().lock());
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = <Cli as CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "rebundle", out);
}
