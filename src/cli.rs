//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::SCRATCH_DIR_ENV;

/// rebundle - change a macOS app's bundle identifier and re-sign it
///
/// Rewrites CFBundleIdentifier in the app's Info.plist, clears extended attributes and applies
/// an ad-hoc signature. Apps under /Applications, /System or /Library are moved to a scratch
/// directory for signing and moved back afterwards, using administrator rights.
#[derive(Parser, Debug)]
#[command(
    name = "rebundle",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Change a macOS app's CFBundleIdentifier and re-sign it",
    long_about = "Rewrites CFBundleIdentifier in an app's Contents/Info.plist, clears its extended \
                  attributes and applies an ad-hoc code signature. Apps in protected locations \
                  (/Applications, /System, /Library) are staged in a scratch directory and \
                  restored afterwards with administrator rights.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  rebundle ~/Applications/App.app -b com.example.app\n    \
                  rebundle /Applications/App.app -c /Applications/Other.app\n    \
                  rebundle ./App.app -b com.example.app --skip-resign\n    \
                  rebundle ./App.app -b com.example.app --json\n    \
                  rebundle --completions zsh > ~/.zfunc/_rebundle"
)]
pub struct Cli {
    /// Path to the .app bundle to modify
    #[arg(value_name = "TARGET_APP")]
    pub target: Option<PathBuf>,

    /// New bundle identifier to set
    #[arg(long, short = 'b', value_name = "ID", conflicts_with = "clone")]
    pub bundle: Option<String>,

    /// Path to another .app whose bundle identifier is copied
    #[arg(long, short = 'c', value_name = "APP")]
    pub clone: Option<PathBuf>,

    /// Only rewrite the identifier in place (no relocation, elevation or signing)
    #[arg(long)]
    pub skip_resign: bool,

    /// Directory used to stage the app while it is signed (defaults to your home directory)
    #[arg(long, value_name = "DIR", env = SCRATCH_DIR_ENV)]
    pub scratch_dir: Option<PathBuf>,

    /// Print a JSON report on stdout instead of the step-by-step narrative
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub completions: Option<Shell>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_parsing_literal_identifier() {
        let cli = Cli::try_parse_from(["rebundle", "/Users/x/App.app", "-b", "com.new.id"]).unwrap();
        assert_eq!(cli.target, Some(PathBuf::from("/Users/x/App.app")));
        assert_eq!(cli.bundle.as_deref(), Some("com.new.id"));
        assert!(cli.clone.is_none());
        assert!(!cli.skip_resign);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parsing_clone_long_form() {
        let cli = Cli::try_parse_from([
            "rebundle",
            "/Applications/App.app",
            "--clone",
            "/Applications/Other.app",
        ])
        .unwrap();
        assert_eq!(cli.clone, Some(PathBuf::from("/Applications/Other.app")));
        assert!(cli.bundle.is_none());
    }

    #[test]
    fn test_cli_bundle_and_clone_conflict() {
        let err = Cli::try_parse_from([
            "rebundle",
            "App.app",
            "-b",
            "com.new.id",
            "-c",
            "Other.app",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_parses_without_identifier_source() {
        // Reported by the run command with exit status 1, not by clap
        let cli = Cli::try_parse_from(["rebundle", "App.app"]).unwrap();
        assert!(cli.bundle.is_none());
        assert!(cli.clone.is_none());
    }

    #[test]
    fn test_cli_parses_without_target() {
        let cli = Cli::try_parse_from(["rebundle", "-b", "com.new.id"]).unwrap();
        assert!(cli.target.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "rebundle",
            "App.app",
            "-b",
            "com.new.id",
            "--skip-resign",
            "--json",
            "-v",
            "--scratch-dir",
            "/tmp/stage",
        ])
        .unwrap();
        assert!(cli.skip_resign);
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.scratch_dir, Some(PathBuf::from("/tmp/stage")));
    }

    #[test]
    fn test_cli_completions() {
        let cli = Cli::try_parse_from(["rebundle", "--completions", "zsh"]).unwrap();
        assert_eq!(cli.completions, Some(Shell::Zsh));
    }

    #[test]
    fn test_cli_completions_is_exclusive() {
        let result = Cli::try_parse_from(["rebundle", "App.app", "--completions", "bash"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_help_lists_examples() {
        let err = Cli::try_parse_from(["rebundle", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("--skip-resign"));
    }
}
