//! Command implementations for the rebundle CLI

pub mod completions;
pub mod run;
