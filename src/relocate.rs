//! Relocator: moves a bundle directory into another directory
//!
//! Never overwrites. Without a credential the move is a plain `rename`; with one it is an
//! elevated `mv`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, relocate};
use crate::privilege::ElevationCredential;
use crate::process::{CommandRunner, Invocation};

pub struct Relocator<'a> {
    runner: &'a dyn CommandRunner,
    mv: &'a Path,
}

impl<'a> Relocator<'a> {
    pub fn new(runner: &'a dyn CommandRunner, mv: &'a Path) -> Self {
        Self { runner, mv }
    }

    /// Move `source` into `destination_dir`, returning the new path
    ///
    /// Fails with `DestinationExists` (leaving `source` untouched) when
    /// `destination_dir/<name of source>` is already taken.
    pub fn move_into(
        &self,
        source: &Path,
        destination_dir: &Path,
        credential: Option<&ElevationCredential>,
    ) -> Result<PathBuf> {
        let destination = destination_for(source, destination_dir)?;

        if destination.symlink_metadata().is_ok() {
            return Err(relocate::destination_exists(&destination));
        }

        debug!(
            from = %source.display(),
            to = %destination.display(),
            elevated = credential.is_some(),
            "moving bundle"
        );

        match credential {
            Some(credential) => {
                let invocation = credential.elevate(
                    Invocation::new(self.mv)
                        .arg(source.as_os_str())
                        .arg(destination.as_os_str()),
                );
                self.runner
                    .run(&invocation)
                    .map_err(|e| relocate::move_failed(source, &destination, e))?;
            }
            None => {
                fs::rename(source, &destination)
                    .map_err(|e| relocate::move_failed(source, &destination, e))?;
            }
        }

        Ok(destination)
    }
}

fn destination_for(source: &Path, destination_dir: &Path) -> Result<PathBuf> {
    let name = source.file_name().ok_or_else(|| {
        relocate::move_failed(source, destination_dir, "source path has no final component")
    })?;
    Ok(destination_dir.join(name))
}
