//! Common test utilities for rebundle integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use plist::{Dictionary, Value};
use tempfile::TempDir;

/// Info.plist encodings a fixture bundle can be written in
#[derive(Debug, Clone, Copy)]
pub enum Encoding {
    Xml,
    Binary,
}

/// A temp tree with an `apps/` directory for bundles and an empty `scratch/` staging directory
pub struct TestWorkspace {
    pub temp: TempDir,
    pub apps: PathBuf,
    pub scratch: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = dunce::canonicalize(temp.path()).expect("Failed to canonicalize temp dir");
        let apps = root.join("apps");
        let scratch = root.join("scratch");
        fs::create_dir_all(&apps).expect("Failed to create apps directory");
        fs::create_dir_all(&scratch).expect("Failed to create scratch directory");
        Self {
            temp,
            apps,
            scratch,
        }
    }

    /// Create `apps/<name>` with a Contents/Info.plist holding `identifier`
    pub fn create_bundle(&self, name: &str, identifier: Option<&str>, encoding: Encoding) -> PathBuf {
        let app = self.apps.join(name);
        fs::create_dir_all(app.join("Contents/MacOS")).expect("Failed to create bundle");
        fs::write(app.join("Contents/MacOS/app"), "#!/bin/sh\n").expect("Failed to write binary");

        let mut dict = Dictionary::new();
        dict.insert(
            "CFBundleName".to_string(),
            Value::String(name.trim_end_matches(".app").to_string()),
        );
        dict.insert(
            "CFBundleShortVersionString".to_string(),
            Value::String("2.4.1".to_string()),
        );
        if let Some(id) = identifier {
            dict.insert(
                "CFBundleIdentifier".to_string(),
                Value::String(id.to_string()),
            );
        }

        let value = Value::Dictionary(dict);
        let plist = app.join("Contents/Info.plist");
        match encoding {
            Encoding::Xml => value.to_file_xml(&plist),
            Encoding::Binary => value.to_file_binary(&plist),
        }
        .expect("Failed to write Info.plist");
        app
    }

    /// Path of `name` inside the single `.rebundle-*` staging dir left in scratch
    pub fn staged(&self, name: &str) -> PathBuf {
        let staging_dirs: Vec<PathBuf> = fs::read_dir(&self.scratch)
            .expect("Failed to read scratch dir")
            .map(|entry| entry.expect("Failed to read scratch entry").path())
            .filter(|path| {
                path.file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with(".rebundle-"))
            })
            .collect();
        assert_eq!(staging_dirs.len(), 1, "expected one staging dir in scratch");
        staging_dirs[0].join(name)
    }

    pub fn scratch_is_empty(&self) -> bool {
        fs::read_dir(&self.scratch)
            .expect("Failed to read scratch dir")
            .next()
            .is_none()
    }
}

/// Read a key from a bundle's Info.plist
pub fn plist_string(app: &Path, key: &str) -> Option<String> {
    Value::from_file(app.join("Contents/Info.plist"))
        .expect("Failed to read Info.plist")
        .into_dictionary()
        .and_then(|d| d.get(key).and_then(Value::as_string).map(str::to_string))
}

pub fn identifier(app: &Path) -> Option<String> {
    plist_string(app, "CFBundleIdentifier")
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn rebundle_cmd() -> Command {
    let mut cmd = Command::cargo_bin("rebundle").expect("rebundle binary should be built");
    cmd.env_remove("RUST_LOG")
        .env_remove("REBUNDLE_SCRATCH_DIR")
        .env_remove("REBUNDLE_SUDO")
        .env_remove("REBUNDLE_MV");
    cmd
}

/// Command with signing tools replaced by `true` and staging in the workspace scratch directory
pub fn rebundle_cmd_for_workspace(workspace: &TestWorkspace) -> Command {
    let mut cmd = rebundle_cmd();
    cmd.env("REBUNDLE_SCRATCH_DIR", &workspace.scratch)
        .env("REBUNDLE_XATTR", "true")
        .env("REBUNDLE_CODESIGN", "true");
    cmd
}
