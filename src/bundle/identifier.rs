//! Identifier store
//!
//! Reads and rewrites `CFBundleIdentifier` in `Contents/Info.plist`. The property list is
//! re-encoded in the format it was read in (binary or XML) and every other key is kept as-is.
//! The rewritten file is staged next to the original and renamed over it, so a crash never
//! leaves a truncated Info.plist behind.

use std::fmt;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use plist::{Dictionary, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{BundleIdentifier, info_plist_path};
use crate::error::{Result, bundle};

/// Key holding the bundle identifier
pub const IDENTIFIER_KEY: &str = "CFBundleIdentifier";

const BINARY_MAGIC: &[u8] = b"bplist";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Binary,
    Xml,
}

/// Old and new identifier of a rewritten bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierChange {
    pub bundle: PathBuf,
    pub old: BundleIdentifier,
    pub new: BundleIdentifier,
}

impl fmt::Display for IdentifierChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Changed {IDENTIFIER_KEY} from '{}' to '{}' for {}",
            self.old,
            self.new,
            self.bundle.display()
        )
    }
}

/// Read the identifier of a bundle
///
/// Returns [`BundleIdentifier::UNKNOWN`] when the key is missing or not a string.
pub fn read(bundle: &Path) -> Result<BundleIdentifier> {
    Ok(read_optional(bundle)?.unwrap_or_else(BundleIdentifier::unknown))
}

/// Read the identifier of a bundle, `None` when the key is missing or not a string
pub fn read_optional(bundle: &Path) -> Result<Option<BundleIdentifier>> {
    let plist_path = info_plist_path(bundle);
    let (dict, _) = load(&plist_path)?;
    Ok(identifier_in(&dict))
}

/// Replace the identifier of a bundle, keeping every other key
pub fn write(bundle: &Path, new: &BundleIdentifier) -> Result<IdentifierChange> {
    let plist_path = info_plist_path(bundle);
    let (mut dict, encoding) = load(&plist_path)?;

    let old = identifier_in(&dict).unwrap_or_else(BundleIdentifier::unknown);
    info!(bundle = %bundle.display(), old = %old, new = %new, "rewriting bundle identifier");

    dict.insert(IDENTIFIER_KEY.to_string(), Value::String(new.as_str().to_string()));
    store(&plist_path, &Value::Dictionary(dict), encoding)?;

    Ok(IdentifierChange {
        bundle: bundle.to_path_buf(),
        old,
        new: new.clone(),
    })
}

fn identifier_in(dict: &Dictionary) -> Option<BundleIdentifier> {
    dict.get(IDENTIFIER_KEY)
        .and_then(Value::as_string)
        .map(BundleIdentifier::new)
}

fn load(plist_path: &Path) -> Result<(Dictionary, Encoding)> {
    if !plist_path.is_file() {
        return Err(bundle::not_a_bundle(plist_path));
    }

    let bytes = fs::read(plist_path).map_err(|e| bundle::metadata_unreadable(plist_path, e))?;
    let encoding = if bytes.starts_with(BINARY_MAGIC) {
        Encoding::Binary
    } else {
        Encoding::Xml
    };
    debug!(path = %plist_path.display(), ?encoding, "loading Info.plist");

    let value = Value::from_reader(Cursor::new(bytes))
        .map_err(|e| bundle::metadata_unreadable(plist_path, e))?;
    let dict = value.into_dictionary().ok_or_else(|| {
        bundle::metadata_unreadable(plist_path, "top-level value is not a dictionary")
    })?;

    Ok((dict, encoding))
}

fn store(plist_path: &Path, value: &Value, encoding: Encoding) -> Result<()> {
    let dir = plist_path
        .parent()
        .ok_or_else(|| bundle::metadata_write_failed(plist_path, "no parent directory"))?;
    let write_failed = |e: &dyn fmt::Display| bundle::metadata_write_failed(plist_path, e);

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| write_failed(&e))?;
    match encoding {
        Encoding::Binary => value.to_writer_binary(staged.as_file_mut()),
        Encoding::Xml => value.to_writer_xml(staged.as_file_mut()),
    }
    .map_err(|e| write_failed(&e))?;
    staged.as_file_mut().flush().map_err(|e| write_failed(&e))?;
    staged.as_file().sync_all().map_err(|e| write_failed(&e))?;

    let permissions = fs::metadata(plist_path)
        .map_err(|e| write_failed(&e))?
        .permissions();
    fs::set_permissions(staged.path(), permissions).map_err(|e| write_failed(&e))?;

    staged
        .persist(plist_path)
        .map_err(|e| write_failed(&e.error))?;
    Ok(())
}
