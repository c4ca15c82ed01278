//! Persisted content-hash records for change detection.
//!
//! One record file per (preset, build type) pair lives next to the
//! configuration document in `.vscode/`, named
//! `.conan_hash_<preset>_<buildType>` and containing only the hex digest.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::conan::is_data_file_for;

const RECORD_PREFIX: &str = ".conan_hash_";

/// Store of last-seen metadata digests, keyed by (preset, build type).
#[derive(Debug)]
pub struct HashStore {
    dir: PathBuf,
}

impl HashStore {
    pub fn new(vscode_dir: &Path) -> Self {
        Self {
            dir: vscode_dir.to_path_buf(),
        }
    }

    fn record_path(&self, preset: &str, build_type: &str) -> PathBuf {
        self.dir
            .join(format!("{RECORD_PREFIX}{preset}_{build_type}"))
    }

    /// Last stored digest for the pair, or `None` if never recorded.
    pub fn load(&self, preset: &str, build_type: &str) -> Option<String> {
        fs::read_to_string(self.record_path(preset, build_type))
            .ok()
            .map(|content| content.trim().to_string())
    }

    /// Persist the digest for the pair, replacing any prior record.
    pub fn store(&self, preset: &str, build_type: &str, digest: &str) -> io::Result<()> {
        fs::write(self.record_path(preset, build_type), digest)
    }

    /// Delete records of this preset whose build type is not in the valid
    /// set. Returns how many records were removed; deletion failures are
    /// warnings, never fatal.
    pub fn remove_orphans(&self, preset: &str, valid_build_types: &BTreeSet<String>) -> usize {
        let prefix = format!("{RECORD_PREFIX}{preset}_");
        let mut removed = 0;

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(build_type) = name.strip_prefix(&prefix) else {
                continue;
            };
            if valid_build_types.contains(build_type) {
                continue;
            }

            match fs::remove_file(entry.path()) {
                Ok(()) => {
                    info!("Cleaned up orphaned hash record: {}", name);
                    removed += 1;
                }
                Err(e) => warn!("Could not remove {}: {}", name, e),
            }
        }

        removed
    }
}

/// Digest of all data files matching the build type inside a generators
/// directory.
///
/// Files are concatenated in sorted path order, so the result is independent
/// of filesystem enumeration order. No matching files hashes to the digest
/// of empty input, which is still a stable value for the pair.
pub fn hash_metadata_files(generators_dir: &Path, build_type: &str) -> io::Result<String> {
    let mut files: Vec<PathBuf> = Vec::new();

    if let Ok(entries) = fs::read_dir(generators_dir) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            if name
                .to_str()
                .is_some_and(|n| is_data_file_for(n, build_type))
            {
                files.push(entry.path());
            }
        }
    }
    files.sort();

    let mut hasher = Sha256::new();
    for file in &files {
        hasher.update(fs::read(file)?);
    }

    let digest = hasher.finalize();
    Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
}
