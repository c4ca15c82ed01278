//! Aggregation of Conan package metadata across a generators directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::conan::data_file::PackageData;

/// Union of all package metadata for one (build directory, build type) pair.
///
/// `BTreeSet` gives both deduplication and sorted emission, keeping the
/// synthesized configuration deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConanMetadata {
    pub include_dirs: BTreeSet<String>,
    pub defines: BTreeSet<String>,
    pub framework_dirs: BTreeSet<String>,
    pub frameworks: BTreeSet<String>,
}

impl ConanMetadata {
    /// Scan a generators directory for all data files matching the build
    /// type and merge their contents.
    ///
    /// A missing directory yields empty metadata; an unreadable file is
    /// logged and skipped so one broken package cannot fail the run.
    pub fn scan_generators_dir(generators_dir: &Path, build_type: &str) -> Self {
        let mut metadata = Self::default();

        let entries = match fs::read_dir(generators_dir) {
            Ok(entries) => entries,
            Err(_) => return metadata,
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !is_data_file_for(name, build_type) {
                continue;
            }

            match PackageData::parse(&entry.path()) {
                Ok(data) => metadata.absorb(data),
                Err(e) => {
                    warn!("Skipping unreadable data file {}: {}", entry.path().display(), e);
                }
            }
        }

        metadata
    }

    fn absorb(&mut self, data: PackageData) {
        self.include_dirs.extend(data.include_dirs);
        self.defines.extend(data.defines);
        self.framework_dirs.extend(data.framework_dirs);
        self.frameworks.extend(data.frameworks);
    }
}

/// Match Conan's `<pkg>-<buildtype>-<arch>-data.cmake` naming convention.
///
/// The build-type segment is lowercase in generated file names regardless of
/// how CMake spells the configuration.
pub fn is_data_file_for(file_name: &str, build_type: &str) -> bool {
    let Some(stem) = file_name.strip_suffix("-data.cmake") else {
        return false;
    };
    let needle = format!("-{}-", build_type.to_ascii_lowercase());
    match stem.find(&needle) {
        // Both the package and architecture segments must be non-empty.
        Some(pos) => pos > 0 && pos + needle.len() < stem.len(),
        None => false,
    }
}
