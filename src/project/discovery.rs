//! Discovery of Conan-layout CMake build directories.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// One discovered build directory.
///
/// Discovered fresh on every run and never persisted. The preset name is the
/// path segment between the outer and inner `build` components of Conan's
/// `build/<preset>/build/` layout convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDirectory {
    pub path: PathBuf,
    pub preset: String,
}

impl BuildDirectory {
    pub fn new(path: PathBuf) -> Self {
        let preset = extract_preset_name(&path);
        Self { path, preset }
    }

    /// Wrap an explicitly requested build directory, bypassing discovery.
    /// A non-existent path yields no directories, which the caller treats
    /// the same as an empty discovery result.
    pub fn from_override(path: &Path) -> Vec<Self> {
        if path.is_dir() {
            vec![Self::new(path.to_path_buf())]
        } else {
            warn!("Requested build directory does not exist: {}", path.display());
            Vec::new()
        }
    }

    /// Path to this build directory's CMake cache file.
    pub fn cache_file(&self) -> PathBuf {
        self.path.join("CMakeCache.txt")
    }
}

/// Discover build directories matching `build/<preset>/build/` under the
/// workspace root, keeping only those with a `CMakeCache.txt`.
///
/// Non-conforming directories are skipped silently; traversal errors are
/// logged and never fail the scan. The result is ordered by preset name so
/// downstream output is stable across runs.
pub fn discover_build_directories(workspace_root: &Path) -> Vec<BuildDirectory> {
    let build_root = workspace_root.join("build");
    if !build_root.is_dir() {
        return Vec::new();
    }

    let mut build_dirs = Vec::new();

    let walker = WalkDir::new(&build_root)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to access directory entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_dir() || path.file_name().is_none_or(|name| name != "build") {
            continue;
        }

        if !path.join("CMakeCache.txt").is_file() {
            debug!("Skipping {} (no CMakeCache.txt)", path.display());
            continue;
        }

        build_dirs.push(BuildDirectory::new(path.to_path_buf()));
    }

    build_dirs
}

/// Derive the preset name from a build directory path.
///
/// Looks for the `build/<preset>/build` pattern anywhere in the path; falls
/// back to the parent directory name for bare `.../something/build` paths,
/// then to `"default"`.
fn extract_preset_name(build_dir: &Path) -> String {
    let parts: Vec<&str> = build_dir
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();

    for i in 0..parts.len() {
        if parts[i] == "build" && i + 2 < parts.len() && parts[i + 2] == "build" {
            return parts[i + 1].to_string();
        }
    }

    match parts.as_slice() {
        [.., preset, "build"] => preset.to_string(),
        [.., name] => name.to_string(),
        [] => "default".to_string(),
    }
}
