//! The `c_cpp_properties.json` document model and writer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compiler::CompilerInfo;
use crate::conan::ConanMetadata;
use crate::sync::SyncError;

/// Document format version understood by the C/C++ extension.
const DOCUMENT_VERSION: u32 = 4;

const DOCUMENT_COMMENT: &str = "CMake Tools extension provides primary IntelliSense via \
                                compile_commands.json. Explicit paths serve as fallback.";

/// One IntelliSense configuration, named `<preset>-<buildType>`.
///
/// Created fresh each run from Conan metadata and compiler information and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationEntry {
    pub name: String,
    pub configuration_provider: String,
    pub include_path: Vec<String>,
    pub defines: Vec<String>,
    pub compiler_path: String,
    pub c_standard: String,
    pub cpp_standard: String,
    pub intelli_sense_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_framework_path: Option<Vec<String>>,
}

impl ConfigurationEntry {
    pub fn new(
        preset: &str,
        build_type: &str,
        metadata: &ConanMetadata,
        compiler_path: Option<PathBuf>,
        compiler: &CompilerInfo,
    ) -> Self {
        // Framework paths only make sense for the macOS IntelliSense engine.
        let mac_framework_path = if cfg!(target_os = "macos") && !metadata.framework_dirs.is_empty()
        {
            Some(metadata.framework_dirs.iter().cloned().collect())
        } else {
            None
        };

        Self {
            name: format!("{preset}-{build_type}"),
            configuration_provider: "ms-vscode.cmake-tools".to_string(),
            include_path: build_include_path(metadata),
            defines: build_defines(build_type, metadata),
            compiler_path: compiler_path
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            c_standard: "c17".to_string(),
            cpp_standard: "c++20".to_string(),
            intelli_sense_mode: compiler.intellisense_mode.clone(),
            mac_framework_path,
        }
    }
}

/// Workspace-relative includes first, then the sorted Conan package includes.
fn build_include_path(metadata: &ConanMetadata) -> Vec<String> {
    let mut paths = vec![
        "${workspaceFolder}/**".to_string(),
        "${workspaceFolder}/include".to_string(),
        "${workspaceFolder}/src".to_string(),
    ];
    paths.extend(metadata.include_dirs.iter().cloned());
    paths
}

/// Unicode defines, the build-type define, then sorted Conan defines.
fn build_defines(build_type: &str, metadata: &ConanMetadata) -> Vec<String> {
    let mut defines = vec!["UNICODE".to_string(), "_UNICODE".to_string()];
    if build_type == "Debug" {
        defines.push("_DEBUG".to_string());
    } else {
        defines.push("NDEBUG".to_string());
    }
    defines.extend(metadata.defines.iter().cloned());
    defines
}

/// The full configuration document, rewritten as a whole or not at all.
#[derive(Debug, Serialize, Deserialize)]
pub struct CppProperties {
    pub version: u32,
    pub configurations: Vec<ConfigurationEntry>,
    #[serde(rename = "$comment")]
    pub comment: String,
}

/// Outcome of one synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The document was rewritten with this many entries.
    Updated { entries: usize },
    /// All hashes matched; the document was left completely untouched.
    Unchanged,
    /// Nothing to write: no build directory produced an entry.
    NoConfigurations,
}

/// Write the merged document if anything changed.
///
/// Zero synthesized entries is reported upstream as a failure condition;
/// zero changes leaves the existing file untouched to avoid IDE
/// file-watcher churn.
pub fn write_document(
    vscode_dir: &Path,
    configurations: Vec<ConfigurationEntry>,
    has_changes: bool,
) -> Result<SyncOutcome, SyncError> {
    if configurations.is_empty() {
        return Ok(SyncOutcome::NoConfigurations);
    }

    if !has_changes {
        return Ok(SyncOutcome::Unchanged);
    }

    let entries = configurations.len();
    let document = CppProperties {
        version: DOCUMENT_VERSION,
        configurations,
        comment: DOCUMENT_COMMENT.to_string(),
    };

    let output_file = vscode_dir.join("c_cpp_properties.json");
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    fs::write(&output_file, json)?;

    info!(
        "Updated {} with {} configuration(s)",
        output_file.display(),
        entries
    );

    Ok(SyncOutcome::Updated { entries })
}
