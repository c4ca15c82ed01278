//! Advisory check for the CMake Tools extension.

use std::fs;
use std::path::Path;

use tracing::warn;

/// Sentinel caching a successful validation, so the advisory warning is
/// printed at most once per workspace.
const VALIDATION_SENTINEL: &str = ".cmake_tools_validated";

/// Files the extension creates in `.vscode/` when active.
const INDICATORS: [&str; 2] = ["cmake-tools-kits.json", ".cmaketools.json"];

/// Check whether the CMake Tools extension appears to be installed.
///
/// The check is advisory: when no indicator is found the extension is
/// assumed to be installed later, a recommendation is logged once and the
/// result is still `true`. Callers treat `false` as a fatal prerequisite
/// failure, which today cannot happen through this probe.
pub fn ensure_cmake_tools(vscode_dir: &Path) -> bool {
    let sentinel = vscode_dir.join(VALIDATION_SENTINEL);
    if sentinel.exists() {
        return true;
    }

    let indicator_found = INDICATORS
        .iter()
        .any(|indicator| vscode_dir.join(indicator).exists());

    if !indicator_found {
        warn!(
            "CMake Tools extension indicators not found. Extension is recommended. \
             Install from: https://marketplace.visualstudio.com/items?itemName=ms-vscode.cmake-tools"
        );
    }

    if let Err(e) = fs::write(&sentinel, "") {
        warn!("Could not cache CMake Tools validation: {}", e);
    }

    true
}
