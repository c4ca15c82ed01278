//! Platform-specific default compiler detection.
//!
//! Used as a fallback when the CMake cache does not record a compiler path.
//! Every probe is best-effort: a missing tool, non-zero exit or unreadable
//! output degrades to "not found" and is never surfaced as an error.

use std::env;
use std::path::PathBuf;
#[cfg(any(target_os = "windows", target_os = "macos"))]
use std::process::Command;

use tracing::debug;

/// Outcome of one compiler probe.
///
/// `ProbeError` distinguishes "the locator tool itself misbehaved" from a
/// plain "no compiler installed"; callers treat both as not-found but the
/// reason is kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilerProbe {
    Found(PathBuf),
    NotFound,
    ProbeError(String),
}

impl CompilerProbe {
    /// Collapse the probe into an optional path, logging probe failures.
    fn into_path(self) -> Option<PathBuf> {
        match self {
            CompilerProbe::Found(path) => Some(path),
            CompilerProbe::NotFound => None,
            CompilerProbe::ProbeError(reason) => {
                debug!("Compiler probe failed: {}", reason);
                None
            }
        }
    }
}

/// Detected compiler plus the IntelliSense mode VS Code should use.
///
/// The mode string is always present; it falls back to a platform-specific
/// default even when no compiler is found.
#[derive(Debug, Clone)]
pub struct CompilerInfo {
    pub path: Option<PathBuf>,
    pub intellisense_mode: String,
}

/// Detect the host platform's default C++ compiler.
pub fn detect() -> CompilerInfo {
    #[cfg(target_os = "windows")]
    {
        detect_msvc()
    }
    #[cfg(target_os = "macos")]
    {
        detect_macos_clang()
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        detect_unix_compiler()
    }
}

/// MSVC via vswhere, falling back to `cl` on PATH.
#[cfg(target_os = "windows")]
fn detect_msvc() -> CompilerInfo {
    let path = probe_vswhere()
        .into_path()
        .or_else(|| probe_path_lookup("cl.exe").into_path());

    CompilerInfo {
        path,
        intellisense_mode: "windows-msvc-x64".to_string(),
    }
}

/// Ask vswhere for the latest Visual Studio installation and search its
/// toolchain layout for cl.exe.
#[cfg(target_os = "windows")]
fn probe_vswhere() -> CompilerProbe {
    let program_files =
        env::var("ProgramFiles(x86)").unwrap_or_else(|_| "C:\\Program Files (x86)".to_string());
    let vswhere = PathBuf::from(program_files)
        .join("Microsoft Visual Studio")
        .join("Installer")
        .join("vswhere.exe");

    if !vswhere.is_file() {
        return CompilerProbe::NotFound;
    }

    let output = match Command::new(&vswhere)
        .args(["-latest", "-property", "installationPath"])
        .output()
    {
        Ok(output) => output,
        Err(e) => return CompilerProbe::ProbeError(format!("vswhere failed to run: {e}")),
    };
    if !output.status.success() {
        return CompilerProbe::ProbeError("vswhere exited with failure".to_string());
    }

    let install_path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if install_path.is_empty() {
        return CompilerProbe::NotFound;
    }

    // cl.exe lives under VC/Tools/MSVC/<version>/bin/Hostx64/x64/.
    let msvc_root = PathBuf::from(install_path).join("VC").join("Tools").join("MSVC");
    let versions = match std::fs::read_dir(&msvc_root) {
        Ok(versions) => versions,
        Err(_) => return CompilerProbe::NotFound,
    };

    for version in versions.flatten() {
        let candidate = version
            .path()
            .join("bin")
            .join("Hostx64")
            .join("x64")
            .join("cl.exe");
        if candidate.is_file() {
            return CompilerProbe::Found(candidate);
        }
    }

    CompilerProbe::NotFound
}

/// Clang via `xcrun --find clang`, falling back to PATH.
#[cfg(target_os = "macos")]
fn detect_macos_clang() -> CompilerInfo {
    let path = probe_xcrun()
        .into_path()
        .or_else(|| probe_path_lookup("clang").into_path());

    CompilerInfo {
        path,
        intellisense_mode: "macos-clang-x64".to_string(),
    }
}

#[cfg(target_os = "macos")]
fn probe_xcrun() -> CompilerProbe {
    let output = match Command::new("xcrun").args(["--find", "clang"]).output() {
        Ok(output) => output,
        Err(e) => return CompilerProbe::ProbeError(format!("xcrun failed to run: {e}")),
    };
    if !output.status.success() {
        return CompilerProbe::ProbeError("xcrun exited with failure".to_string());
    }

    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if path.is_empty() {
        CompilerProbe::NotFound
    } else {
        CompilerProbe::Found(PathBuf::from(path))
    }
}

/// GCC preferred, Clang as the second family.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn detect_unix_compiler() -> CompilerInfo {
    if let Some(gcc) = probe_path_lookup("gcc").into_path() {
        return CompilerInfo {
            path: Some(gcc),
            intellisense_mode: "linux-gcc-x64".to_string(),
        };
    }

    if let Some(clang) = probe_path_lookup("clang").into_path() {
        return CompilerInfo {
            path: Some(clang),
            intellisense_mode: "linux-clang-x64".to_string(),
        };
    }

    CompilerInfo {
        path: None,
        intellisense_mode: "linux-gcc-x64".to_string(),
    }
}

/// Locate an executable on PATH.
fn probe_path_lookup(name: &str) -> CompilerProbe {
    let Some(path_var) = env::var_os("PATH") else {
        return CompilerProbe::NotFound;
    };
    match env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        Some(path) => CompilerProbe::Found(path),
        None => CompilerProbe::NotFound,
    }
}
