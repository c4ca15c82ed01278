//! CMakeCache.txt reader.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Build configuration extracted from a `CMakeCache.txt` file.
///
/// Every field is optional: consumers must treat absence as "use the
/// default/fallback" rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmakeCacheInfo {
    /// `CMAKE_CXX_COMPILER`, preferred over any probed compiler.
    pub cxx_compiler: Option<PathBuf>,

    /// `CMAKE_BUILD_TYPE`, set for single-configuration generators.
    pub build_type: Option<String>,

    /// `CMAKE_CONFIGURATION_TYPES`; more than one entry signals a
    /// multi-configuration generator.
    pub configuration_types: Vec<String>,

    /// `CMAKE_GENERATOR`.
    pub generator: Option<String>,
}

impl CmakeCacheInfo {
    /// Read a CMake cache file. A missing file yields an empty result, not
    /// an error; only an unreadable existing file fails.
    pub fn read(cache_file: &Path) -> io::Result<Self> {
        if !cache_file.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(cache_file)?;
        Ok(Self::parse(&content))
    }

    /// Parse cache-line syntax: `KEY:TYPE=VALUE`, with `#` and `//` comment
    /// lines. Unrecognized keys are ignored.
    fn parse(content: &str) -> Self {
        let mut info = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            let Some((key_part, value)) = line.split_once('=') else {
                continue;
            };
            let key = key_part.split(':').next().unwrap_or(key_part);
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key {
                "CMAKE_CXX_COMPILER" => info.cxx_compiler = Some(PathBuf::from(value)),
                "CMAKE_BUILD_TYPE" => info.build_type = Some(value.to_string()),
                "CMAKE_CONFIGURATION_TYPES" => {
                    info.configuration_types = value
                        .split(';')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "CMAKE_GENERATOR" => info.generator = Some(value.to_string()),
                _ => {}
            }
        }

        info
    }

    /// More than one configuration type means a multi-configuration
    /// generator (Visual Studio, Ninja Multi-Config, Xcode).
    pub fn is_multi_config(&self) -> bool {
        self.configuration_types.len() > 1
    }
}
