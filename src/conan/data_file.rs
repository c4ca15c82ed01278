//! Parsing of a single Conan `*-data.cmake` file.

use std::fs;
use std::io;
use std::path::Path;

use crate::conan::statement::{FieldKind, classify, parse_statements};

/// Package information extracted from one Conan data file.
///
/// One file describes one dependency for one (build type, architecture)
/// combination. Values are kept in declaration order here; deduplication
/// and sorting happen at the aggregation level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageData {
    pub include_dirs: Vec<String>,
    pub defines: Vec<String>,
    pub framework_dirs: Vec<String>,
    pub frameworks: Vec<String>,
}

impl PackageData {
    /// Parse one Conan data file.
    ///
    /// Missing or unrecognized fields simply stay empty; only an unreadable
    /// file is an error.
    pub fn parse(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_content(&content))
    }

    fn from_content(content: &str) -> Self {
        let mut include_args: Vec<String> = Vec::new();
        let mut package_folder: Option<String> = None;
        let mut data = PackageData::default();

        for statement in parse_statements(content) {
            match classify(&statement.variable) {
                Some(FieldKind::IncludeDirs) => {
                    include_args.extend(statement.arguments);
                }
                Some(FieldKind::PackageFolder) => {
                    if package_folder.is_none() {
                        package_folder = statement.arguments.into_iter().next();
                    }
                }
                Some(FieldKind::CompileDefinitions) => {
                    for argument in &statement.arguments {
                        data.defines
                            .extend(split_list(argument).map(str::to_string));
                    }
                }
                Some(FieldKind::FrameworkDirs) => {
                    for argument in &statement.arguments {
                        data.framework_dirs
                            .extend(split_list(argument).map(str::to_string));
                    }
                }
                Some(FieldKind::Frameworks) => {
                    for argument in &statement.arguments {
                        data.frameworks
                            .extend(split_list(argument).map(str::to_string));
                    }
                }
                None => {}
            }
        }

        data.include_dirs = resolve_include_dirs(include_args, package_folder.as_deref());
        data
    }
}

/// Resolve include-directory declarations against the package folder.
///
/// Three shapes are recognized:
/// - a direct path, used as-is;
/// - a `${<pkg>_PACKAGE_FOLDER_<X>}/suffix` template, joined with the parsed
///   package folder (templates referencing anything else are dropped);
/// - no declaration at all, in which case Conan's `<package-folder>/include`
///   convention applies.
fn resolve_include_dirs(arguments: Vec<String>, package_folder: Option<&str>) -> Vec<String> {
    let mut resolved = Vec::new();

    for argument in arguments {
        if let Some(template) = argument.strip_prefix("${") {
            let Some((variable, suffix)) = template.split_once('}') else {
                continue;
            };
            if !variable.contains("PACKAGE_FOLDER") {
                continue;
            }
            if let Some(folder) = package_folder {
                let suffix = suffix.trim_start_matches('/');
                if suffix.is_empty() {
                    resolved.push(folder.to_string());
                } else {
                    resolved.push(format!("{folder}/{suffix}"));
                }
            }
        } else if !argument.is_empty() {
            resolved.push(argument);
        }
    }

    if resolved.is_empty()
        && let Some(folder) = package_folder
    {
        resolved.push(format!("{folder}/include"));
    }

    resolved
}

/// Conan emits list values either as separate arguments or as a single
/// semicolon-joined CMake list; some fields additionally space-separate.
fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split([';', ' '])
        .map(str::trim)
        .filter(|part| !part.is_empty())
}
