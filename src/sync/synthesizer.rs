//! Change detection and configuration synthesis.
//!
//! For every discovered build directory and every build type it exposes,
//! this module hashes the matching Conan data files, compares against the
//! stored record, assembles a configuration entry and finally writes the
//! merged document when anything changed.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::compiler;
use crate::conan::ConanMetadata;
use crate::project::{BuildDirectory, CmakeCacheInfo};
use crate::sync::hash_store::{HashStore, hash_metadata_files};
use crate::sync::SyncError;
use crate::vscode::{ConfigurationEntry, SyncOutcome, write_document};

/// Synthesizes IntelliSense configurations for one workspace.
pub struct ConfigSynthesizer {
    vscode_dir: PathBuf,
    hash_store: HashStore,
}

impl ConfigSynthesizer {
    /// Create a synthesizer rooted at the workspace, creating the `.vscode`
    /// directory if needed.
    pub fn new(workspace_root: &Path) -> Result<Self, SyncError> {
        let vscode_dir = workspace_root.join(".vscode");
        fs::create_dir_all(&vscode_dir)?;

        Ok(Self {
            hash_store: HashStore::new(&vscode_dir),
            vscode_dir,
        })
    }

    pub fn vscode_dir(&self) -> &Path {
        &self.vscode_dir
    }

    /// Process every build directory sequentially and persist the merged
    /// document if at least one pair changed.
    pub fn run(&self, build_dirs: &[BuildDirectory]) -> Result<SyncOutcome, SyncError> {
        let mut configurations = Vec::new();
        let mut has_changes = false;

        for build_dir in build_dirs {
            let (entries, changed) = self.process_build_directory(build_dir)?;
            configurations.extend(entries);
            has_changes |= changed;
        }

        write_document(&self.vscode_dir, configurations, has_changes)
    }

    /// Synthesize entries for one build directory, fanning out over all
    /// configuration types of a multi-config generator.
    fn process_build_directory(
        &self,
        build_dir: &BuildDirectory,
    ) -> Result<(Vec<ConfigurationEntry>, bool), SyncError> {
        let cache = CmakeCacheInfo::read(&build_dir.cache_file())?;
        debug!(
            "Preset {}: generator {}, multi-config: {}",
            build_dir.preset,
            cache.generator.as_deref().unwrap_or("unknown"),
            cache.is_multi_config()
        );

        let build_types: Vec<String> = if cache.is_multi_config() {
            cache.configuration_types.clone()
        } else {
            vec![
                cache
                    .build_type
                    .clone()
                    .unwrap_or_else(|| "Debug".to_string()),
            ]
        };

        let mut entries = Vec::new();
        let mut has_changes = false;
        let mut valid_build_types = BTreeSet::new();

        for build_type in &build_types {
            if build_type.is_empty() {
                continue;
            }
            valid_build_types.insert(build_type.clone());

            if let Some((entry, changed)) = self.create_entry(build_dir, build_type, &cache)? {
                entries.push(entry);
                has_changes |= changed;
            }
        }

        // A removed record means the previous document still lists a build
        // type that no longer exists, so it must be rewritten.
        if self
            .hash_store
            .remove_orphans(&build_dir.preset, &valid_build_types)
            > 0
        {
            has_changes = true;
        }

        Ok((entries, has_changes))
    }

    /// Build one configuration entry and decide whether its pair changed.
    ///
    /// The stored hash only gates the document rewrite; metadata is always
    /// parsed fresh so the returned entry reflects current state.
    fn create_entry(
        &self,
        build_dir: &BuildDirectory,
        build_type: &str,
        cache: &CmakeCacheInfo,
    ) -> Result<Option<(ConfigurationEntry, bool)>, SyncError> {
        let generators_dir = build_dir.path.join("generators");
        if !generators_dir.is_dir() {
            // Not yet configured by Conan; nothing to synthesize.
            debug!(
                "Skipping {} ({}): no generators directory",
                build_dir.preset, build_type
            );
            return Ok(None);
        }

        let digest = hash_metadata_files(&generators_dir, build_type)?;
        let changed =
            self.hash_store.load(&build_dir.preset, build_type).as_deref() != Some(digest.as_str());

        let metadata = ConanMetadata::scan_generators_dir(&generators_dir, build_type);
        let compiler = compiler::detect();
        let compiler_path = cache.cxx_compiler.clone().or_else(|| compiler.path.clone());

        let entry = ConfigurationEntry::new(
            &build_dir.preset,
            build_type,
            &metadata,
            compiler_path,
            &compiler,
        );

        if changed {
            self.hash_store
                .store(&build_dir.preset, build_type, &digest)?;
            info!("Detected changes for {}-{}", build_dir.preset, build_type);
        }

        Ok(Some((entry, changed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::discover_build_directories;
    use crate::vscode::CppProperties;
    use tempfile::TempDir;

    // Auto-initialize logging for all tests in this module
    #[cfg(feature = "test-logging")]
    #[ctor::ctor]
    fn init_test_logging() {
        crate::test_utils::logging::init();
    }

    struct Fixture {
        workspace: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                workspace: TempDir::new().unwrap(),
            }
        }

        fn root(&self) -> &Path {
            self.workspace.path()
        }

        fn add_build_dir(&self, preset: &str, cache_content: &str) -> PathBuf {
            let build_dir = self.root().join("build").join(preset).join("build");
            fs::create_dir_all(build_dir.join("generators")).unwrap();
            fs::write(build_dir.join("CMakeCache.txt"), cache_content).unwrap();
            build_dir
        }

        fn add_data_file(&self, preset: &str, file_name: &str, content: &str) {
            let generators = self
                .root()
                .join("build")
                .join(preset)
                .join("build")
                .join("generators");
            fs::write(generators.join(file_name), content).unwrap();
        }

        fn run(&self) -> SyncOutcome {
            let build_dirs = discover_build_directories(self.root());
            let synthesizer = ConfigSynthesizer::new(self.root()).unwrap();
            synthesizer.run(&build_dirs).unwrap()
        }

        fn document(&self) -> CppProperties {
            let path = self.root().join(".vscode").join("c_cpp_properties.json");
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
        }

        fn document_bytes(&self) -> Vec<u8> {
            fs::read(self.root().join(".vscode").join("c_cpp_properties.json")).unwrap()
        }
    }

    #[test]
    fn end_to_end_single_configuration() {
        let fixture = Fixture::new();
        fixture.add_build_dir("myPreset", "CMAKE_BUILD_TYPE:STRING=Debug\n");
        fixture.add_data_file(
            "myPreset",
            "zlib-debug-x86_64-data.cmake",
            "set(ZLIB_INCLUDE_DIRS_DEBUG \"/pkg/zlib/include\")\n",
        );

        let outcome = fixture.run();
        assert_eq!(outcome, SyncOutcome::Updated { entries: 1 });

        let document = fixture.document();
        assert_eq!(document.version, 4);
        let entry = &document.configurations[0];
        assert_eq!(entry.name, "myPreset-Debug");
        assert!(entry.include_path.contains(&"/pkg/zlib/include".to_string()));
        assert!(entry.defines.contains(&"_DEBUG".to_string()));
    }

    #[test]
    fn second_run_without_changes_is_a_no_op() {
        let fixture = Fixture::new();
        fixture.add_build_dir("myPreset", "CMAKE_BUILD_TYPE:STRING=Debug\n");
        fixture.add_data_file(
            "myPreset",
            "zlib-debug-x86_64-data.cmake",
            "set(ZLIB_INCLUDE_DIRS_DEBUG \"/pkg/zlib/include\")\n",
        );

        assert_eq!(fixture.run(), SyncOutcome::Updated { entries: 1 });
        let before = fixture.document_bytes();

        assert_eq!(fixture.run(), SyncOutcome::Unchanged);
        assert_eq!(fixture.document_bytes(), before);
    }

    #[test]
    fn mutating_an_active_data_file_triggers_a_rewrite() {
        let fixture = Fixture::new();
        fixture.add_build_dir("myPreset", "CMAKE_BUILD_TYPE:STRING=Debug\n");
        fixture.add_data_file(
            "myPreset",
            "zlib-debug-x86_64-data.cmake",
            "set(ZLIB_INCLUDE_DIRS_DEBUG \"/pkg/zlib/include\")\n",
        );
        fixture.run();

        fixture.add_data_file(
            "myPreset",
            "zlib-debug-x86_64-data.cmake",
            "set(ZLIB_INCLUDE_DIRS_DEBUG \"/pkg/zlib/2.0/include\")\n",
        );

        assert_eq!(fixture.run(), SyncOutcome::Updated { entries: 1 });
        let entry = &fixture.document().configurations[0];
        assert!(
            entry
                .include_path
                .contains(&"/pkg/zlib/2.0/include".to_string())
        );
    }

    #[test]
    fn mutating_an_inactive_build_type_does_not_disturb_the_pair() {
        let fixture = Fixture::new();
        fixture.add_build_dir("myPreset", "CMAKE_BUILD_TYPE:STRING=Debug\n");
        fixture.add_data_file(
            "myPreset",
            "zlib-debug-x86_64-data.cmake",
            "set(ZLIB_INCLUDE_DIRS_DEBUG \"/pkg/zlib/include\")\n",
        );
        fixture.run();

        // A Release data file appears, but Debug is the only active type.
        fixture.add_data_file(
            "myPreset",
            "zlib-release-x86_64-data.cmake",
            "set(ZLIB_INCLUDE_DIRS_RELEASE \"/pkg/zlib/include\")\n",
        );

        assert_eq!(fixture.run(), SyncOutcome::Unchanged);
    }

    #[test]
    fn multi_config_generator_fans_out_per_type() {
        let fixture = Fixture::new();
        fixture.add_build_dir(
            "myPreset",
            "CMAKE_CONFIGURATION_TYPES:STRING=Debug;Release\n",
        );

        let outcome = fixture.run();
        assert_eq!(outcome, SyncOutcome::Updated { entries: 2 });

        let names: Vec<_> = fixture
            .document()
            .configurations
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["myPreset-Debug", "myPreset-Release"]);
    }

    #[test]
    fn shrinking_build_types_removes_orphan_and_rewrites() {
        let fixture = Fixture::new();
        let build_dir = fixture.add_build_dir(
            "myPreset",
            "CMAKE_CONFIGURATION_TYPES:STRING=Debug;Release\n",
        );
        assert_eq!(fixture.run(), SyncOutcome::Updated { entries: 2 });

        let release_record = fixture
            .root()
            .join(".vscode")
            .join(".conan_hash_myPreset_Release");
        assert!(release_record.exists());

        // The generator shrinks to a single Debug configuration.
        fs::write(
            build_dir.join("CMakeCache.txt"),
            "CMAKE_BUILD_TYPE:STRING=Debug\n",
        )
        .unwrap();

        assert_eq!(fixture.run(), SyncOutcome::Updated { entries: 1 });
        assert!(!release_record.exists());

        let names: Vec<_> = fixture
            .document()
            .configurations
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["myPreset-Debug"]);
    }

    #[test]
    fn build_type_defaults_to_debug() {
        let fixture = Fixture::new();
        fixture.add_build_dir("myPreset", "CMAKE_GENERATOR:INTERNAL=Ninja\n");

        assert_eq!(fixture.run(), SyncOutcome::Updated { entries: 1 });
        assert_eq!(fixture.document().configurations[0].name, "myPreset-Debug");
    }

    #[test]
    fn build_dir_without_generators_is_skipped() {
        let fixture = Fixture::new();
        let build_dir = fixture.add_build_dir("myPreset", "CMAKE_BUILD_TYPE:STRING=Debug\n");
        fs::remove_dir(build_dir.join("generators")).unwrap();

        assert_eq!(fixture.run(), SyncOutcome::NoConfigurations);
        assert!(
            !fixture
                .root()
                .join(".vscode")
                .join("c_cpp_properties.json")
                .exists()
        );
    }

    #[test]
    fn entries_merge_across_build_directories() {
        let fixture = Fixture::new();
        fixture.add_build_dir("alpha", "CMAKE_BUILD_TYPE:STRING=Debug\n");
        fixture.add_build_dir("beta", "CMAKE_BUILD_TYPE:STRING=Release\n");

        assert_eq!(fixture.run(), SyncOutcome::Updated { entries: 2 });

        let names: Vec<_> = fixture
            .document()
            .configurations
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["alpha-Debug", "beta-Release"]);
    }

    #[test]
    fn cache_compiler_takes_precedence_over_probe() {
        let fixture = Fixture::new();
        fixture.add_build_dir(
            "myPreset",
            "CMAKE_BUILD_TYPE:STRING=Debug\nCMAKE_CXX_COMPILER:FILEPATH=/opt/custom/bin/g++\n",
        );

        fixture.run();
        assert_eq!(
            fixture.document().configurations[0].compiler_path,
            "/opt/custom/bin/g++"
        );
    }
}
