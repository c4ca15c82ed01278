//! Conan package metadata extraction
//!
//! Conan's CMakeDeps generator writes one `<pkg>-<buildtype>-<arch>-data.cmake`
//! file per dependency into the build directory's `generators/` folder. This
//! module parses those files and aggregates include directories, preprocessor
//! defines and (on macOS) framework information per build type.

pub mod data_file;
pub mod metadata;
pub mod statement;

pub use data_file::PackageData;
pub use metadata::{ConanMetadata, is_data_file_for};
