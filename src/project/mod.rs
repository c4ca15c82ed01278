//! Build directory discovery and CMake cache parsing
//!
//! This module finds Conan-layout build directories (`build/<preset>/build/`)
//! under a workspace root and extracts build configuration from their
//! `CMakeCache.txt` files.

pub mod cmake_cache;
pub mod discovery;

pub use cmake_cache::CmakeCacheInfo;
pub use discovery::{BuildDirectory, discover_build_directories};
