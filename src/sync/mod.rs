//! The change-detection and synthesis pipeline.
//!
//! Ties discovery, the CMake cache reader, the Conan metadata parser and the
//! compiler detector together: per (build directory, build type) pair it
//! decides reuse-vs-regenerate from a persisted content hash, synthesizes a
//! configuration entry and finally writes the merged document only when at
//! least one pair changed.

pub mod error;
pub mod hash_store;
pub mod synthesizer;

pub use error::SyncError;
pub use hash_store::HashStore;
pub use synthesizer::ConfigSynthesizer;
