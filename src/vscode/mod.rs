//! VS Code integration: the `c_cpp_properties.json` document and the CMake
//! Tools extension check.

pub mod extension;
pub mod properties;

pub use extension::ensure_cmake_tools;
pub use properties::{ConfigurationEntry, CppProperties, SyncOutcome, write_document};
