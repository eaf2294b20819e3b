//! Infrastructure layer for Listcraft.
//!
//! On-disk configuration and the in-process backend used by the CLI.

pub mod config_service;
pub mod memory;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use memory::InMemoryBackend;
pub use paths::ListcraftPaths;
