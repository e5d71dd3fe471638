//! Thin client over the JFrog Platform (Artifactory/Xray) REST API.
//!
//! Queries platform health, licenses, storage, users, and tokens, manages
//! support bundles, and performs best-effort migration of repository
//! configuration and permission targets between two instances. Every
//! operation takes an explicit [`instance::Instance`] context; nothing is
//! cached locally and nothing is retried.

pub mod access;
pub mod error;
pub mod instance;
pub mod models;
pub mod repository;
pub mod support;
pub mod sync;
pub mod system;
pub mod transfer;
pub mod version;

pub use error::{ClientError, Result};
pub use instance::Instance;
pub use models::RepositoryType;
pub use sync::{RepoDiff, SyncReport};
pub use version::{Capabilities, Capability};
