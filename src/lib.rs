//! Build a local article cache from Wikimedia Enterprise snapshots.
//!
//! The library drives a strictly sequential pipeline: authenticate against
//! the Enterprise API, discover the namespace snapshots of a project, stream
//! each chunk down as a tar archive, and materialize every complete article
//! as a pretty-printed JSON file under a title-sharded cache tree.

pub mod config;
pub mod credentials;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod processor;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, ConfigBuilder};
pub use credentials::{Credentials, PasswordSource};
pub use discovery::{Namespace, NamespaceSnapshot};
pub use error::{Error, Result};
pub use ingest::Ingestor;
pub use processor::{SnapshotProcessor, Stats};
pub use session::Session;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{Config, ConfigBuilder};
    pub use crate::credentials::Credentials;
    pub use crate::error::{Error, Result};
    pub use crate::processor::{SnapshotProcessor, Stats};
    pub use crate::session::Session;
}
