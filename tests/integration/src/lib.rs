//! Fixtures for the realm integration tests.
//!
//! Each [`TestEnv`] owns a temporary directory that stands in for the
//! application's resource root.

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use idr_crypto::{default_provider, user_realm_digest, DigestAlgorithm, ProviderHandle};
use idr_realm::{FileSystemResolver, ResourceResolver};
use tempfile::TempDir;

/// Installs a test subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("idr_realm=debug,idr::audit=info")
        .with_test_writer()
        .try_init();
}

/// A temporary resource root.
pub struct TestEnv {
    dir: TempDir,
    /// Digest provider handed to realms under test.
    pub provider: ProviderHandle,
}

impl TestEnv {
    /// Creates an empty resource root.
    pub fn new() -> anyhow::Result<Self> {
        init_tracing();
        Ok(Self {
            dir: tempfile::tempdir()?,
            provider: default_provider(),
        })
    }

    /// Returns the root directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a resource below the root, creating parent directories.
    pub fn write(&self, name: &str, content: impl AsRef<[u8]>) -> anyhow::Result<PathBuf> {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        tracing::debug!(path = %path.display(), "fixture written");
        Ok(path)
    }

    /// Returns a resolver rooted at the temporary directory.
    pub fn resolver(&self) -> FileSystemResolver {
        FileSystemResolver::new(self.dir.path())
    }

    /// Returns the resolver as a shared handle.
    pub fn shared_resolver(&self) -> Arc<dyn ResourceResolver> {
        Arc::new(self.resolver())
    }
}

/// Formats a tagged users-file digest value for `user` in `realm`.
pub fn digest_value(algorithm: DigestAlgorithm, user: &str, realm: &str, password: &str) -> String {
    format!(
        "{}:{}",
        algorithm,
        hex::encode(user_realm_digest(algorithm, user, realm, password))
    )
}
