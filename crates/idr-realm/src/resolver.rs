//! Resource resolution.
//!
//! The file realm does not open files itself. It asks a [`ResourceResolver`]
//! to map a logical resource name (e.g. `users.properties`) to a readable
//! stream, which keeps search paths, packaged resources and test fixtures
//! outside the realm.

use std::collections::HashMap;
use std::fmt::Debug;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A readable resource stream.
pub type ResourceStream = Box<dyn Read + Send>;

/// Maps resource names to byte streams.
pub trait ResourceResolver: Send + Sync + Debug {
    /// Resolves a resource.
    ///
    /// Returns `Ok(None)` when the resource does not exist.
    ///
    /// ## Errors
    ///
    /// Returns an I/O error when the resource exists but cannot be opened.
    fn resolve(&self, name: &str) -> io::Result<Option<ResourceStream>>;
}

impl<R: ResourceResolver + ?Sized> ResourceResolver for Arc<R> {
    fn resolve(&self, name: &str) -> io::Result<Option<ResourceStream>> {
        (**self).resolve(name)
    }
}

/// Resolves names against an ordered list of directories, like a classpath.
///
/// A leading `/` on the name is ignored, so `/users.properties` and
/// `users.properties` resolve identically. Names that would escape a root
/// through `..` are treated as not found.
#[derive(Debug, Clone, Default)]
pub struct FileSystemResolver {
    roots: Vec<PathBuf>,
}

impl FileSystemResolver {
    /// Creates a resolver with a single root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            roots: vec![root.into()],
        }
    }

    /// Adds another root, searched after the existing ones.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Returns the search roots.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn relative(name: &str) -> Option<&Path> {
        let path = Path::new(name.trim_start_matches('/'));
        let escapes = path.components().any(|c| {
            matches!(
                c,
                std::path::Component::ParentDir
                    | std::path::Component::RootDir
                    | std::path::Component::Prefix(_)
            )
        });
        (!escapes && !name.trim_start_matches('/').is_empty()).then_some(path)
    }
}

impl ResourceResolver for FileSystemResolver {
    fn resolve(&self, name: &str) -> io::Result<Option<ResourceStream>> {
        let Some(relative) = Self::relative(name) else {
            tracing::debug!(resource = name, "resource name rejected");
            return Ok(None);
        };

        for root in &self.roots {
            let candidate = root.join(relative);
            match File::open(&candidate) {
                Ok(file) => {
                    if !file.metadata()?.is_file() {
                        continue;
                    }
                    tracing::debug!(resource = name, path = %candidate.display(), "resource resolved");
                    return Ok(Some(Box::new(file)));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }
}

/// Resolves names from in-memory buffers.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    resources: HashMap<String, Arc<[u8]>>,
}

impl MemoryResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource.
    #[must_use]
    pub fn with_resource(mut self, name: impl Into<String>, content: impl AsRef<[u8]>) -> Self {
        self.insert(name, content);
        self
    }

    /// Adds or replaces a resource.
    pub fn insert(&mut self, name: impl Into<String>, content: impl AsRef<[u8]>) {
        self.resources.insert(name.into(), Arc::from(content.as_ref()));
    }
}

impl ResourceResolver for MemoryResolver {
    fn resolve(&self, name: &str) -> io::Result<Option<ResourceStream>> {
        let key = name.trim_start_matches('/');
        Ok(self
            .resources
            .get(key)
            .or_else(|| self.resources.get(name))
            .map(|bytes| Box::new(Cursor::new(Arc::clone(bytes))) as ResourceStream))
    }
}

/// Tries several resolvers in order; the first hit wins.
#[derive(Debug, Default)]
pub struct ChainResolver {
    resolvers: Vec<Box<dyn ResourceResolver>>,
}

impl ChainResolver {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resolver to the chain.
    #[must_use]
    pub fn with(mut self, resolver: impl ResourceResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }
}

impl ResourceResolver for ChainResolver {
    fn resolve(&self, name: &str) -> io::Result<Option<ResourceStream>> {
        for resolver in &self.resolvers {
            if let Some(stream) = resolver.resolve(name)? {
                return Ok(Some(stream));
            }
        }
        Ok(None)
    }
}
