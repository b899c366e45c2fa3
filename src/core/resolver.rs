//! Resource resolution against an ordered set of root directories.
//!
//! A resource is addressed by a relative `/`-separated name, the same way a
//! classpath resource is. Existence comes from file metadata; content is only
//! read once a resource is known to exist, so a read error is distinguishable
//! from a missing resource.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Outcome of resolving one resource name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Resource exists; full UTF-8 content.
    Found(String),
    NotFound,
    /// Resource exists but could not be read. Holds the cause.
    ReadFailure(String),
}

/// Lookup seam used by the extraction policy and the merge engine.
pub trait ResourceResolver {
    /// Resolve a non-blank name.
    fn lookup(&self, name: &str) -> Resolution;

    /// Resolve a name; blank names are never looked up.
    fn resolve(&self, name: &str) -> Resolution {
        if is_blank(name) {
            return Resolution::NotFound;
        }
        self.lookup(name)
    }
}

/// Empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Filesystem namespace: the first root holding a regular file wins.
#[derive(Debug, Clone)]
pub struct ResourceNamespace {
    roots: Vec<PathBuf>,
}

impl ResourceNamespace {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Path of an existing resource, decided by metadata alone.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let relative = relative_resource_path(name)?;
        self.roots
            .iter()
            .map(|root| root.join(&relative))
            .find(|path| fs::metadata(path).map(|m| m.is_file()).unwrap_or(false))
    }
}

impl ResourceResolver for ResourceNamespace {
    fn lookup(&self, name: &str) -> Resolution {
        match self.locate(name) {
            Some(path) => read_utf8(&path),
            None => Resolution::NotFound,
        }
    }
}

fn read_utf8(path: &Path) -> Resolution {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return Resolution::ReadFailure(e.to_string()),
    };
    match String::from_utf8(bytes) {
        Ok(content) => Resolution::Found(content),
        Err(e) => Resolution::ReadFailure(format!("invalid UTF-8: {}", e.utf8_error())),
    }
}

/// Convert a resource name into a path that stays inside a root.
///
/// Absolute names and names climbing out with `..` are rejected.
fn relative_resource_path(name: &str) -> Option<PathBuf> {
    let mut path = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

/// In-memory namespace for pipeline tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryNamespace {
    resources: std::collections::HashMap<String, Result<String, String>>,
    pub lookups: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl MemoryNamespace {
    pub fn with(mut self, name: &str, content: &str) -> Self {
        self.resources
            .insert(name.to_string(), Ok(content.to_string()));
        self
    }

    pub fn with_failure(mut self, name: &str, cause: &str) -> Self {
        self.resources
            .insert(name.to_string(), Err(cause.to_string()));
        self
    }
}

#[cfg(test)]
impl ResourceResolver for MemoryNamespace {
    fn lookup(&self, name: &str) -> Resolution {
        self.lookups.borrow_mut().push(name.to_string());
        match self.resources.get(name) {
            Some(Ok(content)) => Resolution::Found(content.clone()),
            Some(Err(cause)) => Resolution::ReadFailure(cause.clone()),
            None => Resolution::NotFound,
        }
    }
}
