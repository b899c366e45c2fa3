//! Load-merge-store cycle for one properties file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::{
        Diagnostics,
        properties::{self, PropertyStore},
        resolver::{Resolution, ResourceResolver},
    },
    issues::{StoreLoadFailureIssue, StoreWriteFailureIssue, StoreWrittenIssue},
};

/// What a merge did to the persisted store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing to merge; the store was neither read nor written.
    Skipped,
    Written {
        path: PathBuf,
        entry_count: usize,
        merged_count: usize,
    },
    /// The merged store could not be written.
    Failed,
}

pub struct PropertiesMerge<'a> {
    resolver: &'a dyn ResourceResolver,
    output_root: PathBuf,
    /// Relative resource name of the store (e.g. `META-INF/jpa-named-queries.properties`).
    store_name: String,
}

impl<'a> PropertiesMerge<'a> {
    pub fn new(
        resolver: &'a dyn ResourceResolver,
        output_root: impl Into<PathBuf>,
        store_name: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            output_root: output_root.into(),
            store_name: store_name.into(),
        }
    }

    /// Where the merged store is written.
    pub fn output_path(&self) -> PathBuf {
        self.output_root.join(&self.store_name)
    }

    /// Overlay `new_entries` on the existing store and persist the result.
    ///
    /// New values replace existing ones. An unreadable existing store is
    /// reported and treated as empty.
    pub fn merge(
        &self,
        new_entries: &PropertyStore,
        diagnostics: &mut Diagnostics,
    ) -> MergeOutcome {
        if new_entries.is_empty() {
            return MergeOutcome::Skipped;
        }

        let mut working = self.load_existing(diagnostics);
        working.extend(
            new_entries
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        self.persist(&working, new_entries.len(), diagnostics)
    }

    fn load_existing(&self, diagnostics: &mut Diagnostics) -> PropertyStore {
        let cause = match self.resolver.resolve(&self.store_name) {
            Resolution::NotFound => return PropertyStore::new(),
            Resolution::Found(content) => match properties::load(&content) {
                Ok(existing) => return existing,
                Err(e) => format!("{:#}", e),
            },
            Resolution::ReadFailure(cause) => cause,
        };

        diagnostics.record(StoreLoadFailureIssue {
            path: self.store_name.clone(),
            cause,
        });
        PropertyStore::new()
    }

    fn persist(
        &self,
        store: &PropertyStore,
        merged_count: usize,
        diagnostics: &mut Diagnostics,
    ) -> MergeOutcome {
        let path = self.output_path();

        match write_store(&path, store) {
            Ok(()) => {
                diagnostics.record(StoreWrittenIssue {
                    path: path.display().to_string(),
                    entry_count: store.len(),
                    merged_count,
                });
                MergeOutcome::Written {
                    path,
                    entry_count: store.len(),
                    merged_count,
                }
            }
            Err(e) => {
                diagnostics.record(StoreWriteFailureIssue {
                    path: self.store_name.clone(),
                    cause: format!("{}: {}", path.display(), e),
                });
                MergeOutcome::Failed
            }
        }
    }
}

fn write_store(path: &Path, store: &PropertyStore) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, properties::store(store))
}
