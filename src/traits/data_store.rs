use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::StoreError;
use crate::odf::{ImmutableOdf, Path};

/// Storage of the current (and recent) O-DF values.
///
/// The dispatcher and agents only reach storage through this handle; the
/// store is responsible for its own synchronization.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Merge written values into storage.
    async fn write(&self, odf: &ImmutableOdf) -> Result<(), StoreError>;

    /// Subtrees at `paths`, each InfoItem limited to its `newest` values
    /// (only the latest value when `None`). Unknown paths are left out.
    async fn read(&self, paths: &[Path], newest: Option<usize>) -> Result<ImmutableOdf, StoreError>;

    /// Whole stored tree.
    async fn snapshot(&self) -> Result<ImmutableOdf, StoreError>;
}

/// Shared handle to the data store given to every agent.
pub type DbHandle = Arc<dyn DataStore>;
