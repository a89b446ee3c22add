// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::consts::DEFAULT_HISTORY_LENGTH;
use crate::errors::StoreError;
use crate::observability::messages::odf::HistoryTrimmed;
use crate::observability::messages::StructuredLog;
use crate::odf::{ImmutableOdf, InfoItem, MutableOdf, Node, Path};
use crate::traits::{DataStore, Odf};

/// Process-local data store keeping a bounded value history per InfoItem.
///
/// Writes merge into a [`MutableOdf`] under a single-writer lock and then
/// drop the oldest values beyond `history_length`. Reads take a read lock and
/// hand out an [`ImmutableOdf`] copy, so callers never hold the lock.
#[derive(Debug)]
pub struct InMemoryStore {
    tree: RwLock<MutableOdf>,
    history_length: usize,
}

impl InMemoryStore {
    pub fn new(history_length: usize) -> Self {
        Self {
            tree: RwLock::new(MutableOdf::empty()),
            history_length: history_length.max(1),
        }
    }

    pub fn history_length(&self) -> usize {
        self.history_length
    }

    fn trim(&self, tree: &mut MutableOdf, written: &[&InfoItem]) {
        for item in written {
            let path = item.path();
            let limit = self.history_length;
            let mut dropped = 0;
            tree.modify(path, |node| match node.as_info_item() {
                Some(stored) if stored.values().len() > limit => {
                    dropped = stored.values().len() - limit;
                    Node::from(stored.newest(limit))
                }
                _ => node.clone(),
            });
            if dropped > 0 {
                HistoryTrimmed {
                    path: &path.to_string(),
                    dropped,
                    kept: limit,
                }
                .log();
            }
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LENGTH)
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn write(&self, odf: &ImmutableOdf) -> Result<(), StoreError> {
        let mut tree = self.tree.write().await;
        tree.union_in_place(odf)?;
        self.trim(&mut tree, &odf.info_items());
        Ok(())
    }

    async fn read(
        &self,
        paths: &[Path],
        newest: Option<usize>,
    ) -> Result<ImmutableOdf, StoreError> {
        let tree = self.tree.read().await;
        let known: Vec<Path> = paths.iter().filter(|p| tree.contains(p)).cloned().collect();
        if known.is_empty() {
            return Ok(ImmutableOdf::empty());
        }

        let count = newest.unwrap_or(1);
        let limited: Vec<Node> = tree
            .select_subtree(&known)
            .nodes()
            .into_iter()
            .map(|node| match node.as_info_item() {
                Some(item) => Node::from(item.newest(count)),
                None => node.clone(),
            })
            .collect();
        Ok(ImmutableOdf::from_nodes(limited)?)
    }

    async fn snapshot(&self) -> Result<ImmutableOdf, StoreError> {
        Ok(self.tree.read().await.to_immutable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::{OdfValue, Value};
    use chrono::{TimeZone, Utc};

    fn sample(path: &str, readings: &[(i64, f64)]) -> ImmutableOdf {
        let values = readings
            .iter()
            .map(|(secs, v)| Value::new(OdfValue::Double(*v), Utc.timestamp_opt(*secs, 0).unwrap()))
            .collect();
        let item = InfoItem::new(path.parse().unwrap()).unwrap().with_values(values);
        ImmutableOdf::from_nodes(vec![Node::from(item)]).unwrap()
    }

    fn values_at(odf: &ImmutableOdf, path: &str) -> Vec<f64> {
        odf.get(&path.parse().unwrap())
            .and_then(Node::as_info_item)
            .map(|i| i.values().iter().filter_map(Value::as_f64).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_write_then_read_latest() {
        let store = InMemoryStore::new(10);
        store.write(&sample("Objects/House/temp", &[(1, 20.0)])).await.unwrap();
        store.write(&sample("Objects/House/temp", &[(2, 21.0)])).await.unwrap();

        let latest = store.read(&["Objects/House/temp".parse().unwrap()], None).await.unwrap();
        assert_eq!(values_at(&latest, "Objects/House/temp"), vec![21.0]);

        let both = store.read(&["Objects/House".parse().unwrap()], Some(5)).await.unwrap();
        assert_eq!(values_at(&both, "Objects/House/temp"), vec![20.0, 21.0]);
    }

    #[tokio::test]
    async fn test_history_is_trimmed_to_length() {
        let store = InMemoryStore::new(2);
        store
            .write(&sample("Objects/Meter/kwh", &[(1, 1.0), (2, 2.0), (3, 3.0)]))
            .await
            .unwrap();
        store.write(&sample("Objects/Meter/kwh", &[(4, 4.0)])).await.unwrap();

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(values_at(&snapshot, "Objects/Meter/kwh"), vec![3.0, 4.0]);
    }

    #[tokio::test]
    async fn test_unknown_paths_are_left_out() {
        let store = InMemoryStore::default();
        store.write(&sample("Objects/House/temp", &[(1, 20.0)])).await.unwrap();

        let result = store
            .read(&["Objects/Garage/door".parse().unwrap()], None)
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_kind_conflict_leaves_store_untouched() {
        let store = InMemoryStore::default();
        store.write(&sample("Objects/House/temp", &[(1, 20.0)])).await.unwrap();

        let clash = sample("Objects/House", &[(2, 1.0)]);
        assert!(matches!(store.write(&clash).await, Err(StoreError::Odf(_))));

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(values_at(&snapshot, "Objects/House/temp"), vec![20.0]);
    }
}
