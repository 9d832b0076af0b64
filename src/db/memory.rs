//! In-process document store used in offline mode and tests.
//!
//! Documents are kept as JSON values so reads go through the same
//! deserialize-and-validate path as Firestore documents.

use crate::db::{Filter, Record};
use crate::error::AppError;
use chrono::Utc;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::mpsc;

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// Memory-backed collections with change notification.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
    watchers: Arc<Mutex<Vec<(String, mpsc::Sender<()>)>>>,
}

fn poisoned<E>(_: E) -> AppError {
    AppError::Database("memory store lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Record>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError> {
        let collections = self.collections.read().map_err(poisoned)?;
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|value| decode(collection, id, value))
            .transpose()
            .map(Option::flatten)
    }

    pub fn query<T: Record>(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<(String, T)>, AppError> {
        let collections = self.collections.read().map_err(poisoned)?;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        for (id, value) in docs {
            let keep = match filter {
                Filter::All => true,
                Filter::FieldEq { field, value: expected } => {
                    value.get(*field).and_then(Value::as_str) == Some(expected.as_str())
                }
            };
            if keep {
                if let Some(data) = decode(collection, id, value)? {
                    out.push((id.clone(), data));
                }
            }
        }
        Ok(out)
    }

    /// Store `data` under `id`. Fields listed in `stamped` are set to the
    /// current time, mirroring Firestore's request-time transform.
    pub fn set<T: Record>(
        &self,
        collection: &str,
        id: &str,
        data: &T,
        stamped: &[&str],
    ) -> Result<(), AppError> {
        let mut value =
            serde_json::to_value(data).map_err(|e| AppError::Database(e.to_string()))?;
        if !stamped.is_empty() {
            let now = serde_json::to_value(Utc::now())
                .map_err(|e| AppError::Database(e.to_string()))?;
            if let Value::Object(fields) = &mut value {
                for field in stamped {
                    fields.insert(field.to_string(), now.clone());
                }
            }
        }
        self.collections
            .write()
            .map_err(poisoned)?
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), value);
        self.notify(collection);
        Ok(())
    }

    pub fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        let removed = self
            .collections
            .write()
            .map_err(poisoned)?
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some();
        if removed {
            self.notify(collection);
        }
        Ok(())
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    /// Channel that receives a message after each write to `collection`.
    pub fn watch(&self, collection: &str) -> mpsc::Receiver<()> {
        let (tx, rx) = mpsc::channel(1);
        if let Ok(mut watchers) = self.watchers.lock() {
            watchers.push((collection.to_string(), tx));
        }
        rx
    }

    fn notify(&self, collection: &str) {
        let Ok(mut watchers) = self.watchers.lock() else {
            return;
        };
        watchers.retain(|(name, tx)| {
            if name == collection {
                // A full channel already has a refresh pending.
                !matches!(tx.try_send(()), Err(mpsc::error::TrySendError::Closed(_)))
            } else {
                !tx.is_closed()
            }
        });
    }
}

/// Decode a stored value; undecodable documents are skipped like invalid ones.
fn decode<T: Record>(collection: &str, id: &str, value: &Value) -> Result<Option<T>, AppError> {
    match serde_json::from_value(value.clone()) {
        Ok(data) => Ok(Some(data)),
        Err(e) => {
            tracing::warn!(collection, id, error = %e, "Skipping undecodable document");
            Ok(None)
        }
    }
}
