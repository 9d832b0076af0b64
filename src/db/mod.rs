//! Document store layer.
//!
//! `DocumentStore` is the process-wide handle to the notes, tasks and todos
//! collections. It dispatches to Firestore in production and to an in-memory
//! store in offline mode and tests. Records are validated on every read.

pub mod firestore;
pub mod memory;
pub mod subscription;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;
pub use subscription::Subscription;

use crate::error::AppError;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

/// Collection names as constants.
pub mod collections {
    pub const NOTES: &str = "notes";
    pub const TASKS: &str = "tasks";
    pub const TODOS: &str = "todos";
}

/// Bounds every stored record type satisfies.
pub trait Record: Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static {}

impl<T> Record for T where T: Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static
{}

/// A record with the id of the document holding it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document<T> {
    pub id: String,
    #[serde(flatten)]
    pub data: T,
}

/// Query restriction. Only equality on a single field is supported.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    FieldEq { field: &'static str, value: String },
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<String>) -> Self {
        Filter::FieldEq {
            field,
            value: value.into(),
        }
    }
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreDb),
    Memory(MemoryStore),
}

/// Handle to the hosted document store.
#[derive(Clone)]
pub struct DocumentStore {
    backend: Backend,
}

impl DocumentStore {
    /// Connect to Firestore for `project_id`.
    pub async fn connect(project_id: &str) -> Result<Self, AppError> {
        Ok(Self {
            backend: Backend::Firestore(FirestoreDb::new(project_id).await?),
        })
    }

    /// Store kept entirely in process memory.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::new()),
        }
    }

    /// Firestore handle with no connection; every operation fails.
    #[cfg(test)]
    pub(crate) fn disconnected() -> Self {
        Self {
            backend: Backend::Firestore(FirestoreDb::new_mock()),
        }
    }

    /// Load one document. Missing and invalid documents both yield `None`.
    pub async fn get<T: Record>(
        &self,
        collection: &'static str,
        id: &str,
    ) -> Result<Option<Document<T>>, AppError> {
        let data: Option<T> = match &self.backend {
            Backend::Firestore(db) => db.get(collection, id).await?,
            Backend::Memory(mem) => mem.get(collection, id)?,
        };

        Ok(data
            .and_then(|data| validated(collection, id, data))
            .map(|data| Document {
                id: id.to_string(),
                data,
            }))
    }

    /// Run a query. Documents that fail validation are dropped from the result.
    pub async fn query<T: Record>(
        &self,
        collection: &'static str,
        filter: &Filter,
    ) -> Result<Vec<Document<T>>, AppError> {
        let raw: Vec<(String, T)> = match &self.backend {
            Backend::Firestore(db) => db.query(collection, filter).await?,
            Backend::Memory(mem) => mem.query(collection, filter)?,
        };

        Ok(raw
            .into_iter()
            .filter_map(|(id, data)| {
                validated(collection, &id, data).map(|data| Document { id, data })
            })
            .collect())
    }

    /// Store a new document under a fresh id and return the id.
    pub async fn create<T: Record>(
        &self,
        collection: &'static str,
        data: &T,
    ) -> Result<String, AppError> {
        self.create_stamped(collection, data, &[]).await
    }

    /// Store a new document, with each field in `stamped` set to the store's
    /// own clock at write time.
    pub async fn create_stamped<T: Record>(
        &self,
        collection: &'static str,
        data: &T,
        stamped: &[&'static str],
    ) -> Result<String, AppError> {
        let id = new_document_id()?;
        self.replace_stamped(collection, &id, data, stamped).await?;
        tracing::debug!(collection, id = %id, "Document created");
        Ok(id)
    }

    /// Overwrite a whole document (no field merge, last write wins).
    pub async fn replace<T: Record>(
        &self,
        collection: &'static str,
        id: &str,
        data: &T,
    ) -> Result<(), AppError> {
        self.replace_stamped(collection, id, data, &[]).await
    }

    /// Overwrite a whole document. Fields named in `stamped` take the
    /// store's write time in place of whatever `data` carries.
    pub async fn replace_stamped<T: Record>(
        &self,
        collection: &'static str,
        id: &str,
        data: &T,
        stamped: &[&'static str],
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.set(collection, id, data, stamped).await,
            Backend::Memory(mem) => mem.set(collection, id, data, stamped),
        }
    }

    /// Delete one document by id. Deleting a missing document is not an error.
    pub async fn delete(&self, collection: &'static str, id: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.delete(collection, id).await,
            Backend::Memory(mem) => mem.delete(collection, id),
        }
    }

    /// Live query: the returned handle yields a full snapshot now and after
    /// every change to the collection, until it is closed or dropped.
    pub async fn subscribe<T: Record>(
        &self,
        collection: &'static str,
        filter: Filter,
    ) -> Result<Subscription<T>, AppError> {
        let store = self.clone();
        let fetch_filter = filter.clone();
        let fetch = move || {
            let store = store.clone();
            let filter = fetch_filter.clone();
            async move { store.query::<T>(collection, &filter).await }
        };

        match &self.backend {
            Backend::Firestore(db) => db.listen(collection, &filter, fetch).await,
            Backend::Memory(mem) => {
                let changes = mem.watch(collection);
                Ok(Subscription::spawn(collection, changes, fetch, async {}))
            }
        }
    }
}

fn validated<T: Record>(collection: &str, id: &str, data: T) -> Option<T> {
    match data.validate() {
        Ok(()) => Some(data),
        Err(errors) => {
            tracing::warn!(collection, id, error = %errors, "Skipping invalid document");
            None
        }
    }
}

const AUTO_ID_LEN: usize = 20;
const AUTO_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a 20-character alphanumeric document id.
pub fn new_document_id() -> Result<String, AppError> {
    let rng = SystemRandom::new();
    let mut id = String::with_capacity(AUTO_ID_LEN);

    while id.len() < AUTO_ID_LEN {
        let mut buf = [0u8; 32];
        rng.fill(&mut buf)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;

        // 248 = 4 * 62; rejecting larger bytes keeps the alphabet uniform.
        for byte in buf.into_iter().filter(|b| *b < 248) {
            if id.len() == AUTO_ID_LEN {
                break;
            }
            id.push(AUTO_ID_ALPHABET[(byte % 62) as usize] as char);
        }
    }

    Ok(id)
}
