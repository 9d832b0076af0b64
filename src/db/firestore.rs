// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides generic operations over the app's collections:
//! - Single-document reads by id
//! - Equality-filtered queries
//! - Whole-document writes and deletes
//! - Listen streams backing live subscriptions

use crate::db::{Document, Filter, Record, Subscription};
use crate::error::AppError;
use firestore::{
    FirestoreListenerTarget, FirestoreMemListenStateStorage, FirestoreTransformServerValue,
};
use std::future::Future;
use tokio::sync::mpsc;

/// Every listener carries exactly one target.
const LISTEN_TARGET_ID: u32 = 1;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a disconnected client (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Reads ───────────────────────────────────────────────────

    /// Get a document by id.
    pub async fn get<T: Record>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Query a collection, returning `(document id, record)` pairs.
    ///
    /// Documents that do not deserialize are logged and skipped.
    pub async fn query<T: Record>(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<(String, T)>, AppError> {
        let select = self.get_client()?.fluent().select().from(collection);

        let select = match filter.clone() {
            Filter::All => select,
            Filter::FieldEq { field, value } => {
                select.filter(move |q| q.field(field).eq(value.clone()))
            }
        };

        let docs = select
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut out = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = document_id(&doc.name).to_string();
            match firestore::FirestoreDb::deserialize_doc_to::<T>(&doc) {
                Ok(data) => out.push((id, data)),
                Err(e) => {
                    tracing::warn!(collection, id = %id, error = %e, "Skipping undecodable document");
                }
            }
        }
        Ok(out)
    }

    // ─── Writes ──────────────────────────────────────────────────

    /// Write a whole document, replacing any existing fields.
    ///
    /// Fields named in `server_stamped` are set to the request time by
    /// Firestore. Object updates only carry field transforms inside a
    /// transaction, so stamped writes commit through one.
    pub async fn set<T: Record>(
        &self,
        collection: &str,
        id: &str,
        data: &T,
        server_stamped: &[&'static str],
    ) -> Result<(), AppError> {
        let client = self.get_client()?;

        if server_stamped.is_empty() {
            let _: () = client
                .fluent()
                .update()
                .in_col(collection)
                .document_id(id)
                .object(data)
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(());
        }

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(data)
            .transforms(|t| {
                t.fields(server_stamped.iter().map(|field| {
                    t.field(*field)
                        .server_value(FirestoreTransformServerValue::RequestTime)
                }))
            })
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add write to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit write: {}", e)))?;
        Ok(())
    }

    /// Delete a document by id.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Live Queries ────────────────────────────────────────────

    /// Open a listen stream for `filter` and wrap it in a subscription that
    /// re-runs `fetch` on every change event.
    pub async fn listen<T, F, Fut>(
        &self,
        collection: &'static str,
        filter: &Filter,
        fetch: F,
    ) -> Result<Subscription<T>, AppError>
    where
        T: Record,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<Document<T>>, AppError>> + Send,
    {
        let client = self.get_client()?;

        let mut listener = client
            .create_listener(FirestoreMemListenStateStorage::new())
            .await
            .map_err(|e| AppError::Database(format!("Failed to create listener: {}", e)))?;

        let select = client.fluent().select().from(collection);
        let select = match filter.clone() {
            Filter::All => select,
            Filter::FieldEq { field, value } => {
                select.filter(move |q| q.field(field).eq(value.clone()))
            }
        };

        select
            .listen()
            .add_target(FirestoreListenerTarget::new(LISTEN_TARGET_ID), &mut listener)
            .map_err(|e| AppError::Database(format!("Failed to add listen target: {}", e)))?;

        let (signal_tx, signal_rx) = mpsc::channel(1);

        listener
            .start(move |_event| {
                let signal_tx = signal_tx.clone();
                async move {
                    // A full channel already has a refresh pending.
                    let _ = signal_tx.try_send(());
                    Ok(())
                }
            })
            .await
            .map_err(|e| AppError::Database(format!("Failed to start listener: {}", e)))?;

        tracing::info!(collection, "Firestore listener started");

        let on_close = async move {
            if let Err(e) = listener.shutdown().await {
                tracing::warn!(collection, error = %e, "Firestore listener shutdown failed");
            }
        };

        Ok(Subscription::spawn(collection, signal_rx, fetch, on_close))
    }
}

/// Last path segment of a full document resource name.
fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
