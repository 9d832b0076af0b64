//! Persisted UI preferences.
//!
//! A small JSON object of string keys and string values, read from disk on
//! every lookup and rewritten on every change. The only key in use is
//! `darkMode`, stored as `"true"` or `"false"`.

use anyhow::Context;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DARK_MODE_KEY: &str = "darkMode";

/// Key/value preference file.
#[derive(Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load(&self) -> anyhow::Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(values) => Ok(values),
                Err(e) => {
                    tracing::warn!(path = ?self.path, error = %e, "Ignoring unreadable preferences file");
                    Ok(BTreeMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e).with_context(|| format!("reading {:?}", self.path)),
        }
    }

    pub async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    pub async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.load().await?;
        self.set_locked(&mut values, key, value).await
    }

    /// Insert into an already loaded map and rewrite the file. Callers hold
    /// `write_lock` from the load through this write.
    async fn set_locked(
        &self,
        values: &mut BTreeMap<String, String>,
        key: &str,
        value: &str,
    ) -> anyhow::Result<()> {
        values.insert(key.to_string(), value.to_string());

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {:?}", dir))?;
        }

        let json = serde_json::to_string_pretty(values)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing {:?}", self.path))?;
        tracing::debug!(key, value, "Saved preference");
        Ok(())
    }

    /// Dark mode flag. Anything other than `"true"` reads as off.
    pub async fn dark_mode(&self) -> anyhow::Result<bool> {
        Ok(self.get(DARK_MODE_KEY).await?.as_deref() == Some("true"))
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> anyhow::Result<()> {
        self.set(DARK_MODE_KEY, bool_str(enabled)).await
    }

    /// Flip dark mode and return the new value.
    pub async fn toggle_dark_mode(&self) -> anyhow::Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.load().await?;
        let enabled = values.get(DARK_MODE_KEY).map(String::as_str) != Some("true");
        self.set_locked(&mut values, DARK_MODE_KEY, bool_str(enabled))
            .await?;
        Ok(enabled)
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
