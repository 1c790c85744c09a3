// src/store.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::models::{ApiKey, App, Bookmark, VaultData};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

const VAULT_FILE: &str = "vault.json";

/// JSON-file-backed store for the three record collections. Every write
/// rewrites the whole file; reads parse it fresh. Single-user, no locking.
pub struct VaultStore {
    vault_path: PathBuf,
}

impl VaultStore {
    /// Open (creating the directory if needed) the store under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir)?;
        }
        Ok(Self {
            vault_path: data_dir.join(VAULT_FILE),
        })
    }

    pub fn vault_path(&self) -> &Path {
        &self.vault_path
    }

    /// Load the vault. A missing file is an empty vault, not an error.
    pub fn load(&self) -> Result<VaultData> {
        if !self.vault_path.exists() {
            debug!("No vault file at {:?}, starting empty", self.vault_path);
            return Ok(VaultData::default());
        }
        let content = fs::read_to_string(&self.vault_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, data: &VaultData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.vault_path, json)?;
        debug!(
            "Saved vault: {} records to {:?}",
            data.record_count(),
            self.vault_path
        );
        Ok(())
    }

    /// Throw away the current contents and persist `data` in their place.
    /// Used by import, which is a full-replacement operation.
    pub fn replace_all(&self, data: &VaultData) -> Result<()> {
        info!(
            "Replacing vault contents with {} imported records",
            data.record_count()
        );
        self.save(data)
    }

    pub fn insert_app(&self, app: App) -> Result<App> {
        let mut data = self.load()?;
        data.applications.push(app.clone());
        self.save(&data)?;
        Ok(app)
    }

    /// Overwrite the mutable fields of the app with `id`. The id and
    /// creation date never change.
    pub fn update_app(&self, id: &str, updated: App) -> Result<()> {
        let mut data = self.load()?;
        let app = data
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        app.name = updated.name;
        app.description = updated.description;
        app.url = updated.url;
        app.api_key_id = updated.api_key_id;
        self.save(&data)
    }

    pub fn delete_app(&self, id: &str) -> Result<()> {
        let mut data = self.load()?;
        let before = data.applications.len();
        data.applications.retain(|a| a.id != id);
        if data.applications.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.save(&data)
    }

    pub fn insert_api_key(&self, key: ApiKey) -> Result<ApiKey> {
        let mut data = self.load()?;
        data.api_keys.push(key.clone());
        self.save(&data)?;
        Ok(key)
    }

    pub fn update_api_key(&self, id: &str, updated: ApiKey) -> Result<()> {
        let mut data = self.load()?;
        let key = data
            .api_keys
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        key.name = updated.name;
        key.key = updated.key;
        key.last_used = updated.last_used;
        key.is_active = updated.is_active;
        self.save(&data)
    }

    /// Remove an API key. Apps referencing it keep their `api_key_id`;
    /// dangling references are tolerated throughout.
    pub fn delete_api_key(&self, id: &str) -> Result<()> {
        let mut data = self.load()?;
        let before = data.api_keys.len();
        data.api_keys.retain(|k| k.id != id);
        if data.api_keys.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.save(&data)
    }

    pub fn insert_bookmark(&self, bookmark: Bookmark) -> Result<Bookmark> {
        let mut data = self.load()?;
        data.bookmarks.push(bookmark.clone());
        self.save(&data)?;
        Ok(bookmark)
    }

    pub fn update_bookmark(&self, id: &str, updated: Bookmark) -> Result<()> {
        let mut data = self.load()?;
        let bookmark = data
            .bookmarks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        bookmark.title = updated.title;
        bookmark.url = updated.url;
        bookmark.tags = updated.tags;
        self.save(&data)
    }

    pub fn delete_bookmark(&self, id: &str) -> Result<()> {
        let mut data = self.load()?;
        let before = data.bookmarks.len();
        data.bookmarks.retain(|b| b.id != id);
        if data.bookmarks.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.save(&data)
    }
}
