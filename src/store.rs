//! JSON document storage.
//!
//! This module provides utilities for:
//! - Initializing the data directory and its three documents
//! - Loading and rewriting each collection as a complete snapshot
//!
//! Each collection lives in one file (`user.json`, `software.json`,
//! `keys.json`). Every read loads the whole document and every mutation
//! rewrites it wholesale. A per-document `RwLock` keeps one request's
//! read-modify-write cycle consistent; disk remains the source of truth.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{license_key::LicenseKey, software::Software, user::AdminUser},
};

const USER_FILE: &str = "user.json";
const SOFTWARE_FILE: &str = "software.json";
const KEYS_FILE: &str = "keys.json";

/// Handle to the on-disk JSON documents.
///
/// The locks guard document access, not cached data: contents are reloaded
/// from disk on every operation.
pub struct Store {
    data_dir: PathBuf,
    user: RwLock<()>,
    software: RwLock<()>,
    keys: RwLock<()>,
}

impl Store {
    /// Open the store, creating the data directory and seeding the two
    /// collection documents with empty arrays if absent.
    ///
    /// Safe to call repeatedly: existing documents are never touched.
    /// The user document is seeded separately by credential bootstrap
    /// because its initial content requires password hashing.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let store = Self {
            data_dir,
            user: RwLock::new(()),
            software: RwLock::new(()),
            keys: RwLock::new(()),
        };
        store.seed_if_absent(SOFTWARE_FILE)?;
        store.seed_if_absent(KEYS_FILE)?;
        Ok(store)
    }

    fn seed_if_absent(&self, file: &str) -> Result<()> {
        let path = self.doc_path(file);
        if !path.exists() {
            fs::write(&path, "[]")
                .with_context(|| format!("failed to seed {}", path.display()))?;
        }
        Ok(())
    }

    fn doc_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    fn read_doc<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        let path = self.doc_path(file);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let value = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Some(value))
    }

    fn write_doc<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.doc_path(file);
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("failed to serialize {}", file))?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Load the administrator record, `None` before first bootstrap.
    pub async fn read_user(&self) -> Result<Option<AdminUser>, AppError> {
        let _guard = self.user.read().await;
        Ok(self.read_doc(USER_FILE)?)
    }

    /// Read-modify-write on the administrator record.
    ///
    /// The closure sees the current record (or `None`); if it succeeds and a
    /// record is present afterwards, the document is rewritten. An error from
    /// the closure skips the write entirely.
    pub async fn update_user<R>(
        &self,
        f: impl FnOnce(&mut Option<AdminUser>) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let _guard = self.user.write().await;
        let mut user = self.read_doc(USER_FILE)?;
        let out = f(&mut user)?;
        if let Some(ref user) = user {
            self.write_doc(USER_FILE, user)?;
        }
        Ok(out)
    }

    /// Load the software collection in storage order.
    pub async fn read_software(&self) -> Result<Vec<Software>, AppError> {
        let _guard = self.software.read().await;
        Ok(self.read_doc(SOFTWARE_FILE)?.unwrap_or_default())
    }

    /// Read-modify-write on the software collection.
    ///
    /// Holds the document's write lock across load, closure, and rewrite so
    /// the cycle observes a consistent snapshot. An error from the closure
    /// skips the write.
    pub async fn update_software<R>(
        &self,
        f: impl FnOnce(&mut Vec<Software>) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let _guard = self.software.write().await;
        let mut items: Vec<Software> = self.read_doc(SOFTWARE_FILE)?.unwrap_or_default();
        let out = f(&mut items)?;
        self.write_doc(SOFTWARE_FILE, &items)?;
        Ok(out)
    }

    /// Load the key collection in storage order.
    pub async fn read_keys(&self) -> Result<Vec<LicenseKey>, AppError> {
        let _guard = self.keys.read().await;
        Ok(self.read_doc(KEYS_FILE)?.unwrap_or_default())
    }

    /// Read-modify-write on the key collection. See [`Store::update_software`].
    pub async fn update_keys<R>(
        &self,
        f: impl FnOnce(&mut Vec<LicenseKey>) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let _guard = self.keys.write().await;
        let mut items: Vec<LicenseKey> = self.read_doc(KEYS_FILE)?.unwrap_or_default();
        let out = f(&mut items)?;
        self.write_doc(KEYS_FILE, &items)?;
        Ok(out)
    }

    /// Read-modify-write spanning both collections, for cascade deletes.
    ///
    /// Lock order is software then keys, always. Both rewrites are attempted
    /// even if the first fails; the first failure is reported and nothing is
    /// rolled back, so callers must treat an error as "state may be
    /// inconsistent, re-list to confirm".
    pub async fn update_software_and_keys<R>(
        &self,
        f: impl FnOnce(&mut Vec<Software>, &mut Vec<LicenseKey>) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let _software_guard = self.software.write().await;
        let _keys_guard = self.keys.write().await;
        let mut software: Vec<Software> = self.read_doc(SOFTWARE_FILE)?.unwrap_or_default();
        let mut keys: Vec<LicenseKey> = self.read_doc(KEYS_FILE)?.unwrap_or_default();
        let out = f(&mut software, &mut keys)?;
        let software_write = self.write_doc(SOFTWARE_FILE, &software);
        let keys_write = self.write_doc(KEYS_FILE, &keys);
        software_write?;
        keys_write?;
        Ok(out)
    }

    /// Look up a single software record by id.
    pub async fn find_software(&self, id: Uuid) -> Result<Option<Software>, AppError> {
        Ok(self.read_software().await?.into_iter().find(|s| s.id == id))
    }
}
