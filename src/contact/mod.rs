//! Contact form storage
//!
//! Submissions are plain `{name, email, message}` records. Storage sits behind
//! the async [`ContactStore`] trait with two implementations: an append-only
//! JSON-lines file and an in-memory list.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::utils::error::{DermaError, Result};

/// A contact form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    /// Build a message from optional form fields, rejecting blanks
    pub fn from_fields(
        name: Option<String>,
        email: Option<String>,
        message: Option<String>,
    ) -> Result<Self> {
        let contact = Self {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            message: message.unwrap_or_default(),
        };
        contact.validate()?;
        Ok(contact)
    }

    pub fn validate(&self) -> Result<()> {
        let blank = |s: &str| s.trim().is_empty();
        if blank(&self.name) || blank(&self.email) || blank(&self.message) {
            return Err(DermaError::InvalidInput(
                "All fields are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Persistence for contact messages
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert(&self, contact: ContactMessage) -> Result<()>;

    /// All stored messages, oldest first
    async fn list_all(&self) -> Result<Vec<ContactMessage>>;

    /// Short description for status output
    fn describe(&self) -> String;
}

/// Process-local store, lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    contacts: Mutex<Vec<ContactMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn insert(&self, contact: ContactMessage) -> Result<()> {
        self.contacts.lock().await.push(contact);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ContactMessage>> {
        Ok(self.contacts.lock().await.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// One JSON object per line, appended on insert
#[derive(Debug)]
pub struct JsonLinesStore {
    path: PathBuf,
    // Serializes appends from concurrent requests
    write_lock: Mutex<()>,
}

impl JsonLinesStore {
    /// Open a store at `path`, creating parent directories
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContactStore for JsonLinesStore {
    async fn insert(&self, contact: ContactMessage) -> Result<()> {
        let mut line = serde_json::to_string(&contact)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| DermaError::Storage(format!("cannot open {:?}: {}", self.path, e)))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| DermaError::Storage(format!("cannot write {:?}: {}", self.path, e)))?;
        file.flush().await?;

        debug!("Stored contact message from {}", contact.email);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ContactMessage>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DermaError::Storage(format!(
                    "cannot read {:?}: {}",
                    self.path, e
                )))
            }
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .map_err(|e| DermaError::Storage(format!("corrupt contact record: {}", e)))
            })
            .collect()
    }

    fn describe(&self) -> String {
        format!("jsonl:{}", self.path.display())
    }
}
