//! Durable persistence for the content document.
//!
//! The store owns a single well-known slot file inside a storage directory.
//! The file holds a versioned JSON envelope:
//!
//! ```json
//! {
//!   "version": 3,
//!   "content": { "hero": { "title1": "..." }, ... }
//! }
//! ```
//!
//! ## Fail-soft loading
//!
//! [`ContentStore::load`] returns `None` when the slot file is missing,
//! unparseable, or carries the wrong version — never an error. Callers fall
//! back to [`Document::default_site`]; [`ContentStore::load_or_default`]
//! bundles the fallback and the one-time
//! [`merged_with_defaults`](Document::merged_with_defaults) pass. A corrupt
//! store therefore costs at worst the stored edits, never a crash.
//!
//! ## Idempotent commits
//!
//! Serialization is byte-stable (the document's maps are ordered), so saving
//! the same document twice produces identical bytes. The store hashes the
//! serialized form and skips the physical write when the slot already holds
//! those bytes; the [`SaveReceipt`] reports whether a write happened.
//!
//! Schema changes require bumping [`STORE_VERSION`] — there is no migration,
//! an old slot simply falls back to defaults.

use crate::document::Document;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the slot file within the storage directory.
const SLOT_FILENAME: &str = "site-content.json";

/// Version of the stored envelope. A mismatch on load falls back to the
/// default document.
pub const STORE_VERSION: u32 = 3;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    content: &'a Document,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    content: Document,
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    /// False when the slot already held the same bytes and the write was skipped.
    pub written: bool,
    /// Size of the serialized document in bytes.
    pub bytes: usize,
    /// SHA-256 of the serialized document, as hex.
    pub digest: String,
}

/// The durable backing store for the content document.
pub struct ContentStore {
    dir: PathBuf,
}

impl ContentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the slot file.
    pub fn slot_path(&self) -> PathBuf {
        self.dir.join(SLOT_FILENAME)
    }

    /// Load the stored document. `None` if the slot is absent, malformed,
    /// or versioned differently — parse failures never propagate.
    pub fn load(&self) -> Option<Document> {
        let raw = fs::read_to_string(self.slot_path()).ok()?;
        let envelope: Envelope = serde_json::from_str(&raw).ok()?;
        if envelope.version != STORE_VERSION {
            return None;
        }
        Some(envelope.content)
    }

    /// Load the stored document merged against the defaults, or the default
    /// document when nothing (usable) is stored.
    pub fn load_or_default(&self) -> Document {
        match self.load() {
            Some(doc) => doc.merged_with_defaults(),
            None => Document::default_site(),
        }
    }

    /// Commit the document to the slot file.
    ///
    /// Creates the storage directory on first save. When the slot already
    /// holds the exact bytes this document serializes to, the write is
    /// skipped and the receipt says `written: false`.
    pub fn save(&self, document: &Document) -> Result<SaveReceipt, StoreError> {
        let json = serde_json::to_string_pretty(&EnvelopeRef {
            version: STORE_VERSION,
            content: document,
        })?;
        let digest = hex_digest(json.as_bytes());

        let path = self.slot_path();
        if let Ok(existing) = fs::read(&path)
            && hex_digest(&existing) == digest
        {
            return Ok(SaveReceipt {
                written: false,
                bytes: json.len(),
                digest,
            });
        }

        fs::create_dir_all(&self.dir)?;
        fs::write(&path, &json)?;
        Ok(SaveReceipt {
            written: true,
            bytes: json.len(),
            digest,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
