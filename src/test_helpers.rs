//! Shared test utilities for the edita test suite.
//!
//! Small fixtures used across module tests: temp-backed stores, sniffable
//! media files, and an event-name extractor for asserting feedback order.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use tempfile::TempDir;

use crate::session::SessionEvent;
use crate::store::ContentStore;

/// PNG magic plus a truncated header — enough for format sniffing.
pub const PNG_STUB: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
    b'R',
];

/// A [`ContentStore`] rooted inside a fresh temp directory.
pub fn temp_store() -> (TempDir, ContentStore) {
    let tmp = TempDir::new().unwrap();
    let store = ContentStore::new(tmp.path().join("store"));
    (tmp, store)
}

/// Write a sniffable PNG stub into `dir` and return its path.
pub fn png_file(dir: &Path) -> PathBuf {
    let path = dir.join("fixture.png");
    std::fs::write(&path, PNG_STUB).unwrap();
    path
}

/// Drain a (closed) event channel into short event names, preserving order.
pub fn event_names(rx: &Receiver<SessionEvent>) -> Vec<String> {
    rx.try_iter()
        .map(|event| {
            match event {
                SessionEvent::AdminToggled { .. } => "admin-toggled",
                SessionEvent::FieldCommitted { .. } => "field-committed",
                SessionEvent::FieldUnchanged { .. } => "field-unchanged",
                SessionEvent::MediaReplaced { .. } => "media-replaced",
                SessionEvent::MediaRejected { .. } => "media-rejected",
                SessionEvent::SavePending => "save-pending",
                SessionEvent::SaveSettled { .. } => "save-settled",
                SessionEvent::SaveFailed { .. } => "save-failed",
            }
            .to_string()
        })
        .collect()
}
