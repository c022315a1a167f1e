//! The edit session controller.
//!
//! Owns the content document for the lifetime of a session, together with
//! the admin flag and the dirty/saving state. Every mutation funnels through
//! here: field commits, media replacement, and persistence. Components may
//! ask for an update, but only the session decides when to persist.
//!
//! ## State machine
//!
//! ```text
//! Viewing ──admin on──▶ EditingClean ──commit/ingest──▶ EditingDirty
//!                            ▲                              │
//!                            └──────── save settles ◀── Saving
//! ```
//!
//! Turning admin off from any `Editing*` state returns to `Viewing` but
//! preserves both the document and the dirty flag — unsaved edits survive
//! the toggle and reappear when admin comes back on.
//!
//! ## Saving
//!
//! A save is two-phase: [`EditSession::begin_save`] snapshots the document
//! and announces [`SessionEvent::SavePending`]; [`EditSession::finish_save`]
//! settles it. [`EditSession::save`] bundles both around a
//! [`ContentStore::save`] call. While a save is pending:
//!
//! - a second `begin_save` is rejected with [`SessionError::SaveInFlight`]
//!   (no overlapping commits, ever);
//! - new edits proceed immediately against the live document. A revision
//!   counter records them, so a save that settles successfully only clears
//!   the dirty flag when nothing changed since the snapshot.
//!
//! A failed save emits [`SessionEvent::SaveFailed`], keeps the dirty flag
//! set, and returns the error — the caller retries by saving again.
//!
//! ## Feedback
//!
//! User-visible feedback (the pending spinner, the unsaved-changes pill,
//! media rejection notices) is driven by [`SessionEvent`]s sent over an
//! optional channel, keeping the session free of any UI dependency.

use crate::binding::{self, Commit, FieldEdit, FieldKind};
use crate::document::{Document, DocumentError};
use crate::media::{self, IngestedMedia, MediaError};
use crate::store::{ContentStore, SaveReceipt, StoreError};
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("admin mode is off; enable it before editing")]
    AdminDisabled,
    #[error("a save is already in flight")]
    SaveInFlight,
    #[error("'{section}.{field}' is not an editable field")]
    NotEditable { section: String, field: String },
    #[error("'{section}.{field}' is not a media field")]
    NotMediaField { section: String, field: String },
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Observable session state, derived from the flags the session owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Admin off. The page renders read-only; commits never fire.
    Viewing,
    /// Admin on, no unsaved changes.
    EditingClean,
    /// Admin on, at least one unsaved change.
    EditingDirty,
    /// A save is pending settlement.
    Saving,
}

/// Feedback events for the UI surface.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    AdminToggled {
        enabled: bool,
    },
    FieldCommitted {
        section: String,
        field: String,
    },
    /// A blur arrived with content identical to the stored value.
    FieldUnchanged {
        section: String,
        field: String,
    },
    MediaReplaced {
        section: String,
        field: String,
        mime: String,
        bytes: u64,
    },
    /// An ingest failed; the previous media value was retained.
    MediaRejected {
        section: String,
        field: String,
        reason: String,
    },
    SavePending,
    SaveSettled {
        /// False when the store skipped an identical write.
        written: bool,
    },
    SaveFailed {
        reason: String,
    },
}

/// The session controller. See the module docs for the state machine.
pub struct EditSession {
    document: Document,
    admin: bool,
    dirty: bool,
    saving: bool,
    /// Bumped on every applied mutation; lets a settling save detect edits
    /// made after its snapshot.
    revision: u64,
    saved_revision: u64,
    max_media_bytes: u64,
    events: Option<Sender<SessionEvent>>,
}

impl EditSession {
    /// Start a session over a loaded (or default) document. Admin starts off.
    pub fn new(document: Document) -> Self {
        EditSession {
            document,
            admin: false,
            dirty: false,
            saving: false,
            revision: 0,
            saved_revision: 0,
            max_media_bytes: media::DEFAULT_MAX_INLINE_BYTES,
            events: None,
        }
    }

    /// Attach a feedback channel. Send failures are ignored — a vanished
    /// listener must not break editing.
    pub fn events(mut self, sender: Sender<SessionEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Override the inline media size cap.
    pub fn max_media_bytes(mut self, max: u64) -> Self {
        self.max_media_bytes = max;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn state(&self) -> SessionState {
        if self.saving {
            SessionState::Saving
        } else if !self.admin {
            SessionState::Viewing
        } else if self.dirty {
            SessionState::EditingDirty
        } else {
            SessionState::EditingClean
        }
    }

    /// Toggle admin mode. Dirty state and document survive in both
    /// directions; turning admin off neither discards nor saves edits.
    pub fn set_admin(&mut self, enabled: bool) {
        if self.admin != enabled {
            self.admin = enabled;
            self.emit(SessionEvent::AdminToggled { enabled });
        }
    }

    /// Route a blur-time edit into the document.
    ///
    /// Returns `true` when the document changed (and the session became
    /// dirty), `false` when the edit matched the stored value. The edit
    /// target must be a registered binding.
    pub fn commit(&mut self, edit: &FieldEdit) -> Result<bool, SessionError> {
        if !self.admin {
            return Err(SessionError::AdminDisabled);
        }
        if binding::find(&edit.section, &edit.field).is_none() {
            return Err(SessionError::NotEditable {
                section: edit.section.clone(),
                field: edit.field.clone(),
            });
        }
        match binding::commit(&self.document, edit)? {
            Commit::Applied(updated) => {
                self.document = updated;
                self.mark_dirty();
                self.emit(SessionEvent::FieldCommitted {
                    section: edit.section.clone(),
                    field: edit.field.clone(),
                });
                Ok(true)
            }
            Commit::Unchanged => {
                self.emit(SessionEvent::FieldUnchanged {
                    section: edit.section.clone(),
                    field: edit.field.clone(),
                });
                Ok(false)
            }
        }
    }

    /// Replace a media field with an inlined local file.
    ///
    /// Any ingest failure leaves the existing value untouched and is
    /// surfaced both as a [`SessionEvent::MediaRejected`] notice and as the
    /// returned error.
    pub fn ingest_media(
        &mut self,
        section: &str,
        field: &str,
        file: &Path,
    ) -> Result<(), SessionError> {
        if !self.admin {
            return Err(SessionError::AdminDisabled);
        }
        match binding::find(section, field) {
            Some(b) if b.kind == FieldKind::Media => {}
            _ => {
                return Err(SessionError::NotMediaField {
                    section: section.to_string(),
                    field: field.to_string(),
                });
            }
        }

        let IngestedMedia {
            mime,
            kind: _,
            bytes,
            data_url,
        } = match media::ingest(file, self.max_media_bytes) {
            Ok(media) => media,
            Err(err) => {
                self.emit(SessionEvent::MediaRejected {
                    section: section.to_string(),
                    field: field.to_string(),
                    reason: err.to_string(),
                });
                return Err(err.into());
            }
        };

        self.document = self.document.update(section, field, data_url)?;
        self.mark_dirty();
        self.emit(SessionEvent::MediaReplaced {
            section: section.to_string(),
            field: field.to_string(),
            mime,
            bytes,
        });
        Ok(())
    }

    /// Open a save: reject overlap, announce pending, hand back a snapshot
    /// for the store to commit. Edits may continue against the live
    /// document while the snapshot settles.
    pub fn begin_save(&mut self) -> Result<Document, SessionError> {
        if !self.admin {
            return Err(SessionError::AdminDisabled);
        }
        if self.saving {
            return Err(SessionError::SaveInFlight);
        }
        self.saving = true;
        self.saved_revision = self.revision;
        self.emit(SessionEvent::SavePending);
        Ok(self.document.clone())
    }

    /// Settle the pending save with the store's result.
    ///
    /// Success clears the dirty flag unless edits landed after the
    /// snapshot; failure keeps it set so the unsaved-changes affordance
    /// reappears and the user can retry.
    pub fn finish_save(
        &mut self,
        result: Result<SaveReceipt, StoreError>,
    ) -> Result<SaveReceipt, SessionError> {
        self.saving = false;
        match result {
            Ok(receipt) => {
                if self.revision == self.saved_revision {
                    self.dirty = false;
                }
                self.emit(SessionEvent::SaveSettled {
                    written: receipt.written,
                });
                Ok(receipt)
            }
            Err(err) => {
                self.emit(SessionEvent::SaveFailed {
                    reason: err.to_string(),
                });
                Err(SessionError::Store(err))
            }
        }
    }

    /// Persist the document: `begin_save` → store commit → `finish_save`.
    pub fn save(&mut self, store: &ContentStore) -> Result<SaveReceipt, SessionError> {
        let snapshot = self.begin_save()?;
        self.finish_save(store.save(&snapshot))
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(sender) = &self.events {
            let _ = sender.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{event_names, png_file, temp_store};
    use std::sync::mpsc;

    fn admin_session() -> EditSession {
        let mut session = EditSession::new(Document::default_site());
        session.set_admin(true);
        session
    }

    fn edit(value: &str) -> FieldEdit {
        FieldEdit::new("hero", "title1", value)
    }

    // =========================================================================
    // Admin gating and state transitions
    // =========================================================================

    #[test]
    fn starts_viewing_and_clean() {
        let session = EditSession::new(Document::default_site());
        assert_eq!(session.state(), SessionState::Viewing);
        assert!(!session.is_dirty());
    }

    #[test]
    fn admin_on_enters_editing_clean() {
        let session = admin_session();
        assert_eq!(session.state(), SessionState::EditingClean);
    }

    #[test]
    fn commit_rejected_outside_admin() {
        let mut session = EditSession::new(Document::default_site());
        assert!(matches!(
            session.commit(&edit("Nova Era")),
            Err(SessionError::AdminDisabled)
        ));
        assert!(!session.is_dirty());
    }

    #[test]
    fn commit_marks_dirty() {
        let mut session = admin_session();
        assert!(session.commit(&edit("Nova Era")).unwrap());
        assert_eq!(session.state(), SessionState::EditingDirty);
        assert_eq!(session.document().get("hero", "title1"), Some("Nova Era"));
    }

    #[test]
    fn unchanged_commit_stays_clean() {
        let mut session = admin_session();
        let current = session
            .document()
            .get("hero", "title1")
            .unwrap()
            .to_string();
        assert!(!session.commit(&edit(&current)).unwrap());
        assert_eq!(session.state(), SessionState::EditingClean);
    }

    #[test]
    fn commit_rejects_unbound_field() {
        let mut session = admin_session();
        let err = session
            .commit(&FieldEdit::new("hero", "secret", "x"))
            .unwrap_err();
        assert!(matches!(err, SessionError::NotEditable { .. }));
        assert!(!session.is_dirty());
    }

    #[test]
    fn admin_toggle_preserves_document_and_dirty() {
        let mut session = admin_session();
        session.commit(&edit("Nova Era")).unwrap();

        session.set_admin(false);
        assert_eq!(session.state(), SessionState::Viewing);
        assert!(session.is_dirty());
        assert_eq!(session.document().get("hero", "title1"), Some("Nova Era"));

        session.set_admin(true);
        assert_eq!(session.state(), SessionState::EditingDirty);
        assert_eq!(session.document().get("hero", "title1"), Some("Nova Era"));
    }

    // =========================================================================
    // Media ingestion
    // =========================================================================

    #[test]
    fn ingest_replaces_media_and_marks_dirty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = png_file(tmp.path());
        let mut session = admin_session();

        session.ingest_media("hero", "mediaUrl", &file).unwrap();
        assert!(session.is_dirty());
        let value = session.document().get("hero", "mediaUrl").unwrap();
        assert!(value.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn failed_ingest_retains_previous_value_and_dirty_state() {
        let tmp = tempfile::TempDir::new().unwrap();
        let corrupt = tmp.path().join("broken.png");
        std::fs::write(&corrupt, [0xDE, 0xAD]).unwrap();

        let mut session = admin_session();
        let before = session
            .document()
            .get("hero", "mediaUrl")
            .unwrap()
            .to_string();

        let err = session
            .ingest_media("hero", "mediaUrl", &corrupt)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Media(MediaError::UnsupportedFormat)
        ));
        assert_eq!(
            session.document().get("hero", "mediaUrl"),
            Some(before.as_str())
        );
        assert!(!session.is_dirty());
    }

    #[test]
    fn ingest_rejects_text_field_target() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = png_file(tmp.path());
        let mut session = admin_session();
        assert!(matches!(
            session.ingest_media("hero", "title1", &file),
            Err(SessionError::NotMediaField { .. })
        ));
    }

    #[test]
    fn ingest_honors_size_cap() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = png_file(tmp.path());
        let mut session = admin_session().max_media_bytes(4);
        assert!(matches!(
            session.ingest_media("hero", "mediaUrl", &file),
            Err(SessionError::Media(MediaError::TooLarge { .. }))
        ));
        assert!(!session.is_dirty());
    }

    // =========================================================================
    // Saving
    // =========================================================================

    #[test]
    fn save_clears_dirty_and_persists() {
        let (_tmp, store) = temp_store();
        let mut session = admin_session();
        session.commit(&edit("Nova Era")).unwrap();

        let receipt = session.save(&store).unwrap();
        assert!(receipt.written);
        assert!(!session.is_dirty());
        assert_eq!(session.state(), SessionState::EditingClean);
        assert_eq!(
            store.load().unwrap().get("hero", "title1"),
            Some("Nova Era")
        );
    }

    #[test]
    fn dirty_until_save_then_dirty_again_on_next_commit() {
        let (_tmp, store) = temp_store();
        let mut session = admin_session();

        session.commit(&edit("v1")).unwrap();
        assert!(session.is_dirty());
        session.save(&store).unwrap();
        assert!(!session.is_dirty());
        session.commit(&edit("v2")).unwrap();
        assert!(session.is_dirty());
    }

    #[test]
    fn overlapping_save_is_rejected() {
        let mut session = admin_session();
        session.commit(&edit("Nova Era")).unwrap();

        let _snapshot = session.begin_save().unwrap();
        assert_eq!(session.state(), SessionState::Saving);
        assert!(matches!(
            session.begin_save(),
            Err(SessionError::SaveInFlight)
        ));
    }

    #[test]
    fn failed_save_keeps_dirty_and_allows_retry() {
        let (_tmp, store) = temp_store();
        let mut session = admin_session();
        session.commit(&edit("Nova Era")).unwrap();

        let snapshot = session.begin_save().unwrap();
        let io = std::io::Error::other("disk on fire");
        let err = session.finish_save(Err(StoreError::Io(io))).unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert!(session.is_dirty());
        assert_eq!(session.state(), SessionState::EditingDirty);
        drop(snapshot);

        // Retry succeeds
        session.save(&store).unwrap();
        assert!(!session.is_dirty());
    }

    #[test]
    fn edit_during_save_keeps_session_dirty_after_settle() {
        let (_tmp, store) = temp_store();
        let mut session = admin_session();
        session.commit(&edit("v1")).unwrap();

        let snapshot = session.begin_save().unwrap();
        // Optimistic edit while the snapshot is settling
        session.commit(&edit("v2")).unwrap();
        session.finish_save(store.save(&snapshot)).unwrap();

        assert!(session.is_dirty(), "post-snapshot edit is still unsaved");
        assert_eq!(
            store.load().unwrap().get("hero", "title1"),
            Some("v1"),
            "the settled save carried the snapshot"
        );
    }

    #[test]
    fn saving_a_clean_session_skips_the_second_write() {
        let (_tmp, store) = temp_store();
        let mut session = admin_session();
        session.commit(&edit("Nova Era")).unwrap();
        session.save(&store).unwrap();

        let receipt = session.save(&store).unwrap();
        assert!(!receipt.written);
    }

    // =========================================================================
    // Events
    // =========================================================================

    #[test]
    fn save_emits_pending_then_settled() {
        let (_tmp, store) = temp_store();
        let (tx, rx) = mpsc::channel();
        let mut session = EditSession::new(Document::default_site()).events(tx);
        session.set_admin(true);
        session.commit(&edit("Nova Era")).unwrap();
        session.save(&store).unwrap();
        drop(session);

        assert_eq!(
            event_names(&rx),
            vec![
                "admin-toggled",
                "field-committed",
                "save-pending",
                "save-settled",
            ]
        );
    }

    #[test]
    fn failed_save_emits_save_failed() {
        let (tx, rx) = mpsc::channel();
        let mut session = EditSession::new(Document::default_site()).events(tx);
        session.set_admin(true);
        session.commit(&edit("Nova Era")).unwrap();

        let _snapshot = session.begin_save().unwrap();
        let io = std::io::Error::other("disk on fire");
        let _ = session.finish_save(Err(StoreError::Io(io)));
        drop(session);

        let names = event_names(&rx);
        assert_eq!(names.last().map(String::as_str), Some("save-failed"));
    }

    #[test]
    fn rejected_media_emits_notice() {
        let tmp = tempfile::TempDir::new().unwrap();
        let corrupt = tmp.path().join("broken.bin");
        std::fs::write(&corrupt, [0x00, 0x01]).unwrap();

        let (tx, rx) = mpsc::channel();
        let mut session = EditSession::new(Document::default_site()).events(tx);
        session.set_admin(true);
        let _ = session.ingest_media("hero", "mediaUrl", &corrupt);
        drop(session);

        let names = event_names(&rx);
        assert!(names.contains(&"media-rejected".to_string()));
    }

    #[test]
    fn dropped_event_listener_does_not_break_editing() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut session = EditSession::new(Document::default_site()).events(tx);
        session.set_admin(true);
        assert!(session.commit(&edit("Nova Era")).unwrap());
    }
}
