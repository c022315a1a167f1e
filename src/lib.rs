//! # edita
//!
//! Local-first content editor core for a small marketing site. The site's
//! editable copy and media references live in one content document; editors
//! flip on admin mode, edit regions in place, replace images and video from
//! local files, and publish the result to a durable local store.
//!
//! # Architecture: One Document, One Mutation Path
//!
//! Everything funnels through a single pipeline:
//!
//! ```text
//! view blur / file pick
//!        │
//!        ▼
//!   FieldEdit / ingest        (binding, media)
//!        │
//!        ▼
//!   EditSession               (admin gate, dirty tracking, save phases)
//!        │
//!        ▼
//!   Document::update          (pure replace, schema-checked)
//!        │
//!        ▼
//!   ContentStore::save        (versioned JSON slot, idempotent)
//! ```
//!
//! This shape exists for three reasons:
//!
//! - **No UI coupling**: the view emits [`binding::FieldEdit`] commands and
//!   listens to [`session::SessionEvent`]s; the core never touches a
//!   rendering surface.
//! - **A document that can't half-change**: [`document::Document`] is a
//!   pure value — every mutation is a whole-document replacement, so an
//!   interrupted save or a failed media ingest can never leave it torn.
//! - **Testability**: commit, merge, and save logic are plain functions
//!   over values; the state machine is exercised without any UI at all.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`document`] | The content document: default site content, schema-checked `update`, section-level default fallback |
//! | [`store`] | Durable persistence — versioned JSON slot, fail-soft load, idempotent save |
//! | [`media`] | Local file → inline data URL; magic-byte sniffing, size cap |
//! | [`binding`] | Editable-region registry and the blur-commit rule |
//! | [`session`] | Admin mode, dirty tracking, two-phase save, feedback events |
//! | [`config`] | `edita.toml` loading and validation |
//! | [`router`] | Page navigation collaborator (current page, navigate) |
//! | [`chat`] | Assistant transcript and backend seam; never touches the document |
//! | [`output`] | Terminal formatting for the document and session events |
//!
//! # Design Decisions
//!
//! ## Commit on Blur, Not on Keystroke
//!
//! Editable regions report their text once, when focus leaves. Document
//! writes are bounded to one per edit per field, and a blur whose content
//! matches the stored value is reported as unchanged instead of creating
//! phantom unsaved work.
//!
//! ## Fail-Soft Load, Hard-Fail Config
//!
//! A missing, corrupt, or out-of-version content slot falls back to the
//! built-in default document; losing stored edits is recoverable, crashing
//! a site is not. Configuration takes the opposite stance — a typo'd
//! `edita.toml` stops the run, because editing against the wrong storage
//! directory does silent damage.
//!
//! ## Section-Level Fallback
//!
//! Loaded documents merge against the defaults one whole section at a
//! time. A section missing any expected field is replaced verbatim by the
//! default section; there is no per-field patching. Sections the schema
//! doesn't know about pass through untouched.
//!
//! ## Inline Media With a Ceiling
//!
//! Ingested files become `data:` URLs inside the document, so the rendered
//! page needs no media server. The cost is document size, so ingestion
//! enforces a byte cap (8 MiB by default) and classifies files by their
//! magic bytes — a failed or oversized ingest leaves the old value alone.
//!
//! ## Two-Phase Save
//!
//! `begin_save` snapshots the document and announces a pending save;
//! `finish_save` settles it. Overlapping saves are rejected outright, while
//! edits made during settlement keep the session dirty. A failed commit
//! keeps the unsaved-changes affordance up and lets the user retry.

pub mod binding;
pub mod chat;
pub mod config;
pub mod document;
pub mod media;
pub mod output;
pub mod router;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
