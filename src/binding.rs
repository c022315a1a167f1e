//! Field bindings: which on-screen regions are editable, and how an edit
//! commits back into the document.
//!
//! The page templates expose a fixed set of editable regions. Each is
//! registered here as a [`Binding`] — a `section.field` target tagged as
//! text or media. The view layer never mutates the document itself; at blur
//! time it emits a [`FieldEdit`] command carrying the region's rendered text
//! verbatim (no trimming, no validation, no length limit), and the session
//! controller routes it through [`commit`].
//!
//! ## Commit rule
//!
//! Commits happen only on blur, never per keystroke, which bounds document
//! writes to one per edit per field. An edit whose value equals the stored
//! one still goes through [`Document::update`] (so schema errors surface
//! deterministically) but reports [`Commit::Unchanged`], and the session
//! leaves the dirty flag alone — blurring a field you didn't change does
//! not create unsaved work.

use crate::document::{Document, DocumentError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindingError {
    #[error("invalid field path '{0}' (expected 'section.field')")]
    InvalidPath(String),
}

/// What an editable region holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Media,
}

/// One editable region of the page templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub section: &'static str,
    pub field: &'static str,
    pub kind: FieldKind,
}

impl Binding {
    const fn text(section: &'static str, field: &'static str) -> Self {
        Binding {
            section,
            field,
            kind: FieldKind::Text,
        }
    }

    const fn media(section: &'static str, field: &'static str) -> Self {
        Binding {
            section,
            field,
            kind: FieldKind::Media,
        }
    }
}

/// Every editable region, as exposed by the page templates.
pub const BINDINGS: &[Binding] = &[
    Binding::text("hero", "title1"),
    Binding::text("hero", "title2"),
    Binding::text("hero", "description"),
    Binding::media("hero", "mediaUrl"),
    Binding::media("showcase", "mainImage"),
    Binding::text("showcase", "title"),
    Binding::text("showcase", "subtitle"),
    Binding::text("showcase", "description"),
    Binding::text("sobre", "missao"),
];

/// Look up the binding for a field, if the field is editable at all.
pub fn find(section: &str, field: &str) -> Option<&'static Binding> {
    BINDINGS
        .iter()
        .find(|b| b.section == section && b.field == field)
}

pub fn is_editable(section: &str, field: &str) -> bool {
    find(section, field).is_some()
}

/// A `section.field` address, parsed from strings like `"hero.title1"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub section: String,
    pub field: String,
}

impl FromStr for FieldPath {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (section, field) = s
            .split_once('.')
            .ok_or_else(|| BindingError::InvalidPath(s.to_string()))?;
        if section.is_empty() || field.is_empty() {
            return Err(BindingError::InvalidPath(s.to_string()));
        }
        Ok(FieldPath {
            section: section.to_string(),
            field: field.to_string(),
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.field)
    }
}

/// The command an editable region emits at blur time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEdit {
    pub section: String,
    pub field: String,
    /// The region's rendered text, verbatim.
    pub value: String,
}

impl FieldEdit {
    pub fn new(
        section: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        FieldEdit {
            section: section.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Outcome of routing a [`FieldEdit`] into a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// The field changed; here is the replacement document.
    Applied(Document),
    /// The edit matched the stored value; nothing to replace.
    Unchanged,
}

/// Route an edit into the document.
///
/// Always goes through [`Document::update`], so an edit against an unknown
/// section errors whether or not the value differs.
pub fn commit(document: &Document, edit: &FieldEdit) -> Result<Commit, DocumentError> {
    let updated = document.update(&edit.section, &edit.field, edit.value.clone())?;
    if document.get(&edit.section, &edit.field) == Some(edit.value.as_str()) {
        return Ok(Commit::Unchanged);
    }
    Ok(Commit::Applied(updated))
}
