//! The authoritative in-memory content document.
//!
//! All editable site copy and media references live in a single nested
//! mapping: section name → field name → value. Values are plain strings;
//! media fields hold either a remote URL or an inline data URL produced by
//! the [`media`](crate::media) ingestor.
//!
//! ## The document is a value
//!
//! [`Document`] is immutable from the outside. The single mutation entry
//! point is [`Document::update`], which returns a new document with one
//! field replaced — there are no ad hoc field setters. Whether the document
//! has unsaved changes is tracked by the
//! [`EditSession`](crate::session::EditSession), never by the document
//! itself.
//!
//! ## Schema and fallback
//!
//! The section set is fixed by the page templates that consume it (`hero`,
//! `showcase`, `sobre`). [`Document::update`] rejects sections outside that
//! schema with an explicit error rather than silently dropping the write.
//!
//! A document loaded from storage passes through
//! [`Document::merged_with_defaults`] exactly once. The merge unit is the
//! **section**: a stored section that is missing, or that lacks any field
//! the default section has, is replaced wholesale by the built-in default —
//! there is no per-field merge. Sections and fields the schema does not know
//! about are preserved unchanged, so content written by a newer build
//! survives a round trip through an older one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("unknown section '{0}' (not in the default schema)")]
    UnknownSection(String),
}

/// Section names in the default schema. `update` only accepts these.
pub const SCHEMA_SECTIONS: [&str; 3] = ["hero", "showcase", "sobre"];

/// A single section: field name → value.
pub type SectionFields = BTreeMap<String, String>;

/// The content document: section name → fields.
///
/// `BTreeMap` keys keep the JSON serialization byte-stable, which is what
/// makes saving the same document twice produce identical stored bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    sections: BTreeMap<String, SectionFields>,
}

impl Document {
    /// The built-in default document — the site content shipped with the
    /// binary. Every loaded document is measured against this schema.
    pub fn default_site() -> Self {
        let mut sections = BTreeMap::new();
        sections.insert(
            "hero".to_string(),
            section(&[
                ("title1", "A Próxima Era da"),
                ("title2", "Inteligência Digital"),
                (
                    "description",
                    "Construa o futuro com infraestrutura escalável, design minimalista e \
                     performance de ponta. A plataforma definitiva para criadores e \
                     engenheiros de elite.",
                ),
                (
                    "mediaUrl",
                    "https://images.unsplash.com/photo-1639762681485-074b7f938ba0?auto=format&fit=crop&q=80&w=2832",
                ),
            ]),
        );
        sections.insert(
            "showcase".to_string(),
            section(&[
                (
                    "mainImage",
                    "https://images.unsplash.com/photo-1451187580459-43490279c0fa?auto=format&fit=crop&q=80&w=2072",
                ),
                ("title", "Dados em Tempo Real"),
                ("subtitle", "Analytics de Próxima Geração"),
                (
                    "description",
                    "Monitore cada interação com precisão cirúrgica. Nossa engine de \
                     processamento lida com bilhões de eventos diariamente.",
                ),
            ]),
        );
        sections.insert(
            "sobre".to_string(),
            section(&[(
                "missao",
                "Nascemos da necessidade de criar ferramentas que acompanhem a velocidade \
                 da luz. O Poderoso não é apenas uma empresa de tecnologia, é um \
                 laboratório de experiências futuras.",
            )]),
        );
        Document { sections }
    }

    /// Whether `name` is a section the default schema knows about.
    pub fn is_schema_section(name: &str) -> bool {
        SCHEMA_SECTIONS.contains(&name)
    }

    /// Look up a field value.
    pub fn get(&self, section: &str, field: &str) -> Option<&str> {
        self.sections.get(section)?.get(field).map(String::as_str)
    }

    /// Look up a whole section.
    pub fn section(&self, name: &str) -> Option<&SectionFields> {
        self.sections.get(name)
    }

    /// All sections in stable (sorted) order.
    pub fn sections(&self) -> impl Iterator<Item = (&String, &SectionFields)> {
        self.sections.iter()
    }

    /// Return a new document with one field replaced.
    ///
    /// The target section must exist in the default schema
    /// ([`SCHEMA_SECTIONS`]); anything else is an [`DocumentError::UnknownSection`].
    /// Fields within a known section are open — writing a field the default
    /// document doesn't have simply adds it.
    pub fn update(
        &self,
        section: &str,
        field: &str,
        value: impl Into<String>,
    ) -> Result<Document, DocumentError> {
        if !Self::is_schema_section(section) {
            return Err(DocumentError::UnknownSection(section.to_string()));
        }
        let mut next = self.clone();
        next.sections
            .entry(section.to_string())
            .or_default()
            .insert(field.to_string(), value.into());
        Ok(next)
    }

    /// One-time merge applied to a freshly loaded document.
    ///
    /// Per section of the default document: if the loaded copy is missing
    /// the section, or the section lacks any default field, the entire
    /// default section takes its place. Sections unknown to the schema pass
    /// through untouched.
    pub fn merged_with_defaults(mut self) -> Document {
        let defaults = Document::default_site();
        for (name, default_section) in defaults.sections {
            let complete = self
                .sections
                .get(&name)
                .is_some_and(|stored| default_section.keys().all(|k| stored.contains_key(k)));
            if !complete {
                self.sections.insert(name, default_section);
            }
        }
        self
    }
}

fn section(fields: &[(&str, &str)]) -> SectionFields {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
