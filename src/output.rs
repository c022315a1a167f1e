//! CLI output formatting.
//!
//! The document display is information-centric: the primary line for each
//! entry is its semantic identity (section, field), with the value shown as
//! readable context. Inline data URLs are summarized — a multi-megabyte
//! base64 payload on the terminal helps nobody — while remote URLs and text
//! appear as-is, long text truncated to a preview.
//!
//! ```text
//! hero
//!     description: Construa o futuro com infraestrutura escalável, design…
//!     mediaUrl: https://images.unsplash.com/photo-1639762681485-074b7f93…
//!     title1: A Próxima Era da
//!     title2: Inteligência Digital
//!
//! showcase
//!     mainImage: inline image/png (12.4 KiB)
//!     ...
//! ```
//!
//! Session events format to one line each, in the order they happened,
//! which is how the CLI narrates an edit-and-save run.

use crate::document::Document;
use crate::media::MediaKind;
use crate::session::SessionEvent;

/// Longest value preview before truncation.
const VALUE_PREVIEW_LEN: usize = 70;

/// Format the whole document as indented section/field lines.
pub fn format_document(document: &Document) -> Vec<String> {
    let mut lines = Vec::new();
    let mut first = true;
    for (name, fields) in document.sections() {
        if !first {
            lines.push(String::new());
        }
        first = false;
        lines.push(name.clone());
        for (field, value) in fields {
            lines.push(format!("    {field}: {}", summarize_value(value)));
        }
    }
    lines
}

/// One-line rendering of a session event.
pub fn format_session_event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::AdminToggled { enabled: true } => {
            "admin mode: on — fields are editable".to_string()
        }
        SessionEvent::AdminToggled { enabled: false } => "admin mode: off".to_string(),
        SessionEvent::FieldCommitted { section, field } => {
            format!("{section}.{field}: committed")
        }
        SessionEvent::FieldUnchanged { section, field } => {
            format!("{section}.{field}: unchanged")
        }
        SessionEvent::MediaReplaced {
            section,
            field,
            mime,
            bytes,
        } => format!(
            "{section}.{field}: media replaced ({mime}, {})",
            human_size(*bytes)
        ),
        SessionEvent::MediaRejected {
            section,
            field,
            reason,
        } => format!("{section}.{field}: media rejected — {reason}"),
        SessionEvent::SavePending => "save: pending…".to_string(),
        SessionEvent::SaveSettled { written: true } => "save: settled (written)".to_string(),
        SessionEvent::SaveSettled { written: false } => {
            "save: settled (store already up to date)".to_string()
        }
        SessionEvent::SaveFailed { reason } => format!("save: FAILED — {reason}"),
    }
}

/// Render a field value for the terminal. Inline media collapses to a
/// mime + size summary; everything else is previewed.
fn summarize_value(value: &str) -> String {
    if value.starts_with("data:") {
        let mime = match MediaKind::classify(value) {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
        };
        let full_mime = value[5..].split(';').next().filter(|m| !m.is_empty());
        return format!(
            "inline {} ({})",
            full_mime.unwrap_or(mime),
            human_size(value.len() as u64)
        );
    }
    truncate(value)
}

fn truncate(value: &str) -> String {
    let mut chars = value.chars();
    let preview: String = chars.by_ref().take(VALUE_PREVIEW_LEN).collect();
    if chars.next().is_some() {
        format!("{preview}…")
    } else {
        preview
    }
}

/// Human-readable byte size: `512 B`, `12.4 KiB`, `3.1 MiB`.
pub fn human_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    let b = bytes as f64;
    if b >= MIB {
        format!("{:.1} MiB", b / MIB)
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{bytes} B")
    }
}
