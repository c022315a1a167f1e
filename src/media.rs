//! Inline media ingestion.
//!
//! Editors replace a media field by picking a local file. Ingestion reads
//! the whole file, works out what it is from its magic bytes, and produces a
//! self-contained data URL (`data:<mime>;base64,<payload>`) that renders
//! with no external fetch. Remote URLs remain valid media values; ingestion
//! only ever adds inline ones.
//!
//! ## Classification
//!
//! Image formats are sniffed with the `image` crate's format detection;
//! MP4, WebM/Matroska, and Ogg video containers are recognized by their own
//! magic bytes. File extensions are never consulted — a misnamed file is
//! classified by what it contains. Bytes that match no known format are
//! rejected with [`MediaError::UnsupportedFormat`] before anything is
//! written, so a failed ingest always leaves the previous media value in
//! place.
//!
//! ## Size cap
//!
//! Inline media lives inside the persisted JSON document, so unbounded
//! files would quietly degrade every later load and save. Files over the
//! caller's byte limit (default [`DEFAULT_MAX_INLINE_BYTES`]) are rejected
//! with [`MediaError::TooLarge`]. The check runs against file metadata,
//! before the contents are read.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default cap on ingested file size: 8 MiB.
pub const DEFAULT_MAX_INLINE_BYTES: u64 = 8 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file is {size} bytes, over the {max} byte inline limit")]
    TooLarge { size: u64, max: u64 },
    #[error("unrecognized media format (not a supported image or video)")]
    UnsupportedFormat,
}

/// Whether a media value renders as an image or a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify any media value — inline data URL or remote URL — by
    /// prefix/substring test, the same test the rendering surface uses to
    /// pick `<video>` over `<img>`. Never inspects file extensions.
    pub fn classify(value: &str) -> MediaKind {
        if value.starts_with("data:video") || value.contains("video") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// A successfully ingested file, ready to be written into a media field.
#[derive(Debug, Clone)]
pub struct IngestedMedia {
    /// Sniffed mime type, e.g. `image/png` or `video/mp4`.
    pub mime: String,
    pub kind: MediaKind,
    /// Original file size in bytes.
    pub bytes: u64,
    /// `data:<mime>;base64,<payload>` — usable directly as a media source.
    pub data_url: String,
}

/// Read a local file and convert it into an inline media value.
///
/// Fails without side effects: on any error the caller's existing media
/// value is untouched.
pub fn ingest(path: &Path, max_bytes: u64) -> Result<IngestedMedia, MediaError> {
    let size = fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(MediaError::TooLarge {
            size,
            max: max_bytes,
        });
    }

    let bytes = fs::read(path)?;
    let (mime, kind) = sniff(&bytes).ok_or(MediaError::UnsupportedFormat)?;

    let data_url = format!("data:{mime};base64,{}", BASE64.encode(&bytes));
    Ok(IngestedMedia {
        mime: mime.to_string(),
        kind,
        bytes: size,
        data_url,
    })
}

/// Identify a payload by magic bytes. Images via the `image` crate's
/// detection, common video containers by hand.
fn sniff(bytes: &[u8]) -> Option<(&'static str, MediaKind)> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some((format.to_mime_type(), MediaKind::Image));
    }
    // ISO base media (MP4/MOV): "ftyp" brand at offset 4
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        return Some(("video/mp4", MediaKind::Video));
    }
    // EBML header: WebM / Matroska
    if bytes.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some(("video/webm", MediaKind::Video));
    }
    if bytes.starts_with(b"OggS") {
        return Some(("video/ogg", MediaKind::Video));
    }
    None
}
