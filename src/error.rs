//! Error types for the pagestack library.
//!
//! Every stage of the pipeline reports its failure through [`ConvertError`],
//! and [`crate::convert`] catches all of them at the conversion boundary:
//! callers of `convert` always receive a [`crate::ConversionResult`] whose
//! `error` field carries the rendered message, never an `Err` or a panic.
//!
//! The variants follow the pipeline stages: engine initialisation, document
//! open, per-page rasterisation, composition, encoding, and preview-artefact
//! writing. A single page failure aborts the whole conversion — a half-stacked
//! preview image is worse than a clear error.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the pagestack pipeline.
///
/// These never cross the [`crate::convert`] boundary; they are folded into
/// [`crate::ConversionResult::error`] there. The typed form is visible to
/// code that drives individual stages (and to tests).
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Engine errors ─────────────────────────────────────────────────────
    /// The rendering engine library could not be loaded or initialised.
    #[error(
        "rendering engine failed to initialise: {0}\n\
         Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium as a system library."
    )]
    EngineInit(String),

    /// The byte buffer is not a document the engine can open.
    #[error("document could not be opened: {detail}")]
    OpenFailed { detail: String },

    // ── Pipeline errors ───────────────────────────────────────────────────
    /// Rasterisation failed for a specific page (1-indexed).
    #[error("rasterisation failed for page {page}: {detail}")]
    PageRender { page: usize, detail: String },

    /// The document has no pages, so there is nothing to composite.
    #[error("document has no pages to composite")]
    EmptyDocument,

    /// The stacked surface would exceed the supported pixel range.
    #[error("composite surface {width}×{height} exceeds the supported pixel range")]
    OversizedComposite { width: u64, height: u64 },

    /// The composite surface could not be serialised to PNG bytes.
    #[error("failed to encode composite image: {0}")]
    Encoding(String),

    /// The preview artefact could not be written to disk.
    #[error("failed to write preview image '{}': {source}", path.display())]
    PreviewWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Input / config errors ─────────────────────────────────────────────
    /// The source file could not be read.
    #[error("failed to read source document '{}': {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a blocking task panicked).
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_render_display() {
        let e = ConvertError::PageRender {
            page: 2,
            detail: "bitmap allocation failed".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 2"), "got: {msg}");
        assert!(msg.contains("bitmap allocation failed"));
    }

    #[test]
    fn oversized_composite_display() {
        let e = ConvertError::OversizedComposite {
            width: 2000,
            height: 5_000_000_000,
        };
        assert!(e.to_string().contains("2000×5000000000"));
    }

    #[test]
    fn empty_document_display() {
        assert!(ConvertError::EmptyDocument.to_string().contains("no pages"));
    }

    #[test]
    fn engine_init_mentions_override_var() {
        let e = ConvertError::EngineInit("library not found".into());
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
    }
}
