//! # pagestack
//!
//! Stack every page of a PDF into a single tall PNG.
//!
//! ## Why this crate?
//!
//! Preview pipelines often need one image per document, not one per page: a
//! single `<img>` tag, a single upload, a single thumbnail source. pagestack
//! rasterises each page at a fixed scale and stacks the results vertically —
//! page 1 on top — producing one lossless PNG plus a ready-to-upload file
//! artefact named after the source (`resume.pdf` → `resume-allpages.png`).
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Engine   bind pdfium once per process (lazy, shared)
//!  ├─ 2. Render   rasterise pages sequentially at 2.5× (spawn_blocking)
//!  ├─ 3. Compose  stack surfaces: width = max, height = sum
//!  ├─ 4. Encode   composite → lossless PNG
//!  └─ 5. Output   named artefact + transient preview handle + stats
//! ```
//!
//! Failures at any stage never escape [`convert`]: the result's `error` field
//! carries the cause and `file` stays `None`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagestack::{convert, ConversionConfig, SourceDocument};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = SourceDocument::from_file("resume.pdf").await.unwrap();
//!     let result = convert(&source, &ConversionConfig::default()).await;
//!
//!     match result.file {
//!         Some(file) => {
//!             println!("{} ({} bytes)", file.name, file.len());
//!             // result.preview holds a transient file:// reference; it is
//!             // deleted when dropped or explicitly revoked.
//!         }
//!         None => eprintln!("{}", result.error.unwrap_or_default()),
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pagestack` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pagestack = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_SCALE, DEFAULT_SUFFIX};
pub use convert::{convert, convert_file, convert_sync};
pub use engine::{shared_engine, Document, DocumentEngine, EngineCell, PdfiumEngine};
pub use error::ConvertError;
pub use output::{
    ConversionResult, ConversionSummary, NamedFile, PreviewHandle, RasterStats, SourceDocument,
};
pub use progress::{NoopProgress, ProgressCallback, RasterProgress};
