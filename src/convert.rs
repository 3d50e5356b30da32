//! Conversion entry points.
//!
//! ## The no-throw boundary
//!
//! [`convert`] is the component boundary of the library: it always returns a
//! [`ConversionResult`], never an `Err` and never a panic. Every stage
//! failure — engine initialisation, document open, page rendering,
//! composition, encoding, preview writing — is caught here and folded into
//! `ConversionResult::error` with the original detail, so callers only ever
//! check whether `file` is populated.

use crate::config::ConversionConfig;
use crate::engine::{self, DocumentEngine};
use crate::error::ConvertError;
use crate::output::{ConversionResult, NamedFile, PreviewHandle, RasterStats, SourceDocument};
use crate::pipeline::{compose, encode, render};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Convert a document into a single stacked PNG.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// A [`ConversionResult`]. On success, `file` holds the named PNG artefact
/// (`{stem}{suffix}.png`, `image/png`), `preview` a transient displayable
/// reference, and `stats` the dimensions and timings. On failure, `error`
/// holds the rendered cause and all other fields are `None`.
pub async fn convert(source: &SourceDocument, config: &ConversionConfig) -> ConversionResult {
    match run_pipeline(source, config).await {
        Ok(result) => result,
        Err(e) => {
            warn!("conversion of '{}' failed: {e}", source.name());
            ConversionResult::failure(format!("failed to convert '{}': {e}", source.name()))
        }
    }
}

/// Read a document from disk and convert it.
///
/// Read errors are reported the same way as pipeline errors: through the
/// result's `error` field.
pub async fn convert_file(path: impl AsRef<Path>, config: &ConversionConfig) -> ConversionResult {
    let path = path.as_ref();
    match SourceDocument::from_file(path).await {
        Ok(source) => convert(&source, config).await,
        Err(e) => {
            warn!("could not read '{}': {e}", path.display());
            ConversionResult::failure(format!("failed to convert '{}': {e}", path.display()))
        }
    }
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(source: &SourceDocument, config: &ConversionConfig) -> ConversionResult {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(convert(source, config)),
        Err(e) => ConversionResult::failure(format!(
            "failed to convert '{}': could not create tokio runtime: {e}",
            source.name()
        )),
    }
}

// ── Internal pipeline ────────────────────────────────────────────────────

async fn run_pipeline(
    source: &SourceDocument,
    config: &ConversionConfig,
) -> Result<ConversionResult, ConvertError> {
    let total_start = Instant::now();
    info!("starting conversion: {}", source.name());

    // ── Step 1: resolve engine ───────────────────────────────────────────
    let engine = resolve_engine(config).await?;

    // ── Step 2: rasterise pages ──────────────────────────────────────────
    let render_start = Instant::now();
    let pages = render::render_document(
        engine,
        source.shared_bytes(),
        config.scale,
        config.progress.clone(),
    )
    .await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    let page_count = pages.len();
    info!("rendered {page_count} pages in {render_duration_ms}ms");

    // ── Step 3: composite and encode ─────────────────────────────────────
    // Stacking copies every page's pixels and PNG encoding compresses the
    // whole surface — both CPU-bound, so they run off the async threads.
    let encode_start = Instant::now();
    let (png, width, height) = tokio::task::spawn_blocking(move || {
        let surface = compose::stack_pages(&pages)?;
        let png = encode::encode_png(&surface)?;
        Ok::<_, ConvertError>((png, surface.width(), surface.height()))
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("compose task panicked: {e}")))??;
    let encode_duration_ms = encode_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress {
        cb.on_complete(width, height);
    }

    // ── Step 4: build artefacts ──────────────────────────────────────────
    let preview = PreviewHandle::write(&png)?;
    let name = encode::output_file_name(source.name(), &config.output_suffix);

    let stats = RasterStats {
        page_count,
        width,
        height,
        png_bytes: png.len() as u64,
        render_duration_ms,
        encode_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "conversion complete: {page_count} pages → {width}x{height} px, {} bytes, {}ms total",
        stats.png_bytes, stats.total_duration_ms
    );

    Ok(ConversionResult {
        preview: Some(preview),
        file: Some(NamedFile {
            name,
            content_type: "image/png".to_string(),
            bytes: png,
        }),
        stats: Some(stats),
        error: None,
    })
}

/// Resolve the rendering engine, from most-specific to least-specific.
///
/// 1. **Pre-built engine** (`config.engine`) — the caller supplied a backend
///    directly. Useful in tests or for non-pdfium backends.
/// 2. **Process-wide singleton** — the shared pdfium engine, bound lazily on
///    first use.
async fn resolve_engine(config: &ConversionConfig) -> Result<Arc<dyn DocumentEngine>, ConvertError> {
    if let Some(ref engine) = config.engine {
        return Ok(Arc::clone(engine));
    }
    let shared = engine::shared_engine().await?;
    Ok(shared)
}
