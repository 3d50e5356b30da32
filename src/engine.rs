//! Rendering-engine capability interface and the process-wide pdfium backend.
//!
//! The pipeline never talks to pdfium directly. It goes through the
//! [`DocumentEngine`] / [`Document`] traits so the composition logic works
//! against any conforming backend — the production pdfium binding here, or a
//! mock engine in tests.
//!
//! ## One binding per process
//!
//! Loading the pdfium shared library is expensive and must happen at most
//! once per process. [`EngineCell`] guards that: the first caller runs the
//! binding, concurrent callers await the same in-flight attempt, and every
//! later caller gets the cached handle immediately.
//!
//! ## Failure policy
//!
//! A failed binding is **not** cached. The caller whose attempt ran observes
//! the error; queued and subsequent callers run a fresh attempt. This means a
//! transient failure (say, the library file appearing a moment later) does not
//! poison the process. The policy is covered by tests below.

use crate::error::ConvertError;
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// A paginated-document rendering backend.
///
/// Implementations must be `Send + Sync`: the conversion pipeline moves the
/// engine into `spawn_blocking` tasks and shares it across conversions.
pub trait DocumentEngine: Send + Sync {
    /// Open a document from an in-memory byte buffer.
    ///
    /// The returned handle borrows both the engine and the buffer; all page
    /// access happens through it and ends before the buffer is released.
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn Document + 'a>, ConvertError>;
}

/// An open document handle.
pub trait Document {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Rasterise one page (0-indexed) at the given scale factor into an RGBA
    /// surface whose dimensions are the page size at that scale.
    fn render_page(&self, index: usize, scale: f32) -> Result<RgbaImage, ConvertError>;
}

// ── Initialise-exactly-once cell ─────────────────────────────────────────

/// Lazily initialised, shareable engine slot.
///
/// Wraps [`tokio::sync::OnceCell`]: concurrent first-time callers of
/// [`EngineCell::get_or_bind`] share one in-flight initialisation rather than
/// racing duplicate loads. A successful bind is cached for the lifetime of
/// the cell; a failed bind is not (see the module docs for the retry policy).
pub struct EngineCell<E> {
    cell: OnceCell<Arc<E>>,
}

impl<E> EngineCell<E> {
    /// Create an empty cell. `const` so it can back a `static`.
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    /// Get the cached engine, or run `bind` to initialise it.
    ///
    /// At most one `bind` future runs at a time; callers arriving while one
    /// is in flight wait for its outcome instead of starting their own.
    pub async fn get_or_bind<F, Fut>(&self, bind: F) -> Result<Arc<E>, ConvertError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<E, ConvertError>>,
    {
        let engine = self
            .cell
            .get_or_try_init(|| async { bind().await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(engine))
    }
}

impl<E> Default for EngineCell<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ── pdfium backend ───────────────────────────────────────────────────────

static SHARED_PDFIUM: EngineCell<PdfiumEngine> = EngineCell::new();

/// Acquire the process-wide pdfium engine, binding it on first use.
///
/// The bind runs in `spawn_blocking` — dynamic-library loading and pdfium
/// initialisation are blocking operations that must not stall the async
/// executor.
pub async fn shared_engine() -> Result<Arc<PdfiumEngine>, ConvertError> {
    SHARED_PDFIUM
        .get_or_bind(|| async {
            tokio::task::spawn_blocking(PdfiumEngine::bind)
                .await
                .map_err(|e| ConvertError::Internal(format!("engine bind task panicked: {e}")))?
        })
        .await
}

/// The production [`DocumentEngine`] backed by pdfium.
///
/// Thread safety comes from the `sync` feature of `pdfium-render`: it makes
/// `Pdfium` itself `Send + Sync` and (via `thread_safe`, which it implies)
/// serialises all calls into the underlying C++ library.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    /// Bind to the pdfium shared library.
    ///
    /// Resolution order: the `PDFIUM_LIB_PATH` environment variable, then the
    /// platform system library.
    pub fn bind() -> Result<Self, ConvertError> {
        let bindings = match std::env::var("PDFIUM_LIB_PATH") {
            Ok(path) if !path.is_empty() => {
                debug!("binding pdfium from PDFIUM_LIB_PATH={path}");
                Pdfium::bind_to_library(&path)
            }
            _ => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| ConvertError::EngineInit(format!("{e:?}")))?;

        info!("pdfium engine bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl DocumentEngine for PdfiumEngine {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn Document + 'a>, ConvertError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| ConvertError::OpenFailed {
                detail: format!("{e:?}"),
            })?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl Document for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<RgbaImage, ConvertError> {
        let page =
            self.document
                .pages()
                .get(index as u16)
                .map_err(|e| ConvertError::PageRender {
                    page: index + 1,
                    detail: format!("{e:?}"),
                })?;

        // Page size is in PDF points (1/72 inch); the scale factor maps
        // points directly to pixels, matching a 2D-canvas viewport at that
        // scale. Guard against degenerate zero-point pages.
        let width = (page.width().value * scale).round().max(1.0) as i32;
        let height = (page.height().value * scale).round().max(1.0) as i32;

        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width)
                    .set_target_height(height),
            )
            .map_err(|e| ConvertError::PageRender {
                page: index + 1,
                detail: format!("{e:?}"),
            })?;

        Ok(bitmap.as_image().into_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter;

    // The shared engine is held in a static and moved into spawn_blocking
    // tasks, which needs Pdfium's Send + Sync impls from the `sync` feature.
    #[test]
    fn pdfium_engine_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PdfiumEngine>();
        assert_send_sync::<Arc<PdfiumEngine>>();
    }

    #[test]
    fn bind_runs_once_for_sequential_callers() {
        let cell: EngineCell<Counter> = EngineCell::new();
        let binds = AtomicUsize::new(0);

        tokio_test::block_on(async {
            for _ in 0..3 {
                cell.get_or_bind(|| async {
                    binds.fetch_add(1, Ordering::SeqCst);
                    Ok(Counter)
                })
                .await
                .expect("bind should succeed");
            }
        });

        assert_eq!(binds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_bind_is_not_cached() {
        let cell: EngineCell<Counter> = EngineCell::new();
        let binds = AtomicUsize::new(0);

        tokio_test::block_on(async {
            let first = cell
                .get_or_bind(|| async {
                    binds.fetch_add(1, Ordering::SeqCst);
                    Err(ConvertError::EngineInit("library missing".into()))
                })
                .await;
            assert!(first.is_err(), "first bind must report the failure");

            // A later call must get a fresh attempt, not the cached failure.
            cell.get_or_bind(|| async {
                binds.fetch_add(1, Ordering::SeqCst);
                Ok(Counter)
            })
            .await
            .expect("retry after failure should succeed");
        });

        assert_eq!(binds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn success_is_shared_after_failure_recovery() {
        let cell: EngineCell<Counter> = EngineCell::new();
        let binds = AtomicUsize::new(0);

        tokio_test::block_on(async {
            let _ = cell
                .get_or_bind(|| async { Err(ConvertError::EngineInit("boom".into())) })
                .await;

            for _ in 0..5 {
                cell.get_or_bind(|| async {
                    binds.fetch_add(1, Ordering::SeqCst);
                    Ok(Counter)
                })
                .await
                .expect("bind should succeed");
            }
        });

        assert_eq!(binds.load(Ordering::SeqCst), 1);
    }
}
