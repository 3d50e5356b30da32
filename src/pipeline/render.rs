//! Page rasterisation: render every page to an RGBA surface via the engine.
//!
//! ## Why spawn_blocking?
//!
//! The pdfium backend wraps a C++ library that uses thread-local state
//! internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a thread designed for
//! blocking operations, keeping the async worker threads responsive during
//! CPU-heavy rendering.
//!
//! ## Why sequential pages?
//!
//! Rendering pages one at a time bounds peak memory to roughly one page
//! surface beyond the accumulating output and guarantees the output vector
//! is already in page order for the compositor.

use crate::engine::DocumentEngine;
use crate::error::ConvertError;
use crate::progress::RasterProgress;
use image::RgbaImage;
use std::sync::Arc;
use tracing::{debug, info};

/// One rasterised page: the 0-based page index and its pixel surface.
#[derive(Debug)]
pub struct PageRaster {
    pub index: usize,
    pub image: RgbaImage,
}

impl PageRaster {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Open `bytes` with `engine` and rasterise every page at `scale`.
///
/// Runs inside `spawn_blocking`; from the caller's point of view the whole
/// document renders in one awaited step. Any page failure aborts the
/// conversion — no partial output.
pub async fn render_document(
    engine: Arc<dyn DocumentEngine>,
    bytes: Arc<[u8]>,
    scale: f32,
    progress: Option<Arc<dyn RasterProgress>>,
) -> Result<Vec<PageRaster>, ConvertError> {
    tokio::task::spawn_blocking(move || {
        render_document_blocking(engine.as_ref(), &bytes, scale, progress.as_deref())
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("render task panicked: {e}")))?
}

/// Blocking implementation of document rendering.
fn render_document_blocking(
    engine: &dyn DocumentEngine,
    bytes: &[u8],
    scale: f32,
    progress: Option<&dyn RasterProgress>,
) -> Result<Vec<PageRaster>, ConvertError> {
    let document = engine.open(bytes)?;
    let total = document.page_count();
    info!("document opened: {total} pages");

    if let Some(p) = progress {
        p.on_start(total);
    }

    let mut pages = Vec::with_capacity(total);
    for index in 0..total {
        let image = document.render_page(index, scale)?;
        debug!(
            "rendered page {} → {}x{} px",
            index + 1,
            image.width(),
            image.height()
        );
        if let Some(p) = progress {
            p.on_page_rendered(index + 1, total);
        }
        pages.push(PageRaster { index, image });
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Document;
    use image::Rgba;
    use std::sync::Mutex;

    struct TwoPageEngine;

    struct TwoPageDocument;

    impl DocumentEngine for TwoPageEngine {
        fn open<'a>(&'a self, _bytes: &'a [u8]) -> Result<Box<dyn Document + 'a>, ConvertError> {
            Ok(Box::new(TwoPageDocument))
        }
    }

    impl Document for TwoPageDocument {
        fn page_count(&self) -> usize {
            2
        }

        fn render_page(&self, index: usize, scale: f32) -> Result<RgbaImage, ConvertError> {
            let side = ((index as f32 + 1.0) * 10.0 * scale).round() as u32;
            Ok(RgbaImage::from_pixel(side, side, Rgba([0, 0, 0, 255])))
        }
    }

    struct EventLog {
        events: Mutex<Vec<String>>,
    }

    impl RasterProgress for EventLog {
        fn on_start(&self, total: usize) {
            self.events.lock().unwrap().push(format!("start {total}"));
        }
        fn on_page_rendered(&self, page: usize, total: usize) {
            self.events.lock().unwrap().push(format!("page {page}/{total}"));
        }
    }

    #[tokio::test]
    async fn renders_pages_in_order_with_progress_events() {
        let log = Arc::new(EventLog {
            events: Mutex::new(Vec::new()),
        });

        let pages = render_document(
            Arc::new(TwoPageEngine),
            Arc::from(&b"ignored"[..]),
            2.0,
            Some(Arc::clone(&log) as Arc<dyn RasterProgress>),
        )
        .await
        .expect("render should succeed");

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].index, 0);
        assert_eq!(pages[0].width(), 20);
        assert_eq!(pages[1].index, 1);
        assert_eq!(pages[1].width(), 40);

        let events = log.events.lock().unwrap().clone();
        assert_eq!(events, vec!["start 2", "page 1/2", "page 2/2"]);
    }
}
