//! Progress-callback trait for per-page rendering events.
//!
//! Inject an [`Arc<dyn RasterProgress>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline renders each page. Callbacks are the
//! least-invasive integration point: callers can forward events to a channel,
//! a status field in a UI, or a terminal progress bar without the library
//! knowing how the host application communicates.

use std::sync::Arc;

/// Shared progress-callback handle as stored in the config.
pub type ProgressCallback = Arc<dyn RasterProgress>;

/// Called by the conversion pipeline as it renders and stacks pages.
///
/// Implementations must be `Send + Sync`: the pipeline invokes them from a
/// blocking worker thread. All methods have default no-op implementations so
/// callers only override what they care about. Pages are rendered
/// sequentially, so `on_page_rendered` calls arrive in page order.
pub trait RasterProgress: Send + Sync {
    /// Called once after the document is opened, before any page renders.
    fn on_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each page has been rasterised (1-indexed).
    fn on_page_rendered(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called once the composite surface has been built and encoded, with
    /// its final pixel dimensions.
    fn on_complete(&self, width: u32, height: u32) {
        let _ = (width, height);
    }
}

/// A callback that ignores every event.
pub struct NoopProgress;

impl RasterProgress for NoopProgress {}
