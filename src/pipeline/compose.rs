//! Composition: stack per-page surfaces into one tall composite.
//!
//! The composite is exactly `max(page widths)` wide and `Σ(page heights)`
//! tall. Pages are drawn left-aligned at increasing vertical offsets in the
//! order they were rendered, so page 1 sits at the top. No scaling happens
//! here — pages were already rendered at their final size.

use crate::error::ConvertError;
use crate::pipeline::render::PageRaster;
use image::{imageops, RgbaImage};
use tracing::debug;

/// Stack rendered pages vertically into a single surface.
///
/// The surface starts fully transparent; pages narrower than the widest page
/// leave a transparent margin on their right. A document with no pages is a
/// conversion failure, not an empty success.
pub fn stack_pages(pages: &[PageRaster]) -> Result<RgbaImage, ConvertError> {
    if pages.is_empty() {
        return Err(ConvertError::EmptyDocument);
    }

    let width = pages.iter().map(PageRaster::width).max().unwrap_or(0);
    let total_height: u64 = pages.iter().map(|p| u64::from(p.height())).sum();

    if total_height > u64::from(u32::MAX) {
        return Err(ConvertError::OversizedComposite {
            width: u64::from(width),
            height: total_height,
        });
    }

    let mut surface = RgbaImage::new(width, total_height as u32);

    let mut y_offset: i64 = 0;
    for page in pages {
        imageops::replace(&mut surface, &page.image, 0, y_offset);
        y_offset += i64::from(page.height());
    }

    debug!(
        "composited {} pages into {}x{} surface",
        pages.len(),
        width,
        total_height
    );

    Ok(surface)
}
