//! Pipeline stages for the stacking conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap the rendering
//! backend without touching composition or encoding.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ render ──▶ compose ──▶ encode
//! (PDF)    (engine)   (stacking)  (PNG + name)
//! ```
//!
//! 1. [`render`]  — rasterise every page sequentially via the engine; runs in
//!    `spawn_blocking` because the engine is CPU-bound and not async-safe
//! 2. [`compose`] — stack the per-page surfaces into one composite, page 1
//!    topmost
//! 3. [`encode`]  — PNG-encode the composite and derive the artefact name

pub mod compose;
pub mod encode;
pub mod render;
