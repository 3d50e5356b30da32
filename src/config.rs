//! Configuration for the stacking conversion.
//!
//! All behaviour is controlled through [`ConversionConfig`], built via its
//! [`ConversionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across conversions and to diff two runs.

use crate::engine::DocumentEngine;
use crate::error::ConvertError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Default render scale factor.
///
/// 2.5× the page's point size keeps résumé-sized text crisp in the stacked
/// preview without ballooning the PNG for typical page counts.
pub const DEFAULT_SCALE: f32 = 2.5;

/// Default suffix appended to the source file stem for the output artefact.
pub const DEFAULT_SUFFIX: &str = "-allpages";

/// Configuration for a stacking conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pagestack::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .scale(2.5)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Render scale applied to each page's point size. Default: 2.5.
    ///
    /// Every page is rasterised at this factor and composited without further
    /// scaling, so the composite is exactly as sharp as the per-page renders.
    pub scale: f32,

    /// Suffix inserted between the source file stem and `.png` in the output
    /// artefact name. Default: `-allpages`.
    pub output_suffix: String,

    /// Pre-constructed rendering engine. Takes precedence over the
    /// process-wide pdfium singleton — useful in tests and for alternative
    /// backends.
    pub engine: Option<Arc<dyn DocumentEngine>>,

    /// Progress callback invoked as pages are rendered.
    pub progress: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            output_suffix: DEFAULT_SUFFIX.to_string(),
            engine: None,
            progress: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("scale", &self.scale)
            .field("output_suffix", &self.output_suffix)
            .field("engine", &self.engine.as_ref().map(|_| "<dyn DocumentEngine>"))
            .field("progress", &self.progress.as_ref().map(|_| "<dyn RasterProgress>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn scale(mut self, scale: f32) -> Self {
        self.config.scale = scale;
        self
    }

    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.output_suffix = suffix.into();
        self
    }

    pub fn engine(mut self, engine: Arc<dyn DocumentEngine>) -> Self {
        self.config.engine = Some(engine);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if !c.scale.is_finite() || c.scale <= 0.0 {
            return Err(ConvertError::InvalidConfig(format!(
                "scale must be a positive finite number, got {}",
                c.scale
            )));
        }
        if c.scale > 10.0 {
            return Err(ConvertError::InvalidConfig(format!(
                "scale must be ≤ 10, got {} (larger factors exhaust memory on long documents)",
                c.scale
            )));
        }
        Ok(self.config)
    }
}
