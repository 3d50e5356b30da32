//! Input and output artefact types.
//!
//! A conversion takes one [`SourceDocument`] and produces a
//! [`ConversionResult`] carrying the named PNG artefact, a transient
//! [`PreviewHandle`], and timing [`RasterStats`]. Success is signalled solely
//! by `file` being populated; on failure `error` holds the rendered cause and
//! every other field is empty.

use crate::error::ConvertError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempPath;

/// An immutable, caller-owned document buffer plus its file name.
///
/// The bytes are reference-counted so the pipeline can hand them to a
/// blocking worker thread without copying the document.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    name: String,
    bytes: Arc<[u8]>,
}

impl SourceDocument {
    /// Wrap an in-memory buffer with its original file name.
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a document from disk, taking the name from the path's file name.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ConvertError::SourceRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        Ok(Self::new(name, bytes))
    }

    /// The original file name, extension included.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }
}

/// A byte buffer paired with a file name and content type, ready for upload
/// or download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFile {
    /// Derived output name, e.g. `resume-allpages.png`.
    pub name: String,
    /// Always `image/png` for composite artefacts.
    pub content_type: String,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

impl NamedFile {
    /// Size of the encoded payload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Render the artefact as a `data:` URI, embeddable directly as an
    /// `<img src>` without any file handle to manage.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

/// A transient, displayable reference to the composite image.
///
/// The PNG is written to a temporary file whose lifetime is tied to this
/// handle: dropping it (or calling [`PreviewHandle::revoke`]) deletes the
/// file. Callers that need a preview beyond the handle's lifetime should copy
/// the bytes out of the [`NamedFile`] instead.
#[derive(Debug)]
pub struct PreviewHandle {
    path: TempPath,
}

impl PreviewHandle {
    pub(crate) fn write(png: &[u8]) -> Result<Self, ConvertError> {
        let mut file = tempfile::Builder::new()
            .prefix("pagestack-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| ConvertError::PreviewWrite {
                path: std::env::temp_dir(),
                source: e,
            })?;
        file.write_all(png).map_err(|e| ConvertError::PreviewWrite {
            path: file.path().to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    /// Filesystem path of the preview image.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `file://` URI for the preview image.
    pub fn file_uri(&self) -> String {
        format!("file://{}", self.path.display())
    }

    /// Explicitly release the preview, deleting the underlying file.
    ///
    /// Dropping the handle has the same effect; `revoke` surfaces the
    /// deletion error instead of swallowing it.
    pub fn revoke(self) -> std::io::Result<()> {
        self.path.close()
    }
}

/// Timing and dimension statistics for a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterStats {
    /// Number of pages rendered and stacked.
    pub page_count: usize,
    /// Composite width: the maximum page width.
    pub width: u32,
    /// Composite height: the sum of all page heights.
    pub height: u32,
    /// Size of the encoded PNG in bytes.
    pub png_bytes: u64,
    /// Wall-clock time spent rasterising pages.
    pub render_duration_ms: u64,
    /// Wall-clock time spent compositing and encoding.
    pub encode_duration_ms: u64,
    /// End-to-end conversion time.
    pub total_duration_ms: u64,
}

/// The outcome of a conversion. Never an `Err`: failures are folded into
/// [`ConversionResult::error`].
///
/// Callers distinguish success from failure solely by whether `file` is
/// populated ([`ConversionResult::is_success`]).
#[derive(Debug)]
pub struct ConversionResult {
    /// Transient displayable reference; `None` on failure.
    pub preview: Option<PreviewHandle>,
    /// Named PNG artefact; `None` on failure.
    pub file: Option<NamedFile>,
    /// Timing statistics; `None` on failure.
    pub stats: Option<RasterStats>,
    /// Rendered failure cause; `None` on success.
    pub error: Option<String>,
}

impl ConversionResult {
    /// Whether the conversion produced an artefact.
    pub fn is_success(&self) -> bool {
        self.file.is_some()
    }

    pub(crate) fn failure(message: String) -> Self {
        Self {
            preview: None,
            file: None,
            stats: None,
            error: Some(message),
        }
    }
}

/// Serialisable summary of a successful conversion, as emitted by the CLI's
/// `--json` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionSummary {
    /// Output artefact name.
    pub file_name: String,
    /// Output content type.
    pub content_type: String,
    pub stats: RasterStats,
}

impl ConversionSummary {
    /// Build a summary from a successful result, or `None` for failures.
    pub fn from_result(result: &ConversionResult) -> Option<Self> {
        let file = result.file.as_ref()?;
        let stats = result.stats.as_ref()?;
        Some(Self {
            file_name: file.name.clone(),
            content_type: file.content_type.clone(),
            stats: stats.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_carries_content_type() {
        let file = NamedFile {
            name: "resume-allpages.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        };
        let uri = file.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"), "got: {uri}");
        assert_eq!(uri, format!("data:image/png;base64,{}", STANDARD.encode([1u8, 2, 3])));
    }

    #[test]
    fn preview_file_exists_until_revoked() {
        let preview = PreviewHandle::write(b"not a real png").expect("write preview");
        let path: PathBuf = preview.path().to_path_buf();
        assert!(path.exists());
        assert!(preview.file_uri().starts_with("file://"));

        preview.revoke().expect("revoke should delete the file");
        assert!(!path.exists());
    }

    #[test]
    fn preview_file_deleted_on_drop() {
        let preview = PreviewHandle::write(b"bytes").expect("write preview");
        let path = preview.path().to_path_buf();
        drop(preview);
        assert!(!path.exists());
    }

    #[test]
    fn failure_result_has_no_artefacts() {
        let result = ConversionResult::failure("boom".into());
        assert!(!result.is_success());
        assert!(result.preview.is_none());
        assert!(result.file.is_none());
        assert!(result.stats.is_none());
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert!(ConversionSummary::from_result(&result).is_none());
    }

    #[tokio::test]
    async fn from_file_takes_the_file_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("resume.pdf");
        tokio::fs::write(&path, b"%PDF-fake").await.expect("write");

        let source = SourceDocument::from_file(&path).await.expect("read");
        assert_eq!(source.name(), "resume.pdf");
        assert_eq!(source.bytes(), b"%PDF-fake");
    }

    #[tokio::test]
    async fn from_file_missing_path_is_source_read_error() {
        let err = SourceDocument::from_file("/definitely/not/here.pdf").await;
        assert!(matches!(err, Err(ConvertError::SourceRead { .. })));
    }
}
