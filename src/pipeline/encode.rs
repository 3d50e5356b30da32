//! Encoding: composite surface → PNG bytes, plus artefact-name derivation.
//!
//! PNG is chosen over JPEG because it is lossless: the composite is mostly
//! rendered text, where compression artefacts are immediately visible.

use crate::error::ConvertError;
use image::RgbaImage;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Cursor;
use tracing::debug;

/// Trailing `.pdf` extension, matched case-insensitively.
static PDF_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.pdf$").expect("extension pattern is valid"));

/// Serialise the composite surface to PNG bytes.
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Vec::new();
    surface
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ConvertError::Encoding(e.to_string()))?;
    debug!("encoded composite → {} bytes", buf.len());
    Ok(buf)
}

/// Derive the output artefact name from the source file name.
///
/// A trailing `.pdf` is stripped case-insensitively; any other extension is
/// kept as part of the stem. `resume.pdf` → `resume-allpages.png`,
/// `Q3 Report.PDF` → `Q3 Report-allpages.png`.
pub fn output_file_name(source_name: &str, suffix: &str) -> String {
    let stem = PDF_EXTENSION.replace(source_name, "");
    format!("{stem}{suffix}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn strips_lowercase_pdf_extension() {
        assert_eq!(
            output_file_name("resume.pdf", "-allpages"),
            "resume-allpages.png"
        );
    }

    #[test]
    fn strips_uppercase_and_mixed_case_extensions() {
        assert_eq!(
            output_file_name("Q3 Report.PDF", "-allpages"),
            "Q3 Report-allpages.png"
        );
        assert_eq!(
            output_file_name("cover-letter.PdF", "-allpages"),
            "cover-letter-allpages.png"
        );
    }

    #[test]
    fn keeps_non_pdf_extensions_in_the_stem() {
        assert_eq!(
            output_file_name("archive.tar", "-allpages"),
            "archive.tar-allpages.png"
        );
        assert_eq!(output_file_name("resume", "-allpages"), "resume-allpages.png");
    }

    #[test]
    fn only_the_trailing_extension_is_stripped() {
        assert_eq!(
            output_file_name("my.pdf.backup.pdf", "-allpages"),
            "my.pdf.backup-allpages.png"
        );
    }

    #[test]
    fn encode_small_surface_round_trips() {
        let surface = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let png = encode_png(&surface).expect("encode should succeed");
        assert!(!png.is_empty());
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).expect("valid PNG").into_rgba8();
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
        assert_eq!(decoded.get_pixel(5, 5).0, [255, 0, 0, 255]);
    }

    #[test]
    fn encoding_is_deterministic() {
        let surface = RgbaImage::from_pixel(32, 16, Rgba([10, 20, 30, 255]));
        let a = encode_png(&surface).expect("encode");
        let b = encode_png(&surface).expect("encode");
        assert_eq!(a, b);
    }
}
