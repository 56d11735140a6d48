//! Publication header recovery from the first page
//!
//! The first page is rendered to an image, cropped to its top half and run
//! through OCR to recover a citation-style header string. Rendering and OCR
//! are delegated to pdftoppm and tesseract subprocesses.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::{DynamicImage, GenericImageView};

use crate::config::OcrConfig;
use crate::error::{Error, Result};

/// Trait for recovering a header string from raw PDF bytes
///
/// Implementations:
/// - `OcrHeaderExtractor`: pdftoppm + tesseract
pub trait HeaderExtractor: Send + Sync {
    /// Recover the header text; any failure is an error the caller catches
    fn extract(&self, data: &[u8]) -> Result<String>;
}

/// Header extraction via first-page rasterization and OCR
pub struct OcrHeaderExtractor {
    dpi: u32,
}

impl OcrHeaderExtractor {
    /// Create an extractor from configuration
    pub fn new(config: &OcrConfig) -> Self {
        Self { dpi: config.dpi }
    }

    /// Check if pdftoppm is available
    fn has_pdftoppm() -> bool {
        Command::new("pdftoppm")
            .arg("-v")
            .output()
            .map(|_| true) // pdftoppm -v outputs to stderr, just check if command exists
            .unwrap_or(false)
    }

    /// Check if tesseract OCR is available
    fn has_tesseract() -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Render the first page to a PNG in `dir`
    fn render_first_page(&self, dir: &Path, data: &[u8]) -> Result<PathBuf> {
        let pdf_path = dir.join("input.pdf");
        std::fs::write(&pdf_path, data)?;

        let prefix = dir.join("page");
        let output = Command::new("pdftoppm")
            .args(["-png", "-r", &self.dpi.to_string(), "-f", "1", "-l", "1", "-singlefile"])
            .arg(&pdf_path)
            .arg(&prefix)
            .output()
            .map_err(|e| Error::Ocr(format!("pdftoppm failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!("pdftoppm error: {stderr}")));
        }

        let page_path = dir.join("page.png");
        if !page_path.exists() {
            return Err(Error::Ocr("pdftoppm produced no image".to_string()));
        }

        Ok(page_path)
    }

    /// Keep the top half of the page, where the citation header lives
    fn crop_top_half(image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        image.crop_imm(0, 0, width, (height / 2).max(1))
    }

    /// Run tesseract on an image file
    fn run_tesseract(path: &Path) -> Result<String> {
        let output = Command::new("tesseract")
            .arg(path)
            .args(["stdout", "-l", "eng"])
            .output()
            .map_err(|e| Error::Ocr(format!("tesseract failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!("tesseract error: {stderr}")));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl HeaderExtractor for OcrHeaderExtractor {
    fn extract(&self, data: &[u8]) -> Result<String> {
        if !Self::has_pdftoppm() || !Self::has_tesseract() {
            return Err(Error::Ocr(
                "header OCR requires pdftoppm and tesseract. Install with: apt install poppler-utils tesseract-ocr".to_string(),
            ));
        }

        let temp_dir = tempfile::tempdir()?;
        let page_path = self.render_first_page(temp_dir.path(), data)?;

        let page = image::open(&page_path)
            .map_err(|e| Error::Ocr(format!("failed to load rendered page: {e}")))?;
        let crop = Self::crop_top_half(&page);
        let crop_path = temp_dir.path().join("header.png");
        crop.save(&crop_path)
            .map_err(|e| Error::Ocr(format!("failed to save cropped page: {e}")))?;

        let text = Self::run_tesseract(&crop_path)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Ocr("no text recognized in page header".to_string()));
        }

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_keeps_the_top_half() {
        let image = DynamicImage::new_rgb8(100, 80);
        let crop = OcrHeaderExtractor::crop_top_half(&image);
        assert_eq!(crop.dimensions(), (100, 40));
    }

    #[test]
    fn crop_of_a_single_pixel_row_stays_nonempty() {
        let image = DynamicImage::new_rgb8(10, 1);
        let crop = OcrHeaderExtractor::crop_top_half(&image);
        assert_eq!(crop.dimensions(), (10, 1));
    }
}
