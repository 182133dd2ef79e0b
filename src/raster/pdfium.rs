//! PDF page rasterization through Google PDFium.
//!
//! `Pdfium` is bound and the document parsed once per scan: the handle is
//! `!Send`, so it lives on the calling thread for the whole page loop.

use super::{PageRasterizer, PageSource};
use crate::error::{Result, ScanError};
use crate::surface::encode_png;
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_path: Option<PathBuf>,
}

impl PdfiumRasterizer {
    /// `library_path` is tried first when set; see [`load_pdfium`] for the
    /// rest of the search order.
    pub fn new(library_path: Option<PathBuf>) -> Self {
        Self { library_path }
    }

    /// Binds the library once to report whether PDF input can be served.
    pub fn check(&self) -> Result<()> {
        self.load().map(|_| ())
    }

    fn load(&self) -> Result<Pdfium> {
        load_pdfium(self.library_path.as_ref())
    }
}

/// Search order:
/// 1. explicit configured path
/// 2. `PDFIUM_DYNAMIC_LIB_PATH`
/// 3. next to the running executable
/// 4. system library paths
fn load_pdfium(configured: Option<&PathBuf>) -> Result<Pdfium> {
    let load_err = |reason: String| ScanError::RenderFailure { page: 0, reason };

    if let Some(path) = configured {
        debug!(path = %path.display(), "loading PDFium from config");
        let bindings = Pdfium::bind_to_library(path)
            .map_err(|e| load_err(format!("failed to load PDFium from {}: {e}", path.display())))?;
        return Ok(Pdfium::new(bindings));
    }

    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        debug!(path = %path, "loading PDFium from env var");
        let bindings = Pdfium::bind_to_library(&path)
            .map_err(|e| load_err(format!("failed to load PDFium from {path}: {e}")))?;
        return Ok(Pdfium::new(bindings));
    }

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(PathBuf::from)) {
        let lib_path = Pdfium::pdfium_platform_library_name_at_path(exe_dir.to_string_lossy().as_ref());
        if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
            debug!(dir = %exe_dir.display(), "loaded PDFium next to executable");
            return Ok(Pdfium::new(bindings));
        }
    }

    let bindings = Pdfium::bind_to_system_library().map_err(|e| {
        load_err(format!(
            "PDFium library not found; set pdf.pdfium_library_path or PDFIUM_DYNAMIC_LIB_PATH: {e}"
        ))
    })?;
    Ok(Pdfium::new(bindings))
}

impl PageRasterizer for PdfiumRasterizer {
    fn open(&self, pdf_bytes: &[u8], visit: &mut dyn FnMut(&dyn PageSource) -> Result<()>) -> Result<()> {
        let pdfium = self.load()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| ScanError::RenderFailure {
                page: 0,
                reason: format!("failed to load PDF: {e}"),
            })?;
        visit(&PdfiumDocument { document: &document })
    }
}

struct PdfiumDocument<'d, 'p> {
    document: &'d PdfDocument<'p>,
}

impl PageSource for PdfiumDocument<'_, '_> {
    fn page_count(&self) -> u32 {
        self.document.pages().len() as u32
    }

    fn render_page(&self, page: u32, scale: f32) -> Result<Vec<u8>> {
        let pages = self.document.pages();
        let page_count = pages.len() as u32;
        if page < 1 || page > page_count {
            return Err(ScanError::InvalidPage { page, page_count });
        }

        let pdf_page = pages
            .get((page - 1) as u16)
            .map_err(|e| ScanError::RenderFailure {
                page,
                reason: e.to_string(),
            })?;

        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = pdf_page
            .render_with_config(&config)
            .map_err(|e| ScanError::RenderFailure {
                page,
                reason: format!("rendering failed: {e}"),
            })?;

        let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
        let raster = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes()).ok_or_else(|| {
            ScanError::RenderFailure {
                page,
                reason: format!("bitmap size does not match {width}x{height}"),
            }
        })?;
        let png = encode_png(&raster).map_err(|e| ScanError::RenderFailure {
            page,
            reason: e.to_string(),
        })?;

        debug!(page, width, height, scale, png_size = png.len(), "rendered PDF page");
        Ok(png)
    }
}
