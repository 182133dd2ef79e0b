pub mod pdfium;

use crate::error::Result;

pub use pdfium::PdfiumRasterizer;

/// Native PDF resolution is multiplied by this when no scale is requested.
/// Lower scales lose small embedded codes in the noise.
pub const DEFAULT_RENDER_SCALE: f32 = 2.0;

/// Opens a PDF once per scan and hands the parsed document to `visit`.
/// The document is only valid for the duration of the callback.
pub trait PageRasterizer: Send + Sync {
    fn open(&self, pdf_bytes: &[u8], visit: &mut dyn FnMut(&dyn PageSource) -> Result<()>) -> Result<()>;
}

/// A parsed document. Pages are 1-based.
pub trait PageSource {
    fn page_count(&self) -> u32;

    /// Renders one page to PNG. Fails with `InvalidPage` when `page` is 0
    /// or past the last page.
    fn render_page(&self, page: u32, scale: f32) -> Result<Vec<u8>>;
}
