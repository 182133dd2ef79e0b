use crate::report::ErrorBody;
use thiserror::Error;

/// Failures that end a scan call. Engine failures never show up here; they
/// are recorded as attempts instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Unsupported barcode format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid crop region {x},{y} {width}x{height} for a {surface_width}x{surface_height} surface")]
    InvalidRegion {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        surface_width: u32,
        surface_height: u32,
    },

    #[error("invalid page {page}: document has {page_count} pages")]
    InvalidPage { page: u32, page_count: u32 },

    #[error("invalid render scale: {0}")]
    InvalidScale(f32),

    #[error("document has {page_count} pages, over the limit of {max_pages}")]
    PageLimit { page_count: u32, max_pages: u32 },

    #[error("could not decode image: {0}")]
    InvalidImage(String),

    #[error("failed to render page {page}: {reason}")]
    RenderFailure { page: u32, reason: String },
}

impl ScanError {
    /// HTTP-equivalent classification of the failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ScanError::PageLimit { .. } => 413,
            ScanError::RenderFailure { .. } => 500,
            _ => 400,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let detail = match self {
            ScanError::InvalidRegion {
                x,
                y,
                width,
                height,
                surface_width,
                surface_height,
            } => serde_json::json!({
                "x": x,
                "y": y,
                "width": width,
                "height": height,
                "surfaceWidth": surface_width,
                "surfaceHeight": surface_height,
            }),
            ScanError::InvalidPage { page, page_count } => {
                serde_json::json!({ "page": page, "pageCount": page_count })
            }
            ScanError::PageLimit {
                page_count,
                max_pages,
            } => serde_json::json!({ "pageCount": page_count, "maxPages": max_pages }),
            ScanError::RenderFailure { page, .. } => serde_json::json!({ "page": page }),
            _ => serde_json::json!({}),
        };
        ErrorBody {
            message: self.to_string(),
            detail,
            status_code: self.status_code(),
        }
    }
}

/// A single engine invocation that raised instead of returning a result.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed pixel buffer: expected {expected} bytes for {width}x{height}, got {actual}")]
    MalformedInput {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("{0}")]
    Decoder(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
