use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Scan options as sent by a caller: the request body without its bytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOptions {
    #[serde(default)]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crop: Vec<CropRect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_options: Option<PdfOptions>,
}

impl ScanOptions {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            ..Default::default()
        }
    }
}

/// A crop rectangle in percentages (0-100) of the scanned surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl FromStr for CropRect {
    type Err = String;

    /// Parses `x,y,width,height`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid crop '{s}': {e}"))?;
        match parts.as_slice() {
            [x, y, w, h] => Ok(CropRect::new(*x, *y, *w, *h)),
            _ => Err(format!("invalid crop '{s}': expected x,y,width,height")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfOptions {
    /// 1-based page numbers. Absent or empty means every page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Png,
    Jpeg,
    Pdf,
}

impl ContentType {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "image/png" => Ok(ContentType::Png),
            "image/jpeg" => Ok(ContentType::Jpeg),
            "application/pdf" => Ok(ContentType::Pdf),
            other => Err(ScanError::UnsupportedContentType(other.to_string())),
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ContentType::Png),
            "jpg" | "jpeg" => Some(ContentType::Jpeg),
            "pdf" => Some(ContentType::Pdf),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ContentType::Png => "image/png",
            ContentType::Jpeg => "image/jpeg",
            ContentType::Pdf => "application/pdf",
        }
    }

    pub fn is_image(self) -> bool {
        matches!(self, ContentType::Png | ContentType::Jpeg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_body() {
        let raw = r#"{
            "contentType": "application/pdf",
            "pdfOptions": { "pages": [2] },
            "crop": [{ "x": 50, "y": 75, "width": 50, "height": 25 }]
        }"#;
        let opts: ScanOptions = serde_json::from_str(raw).unwrap();
        assert_eq!(opts.content_type, "application/pdf");
        assert_eq!(opts.crop, vec![CropRect::new(50.0, 75.0, 50.0, 25.0)]);
        assert_eq!(opts.pdf_options.unwrap().pages, Some(vec![2]));
        assert!(opts.formats.is_empty());
    }

    #[test]
    fn crop_from_cli_string() {
        let rect: CropRect = "30, 30, 30,30".parse().unwrap();
        assert_eq!(rect, CropRect::new(30.0, 30.0, 30.0, 30.0));
        assert!("1,2,3".parse::<CropRect>().is_err());
        assert!("a,b,c,d".parse::<CropRect>().is_err());
    }

    #[test]
    fn text_plain_is_rejected() {
        assert!(matches!(
            ContentType::parse("text/plain"),
            Err(ScanError::UnsupportedContentType(_))
        ));
    }
}
