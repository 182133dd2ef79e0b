use super::DecodeEngine;
use crate::error::EngineError;
use crate::report::EngineId;
use crate::surface::Surface;
use crate::symbology::{FormatSet, Symbology};
use rqrr::PreparedImage;
use tracing::debug;

/// QR-only decoder working straight off the RGBA samples. Cheap enough to
/// always run before the general engine.
#[derive(Debug, Default)]
pub struct FastQrEngine;

impl FastQrEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DecodeEngine for FastQrEngine {
    fn id(&self) -> EngineId {
        EngineId::Rqrr
    }

    fn supports(&self, formats: &FormatSet) -> bool {
        formats.contains(Symbology::QR_CODE)
    }

    fn decode(&self, surface: &Surface, _formats: &FormatSet) -> Result<Option<String>, EngineError> {
        let (width, height) = (surface.width(), surface.height());
        let rgba = surface.rgba();
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected || width == 0 || height == 0 {
            return Err(EngineError::MalformedInput {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }

        let w = width as usize;
        let mut prepared = PreparedImage::prepare_from_greyscale(w, height as usize, |x, y| {
            let base = (y * w + x) * 4;
            let r = rgba[base] as u32;
            let g = rgba[base + 1] as u32;
            let b = rgba[base + 2] as u32;
            ((77 * r + 150 * g + 29 * b) >> 8) as u8
        });

        let grids = prepared.detect_grids();
        for grid in &grids {
            match grid.decode() {
                Ok((meta, content)) => {
                    debug!(version = ?meta.version, ecc_level = meta.ecc_level, "rqrr decoded grid");
                    return Ok(Some(content));
                }
                Err(e) => debug!("rqrr grid rejected: {e:?}"),
            }
        }
        Ok(None)
    }
}
