use super::DecodeEngine;
use crate::error::EngineError;
use crate::report::EngineId;
use crate::surface::Surface;
use crate::symbology::{FormatSet, Symbology};
use rxing::common::HybridBinarizer;
use rxing::{
    BarcodeFormat, BinaryBitmap, DecodeHintValue, DecodeHints, Exceptions, Luma8LuminanceSource,
    MultiFormatReader, Reader,
};
use std::collections::HashSet;
use tracing::debug;

/// Multi-symbology decoder: luminance plane, hybrid binarization, then
/// rxing's multi-format reader with try-harder always on.
#[derive(Debug, Default)]
pub struct GeneralEngine {
    not_found_as_error: bool,
}

impl GeneralEngine {
    /// With `not_found_as_error`, the reader's not-found condition is
    /// reported as a failed attempt instead of an empty result.
    pub fn new(not_found_as_error: bool) -> Self {
        Self { not_found_as_error }
    }

    /// Hints are built per call; nothing is shared between scans.
    fn hints(formats: &FormatSet) -> DecodeHints {
        let possible: HashSet<BarcodeFormat> = formats.iter().map(barcode_format).collect();
        DecodeHints::default()
            .with(DecodeHintValue::TryHarder(true))
            .with(DecodeHintValue::PossibleFormats(possible))
    }
}

impl DecodeEngine for GeneralEngine {
    fn id(&self) -> EngineId {
        EngineId::Rxing
    }

    fn supports(&self, formats: &FormatSet) -> bool {
        !formats.is_empty()
    }

    fn decode(&self, surface: &Surface, formats: &FormatSet) -> Result<Option<String>, EngineError> {
        let lum = surface.luminance();
        let source = Luma8LuminanceSource::new(lum.bytes, lum.width, lum.height);
        let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));

        let mut reader = MultiFormatReader::default();
        match reader.decode_with_hints(&mut bitmap, &Self::hints(formats)) {
            Ok(result) => {
                debug!(format = ?result.getBarcodeFormat(), "rxing decoded barcode");
                let text = result.getText();
                if text.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(text.to_string()))
                }
            }
            Err(Exceptions::NotFoundException(_)) if !self.not_found_as_error => Ok(None),
            Err(e) => Err(EngineError::Decoder(e.to_string())),
        }
    }
}

fn barcode_format(sym: Symbology) -> BarcodeFormat {
    match sym {
        Symbology::AZTEC => BarcodeFormat::AZTEC,
        Symbology::CODABAR => BarcodeFormat::CODABAR,
        Symbology::CODE_39 => BarcodeFormat::CODE_39,
        Symbology::CODE_93 => BarcodeFormat::CODE_93,
        Symbology::CODE_128 => BarcodeFormat::CODE_128,
        Symbology::DATA_MATRIX => BarcodeFormat::DATA_MATRIX,
        Symbology::EAN_8 => BarcodeFormat::EAN_8,
        Symbology::EAN_13 => BarcodeFormat::EAN_13,
        Symbology::ITF => BarcodeFormat::ITF,
        Symbology::MAXICODE => BarcodeFormat::MAXICODE,
        Symbology::PDF_417 => BarcodeFormat::PDF_417,
        Symbology::QR_CODE => BarcodeFormat::QR_CODE,
        Symbology::RSS_14 => BarcodeFormat::RSS_14,
        Symbology::RSS_EXPANDED => BarcodeFormat::RSS_EXPANDED,
        Symbology::UPC_A => BarcodeFormat::UPC_A,
        Symbology::UPC_E => BarcodeFormat::UPC_E,
        Symbology::UPC_EAN_EXTENSION => BarcodeFormat::UPC_EAN_EXTENSION,
    }
}
